//! Shell-style pattern matching.
//!
//! Two flavours are provided, mirroring how package data is selected:
//! - [`fnmatch`] matches a whole string, `*` crosses path separators.
//! - [`glob`] expands a `/`-separated pattern against the filesystem one
//!   segment at a time, `**` descends recursively.
//!
//! Supported wildcards are `*`, `?`, `[seq]` and `[!seq]`.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Returns true if `pattern` contains any wildcard characters.
pub fn has_magic(pattern: &str) -> bool {
  pattern.contains(['*', '?', '['])
}

/// Match `name` against `pattern`.
///
/// `*` matches any run of characters, including `/`.
pub fn fnmatch(name: &str, pattern: &str) -> bool {
  let name: Vec<char> = name.chars().collect();
  let pattern: Vec<char> = pattern.chars().collect();
  match_from(&name, &pattern)
}

fn match_from(name: &[char], pattern: &[char]) -> bool {
  let (mut n, mut p) = (0, 0);
  // Position to resume from after the last `*`: (pattern index, name index).
  let mut backtrack: Option<(usize, usize)> = None;

  while n < name.len() {
    if p < pattern.len() {
      match pattern[p] {
        '*' => {
          backtrack = Some((p, n));
          p += 1;
          continue;
        }
        '?' => {
          n += 1;
          p += 1;
          continue;
        }
        '[' => {
          if let Some((matched, len)) = match_class(name[n], &pattern[p..]) {
            if matched {
              n += 1;
              p += len;
              continue;
            }
          } else if name[n] == '[' {
            // Unterminated class is a literal bracket.
            n += 1;
            p += 1;
            continue;
          }
        }
        c if c == name[n] => {
          n += 1;
          p += 1;
          continue;
        }
        _ => {}
      }
    }

    match backtrack {
      Some((star_p, star_n)) => {
        backtrack = Some((star_p, star_n + 1));
        p = star_p + 1;
        n = star_n + 1;
      }
      None => return false,
    }
  }

  pattern[p..].iter().all(|c| *c == '*')
}

/// Match a single character against a `[...]` class at the start of `pattern`.
///
/// Returns `(matched, consumed_len)`, or `None` if the class is unterminated.
fn match_class(c: char, pattern: &[char]) -> Option<(bool, usize)> {
  let mut i = 1;
  let negate = matches!(pattern.get(i), Some('!'));
  if negate {
    i += 1;
  }

  let start = i;
  let mut matched = false;
  while i < pattern.len() {
    if pattern[i] == ']' && i > start {
      return Some((matched != negate, i + 1));
    }
    if i + 2 < pattern.len() && pattern[i + 1] == '-' && pattern[i + 2] != ']' {
      if pattern[i] <= c && c <= pattern[i + 2] {
        matched = true;
      }
      i += 3;
    } else {
      if pattern[i] == c {
        matched = true;
      }
      i += 1;
    }
  }
  None
}

fn is_hidden(name: &str) -> bool {
  name.starts_with('.')
}

/// Render a path with `/` separators regardless of platform.
///
/// `.` components are dropped. A drive or UNC prefix is kept as the first
/// part, so `C:\proj` renders as `C:/proj`.
pub fn to_slash(path: &Path) -> String {
  let mut parts = Vec::new();
  let mut rooted = false;
  let mut prefixed = false;
  for component in path.components() {
    match component {
      Component::RootDir => rooted = true,
      Component::CurDir => {}
      Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
      Component::ParentDir => parts.push("..".to_string()),
      Component::Prefix(prefix) => {
        prefixed = true;
        parts.push(prefix.as_os_str().to_string_lossy().replace('\\', "/"));
      }
    }
  }
  let joined = parts.join("/");
  if rooted && !prefixed { format!("/{}", joined) } else { joined }
}

/// `path` with every `.` component removed, so equal locations compare equal
/// however they were spelled.
pub fn normalize(path: &Path) -> PathBuf {
  path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}

/// Expand `pattern` relative to `root`.
///
/// Returned paths are relative to `root` (or absolute if the pattern was),
/// built from the pattern's literal segments and the matched names. Results
/// for each wildcard segment are sorted by file name. Hidden entries only
/// match segments that themselves start with a dot.
pub fn glob(root: &Path, pattern: &str) -> Vec<PathBuf> {
  let start = if pattern.starts_with('/') {
    PathBuf::from("/")
  } else {
    PathBuf::new()
  };
  let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
  if segments.is_empty() {
    return Vec::new();
  }

  let mut matches = vec![start];
  for (idx, segment) in segments.iter().enumerate() {
    let last = idx + 1 == segments.len();
    let mut next = Vec::new();

    for base in &matches {
      let dir = root.join(base);

      if *segment == "**" {
        if !dir.is_dir() {
          continue;
        }
        let walker = WalkDir::new(&dir)
          .sort_by_file_name()
          .into_iter()
          .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));
        for entry in walker.flatten() {
          if entry.depth() == 0 {
            next.push(base.clone());
            continue;
          }
          if !last && !entry.file_type().is_dir() {
            continue;
          }
          if let Ok(rel) = entry.path().strip_prefix(&dir) {
            next.push(base.join(rel));
          }
        }
      } else if has_magic(segment) {
        if !dir.is_dir() {
          continue;
        }
        let walker = WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name();
        for entry in walker.into_iter().flatten() {
          let name = entry.file_name().to_string_lossy();
          if is_hidden(&name) && !segment.starts_with('.') {
            continue;
          }
          if !fnmatch(&name, segment) {
            continue;
          }
          if last || entry.path().is_dir() {
            next.push(base.join(&*name));
          }
        }
      } else {
        let candidate = base.join(segment);
        if root.join(&candidate).symlink_metadata().is_ok() {
          next.push(candidate);
        }
      }
    }

    matches = next;
  }

  matches
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  mod fnmatch {
    use super::*;

    #[test]
    fn star_matches_across_separators() {
      assert!(fnmatch("pkg/sub/view.enaml", "pkg/*.enaml"));
      assert!(fnmatch("view.enaml", "*.enaml"));
      assert!(!fnmatch("view.enaml.bak", "*.enaml"));
    }

    #[test]
    fn question_mark_matches_one_char() {
      assert!(fnmatch("a1.txt", "a?.txt"));
      assert!(!fnmatch("a12.txt", "a?.txt"));
    }

    #[test]
    fn character_classes() {
      assert!(fnmatch("file_b.enaml", "file_[abc].enaml"));
      assert!(!fnmatch("file_d.enaml", "file_[abc].enaml"));
      assert!(fnmatch("file_d.enaml", "file_[!abc].enaml"));
      assert!(fnmatch("v3", "v[0-9]"));
      assert!(!fnmatch("vx", "v[0-9]"));
    }

    #[test]
    fn unterminated_class_is_literal() {
      assert!(fnmatch("a[b", "a[b"));
      assert!(!fnmatch("ab", "a[b"));
    }

    #[test]
    fn trailing_stars_match_empty() {
      assert!(fnmatch("abc", "abc**"));
      assert!(fnmatch("", "*"));
    }
  }

  mod glob {
    use super::*;

    fn tree() -> TempDir {
      let temp = TempDir::new().unwrap();
      let root = temp.path();
      fs::create_dir_all(root.join("pkg/sub")).unwrap();
      fs::create_dir_all(root.join("pkg/.hidden")).unwrap();
      fs::write(root.join("pkg/b.enaml"), "").unwrap();
      fs::write(root.join("pkg/a.enaml"), "").unwrap();
      fs::write(root.join("pkg/helper.py"), "").unwrap();
      fs::write(root.join("pkg/.secret.enaml"), "").unwrap();
      fs::write(root.join("pkg/sub/c.enaml"), "").unwrap();
      fs::write(root.join("pkg/.hidden/d.enaml"), "").unwrap();
      temp
    }

    #[test]
    fn single_segment_wildcard_is_sorted_and_shallow() {
      let temp = tree();
      let found = glob(temp.path(), "pkg/*.enaml");
      assert_eq!(found, vec![PathBuf::from("pkg/a.enaml"), PathBuf::from("pkg/b.enaml")]);
    }

    #[test]
    fn hidden_entries_need_explicit_dot() {
      let temp = tree();
      let found = glob(temp.path(), "pkg/.*.enaml");
      assert_eq!(found, vec![PathBuf::from("pkg/.secret.enaml")]);
    }

    #[test]
    fn double_star_descends() {
      let temp = tree();
      let found = glob(temp.path(), "pkg/**/*.enaml");
      assert_eq!(
        found,
        vec![
          PathBuf::from("pkg/a.enaml"),
          PathBuf::from("pkg/b.enaml"),
          PathBuf::from("pkg/sub/c.enaml"),
        ]
      );
    }

    #[test]
    fn literal_segments_require_existence() {
      let temp = tree();
      assert_eq!(glob(temp.path(), "pkg/helper.py"), vec![PathBuf::from("pkg/helper.py")]);
      assert!(glob(temp.path(), "pkg/missing.py").is_empty());
      assert!(glob(temp.path(), "nope/*.enaml").is_empty());
    }

    #[test]
    fn to_slash_normalises_components() {
      let path = Path::new("src").join("pkg").join(".").join("x.enaml");
      assert_eq!(to_slash(&path), "src/pkg/x.enaml");
    }

    #[test]
    #[cfg(not(windows))]
    fn to_slash_keeps_unix_root() {
      assert_eq!(to_slash(Path::new("/opt/./proj")), "/opt/proj");
    }

    #[test]
    #[cfg(windows)]
    fn to_slash_keeps_drive_prefix_without_leading_slash() {
      assert_eq!(to_slash(Path::new(r"C:\proj\src")), "C:/proj/src");
      assert_eq!(to_slash(Path::new(r"\\server\share\proj")), "//server/share/proj");
    }

    #[test]
    fn normalize_drops_current_dir_components() {
      assert_eq!(normalize(Path::new("./src/pkg")), PathBuf::from("src").join("pkg"));
      assert_eq!(normalize(Path::new(".")), PathBuf::new());
    }
  }
}
