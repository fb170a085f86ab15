//! Tests for the build, install and develop pipelines over a project on disk.

use std::fs;
use std::path::PathBuf;

use enaml_build_lib::build_py::markup::MarkupBuildPy;
use enaml_build_lib::build_py::{BuildPy, BuildPyCommand, BuildTuple};
use enaml_build_lib::compile::MarkupCompileOutcome;
use enaml_build_lib::config::{CompileFlags, GlobalOptions};
use enaml_build_lib::platform::Os;

use super::common::{Fakes, load, project_tree};

mod build {
  use super::*;

  #[test]
  fn data_files_list_package_data_then_markup() {
    let temp = project_tree();
    let project = load(&temp);
    let fakes = Fakes::default();
    let base = BuildPy::new(&project, GlobalOptions::default(), CompileFlags::for_build(), &fakes.bytes);
    let mut step = MarkupBuildPy::new(base, &fakes.markup);

    let data = step.data_files().unwrap();

    let tuple = |package: &str, src: &str, build: &str, files: &[&str]| BuildTuple {
      package: package.to_string(),
      src_dir: PathBuf::from(src),
      build_dir: PathBuf::from(build),
      filenames: files.iter().map(PathBuf::from).collect(),
    };
    assert_eq!(
      data,
      vec![
        tuple(
          "gallery",
          "src/gallery",
          "build/lib/gallery",
          &["icons/star.svg", "README.txt"]
        ),
        tuple("gallery.views", "src/gallery/views", "build/lib/gallery/views", &[]),
        // Manifest entries lead every discovered list, markup included.
        tuple(
          "gallery",
          "src/gallery",
          "build/lib/gallery",
          &["icons/star.svg", "main.enaml"]
        ),
        tuple(
          "gallery.views",
          "src/gallery/views",
          "build/lib/gallery/views",
          &["list.enaml"]
        ),
      ]
    );
  }

  #[test]
  fn compiled_build_caches_every_shipped_markup_file() {
    let temp = project_tree();
    let project = load(&temp);
    let fakes = Fakes::default();
    let flags = CompileFlags {
      compile: true,
      optimize: 0,
    };

    let report = fakes
      .pipeline(&project, GlobalOptions::default(), Os::Linux)
      .build(flags)
      .unwrap();

    let lib = project.root.join("build/lib/gallery");
    assert!(lib.join("__enamlcache__").join("main.enaml-py3-cv24.enamlc").is_file());
    assert!(lib.join("views/__enamlcache__/list.enaml-py3-cv24.enamlc").is_file());
    assert!(!lib.join("views/list_draft.enaml").exists());
    assert!(!project.root.join("build/lib/scratch").exists());
    assert_eq!(report.packages.compiled.markup, Some(MarkupCompileOutcome::Compiled(2)));
    assert_eq!(report.extensions.len(), 10);
  }

  #[test]
  fn repeated_build_skips_up_to_date_copies() {
    let temp = project_tree();
    let project = load(&temp);
    let fakes = Fakes::default();
    let pipeline = fakes.pipeline(&project, GlobalOptions::default(), Os::Linux);

    pipeline.build(CompileFlags::for_build()).unwrap();
    let built = project.root.join("build/lib/gallery/main.enaml");
    fs::write(&built, "edited in build tree").unwrap();
    pipeline.build(CompileFlags::for_build()).unwrap();

    assert_eq!(fs::read_to_string(&built).unwrap(), "edited in build tree");
    // Extensions were up to date as well.
    assert_eq!(fakes.extensions.built.borrow().len(), 10);
  }
}

mod install {
  use super::*;

  #[test]
  fn windows_install_builds_eleven_extensions_with_msvc_flags() {
    let temp = project_tree();
    let project = load(&temp);
    let fakes = Fakes::default();
    let site = temp.path().join("site");

    let report = fakes
      .pipeline(&project, GlobalOptions::default(), Os::Windows)
      .install(CompileFlags::for_install(), &site)
      .unwrap();

    assert_eq!(*fakes.tables.calls.borrow(), 1);
    assert_eq!(fakes.extensions.built.borrow().len(), 11);
    assert_eq!(fakes.extensions.built.borrow().last().unwrap(), "enaml.winutil");
    assert!(
      fakes
        .extensions
        .flags
        .borrow()
        .iter()
        .all(|f| f == &vec!["/EHsc".to_string()])
    );
    assert!(site.join("gallery/views/list.enaml").is_file());
    assert!(site.join("enaml/core/alias.pyd").is_file());
    assert_eq!(report.install.compiled.markup, Some(MarkupCompileOutcome::Compiled(2)));
  }

  #[test]
  fn disabled_bytecode_installs_without_caches() {
    let temp = project_tree();
    let project = load(&temp);
    let fakes = Fakes::default();
    let site = temp.path().join("site");
    let options = GlobalOptions {
      dont_write_bytecode: true,
      ..Default::default()
    };

    let report = fakes
      .pipeline(&project, options, Os::Linux)
      .install(CompileFlags::for_install(), &site)
      .unwrap();

    assert!(site.join("gallery/main.enaml").is_file());
    assert!(!site.join("gallery/__enamlcache__").exists());
    assert!(fakes.markup.compiled.borrow().is_empty());
    assert!(fakes.bytes.batches.borrow().is_empty());
    assert_eq!(report.install.compiled.markup, Some(MarkupCompileOutcome::BytecodeDisabled));
  }
}

mod develop {
  use super::*;

  #[test]
  fn develop_links_project_root() {
    let temp = project_tree();
    let project = load(&temp);
    let fakes = Fakes::default();
    let site = temp.path().join("site");
    fs::create_dir_all(&site).unwrap();
    fs::write(site.join("easy-install.pth"), "/opt/other").unwrap();

    let report = fakes
      .pipeline(&project, GlobalOptions::default(), Os::Linux)
      .develop(CompileFlags::for_build(), &site)
      .unwrap();

    assert!(report.registered);
    assert!(project.root.join("enaml/weakmethod.pyd").is_file());
    let pth = fs::read_to_string(site.join("easy-install.pth")).unwrap();
    let lines: Vec<&str> = pth.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "/opt/other");
    let egg_link = fs::read_to_string(site.join("gallery.egg-link")).unwrap();
    let linked = egg_link.lines().next().unwrap();
    assert_eq!(linked, lines[1]);
    if cfg!(windows) {
      // Drive paths render as `C:/...` with no leading slash.
      assert!(!linked.starts_with('/'));
    } else {
      assert!(linked.starts_with('/'));
    }
  }
}
