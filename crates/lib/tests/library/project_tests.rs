//! Tests for project loading, package lookup and manifest analysis.

use std::path::PathBuf;

use enaml_build_lib::manifest::ManifestFiles;
use enaml_build_lib::project::ProjectError;

use super::common::{load, project_tree, write};

#[test]
fn discovers_packages_with_init_markers() {
  let temp = project_tree();
  let project = load(&temp);

  assert_eq!(project.packages, vec!["gallery".to_string(), "gallery.views".to_string()]);
  assert_eq!(project.version.as_deref(), Some("2.0.0"));
}

#[test]
fn resolves_package_dirs_through_root_mapping() {
  let temp = project_tree();
  let project = load(&temp);

  assert_eq!(
    project.get_package_dir("gallery.views").unwrap(),
    PathBuf::from("src").join("gallery").join("views")
  );
  assert!(matches!(
    project.get_package_dir("scratch"),
    Err(ProjectError::UnknownPackage(_))
  ));
}

#[test]
fn manifest_assigns_nested_data_and_skips_modules() {
  let temp = project_tree();
  let project = load(&temp);

  let manifest = ManifestFiles::analyze(&project).unwrap();

  assert_eq!(manifest.get("gallery"), &[PathBuf::from("src/gallery/icons/star.svg")]);
  assert!(manifest.get("gallery.views").is_empty());
}

#[test]
fn missing_manifest_file_is_an_error() {
  let temp = project_tree();
  std::fs::remove_file(temp.path().join("SOURCES.txt")).unwrap();
  let project = load(&temp);

  assert!(matches!(
    ManifestFiles::analyze(&project),
    Err(ProjectError::ReadManifest { .. })
  ));
}

#[test]
fn explicit_packages_skip_discovery() {
  let temp = project_tree();
  write(
    temp.path(),
    "enaml-build.toml",
    "[project]\nname = \"gallery\"\npackages = [\"gallery\"]\n\n[package_dir]\n\"\" = \"src\"\n",
  );

  let project = load(&temp);

  assert_eq!(project.packages, vec!["gallery".to_string()]);
  assert!(!project.include_package_data);
}
