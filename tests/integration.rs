use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_swiftdoc")));
    cmd.env_remove("SWIFTDOC_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn sources() -> String {
    fixture_path("Sources")
}

// -- page mode --

#[test]
fn page_mode_writes_reference_pages() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(sources())
        .assert()
        .success();

    let shapes = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("Shapes.expected.rst")).unwrap();
    assert_eq!(shapes, expected);

    let color = std::fs::read_to_string(dir.path().join("Model").join("Color.rst")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("Color.expected.rst")).unwrap();
    assert_eq!(color, expected);
}

#[test]
fn single_file_argument() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("Sources/Shapes.swift"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    assert!(output.contains("Documentation for Shapes.swift"));
    assert!(!dir.path().join("Model").exists());
}

#[test]
fn glob_argument() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("Sources/*.swift"))
        .assert()
        .success();

    assert!(dir.path().join("Shapes.rst").exists());
}

#[test]
fn glob_without_matches_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("Nowhere/*.swift"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files matched"))
        .stderr(predicate::str::contains("no Swift sources found"));
}

#[test]
fn private_and_undocumented_members() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--private", "--undoc-members"])
        .arg(sources())
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    assert!(output.contains("   .. swift:method:: helper()\n"));
}

#[test]
fn no_members() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "--no-members"])
        .arg(sources())
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    assert!(output.contains(".. swift:struct:: Circle : Shape"));
    assert!(!output.contains("swift:method"));
}

#[test]
fn no_index_marks_every_directive() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "--no-index"])
        .arg(sources())
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    let directives = output.matches(".. swift:").count();
    assert_eq!(output.matches(":noindex:").count(), directives);
}

#[test]
fn file_location_trailers() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "--file-location"])
        .arg(sources())
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Model").join("Color.rst")).unwrap();
    assert!(output.contains("   Defined in :doc:`Model/Color`:2\n"));
}

#[test]
fn exclude_list_skips_names() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let list = dir.path().join("exclude.txt");
    std::fs::write(&list, "Circle\n\n").unwrap();

    cmd()
        .args(["-o", out.to_str().unwrap()])
        .args(["--exclude-list", list.to_str().unwrap()])
        .arg(sources())
        .assert()
        .success();

    let output = std::fs::read_to_string(out.join("Shapes.rst")).unwrap();
    assert!(output.contains(".. swift:protocol:: Shape"));
    assert!(!output.contains("Circle"));
}

#[test]
fn refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().to_str().unwrap();

    cmd().args(["-o", out]).arg(sources()).assert().success();
    std::fs::write(dir.path().join("Shapes.rst"), "edited by hand").unwrap();

    cmd()
        .args(["-o", out])
        .arg(sources())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--overwrite"));
    let kept = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    assert_eq!(kept, "edited by hand");

    cmd()
        .args(["-o", out, "--overwrite"])
        .arg(sources())
        .assert()
        .success();
    let replaced = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    assert!(replaced.starts_with("====="));
}

#[test]
fn output_required_without_lookup() {
    cmd()
        .arg(sources())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unknown_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "html"])
        .arg(sources())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: html"));
}

// -- autodoc stubs --

#[test]
fn autodoc_format_writes_stubs() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "autodoc"])
        .arg(sources())
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Shapes.rst")).unwrap();
    assert!(output.starts_with("==="));
    assert!(output.contains(".. autoswift:: Shape\n   :members:\n\n"));
    assert!(output.contains(".. autoswift:: Circle\n   :members:\n\n"));
    assert!(!output.contains(".. swift:"));
}

// -- lookup mode --

#[test]
fn lookup_member() {
    cmd()
        .args(["--lookup", "Circle.draw"])
        .arg(sources())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ".. swift:method:: draw(in context: String)",
        ))
        .stdout(predicate::str::contains("Draws the circle."));
}

#[test]
fn lookup_declaration_with_members() {
    cmd()
        .args(["--lookup", "Color.Entry"])
        .arg(sources())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(".. swift:struct:: Entry"))
        .stdout(predicate::str::contains("   .. swift:var:: weight: Int = 1"));
}

#[test]
fn lookup_miss_suggests() {
    cmd()
        .args(["--lookup", "Circle.dra"])
        .arg(sources())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "can not find \"Circle.dra\" in any Swift file. Did you mean \"Circle.draw\"?",
        ));
}

// -- logging --

#[test]
fn verbose_logs_indexed_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-v"])
        .arg(sources())
        .assert()
        .success()
        .stderr(predicate::str::contains("indexed swift file"))
        .stderr(predicate::str::contains("wrote page"));
}
