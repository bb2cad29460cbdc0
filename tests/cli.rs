//! Command line tests.

use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn bundle_styles() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("styles/a.css")
        .write_str(".a { background: url(img/a.png); }")?;
    dir.child("styles/b.css").write_str(".b { color: red; }")?;

    let mut cmd = Command::cargo_bin("assetpack")?;
    cmd.args([
        "--base-url",
        "http://host/",
        "--output",
        "compiled",
        "bundle",
        "--kind",
        "css",
        "styles/a.css",
        "styles/b.css",
    ])
    .current_dir(&dir);

    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"^compiled/css/css_[0-9a-f]{32}\.css\n$")?);

    let bundles: Vec<_> = std::fs::read_dir(dir.child("compiled/css").path())?
        .collect::<Result<_, _>>()?;
    assert_eq!(bundles.len(), 1);

    let contents = std::fs::read_to_string(bundles[0].path())?;
    assert_eq!(
        contents,
        ".a{background:url(http://host/styles/img/a.png);}\n.b{color:red;}\n"
    );

    Ok(())
}

#[test]
fn bundle_scripts_with_external() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("a.js").write_str("a()")?;
    dir.child("b.js").write_str("b()")?;

    let mut cmd = Command::cargo_bin("assetpack")?;
    cmd.args([
        "--output",
        "out",
        "bundle",
        "--kind",
        "js",
        "a.js",
        "https://cdn.example.com/lib.js",
        "b.js",
    ])
    .current_dir(&dir);

    cmd.assert().success().stdout(predicate::str::is_match(
        r"^out/js/js_[0-9a-f]{32}\.js\nhttps://cdn\.example\.com/lib\.js\nout/js/js_[0-9a-f]{32}\.js\n$",
    )?);

    Ok(())
}

#[test]
fn fail_without_base_url() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("a.css").write_str("a{}")?;

    let mut cmd = Command::cargo_bin("assetpack")?;
    cmd.args(["bundle", "--kind", "css", "a.css"])
        .current_dir(&dir);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Base URL"));

    dir.child("assets/compiled").assert(predicate::path::missing());

    Ok(())
}

#[test]
fn fail_missing_source() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    let mut cmd = Command::cargo_bin("assetpack")?;
    cmd.args(["--base-url", "/", "bundle", "--kind", "css", "missing.css"])
        .current_dir(&dir);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing.css"));

    Ok(())
}

#[test]
fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("assets/compiled/css/css_0.css").write_str("a{}")?;
    dir.child("assets/compiled/js/js_0.js").write_str("a()")?;
    dir.child("assets/keep.txt").write_str("keep")?;

    let mut cmd = Command::cargo_bin("assetpack")?;
    cmd.arg("clear").current_dir(&dir);

    cmd.assert().success();

    dir.child("assets/compiled").assert(predicate::path::missing());
    dir.child("assets/keep.txt").assert(predicate::path::is_file());

    Ok(())
}
