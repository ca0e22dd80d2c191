use assert_cmd::{crate_name, Command};
use assertables::assert_contains;
use pathdx::cli::{run, Config};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_cmdline_stdin() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.write_stdin("M 0 0 L 10 0 L 10 10 L 0 10 Z")
        .assert()
        .success()
        .stdout("M0 0 h10 v10 h-10 Z\n");
}

#[test]
fn test_cmdline_options() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.args(["--absolute", "--longhands", "--reverse"])
        .write_stdin("M0 0 L10 0 L10 10")
        .assert()
        .success()
        .stdout("M10 10 L10 0 L0 0\n");

    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    let output = cmd
        .args(["--format", "info"])
        .write_stdin("M0 0 h10 v10 h-10 z")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let output = String::from_utf8(output).expect("non-UTF8");
    assert_contains!(output, "subpaths: 1");
    assert_contains!(output, "length: 40");
}

#[test]
fn test_cmdline_longhands() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.arg("--longhands")
        .write_stdin("M0 0 H10 V10 S 15 15 20 10 T 30 10")
        .assert()
        .success()
        .stdout("M0 0 l10 0 l0 10 c0 0 5 5 10 0 q0 0 10 0\n");

    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.args(["--longhands", "--absolute"])
        .write_stdin("M0 0 h10 v10 h-10 z")
        .assert()
        .success()
        .stdout("M0 0 L10 0 L10 10 L0 10 Z\n");
}

#[test]
fn test_cmdline_help() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    let output = String::from_utf8(cmd.arg("-h").assert().success().get_output().stdout.clone())
        .expect("non-UTF8");
    assert_contains!(output, "Usage");
}

#[test]
fn test_cmdline_bad_input() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.write_stdin("L 10 10").assert().failure();

    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.args(["--format", "xml"]).assert().failure().code(2);
}

#[test]
fn test_cmdline_files() {
    let mut infile = NamedTempFile::new().expect("could not create tmpfile");
    write!(infile, "M 0 0 L 10 0").expect("tmpfile write failed");
    let outfile = NamedTempFile::new().expect("could not create outfile");

    let config = Config::from_cmdline(&format!(
        "{} {} -o {} --minify",
        crate_name!(),
        infile.path().to_str().unwrap(),
        outfile.path().to_str().unwrap()
    ))
    .expect("cmdline should be valid");
    run(config).expect("run failed");
    assert_eq!(fs::read_to_string(outfile.path()).unwrap(), "M0 0h10\n");

    // refuses to overwrite its input
    let config = Config::from_cmdline(&format!(
        "{} {} -o {}",
        crate_name!(),
        infile.path().to_str().unwrap(),
        infile.path().to_str().unwrap()
    ));
    assert!(config.is_err());
}

#[test]
fn test_cmdline_svg_file() {
    let mut infile = NamedTempFile::new().expect("could not create tmpfile");
    write!(
        infile,
        r#"<svg><g transform="scale(2)"><circle cx="5" cy="5" r="5"/></g></svg>"#
    )
    .expect("tmpfile write failed");

    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    let output = cmd
        .arg(infile.path())
        .args(["--svg", "--absolute"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let output = String::from_utf8(output).expect("non-UTF8");
    assert_contains!(output, r#"<svg><g><path d="M0 10 C"#);
    assert!(output.ends_with("Z\"/></g></svg>"), "{output}");
}
