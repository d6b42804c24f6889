use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn check_write_check() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("messy.sk");
    std::fs::write(&path, "fn inc(x:int)->int{return x+1;}\nprint( inc(1) );\n").unwrap();

    Command::cargo_bin("sklang-fmt")
        .unwrap()
        .arg("--check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not formatted"));

    Command::cargo_bin("sklang-fmt")
        .unwrap()
        .arg("--write")
        .arg(&path)
        .assert()
        .success();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "fn inc(x: int) -> int {\n    return x + 1;\n}\n\nprint(inc(1));\n");

    Command::cargo_bin("sklang-fmt")
        .unwrap()
        .arg("--check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn prints_to_stdout_by_default() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("a.sk");
    std::fs::write(&path, "var   a=[1,2 ,3];").unwrap();

    Command::cargo_bin("sklang-fmt")
        .unwrap()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::diff("var a = [1, 2, 3];\n"));
}

#[test]
fn syntax_error_fails() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("bad.sk");
    std::fs::write(&path, "var = ;").unwrap();

    Command::cargo_bin("sklang-fmt")
        .unwrap()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}
