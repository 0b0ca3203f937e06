use std::fs;
use std::process::{Command, Output};

use passman::masterpw::{MasterPassword, MASTER_PASSWORD_ENV_VAR};
use tempfile::tempdir;

fn passman(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_passman"))
        .args(args)
        .env(MASTER_PASSWORD_ENV_VAR, "hunter2")
        .env_remove("PASSMAN_STRICT_STORE")
        .env_remove("PASSMAN_LOG")
        .output()
        .expect("failed to run passman")
}

fn passman_init(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_passman-init"))
        .args(args)
        .env(MASTER_PASSWORD_ENV_VAR, "hunter2")
        .output()
        .expect("failed to run passman-init")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn second_operation_exits_with_usage() {
    let output = passman(&["a", "b", "c", "-l", "-d", "key"]);

    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("Parameters are invalid: only one operation supported"));
    assert!(text.contains("Use: [-v]"));
}

#[test]
fn missing_path_exits_with_usage() {
    let output = passman(&["-l", "a", "b"]);

    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("Error in parameters: passman configuration file path not specified"));
    assert!(text.contains("-d <key>"));
}

#[test]
fn set_then_delete_missing_key_end_to_end() {
    passman::crypto::init().unwrap();
    let dir = tempdir().unwrap();
    let mpw = dir.path().join("mpw.dat");
    let store = dir.path().join("store.dat");
    let cfg = dir.path().join("cfg.xml");
    MasterPassword::create(&mpw, "hunter2").unwrap();
    fs::write(&cfg, "<value name=\"salt\">s1</value>").unwrap();

    let paths = [
        mpw.to_str().unwrap(),
        store.to_str().unwrap(),
        cfg.to_str().unwrap(),
    ];

    let mut set = vec!["-v"];
    set.extend(paths);
    set.extend(["-s", "apiKey", "secret1"]);
    let output = passman(&set);
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("Working Directory = "));
    assert!(text.contains("master password accepted"));
    assert!(text.contains("  new value is set to: \"secret1\""));

    let mut delete = vec!["-d", "noSuchKey"];
    delete.extend(paths);
    let output = passman(&delete);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("does not exist, cannot delete"));
    assert!(text.contains("ex: key \"noSuchKey\" does not exist"));
    assert!(!text.contains("master password accepted"));
}

#[test]
fn init_creates_a_master_password_file_passman_accepts() {
    let dir = tempdir().unwrap();
    let mpw = dir.path().join("empw.dat");
    let store = dir.path().join("store.dat");
    let cfg = dir.path().join("passman.cnf");
    fs::write(&cfg, "<value name=\"salt\">s1</value>").unwrap();

    let output = passman_init(&[mpw.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(mpw.exists());

    let output = passman(&[
        mpw.to_str().unwrap(),
        store.to_str().unwrap(),
        cfg.to_str().unwrap(),
        "-l",
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(stdout(&output).contains("Listing mode: "));

    let again = passman_init(&[mpw.to_str().unwrap()]);
    assert_eq!(again.status.code(), Some(1));
    assert!(stdout(&again).contains("refusing to overwrite"));
}

#[test]
fn init_without_a_path_prints_usage() {
    let output = passman_init(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("Use: <empw.dat>"));
}
