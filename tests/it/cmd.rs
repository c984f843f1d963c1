use unix_command::{cmd, Builtin, Shell};

use crate::setup;

#[test]
fn interpolation() {
    let sh = Shell::new().unwrap();
    let name = "ec";
    let file = "my notes.txt";
    let extra = vec!["a", "b"];
    let none: Option<&str> = None;

    assert_eq!(cmd!(sh, "{name}ho hi").to_string(), "echo hi");
    assert_eq!(cmd!(sh, "cat {file}").to_string(), r#"cat "my notes.txt""#);
    assert_eq!(cmd!(sh, "cat {file}.bak").to_string(), r#"cat "my notes.txt.bak""#);
    assert_eq!(cmd!(sh, "cp {extra...} {none...} out").to_string(), "cp a b out");
    assert_eq!(cmd!(sh, "printf ''").to_string(), r#"printf """#);
    assert_eq!(
        cmd!(sh, "
            seq 1
                3
        ")
        .to_string(),
        "seq 1 3"
    );
}

#[test]
fn builder_matches_macro() {
    let sh = Shell::new().unwrap();

    let built = sh.cmd("printf").arg("%s %s\n").args(["a", "b"]);
    let expanded = cmd!(sh, "printf '%s %s\n' a b");
    assert_eq!(built.read().unwrap(), expanded.read().unwrap());
}

#[test]
fn unknown_command() {
    let sh = Shell::new().unwrap();

    let err = cmd!(sh, "ls -la").read().unwrap_err();
    assert_eq!(err.to_string(), "command not found: `ls`");

    let err = "ls".parse::<Builtin>().unwrap_err();
    assert_eq!(err.to_string(), "command not found: `ls`");
}

#[test]
fn status_handling() {
    let (sh, _dir) = setup();

    let err = cmd!(sh, "cat nope").read().unwrap_err();
    assert_eq!(
        err.to_string(),
        "command exited with non-zero code `cat nope`: 1\nstderr:\ncat: nope: No such file or directory\n"
    );

    let err = cmd!(sh, "seq").output().unwrap_err();
    assert_eq!(err.to_string(), "command exited with non-zero code `seq`: 1");

    let stderr = cmd!(sh, "cat nope").ignore_status().read_stderr().unwrap();
    assert_eq!(stderr, "cat: nope: No such file or directory");

    let status = cmd!(sh, "seq 2 1 1").quiet().status().unwrap();
    assert_eq!(status, 1);
}

#[test]
fn working_directory() {
    let (sh, dir) = setup();
    sh.write_file("sub/inner.txt", "inner").unwrap();

    let sub = sh.with_current_dir("sub");
    assert_eq!(sub.current_dir(), dir.path().join("sub"));
    assert_eq!(cmd!(sub, "cat inner.txt").read().unwrap(), "inner");
    assert!(cmd!(sh, "cat inner.txt").read().is_err());
}

#[test]
fn temp_dir_is_removed_on_drop() {
    let sh = Shell::new().unwrap();
    let path = {
        let dir = sh.create_temp_dir().unwrap();
        assert!(dir.path().is_dir());
        dir.path().to_path_buf()
    };
    assert!(!path.exists());
}

#[test]
fn builtin_names() {
    let names: Vec<&str> = Builtin::ALL.iter().map(|it| it.name()).collect();
    assert_eq!(names, ["cat", "cp", "echo", "printf", "pwd", "seq", "whoami"]);
    assert_eq!(Builtin::from_name("seq"), Some(Builtin::Seq));
    assert_eq!(Builtin::from_name("SEQ"), None);
}
