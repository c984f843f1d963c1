use unix_command::cmd;

use crate::setup;

#[test]
fn copies_into_directory() -> anyhow::Result<()> {
    let (sh, _dir) = setup();
    sh.write_file("a", "first")?;
    sh.write_file("b", "second")?;
    sh.create_dir("dest")?;

    cmd!(sh, "cp a b dest").quiet().run()?;

    assert_eq!(sh.read_file("dest/a")?, "first");
    assert_eq!(sh.read_file("dest/b")?, "second");
    Ok(())
}

#[test]
fn copies_into_directory_with_trailing_slash() {
    let (sh, _dir) = setup();
    sh.write_file("src/a.txt", "nested").unwrap();
    sh.create_dir("dest").unwrap();

    cmd!(sh, "cp src/a.txt dest/").output().unwrap();

    assert_eq!(sh.read_file("dest/a.txt").unwrap(), "nested");
}

#[test]
fn copies_to_new_and_existing_files() {
    let (sh, _dir) = setup();
    sh.write_file("a.txt", "new contents").unwrap();
    sh.write_file("old.txt", "old contents, longer than the new ones").unwrap();

    cmd!(sh, "cp a.txt fresh.txt").output().unwrap();
    cmd!(sh, "cp a.txt old.txt").output().unwrap();

    assert_eq!(sh.read_file("fresh.txt").unwrap(), "new contents");
    assert_eq!(sh.read_file("old.txt").unwrap(), "new contents");
}

#[test]
fn missing_operands() {
    let (sh, dir) = setup();
    sh.write_file("a.txt", "A").unwrap();

    let output = cmd!(sh, "cp").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: missing file operand\n");

    let output = cmd!(sh, "cp a.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: missing destination file operand after 'a.txt'\n");

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn several_sources_need_a_directory() {
    let (sh, _dir) = setup();
    sh.write_file("a.txt", "A").unwrap();
    sh.write_file("b.txt", "B").unwrap();

    let output = cmd!(sh, "cp a.txt b.txt c.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: target 'c.txt' is not a directory\n");
    assert!(!sh.path_exists("c.txt"));
}

#[test]
fn per_source_failures() {
    let (sh, _dir) = setup();
    sh.write_file("a.txt", "A").unwrap();
    sh.create_dir("sub").unwrap();

    let output = cmd!(sh, "cp sub out.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: omitting directory 'sub'\n");
    assert!(!sh.path_exists("out.txt"));

    let output = cmd!(sh, "cp nope out.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: cannot stat 'nope': No such file or directory\n");
    assert!(!sh.path_exists("out.txt"));

    let output = cmd!(sh, "cp a.txt ./a.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: 'a.txt' and 'a.txt' are the same file\n");
    assert_eq!(sh.read_file("a.txt").unwrap(), "A");
}

#[test]
fn batch_continues_after_a_failure() {
    let (sh, _dir) = setup();
    sh.write_file("a.txt", "A").unwrap();
    sh.write_file("b.txt", "B").unwrap();
    sh.create_dir("dest").unwrap();

    let output = cmd!(sh, "cp a.txt missing.txt b.txt dest").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: cannot stat 'missing.txt': No such file or directory\n");
    assert_eq!(sh.read_file("dest/a.txt").unwrap(), "A");
    assert_eq!(sh.read_file("dest/b.txt").unwrap(), "B");
    assert!(!sh.path_exists("dest/missing.txt"));
}

#[test]
#[cfg(unix)]
fn read_only_destination() {
    use std::{fs, os::unix::fs::PermissionsExt};

    let (sh, dir) = setup();
    sh.write_file("a.txt", "A").unwrap();
    sh.write_file("ro.txt", "keep").unwrap();
    let ro = dir.path().join("ro.txt");
    fs::set_permissions(&ro, fs::Permissions::from_mode(0o444)).unwrap();
    if fs::OpenOptions::new().write(true).open(&ro).is_ok() {
        // Running as root: permissions are not enforced.
        return;
    }

    let output = cmd!(sh, "cp a.txt ro.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(output.stderr, b"cp: cannot create regular file 'ro.txt': Permission denied\n");
    assert_eq!(sh.read_file("ro.txt").unwrap(), "keep");
}

#[test]
#[cfg(unix)]
fn unreadable_source() {
    use std::{fs, os::unix::fs::PermissionsExt};

    let (sh, dir) = setup();
    sh.write_file("secret.txt", "hidden").unwrap();
    let secret = dir.path().join("secret.txt");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&secret).is_ok() {
        // Running as root: permissions are not enforced.
        return;
    }

    let output = cmd!(sh, "cp secret.txt out.txt").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "cp `secret.txt` to `out.txt`: Permission denied\n"
    );
}
