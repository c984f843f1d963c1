use unix_command::cmd;

use crate::setup;

#[test]
fn pwd_prints_the_variable() {
    let (mut sh, _dir) = setup();
    sh.set_env_var("PWD", "/srv/www");

    let output = cmd!(sh, "pwd").output().unwrap();
    assert_eq!(output.status, 0);
    assert_eq!(output.stdout, b"/srv/www\n");

    let output = cmd!(sh, "pwd").env("PWD", "/tmp/other").output().unwrap();
    assert_eq!(output.stdout, b"/tmp/other\n");

    assert_eq!(sh.env_var("PWD").unwrap(), "/srv/www");
}

#[test]
fn pwd_without_the_variable() {
    let (mut sh, _dir) = setup();
    sh.set_env_var("PWD", "/srv/www");

    let output = cmd!(sh, "pwd").env_remove("PWD").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());

    let output = cmd!(sh, "pwd").env("PWD", "").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
    assert!(output.stdout.is_empty());

    sh.clear_env();
    assert!(sh.env_var_os("PWD").is_none());
    let output = cmd!(sh, "pwd").ignore_status().output().unwrap();
    assert_eq!(output.status, 1);
}

#[test]
fn pwd_ignores_the_working_directory() {
    let (mut sh, _dir) = setup();
    sh.set_env_var("PWD", "/logical/path");
    let sh = sh.with_current_dir("/");

    assert_eq!(cmd!(sh, "pwd").read().unwrap(), "/logical/path");
}

#[test]
fn env_overlay_is_per_shell() {
    let (mut sh, _dir) = setup();
    let key = "UNIX_COMMAND_TEST_OVERLAY";
    let other = sh.clone();
    sh.set_env_var(key, "1");

    assert_eq!(sh.env_var(key).unwrap(), "1");
    assert!(other.env_var(key).is_err());
    assert!(std::env::var_os(key).is_none());
}

#[test]
fn whoami_prints_one_name() {
    let (sh, _dir) = setup();

    let output = cmd!(sh, "whoami").ignore_status().output().unwrap();
    assert!(output.stderr.is_empty());
    if output.status != 0 {
        assert!(output.stdout.is_empty());
        return;
    }
    let stdout = String::from_utf8(output.stdout).unwrap();
    let name = stdout.strip_suffix('\n').unwrap();
    assert!(!name.is_empty());
    assert!(!name.contains('\n'));

    assert_eq!(cmd!(sh, "whoami").ignore_status().read().unwrap(), name);
}

#[test]
#[cfg(unix)]
fn whoami_ignores_the_environment() {
    let (sh, _dir) = setup();
    let expected = cmd!(sh, "whoami").ignore_status().output().unwrap();

    let c = cmd!(sh, "whoami").env("USER", "impostor").env("LOGNAME", "impostor");
    assert_eq!(c.ignore_status().output().unwrap(), expected);
}
