use unix_command::{cmd, Shell};

#[test]
fn versions_match() {
    let sh = Shell::new().unwrap();
    let sh = sh.with_current_dir(env!("CARGO_MANIFEST_DIR"));

    let read_version = |path: &str| {
        let text = sh.read_file(path).unwrap();
        let vers = text.lines().find(|it| it.starts_with("version =")).unwrap();
        let vers = vers.splitn(2, '#').next().unwrap();
        vers.trim_start_matches("version =").trim().trim_matches('"').to_string()
    };

    let v1 = read_version("./Cargo.toml");
    let v2 = read_version("./unix-command-macros/Cargo.toml");
    assert_eq!(v1, v2);

    let cargo_toml = sh.read_file("./Cargo.toml").unwrap();
    let dep = format!("unix-command-macros = {{ version = \"={}\",", v1);
    assert!(cargo_toml.contains(&dep));
}

#[test]
fn changelog_mentions_current_version() {
    let sh = Shell::new().unwrap();
    let sh = sh.with_current_dir(env!("CARGO_MANIFEST_DIR"));

    let version = sh.read_file("./Cargo.toml").unwrap();
    let version = version.lines().find(|it| it.starts_with("version =")).unwrap();
    let version = version.splitn(2, '#').next().unwrap();
    let version = version.trim_start_matches("version =").trim().trim_matches('"');

    let header = format!("## {version}");
    let changelog = cmd!(sh, "cat CHANGELOG.md").read().unwrap();
    assert_eq!(changelog.lines().filter(|it| *it == header).count(), 1);
}
