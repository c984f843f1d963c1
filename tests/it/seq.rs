use unix_command::cmd;

use crate::setup;

#[test]
fn counts() {
    let (sh, _dir) = setup();

    assert_eq!(cmd!(sh, "seq 3").read().unwrap(), "1\n2\n3");
    assert_eq!(cmd!(sh, "seq 3 1").read().unwrap(), "3\n2\n1");
    assert_eq!(cmd!(sh, "seq -2 2 3").read().unwrap(), "-2\n0\n2");
    assert_eq!(cmd!(sh, "seq 10 -5 0").read().unwrap(), "10\n5\n0");
    assert_eq!(cmd!(sh, "seq 1 0.5 2").read().unwrap(), "1.0\n1.5\n2.0");
}

#[test]
fn wrong_operand_count_is_silent() {
    let (sh, _dir) = setup();

    for c in [cmd!(sh, "seq"), cmd!(sh, "seq 1 2 3 4")] {
        let output = c.ignore_status().output().unwrap();
        assert_eq!(output.status, 1);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }
}

#[test]
fn direction_errors() {
    let (sh, _dir) = setup();

    let cases = [
        (cmd!(sh, "seq 1 0 5"), "seq: zero decrement\n"),
        (cmd!(sh, "seq 1 -1 5"), "seq: needs positive increment\n"),
        (cmd!(sh, "seq 5 2 1"), "seq: needs negative decrement\n"),
        (cmd!(sh, "seq five"), "seq: invalid floating point argument: 'five'\n"),
    ];
    for (c, stderr) in cases {
        let output = c.ignore_status().output().unwrap();
        assert_eq!(output.status, 1, "{stderr}");
        assert!(output.stdout.is_empty());
        assert_eq!(String::from_utf8(output.stderr).unwrap(), stderr);
    }
}
