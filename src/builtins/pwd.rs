use crate::{
    builtins::{os_bytes, write_error, Streams, EOL},
    Shell,
};

/// Prints `$PWD`, exactly as the environment has it.
///
/// This is the shell builtin rather than `/bin/pwd`: the filesystem is never
/// consulted. Fails silently if the variable is unset or empty.
pub fn pwd(sh: &Shell, _args: &[String], io: Streams<'_>) -> i32 {
    let pwd = match sh.env_var_os("PWD") {
        Some(it) if !it.is_empty() => it,
        _ => return 1,
    };
    let mut line = os_bytes(&pwd).into_owned();
    line.extend_from_slice(EOL.as_bytes());
    match io.stdout.write_all(&line) {
        Ok(()) => 0,
        Err(err) => write_error(io.stderr, "pwd", err),
    }
}
