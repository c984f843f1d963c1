use std::{fmt, io, path::PathBuf, string::FromUtf8Error, sync::Arc};

use crate::Cmd;

/// `Result` from std, with the error type defaulting to unix-command's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error returned by a [`Shell`](crate::Shell) or [`Cmd`] operation.
///
/// Builtins themselves never fail with an `Error`: they report problems on
/// their error stream and return a non-zero status. An `Error` shows up when
/// that status is turned into a `Result` by the embedding layer.
pub struct Error {
    kind: Box<ErrorKind>,
}

/// Note: this is intentionally not public.
enum ErrorKind {
    CurrentDir { err: io::Error, path: Option<Arc<std::path::Path>> },
    Var { err: std::env::VarError, var: std::ffi::OsString },
    ReadFile { err: io::Error, path: PathBuf },
    WriteFile { err: io::Error, path: PathBuf },
    CopyFile { err: io::Error, src: PathBuf, dst: PathBuf },
    CreateDir { err: io::Error, path: PathBuf },
    UnknownCommand { name: String },
    CmdStatus { cmd: CmdData, status: i32, stderr: Option<Vec<u8>> },
    CmdUtf8 { cmd: CmdData, err: FromUtf8Error },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        let kind = Box::new(kind);
        Error { kind }
    }
}

/// Owned snapshot of a command line, kept for error messages.
struct CmdData {
    rendered: String,
}

impl fmt::Display for CmdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            ErrorKind::CurrentDir { err, path } => {
                let err = errstr(err);
                match path {
                    Some(path) => write!(f, "failed to get current directory `{}`: {err}", path.display()),
                    None => write!(f, "failed to get current directory: {err}"),
                }
            }
            ErrorKind::Var { err, var } => {
                let var = var.to_string_lossy();
                write!(f, "failed to get environment variable `{var}`: {err}")
            }
            ErrorKind::ReadFile { err, path } => {
                write!(f, "failed to read file `{}`: {}", path.display(), errstr(err))
            }
            ErrorKind::WriteFile { err, path } => {
                write!(f, "failed to write file `{}`: {}", path.display(), errstr(err))
            }
            ErrorKind::CopyFile { err, src, dst } => {
                write!(f, "copy `{}` to `{}`: {}", src.display(), dst.display(), os_reason(err))
            }
            ErrorKind::CreateDir { err, path } => {
                write!(f, "failed to create directory `{}`: {}", path.display(), errstr(err))
            }
            ErrorKind::UnknownCommand { name } => write!(f, "command not found: `{name}`"),
            ErrorKind::CmdStatus { cmd, status, stderr } => {
                write!(f, "command exited with non-zero code `{cmd}`: {status}")?;
                if let Some(stderr) = stderr {
                    if !stderr.is_empty() {
                        write!(f, "\nstderr:\n{}", String::from_utf8_lossy(stderr))?;
                    }
                }
                Ok(())
            }
            ErrorKind::CmdUtf8 { cmd, err } => {
                write!(f, "command produced invalid utf8 `{cmd}`: {err}")
            }
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

/// `pub(crate)` constructors, visible only in this crate.
impl Error {
    pub(crate) fn new_current_dir(err: io::Error, path: Option<Arc<std::path::Path>>) -> Error {
        ErrorKind::CurrentDir { err, path }.into()
    }

    pub(crate) fn new_var(err: std::env::VarError, var: std::ffi::OsString) -> Error {
        ErrorKind::Var { err, var }.into()
    }

    pub(crate) fn new_read_file(err: io::Error, path: PathBuf) -> Error {
        ErrorKind::ReadFile { err, path }.into()
    }

    pub(crate) fn new_write_file(err: io::Error, path: PathBuf) -> Error {
        ErrorKind::WriteFile { err, path }.into()
    }

    pub(crate) fn new_copy_file(err: io::Error, src: PathBuf, dst: PathBuf) -> Error {
        ErrorKind::CopyFile { err, src, dst }.into()
    }

    pub(crate) fn new_create_dir(err: io::Error, path: PathBuf) -> Error {
        ErrorKind::CreateDir { err, path }.into()
    }

    pub(crate) fn new_unknown_command(name: &str) -> Error {
        ErrorKind::UnknownCommand { name: name.to_string() }.into()
    }

    pub(crate) fn new_cmd_status(cmd: &Cmd, status: i32, stderr: Option<Vec<u8>>) -> Error {
        let cmd = CmdData { rendered: cmd.to_string() };
        ErrorKind::CmdStatus { cmd, status, stderr }.into()
    }

    pub(crate) fn new_cmd_utf8(cmd: &Cmd, err: FromUtf8Error) -> Error {
        let cmd = CmdData { rendered: cmd.to_string() };
        ErrorKind::CmdUtf8 { cmd, err }.into()
    }
}

/// Lower-cases the first letter of an OS error message.
fn errstr(err: &io::Error) -> String {
    let mut res = err.to_string();
    if res.is_char_boundary(1) {
        res[..1].make_ascii_lowercase();
    }
    res
}

/// Describes an `io::Error` the way coreutils do: the bare OS reason, without
/// the `(os error N)` suffix.
pub(crate) fn os_reason(err: &io::Error) -> String {
    let res = err.to_string();
    match res.find(" (os error ") {
        Some(idx) => res[..idx].to_string(),
        None => res,
    }
}

/// Rewrites the leading operation name of a diagnostic, e.g. turns
/// "copy `a` to `b`: ..." into "cp `a` to `b`: ...".
pub(crate) fn rename_prefix(message: &str, from: &str, to: &str) -> String {
    match message.strip_prefix(from) {
        Some(rest) => format!("{to}{rest}"),
        None => message.to_string(),
    }
}

#[test]
fn error_send_sync() {
    fn f<T: Send + Sync>() {}
    f::<Error>();
}

#[test]
fn renames_only_the_prefix() {
    assert_eq!(rename_prefix("copy `a` to `b`: is a copy", "copy", "cp"), "cp `a` to `b`: is a copy");
    assert_eq!(rename_prefix("open `a`", "copy", "cp"), "open `a`");
}

#[test]
fn os_reason_strips_errno() {
    let err = io::Error::from_raw_os_error(2);
    assert!(!os_reason(&err).contains("os error"));
}
