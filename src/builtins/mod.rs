//! The commands themselves.
//!
//! Every builtin has the same shape: it takes the [`Shell`] it runs in, its
//! arguments (without the command name) and a set of [`Streams`], and returns
//! a UNIX status code. Nothing is propagated to the caller as an error:
//! problems are reported on the error stream, prefixed with the command name,
//! and turned into a status of `1`.
//!
//! ```
//! use unix_command::{builtins, Shell, Streams};
//!
//! let sh = Shell::new()?;
//! let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
//! let args = ["-n".to_string(), "hello".to_string()];
//! let status = builtins::echo(&sh, &args, Streams::new(&mut &b""[..], &mut stdout, &mut stderr));
//! assert_eq!(status, 0);
//! assert_eq!(stdout, b"hello");
//! # Ok::<(), unix_command::Error>(())
//! ```
use std::{
    borrow::Cow,
    ffi::OsStr,
    fmt,
    io::{self, Read, Write},
    str::FromStr,
};

use crate::{error::os_reason, Shell};

mod cat;
mod cp;
mod echo;
mod printf;
mod pwd;
mod seq;
mod whoami;

pub use self::{
    cat::cat, cp::cp, echo::echo, printf::printf, pwd::pwd, seq::seq, whoami::whoami,
};

/// Line terminator appended to output lines and diagnostics.
pub(crate) const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// The three standard streams of a single builtin invocation.
///
/// The streams are borrowed: a builtin never closes them.
pub struct Streams<'a> {
    /// Standard input.
    pub stdin: &'a mut dyn Read,
    /// Standard output.
    pub stdout: &'a mut dyn Write,
    /// Standard error, where diagnostics go.
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    /// Bundles the given streams.
    pub fn new(
        stdin: &'a mut dyn Read,
        stdout: &'a mut dyn Write,
        stderr: &'a mut dyn Write,
    ) -> Streams<'a> {
        Streams { stdin, stdout, stderr }
    }
}

impl fmt::Debug for Streams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Streams").finish_non_exhaustive()
    }
}

/// One of the available commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Concatenate files to standard output.
    Cat,
    /// Copy files.
    Cp,
    /// Print arguments.
    Echo,
    /// Print formatted arguments.
    Printf,
    /// Print the `PWD` environment variable.
    Pwd,
    /// Print a sequence of numbers.
    Seq,
    /// Print the effective user name.
    Whoami,
}

impl Builtin {
    /// All builtins, in alphabetical order.
    pub const ALL: [Builtin; 7] = [
        Builtin::Cat,
        Builtin::Cp,
        Builtin::Echo,
        Builtin::Printf,
        Builtin::Pwd,
        Builtin::Seq,
        Builtin::Whoami,
    ];

    /// Looks a builtin up by the name it is invoked with.
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|it| it.name() == name)
    }

    /// The name the builtin is invoked with, e.g. `"cat"`.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cat => "cat",
            Builtin::Cp => "cp",
            Builtin::Echo => "echo",
            Builtin::Printf => "printf",
            Builtin::Pwd => "pwd",
            Builtin::Seq => "seq",
            Builtin::Whoami => "whoami",
        }
    }

    /// Runs the builtin and returns its status code.
    pub fn run(self, sh: &Shell, args: &[String], io: Streams<'_>) -> i32 {
        log::debug!("{}: running with {} argument(s)", self.name(), args.len());
        let status = match self {
            Builtin::Cat => cat(sh, args, io),
            Builtin::Cp => cp(sh, args, io),
            Builtin::Echo => echo(sh, args, io),
            Builtin::Printf => printf(sh, args, io),
            Builtin::Pwd => pwd(sh, args, io),
            Builtin::Seq => seq(sh, args, io),
            Builtin::Whoami => whoami(sh, args, io),
        };
        log::debug!("{}: exited with {}", self.name(), status);
        status
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Builtin> {
        Builtin::from_name(s).ok_or_else(|| crate::Error::new_unknown_command(s))
    }
}

/// Writes `<cmd>: <message>` to the error stream.
///
/// There is nowhere left to report a failing error stream to, so write errors
/// are dropped here.
pub(crate) fn report(stderr: &mut dyn Write, cmd: &str, message: impl fmt::Display) {
    report_line(stderr, format_args!("{cmd}: {message}"));
}

/// Writes a diagnostic that already names its command.
pub(crate) fn report_line(stderr: &mut dyn Write, line: impl fmt::Display) {
    let _ = write!(stderr, "{line}{EOL}");
}

/// Reports a failed write to standard output and returns the failure status.
pub(crate) fn write_error(stderr: &mut dyn Write, cmd: &str, err: io::Error) -> i32 {
    report(stderr, cmd, format_args!("write error: {}", os_reason(&err)));
    1
}

pub(crate) fn os_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Cow::Borrowed(s.as_bytes())
    }
    #[cfg(not(unix))]
    {
        match s.to_string_lossy() {
            Cow::Borrowed(it) => Cow::Borrowed(it.as_bytes()),
            Cow::Owned(it) => Cow::Owned(it.into_bytes()),
        }
    }
}
