//! unix-command re-implements a handful of classic UNIX commands -- `cat`,
//! `cp`, `echo`, `printf`, `pwd`, `seq` and `whoami` -- as library functions.
//!
//! The intended use-case is embedding: a shell emulator, a scripting sandbox,
//! or a test harness that wants the familiar tools without spawning
//! processes. Each command behaves like the plain POSIX tool at a basic
//! feature level, reads and writes the streams it is handed, and returns a
//! UNIX status code.
//!
//! Here's a quick example:
//!
//! ```
//! use unix_command::{cmd, Shell};
//!
//! let sh = Shell::new()?;
//! let numbers = cmd!(sh, "seq 3").read()?;
//! assert_eq!(numbers, "1\n2\n3");
//! # Ok::<(), unix_command::Error>(())
//! ```
//!
//! # Guide
//!
//! There are two layers. The bottom one is [`builtins`]: seven functions with
//! the same signature, taking a [`Shell`], the argument list and a set of
//! [`Streams`]. They never fail in the `Result` sense; diagnostics go to the
//! error stream and the return value is `0` or `1`.
//!
//! ```
//! use unix_command::{builtins, Shell, Streams};
//!
//! let sh = Shell::new()?;
//! let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
//! let args = ["1".to_string(), "0".to_string(), "5".to_string()];
//! let status = builtins::seq(&sh, &args, Streams::new(&mut std::io::empty(), &mut stdout, &mut stderr));
//! assert_eq!(status, 1);
//! assert_eq!(stderr, b"seq: zero decrement\n");
//! # Ok::<(), unix_command::Error>(())
//! ```
//!
//! The top layer is [`Cmd`], usually built with the [`cmd!`] macro. It picks
//! the streams for you: [`Cmd::run`] uses the process' standard streams,
//! while [`Cmd::read`] and [`Cmd::output`] capture them. A non-zero status is
//! turned into an [`Error`], unless [`Cmd::ignore_status`] is set.
//!
//! ```
//! use unix_command::{cmd, Shell};
//!
//! let sh = Shell::new()?;
//! let greeting = "hello world";
//! let line = cmd!(sh, "printf '%s!\n' {greeting}").read()?;
//! assert_eq!(line, "hello world!");
//!
//! let err = cmd!(sh, "cp").read().unwrap_err();
//! assert!(err.to_string().contains("cp: missing file operand"));
//! # Ok::<(), unix_command::Error>(())
//! ```
//!
//! A [`Shell`] carries the context commands run in: a working directory used
//! to resolve the relative paths given to `cat` and `cp`, and an environment
//! overlay consulted by `pwd`. Neither touches process-global state, so
//! several shells can coexist:
//!
//! ```
//! use unix_command::{cmd, Shell};
//!
//! let mut sh = Shell::new()?;
//! sh.set_env_var("PWD", "/srv/www");
//! assert_eq!(cmd!(sh, "pwd").read()?, "/srv/www");
//! # Ok::<(), unix_command::Error>(())
//! ```
//!
//! # Logging
//!
//! Commands log through the [`log`](https://docs.rs/log) facade: `debug` for
//! each invocation and its status, `trace` for byte-level details. Install
//! any logger to see them. Independently, [`Cmd::run`] echoes the command
//! line to stderr unless [`Cmd::quiet`] is set.

#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]

pub mod builtins;
mod error;
mod escape;
mod format;

use std::{
    collections::HashMap,
    env::{self, current_dir, VarError},
    ffi::{OsStr, OsString},
    fmt, fs,
    io::{self, Read, Write},
    mem,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub use crate::{
    builtins::{Builtin, Streams},
    error::{Error, Result},
};
#[doc(hidden)]
pub use unix_command_macros::__cmd;

/// Constructs a [`Cmd`] from the given string.
///
/// The first word names the builtin. `'single quotes'` keep whitespace
/// inside an argument, `{var}` interpolates a variable as one argument and
/// `{var...}` splats an iterable into zero or more arguments.
///
/// # Examples
///
/// Interpolation:
///
/// ```
/// # use unix_command::{cmd, Shell}; let sh = Shell::new()?;
/// let greeting = "hello world";
/// let c = cmd!(sh, "echo {greeting}");
/// assert_eq!(c.to_string(), r#"echo "hello world""#);
///
/// let c = cmd!(sh, "echo '{greeting}'");
/// assert_eq!(c.to_string(), r#"echo {greeting}"#);
///
/// let c = cmd!(sh, "echo {greeting}!");
/// assert_eq!(c.to_string(), r#"echo "hello world!""#);
/// # Ok::<(), unix_command::Error>(())
/// ```
///
/// Splat interpolation:
///
/// ```
/// # use unix_command::{cmd, Shell}; let sh = Shell::new()?;
/// let files = ["a.txt", "b.txt"];
/// let c = cmd!(sh, "cp {files...} backup/");
/// assert_eq!(c.to_string(), "cp a.txt b.txt backup/");
///
/// let no_newline: Option<&str> = None;
/// let c = cmd!(sh, "echo {no_newline...} hi");
/// assert_eq!(c.to_string(), "echo hi");
/// # Ok::<(), unix_command::Error>(())
/// ```
#[macro_export]
macro_rules! cmd {
    ($sh:expr, $cmd:literal) => {{
        #[cfg(any())] // Trick rust analyzer into highlighting interpolated bits
        format_args!($cmd);
        let f = |name| $sh.cmd(name);
        let cmd: $crate::Cmd = $crate::__cmd!(f $cmd);
        cmd
    }};
}

/// A `Shell` is the context builtins run in.
///
/// It maintains a logical working directory and an environment overlay. They
/// are independent from process's [`std::env::current_dir`] and
/// [`std::env::var`], and only affect commands run through the `Shell`.
///
/// By convention, variable holding the shell is named `sh`.
///
/// # Example
///
/// ```no_run
/// use unix_command::{cmd, Shell};
///
/// let sh = Shell::new()?;
/// let sh = sh.with_current_dir("./target");
/// cmd!(sh, "cat build.log").run()?;
/// # Ok::<(), unix_command::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Shell {
    cwd: Arc<Path>,
    env: Arc<HashMap<Arc<OsStr>, Option<Arc<OsStr>>>>,
    inherit_env: bool,
}

impl std::panic::UnwindSafe for Shell {}
impl std::panic::RefUnwindSafe for Shell {}

impl Shell {
    /// Creates a new [`Shell`] rooted at the process' current directory.
    ///
    /// Fails if [`std::env::current_dir`] returns an error.
    pub fn new() -> Result<Shell> {
        let cwd = current_dir().map_err(|err| Error::new_current_dir(err, None))?;
        Ok(Shell { cwd: cwd.into(), env: Default::default(), inherit_env: true })
    }

    // region:env
    /// Returns the working directory for this [`Shell`].
    ///
    /// Relative paths given to builtins are interpreted relative to this
    /// directory. Note that `pwd` prints the `PWD` variable, not this.
    pub fn current_dir(&self) -> &Path {
        self.cwd.as_ref()
    }

    /// Changes the working directory for this [`Shell`].
    #[doc(alias = "cd")]
    pub fn set_current_dir(&mut self, dir: impl AsRef<Path>) {
        self._set_current_dir(dir.as_ref())
    }
    fn _set_current_dir(&mut self, dir: &Path) {
        self.cwd = self.cwd.join(dir).into();
    }

    /// Returns a new [`Shell`] with the working directory set to `path`.
    #[doc(alias = "pushd")]
    #[must_use]
    pub fn with_current_dir(&self, path: impl AsRef<Path>) -> Shell {
        let mut res = self.clone();
        res._set_current_dir(path.as_ref());
        res
    }

    /// Fetches the environmental variable `key` for this [`Shell`].
    ///
    /// Returns an error if the variable is not set, or set to a non-utf8 value.
    pub fn env_var(&self, key: impl AsRef<OsStr>) -> Result<String> {
        self._env_var(key.as_ref())
    }
    fn _env_var(&self, key: &OsStr) -> Result<String> {
        match self._env_var_os(key) {
            Some(it) => match it.to_str() {
                Some(it) => Ok(it.to_string()),
                None => Err(VarError::NotUnicode(OsString::from(&*it))),
            },
            None => Err(VarError::NotPresent),
        }
        .map_err(|err| Error::new_var(err, key.into()))
    }

    /// Fetches the environmental variable `key` for this [`Shell`] as
    /// [`OsStr`]. Returns [`None`] if the variable is not set.
    pub fn env_var_os(&self, key: impl AsRef<OsStr>) -> Option<Arc<OsStr>> {
        self._env_var_os(key.as_ref())
    }
    fn _env_var_os(&self, key: &OsStr) -> Option<Arc<OsStr>> {
        match self.env.get(key) {
            Some(overridden) => overridden.clone(),
            None if self.inherit_env => env::var_os(key).map(Into::into),
            None => None,
        }
    }

    /// Sets the value of `key` environment variable for this [`Shell`] to
    /// `val`.
    ///
    /// Note that this doesn't affect [`std::env::var`].
    pub fn set_env_var(&mut self, key: impl AsRef<OsStr>, val: impl AsRef<OsStr>) {
        self._set_env_var(key.as_ref(), Some(val.as_ref()))
    }

    /// Unsets the `key` environment variable for this [`Shell`], even if the
    /// process environment has it.
    pub fn remove_env_var(&mut self, key: impl AsRef<OsStr>) {
        self._set_env_var(key.as_ref(), None)
    }
    fn _set_env_var(&mut self, key: &OsStr, val: Option<&OsStr>) {
        Arc::make_mut(&mut self.env).insert(key.into(), val.map(Into::into));
    }

    /// Forgets every variable, including the ones inherited from the process.
    pub fn clear_env(&mut self) {
        Arc::make_mut(&mut self.env).clear();
        self.inherit_env = false;
    }
    // endregion:env

    // region:fs
    /// Read the entire contents of a file into a string.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<String> {
        self._read_file(path.as_ref())
    }
    fn _read_file(&self, path: &Path) -> Result<String> {
        let path = self.path(path);
        fs::read_to_string(&path).map_err(|err| Error::new_read_file(err, path))
    }

    /// Write a slice as the entire contents of a file.
    ///
    /// This function will create the file and all intermediate directories if
    /// they don't exist.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
        self._write_file(path.as_ref(), contents.as_ref())
    }
    fn _write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = self.path(path);
        if let Some(p) = path.parent() {
            self.create_dir(p)?;
        }
        fs::write(&path, contents).map_err(|err| Error::new_write_file(err, path))
    }

    /// Creates the specified directory.
    ///
    /// All intermediate directories will also be created.
    #[doc(alias("mkdir_p", "mkdir"))]
    pub fn create_dir(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        self._create_dir(path.as_ref())
    }
    fn _create_dir(&self, path: &Path) -> Result<PathBuf> {
        let path = self.path(path);
        match fs::create_dir_all(&path) {
            Ok(()) => Ok(path),
            Err(err) => Err(Error::new_create_dir(err, path)),
        }
    }

    /// Creates an empty named world-readable temporary directory.
    ///
    /// Returns a [`TempDir`] RAII guard with the path to the directory. When
    /// dropped, the temporary directory and all of its contents will be
    /// removed.
    ///
    /// Note that this is an **insecure method** -- any other process on the
    /// system will be able to read the data.
    #[doc(alias = "mktemp")]
    pub fn create_temp_dir(&self) -> Result<TempDir> {
        let base = env::temp_dir();
        self.create_dir(&base)?;

        static CNT: AtomicUsize = AtomicUsize::new(0);

        let mut n_try = 0u32;
        loop {
            let cnt = CNT.fetch_add(1, Ordering::Relaxed);
            let path = base.join(format!("unix-command-{}-{}", std::process::id(), cnt));
            match fs::create_dir(&path) {
                Ok(()) => return Ok(TempDir { path }),
                Err(err) if n_try == 1024 => return Err(Error::new_create_dir(err, path)),
                Err(_) => n_try += 1,
            }
        }
    }

    /// Returns whether a file or directory exists at the given path.
    pub fn path_exists(&self, path: impl AsRef<Path>) -> bool {
        self.path(path.as_ref()).exists()
    }
    // endregion:fs

    /// Creates a new [`Cmd`] that runs the builtin called `name`.
    ///
    /// The name is only checked when the command runs.
    pub fn cmd(&self, name: impl AsRef<str>) -> Cmd {
        Cmd::new(self, name.as_ref())
    }

    pub(crate) fn path(&self, p: impl AsRef<Path>) -> PathBuf {
        self.cwd.join(p)
    }
}

/// The result of running a [`Cmd`] with captured streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// The status code the builtin returned.
    pub status: i32,
    /// Everything written to standard output.
    pub stdout: Vec<u8>,
    /// Everything written to standard error.
    pub stderr: Vec<u8>,
}

/// A builder object for a single builtin invocation.
///
/// A [`Cmd`] is usually created with the [`cmd!`] macro. The command exists
/// within a context of a [`Shell`] and uses its working directory and
/// environment.
///
/// # Example
///
/// ```no_run
/// use unix_command::{Shell, cmd};
///
/// let sh = Shell::new()?;
///
/// let src = "notes.txt";
/// cmd!(sh, "cp {src} backup.txt").quiet().run()?;
/// # Ok::<(), unix_command::Error>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Cmd {
    sh: Shell,
    name: String,
    args: Vec<String>,
    ignore_status: bool,
    quiet: bool,
    stdin_contents: Option<Vec<u8>>,
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(|it| it.is_ascii_whitespace()) {
                write!(f, " \"{}\"", arg.escape_default())?
            } else {
                write!(f, " {}", arg)?
            };
        }
        Ok(())
    }
}

impl Cmd {
    fn new(sh: &Shell, name: &str) -> Cmd {
        Cmd {
            sh: sh.clone(),
            name: name.to_string(),
            args: Vec::new(),
            ignore_status: false,
            quiet: false,
            stdin_contents: None,
        }
    }

    // region:builder
    /// Adds an argument to this command.
    pub fn arg(mut self, arg: impl AsRef<str>) -> Cmd {
        self._arg(arg.as_ref());
        self
    }
    fn _arg(&mut self, arg: &str) {
        self.args.push(arg.to_string())
    }

    /// Adds all of the arguments to this command.
    pub fn args<I>(mut self, args: I) -> Cmd
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        args.into_iter().for_each(|it| self._arg(it.as_ref()));
        self
    }

    #[doc(hidden)]
    pub fn __extend_arg(mut self, arg_fragment: impl AsRef<str>) -> Cmd {
        self.___extend_arg(arg_fragment.as_ref());
        self
    }
    fn ___extend_arg(&mut self, arg_fragment: &str) {
        match self.args.last_mut() {
            Some(last_arg) => last_arg.push_str(arg_fragment),
            None => self.name.push_str(arg_fragment),
        }
    }

    /// Overrides the value of the environmental variable for this command.
    pub fn env(mut self, key: impl AsRef<OsStr>, val: impl AsRef<OsStr>) -> Cmd {
        self.sh.set_env_var(key, val);
        self
    }

    /// Removes the environment variable from this command.
    pub fn env_remove(mut self, key: impl AsRef<OsStr>) -> Cmd {
        self.sh.remove_env_var(key);
        self
    }

    /// Don't return an error if the command exits with non-zero status.
    ///
    /// By default, non-zero exit status is considered an error.
    pub fn ignore_status(mut self) -> Cmd {
        self.set_ignore_status(true);
        self
    }
    /// Controls whether non-zero exit status is considered an error.
    pub fn set_ignore_status(&mut self, yes: bool) {
        self.ignore_status = yes;
    }

    /// Don't echo the command itself to stderr.
    ///
    /// By default, the command itself will be printed to stderr when executed
    /// via [`Cmd::run`].
    pub fn quiet(mut self) -> Cmd {
        self.set_quiet(true);
        self
    }
    /// Controls whether the command itself is printed to stderr.
    pub fn set_quiet(&mut self, yes: bool) {
        self.quiet = yes;
    }

    /// Feeds the given bytes to the command as its standard input.
    ///
    /// Without this, the command reads the process' standard input.
    pub fn stdin(mut self, stdin: impl AsRef<[u8]>) -> Cmd {
        self.stdin_contents = Some(stdin.as_ref().to_vec());
        self
    }
    // endregion:builder

    // region:running
    /// Runs the command on the process' standard streams.
    ///
    /// The command itself is echoed to stderr first, unless [`Cmd::quiet`]
    /// was set.
    pub fn run(&self) -> Result<()> {
        let status = self.status()?;
        self.check_status(status, None)
    }

    /// Like [`Cmd::run`], but returns the status code instead of checking it.
    pub fn status(&self) -> Result<i32> {
        let builtin = self.builtin()?;
        if !self.quiet {
            eprintln!("$ {}", self);
        }
        let stdout = io::stdout();
        let stderr = io::stderr();
        let mut stdout = stdout.lock();
        let mut stderr = stderr.lock();
        let status = self.with_stdin(|stdin| {
            builtin.run(&self.sh, &self.args, Streams::new(stdin, &mut stdout, &mut stderr))
        });
        let _ = stdout.flush();
        Ok(status)
    }

    /// Run the command and return its stdout as a string. Any trailing newline
    /// or carriage return will be trimmed.
    pub fn read(&self) -> Result<String> {
        self.read_stream(false)
    }

    /// Run the command and return its stderr as a string. Any trailing newline
    /// or carriage return will be trimmed.
    pub fn read_stderr(&self) -> Result<String> {
        self.read_stream(true)
    }

    /// Run the command and return its captured output.
    pub fn output(&self) -> Result<Output> {
        let builtin = self.builtin()?;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = self.with_stdin(|stdin| {
            builtin.run(&self.sh, &self.args, Streams::new(stdin, &mut stdout, &mut stderr))
        });
        let output = Output { status, stdout, stderr };
        self.check_status(output.status, Some(&output.stderr))?;
        Ok(output)
    }
    // endregion:running

    fn read_stream(&self, read_stderr: bool) -> Result<String> {
        let mut output = self.output()?;
        let stream = if read_stderr { &mut output.stderr } else { &mut output.stdout };
        let mut stream =
            String::from_utf8(mem::take(stream)).map_err(|err| Error::new_cmd_utf8(self, err))?;

        if stream.ends_with('\n') {
            stream.pop();
        }
        if stream.ends_with('\r') {
            stream.pop();
        }

        Ok(stream)
    }

    fn builtin(&self) -> Result<Builtin> {
        Builtin::from_name(&self.name).ok_or_else(|| Error::new_unknown_command(&self.name))
    }

    fn with_stdin<T>(&self, f: impl FnOnce(&mut dyn Read) -> T) -> T {
        match &self.stdin_contents {
            Some(contents) => f(&mut contents.as_slice()),
            None => f(&mut io::stdin().lock()),
        }
    }

    fn check_status(&self, status: i32, stderr: Option<&[u8]>) -> Result<()> {
        if status == 0 || self.ignore_status {
            return Ok(());
        }
        Err(Error::new_cmd_status(self, status, stderr.map(<[u8]>::to_vec)))
    }
}

/// A temporary directory.
///
/// This is a RAII object which will remove the underlying temporary directory
/// when dropped.
#[derive(Debug)]
#[must_use]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Returns the path to the underlying temporary directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
