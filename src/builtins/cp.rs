use std::{
    ffi::OsStr,
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf, MAIN_SEPARATOR},
};

use crate::{
    builtins::{report, report_line, Streams},
    error::{os_reason, rename_prefix},
    Error, Shell,
};

/// Copies files.
///
/// The last argument is the destination. With several sources it must be an
/// existing directory; each source then lands in it under its own file name.
pub fn cp(sh: &Shell, args: &[String], io: Streams<'_>) -> i32 {
    let Some((dest, sources)) = args.split_last() else {
        report(io.stderr, "cp", "missing file operand");
        return 1;
    };
    if sources.is_empty() {
        report(io.stderr, "cp", format_args!("missing destination file operand after '{dest}'"));
        return 1;
    }

    let dest_path = sh.path(dest);
    let into_dir = dest_path.is_dir();
    if sources.len() > 1 && !into_dir {
        report(io.stderr, "cp", format_args!("target '{dest}' is not a directory"));
        return 1;
    }

    let mut failed = false;
    for source in sources {
        let (new_file, new_path) = if into_dir {
            let name = Path::new(source).file_name().unwrap_or_else(|| OsStr::new(source));
            let parent = dest.trim_end_matches(MAIN_SEPARATOR);
            let new_file = format!("{parent}{MAIN_SEPARATOR}{}", name.to_string_lossy());
            (new_file, dest_path.join(name))
        } else {
            (dest.clone(), dest_path.clone())
        };

        let job = CopyJob { source, src: sh.path(source), new_file: &new_file, dst: new_path };
        match job.run() {
            Ok(n_bytes) => log::trace!("cp: copied {n_bytes} bytes from `{source}` to `{new_file}`"),
            Err(message) => {
                report_line(io.stderr, message);
                failed = true;
            }
        }
    }

    i32::from(failed)
}

/// A single source-to-destination copy, with both the paths as typed by the
/// user (for messages) and as resolved against the shell.
struct CopyJob<'a> {
    source: &'a str,
    src: PathBuf,
    new_file: &'a str,
    dst: PathBuf,
}

impl CopyJob<'_> {
    /// Returns the number of bytes copied, or the full diagnostic line.
    fn run(&self) -> Result<u64, String> {
        let source = self.source;
        if self.src.is_dir() {
            return Err(format!("cp: omitting directory '{source}'"));
        }
        if !self.src.is_file() {
            return Err(format!("cp: cannot stat '{source}': No such file or directory"));
        }
        if same_file(&self.src, &self.dst) {
            return Err(format!("cp: '{source}' and '{source}' are the same file"));
        }

        if !self.dst.is_file() {
            File::create(&self.dst).map_err(|err| self.cannot_create(&err))?;
        } else if let Err(err) = OpenOptions::new().write(true).open(&self.dst) {
            if err.kind() == io::ErrorKind::PermissionDenied {
                return Err(self.cannot_create(&err));
            }
        }

        fs::copy(&self.src, &self.dst).map_err(|err| {
            let err = Error::new_copy_file(err, source.into(), self.new_file.into());
            rename_prefix(&err.to_string(), "copy", "cp")
        })
    }

    fn cannot_create(&self, err: &io::Error) -> String {
        format!("cp: cannot create regular file '{}': {}", self.new_file, os_reason(err))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
