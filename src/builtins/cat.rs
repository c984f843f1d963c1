use std::{
    fs::File,
    io::{self, Read, Write},
};

use crate::{
    builtins::{report, write_error, Streams},
    error::os_reason,
    Shell,
};

const CHUNK_SIZE: usize = 8192;

/// Concatenates files to standard output.
///
/// `-` (or an empty argument list) stands for standard input. Standard input
/// is read at most once per call: later `-` operands replay what the first
/// one read.
pub fn cat(sh: &Shell, args: &[String], io: Streams<'_>) -> i32 {
    let stdin_only = ["-".to_string()];
    let files = if args.is_empty() { &stdin_only[..] } else { args };

    let mut failed = false;
    let mut stdin_content: Option<Vec<u8>> = None;

    for file in files {
        let res = if file == "-" {
            match &stdin_content {
                Some(content) => {
                    log::trace!("cat: replaying {} buffered stdin bytes", content.len());
                    io.stdout.write_all(content).map_err(Failure::Write)
                }
                None => {
                    let mut content = Vec::new();
                    let res = copy_chunks(&mut *io.stdin, &mut *io.stdout, Some(&mut content));
                    stdin_content = Some(content);
                    res
                }
            }
        } else {
            let path = sh.path(file);
            if !path.is_file() {
                report(io.stderr, "cat", format_args!("{file}: No such file or directory"));
                failed = true;
                continue;
            }
            match File::open(&path) {
                Ok(mut f) => copy_chunks(&mut f, &mut *io.stdout, None),
                Err(err) => Err(Failure::Read(err)),
            }
        };

        match res {
            Ok(()) => {}
            Err(Failure::Read(err)) => {
                report(io.stderr, "cat", format_args!("{file}: {}", os_reason(&err)));
                failed = true;
            }
            Err(Failure::Write(err)) => return write_error(io.stderr, "cat", err),
        }
    }

    i32::from(failed)
}

enum Failure {
    Read(io::Error),
    Write(io::Error),
}

fn copy_chunks(
    src: &mut dyn Read,
    dst: &mut dyn Write,
    mut keep: Option<&mut Vec<u8>>,
) -> Result<(), Failure> {
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Failure::Read(err)),
        };
        if let Some(keep) = keep.as_deref_mut() {
            keep.extend_from_slice(&buf[..n]);
        }
        dst.write_all(&buf[..n]).map_err(Failure::Write)?;
    }
}
