use std::io::{self, Write};

use crate::{
    builtins::{write_error, Streams, EOL},
    escape, Shell,
};

/// Prints its arguments separated by single spaces.
///
/// A leading `-n` drops the trailing newline. Backslash escapes are always
/// interpreted; `\c` ends the output on the spot.
pub fn echo(_sh: &Shell, args: &[String], io: Streams<'_>) -> i32 {
    let (newline, words) = match args.split_first() {
        Some((first, rest)) if first == "-n" => (false, rest),
        _ => (true, args),
    };
    match write_words(&mut *io.stdout, words, newline) {
        Ok(()) => 0,
        Err(err) => write_error(io.stderr, "echo", err),
    }
}

fn write_words(out: &mut dyn Write, words: &[String], newline: bool) -> io::Result<()> {
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        let word = escape::translate(word);
        out.write_all(word.text.as_bytes())?;
        if word.stopped {
            return Ok(());
        }
    }
    if newline {
        out.write_all(EOL.as_bytes())?;
    }
    Ok(())
}
