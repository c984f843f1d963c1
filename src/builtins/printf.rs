use crate::{
    builtins::{report, write_error, Streams},
    escape, format, Shell,
};

/// Formats the remaining arguments according to the first one.
///
/// The format is escape-translated first, like `echo` arguments. An empty
/// format is rejected the same way as a missing one.
pub fn printf(_sh: &Shell, args: &[String], io: Streams<'_>) -> i32 {
    let Some((template, args)) = args.split_first().filter(|(it, _)| !it.is_empty()) else {
        report(io.stderr, "printf", "not enough arguments");
        return 1;
    };

    let template = escape::translate(template);
    match format::sprintf(&template.text, args) {
        Ok(text) => match io.stdout.write_all(text.as_bytes()) {
            Ok(()) => 0,
            Err(err) => write_error(io.stderr, "printf", err),
        },
        Err(err) => {
            report(io.stderr, "printf", err);
            1
        }
    }
}
