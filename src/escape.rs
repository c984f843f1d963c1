//! Backslash escapes shared by `echo` and `printf`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Char(char),
    /// `\c`: produce no further output.
    Stop,
}

static ESCAPES: [(char, Escape); 10] = [
    ('\\', Escape::Char('\\')),
    ('a', Escape::Char('\x07')),
    ('b', Escape::Char('\x08')),
    ('c', Escape::Stop),
    ('e', Escape::Char('\x1b')),
    ('f', Escape::Char('\x0c')),
    ('n', Escape::Char('\n')),
    ('r', Escape::Char('\r')),
    ('t', Escape::Char('\t')),
    ('v', Escape::Char('\x0b')),
];

fn lookup(c: char) -> Option<Escape> {
    ESCAPES.iter().find(|&&(key, _)| key == c).map(|&(_, escape)| escape)
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Translated {
    pub(crate) text: String,
    /// A `\c` was hit; `text` holds everything before it.
    pub(crate) stopped: bool,
}

/// Replaces every known two-character escape in `s`, scanning left to right.
///
/// A backslash followed by anything else is kept as is. Output stops at the
/// first `\c` in the translated text, so `\\c` stops it too.
pub(crate) fn translate(s: &str) -> Translated {
    let translated = replace_escapes(s);
    match translated.text.find(STOP_MARKER) {
        Some(idx) => {
            let mut text = translated.text;
            text.truncate(idx);
            Translated { text, stopped: true }
        }
        None => translated,
    }
}

const STOP_MARKER: &str = "\\c";

fn replace_escapes(s: &str) -> Translated {
    let mut text = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.peek().copied().and_then(lookup) {
            Some(Escape::Char(it)) => {
                chars.next();
                text.push(it);
            }
            Some(Escape::Stop) => return Translated { text, stopped: true },
            None => text.push('\\'),
        }
    }
    Translated { text, stopped: false }
}
