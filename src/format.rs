//! The formatting engine behind `printf`.
//!
//! Directives follow the familiar `sprintf` shape:
//!
//! ```text
//! %[argnum$][flags][width][.precision]specifier
//! ```
//!
//! Flags are `-` (left-justify), `+` (always print a sign), `0` and ` `
//! (padding character) and `'c` (pad with `c`). Arguments are plain strings;
//! numeric conversions read the longest numeric prefix, so `"12abc"` is `12`
//! and `"abc"` is `0`.
use std::{fmt, iter::Peekable, str::Chars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormatError {
    TooFewArguments { required: usize, given: usize },
    UnknownSpecifier(char),
    ZeroArgnum,
    MissingSpecifier,
    WidthTooLarge,
    PrecisionTooLarge,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::TooFewArguments { required, given } => {
                write!(f, "{required} arguments are required, {given} given")
            }
            FormatError::UnknownSpecifier(c) => write!(f, "unknown format specifier \"{c}\""),
            FormatError::ZeroArgnum => write!(f, "argument number must be greater than zero"),
            FormatError::MissingSpecifier => write!(f, "missing format specifier at end of string"),
            FormatError::WidthTooLarge => write!(f, "width must not exceed {MAX_FIELD}"),
            FormatError::PrecisionTooLarge => write!(f, "precision must not exceed {MAX_FIELD}"),
        }
    }
}

const SPECIFIERS: &str = "bcdeEfFgGiosuxX";

/// Widths and precisions are capped at C's `INT_MAX`.
const MAX_FIELD: usize = i32::MAX as usize;

/// Renders `format` against `args`. Nothing is produced unless every
/// directive succeeds. Unused arguments are ignored.
pub(crate) fn sprintf(format: &str, args: &[String]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut next_arg = 0;
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let spec = Spec::parse(&mut chars)?;
        let index = match spec.argnum {
            Some(n) => n - 1,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let arg = args
            .get(index)
            .ok_or(FormatError::TooFewArguments { required: index + 1, given: args.len() })?;
        spec.render(arg, &mut out);
    }
    Ok(out)
}

#[derive(Debug)]
struct Spec {
    argnum: Option<usize>,
    left: bool,
    plus: bool,
    pad: char,
    width: usize,
    precision: Option<usize>,
    conv: char,
}

impl Spec {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Result<Spec, FormatError> {
        let mut spec = Spec {
            argnum: None,
            left: false,
            plus: false,
            pad: ' ',
            width: 0,
            precision: None,
            conv: 's',
        };

        let mut lookahead = chars.clone();
        if let Some(n) = number(&mut lookahead) {
            if lookahead.peek() == Some(&'$') {
                lookahead.next();
                if n == 0 {
                    return Err(FormatError::ZeroArgnum);
                }
                spec.argnum = Some(n);
                *chars = lookahead;
            }
        }

        loop {
            match chars.peek() {
                Some(&'-') => spec.left = true,
                Some(&'+') => spec.plus = true,
                Some(&'0') => spec.pad = '0',
                Some(&' ') => spec.pad = ' ',
                Some(&'\'') => {
                    chars.next();
                    spec.pad = chars.next().ok_or(FormatError::MissingSpecifier)?;
                    continue;
                }
                _ => break,
            }
            chars.next();
        }

        spec.width = field(number(chars), FormatError::WidthTooLarge)?;
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(field(number(chars), FormatError::PrecisionTooLarge)?);
        }

        spec.conv = chars.next().ok_or(FormatError::MissingSpecifier)?;
        if !SPECIFIERS.contains(spec.conv) {
            return Err(FormatError::UnknownSpecifier(spec.conv));
        }
        Ok(spec)
    }

    fn render(&self, arg: &str, out: &mut String) {
        let (body, numeric) = match self.conv {
            'd' | 'i' => {
                let n = parse_int(arg);
                let digits = self.min_digits(n.unsigned_abs().to_string());
                (self.signed(n < 0, digits), true)
            }
            'u' => (self.min_digits((parse_int(arg) as u64).to_string()), true),
            'b' => (self.min_digits(format!("{:b}", parse_int(arg) as u64)), true),
            'o' => (self.min_digits(format!("{:o}", parse_int(arg) as u64)), true),
            'x' => (self.min_digits(format!("{:x}", parse_int(arg) as u64)), true),
            'X' => (self.min_digits(format!("{:X}", parse_int(arg) as u64)), true),
            'c' => {
                let c = char::from_u32(parse_int(arg) as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                (c.to_string(), false)
            }
            's' => match self.precision {
                Some(p) => (arg.chars().take(p).collect(), false),
                None => (arg.to_string(), false),
            },
            _ => (self.float(parse_float(arg)), true),
        };
        self.pad_into(body, numeric, out)
    }

    fn min_digits(&self, digits: String) -> String {
        match self.precision {
            Some(p) if digits.len() < p => format!("{}{digits}", "0".repeat(p - digits.len())),
            _ => digits,
        }
    }

    fn signed(&self, negative: bool, magnitude: String) -> String {
        if negative {
            format!("-{magnitude}")
        } else if self.plus {
            format!("+{magnitude}")
        } else {
            magnitude
        }
    }

    fn float(&self, v: f64) -> String {
        let upper = self.conv.is_ascii_uppercase();
        if !v.is_finite() {
            let s = if v.is_nan() { "nan" } else { "inf" };
            let s = if upper { s.to_ascii_uppercase() } else { s.to_string() };
            return self.signed(v.is_sign_negative() && !v.is_nan(), s);
        }
        let precision = self.precision.unwrap_or(6);
        let magnitude = match self.conv {
            'e' | 'E' => exponential(v.abs(), precision, upper),
            'g' | 'G' => general(v.abs(), precision, upper),
            _ => format!("{:.*}", precision, v.abs()),
        };
        self.signed(v.is_sign_negative() && v != 0.0, magnitude)
    }

    fn pad_into(&self, body: String, numeric: bool, out: &mut String) {
        let len = body.chars().count();
        if len >= self.width {
            out.push_str(&body);
            return;
        }
        let fill = self.width - len;
        if self.left {
            out.push_str(&body);
            let pad = if self.pad == '0' { ' ' } else { self.pad };
            out.extend(std::iter::repeat(pad).take(fill));
            return;
        }
        let mut body = body.as_str();
        if numeric && self.pad == '0' {
            if let Some(sign) = body.chars().next().filter(|&c| c == '-' || c == '+') {
                out.push(sign);
                body = &body[1..];
            }
        }
        out.extend(std::iter::repeat(self.pad).take(fill));
        out.push_str(body);
    }
}

fn field(n: Option<usize>, too_large: FormatError) -> Result<usize, FormatError> {
    match n.unwrap_or(0) {
        n if n > MAX_FIELD => Err(too_large),
        n => Ok(n),
    }
}

/// Reads a run of decimal digits, if any.
fn number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut res: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        res = Some(res.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
    }
    res
}

fn exponential(v: f64, precision: usize, upper: bool) -> String {
    let s = format!("{:.*e}", precision, v);
    let (mantissa, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.abs())
}

/// `%g`: the shorter of `%e` and `%f` for `precision` significant digits,
/// with trailing zeros removed.
fn general(v: f64, precision: usize, upper: bool) -> String {
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, v);
    let exp: i32 = sci.split_once('e').and_then(|(_, it)| it.parse().ok()).unwrap_or(0);
    if exp < -4 || exp >= precision as i32 {
        let s = exponential(v, precision - 1, upper);
        let split = s.find(|c| c == 'e' || c == 'E').unwrap_or(s.len());
        let (mantissa, exp) = s.split_at(split);
        format!("{}{exp}", trim_fraction(mantissa))
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Longest prefix of `s` (after leading whitespace) that reads as a number.
fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).map_or(false, u8::is_ascii_digit) {
        end += 1;
    }
    let mut seen_digits = end > digits_start;
    if allow_fraction && bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while bytes.get(frac_end).map_or(false, u8::is_ascii_digit) {
            frac_end += 1;
        }
        if seen_digits || frac_end > end + 1 {
            seen_digits = true;
            end = frac_end;
        }
    }
    if !seen_digits {
        return "";
    }
    if allow_fraction && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).map_or(false, u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    &s[..end]
}

fn parse_int(s: &str) -> i64 {
    let prefix = numeric_prefix(s, false);
    if prefix.is_empty() {
        return 0;
    }
    prefix.parse().unwrap_or_else(|_| if prefix.starts_with('-') { i64::MIN } else { i64::MAX })
}

fn parse_float(s: &str) -> f64 {
    numeric_prefix(s, true).parse().unwrap_or(0.0)
}
