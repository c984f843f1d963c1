use std::io::{self, Write};

use crate::{
    builtins::{report, write_error, Streams, EOL},
    Shell,
};

/// Prints numbers from `FIRST` to `LAST`, one per line.
///
/// ```text
/// seq LAST
/// seq FIRST LAST
/// seq FIRST INCREMENT LAST
/// ```
///
/// With two operands the increment is `1` or `-1`, whichever moves towards
/// `LAST`. Any other operand count fails without a message.
pub fn seq(_sh: &Shell, args: &[String], io: Streams<'_>) -> i32 {
    if !(1..=3).contains(&args.len()) {
        return 1;
    }

    let mut operands = Vec::with_capacity(args.len());
    for arg in args {
        match Number::parse(arg) {
            Some(it) => operands.push(it),
            None => {
                report(io.stderr, "seq", format_args!("invalid floating point argument: '{arg}'"));
                return 1;
            }
        }
    }

    let range = Range::resolve(&operands);
    if let Err(message) = range.validate() {
        report(io.stderr, "seq", message);
        return 1;
    }
    match range.write(&mut *io.stdout) {
        Ok(()) => 0,
        Err(err) => write_error(io.stderr, "seq", err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    /// `decimals` is the number of digits written after the point.
    Float { value: f64, decimals: usize },
}

impl Number {
    fn parse(s: &str) -> Option<Number> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Some(Number::Int(n));
        }
        if !s.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.')) {
            return None;
        }
        let value = s.parse::<f64>().ok().filter(|it| it.is_finite())?;
        Some(Number::Float { value, decimals: decimals_needed(s) })
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float { value, .. } => value,
        }
    }

    fn decimals(self) -> usize {
        match self {
            Number::Int(_) => 0,
            Number::Float { decimals, .. } => decimals,
        }
    }
}

/// Digits after the point needed to print `s` exactly: fraction digits minus
/// the exponent, so `1e-1` needs one and `2.50e1` needs one.
fn decimals_needed(s: &str) -> usize {
    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    };
    let fraction = match mantissa.split_once('.') {
        Some((_, fraction)) => fraction.len() as i64,
        None => 0,
    };
    let exponent = match exponent.parse::<i64>() {
        Ok(it) => it,
        Err(_) if exponent.starts_with('-') => i64::MIN,
        Err(_) if exponent.is_empty() => 0,
        Err(_) => i64::MAX,
    };
    fraction.saturating_sub(exponent).clamp(0, MAX_DECIMALS as i64) as usize
}

/// `10^MAX_DECIMALS` is still a finite `f64`.
const MAX_DECIMALS: usize = 308;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Range {
    Int { start: i64, step: i64, last: i64 },
    Float { start: f64, step: f64, last: f64, decimals: usize },
}

impl Range {
    /// Maps 1, 2 or 3 operands to `start`, `step` and `last`.
    fn resolve(operands: &[Number]) -> Range {
        let one = Number::Int(1);
        let (start, step, last) = match *operands {
            [last] => (one, one, last),
            [start, last] => {
                let step = if start.as_f64() >= last.as_f64() { Number::Int(-1) } else { one };
                (start, step, last)
            }
            [start, step, last] => (start, step, last),
            _ => unreachable!("operand count is checked by the caller"),
        };

        match (start, step, last) {
            (Number::Int(start), Number::Int(step), Number::Int(last)) => {
                Range::Int { start, step, last }
            }
            _ => Range::Float {
                start: start.as_f64(),
                step: step.as_f64(),
                last: last.as_f64(),
                decimals: [start, step, last].iter().map(|it| it.decimals()).max().unwrap_or(0),
            },
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        match *self {
            Range::Int { start, step, last } => check_direction(start, step, last),
            Range::Float { start, step, last, .. } => check_direction(start, step, last),
        }
    }

    fn write(&self, out: &mut dyn Write) -> io::Result<()> {
        match *self {
            Range::Int { start, step, last } => {
                let mut value = start;
                while (step > 0 && value <= last) || (step < 0 && value >= last) {
                    write!(out, "{value}{EOL}")?;
                    match value.checked_add(step) {
                        Some(next) => value = next,
                        None => break,
                    }
                }
            }
            Range::Float { start, step, last, decimals } => {
                let scale = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
                let mut prev: Option<f64> = None;
                for i in 0u64.. {
                    let exact = start + i as f64 * step;
                    // Round to the printed precision so that `0.1` steps land on `last`.
                    let scaled = (exact * scale).round();
                    let value = if scaled.is_finite() { scaled / scale + 0.0 } else { exact };
                    let past_last = (step > 0.0 && value > last) || (step < 0.0 && value < last);
                    if !value.is_finite() || past_last {
                        break;
                    }
                    if let Some(prev) = prev {
                        if (step > 0.0 && value <= prev) || (step < 0.0 && value >= prev) {
                            log::debug!("seq: {value} does not move past {prev}, stopping");
                            break;
                        }
                    }
                    write!(out, "{value:.decimals$}{EOL}")?;
                    prev = Some(value);
                }
            }
        }
        Ok(())
    }
}

fn check_direction<T: PartialOrd + Default>(start: T, step: T, last: T) -> Result<(), &'static str> {
    let zero = T::default();
    if step == zero {
        Err("zero decrement")
    } else if start < last && step < zero {
        Err("needs positive increment")
    } else if start > last && step > zero {
        Err("needs negative decrement")
    } else {
        Ok(())
    }
}
