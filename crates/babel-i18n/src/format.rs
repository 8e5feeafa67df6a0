//! printf-style positional substitution.
//!
//! Templates use `%` verbs: `%s %v %d %f %F %g %q %x %X %o %b %t %c` and
//! `%%` for a literal percent sign. A verb may carry flags (`-`, `+`, `0`,
//! space, `#`), a width, a `.precision` and an explicit 1-based argument
//! index such as `%[2]s`; verbs after an indexed one continue from the
//! following argument.
//!
//! Substitution never fails:
//!
//! - a verb with no argument left is written literally (`%s` stays `%s`);
//! - surplus arguments are ignored;
//! - an argument of the wrong kind for its verb is written in its plain
//!   display form (`%d` with `"abc"` gives `abc`);
//! - unknown verbs, malformed indexes and a trailing `%` are written
//!   literally and consume no argument;
//! - a width or precision above [`MAX_WIDTH`] makes the directive literal.

use std::fmt;

/// A substitution argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Arg {
    fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float(_))
    }

    fn is_negative(&self) -> bool {
        match self {
            Self::Int(n) => *n < 0,
            Self::Float(x) => x.is_sign_negative(),
            _ => false,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<char> for Arg {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty; $($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(n: $t) -> Self {
                    Self::$variant(n as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64; i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64; u8, u16, u32, u64, usize);
impl_from_int!(Float, f64; f32, f64);

/// A parsed `%...` directive.
#[derive(Debug, Default, PartialEq)]
struct Directive {
    minus: bool,
    plus: bool,
    zero: bool,
    space: bool,
    sharp: bool,
    index: Option<usize>,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
    /// Byte length of the directive, including the leading `%`.
    len: usize,
}

/// Largest accepted width or precision.
pub const MAX_WIDTH: usize = u16::MAX as usize;

const VERBS: &[char] = &['s', 'v', 'd', 'f', 'F', 'g', 'q', 'x', 'X', 'o', 'b', 't', 'c'];

/// Substitute `args` into `template`.
pub fn sprintf(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let Some(directive) = parse_directive(tail) else {
            out.push('%');
            rest = &tail[1..];
            continue;
        };
        let raw = &tail[..directive.len];
        rest = &tail[directive.len..];

        if directive.verb == '%' {
            out.push('%');
            continue;
        }
        if !VERBS.contains(&directive.verb) {
            out.push_str(raw);
            continue;
        }

        let index = directive.index.unwrap_or(next_arg);
        next_arg = index + 1;
        match args.get(index) {
            Some(arg) => render(&mut out, arg, &directive),
            None => out.push_str(raw),
        }
    }

    out.push_str(rest);
    out
}

fn parse_directive(s: &str) -> Option<Directive> {
    let bytes = s.as_bytes();
    let mut d = Directive::default();
    let mut i = 1;

    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => d.minus = true,
            b'+' => d.plus = true,
            b'0' => d.zero = true,
            b' ' => d.space = true,
            b'#' => d.sharp = true,
            _ => break,
        }
        i += 1;
    }

    if bytes.get(i) == Some(&b'[') {
        let close = s[i..].find(']')? + i;
        let n: usize = s[i + 1..close].parse().ok()?;
        d.index = Some(n.checked_sub(1)?);
        i = close + 1;
    }

    let (width, next) = read_number(bytes, i);
    d.width = width;
    i = next;

    if bytes.get(i) == Some(&b'.') {
        let (precision, next) = read_number(bytes, i + 1);
        d.precision = Some(precision.unwrap_or(0));
        i = next;
    }

    if d.width.max(d.precision).is_some_and(|n| n > MAX_WIDTH) {
        return None;
    }

    let verb = s[i..].chars().next()?;
    d.verb = verb;
    d.len = i + verb.len_utf8();
    Some(d)
}

fn read_number(bytes: &[u8], start: usize) -> (Option<usize>, usize) {
    let mut i = start;
    let mut value: Option<usize> = None;
    while let Some(&b) = bytes.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = usize::from(b - b'0');
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        i += 1;
    }
    (value, i)
}

fn render(out: &mut String, arg: &Arg, d: &Directive) {
    let precision = d.precision;
    let mut body = match (d.verb, arg) {
        ('s', Arg::Str(s)) => match precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.clone(),
        },
        ('d', Arg::Char(c)) => u32::from(*c).to_string(),
        ('f' | 'F', Arg::Float(x)) => format!("{:.*}", precision.unwrap_or(6), x),
        ('f' | 'F', Arg::Int(n)) => format!("{:.*}", precision.unwrap_or(6), *n as f64),
        ('f' | 'F', Arg::Uint(n)) => format!("{:.*}", precision.unwrap_or(6), *n as f64),
        ('q', Arg::Str(s)) => format!("{s:?}"),
        ('q', Arg::Char(c)) => format!("{c:?}"),
        ('x', Arg::Int(n)) => signed_radix(*n, |u| format!("{u:x}")),
        ('x', Arg::Uint(n)) => format!("{n:x}"),
        ('x', Arg::Str(s)) => s.bytes().map(|b| format!("{b:02x}")).collect(),
        ('X', Arg::Int(n)) => signed_radix(*n, |u| format!("{u:X}")),
        ('X', Arg::Uint(n)) => format!("{n:X}"),
        ('X', Arg::Str(s)) => s.bytes().map(|b| format!("{b:02X}")).collect(),
        ('o', Arg::Int(n)) => signed_radix(*n, |u| format!("{u:o}")),
        ('o', Arg::Uint(n)) => format!("{n:o}"),
        ('b', Arg::Int(n)) => signed_radix(*n, |u| format!("{u:b}")),
        ('b', Arg::Uint(n)) => format!("{n:b}"),
        ('c', Arg::Int(n)) => code_point(u32::try_from(*n).ok()),
        ('c', Arg::Uint(n)) => code_point(u32::try_from(*n).ok()),
        _ => arg.to_string(),
    };

    if d.sharp && !matches!(arg, Arg::Str(_)) {
        let prefix = match d.verb {
            'x' => "0x",
            'X' => "0X",
            'o' => "0",
            'b' => "0b",
            _ => "",
        };
        if !prefix.is_empty() {
            body = match body.strip_prefix('-') {
                Some(digits) => format!("-{prefix}{digits}"),
                None => format!("{prefix}{body}"),
            };
        }
    }

    let numeric = arg.is_numeric() && !matches!(d.verb, 's' | 'q' | 'c' | 't');
    if numeric && !arg.is_negative() {
        if d.plus {
            body.insert(0, '+');
        } else if d.space {
            body.insert(0, ' ');
        }
    }

    pad(out, &body, d, numeric);
}

fn signed_radix(n: i64, digits: impl Fn(u64) -> String) -> String {
    if n < 0 {
        format!("-{}", digits(n.unsigned_abs()))
    } else {
        digits(n.unsigned_abs())
    }
}

fn code_point(n: Option<u32>) -> String {
    n.and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

fn pad(out: &mut String, body: &str, d: &Directive, numeric: bool) {
    let len = body.chars().count();
    let fill = d.width.map_or(0, |w| w.saturating_sub(len));
    if fill == 0 {
        out.push_str(body);
        return;
    }

    if d.minus {
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if d.zero && numeric {
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('-' | '+' | ' ')) => (Some(c), &body[1..]),
            _ => (None, body),
        };
        if let Some(sign) = sign {
            out.push(sign);
        }
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(body);
    }
}
