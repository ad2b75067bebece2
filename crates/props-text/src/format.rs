//! printf-style formatting
//!
//! Renders templates of the form `%[index$][flags][width][.precision]conversion`
//! against a slice of [`Arg`]s. Output never depends on the host locale.
//!
//! Supported conversions:
//!
//! | conversion | arguments                 | output                          |
//! |------------|---------------------------|---------------------------------|
//! | `s` `S`    | any                       | display text                    |
//! | `b` `B`    | any                       | the bool, `true` for non-bools  |
//! | `c` `C`    | char, code point          | a single character              |
//! | `d`        | integer                   | decimal                         |
//! | `o` `x` `X`| integer                   | octal / hex, two's complement   |
//! | `f`        | float                     | fixed point, precision 6        |
//! | `e` `E`    | float                     | scientific, precision 6         |
//! | `n`        | none                      | `\n`                            |
//! | `%`        | none                      | `%`                             |
//!
//! # Example
//!
//! ```
//! use props_meta::Arg;
//! use props_text::format;
//!
//! let text = format("%s:%05d", &[Arg::from("port"), Arg::from(80u16)]).unwrap();
//! assert_eq!(text, "port:00080");
//!
//! // A stray '%' is not a template.
//! assert!(format("p@#$%^&*()", &[Arg::from("x")]).is_err());
//! ```

use crate::error::{FormatError, Result};
use props_meta::Arg;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for one format specifier, anchored at a `%`.
static SPECIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^%(\d+\$)?([-#+ 0,(<]*)(\d+)?(\.\d+)?([a-zA-Z%])")
        .expect("Invalid format specifier regex")
});

/// Largest width or precision a specifier may request. Padding is
/// allocated up front, so larger values are rejected rather than rendered.
const MAX_WIDTH: usize = 1 << 20;

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    alternate: bool,
    plus: bool,
    space: bool,
    zero: bool,
    group: bool,
    paren: bool,
    previous: bool,
}

impl Flags {
    fn parse(text: &str) -> Self {
        let mut flags = Flags::default();
        for c in text.chars() {
            match c {
                '-' => flags.left = true,
                '#' => flags.alternate = true,
                '+' => flags.plus = true,
                ' ' => flags.space = true,
                '0' => flags.zero = true,
                ',' => flags.group = true,
                '(' => flags.paren = true,
                '<' => flags.previous = true,
                _ => {}
            }
        }
        flags
    }
}

#[derive(Debug)]
struct Specifier<'t> {
    text: &'t str,
    index: Option<usize>,
    flag_text: &'t str,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
    position: usize,
}

impl Specifier<'_> {
    fn check_flags(&self, allowed: &str) -> Result<()> {
        let illegal: String = self
            .flag_text
            .chars()
            .filter(|c| *c != '<' && !allowed.contains(*c))
            .collect();
        if illegal.is_empty() {
            Ok(())
        } else {
            Err(FormatError::IllegalFlags {
                flags: illegal,
                conversion: self.conversion,
            })
        }
    }

    fn reject_precision(&self) -> Result<()> {
        match self.precision {
            Some(_) => Err(FormatError::IllegalPrecision {
                conversion: self.conversion,
            }),
            None => Ok(()),
        }
    }

    fn illegal_for(&self, arg: &Arg) -> FormatError {
        FormatError::IllegalConversion {
            conversion: self.conversion,
            kind: arg.kind(),
        }
    }
}

/// Render `template` against `args`.
///
/// Arguments not referenced by the template are ignored.
///
/// # Errors
///
/// Any malformed specifier, missing argument or conversion that does not
/// accept its argument yields a [`FormatError`]; nothing is partially
/// rendered.
pub fn format(template: &str, args: &[Arg]) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut cursor = 0;
    let mut ordinary = 0;
    let mut previous: Option<usize> = None;

    while let Some(offset) = template[cursor..].find('%') {
        let start = cursor + offset;
        out.push_str(&template[cursor..start]);

        let spec = parse_specifier(template, start)?;
        cursor = start + spec.text.len();

        match spec.conversion {
            '%' => {
                spec.check_flags("-")?;
                spec.reject_precision()?;
                out.push_str(&justify(&spec, "%".to_string()));
            }
            'n' => {
                if !spec.flag_text.is_empty() || spec.width.is_some() {
                    return Err(FormatError::IllegalFlags {
                        flags: spec.flag_text.to_string(),
                        conversion: 'n',
                    });
                }
                spec.reject_precision()?;
                out.push('\n');
            }
            _ => {
                let index = argument_index(&spec, &mut ordinary, previous)?;
                let arg = args.get(index).ok_or_else(|| FormatError::MissingArgument {
                    specifier: spec.text.to_string(),
                })?;
                previous = Some(index);
                out.push_str(&render(&spec, arg)?);
            }
        }
    }

    out.push_str(&template[cursor..]);
    Ok(out)
}

fn parse_specifier(template: &str, start: usize) -> Result<Specifier<'_>> {
    let tail = &template[start..];
    let Some(caps) = SPECIFIER_REGEX.captures(tail) else {
        let conversion = tail[1..]
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_else(|| "%".to_string());
        return Err(FormatError::UnknownConversion {
            conversion,
            position: start,
        });
    };

    let text = caps.get(0).map_or("", |m| m.as_str());
    let invalid_width = || FormatError::InvalidWidth {
        specifier: text.to_string(),
    };

    let index = match caps.get(1) {
        Some(m) => {
            let digits = m.as_str().trim_end_matches('$');
            let index = digits.parse::<usize>().map_err(|_| FormatError::InvalidIndex {
                specifier: text.to_string(),
            })?;
            Some(index)
        }
        None => None,
    };
    let flag_text = caps.get(2).map_or("", |m| m.as_str());
    let width = caps
        .get(3)
        .map(|m| parse_width(m.as_str()).ok_or_else(invalid_width))
        .transpose()?;
    let precision = caps
        .get(4)
        .map(|m| parse_width(&m.as_str()[1..]).ok_or_else(invalid_width))
        .transpose()?;
    let conversion = caps
        .get(5)
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or('%');

    let flags = Flags::parse(flag_text);
    if (flags.left || flags.zero) && width.is_none() {
        return Err(FormatError::MissingWidth {
            specifier: text.to_string(),
        });
    }
    if (flags.left && flags.zero) || (flags.plus && flags.space) {
        return Err(FormatError::IllegalFlags {
            flags: flag_text.to_string(),
            conversion,
        });
    }

    Ok(Specifier {
        text,
        index,
        flag_text,
        flags,
        width,
        precision,
        conversion,
        position: start,
    })
}

fn argument_index(spec: &Specifier<'_>, ordinary: &mut usize, previous: Option<usize>) -> Result<usize> {
    let invalid = || FormatError::InvalidIndex {
        specifier: spec.text.to_string(),
    };

    if spec.flags.previous {
        return previous.ok_or_else(invalid);
    }
    match spec.index {
        Some(0) => Err(invalid()),
        Some(explicit) => Ok(explicit - 1),
        None => {
            let index = *ordinary;
            *ordinary += 1;
            Ok(index)
        }
    }
}

fn render(spec: &Specifier<'_>, arg: &Arg) -> Result<String> {
    let upper = spec.conversion.is_ascii_uppercase();
    match spec.conversion {
        's' | 'S' => {
            spec.check_flags("-")?;
            let text = truncate(arg.to_string(), spec.precision);
            Ok(justify(spec, upper_if(text, upper)))
        }
        'b' | 'B' => {
            spec.check_flags("-")?;
            let text = match arg {
                Arg::Bool(v) => v.to_string(),
                _ => "true".to_string(),
            };
            let text = truncate(text, spec.precision);
            Ok(justify(spec, upper_if(text, upper)))
        }
        'c' | 'C' => {
            spec.check_flags("-")?;
            spec.reject_precision()?;
            let c = match arg {
                Arg::Char(c) => *c,
                Arg::Int(v) => code_point(u32::try_from(*v).ok(), v)?,
                Arg::UInt(v) => code_point(u32::try_from(*v).ok(), v)?,
                other => return Err(spec.illegal_for(other)),
            };
            Ok(justify(spec, upper_if(c.to_string(), upper)))
        }
        'd' => {
            spec.check_flags("-+ 0,(")?;
            spec.reject_precision()?;
            let (negative, magnitude) = match arg {
                Arg::Int(v) => (*v < 0, v.unsigned_abs()),
                Arg::UInt(v) => (false, *v),
                other => return Err(spec.illegal_for(other)),
            };
            let mut digits = magnitude.to_string();
            if spec.flags.group {
                digits = group_thousands(&digits);
            }
            Ok(finish_number(spec, negative, "", digits))
        }
        'o' | 'x' | 'X' => {
            spec.check_flags("-#0")?;
            spec.reject_precision()?;
            let bits = match arg {
                // Negative integers render as their two's complement.
                Arg::Int(v) => *v as u64,
                Arg::UInt(v) => *v,
                other => return Err(spec.illegal_for(other)),
            };
            let (digits, prefix) = match spec.conversion {
                'o' => (format!("{:o}", bits), "0"),
                'x' => (format!("{:x}", bits), "0x"),
                _ => (format!("{:X}", bits), "0X"),
            };
            let prefix = if spec.flags.alternate { prefix } else { "" };
            Ok(finish_number(spec, false, prefix, digits))
        }
        'f' | 'e' | 'E' => {
            let allowed = if spec.conversion == 'f' { "-+ 0,(" } else { "-+ 0(" };
            spec.check_flags(allowed)?;
            let v = match arg {
                Arg::Float(v) => *v,
                other => return Err(spec.illegal_for(other)),
            };
            if v.is_nan() {
                return Ok(justify(spec, "NaN".to_string()));
            }
            if v.is_infinite() {
                let text = match (v > 0.0, spec.flags.plus, spec.flags.paren) {
                    (true, true, _) => "+Infinity",
                    (true, false, _) => "Infinity",
                    (false, _, true) => "(Infinity)",
                    (false, _, false) => "-Infinity",
                };
                return Ok(justify(spec, text.to_string()));
            }

            let precision = spec.precision.unwrap_or(6);
            let magnitude = v.abs();
            let digits = if spec.conversion == 'f' {
                let fixed = format!("{:.*}", precision, magnitude);
                if spec.flags.group {
                    group_thousands(&fixed)
                } else {
                    fixed
                }
            } else {
                scientific(magnitude, precision, upper)
            };
            Ok(finish_number(spec, v.is_sign_negative(), "", digits))
        }
        other => Err(FormatError::UnknownConversion {
            conversion: other.to_string(),
            position: spec.position,
        }),
    }
}

fn code_point(value: Option<u32>, original: &dyn std::fmt::Display) -> Result<char> {
    value
        .and_then(char::from_u32)
        .ok_or_else(|| FormatError::IllegalCodePoint {
            value: original.to_string(),
        })
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    }
}

fn upper_if(text: String, upper: bool) -> String {
    if upper { text.to_uppercase() } else { text }
}

/// Pad to the specifier's width with spaces.
fn justify(spec: &Specifier<'_>, text: String) -> String {
    let Some(width) = spec.width else {
        return text;
    };
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let fill = " ".repeat(width - len);
    if spec.flags.left {
        text + &fill
    } else {
        fill + &text
    }
}

/// Attach sign and prefix, then zero-pad or justify.
fn finish_number(spec: &Specifier<'_>, negative: bool, prefix: &str, digits: String) -> String {
    let (lead, trail) = match (negative, spec.flags) {
        (true, Flags { paren: true, .. }) => ("(", ")"),
        (true, _) => ("-", ""),
        (false, Flags { plus: true, .. }) => ("+", ""),
        (false, Flags { space: true, .. }) => (" ", ""),
        (false, _) => ("", ""),
    };

    if spec.flags.zero {
        if let Some(width) = spec.width {
            let len = lead.len() + prefix.len() + digits.chars().count() + trail.len();
            if len < width {
                let zeros = "0".repeat(width - len);
                return format!("{lead}{prefix}{zeros}{digits}{trail}");
            }
        }
    }
    justify(spec, format!("{lead}{prefix}{digits}{trail}"))
}

fn group_thousands(digits: &str) -> String {
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(digits.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

fn scientific(magnitude: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, magnitude);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.unsigned_abs())
}

fn parse_width(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok().filter(|n| *n <= MAX_WIDTH)
}
