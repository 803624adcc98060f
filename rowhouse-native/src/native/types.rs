use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::constants::MAX_PRECISION;
use crate::{Error, Result};

/// A type name string parsed into its base name and raw arguments.
///
/// `DateTime64(3, 'UTC')` parses to base `DateTime64` with arguments `3` and
/// `'UTC'`. Arguments are kept as raw tokens here; each base name applies its
/// own schema when the descriptor is resolved into a [`Type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub base: String,
    pub args: Vec<String>,
}

impl TypeDescriptor {
    /// Parses `Base` or `Base(arg[, arg...])`.
    ///
    /// # Errors
    /// Returns [`Error::TypeDescriptor`] on malformed parenthesization or an
    /// empty base name.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        let Some(open) = name.find('(') else {
            if name.is_empty() || name.contains(')') {
                return Err(Error::TypeDescriptor(format!("malformed type name `{name}`")));
            }
            return Ok(Self { base: name.to_string(), args: Vec::new() });
        };
        if !name.ends_with(')') {
            return Err(Error::TypeDescriptor(format!("unbalanced parentheses in `{name}`")));
        }
        let base = name[..open].trim();
        if base.is_empty() {
            return Err(Error::TypeDescriptor(format!("missing base name in `{name}`")));
        }
        let args = split_args(&name[open + 1..name.len() - 1])?;
        Ok(Self { base: base.to_string(), args })
    }
}

/// Splits an argument list on top-level commas, honoring nested parentheses
/// and single-quoted tokens.
fn split_args(inner: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0usize;
    for (pos, ch) in inner.char_indices() {
        match ch {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::TypeDescriptor(format!("unbalanced parentheses in `{inner}`"))
                })?;
            }
            ',' if !quoted && depth == 0 => {
                args.push(inner[start..pos].trim().to_string());
                start = pos + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quoted {
        return Err(Error::TypeDescriptor(format!("unbalanced parentheses in `{inner}`")));
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        args.push(last.to_string());
    } else if !args.is_empty() || start != 0 {
        return Err(Error::TypeDescriptor(format!("empty argument in `({inner})`")));
    }
    if args.iter().any(|arg| arg.is_empty()) {
        return Err(Error::TypeDescriptor(format!("empty argument in `({inner})`")));
    }
    Ok(args)
}

/// The closed set of column types this codec layer supports.
///
/// Parameterized variants carry their resolved arguments; `DateTime64` keeps
/// the sub-second precision (0–9 fractional digits) and the zone instants are
/// interpreted and rendered in (UTC unless the descriptor names one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Date,
    DateTime(Tz),
    DateTime64(usize, Tz),
}

impl Type {
    /// Resolves a parsed descriptor against the base name's argument schema.
    ///
    /// # Errors
    /// Returns [`Error::TypeDescriptor`] for unknown base names, wrong
    /// argument arity, or out-of-range argument values.
    pub fn resolve(descriptor: &TypeDescriptor) -> Result<Self> {
        let base = descriptor.base.as_str();
        let args = &descriptor.args;
        let type_ = match base {
            "Int8" => Self::Int8,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "UInt8" => Self::UInt8,
            "UInt16" => Self::UInt16,
            "UInt32" => Self::UInt32,
            "UInt64" => Self::UInt64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            "String" => Self::String,
            "Date" => Self::Date,
            "DateTime" => {
                if args.len() > 1 {
                    return Err(Error::TypeDescriptor(format!(
                        "DateTime takes at most one argument, found {}",
                        args.len()
                    )));
                }
                return Ok(Self::DateTime(args.first().map_or(Ok(Tz::UTC), |a| timezone(a))?));
            }
            "DateTime64" => {
                if args.is_empty() || args.len() > 2 {
                    return Err(Error::TypeDescriptor(format!(
                        "DateTime64 takes one or two arguments, found {}",
                        args.len()
                    )));
                }
                let precision = precision(&args[0])?;
                let tz = args.get(1).map_or(Ok(Tz::UTC), |a| timezone(a))?;
                return Ok(Self::DateTime64(precision, tz));
            }
            other => {
                return Err(Error::TypeDescriptor(format!("unknown type name `{other}`")));
            }
        };
        if !args.is_empty() {
            return Err(Error::TypeDescriptor(format!(
                "{base} takes no arguments, found {}",
                args.len()
            )));
        }
        Ok(type_)
    }
}

/// Parses a `DateTime64` precision token, bounded to [0, `MAX_PRECISION`].
fn precision(token: &str) -> Result<usize> {
    let precision = token
        .parse::<usize>()
        .map_err(|_| Error::TypeDescriptor(format!("invalid precision `{token}`")))?;
    if precision > MAX_PRECISION {
        return Err(Error::TypeDescriptor(format!(
            "precision `{token}` exceeds maximum of {MAX_PRECISION}"
        )));
    }
    Ok(precision)
}

/// Parses a single-quoted timezone token, e.g. `'Asia/Istanbul'`.
fn timezone(token: &str) -> Result<Tz> {
    let name = token
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .ok_or_else(|| Error::TypeDescriptor(format!("timezone `{token}` must be quoted")))?;
    name.parse::<Tz>().map_err(|_| Error::TypeDescriptor(format!("unknown timezone `{name}`")))
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Self::resolve(&TypeDescriptor::parse(s)?) }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::String => "String",
            Self::Date => "Date",
            Self::DateTime(tz) => {
                return if *tz == Tz::UTC {
                    f.write_str("DateTime")
                } else {
                    write!(f, "DateTime('{tz}')")
                };
            }
            Self::DateTime64(precision, tz) => {
                return if *tz == Tz::UTC {
                    write!(f, "DateTime64({precision})")
                } else {
                    write!(f, "DateTime64({precision}, '{tz}')")
                };
            }
        };
        f.write_str(name)
    }
}
