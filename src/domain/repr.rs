//! Reading and writing the canonical constructor form of a version,
//! `Ctor('pkg', 1, 2, 3, release_candidate=1, dev=2)`.
//!
//! Only literal calls are understood: quoted strings, integers and `None`.

use regex::Regex;

use crate::domain::version::{Major, Version};
use crate::error::{IncrementalError, Result};

/// A constructor call recovered from text.
#[derive(Debug, Clone)]
pub struct ParsedCall {
    /// Name the call was written with, e.g. `VersionValue` or `Version`.
    pub constructor: String,
    pub version: Version,
    /// The call used the deprecated `prerelease=` keyword.
    pub used_prerelease_alias: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Int(u32),
    None,
}

/// Quotes a string the way the canonical form expects: single quotes unless
/// the text itself contains a single quote and no double quote.
pub fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        if c == '\\' || c == delimiter {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(delimiter);
    out
}

/// Parses `Ctor(args...)` into a [`Version`].
///
/// Positional arguments are `package, major, minor, micro[, release_candidate]`.
/// Keywords `release_candidate` (or `releaseCandidate`), `prerelease`,
/// `post` and `dev` are accepted.
///
/// # Errors
/// [`IncrementalError::InvalidConstruction`] when the text is not such a call
/// or the values break a version invariant.
pub fn parse_call(text: &str) -> Result<ParsedCall> {
    let call = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\((.*)\)\s*$")
        .map_err(|e| IncrementalError::invalid(e.to_string()))?;
    let captures = call
        .captures(text)
        .ok_or_else(|| IncrementalError::invalid(format!("not a version call: {}", text.trim())))?;
    let constructor = captures[1].to_string();
    let arguments = split_arguments(&captures[2])?;

    let mut positional = Vec::new();
    let mut release_candidate = None;
    let mut prerelease = None;
    let mut post = None;
    let mut dev = None;
    let mut seen_keyword = false;

    for argument in &arguments {
        match split_keyword(argument) {
            Some((key, value)) => {
                seen_keyword = true;
                let value = optional_int(key, parse_literal(value)?)?;
                match key {
                    "release_candidate" | "releaseCandidate" => release_candidate = value,
                    "prerelease" => prerelease = value,
                    "post" => post = value,
                    "dev" => dev = value,
                    other => {
                        return Err(IncrementalError::invalid(format!(
                            "unknown version argument '{}'",
                            other
                        )))
                    }
                }
            }
            None => {
                if seen_keyword {
                    return Err(IncrementalError::invalid(
                        "positional argument follows keyword argument",
                    ));
                }
                positional.push(parse_literal(argument)?);
            }
        }
    }

    let mut positional = positional.into_iter();
    let package = match positional.next() {
        Some(Literal::Str(package)) => package,
        _ => return Err(IncrementalError::invalid("package name must be a string")),
    };
    let major = match positional.next() {
        Some(Literal::Int(n)) => Major::Release(n),
        Some(Literal::Str(s)) if s == "NEXT" => Major::Next,
        _ => return Err(IncrementalError::invalid("major must be an integer or 'NEXT'")),
    };
    let minor = required_int("minor", positional.next())?;
    let micro = required_int("micro", positional.next())?;
    if let Some(extra) = positional.next() {
        if release_candidate.is_some() {
            return Err(IncrementalError::invalid(
                "release_candidate given both positionally and by keyword",
            ));
        }
        release_candidate = optional_int("release_candidate", extra)?;
    }
    if positional.next().is_some() {
        return Err(IncrementalError::invalid("too many positional arguments"));
    }

    let mut builder = Version::builder(package, 0, minor, micro).with_major(major);
    if let Some(rc) = release_candidate {
        builder = builder.release_candidate(rc);
    }
    if let Some(p) = prerelease {
        builder = builder.legacy_prerelease(p);
    }
    if let Some(p) = post {
        builder = builder.post(p);
    }
    if let Some(d) = dev {
        builder = builder.dev(d);
    }

    Ok(ParsedCall {
        constructor,
        version: builder.build()?,
        used_prerelease_alias: prerelease.is_some(),
    })
}

/// Splits on top-level commas, leaving quoted text intact.
fn split_arguments(inner: &str) -> Result<Vec<String>> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut quote_char: Option<char> = None;
    let mut escaped = false;

    for c in inner.chars() {
        match quote_char {
            Some(q) => {
                current.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote_char = None;
                }
            }
            None => match c {
                '\'' | '"' => {
                    quote_char = Some(c);
                    current.push(c);
                }
                ',' => arguments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }

    if quote_char.is_some() {
        return Err(IncrementalError::invalid("unterminated string in version call"));
    }

    arguments.push(current);
    let mut arguments: Vec<String> = arguments.into_iter().map(|a| a.trim().to_string()).collect();

    // A single trailing comma is allowed.
    if arguments.last().is_some_and(|a| a.is_empty()) && arguments.len() > 1 {
        arguments.pop();
    }
    if arguments.iter().any(|a| a.is_empty()) {
        return Err(IncrementalError::invalid("empty argument in version call"));
    }
    Ok(arguments)
}

fn split_keyword(argument: &str) -> Option<(&str, &str)> {
    if argument.starts_with('\'') || argument.starts_with('"') {
        return None;
    }
    let (key, value) = argument.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_literal(token: &str) -> Result<Literal> {
    let token = token.trim();
    if token == "None" {
        return Ok(Literal::None);
    }

    let mut chars = token.chars();
    if let Some(q @ ('\'' | '"')) = chars.next() {
        if token.len() < 2 || !token.ends_with(q) {
            return Err(IncrementalError::invalid(format!("bad string literal {}", token)));
        }
        let body = &token[1..token.len() - 1];
        let mut out = String::with_capacity(body.len());
        let mut escaped = false;
        for c in body.chars() {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                out.push(c);
            }
        }
        return Ok(Literal::Str(out));
    }

    token
        .parse::<u32>()
        .map(Literal::Int)
        .map_err(|_| IncrementalError::invalid(format!("expected an integer, found {}", token)))
}

fn required_int(name: &str, literal: Option<Literal>) -> Result<u32> {
    match literal {
        Some(Literal::Int(n)) => Ok(n),
        _ => Err(IncrementalError::invalid(format!("{} must be an integer", name))),
    }
}

fn optional_int(name: &str, literal: Literal) -> Result<Option<u32>> {
    match literal {
        Literal::Int(n) => Ok(Some(n)),
        Literal::None => Ok(None),
        Literal::Str(_) => Err(IncrementalError::invalid(format!(
            "{} must be an integer",
            name
        ))),
    }
}
