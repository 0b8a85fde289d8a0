//! Token substitution, HTML escaping and the directive argument tokenizer.
//!
//! All scanning here works on `char`s (Unicode scalar values), never on raw bytes.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::domain::error::{DomainError, DomainResult};

/// Numbered substitution values bound at an include or clone site.
pub type Tokens = BTreeMap<usize, String>;

/// Marker introducing a positional token reference (`$1` or `$1$`).
pub const TOKEN_MARKER: char = '$';

/// Build a fresh binding scope, numbering `values` from 0.
pub fn bind(values: &[String]) -> Tokens {
    values.iter().cloned().enumerate().collect()
}

/// Render a binding scope for diagnostics: `[0=a, 1=b]`.
pub fn format_tokens(tokens: &Tokens) -> String {
    format!(
        "[{}]",
        tokens.iter().map(|(k, v)| format!("{}={}", k, v)).join(", ")
    )
}

/// Replace `$N` references with bound values.
///
/// A `$` followed by decimal digits is replaced by the value bound at that
/// index, or dropped when nothing is bound there. One `$` directly after the
/// digits closes the reference and is consumed. A `$` without digits is kept.
pub fn replace_tokens(input: &str, tokens: &Tokens) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != TOKEN_MARKER {
            out.push(c);
            continue;
        }

        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }

        if digits.is_empty() {
            out.push(TOKEN_MARKER);
            continue;
        }
        if chars.peek() == Some(&TOKEN_MARKER) {
            chars.next();
        }
        if let Some(value) = digits.parse::<usize>().ok().and_then(|i| tokens.get(&i)) {
            out.push_str(value);
        }
    }
    out
}

/// Escape the five HTML-significant characters.
pub fn encode_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Map the character following a backslash to its escaped value.
pub(crate) fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '0' => '\0',
        other => other,
    }
}

pub(crate) fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split directive arguments into tokens.
///
/// Tokens are separated by spaces or tabs. Single or double quotes group
/// text (quoted and unquoted parts of one token concatenate, `""` is an
/// empty token) and backslash escapes work inside and outside quotes.
pub fn split_arguments(args: &str) -> DomainResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in args.chars() {
        if escaped {
            current.push(unescape(c));
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            started = true;
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                started = true;
            }
            None if is_blank(c) => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            None => {
                current.push(c);
                started = true;
            }
        }
    }

    if let Some(quote) = quote {
        return Err(DomainError::UnterminatedQuote { quote });
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}
