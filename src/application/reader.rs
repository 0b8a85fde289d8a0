//! Logical line cursor over a source text.

use crate::domain::tokens::is_blank;

/// Physical line ending that joins the line with the next one.
pub const CONTINUATION: char = '\\';

/// One logical (joined, non-blank) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based number of the first physical line
    pub number: usize,
    /// Leading space/tab count plus one
    pub depth: usize,
    /// Line content without indentation
    pub text: String,
}

/// Yields logical lines lazily; CRLF endings are accepted.
pub struct LineCursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> LineCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
        }
    }
}

/// An odd run of trailing backslashes marks a continuation.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == CONTINUATION).count() % 2 == 1
}

impl Iterator for LineCursor<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, first) = self.lines.next()?;
            let mut joined = String::from(first);
            while continues(&joined) {
                joined.pop();
                match self.lines.next() {
                    Some((_, next)) => joined.push_str(next),
                    None => break,
                }
            }

            let text = joined.trim_start_matches(is_blank);
            if text.trim().is_empty() {
                continue;
            }
            let indent = joined.len() - text.len();
            return Some(LogicalLine {
                number: index + 1,
                depth: indent + 1,
                text: text.to_string(),
            });
        }
    }
}
