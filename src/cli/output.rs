//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print a located compile diagnostic (already carries its level) in red
pub fn diagnostic(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().red());
}

/// Print plain output (no color, for generated data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
