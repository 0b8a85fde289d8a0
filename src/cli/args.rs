//! CLI argument definitions using clap

use clap::{Parser, ValueHint};

use crate::domain::STDIN_PATH;

/// Compile indentation-structured dorothy templates to HTML
#[derive(Parser, Debug)]
#[command(name = "dorothy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input files followed by the output file (`-` for stdin/stdout)
    #[arg(value_hint = ValueHint::FilePath, required_unless_present_any = ["print_config", "config_template", "completion"])]
    pub paths: Vec<String>,

    /// Strip indentation and comments from the output
    #[arg(short, long)]
    pub strip: bool,

    /// Print direct dependencies of every input instead of HTML
    #[arg(short = 'd', long = "dep", conflicts_with_all = ["dep_all", "tree"])]
    pub dep: bool,

    /// Print immediate dependencies of every parsed file instead of HTML
    #[arg(short = 'D', long = "dep-all", conflicts_with = "tree")]
    pub dep_all: bool,

    /// Print the include hierarchy of every input instead of HTML
    #[arg(long)]
    pub tree: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace, -vvvv trace comments in output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Maximum tree depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Tag used when a tag line omits the name
    #[arg(long, value_name = "NAME")]
    pub default_tag: Option<String>,

    /// Initial token binding, e.g. `-t 0=Title` (repeatable)
    #[arg(short, long = "token", value_name = "N=VALUE", value_parser = parse_token)]
    pub tokens: Vec<(usize, String)>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print a commented config file template and exit
    #[arg(long)]
    pub config_template: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completion: Option<clap_complete::Shell>,
}

impl Cli {
    /// Split positionals into inputs and output; a single path means
    /// output to stdout.
    pub fn io_paths(&self) -> (Vec<String>, String) {
        match self.paths.split_last() {
            Some((output, inputs)) if !inputs.is_empty() => (inputs.to_vec(), output.clone()),
            Some((input, _)) => (vec![input.clone()], STDIN_PATH.to_string()),
            None => (Vec::new(), STDIN_PATH.to_string()),
        }
    }
}

fn parse_token(s: &str) -> Result<(usize, String), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got '{}'", s))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("token index must be a number: '{}'", index))?;
    Ok((index, value.to_string()))
}
