//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, info, instrument};

use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::STDIN_PATH;
use crate::infrastructure::ServiceContainer;

/// What a run writes to the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Html,
    Dependencies,
    AllDependencies,
    Tree,
}

impl Mode {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.dep {
            Mode::Dependencies
        } else if cli.dep_all {
            Mode::AllDependencies
        } else if cli.tree {
            Mode::Tree
        } else {
            Mode::Html
        }
    }
}

pub fn execute(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    if cli.config_template {
        output::info(&Settings::template());
        return Ok(());
    }

    let cwd = std::env::current_dir().ok();
    let mut settings = Settings::load(cwd.as_deref())?;
    apply_cli_overrides(&mut settings, cli);

    if cli.print_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let container = ServiceContainer::new(settings);
    run(&container, cli)
}

/// Command-line flags take precedence over every config layer.
pub fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    settings.strip |= cli.strip;
    settings.verbosity = settings.verbosity.max(cli.verbose);
    if let Some(max_depth) = cli.max_depth {
        settings.max_depth = max_depth;
    }
    if let Some(tag) = &cli.default_tag {
        settings.default_tag = tag.clone();
    }
    for (index, value) in &cli.tokens {
        settings.tokens.insert(index.to_string(), value.clone());
    }
}

/// Compile or report, then write the result in one piece.
#[instrument(level = "debug", skip_all)]
pub fn run(container: &ServiceContainer, cli: &Cli) -> CliResult<()> {
    let (inputs, output_path) = cli.io_paths();
    if inputs.is_empty() {
        return Err(CliError::Usage("no input file given".to_string()));
    }

    let mut session = container.session()?;
    for input in &inputs {
        session.add_input(input.as_str());
    }

    let mode = Mode::from_cli(cli);
    debug!("Mode {:?}, inputs {:?}, output {}", mode, inputs, output_path);
    let rendered = match mode {
        Mode::Html => session.serialize()?,
        Mode::Dependencies => session.dependences()?,
        Mode::AllDependencies => session.dependences_all()?,
        Mode::Tree => session.tree()?,
    };

    write_output(container, &output_path, &rendered)?;
    info!("Wrote {} byte(s) to {}", rendered.len(), output_path);
    Ok(())
}

fn write_output(container: &ServiceContainer, path: &str, content: &str) -> CliResult<()> {
    let result = if path == STDIN_PATH {
        container.fs.write_stdout(content)
    } else {
        container.fs.write(Path::new(path), content)
    };
    result.map_err(|source| CliError::Output {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn given_cli_flags_when_applied_then_override_settings() {
        let cli = Cli::parse_from([
            "dorothy",
            "-s",
            "-vv",
            "--max-depth",
            "7",
            "--default-tag",
            "section",
            "-t",
            "1=b",
            "in",
            "out",
        ]);
        let mut settings = Settings::default();
        settings.tokens.insert("0".into(), "a".into());
        settings.tokens.insert("1".into(), "old".into());

        apply_cli_overrides(&mut settings, &cli);

        assert!(settings.strip);
        assert_eq!(settings.verbosity, 2);
        assert_eq!(settings.max_depth, 7);
        assert_eq!(settings.default_tag, "section");
        let options = settings.to_options().unwrap();
        assert_eq!(options.tokens.get(&0).map(String::as_str), Some("a"));
        assert_eq!(options.tokens.get(&1).map(String::as_str), Some("b"));
    }

    #[test]
    fn given_report_flags_when_selecting_mode_then_matching_mode() {
        assert_eq!(Mode::from_cli(&Cli::parse_from(["dorothy", "a", "-"])), Mode::Html);
        assert_eq!(
            Mode::from_cli(&Cli::parse_from(["dorothy", "-d", "a", "-"])),
            Mode::Dependencies
        );
        assert_eq!(
            Mode::from_cli(&Cli::parse_from(["dorothy", "-D", "a", "-"])),
            Mode::AllDependencies
        );
        assert_eq!(
            Mode::from_cli(&Cli::parse_from(["dorothy", "--tree", "a", "-"])),
            Mode::Tree
        );
    }
}
