//! Command dispatch against a temp project

mod common;

use clap::Parser;

use common::Project;
use dorothy::cli::{commands::run, Cli, CliError};
use dorothy::config::Settings;
use dorothy::exitcode;
use dorothy::infrastructure::ServiceContainer;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("dorothy").chain(args.iter().copied()))
}

#[test]
fn given_input_and_output_when_running_then_html_written_to_file() {
    // Arrange
    let project = Project::new();
    project.file("page.dorothy", "div\n p $0\n");
    let out = project.root.join("page.html");
    let out_arg = out.to_string_lossy().to_string();
    let container = ServiceContainer::with_deps(Settings::default(), project.fs());

    // Act
    run(&container, &cli(&["-t", "0=hi", "page", &out_arg])).unwrap();

    // Assert
    let html = std::fs::read_to_string(&out).unwrap();
    assert_eq!(html, "<div>\n <p>hi</p>\n</div>\n");
}

#[test]
fn given_single_path_when_running_then_output_goes_to_stdout() {
    let project = Project::new();
    project.file("page.dorothy", "br\n");
    let fs = project.fs();
    let settings = Settings {
        strip: true,
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(settings, fs.clone());

    run(&container, &cli(&["page"])).unwrap();

    assert_eq!(*fs.stdout.lock().unwrap(), "<br/>\n");
}

#[test]
fn given_dependency_flag_when_running_then_report_written() {
    let project = Project::new();
    project.file("a.dorothy", "% include b\n");
    project.file("b.dorothy", "p\n");
    let fs = project.fs();
    let container = ServiceContainer::with_deps(Settings::default(), fs.clone());

    run(&container, &cli(&["-d", "a", "-"])).unwrap();

    assert_eq!(*fs.stdout.lock().unwrap(), "a.dorothy: b.dorothy\n");
}

#[test]
fn given_compile_error_when_running_then_no_output_file_and_dataerr() {
    // Arrange
    let project = Project::new();
    project.file("page.dorothy", "p ok\n% clone missing\n");
    let out = project.root.join("page.html");
    let out_arg = out.to_string_lossy().to_string();
    let container = ServiceContainer::with_deps(Settings::default(), project.fs());

    // Act
    let err = run(&container, &cli(&["page", &out_arg])).unwrap_err();

    // Assert
    assert!(matches!(err, CliError::Application(_)));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(!out.exists());
}

#[test]
fn given_missing_input_when_running_then_noinput() {
    let project = Project::new();
    let container = ServiceContainer::with_deps(Settings::default(), project.fs());

    let err = run(&container, &cli(&["nothing", "-"])).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_unwritable_output_when_running_then_cantcreat() {
    let project = Project::new();
    project.file("page.dorothy", "p\n");
    let out = project.root.join("missing-dir").join("page.html");
    let out_arg = out.to_string_lossy().to_string();
    let container = ServiceContainer::with_deps(Settings::default(), project.fs());

    let err = run(&container, &cli(&["page", &out_arg])).unwrap_err();

    assert!(matches!(err, CliError::Output { .. }));
    assert_eq!(err.exit_code(), exitcode::CANTCREAT);
}
