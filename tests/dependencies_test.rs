//! Dependency reports: direct, all and tree

mod common;

use common::Project;
use dorothy::domain::Options;

fn chain(project: &Project) {
    project.file("a.dorothy", "p a\n% include b\n");
    project.file("b.dorothy", "div\n % include c\n");
    project.file("c.dorothy", "p c\n");
}

#[test]
fn given_include_chain_when_reporting_direct_then_transitive_deps_listed() {
    // Arrange
    let project = Project::new();
    chain(&project);
    let mut session = project.session(Options::default());
    session.add_input("a");

    // Act
    let report = session.dependences().unwrap();

    // Assert
    assert_eq!(report, "a.dorothy: b.dorothy c.dorothy\n");
}

#[test]
fn given_include_chain_when_reporting_all_then_one_line_per_file() {
    let project = Project::new();
    chain(&project);
    let mut session = project.session(Options::default());
    session.add_input("a");

    let report = session.dependences_all().unwrap();

    assert_eq!(
        report,
        "a.dorothy: b.dorothy\nb.dorothy: c.dorothy\nc.dorothy:\n"
    );
}

#[test]
fn given_diamond_when_reporting_direct_then_depth_first_document_order_without_repeats() {
    // Arrange
    let project = Project::new();
    project.file("a.dorothy", "% include b\n% include c\n% include b\n");
    project.file("b.dorothy", "% include d\n");
    project.file("c.dorothy", "% include d\n");
    project.file("d.dorothy", "p d\n");
    let mut session = project.session(Options::default());
    session.add_input("a");

    // Act
    let direct = session.dependences().unwrap();
    let all = session.dependences_all().unwrap();

    // Assert
    assert_eq!(direct, "a.dorothy: b.dorothy d.dorothy c.dorothy\n");
    assert_eq!(
        all,
        "a.dorothy: b.dorothy c.dorothy\nb.dorothy: d.dorothy\nd.dorothy:\nc.dorothy: d.dorothy\n"
    );
}

#[test]
fn given_include_cycle_when_reporting_then_terminates_and_excludes_root() {
    let project = Project::new();
    project.file("a.dorothy", "% include b\n");
    project.file("b.dorothy", "% include a\n");
    let mut session = project.session(Options::default());
    session.add_input("a");

    let direct = session.dependences().unwrap();
    let all = session.dependences_all().unwrap();

    assert_eq!(direct, "a.dorothy: b.dorothy\n");
    assert_eq!(all, "a.dorothy: b.dorothy\nb.dorothy: a.dorothy\n");
}

#[test]
fn given_nested_directory_when_reporting_then_paths_relative_to_working_directory() {
    let project = Project::new();
    project.file("site/index.dorothy", "% include parts/nav\n");
    project.file("site/parts/nav.dorothy", "nav\n");
    let mut session = project.session(Options::default());
    session.add_input("site/index");

    let report = session.dependences().unwrap();

    assert_eq!(report, "site/index.dorothy: site/parts/nav.dorothy\n");
}

#[test]
fn given_two_inputs_when_reporting_direct_then_one_line_per_input() {
    let project = Project::new();
    chain(&project);
    let mut session = project.session(Options::default());
    session.add_input("c");
    session.add_input("b");

    let report = session.dependences().unwrap();

    assert_eq!(report, "c.dorothy:\nb.dorothy: c.dorothy\n");
}

#[test]
fn given_cycle_when_printing_tree_then_recursive_branch_marked() {
    // Arrange
    let project = Project::new();
    project.file("a.dorothy", "% include b\n% include c\n");
    project.file("b.dorothy", "% include a\n");
    project.file("c.dorothy", "p\n");
    let mut session = project.session(Options::default());
    session.add_input("a");

    // Act
    let tree = session.tree().unwrap();

    // Assert
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "a.dorothy");
    assert!(lines[1].ends_with("b.dorothy"));
    assert!(lines[2].ends_with("a.dorothy (recursive)"));
    assert!(lines[3].ends_with("c.dorothy"));
}
