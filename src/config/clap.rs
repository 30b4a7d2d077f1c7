//! Routines for exposing a command line interface via the `clap` crate.
//!
//! These routines can be used to update `Config` objects with automatic CLI arguments.

use crate::case::Registry;
use crate::run::discover;
use crate::{Config, Result};
use clap::{App, Arg, ArgMatches, SubCommand};
use std::io::Write;

/// The things the `show` subcommand can print.
const SHOW_OPTION_VALUES: &'static [(&'static str, fn(&Config, &Registry, &mut dyn Write) -> Result<()>)] = &[
    ("test-classes", |config, registry, writer| {
        for suite in discover::suites(registry, config)? {
            writeln!(writer, "{}", suite.path.display())?;

            for class in suite.classes {
                writeln!(writer, "  {} ({})", class.name, class.file)?;
            }
        }

        Ok(())
    }),
    ("config", |config, _, writer| {
        writeln!(writer, "{:#?}", config)?;
        Ok(())
    }),
];

lazy_static! {
    static ref SHOW_SUBCOMMAND_WHAT_OPTION_HELP: String = {
        let show_option_vals = SHOW_OPTION_VALUES.iter().map(|d| format!("    - {}", d.0)).collect::<Vec<_>>();
        let show_option_vals = show_option_vals.join("\n");

        format!("Show only a specific value. Possible values are:\n{}\nIf this value is not specified, all values are shown", show_option_vals)
    };
}

/// What the command line asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Run the tests.
    Run,
    /// Print information about the test suite and exit.
    Show,
}

/// Mounts the test runner's arguments into a `clap` CLI application.
pub fn mount_inside_app<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app
        .arg(Arg::with_name("testbase")
            .long("testbase")
            .takes_value(true)
            .value_name("PATH")
            .multiple(true)
            .number_of_values(1)
            .help("Adds a testbase: a source file or a directory to look for test classes in. Every testbase forms a suite"))
        .arg(Arg::with_name("testfilter")
            .long("testfilter")
            .takes_value(true)
            .value_name("REGEX")
            .help("Only runs test methods whose 'Class->method' name matches the expression. Defaults to methods ending in 'test'"))
        .arg(Arg::with_name("xml-report")
            .long("xml-report")
            .takes_value(true)
            .value_name("FILE")
            .help("Additionally writes an xUnit style XML report to the given file"))
        .arg(Arg::with_name("no-color")
            .long("no-color")
            .help("Disables colored console output"))
        .subcommand(SubCommand::with_name("show")
            .about("Shows information about the test suite, without running tests")
            .arg(Arg::with_name("what")
                .takes_value(true)
                .value_name("WHAT")
                .help(&SHOW_SUBCOMMAND_WHAT_OPTION_HELP)))
}

/// Parses command line arguments from `clap` into a destination `Config` object.
pub fn parse_arguments(matches: &ArgMatches,
                       destination_config: &mut Config) -> Action {
    if let Some(test_paths) = matches.values_of("testbase") {
        for test_path in test_paths {
            destination_config.add_search_path(test_path);
        }
    }

    if let Some(filter) = matches.value_of("testfilter") {
        destination_config.set_test_filter(filter);
    }

    if let Some(path) = matches.value_of("xml-report") {
        destination_config.set_xml_report(path);
    }

    if matches.is_present("no-color") {
        destination_config.colors = false;
    }

    action(matches)
}

/// What the command line asks for, without touching any configuration.
pub fn action(matches: &ArgMatches) -> Action {
    if matches.subcommand_matches("show").is_some() {
        Action::Show
    } else {
        Action::Run
    }
}

/// Prints what the `show` subcommand asked for.
pub fn show(matches: &ArgMatches,
            config: &Config,
            registry: &Registry,
            writer: &mut dyn Write) -> Result<()> {
    let what = matches.subcommand_matches("show").and_then(|m| m.value_of("what"));

    let what_fns: Vec<_> = match what {
        Some(what) => {
            match SHOW_OPTION_VALUES.iter().find(|(name, _)| *name == what) {
                Some(entry) => vec![entry],
                None => return Err(format!("unknown show value: '{}'", what).into()),
            }
        },
        None => SHOW_OPTION_VALUES.iter().collect(),
    };

    let show_labels = what_fns.len() > 1;
    for (label, what_fn) in what_fns {
        if show_labels {
            writeln!(writer, "=================================================================")?;
            writeln!(writer, "{}:", label)?;
            writeln!(writer, "=================================================================")?;
            writeln!(writer, "")?;
        }

        what_fn(config, registry, writer)?;

        if show_labels {
            writeln!(writer, "")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn app() -> App<'static, 'static> {
        mount_inside_app(App::new("rudiment"))
    }

    #[test]
    fn options_are_parsed_into_the_config() {
        let matches = app().get_matches_from(vec![
            "rudiment", "--testbase=src", "--testbase", "tests", "--testfilter=other", "--xml-report=report.xml", "--no-color",
        ]);
        let mut config = Config::default();

        assert_eq!(parse_arguments(&matches, &mut config), Action::Run);
        assert_eq!(config.test_paths, vec![std::path::PathBuf::from("src"), std::path::PathBuf::from("tests")]);
        assert_eq!(config.test_filter, "other");
        assert_eq!(config.xml_report, Some(std::path::PathBuf::from("report.xml")));
        assert!(!config.colors);
    }

    #[test]
    fn action_ignores_the_options() {
        assert_eq!(action(&app().get_matches_from(vec!["rudiment", "--testbase=src"])), Action::Run);
        assert_eq!(action(&app().get_matches_from(vec!["rudiment", "show"])), Action::Show);
    }

    #[test]
    fn show_prints_the_config() {
        let matches = app().get_matches_from(vec!["rudiment", "--testbase=src", "show", "config"]);
        let mut config = Config::default();
        assert_eq!(parse_arguments(&matches, &mut config), Action::Show);

        let mut out = Vec::new();
        show(&matches, &config, &Registry::new(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("test_paths"));
        assert!(!text.contains("====="));
    }

    #[test]
    fn unknown_show_values_are_errors() {
        let matches = app().get_matches_from(vec!["rudiment", "show", "everything"]);
        let mut out = Vec::new();

        assert!(show(&matches, &Config::default(), &Registry::new(), &mut out).is_err());
    }
}
