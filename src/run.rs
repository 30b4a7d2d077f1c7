//! Routines for running tests.

pub use self::discover::Suite;
pub use self::executor::Executor;
pub use self::filter::Filter;

pub mod discover;
mod executor;
#[cfg(test)] mod executor_tests;
pub mod filter;
pub(crate) mod find_files;

use crate::case::Registry;
use crate::listener::{Console, Listener, Spreader, XmlReport};
use crate::model::Status;
use crate::{Config, Result};

/// Hooks for preparing the environment of a test run.
///
/// Everything is optional. Options set in `override_default_options` are
/// applied before the caller's configuration, which can therefore still
/// override them.
#[allow(unused_variables)]
pub trait Bootstrap {
    /// Adjusts the default options.
    fn override_default_options(&mut self, config: &mut Config) { }

    /// Creates the listener the run reports to.
    fn listener(&mut self, config: &Config) -> Box<dyn Listener> {
        default_listener(config)
    }

    /// Called once before test classes are discovered.
    fn set_up(&mut self) -> Result<()> { Ok(()) }

    /// Called once after the run, even if it failed.
    fn tear_down(&mut self) -> Result<()> { Ok(()) }
}

/// A bootstrap which changes nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultBootstrap;

impl Bootstrap for DefaultBootstrap { }

/// The console, plus an XML report if one was configured.
pub fn default_listener(config: &Config) -> Box<dyn Listener> {
    let console = Console::new().colors(config.colors);

    match config.xml_report {
        Some(ref path) => Box::new(Spreader::default().with(console).with(XmlReport::new(path.clone()))),
        None => Box::new(console),
    }
}

/// Runs all tests according to a given config.
///
/// Returns the status of the run; `Err` means the run was aborted by a
/// configuration or resource error.
///
/// # Parameters
///
/// * `registry` holds the test classes that may be run.
/// * `config_fn` is a function which sets up the test config.
///
pub fn tests<F>(registry: &Registry, config_fn: F) -> Result<Status>
    where F: FnOnce(&mut Config) {
    tests_with(registry, &mut DefaultBootstrap, config_fn)
}

/// Runs all tests, with a bootstrap preparing the run.
pub fn tests_with<F>(registry: &Registry,
                     bootstrap: &mut dyn Bootstrap,
                     config_fn: F) -> Result<Status>
    where F: FnOnce(&mut Config) {
    let config = configure(bootstrap, config_fn);

    bootstrap.set_up()?;

    let mut listener = bootstrap.listener(&config);
    let status = with_listener(registry, &config, &mut *listener);
    let torn_down = bootstrap.tear_down();

    let status = status?;
    torn_down?;
    Ok(status)
}

/// Builds the configuration of a run: defaults, then the bootstrap's
/// overrides, then `config_fn`.
pub fn configure<F>(bootstrap: &mut dyn Bootstrap, config_fn: F) -> Config
    where F: FnOnce(&mut Config) {
    let mut config = Config::default();
    bootstrap.override_default_options(&mut config);
    config_fn(&mut config);
    config
}

/// Runs all tests, reporting to the given listener.
pub fn with_listener(registry: &Registry,
                     config: &Config,
                     listener: &mut dyn Listener) -> Result<Status> {
    let filter = Filter::new(&config.test_filter)?;
    let suites = discover::suites(registry, config)?;

    if suites.iter().all(|suite| suite.classes.is_empty()) {
        warn!("could not find any test classes");
    }

    Executor::new(listener, filter).run(&suites)
}
