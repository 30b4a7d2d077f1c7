//! A rudimentary xUnit style test execution framework.
//!
//! Test classes implement `TestCase`, list their methods with `method!` and
//! are registered with `register!` (or collected into a `Registry` by hand).
//! `run::tests` discovers the classes defined under the configured testbases,
//! runs every method matching the test filter and reports each step to a
//! `Listener`.

pub use self::case::{MethodBody, Registry, TestCase, TestClass, TestMethod};
pub use self::config::Config;
pub use self::context::{Context, OutputCapture, RunState};
pub use self::errors::*;
pub use self::exception::{Exception, Outcome};
pub use self::listener::Listener;
pub use self::model::{AssertionEvent, CallSite, MethodInfo, Status};
pub use self::provider::{AssertionProvider, Providers};
pub use self::value::Value;

#[doc(hidden)]
pub use inventory;

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[macro_use]
mod value;
#[macro_use]
mod case;

mod callsite;
pub mod config;
mod context;
mod errors;
pub mod exception;
pub mod listener;
mod model;
pub mod provider;
pub mod run;
mod util;
