//! Sample test classes bundled with the runner.
//!
//! Run them with `rudiment --testbase=src/samples`.

pub use self::bootstrap::SampleBootstrap;

mod bootstrap;
mod database;
mod providers;
mod sample;
