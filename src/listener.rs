//! Observers of test execution.
//!
//! Everything that reports on a run is driven through the `Listener` trait.
//! The executor calls it in a strict order:
//!
//! ```text
//! set_up_suite
//!   set_up_class
//!     set_up_test, set_up_test_done, assertion_*, unexpected_exception?,
//!     tear_down_test, tear_down_test_done          (once per matching method)
//!     skipped_test                                 (once per other method)
//!   tear_down_class
//! tear_down_suite
//! ```
//!
//! Listeners never influence the outcome of a test. An error returned by a
//! listener is a resource failure and aborts the run.

pub use self::console::Console;
pub use self::spreader::Spreader;
pub use self::xml::XmlReport;

use crate::exception::Exception;
use crate::model::AssertionEvent;
use crate::Result;

use std::path::{Path, PathBuf};

mod console;
mod spreader;
mod xml;

/// An object which listens to events that occur during a test run.
#[allow(unused_variables)]
pub trait Listener {
    /// Called before the classes of a testbase are run.
    fn set_up_suite(&mut self, path: &Path) -> Result<()> { Ok(()) }

    /// Called after every class of a testbase has run.
    fn tear_down_suite(&mut self, path: &Path) -> Result<()> { Ok(()) }

    fn set_up_class(&mut self, class: &str) -> Result<()> { Ok(()) }

    fn tear_down_class(&mut self, class: &str) -> Result<()> { Ok(()) }

    /// Called in place of the whole test sequence for methods not matching the filter.
    fn skipped_test(&mut self, class: &str, method: &str) -> Result<()> { Ok(()) }

    /// Called before the fixture of a test is set up.
    ///
    /// `file` and `line` locate the registration of the method.
    fn set_up_test(&mut self, class: &str, method: &str, file: &str, line: u32) -> Result<()> { Ok(()) }

    /// Called once the fixture is set up, with the output it produced.
    fn set_up_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> { Ok(()) }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> { Ok(()) }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> { Ok(()) }

    /// Called when a test raised an exception it did not declare.
    fn unexpected_exception(&mut self, class: &str, method: &str, exception: &Exception) -> Result<()> { Ok(()) }

    /// Called after the test body, with the output it produced.
    fn tear_down_test(&mut self, class: &str, method: &str, output: &str) -> Result<()> { Ok(()) }

    /// Called once the fixture is torn down, with the output that produced.
    fn tear_down_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> { Ok(()) }
}

impl<'a, L> Listener for &'a mut L where L: Listener + ?Sized {
    fn set_up_suite(&mut self, path: &Path) -> Result<()> {
        (**self).set_up_suite(path)
    }

    fn tear_down_suite(&mut self, path: &Path) -> Result<()> {
        (**self).tear_down_suite(path)
    }

    fn set_up_class(&mut self, class: &str) -> Result<()> {
        (**self).set_up_class(class)
    }

    fn tear_down_class(&mut self, class: &str) -> Result<()> {
        (**self).tear_down_class(class)
    }

    fn skipped_test(&mut self, class: &str, method: &str) -> Result<()> {
        (**self).skipped_test(class, method)
    }

    fn set_up_test(&mut self, class: &str, method: &str, file: &str, line: u32) -> Result<()> {
        (**self).set_up_test(class, method, file, line)
    }

    fn set_up_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        (**self).set_up_test_done(class, method, output)
    }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> {
        (**self).assertion_success(event)
    }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> {
        (**self).assertion_failure(event)
    }

    fn unexpected_exception(&mut self, class: &str, method: &str, exception: &Exception) -> Result<()> {
        (**self).unexpected_exception(class, method, exception)
    }

    fn tear_down_test(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        (**self).tear_down_test(class, method, output)
    }

    fn tear_down_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        (**self).tear_down_test_done(class, method, output)
    }
}

impl<L> Listener for Box<L> where L: Listener + ?Sized {
    fn set_up_suite(&mut self, path: &Path) -> Result<()> {
        (**self).set_up_suite(path)
    }

    fn tear_down_suite(&mut self, path: &Path) -> Result<()> {
        (**self).tear_down_suite(path)
    }

    fn set_up_class(&mut self, class: &str) -> Result<()> {
        (**self).set_up_class(class)
    }

    fn tear_down_class(&mut self, class: &str) -> Result<()> {
        (**self).tear_down_class(class)
    }

    fn skipped_test(&mut self, class: &str, method: &str) -> Result<()> {
        (**self).skipped_test(class, method)
    }

    fn set_up_test(&mut self, class: &str, method: &str, file: &str, line: u32) -> Result<()> {
        (**self).set_up_test(class, method, file, line)
    }

    fn set_up_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        (**self).set_up_test_done(class, method, output)
    }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> {
        (**self).assertion_success(event)
    }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> {
        (**self).assertion_failure(event)
    }

    fn unexpected_exception(&mut self, class: &str, method: &str, exception: &Exception) -> Result<()> {
        (**self).unexpected_exception(class, method, exception)
    }

    fn tear_down_test(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        (**self).tear_down_test(class, method, output)
    }

    fn tear_down_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        (**self).tear_down_test_done(class, method, output)
    }
}

/// A listener event, as recorded by `Recorder`.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    SetUpSuite(PathBuf),
    TearDownSuite(PathBuf),
    SetUpClass(String),
    TearDownClass(String),
    SkippedTest { class: String, method: String },
    SetUpTest { class: String, method: String, file: String, line: u32 },
    SetUpTestDone { class: String, method: String, output: String },
    AssertionSuccess(AssertionEvent),
    AssertionFailure(AssertionEvent),
    UnexpectedException { class: String, method: String, exception: Exception },
    TearDownTest { class: String, method: String, output: String },
    TearDownTestDone { class: String, method: String, output: String },
}

/// A listener which keeps every event it sees, in order.
///
/// Mostly useful for testing test classes and other listeners.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    events: Vec<Event>,
}

impl Event {
    /// Whether this is an assertion outcome, successful or not.
    pub fn is_assertion(&self) -> bool {
        match *self {
            Event::AssertionSuccess(..) | Event::AssertionFailure(..) => true,
            _ => false,
        }
    }
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// The number of successful and failed assertions recorded.
    pub fn assertion_counts(&self) -> (usize, usize) {
        self.events.iter().fold((0, 0), |(succeeded, failed), event| match *event {
            Event::AssertionSuccess(..) => (succeeded + 1, failed),
            Event::AssertionFailure(..) => (succeeded, failed + 1),
            _ => (succeeded, failed),
        })
    }

    fn push(&mut self, event: Event) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}

impl Listener for Recorder {
    fn set_up_suite(&mut self, path: &Path) -> Result<()> {
        self.push(Event::SetUpSuite(path.to_owned()))
    }

    fn tear_down_suite(&mut self, path: &Path) -> Result<()> {
        self.push(Event::TearDownSuite(path.to_owned()))
    }

    fn set_up_class(&mut self, class: &str) -> Result<()> {
        self.push(Event::SetUpClass(class.to_owned()))
    }

    fn tear_down_class(&mut self, class: &str) -> Result<()> {
        self.push(Event::TearDownClass(class.to_owned()))
    }

    fn skipped_test(&mut self, class: &str, method: &str) -> Result<()> {
        self.push(Event::SkippedTest { class: class.to_owned(), method: method.to_owned() })
    }

    fn set_up_test(&mut self, class: &str, method: &str, file: &str, line: u32) -> Result<()> {
        self.push(Event::SetUpTest {
            class: class.to_owned(),
            method: method.to_owned(),
            file: file.to_owned(),
            line,
        })
    }

    fn set_up_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        self.push(Event::SetUpTestDone { class: class.to_owned(), method: method.to_owned(), output: output.to_owned() })
    }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> {
        self.push(Event::AssertionSuccess(event.clone()))
    }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> {
        self.push(Event::AssertionFailure(event.clone()))
    }

    fn unexpected_exception(&mut self, class: &str, method: &str, exception: &Exception) -> Result<()> {
        self.push(Event::UnexpectedException {
            class: class.to_owned(),
            method: method.to_owned(),
            exception: exception.clone(),
        })
    }

    fn tear_down_test(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        self.push(Event::TearDownTest { class: class.to_owned(), method: method.to_owned(), output: output.to_owned() })
    }

    fn tear_down_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        self.push(Event::TearDownTestDone { class: class.to_owned(), method: method.to_owned(), output: output.to_owned() })
    }
}
