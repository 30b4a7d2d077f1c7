//! The test execution engine.
//!
//! Runs suites class by class and method by method, strictly in sequence,
//! and drives the listener through the whole event protocol.

use super::discover::Suite;
use super::filter::Filter;
use crate::callsite::Frame;
use crate::case::{Instance, TestClass};
use crate::context::{Context, RunState, UNDEFINED_OPERATION_KIND};
use crate::exception::{Exception, Outcome};
use crate::listener::Listener;
use crate::model::{CallSite, MethodInfo, Status};
use crate::provider::Providers;
use crate::Result;

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    /// Set while test code runs inside `guarded` on this thread.
    static GUARDED: Cell<bool> = Cell::new(false);
}

static QUIET_PANIC_HOOK: Once = Once::new();

/// Runs test classes against a listener.
pub struct Executor<'l> {
    listener: &'l mut dyn Listener,
    filter: Filter,
    state: RunState,
}

impl<'l> Executor<'l> {
    pub fn new(listener: &'l mut dyn Listener, filter: Filter) -> Self {
        Executor { listener, filter, state: RunState::default() }
    }

    /// Runs every suite, returning whether any assertion failed.
    ///
    /// Expectations and provider registrations of all classes with selected
    /// methods are checked up front, so an ambiguous declaration aborts the
    /// run before any test executes.
    pub fn run(&mut self, suites: &[Suite]) -> Result<Status> {
        self.validate(suites)?;

        for suite in suites {
            self.run_suite(suite)?;
        }

        Ok(self.status())
    }

    /// The status of everything run so far.
    pub fn status(&self) -> Status {
        if self.state.failed { Status::Failed } else { Status::Passed }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    fn validate(&self, suites: &[Suite]) -> Result<()> {
        for class in suites.iter().flat_map(|s| s.classes.iter()) {
            let mut selected = false;

            for method in class.methods() {
                if self.filter.matches(class.name, method.name) {
                    method.expectation(class.name)?;
                    selected = true;
                }
            }

            // Ambiguous provider operations are rejected at registration.
            if selected {
                class.instantiate().providers(&mut Providers::new())?;
            }
        }
        Ok(())
    }

    fn run_suite(&mut self, suite: &Suite) -> Result<()> {
        debug!("running suite {} with {} classes", suite.path.display(), suite.classes.len());

        self.listener.set_up_suite(&suite.path)?;
        for class in suite.classes.iter() {
            self.run_class(class)?;
        }
        self.listener.tear_down_suite(&suite.path)
    }

    /// Runs the methods of a class which match the filter.
    pub fn run_class(&mut self, class: &TestClass) -> Result<()> {
        self.listener.set_up_class(class.name)?;

        let mut instance = class.instantiate();
        let mut providers = Providers::new();
        instance.providers(&mut providers)?;

        for method in class.methods() {
            if self.filter.matches(class.name, method.name) {
                self.listener.set_up_test(class.name, method.name, method.file, method.line)?;
                self.run_test(class.name, &mut *instance, &providers, &method)?;
            } else {
                trace!("skipping {}->{}", class.name, method.name);
                self.listener.skipped_test(class.name, method.name)?;
            }
        }

        self.listener.tear_down_class(class.name)
    }

    /// The per-test protocol: fixture, body, outcome classification, teardown.
    fn run_test(&mut self,
                class: &str,
                instance: &mut dyn Instance,
                providers: &Providers,
                method: &MethodInfo) -> Result<()> {
        let expected = method.expectation(class)?;
        let name = method.name;
        let site = CallSite {
            class: class.to_owned(),
            method: name.to_owned(),
            file: method.file.to_owned(),
            line: method.line,
        };

        let mut t = Context::new(class, &mut *self.listener, &mut self.state, providers);

        let set_up = guarded(&mut t, Frame::new("set_up", method.file, method.line), |t| instance.set_up(t));
        let set_up_output = t.take_output();
        t.emit(|l| l.set_up_test_done(class, name, &set_up_output));
        check(&mut t)?;

        let outcome = match set_up {
            Ok(()) => guarded(&mut t, Frame::new(name, method.file, method.line), |t| {
                instance.run(name, t).unwrap_or_else(|| {
                    Err(Exception::new(UNDEFINED_OPERATION_KIND, format!("{} has no test method {}", class, name)))
                })
            }),
            Err(e) => Err(e),
        };
        let body_output = t.take_output();
        check(&mut t)?;

        match (outcome, expected) {
            (Ok(()), None) => (),
            (Ok(()), Some(kind)) => {
                t.record_at(site.clone(), false, format!("Expected exception {} was not thrown", kind));
            },
            (Err(ref e), Some(kind)) if e.is(kind) => {
                t.record_at(site.clone(), true, format!("Caught expected exception {}", kind));
            },
            (Err(e), _) => {
                debug!("unexpected exception in {}->{}: {}", class, name, e);
                t.record_at(site.clone(), false, format!("Unexpected exception caught: {}", e));
                t.emit(|l| l.unexpected_exception(class, name, &e));
            },
        }
        check(&mut t)?;

        let tear_down = guarded(&mut t, Frame::new("tear_down", method.file, method.line), |t| instance.tear_down(t));
        let tear_down_output = t.take_output();
        check(&mut t)?;

        if let Err(e) = tear_down {
            debug!("exception tearing down {}->{}: {}", class, name, e);
            t.record_at(site, false, format!("Unexpected exception caught in tear_down: {}", e));
            t.emit(|l| l.unexpected_exception(class, name, &e));
        }

        t.emit(|l| l.tear_down_test(class, name, &body_output));
        t.emit(|l| l.tear_down_test_done(class, name, &tear_down_output));
        check(&mut t)
    }
}

/// Runs one phase of a test, turning panics into exceptions.
///
/// Frames left behind by an unwind are discarded.
fn guarded<F>(t: &mut Context, frame: Frame, body: F) -> Outcome
    where F: FnOnce(&mut Context) -> Outcome {
    install_quiet_panic_hook();
    let depth = t.enter(frame);
    let was_guarded = GUARDED.with(|g| g.replace(true));

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| body(&mut *t))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(Exception::from_panic(payload)),
    };

    GUARDED.with(|g| g.set(was_guarded));
    t.leave(depth);
    outcome
}

/// Keeps panics caught by `guarded` off stderr; listeners report them.
///
/// The hook is installed once per process and defers to the previous hook
/// for panics outside of test code.
fn install_quiet_panic_hook() {
    QUIET_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            if is_guarded() {
                debug!("test code panicked: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

fn is_guarded() -> bool {
    GUARDED.with(Cell::get)
}

/// Fails if a fatal error was raised while the test was running.
fn check(t: &mut Context) -> Result<()> {
    match t.take_fault() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
