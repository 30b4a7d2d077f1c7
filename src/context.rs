//! The per-test context handed to fixtures and test bodies.
//!
//! All assertion primitives live here. Each of them is `#[track_caller]` and
//! pushes an assertive frame for its caller's location, so the call stack can
//! attribute the outcome to the line of test code that made the assertion.

use crate::callsite::{CallStack, Frame};
use crate::exception::{Exception, Outcome};
use crate::listener::Listener;
use crate::model::{AssertionEvent, CallSite};
use crate::provider::Providers;
use crate::value::Value;
use crate::{util, Error, Result};

use std::io;
use std::mem;
use std::panic::Location;

/// The exception kind used when a dynamic call names an unknown operation.
pub const UNDEFINED_OPERATION_KIND: &'static str = "UndefinedOperation";

/// State shared by every test of an execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunState {
    /// Set the first time any assertion failure is recorded.
    pub failed: bool,
}

/// Access to assertions, providers and output capture for the running test.
pub struct Context<'a> {
    class: &'a str,
    listener: &'a mut dyn Listener,
    state: &'a mut RunState,
    providers: &'a Providers,
    stack: CallStack,
    capture: OutputCapture,
    /// The first fatal error seen while the test was running.
    fault: Option<Error>,
}

/// Buffers everything a test writes while it runs.
///
/// Output is handed to listeners phase by phase. Whatever is still buffered
/// when the capture is dropped never reached a listener, so it is written to
/// stderr instead of being lost.
#[derive(Debug, Default)]
pub struct OutputCapture {
    buffer: String,
}

impl<'a> Context<'a> {
    pub(crate) fn new(class: &'a str,
                      listener: &'a mut dyn Listener,
                      state: &'a mut RunState,
                      providers: &'a Providers) -> Self {
        Context {
            class,
            listener,
            state,
            providers,
            stack: CallStack::new(),
            capture: OutputCapture::open(),
            fault: None,
        }
    }

    /// The name of the class under test.
    pub fn class(&self) -> &str {
        self.class
    }

    /// The capture buffer for test output.
    pub fn out(&mut self) -> &mut OutputCapture {
        &mut self.capture
    }

    /// Asserts that a condition holds.
    #[track_caller]
    pub fn assert_true(&mut self, condition: bool, message: &str) {
        let frame = Frame::at("assert_true", Location::caller());
        let message = or_default(message, "Condition has to be true.");

        self.with_frame(frame, |t| t.record(condition, message));
    }

    /// Asserts that a condition does not hold.
    #[track_caller]
    pub fn assert_false(&mut self, condition: bool, message: &str) {
        let frame = Frame::at("assert_false", Location::caller());
        let message = or_default(message, "Condition has to be false.");

        self.with_frame(frame, |t| t.record(!condition, message));
    }

    /// Type-safe comparison of two values.
    #[track_caller]
    pub fn assert_equals<E, A>(&mut self, expected: E, actual: A, message: &str)
        where E: Into<Value>, A: Into<Value> {
        let frame = Frame::at("assert_equals", Location::caller());
        let (expected, actual) = (expected.into(), actual.into());
        let are_equal = expected.strict_eq(&actual);

        let mut message = or_default(message, "Values are equal in a type-safe check.");
        if !are_equal {
            message.push('\n');
            message += &util::indent_ext(&format!(
                "expected ({}): {}\nactual ({}): {}",
                expected.type_name(), expected.dump(), actual.type_name(), actual.dump()), 1, " ");
        }

        self.with_frame(frame, |t| t.assert_true(are_equal, &message));
    }

    /// Comparison of two values without type checking.
    #[track_caller]
    pub fn assert_equals_loose<E, A>(&mut self, expected: E, actual: A, message: &str)
        where E: Into<Value>, A: Into<Value> {
        let frame = Frame::at("assert_equals_loose", Location::caller());
        let are_equal = expected.into().loose_eq(&actual.into());
        let message = or_default(message, "Values are equal in a loose-typed check.");

        self.with_frame(frame, |t| t.assert_true(are_equal, &message));
    }

    /// Records a failure unconditionally.
    #[track_caller]
    pub fn fail(&mut self, message: &str) {
        let frame = Frame::at("fail", Location::caller());
        let message = or_default(message, "This code should never have executed.");

        self.with_frame(frame, |t| t.record(false, message));
    }

    /// Runs a composite assertion helper.
    ///
    /// Assertions made inside `body` are attributed to the location this was
    /// called from, so helpers marked `#[track_caller]` report the line of the
    /// test that used them. `name` should start with `assert`.
    #[track_caller]
    pub fn assertive<R, F>(&mut self, name: &str, body: F) -> R
        where F: FnOnce(&mut Self) -> R {
        let frame = Frame::at(name, Location::caller());
        self.with_frame(frame, body)
    }

    /// Invokes an assertion by name.
    ///
    /// The built-in primitives are resolved first, then the operations of the
    /// registered providers. Naming an operation nobody defines is a fatal
    /// configuration error that aborts the whole run once the test returns.
    #[track_caller]
    pub fn call(&mut self, operation: &str, args: &[Value]) -> Outcome {
        let location = Location::caller();

        if let Some(outcome) = self.primitive(operation, args, location) {
            return outcome;
        }

        let providers = self.providers;
        let provider = match providers.lookup(operation) {
            Ok(provider) => provider,
            Err(e) => {
                let exception = Exception::new(UNDEFINED_OPERATION_KIND, e.to_string());
                self.set_fault(e);
                return Err(exception);
            },
        };

        let depth = self.stack.depth();
        self.stack.push(Frame::transparent("call", location));
        self.stack.push(Frame::at(operation, location));

        let outcome = provider.invoke(operation, self, args);

        self.stack.truncate(depth);
        outcome
    }

    fn primitive(&mut self,
                 operation: &str,
                 args: &[Value],
                 location: &'static Location<'static>) -> Option<Outcome> {
        let args = crate::provider::Args::new(operation, args);

        let outcome = match operation {
            "assert_true" | "assert_false" | "fail" => {
                let (condition, message) = match operation {
                    "fail" => (false, args.message(0)),
                    "assert_false" => match args.value(0) {
                        Ok(v) => (!v.is_truthy(), args.message(1)),
                        Err(e) => return Some(Err(e)),
                    },
                    _ => match args.value(0) {
                        Ok(v) => (v.is_truthy(), args.message(1)),
                        Err(e) => return Some(Err(e)),
                    },
                };
                let message = match operation {
                    "fail" => or_default(message, "This code should never have executed."),
                    "assert_false" => or_default(message, "Condition has to be false."),
                    _ => or_default(message, "Condition has to be true."),
                };
                self.with_frame(Frame::at(operation, location), |t| t.record(condition, message));
                Ok(())
            },
            "assert_equals" | "assert_equals_loose" => {
                let (expected, actual) = match (args.value(0), args.value(1)) {
                    (Ok(e), Ok(a)) => (e.clone(), a.clone()),
                    (Err(e), _) | (_, Err(e)) => return Some(Err(e)),
                };
                let message = args.message(2);
                self.with_frame(Frame::at(operation, location), |t| {
                    if operation == "assert_equals" {
                        t.assert_equals(expected, actual, message)
                    } else {
                        t.assert_equals_loose(expected, actual, message)
                    }
                });
                Ok(())
            },
            _ => return None,
        };

        Some(outcome)
    }

    fn with_frame<R, F>(&mut self, frame: Frame, body: F) -> R
        where F: FnOnce(&mut Self) -> R {
        let depth = self.stack.depth();
        self.stack.push(frame);
        let result = body(self);
        self.stack.truncate(depth);
        result
    }

    fn record(&mut self, succeeded: bool, message: String) {
        if self.fault.is_some() { return; }

        match self.stack.resolve(self.class) {
            Ok(site) => self.record_at(site, succeeded, message),
            Err(e) => self.set_fault(e),
        }
    }

    /// Records an outcome at an explicit call site, bypassing attribution.
    pub(crate) fn record_at(&mut self, site: CallSite, succeeded: bool, message: String) {
        if self.fault.is_some() { return; }

        if !succeeded {
            self.state.failed = true;
        }

        let event = AssertionEvent::new(site, message, succeeded);
        trace!("assertion {} at {}:{} in {}->{}",
               if succeeded { "succeeded" } else { "failed" },
               event.file, event.line, event.class, event.method);

        let result = if succeeded {
            self.listener.assertion_success(&event)
        } else {
            self.listener.assertion_failure(&event)
        };

        if let Err(e) = result {
            self.set_fault(e);
        }
    }

    /// Forwards an event to the listener, keeping the first error as the fault.
    pub(crate) fn emit<F>(&mut self, event: F)
        where F: FnOnce(&mut dyn Listener) -> Result<()> {
        if self.fault.is_some() { return; }

        if let Err(e) = event(&mut *self.listener) {
            self.set_fault(e);
        }
    }

    pub(crate) fn enter(&mut self, frame: Frame) -> usize {
        let depth = self.stack.depth();
        self.stack.push(frame);
        depth
    }

    pub(crate) fn leave(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    pub(crate) fn take_output(&mut self) -> String {
        self.capture.take()
    }

    pub(crate) fn take_fault(&mut self) -> Option<Error> {
        self.fault.take()
    }

    fn set_fault(&mut self, error: Error) {
        if self.fault.is_none() {
            self.fault = Some(error);
        }
    }
}

impl OutputCapture {
    pub fn open() -> Self {
        OutputCapture::default()
    }

    /// Everything captured so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Hands out the captured text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        mem::replace(&mut self.buffer, String::new())
    }
}

impl io::Write for OutputCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for OutputCapture {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            warn!("test output was never delivered to a listener, writing it to stderr");
            eprint!("{}", self.buffer);
        }
    }
}

fn or_default(message: &str, default: &str) -> String {
    if message.is_empty() { default.to_owned() } else { message.to_owned() }
}
