use crate::{ErrorKind, Result};

/// Static description of a test method, available without instantiating its class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: &'static str,
    /// The file in which the method was registered.
    pub file: &'static str,
    pub line: u32,
    /// Declared expected exception kinds. At most one is allowed.
    pub expectations: Vec<String>,
}

/// A resolved source location an assertion is attributed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub class: String,
    pub method: String,
    pub file: String,
    pub line: u32,
}

/// The outcome of a single assertion, as forwarded to listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionEvent {
    pub class: String,
    pub method: String,
    pub file: String,
    pub line: u32,
    pub message: String,
    pub succeeded: bool,
}

/// The final status of a test run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// No assertion failure was ever recorded.
    Passed,
    Failed,
}

impl MethodInfo {
    /// Resolves the expected exception kind.
    ///
    /// Returns `None` when nothing is expected, and an error if more than one
    /// kind was declared.
    pub fn expectation(&self, class: &str) -> Result<Option<&str>> {
        match self.expectations.len() {
            0 => Ok(None),
            1 => Ok(Some(&self.expectations[0])),
            _ => Err(ErrorKind::AmbiguousExpectation(class.to_owned(),
                                                     self.name.to_owned(),
                                                     self.expectations.clone()).into()),
        }
    }
}

impl AssertionEvent {
    pub fn new<S>(site: CallSite, message: S, succeeded: bool) -> Self
        where S: Into<String> {
        AssertionEvent {
            class: site.class,
            method: site.method,
            file: site.file,
            line: site.line,
            message: message.into(),
            succeeded,
        }
    }
}

impl Status {
    /// The process exit code for this status.
    pub fn code(&self) -> i32 {
        match *self {
            Status::Passed => 0,
            Status::Failed => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == Status::Passed
    }
}
