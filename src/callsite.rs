//! Attribution of assertion outcomes to the test code that caused them.
//!
//! Rather than inspecting the runtime call stack, every layer that matters
//! pushes a `Frame` onto an explicit `CallStack` kept by the test context:
//! the fixture phase or test method being run, composite assertion helpers,
//! dynamic provider dispatch and the assertion primitives themselves.
//!
//! When an outcome is recorded the stack is walked from the innermost frame
//! outwards. Transparent frames (dispatch trampolines) are skipped. A frame is
//! *assertive* if its operation is `fail` or starts with `assert`; the walk
//! remembers the most recent assertive frame, and the first non-assertive frame
//! after it is the attribution point. That frame names the reported method, the
//! remembered assertive frame supplies the reported file and line.

use crate::model::CallSite;
use crate::{ErrorKind, Result};

use std::panic::Location;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// The name of the operation executing in this frame.
    pub operation: String,
    /// Where the operation was invoked from.
    pub file: &'static str,
    pub line: u32,
    /// Skipped entirely during attribution.
    pub transparent: bool,
}

/// An explicit stack of frames describing the active call chain.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl Frame {
    pub fn new<S>(operation: S, file: &'static str, line: u32) -> Self
        where S: Into<String> {
        Frame { operation: operation.into(), file, line, transparent: false }
    }

    /// A frame invoked from the given location.
    pub fn at<S>(operation: S, location: &'static Location<'static>) -> Self
        where S: Into<String> {
        Frame::new(operation, location.file(), location.line())
    }

    pub fn transparent<S>(operation: S, location: &'static Location<'static>) -> Self
        where S: Into<String> {
        Frame { transparent: true, ..Frame::at(operation, location) }
    }

    pub fn is_assertive(&self) -> bool {
        is_assertive(&self.operation)
    }
}

impl CallStack {
    pub fn new() -> Self {
        CallStack::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drops every frame above `depth`, e.g. after an unwind skipped the pops.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// Resolves the call site responsible for the assertion currently executing.
    pub fn resolve(&self, class: &str) -> Result<CallSite> {
        let mut assertive: Option<&Frame> = None;

        for frame in self.frames.iter().rev().filter(|f| !f.transparent) {
            if frame.is_assertive() {
                assertive = Some(frame);
                continue;
            }

            if let Some(assertive) = assertive {
                return Ok(CallSite {
                    class: class.to_owned(),
                    method: frame.operation.clone(),
                    file: assertive.file.to_owned(),
                    line: assertive.line,
                });
            }
        }

        Err(ErrorKind::UnattributedAssertion(class.to_owned()).into())
    }
}

/// Checks whether an operation name denotes an assertion.
pub fn is_assertive(operation: &str) -> bool {
    operation == "fail" || operation.starts_with("assert")
}
