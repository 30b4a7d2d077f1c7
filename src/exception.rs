//! Errors raised by test code.

use std::any::Any;
use std::fmt;
use std::panic::Location;

/// The kind given to panics that do not carry an `Exception` payload.
pub const PANIC_KIND: &'static str = "panic";

/// The result of running a piece of test code.
pub type Outcome = Result<(), Exception>;

/// An error raised while a test's fixture or body was running.
///
/// Anything implementing `std::error::Error` converts into an exception via
/// `?`; the kind is then the error's type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exception {
    pub kind: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Exception {
    #[track_caller]
    pub fn new<K, M>(kind: K, message: M) -> Self
        where K: Into<String>, M: Into<String> {
        let location = Location::caller();

        Exception {
            kind: kind.into(),
            message: message.into(),
            file: Some(location.file().to_owned()),
            line: Some(location.line()),
        }
    }

    /// Raises the exception by unwinding, for code that cannot return an `Outcome`.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }

    /// Converts a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Exception>() {
            Ok(exception) => return *exception,
            Err(payload) => payload,
        };

        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_owned()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_owned()
        };

        Exception { kind: PANIC_KIND.to_owned(), message, file: None, line: None }
    }

    /// Checks whether this exception is of the given kind.
    ///
    /// Kinds match either completely or on the last `::` segment, so
    /// `ParseIntError` matches `core::num::error::ParseIntError`.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind || self.kind.rsplit("::").next() == Some(kind)
    }
}

impl<E> From<E> for Exception where E: std::error::Error + 'static {
    #[track_caller]
    fn from(error: E) -> Self {
        Exception::new(std::any::type_name::<E>(), error.to_string())
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.message.is_empty() {
            write!(fmt, "{}", self.kind)?;
        } else {
            write!(fmt, "{}: {}", self.kind, self.message)?;
        }

        if let (Some(file), Some(line)) = (self.file.as_ref(), self.line) {
            write!(fmt, " (raised at {}:{})", file, line)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::panic;

    fn parse(s: &str) -> Result<i32, Exception> {
        Ok(s.parse::<i32>()?)
    }

    #[test]
    fn std_errors_convert_with_their_type_name() {
        let exception = parse("nope").unwrap_err();
        assert!(exception.kind.ends_with("ParseIntError"));
        assert!(exception.is("ParseIntError"));
        assert!(exception.is(&exception.kind.clone()));
        assert!(!exception.is("IntError"));
    }

    #[test]
    fn exceptions_record_where_they_were_created() {
        let exception = Exception::new("InvalidArgument", "bad");
        assert_eq!(exception.file.as_ref().map(String::as_str), Some(file!()));
        assert!(exception.line.is_some());
    }

    #[test]
    fn panics_become_exceptions() {
        let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        let exception = Exception::from_panic(payload);
        assert_eq!(exception.kind, PANIC_KIND);
        assert_eq!(exception.message, "boom");

        let payload = panic::catch_unwind(|| Exception::new("Custom", "raised").raise()).unwrap_err();
        assert!(Exception::from_panic(payload).is("Custom"));
    }

    #[test]
    fn display_includes_kind_and_message() {
        let mut exception = Exception::new("InvalidArgument", "bad input");
        exception.file = None;
        assert_eq!(exception.to_string(), "InvalidArgument: bad input");
    }
}
