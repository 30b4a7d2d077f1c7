//! Pluggable assertion providers.
//!
//! A test class may register any number of providers, each exporting a set of
//! named assertion operations. Operations are invoked dynamically through
//! `Context::call`. The name table is built eagerly when a provider is
//! registered, so two providers exporting the same name are rejected
//! immediately rather than on first use.

pub use self::extended::Extended;
pub use self::text::Text;

use crate::context::Context;
use crate::exception::{Exception, Outcome};
use crate::value::Value;
use crate::{ErrorKind, Result};

use std::collections::HashMap;

mod extended;
mod text;

/// The exception kind raised when an operation receives unusable arguments.
pub const ARGUMENT_ERROR_KIND: &'static str = "ArgumentError";

/// An object supplying additional named assertions.
///
/// Implementations re-enter the primitive assertions of the `Context` they are
/// given, so outcomes are attributed to the test code that made the call.
pub trait AssertionProvider {
    /// A name for diagnostics.
    fn name(&self) -> &str;

    /// The operations this provider exports.
    fn operations(&self) -> &[&'static str];

    /// Runs one of the exported operations.
    fn invoke(&self, operation: &str, t: &mut Context, args: &[Value]) -> Outcome;
}

/// The providers registered with one test class instance.
#[derive(Default)]
pub struct Providers {
    providers: Vec<Box<dyn AssertionProvider>>,
    /// Operation name to index into `providers`.
    table: HashMap<&'static str, usize>,
}

/// Positional access to the arguments of a dynamically invoked operation.
#[derive(Copy, Clone, Debug)]
pub struct Args<'v> {
    operation: &'v str,
    values: &'v [Value],
}

impl Providers {
    pub fn new() -> Self {
        Providers::default()
    }

    /// Registers a provider.
    ///
    /// Fails, leaving the table untouched, if any of its operations is already
    /// exported by a previously registered provider.
    pub fn register<P>(&mut self, provider: P) -> Result<()>
        where P: AssertionProvider + 'static {
        for &operation in provider.operations() {
            if let Some(&index) = self.table.get(operation) {
                return Err(ErrorKind::AmbiguousOperation(operation.to_owned(),
                                                         self.providers[index].name().to_owned(),
                                                         provider.name().to_owned()).into());
            }
        }

        let index = self.providers.len();
        for &operation in provider.operations() {
            self.table.insert(operation, index);
        }

        debug!("registered assertion provider '{}' with {} operations", provider.name(), provider.operations().len());
        self.providers.push(Box::new(provider));
        Ok(())
    }

    /// Finds the provider exporting an operation.
    pub fn lookup(&self, operation: &str) -> Result<&dyn AssertionProvider> {
        match self.table.get(operation) {
            Some(&index) => Ok(&*self.providers[index]),
            None => Err(ErrorKind::UndefinedOperation(operation.to_owned()).into()),
        }
    }

    /// All exported operation names, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut operations: Vec<_> = self.table.keys().cloned().collect();
        operations.sort();
        operations
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<'v> Args<'v> {
    pub fn new(operation: &'v str, values: &'v [Value]) -> Self {
        Args { operation, values }
    }

    /// A required argument.
    #[track_caller]
    pub fn value(&self, index: usize) -> std::result::Result<&'v Value, Exception> {
        self.values.get(index).ok_or_else(|| {
            Exception::new(ARGUMENT_ERROR_KIND,
                           format!("{} expects at least {} arguments, got {}",
                                   self.operation, index + 1, self.values.len()))
        })
    }

    /// A required string argument.
    #[track_caller]
    pub fn string(&self, index: usize) -> std::result::Result<&'v str, Exception> {
        let value = self.value(index)?;
        value.as_str().ok_or_else(|| {
            Exception::new(ARGUMENT_ERROR_KIND,
                           format!("argument {} of {} must be a string, got {}",
                                   index + 1, self.operation, value.type_name()))
        })
    }

    /// The optional message argument; empty if absent.
    pub fn message(&self, index: usize) -> &'v str {
        self.values.get(index).and_then(Value::as_str).unwrap_or("")
    }
}

/// The exception raised when a provider is asked for an operation it does not export.
fn not_exported(provider: &dyn AssertionProvider, operation: &str) -> Exception {
    Exception::new(crate::context::UNDEFINED_OPERATION_KIND,
                   format!("operation '{}' is not exported by the {} provider", operation, provider.name()))
}

#[cfg(test)]
mod test {
    use super::*;

    struct Named(&'static str, &'static [&'static str]);

    impl AssertionProvider for Named {
        fn name(&self) -> &str { self.0 }
        fn operations(&self) -> &[&'static str] { self.1 }
        fn invoke(&self, _: &str, _: &mut Context, _: &[Value]) -> Outcome { Ok(()) }
    }

    #[test]
    fn lookup_finds_registered_operations() {
        let mut providers = Providers::new();
        providers.register(Named("first", &["assert_a", "assert_b"])).unwrap();
        providers.register(Named("second", &["assert_c"])).unwrap();

        assert_eq!(providers.lookup("assert_b").unwrap().name(), "first");
        assert_eq!(providers.lookup("assert_c").unwrap().name(), "second");
        assert_eq!(providers.operations(), vec!["assert_a", "assert_b", "assert_c"]);
    }

    #[test]
    fn unknown_operations_are_undefined() {
        match Providers::new().lookup("assert_missing") {
            Err(crate::Error(ErrorKind::UndefinedOperation(name), _)) => assert_eq!(name, "assert_missing"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(p) => panic!("unexpected provider: {}", p.name()),
        }
    }

    #[test]
    fn duplicate_operations_are_rejected_at_registration() {
        let mut providers = Providers::new();
        providers.register(Named("first", &["assert_a"])).unwrap();

        match providers.register(Named("second", &["assert_z", "assert_a"])) {
            Err(crate::Error(ErrorKind::AmbiguousOperation(name, first, second), _)) => {
                assert_eq!((name.as_str(), first.as_str(), second.as_str()), ("assert_a", "first", "second"));
            },
            r => panic!("expected ambiguity, got {:?}", r),
        }

        assert_eq!(providers.len(), 1);
        assert!(providers.lookup("assert_z").is_err(), "failed registration must not leak operations");
    }

    #[test]
    fn text_and_extended_overlap() {
        let mut providers = Providers::new();
        providers.register(Extended::new()).unwrap();
        assert!(providers.register(Text).is_err());
    }

    #[test]
    fn args_report_missing_and_mistyped_values() {
        let values = args![1];
        let args = Args::new("assert_thing", &values);

        assert_eq!(args.value(0).unwrap(), &Value::Int(1));
        assert_eq!(args.value(1).unwrap_err().kind, ARGUMENT_ERROR_KIND);
        assert_eq!(args.string(0).unwrap_err().kind, ARGUMENT_ERROR_KIND);
        assert_eq!(args.message(3), "");
    }
}
