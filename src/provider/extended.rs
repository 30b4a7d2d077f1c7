use super::{not_exported, Args, AssertionProvider, Text};
use crate::context::Context;
use crate::exception::{Exception, Outcome};
use crate::value::Value;

use regex::Regex;
use std::fs;
use std::path::Path;

/// A broad set of xUnit style assertions on top of the primitives.
///
/// Prefix/suffix checks are delegated to an owned `Text` provider, so the two
/// cannot be registered on the same test class.
#[derive(Clone, Debug, Default)]
pub struct Extended {
    text: Text,
}

const OPERATIONS: &'static [&'static str] = &[
    "assert_contains",
    "assert_contains_only",
    "assert_count",
    "assert_empty",
    "assert_not_empty",
    "assert_null",
    "assert_same",
    "assert_greater_than",
    "assert_greater_than_or_equal",
    "assert_less_than",
    "assert_less_than_or_equal",
    "assert_regex",
    "assert_file_exists",
    "assert_file_equals",
    "assert_string_equals_file",
    "assert_string_starts_with",
    "assert_string_ends_with",
];

impl Extended {
    pub fn new() -> Self {
        Extended::default()
    }
}

impl AssertionProvider for Extended {
    fn name(&self) -> &str { "extended" }

    fn operations(&self) -> &[&'static str] { OPERATIONS }

    fn invoke(&self, operation: &str, t: &mut Context, values: &[Value]) -> Outcome {
        let args = Args::new(operation, values);

        match operation {
            "assert_contains" => {
                let (needle, haystack) = (args.value(0)?, args.value(1)?);
                let found = match *haystack {
                    Value::List(ref items) => items.iter().any(|item| item.strict_eq(needle)),
                    Value::Str(ref s) => s.contains(&needle.to_string()[..]),
                    ref other => return Err(incompatible(operation, other)),
                };
                t.assert_true(found, args.message(2));
            },
            "assert_contains_only" => {
                let (type_name, haystack) = (args.string(0)?, args.value(1)?);
                let items = haystack.as_list().ok_or_else(|| incompatible(operation, haystack))?;
                t.assert_true(items.iter().all(|item| item.type_name() == type_name), args.message(2));
            },
            "assert_count" => {
                let (expected, haystack) = (args.value(0)?, args.value(1)?);
                let count = haystack.len().ok_or_else(|| incompatible(operation, haystack))?;
                t.assert_true(expected.as_number() == Some(count as f64), args.message(2));
            },
            "assert_empty" => t.assert_true(!args.value(0)?.is_truthy(), args.message(1)),
            "assert_not_empty" => t.assert_true(args.value(0)?.is_truthy(), args.message(1)),
            "assert_null" => t.assert_true(*args.value(0)? == Value::Null, args.message(1)),
            "assert_same" => {
                let (expected, actual) = (args.value(0)?, args.value(1)?);
                t.assert_true(expected.strict_eq(actual), args.message(2));
            },
            "assert_greater_than" => compare(t, &args, |expected, actual| expected < actual)?,
            "assert_greater_than_or_equal" => compare(t, &args, |expected, actual| expected <= actual)?,
            "assert_less_than" => compare(t, &args, |expected, actual| expected > actual)?,
            "assert_less_than_or_equal" => compare(t, &args, |expected, actual| expected >= actual)?,
            "assert_regex" => {
                let (pattern, string) = (args.string(0)?, args.string(1)?);
                let regex = Regex::new(pattern)?;
                t.assert_true(regex.is_match(string), args.message(2));
            },
            "assert_file_exists" => {
                let path = args.string(0)?;
                t.assert_true(Path::new(path).exists(), args.message(1));
            },
            "assert_file_equals" => {
                let (expected, actual) = (args.string(0)?, args.string(1)?);
                t.assert_true(fs::read(expected)? == fs::read(actual)?, args.message(2));
            },
            "assert_string_equals_file" => {
                let (expected_file, actual) = (args.string(0)?, args.string(1)?);
                t.assert_true(fs::read_to_string(expected_file)? == actual, args.message(2));
            },
            "assert_string_starts_with" | "assert_string_ends_with" => {
                return self.text.invoke(operation, t, values);
            },
            _ => return Err(not_exported(self, operation)),
        }

        Ok(())
    }
}

/// Numeric comparison of `expected` (argument 0) against `actual` (argument 1).
fn compare<F>(t: &mut Context, args: &Args, holds: F) -> Outcome
    where F: FnOnce(f64, f64) -> bool {
    let (expected, actual) = (args.value(0)?, args.value(1)?);

    match (expected.as_number(), actual.as_number()) {
        (Some(expected), Some(actual)) => {
            t.assert_true(holds(expected, actual), args.message(2));
            Ok(())
        },
        (None, _) => Err(incompatible("comparison", expected)),
        (_, None) => Err(incompatible("comparison", actual)),
    }
}

fn incompatible(operation: &str, value: &Value) -> Exception {
    Exception::new(super::ARGUMENT_ERROR_KIND,
                   format!("{} cannot be applied to a value of type {}", operation, value.type_name()))
}
