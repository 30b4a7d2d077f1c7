use super::{not_exported, Args, AssertionProvider};
use crate::context::Context;
use crate::exception::Outcome;
use crate::value::Value;

/// Assertions on strings. Lengths and offsets are in characters.
#[derive(Copy, Clone, Debug, Default)]
pub struct Text;

const OPERATIONS: &'static [&'static str] = &[
    "assert_string_ends_with",
    "assert_string_starts_with",
];

impl AssertionProvider for Text {
    fn name(&self) -> &str { "text" }

    fn operations(&self) -> &[&'static str] { OPERATIONS }

    fn invoke(&self, operation: &str, t: &mut Context, args: &[Value]) -> Outcome {
        let args = Args::new(operation, args);

        match operation {
            "assert_string_ends_with" => {
                let (suffix, string) = (args.string(0)?, args.string(1)?);
                self.assert_string_ends_with(t, suffix, string, args.message(2));
            },
            "assert_string_starts_with" => {
                let (prefix, string) = (args.string(0)?, args.string(1)?);
                self.assert_string_starts_with(t, prefix, string, args.message(2));
            },
            _ => return Err(not_exported(self, operation)),
        }

        Ok(())
    }
}

impl Text {
    /// Asserts that `string` finishes with `suffix`.
    #[track_caller]
    pub fn assert_string_ends_with(&self, t: &mut Context, suffix: &str, string: &str, message: &str) {
        t.assertive("assert_string_ends_with", |t| {
            let (suffix_len, string_len) = (suffix.chars().count(), string.chars().count());

            if suffix_len > string_len {
                t.fail(message);
            } else {
                let actual: String = string.chars().skip(string_len - suffix_len).collect();
                t.assert_true(actual == suffix, message);
            }
        })
    }

    /// Asserts that `string` starts with `prefix`.
    #[track_caller]
    pub fn assert_string_starts_with(&self, t: &mut Context, prefix: &str, string: &str, message: &str) {
        t.assertive("assert_string_starts_with", |t| {
            let prefix_len = prefix.chars().count();

            if prefix_len > string.chars().count() {
                t.fail(message);
            } else {
                let actual: String = string.chars().take(prefix_len).collect();
                t.assert_true(actual == prefix, message);
            }
        })
    }
}
