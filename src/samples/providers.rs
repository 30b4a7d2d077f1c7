//! Assertions supplied by providers, and a composite assertion helper.

use rudiment::provider::{Extended, Text};
use rudiment::{Context, Outcome, Providers, Result, TestCase, TestMethod};

#[derive(Default)]
pub struct TextAssertionsTest;

impl TextAssertionsTest {
    fn failing_test(&mut self, t: &mut Context) -> Outcome {
        t.call("assert_string_ends_with", &args!["ande", "Gelände", "should fail"])?;
        t.call("assert_string_starts_with", &args!["Gela", "Gelände", "should fail"])
    }

    fn succeeding_test(&mut self, t: &mut Context) -> Outcome {
        t.call("assert_string_ends_with", &args!["ände", "Gelände", "should match"])?;
        t.call("assert_string_starts_with", &args!["Gelä", "Gelände", "should match"])
    }
}

impl TestCase for TextAssertionsTest {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(failing_test), method!(succeeding_test)]
    }

    fn providers(&self, providers: &mut Providers) -> Result<()> {
        providers.register(Text)
    }
}

register!(TextAssertionsTest);

#[derive(Default)]
pub struct ExtendedAssertionsTest;

/// Checks that a greeting is polite. Outcomes are reported at the caller's line.
#[track_caller]
fn assert_polite_greeting(t: &mut Context, greeting: &str) {
    t.assertive("assert_polite_greeting", |t| {
        t.assert_true(greeting.starts_with("Hello"), "greets");
        t.assert_false(greeting.ends_with('!'), "does not shout");
    });
}

impl ExtendedAssertionsTest {
    fn collections_test(&mut self, t: &mut Context) -> Outcome {
        let primes = vec![2, 3, 5, 7];

        t.call("assert_contains", &args![5, primes.clone()])?;
        t.call("assert_contains_only", &args!["int", primes.clone()])?;
        t.call("assert_count", &args![4, primes])?;
        t.call("assert_empty", &args![Vec::<i32>::new()])?;
        t.call("assert_null", &args![None::<i32>])
    }

    fn comparisons_test(&mut self, t: &mut Context) -> Outcome {
        t.call("assert_greater_than", &args![2, 3])?;
        t.call("assert_less_than_or_equal", &args![3, 3])?;
        t.call("assert_regex", &args![r"^\d{4}-\d{2}-\d{2}$", "2012-06-01"])?;
        t.call("assert_string_starts_with", &args!["Rud", "Rudiment"])
    }

    fn composite_test(&mut self, t: &mut Context) -> Outcome {
        assert_polite_greeting(t, "Hello, world");
        Ok(())
    }
}

impl TestCase for ExtendedAssertionsTest {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(collections_test), method!(comparisons_test), method!(composite_test)]
    }

    fn providers(&self, providers: &mut Providers) -> Result<()> {
        providers.register(Extended::new())
    }
}

register!(ExtendedAssertionsTest);
