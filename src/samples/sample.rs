use rudiment::{Context, Exception, Outcome, TestCase, TestMethod};

use std::error::Error;
use std::fmt;

/// An example test class. Every `Default` type implementing `TestCase` is accepted.
#[derive(Default)]
pub struct SampleTest;

#[derive(Debug)]
struct InvalidArgument;

impl SampleTest {
    fn dummy_test(&mut self, t: &mut Context) -> Outcome {
        // Fails and prints the message.
        t.assert_equals("dummy", "dumy", "test");
        // Fails and prints the default message.
        t.assert_equals("dummy", "dumy", "");
        t.assert_equals("dummy", "dummy", "");
        Ok(())
    }

    fn other_test(&mut self, t: &mut Context) -> Outcome {
        t.assert_equals(234, 23 + 211, "");
        Ok(())
    }

    fn types_test(&mut self, t: &mut Context) -> Outcome {
        t.assert_equals_loose(12, "12", "");
        t.assert_equals(13, "13", "");
        Ok(())
    }

    fn exception_test(&mut self, _: &mut Context) -> Outcome {
        Err(Exception::from(InvalidArgument))
    }

    /// Not selected by the default filter.
    fn helper(&mut self, t: &mut Context) -> Outcome {
        t.fail("");
        Ok(())
    }
}

impl TestCase for SampleTest {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![
            method!(dummy_test),
            method!(other_test),
            method!(types_test),
            method!(exception_test).doc("Test comment\n@expect InvalidArgument"),
            method!(helper),
        ]
    }
}

register!(SampleTest);

impl fmt::Display for InvalidArgument {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "invalid argument")
    }
}

impl Error for InvalidArgument { }
