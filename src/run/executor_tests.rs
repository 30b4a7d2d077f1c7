//! Tests for the per-test protocol of the executor.

use super::discover::Suite;
use super::executor::Executor;
use super::filter::Filter;
use crate::case::{TestCase, TestClass, TestMethod};
use crate::context::Context;
use crate::exception::{Exception, Outcome, PANIC_KIND};
use crate::listener::{Event, Listener, Recorder};
use crate::model::{AssertionEvent, Status};
use crate::provider::{Extended, Providers, Text};
use crate::{value::Value, ErrorKind, Result};

use std::io::Write;
use std::path::PathBuf;

fn run(classes: Vec<TestClass>) -> (Result<Status>, Vec<Event>) {
    run_filtered(classes, Filter::default())
}

fn run_filtered(classes: Vec<TestClass>, filter: Filter) -> (Result<Status>, Vec<Event>) {
    let mut recorder = Recorder::new();
    let suite = Suite { path: PathBuf::from("samples"), classes };

    let result = Executor::new(&mut recorder, filter).run(&[suite]);
    (result, recorder.into_events())
}

fn assertions(events: &[Event]) -> Vec<&AssertionEvent> {
    events.iter().filter_map(|e| match *e {
        Event::AssertionSuccess(ref a) | Event::AssertionFailure(ref a) => Some(a),
        _ => None,
    }).collect()
}

fn counts(events: &[Event]) -> (usize, usize) {
    let assertions = assertions(events);
    let succeeded = assertions.iter().filter(|a| a.succeeded).count();
    (succeeded, assertions.len() - succeeded)
}

fn unexpected(events: &[Event]) -> Vec<&Exception> {
    events.iter().filter_map(|e| match *e {
        Event::UnexpectedException { ref exception, .. } => Some(exception),
        _ => None,
    }).collect()
}

#[derive(Default)]
struct Sample;

impl Sample {
    fn dummy_test(&mut self, t: &mut Context) -> Outcome {
        t.assert_equals("dummy", "dumy", "test");
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

    fn helper(&mut self, t: &mut Context) -> Outcome {
        t.fail("never run");
        Ok(())
    }
}

impl TestCase for Sample {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(dummy_test), method!(other_test), method!(types_test), method!(helper)]
    }
}

#[derive(Default)]
struct Throwing;

impl Throwing {
    fn exception_test(&mut self, _: &mut Context) -> Outcome {
        Err(Exception::new("InvalidArgument", "bad input"))
    }

    fn wrong_kind_test(&mut self, _: &mut Context) -> Outcome {
        Err(Exception::new("OutOfRange", "too large"))
    }

    fn silent_test(&mut self, _: &mut Context) -> Outcome {
        Ok(())
    }

    fn parse_test(&mut self, _: &mut Context) -> Outcome {
        "twelve".parse::<i32>()?;
        Ok(())
    }

    fn raise_test(&mut self, _: &mut Context) -> Outcome {
        Exception::new("InvalidArgument", "raised by unwinding").raise()
    }

    fn panic_test(&mut self, _: &mut Context) -> Outcome {
        panic!("boom")
    }
}

impl TestCase for Throwing {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![
            method!(exception_test).doc("@expect InvalidArgument"),
            method!(wrong_kind_test).expect("InvalidArgument"),
            method!(silent_test).expect("InvalidArgument"),
            method!(parse_test).expect("ParseIntError"),
            method!(raise_test).expect("InvalidArgument"),
            method!(panic_test),
        ]
    }
}

fn only(method: &str) -> Filter {
    Filter::new(&format!("->{}$", method)).unwrap()
}

#[test]
fn sample_class_scenario() {
    let (result, events) = run(vec![class!(Sample)]);

    assert_eq!(result.unwrap(), Status::Failed);
    assert_eq!(counts(&events), (3, 3));

    let set_ups = events.iter().filter(|e| match **e { Event::SetUpTest { .. } => true, _ => false }).count();
    assert_eq!(set_ups, 3);
    assert!(events.contains(&Event::SkippedTest { class: "Sample".to_owned(), method: "helper".to_owned() }));
}

#[test]
fn skipped_methods_produce_a_single_event() {
    let (_, events) = run_filtered(vec![class!(Sample)], only("other_test"));

    let for_dummy: Vec<_> = events.iter().filter(|e| match **e {
        Event::SkippedTest { ref method, .. } |
        Event::SetUpTest { ref method, .. } |
        Event::TearDownTest { ref method, .. } => method == "dummy_test",
        Event::AssertionSuccess(ref a) | Event::AssertionFailure(ref a) => a.method == "dummy_test",
        _ => false,
    }).collect();

    assert_eq!(for_dummy, vec![&Event::SkippedTest { class: "Sample".to_owned(), method: "dummy_test".to_owned() }]);
}

#[test]
fn class_events_fire_once_per_class() {
    let (_, events) = run(vec![class!(Sample)]);

    assert_eq!(events.first(), Some(&Event::SetUpSuite(PathBuf::from("samples"))));
    assert_eq!(events[1], Event::SetUpClass("Sample".to_owned()));
    assert_eq!(events[events.len() - 2], Event::TearDownClass("Sample".to_owned()));
    assert_eq!(events.last(), Some(&Event::TearDownSuite(PathBuf::from("samples"))));

    let class_events = events.iter().filter(|e| match **e {
        Event::SetUpClass(..) | Event::TearDownClass(..) => true,
        _ => false,
    }).count();
    assert_eq!(class_events, 2);
}

#[test]
fn assertions_are_attributed_to_their_test_method() {
    let (_, events) = run_filtered(vec![class!(Sample)], only("types_test"));
    let assertions = assertions(&events);

    assert_eq!(assertions.len(), 2);
    for assertion in assertions.iter() {
        assert_eq!(assertion.class, "Sample");
        assert_eq!(assertion.method, "types_test");
        assert_eq!(assertion.file, file!());
    }
    assert_eq!(assertions[1].line, assertions[0].line + 1);
}

#[test]
fn expected_exception_is_a_success() {
    let (result, events) = run_filtered(vec![class!(Throwing)], only("exception_test"));

    assert_eq!(result.unwrap(), Status::Passed);
    assert_eq!(counts(&events), (1, 0));
    assert!(unexpected(&events).is_empty());
    assert_eq!(assertions(&events)[0].message, "Caught expected exception InvalidArgument");
}

#[test]
fn exception_of_another_kind_is_a_failure_and_reported() {
    let (result, events) = run_filtered(vec![class!(Throwing)], only("wrong_kind_test"));

    assert_eq!(result.unwrap(), Status::Failed);
    assert_eq!(counts(&events), (0, 1));

    let exceptions = unexpected(&events);
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].kind, "OutOfRange");
}

#[test]
fn missing_exception_is_a_failure_at_the_method() {
    let (result, events) = run_filtered(vec![class!(Throwing)], only("silent_test"));
    let method = Throwing::methods().into_iter().find(|m| m.name == "silent_test").unwrap();

    assert_eq!(result.unwrap(), Status::Failed);
    assert!(unexpected(&events).is_empty());

    let assertions = assertions(&events);
    assert_eq!(assertions.len(), 1);
    assert_eq!(assertions[0].message, "Expected exception InvalidArgument was not thrown");
    assert_eq!(assertions[0].method, "silent_test");
    assert_eq!((assertions[0].file.as_str(), assertions[0].line), (method.file, method.line));
}

#[test]
fn std_errors_match_by_type_name() {
    let (result, events) = run_filtered(vec![class!(Throwing)], only("parse_test"));

    assert_eq!(result.unwrap(), Status::Passed);
    assert_eq!(counts(&events), (1, 0));
}

#[test]
fn raised_exceptions_unwind_to_the_executor() {
    let (result, events) = run_filtered(vec![class!(Throwing)], only("raise_test"));

    assert_eq!(result.unwrap(), Status::Passed);
    assert_eq!(counts(&events), (1, 0));
}

#[test]
fn panics_are_unexpected_exceptions() {
    let (result, events) = run_filtered(vec![class!(Throwing)], only("panic_test"));

    assert_eq!(result.unwrap(), Status::Failed);
    let exceptions = unexpected(&events);
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].kind, PANIC_KIND);
    assert_eq!(exceptions[0].message, "boom");
}

#[derive(Default)]
struct Fixture {
    broken_set_up: bool,
    torn_down: usize,
}

impl Fixture {
    fn output_test(&mut self, t: &mut Context) -> Outcome {
        write!(t.out(), "from the body")?;
        t.assert_true(true, "");
        Ok(())
    }

    fn broken_test(&mut self, t: &mut Context) -> Outcome {
        self.broken_set_up = true;
        t.assert_true(true, "");
        Ok(())
    }

    fn body_after_broken_set_up_test(&mut self, t: &mut Context) -> Outcome {
        t.fail("body must not run when set_up failed");
        Ok(())
    }
}

impl TestCase for Fixture {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(output_test), method!(broken_test), method!(body_after_broken_set_up_test)]
    }

    fn set_up(&mut self, t: &mut Context) -> Outcome {
        write!(t.out(), "setting up")?;

        if self.broken_set_up {
            return Err(Exception::new("ConnectionLost", "no database"));
        }
        Ok(())
    }

    fn tear_down(&mut self, t: &mut Context) -> Outcome {
        self.torn_down += 1;
        write!(t.out(), "tearing down {}", self.torn_down)?;
        Ok(())
    }
}

#[test]
fn output_is_delivered_phase_by_phase() {
    let (_, events) = run_filtered(vec![class!(Fixture)], only("output_test"));

    let test_events: Vec<_> = events.into_iter()
        .skip_while(|e| match *e { Event::SetUpTest { .. } => false, _ => true })
        .take(5)
        .collect();

    match test_events[..] {
        [Event::SetUpTest { ref method, .. },
         Event::SetUpTestDone { output: ref set_up, .. },
         Event::AssertionSuccess(..),
         Event::TearDownTest { output: ref body, .. },
         Event::TearDownTestDone { output: ref tear_down, .. }] => {
            assert_eq!(method, "output_test");
            assert_eq!(set_up, "setting up");
            assert_eq!(body, "from the body");
            assert_eq!(tear_down, "tearing down 1");
        },
        ref other => panic!("unexpected event sequence {:?}", other),
    }
}

#[test]
fn failing_set_up_skips_the_body_but_not_tear_down() {
    let filter = Filter::new("broken").unwrap();
    let (result, events) = run_filtered(vec![class!(Fixture)], filter);

    assert_eq!(result.unwrap(), Status::Failed);

    let messages: Vec<_> = assertions(&events).iter().map(|a| a.message.clone()).collect();
    assert_eq!(messages.len(), 2, "{:?}", messages);
    assert!(messages[1].starts_with("Unexpected exception caught: ConnectionLost: no database"));

    let exceptions = unexpected(&events);
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].kind, "ConnectionLost");

    assert!(events.contains(&Event::TearDownTestDone {
        class: "Fixture".to_owned(),
        method: "body_after_broken_set_up_test".to_owned(),
        output: "tearing down 2".to_owned(),
    }));
}

#[derive(Default)]
struct BrokenTearDown;

impl BrokenTearDown {
    fn some_test(&mut self, t: &mut Context) -> Outcome {
        t.assert_true(true, "body ran");
        Ok(())
    }
}

impl TestCase for BrokenTearDown {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(some_test)]
    }

    fn tear_down(&mut self, _: &mut Context) -> Outcome {
        Err(Exception::new("CleanupFailed", "could not roll back"))
    }
}

#[test]
fn tear_down_exceptions_do_not_hide_the_body_outcome() {
    let (result, events) = run(vec![class!(BrokenTearDown)]);

    assert_eq!(result.unwrap(), Status::Failed);
    assert_eq!(counts(&events), (1, 1));
    assert!(assertions(&events)[0].succeeded);
    assert_eq!(unexpected(&events)[0].kind, "CleanupFailed");
}

#[derive(Default)]
struct Ambiguous;

impl Ambiguous {
    fn twice_test(&mut self, _: &mut Context) -> Outcome {
        Ok(())
    }
}

impl TestCase for Ambiguous {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(twice_test).expect("A").doc("@expect B")]
    }
}

#[test]
fn ambiguous_expectations_abort_before_anything_runs() {
    let (result, events) = run(vec![class!(Sample), class!(Ambiguous)]);

    match result {
        Err(crate::Error(ErrorKind::AmbiguousExpectation(class, method, _), _)) => {
            assert_eq!((class.as_str(), method.as_str()), ("Ambiguous", "twice_test"));
        },
        r => panic!("expected an ambiguous expectation, got {:?}", r),
    }
    assert!(events.is_empty());
}

#[test]
fn ambiguous_expectations_of_skipped_methods_are_ignored() {
    let (result, _) = run_filtered(vec![class!(Ambiguous)], only("nothing"));
    assert_eq!(result.unwrap(), Status::Passed);
}

#[derive(Default)]
struct WithProviders;

impl WithProviders {
    fn suffix_test(&mut self, t: &mut Context) -> Outcome {
        t.call("assert_string_ends_with", &args!["ände", "Gelände", "should match"])?;
        t.call("assert_string_starts_with", &args!["Gela", "Gelände", "should fail"])?;
        Ok(())
    }

    fn composite_test(&mut self, t: &mut Context) -> Outcome {
        assert_greeting(t, "Hello, world");
        Ok(())
    }

    fn undefined_test(&mut self, t: &mut Context) -> Outcome {
        t.call("assert_frobnicated", &[Value::Null])
    }
}

#[track_caller]
fn assert_greeting(t: &mut Context, text: &str) {
    t.assertive("assert_greeting", |t| {
        t.assert_true(text.starts_with("Hello"), "greets");
        t.assert_false(text.is_empty(), "says something");
    });
}

impl TestCase for WithProviders {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(suffix_test), method!(composite_test), method!(undefined_test)]
    }

    fn providers(&self, providers: &mut Providers) -> Result<()> {
        providers.register(Text)
    }
}

#[test]
fn provider_assertions_are_attributed_to_the_caller() {
    let (result, events) = run_filtered(vec![class!(WithProviders)], only("suffix_test"));
    let assertions = assertions(&events);

    assert_eq!(result.unwrap(), Status::Failed);
    assert_eq!(assertions.iter().map(|a| a.succeeded).collect::<Vec<_>>(), vec![true, false]);
    assert_eq!(assertions[0].method, "suffix_test");
    assert_eq!(assertions[0].file, file!());
    assert_eq!(assertions[1].line, assertions[0].line + 1);
}

#[test]
fn composite_helpers_are_attributed_to_their_call_site() {
    let (_, events) = run_filtered(vec![class!(WithProviders)], only("composite_test"));
    let assertions = assertions(&events);

    assert_eq!(assertions.len(), 2);
    assert_eq!(assertions[0].line, assertions[1].line);
    assert_eq!(assertions[0].method, "composite_test");
}

#[test]
fn undefined_operations_abort_the_run() {
    let (result, events) = run_filtered(vec![class!(WithProviders)], only("undefined_test"));

    match result {
        Err(crate::Error(ErrorKind::UndefinedOperation(name), _)) => assert_eq!(name, "assert_frobnicated"),
        r => panic!("expected an undefined operation, got {:?}", r),
    }
    assert!(!events.iter().any(|e| match *e { Event::TearDownSuite(..) => true, _ => false }));
}

#[derive(Default)]
struct Overlapping;

impl Overlapping {
    fn never_run_test(&mut self, t: &mut Context) -> Outcome {
        t.fail("");
        Ok(())
    }
}

impl TestCase for Overlapping {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(never_run_test)]
    }

    fn providers(&self, providers: &mut Providers) -> Result<()> {
        providers.register(Text)?;
        providers.register(Extended::new())
    }
}

#[test]
fn ambiguous_providers_abort_before_anything_runs() {
    let (result, events) = run(vec![class!(Sample), class!(Overlapping)]);

    match result {
        Err(crate::Error(ErrorKind::AmbiguousOperation(..), _)) => (),
        r => panic!("expected an ambiguous operation, got {:?}", r),
    }
    assert!(events.is_empty());
}

#[derive(Default)]
struct DirectText;

impl DirectText {
    fn direct_test(&mut self, t: &mut Context) -> Outcome {
        Text.assert_string_ends_with(t, "ande", "Gelände", "");
        Ok(())
    }
}

impl TestCase for DirectText {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(direct_test)]
    }
}

#[test]
fn direct_provider_calls_are_attributed_to_the_caller() {
    let (result, events) = run(vec![class!(DirectText)]);
    let assertions = assertions(&events);

    assert_eq!(result.unwrap(), Status::Failed);
    assert_eq!(assertions.len(), 1);
    assert_eq!(assertions[0].method, "direct_test");
    assert_eq!(assertions[0].file, file!());
}

struct FailingListener;

impl Listener for FailingListener {
    fn assertion_failure(&mut self, _: &AssertionEvent) -> Result<()> {
        Err(ErrorKind::Report("disk full".to_owned()).into())
    }
}

#[test]
fn listener_errors_abort_the_run() {
    let mut listener = FailingListener;
    let suite = Suite { path: PathBuf::from("samples"), classes: vec![class!(Sample)] };

    let result = Executor::new(&mut listener, Filter::default()).run(&[suite]);
    match result {
        Err(crate::Error(ErrorKind::Report(reason), _)) => assert_eq!(reason, "disk full"),
        r => panic!("expected a report error, got {:?}", r),
    }
}

#[test]
fn repeated_runs_are_identical() {
    let (first_result, first) = run(vec![class!(Sample), class!(Throwing)]);
    let (second_result, second) = run(vec![class!(Sample), class!(Throwing)]);

    assert_eq!(first_result.unwrap(), second_result.unwrap());
    assert_eq!(first, second);
}
