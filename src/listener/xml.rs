//! An xUnit style XML report, for continuous integration tools.
//!
//! The report is kept in memory and rewritten after every event, so a run
//! that dies halfway still leaves a well-formed document describing
//! everything seen up to that point.

use super::Listener;
use crate::exception::Exception;
use crate::model::AssertionEvent;
use crate::{Error, ErrorKind, Result};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Writes test results to an XML file.
pub struct XmlReport {
    path: PathBuf,
    suites: Vec<Suite>,
}

#[derive(Copy, Clone, Debug, Default)]
struct Counters {
    tests: usize,
    assertions: usize,
    failures: usize,
    errors: usize,
}

#[derive(Debug)]
struct Timer {
    started: Instant,
    /// Seconds taken, once finished.
    time: Option<f64>,
}

#[derive(Debug)]
struct Suite {
    name: String,
    counters: Counters,
    timer: Timer,
    classes: Vec<Class>,
}

#[derive(Debug)]
struct Class {
    name: String,
    counters: Counters,
    timer: Timer,
    cases: Vec<Case>,
}

#[derive(Debug)]
struct Case {
    name: String,
    class: String,
    counters: Counters,
    timer: Timer,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Success(String),
    Failure(String),
    Error { kind: String, text: String },
    Output(String),
}

impl XmlReport {
    /// Creates a report which will be written to `path`.
    pub fn new<P>(path: P) -> Self
        where P: Into<PathBuf> {
        XmlReport { path: path.into(), suites: Vec::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the report as it currently stands.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))).map_err(report_error)?;
        writer.write_event(Event::Start(BytesStart::new("testsuites"))).map_err(report_error)?;

        for suite in self.suites.iter() {
            let start = element("testsuite", &suite.name, suite.counters, true, &suite.timer);
            writer.write_event(Event::Start(start)).map_err(report_error)?;

            for class in suite.classes.iter() {
                let start = element("testsuite", &class.name, class.counters, true, &class.timer);
                writer.write_event(Event::Start(start)).map_err(report_error)?;

                for case in class.cases.iter() {
                    let mut start = element("testcase", &case.name, case.counters, false, &case.timer);
                    start.push_attribute(("class", case.class.as_str()));
                    writer.write_event(Event::Start(start)).map_err(report_error)?;

                    for child in case.children.iter() {
                        write_node(&mut writer, child)?;
                    }

                    writer.write_event(Event::End(BytesEnd::new("testcase"))).map_err(report_error)?;
                }

                writer.write_event(Event::End(BytesEnd::new("testsuite"))).map_err(report_error)?;
            }

            writer.write_event(Event::End(BytesEnd::new("testsuite"))).map_err(report_error)?;
        }

        writer.write_event(Event::End(BytesEnd::new("testsuites"))).map_err(report_error)?;

        let mut xml = writer.into_inner();
        xml.push(b'\n');
        Ok(xml)
    }

    /// Replaces the report file with the current state of the report.
    fn save(&self) -> Result<()> {
        let xml = self.render()?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(&xml)?;
        file.persist(&self.path)?;

        trace!("saved XML report to {}", self.path.display());
        Ok(())
    }

    fn suite(&mut self) -> Result<&mut Suite> {
        self.suites.last_mut().ok_or_else(|| outside_of("a testsuite"))
    }

    fn class(&mut self) -> Result<&mut Class> {
        self.suite()?.classes.last_mut().ok_or_else(|| outside_of("a test class"))
    }

    fn case(&mut self) -> Result<&mut Case> {
        self.class()?.cases.last_mut().ok_or_else(|| outside_of("a testcase"))
    }

    /// Adds the output of `set_up` or `tear_down` to the current testcase.
    fn fixture_output(&mut self, output: &str) -> Result<()> {
        if !output.is_empty() {
            self.case()?.children.push(Node::Output(output.to_owned()));
        }
        self.save()
    }

    /// Increments a counter on the current suite, class and testcase.
    fn count<F>(&mut self, increment: F) -> Result<()>
        where F: Fn(&mut Counters) {
        let suite = self.suite()?;
        increment(&mut suite.counters);

        if let Some(class) = suite.classes.last_mut() {
            increment(&mut class.counters);

            if let Some(case) = class.cases.last_mut() {
                increment(&mut case.counters);
            }
        }

        Ok(())
    }
}

impl Listener for XmlReport {
    fn set_up_suite(&mut self, path: &Path) -> Result<()> {
        self.suites.push(Suite {
            name: path.display().to_string(),
            counters: Counters::default(),
            timer: Timer::start(),
            classes: Vec::new(),
        });
        self.save()
    }

    fn tear_down_suite(&mut self, _: &Path) -> Result<()> {
        self.suite()?.timer.stop();
        self.save()
    }

    fn set_up_class(&mut self, class: &str) -> Result<()> {
        self.suite()?.classes.push(Class {
            name: class.to_owned(),
            counters: Counters::default(),
            timer: Timer::start(),
            cases: Vec::new(),
        });
        self.save()
    }

    fn tear_down_class(&mut self, _: &str) -> Result<()> {
        self.class()?.timer.stop();
        self.save()
    }

    fn set_up_test(&mut self, class: &str, method: &str, _: &str, _: u32) -> Result<()> {
        self.class()?.cases.push(Case {
            name: method.to_owned(),
            class: class.to_owned(),
            counters: Counters::default(),
            timer: Timer::start(),
            children: Vec::new(),
        });
        self.count(|c| c.tests += 1)?;
        self.save()
    }

    fn set_up_test_done(&mut self, _: &str, _: &str, output: &str) -> Result<()> {
        self.fixture_output(output)
    }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> {
        self.count(|c| c.assertions += 1)?;
        self.case()?.children.push(Node::Success(event.message.clone()));
        self.save()
    }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> {
        self.count(|c| {
            c.assertions += 1;
            c.failures += 1;
        })?;
        self.case()?.children.push(Node::Failure(event.message.clone()));
        self.save()
    }

    fn unexpected_exception(&mut self, _: &str, _: &str, exception: &Exception) -> Result<()> {
        self.count(|c| c.errors += 1)?;
        self.case()?.children.push(Node::Error { kind: exception.kind.clone(), text: exception.to_string() });
        self.save()
    }

    fn tear_down_test(&mut self, _: &str, _: &str, output: &str) -> Result<()> {
        let case = self.case()?;
        case.timer.stop();
        case.children.push(Node::Output(output.to_owned()));
        self.save()
    }

    fn tear_down_test_done(&mut self, _: &str, _: &str, output: &str) -> Result<()> {
        self.case()?.timer.stop();
        self.fixture_output(output)
    }
}

impl Timer {
    fn start() -> Self {
        Timer { started: Instant::now(), time: None }
    }

    fn stop(&mut self) {
        let elapsed = self.started.elapsed();
        self.time = Some(elapsed.as_secs() as f64 + elapsed.subsec_nanos() as f64 * 1e-9);
    }
}

fn element<'a>(tag: &'a str,
               name: &str,
               counters: Counters,
               with_tests: bool,
               timer: &Timer) -> BytesStart<'a> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("name", name));

    if with_tests {
        start.push_attribute(("tests", counters.tests.to_string().as_str()));
    }
    start.push_attribute(("assertions", counters.assertions.to_string().as_str()));
    start.push_attribute(("failures", counters.failures.to_string().as_str()));
    start.push_attribute(("errors", counters.errors.to_string().as_str()));

    if let Some(time) = timer.time {
        start.push_attribute(("time", format!("{:.6}", time).as_str()));
    }

    start
}

fn write_node<W>(writer: &mut Writer<W>, node: &Node) -> Result<()>
    where W: Write {
    let (start, text) = match *node {
        Node::Success(ref text) => (BytesStart::new("success"), text),
        Node::Failure(ref text) => (BytesStart::new("failure"), text),
        Node::Output(ref text) => (BytesStart::new("output"), text),
        Node::Error { ref kind, ref text } => {
            let mut start = BytesStart::new("error");
            start.push_attribute(("type", kind.as_str()));
            (start, text)
        },
    };
    let end = start.to_end().into_owned();

    writer.write_event(Event::Start(start)).map_err(report_error)?;
    writer.write_event(Event::Text(BytesText::new(text))).map_err(report_error)?;
    writer.write_event(Event::End(end)).map_err(report_error)?;
    Ok(())
}

fn report_error<E>(e: E) -> Error where E: fmt::Display {
    ErrorKind::Report(e.to_string()).into()
}

fn outside_of(what: &str) -> Error {
    ErrorKind::Report(format!("event received outside of {}", what)).into()
}
