//! Progress and summary output on the terminal.

use super::Listener;
use crate::exception::Exception;
use crate::model::AssertionEvent;
use crate::{util, Result};

use std::io::{self, Write};
use std::path::Path;
use term::{self, color};

const SUMMARY_DELIMITER: &'static str = " ";
const SUMMARY_HEADERS: [&'static str; 4] = ["Class Name", "Method Name", "Succeeded", "Failed"];

/// Prints test progress, and a summary table after every suite.
pub struct Console {
    output: Output,
    colors: bool,
    /// Assertion counts per test, in execution order. The last row is the running test.
    tally: Vec<Tally>,
}

enum Output {
    Terminal(Box<term::StdoutTerminal>),
    Plain(Box<dyn Write>),
}

#[derive(Copy, Clone, Debug)]
enum Style {
    Normal,
    Bold,
    Color(color::Color),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Tally {
    class: String,
    method: String,
    succeeded: usize,
    failed: usize,
}

impl Console {
    /// Creates a console listener printing to stdout.
    pub fn new() -> Self {
        let output = match term::stdout() {
            Some(terminal) => Output::Terminal(terminal),
            None => Output::Plain(Box::new(io::stdout())),
        };

        Console { output, colors: true, tally: Vec::new() }
    }

    /// Creates a console listener printing uncolored text to any writer.
    pub fn with_writer<W>(writer: W) -> Self
        where W: Write + 'static {
        Console { output: Output::Plain(Box::new(writer)), colors: false, tally: Vec::new() }
    }

    /// Enables or disables colors. Colors are only ever used on a terminal supporting them.
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    fn write<S>(&mut self, style: Style, text: S) -> Result<()>
        where S: AsRef<str> {
        let text = text.as_ref();

        match self.output {
            Output::Terminal(ref mut terminal) if self.colors && terminal.supports_color() => {
                match style {
                    Style::Normal => (),
                    Style::Bold => terminal.attr(term::Attr::Bold)?,
                    Style::Color(color) => terminal.fg(color)?,
                }
                write!(terminal, "{}", text)?;
                terminal.reset()?;
            },
            Output::Terminal(ref mut terminal) => write!(terminal, "{}", text)?,
            Output::Plain(ref mut writer) => write!(writer, "{}", text)?,
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.output {
            Output::Terminal(ref mut terminal) => terminal.flush()?,
            Output::Plain(ref mut writer) => writer.flush()?,
        }
        Ok(())
    }

    /// Prints captured output, if there is any.
    fn output(&mut self, output: &str) -> Result<()> {
        if output.is_empty() {
            return Ok(());
        }

        self.write(Style::Normal, format!("{}\n", output))
    }

    fn current(&mut self) -> Option<&mut Tally> {
        self.tally.last_mut()
    }

    fn print_summary(&mut self) -> Result<()> {
        let rows: Vec<_> = self.tally.iter().map(|t| {
            [t.class.clone(), t.method.clone(), t.succeeded.to_string(), t.failed.to_string()]
        }).collect();

        let mut widths: Vec<usize> = SUMMARY_HEADERS.iter().map(|h| util::display_width(h)).collect();
        for row in rows.iter() {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(util::display_width(cell));
            }
        }

        let header = SUMMARY_HEADERS.iter().zip(widths.iter())
            .map(|(h, &w)| format!("{:<width$}", h, width = w))
            .collect::<Vec<_>>()
            .join(SUMMARY_DELIMITER);

        self.write(Style::Normal, "\n")?;
        self.write(Style::Bold, header)?;
        self.write(Style::Normal, "\n")?;

        for (row, tally) in rows.iter().zip(self.tally.clone()) {
            let succeeded_style = if tally.succeeded > 0 { Style::Color(color::GREEN) } else { Style::Normal };
            let failed_style = if tally.failed > 0 { Style::Color(color::RED) } else { Style::Normal };

            self.write(Style::Normal, format!("{:<w0$}{d}{:<w1$}{d}",
                                              row[0], row[1], w0 = widths[0], w1 = widths[1], d = SUMMARY_DELIMITER))?;
            self.write(succeeded_style, format!("{:>width$}", row[2], width = widths[2]))?;
            self.write(Style::Normal, SUMMARY_DELIMITER)?;
            self.write(failed_style, format!("{:>width$}", row[3], width = widths[3]))?;
            self.write(Style::Normal, "\n")?;
        }

        Ok(())
    }
}

impl Default for Console {
    fn default() -> Self {
        Console::new()
    }
}

impl Listener for Console {
    fn tear_down_suite(&mut self, _: &Path) -> Result<()> {
        self.print_summary()?;
        self.tally.clear();
        self.flush()
    }

    fn set_up_test(&mut self, class: &str, method: &str, _: &str, _: u32) -> Result<()> {
        self.tally.push(Tally { class: class.to_owned(), method: method.to_owned(), succeeded: 0, failed: 0 });

        self.write(Style::Normal, "\n")?;
        self.write(Style::Bold, format!("Running {}->{}", class, method))?;
        self.write(Style::Normal, "\n")
    }

    fn set_up_test_done(&mut self, _: &str, _: &str, output: &str) -> Result<()> {
        self.output(output)
    }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> {
        if let Some(tally) = self.current() { tally.succeeded += 1; }

        self.write(Style::Color(color::GREEN),
                   format!("Assertion succeeded at {}:{}: {}\n", event.file, event.line, event.message))
    }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> {
        if let Some(tally) = self.current() { tally.failed += 1; }

        self.write(Style::Color(color::RED),
                   format!("Assertion failed at {}:{}: {}\n", event.file, event.line, event.message))
    }

    fn unexpected_exception(&mut self, _: &str, _: &str, exception: &Exception) -> Result<()> {
        self.write(Style::Color(color::MAGENTA), format!("{}\n", exception))
    }

    fn tear_down_test(&mut self, _: &str, _: &str, output: &str) -> Result<()> {
        self.output(output)
    }

    fn tear_down_test_done(&mut self, _: &str, _: &str, output: &str) -> Result<()> {
        self.output(output)?;
        self.flush()
    }
}
