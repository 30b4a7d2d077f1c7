use super::Listener;
use crate::exception::Exception;
use crate::model::AssertionEvent;
use crate::Result;

use std::path::Path;

/// Forwards every event to any number of listeners, in registration order.
///
/// Use this to report to the console and to a file at the same time. The
/// first listener to fail stops the event from reaching the ones after it.
#[derive(Default)]
pub struct Spreader {
    listeners: Vec<Box<dyn Listener>>,
}

impl Spreader {
    pub fn new(listeners: Vec<Box<dyn Listener>>) -> Self {
        Spreader { listeners }
    }

    /// Appends a listener.
    pub fn with<L>(mut self, listener: L) -> Self
        where L: Listener + 'static {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn spread<F>(&mut self, mut event: F) -> Result<()>
        where F: FnMut(&mut dyn Listener) -> Result<()> {
        for listener in self.listeners.iter_mut() {
            event(&mut **listener)?;
        }
        Ok(())
    }
}

impl Listener for Spreader {
    fn set_up_suite(&mut self, path: &Path) -> Result<()> {
        self.spread(|l| l.set_up_suite(path))
    }

    fn tear_down_suite(&mut self, path: &Path) -> Result<()> {
        self.spread(|l| l.tear_down_suite(path))
    }

    fn set_up_class(&mut self, class: &str) -> Result<()> {
        self.spread(|l| l.set_up_class(class))
    }

    fn tear_down_class(&mut self, class: &str) -> Result<()> {
        self.spread(|l| l.tear_down_class(class))
    }

    fn skipped_test(&mut self, class: &str, method: &str) -> Result<()> {
        self.spread(|l| l.skipped_test(class, method))
    }

    fn set_up_test(&mut self, class: &str, method: &str, file: &str, line: u32) -> Result<()> {
        self.spread(|l| l.set_up_test(class, method, file, line))
    }

    fn set_up_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        self.spread(|l| l.set_up_test_done(class, method, output))
    }

    fn assertion_success(&mut self, event: &AssertionEvent) -> Result<()> {
        self.spread(|l| l.assertion_success(event))
    }

    fn assertion_failure(&mut self, event: &AssertionEvent) -> Result<()> {
        self.spread(|l| l.assertion_failure(event))
    }

    fn unexpected_exception(&mut self, class: &str, method: &str, exception: &Exception) -> Result<()> {
        self.spread(|l| l.unexpected_exception(class, method, exception))
    }

    fn tear_down_test(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        self.spread(|l| l.tear_down_test(class, method, output))
    }

    fn tear_down_test_done(&mut self, class: &str, method: &str, output: &str) -> Result<()> {
        self.spread(|l| l.tear_down_test_done(class, method, output))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records into a log shared with the test.
    struct Shared(&'static str, Rc<RefCell<Vec<String>>>);

    impl Listener for Shared {
        fn set_up_class(&mut self, class: &str) -> Result<()> {
            self.1.borrow_mut().push(format!("{}:{}", self.0, class));
            Ok(())
        }
    }

    struct Broken;

    impl Listener for Broken {
        fn set_up_class(&mut self, _: &str) -> Result<()> {
            Err(ErrorKind::Report("disk full".to_owned()).into())
        }
    }

    #[test]
    fn forwards_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut spreader = Spreader::default()
            .with(Shared("first", log.clone()))
            .with(Shared("second", log.clone()));

        spreader.set_up_class("Sample").unwrap();
        assert_eq!(*log.borrow(), vec!["first:Sample".to_owned(), "second:Sample".to_owned()]);
    }

    #[test]
    fn first_error_stops_the_fan_out() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listeners: Vec<Box<dyn Listener>> = vec![Box::new(Broken), Box::new(Shared("after", log.clone()))];
        let mut spreader = Spreader::new(listeners);

        assert!(spreader.set_up_class("Sample").is_err());
        assert!(log.borrow().is_empty());
    }
}
