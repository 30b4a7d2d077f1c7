//! Selection of the test methods to run.

use crate::Result;

use regex::Regex;

/// Selects methods whose name ends in `test`, in any case.
pub const DEFAULT_TEST_FILTER: &'static str = "(?i)test$";

/// A regular expression matched against `Class->method`.
///
/// The expression is searched for, not anchored, unless it anchors itself.
#[derive(Clone, Debug)]
pub struct Filter {
    pattern: Regex,
}

impl Filter {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Filter { pattern: Regex::new(pattern)? })
    }

    pub fn matches(&self, class: &str, method: &str) -> bool {
        self.pattern.is_match(&qualified_name(class, method))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter { pattern: Regex::new(DEFAULT_TEST_FILTER).unwrap() }
    }
}

/// The name a filter is matched against.
pub fn qualified_name(class: &str, method: &str) -> String {
    format!("{}->{}", class, method)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_filter_selects_methods_ending_in_test() {
        let filter = Filter::default();

        assert!(filter.matches("SampleTest", "dummy_test"));
        assert!(filter.matches("Sample", "dummyTest"));
        assert!(!filter.matches("SampleTest", "helper"));
        assert!(!filter.matches("Sample", "test_helper"));
    }

    #[test]
    fn patterns_search_the_qualified_name() {
        let filter = Filter::new("Sample->other").unwrap();

        assert!(filter.matches("Sample", "other_test"));
        assert!(filter.matches("NestedSample", "other_test"));
        assert!(!filter.matches("Sample", "dummy_test"));
    }

    #[test]
    fn invalid_patterns_are_errors() {
        assert!(Filter::new("(unclosed").is_err());
    }
}
