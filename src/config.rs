//! The configuration of a test run.

use crate::run::filter::DEFAULT_TEST_FILTER;

use std::path::PathBuf;

#[cfg(feature = "clap")] pub mod clap;

/// The file extension of the source files test classes are defined in.
pub const DEFAULT_FILE_EXTENSION: &'static str = "rs";

/// The configuration of a test run.
#[derive(Clone, Debug)]
pub struct Config
{
    /// Testbases: source files, or directories containing them.
    /// Every testbase forms one suite.
    pub test_paths: Vec<PathBuf>,
    /// A list of file extensions which may define test classes.
    pub supported_file_extensions: Vec<String>,
    /// Regular expression matched against `Class->method`.
    pub test_filter: String,
    /// Where to write an XML report, if anywhere.
    pub xml_report: Option<PathBuf>,
    /// Whether console output may be colored.
    pub colors: bool,
}

impl Config
{
    /// Adds a testbase.
    pub fn add_search_path<P>(&mut self, path: P) where P: Into<PathBuf> {
        self.test_paths.push(path.into());
    }

    /// Adds a file extension, with or without a leading period.
    pub fn add_extension<S>(&mut self, ext: S) where S: AsRef<str> {
        let ext = ext.as_ref().trim_start_matches('.');

        if !self.is_extension_supported(ext) {
            self.supported_file_extensions.push(ext.to_owned());
        }
    }

    pub fn set_test_filter<S>(&mut self, pattern: S) where S: Into<String> {
        self.test_filter = pattern.into();
    }

    pub fn set_xml_report<P>(&mut self, path: P) where P: Into<PathBuf> {
        self.xml_report = Some(path.into());
    }

    pub fn is_extension_supported(&self, extension: &str) -> bool {
        self.supported_file_extensions.iter().any(|ext| &ext[..] == extension)
    }
}

impl Default for Config
{
    fn default() -> Self {
        Config {
            test_paths: Vec::new(),
            supported_file_extensions: vec![DEFAULT_FILE_EXTENSION.to_owned()],
            test_filter: DEFAULT_TEST_FILTER.to_owned(),
            xml_report: None,
            colors: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_select_rust_sources_and_test_methods() {
        let config = Config::default();
        assert!(config.is_extension_supported("rs"));
        assert_eq!(config.test_filter, DEFAULT_TEST_FILTER);
        assert!(config.test_paths.is_empty());
    }

    #[test]
    fn extensions_are_normalised() {
        let mut config = Config::default();
        config.add_extension(".rs");
        config.add_extension(".inc");

        assert_eq!(config.supported_file_extensions, vec!["rs".to_owned(), "inc".to_owned()]);
    }
}
