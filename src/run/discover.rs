//! Assignment of registered test classes to testbases.

use super::find_files;
use crate::case::{Registry, TestClass};
use crate::{Config, ErrorKind, Result};

use std::path::{Path, PathBuf};

/// The classes found under one testbase.
#[derive(Clone, Debug)]
pub struct Suite {
    pub path: PathBuf,
    pub classes: Vec<TestClass>,
}

/// Builds one suite per configured testbase.
///
/// A class belongs to a suite if the file defining it is one of the testbase's
/// eligible files. A class found under several testbases is only run with the
/// first of them.
pub fn suites(registry: &Registry, config: &Config) -> Result<Vec<Suite>> {
    if config.test_paths.is_empty() {
        return Err(ErrorKind::MissingOption("testbase".to_owned()).into());
    }

    let mut claimed = vec![false; registry.classes().len()];
    let mut suites = Vec::new();

    for path in config.test_paths.iter() {
        let files = find_files::in_path(path, config)?;
        let mut classes = Vec::new();

        for (index, class) in registry.classes().iter().enumerate() {
            if claimed[index] {
                continue;
            }

            let class_file = find_files::normalize(Path::new(class.file));
            if files.iter().any(|file| is_same_file(file, &class_file)) {
                claimed[index] = true;
                classes.push(*class);
            }
        }

        debug!("testbase {} holds {} test classes in {} files", path.display(), classes.len(), files.len());
        suites.push(Suite { path: path.clone(), classes });
    }

    Ok(suites)
}

/// Compares a found file with the `file!()` path of a class.
///
/// `file!()` paths are relative to the package root, so an absolute file
/// matches if it ends with the class path.
fn is_same_file(file: &Path, class_file: &Path) -> bool {
    if file == class_file {
        return true;
    }

    file.is_absolute() && class_file.is_relative() && file.ends_with(class_file)
}
