//! Expression corpus: loading, fingerprinting, and extraction from model files.
//!
//! # Corpus file
//!
//! ```text
//! one Boolean expression per line
//! (surrounding whitespace is ignored, blank lines are dropped)
//! ```
//!
//! After loading, expressions are sorted by ascending character length (stable, so equal
//! lengths keep file order). Reports rely on this order to progress from small to large
//! inputs.
//!
//! # Model files
//!
//! Update functions are the lines of the form `$<variable>: <expression>`; every other
//! line (regulations, `#` comments, blanks) is ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use biodivine_lib_bdd::boolean_expression::BooleanExpression;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::backend::{BooleanBackend, LibBdd, VariableUniverse};
use crate::error::{BenchError, Result};

/// Minimum length (exclusive) of an update function worth extracting.
pub const DEFAULT_MIN_LEN: usize = 100;

/// Extension of model files scanned by the extraction tool.
pub const DEFAULT_MODEL_EXTENSION: &str = "aeon";

/// Read-only, length-sorted list of expressions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionCorpus {
    expressions: Vec<String>,
}

impl ExpressionCorpus {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expressions: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        expressions.sort_by_key(|e| e.chars().count());
        ExpressionCorpus { expressions }
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expressions.iter().map(String::as_str)
    }
}

pub fn load_expressions<P: AsRef<Path>>(path: P) -> Result<ExpressionCorpus> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        io::Error::new(e.kind(), format!("cannot read corpus {}: {e}", path.display()))
    })?;
    Ok(ExpressionCorpus::from_lines(text.lines()))
}

/// Row key of an expression: `<sha256 hex>__<character length>`.
pub fn fingerprint(expression: &str) -> String {
    let digest = Sha256::digest(expression.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{hex}__{}", expression.chars().count())
}

/// Universe of the variables used in `expression`, in sorted name order.
///
/// The support is read with the BDD backend's parser, so malformed text is a
/// [`BenchError::BackendFailure`] like any other parse failure during a run.
pub fn expression_universe(expression: &str) -> Result<VariableUniverse> {
    let parsed = BooleanExpression::try_from(expression)
        .map_err(|e| BenchError::backend(LibBdd::LABEL, e))?;
    let mut names: Vec<String> = parsed.support_set().into_iter().collect();
    names.sort();
    VariableUniverse::new(names)
}

/// Model files in `dir` with the given extension, sorted by file name.
pub fn model_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BenchError::invalid_input(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == extension) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Update functions of one model, in declaration order.
pub fn update_functions(model: &str) -> Vec<(&str, &str)> {
    model
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('$'))
        .filter_map(|line| line.split_once(':'))
        .map(|(name, update)| (name.trim(), update.trim()))
        .collect()
}

/// All update functions longer than `min_len` characters across the models in `dir`.
pub fn extract_expressions(dir: &Path, extension: &str, min_len: usize) -> Result<Vec<String>> {
    let mut result = Vec::new();
    for file in model_files(dir, extension)? {
        let model = fs::read_to_string(&file)?;
        let before = result.len();
        result.extend(
            update_functions(&model)
                .into_iter()
                .filter(|(_, update)| update.chars().count() > min_len)
                .map(|(_, update)| update.to_string()),
        );
        log::debug!(
            "{}: {} update functions over {min_len} characters",
            file.display(),
            result.len() - before
        );
    }
    Ok(result)
}
