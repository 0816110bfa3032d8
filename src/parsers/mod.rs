//! Parsers for the three JANA output files written per refined dataset
//!
//! ## Architecture
//!
//! - [`reflections`] - reflection-list (`.prf`) rows into main/satellite sets
//! - [`structure`] - structure metadata (`.m50`) into cell, symmetry and matrix data
//! - [`pattern`] - pattern curves (`.m90`) into header and 2θ/intensity/error columns
//!
//! All three share the tokenizer in [`crate::tokens`]. Files are read whole;
//! lines or fields that cannot be interpreted are skipped, and only a missing
//! or unreadable file is reported as an error.

pub mod pattern;
pub mod reflections;
pub mod structure;

#[cfg(test)]
pub mod tests;

pub use pattern::{parse_pattern, parse_pattern_file};
pub use reflections::{ReflectionParseResult, ReflectionParseStats, ReflectionParser};
pub use structure::{parse_structure, parse_structure_file};

use crate::error::{JanaError, Result};
use std::path::Path;

/// Read a whole input file, mapping a missing file to [`JanaError::FileNotFound`]
pub(crate) fn read_source(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(JanaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}
