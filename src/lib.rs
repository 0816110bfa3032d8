//! JANA Processor Library
//!
//! A Rust library for reading the text output of the JANA structure
//! refinement program and turning it into reflection tables for modulated
//! (superspace) structures.
//!
//! This library provides tools for:
//! - Tokenizing JANA's whitespace-padded lines into integers, floats and labels
//! - Parsing reflection lists (`.prf`), structure metadata (`.m50`) and pattern curves (`.m90`)
//! - Deriving d-spacing, q and s for every reflection in X-ray or time-of-flight mode
//! - Classifying reflections into overlapping primary, secondary, common and satellite families
//! - Assembling reflection collections into polars tables and exporting them as sheets

pub mod assembler;
pub mod classify;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod selection;
}

pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod geometry;
pub mod models;
pub mod parsers;
pub mod session;
pub mod tokens;

// Re-export commonly used types
pub use assembler::{ExportFormat, ReflectionTable, TableExporter};
pub use config::{JanaConfig, RowLayout};
pub use error::{JanaError, Result};
pub use models::{
    ClassifiedReflections, DataType, Dataset, Family, ModulationAxis, PatternData, Reflection,
    ReflectionSet, StructureMetadata,
};
pub use session::{JanaSession, LoadStats};
pub use tokens::Token;
