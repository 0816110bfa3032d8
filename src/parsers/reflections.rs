//! Reflection-list parsing
//!
//! A line is a reflection row only when its token count matches the row
//! layout exactly; there are no keyword anchors. The first four tokens are
//! h, k, l, m and the remaining fields are read from the layout's fixed
//! columns. Rows are split into main (m = 0) and satellite (m ≠ 0) buckets,
//! each numbered in file order.

use std::path::Path;
use tracing::{debug, info, warn};

use super::read_source;
use crate::config::{JanaConfig, RowLayout};
use crate::constants::{ANGSTROM, LABEL_LINE_BREAK, columns};
use crate::error::Result;
use crate::geometry::{d_to_s, d_to_tth, tth_to_d, tth_to_q};
use crate::models::{Bucket, DataType, Reflection, ReflectionSet};
use crate::tokens::{Token, clean_line};

/// Reflection parsing result with basic statistics
#[derive(Debug, Clone)]
pub struct ReflectionParseResult {
    pub reflections: ReflectionSet,
    pub stats: ReflectionParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ReflectionParseStats {
    /// Lines in the file
    pub total_lines: usize,

    /// Lines whose token count matched the row layout
    pub rows_matched: usize,

    /// Matched rows with unreadable indices or values
    pub rows_skipped: usize,

    pub main_reflections: usize,
    pub satellite_reflections: usize,
}

impl ReflectionParseStats {
    pub fn reflections_parsed(&self) -> usize {
        self.main_reflections + self.satellite_reflections
    }
}

/// Numeric fields of one reflection row before bucketing
#[derive(Debug, Clone, Copy)]
struct RowValues {
    h: i64,
    k: i64,
    l: i64,
    m: i64,
    tth: f64,
    q: f64,
    s: f64,
    d_spacing: f64,
    fsq: f64,
    fwhm: Option<f64>,
    tof: Option<f64>,
}

/// Reflection-list parser bound to one configuration
#[derive(Debug, Clone)]
pub struct ReflectionParser {
    layout: RowLayout,
    data_type: DataType,
    wavelength: f64,
    modulated: bool,
}

impl ReflectionParser {
    pub fn new(config: &JanaConfig) -> Self {
        Self {
            layout: config.row_layout(),
            data_type: config.data_type,
            wavelength: config.wavelength,
            modulated: config.modulated,
        }
    }

    pub fn layout(&self) -> RowLayout {
        self.layout
    }

    /// Parse a reflection-list file.
    ///
    /// Returns `Ok(None)` for the non-modulated indexing path, which is not
    /// implemented and produces no data.
    pub fn parse_file(&self, path: &Path) -> Result<Option<ReflectionParseResult>> {
        if !self.modulated {
            warn!(
                "Non-modulated (hkl) indexing is not available yet; skipping {}",
                path.display()
            );
            return Ok(None);
        }

        let content = read_source(path)?;
        let result = self.parse_modulated(&content);
        info!(
            "Parsed reflections {}: {} main, {} satellite from {} matching rows",
            path.display(),
            result.stats.main_reflections,
            result.stats.satellite_reflections,
            result.stats.rows_matched
        );
        Ok(Some(result))
    }

    /// Parse reflection-list content; `None` on the non-modulated path
    pub fn parse(&self, content: &str) -> Option<ReflectionParseResult> {
        if !self.modulated {
            warn!("Non-modulated (hkl) indexing is not available yet");
            return None;
        }
        Some(self.parse_modulated(content))
    }

    fn parse_modulated(&self, content: &str) -> ReflectionParseResult {
        let mut reflections = ReflectionSet::new(self.data_type, self.wavelength);
        let mut stats = ReflectionParseStats::default();
        let expected = self.layout.expected_tokens();

        for (line_num, line) in content.lines().enumerate() {
            stats.total_lines += 1;
            let tokens = clean_line(line);
            if tokens.len() != expected {
                continue;
            }
            stats.rows_matched += 1;

            let Some(values) = self.parse_row(&tokens) else {
                stats.rows_skipped += 1;
                debug!("Line {}: unreadable reflection row skipped", line_num + 1);
                continue;
            };

            let bucket = if values.m == 0 {
                Bucket::Main
            } else {
                Bucket::Satellite
            };
            let list = match bucket {
                Bucket::Main => {
                    stats.main_reflections += 1;
                    &mut reflections.main
                }
                Bucket::Satellite => {
                    stats.satellite_reflections += 1;
                    &mut reflections.satellite
                }
            };

            let reflection = build_reflection(list.len(), bucket, values);
            list.push(reflection);
        }

        ReflectionParseResult { reflections, stats }
    }

    fn parse_row(&self, tokens: &[&str]) -> Option<RowValues> {
        let integer = |i: usize| tokens.get(i).and_then(|t| Token::classify(t).as_i64());
        let number = |i: usize| tokens.get(i).and_then(|t| Token::classify(t).as_f64());

        let h = integer(columns::H)?;
        let k = integer(columns::K)?;
        let l = integer(columns::L)?;
        let m = integer(columns::M)?;
        let wavelength = self.wavelength;

        let values = match self.layout {
            RowLayout::AngleDispersive { fsq, fwhm, tth, .. } => {
                let fsq = number(fsq)?;
                let fwhm = number(fwhm)?;
                let tth = number(tth)?;
                let d_spacing = tth_to_d(tth, wavelength);
                RowValues {
                    h,
                    k,
                    l,
                    m,
                    tth,
                    q: tth_to_q(tth, wavelength),
                    s: d_to_s(d_spacing),
                    d_spacing,
                    fsq,
                    fwhm: Some(fwhm),
                    tof: None,
                }
            }
            RowLayout::TimeOfFlight {
                tof, fsq, d_spacing, ..
            } => {
                let tof = number(tof)?;
                let fsq = number(fsq)?;
                let d_spacing = number(d_spacing)?;
                let tth = d_to_tth(d_spacing, wavelength);
                RowValues {
                    h,
                    k,
                    l,
                    m,
                    tth,
                    q: tth_to_q(tth, wavelength),
                    s: d_to_s(d_spacing),
                    d_spacing,
                    fsq,
                    fwhm: None,
                    tof: Some(tof),
                }
            }
        };

        Some(values)
    }
}

fn build_reflection(index: usize, bucket: Bucket, values: RowValues) -> Reflection {
    let mut reflection = Reflection {
        index,
        h: values.h,
        k: values.k,
        l: values.l,
        m: values.m,
        tth: values.tth,
        q: values.q,
        s: values.s,
        d_spacing: values.d_spacing,
        fsq: values.fsq,
        fwhm: values.fwhm,
        tof: values.tof,
        label: String::new(),
    };
    reflection.label = reflection_label(bucket, &reflection);
    reflection
}

/// Presentation label attached to every parsed reflection
pub fn reflection_label(bucket: Bucket, reflection: &Reflection) -> String {
    let fwhm = reflection
        .fwhm
        .map(|w| w.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    [
        bucket.name().to_string(),
        format!("hklm: ({})", reflection.hklm()),
        format!("d-spacing: {:.4} {}", reflection.d_spacing, ANGSTROM),
        format!("FSQ: {}", reflection.fsq),
        format!("FWHM: {}", fwhm),
        format!("tth: {:.4}", reflection.tth),
        format!("q: {:.4}", reflection.q),
    ]
    .join(LABEL_LINE_BREAK)
}
