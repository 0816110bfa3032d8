//! Pattern-curve parsing
//!
//! Header labels and their values are interleaved with three-column numeric
//! data. A label at an even position opens a header key whose value is the
//! next token, even when that token sits on the following line. Numeric
//! tokens are positional: 2θ, observed intensity, error.

use std::path::Path;
use tracing::{debug, info};

use super::read_source;
use crate::error::Result;
use crate::geometry::tth_to_q;
use crate::models::PatternData;
use crate::tokens::{Token, clean_line};

/// Parse a pattern-curve file from disk
pub fn parse_pattern_file(path: &Path) -> Result<PatternData> {
    let content = read_source(path)?;
    let pattern = parse_pattern(&content);
    info!(
        "Parsed pattern {}: {} points, {} header entries",
        path.display(),
        pattern.len(),
        pattern.header.len()
    );
    Ok(pattern)
}

/// Parse pattern-curve content
pub fn parse_pattern(content: &str) -> PatternData {
    let mut pattern = PatternData::default();
    let mut pending_key: Option<String> = None;

    for line in content.lines() {
        for (position, raw) in clean_line(line).into_iter().enumerate() {
            let token = Token::classify(raw);

            if let Some(key) = pending_key.take() {
                pattern.header.insert(key, Some(token));
                continue;
            }

            match token {
                Token::Label(label) if position % 2 == 0 => {
                    pattern.header.insert(label.clone(), None);
                    pending_key = Some(label);
                }
                Token::Label(label) => {
                    debug!("Ignoring label '{}' at position {}", label, position);
                }
                numeric => {
                    let Some(value) = numeric.as_f64() else {
                        continue;
                    };
                    match position {
                        0 => push_angle(&mut pattern, value),
                        1 => pattern.yobs.push(value),
                        2 => pattern.error.push(value),
                        _ => {}
                    }
                }
            }
        }
    }

    if pattern.q.len() < pattern.tth.len() {
        debug!(
            "{} of {} points read before the wavelength was known; q omitted for them",
            pattern.tth.len() - pattern.q.len(),
            pattern.tth.len()
        );
    }

    pattern
}

/// Record a 2θ value and its q when the wavelength is already known
fn push_angle(pattern: &mut PatternData, tth: f64) {
    pattern.tth.push(tth);
    if let Some(wavelength) = pattern.wavelength().filter(|w| *w > 0.0) {
        pattern.q.push(tth_to_q(tth, wavelength));
    }
}
