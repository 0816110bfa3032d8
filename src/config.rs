//! Configuration management and validation.
//!
//! Provides the processing configuration (wavelength, diffraction mode,
//! modulation settings, file extensions) and the reflection row layout
//! derived from it once per file.

use crate::constants::{
    DEFAULT_WAVELENGTH_ANGSTROM, PATTERN_EXTENSION, REFLECTION_EXTENSION, STRUCTURE_EXTENSION,
    columns,
};
use crate::error::{JanaError, Result};
use crate::models::{DataType, ModulationAxis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column mapping of a reflection row, fixed per file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowLayout {
    /// 2θ, FWHM and F² read directly; d derived from 2θ
    AngleDispersive {
        tokens: usize,
        fsq: usize,
        fwhm: usize,
        tth: usize,
    },
    /// Flight time, F² and d read directly; 2θ back-derived from d
    TimeOfFlight {
        tokens: usize,
        tof: usize,
        fsq: usize,
        d_spacing: usize,
    },
}

impl RowLayout {
    /// Layout for a data type, optionally overriding the row token count
    pub fn for_data_type(data_type: DataType, tokens: Option<usize>) -> Self {
        let tokens = tokens.unwrap_or_else(|| data_type.expected_tokens());
        match data_type {
            DataType::Xrd => RowLayout::AngleDispersive {
                tokens,
                fsq: columns::xrd::FSQ,
                fwhm: columns::xrd::FWHM,
                tth: columns::xrd::TTH,
            },
            DataType::Tof => RowLayout::TimeOfFlight {
                tokens,
                tof: columns::tof::TOF,
                fsq: columns::tof::FSQ,
                d_spacing: columns::tof::D_SPACING,
            },
        }
    }

    /// Smallest row token count that still reaches every mapped column
    pub fn min_tokens(&self) -> usize {
        let last = match *self {
            RowLayout::AngleDispersive { fsq, fwhm, tth, .. } => fsq.max(fwhm).max(tth),
            RowLayout::TimeOfFlight {
                tof, fsq, d_spacing, ..
            } => tof.max(fsq).max(d_spacing),
        };
        last.max(columns::M) + 1
    }

    /// Exact token count a line needs to be read as a reflection row
    pub fn expected_tokens(&self) -> usize {
        match self {
            RowLayout::AngleDispersive { tokens, .. } | RowLayout::TimeOfFlight { tokens, .. } => {
                *tokens
            }
        }
    }
}

/// Global configuration for JANA processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JanaConfig {
    /// Wavelength in Å used for d-spacing and q conversions
    pub wavelength: f64,

    /// Diffraction mode of the reflection-list files
    pub data_type: DataType,

    /// Explicit reflection row token count (overrides the mode default)
    pub num_cols: Option<usize>,

    /// Index reflections as hklm; the hkl path is not implemented
    pub modulated: bool,

    /// Axis whose Miller index is the common index
    pub modulation_axis: ModulationAxis,

    pub reflection_extension: String,
    pub structure_extension: String,
    pub pattern_extension: String,
}

impl Default for JanaConfig {
    fn default() -> Self {
        Self {
            wavelength: DEFAULT_WAVELENGTH_ANGSTROM,
            data_type: DataType::Xrd,
            num_cols: None,
            modulated: true,
            modulation_axis: ModulationAxis::B,
            reflection_extension: REFLECTION_EXTENSION.to_string(),
            structure_extension: STRUCTURE_EXTENSION.to_string(),
            pattern_extension: PATTERN_EXTENSION.to_string(),
        }
    }
}

impl JanaConfig {
    /// Create configuration with custom wavelength
    pub fn with_wavelength(mut self, wavelength: f64) -> Self {
        self.wavelength = wavelength;
        self
    }

    /// Create configuration for a diffraction mode
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Override the reflection row token count
    pub fn with_num_cols(mut self, num_cols: usize) -> Self {
        self.num_cols = Some(num_cols);
        self
    }

    /// Select the non-modulated (hkl) indexing path
    pub fn without_modulation(mut self) -> Self {
        self.modulated = false;
        self
    }

    pub fn with_modulation_axis(mut self, axis: ModulationAxis) -> Self {
        self.modulation_axis = axis;
        self
    }

    /// Row layout for reflection-list files under this configuration
    pub fn row_layout(&self) -> RowLayout {
        let layout = RowLayout::for_data_type(self.data_type, self.num_cols);
        debug!("Reflection row layout: {:?}", layout);
        layout
    }

    /// Reject settings no parser can work with
    pub fn validate(&self) -> Result<()> {
        if !self.wavelength.is_finite() || self.wavelength <= 0.0 {
            return Err(JanaError::configuration(format!(
                "wavelength must be a positive number of Ångström, got {}",
                self.wavelength
            )));
        }
        if let Some(num_cols) = self.num_cols {
            let required = RowLayout::for_data_type(self.data_type, None).min_tokens();
            if num_cols < required {
                return Err(JanaError::configuration(format!(
                    "{} reflection rows need at least {} tokens, got {}",
                    self.data_type, required, num_cols
                )));
            }
        }
        for ext in [
            &self.reflection_extension,
            &self.structure_extension,
            &self.pattern_extension,
        ] {
            if ext.is_empty() || ext.contains(['/', '\\', '*']) {
                return Err(JanaError::configuration(format!(
                    "invalid file extension '{ext}'"
                )));
            }
        }
        Ok(())
    }
}
