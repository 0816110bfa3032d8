//! Application constants for JANA processor
//!
//! Default values, file extensions, row layouts and sheet names used
//! throughout the crate.

// =============================================================================
// Instrument Defaults
// =============================================================================

/// Cu Kα1 wavelength in Ångström, used when no wavelength is configured
pub const DEFAULT_WAVELENGTH_ANGSTROM: f64 = 1.540593;

/// Header key in pattern files carrying the wavelength
pub const WAVELENGTH_HEADER_KEY: &str = "lambda";

// =============================================================================
// File Extensions
// =============================================================================

/// Reflection-list files (hklm, intensities and peak positions)
pub const REFLECTION_EXTENSION: &str = "prf";

/// Structure metadata files (cell, symmetry, modulation vectors)
pub const STRUCTURE_EXTENSION: &str = "m50";

/// Pattern-curve files (2θ, observed intensity, error)
pub const PATTERN_EXTENSION: &str = "m90";

// =============================================================================
// Reflection Row Layouts
// =============================================================================

/// Token count of a reflection row in angle-dispersive X-ray mode
pub const XRD_ROW_TOKENS: usize = 17;

/// Token count of a reflection row in time-of-flight neutron mode
pub const TOF_ROW_TOKENS: usize = 13;

/// Zero-based column offsets within a reflection row
pub mod columns {
    pub const H: usize = 0;
    pub const K: usize = 1;
    pub const L: usize = 2;
    pub const M: usize = 3;

    /// Angle-dispersive X-ray offsets
    pub mod xrd {
        pub const FSQ: usize = 8;
        pub const FWHM: usize = 9;
        pub const TTH: usize = 10;
    }

    /// Time-of-flight neutron offsets
    pub mod tof {
        pub const TOF: usize = 6;
        pub const FSQ: usize = 9;
        pub const D_SPACING: usize = 10;
    }
}

// =============================================================================
// Export
// =============================================================================

/// Sheet names for the main/satellite tables
pub const REFLECTION_SHEETS: [&str; 2] = ["main", "satellites"];

/// Sheet names for the classified tables
pub const CLASSIFIED_SHEETS: [&str; 4] = ["primary", "secondary", "common", "satellites"];

/// Default export container name
pub const DEFAULT_EXPORT_NAME: &str = "data";

/// Line break used inside presentation labels
pub const LABEL_LINE_BREAK: &str = "<br>";

/// Ångström sign used in presentation labels
pub const ANGSTROM: &str = "Å";
