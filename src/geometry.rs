//! Diffraction geometry conversions between 2θ, d-spacing, q and s.
//!
//! Angles are in degrees, lengths in Ångström.

use std::f64::consts::PI;

/// Scattering-vector magnitude: q = 4π·sin(θ)/λ
pub fn tth_to_q(tth: f64, wavelength: f64) -> f64 {
    4.0 * PI * (tth / 2.0).to_radians().sin() / wavelength
}

/// Bragg d-spacing: d = λ / (2·sin(π·2θ/360))
pub fn tth_to_d(tth: f64, wavelength: f64) -> f64 {
    wavelength / (2.0 * (PI * tth / 360.0).sin())
}

/// Inverse of [`tth_to_d`]. Returns NaN when λ/(2d) exceeds one.
pub fn d_to_tth(d_spacing: f64, wavelength: f64) -> f64 {
    2.0 * (wavelength / (2.0 * d_spacing)).asin().to_degrees()
}

/// Reciprocal spacing: s = 1/(2d)
pub fn d_to_s(d_spacing: f64) -> f64 {
    1.0 / (2.0 * d_spacing)
}
