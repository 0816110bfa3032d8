//! Core data structures for JANA processing.
//!
//! Defines the diffraction mode and modulation axis selectors, the parsed
//! pattern/structure/reflection records, the classified reflection families,
//! and the per-dataset record that ties them together.

use crate::constants::{TOF_ROW_TOKENS, WAVELENGTH_HEADER_KEY, XRD_ROW_TOKENS};
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Diffraction data types supported by the reflection parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    /// Angle-dispersive X-ray diffraction
    #[default]
    Xrd,
    /// Time-of-flight neutron diffraction
    Tof,
}

impl DataType {
    /// Get the expected token count of a reflection row for this data type
    pub fn expected_tokens(&self) -> usize {
        match self {
            DataType::Xrd => XRD_ROW_TOKENS,
            DataType::Tof => TOF_ROW_TOKENS,
        }
    }

    pub fn is_time_of_flight(&self) -> bool {
        matches!(self, DataType::Tof)
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xrd" => Ok(DataType::Xrd),
            "tof" => Ok(DataType::Tof),
            other => Err(format!("unknown data type '{other}' (expected xrd or tof)")),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Xrd => write!(f, "xrd"),
            DataType::Tof => write!(f, "tof"),
        }
    }
}

/// Crystallographic axis along which the modulation runs.
///
/// Selects which of h, k, l is the common index fixed at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModulationAxis {
    A,
    #[default]
    B,
    C,
}

impl FromStr for ModulationAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(ModulationAxis::A),
            "b" => Ok(ModulationAxis::B),
            "c" => Ok(ModulationAxis::C),
            other => Err(format!("unknown modulation axis '{other}' (expected a, b or c)")),
        }
    }
}

impl fmt::Display for ModulationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModulationAxis::A => write!(f, "a"),
            ModulationAxis::B => write!(f, "b"),
            ModulationAxis::C => write!(f, "c"),
        }
    }
}

// =============================================================================
// Reflections
// =============================================================================

/// A single indexed reflection from a reflection-list file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    /// Sequence number within its main/satellite bucket
    pub index: usize,
    pub h: i64,
    pub k: i64,
    pub l: i64,
    /// Modulation order; zero for main reflections
    pub m: i64,
    /// Two-theta in degrees
    pub tth: f64,
    pub q: f64,
    pub s: f64,
    pub d_spacing: f64,
    /// Squared structure factor
    pub fsq: f64,
    pub fwhm: Option<f64>,
    /// Time of flight, time-of-flight mode only
    pub tof: Option<f64>,
    pub label: String,
}

impl Reflection {
    /// Space separated "h k l m" string
    pub fn hklm(&self) -> String {
        format!("{} {} {} {}", self.h, self.k, self.l, self.m)
    }

    pub fn is_main(&self) -> bool {
        self.m == 0
    }

    pub fn bucket(&self) -> Bucket {
        if self.is_main() {
            Bucket::Main
        } else {
            Bucket::Satellite
        }
    }

    /// The Miller index selected by a modulation axis
    pub fn index_along(&self, axis: ModulationAxis) -> i64 {
        match axis {
            ModulationAxis::A => self.h,
            ModulationAxis::B => self.k,
            ModulationAxis::C => self.l,
        }
    }
}

/// Main (m = 0) or satellite (m ≠ 0) bucket of a reflection set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Main,
    Satellite,
}

impl Bucket {
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Main => "main",
            Bucket::Satellite => "satellite",
        }
    }
}

/// Stable identity of a reflection inside a [`ReflectionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReflectionRef {
    pub bucket: Bucket,
    pub index: usize,
}

/// An ordered reflection collection with its plotting arrays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectionList {
    pub reflections: Vec<Reflection>,
    pub tth: Vec<f64>,
    pub q: Vec<f64>,
    pub labels: Vec<String>,
    /// Present in time-of-flight mode only
    pub tof: Option<Vec<f64>>,
}

impl ReflectionList {
    pub fn new(time_of_flight: bool) -> Self {
        Self {
            tof: time_of_flight.then(Vec::new),
            ..Default::default()
        }
    }

    /// Append a reflection and its derived array entries
    pub fn push(&mut self, reflection: Reflection) {
        self.tth.push(reflection.tth);
        self.q.push(reflection.q);
        self.labels.push(reflection.label.clone());
        if let (Some(tof), Some(value)) = (self.tof.as_mut(), reflection.tof) {
            tof.push(value);
        }
        self.reflections.push(reflection);
    }

    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Reflection> {
        self.reflections.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reflection> {
        self.reflections.iter()
    }
}

/// Reflections of one dataset split into main and satellite buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionSet {
    pub data_type: DataType,
    pub wavelength: f64,
    pub main: ReflectionList,
    pub satellite: ReflectionList,
}

impl ReflectionSet {
    pub fn new(data_type: DataType, wavelength: f64) -> Self {
        let tof = data_type.is_time_of_flight();
        Self {
            data_type,
            wavelength,
            main: ReflectionList::new(tof),
            satellite: ReflectionList::new(tof),
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &ReflectionList {
        match bucket {
            Bucket::Main => &self.main,
            Bucket::Satellite => &self.satellite,
        }
    }

    pub fn get(&self, reference: ReflectionRef) -> Option<&Reflection> {
        self.bucket(reference.bucket).get(reference.index)
    }

    /// Every reflection, main bucket first, with its stable reference
    pub fn iter_all(&self) -> impl Iterator<Item = (ReflectionRef, &Reflection)> {
        [Bucket::Main, Bucket::Satellite]
            .into_iter()
            .flat_map(move |bucket| {
                self.bucket(bucket)
                    .iter()
                    .enumerate()
                    .map(move |(index, r)| (ReflectionRef { bucket, index }, r))
            })
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.satellite.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.satellite.is_empty()
    }
}

// =============================================================================
// Classification
// =============================================================================

/// The four overlapping reflection families of a modulated structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Primary,
    Secondary,
    Common,
    Satellites,
}

impl Family {
    pub const ALL: [Family; 4] = [
        Family::Primary,
        Family::Secondary,
        Family::Common,
        Family::Satellites,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Family::Primary => "primary",
            Family::Secondary => "secondary",
            Family::Common => "common",
            Family::Satellites => "satellites",
        }
    }
}

/// References into a [`ReflectionSet`] with the family's plotting arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionFamily {
    pub family: Family,
    pub members: Vec<ReflectionRef>,
    pub tth: Vec<f64>,
    pub q: Vec<f64>,
    pub d: Vec<f64>,
    pub s: Vec<f64>,
    pub labels: Vec<String>,
}

impl ReflectionFamily {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            members: Vec::new(),
            tth: Vec::new(),
            q: Vec::new(),
            d: Vec::new(),
            s: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, reference: ReflectionRef) -> bool {
        self.members.contains(&reference)
    }
}

/// Non-exclusive classification of a dataset's reflections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedReflections {
    pub axis: ModulationAxis,
    pub primary: ReflectionFamily,
    pub secondary: ReflectionFamily,
    pub common: ReflectionFamily,
    pub satellites: ReflectionFamily,
}

impl ClassifiedReflections {
    pub fn family(&self, family: Family) -> &ReflectionFamily {
        match family {
            Family::Primary => &self.primary,
            Family::Secondary => &self.secondary,
            Family::Common => &self.common,
            Family::Satellites => &self.satellites,
        }
    }

    /// Families in sheet order
    pub fn families(&self) -> [&ReflectionFamily; 4] {
        [&self.primary, &self.secondary, &self.common, &self.satellites]
    }
}

// =============================================================================
// Pattern and Structure
// =============================================================================

/// Pattern-curve data: header plus 2θ, q, intensity and error columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternData {
    /// Header labels; `None` until the paired value has been read
    pub header: BTreeMap<String, Option<Token>>,
    pub tth: Vec<f64>,
    /// Only filled for points read after the wavelength was known
    pub q: Vec<f64>,
    pub yobs: Vec<f64>,
    pub error: Vec<f64>,
}

impl PatternData {
    /// Wavelength from the header, if already parsed
    pub fn wavelength(&self) -> Option<f64> {
        self.header
            .get(WAVELENGTH_HEADER_KEY)
            .and_then(|v| v.as_ref())
            .and_then(Token::as_f64)
    }

    pub fn len(&self) -> usize {
        self.tth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tth.is_empty()
    }
}

/// Unit cell constants (lengths in Å, angles in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl CellParameters {
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [a, b, c, alpha, beta, gamma, ..] => Some(Self {
                a: *a,
                b: *b,
                c: *c,
                alpha: *alpha,
                beta: *beta,
                gamma: *gamma,
            }),
            _ => None,
        }
    }
}

/// Superspace group symbol with optional numbering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceGroup {
    pub symbol: String,
    pub number: Option<i64>,
    pub num: Option<i64>,
}

/// Structure metadata from a structure file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMetadata {
    pub cell: Option<CellParameters>,
    pub esd_cell: Option<CellParameters>,
    pub ndim: Option<i64>,
    /// Named counters declared on the `ndim` line, e.g. `ncomp`
    pub counters: BTreeMap<String, i64>,
    pub qi: Option<[f64; 3]>,
    pub qr: Option<[f64; 3]>,
    /// Rows accumulated after a `wmatrix` declaration
    pub wmatrix: Option<Vec<Vec<f64>>>,
    pub space_group: Option<SpaceGroup>,
    pub lattice_centering: Option<String>,
    pub lattice_vectors: Vec<Vec<f64>>,
    pub symmetry: Vec<Vec<String>>,
}

// =============================================================================
// Dataset
// =============================================================================

/// Everything parsed for one refined dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Canonical file stem shared by the dataset's files
    pub key: String,
    pub reflection_file: Option<PathBuf>,
    pub structure_file: Option<PathBuf>,
    pub pattern_file: Option<PathBuf>,
    pub pattern: Option<PatternData>,
    pub structure: Option<StructureMetadata>,
    pub reflections: Option<ReflectionSet>,
    pub classified: Option<ClassifiedReflections>,
}

impl Dataset {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}
