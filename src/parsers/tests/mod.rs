//! Test utilities and sample content for the JANA file parsers
//!
//! Sample files are small but keep the shape of real JANA output: header
//! and summary lines mixed in with the data rows the parsers pick out.

use std::io::Write;
use tempfile::NamedTempFile;

mod structure_tests;

pub const CU_KA1: f64 = 1.540593;

/// Reflection list with two main and two satellite rows plus noise lines
pub const SAMPLE_PRF: &str = "\
 Reflection list for phase 1
   h   k   l   m    mult  phase   tw   ok     F2         fwhm       2th       sinthl       ang     corr      Fcalc    Iobs   ext
   1   0   0   0    2    1    0    0    250.125    0.0410    10.2514    0.0577    0.0    1.0    15.8    0.0    0.0
   1   0  -2   1    2    1    0    0    123.45     0.045     12.5       0.0706    0.0    1.0    11.1    0.0    0.0
   0   1   1  -1    4    1    0    0     17.2      0.047     14.9031    0.0842    0.0    1.0     4.1    0.0    0.0
   2   1   0   0    4    1    0    0    980.0      0.052     20.4872    0.1155    0.0    1.0    31.3    0.0    0.0
 Rp = 4.12  wRp = 5.60
";

/// Time-of-flight list: one main row, one satellite row
pub const SAMPLE_TOF_PRF: &str = "\
   1   0   0   0    2    1  10234.5    0    0    55.2    2.5    0.0    1.0
   0   2   1   1    2    1   8120.0    0    0    12.9    2.0    0.0    1.0
";

/// Structure metadata with a two-row modulation matrix
pub const SAMPLE_M50: &str = "\
Version Jana2006
title   Ca2CoSi2O7 modulated
cell 7.8332 7.8332 5.0103 90 90 90
esdcell 0.0002 0.0002 0.0001 0 0 0
ndim 4 ncomp 1
qi 0.2826 0.2826 0
qr 0 0 0
wmatrix
 1 0 0 0
 0 1 0 0
spgroup P-421m(ab0)00s 113 1
lattice P
symmetry x1 x2 x3 x4
symmetry -x1 -x2 x3 -x4
lattvec 0 0 0 0
";

/// Pattern curve with the wavelength header before the data
pub const SAMPLE_M90: &str = "\
lambda 1.540593
radtype 1
10.0 100 5
10.02 104.5 5.1
10.04 98 4.9
";

/// Create a temporary file with the given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
