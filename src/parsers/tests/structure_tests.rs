//! Tests for structure metadata parsing

use super::{SAMPLE_M50, create_temp_file};
use crate::error::JanaError;
use crate::models::StructureMetadata;
use crate::parsers::structure::{parse_structure, parse_structure_file};

#[test]
fn test_sample_structure() {
    let structure = parse_structure(SAMPLE_M50);

    let cell = structure.cell.unwrap();
    assert_eq!((cell.a, cell.b, cell.c), (7.8332, 7.8332, 5.0103));
    assert_eq!((cell.alpha, cell.beta, cell.gamma), (90.0, 90.0, 90.0));
    assert_eq!(structure.esd_cell.unwrap().c, 0.0001);

    assert_eq!(structure.ndim, Some(4));
    assert_eq!(structure.counters.get("ncomp"), Some(&1));
    assert_eq!(structure.qi, Some([0.2826, 0.2826, 0.0]));
    assert_eq!(structure.qr, Some([0.0, 0.0, 0.0]));

    let group = structure.space_group.unwrap();
    assert_eq!(group.symbol, "P-421m(ab0)00s");
    assert_eq!(group.number, Some(113));
    assert_eq!(group.num, Some(1));

    assert_eq!(structure.lattice_centering.as_deref(), Some("P"));
    assert_eq!(structure.lattice_vectors, vec![vec![0.0; 4]]);
    assert_eq!(structure.symmetry.len(), 2);
    assert_eq!(structure.symmetry[1], vec!["-x1", "-x2", "x3", "-x4"]);
}

#[test]
fn test_wmatrix_collects_following_numeric_rows() {
    let structure = parse_structure(SAMPLE_M50);
    assert_eq!(
        structure.wmatrix,
        Some(vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]])
    );
}

#[test]
fn test_numeric_lines_outside_matrix_are_inert() {
    let content = "\
1 2 3
cell 5 5 5 90 90 90
4 5 6
wmatrix
1 0 0
cell 5 5 5 90 90 90
0 1 0
";
    let structure = parse_structure(content);
    // Only the row directly under wmatrix belongs to the matrix
    assert_eq!(structure.wmatrix, Some(vec![vec![1.0, 0.0, 0.0]]));
    assert!(structure.cell.is_some());
}

#[test]
fn test_numeric_rows_without_wmatrix_are_ignored() {
    let structure = parse_structure("1 0 0 0\n0 1 0 0\n");
    assert_eq!(structure.wmatrix, None);
}

#[test]
fn test_spgroup_with_missing_numbers() {
    let structure = parse_structure("spgroup Pnma\n");
    let group = structure.space_group.unwrap();
    assert_eq!(group.symbol, "Pnma");
    assert_eq!(group.number, None);
    assert_eq!(group.num, None);

    let structure = parse_structure("spgroup Pnma 62\n");
    assert_eq!(structure.space_group.unwrap().number, Some(62));
}

#[test]
fn test_ndim_without_counter() {
    let structure = parse_structure("ndim 3\n");
    assert_eq!(structure.ndim, Some(3));
    assert!(structure.counters.is_empty());
}

#[test]
fn test_short_cell_line_is_ignored() {
    let structure = parse_structure("cell 5 5 5\nesdcell a b c d e f\n");
    assert!(structure.cell.is_none());
    assert!(structure.esd_cell.is_none());
}

#[test]
fn test_empty_and_unknown_lines() {
    let structure = parse_structure("\n   \nfoo bar baz\nVersion Jana2006\n");
    assert_eq!(structure, StructureMetadata::default());
}

#[test]
fn test_parse_structure_file() {
    let temp_file = create_temp_file(SAMPLE_M50);
    let structure = parse_structure_file(temp_file.path()).unwrap();
    assert_eq!(structure.ndim, Some(4));

    let result = parse_structure_file(std::path::Path::new("/nonexistent/phase.m50"));
    assert!(matches!(result, Err(JanaError::FileNotFound { .. })));
}
