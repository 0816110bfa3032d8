//! Structure metadata parsing
//!
//! Each line is dispatched on its first token. Purely numeric lines carry no
//! label of their own and only mean something as rows of a `wmatrix` block,
//! so the parser tracks whether the last labelled line opened such a block.

use std::path::Path;
use tracing::{debug, info};

use super::read_source;
use crate::error::Result;
use crate::models::{CellParameters, SpaceGroup, StructureMetadata};
use crate::tokens::{Token, clean_line, is_numeric};

/// Context set by the most recent labelled line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    NoContext,
    AwaitingMatrixRows,
}

/// Parse a structure metadata file from disk
pub fn parse_structure_file(path: &Path) -> Result<StructureMetadata> {
    let content = read_source(path)?;
    let structure = parse_structure(&content);
    info!(
        "Parsed structure {}: {} symmetry operations, {} lattice vectors",
        path.display(),
        structure.symmetry.len(),
        structure.lattice_vectors.len()
    );
    Ok(structure)
}

/// Parse structure metadata content
pub fn parse_structure(content: &str) -> StructureMetadata {
    let mut structure = StructureMetadata::default();
    let mut state = BlockState::NoContext;

    for (line_num, line) in content.lines().enumerate() {
        let tokens = clean_line(line);
        let Some((&label, args)) = tokens.split_first() else {
            continue;
        };

        if is_numeric(label) {
            match (state, structure.wmatrix.as_mut()) {
                (BlockState::AwaitingMatrixRows, Some(matrix)) => match parse_floats(&tokens) {
                    Some(row) => matrix.push(row),
                    None => debug!("Line {}: unparsable matrix row skipped", line_num + 1),
                },
                _ => debug!("Line {}: numeric line outside a matrix block", line_num + 1),
            }
            continue;
        }

        state = if label == "wmatrix" {
            BlockState::AwaitingMatrixRows
        } else {
            BlockState::NoContext
        };

        match label {
            "cell" => structure.cell = parse_cell(args),
            "esdcell" => structure.esd_cell = parse_cell(args),
            "ndim" => parse_ndim(&mut structure, args),
            "qi" => structure.qi = parse_vector3(args),
            "qr" => structure.qr = parse_vector3(args),
            "wmatrix" => structure.wmatrix = Some(Vec::new()),
            "spgroup" => {
                if let Some(symbol) = args.first() {
                    structure.space_group = Some(SpaceGroup {
                        symbol: symbol.to_string(),
                        number: args.get(1).and_then(|t| Token::classify(t).as_i64()),
                        num: args.get(2).and_then(|t| Token::classify(t).as_i64()),
                    });
                }
            }
            "lattice" => {
                if let Some(centering) = args.first() {
                    structure.lattice_centering = Some(centering.to_string());
                }
            }
            "lattvec" => match parse_floats(args) {
                Some(vector) => structure.lattice_vectors.push(vector),
                None => debug!("Line {}: unparsable lattice vector skipped", line_num + 1),
            },
            "symmetry" => structure
                .symmetry
                .push(args.iter().map(|t| t.to_string()).collect()),
            _ => {}
        }
    }

    structure
}

/// `ndim <N>` optionally followed by one named counter, e.g. `ncomp 1`
fn parse_ndim(structure: &mut StructureMetadata, args: &[&str]) {
    let Some(ndim) = args.first().and_then(|t| Token::classify(t).as_i64()) else {
        debug!("ndim line without an integer value");
        return;
    };
    structure.ndim = Some(ndim);

    if let [_, name, value] = args {
        if let Some(value) = Token::classify(value).as_i64() {
            structure.counters.insert(name.to_string(), value);
        }
    }
}

fn parse_floats(tokens: &[&str]) -> Option<Vec<f64>> {
    tokens.iter().map(|t| Token::classify(t).as_f64()).collect()
}

fn parse_cell(args: &[&str]) -> Option<CellParameters> {
    let values = parse_floats(args.get(..6)?)?;
    CellParameters::from_slice(&values)
}

fn parse_vector3(args: &[&str]) -> Option<[f64; 3]> {
    match parse_floats(args.get(..3)?)?.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}
