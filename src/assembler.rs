//! Tabular assembly and export of reflection collections
//!
//! Turns the main/satellite buckets or the four classified families of a
//! dataset into polars `DataFrame`s, one row per reflection, and writes them
//! as named sheets of an export container.
//!
//! An export container is a directory `<destination>/<name>/` holding one
//! file per sheet. The first table of a batch is written in overwrite mode
//! (every sheet file of the container is removed first), later tables are
//! appended to it. Files that are not sheets are never touched.

use polars::prelude::{Column, CsvWriter, DataFrame, ParquetWriter, SerWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::constants::{CLASSIFIED_SHEETS, DEFAULT_EXPORT_NAME, REFLECTION_SHEETS};
use crate::error::Result;
use crate::models::{ClassifiedReflections, Reflection, ReflectionSet};

/// A table with the sheet name it is exported under
#[derive(Debug, Clone)]
pub struct ReflectionTable {
    pub sheet: &'static str,
    pub frame: DataFrame,
}

/// Build a table from reflections.
///
/// Columns are every reflection attribute except the bucket sequence number
/// and the presentation label; `tof` is only included in time-of-flight
/// mode. The d-spacing column is named `d-spacing`. An empty input gives a
/// zero-row table with the same columns.
pub fn reflection_frame<'a>(
    reflections: impl IntoIterator<Item = &'a Reflection>,
    time_of_flight: bool,
) -> Result<DataFrame> {
    let rows: Vec<&Reflection> = reflections.into_iter().collect();

    let mut columns = vec![
        Column::new(
            "hklm".into(),
            rows.iter().map(|r| r.hklm()).collect::<Vec<_>>(),
        ),
        Column::new("h".into(), rows.iter().map(|r| r.h).collect::<Vec<_>>()),
        Column::new("k".into(), rows.iter().map(|r| r.k).collect::<Vec<_>>()),
        Column::new("l".into(), rows.iter().map(|r| r.l).collect::<Vec<_>>()),
        Column::new("m".into(), rows.iter().map(|r| r.m).collect::<Vec<_>>()),
        Column::new("tth".into(), rows.iter().map(|r| r.tth).collect::<Vec<_>>()),
        Column::new("q".into(), rows.iter().map(|r| r.q).collect::<Vec<_>>()),
        Column::new("s".into(), rows.iter().map(|r| r.s).collect::<Vec<_>>()),
        Column::new(
            "d-spacing".into(),
            rows.iter().map(|r| r.d_spacing).collect::<Vec<_>>(),
        ),
        Column::new("fsq".into(), rows.iter().map(|r| r.fsq).collect::<Vec<_>>()),
        Column::new(
            "fwhm".into(),
            rows.iter().map(|r| r.fwhm).collect::<Vec<Option<f64>>>(),
        ),
    ];
    if time_of_flight {
        columns.push(Column::new(
            "tof".into(),
            rows.iter().map(|r| r.tof).collect::<Vec<Option<f64>>>(),
        ));
    }

    Ok(DataFrame::new(columns)?)
}

/// Main and satellite tables, sheets `main` and `satellites`
pub fn reflection_tables(set: &ReflectionSet) -> Result<Vec<ReflectionTable>> {
    let tof = set.data_type.is_time_of_flight();
    let [main_sheet, satellite_sheet] = REFLECTION_SHEETS;

    Ok(vec![
        ReflectionTable {
            sheet: main_sheet,
            frame: reflection_frame(set.main.iter(), tof)?,
        },
        ReflectionTable {
            sheet: satellite_sheet,
            frame: reflection_frame(set.satellite.iter(), tof)?,
        },
    ])
}

/// Primary, secondary, common and satellite tables
pub fn classified_tables(
    set: &ReflectionSet,
    classified: &ClassifiedReflections,
) -> Result<Vec<ReflectionTable>> {
    let tof = set.data_type.is_time_of_flight();

    classified
        .families()
        .into_iter()
        .zip(CLASSIFIED_SHEETS)
        .map(|(family, sheet)| {
            let members = family.members.iter().filter_map(|r| set.get(*r));
            Ok(ReflectionTable {
                sheet,
                frame: reflection_frame(members, tof)?,
            })
        })
        .collect()
}

/// On-disk format of exported sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" | "pq" => Ok(ExportFormat::Parquet),
            other => Err(format!("unknown export format '{other}' (expected csv or parquet)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes tables as sheets of a named export container
#[derive(Debug, Clone)]
pub struct TableExporter {
    name: String,
    destination: PathBuf,
    format: ExportFormat,
}

impl TableExporter {
    /// Create an exporter; the destination defaults to the current directory
    pub fn new(name: impl Into<String>, destination: Option<PathBuf>, format: ExportFormat) -> Self {
        Self {
            name: name.into(),
            destination: destination.unwrap_or_else(|| PathBuf::from(".")),
            format,
        }
    }

    /// Directory holding the exported sheets
    pub fn container_path(&self) -> PathBuf {
        self.destination.join(&self.name)
    }

    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.container_path()
            .join(format!("{}.{}", sheet, self.format.extension()))
    }

    /// Write one table as a sheet.
    ///
    /// With `overwrite` the sheet files of the container are removed first,
    /// otherwise the sheet is added to the existing container (replacing a
    /// sheet of the same name).
    pub fn write_table(&self, frame: &mut DataFrame, sheet: &str, overwrite: bool) -> Result<PathBuf> {
        let container = self.container_path();
        if overwrite {
            self.clear_sheets()?;
        }
        fs::create_dir_all(&container)?;

        let path = self.sheet_path(sheet);
        write_frame(frame, &path, self.format)?;
        info!(
            "Saved {} rows to {} (sheet: {})",
            frame.height(),
            path.display(),
            sheet
        );
        Ok(path)
    }

    /// Remove every sheet file this exporter could have written earlier
    fn clear_sheets(&self) -> Result<()> {
        let sheets = REFLECTION_SHEETS.iter().chain(CLASSIFIED_SHEETS.iter());
        for sheet in sheets {
            for format in [ExportFormat::Csv, ExportFormat::Parquet] {
                let path = self
                    .container_path()
                    .join(format!("{}.{}", sheet, format.extension()));
                if path.is_file() {
                    debug!("Removing previous sheet {}", path.display());
                    fs::remove_file(&path)?;
                }
            }
        }
        Ok(())
    }

    /// Whether writing here could clobber `directory` or one of its parents
    pub fn overlaps(&self, directory: &Path) -> bool {
        match (self.container_path().canonicalize(), directory.canonicalize()) {
            (Ok(container), Ok(directory)) => directory.starts_with(container),
            _ => false,
        }
    }

    /// Write a batch of tables, the first one in overwrite mode
    pub fn write_all(&self, tables: &mut [ReflectionTable]) -> Result<Vec<PathBuf>> {
        tables
            .iter_mut()
            .enumerate()
            .map(|(i, table)| self.write_table(&mut table.frame, table.sheet, i == 0))
            .collect()
    }
}

impl Default for TableExporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_NAME, None, ExportFormat::default())
    }
}

fn write_frame(frame: &mut DataFrame, path: &Path, format: ExportFormat) -> Result<()> {
    let mut file = File::create(path)?;
    match format {
        ExportFormat::Csv => CsvWriter::new(&mut file).finish(frame)?,
        ExportFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(frame)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::{DataType, ModulationAxis};
    use tempfile::TempDir;

    fn reflection(index: usize, h: i64, k: i64, l: i64, m: i64, tof: Option<f64>) -> Reflection {
        Reflection {
            index,
            h,
            k,
            l,
            m,
            tth: 12.5,
            q: 0.89,
            s: 0.071,
            d_spacing: 7.07,
            fsq: 0.1234,
            fwhm: tof.is_none().then_some(0.045),
            tof,
            label: "label".to_string(),
        }
    }

    fn sample_set() -> ReflectionSet {
        let mut set = ReflectionSet::new(DataType::Xrd, 1.540593);
        set.main.push(reflection(0, 1, 0, 2, 0, None));
        set.main.push(reflection(1, 1, 1, 0, 0, None));
        set.satellite.push(reflection(0, 1, 2, -2, 1, None));
        set
    }

    #[test]
    fn test_reflection_frame_columns() {
        let set = sample_set();
        let frame = reflection_frame(set.main.iter(), false).unwrap();

        assert_eq!(frame.height(), 2);
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["hklm", "h", "k", "l", "m", "tth", "q", "s", "d-spacing", "fsq", "fwhm"]
        );
        assert!(!names.contains(&"index".to_string()));
    }

    #[test]
    fn test_tof_frame_has_tof_and_null_fwhm() {
        let mut set = ReflectionSet::new(DataType::Tof, 1.0);
        set.main.push(reflection(0, 1, 0, 0, 0, Some(10234.5)));
        let frame = reflection_frame(set.main.iter(), true).unwrap();

        assert!(frame.column("tof").is_ok());
        assert_eq!(frame.column("fwhm").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_collection_gives_empty_table() {
        let set = ReflectionSet::new(DataType::Xrd, 1.540593);
        let tables = reflection_tables(&set).unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].sheet, "main");
        assert_eq!(tables[1].sheet, "satellites");
        for table in &tables {
            assert_eq!(table.frame.height(), 0);
            assert_eq!(table.frame.width(), 11);
        }
    }

    #[test]
    fn test_classified_tables_resolve_references() {
        let set = sample_set();
        let classified = classify(&set, ModulationAxis::B);
        let tables = classified_tables(&set, &classified).unwrap();

        let sheets: Vec<_> = tables.iter().map(|t| t.sheet).collect();
        assert_eq!(sheets, vec!["primary", "secondary", "common", "satellites"]);
        assert_eq!(tables[0].frame.height(), 2);
        assert_eq!(tables[1].frame.height(), 1);
        assert_eq!(tables[2].frame.height(), 1);
        assert_eq!(tables[3].frame.height(), 1);
    }

    #[test]
    fn test_export_overwrites_then_appends() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = TableExporter::new(
            "sample",
            Some(temp_dir.path().to_path_buf()),
            ExportFormat::Csv,
        );

        // Sheets of an earlier composite export go, other files stay
        fs::create_dir_all(exporter.container_path()).unwrap();
        fs::write(exporter.sheet_path("primary"), "old").unwrap();
        fs::write(exporter.container_path().join("primary.parquet"), "old").unwrap();
        fs::write(exporter.container_path().join("notes.txt"), "keep").unwrap();
        fs::write(exporter.container_path().join("sample.prf"), "keep").unwrap();

        let mut tables = reflection_tables(&sample_set()).unwrap();
        let written = exporter.write_all(&mut tables).unwrap();

        assert_eq!(written.len(), 2);
        assert!(exporter.sheet_path("main").exists());
        assert!(exporter.sheet_path("satellites").exists());
        assert!(!exporter.sheet_path("primary").exists());
        assert!(!exporter.container_path().join("primary.parquet").exists());
        assert_eq!(
            fs::read_to_string(exporter.container_path().join("notes.txt")).unwrap(),
            "keep"
        );
        assert!(exporter.container_path().join("sample.prf").exists());

        let main_csv = fs::read_to_string(exporter.sheet_path("main")).unwrap();
        assert!(main_csv.starts_with("hklm,h,k,l,m,"));
        assert_eq!(main_csv.lines().count(), 3);
    }

    #[test]
    fn test_overlaps_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        let working = temp_dir.path().join("sample1");
        fs::create_dir_all(working.join("nested")).unwrap();

        let same = TableExporter::new("sample1", Some(temp_dir.path().to_path_buf()), ExportFormat::Csv);
        assert!(same.overlaps(&working));
        assert!(same.overlaps(&working.join("nested")));

        // A container inside the working directory does not clobber it
        let inside = TableExporter::new("out", Some(working.clone()), ExportFormat::Csv);
        assert!(!inside.overlaps(&working));

        let missing = TableExporter::new("sample2", Some(temp_dir.path().to_path_buf()), ExportFormat::Csv);
        assert!(!missing.overlaps(&working));
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "parquet".parse::<ExportFormat>().unwrap(),
            ExportFormat::Parquet
        );
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
