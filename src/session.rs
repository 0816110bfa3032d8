//! Processing session over one JANA working directory.
//!
//! Discovers the reflection, structure and pattern files of a directory,
//! groups them into datasets by their shared file stem, runs the parsers,
//! and keeps each dataset's parsed and classified data. Datasets are
//! independent; a file that fails to parse is logged and counted without
//! affecting its siblings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::assembler::{ReflectionTable, TableExporter, classified_tables, reflection_tables};
use crate::classify::classify;
use crate::config::JanaConfig;
use crate::discovery::{FileDiscovery, dataset_key};
use crate::error::{JanaError, Result};
use crate::models::{ClassifiedReflections, Dataset, ModulationAxis};
use crate::parsers::{ReflectionParser, parse_pattern_file, parse_structure_file};

/// Per-load statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub reflections_parsed: usize,
}

impl LoadStats {
    fn merge(&mut self, other: &LoadStats) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.reflections_parsed += other.reflections_parsed;
    }
}

/// Datasets of one working directory
#[derive(Debug)]
pub struct JanaSession {
    discovery: FileDiscovery,
    config: JanaConfig,
    datasets: BTreeMap<String, Dataset>,
}

impl JanaSession {
    /// Open a session; the directory must exist and the config must validate
    pub fn new(directory: impl Into<PathBuf>, config: JanaConfig) -> Result<Self> {
        config.validate()?;
        let discovery = FileDiscovery::new(directory.into())?;
        Ok(Self {
            discovery,
            config,
            datasets: BTreeMap::new(),
        })
    }

    pub fn directory(&self) -> &Path {
        self.discovery.directory()
    }

    pub fn config(&self) -> &JanaConfig {
        &self.config
    }

    /// Datasets in key order
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }

    pub fn keys(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn dataset(&self, key: &str) -> Result<&Dataset> {
        self.datasets
            .get(key)
            .ok_or_else(|| JanaError::DatasetNotFound {
                key: key.to_string(),
            })
    }

    /// Deterministic ordinal of a dataset (position in key order)
    pub fn ordinal(&self, key: &str) -> Option<usize> {
        self.datasets.keys().position(|k| k == key)
    }

    fn entry(&mut self, path: &Path) -> &mut Dataset {
        let key = dataset_key(path);
        self.datasets
            .entry(key.clone())
            .or_insert_with(|| Dataset::new(key))
    }

    /// Parse every reflection-list file of the directory
    pub fn load_reflections(&mut self) -> Result<LoadStats> {
        let files = self.discovery.find(&self.config.reflection_extension)?;
        let parser = ReflectionParser::new(&self.config);
        let mut stats = LoadStats::default();

        for path in files {
            match parser.parse_file(&path) {
                Ok(result) => {
                    stats.files_processed += 1;
                    let dataset = self.entry(&path);
                    dataset.reflection_file = Some(path.clone());
                    dataset.classified = None;
                    dataset.reflections = result.map(|r| {
                        stats.reflections_parsed += r.stats.reflections_parsed();
                        r.reflections
                    });
                }
                Err(e) => {
                    stats.files_failed += 1;
                    warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        Ok(stats)
    }

    /// Parse every structure metadata file of the directory
    pub fn load_structures(&mut self) -> Result<LoadStats> {
        let files = self.discovery.find(&self.config.structure_extension)?;
        let mut stats = LoadStats::default();

        for path in files {
            match parse_structure_file(&path) {
                Ok(structure) => {
                    stats.files_processed += 1;
                    let dataset = self.entry(&path);
                    dataset.structure_file = Some(path.clone());
                    dataset.structure = Some(structure);
                }
                Err(e) => {
                    stats.files_failed += 1;
                    warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        Ok(stats)
    }

    /// Parse every pattern-curve file of the directory
    pub fn load_patterns(&mut self) -> Result<LoadStats> {
        let files = self.discovery.find(&self.config.pattern_extension)?;
        let mut stats = LoadStats::default();

        for path in files {
            match parse_pattern_file(&path) {
                Ok(pattern) => {
                    stats.files_processed += 1;
                    let dataset = self.entry(&path);
                    dataset.pattern_file = Some(path.clone());
                    dataset.pattern = Some(pattern);
                }
                Err(e) => {
                    stats.files_failed += 1;
                    warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        Ok(stats)
    }

    /// Load reflections, structures and patterns
    pub fn load_all(&mut self) -> Result<LoadStats> {
        let mut stats = self.load_reflections()?;
        stats.merge(&self.load_structures()?);
        stats.merge(&self.load_patterns()?);
        info!(
            "Loaded {} datasets from {} ({} files, {} failed)",
            self.datasets.len(),
            self.directory().display(),
            stats.files_processed,
            stats.files_failed
        );
        Ok(stats)
    }

    /// Classify one dataset's reflections and keep the result on the dataset
    pub fn classify(&mut self, key: &str, axis: ModulationAxis) -> Result<&ClassifiedReflections> {
        let dataset = self
            .datasets
            .get_mut(key)
            .ok_or_else(|| JanaError::DatasetNotFound {
                key: key.to_string(),
            })?;
        let reflections = dataset
            .reflections
            .as_ref()
            .ok_or_else(|| JanaError::NoReflections {
                key: key.to_string(),
            })?;

        let classified = classify(reflections, axis);
        Ok(&*dataset.classified.insert(classified))
    }

    /// Classify every dataset that has reflections; returns how many were classified
    pub fn classify_all(&mut self, axis: ModulationAxis) -> usize {
        let mut count = 0;
        for dataset in self.datasets.values_mut() {
            if let Some(reflections) = dataset.reflections.as_ref() {
                dataset.classified = Some(classify(reflections, axis));
                count += 1;
            }
        }
        count
    }

    /// Tables for a dataset: main/satellites, or the four classified families
    pub fn tables(&self, key: &str, composite: bool) -> Result<Vec<ReflectionTable>> {
        let dataset = self.dataset(key)?;
        let reflections = dataset
            .reflections
            .as_ref()
            .ok_or_else(|| JanaError::NoReflections {
                key: key.to_string(),
            })?;

        if composite {
            let classified = dataset
                .classified
                .as_ref()
                .ok_or_else(|| JanaError::NotClassified {
                    key: key.to_string(),
                })?;
            classified_tables(reflections, classified)
        } else {
            reflection_tables(reflections)
        }
    }

    /// Build and export a dataset's tables.
    ///
    /// The export container must not be the working directory or one of
    /// its parents.
    pub fn export(
        &self,
        key: &str,
        composite: bool,
        exporter: &TableExporter,
    ) -> Result<Vec<PathBuf>> {
        if exporter.overlaps(self.directory()) {
            return Err(JanaError::UnsafeExportPath {
                path: exporter.container_path(),
            });
        }
        let mut tables = self.tables(key, composite)?;
        exporter.write_all(&mut tables)
    }
}
