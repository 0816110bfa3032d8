//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::assembler::ExportFormat;
use crate::config::JanaConfig;
use crate::constants::DEFAULT_WAVELENGTH_ANGSTROM;
use crate::models::{DataType, ModulationAxis};

#[derive(Parser, Debug, Clone)]
#[command(name = "jana-processor")]
#[command(about = "Parse JANA refinement output into reflection tables and classify superspace reflections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// JANA working directory holding the .prf/.m50/.m90 files
    ///
    /// If missing or not a directory, you are asked to pick one interactively
    /// (unless `--no-prompt` is given).
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Wavelength in Å used for d-spacing and q
    #[arg(short = 'w', long, default_value_t = DEFAULT_WAVELENGTH_ANGSTROM)]
    pub wavelength: f64,

    /// Diffraction mode of the reflection lists (xrd, tof)
    #[arg(short = 't', long = "data-type", default_value = "xrd")]
    pub data_type: DataType,

    /// Override the token count of a reflection row
    #[arg(long = "num-cols", value_name = "COUNT")]
    pub num_cols: Option<usize>,

    /// Treat reflection lists as non-modulated (hkl); nothing is parsed
    #[arg(long)]
    pub unmodulated: bool,

    /// Modulation axis whose index is the common index (a, b, c)
    #[arg(short = 'a', long, default_value = "b")]
    pub axis: ModulationAxis,

    /// Export the four classified families instead of main/satellites
    #[arg(short = 'c', long)]
    pub composite: bool,

    /// Export destination directory; nothing is exported without it
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Prefix for export container names (`<name>_<dataset>`)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Sheet file format (csv, parquet)
    #[arg(short = 'f', long, default_value = "csv")]
    pub format: ExportFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Fail instead of prompting when the directory is missing
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Processing configuration from the command line
    pub fn to_config(&self) -> JanaConfig {
        let mut config = JanaConfig::default()
            .with_wavelength(self.wavelength)
            .with_data_type(self.data_type)
            .with_modulation_axis(self.axis);
        if let Some(num_cols) = self.num_cols {
            config = config.with_num_cols(num_cols);
        }
        if self.unmodulated {
            config = config.without_modulation();
        }
        config
    }

    /// Export container name for a dataset
    pub fn container_name(&self, key: &str) -> String {
        match &self.name {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["jana-processor"]).unwrap();
        assert!(args.directory.is_none());
        assert_eq!(args.wavelength, 1.540593);
        assert_eq!(args.data_type, DataType::Xrd);
        assert_eq!(args.axis, ModulationAxis::B);
        assert_eq!(args.format, ExportFormat::Csv);
        assert_eq!(args.get_log_level(), "info");

        let config = args.to_config();
        assert!(config.modulated);
        assert_eq!(config, JanaConfig::default());
    }

    #[test]
    fn test_config_from_flags() {
        let args = Args::try_parse_from([
            "jana-processor",
            "run1",
            "--wavelength",
            "0.7093",
            "--data-type",
            "tof",
            "--num-cols",
            "14",
            "--axis",
            "c",
            "--unmodulated",
        ])
        .unwrap();

        let config = args.to_config();
        assert_eq!(args.directory, Some(PathBuf::from("run1")));
        assert_eq!(config.wavelength, 0.7093);
        assert_eq!(config.data_type, DataType::Tof);
        assert_eq!(config.num_cols, Some(14));
        assert_eq!(config.modulation_axis, ModulationAxis::C);
        assert!(!config.modulated);
    }

    #[test]
    fn test_rejects_unknown_axis() {
        assert!(Args::try_parse_from(["jana-processor", "--axis", "d"]).is_err());
        assert!(Args::try_parse_from(["jana-processor", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_container_name() {
        let mut args = Args::try_parse_from(["jana-processor"]).unwrap();
        assert_eq!(args.container_name("phase1"), "phase1");
        args.name = Some("run".to_string());
        assert_eq!(args.container_name("phase1"), "run_phase1");
    }
}
