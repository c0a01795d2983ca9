//! Command-line driver for the reference native layer
//!
//! Loads a species table and a mode descriptor from JSON files, builds the
//! entities, and prints a JSON summary of the resulting mode. With `--bins`
//! the summary also carries the binned number distribution.
//!
//! ```bash
//! RUST_LOG=debug aero-bridge check --species species.json --mode mode.json --bins 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use aero_bridge_core_rs::native::reference::ReferenceLibrary;
use aero_bridge_core_rs::{AeroData, AeroMode, BinGrid, GridKind, ModeKind};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a mode from descriptor files and print its state
    Check {
        /// Species table: `[{"<name>": [density, num_ions, molec_weight, kappa]}, ...]`
        #[arg(long)]
        species: PathBuf,

        /// Mode descriptor: `{"<name>": {<params>}}`
        #[arg(long)]
        mode: PathBuf,

        /// Number of bins for the number distribution
        #[arg(long)]
        bins: Option<usize>,

        /// Lower grid edge (m)
        #[arg(long, default_value_t = 1e-9)]
        min: f64,

        /// Upper grid edge (m)
        #[arg(long, default_value_t = 1e-5)]
        max: f64,

        /// Grid spacing
        #[arg(long, default_value = "log")]
        grid: String,
    },
}

#[derive(Debug, Serialize)]
struct ModeSummary {
    name: String,
    mode_type: ModeKind,
    num_conc: f64,
    char_radius: f64,
    gsd: f64,
    species: Vec<String>,
    vol_frac: Vec<f64>,
    vol_frac_std: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binned: Option<BinnedSummary>,
}

#[derive(Debug, Serialize)]
struct BinnedSummary {
    grid: GridKind,
    centers: Vec<f64>,
    num_dist: Vec<f64>,
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn check(
    lib: &ReferenceLibrary,
    species: &Path,
    mode: &Path,
    bins: Option<usize>,
    grid: (&str, f64, f64),
) -> Result<ModeSummary> {
    let aero_data = AeroData::from_descriptor(&lib.aero_data, &read_json(species)?)
        .context("species table rejected")?;
    let aero_mode = AeroMode::from_descriptor(&lib.aero_mode, &aero_data, &read_json(mode)?)
        .context("mode descriptor rejected")?;

    let binned = match bins {
        Some(n_bin) => {
            let (kind, min, max) = grid;
            let bin_grid = BinGrid::new(&lib.bin_grid, n_bin, kind, min, max)
                .context("invalid bin grid")?;
            Some(BinnedSummary {
                grid: bin_grid.kind()?,
                centers: bin_grid.centers(),
                num_dist: aero_mode.num_dist(&bin_grid, &aero_data),
            })
        }
        None => None,
    };

    Ok(ModeSummary {
        name: aero_mode.name()?,
        mode_type: aero_mode.mode_kind()?,
        num_conc: aero_mode.num_conc(),
        char_radius: aero_mode.char_radius(),
        gsd: aero_mode.gsd(),
        species: aero_data.species()?,
        vol_frac: aero_mode.vol_frac(),
        vol_frac_std: aero_mode.vol_frac_std(),
        binned,
    })
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    match args.command {
        Command::Check {
            species,
            mode,
            bins,
            min,
            max,
            grid,
        } => {
            let lib = ReferenceLibrary::default();
            let summary = check(&lib, &species, &mode, bins, (&grid, min, max))?;
            info!(live = lib.live(), "entities released");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    fn json_file(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn species_file() -> NamedTempFile {
        json_file(&json!([
            {"SO4": [1800, 0, 96e-3, 0.65]},
            {"NH4": [1800, 0, 18e-3, 0.65]}
        ]))
    }

    fn mono_file() -> NamedTempFile {
        json_file(&json!({"accumulation": {
            "mass_frac": [{"NH4": 1}],
            "mode_type": "mono",
            "num_conc": 100.0,
            "diam": 3e-7
        }}))
    }

    #[test]
    fn test_check_builds_summary() {
        let lib = ReferenceLibrary::default();
        let (species, mode) = (species_file(), mono_file());

        let summary = check(&lib, species.path(), mode.path(), None, ("log", 1e-9, 1e-5)).unwrap();

        assert_eq!(summary.name, "accumulation");
        assert_eq!(summary.mode_type, ModeKind::Mono);
        assert_eq!(summary.num_conc, 100.0);
        assert_eq!(summary.char_radius, 1.5e-7);
        assert_eq!(summary.species, vec!["SO4", "NH4"]);
        assert_eq!(summary.vol_frac, vec![0.0, 1.0]);
        assert!(summary.binned.is_none());
        assert_eq!(lib.live(), 0);

        let rendered = serde_json::to_value(&summary).unwrap();
        assert_eq!(rendered["mode_type"], json!("mono"));
        assert!(rendered.get("binned").is_none());
    }

    #[test]
    fn test_check_with_bins() {
        let lib = ReferenceLibrary::default();
        let (species, mode) = (species_file(), mono_file());

        let summary =
            check(&lib, species.path(), mode.path(), Some(8), ("linear", 0.0, 8e-7)).unwrap();

        let binned = summary.binned.unwrap();
        assert_eq!(binned.grid, GridKind::Linear);
        assert_eq!(binned.centers.len(), 8);
        // radius 1.5e-7 falls in the second bin [1e-7, 2e-7)
        let filled: Vec<usize> = (0..8).filter(|&i| binned.num_dist[i] > 0.0).collect();
        assert_eq!(filled, vec![1]);
    }

    #[test]
    fn test_check_reports_rejected_mode() {
        let lib = ReferenceLibrary::default();
        let species = species_file();
        let mode = json_file(&json!({"m": {"mode_type": "mono"}}));

        let err = check(&lib, species.path(), mode.path(), None, ("log", 1e-9, 1e-5)).unwrap_err();

        assert_eq!(err.to_string(), "mode descriptor rejected");
        assert_eq!(lib.live(), 0);
    }

    #[test]
    fn test_check_reports_unparseable_file() {
        let lib = ReferenceLibrary::default();
        let species = json_file(&json!("not a table"));
        let broken = NamedTempFile::new().unwrap();

        assert!(check(&lib, species.path(), broken.path(), None, ("log", 1e-9, 1e-5)).is_err());
        let err =
            check(&lib, broken.path(), species.path(), None, ("log", 1e-9, 1e-5)).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
