use anyhow::{Context, Result, bail};
use molq_vqe::{ActiveSpaceConfig, PipelineConfig};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::cli::Cli;

/// Read a pipeline configuration; the format follows the file extension.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let config = match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML in {}", path.display()))?,
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
        _ => bail!(
            "unsupported config format for {} (expected .yaml, .yml or .json)",
            path.display()
        ),
    };
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Command-line values win over the file.
pub fn apply_overrides(config: &mut PipelineConfig, cli: &Cli) {
    let molecule = &mut config.molecule;
    if let Some(geometry) = &cli.geometry {
        molecule.geometry = geometry.clone();
    }
    if let Some(basis) = &cli.basis {
        molecule.basis = basis.clone();
    }
    if let Some(unit) = cli.unit {
        molecule.unit = unit;
    }
    if let Some(charge) = cli.charge {
        molecule.charge = charge;
    }
    if let Some(spin) = cli.spin {
        molecule.spin = spin;
    }

    if cli.no_active_space {
        config.active_space = None;
    } else if cli.active_electrons.is_some() || cli.active_orbitals.is_some() {
        let active = config.active_space.get_or_insert_with(ActiveSpaceConfig::default);
        if let Some(electrons) = cli.active_electrons {
            active.num_electrons = electrons;
        }
        if let Some(orbitals) = cli.active_orbitals {
            active.num_spatial_orbitals = orbitals;
            active.active_orbitals = None;
        }
    }

    if let Some(mapper) = cli.mapper {
        config.mapper = mapper;
    }
    if let Some(optimizer) = &cli.optimizer {
        config.optimizer = optimizer.clone();
    }
    if let Some(maxiter) = cli.maxiter {
        config.optimizer = config.optimizer.clone().with_maxiter(maxiter);
    }
    if let Some(reps) = cli.reps {
        config.ansatz.reps = reps;
    }
    if let Some(entanglement) = cli.entanglement {
        config.ansatz.entanglement = entanglement;
    }
    if cli.shots.is_some() {
        config.estimator.shots = cli.shots;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.exact {
        config.exact_reference = true;
    }
}

/// The file (or the defaults), then the command line.
pub fn resolve(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    apply_overrides(&mut config, cli);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use molq_chem::MapperKind;
    use molq_vqe::{Cobyla, Entanglement, OptimizerConfig};
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let file = write_temp(".yaml", "mapper: parity\nansatz:\n  reps: 2\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.mapper, MapperKind::Parity);
        assert_eq!(config.ansatz.reps, 2);
        assert_eq!(config.molecule.geometry, "H 0 0 0; H 0 0 0.735");
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"seed": 4, "optimizer": {"name": "nelder_mead"}}"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.seed, 4);
        assert_eq!(config.optimizer.name(), "nelder_mead");
    }

    #[test]
    fn test_load_errors() {
        let toml = write_temp(".toml", "seed = 4");
        assert!(load_config(toml.path()).is_err());
        let broken = write_temp(".json", "{ seed: ");
        assert!(load_config(broken.path()).is_err());
        assert!(load_config(Path::new("/nonexistent/molq.yaml")).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let file = write_temp(".yml", "seed: 4\nmapper: parity\n");
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "molq",
            "--config",
            &path,
            "--seed",
            "9",
            "--maxiter",
            "200",
            "--entanglement",
            "circular",
            "--exact",
        ])
        .unwrap();
        let config = resolve(&cli).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.mapper, MapperKind::Parity);
        assert_eq!(config.optimizer, OptimizerConfig::Cobyla(Cobyla::default().with_maxiter(200)));
        assert_eq!(config.ansatz.entanglement, Entanglement::Circular);
        assert!(config.exact_reference);
    }

    #[test]
    fn test_active_space_flags() {
        let cli = Cli::try_parse_from(["molq", "--no-active-space"]).unwrap();
        assert_eq!(resolve(&cli).unwrap().active_space, None);

        let cli = Cli::try_parse_from(["molq", "--active-orbitals", "3"]).unwrap();
        let active = resolve(&cli).unwrap().active_space.unwrap();
        assert_eq!(active.num_electrons, 2);
        assert_eq!(active.num_spatial_orbitals, 3);
    }

    #[test]
    fn test_no_flags_is_the_reference_run() {
        let cli = Cli::try_parse_from(["molq"]).unwrap();
        assert_eq!(resolve(&cli).unwrap(), PipelineConfig::default());
    }
}
