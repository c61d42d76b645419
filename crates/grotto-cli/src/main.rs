//! `grotto`: procedural crystal cave scene generator.
//!
//! Run with: `cargo run -p grotto-cli -- generate --seed 7 --output cave.obj`

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use grotto_config::{CliArgs, Config, ConfigError, default_config_dir};
use grotto_scene::{CaveGenerator, clean_file, count_file, save_scene, spheres_file};
use tracing::{info, warn};

/// CLI arguments for the `grotto` binary.
#[derive(Parser, Debug)]
#[command(name = "grotto", version, about = "Procedural crystal cave scene generator")]
struct GrottoArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a crystal cave and write it as a scene file.
    Generate(CliArgs),

    /// Print record counts of a scene file.
    Stats {
        /// Scene file to inspect.
        file: PathBuf,
    },

    /// Copy only vertex and face records, stripping face index suffixes.
    Clean {
        input: PathBuf,
        output: PathBuf,
    },

    /// Replace every face with a sphere centered on its first vertex.
    Spheres {
        input: PathBuf,
        output: PathBuf,

        /// Seed for the sphere radii.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Write the effective configuration to `config.ron`.
    Config(CliArgs),
}

impl Command {
    fn overrides(&self) -> Option<&CliArgs> {
        match self {
            Command::Generate(args) | Command::Config(args) => Some(args),
            _ => None,
        }
    }

    /// Whether a broken `config.ron` must abort the command.
    fn needs_config(&self) -> bool {
        self.overrides().is_some()
    }
}

/// Load `config.ron` from `config_dir`.
///
/// When `strict` is false a broken file is reported and defaults are used;
/// otherwise the error is returned so nothing is written from a config the
/// user did not intend.
fn load_config(config_dir: Option<&Path>, strict: bool) -> Result<Config, ConfigError> {
    let Some(dir) = config_dir else {
        return Ok(Config::default());
    };
    match Config::load_or_default(dir) {
        Ok(config) => Ok(config),
        Err(e) if strict => Err(e),
        Err(e) => {
            eprintln!("Failed to load config: {e}, using defaults");
            Ok(Config::default())
        }
    }
}

fn main() {
    let args = GrottoArgs::parse();
    let overrides = args.command.overrides();

    // Resolve config directory
    let config_dir = overrides
        .and_then(|cli| cli.config.clone())
        .or_else(default_config_dir);

    // Load config, then apply CLI overrides
    let mut config = match load_config(config_dir.as_deref(), args.command.needs_config()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("grotto: {e}");
            std::process::exit(1);
        }
    };
    if let Some(cli) = overrides {
        config.apply_cli_overrides(cli);
    }
    // Debug builds log to <config_dir>/logs unless a directory is configured
    let mut debug = config.debug.clone();
    if debug.log_dir.is_none() {
        debug.log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    }
    grotto_log::init_logging(&debug, cfg!(debug_assertions));

    if let Err(e) = run(args.command, &config, config_dir.as_deref()) {
        eprintln!("grotto: {e}");
        std::process::exit(1);
    }
}

fn run(
    command: Command,
    config: &Config,
    config_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Generate(_) => {
            let generator = CaveGenerator::for_config(config)?;
            let scene = generator.generate();
            let path = save_scene(&scene, &config.output)?;
            let stats = scene.stats();
            println!(
                "Wrote {} with {} vertices and {} faces.",
                path.display(),
                stats.vertices,
                stats.faces
            );
            println!("{stats}");
            info!(helper_points = stats.helper_points, "generation finished");
        }
        Command::Stats { file } => {
            println!("{}", count_file(&file)?);
        }
        Command::Clean { input, output } => {
            clean_file(&input, &output)?;
            println!("Wrote {}", output.display());
        }
        Command::Spheres {
            input,
            output,
            seed,
        } => {
            spheres_file(&input, &output, seed)?;
            println!("Wrote {}", output.display());
        }
        Command::Config(_) => {
            let Some(dir) = config_dir else {
                warn!("No platform config directory; pass --config");
                return Err("no config directory available".into());
            };
            let path = config.save(dir)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken_config_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(generation: (seed: oops))").unwrap();
        dir
    }

    #[test]
    fn test_broken_config_aborts_generation() {
        let dir = broken_config_dir();
        let err = load_config(Some(dir.path()), true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_broken_config_tolerated_by_tools() {
        let dir = broken_config_dir();
        let config = load_config(Some(dir.path()), false).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_generate_and_config_are_strict() {
        let generate = GrottoArgs::parse_from(["grotto", "generate", "--seed", "3"]);
        assert!(generate.command.needs_config());
        let config = GrottoArgs::parse_from(["grotto", "config"]);
        assert!(config.command.needs_config());
        let stats = GrottoArgs::parse_from(["grotto", "stats", "cave.obj"]);
        assert!(!stats.command.needs_config());
    }

    #[test]
    fn test_missing_config_dir_uses_defaults() {
        assert_eq!(load_config(None, true).unwrap(), Config::default());
    }
}
