//! Command-line overrides for the generator configuration.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Generation flags shared by the `grotto` subcommands.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Output scene path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Material library name written on the `mtllib` line.
    #[arg(long)]
    pub mtllib: Option<String>,

    /// Generation seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// World-space floor extent.
    #[arg(long)]
    pub floor_size: Option<f64>,

    /// Shell grid resolution (cells per side).
    #[arg(long)]
    pub floor_res: Option<u32>,

    /// Base crystal count.
    #[arg(long)]
    pub num_crystals: Option<u32>,

    /// Output position scale.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for JSON log files (debug builds only).
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.output {
            self.output.path = path.clone();
        }
        if let Some(ref name) = args.mtllib {
            self.output.material_library = name.clone();
        }
        if let Some(scale) = args.scale {
            self.output.scale = scale;
        }
        if let Some(seed) = args.seed {
            self.generation.seed = seed;
        }
        if let Some(size) = args.floor_size {
            self.generation.floor_size = size;
        }
        if let Some(res) = args.floor_res {
            self.generation.floor_res = res;
        }
        if let Some(n) = args.num_crystals {
            self.generation.num_crystals = n;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.log_dir {
            self.debug.log_dir = Some(dir.clone());
        }
    }
}
