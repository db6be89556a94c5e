//! Generalized Fibonacci generator with bounded, validated arithmetic.

use std::path::PathBuf;

use clap::Args;

pub mod config;
pub mod error;
pub mod generator;
pub mod handle;
pub mod telemetry;

pub use config::GeneratorConfig;
pub use error::{FibonacciError, Param};
pub use generator::{Fibonacci, Term, ValidationPolicy, DEFAULT_MAX_VALUE};
pub use handle::{Handle, Scope};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[clap(help = "Index of the last term to generate")]
    pub n: u16,
    #[clap(short, long, default_value_t = 0, help = "First seed")]
    pub a: u16,
    #[clap(short, long, default_value_t = 0, help = "Second seed")]
    pub b: u16,
    #[clap(
        long,
        overrides_with = "lenient",
        help = "Validate seeds and bound every term, even if the config file says otherwise"
    )]
    pub strict: bool,
    #[clap(
        long,
        overrides_with = "strict",
        help = "Skip seed and range validation; terms wrap at 16 bits"
    )]
    pub lenient: bool,
    #[clap(long, help = "Largest term allowed in strict mode")]
    pub max_value: Option<u32>,
    #[clap(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub enable_telemetry: bool,
    #[clap(long, default_value = "./telemetry")]
    pub telemetry_output_path: String,
}

impl GenerateArgs {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: GeneratorConfig) -> GeneratorConfig {
        if self.strict {
            config.strict = true;
        } else if self.lenient {
            config.strict = false;
        }
        if let Some(max_value) = self.max_value {
            config.max_value = max_value;
        }
        config
    }
}
