//! Command-line driver.

use anyhow::Context;
use clap::Parser;
use metagen_codegen::{Generator, GeneratorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate serde-ready Rust types from an LSP meta model
#[derive(Parser, Debug, Clone)]
#[command(name = "metagen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the meta model JSON document
    #[arg(short, long, default_value = "metaModel.json")]
    pub input: PathBuf,

    /// Output file for the generated code (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy inherited properties into each struct instead of flattening bases
    #[arg(long)]
    pub flatten_bases: bool,

    /// Omit documentation comments
    #[arg(long)]
    pub no_docs: bool,

    /// Extra line for the generated file header
    #[arg(long)]
    pub header: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the generator configuration from the flags.
    #[must_use]
    pub fn config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::new()
            .flatten_bases(self.flatten_bases)
            .emit_docs(!self.no_docs);
        match &self.header {
            Some(header) => config.header(header.clone()),
            None => config,
        }
    }

    /// Returns the default log filter for the verbosity level.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Installs the tracing subscriber, honoring `RUST_LOG` when set.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the generator for parsed command-line arguments.
///
/// Returns the generated code when no output file is given.
///
/// # Errors
/// Returns an error naming the failing step if the input cannot be loaded,
/// generation fails or the output cannot be written.
pub fn run(cli: &Cli) -> anyhow::Result<Option<String>> {
    let model = metagen_schema::load_meta_model(&cli.input)
        .with_context(|| format!("failed to load meta model from {}", cli.input.display()))?;

    tracing::info!(
        input = %cli.input.display(),
        version = %model.meta_data.version,
        requests = model.requests.len(),
        notifications = model.notifications.len(),
        "loaded meta model"
    );

    let code = Generator::with_config(&model, cli.config())
        .generate()
        .context("code generation failed")?;

    let Some(output) = &cli.output else {
        return Ok(Some(code));
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output, &code)
        .with_context(|| format!("failed to write generated code to {}", output.display()))?;

    tracing::info!(output = %output.display(), bytes = code.len(), "wrote generated code");
    Ok(None)
}
