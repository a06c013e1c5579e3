use anyhow::Context;
use buddycheck::{generate, init_logging, render_summary, LogFormat};
use buddycheck_core::StlFormat;
use buddycheck_settings::Config;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "buddycheck")]
#[command(version)]
#[command(about = "Generate the BuddyCheck toggle-switch enclosure as printable STL files")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json); defaults to the user config file
    config: Option<PathBuf>,

    /// Output directory, overriding the configuration
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// STL encoding, overriding the configuration
    #[arg(long, short, value_enum)]
    format: Option<CliStlFormat>,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliStlFormat {
    Binary,
    Ascii,
}

impl From<CliStlFormat> for StlFormat {
    fn from(format: CliStlFormat) -> Self {
        match format {
            CliStlFormat::Binary => StlFormat::Binary,
            CliStlFormat::Ascii => StlFormat::Ascii,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    })?;

    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(dir) = cli.out {
        config.output.directory = dir;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }

    if let Some(path) = cli.write_config {
        config
            .save_to_file(&path)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let report = generate(&config)?;
    println!("{}", render_summary(&config, &report));
    Ok(())
}
