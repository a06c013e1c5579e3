//! # BuddyCheck
//!
//! Parametric generator for the BuddyCheck toggle-switch enclosure: a bottom
//! shell with a labelled row of toggles on its front face, and a lid with
//! light-pass holes that seats in the shell's ledge.
//!
//! ## Architecture
//!
//! The workspace is split into crates:
//!
//! 1. **buddycheck-core** - Dimension set, label sequence, derived positions
//! 2. **buddycheck-settings** - Config files (JSON/TOML) and the default location
//! 3. **buddycheck-designer** - Work planes, profiles, recipes, builders, STL export
//! 4. **buddycheck** - This binary: logging, orchestration, console summary

pub mod generate;
pub mod summary;

pub use generate::{generate, generate_with, GenerationReport, PartReport};
pub use summary::render_summary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Events go to stderr so the summary on stdout stays clean. The level
/// defaults to INFO; `RUST_LOG` overrides it.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init()?,
    }

    Ok(())
}
