//! Command line arguments for the headless driver.

use anyhow::{Context as _, Result};
use clap::Parser;
use core::time::Duration;
use effects::EffectsConfig;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Replay the portfolio page effects against an in-memory page",
    long_about = "Replay the portfolio page effects against an in-memory page.\n\n\
                  Prints every change of the typed text and of the active skill tab,\n\
                  stamped with page time. Settings come from FOLIO_* environment\n\
                  variables unless a JSON file is given."
)]
pub struct Cli {
    /// JSON settings file (an `EffectsConfig` object; missing fields keep defaults).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page time to replay, in milliseconds.
    #[arg(long = "duration-ms", default_value_t = 20_000)]
    pub duration_ms: u64,

    /// Pace the replay with real sleeps instead of running instantly.
    #[arg(long)]
    pub live: bool,
}

impl Cli {
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Settings from `--config` when given, the environment otherwise.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not hold valid settings.
    pub fn load_config(&self) -> Result<EffectsConfig> {
        let Some(path) = &self.config else {
            return Ok(EffectsConfig::from_env());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        EffectsConfig::from_json(&json)
            .with_context(|| format!("parsing settings from {}", path.display()))
    }
}
