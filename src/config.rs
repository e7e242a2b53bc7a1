use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::display::{OutputFormat, Theme};
use crate::input::parse_birth_date;

const DEFAULT_CONFIG_FILE: &str = "BirthdayClock.toml";
const DEFAULT_INTERVAL_MS: u64 = 1000;

/// On-disk shape of `BirthdayClock.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    birth_date: Option<String>,
    refresh_interval_ms: Option<u64>,
    theme: Option<Theme>,
    output: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub birth_date: Option<NaiveDate>,
    pub refresh_interval: Duration,
    pub theme: Theme,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            birth_date: None,
            refresh_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            theme: Theme::default(),
            output: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then `BIRTHDAY_CLOCK_*` variables,
    /// then a birth date given as the first argument.
    pub fn load(arg: Option<String>) -> Result<Self> {
        Self::load_with(arg, |key| std::env::var(key).ok())
    }

    fn load_with(arg: Option<String>, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Settings::default();

        let explicit = var("BIRTHDAY_CLOCK_CONFIG").map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if path.exists() {
            settings.apply_file(&path)?;
        } else if explicit.is_some() {
            bail!("Configuration file {} not found", path.display());
        }

        settings.apply_env(&var)?;

        if let Some(arg) = arg {
            settings.birth_date =
                Some(parse_birth_date(&arg).context("Invalid birth date argument")?);
        }

        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.apply_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration file");
        Ok(())
    }

    fn apply_toml(&mut self, content: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(content)?;
        if let Some(raw) = file.birth_date {
            self.birth_date = Some(parse_birth_date(&raw)?);
        }
        if let Some(ms) = file.refresh_interval_ms {
            self.refresh_interval = interval_from_ms(ms)?;
        }
        if let Some(theme) = file.theme {
            self.theme = theme;
        }
        if let Some(output) = file.output {
            self.output = output;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = var("BIRTHDAY_CLOCK_DOB") {
            self.birth_date =
                Some(parse_birth_date(&raw).context("BIRTHDAY_CLOCK_DOB is not a valid date")?);
        }
        if let Some(raw) = var("BIRTHDAY_CLOCK_INTERVAL_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .context("BIRTHDAY_CLOCK_INTERVAL_MS must be a whole number of milliseconds")?;
            self.refresh_interval = interval_from_ms(ms)?;
        }
        if let Some(raw) = var("BIRTHDAY_CLOCK_THEME") {
            self.theme = match raw.trim().to_ascii_lowercase().as_str() {
                "dark" => Theme::Dark,
                "light" => Theme::Light,
                other => bail!("BIRTHDAY_CLOCK_THEME must be dark or light, got {other:?}"),
            };
        }
        if let Some(raw) = var("BIRTHDAY_CLOCK_OUTPUT") {
            self.output = match raw.trim().to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                other => bail!("BIRTHDAY_CLOCK_OUTPUT must be text or json, got {other:?}"),
            };
        }
        Ok(())
    }
}

fn interval_from_ms(ms: u64) -> Result<Duration> {
    if ms == 0 {
        bail!("refresh interval must be greater than zero");
    }
    Ok(Duration::from_millis(ms))
}
