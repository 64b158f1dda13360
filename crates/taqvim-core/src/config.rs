use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::labels::Locale;
use crate::month::WeekStart;

const CONFIG_ENV_VAR: &str = "TAQVIM_CONFIG";
const CONFIG_DIR_NAME: &str = "taqvim";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_WEEK_START: &str = "saturday";
const DEFAULT_TIMEZONE: &str = "Asia/Tehran";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: String,
    pub timezone: String,
    pub locale: Locale,
    pub color: bool,

    #[serde(skip)]
    pub loaded_files: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_start: DEFAULT_WEEK_START.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            locale: Locale::Fa,
            color: true,
            loaded_files: vec![],
        }
    }
}

impl Config {
    #[tracing::instrument(skip(config_override))]
    pub fn load(config_override: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = resolve_config_path(config_override)? else {
            warn!("no config file found; using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            if config_override.is_some() {
                return Err(anyhow!("config file {} does not exist", path.display()));
            }
            warn!(config = %path.display(), "config file missing; using defaults");
            return Ok(Self::default());
        }

        info!(config = %path.display(), "loading config");
        Self::load_file(&path)
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cfg.loaded_files.push(path.to_path_buf());
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let mut cfg: Config = toml::from_str(text)?;
        cfg.sanitize();
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in overrides {
            let key = k.trim().strip_prefix("rc.").unwrap_or(k.trim()).to_string();
            debug!(key = %key, value = %v, "applying override");
            match key.as_str() {
                "week_start" => self.week_start = v,
                "timezone" => self.timezone = v,
                "locale" => self.locale = v.parse()?,
                "color" => {
                    self.color =
                        parse_bool(&v).ok_or_else(|| anyhow!("invalid color setting: {v}"))?
                }
                other => return Err(anyhow!("unknown config key: {other}")),
            }
        }

        self.sanitize();
        self.validate()
    }

    pub fn week_start(&self) -> anyhow::Result<WeekStart> {
        Ok(WeekStart::parse(&self.week_start)?)
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|err| anyhow!("invalid timezone '{}': {err}", self.timezone))
    }

    fn sanitize(&mut self) {
        if self.week_start.trim().is_empty() {
            self.week_start = DEFAULT_WEEK_START.to_string();
        }
        if self.timezone.trim().is_empty() {
            self.timezone = DEFAULT_TIMEZONE.to_string();
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.week_start()?;
        self.timezone()?;
        Ok(())
    }
}

#[tracing::instrument(skip(override_path))]
fn resolve_config_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(from_env) = std::env::var(CONFIG_ENV_VAR) {
        if from_env.trim().is_empty() || from_env == "/dev/null" {
            return Ok(None);
        }
        return Ok(Some(PathBuf::from(from_env)));
    }

    Ok(dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "on" | "true" => Some(true),
        "0" | "n" | "no" | "off" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let cfg = Config::default();
        assert_eq!(
            cfg.week_start().expect("week start").weekday(),
            Weekday::Sat
        );
        assert_eq!(cfg.timezone().expect("timezone"), chrono_tz::Asia::Tehran);
        assert_eq!(cfg.locale, Locale::Fa);
        assert!(cfg.color);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = Config::from_toml_str("week_start = \"monday\"\nlocale = \"en\"\n")
            .expect("parse config");
        assert_eq!(cfg.week_start().expect("week start").offset(), 6);
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.timezone, DEFAULT_TIMEZONE);
        assert!(cfg.loaded_files.is_empty());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = Config::from_toml_str("week_start = \"  \"\ntimezone = \"\"\n")
            .expect("parse config");
        assert_eq!(cfg.week_start, DEFAULT_WEEK_START);
        assert_eq!(cfg.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Config::from_toml_str("week_start = \"someday\"").is_err());
        assert!(Config::from_toml_str("timezone = \"Mars/Olympus\"").is_err());
        assert!(Config::from_toml_str("color = \"maybe\"").is_err());
    }

    #[test]
    fn overrides_apply_and_validate() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vec![
            ("rc.week_start".to_string(), "sunday".to_string()),
            ("color".to_string(), "off".to_string()),
            ("locale".to_string(), "en".to_string()),
        ])
        .expect("apply overrides");
        assert_eq!(cfg.week_start().expect("week start").offset(), 0);
        assert!(!cfg.color);
        assert_eq!(cfg.locale, Locale::En);

        assert!(
            cfg.apply_overrides(vec![("nope".to_string(), "1".to_string())])
                .is_err()
        );
        assert!(
            cfg.apply_overrides(vec![("timezone".to_string(), "Nowhere".to_string())])
                .is_err()
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("absent.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn loads_file_from_explicit_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "timezone = \"UTC\"\ncolor = false\n").expect("write config");

        let cfg = Config::load(Some(&path)).expect("load config");
        assert_eq!(cfg.timezone().expect("timezone"), chrono_tz::UTC);
        assert!(!cfg.color);
        assert_eq!(cfg.loaded_files, vec![path]);
    }
}
