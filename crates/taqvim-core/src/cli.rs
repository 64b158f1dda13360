use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::month::YearMonth;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taqvim",
    version,
    about = "Taqvim: a month calendar with per-session events"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Path to a TOML config file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Override a config key, e.g. `--rc week_start=monday`.
    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    /// Year to show; defaults to the current year.
    #[arg(short = 'y', long = "year", allow_negative_numbers = true)]
    pub year: Option<i32>,

    /// Month to show, 1-12; defaults to the current month.
    #[arg(short = 'm', long = "month", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Read session commands from stdin after the first render.
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,
}

impl GlobalCli {
    /// The month requested on the command line, filling gaps from `today`.
    pub fn requested_month(&self, today: YearMonth) -> anyhow::Result<YearMonth> {
        let year = self.year.unwrap_or(today.year());
        let month = match self.month {
            Some(one_based) => one_based - 1,
            None => today.month(),
        };
        Ok(YearMonth::new(year, month)?)
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
