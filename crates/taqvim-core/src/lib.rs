pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod labels;
pub mod month;
pub mod render;
pub mod session;
pub mod state;
pub mod suggestion;

use std::ffi::OsString;
use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

pub use date::CalendarDate;
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventDraft, events_on_day};
pub use month::{Cell, MonthView, WeekStart, YearMonth, build_month_view};
pub use state::AppState;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        interactive = cli.interactive,
        "starting taqvim"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(
        cli.rc_overrides
            .iter()
            .map(|kv| (kv.key.clone(), kv.value.clone())),
    )
    .context("invalid --rc override")?;
    info!(files = ?cfg.loaded_files, "config sources");
    debug!(?cfg, "effective config");

    let timezone = cfg.timezone()?;
    let today = date::today_in(timezone);
    let focus = cli.requested_month(YearMonth::of(today))?;

    let renderer = render::Renderer::new(&cfg)?;
    let state = AppState::new(focus);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    renderer.render_month(&mut out, &state, today)?;
    out.flush()?;

    if cli.interactive {
        let mut session = session::Session::new(state, renderer, timezone);
        session.run(io::stdin().lock(), &mut out)?;
    }

    info!("done");
    Ok(())
}
