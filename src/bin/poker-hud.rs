//! Watch a hand-history directory and print one line per completed hand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Error};
use chrono::Utc;
use log::{info, warn};
use pico_args::Arguments;
use poker_hud::config;
use poker_hud::session::Session;
use poker_hud::watch::{scan_dir, HistoryFilter};

const HELP: &str = "\
Follow poker hand histories and keep per-player statistics

USAGE:
  poker-hud [OPTIONS]

OPTIONS:
  --dir        PATH        Hand-history directory
                           [default: env POKER_HUD_HISTORY_DIR or ./history]
  --hero       NAME        Your screen name           [default: env POKER_HUD_HERO]
  --once                   Read what is there, print the summary and exit

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  POKER_HUD_CONFIG         TOML config file
  POKER_HUD_POLL_MS        Poll interval in milliseconds [default: 1000]
  POKER_HUD_INACTIVITY_MINUTES
                           Idle time before a player is archived [default: 45]
  POKER_HUD_ARCHIVE_CAP    Archived players kept [default: 1000]
  RUST_LOG                 Log filter [default: info]
";

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let mut cfg = config::load().context("loading configuration")?;
    if let Some(dir) = pargs.opt_value_from_str::<_, std::path::PathBuf>("--dir")? {
        cfg.history_dir = dir;
    }
    if let Some(hero) = pargs.opt_value_from_str::<_, String>("--hero")? {
        cfg.hero = Some(hero);
    }
    let once = pargs.contains("--once");
    let rest = pargs.finish();
    if !rest.is_empty() {
        anyhow::bail!("unexpected arguments: {rest:?}");
    }

    // Catching signals for exit.
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let filter = HistoryFilter::from_config(&cfg);
    let mut session = Session::from_config(&cfg).context("loading player stores")?;
    info!(
        "watching {} (hero: {})",
        cfg.history_dir.display(),
        cfg.hero.as_deref().unwrap_or("-")
    );

    while running.load(Ordering::SeqCst) {
        let files = match scan_dir(&cfg.history_dir, &filter) {
            Ok(files) => files,
            Err(e) => {
                warn!("{}: {e}", cfg.history_dir.display());
                Vec::new()
            }
        };
        for path in files {
            match session.poll_file(&path) {
                Ok(reports) => {
                    for r in &reports {
                        println!("{r}");
                        if let Some(table) = &r.table {
                            println!("{table}");
                        }
                    }
                }
                Err(e) => warn!("{e}"),
            }
        }
        if let Err(e) = session.archive(Utc::now()) {
            warn!("saving stores: {e}");
        }
        if once {
            break;
        }
        std::thread::sleep(cfg.poll_interval());
    }

    for report in session.shutdown().context("saving player stores")? {
        println!("{report}");
    }
    for row in session.summarize() {
        println!("{row}");
    }
    Ok(())
}
