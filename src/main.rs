mod cli;
mod config;
mod db;
mod error;
mod models;
mod progress;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers::{self, Ctx, SetupOptions};
use config::{parse_date, AppConfig};
use db::store::SqliteStore;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = match cli.command {
        Some(Commands::Setup { .. }) => AppConfig::read(),
        _ => AppConfig::load(),
    }
    .context("Loading config")?;

    let today = match &cli.date {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };

    if let Some(Commands::Setup {
        start,
        length,
        user,
        detect,
        hijri_offset,
    }) = cli.command
    {
        let opts = SetupOptions {
            start,
            length,
            user,
            detect,
            hijri_offset,
        };
        return handlers::handle_setup(&mut config, opts, today);
    }

    ensure_setup(&mut config)?;

    let db_path = AppConfig::ensure_db_dir()?;
    let store = SqliteStore::open(&db_path)?;
    log::debug!("Using database {:?}", db_path);

    let month = config.month_window()?;
    let had_device_id = !config.session.device_id.is_empty();
    let session = config.session()?;
    if !had_device_id {
        config.save()?;
    }
    let ctx = Ctx {
        store: &store,
        session: &session,
        month,
        today,
        hijri_offset: config.month.hijri_offset,
    };

    match cli.command {
        None | Some(Commands::Today) => handlers::handle_today(&ctx)?,
        Some(Commands::Pray { prayer }) => handlers::handle_pray(&ctx, &prayer)?,
        Some(Commands::Dhikr { which }) => handlers::handle_dhikr(&ctx, which)?,
        Some(Commands::Quran { pages }) => handlers::handle_quran(&ctx, pages)?,
        Some(Commands::Task { action }) => handlers::handle_task(&ctx, &action)?,
        Some(Commands::Periods) => handlers::handle_periods(&ctx)?,
        Some(Commands::Summary { range }) => handlers::handle_summary(&ctx, range)?,
        Some(Commands::History) => handlers::handle_history(&ctx)?,
        Some(Commands::Clear) => handlers::handle_clear(&ctx)?,
        Some(Commands::Export) => handlers::handle_export(&ctx)?,
        Some(Commands::Setup { .. }) => unreachable!(),
    }

    Ok(())
}

/// First run: write the default config (and a device id) so later runs and
/// the user can find and edit it.
fn ensure_setup(config: &mut AppConfig) -> Result<()> {
    if AppConfig::exists()? {
        return Ok(());
    }
    eprintln!("No configuration found. Writing defaults; run `ramadan setup --help` to change them.");
    config.session()?;
    config.save()
}
