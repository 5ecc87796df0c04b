mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands, TasbeehCommands};
use cli::handlers::{self, ConfigUpdate};
use prayermate::config::AppConfig;
use prayermate::db::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Times) => handlers::handle_times(&config)?,
        Some(Commands::Mark { prayer }) => handlers::handle_mark(&conn, &config, &prayer)?,
        Some(Commands::Reset) => handlers::handle_reset(&conn, &config)?,
        Some(Commands::Status) => handlers::handle_status(&conn, &config)?,
        Some(Commands::History { days }) => handlers::handle_history(&conn, &config, days)?,
        Some(Commands::Stats) => handlers::handle_stats(&conn, &config)?,
        Some(Commands::Calendar {
            year,
            month,
            select,
            gregorian,
        }) => handlers::handle_calendar(&conn, &config, year, month, select.as_deref(), gregorian)?,
        Some(Commands::Tasbeeh { action }) => match action {
            TasbeehCommands::Show => handlers::handle_tasbeeh_show(&conn)?,
            TasbeehCommands::Count { times } => handlers::handle_tasbeeh_count(&conn, times)?,
            TasbeehCommands::Select { name } => handlers::handle_tasbeeh_select(&conn, &name)?,
            TasbeehCommands::Reset => handlers::handle_tasbeeh_reset(&conn)?,
        },
        Some(Commands::Config {
            city,
            country,
            latitude,
            longitude,
            timezone,
            method,
            madhab,
            hijri_offset,
        }) => handlers::handle_config(
            &mut config,
            ConfigUpdate {
                city,
                country,
                latitude,
                longitude,
                timezone,
                method,
                madhab,
                hijri_offset,
            },
        )?,

        // No subcommand → launch TUI
        None => tui::app::run(conn, config)?,
    }

    Ok(())
}
