use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prayermate", version, author, about = "Prayer times, a daily prayer checklist and a Hijri calendar in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times and the countdown to the next prayer
    Times,
    /// Toggle a prayer as prayed for today
    Mark {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
    },
    /// Clear today's checklist
    Reset,
    /// Show today's checklist and completion
    Status,
    /// List recorded days, newest first
    History {
        /// Only show this many days
        #[arg(long)]
        days: Option<usize>,
    },
    /// Show streaks and the last 7 days
    Stats,
    /// Show a Hijri month with completion colouring and observances
    Calendar {
        /// Year (Hijri, or Gregorian with --gregorian; defaults to the current one)
        #[arg(long)]
        year: Option<u32>,
        /// Month 1-12 (defaults to the current one)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Highlight and describe a Gregorian day (YYYY-MM-DD)
        #[arg(long)]
        select: Option<String>,
        /// Lay out a Gregorian month with its Hijri dates instead
        #[arg(long)]
        gregorian: bool,
    },
    /// Tasbeeh counter
    Tasbeeh {
        #[command(subcommand)]
        action: TasbeehCommands,
    },
    /// Show or update configuration
    Config {
        /// City name shown for the location
        #[arg(long)]
        city: Option<String>,
        /// Country name shown for the location
        #[arg(long)]
        country: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
        /// UTC offset, e.g. "+5:30", "-4", "5.5", or "local" for the system zone
        #[arg(long, allow_hyphen_values = true)]
        timezone: Option<String>,
        /// Calculation method (e.g. NorthAmerica, MuslimWorldLeague, UmmAlQura)
        #[arg(long)]
        method: Option<String>,
        /// Madhab for Asr (Shafi or Hanafi)
        #[arg(long)]
        madhab: Option<String>,
        /// Days to shift Hijri dates by
        #[arg(long, allow_hyphen_values = true)]
        hijri_offset: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TasbeehCommands {
    /// Show the current dhikr and count
    Show,
    /// Add to the count
    Count {
        /// How many to add
        #[arg(default_value = "1")]
        times: u32,
    },
    /// Switch dhikr (subhanallah, alhamdulillah, allahuakbar); resets the count
    Select {
        name: String,
    },
    /// Set the count back to zero
    Reset,
}
