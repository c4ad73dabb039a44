use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ramadan", version, author, about = "Track prayers, Quran and adhkar through the month of Ramadan")]
pub struct Cli {
    /// Act as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the month start, its length and your username
    Setup {
        /// First day of Ramadan (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Number of days in the month (29 or 30)
        #[arg(long)]
        length: Option<u32>,
        /// Username your records are stored under
        #[arg(long)]
        user: Option<String>,
        /// Work out the start and length from the Hijri calendar
        #[arg(long)]
        detect: bool,
        /// Shift Hijri dates for local moon sighting (e.g. -1)
        #[arg(long, allow_hyphen_values = true)]
        hijri_offset: Option<i32>,
    },
    /// Show the day's checklist and score
    Today,
    /// Toggle a prayer as prayed / not prayed
    Pray {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
    },
    /// Toggle morning or evening adhkar
    Dhikr {
        #[command(subcommand)]
        which: DhikrCommands,
    },
    /// Add pages read (negative to correct a mistake)
    Quran {
        #[arg(allow_hyphen_values = true)]
        pages: i64,
    },
    /// Personal tasks for the day (not counted in the score)
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Show the three ten-day periods and which are unlocked
    Periods,
    /// Aggregated progress over a range of days
    Summary {
        #[command(subcommand)]
        range: SummaryRange,
    },
    /// Every day with stored data, with its score
    History,
    /// Erase everything recorded for the day
    Clear,
    /// Print a month-to-date text report to stdout
    Export,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum DhikrCommands {
    /// Morning adhkar
    Morning,
    /// Evening adhkar
    Evening,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Toggle a task done / not done
    Done { id: String },
    /// Delete a task
    Remove { id: String },
    /// List the day's tasks
    List,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRange {
    /// The last 10 days
    TenDay,
    /// The last 7 days
    Week,
    /// The month so far, week by week
    Month,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_date_and_negative_pages() {
        let cli = Cli::try_parse_from(["ramadan", "quran", "-2", "--date", "2026-02-20"]).unwrap();
        assert_eq!(cli.date.as_deref(), Some("2026-02-20"));
        assert!(matches!(cli.command, Some(Commands::Quran { pages: -2 })));
    }

    #[test]
    fn joins_task_words() {
        let cli = Cli::try_parse_from(["ramadan", "task", "add", "read", "tafsir"]).unwrap();
        match cli.command {
            Some(Commands::Task { action: TaskCommands::Add { text } }) => {
                assert_eq!(text, vec!["read", "tafsir"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn summary_ranges_use_kebab_case() {
        let cli = Cli::try_parse_from(["ramadan", "summary", "ten-day"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Summary { range: SummaryRange::TenDay })
        ));
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["ramadan"]).unwrap();
        assert!(cli.command.is_none());
    }
}
