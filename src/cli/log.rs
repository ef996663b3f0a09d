use std::path::Path;

use clap::Parser;
use roster::LogEntry;
use tracing::instrument;

use super::{Login, terminal, terminal::Colorize, with_session};

#[derive(Debug, Parser)]
pub struct Command {
    #[command(subcommand)]
    command: LogCommand,
}

#[derive(Debug, Parser)]
enum LogCommand {
    /// Show the activity log, newest first
    Show {
        /// Case-insensitive filter over user and message
        #[arg(long, default_value = "")]
        search: String,

        /// Show at most this many entries
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Empty the activity log
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

impl Command {
    #[instrument(skip(login))]
    pub fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        match self.command {
            LogCommand::Show { search, limit } => {
                let lines = with_session(root, login, |store, session| {
                    let entries = store.logs(session, &search)?;
                    Ok(entries
                        .into_iter()
                        .take(limit.unwrap_or(usize::MAX))
                        .map(format_entry)
                        .collect::<Vec<_>>())
                })?;
                if lines.is_empty() {
                    println!("{}", "No activity recorded.".dim());
                }
                for line in lines {
                    println!("{line}");
                }
            }
            LogCommand::Clear { yes } => {
                if !terminal::confirm("Clear the whole activity log?", yes)? {
                    println!("Cancelled");
                    return Ok(());
                }
                with_session(root, login, |store, session| Ok(store.clear_logs(session)?))?;
                println!("{}", "⚠️  Activity log cleared".warning());
            }
        }
        Ok(())
    }
}

fn format_entry(entry: &LogEntry) -> String {
    format!(
        "{} {:<12} {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dim(),
        entry.user,
        entry.message
    )
}
