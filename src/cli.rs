//! CLI argument definitions.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI parser for `portal`.
#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Client project portal: task guidance and updates")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all projects.
    Projects,
    /// Show a project's progress and task tree.
    Show {
        /// Project record id.
        project: String,
    },
    /// Print the guidance context as JSON.
    Guide {
        /// Project record id.
        project: String,
        /// Task record id to highlight.
        #[arg(long)]
        task: Option<String>,
    },
    /// Ask the assistant a question about a project.
    Ask {
        /// Project record id.
        project: String,
        /// Task record id the question is about.
        #[arg(long)]
        task: Option<String>,
        /// The question.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Print the weekly update digest.
    Update {
        /// Project record id.
        project: String,
        /// Digest date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_projects_subcommand() {
        let cli = Cli::parse_from(["portal", "projects"]);
        assert!(matches!(cli.command, Command::Projects));
    }

    #[test]
    fn parses_guide_with_task() {
        let cli = Cli::parse_from(["portal", "guide", "recP1", "--task", "recT2"]);
        match cli.command {
            Command::Guide { project, task } => {
                assert_eq!(project, "recP1");
                assert_eq!(task.as_deref(), Some("recT2"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_collects_question_words() {
        let cli = Cli::parse_from(["portal", "ask", "recP1", "what", "is", "next?"]);
        match cli.command {
            Command::Ask { question, task, .. } => {
                assert_eq!(question.join(" "), "what is next?");
                assert!(task.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["portal", "ask", "recP1"]).is_err());
    }

    #[test]
    fn update_parses_date() {
        let cli = Cli::parse_from(["portal", "update", "recP1", "--date", "2025-03-07"]);
        match cli.command {
            Command::Update { date, .. } => {
                assert_eq!(date.map(|d| d.to_string()).as_deref(), Some("2025-03-07"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["portal", "update", "recP1", "--date", "March"]).is_err());
    }
}
