//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use deliberate_domain::QuestionType;
use std::path::PathBuf;

/// Export format for experiment data
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Full experiment as JSON
    Json,
    /// Flattened responses as CSV
    Csv,
    /// Rankings as CSV (rank_1..rank_10 columns)
    RankingsCsv,
}

/// CLI arguments for llm-deliberate
#[derive(Parser, Debug)]
#[command(name = "llm-deliberate")]
#[command(author, version, about = "LLM deliberation experiments - models answer, judge, and reach consensus")]
#[command(long_about = r#"
llm-deliberate runs ranked-voting experiments over LLM answers.

A council of models answers a question, then each judge ranks the answers.
The rankings are aggregated with five voting methods (Plurality, Borda,
Weighted Borda, Copeland, Ranked Pairs) and compared side by side.

Configuration files are loaded from (in priority order):
1. DELIBERATE_* environment variables
2. --config <path>          Explicit config file
3. ./deliberate.toml        Project-level config
4. ~/.config/llm-deliberate/config.toml   Global config

Example:
  llm-deliberate new "capitals" -d "Geography sanity check"
  llm-deliberate ask <exp-id> "What is the capital of Australia?" -m openai/gpt-4o -m anthropic/claude-3.5-sonnet
  llm-deliberate compare <exp-id> <question-id>
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new experiment
    New {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// List experiments
    List,

    /// Show experiment details
    Show { exp_id: String },

    /// Add a question to an experiment
    AddQuestion {
        exp_id: String,
        text: String,

        /// Question type: factual, reasoning, subjective, creative
        #[arg(short = 't', long = "type", default_value = "reasoning")]
        question_type: QuestionType,

        /// Known correct answer, if any
        #[arg(long)]
        truth: Option<String>,
    },

    /// Add a model response to a question by hand
    AddResponse {
        exp_id: String,
        question_id: String,
        model: String,
        content: String,
    },

    /// Add a judge's ranking to a question by hand
    AddRanking {
        exp_id: String,
        question_id: String,
        judge: String,

        /// Comma-separated response ids, best first
        rankings: String,

        #[arg(short, long, default_value_t = 1.0)]
        confidence: f64,
    },

    /// Compare aggregation methods over a question's rankings
    Compare {
        exp_id: String,
        question_id: String,
    },

    /// Ask the council a question: collect responses and rankings via the API
    Ask {
        exp_id: String,
        text: String,

        /// Council models (overrides config; can be repeated)
        #[arg(short, long, value_name = "MODEL")]
        model: Vec<String>,

        /// Judge models (defaults to the council)
        #[arg(short, long, value_name = "MODEL")]
        judge: Vec<String>,

        /// Deliberation rounds before ranking (1 = no refinement)
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Question type: factual, reasoning, subjective, creative
        #[arg(short = 't', long = "type", default_value = "reasoning")]
        question_type: QuestionType,

        /// Known correct answer, if any
        #[arg(long)]
        truth: Option<String>,
    },

    /// Delete an experiment and all its data
    Delete {
        exp_id: String,

        /// Skip the confirmation step
        #[arg(short, long)]
        yes: bool,
    },

    /// Export an experiment to JSON or CSV
    Export {
        exp_id: String,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_command() {
        let cli = Cli::try_parse_from([
            "llm-deliberate",
            "ask",
            "exp1",
            "What is 2+2?",
            "-m",
            "openai/gpt-4o",
            "-m",
            "anthropic/claude-3.5-sonnet",
            "--rounds",
            "2",
        ])
        .unwrap();

        match cli.command {
            Command::Ask {
                exp_id,
                text,
                model,
                rounds,
                question_type,
                ..
            } => {
                assert_eq!(exp_id, "exp1");
                assert_eq!(text, "What is 2+2?");
                assert_eq!(model.len(), 2);
                assert_eq!(rounds, Some(2));
                assert_eq!(question_type, QuestionType::Reasoning);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_question_type() {
        let cli = Cli::try_parse_from([
            "llm-deliberate",
            "add-question",
            "exp1",
            "Favorite color?",
            "--type",
            "subjective",
        ])
        .unwrap();

        match cli.command {
            Command::AddQuestion { question_type, .. } => {
                assert_eq!(question_type, QuestionType::Subjective);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_question_type() {
        let result = Cli::try_parse_from([
            "llm-deliberate",
            "add-question",
            "exp1",
            "Q?",
            "--type",
            "rhetorical",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["llm-deliberate", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_delete_command() {
        let cli = Cli::try_parse_from(["llm-deliberate", "delete", "exp1"]).unwrap();
        match cli.command {
            Command::Delete { exp_id, yes } => {
                assert_eq!(exp_id, "exp1");
                assert!(!yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["llm-deliberate", "delete", "exp1", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { yes: true, .. }));
    }
}
