//! CLI entrypoint for llm-deliberate
//!
//! Wires the layers together with dependency injection and dispatches
//! subcommands.

use anyhow::{Context, Result, bail};
use clap::Parser;
use deliberate_application::{
    CollectRankingsUseCase, CollectResponsesUseCase, CompareMethodsUseCase, ExperimentStore,
    NoProgress, ProgressNotifier, RunDeliberationUseCase,
};
use deliberate_domain::{Experiment, Question, QuestionType, Ranking, Response};
use deliberate_infrastructure::export::csv;
use deliberate_infrastructure::{ConfigLoader, FileConfig, JsonExperimentStore, OpenRouterGateway};
use deliberate_presentation::{Cli, Command, ConsoleFormatter, ExportFormat, ProgressReporter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    let store = JsonExperimentStore::new(config.storage.data_dir());

    match cli.command {
        Command::New { name, description } => {
            let mut experiment = Experiment::new(name);
            if let Some(description) = description {
                experiment = experiment.with_description(description);
            }
            store.save(&experiment).await?;
            println!("Created experiment: {}", experiment.id);
            println!("   Name: {}", experiment.name);
        }

        Command::List => {
            let summaries = store.list().await?;
            print!("{}", ConsoleFormatter::experiment_list(&summaries));
        }

        Command::Show { exp_id } => {
            let experiment = store.load(&exp_id).await?;
            print!("{}", ConsoleFormatter::experiment_details(&experiment));
        }

        Command::AddQuestion {
            exp_id,
            text,
            question_type,
            truth,
        } => {
            let mut experiment = store.load(&exp_id).await?;
            let mut question = Question::new(text, question_type);
            if let Some(truth) = truth {
                question = question.with_ground_truth(truth);
            }
            let question_id = question.id.clone();
            experiment.questions.push(question);
            store.save(&experiment).await?;
            println!("Added question: {}", question_id);
        }

        Command::AddResponse {
            exp_id,
            question_id,
            model,
            content,
        } => {
            let mut experiment = store.load(&exp_id).await?;
            let question = experiment
                .question_mut(&question_id)
                .with_context(|| format!("Question '{}' not found", question_id))?;

            let response = Response::new(model.clone(), content);
            let response_id = response.id.clone();
            question.responses.push(response);
            store.save(&experiment).await?;
            println!("Added response: {} ({})", response_id, model);
        }

        Command::AddRanking {
            exp_id,
            question_id,
            judge,
            rankings,
            confidence,
        } => {
            let mut experiment = store.load(&exp_id).await?;
            let question = experiment
                .question_mut(&question_id)
                .with_context(|| format!("Question '{}' not found", question_id))?;

            let order: Vec<String> = rankings
                .split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
            if order.is_empty() {
                bail!("Ranking is empty; pass comma-separated response ids");
            }

            let ranking = Ranking::new(judge.clone(), order.clone()).with_confidence(confidence);
            question.rankings.push(ranking);
            store.save(&experiment).await?;
            println!("Added ranking from {}: {}", judge, order.join(" > "));
        }

        Command::Compare {
            exp_id,
            question_id,
        } => {
            let experiment = store.load(&exp_id).await?;
            let question = experiment
                .question(&question_id)
                .with_context(|| format!("Question '{}' not found", question_id))?;

            let comparison = CompareMethodsUseCase.execute(question)?;
            print!("{}", ConsoleFormatter::comparison(question, &comparison));
        }

        Command::Ask {
            exp_id,
            text,
            model,
            judge,
            rounds,
            question_type,
            truth,
        } => {
            run_ask(
                &store,
                &config,
                AskArgs {
                    exp_id,
                    text,
                    models: model,
                    judges: judge,
                    rounds,
                    question_type,
                    truth,
                    quiet: cli.quiet,
                },
            )
            .await?;
        }

        Command::Delete { exp_id, yes } => {
            let experiment = store.load(&exp_id).await?;
            if !yes {
                bail!(
                    "This would delete experiment '{}' ({} questions). Re-run with --yes to confirm.",
                    experiment.name,
                    experiment.questions.len()
                );
            }
            store.delete(&exp_id).await?;
            println!("Deleted experiment: {} ({})", exp_id, experiment.name);
        }

        Command::Export {
            exp_id,
            format,
            output,
        } => {
            let experiment = store.load(&exp_id).await?;
            let content = match format {
                ExportFormat::Json => serde_json::to_string_pretty(&experiment)?,
                ExportFormat::Csv => csv::experiment_responses_csv(&experiment),
                ExportFormat::RankingsCsv => csv::experiment_rankings_csv(&experiment),
            };
            write_export(content, output)?;
        }
    }

    Ok(())
}

struct AskArgs {
    exp_id: String,
    text: String,
    models: Vec<String>,
    judges: Vec<String>,
    rounds: Option<u32>,
    question_type: QuestionType,
    truth: Option<String>,
    quiet: bool,
}

/// Automated flow: collect responses (optionally over several deliberation
/// rounds), have the judges rank them, persist everything, and print the
/// method comparison.
async fn run_ask(store: &JsonExperimentStore, config: &FileConfig, args: AskArgs) -> Result<()> {
    let mut experiment = store.load(&args.exp_id).await?;

    let models = if args.models.is_empty() {
        config.council.models.clone()
    } else {
        args.models
    };
    if models.is_empty() {
        bail!("No council models; pass -m or set [council].models in the config");
    }

    let judges = if args.judges.is_empty() {
        if config.judges().is_empty() {
            models.clone()
        } else {
            config.judges().to_vec()
        }
    } else {
        args.judges
    };

    let rounds = args.rounds.unwrap_or(config.council.max_rounds).max(1);

    let gateway = Arc::new(OpenRouterGateway::from_config(&config.api)?);
    let progress: Box<dyn ProgressNotifier> = if args.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    info!(
        "Asking {} models, {} judges, up to {} rounds",
        models.len(),
        judges.len(),
        rounds
    );

    let mut question = Question::new(args.text.clone(), args.question_type);
    if let Some(truth) = args.truth {
        question = question.with_ground_truth(truth);
    }
    question.max_rounds = rounds;

    let (responses, collection_errors) = if rounds > 1 {
        let outcome = RunDeliberationUseCase::new(Arc::clone(&gateway))
            .execute(&args.text, &models, rounds, progress.as_ref())
            .await;
        question.current_round = outcome.rounds_completed;
        (outcome.responses, outcome.errors)
    } else {
        let outcome = CollectResponsesUseCase::new(Arc::clone(&gateway))
            .execute(&args.text, &models, progress.as_ref())
            .await;
        (outcome.responses, outcome.errors)
    };

    for error in &collection_errors {
        warn!(
            "{} failed in round {}: {}",
            error.model, error.round, error.message
        );
    }
    if responses.is_empty() {
        bail!("All model calls failed; nothing to rank");
    }
    question.responses = responses;

    // Judges rank only the final round's answers
    let final_round: Vec<Response> = question
        .latest_round_responses()
        .into_iter()
        .cloned()
        .collect();

    if final_round.len() >= 2 {
        let outcome = CollectRankingsUseCase::new(Arc::clone(&gateway))
            .execute(&args.text, &final_round, &judges, progress.as_ref())
            .await?;

        for error in &outcome.errors {
            warn!("Judge {} failed: {}", error.model, error.message);
        }
        question.rankings = outcome.rankings;
    } else {
        warn!("Only one response survived; skipping the ranking stage");
    }

    let total_cost: f64 = question
        .responses
        .iter()
        .filter_map(|r| r.metadata.cost_usd)
        .sum();

    let question_id = question.id.clone();
    experiment.questions.push(question);
    store.save(&experiment).await?;

    let question = experiment
        .question(&question_id)
        .context("question was just added")?;
    println!("Added question: {}", question.id);
    println!(
        "   Responses: {} | Rankings: {} | Estimated cost: ${:.4}",
        question.responses.len(),
        question.rankings.len(),
        total_cost
    );

    if !question.rankings.is_empty() {
        let comparison = CompareMethodsUseCase.execute(question)?;
        print!("{}", ConsoleFormatter::comparison(question, &comparison));
    }

    Ok(())
}

fn write_export(content: String, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
