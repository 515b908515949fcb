//! Interactive symptom checker over a loaded artifact bundle.
//!
//! Examples:
//! - Interactive session:
//!   `sympred --artifacts ./bundle`
//! - One-shot prediction:
//!   `sympred --artifacts ./bundle --symptoms fever,cough`
//! - Show the vocabulary:
//!   `sympred --artifacts ./bundle --list`

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sympred::artifacts;
use sympred::model::SymptomClassifier;
use sympred::pipeline::{Pipeline, PredictError, Prediction};

const DISCLAIMER: &str =
    "This is a prediction system. Please consult a doctor for medical advice.";

#[derive(Parser, Debug)]
#[command(author, version, about = "Predict a disease and precautions from symptoms", long_about = None)]
struct Args {
    /// Directory holding vocabulary.json, model.json, labels.json and precautions.csv
    #[arg(long, value_name = "DIR")]
    artifacts: PathBuf,

    /// Display name used in the greeting (prompted interactively when absent)
    #[arg(long)]
    name: Option<String>,

    /// Comma-separated symptoms for a one-shot prediction
    #[arg(long, value_name = "a,b,c")]
    symptoms: Option<String>,

    /// Print the symptom vocabulary and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sympred=info")),
        )
        .init();

    let pipeline = match artifacts::load_bundle(&args.artifacts) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!(
                "error: failed to load artifact bundle from {}: {err}",
                args.artifacts.display()
            );
            return ExitCode::FAILURE;
        }
    };

    if args.list {
        print_vocabulary(&pipeline);
        return ExitCode::SUCCESS;
    }

    if let Some(symptoms) = args.symptoms.as_deref() {
        return run_once(&pipeline, symptoms);
    }

    match run_interactive(&pipeline, args.name) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// One prediction from `--symptoms`, then exit.
fn run_once(pipeline: &Pipeline<SymptomClassifier>, symptoms: &str) -> ExitCode {
    let selection = parse_selection(symptoms);
    if selection.is_empty() {
        eprintln!("error: no symptoms given");
        return ExitCode::FAILURE;
    }

    let unknown = unknown_names(pipeline, &selection);
    if !unknown.is_empty() {
        eprintln!("error: unknown symptom(s): {}", unknown.join(", "));
        eprintln!("use --list to see the available symptoms");
        return ExitCode::FAILURE;
    }

    if render_outcome(pipeline.predict(selection.iter().map(String::as_str))) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Prompt loop: read a selection, predict, render, repeat.
fn run_interactive(
    pipeline: &Pipeline<SymptomClassifier>,
    name: Option<String>,
) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let name = match name {
        Some(name) => name,
        None => prompt_line(&mut lines, "Your name: ")?.unwrap_or_default(),
    };
    if name.is_empty() {
        println!("Welcome!");
    } else {
        println!("Welcome, {name}!");
    }
    println!("Select your symptoms as a comma-separated list.");
    println!("'list' shows the available symptoms; 'quit' or an empty line exits.");

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.eq_ignore_ascii_case("list") {
            print_vocabulary(pipeline);
            continue;
        }

        let selection = parse_selection(line);
        let unknown = unknown_names(pipeline, &selection);
        if !unknown.is_empty() {
            println!(
                "Unknown symptom(s): {}. Type 'list' to see the available symptoms.",
                unknown.join(", ")
            );
            continue;
        }

        // Faults abort the request, not the session.
        let _ = render_outcome(pipeline.predict(selection.iter().map(String::as_str)));
    }

    println!("Take care!");
    Ok(())
}

fn prompt_line<B: BufRead>(lines: &mut io::Lines<B>, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Split a comma-separated selection, trimming cells and dropping empties.
fn parse_selection(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names in the selection that are not vocabulary members. The membership
/// check lives here so core errors stay reserved for real artifact desyncs.
fn unknown_names<'a>(
    pipeline: &Pipeline<SymptomClassifier>,
    selection: &'a [String],
) -> Vec<&'a str> {
    selection
        .iter()
        .map(String::as_str)
        .filter(|name| !pipeline.vocabulary().contains(name))
        .collect()
}

fn print_vocabulary(pipeline: &Pipeline<SymptomClassifier>) {
    println!("Available symptoms ({}):", pipeline.vocabulary().len());
    for name in pipeline.vocabulary().names() {
        println!("  {name}");
    }
}

/// Render one prediction outcome. Returns `false` when the request hit a
/// non-recoverable fault.
fn render_outcome(outcome: Result<Prediction, PredictError>) -> bool {
    match outcome {
        Ok(prediction) => {
            println!("Predicted disease: {}", prediction.disease);
            if prediction.precautions.is_empty() {
                println!("No precautions on file for this disease.");
            } else {
                println!("Recommended precautions:");
                for precaution in &prediction.precautions {
                    println!("  - {precaution}");
                }
            }
            println!("{DISCLAIMER}");
            true
        }
        Err(PredictError::NoSymptomsSelected) => {
            println!("Please select at least one symptom.");
            true
        }
        Err(PredictError::DiseaseNotFound { disease }) => {
            // Incomplete reference data; the prediction itself still stands.
            println!("Predicted disease: {disease}");
            println!("No precaution data on file for this disease.");
            println!("{DISCLAIMER}");
            true
        }
        Err(err @ PredictError::UnknownSymptom { .. }) => {
            // The loop validates membership, so reaching this means the
            // vocabulary and pipeline disagree.
            tracing::error!("prediction failed: {err}");
            eprintln!("error: {err}");
            false
        }
        Err(err @ PredictError::UnknownClassIndex { .. }) => {
            tracing::error!("artifact mismatch: {err}");
            eprintln!("error: {err}");
            false
        }
    }
}
