use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{error, warn};
use serde::Deserialize;

use fichegen::model::{
    CompetencyBlock, EvalBlock, EvalInfo, SequenceInfo, SequenceStep, SessionInfo, SessionPhase,
    TargetedCompetency,
};

#[derive(Parser)]
#[command(name = "fichegen", version, about = "Generate pedagogical PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a lesson plan from a JSON record.
    Lesson(ComposeArgs),
    /// Compose a sequence plan from a JSON record.
    Sequence(ComposeArgs),
    /// Compose an evaluation grid from a JSON record.
    Evaluation(ComposeArgs),
}

#[derive(Args)]
struct ComposeArgs {
    /// JSON input record.
    input: PathBuf,
    /// Output PDF path.
    output: PathBuf,
    /// Annex PDF to frame and append after the document.
    #[arg(long)]
    annex: Option<PathBuf>,
    /// Caption drawn above the annex frame.
    #[arg(long, default_value = fichegen::DEFAULT_CAPTION)]
    caption: String,
}

#[derive(Deserialize)]
struct LessonInput {
    info: SessionInfo,
    #[serde(default)]
    blocks: Vec<CompetencyBlock>,
    #[serde(default)]
    phases: Vec<SessionPhase>,
}

#[derive(Deserialize)]
struct SequenceInput {
    info: SequenceInfo,
    #[serde(default)]
    steps: Vec<SequenceStep>,
    #[serde(default)]
    skills: Vec<TargetedCompetency>,
}

#[derive(Deserialize)]
struct EvaluationInput {
    info: EvalInfo,
    #[serde(default)]
    blocks: Vec<EvalBlock>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Lesson(args) => {
            let input: LessonInput = serde_json::from_slice(&fs::read(&args.input)?)?;
            let bytes = fichegen::compose_lesson(&input.info, &input.blocks, &input.phases)?;
            write_output(bytes, &args)
        }
        Command::Sequence(args) => {
            let input: SequenceInput = serde_json::from_slice(&fs::read(&args.input)?)?;
            let bytes = fichegen::compose_sequence(&input.info, &input.steps, &input.skills)?;
            write_output(bytes, &args)
        }
        Command::Evaluation(args) => {
            let input: EvaluationInput = serde_json::from_slice(&fs::read(&args.input)?)?;
            let bytes = fichegen::compose_evaluation(&input.info, &input.blocks)?;
            write_output(bytes, &args)
        }
    }
}

/// Merge the annex when requested; an unreadable annex downgrades to a
/// warning and the document is written without it.
fn write_output(bytes: Vec<u8>, args: &ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let final_bytes = match &args.annex {
        Some(path) => {
            let annex = fs::read(path)?;
            match fichegen::merge_annex(&bytes, &annex, &args.caption) {
                Ok(merged) => merged,
                Err(fichegen::Error::AnnexParse(err)) => {
                    warn!("annex {} is not a valid PDF ({err}), writing the document without it", path.display());
                    bytes
                }
                Err(err) => return Err(err.into()),
            }
        }
        None => bytes,
    };
    fs::write(&args.output, final_bytes)?;
    Ok(())
}
