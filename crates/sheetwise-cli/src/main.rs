//! sheetwise CLI - evaluate formulas and CSV grids

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetwise::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetwise")]
#[command(
    author,
    version,
    about = "Evaluate spreadsheet formulas, including GPT() calls"
)]
struct Cli {
    #[command(flatten)]
    gpt: GptArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Completion endpoint settings; the API key is read from SHEETWISE_GPT_API_KEY
#[derive(Args)]
struct GptArgs {
    /// Chat endpoint for GPT() calls
    #[arg(long, global = true, env = "SHEETWISE_GPT_ENDPOINT")]
    gpt_endpoint: Option<String>,

    /// Model name sent with each GPT() call
    #[arg(long, global = true, env = "SHEETWISE_GPT_MODEL")]
    gpt_model: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, global = true, env = "SHEETWISE_GPT_TIMEOUT_SECS")]
    gpt_timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one formula and print its value
    Eval {
        /// Formula text, e.g. "=SUM(A1:A3)*2"
        formula: String,

        /// Cell contents visible to the formula, as REF=VALUE (repeatable)
        #[arg(short, long = "cell", value_parser = parse_cell_assignment)]
        cells: Vec<(CellRef, String)>,

        /// Wait for GPT() answers instead of printing the placeholder
        #[arg(short, long)]
        wait: bool,
    },

    /// Evaluate every formula of a CSV grid and print the values as CSV
    Grid {
        /// Input CSV file; record 1 is row 1, field 1 is column A
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wait for GPT() answers before writing
        #[arg(short, long)]
        wait: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let gpt = gpt_service(&cli.gpt)?;

    match cli.command {
        Commands::Eval {
            formula,
            cells,
            wait,
        } => eval(gpt, &formula, &cells, wait).await,
        Commands::Grid {
            input,
            output,
            wait,
        } => grid(gpt, &input, output.as_deref(), wait).await,
    }
}

fn gpt_service(args: &GptArgs) -> Result<GptService> {
    let mut config = GptConfig::from_env().context("Invalid GPT settings in environment")?;
    if let Some(endpoint) = &args.gpt_endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(model) = &args.gpt_model {
        config = config.with_model(model);
    }
    if let Some(secs) = args.gpt_timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!("GPT config: {:?}", config);
    GptService::http(config, Handle::current()).context("Failed to create GPT client")
}

/// Parse `B2=hello` into a cell and its contents
fn parse_cell_assignment(s: &str) -> std::result::Result<(CellRef, String), String> {
    let (reference, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected REF=VALUE, got '{}'", s))?;
    let cell = CellRef::parse(reference.trim()).map_err(|e| e.to_string())?;
    Ok((cell, value.to_string()))
}

async fn eval(gpt: GptService, formula: &str, cells: &[(CellRef, String)], wait: bool) -> Result<()> {
    let mut sheet = Sheet::with_engine(Engine::with_gpt(gpt));
    for (cell, value) in cells {
        sheet.set_input_at(*cell, value);
    }

    let evaluation = sheet.engine().evaluate(formula, &sheet);
    let mut display = evaluation.display;

    if wait {
        for handle in evaluation.requests {
            let signal = handle.wait().await.context("GPT request was dropped")?;
            if signal.matches_cell(formula, &display) {
                display = signal.result;
            }
        }
    } else if !evaluation.requests.is_empty() {
        eprintln!("Note: GPT() answer not awaited; pass --wait to wait for it");
    }

    println!("{}", display);
    Ok(())
}

async fn grid(gpt: GptService, input: &Path, output: Option<&Path>, wait: bool) -> Result<()> {
    let mut sheet = Sheet::with_engine(Engine::with_gpt(gpt));
    let requests = CsvReader::read_file(input, &mut sheet)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    let formula_count = sheet.cells().filter(|(_, data)| data.is_formula()).count();
    eprintln!("Evaluated {} formulas", formula_count);

    if wait {
        let updated = sheet.settle(requests).await;
        eprintln!("Applied GPT answers to {} cells", updated.len());
    } else if !requests.is_empty() {
        eprintln!(
            "Note: {} GPT() requests not awaited; pass --wait to wait for them",
            requests.len()
        );
    }

    if let Some(output_path) = output {
        CsvWriter::write_file(&sheet, output_path)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote '{}'", output_path.display());
    } else {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        CsvWriter::write(&sheet, &mut lock).context("Failed to write to stdout")?;
        lock.flush().context("Failed to write to stdout")?;
    }

    Ok(())
}
