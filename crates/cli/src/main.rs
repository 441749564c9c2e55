// salesq - ask questions about a monthly sales report from the command line

mod exit_codes;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use salesq_config::{AIConfigStatus, AIDiagnostics, ResolvedAIConfig, Settings, ValidationResult};
use salesq_engine::{
    Answer, DisabledGenerator, GenerationError, LoadError, Pipeline, PipelineError, PlotOutcome,
    TextGenerator,
};
use salesq_io::{write_line_chart, LoadOptions, ReportSource};
use salesq_llm::OllamaClient;

use exit_codes::{
    generation_exit_code, load_exit_code, EXIT_AI_DISABLED, EXIT_AI_GENERATION,
    EXIT_AI_MISCONFIGURED, EXIT_ERROR, EXIT_PLOT_EXPORT, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "salesq")]
#[command(about = "Ask questions about a monthly sales report")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Sales report to read (overrides report.path)
    #[arg(long, global = true, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Worksheet to read from spreadsheet reports (overrides report.sheet)
    #[arg(long, global = true, value_name = "NAME")]
    sheet: Option<String>,

    /// Header of the product-name column (overrides report.productColumn)
    #[arg(long, global = true, value_name = "HEADER")]
    product_column: Option<String>,

    /// Fail when a date-like header cannot be read
    #[arg(long, global = true)]
    strict_headers: bool,

    /// Settings file (default: $SALESQ_CONFIG or the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question about the report
    #[command(after_help = "\
Examples:
  salesq ask What are the product sales for PC-1000?
  salesq ask 'Show me the top products'
  salesq ask 'Who sold the most in 2021-08?'
  salesq ask 'Which product launched most recently?'   (needs a local model)")]
    Ask {
        /// The question, as one or more words
        #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
        question: Vec<String>,

        /// Output {intent, found, text} as JSON
        #[arg(long)]
        json: bool,
    },

    /// Total sales for the first product named in the question
    Total {
        #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
        question: Vec<String>,

        /// Output {intent, found, text} as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chart monthly sales for the first product named in the question
    Plot {
        #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
        question: Vec<String>,

        /// Directory for the chart workbook (overrides plot.outputDir)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// List the report's columns, product column first
    Columns {
        #[arg(long)]
        json: bool,
    },

    /// Show the settings file location and the effective settings
    Config,

    /// Text-generation configuration and diagnostics
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Check AI configuration and connectivity
    Doctor {
        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,

        /// Contact the Ollama endpoint and look for the model (requires network)
        #[arg(long)]
        test: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  salesq-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  salesq-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let runtime = Runtime::from_cli(&cli);

    let result = match cli.command {
        Commands::Ask { question, json } => {
            question_text(&question).and_then(|q| cmd_ask(&runtime, &q, json))
        }
        Commands::Total { question, json } => {
            question_text(&question).and_then(|q| cmd_total(&runtime, &q, json))
        }
        Commands::Plot { question, output_dir } => {
            question_text(&question).and_then(|q| cmd_plot(&runtime, &q, output_dir))
        }
        Commands::Columns { json } => cmd_columns(&runtime, json),
        Commands::Config => cmd_config(&runtime),
        Commands::Ai { command } => match command {
            AiCommands::Doctor { json, test } => cmd_ai_doctor(&runtime, json, test),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn load(err: &LoadError, runtime: &Runtime) -> Self {
        let config = runtime.config_path.display();
        let hint = match err {
            LoadError::NotFound(_) => {
                Some(format!("pass --report or set report.path in {}", config))
            }
            LoadError::Unsupported(_) => {
                Some("save the report as .xlsx, .xls, .ods, .csv or .tsv".to_string())
            }
            LoadError::MissingProductColumn(_) => Some(format!(
                "pass --product-column or set report.productColumn in {}",
                config
            )),
            LoadError::Header(_) => {
                Some("fix the header cell or drop --strict-headers / report.strictHeaders".to_string())
            }
            _ => None,
        };
        Self {
            code: load_exit_code(err),
            message: err.to_string(),
            hint,
        }
    }

    fn generation(err: &GenerationError, runtime: &Runtime) -> Self {
        let config = runtime.config_path.display();
        let hint = match err {
            GenerationError::Disabled(_) if runtime.ai.status == AIConfigStatus::Misconfigured => {
                Some(format!("fix the \"ai\" section in {} (see `salesq ai doctor`)", config))
            }
            GenerationError::Disabled(_) => Some(format!(
                "general questions need a local model: set ai.provider to \"local\" in {}",
                config
            )),
            GenerationError::Unreachable(_) => {
                Some("is Ollama running? start it with `ollama serve` or check ai.endpoint".to_string())
            }
            GenerationError::Timeout(_) => Some("raise ai.timeout_secs".to_string()),
            GenerationError::Http { status: 404, .. } => {
                Some(format!("pull the model first: ollama pull {}", runtime.ai.model))
            }
            _ => None,
        };
        Self {
            code: generation_exit_code(err, runtime.ai.status),
            message: err.to_string(),
            hint,
        }
    }

    fn pipeline(err: PipelineError, runtime: &Runtime) -> Self {
        match err {
            PipelineError::Load(e) => Self::load(&e, runtime),
            PipelineError::Generation(e) => Self::generation(&e, runtime),
        }
    }
}

/// Settings resolved from file, environment and flags, in that order.
struct Runtime {
    config_path: PathBuf,
    settings: Settings,
    ai: ResolvedAIConfig,
}

impl Runtime {
    fn from_cli(cli: &Cli) -> Self {
        let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
        let mut settings = Settings::load_at(&config_path);

        if let Some(report) = &cli.report {
            settings.report_path = report.clone();
        }
        if let Some(sheet) = &cli.sheet {
            settings.report_sheet = sheet.clone();
        }
        if let Some(column) = &cli.product_column {
            settings.product_column = column.clone();
        }
        if cli.strict_headers {
            settings.strict_headers = true;
        }

        let ai = ResolvedAIConfig::from_settings(&settings.ai);
        tracing::debug!(
            config = %config_path.display(),
            report = %settings.report_path.display(),
            ai = ai.status.as_str(),
            "runtime resolved"
        );
        Self { config_path, settings, ai }
    }

    fn source(&self) -> ReportSource {
        ReportSource::new(
            self.settings.report_path.clone(),
            LoadOptions {
                sheet: self.settings.report_sheet.clone(),
                product_column: self.settings.product_column.clone(),
                strict_headers: self.settings.strict_headers,
            },
        )
    }

    fn ollama(&self) -> Result<OllamaClient, GenerationError> {
        OllamaClient::new(
            self.ai.endpoint.clone().unwrap_or_default(),
            self.ai.model.clone(),
            self.ai.temperature,
            self.ai.timeout,
        )
    }

    /// A real client when the AI config is usable, otherwise a generator that
    /// refuses with the blocking reason.
    fn generator(&self) -> Result<Box<dyn TextGenerator>, CliError> {
        if self.ai.status.is_ready() {
            let client = self.ollama().map_err(|e| CliError::generation(&e, self))?;
            Ok(Box::new(client))
        } else {
            let reason = self
                .ai
                .blocking_reason
                .clone()
                .unwrap_or_else(|| self.ai.status.as_str().to_string());
            Ok(Box::new(DisabledGenerator::new(reason)))
        }
    }

    fn pipeline(&self) -> Result<Pipeline<ReportSource, Box<dyn TextGenerator>>, CliError> {
        Ok(Pipeline::new(self.source(), self.generator()?))
    }
}

/// Join the question words; a question of only whitespace is a usage error.
fn question_text(words: &[String]) -> Result<String, CliError> {
    let question = words.join(" ");
    if question.trim().is_empty() {
        return Err(CliError::new(EXIT_USAGE, "the question is empty")
            .with_hint("salesq ask 'Show me the top products'"));
    }
    Ok(question)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn print_answer(answer: &Answer, json: bool) -> Result<(), CliError> {
    if json {
        print_json(answer)
    } else {
        println!("{}", answer.text);
        Ok(())
    }
}

fn cmd_ask(runtime: &Runtime, question: &str, json: bool) -> Result<(), CliError> {
    let answer = runtime
        .pipeline()?
        .answer(question)
        .map_err(|e| CliError::pipeline(e, runtime))?;
    print_answer(&answer, json)
}

fn cmd_total(runtime: &Runtime, question: &str, json: bool) -> Result<(), CliError> {
    let answer = runtime
        .pipeline()?
        .answer_total(question)
        .map_err(|e| CliError::pipeline(e, runtime))?;
    print_answer(&answer, json)
}

fn cmd_plot(runtime: &Runtime, question: &str, output_dir: Option<PathBuf>) -> Result<(), CliError> {
    let output_dir = output_dir.unwrap_or_else(|| runtime.settings.plot_output_dir.clone());
    let outcome = runtime
        .pipeline()?
        .plot(question, &output_dir)
        .map_err(|e| CliError::pipeline(e, runtime))?;

    match outcome {
        PlotOutcome::NotFound(reason) => {
            println!("{}", reason);
            Ok(())
        }
        PlotOutcome::Ready(series) => {
            tracing::info!(product = %series.product, points = series.points.len(), "writing chart");
            let path = write_line_chart(&series).map_err(|e| {
                CliError::new(EXIT_PLOT_EXPORT, format!("cannot write chart: {}", e))
                    .with_hint(plot_hint(&output_dir))
            })?;
            println!("{}", series.message());
            println!("Plot saved to: {}", path.display());
            Ok(())
        }
    }
}

fn plot_hint(output_dir: &Path) -> String {
    format!(
        "check that {} is writable, or pass --output-dir",
        output_dir.display()
    )
}

fn cmd_columns(runtime: &Runtime, json: bool) -> Result<(), CliError> {
    let table = runtime
        .pipeline()?
        .load()
        .map_err(|e| CliError::pipeline(e, runtime))?;
    let names = table.column_names();

    if json {
        print_json(&names)
    } else {
        for name in names {
            println!("{}", name);
        }
        Ok(())
    }
}

fn cmd_config(runtime: &Runtime) -> Result<(), CliError> {
    println!("# {}", runtime.config_path.display());
    print_json(&runtime.settings)
}

#[derive(Serialize)]
struct DoctorReport<'a> {
    schema_version: u32,
    #[serde(flatten)]
    diagnostics: &'a AIDiagnostics,
    test: &'a str,
}

fn cmd_ai_doctor(runtime: &Runtime, json: bool, test: bool) -> Result<(), CliError> {
    let diag = AIDiagnostics::from_resolved(&runtime.ai);
    let check = if test { Some(check_connectivity(runtime)) } else { None };
    let test_text = match &check {
        Some(result) => result.as_str(),
        None => "skipped",
    };

    if json {
        print_json(&DoctorReport {
            schema_version: 1,
            diagnostics: &diag,
            test: test_text,
        })?;
    } else {
        print!("{}", diag);
        if check.is_some() {
            println!("Test:              {}", test_text);
        } else {
            println!("Test:              skipped (use --test)");
        }
    }

    match runtime.ai.status {
        AIConfigStatus::Disabled => Err(CliError::new(EXIT_AI_DISABLED, "AI is disabled").with_hint(
            format!("set ai.provider to \"local\" in {}", runtime.config_path.display()),
        )),
        AIConfigStatus::Misconfigured => {
            let reason = diag.blocking_reason.clone().unwrap_or_else(|| "unknown".to_string());
            Err(CliError::new(EXIT_AI_MISCONFIGURED, format!("AI misconfigured: {}", reason)))
        }
        AIConfigStatus::Ready => match check {
            Some(ValidationResult::Invalid(msg)) => {
                Err(CliError::new(EXIT_AI_GENERATION, format!("AI check failed: {}", msg)))
            }
            _ => Ok(()),
        },
    }
}

fn check_connectivity(runtime: &Runtime) -> ValidationResult {
    if !runtime.ai.status.is_ready() {
        return ValidationResult::Skipped(format!("AI is {}", runtime.ai.status.as_str()));
    }

    let client = match runtime.ollama() {
        Ok(client) => client,
        Err(e) => return ValidationResult::Invalid(e.to_string()),
    };

    match client.ping() {
        Ok(models) if client.has_model(&models) => ValidationResult::Valid(format!(
            "Ollama reachable, model {} installed",
            client.model()
        )),
        Ok(_) => ValidationResult::Invalid(format!(
            "Ollama reachable, but model {} is not installed",
            client.model()
        )),
        Err(e) => ValidationResult::Invalid(e.to_string()),
    }
}
