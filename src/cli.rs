use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use eda_report::ai::{OpenAiSummarizer, PassthroughSummarizer, Summarizer};
use eda_report::analyser::{load_csv_path, profile_dataset};
use eda_report::config::{ReportSettings, load_settings, save_settings};
use eda_report::pipeline::{ReportRequest, generate_report};
use eda_report::report::ReportFormat;
use secrecy::SecretString;
use std::path::PathBuf;

const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(
    name = "eda-report",
    version,
    about = "Profile a CSV file and produce an analysis report with charts"
)]
pub struct Cli {
    /// Also write logs to this directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Disable the log file and only log to stderr
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a PDF or DOCX report for a CSV file
    Generate {
        /// Input CSV file with a header row
        csv: PathBuf,

        /// Output format; overrides the settings file
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Directory for chart images; overrides the settings file
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Document path. Defaults to EDA_Report.<ext> in the current directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// JSON settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the AI summary and use the raw profile
        #[arg(long)]
        no_ai: bool,

        /// OpenAI API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Print the dataset profile only
    Profile {
        /// Input CSV file with a header row
        csv: PathBuf,
    },
    /// Write a settings file with every default filled in
    InitConfig {
        /// Destination JSON file
        file: PathBuf,
    },
}

pub async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            csv,
            format,
            output_dir,
            out,
            config,
            no_ai,
            api_key,
        } => {
            let mut settings = match config {
                Some(path) => load_settings(&path)?,
                None => ReportSettings::default(),
            };
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            let api_key = api_key
                .filter(|k| !k.trim().is_empty())
                .map(|k| SecretString::new(k.into()));
            handle_generate(csv, out, &settings, no_ai, api_key).await
        }
        Commands::Profile { csv } => handle_profile(csv),
        Commands::InitConfig { file } => {
            save_settings(&file, &ReportSettings::default())?;
            println!("Default settings written to {}", file.display());
            Ok(())
        }
    }
}

fn summarizer_for(
    settings: &ReportSettings,
    no_ai: bool,
    api_key: Option<SecretString>,
) -> Box<dyn Summarizer> {
    match api_key {
        Some(key) if settings.ai.enabled && !no_ai => {
            Box::new(OpenAiSummarizer::new(&key, settings.ai.clone()))
        }
        None if settings.ai.enabled && !no_ai => {
            tracing::warn!("No OpenAI API key configured, the raw profile will be used");
            Box::new(PassthroughSummarizer)
        }
        _ => Box::new(PassthroughSummarizer),
    }
}

async fn handle_generate(
    csv: PathBuf,
    out: Option<PathBuf>,
    settings: &ReportSettings,
    no_ai: bool,
    api_key: Option<SecretString>,
) -> Result<()> {
    let dataset = load_csv_path(&csv)
        .with_context(|| format!("Failed to load {}", csv.display()))?;

    println!("Data preview:");
    println!("{}", dataset.frame().head(Some(PREVIEW_ROWS)));

    let summarizer = summarizer_for(settings, no_ai, api_key);
    let request = ReportRequest::from(settings);
    let report = generate_report(&dataset, &request, summarizer.as_ref()).await?;

    println!();
    println!("Summary:");
    println!("{}", report.summary);

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
    }

    let out = out.unwrap_or_else(|| PathBuf::from(report.document.file_name()));
    std::fs::write(&out, &report.document.bytes)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!();
    println!(
        "Report saved to {} ({})",
        out.display(),
        report.document.mime_type()
    );
    Ok(())
}

fn handle_profile(csv: PathBuf) -> Result<()> {
    let dataset = load_csv_path(&csv)
        .with_context(|| format!("Failed to load {}", csv.display()))?;
    println!("{}", profile_dataset(&dataset));
    Ok(())
}
