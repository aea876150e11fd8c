use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use recap_core::{
    BatchEvent, BatchProcessor, BatchReport, BatchRequest, Cache, ContentSource, LlmSummarizer,
    OfflineSummarizer, OutputFormat, Provider, Settings, Summarizer, SummaryLength, SummaryMode,
    SummaryOptions, YtDlpSource, markdown_to_text,
};
use tokio::fs;
use tracing_subscriber::EnvFilter;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, Default, ValueEnum)]
enum CliLength {
    Brief,
    #[default]
    Standard,
    Detailed,
}

impl From<CliLength> for SummaryLength {
    fn from(cli: CliLength) -> Self {
        match cli {
            CliLength::Brief => SummaryLength::Brief,
            CliLength::Standard => SummaryLength::Standard,
            CliLength::Detailed => SummaryLength::Detailed,
        }
    }
}

#[derive(Clone, Default, ValueEnum)]
enum CliFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl From<CliFormat> for OutputFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Markdown => OutputFormat::Markdown,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Text => OutputFormat::Text,
        }
    }
}

#[derive(Parser)]
#[command(name = "recap")]
#[command(
    about = "Summarize YouTube videos and merge related summaries into one report"
)]
struct Cli {
    /// Video URLs or ids
    #[arg(required = true)]
    references: Vec<String>,

    /// Summary language (e.g., "en", "es", "uk")
    #[arg(short, long, default_value = "en")]
    lang: String,

    /// AI provider for summaries
    #[arg(short, long, default_value = "grok")]
    provider: CliProvider,

    /// Model name, overriding settings and the provider default
    #[arg(short, long)]
    model: Option<String>,

    /// Ask a question about the videos instead of summarizing them
    #[arg(short, long)]
    question: Option<String>,

    /// Summary length
    #[arg(long, default_value = "standard")]
    length: CliLength,

    /// Reference [MM:SS] timestamps in key points
    #[arg(long)]
    timestamps: bool,

    /// Output format
    #[arg(long, default_value = "markdown")]
    format: CliFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Similarity needed to treat two summaries as related (0.0-1.0)
    #[arg(long)]
    threshold: Option<f64>,

    /// Videos processed at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Force re-processing even if cached results exist
    #[arg(short, long)]
    force: bool,

    /// Skip the AI provider and build summaries from video descriptions
    #[arg(long)]
    offline: bool,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn create_spinner(multi: &MultiProgress, msg: &str) -> ProgressBar {
    let pb = multi.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Wire batch progress events to one spinner per video.
fn progress_reporter(multi: MultiProgress) -> impl Fn(BatchEvent) + Send + Sync + 'static {
    let spinners: Mutex<HashMap<usize, ProgressBar>> = Mutex::new(HashMap::new());

    move |event| {
        let mut spinners = spinners.lock().expect("spinner map poisoned");
        match event {
            BatchEvent::ItemStarted { index, reference } => {
                let pb = create_spinner(&multi, &format!("Fetching {}...", reference));
                spinners.insert(index, pb);
            }
            BatchEvent::ItemRetrieved {
                index,
                title,
                cached,
            } => {
                if let Some(pb) = spinners.get(&index) {
                    let note = if cached { " (cached metadata)" } else { "" };
                    pb.set_message(format!("Summarizing {}{}...", title, note));
                }
            }
            BatchEvent::ItemFinished {
                index,
                title,
                fallback,
                cached,
            } => {
                if let Some(pb) = spinners.remove(&index) {
                    let note = if fallback {
                        style("(local summary)").yellow().to_string()
                    } else if cached {
                        style("(cached)").dim().to_string()
                    } else {
                        String::new()
                    };
                    pb.finish_with_message(format!(
                        "{} {} {}",
                        style("✓").green().bold(),
                        title,
                        note
                    ));
                }
            }
            BatchEvent::ItemFailed {
                index,
                reference,
                message,
            } => {
                let line = format!(
                    "{} {} {}",
                    style("✗").red().bold(),
                    reference,
                    style(message).dim()
                );
                match spinners.remove(&index) {
                    Some(pb) => pb.finish_with_message(line),
                    None => {
                        let _ = multi.println(line);
                    }
                }
            }
        }
    }
}

fn render(report: &BatchReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Markdown => report.document.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Text => markdown_to_text(&report.document),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let provider: Provider = cli.provider.into();

    // Validate API key early
    if !cli.offline {
        if let Err(e) = provider.validate_api_key() {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            eprintln!(
                "{}",
                style("Set the key or pass --offline to summarize from video descriptions.").dim()
            );
            std::process::exit(1);
        }
    }

    let settings = match Settings::load() {
        Ok(settings) => {
            tracing::debug!(
                path = %Settings::config_path().display(),
                ?settings,
                "Loaded settings"
            );
            settings
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load settings");
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let threshold = cli.threshold.unwrap_or(settings.relatedness_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        eprintln!(
            "{} threshold must be within 0.0 and 1.0, got {}",
            style("Error:").red().bold(),
            threshold
        );
        std::process::exit(1);
    }
    let analysis = settings.analysis_for(&cli.lang).with_threshold(threshold);

    eprintln!(
        "\n{}  {}\n",
        style("recap").cyan().bold(),
        style("Video Summaries").dim()
    );
    if analysis.stop_words.is_fallback() {
        eprintln!(
            "{} No stop words for {}, comparing with English defaults",
            style("!").yellow().bold(),
            style(&cli.lang).yellow()
        );
    }
    eprintln!("{}", style("─".repeat(60)).dim());

    let summarizer: Arc<dyn Summarizer> = if cli.offline {
        Arc::new(OfflineSummarizer)
    } else {
        let model = cli
            .model
            .clone()
            .or_else(|| settings.model_for(provider).map(str::to_string))
            .unwrap_or_else(|| provider.default_model().to_string());
        tracing::debug!(provider = provider.slug(), %model, "Using model");
        Arc::new(LlmSummarizer::new(provider).with_model(model))
    };
    let source: Arc<dyn ContentSource> = Arc::new(YtDlpSource::new());

    let multi = MultiProgress::new();
    let processor = BatchProcessor::new(source, summarizer)
        .with_cache(Cache::from_settings(&settings))
        .with_analysis(analysis)
        .with_max_concurrency(cli.concurrency.unwrap_or(settings.max_concurrency))
        .on_progress(progress_reporter(multi.clone()));

    let mode = match cli.question {
        Some(question) => SummaryMode::Question(question),
        None => SummaryMode::Summary,
    };
    let request = BatchRequest {
        references: cli.references,
        language: cli.lang,
        mode,
        options: SummaryOptions {
            length: cli.length.into(),
            include_timestamps: cli.timestamps,
        },
        force: cli.force,
    };

    let total_start = Instant::now();
    let report = processor.run(&request).await;

    if report.related {
        eprintln!(
            "{} Videos are related, merged into one report",
            style("✓").green().bold()
        );
    } else if report.items.len() > 1 {
        eprintln!(
            "{} Videos cover different topics, kept separate",
            style("✓").green().bold()
        );
    }
    if !report.errors.is_empty() {
        eprintln!(
            "{} {} of {} videos failed",
            style("!").yellow().bold(),
            report.errors.len(),
            request.references.len()
        );
    }

    eprintln!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    let format: OutputFormat = cli.format.into();
    let rendered = render(&report, format)?;

    match cli.output {
        Some(path) => {
            let path = if path.extension().is_none() {
                path.with_extension(format.extension())
            } else {
                path
            };
            if let Err(e) = fs::write(&path, &rendered).await {
                tracing::error!(path = %path.display(), error = %e, "Failed to save output");
                return Err(e.into());
            }
            eprintln!("{} {}\n", style("Saved:").dim(), style(path.display()).cyan());
        }
        None => {
            eprintln!("{}", style("─".repeat(60)).dim());
            println!("{}", rendered);
        }
    }

    if report.items.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BatchReport {
        BatchReport {
            id: uuid::Uuid::nil(),
            related: false,
            document: "## Cooking pasta\n\n**Cooking pasta**\nBoil water.\n".to_string(),
            items: vec![],
            errors: vec![],
        }
    }

    #[test]
    fn json_output_parses_as_one_document() {
        let rendered = render(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["related"], false);
        assert_eq!(value["document"], report().document);
    }

    #[test]
    fn markdown_output_is_the_document_verbatim() {
        let rendered = render(&report(), OutputFormat::Markdown).unwrap();
        assert_eq!(rendered, report().document);
    }

    #[test]
    fn short_durations_keep_one_decimal() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
