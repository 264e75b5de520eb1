use std::{
    io::{IsTerminal, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;
use tweet_sentiment_preprocessing::pre_processor::{ImportantWords, Stopwords, TextNormalizer};

use crate::{
    Analysis, ArtifactPaths, ClassifierKind, Predictor,
    model::DEFAULT_MODEL_DIR,
    posts::{DEFAULT_POST_COUNT, HttpPostSource, JsonFilePostSource, PostSource, fetch_or_empty},
    render,
};

#[derive(Parser, Debug)]
#[command(name = "tweet-sentiment", version)]
#[command(about = "Classify the sentiment of text and social media posts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding model.json / model.onnx and vectorizer.json / vectorizer.bin
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "TWEET_SENTIMENT_MODEL_DIR",
        default_value = DEFAULT_MODEL_DIR
    )]
    model_dir: PathBuf,

    /// Classifier artifact to load
    #[arg(long, global = true, value_enum, default_value_t = ClassifierKind::Linear)]
    classifier: ClassifierKind,

    /// Stopword corpus file (one word per line) instead of the built-in English list
    #[arg(long, global = true, value_name = "PATH")]
    stopwords: Option<PathBuf>,

    /// Output format [default: label for text, card for user]
    #[arg(short = 'o', long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify typed text (reads stdin when no input is given)
    Text {
        /// Text to analyze
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        /// Read text from file
        #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Batch process texts (one per line)
        #[arg(short, long, value_name = "PATH", conflicts_with_all = ["text", "file"])]
        batch: Option<PathBuf>,
    },
    /// Fetch a user's recent posts and classify each one
    User {
        /// Account to fetch posts for
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Number of posts to fetch
        #[arg(short = 'n', long, default_value_t = DEFAULT_POST_COUNT)]
        count: usize,

        /// Base URL of the post scraper service
        #[arg(long, value_name = "URL", env = "TWEET_SENTIMENT_POSTS_URL")]
        posts_url: Option<String>,

        /// Read posts from a JSON file instead of fetching them
        #[arg(long, value_name = "PATH")]
        posts_file: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Just the sentiment label
    Label,
    /// One JSON object per text (an array in batch mode)
    Json,
    /// Colored terminal card
    Card,
    /// HTML card markup
    Html,
}

const NO_POSTS_MESSAGE: &str = "No posts found or an error occurred.";

enum InputSource {
    Single(String),
    Batch(Vec<String>),
}

pub fn run(cli: &Cli) -> Result<()> {
    init_tracing(cli);
    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let predictor = load_predictor(cli)?;

    match &cli.command {
        Command::Text { text, file, batch } => {
            let format = cli.format.unwrap_or(OutputFormat::Label);
            match determine_input_source(text.as_deref(), file.as_deref(), batch.as_deref())? {
                InputSource::Single(text) => {
                    let analysis = predictor.analyze(&text)?;
                    output_result(&analysis, format, cli.no_color)?;
                }
                InputSource::Batch(texts) => {
                    let analyses = analyze_each(&predictor, &texts);
                    output_batch_results(&analyses, format, cli.no_color)?;
                }
            }
        }
        Command::User {
            username,
            count,
            posts_url,
            posts_file,
        } => {
            let format = cli.format.unwrap_or(OutputFormat::Card);
            let source: Box<dyn PostSource> = match (posts_file, posts_url) {
                (Some(path), _) => Box::new(JsonFilePostSource::new(path)),
                (None, Some(url)) => Box::new(HttpPostSource::new(url)),
                (None, None) => {
                    bail!("no post source configured: pass --posts-url or --posts-file")
                }
            };

            let report = user_report(
                &predictor,
                source.as_ref(),
                username,
                *count,
                format,
                cli.no_color,
            )?;
            for line in report {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let default_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, true) => "debug",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_predictor(cli: &Cli) -> Result<Predictor> {
    let paths = ArtifactPaths::new(&cli.model_dir);
    let predictor = Predictor::load(&paths, cli.classifier).with_context(|| {
        format!(
            "Failed to load model artifacts from {}",
            cli.model_dir.display()
        )
    })?;

    match &cli.stopwords {
        Some(path) => Ok(predictor.with_normalizer(normalizer_from_stopwords(path)?)),
        None => Ok(predictor),
    }
}

/// A normalizer over a user-supplied corpus. The corpus is taken as-is, so an
/// important word listed there is suppressed.
fn normalizer_from_stopwords(path: &Path) -> Result<TextNormalizer> {
    let stopwords = Stopwords::from_path(path)
        .with_context(|| format!("Failed to read stopwords: {}", path.display()))?;
    Ok(TextNormalizer::new(stopwords, ImportantWords::new()))
}

/// Determine input source from CLI args
fn determine_input_source(
    text: Option<&str>,
    file: Option<&Path>,
    batch: Option<&Path>,
) -> Result<InputSource> {
    // Priority: text arg > file > batch > stdin
    if let Some(text) = text {
        return Ok(InputSource::Single(text.to_owned()));
    }

    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        return Ok(InputSource::Single(text));
    }

    if let Some(path) = batch {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
        let texts = contents.lines().map(String::from).collect();
        return Ok(InputSource::Batch(texts));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(InputSource::Single(buffer))
}

/// Analyze each text on its own, reporting and skipping the ones the model
/// rejects.
fn analyze_each(predictor: &Predictor, texts: &[String]) -> Vec<Analysis> {
    predictor
        .analyze_batch(texts)
        .into_iter()
        .zip(texts)
        .filter_map(|(result, text)| match result {
            Ok(analysis) => Some(analysis),
            Err(err) => {
                error!(error = %err, "Could not classify text");
                eprintln!("Could not classify {text:?}: {err}");
                None
            }
        })
        .collect()
}

/// Lines to print for a user's posts, or the no-results message.
fn user_report(
    predictor: &Predictor,
    source: &dyn PostSource,
    username: &str,
    count: usize,
    format: OutputFormat,
    no_color: bool,
) -> Result<Vec<String>> {
    let posts = fetch_or_empty(source, username, count);
    if posts.is_empty() {
        return Ok(vec![NO_POSTS_MESSAGE.to_owned()]);
    }
    let texts = posts.into_iter().map(|post| post.text).collect::<Vec<_>>();
    let analyses = analyze_each(predictor, &texts);
    format_batch(&analyses, format, no_color)
}

fn format_result(analysis: &Analysis, format: OutputFormat, no_color: bool) -> Result<String> {
    Ok(match format {
        OutputFormat::Label => analysis.sentiment.to_string(),
        OutputFormat::Json => serde_json::to_string(analysis)?,
        OutputFormat::Card => {
            render::terminal_card(&analysis.text, analysis.sentiment, !no_color)
        }
        OutputFormat::Html => render::html_card(&analysis.text, analysis.sentiment),
    })
}

fn output_result(analysis: &Analysis, format: OutputFormat, no_color: bool) -> Result<()> {
    println!("{}", format_result(analysis, format, no_color)?);
    Ok(())
}

fn format_batch(analyses: &[Analysis], format: OutputFormat, no_color: bool) -> Result<Vec<String>> {
    if format == OutputFormat::Json {
        return Ok(vec![serde_json::to_string(analyses)?]);
    }
    analyses
        .iter()
        .map(|analysis| format_result(analysis, format, no_color))
        .collect()
}

fn output_batch_results(analyses: &[Analysis], format: OutputFormat, no_color: bool) -> Result<()> {
    for line in format_batch(analyses, format, no_color)? {
        println!("{line}");
    }
    Ok(())
}
