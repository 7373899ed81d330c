//! hanseg CLI - Command-line interface for Chinese word segmentation

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hanseg::engine::{global_registry, init_tokenizers};
use hanseg::{
    build_tokenizer, BuildContext, ConfigFile, LexiconConfig, LexiconMode, StatisticalConfig,
    TableConverter, TextNormalizer, TokenizeOptions, Tokenizer, TokenizerVariant, VERSION,
};

/// Available tokenizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineType {
    /// Dictionary + HMM segmentation (default)
    Statistical,
    /// Dictionary driven segmentation, optional tagging
    Lexicon,
    /// Split on whitespace
    Whitespace,
}

/// Lexicon engine mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Segmentation only
    Seg,
    /// Segmentation and part-of-speech tagging
    Lac,
}

impl From<ModeArg> for LexiconMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Seg => LexiconMode::Seg,
            ModeArg::Lac => LexiconMode::Lac,
        }
    }
}

/// hanseg - Chinese word segmentation with text normalization
#[derive(Parser, Debug)]
#[command(name = "hanseg")]
#[command(author, version, about, long_about = None)]
#[command(long_about = "
hanseg normalizes Chinese text (traditional to simplified, full-width to
half-width, lowercase) and segments it with the selected backend.

Examples:
  # Segment a sentence with the statistical engine (default)
  hanseg tokenize --text \"我来到北京清华大学\"

  # Lexicon engine with a custom vocabulary, one document per line
  hanseg tokenize --engine lexicon --vocab vocab.txt --input corpus.txt --output tokens.txt

  # Part-of-speech tags
  hanseg tag --engine lexicon --mode lac --text \"我爱北京天安门\"
")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct EngineArgs {
    /// Tokenizer to use
    #[arg(long, value_enum, default_value = "statistical", conflicts_with = "config")]
    engine: EngineType,

    /// Load engine, normalization and log settings from a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Custom vocabulary / user dictionary file
    #[arg(long, conflicts_with = "config")]
    vocab: Option<PathBuf>,

    /// Replacement main dictionary (lexicon engine)
    #[arg(long, conflicts_with = "config")]
    model: Option<PathBuf>,

    /// Lexicon engine mode
    #[arg(long, value_enum, default_value = "seg", conflicts_with = "config")]
    mode: ModeArg,

    /// Request GPU execution (lexicon engine)
    #[arg(long, conflicts_with = "config")]
    gpu: bool,

    /// Traditional-to-simplified table file or directory (overrides the config file)
    #[arg(long)]
    t2s_dict: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct CallArgs {
    /// Emit every dictionary word instead of the best path (statistical engine)
    #[arg(long)]
    cut_all: bool,

    /// Disable HMM discovery of unknown words (statistical engine)
    #[arg(long)]
    no_hmm: bool,

    /// Skip traditional-to-simplified conversion
    #[arg(long)]
    no_simplified: bool,

    /// Require traditional-to-simplified conversion (fails without a table)
    #[arg(long, conflicts_with = "no_simplified")]
    simplified: bool,

    /// Skip full-width to half-width conversion
    #[arg(long)]
    no_half_width: bool,

    /// Skip lowercasing
    #[arg(long)]
    no_lowercase: bool,

    /// Extra options as key=value (cut_all, hmm, to_simplified, to_half_width, to_lowercase)
    #[arg(long = "opt", value_name = "KEY=VALUE")]
    opts: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Text to process
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Input file, one document per line (stdin when neither --text nor --input is given)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout by default)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment text into tokens
    Tokenize {
        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        call: CallArgs,

        #[command(flatten)]
        io: InputArgs,

        /// Print each document's tokens as a JSON array
        #[arg(long)]
        json: bool,

        /// Token separator for plain output
        #[arg(long, default_value = " ")]
        delimiter: String,
    },

    /// Segment text and print part-of-speech tags
    Tag {
        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        call: CallArgs,

        #[command(flatten)]
        io: InputArgs,
    },

    /// Print normalized text without segmenting
    Normalize {
        /// Text to normalize
        #[arg(short, long)]
        text: String,

        /// Traditional-to-simplified table file or directory
        #[arg(long)]
        t2s_dict: Option<PathBuf>,

        #[command(flatten)]
        call: CallArgs,
    },

    /// List available tokenizers
    Engines {
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "hanseg.toml")]
        output: PathBuf,
    },
}

fn setup_logging(verbose: bool, log_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Log level from `[global]` of the config file passed with `--config`, if any.
///
/// A config that fails to load falls back to `info`; the error is reported
/// when the tokenizer is built.
fn configured_log_level(command: &Commands) -> String {
    let config_path = match command {
        Commands::Tokenize { engine, .. } | Commands::Tag { engine, .. } => engine.config.as_ref(),
        _ => None,
    };
    config_path
        .and_then(|path| ConfigFile::load(path).ok())
        .map(|config| config.global.log_level)
        .unwrap_or_else(|| "info".to_string())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} lines")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn tokenize_options(call: &CallArgs) -> Result<TokenizeOptions> {
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    if call.cut_all {
        pairs.push(("cut_all", "true"));
    }
    if call.no_hmm {
        pairs.push(("hmm", "false"));
    }
    if call.simplified {
        pairs.push(("to_simplified", "true"));
    }
    if call.no_simplified {
        pairs.push(("to_simplified", "false"));
    }
    if call.no_half_width {
        pairs.push(("to_half_width", "false"));
    }
    if call.no_lowercase {
        pairs.push(("to_lowercase", "false"));
    }

    // --opt values come last so they win over the flags
    for opt in &call.opts {
        let (key, value) = opt
            .split_once('=')
            .with_context(|| format!("Invalid option '{}', expected KEY=VALUE", opt))?;
        pairs.push((key.trim(), value.trim()));
    }

    Ok(TokenizeOptions::from_pairs(pairs)?)
}

fn engine_config(args: &EngineArgs) -> Result<ConfigFile> {
    let mut config = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let mut config = ConfigFile::default_config();
            config.tokenizer = match args.engine {
                EngineType::Statistical => TokenizerVariant::Statistical(StatisticalConfig {
                    user_dict: args.vocab.clone(),
                }),
                EngineType::Lexicon => TokenizerVariant::Lexicon(LexiconConfig {
                    custom_vocab: args.vocab.clone(),
                    model_path: args.model.clone(),
                    mode: args.mode.into(),
                    use_gpu: args.gpu,
                }),
                EngineType::Whitespace => TokenizerVariant::Whitespace,
            };
            config
        }
    };

    if args.t2s_dict.is_some() {
        config.conversion_table = args.t2s_dict.clone();
    }
    Ok(config)
}

fn load_tokenizer(args: &EngineArgs) -> Result<Box<dyn Tokenizer>> {
    let config = engine_config(args)?;
    let start = Instant::now();
    let tokenizer = build_tokenizer(&config).context("Failed to build tokenizer")?;
    info!(
        "Tokenizer '{}' ready in {:.1}ms",
        tokenizer.info().id,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(tokenizer)
}

fn open_output(path: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Feed every document to `handle`, showing progress for file input
fn for_each_document<F>(io_args: &InputArgs, mut handle: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    if let Some(text) = &io_args.text {
        return handle(text);
    }

    match &io_args.input {
        Some(path) => {
            let total = BufReader::new(
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
            )
            .lines()
            .count() as u64;
            let pb = create_progress_bar(total);

            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
                handle(&line)?;
                pb.inc(1);
            }
            pb.finish_with_message("done");
        }
        None => {
            for line in io::stdin().lock().lines() {
                handle(&line?)?;
            }
        }
    }
    Ok(())
}

fn print_engine_info(engine_id: &str, detailed: bool) {
    if let Ok(Some(info)) = global_registry().get_info(engine_id) {
        println!("┌─────────────────────────────────────────────────────────────┐");
        println!("│ {:^59} │", info.name);
        println!("├─────────────────────────────────────────────────────────────┤");
        println!("│ ID: {:55} │", info.id);
        println!("│ Kind: {:53} │", format!("{:?}", info.kind));

        if detailed {
            println!("├─────────────────────────────────────────────────────────────┤");
            let description = if info.description.chars().count() > 46 {
                format!("{}...", info.description.chars().take(43).collect::<String>())
            } else {
                info.description.clone()
            };
            println!("│ Description: {:46} │", description);

            println!("│ Features: {:49} │", "");
            for feature in &info.features {
                println!("│   - {:55} │", format!("{:?}", feature));
            }
        }
        println!("└─────────────────────────────────────────────────────────────┘");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, &configured_log_level(&cli.command));

    info!("hanseg v{}", VERSION);

    match &cli.command {
        Commands::Tokenize {
            engine,
            call,
            io,
            json,
            delimiter,
        } => {
            let tokenizer = load_tokenizer(engine)?;
            let options = tokenize_options(call)?;
            let mut out = open_output(&io.output)?;

            for_each_document(io, |text| {
                let tokens = tokenizer.tokenize(text, &options)?;
                if *json {
                    writeln!(out, "{}", serde_json::to_string(&tokens)?)?;
                } else {
                    writeln!(out, "{}", tokens.join(delimiter.as_str()))?;
                }
                Ok(())
            })?;
            out.flush()?;
            Ok(())
        }

        Commands::Tag { engine, call, io } => {
            let tokenizer = load_tokenizer(engine)?;
            let options = tokenize_options(call)?;
            let mut out = open_output(&io.output)?;

            for_each_document(io, |text| {
                let tagged = tokenizer.tag(text, &options)?;
                let line = tagged
                    .iter()
                    .map(|t| format!("{}/{}", t.word, t.tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{}", line)?;
                Ok(())
            })?;
            out.flush()?;
            Ok(())
        }

        Commands::Normalize {
            text,
            t2s_dict,
            call,
        } => {
            let mut context = BuildContext::from_env();
            if let Some(path) = t2s_dict {
                let table = TableConverter::load(path)
                    .with_context(|| format!("Failed to load table {}", path.display()))?;
                context.normalizer = TextNormalizer::new(Some(Arc::new(table)));
            }
            let options = tokenize_options(call)?;
            let normalized = context.normalizer.normalize_with(
                text,
                context.defaults,
                &options.normalization,
            )?;
            println!("{}", normalized);
            Ok(())
        }

        Commands::Engines { detailed } => {
            init_tokenizers()?;

            println!("\n╔═══════════════════════════════════════════════════════════════╗");
            println!("║                 hanseg - Available Tokenizers                 ║");
            println!("╚═══════════════════════════════════════════════════════════════╝\n");

            let engines = global_registry().list()?;
            for engine in &engines {
                print_engine_info(&engine.id, *detailed);
                println!();
            }

            println!("Total: {} tokenizer(s) registered", engines.len());
            if let Some(default) = global_registry().default_id() {
                println!("Default: {}", default);
            }
            println!("\nUsage: hanseg tokenize --engine <id> --text \"我来到北京清华大学\"");
            Ok(())
        }

        Commands::InitConfig { output } => {
            let config = ConfigFile::default_config();
            config
                .save(output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_flags_conflict_with_config() {
        for flag in [
            &["--engine", "lexicon"][..],
            &["--vocab", "vocab.txt"][..],
            &["--model", "dict.txt"][..],
            &["--mode", "lac"][..],
            &["--gpu"][..],
        ] {
            let mut args = vec!["hanseg", "tokenize", "--config", "hanseg.toml", "--text", "中文"];
            args.extend_from_slice(flag);
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn test_config_with_t2s_dict_is_accepted() {
        let cli = Cli::try_parse_from([
            "hanseg", "tokenize", "--config", "hanseg.toml", "--t2s-dict", "t2s", "--text", "中文",
        ])
        .unwrap();
        match cli.command {
            Commands::Tokenize { engine, .. } => {
                assert_eq!(engine.config, Some(PathBuf::from("hanseg.toml")));
                assert_eq!(engine.t2s_dict, Some(PathBuf::from("t2s")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_log_level_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hanseg.toml");
        let mut config = ConfigFile::default_config();
        config.global.log_level = "warn".to_string();
        config.save(&path).unwrap();

        let cli = Cli::try_parse_from([
            "hanseg",
            "tokenize",
            "--config",
            path.to_str().unwrap(),
            "--text",
            "中文",
        ])
        .unwrap();
        assert_eq!(configured_log_level(&cli.command), "warn");

        let cli = Cli::try_parse_from(["hanseg", "engines"]).unwrap();
        assert_eq!(configured_log_level(&cli.command), "info");
    }
}
