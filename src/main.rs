//! plume - content analysis for rich-text articles

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use plume::analysis::{
    Analyzer, ComplexityClassifier, DictionaryCache, DictionarySource, FileSource, NoSource,
};
use plume::util::decode_html;
use plume::{Config, count_words, normalize, rate};

#[derive(Parser)]
#[command(name = "plume")]
#[command(version, about = "Normalize rich-text HTML and flag complex words", long_about = None)]
#[command(after_help = "EXAMPLES:
    plume analyze article.html          Normalize and mark complex words
    plume analyze - --json < post.html  Full report as JSON
    plume check anticonstitutionnellement
    plume count article.html            Word count and length rating")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Word list file, or directory of `<lang>.json` lists
    #[arg(short, long, global = true, value_name = "PATH")]
    dictionary: Option<PathBuf>,

    /// Content language
    #[arg(short, long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize HTML and mark complex words
    Analyze {
        /// Input HTML file, or `-` for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Normalize HTML to the allowed tag subset
    Normalize {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Count words and rate the length
    Count {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Classify individual words
    Check {
        #[arg(required = true)]
        words: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        match config.dictionary.clone() {
            Some(path) => run(cli.command, &config, FileSource::new(path)).await,
            None => run(cli.command, &config, NoSource).await,
        }
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The config file, with command-line flags taking precedence.
fn load_config(cli: &Cli) -> plume::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::default(),
    };
    if let Some(dictionary) = &cli.dictionary {
        config.dictionary = Some(dictionary.clone());
    }
    if let Some(lang) = &cli.lang {
        config.lang = lang.clone();
    }
    Ok(config)
}

async fn run<S: DictionarySource>(command: Commands, config: &Config, source: S) -> plume::Result<()> {
    let cache = Arc::new(DictionaryCache::new(source).with_timeout(config.fetch_timeout()));
    let classifier = ComplexityClassifier::new(cache, config.lang.clone())
        .with_options(config.classifier_options());

    match command {
        Commands::Analyze { input, json } => {
            let html = read_input(&input)?;
            let analysis = Analyzer::new(classifier).analyze(&html).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("{}", analysis.html);
                eprintln!(
                    "{} words ({}), {} complex",
                    analysis.word_count,
                    analysis.rating.label,
                    analysis.complex_words.len()
                );
            }
        }
        Commands::Normalize { input } => {
            println!("{}", normalize(&read_input(&input)?));
        }
        Commands::Count { input } => {
            let fragment = plume::dom::parse_fragment(&read_input(&input)?);
            let count = count_words(&fragment.dom.plain_text(fragment.body));
            println!("{count}\t{}", rate(count).label);
        }
        Commands::Check { words, json } => {
            for word in &words {
                let verdict = classifier.classify(word).await;
                if json {
                    println!("{}", serde_json::to_string(&verdict)?);
                } else {
                    let label = if verdict.complex { "complex" } else { "simple" };
                    println!("{}\t{label}\t{}", verdict.word, verdict.reason);
                }
            }
        }
    }
    Ok(())
}

fn read_input(input: &str) -> plume::Result<String> {
    let bytes = if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        bytes
    } else {
        std::fs::read(input)?
    };
    Ok(decode_html(&bytes).into_owned())
}
