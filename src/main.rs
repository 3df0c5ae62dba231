use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use wiki_archive::core::{
    preprocess_archive, ArchiveOptions, DEFAULT_CSS_SUPPLEMENT, DEFAULT_ENCODING,
};
use wiki_archive::env::{generate_env_docs, EnvVar, LogLevel, NoColor};
use wiki_archive::parsers::DEFAULT_DOMAIN;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version,
    about = env!("CARGO_PKG_DESCRIPTION"),
    after_help = generate_env_docs()
)]
struct Cli {
    /// Source mirror directory
    #[arg(long, default_value = "reference")]
    src: PathBuf,

    /// Destination directory (wiped before each run)
    #[arg(long, default_value = "output/reference")]
    dst: PathBuf,

    /// Languages present in the mirror
    #[arg(long = "lang", value_delimiter = ',', default_value = "en")]
    languages: Vec<String>,

    /// Site domain the mirror was taken from
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    domain: String,

    /// Stylesheet appended to common/site_modules.css
    #[arg(long, default_value = DEFAULT_CSS_SUPPLEMENT)]
    css_supplement: PathBuf,

    /// Worker threads for rewriting documents [default: all cores]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Charset of the mirrored documents
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    encoding: String,
}

impl From<Cli> for ArchiveOptions {
    fn from(cli: Cli) -> Self {
        ArchiveOptions {
            src: cli.src,
            dst: cli.dst,
            languages: cli.languages,
            domain: cli.domain,
            css_supplement: cli.css_supplement,
            jobs: cli.jobs,
            encoding: cli.encoding,
        }
    }
}

fn init_logging() {
    let level = LogLevel::get().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(!NoColor::get_or_default(false))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let options = ArchiveOptions::from(cli);
    match preprocess_archive(&options) {
        Ok(summary) => {
            info!(
                "Done: {} renames ({} skipped), {} documents ({} parser warnings), {} stylesheets",
                summary.renames_planned,
                summary.renames_skipped,
                summary.documents_processed,
                summary.parser_warnings,
                summary.stylesheets_finished
            );
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
