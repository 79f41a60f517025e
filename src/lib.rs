//! imgfind: resolve image references in markup documents.
//!
//! Documents refer to images by basename, optionally with a size directive
//! (`<img src="logo:w200"/>`). imgfind indexes an image directory, finds
//! the file for each reference, writes a copy next to the output document
//! (shrunk if asked, never enlarged), and rewrites the `src`, `width` and
//! `height` attributes.
//!
//! # Modules
//!
//! - [`index`]: basename → file index built from a directory walk
//! - [`resolve`]: reference parsing, dimension policy, node rewriting
//! - [`scale`]: copy-or-shrink of a single image
//! - [`document`]: owned markup tree and its XML reader/writer
//! - [`config`]: layered run configuration
//! - [`error`]: error types for imgfind operations

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod resolve;
pub mod scale;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};

pub use config::Config;
pub use error::ImgfindError;
pub use index::ImageIndex;
pub use resolve::{ResolveReport, ResolvedImage, Resolver};

use config::ConfigOverrides;
use document::io_xml::{read_document, to_document_string, write_document};
use document::Element;
use index::IndexReport;

/// The imgfind CLI application.
#[derive(Parser)]
#[command(name = "imgfind")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve the image references of an XML/XHTML document.
    Process(ProcessArgs),
    /// Show what the image index contains.
    Index(IndexArgs),
}

/// Options shared by every subcommand that builds an index.
#[derive(clap::Args)]
struct ConfigArgs {
    /// Directory scanned (recursively) for images [default: .].
    #[arg(long, env = "IMGFIND_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// Width used for references without a size directive (0 = any).
    #[arg(long, env = "IMGFIND_WIDTH")]
    width: Option<u32>,

    /// Height used for references without a size directive (0 = any).
    #[arg(long, env = "IMGFIND_HEIGHT")]
    height: Option<u32>,

    /// YAML config file with `image_dir`, `width` and `height` keys.
    #[arg(long, env = "IMGFIND_CONFIG")]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> Result<Config, ImgfindError> {
        let overrides = ConfigOverrides {
            image_dir: self.image_dir.clone(),
            width: self.width,
            height: self.height,
        };
        Config::load(self.config.as_deref(), &overrides)
    }
}

/// Arguments for the process subcommand.
#[derive(clap::Args)]
struct ProcessArgs {
    /// Input document.
    input: PathBuf,

    /// Output document (stdout if omitted). Images are written next to it.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,

    /// Diagnostics format on stderr ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the index subcommand.
#[derive(clap::Args)]
struct IndexArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the imgfind CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ImgfindError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Process(args)) => run_process(args),
        Some(Commands::Index(args)) => run_index(args),
        None => {
            println!("imgfind {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Resolve, rescale and annotate image references in markup documents.");
            println!();
            println!("Run 'imgfind --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // A logger installed by an embedding host takes precedence.
    if env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .is_err()
    {
        log::debug!("logger already initialized, keeping it");
    }
}

/// Resolve every image in the document at `input`, writing scaled copies
/// into `output_dir`.
///
/// Returns the rewritten tree; serializing it is left to the caller.
/// Diagnostics accumulate in `report`, including those raised before a
/// fatal error.
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    config: &Config,
    report: &mut ResolveReport,
) -> Result<Element, ImgfindError> {
    let index = ImageIndex::build(&config.image_dir);
    let mut document = read_document(input)?;
    let mut resolver = Resolver::new(&index, config, output_dir);
    resolver.resolve_document(&mut document, report)?;
    Ok(document)
}

/// Execute the process subcommand.
fn run_process(args: ProcessArgs) -> Result<(), ImgfindError> {
    let report_format = parse_output_format(&args.report)?;
    let config = args.config.load()?;

    let output_dir = args
        .output
        .as_deref()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut report = ResolveReport::new();
    let processed = process_file(&args.input, &output_dir, &config, &mut report);
    if let Ok(document) = &processed {
        match &args.output {
            Some(path) => write_document(path, document)?,
            None => print!("{}", to_document_string(document)),
        }
    }

    // Diagnostics are reported even when a later image failed.
    match report_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(ImgfindError::ReportWrite)?;
            eprintln!("{json}");
        }
        OutputFormat::Text => eprint!("{report}"),
    }

    processed.map(|_| ())
}

/// Execute the index subcommand.
fn run_index(args: IndexArgs) -> Result<(), ImgfindError> {
    let format = parse_output_format(&args.output)?;
    let config = args.config.load()?;
    let index = ImageIndex::build(&config.image_dir);
    let report = IndexReport::from(&index);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(ImgfindError::ReportWrite)?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{report}"),
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_output_format(raw: &str) -> Result<OutputFormat, ImgfindError> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ImgfindError::UnsupportedFormat(format!(
            "'{}' (supported: text, json)",
            other
        ))),
    }
}
