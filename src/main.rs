//! Puzzle Kit CLI
//!
//! Usage:
//!   puzzle-kit [OPTIONS] [INPUT]
//!
//! Options:
//!   -t, --template <FILE>  Template text file
//!   -s, --set <FILE>       Template set file (TOML format)
//!   -n, --name <NAME>      Template name inside the set
//!   --skip-invalid         Drop records with failing fields
//!   --limit <N>            Stop after N records
//!   --pretty               Pretty-print JSON output
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use puzzle_kit::{ParseConfig, Template, TemplateError, TemplateSet, TemplateSetError};

#[derive(Parser)]
#[command(name = "puzzle-kit")]
#[command(about = "Extract typed records from text with line templates")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Template text file
    #[arg(short, long, conflicts_with = "set")]
    template: Option<PathBuf>,

    /// Template set file (TOML format)
    #[arg(short, long, requires = "name")]
    set: Option<PathBuf>,

    /// Template name inside the set
    #[arg(short, long)]
    name: Option<String>,

    /// Drop records with failing fields instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Stop after this many records
    #[arg(long)]
    limit: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "puzzle_kit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    // Load template text, remembering where it came from for error reports
    let (template_text, origin) = match (&cli.template, &cli.set, &cli.name) {
        (Some(path), _, _) => match fs::read_to_string(path) {
            Ok(text) => (text, path.display().to_string()),
            Err(e) => fail(&format!("Error reading template '{}': {}", path.display(), e)),
        },
        (None, Some(path), Some(name)) => match load_from_set(path, name) {
            Ok(text) => (text, format!("{}#{}", path.display(), name)),
            Err(e) => fail(&format!("Error loading template set '{}': {}", path.display(), e)),
        },
        _ => fail("Error: either --template or --set with --name is required"),
    };

    let template = match Template::compile(&template_text) {
        Ok(t) => t,
        Err(e) => fail_with_report(&e, &template_text, &origin),
    };
    debug!(pattern = template.pattern(), "template ready");

    // Read input
    let input = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => fail(&format!("Error reading file '{}': {}", path.display(), e)),
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => fail(&format!("Error reading from stdin: {}", e)),
            }
        }
    };

    let mut config = ParseConfig::new();
    if cli.skip_invalid {
        config = config.skip_invalid();
    }
    if let Some(limit) = cli.limit {
        config = config.with_limit(limit);
    }

    let records = match template.parse_with(&input, &config) {
        Ok(records) => records,
        Err(e) => fail_with_report(&e, &template_text, &origin),
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Error writing records: {}", e)),
    }
}

fn load_from_set(path: &Path, name: &str) -> Result<String, TemplateSetError> {
    let set = TemplateSet::from_file(path)?;
    set.text(name).map(str::to_string)
}

fn fail_with_report(err: &TemplateError, template: &str, origin: &str) -> ! {
    debug!(field = ?err.field(), "template error");
    eprint!("{}", err.format(template, origin));
    process::exit(1);
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}
