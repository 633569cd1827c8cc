mod error;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use epp::{Diagnostic, catalog};

use crate::error::CliError;

const EXIT_OK: i32 = 0;
const EXIT_DIAGNOSTICS: i32 = 1;

#[derive(Parser)]
#[command(name = "epp", version, about = "Structure checker for E++ programs")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check block structure of one or more .epp files
    Check(CheckArgs),

    /// Show documentation for a keyword
    Hover(HoverArgs),

    /// List completion snippets and keywords
    Complete(CompleteArgs),

    /// Run .test.epp fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// E++ source files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print diagnostics as JSON instead of rendered snippets
    #[arg(long)]
    json: bool,

    /// Exit non-zero on warnings as well as errors
    #[arg(long)]
    deny_warnings: bool,
}

#[derive(clap::Args)]
struct HoverArgs {
    /// Keyword to look up (case-insensitive)
    word: String,

    /// Print the raw Markdown
    #[arg(long)]
    markdown: bool,
}

#[derive(clap::Args)]
struct CompleteArgs {
    /// Only list items whose label starts with this prefix
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Print items as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.epp file or directory containing them
    path: PathBuf,

    /// Run only fixtures in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // Respects RUST_LOG; logs go to stderr so JSON on stdout stays clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => do_check(&args, cli.no_color),
        Command::Hover(args) => do_hover(&args),
        Command::Complete(args) => do_complete(&args),
        Command::Test(args) => {
            if args.list_categories {
                test_runner::list_categories(&args.path);
                Ok(EXIT_OK)
            } else {
                Ok(test_runner::run_tests(&args.path, cli.no_color, &args.category))
            }
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(err.exit_code());
        }
    }
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a Path,
    diagnostics: &'a [Diagnostic],
}

fn do_check(args: &CheckArgs, no_color: bool) -> Result<i32, CliError> {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    let mut files = SimpleFiles::new();
    let mut reports = Vec::new();

    for path in &args.files {
        if path.extension().and_then(|e| e.to_str()) != Some(epp::FILE_EXTENSION) {
            debug!(path = %path.display(), "checking file without .epp extension");
        }
        let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        let diagnostics = epp::validate(&source);
        info!(
            path = %path.display(),
            diagnostics = diagnostics.len(),
            "checked"
        );
        let file_id = files.add(path.display().to_string(), source);
        reports.push((path, file_id, diagnostics));
    }

    if args.json {
        let json: Vec<FileReport<'_>> = reports
            .iter()
            .map(|(path, _, diagnostics)| FileReport {
                path: path.as_path(),
                diagnostics,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for (path, file_id, diagnostics) in &reports {
            for diagnostic in diagnostics {
                term::emit_to_write_style(
                    &mut writer.lock(),
                    &config,
                    &files,
                    &diagnostic.to_report(*file_id),
                )?;
            }
            if diagnostics.is_empty() {
                eprintln!("ok: {}", path.display());
            }
        }
    }

    let failed = reports
        .iter()
        .flat_map(|(_, _, diagnostics)| diagnostics)
        .any(|d| d.is_error() || (args.deny_warnings && d.is_warning()));
    Ok(if failed { EXIT_DIAGNOSTICS } else { EXIT_OK })
}

fn do_hover(args: &HoverArgs) -> Result<i32, CliError> {
    let doc = catalog::hover(&args.word).ok_or_else(|| CliError::UnknownKeyword(args.word.clone()))?;
    if args.markdown {
        println!("{}", doc);
    } else {
        println!("{}", catalog::render_plain(doc));
    }
    Ok(EXIT_OK)
}

fn do_complete(args: &CompleteArgs) -> Result<i32, CliError> {
    let items = catalog::completions_with_prefix(&args.prefix);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(EXIT_OK);
    }
    for item in &items {
        match &item.detail {
            Some(detail) => println!("{:<18} {}", item.label, detail),
            None => println!("{}", item.label),
        }
    }
    Ok(EXIT_OK)
}
