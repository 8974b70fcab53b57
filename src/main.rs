use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use prosediff::commands::diff::OutputFormat;
use prosediff::commands::session::Session;
use prosediff::{DiffFilter, DiffOptions, Granularity};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prosediff",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Diff-and-annotate for rich-text documents",
    long_about = "Compares two versions of a rich-text document tree (ProseMirror-style JSON) \
    and prints a single merged document in which inserted and deleted text is tagged \
    with diff marks, at word or character granularity.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(long, global = true, help = "Disable colored output")]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "diff",
        about = "Merge two documents into one annotated document",
        long_about = "This command reads two JSON documents and prints the merged tree, \
        with changed text tagged as inserted or deleted."
    )]
    Diff {
        #[arg(index = 1, help = "The old document (JSON)")]
        old: PathBuf,
        #[arg(index = 2, help = "The new document (JSON)")]
        new: PathBuf,
        #[arg(short, long, help = "Diff granularity inside text: 'char' or 'word'")]
        granularity: Option<Granularity>,
        #[arg(long, help = "Maximum accepted node nesting depth")]
        max_depth: Option<usize>,
        #[arg(long, help = "JSON file with diff options; flags override it")]
        options: Option<PathBuf>,
        #[arg(
            short,
            long,
            default_value = "json",
            help = "Output format: 'json', 'html' or 'text'"
        )]
        format: OutputFormat,
    },
    #[command(
        name = "words",
        about = "Print the edit script between two strings",
        long_about = "This command diffs two strings and prints one segment per line, \
        prefixed with ' ', '-' or '+' and the segment granularity."
    )]
    Words {
        #[arg(index = 1)]
        old: String,
        #[arg(index = 2)]
        new: String,
        #[arg(short, long, default_value = "word", help = "Diff granularity: 'char' or 'word'")]
        granularity: Granularity,
        #[arg(
            long,
            default_value = "UDI",
            help = "Segments to show: (U)nchanged, (D)eleted, (I)nserted"
        )]
        diff_filter: String,
    },
    #[command(
        name = "tokenize",
        about = "Split text into word, whitespace and punctuation runs"
    )]
    Tokenize {
        #[arg(index = 1)]
        text: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prosediff=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    colored::control::set_override(!cli.no_color && std::io::stdout().is_terminal());

    let session = Session::new(Box::new(std::io::stdout()));

    match cli.command {
        Commands::Diff {
            old,
            new,
            granularity,
            max_depth,
            options,
            format,
        } => {
            let mut diff_options = match options {
                Some(path) => DiffOptions::load(&path)?,
                None => DiffOptions::default(),
            };
            if let Some(granularity) = granularity {
                diff_options = diff_options.with_granularity(granularity);
            }
            if let Some(max_depth) = max_depth {
                diff_options = diff_options.with_max_depth(max_depth);
            }

            session.diff(&old, &new, &diff_options, format)?
        }
        Commands::Words {
            old,
            new,
            granularity,
            diff_filter,
        } => {
            let Some(filter) = DiffFilter::try_parse(&diff_filter) else {
                anyhow::bail!("invalid diff filter: {diff_filter} (expected letters from 'UDI')");
            };

            session.words(&old, &new, granularity, filter)?
        }
        Commands::Tokenize { text } => session.tokenize(&text)?,
    }

    Ok(())
}
