//! # quillpost CLI (`quill`)
//!
//! The `quill` binary drives a personal blog's publishing pipeline: convert
//! markdown articles to styled HTML, push them with git, wait for the static
//! host to deploy, and bookmark the result in a read-later service.
//!
//! ## Usage
//!
//! ```bash
//! quill --config ./quill.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quill convert <input.md> [output.html]` | Render one article to a self-contained HTML page |
//! | `quill publish <file.md> <title> [tags] [notes]` | Render, commit, push, wait for deploy, bookmark |
//! | `quill send <file.html> [title] [tags] [notes]` | POST an HTML file's markup inline to the reader API |
//! | `quill new <slug>` | Create a date-stamped article skeleton |
//! | `quill init` | Write a commented default `quill.toml` |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// quillpost — publish a personal markdown blog and bookmark the results.
///
/// `convert`, `new`, and `init` work without a config file; `publish` and
/// `send` read site, deploy, and reader settings from `--config`
/// (default `./quill.toml`, see `quill init`).
#[derive(Parser)]
#[command(
    name = "quill",
    about = "Render, push, and bookmark articles for a personal markdown blog",
    version
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(long, global = true, default_value = "./quill.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown article to a self-contained HTML page.
    ///
    /// The title comes from the first level-1 heading (or the filename if
    /// there is none). Output defaults to the input path with an `.html`
    /// extension and is overwritten if present.
    Convert {
        /// Path to the markdown article.
        input: PathBuf,

        /// Output path for the HTML page.
        output: Option<PathBuf>,
    },

    /// Publish an article: render, commit, push, wait for deploy, bookmark.
    ///
    /// The markdown and HTML files are committed together and pushed to the
    /// configured remote. After the push the public URL is polled until the
    /// host serves it (soft timeout), then one bookmark POST is issued.
    Publish {
        /// Path to the markdown article.
        file: PathBuf,

        /// Display title for the commit message and the bookmark.
        title: String,

        /// Comma-separated tags (default: the configured tag list).
        tags: Option<String>,

        /// Free-text note attached to the bookmark.
        notes: Option<String>,

        /// Render and show the plan without committing, pushing, or posting.
        #[arg(long)]
        dry_run: bool,
    },

    /// Send an HTML file's markup directly to the reader API.
    ///
    /// Bypasses the hosted-URL step: the markup goes inline in the payload
    /// with a raw VCS URL as the document address, and the service is asked
    /// to clean the HTML server-side.
    Send {
        /// Path to the HTML file.
        file: PathBuf,

        /// Display title (default: the document's <title>, then the filename).
        title: Option<String>,

        /// Comma-separated tags (default: the configured tag list).
        tags: Option<String>,

        /// Free-text note attached to the bookmark.
        notes: Option<String>,
    },

    /// Create a date-stamped article skeleton (`YYYY-MM-DD-<slug>.md`).
    New {
        /// Slug for the filename (e.g. `why-rust-is-nice`).
        slug: String,

        /// Heading for the new article (default: derived from the slug).
        #[arg(long)]
        title: Option<String>,

        /// Directory to create the article in.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Write a commented default config file.
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Argument mistakes are usage errors, exit 1 with the usage
            // message; --help and --version still exit 0.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    // Commands that don't require config
    match &cli.command {
        Commands::Convert { input, output } => {
            let article = quillpost::render::convert_file(input, output.as_deref())?;
            println!("rendered: {}", article.output_path.display());
            println!("  title: {}", article.title);
            return Ok(());
        }
        Commands::New { slug, title, dir } => {
            quillpost::scaffold::new_article(slug, title.as_deref(), dir)?;
            return Ok(());
        }
        Commands::Init => {
            quillpost::scaffold::init_config(&cli.config)?;
            return Ok(());
        }
        _ => {}
    }

    let config = quillpost::config::load_config(&cli.config)?;

    match cli.command {
        Commands::Publish {
            file,
            title,
            tags,
            notes,
            dry_run,
        } => {
            quillpost::publish::run_publish(
                &config,
                &file,
                &title,
                tags.as_deref(),
                notes.as_deref(),
                dry_run,
            )
            .await?;
        }
        Commands::Send {
            file,
            title,
            tags,
            notes,
        } => {
            quillpost::send::run_send(
                &config,
                &file,
                title.as_deref(),
                tags.as_deref(),
                notes.as_deref(),
            )
            .await?;
        }
        // Handled above (before config loading)
        Commands::Convert { .. } | Commands::New { .. } | Commands::Init => unreachable!(),
    }

    Ok(())
}
