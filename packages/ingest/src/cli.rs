//! Command-line interface for law ingestion.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{default_jobs, ingest_directories_with};
use crate::error::{IngestError, Result};
use crate::parser::parse_law_str;
use crate::source::{law_directories, list_laws, LawDirectory};
use crate::types::{ItemType, LawDocument};
use crate::yaml::{generate_yaml, save_yaml, save_yaml_as};

/// GII Ingest - Parse German federal law XML into structured documents.
#[derive(Parser)]
#[command(name = "gii-ingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one law and print it as YAML.
    Parse {
        /// Law XML file or law directory
        path: PathBuf,

        /// Write `<slug>.yaml` into this directory instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the heading and article tree of one law.
    Outline {
        /// Law XML file or law directory
        path: PathBuf,
    },

    /// Parse every law directory of a data directory.
    Batch {
        /// Directory containing one subdirectory per law
        data_dir: PathBuf,

        /// Number of worker threads (default: available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Write `<slug>.yaml` files into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the law directories of a data directory with their timestamps.
    List {
        /// Directory containing one subdirectory per law
        data_dir: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { path, output } => parse_command(&path, output.as_deref()),
        Commands::Outline { path } => outline_command(&path),
        Commands::Batch {
            data_dir,
            jobs,
            output,
        } => batch_command(&data_dir, jobs, output.as_deref()),
        Commands::List { data_dir } => list_command(&data_dir),
    }
}

/// Load a law from an XML file or a law directory.
pub fn load_law(path: &Path) -> Result<LawDocument> {
    if path.is_dir() {
        LawDirectory::new(path).parse()
    } else {
        let xml = fs::read_to_string(path)?;
        parse_law_str(&xml)
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(IngestError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", path.display()),
        )));
    }
    Ok(())
}

/// Execute the parse command.
fn parse_command(path: &Path, output: Option<&Path>) -> Result<()> {
    if let Some(output_dir) = output {
        ensure_directory(output_dir)?;
    }

    let law = load_law(path)?;

    match output {
        Some(output_dir) => {
            let output_path = save_yaml(&law, output_dir)?;
            println!(
                "{} {} ({} items)",
                style("Parsed").bold(),
                style(&law.abbreviation).cyan(),
                law.contents.len()
            );
            println!(
                "{} {}",
                style("Saved to:").green().bold(),
                output_path.display()
            );
        }
        None => print!("{}", generate_yaml(&law)?),
    }

    Ok(())
}

/// Render the tree of a law as indented lines.
#[must_use]
pub fn render_outline(law: &LawDocument) -> Vec<String> {
    law.contents
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let indent = "  ".repeat(law.level_of(index));
            let marker = match item.item_type {
                ItemType::Heading => "#",
                ItemType::HeadingArticle => "+",
                ItemType::Article => "-",
            };
            match &item.title {
                Some(title) => format!("{indent}{marker} {} {title}", item.name),
                None => format!("{indent}{marker} {}", item.name),
            }
        })
        .collect()
}

/// Execute the outline command.
fn outline_command(path: &Path) -> Result<()> {
    let law = load_law(path)?;

    println!(
        "{} {}",
        style(&law.abbreviation).cyan().bold(),
        style(&law.title_long).green()
    );
    for line in render_outline(&law) {
        println!("{line}");
    }

    Ok(())
}

/// Execute the batch command.
fn batch_command(data_dir: &Path, jobs: Option<usize>, output: Option<&Path>) -> Result<()> {
    if let Some(output_dir) = output {
        ensure_directory(output_dir)?;
    }

    let dirs = law_directories(data_dir)?;
    let total = dirs.len();
    let jobs = jobs.unwrap_or_else(default_jobs);

    println!(
        "{} {} laws from {} with {} workers",
        style("Ingesting").bold(),
        style(total).cyan(),
        style(data_dir.display()).green(),
        jobs
    );
    println!();

    // Create progress spinner
    let pb = ProgressBar::new(total as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{pos}/{len}] {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = ingest_directories_with(dirs, jobs, |outcome| {
        pb.set_message(outcome.dir.name());
        pb.inc(1);
    });

    pb.finish_and_clear();

    if let Some(output_dir) = output {
        for (law, stem) in report.output_stems() {
            save_yaml_as(law, output_dir, &stem)?;
        }
    }

    println!(
        "  Succeeded: {}",
        style(report.succeeded()).green().bold()
    );
    if report.failed() > 0 {
        println!("  Failed: {}", style(report.failed()).red().bold());
        for (dir, error) in report.failures() {
            println!("    {} {error}", style(dir.name()).yellow());
        }
    }

    let collisions = report.slug_collisions();
    if !collisions.is_empty() {
        println!(
            "  Slug collisions: {}",
            style(collisions.len()).yellow().bold()
        );
        for collision in &collisions {
            println!("    {}: {}", collision.slug, collision.doknrs.join(", "));
        }
    }

    if let Some(output_dir) = output {
        println!();
        println!(
            "{} {}",
            style("Saved to:").green().bold(),
            output_dir.display()
        );
    }

    Ok(())
}

/// Execute the list command.
fn list_command(data_dir: &Path) -> Result<()> {
    for (name, timestamp) in list_laws(data_dir)? {
        println!("{timestamp} {name}");
    }
    Ok(())
}
