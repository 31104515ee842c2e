//! md2gmi: CLI tool to convert Markdown files to Gemtext

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use config::{
    CONFIG_FILE_NAME, CodeSpanChoice, Config, EmphasisChoice, HeadingLinkChoice,
    HeadingSpaceChoice, ParagraphLinkChoice, StrikethroughChoice,
};
use md2gmi_core::{RenderOptions, markdown_to_gemtext};

#[derive(Parser, Debug)]
#[command(name = "md2gmi")]
#[command(about = "Convert Markdown files to Gemtext")]
#[command(version)]
#[command(after_help = "Examples:
  md2gmi post.md                    # Convert single file to post.gmi
  md2gmi post.md -o index.gmi       # Convert to specific output file
  md2gmi content/ -o capsule/       # Convert directory
  md2gmi content/ -o capsule/ -j4   # Use 4 parallel jobs
  md2gmi --init-config              # Write a sample _md2gmi.toml")]
struct Cli {
    /// Input Markdown file or directory
    input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Configuration file (defaults to _md2gmi.toml next to the input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a sample _md2gmi.toml to the current directory and exit
    #[arg(long)]
    init_config: bool,

    /// How link-only headings are rendered
    #[arg(long, value_enum)]
    heading_link: Option<HeadingLinkChoice>,

    /// Blank space after headings
    #[arg(long, value_enum)]
    heading_space: Option<HeadingSpaceChoice>,

    /// Where links in prose paragraphs are surfaced
    #[arg(long, value_enum)]
    paragraph_link: Option<ParagraphLinkChoice>,

    /// Representation of emphasis spans
    #[arg(long, value_enum)]
    emphasis: Option<EmphasisChoice>,

    /// Representation of strikethrough spans
    #[arg(long, value_enum)]
    strikethrough: Option<StrikethroughChoice>,

    /// Representation of inline code
    #[arg(long, value_enum)]
    code_span: Option<CodeSpanChoice>,

    /// Literal text emitted for thematic breaks
    #[arg(long)]
    horizontal_rule: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        return write_sample_config();
    }

    let Some(input) = cli.input.clone() else {
        anyhow::bail!("Missing input path (see --help)");
    };

    let options = resolve_options(&cli, &input)?;

    if input.is_file() {
        convert_file(
            &input,
            cli.output.as_deref(),
            &options,
            cli.verbose,
            cli.quiet,
        )?;
    } else if input.is_dir() {
        convert_directory(
            &input,
            cli.output.as_deref(),
            cli.recursive,
            &options,
            cli.verbose,
            cli.quiet,
            cli.jobs,
        )?;
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    Ok(())
}

/// Resolve render options from the config file and CLI flags; flags win.
fn resolve_options(cli: &Cli, input: &Path) -> Result<RenderOptions> {
    let config = match &cli.config {
        Some(path) => Some(Config::load(path)?),
        None => {
            let dir = if input.is_dir() {
                input
            } else {
                input.parent().unwrap_or(Path::new("."))
            };
            Config::load_from_dir(dir)?
        }
    };

    let mut options = match config {
        Some(config) => config.render.to_render_options()?,
        None => RenderOptions::default(),
    };

    if let Some(v) = cli.heading_link {
        options.heading_link = v.into();
    }
    if let Some(v) = cli.heading_space {
        options.heading_space = v.into();
    }
    if let Some(v) = cli.paragraph_link {
        options.paragraph_link = v.into();
    }
    if let Some(v) = cli.emphasis {
        options.emphasis = v.into();
    }
    if let Some(v) = cli.strikethrough {
        options.strikethrough = v.into();
    }
    if let Some(v) = cli.code_span {
        options.code_span = v.into();
    }
    if let Some(rule) = &cli.horizontal_rule {
        options.horizontal_rule = rule.clone();
    }

    Ok(options)
}

fn write_sample_config() -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    fs::write(&path, Config::sample().to_toml_with_schema()?)
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

/// Convert a single Markdown file to Gemtext
fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &RenderOptions,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension("gmi"),
    };

    if verbose {
        eprintln!(
            "Converting: {} -> {}",
            input.display(),
            output_path.display()
        );
    }

    convert_file_inner(input, &output_path, options)?;

    if !quiet {
        println!("{}", output_path.display());
    }

    Ok(())
}

/// Convert a directory of Markdown files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    recursive: bool,
    options: &RenderOptions,
    verbose: bool,
    quiet: bool,
    jobs: Option<usize>,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_markdown_files(input, recursive)?;

    if files.is_empty() {
        if !quiet {
            eprintln!("No Markdown files found in {}", input.display());
        }
        return Ok(());
    }

    let total = files.len();
    if verbose {
        eprintln!("Found {} Markdown files", total);
    }

    // Configure thread pool if jobs specified
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Atomic counters for thread-safe progress tracking
    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    // Parallel conversion
    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir.join(relative).with_extension("gmi");

            match convert_file_inner(file, &output_file, options) {
                Ok(()) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !quiet {
                        println!("{}", output_file.display());
                    }
                    None
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some((file.clone(), e))
                }
            }
        })
        .collect();

    // Report errors
    for (file, e) in &errors {
        eprintln!("Error converting {}: {}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !quiet {
        eprintln!("Converted {} files, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

/// Inner conversion function that doesn't print (for parallel use)
fn convert_file_inner(input: &Path, output: &Path, options: &RenderOptions) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let gmi = markdown_to_gemtext(&content, options);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, &gmi).with_context(|| format!("Failed to write: {}", output.display()))?;

    Ok(())
}

/// Collect all Markdown files in a directory
fn collect_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") {
                    files.push(path);
                }
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_markdown_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}
