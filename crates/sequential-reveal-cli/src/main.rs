use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sequential_reveal_config::Config;
use sequential_reveal_engine::{
    CodeFence, Notebook, RevealOptions, StyleSource, io, parsing::lines_from_text, split_with_fence,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sequential-reveal")]
#[command(version)]
#[command(about = "Reveal a notebook's Markdown cell one section per run")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of ~/.config/sequential-reveal/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the next reveal step for a tagged cell
    Next {
        /// Notebook (.ipynb) holding the slide and the tagged cell
        notebook: PathBuf,

        /// Tag of the cell that follows the Markdown slide
        #[arg(short, long)]
        tag: String,

        #[command(flatten)]
        style: StyleArgs,

        /// Height in rem of a spacer appended below the render (0 = none)
        #[arg(long, value_name = "REM")]
        append_space: Option<u32>,

        /// Code fence marker
        #[arg(long, value_name = "MARKER")]
        fence: Option<String>,

        /// Record the render as the tagged cell's output in the notebook
        #[arg(short, long)]
        write: bool,
    },

    /// List the sections a Markdown file splits into
    Sections {
        /// Markdown file to split
        file: PathBuf,

        /// Code fence marker
        #[arg(long, value_name = "MARKER")]
        fence: Option<String>,
    },

    /// Clear the recorded output so the next run starts over
    Reset {
        notebook: PathBuf,

        #[arg(short, long)]
        tag: String,
    },

    /// Write the effective config to the config file as a starting point
    InitConfig {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// At most one source of prefix lines.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
struct StyleArgs {
    /// File whose contents are placed above the render
    #[arg(long, value_name = "PATH")]
    style_file: Option<PathBuf>,

    /// Literal text placed above the render
    #[arg(long, value_name = "TEXT")]
    style: Option<String>,

    /// Tag of a cell whose source is placed above the render
    #[arg(long, value_name = "TAG")]
    style_tag: Option<String>,
}

impl StyleArgs {
    fn source(&self, config: &Config) -> Option<StyleSource> {
        if let Some(path) = &self.style_file {
            Some(StyleSource::File(path.clone()))
        } else if let Some(text) = &self.style {
            Some(StyleSource::Inline(text.clone()))
        } else if let Some(tag) = &self.style_tag {
            Some(StyleSource::CellTag(tag.clone()))
        } else {
            config.style_file.clone().map(StyleSource::File)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let must_exist = !matches!(cli.command, Commands::InitConfig { .. });
    let config = load_config(cli.config.as_deref(), must_exist)?;

    match cli.command {
        Commands::Next {
            notebook,
            tag,
            style,
            append_space,
            fence,
            write,
        } => {
            let options = RevealOptions {
                fence: CodeFence::new(fence.unwrap_or_else(|| config.fence_marker.clone())),
                append_space_rem: append_space.unwrap_or(config.append_space_rem),
            };
            next(&notebook, &tag, style.source(&config), &options, write)
        }
        Commands::Sections { file, fence } => {
            let fence = CodeFence::new(fence.unwrap_or(config.fence_marker));
            sections(&file, fence)
        }
        Commands::Reset { notebook, tag } => reset(&notebook, &tag),
        Commands::InitConfig { force } => {
            let path = cli.config.unwrap_or_else(Config::config_path);
            init_config(&config, &path, force)
        }
    }
}

fn load_config(path: Option<&Path>, must_exist: bool) -> Result<Config> {
    let loaded = match path {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => config,
            None if must_exist => {
                anyhow::bail!("Config file not found: {}", path.display())
            }
            None => Config::default(),
        },
        None => Config::load()?.unwrap_or_default(),
    };
    log::debug!("Using config: {loaded:?}");
    Ok(loaded)
}

fn next(
    path: &Path,
    tag: &str,
    style: Option<StyleSource>,
    options: &RevealOptions,
    write: bool,
) -> Result<()> {
    let mut notebook = Notebook::from_file(path)
        .with_context(|| format!("Failed to load notebook {}", path.display()))?;

    let prefix = style
        .map(|source| source.resolve(&notebook))
        .transpose()
        .context("Failed to load style")?;

    let reveal = notebook.render_next(tag, prefix.as_deref(), options)?;
    log::info!(
        "Showing {} of {} section(s){}",
        reveal.progress.shown,
        reveal.progress.total,
        if reveal.progress.is_complete() {
            " (complete)"
        } else {
            ""
        }
    );

    print!("{}", reveal.markdown);

    if write {
        notebook.record_output(tag, &reveal.markdown)?;
        notebook
            .save(path)
            .with_context(|| format!("Failed to save notebook {}", path.display()))?;
        log::info!("Recorded output for '{tag}' in {}", path.display());
    }

    Ok(())
}

fn sections(path: &Path, fence: CodeFence) -> Result<()> {
    let text = io::read_file(path)?;
    let document = split_with_fence(&lines_from_text(&text), fence)
        .with_context(|| format!("Failed to split {}", path.display()))?;

    for line in document.duplicate_terminal_lines() {
        log::warn!(
            "Several sections end with '{line}'; a reveal resumed from it jumps back to the first"
        );
    }

    for (i, section) in document.iter().enumerate() {
        println!(
            "--- section {} ({} line(s)) ends at: {}",
            i + 1,
            section.len(),
            section.terminal_line().unwrap_or("<blank>")
        );
        for line in section.lines() {
            print!("{line}");
            if !line.ends_with('\n') {
                println!();
            }
        }
    }
    log::info!("{} section(s)", document.len());

    Ok(())
}

fn reset(path: &Path, tag: &str) -> Result<()> {
    let mut notebook = Notebook::from_file(path)
        .with_context(|| format!("Failed to load notebook {}", path.display()))?;
    notebook.clear_outputs(tag)?;
    notebook.save(path)?;
    log::info!("Cleared output for '{tag}' in {}", path.display());
    Ok(())
}

fn init_config(config: &Config, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to replace it)",
            path.display()
        );
    }
    config
        .save_to_path(path)
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    log::info!("Wrote config to {}", path.display());
    Ok(())
}
