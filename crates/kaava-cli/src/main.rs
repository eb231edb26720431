use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kaava_editor_core::normalize::normalize_latex_with;
use kaava_editor_core::symbols::{SymbolGroup, symbols_in};
use kaava_editor_core::{EditorConfig, FormulaEditor, Segment};
use kaava_renderer::{MathRenderer, MathResult, preview_html, render_content_html, render_math};
use miette::{IntoDiagnostic, Result};

mod config;
mod script;

#[derive(Parser)]
#[command(version, about = "Kaava - formula editing from the command line", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a KDL config file [default: <config dir>/kaava/config.kdl]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `kaava_editor_core=trace` [default: RUST_LOG, then warn]
    #[arg(long, env = "KAAVA_LOG", global = true)]
    log_level: Option<String>,

    /// Pass cap for shorthand expansion
    #[arg(long, global = true)]
    max_passes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand shorthand (`a/b`, `x^2`, `*`) into LaTeX
    Normalize {
        /// Formula source; read from stdin if omitted
        input: Option<String>,
    },
    /// Render a formula to MathML
    Render {
        /// Formula source; read from stdin if omitted
        input: Option<String>,

        /// Render as block math
        #[arg(long)]
        display: bool,

        /// Treat the input as `text $formula$` content and render it as HTML
        #[arg(long, conflicts_with = "display")]
        content: bool,
    },
    /// Replay an editing script and print the resulting content
    Replay {
        /// Script file, one command per line
        script: PathBuf,

        /// Also print each formula's preview
        #[arg(long)]
        previews: bool,
    },
    /// List the toolbar symbols
    Symbols,
}

fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(passes) = cli.max_passes {
        config.normalizer.max_passes = passes;
    }

    match cli.command {
        Commands::Normalize { input } => {
            let input = input_or_stdin(input)?;
            println!("{}", normalize_latex_with(&input, &config.normalizer));
        }
        Commands::Render {
            input,
            display,
            content,
        } => {
            let input = input_or_stdin(input)?;
            if content {
                println!("{}", render_content_html(&input, &config.normalizer));
            } else {
                render_formula(&input, display || config.display_mode, &config)?;
            }
        }
        Commands::Replay { script, previews } => replay_script(script, previews, config)?,
        Commands::Symbols => print_symbols(),
    }

    Ok(())
}

fn input_or_stdin(input: Option<String>) -> Result<String> {
    match input {
        Some(input) => Ok(input),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
            Ok(buf)
        }
    }
}

fn render_formula(input: &str, display_mode: bool, config: &EditorConfig) -> Result<()> {
    let latex = normalize_latex_with(input, &config.normalizer);
    match render_math(&latex, display_mode) {
        MathResult::Success(mathml) => {
            println!("{mathml}");
            Ok(())
        }
        MathResult::Error { html, message } => {
            println!("{html}");
            Err(miette::miette!("could not render `{latex}`: {message}"))
        }
    }
}

fn replay_script(path: PathBuf, previews: bool, config: EditorConfig) -> Result<()> {
    if !path.exists() {
        return Err(miette::miette!("Script not found: {}", path.display()));
    }
    let source = std::fs::read_to_string(&path).into_diagnostic()?;
    let steps = script::parse_script(&source)?;

    let mut editor = FormulaEditor::new(config);
    script::replay(&mut editor, &steps);
    tracing::debug!(steps = steps.len(), nodes = editor.node_count(), "replay finished");

    println!("{}", editor.get_content());

    if previews {
        let ids: Vec<_> = editor
            .segments()
            .iter()
            .filter_map(Segment::as_formula)
            .cloned()
            .collect();
        let display_mode = editor.config().display_mode;
        for id in ids {
            if let Some(preview) = editor.render_preview(&id, &MathRenderer) {
                println!("{id}\t{}\t{}", preview.latex(), preview_html(preview, display_mode));
            }
        }
    }
    Ok(())
}

fn print_symbols() {
    let groups = [
        SymbolGroup::Operators,
        SymbolGroup::Relations,
        SymbolGroup::Structures,
        SymbolGroup::Greek,
        SymbolGroup::Sets,
    ];
    for group in groups {
        println!("{group:?}");
        for symbol in symbols_in(group) {
            println!("  {:<6}{}", symbol.label, symbol.latex);
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
