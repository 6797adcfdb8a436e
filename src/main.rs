//! infinite CLI
//!
//! Runs each component from the command line and prints what it produced.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use infinite::report::format_outcome;
use infinite::shape::{SHAPES, Shape};
use infinite::tui::ProgramOptions;
use infinite::types::{CursorMode, EchoMode, OutputFormat};
use infinite::{Confirm, Input, Selection, Spinner};

#[derive(Parser)]
#[command(name = "infinite")]
#[command(about = "Interactive terminal components")]
#[command(version)]
struct Cli {
    /// Draw on the alternate screen instead of inline
    #[arg(long, global = true)]
    alt_screen: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    format: OutputFormatArg,

    /// Write logs to this file instead of stderr (filter with RUST_LOG)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a spinner while simulated work runs
    Spinner {
        /// Animation shape (line, dot, minidot, jump, pulse, points, globe,
        /// moon, monkey, meter, hamburger, running)
        #[arg(long, default_value = "dot", value_parser = parse_shape)]
        shape: Shape,

        /// Number of simulated work steps
        #[arg(long, default_value_t = 5)]
        steps: u32,

        /// Duration of each step in milliseconds
        #[arg(long, default_value_t = 400)]
        step_ms: u64,
    },

    /// Read one line of text
    Input {
        /// Text shown before the field
        #[arg(long, default_value = "> ")]
        prompt: String,

        /// Hint shown while the field is empty
        #[arg(long)]
        placeholder: Option<String>,

        /// Mask typed characters
        #[arg(long)]
        password: bool,

        /// Cursor behavior
        #[arg(long, value_enum, default_value = "blink")]
        cursor: CursorModeArg,

        /// Maximum number of characters (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },

    /// Choose from a list
    Select {
        /// Text shown above the list
        #[arg(long, default_value = "Select:")]
        prompt: String,

        /// Allow several choices
        #[arg(long)]
        multi: bool,

        /// Rows visible at once
        #[arg(long, default_value_t = 10)]
        page_size: usize,

        /// The choices
        #[arg(required = true)]
        choices: Vec<String>,
    },

    /// Ask a yes/no question
    Confirm {
        /// The question
        prompt: String,

        /// Make "yes" the answer for Enter
        #[arg(long)]
        default_yes: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CursorModeArg {
    Blink,
    Static,
    Hide,
}

impl From<CursorModeArg> for CursorMode {
    fn from(arg: CursorModeArg) -> Self {
        match arg {
            CursorModeArg::Blink => CursorMode::Blink,
            CursorModeArg::Static => CursorMode::Static,
            CursorModeArg::Hide => CursorMode::Hide,
        }
    }
}

fn parse_shape(name: &str) -> Result<Shape, String> {
    Shape::by_name(name).ok_or_else(|| {
        let known: Vec<&str> = SHAPES.iter().map(|(n, _)| *n).collect();
        format!("unknown shape '{}', expected one of: {}", name, known.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_ref()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let options = ProgramOptions::new().with_alt_screen(cli.alt_screen);
    let format: OutputFormat = cli.format.into();

    let result = match cli.command {
        Commands::Spinner {
            shape,
            steps,
            step_ms,
        } => cmd_spinner(options, shape, steps, step_ms),
        Commands::Input {
            prompt,
            placeholder,
            password,
            cursor,
            limit,
        } => cmd_input(options, format, prompt, placeholder, password, cursor.into(), limit),
        Commands::Select {
            prompt,
            multi,
            page_size,
            choices,
        } => cmd_select(options, format, prompt, multi, page_size, choices),
        Commands::Confirm {
            prompt,
            default_yes,
        } => cmd_confirm(options, format, prompt, default_yes),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Install the tracing subscriber. Logs go to a file when one is given so
/// they do not tear the rendered components.
fn init_logging(log_file: Option<&PathBuf>) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("cannot open log file {}: {}", path.display(), e))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_spinner(
    options: ProgramOptions,
    shape: Shape,
    steps: u32,
    step_ms: u64,
) -> Result<(), String> {
    let spinner = Spinner::new()
        .with_shape(shape)
        .with_prompt("Starting...")
        .with_options(options);
    spinner.show();

    for step in 1..=steps {
        thread::sleep(Duration::from_millis(step_ms));
        spinner.refreshf(format_args!("Working... step {}/{}", step, steps));
    }

    spinner
        .finish(Some(&format!("Done, {} steps", steps)))
        .map_err(|e| e.to_string())
}

fn cmd_input(
    options: ProgramOptions,
    format: OutputFormat,
    prompt: String,
    placeholder: Option<String>,
    password: bool,
    cursor: CursorMode,
    limit: usize,
) -> Result<(), String> {
    let mut input = Input::new()
        .with_prompt(prompt)
        .with_cursor_mode(cursor)
        .with_char_limit(limit)
        .with_options(options);
    if let Some(placeholder) = placeholder {
        input = input.with_placeholder(placeholder);
    }
    if password {
        input = input.with_echo_mode(EchoMode::Password);
    }

    let outcome = input.show().map_err(|e| e.to_string())?;
    println!("{}", format_outcome(&outcome, format).map_err(|e| e.to_string())?);
    Ok(())
}

fn cmd_select(
    options: ProgramOptions,
    format: OutputFormat,
    prompt: String,
    multi: bool,
    page_size: usize,
    choices: Vec<String>,
) -> Result<(), String> {
    let outcome = Selection::new(choices.iter().cloned())
        .with_prompt(prompt)
        .multi(multi)
        .with_page_size(page_size)
        .with_options(options)
        .show()
        .map_err(|e| e.to_string())?;

    // Report the chosen labels, not their indices.
    let outcome = outcome.map(|indices| {
        indices
            .into_iter()
            .filter_map(|i| choices.get(i).cloned())
            .collect::<Vec<String>>()
    });
    println!("{}", format_outcome(&outcome, format).map_err(|e| e.to_string())?);
    Ok(())
}

fn cmd_confirm(
    options: ProgramOptions,
    format: OutputFormat,
    prompt: String,
    default_yes: bool,
) -> Result<(), String> {
    let outcome = Confirm::new(prompt)
        .with_default(default_yes)
        .with_options(options)
        .show()
        .map_err(|e| e.to_string())?;
    println!("{}", format_outcome(&outcome, format).map_err(|e| e.to_string())?);
    Ok(())
}
