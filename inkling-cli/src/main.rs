//! Inkling CLI - image-to-story shell
//!
//! A command-line interface for generating stories from images, chatting
//! about the story world, and narrating passages as speech.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use inkling::prelude::*;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::{CliError, Result};

/// Inkling - turn an image into a story, then talk to it
#[derive(Parser)]
#[command(name = "inkling")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "INKLING_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and setup
    Init(InitArgs),

    /// Generate a story and analysis from an image
    Generate(GenerateArgs),

    /// Generate a story from an image, then chat about it
    Chat(ChatArgs),

    /// Narrate text as synthesized speech
    Narrate(NarrateArgs),

    /// Show status and configuration
    Status,

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the init command
#[derive(Args)]
struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the generate command
#[derive(Args)]
struct GenerateArgs {
    /// Path to the image file
    image: PathBuf,

    /// Narrate the generated story
    #[arg(short, long)]
    narrate: bool,

    /// Write narration audio to a WAV file instead of playing it
    #[arg(short, long, requires = "narrate")]
    output: Option<PathBuf>,
}

/// Arguments for the chat command
#[derive(Args)]
struct ChatArgs {
    /// Path to the image file
    image: PathBuf,

    /// Custom prompt prefix
    #[arg(short, long, default_value = "You: ")]
    prompt: String,
}

/// Arguments for the narrate command
#[derive(Args)]
struct NarrateArgs {
    /// Text to narrate
    text: Option<String>,

    /// Read the text from a file instead
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Write the audio to a WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Edit configuration in default editor
    Edit,
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "inkling_cli={level},inkling={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => cmd_init(args).await,
        Commands::Generate(args) => cmd_generate(args, cli.config).await,
        Commands::Chat(args) => cmd_chat(args, cli.config).await,
        Commands::Narrate(args) => cmd_narrate(args, cli.config).await,
        Commands::Status => cmd_status(cli.config).await,
        Commands::Config(args) => cmd_config(args, cli.config).await,
    }
}

/// Resolve configuration from an explicit path or the default location.
async fn resolve_config(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => config::load_config_from(path).await,
        None => config::load_config().await,
    };
    config.map_err(|e| CliError::config(e.to_string()))
}

/// Build a service client from the resolved configuration.
fn build_client(config: &AppConfig) -> Result<Gemini> {
    let service = config.to_gemini_config().ok_or_else(|| {
        CliError::config(
            "no API key configured; set provider.api_key in the config file or GEMINI_API_KEY",
        )
    })?;
    Ok(Gemini::new(service)?)
}

/// Initialize configuration.
async fn cmd_init(args: InitArgs) -> Result<()> {
    let config_file = config::config_path();

    if config_file.exists() && !args.force {
        println!("Configuration already exists at: {}", config_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    if args.force && config_file.exists() {
        tokio::fs::remove_file(&config_file).await?;
    }

    config::init_config()
        .await
        .map_err(|e| CliError::config(format!("failed to initialize config: {e}")))?;

    println!("Configuration created: {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("  1. export GEMINI_API_KEY=<key>");
    println!("  2. inkling generate <image>");

    Ok(())
}

/// Generate a story and analysis from an image.
async fn cmd_generate(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path).await?;
    let client = build_client(&config)?;

    let image = ImageData::from_path(&args.image)?;
    println!("Generating story...");

    let parts = client.analyze_and_write(&image).await?;
    println!();
    println!("{}", parts.story);
    println!();
    println!("Analysis: {}", parts.analysis);

    if args.narrate {
        let buffer = synthesize(&client, &parts.story).await?;
        match args.output {
            Some(path) => write_wav(&buffer, &path).await?,
            None => play_buffer(buffer).await?,
        }
    }

    Ok(())
}

/// Generate a story from an image, then chat about it interactively.
async fn cmd_chat(args: ChatArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path).await?;
    let client = build_client(&config)?;

    let image = ImageData::from_path(&args.image)?;
    let mut session = StorySession::new(client, open_sink()?);
    session.load_image(image);

    println!("Generating story...");
    session.generate().await;
    if !session.state().has_story() {
        return Err(CliError::narration("story generation failed"));
    }

    println!();
    println!("{}", session.state().story());
    println!();
    println!("Inkling Chat | type 'exit' to quit, '/read' to toggle narration\n");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(args.prompt.as_bytes()).await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else { break };
        let input = line.trim();

        match input {
            "" => {}
            "exit" | "quit" => break,
            "/read" => {
                session.poll_narration();
                session.narrate().await;
                if session.state().is_narrating() {
                    println!("(narrating; type '/read' again to stop)");
                } else {
                    println!("(narration stopped)");
                }
            }
            question => {
                let answer = session.ask(question).await;
                println!("{answer}\n");
            }
        }
    }

    session.stop_narration();
    Ok(())
}

/// Narrate arbitrary text.
async fn cmd_narrate(args: NarrateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path).await?;
    let client = build_client(&config)?;

    let text = match (args.text, args.input) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(path).await?,
        (None, None) => {
            return Err(CliError::narration("provide text or --input <file>"));
        }
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::narration("nothing to narrate"));
    }

    let buffer = synthesize(&client, text).await?;
    match args.output {
        Some(path) => write_wav(&buffer, &path).await,
        None => play_buffer(buffer).await,
    }
}

/// Show status.
async fn cmd_status(config_path: Option<PathBuf>) -> Result<()> {
    let config_file = config_path.unwrap_or_else(config::config_path);

    println!("Inkling Status\n");

    println!("Configuration:");
    println!("  Path:   {}", config_file.display());
    println!(
        "  Exists: {}",
        if config_file.exists() { "yes" } else { "no" }
    );

    if config_file.exists() {
        match config::load_config_from(&config_file).await {
            Ok(config) => {
                println!("  Valid:  yes");
                println!();
                let service = config.to_gemini_config();
                println!("Provider:");
                println!(
                    "  API key:    {}",
                    if service.is_some() { "available" } else { "missing" }
                );
                if let Some(service) = service {
                    println!("  Text model: {}", service.text_model);
                    println!("  TTS model:  {}", service.tts_model);
                    println!("  Voice:      {}", service.voice);
                }
            }
            Err(e) => {
                println!("  Valid:  no ({e})");
            }
        }
    }

    println!();
    println!("Environment:");
    print_env_status("GEMINI_API_KEY");
    print_env_status("INKLING_CONFIG");

    Ok(())
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config_file = config_path.unwrap_or_else(config::config_path);

    match args.command {
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Show => {
            if config_file.exists() {
                let content = tokio::fs::read_to_string(&config_file).await?;
                println!("{content}");
            } else {
                println!("Configuration file does not exist.");
                println!("Run 'inkling init' to create one.");
            }
        }
        ConfigCommands::Edit => {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            std::process::Command::new(&editor)
                .arg(&config_file)
                .status()
                .map_err(|e| CliError::config(format!("failed to open editor: {e}")))?;
        }
        ConfigCommands::Validate => {
            if !config_file.exists() {
                println!("error: configuration file does not exist");
                return Ok(());
            }

            match config::load_config_from(&config_file).await {
                Ok(_) => println!("Configuration is valid"),
                Err(e) => println!("error: {e}"),
            }
        }
    }

    Ok(())
}

/// Synthesize text into a playable buffer.
async fn synthesize(client: &Gemini, text: &str) -> Result<PcmBuffer> {
    println!("Synthesizing narration...");
    let clip = client
        .narrate(text)
        .await?
        .ok_or_else(|| CliError::narration("the service returned no audio"))?;
    Ok(clip.decode()?)
}

/// Write a buffer to a WAV file.
async fn write_wav(buffer: &PcmBuffer, path: &std::path::Path) -> Result<()> {
    let wav = buffer.to_wav()?;
    tokio::fs::write(path, wav).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Play a buffer through the default audio device and wait for it.
#[cfg(feature = "playback")]
async fn play_buffer(buffer: PcmBuffer) -> Result<()> {
    let duration = buffer.duration();
    let sink = RodioSink::open_default()?;
    let handle = sink.play(buffer)?;
    println!("Playing ({:.1}s)...", duration.as_secs_f64());
    handle.wait().await;
    Ok(())
}

#[cfg(not(feature = "playback"))]
async fn play_buffer(_buffer: PcmBuffer) -> Result<()> {
    Err(CliError::narration(
        "playback support not compiled in; rebuild with --features playback or use --output",
    ))
}

/// Open the audio sink used by interactive chat.
#[cfg(feature = "playback")]
fn open_sink() -> Result<RodioSink> {
    Ok(RodioSink::open_default()?)
}

#[cfg(not(feature = "playback"))]
fn open_sink() -> Result<NullSink> {
    Ok(NullSink::new())
}

/// Print environment variable status.
fn print_env_status(name: &str) {
    let status = if std::env::var(name).is_ok() {
        "set"
    } else {
        "-"
    };
    println!("  {name}: {status}");
}
