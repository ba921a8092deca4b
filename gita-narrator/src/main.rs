//! gita-narrator - Narrate Bhagwat Gita chapters as a lip-synced avatar video

mod config;
mod document;
mod error;
mod lipsync;
mod media;
mod pipeline;
mod scratch;
mod text;
mod tts;
mod video;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::NarratorConfig;
use pipeline::{NarrationRequest, Pipeline};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gita-narrator")]
#[command(about = "Narrate the Bhagwat Gita as a lip-synced avatar video", long_about = None)]
#[command(version)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    /// Path to the Bhagwat Gita PDF
    #[arg(long, required = true)]
    pdf_path: Option<PathBuf>,

    /// Narration language (en, hi, or any language with a configured voice)
    #[arg(long, default_value = "en")]
    lang: String,

    /// Specific chapter to narrate
    #[arg(long)]
    chapter: Option<u32>,

    /// Path to the avatar image (default: from config)
    #[arg(long)]
    avatar_image: Option<PathBuf>,

    /// Output video path (default: from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Set the voice used for a language
    SetVoice {
        /// Language code (e.g. en, hi)
        lang: String,
        /// Voice identifier (e.g. en-IN-PrabhatNeural)
        voice: String,
    },
    /// Set the maximum characters per TTS request
    SetChunkSize {
        /// Characters per chunk
        size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let config = NarratorConfig::load().context("Failed to load configuration")?;

    let pdf_path = args
        .pdf_path
        .clone()
        .context("--pdf-path is required. Run 'gita-narrator --help' for usage.")?;

    let request = NarrationRequest {
        document: pdf_path,
        lang: args.lang.clone(),
        chapter: args.chapter,
        avatar: args
            .avatar_image
            .clone()
            .unwrap_or_else(|| config.default_avatar.clone()),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| config.default_output.clone()),
    };

    log::debug!("Request: {:?}", request);
    log::debug!("Work dir: {}", config.work_dir.display());

    // Failures are reported in the log; the missing video is the signal.
    let pipeline = Pipeline::from_config(&config);
    if let Err(e) = pipeline.run(&request).await {
        log::error!("{}", e);
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarratorConfig::load()?;
            println!("Configuration file: {:?}", NarratorConfig::config_path());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", NarratorConfig::config_path().display());
        }
        ConfigAction::SetVoice { lang, voice } => {
            let mut config = NarratorConfig::load()?;
            config.tts.voices.insert(lang.clone(), voice.clone());
            config.save()?;
            println!("Voice for '{}' set to: {}", lang, voice);
        }
        ConfigAction::SetChunkSize { size } => {
            if *size == 0 {
                anyhow::bail!("Chunk size must be at least 1 character");
            }
            let mut config = NarratorConfig::load()?;
            config.tts.chunk_size = *size;
            config.save()?;
            println!("TTS chunk size set to: {}", size);
        }
    }
    Ok(())
}
