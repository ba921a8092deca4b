//! Development task runner for gita-narrator.
//!
//! Generates throwaway inputs for manual runs and checks which of the
//! external tools the narrator shells out to are reachable.
//!
//! # Usage
//!
//! ```bash
//! # Write assets/demo_gita.pdf and assets/krishna.jpg
//! cargo xtask demo-assets
//!
//! # Report ffmpeg, ffprobe, edge-tts, python and Wav2Lip availability
//! cargo xtask doctor
//! ```

mod assets;

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_ASSET_DIR: &str = "assets";
const DEFAULT_WAV2LIP_DIR: &str = "Wav2Lip";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    }

    match args[0].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(ExitCode::SUCCESS)
        }
        "demo-assets" => {
            let dir = args
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR));
            std::fs::create_dir_all(&dir)?;

            let pdf = dir.join("demo_gita.pdf");
            assets::write_demo_pdf(&pdf)?;
            eprintln!("Wrote {}", pdf.display());

            let avatar = dir.join("krishna.jpg");
            assets::write_placeholder_avatar(&avatar)?;
            eprintln!("Wrote {}", avatar.display());

            eprintln!("\nTry: cargo run -p gita-narrator -- --pdf-path {} --chapter 1", pdf.display());
            Ok(ExitCode::SUCCESS)
        }
        "doctor" => {
            let wav2lip = args
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WAV2LIP_DIR));
            Ok(doctor(&wav2lip))
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_usage() {
    eprintln!(
        r#"xtask - Development tasks for gita-narrator

USAGE:
    cargo xtask <COMMAND> [ARG]

COMMANDS:
    demo-assets [DIR]   Write a two-chapter demo PDF and a placeholder avatar (default: assets)
    doctor [WAV2LIP]    Check external tools and the Wav2Lip directory (default: Wav2Lip)
    help                Show this help message

EXAMPLES:
    cargo xtask demo-assets
    cargo xtask doctor ~/models/Wav2Lip
"#
    );
}

/// Tools the pipeline cannot run without.
const REQUIRED_TOOLS: &[&str] = &["ffmpeg", "ffprobe", "edge-tts"];

fn doctor(wav2lip: &Path) -> ExitCode {
    let mut missing = 0;

    for tool in REQUIRED_TOOLS {
        match which::which(tool) {
            Ok(path) => eprintln!("  ok       {:<10} {}", tool, path.display()),
            Err(_) => {
                eprintln!("  MISSING  {}", tool);
                missing += 1;
            }
        }
    }

    // Only needed for lip-sync; the static fallback runs without them.
    match which::which("python3") {
        Ok(path) => eprintln!("  ok       {:<10} {}", "python3", path.display()),
        Err(_) => eprintln!("  optional python3 not found (lip-sync disabled)"),
    }
    if wav2lip.is_dir() {
        eprintln!("  ok       {:<10} {}", "Wav2Lip", wav2lip.display());
    } else {
        eprintln!(
            "  optional Wav2Lip directory {} not found (static fallback only)",
            wav2lip.display()
        );
    }

    if missing == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("\n{} required tool(s) missing.", missing);
        ExitCode::FAILURE
    }
}
