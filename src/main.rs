//! Space Trash entry point
//!
//! Reads one JSON request per stdin line, runs one tick per request and
//! answers on stdout. The final snapshot is printed when input ends.
//!
//! Usage: `space-trash [config.json] [seed]`

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use space_trash::protocol::{ServerResponse, decode_request, encode_response};
use space_trash::sim::{GameState, tick};
use space_trash::{RenderSnapshot, UniverseConfig};

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => {
            log::info!("Loading config from {}", path);
            UniverseConfig::load(&path)?
        }
        None => UniverseConfig::default(),
    };
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => time_seed(),
    };

    config.log_summary();
    log::info!("Seed: {}", seed);
    let mut state = GameState::new(&config, seed)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let request = match decode_request(&line) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Ignoring malformed request {:?}: {}", line, e);
                continue;
            }
        };

        let report = tick(&mut state, Some(&request.into_command()));
        if let Some(reply) = report.reply {
            let response = ServerResponse::new(request.kind(), reply);
            writeln!(out, "{}", encode_response(&response)?)?;
        }
        if report.just_collapsed {
            log::error!("=== THE UNIVERSE HAS COLLAPSED (tick {}) ===", state.time_ticks);
        }
    }

    writeln!(out, "{}", RenderSnapshot::from_state(&state).to_json()?)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Space Trash starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("space-trash: {}", e);
            ExitCode::FAILURE
        }
    }
}
