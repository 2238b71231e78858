// Data Integration Engine - Main executable
// Author: Gabriel Demetrios Lafis

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Arg, Command};
use log::{debug, info, warn};
use serde_json::Value as JsonValue;

use data_integration_engine::{
    tools::{Engine, ToolCall, ToolResponse, TOOL_NAMES},
    utils::{init_logging, Config},
};

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("Data Integration Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Query, transform, join and export data from heterogeneous sources")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(Command::new("serve").about("Answer tool calls read line by line from stdin"))
        .subcommand(
            Command::new("call")
                .about("Run a single tool call")
                .arg(
                    Arg::new("tool")
                        .help("Tool name")
                        .required(true)
                        .possible_values(TOOL_NAMES)
                        .index(1),
                )
                .arg(
                    Arg::new("args")
                        .short('a')
                        .long("args")
                        .value_name("JSON")
                        .help("Tool arguments as a JSON object")
                        .takes_value(true),
                ),
        )
        .get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    let engine = Engine::from_config(&config).context("Failed to set up the translator")?;

    if config.store.seed {
        engine
            .store()
            .provision()
            .with_context(|| format!("Failed to provision {}", config.store.path))?;
    }

    match matches.subcommand() {
        Some(("serve", _)) => serve(&engine),
        Some(("call", sub)) => {
            let tool = sub.value_of("tool").unwrap_or_default();
            let arguments: JsonValue = match sub.value_of("args") {
                Some(text) => serde_json::from_str(text).context("--args is not valid JSON")?,
                None => JsonValue::Null,
            };

            let response = engine.call(tool, arguments);
            println!("{}", response.text());

            if response.is_error() {
                std::process::exit(1);
            }
            Ok(())
        }
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            Ok(())
        }
    }
}

/// Read one `{"name", "arguments"}` object per line, write one response per line
fn serve(engine: &Engine) -> Result<()> {
    info!("Serving tool calls on stdio");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolCall>(&line) {
            Ok(call) => {
                debug!("Received call to {}", call.name);
                engine.call(&call.name, call.arguments)
            }
            Err(err) => {
                warn!("Malformed request: {}", err);
                ToolResponse::error(format!("Error: Invalid request: {}", err))
            }
        };

        serde_json::to_writer(&mut out, &response)?;
        writeln!(out)?;
        out.flush()?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
