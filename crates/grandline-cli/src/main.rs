//! `grandline`: command-line client for the Grandline price server.
//!
//! # Usage
//!
//! ```
//! grandline search --number EB03-001
//! grandline search --name nami --set OP01
//! grandline sync OP01
//! grandline sync-all
//! grandline --config ~/.config/grandline/config.toml groups
//! ```

mod client;
mod render;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, SearchQuery};
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "grandline", about = "Look up One Piece card prices")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the grandline server (default: http://localhost:3000).
  #[arg(long, env = "GRANDLINE_URL")]
  url: Option<String>,

  /// Request timeout in seconds. Syncs can be slow.
  #[arg(long, env = "GRANDLINE_TIMEOUT_SECS")]
  timeout_secs: Option<u64>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every set known upstream.
  Groups,
  /// Search the local mirror by card number or name.
  Search {
    /// Exact card number, e.g. EB03-001. Takes precedence over --name.
    #[arg(short, long)]
    number: Option<String>,
    /// Substring of the card name.
    #[arg(long)]
    name:   Option<String>,
    /// Restrict a name search to one set; syncs it on a miss.
    #[arg(short, long, requires = "name")]
    set:    Option<String>,
  },
  /// Mirror one set now (skipped if synced within the freshness window).
  Sync {
    /// Set abbreviation, e.g. OP01.
    set: String,
  },
  /// Mirror every upstream set in turn, continuing past failures.
  SyncAll,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  #[serde(default)]
  timeout_secs: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    timeout:  Duration::from_secs(
      args
        .timeout_secs
        .or(file_cfg.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS),
    ),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Groups => {
      let groups = client.groups().await?;
      print!("{}", render::groups(&groups));
    }
    Command::Search { number, name, set } => {
      if number.is_none() && name.is_none() {
        bail!("provide --number or --name");
      }
      let cards = client.search(&SearchQuery { number, name, set }).await?;
      if cards.is_empty() {
        println!("No cards found.");
      } else {
        print!("{}", render::cards(&cards));
      }
    }
    Command::Sync { set } => {
      let report = client.sync(&set).await?;
      println!("{set}: {}", render::sync_report(&report));
    }
    Command::SyncAll => sync_all(&client).await?,
  }

  Ok(())
}

// ─── Bulk refresh ─────────────────────────────────────────────────────────────

/// Sync every upstream set sequentially; one failure does not stop the run.
async fn sync_all(client: &ApiClient) -> Result<()> {
  println!("Fetching set list…");
  let groups = client.groups().await?;
  let total = groups.len();
  let mut failed = Vec::new();

  for (i, group) in groups.iter().enumerate() {
    let progress = format!("[{}/{total}] {} ({})", i + 1, group.abbreviation, group.name);
    if group.abbreviation.is_empty() {
      println!("{progress}: no abbreviation, skipped");
      continue;
    }
    match client.sync(&group.abbreviation).await {
      Ok(report) => println!("{progress}: {}", render::sync_report(&report)),
      Err(e) => {
        println!("{progress}: failed: {e:#}");
        failed.push(group.abbreviation.clone());
      }
    }
  }

  if failed.is_empty() {
    println!("Done! All {total} sets synced.");
    Ok(())
  } else {
    bail!("{} of {total} sets failed: {}", failed.len(), failed.join(", "))
  }
}
