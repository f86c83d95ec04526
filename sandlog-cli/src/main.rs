// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Operator CLI: pass notes against a local store, and configuration
//! reconstruction against a robot-management service.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use sandlog_client::{ClientConfig, RobotServiceClient};
use sandlog_core::{PassNote, PassNoteKey};
use sandlog_storage::NoteStore;

#[derive(Parser, Debug)]
#[command(name = "sandlog", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage pass notes in a local store
    Note {
        /// Note-store data directory
        #[arg(long, env = "SANDLOG_DATA_DIR", default_value = "./sandlog-data")]
        data_dir: PathBuf,

        #[command(subcommand)]
        action: NoteAction,
    },

    /// Reconstruct a part's configuration as of a timestamp
    ConfigAt {
        /// Robot-management service base URL
        #[arg(long, env = "SANDLOG_ROBOT_URL")]
        url: String,

        #[arg(long, env = "SANDLOG_ROBOT_API_KEY")]
        api_key: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Part whose configuration to reconstruct
        #[arg(long)]
        part: String,

        /// RFC 3339 timestamp (e.g., 2025-03-01T12:00:00Z)
        #[arg(long)]
        at: DateTime<Utc>,
    },
}

#[derive(Subcommand, Debug)]
enum NoteAction {
    /// Create or replace the note for one pass
    Add {
        #[arg(long)]
        org: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        robot: String,
        #[arg(long)]
        pass: String,
        #[arg(long)]
        text: String,
        /// Attribution recorded on the note
        #[arg(long)]
        by: Option<String>,
    },

    /// Print the note for one pass
    Get {
        #[arg(long)]
        org: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        robot: String,
        #[arg(long)]
        pass: String,
    },

    /// List every note recorded for a robot
    List {
        #[arg(long)]
        org: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        robot: String,
    },

    /// Delete the note for one pass
    Delete {
        #[arg(long)]
        org: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        robot: String,
        #[arg(long)]
        pass: String,
    },

    /// Delete every note last updated before a cutoff
    Prune {
        /// RFC 3339 cutoff
        #[arg(long)]
        before: DateTime<Utc>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sandlog=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Note { data_dir, action } => run_note(&data_dir, action),
        Command::ConfigAt {
            url,
            api_key,
            timeout_secs,
            part,
            at,
        } => run_config_at(url, api_key, timeout_secs, &part, at).await,
    }
}

fn run_note(data_dir: &Path, action: NoteAction) -> Result<()> {
    let store = NoteStore::open(data_dir)?;

    match action {
        NoteAction::Add {
            org,
            location,
            robot,
            pass,
            text,
            by,
        } => {
            let note = PassNote {
                organization_id: org,
                location_id: location,
                robot_id: robot,
                pass_id: pass,
                note: text,
                updated_at: Utc::now(),
                updated_by: by,
            };
            if !note.key().is_complete() {
                anyhow::bail!("org, location, robot and pass must all be non-empty");
            }
            store.upsert(&note)?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }

        NoteAction::Get {
            org,
            location,
            robot,
            pass,
        } => {
            let key = PassNoteKey::new(org, location, robot, pass);
            match store.get(&key)? {
                Some(note) => println!("{}", serde_json::to_string_pretty(&note)?),
                None => anyhow::bail!("no note for pass {}", key.pass_id),
            }
        }

        NoteAction::List {
            org,
            location,
            robot,
        } => {
            let notes = store.list_for_robot(&org, &location, &robot)?;
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }

        NoteAction::Delete {
            org,
            location,
            robot,
            pass,
        } => {
            let key = PassNoteKey::new(org, location, robot, pass);
            if store.delete(&key)? {
                println!("deleted note for pass {}", key.pass_id);
            } else {
                println!("no note for pass {}", key.pass_id);
            }
        }

        NoteAction::Prune { before } => {
            let deleted = store.delete_older_than(before)?;
            println!("deleted {deleted} note(s) updated before {before}");
        }
    }

    Ok(())
}

async fn run_config_at(
    url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    part: &str,
    at: DateTime<Utc>,
) -> Result<()> {
    let mut config = ClientConfig::new(url).with_timeout(Duration::from_secs(timeout_secs));
    if let Some(api_key) = api_key {
        config = config.with_api_key(api_key);
    }
    let client = RobotServiceClient::new(config)?;

    match client.config_at_time(part, at).await? {
        Some(resolved) => {
            println!("{}", serde_json::to_string_pretty(&resolved.config)?);

            let meta = &resolved.metadata;
            let editor = meta.edited_by.as_deref().unwrap_or("unknown");
            eprintln!(
                "# part {} as of {} (changed {}, edited by {}, {})",
                meta.part_id,
                at,
                meta.config_timestamp,
                editor,
                if meta.has_old_config {
                    "from history"
                } else {
                    "live configuration"
                },
            );
        }
        None => {
            eprintln!("no configuration recorded for part {part} at {at}");
        }
    }

    Ok(())
}
