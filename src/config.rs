use clap::Parser;
use log::info;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::data::RosterInput;
use crate::error::Result;
use crate::store::Store;

/// Command line and environment configuration for the timetable server.
#[derive(Debug, Clone, Parser)]
#[command(name = "timetable_engine", version, about = "Timetable generation and rescheduling service")]
pub struct Cli {
    /// Address the HTTP server listens on.
    #[arg(long, env = "TIMETABLE_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// JSON roster to load at startup.
    #[arg(long, env = "TIMETABLE_ROSTER")]
    pub roster: Option<PathBuf>,

    /// Load the two-class demo roster.
    #[arg(long)]
    pub demo: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "TIMETABLE_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// The store the server starts with: demo roster first, then the file.
    pub fn initial_store(&self) -> Result<Store> {
        let mut store = Store::new();
        if self.demo {
            store.load_roster(&RosterInput::demo())?;
            info!("Loaded demo roster");
        }
        if let Some(path) = &self.roster {
            store.load_roster(&read_roster(path)?)?;
            info!("Loaded roster from {}", path.display());
        }
        Ok(store)
    }
}

pub fn read_roster(path: &Path) -> Result<RosterInput> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
