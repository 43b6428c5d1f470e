//! Command-line surface definition.
//!
//! # Responsibility
//! - Declare flags, environment fallbacks and subcommands.
//! - Map CLI kind names onto core resource kinds.

use athenaeum_core::{RecordId, ResourceKind};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

pub const DEFAULT_DB_PATH: &str = "athenaeum.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "athenaeum", version, about = "Manage goals, courses and athenaeums")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "ATHENAEUM_DB", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Use a throwaway in-memory database instead of `--db`.
    #[arg(long, global = true)]
    pub memory: bool,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "ATHENAEUM_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a goal.
    CreateGoal { name: String },
    /// Create a course referencing goals by name.
    CreateCourse {
        name: String,
        #[arg(long = "goal", value_name = "NAME")]
        goals: Vec<String>,
    },
    /// Create an athenaeum referencing courses by name.
    CreateAthenaeum {
        name: String,
        #[arg(long = "course", value_name = "NAME")]
        courses: Vec<String>,
    },
    /// Show one record.
    Get {
        kind: KindArg,
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },
    /// List every record of a kind.
    List { kind: KindArg },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Goal,
    Course,
    Athenaeum,
}

impl From<KindArg> for ResourceKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Goal => Self::Goal,
            KindArg::Course => Self::Course,
            KindArg::Athenaeum => Self::Athenaeum,
        }
    }
}

fn parse_record_id(value: &str) -> Result<RecordId, String> {
    Uuid::parse_str(value.trim()).map_err(|err| format!("invalid record id `{value}`: {err}"))
}
