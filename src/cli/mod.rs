// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dbporter - Cross-dialect DDL script generator
///
/// Generates DROP/CREATE scripts for a target database from
/// a dialect-neutral metadata graph of the source database.
#[derive(Parser, Debug)]
#[command(name = "dbporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-dialect DDL script generator")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Describe source and target:   Edit dbporter.yaml
  2. Export source metadata:       metadata.json
  3. Generate scripts:             dbporter generate --metadata metadata.json

For detailed help on each command, use: dbporter <command> --help")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate DDL scripts for the target dialect
    ///
    /// Reads the migration config and the metadata graph, then writes
    /// the DROP/CREATE scripts to stdout, a file, or the target database.
    ///
    /// EXAMPLES:
    ///   # Print scripts for the whole database
    ///   dbporter generate --metadata metadata.json
    ///
    ///   # Write scripts for one table to a file
    ///   dbporter generate --metadata metadata.json --table users --output users.sql
    ///
    ///   # Execute scripts on target.url
    ///   dbporter generate --metadata metadata.json --execute
    Generate {
        /// Path to the migration config file
        #[arg(short, long, value_name = "FILE", default_value = "dbporter.yaml")]
        config: PathBuf,

        /// Path to the metadata graph (JSON)
        #[arg(short, long, value_name = "FILE")]
        metadata: PathBuf,

        /// Write scripts to this file instead of stdout
        #[arg(short, long, value_name = "FILE", conflicts_with = "execute")]
        output: Option<PathBuf>,

        /// Execute scripts on the target database (target.url)
        #[arg(long)]
        execute: bool,

        /// Generate scripts for a single table
        #[arg(short, long, value_name = "TABLE")]
        table: Option<String>,

        /// Schema of the table given with --table
        #[arg(short, long, value_name = "SCHEMA", requires = "table")]
        schema: Option<String>,
    },

    /// Resolve a JDBC type code to a dialect type name
    ///
    /// EXAMPLES:
    ///   # BIGINT with precision 20 on the target dialect
    ///   dbporter resolve-type --dialect target --code -5 --precision 20
    ///
    ///   # MySQL TEXT column
    ///   dbporter resolve-type --dialect oracle --code -1 --name TEXT --source mysql
    ResolveType {
        /// Dialect that renders the type name
        #[arg(short, long, value_name = "DIALECT")]
        dialect: String,

        /// JDBC type code
        #[arg(short, long, value_name = "CODE", allow_hyphen_values = true)]
        code: i32,

        /// Column size
        #[arg(long, value_name = "N")]
        size: Option<u32>,

        /// Numeric precision
        #[arg(long, value_name = "P")]
        precision: Option<u32>,

        /// Numeric scale
        #[arg(long, value_name = "S", allow_hyphen_values = true)]
        scale: Option<i32>,

        /// Source type name, used for alias resolution
        #[arg(short, long, value_name = "NAME")]
        name: Option<String>,

        /// Source dialect whose aliases are consulted first
        #[arg(long, value_name = "DIALECT")]
        source: Option<String>,
    },
}
