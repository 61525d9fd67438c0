//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Run and manage Miniboard mini-apps without a UI shell
#[derive(Parser, Debug)]
#[command(name = "miniboard", version, about, long_about = None)]
pub struct Cli {
    /// Host configuration file (JSON)
    #[arg(long, global = true, env = "MINIBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the app library and stored data
    #[arg(long, global = true, env = "MINIBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an app document until the duration elapses or Ctrl-C
    Run {
        /// App JSON file, or the id of an app in the library
        app: String,

        /// How long to keep timers running after start (0 = stop right away)
        #[arg(long, default_value_t = 0)]
        duration_ms: u64,

        /// Click a UI component after start (repeatable)
        #[arg(long = "click", value_name = "COMPONENT_ID")]
        clicks: Vec<String>,

        /// Press a key after the clicks (repeatable)
        #[arg(long = "key", value_name = "KEY")]
        keys: Vec<String>,

        /// Preset an input component's value
        #[arg(long = "input", value_name = "COMPONENT_ID=VALUE", value_parser = parse_key_value)]
        inputs: Vec<(String, String)>,
    },

    /// Check an app document and report lint issues
    Validate {
        file: PathBuf,

        /// Exit with an error when any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Create an empty app in the library
    New { name: String },

    /// List apps in the library
    List,

    /// Import an app JSON file into the library
    Import { file: PathBuf },

    /// Print an app from the library as JSON
    Export { id: String },

    /// Remove an app from the library
    Delete { id: String },

    /// Print the built-in node catalog
    Catalog {
        /// Print full definitions as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected COMPONENT_ID=VALUE, got '{}'", s))
}
