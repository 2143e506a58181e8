//! CLI argument definitions using clap
//!
//! Commands:
//! - sharemap send --schema <path> --url <udp://host:port> --values <path>
//! - sharemap grab --schema <path> --url <udp://host:port>
//! - sharemap receive --schema <path> --port <port>
//! - sharemap gen --schema <path> --output <path>
//! - sharemap inspect --schema <path> --section <name>
//! - sharemap serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sharemap - schema-driven fixed-size binary frames over UDP
#[derive(Parser, Debug)]
#[command(name = "sharemap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a JSON values file and send it as one frame
    Send {
        /// Path to the schema document
        #[arg(long, default_value = "./schema.yaml")]
        schema: PathBuf,

        /// Schema section to pack with
        #[arg(long, default_value = "config")]
        section: String,

        /// Target endpoint, udp://host:port
        #[arg(long)]
        url: String,

        /// JSON object of field values
        #[arg(long)]
        values: PathBuf,
    },

    /// Bind, receive one frame and print it as JSON
    Grab {
        /// Path to the schema document
        #[arg(long, default_value = "./schema.yaml")]
        schema: PathBuf,

        /// Schema section to unpack with
        #[arg(long, default_value = "metrics")]
        section: String,

        /// Local endpoint to bind, udp://host:port
        #[arg(long)]
        url: String,
    },

    /// Receive frames forever, printing each decoded configuration
    Receive {
        /// Path to the schema document
        #[arg(long, default_value = "./schema.yaml")]
        schema: PathBuf,

        /// Schema section to unpack with
        #[arg(long, default_value = "config")]
        section: String,

        /// Local address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// UDP port to listen on
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },

    /// Generate the C++ header for every schema section
    Gen {
        /// Path to the schema document
        #[arg(long, default_value = "./schema.yaml")]
        schema: PathBuf,

        /// Output header path
        #[arg(long, default_value = "./sharemap.hpp")]
        output: PathBuf,
    },

    /// Print the frame layout of one section
    Inspect {
        /// Path to the schema document
        #[arg(long, default_value = "./schema.yaml")]
        schema: PathBuf,

        /// Schema section to inspect
        #[arg(long, default_value = "config")]
        section: String,
    },

    /// Start the HTTP configuration API
    Serve {
        /// Path to server configuration file
        #[arg(long, default_value = "./sharemap.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
