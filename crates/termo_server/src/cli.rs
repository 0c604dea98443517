//! Command-line interface for the termo server.

use clap::Parser;

/// Termo - multiplayer word-guessing game server
#[derive(Parser, Debug)]
#[command(name = "termo_server")]
#[command(about = "Word-guessing game server with REST API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Path to the database file (created if it doesn't exist)
    #[arg(long, default_value = "termo.db")]
    pub db_path: String,

    /// Path to the word-list file (one word per line)
    #[arg(long, default_value = "words.txt")]
    pub wordlist: std::path::PathBuf,
}
