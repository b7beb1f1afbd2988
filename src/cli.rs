//! Command-line interface for storyrelay
//!
//! Settings themselves come from environment variables; the CLI only chooses
//! which `.env` file to load and can print a template for one.

use clap::{Parser, Subcommand};

/// HTTP relay for LLM-generated story titles and stories
#[derive(Parser)]
#[command(name = "storyrelay")]
#[command(version)]
#[command(about = "HTTP relay for LLM-generated story titles and stories")]
pub struct Cli {
    /// Path to an environment file loaded before reading settings
    #[arg(short, long, default_value = ".env", global = true)]
    pub env_file: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template environment file
    Env {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Template `.env` content listing every supported variable
pub fn generate_env_template() -> &'static str {
    r#"# storyrelay environment
# ======================

# Completion provider API key (required)
GROQ_API_KEY=

# OpenAI-compatible base URL; "/chat/completions" is appended
# BASE_URL=https://api.groq.com/openai/v1

# Listen address and port
# FLASK_HOST=127.0.0.1
# FLASK_PORT=8000

# Log level: trace, debug, info, warn, error (RUST_LOG overrides this)
# LOG_LEVEL=info
"#
}
