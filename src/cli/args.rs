use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "travel-assistant")]
#[command(
    about = "Terminal front-end for an AI travel agent: describe a trip, get flights and hotels",
    long_about = "Terminal front-end for an AI travel agent: describe a trip, get flights and hotels\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/travel-assistant/config.toml\n    2. ~/.config/travel-assistant/config.toml\n\nCredentials (OPENAI_API_KEY, SERPAPI_API_KEY, SENDGRID_API_KEY, SMTP_*) are read\nfrom the environment or a .env file and only checked for presence."
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start with email functionality switched on.
    #[arg(long)]
    pub enable_email: bool,

    /// Log agent HTTP traffic to stderr with secrets redacted. Redirect stderr
    /// (`2>http.log`) to keep it off the screen.
    #[arg(short, long)]
    pub verbose: bool,
}
