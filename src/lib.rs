pub mod agent;
pub mod cli;
pub mod config;
pub mod email;
pub mod http;
pub mod search;
pub mod status;
pub mod trace;

use agent::remote::HttpTravelAgent;
use anyhow::Result;
use cli::{AppState, CliArgs, Theme, run_app};
use config::AppConfig;
use http::client::HttpClient;
use http::debug::HttpDebugConfig;
use search::SearchForm;
use status::CredentialStatus;
use std::time::{SystemTime, UNIX_EPOCH};
use trace::SessionTrace;

pub async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load_with_path(args.config.as_deref())?;
    let credentials = CredentialStatus::from_env();

    let session_id = generate_session_id();
    let trace = SessionTrace::create(&session_id)?;
    trace.log_session_start(&config.agent_base_url, &config.config_path);

    let http = HttpClient::new(
        reqwest::Client::new(),
        HttpDebugConfig::from_verbose(args.verbose),
    )
    .with_trace(trace.clone());
    let base_url = config.agent_base_url.clone();
    let api_key = config.agent_api_key.clone();
    let agents = move |enable_email| {
        HttpTravelAgent::new(http.clone(), &base_url, api_key.clone(), enable_email)
    };

    let theme = Theme::from_config(color_enabled(), &config.theme);
    let form = SearchForm::new(args.enable_email || config.enable_email);
    let mut app = AppState::new(agents, form, credentials, theme, config.download_dir.clone())
        .with_trace(trace.clone());

    run_app(&mut app).await?;
    eprintln!("Session trace: {}", trace.file_path().display());
    Ok(())
}

/// Honors the NO_COLOR convention.
fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}
