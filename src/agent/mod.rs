pub mod remote;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A validated search, ready to hand to the travel agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub send_email: bool,
    pub recipient_email: Option<String>,
}

/// What the agent returns for one search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchOutcome {
    pub response: String,
    #[serde(default)]
    pub email_content: Option<String>,
    #[serde(default)]
    pub email_sent: Option<bool>,
}

impl SearchOutcome {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            email_content: None,
            email_sent: None,
        }
    }

    /// Email HTML, if the agent produced a non-blank one.
    pub fn email_html(&self) -> Option<&str> {
        self.email_content
            .as_deref()
            .filter(|html| !html.trim().is_empty())
    }

    pub fn email_was_sent(&self) -> bool {
        self.email_sent.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    HttpStatus { status: u16, body: String },
    Transport(String),
    Parse(String),
    EmptyResponse,
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpStatus { status, body } => {
                write!(f, "travel agent request failed with status {status}: {body}")
            }
            Self::Transport(msg) => write!(f, "travel agent transport error: {msg}"),
            Self::Parse(msg) => write!(f, "travel agent parse error: {msg}"),
            Self::EmptyResponse => write!(f, "travel agent returned an empty response"),
        }
    }
}

impl Error for AgentError {}

pub type AgentResult<T> = std::result::Result<T, AgentError>;

pub trait TravelAgent {
    fn search_travel(
        &self,
        request: SearchRequest,
    ) -> impl std::future::Future<Output = AgentResult<SearchOutcome>> + Send;
}

/// Builds a fresh agent for each search, told whether email is enabled.
pub trait AgentFactory {
    type Agent: TravelAgent;

    fn create(&self, enable_email: bool) -> Self::Agent;
}

impl<A: TravelAgent, F: Fn(bool) -> A> AgentFactory for F {
    type Agent = A;

    fn create(&self, enable_email: bool) -> A {
        self(enable_email)
    }
}
