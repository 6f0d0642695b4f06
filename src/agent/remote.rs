use serde::Serialize;

use super::{AgentError, AgentResult, SearchOutcome, SearchRequest, TravelAgent};
use crate::http::client::HttpClient;

const MAX_ERROR_BODY_CHARS: usize = 400;

/// Talks to a travel agent service over HTTP.
///
/// The service owns intent parsing, flight/hotel lookup and email delivery;
/// this side only ships the query and decodes the reply.
#[derive(Debug, Clone)]
pub struct HttpTravelAgent {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    enable_email: bool,
}

impl HttpTravelAgent {
    pub fn new(
        http: HttpClient,
        base_url: &str,
        api_key: Option<String>,
        enable_email: bool,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            enable_email,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url)
    }

    fn build_payload(&self, request: &SearchRequest) -> SearchPayload {
        let email_allowed = self.enable_email;
        SearchPayload {
            query: request.query.clone(),
            send_email: email_allowed && request.send_email,
            recipient_email: request
                .recipient_email
                .clone()
                .filter(|_| email_allowed),
            enable_email: email_allowed,
        }
    }
}

impl TravelAgent for HttpTravelAgent {
    async fn search_travel(&self, request: SearchRequest) -> AgentResult<SearchOutcome> {
        let payload = self.build_payload(&request);
        let response = self
            .http
            .post_json(&self.endpoint(), self.api_key.as_deref(), &payload)
            .await
            .map_err(|err| AgentError::Transport(err.to_string()))?;

        if !response.is_success() {
            let body = response
                .body
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect::<String>();
            return Err(AgentError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let outcome = serde_json::from_str::<SearchOutcome>(&response.body)
            .map_err(|err| AgentError::Parse(err.to_string()))?;
        if outcome.response.trim().is_empty() {
            return Err(AgentError::EmptyResponse);
        }

        Ok(outcome)
    }
}

#[derive(Debug, Serialize)]
struct SearchPayload {
    query: String,
    send_email: bool,
    recipient_email: Option<String>,
    enable_email: bool,
}
