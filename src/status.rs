use crate::config::env_non_empty;

/// How the agent will deliver an emailed summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailDelivery {
    SendGrid,
    Smtp,
    HtmlFile,
}

impl EmailDelivery {
    pub fn label(self) -> &'static str {
        match self {
            Self::SendGrid => "✅ SendGrid configured",
            Self::Smtp => "✅ SMTP configured",
            Self::HtmlFile => "📁 Email will be saved as HTML file",
        }
    }

    pub fn is_configured(self) -> bool {
        !matches!(self, Self::HtmlFile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiStatus {
    pub name: &'static str,
    pub present: bool,
}

impl ApiStatus {
    pub fn label(&self) -> String {
        if self.present {
            format!("✅ {}", self.name)
        } else {
            format!("❌ {} - Please add to .env file", self.name)
        }
    }
}

const API_KEYS: [(&str, &str); 2] = [("OpenAI", "OPENAI_API_KEY"), ("SerpAPI", "SERPAPI_API_KEY")];
const SMTP_KEYS: [&str; 3] = ["SMTP_SERVER", "SMTP_USERNAME", "SMTP_PASSWORD"];

/// Presence of the agent's credentials. Values are never read beyond
/// "set and non-blank".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStatus {
    pub apis: Vec<ApiStatus>,
    pub email: EmailDelivery,
}

impl CredentialStatus {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env_non_empty(key).is_some())
    }

    pub fn from_lookup(is_set: impl Fn(&str) -> bool) -> Self {
        let apis = API_KEYS
            .iter()
            .map(|&(name, key)| ApiStatus {
                name,
                present: is_set(key),
            })
            .collect();

        let email = if is_set("SENDGRID_API_KEY") {
            EmailDelivery::SendGrid
        } else if SMTP_KEYS.iter().all(|key| is_set(key)) {
            EmailDelivery::Smtp
        } else {
            EmailDelivery::HtmlFile
        };

        Self { apis, email }
    }
}
