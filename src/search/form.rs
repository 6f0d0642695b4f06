use crate::agent::SearchRequest;
use std::fmt::{Display, Formatter};

pub const EXAMPLE_SEARCHES: [&str; 4] = [
    "Find flights from New York to Paris from December 15-22, 2024",
    "I want to travel to Tokyo from London, 3 adults, January 5-12, 2025",
    "Find 4-star hotels in Barcelona for March 10-15, 2025, 2 adults, 1 child",
    "Round trip flights from Miami to Rome, 2 adults, February 14-21, 2025",
];

pub const QUERY_PLACEHOLDER: &str = "e.g., I want to travel from New York to London from December 1-10, 2024. Find me flights and 4-star hotels.";
pub const RECIPIENT_PLACEHOLDER: &str = "your-email@example.com";

/// Why a submission was refused before reaching the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyQuery,
    NoSearchOption,
    MissingRecipient,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EmptyQuery => "Please enter your travel requirements",
            Self::NoSearchOption => {
                "Please select at least one search option (Flights or Hotels)"
            }
            Self::MissingRecipient => "Please enter recipient email address",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    EnableEmail,
    Recipient,
    Query,
    SearchFlights,
    SearchHotels,
    SendEmail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub search_flights: bool,
    pub search_hotels: bool,
    pub recipient_email: String,
    email_enabled: bool,
    send_email: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SearchForm {
    pub fn new(email_enabled: bool) -> Self {
        Self {
            query: String::new(),
            search_flights: true,
            search_hotels: true,
            recipient_email: String::new(),
            email_enabled,
            send_email: false,
        }
    }

    pub fn email_enabled(&self) -> bool {
        self.email_enabled
    }

    pub fn send_email(&self) -> bool {
        self.email_enabled && self.send_email
    }

    /// Turning email off also clears the send-email choice, so re-enabling
    /// starts from "don't send".
    pub fn set_email_enabled(&mut self, enabled: bool) {
        self.email_enabled = enabled;
        if !enabled {
            self.send_email = false;
        }
    }

    /// Ignored while email is disabled.
    pub fn set_send_email(&mut self, send: bool) {
        self.send_email = self.email_enabled && send;
    }

    pub fn apply_example(&mut self, index: usize) -> bool {
        match EXAMPLE_SEARCHES.get(index) {
            Some(example) => {
                self.query = (*example).to_string();
                true
            }
            None => false,
        }
    }

    /// Fields in tab order; the email widgets only exist while email is on.
    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::EnableEmail];
        if self.email_enabled {
            fields.push(FormField::Recipient);
        }
        fields.extend([
            FormField::Query,
            FormField::SearchFlights,
            FormField::SearchHotels,
        ]);
        if self.email_enabled {
            fields.push(FormField::SendEmail);
        }
        fields
    }

    pub fn validate(&self) -> Result<SearchRequest, ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if !(self.search_flights || self.search_hotels) {
            return Err(ValidationError::NoSearchOption);
        }

        let recipient = self.recipient_email.trim();
        if self.send_email() && recipient.is_empty() {
            return Err(ValidationError::MissingRecipient);
        }

        Ok(SearchRequest {
            query: self.query.clone(),
            send_email: self.send_email(),
            recipient_email: (self.email_enabled && !recipient.is_empty())
                .then(|| recipient.to_string()),
        })
    }
}
