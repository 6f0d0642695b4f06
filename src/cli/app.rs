use crate::agent::{AgentFactory, SearchOutcome, SearchRequest, TravelAgent};
use crate::cli::theme::Theme;
use crate::email;
use crate::search::{FormField, SearchForm, SessionState};
use crate::status::CredentialStatus;
use crate::trace::SessionTrace;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use time::OffsetDateTime;

pub(crate) const SEARCHING_MESSAGE: &str = "🔍 Searching for the best travel options...";
pub(crate) const CONNECTIVITY_HINT: &str = "Please check your API keys and internet connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    SearchButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// What the event loop must do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Search(SearchRequest),
}

pub struct AppState<F> {
    pub form: SearchForm,
    pub session: SessionState,
    pub credentials: CredentialStatus,
    pub theme: Theme,
    pub focus: Focus,
    pub notices: Vec<Notice>,
    pub busy: bool,
    pub show_email_preview: bool,
    pub result_scroll: u16,
    pub download_dir: PathBuf,
    pub trace: Option<SessionTrace>,
    agents: F,
}

impl<F: AgentFactory> AppState<F> {
    pub fn new(
        agents: F,
        form: SearchForm,
        credentials: CredentialStatus,
        theme: Theme,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            form,
            session: SessionState::new(),
            credentials,
            theme,
            focus: Focus::Field(FormField::Query),
            notices: Vec::new(),
            busy: false,
            show_email_preview: false,
            result_scroll: 0,
            download_dir,
            trace: None,
            agents,
        }
    }

    pub fn with_trace(mut self, trace: SessionTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('e') if ctrl => self.toggle_email(),
            KeyCode::Char('d') if ctrl => self.download_email(),
            KeyCode::Char('p') if ctrl => self.show_email_preview = !self.show_email_preview,
            KeyCode::Char('j') if ctrl => self.insert_newline(),
            KeyCode::Tab => self.move_focus(1),
            KeyCode::BackTab => self.move_focus(-1),
            KeyCode::F(n @ 1..=4) => self.load_example(usize::from(n - 1)),
            KeyCode::PageDown => self.result_scroll = self.result_scroll.saturating_add(5),
            KeyCode::PageUp => self.result_scroll = self.result_scroll.saturating_sub(5),
            KeyCode::Enter => return self.begin_search(),
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(' ') if !self.focus_is_text() => return self.activate_focused(),
            KeyCode::Char(ch) if !ctrl => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(ch);
                }
            }
            _ => {}
        }

        Action::None
    }

    /// Validates the form and, when it passes, records the query and marks
    /// the app busy. The caller then awaits [`AppState::run_search`].
    pub fn begin_search(&mut self) -> Action {
        if self.busy {
            return Action::None;
        }

        self.notices.clear();
        match self.form.validate() {
            Ok(request) => {
                self.session.record_query(&request.query);
                if let Some(trace) = &self.trace {
                    trace.log_query(&request.query);
                }
                self.busy = true;
                Action::Search(request)
            }
            Err(err) => {
                if let Some(trace) = &self.trace {
                    trace.log_validation_error(&err.to_string());
                }
                self.notices.push(Notice::new(NoticeKind::Error, err.to_string()));
                Action::None
            }
        }
    }

    /// The agent is built per search so it sees the current email toggle.
    pub async fn run_search(&mut self, request: SearchRequest) {
        let agent = self.agents.create(self.form.email_enabled());
        let result = agent.search_travel(request).await;
        self.busy = false;

        match result {
            Ok(outcome) => self.store_outcome(outcome),
            Err(err) => {
                let message = format!("An error occurred during search: {err}");
                if let Some(trace) = &self.trace {
                    trace.log_search_error(&message);
                }
                self.notices.push(Notice::new(NoticeKind::Error, message));
                self.notices
                    .push(Notice::new(NoticeKind::Error, CONNECTIVITY_HINT));
            }
        }
    }

    fn store_outcome(&mut self, outcome: SearchOutcome) {
        if let Some(trace) = &self.trace {
            trace.log_result(
                &outcome.response,
                outcome.email_html().is_some(),
                outcome.email_was_sent(),
            );
        }
        self.session.store_result(outcome);
        self.result_scroll = 0;
        self.show_email_preview = false;
    }

    fn toggle_email(&mut self) {
        self.form.set_email_enabled(!self.form.email_enabled());
        if let Focus::Field(field) = self.focus
            && !self.form.visible_fields().contains(&field)
        {
            self.focus = Focus::Field(FormField::EnableEmail);
        }
    }

    fn activate_focused(&mut self) -> Action {
        match self.focus {
            Focus::Field(FormField::EnableEmail) => self.toggle_email(),
            Focus::Field(FormField::SearchFlights) => {
                self.form.search_flights = !self.form.search_flights;
            }
            Focus::Field(FormField::SearchHotels) => {
                self.form.search_hotels = !self.form.search_hotels;
            }
            Focus::Field(FormField::SendEmail) => {
                let send = !self.form.send_email();
                self.form.set_send_email(send);
            }
            Focus::SearchButton => return self.begin_search(),
            Focus::Field(FormField::Query | FormField::Recipient) => {}
        }
        Action::None
    }

    fn focus_order(&self) -> Vec<Focus> {
        self.form
            .visible_fields()
            .into_iter()
            .map(Focus::Field)
            .chain(std::iter::once(Focus::SearchButton))
            .collect()
    }

    fn move_focus(&mut self, step: isize) {
        let order = self.focus_order();
        let current = order
            .iter()
            .position(|focus| *focus == self.focus)
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(order.len() as isize) as usize;
        self.focus = order[next];
    }

    fn focus_is_text(&self) -> bool {
        matches!(
            self.focus,
            Focus::Field(FormField::Query | FormField::Recipient)
        )
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Field(FormField::Query) => Some(&mut self.form.query),
            Focus::Field(FormField::Recipient) => Some(&mut self.form.recipient_email),
            _ => None,
        }
    }

    fn insert_newline(&mut self) {
        if self.focus == Focus::Field(FormField::Query) {
            self.form.query.push('\n');
        }
    }

    fn load_example(&mut self, index: usize) {
        if self.form.apply_example(index) {
            self.focus = Focus::Field(FormField::Query);
        }
    }

    fn download_email(&mut self) {
        let Some(html) = self
            .session
            .last_result()
            .and_then(SearchOutcome::email_html)
        else {
            self.notices.push(Notice::new(
                NoticeKind::Info,
                "No email content to download yet",
            ));
            return;
        };

        match email::save_email_html(&self.download_dir, html, OffsetDateTime::now_utc()) {
            Ok(path) => {
                let message = format!("💾 Email HTML saved to {}", path.display());
                if let Some(trace) = &self.trace {
                    trace.log_download(&path);
                }
                self.notices.push(Notice::new(NoticeKind::Success, message));
            }
            Err(err) => self
                .notices
                .push(Notice::new(NoticeKind::Error, err.to_string())),
        }
    }
}
