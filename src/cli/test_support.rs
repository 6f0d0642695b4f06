//! Headless driver for the full-screen UI, used by the integration tests.

use crate::agent::{AgentError, AgentResult, SearchOutcome, SearchRequest, TravelAgent};
use crate::cli::app::{Action, AppState};
use crate::cli::terminal::draw;
use crate::cli::theme::Theme;
use crate::cli::view::{self, ScreenRegions};
use crate::search::SearchForm;
use crate::status::CredentialStatus;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A recorded call to [`ScriptedAgent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCall {
    pub enable_email: bool,
    pub request: SearchRequest,
}

/// Replays queued replies in order; answers with an error once they run out.
#[derive(Clone, Default)]
pub struct ScriptedAgents {
    replies: Arc<Mutex<VecDeque<AgentResult<SearchOutcome>>>>,
    calls: Arc<Mutex<Vec<AgentCall>>>,
}

impl ScriptedAgents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: AgentResult<SearchOutcome>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn calls(&self) -> Vec<AgentCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn factory(&self) -> impl Fn(bool) -> ScriptedAgent + use<> {
        let shared = self.clone();
        move |enable_email| ScriptedAgent {
            enable_email,
            shared: shared.clone(),
        }
    }
}

pub struct ScriptedAgent {
    enable_email: bool,
    shared: ScriptedAgents,
}

impl TravelAgent for ScriptedAgent {
    async fn search_travel(&self, request: SearchRequest) -> AgentResult<SearchOutcome> {
        if let Ok(mut calls) = self.shared.calls.lock() {
            calls.push(AgentCall {
                enable_email: self.enable_email,
                request,
            });
        }

        self.shared
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(AgentError::Transport("no scripted reply".to_string())))
    }
}

pub type HarnessFactory = Box<dyn Fn(bool) -> ScriptedAgent + Send>;

pub struct UiHarness {
    terminal: Terminal<TestBackend>,
    pub app: AppState<HarnessFactory>,
    pub agents: ScriptedAgents,
}

impl UiHarness {
    /// Builds a monochrome app with no credentials configured.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Self::with_credentials(width, height, CredentialStatus::from_lookup(|_| false))
    }

    pub fn with_credentials(
        width: u16,
        height: u16,
        credentials: CredentialStatus,
    ) -> Result<Self> {
        let agents = ScriptedAgents::new();
        let factory: HarnessFactory = Box::new(agents.factory());
        let app = AppState::new(
            factory,
            SearchForm::default(),
            credentials,
            Theme::new(false),
            PathBuf::from("."),
        );
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        Ok(Self {
            terminal,
            app,
            agents,
        })
    }

    pub fn render(&mut self) -> Result<()> {
        draw(&mut self.terminal, &self.app)
    }

    /// Feeds one key through the app, running any search it triggers, and
    /// redraws. Returns whether the key asked to quit.
    pub async fn send_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.app.handle_key(key) {
            Action::None => {}
            Action::Quit => return Ok(true),
            Action::Search(request) => {
                self.render()?;
                self.app.run_search(request).await;
            }
        }
        self.render()?;
        Ok(false)
    }

    pub fn regions(&self) -> ScreenRegions {
        let size = self.terminal.backend().buffer().area;
        view::layout(size)
    }

    pub fn buffer_lines(&self) -> Vec<String> {
        let area = self.terminal.backend().buffer().area;
        self.region_lines(area)
    }

    /// Rows of one screen area, read cell by cell so wide glyphs don't
    /// shift the clip.
    pub fn region_lines(&self, area: Rect) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        let area = area.intersection(buffer.area);
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    pub fn region_text(&self, area: Rect) -> String {
        self.region_lines(area).join("\n")
    }
}
