use crate::agent::AgentFactory;
use crate::cli::app::{Action, AppState};
use crate::cli::view;
use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Restores the terminal even when the loop bails out early.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw terminal mode")?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("Failed to enter the alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

pub async fn run_app<F: AgentFactory>(app: &mut AppState<F>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal: Terminal<CrosstermBackend<Stdout>> =
        Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    loop {
        draw(&mut terminal, app)?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => break,
            Action::Search(request) => {
                // Paint the spinner before blocking on the agent.
                draw(&mut terminal, app)?;
                app.run_search(request).await;
            }
        }
    }

    Ok(())
}

pub(crate) fn draw<B: Backend, F>(terminal: &mut Terminal<B>, app: &AppState<F>) -> Result<()> {
    terminal.draw(|frame| view::render(frame, app))?;
    Ok(())
}
