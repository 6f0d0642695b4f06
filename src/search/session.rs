use crate::agent::SearchOutcome;

pub const RECENT_SEARCH_LIMIT: usize = 5;
const PREVIEW_CHARS: usize = 100;

/// One row of the "Recent Searches" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSearch {
    pub number: usize,
    pub preview: String,
}

/// Per-process state: lost when the app exits.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    last_result: Option<SearchOutcome>,
    history: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_query(&mut self, query: &str) {
        self.history.push(query.to_string());
    }

    pub fn store_result(&mut self, outcome: SearchOutcome) {
        self.last_result = Some(outcome);
    }

    pub fn last_result(&self) -> Option<&SearchOutcome> {
        self.last_result.as_ref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The newest entries first, numbered by their position in the full history.
    pub fn recent_searches(&self) -> Vec<RecentSearch> {
        let start = self.history.len().saturating_sub(RECENT_SEARCH_LIMIT);
        self.history[start..]
            .iter()
            .enumerate()
            .rev()
            .map(|(offset, query)| RecentSearch {
                number: start + offset + 1,
                preview: preview(query),
            })
            .collect()
    }
}

fn preview(query: &str) -> String {
    if query.chars().count() <= PREVIEW_CHARS {
        return query.to_string();
    }

    let head = query.chars().take(PREVIEW_CHARS).collect::<String>();
    format!("{head}...")
}
