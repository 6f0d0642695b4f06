use anyhow::{Context, Result, anyhow, bail};
use reqwest::header::HeaderMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

const TRACE_SUBDIR: [&str; 2] = ["travel-assistant", "traces"];
const KIND_WIDTH: usize = 10;

/// Category shown in the second bracket of every trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Session,
    Query,
    Invalid,
    Result,
    Email,
    SearchError,
    Download,
    HttpOut,
    HttpIn,
    HttpError,
}

impl TraceKind {
    fn label(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Query => "query",
            Self::Invalid => "invalid",
            Self::Result => "result",
            Self::Email => "email",
            Self::SearchError => "search.err",
            Self::Download => "download",
            Self::HttpOut => "http.out",
            Self::HttpIn => "http.in",
            Self::HttpError => "http.err",
        }
    }
}

/// Append-only record of one run: what was searched, what came back, and the
/// raw agent traffic. Cheap to clone; all clones share one file.
///
/// Write failures are reported once on stderr and otherwise ignored so the
/// UI keeps running.
#[derive(Clone)]
pub struct SessionTrace {
    shared: Arc<TraceFile>,
}

struct TraceFile {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    warned: AtomicBool,
}

impl SessionTrace {
    pub fn create(session_id: &str) -> Result<Self> {
        let dir = default_trace_dir(std::env::var("XDG_STATE_HOME").ok().as_deref(), dirs::home_dir())?;
        Self::create_in_dir(session_id, &dir)
    }

    pub fn create_in_dir(session_id: &str, dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create trace directory {}", dir.display()))?;

        let path = dir.join(format!("session-{session_id}.log"));
        let file = open_private(&path)
            .with_context(|| format!("Failed to create trace file {}", path.display()))?;

        Ok(Self {
            shared: Arc::new(TraceFile {
                path,
                writer: Mutex::new(BufWriter::new(file)),
                warned: AtomicBool::new(false),
            }),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.shared.path
    }

    pub fn log_session_start(&self, agent_url: &str, config_path: &Path) {
        self.record(
            TraceKind::Session,
            &format!("agent={agent_url} config={}", config_path.display()),
        );
    }

    pub fn log_query(&self, query: &str) {
        self.record(TraceKind::Query, query);
    }

    pub fn log_validation_error(&self, message: &str) {
        self.record(TraceKind::Invalid, message);
    }

    pub fn log_result(&self, response: &str, email_attached: bool, email_sent: bool) {
        self.record(TraceKind::Result, response);
        if email_attached {
            let status = if email_sent { "sent" } else { "prepared" };
            self.record(TraceKind::Email, status);
        }
    }

    pub fn log_search_error(&self, message: &str) {
        self.record(TraceKind::SearchError, message);
    }

    pub fn log_download(&self, saved_to: &Path) {
        self.record(TraceKind::Download, &saved_to.display().to_string());
    }

    /// One side of an agent exchange: a head line, then headers, then body.
    pub fn log_http(&self, kind: TraceKind, head: &str, headers: &HeaderMap, body: &str) {
        let mut text = String::from(head);
        for (name, value) in headers {
            let value = value.to_str().unwrap_or("<non-utf8>");
            text.push_str(&format!("\n{name}: {value}"));
        }
        text.push('\n');
        text.push_str(if body.is_empty() { "<empty>" } else { body });
        self.record(kind, &text);
    }

    pub fn log_http_error(&self, message: &str) {
        self.record(TraceKind::HttpError, message);
    }

    /// Writes one timestamped line per line of `text`.
    fn record(&self, kind: TraceKind, text: &str) {
        let stamp = timestamp(OffsetDateTime::now_utc());
        let label = kind.label();
        let mut chunk = String::new();
        let mut lines = text.lines().peekable();
        if lines.peek().is_none() {
            chunk.push_str(&format!("[{stamp}] [{label:<KIND_WIDTH$}] <empty>\n"));
        }
        for line in lines {
            chunk.push_str(&format!("[{stamp}] [{label:<KIND_WIDTH$}] {line}\n"));
        }
        self.append(&chunk);
    }

    fn append(&self, chunk: &str) {
        let written = self.shared.writer.lock().is_ok_and(|mut writer| {
            writer.write_all(chunk.as_bytes()).is_ok() && writer.flush().is_ok()
        });
        if !written && !self.shared.warned.swap(true, Ordering::Relaxed) {
            eprintln!(
                "travel-assistant: unable to write session trace {}",
                self.shared.path.display()
            );
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
}

fn timestamp(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.millisecond()
    )
}

fn default_trace_dir(xdg_state_home: Option<&str>, home: Option<PathBuf>) -> Result<PathBuf> {
    let base = match xdg_state_home {
        Some(xdg) if xdg.trim().is_empty() => {
            bail!("Failed to resolve trace path: XDG_STATE_HOME is set but empty")
        }
        Some(xdg) => PathBuf::from(xdg.trim()),
        None => home
            .ok_or_else(|| anyhow!("Failed to resolve trace path: HOME directory is unavailable"))?
            .join(".local")
            .join("state"),
    };
    Ok(TRACE_SUBDIR.iter().fold(base, |dir, part| dir.join(part)))
}
