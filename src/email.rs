use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

const PREVIEW_WIDTH: usize = 80;

/// `travel_results_YYYYMMDD_HHMMSS.html` for the given instant.
pub fn download_file_name(at: OffsetDateTime) -> String {
    format!(
        "travel_results_{:04}{:02}{:02}_{:02}{:02}{:02}.html",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

pub fn save_email_html(dir: &Path, html: &str, at: OffsetDateTime) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|err| {
        anyhow!(
            "Failed to save email HTML: unable to create {}: {err}",
            dir.display()
        )
    })?;

    let path = dir.join(download_file_name(at));
    fs::write(&path, html)
        .map_err(|err| anyhow!("Failed to save email HTML to {}: {err}", path.display()))?;
    Ok(path)
}

/// Plain-text rendering of the email body for the in-terminal preview.
pub fn preview_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), PREVIEW_WIDTH)
        .unwrap_or_else(|err| format!("Unable to render email preview: {err}"))
}
