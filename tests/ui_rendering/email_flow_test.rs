use anyhow::Result;
use crossterm::event::KeyCode;
use std::fs;
use tempfile::TempDir;
use travel_assistant::agent::SearchOutcome;
use travel_assistant::cli::test_support::UiHarness;
use travel_assistant::cli::{Focus, NoticeKind};
use travel_assistant::search::FormField;

use crate::common::{
    new_harness, press, press_ctrl, press_times, results_text, search_text, sidebar_text,
    type_text,
};

const EMAIL_HTML: &str = "<h1>Your Trip</h1><p>Two flights and one hotel found.</p>";

fn emailed_outcome(sent: bool) -> SearchOutcome {
    SearchOutcome {
        response: "Found 2 options".to_string(),
        email_content: Some(EMAIL_HTML.to_string()),
        email_sent: Some(sent),
    }
}

#[tokio::test]
async fn email_search_requires_recipient_then_reports_sent() -> Result<()> {
    let mut harness = new_harness()?;
    harness.agents.push_reply(Ok(emailed_outcome(true)));

    press_ctrl(&mut harness, 'e').await?;
    assert!(harness.app.form.email_enabled());
    type_text(&mut harness, "Oslo weekend").await?;

    press_times(&mut harness, KeyCode::Tab, 3).await?;
    assert_eq!(harness.app.focus, Focus::Field(FormField::SendEmail));
    press(&mut harness, KeyCode::Char(' ')).await?;
    press(&mut harness, KeyCode::Enter).await?;
    assert!(search_text(&harness).contains("Please enter recipient email address"));
    assert!(harness.agents.calls().is_empty());

    press_times(&mut harness, KeyCode::BackTab, 4).await?;
    assert_eq!(harness.app.focus, Focus::Field(FormField::Recipient));
    type_text(&mut harness, "me@example.com").await?;
    press(&mut harness, KeyCode::Enter).await?;

    let calls = harness.agents.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].enable_email);
    assert!(calls[0].request.send_email);
    assert_eq!(
        calls[0].request.recipient_email.as_deref(),
        Some("me@example.com")
    );

    let results = results_text(&harness);
    assert!(results.contains("Found 2 options"));
    assert!(results.contains("Email Content"));
    assert!(results.contains("Email sent successfully!"));
    assert!(!results.contains("Two flights and one hotel found."));

    press_ctrl(&mut harness, 'p').await?;
    assert!(results_text(&harness).contains("Two flights and one hotel found."));
    Ok(())
}

#[tokio::test]
async fn unsent_email_is_reported_as_prepared() -> Result<()> {
    let mut harness = new_harness()?;
    harness.agents.push_reply(Ok(emailed_outcome(false)));

    press_ctrl(&mut harness, 'e').await?;
    type_text(&mut harness, "Berlin").await?;
    press(&mut harness, KeyCode::Enter).await?;

    let results = results_text(&harness);
    assert!(results.contains("Email content prepared (saved as HTML file)"));
    assert!(!results.contains("Email sent successfully!"));
    Ok(())
}

#[tokio::test]
async fn disabling_email_hides_fields_and_moves_focus() -> Result<()> {
    let mut harness = new_harness()?;

    press_ctrl(&mut harness, 'e').await?;
    let sidebar = sidebar_text(&harness);
    assert!(sidebar.contains("Recipient Email"));
    assert!(sidebar.contains("your-email@example.com"));
    assert!(sidebar.contains("Email will be saved as HTML"));
    assert!(search_text(&harness).contains("Email Results"));

    press(&mut harness, KeyCode::BackTab).await?;
    assert_eq!(harness.app.focus, Focus::Field(FormField::Recipient));
    press_ctrl(&mut harness, 'e').await?;

    assert!(!harness.app.form.email_enabled());
    assert_eq!(harness.app.focus, Focus::Field(FormField::EnableEmail));
    assert!(!sidebar_text(&harness).contains("Recipient Email"));
    assert!(!search_text(&harness).contains("Email Results"));
    Ok(())
}

fn email_checkbox_row(harness: &UiHarness) -> Option<String> {
    search_text(harness)
        .lines()
        .find(|line| line.contains("Email Results"))
        .map(ToOwned::to_owned)
}

#[tokio::test]
async fn send_email_checkbox_is_fully_visible_with_its_state() -> Result<()> {
    let mut harness = new_harness()?;
    assert_eq!(email_checkbox_row(&harness), None);

    press_ctrl(&mut harness, 'e').await?;
    let row = email_checkbox_row(&harness).expect("email checkbox row");
    assert!(row.contains("[ ]"), "unchecked row: {row}");
    assert!(!row.contains("Search Flights"));

    press_times(&mut harness, KeyCode::Tab, 3).await?;
    assert_eq!(harness.app.focus, Focus::Field(FormField::SendEmail));
    press(&mut harness, KeyCode::Char(' ')).await?;
    let row = email_checkbox_row(&harness).expect("email checkbox row");
    assert!(row.contains("[x]"), "checked row: {row}");

    let search = search_text(&harness);
    assert!(search.contains("Search Flights"));
    assert!(search.contains("Search Hotels"));
    assert!(search.contains("[F1] [F2] [F3] [F4] load an example"));
    Ok(())
}

#[tokio::test]
async fn download_writes_email_html_to_configured_dir() -> Result<()> {
    let download_dir = TempDir::new()?;
    let mut harness = new_harness()?;
    harness.app.download_dir = download_dir.path().to_path_buf();

    press_ctrl(&mut harness, 'd').await?;
    assert_eq!(
        harness.app.notices.last().map(|notice| notice.text.as_str()),
        Some("No email content to download yet")
    );

    harness.agents.push_reply(Ok(emailed_outcome(false)));
    press_ctrl(&mut harness, 'e').await?;
    type_text(&mut harness, "Vienna").await?;
    press(&mut harness, KeyCode::Enter).await?;
    press_ctrl(&mut harness, 'd').await?;

    let notice = harness.app.notices.last().expect("download notice");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.text.contains("Email HTML saved to"));

    let saved: Vec<_> = fs::read_dir(download_dir.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    assert_eq!(saved.len(), 1);
    let name = saved[0]
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    assert!(name.starts_with("travel_results_"));
    assert!(name.ends_with(".html"));
    assert_eq!(fs::read_to_string(&saved[0])?, EMAIL_HTML);
    Ok(())
}
