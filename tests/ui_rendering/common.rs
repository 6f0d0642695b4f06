use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use travel_assistant::cli::test_support::UiHarness;
use travel_assistant::status::CredentialStatus;

pub const WIDTH: u16 = 120;
pub const HEIGHT: u16 = 40;

pub fn new_harness() -> Result<UiHarness> {
    let mut harness = UiHarness::new(WIDTH, HEIGHT)?;
    harness.render()?;
    Ok(harness)
}

pub fn harness_with_all_credentials() -> Result<UiHarness> {
    let mut harness =
        UiHarness::with_credentials(WIDTH, HEIGHT, CredentialStatus::from_lookup(|_| true))?;
    harness.render()?;
    Ok(harness)
}

pub async fn press(harness: &mut UiHarness, code: KeyCode) -> Result<bool> {
    harness.send_key(KeyEvent::new(code, KeyModifiers::NONE)).await
}

pub async fn press_ctrl(harness: &mut UiHarness, ch: char) -> Result<bool> {
    harness
        .send_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
        .await
}

pub async fn type_text(harness: &mut UiHarness, text: &str) -> Result<()> {
    for ch in text.chars() {
        press(harness, KeyCode::Char(ch)).await?;
    }
    Ok(())
}

pub async fn press_times(harness: &mut UiHarness, code: KeyCode, times: usize) -> Result<()> {
    for _ in 0..times {
        press(harness, code).await?;
    }
    Ok(())
}

pub async fn submit_query(harness: &mut UiHarness, query: &str) -> Result<()> {
    type_text(harness, query).await?;
    press(harness, KeyCode::Enter).await?;
    Ok(())
}

pub fn sidebar_text(harness: &UiHarness) -> String {
    harness.region_text(harness.regions().sidebar)
}

pub fn search_text(harness: &UiHarness) -> String {
    harness.region_text(harness.regions().search)
}

pub fn results_text(harness: &UiHarness) -> String {
    harness.region_text(harness.regions().results)
}
