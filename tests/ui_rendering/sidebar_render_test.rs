use anyhow::Result;

use crate::common::{harness_with_all_credentials, new_harness, sidebar_text};

#[tokio::test]
async fn missing_credentials_point_at_the_env_file() -> Result<()> {
    let harness = new_harness()?;
    let sidebar = sidebar_text(&harness);

    assert!(sidebar.contains("Configuration"));
    assert!(sidebar.contains("API Status"));
    assert!(sidebar.contains("OpenAI - Please add to .env"));
    assert!(sidebar.contains("SerpAPI - Please add to .env"));
    assert!(!sidebar.contains("Recent Searches"));
    Ok(())
}

#[tokio::test]
async fn configured_credentials_are_listed_plainly() -> Result<()> {
    let mut harness = harness_with_all_credentials()?;
    harness.app.form.set_email_enabled(true);
    harness.render()?;
    let sidebar = sidebar_text(&harness);

    assert!(sidebar.contains("OpenAI"));
    assert!(sidebar.contains("SerpAPI"));
    assert!(!sidebar.contains("Please add to .env"));
    assert!(sidebar.contains("SendGrid configured"));
    Ok(())
}

#[tokio::test]
async fn page_chrome_shows_title_features_and_key_hints() -> Result<()> {
    let harness = new_harness()?;
    let regions = harness.regions();

    assert!(harness.region_text(regions.header).contains("Smart Travel Assistant"));
    let features = harness.region_text(regions.features);
    assert!(features.contains("Smart Search"));
    assert!(features.contains("Global Coverage"));
    assert!(harness.region_text(regions.footer).contains("Esc quit"));
    assert!(
        harness
            .region_text(regions.results)
            .contains("press Enter to search")
    );
    Ok(())
}
