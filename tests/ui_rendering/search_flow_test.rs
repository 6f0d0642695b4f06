use anyhow::Result;
use crossterm::event::KeyCode;
use travel_assistant::agent::SearchOutcome;
use travel_assistant::cli::NoticeKind;
use travel_assistant::search::EXAMPLE_SEARCHES;

use crate::common::{
    new_harness, press, press_ctrl, results_text, search_text, sidebar_text, submit_query,
};

#[tokio::test]
async fn empty_query_is_rejected_without_calling_the_agent() -> Result<()> {
    let mut harness = new_harness()?;

    press(&mut harness, KeyCode::Enter).await?;

    assert!(search_text(&harness).contains("Please enter your travel requirements"));
    assert!(harness.agents.calls().is_empty());
    assert!(harness.app.session.history().is_empty());
    Ok(())
}

#[tokio::test]
async fn unchecking_both_options_is_rejected() -> Result<()> {
    let mut harness = new_harness()?;
    crate::common::type_text(&mut harness, "Lisbon in May").await?;

    press(&mut harness, KeyCode::Tab).await?;
    press(&mut harness, KeyCode::Char(' ')).await?;
    press(&mut harness, KeyCode::Tab).await?;
    press(&mut harness, KeyCode::Char(' ')).await?;
    assert!(!harness.app.form.search_flights);
    assert!(!harness.app.form.search_hotels);

    press(&mut harness, KeyCode::Enter).await?;

    assert!(search_text(&harness).contains("Please select at least one search option"));
    assert!(harness.agents.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn successful_search_renders_markdown_and_records_history() -> Result<()> {
    let mut harness = new_harness()?;
    harness.agents.push_reply(Ok(SearchOutcome::text(
        "## Flights\n\n- AF 007 departs 10:00\n- BA 304 departs 13:15",
    )));

    submit_query(&mut harness, "Paris trip").await?;

    let calls = harness.agents.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].enable_email);
    assert_eq!(calls[0].request.query, "Paris trip");
    assert!(!calls[0].request.send_email);
    assert_eq!(calls[0].request.recipient_email, None);

    let results = results_text(&harness);
    assert!(results.contains("Flights"));
    assert!(results.contains("AF 007 departs 10:00"));
    assert!(results.contains("BA 304 departs 13:15"));
    assert!(!results.contains("##"));

    let sidebar = sidebar_text(&harness);
    assert!(sidebar.contains("Recent Searches"));
    assert!(sidebar.contains("Search 1"));
    assert!(sidebar.contains("Paris trip"));
    assert!(!harness.app.busy);
    Ok(())
}

#[tokio::test]
async fn failed_search_reports_error_and_keeps_previous_result() -> Result<()> {
    let mut harness = new_harness()?;
    harness
        .agents
        .push_reply(Ok(SearchOutcome::text("Hotel Miramar has rooms")));

    submit_query(&mut harness, "Rome").await?;
    submit_query(&mut harness, " again").await?;

    let notices: Vec<_> = harness
        .app
        .notices
        .iter()
        .map(|notice| (notice.kind, notice.text.as_str()))
        .collect();
    assert_eq!(
        notices,
        vec![
            (
                NoticeKind::Error,
                "An error occurred during search: travel agent transport error: no scripted reply"
            ),
            (
                NoticeKind::Error,
                "Please check your API keys and internet connection"
            ),
        ]
    );
    assert!(search_text(&harness).contains("An error occurred during search"));
    assert!(results_text(&harness).contains("Hotel Miramar has rooms"));
    assert_eq!(harness.app.session.history(), ["Rome", "Rome again"]);

    let sidebar = sidebar_text(&harness);
    assert!(sidebar.contains("Search 2"));
    assert!(sidebar.contains("Search 1"));
    Ok(())
}

#[tokio::test]
async fn recent_searches_keep_only_the_last_five() -> Result<()> {
    let mut harness = new_harness()?;
    for n in 1..=6 {
        harness
            .agents
            .push_reply(Ok(SearchOutcome::text(format!("result {n}"))));
        harness.app.form.query.clear();
        submit_query(&mut harness, &format!("trip {n}")).await?;
    }

    let sidebar = sidebar_text(&harness);
    assert!(sidebar.contains("Search 6"));
    assert!(sidebar.contains("Search 2"));
    assert!(!sidebar.contains("Search 1"));
    assert!(results_text(&harness).contains("result 6"));
    Ok(())
}

#[tokio::test]
async fn function_keys_load_examples_and_ctrl_c_quits() -> Result<()> {
    let mut harness = new_harness()?;

    press(&mut harness, KeyCode::F(3)).await?;
    assert_eq!(harness.app.form.query, EXAMPLE_SEARCHES[2]);
    assert!(search_text(&harness).contains("Find 4-star hotels in Barcelona"));

    press(&mut harness, KeyCode::F(1)).await?;
    assert_eq!(harness.app.form.query, EXAMPLE_SEARCHES[0]);

    assert!(press_ctrl(&mut harness, 'c').await?);
    Ok(())
}
