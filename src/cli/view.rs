use crate::cli::app::{AppState, Focus, NoticeKind, SEARCHING_MESSAGE};
use crate::cli::markdown::render_markdown;
use crate::cli::theme::Theme;
use crate::config::ThemeToken;
use crate::email;
use crate::search::FormField;
use crate::search::form::{QUERY_PLACEHOLDER, RECIPIENT_PLACEHOLDER};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

const SIDEBAR_WIDTH: u16 = 34;
const SEARCH_PANEL_HEIGHT: u16 = 15;
const CARET: &str = "▏";

const FEATURES: [(&str, &str, &str); 3] = [
    ("🔍", "Smart Search", "AI-powered flight and hotel search"),
    ("⚡", "Real-time", "Live availability and pricing"),
    ("🌍", "Global Coverage", "Worldwide destinations"),
];

const KEY_HINTS: &str = "Enter search · Tab focus · Space toggle · F1-F4 examples · Ctrl-E email · Ctrl-D save email · Ctrl-P preview · Esc quit";

/// Screen areas, exposed so tests can read back one region at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRegions {
    pub header: Rect,
    pub sidebar: Rect,
    pub search: Rect,
    pub features: Rect,
    pub results: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> ScreenRegions {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(area);
    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(40)]).areas(body);
    let [top, results] =
        Layout::vertical([Constraint::Length(SEARCH_PANEL_HEIGHT), Constraint::Min(5)]).areas(main);
    let [search, features] =
        Layout::horizontal([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)]).areas(top);

    ScreenRegions {
        header,
        sidebar,
        search,
        features,
        results,
        footer,
    }
}

pub fn render<F>(frame: &mut Frame, app: &AppState<F>) {
    let regions = layout(frame.area());

    render_header(frame, &app.theme, regions.header);
    render_sidebar(frame, app, regions.sidebar);
    render_search(frame, app, regions.search);
    render_features(frame, &app.theme, regions.features);
    render_results(frame, app, regions.results);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            KEY_HINTS,
            app.theme.style(ThemeToken::Footer),
        )))
        .alignment(Alignment::Center),
        regions.footer,
    );
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
    let style = theme.style(ThemeToken::Header);
    let header = Paragraph::new(vec![
        Line::from("✈️ Smart Travel Assistant"),
        Line::from("Your AI-powered companion for finding the best flights and hotels"),
    ])
    .style(style)
    .alignment(Alignment::Center)
    .block(Block::default().style(style));
    frame.render_widget(header, area);
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, theme.style(ThemeToken::SectionTitle)))
}

fn render_sidebar<F>(frame: &mut Frame, app: &AppState<F>, area: Rect) {
    let theme = &app.theme;
    let title = |text: &'static str| Line::from(Span::styled(text, theme.style(ThemeToken::SectionTitle)));
    let mut lines = vec![title("📧 Email Features")];

    lines.push(checkbox_line(
        theme,
        app.form.email_enabled(),
        "Enable Email Functionality",
        app.focus == Focus::Field(FormField::EnableEmail),
    ));

    if app.form.email_enabled() {
        lines.push(label_line(
            theme,
            "📧 Recipient Email",
            app.focus == Focus::Field(FormField::Recipient),
        ));
        lines.push(input_line(
            theme,
            &app.form.recipient_email,
            RECIPIENT_PLACEHOLDER,
            app.focus == Focus::Field(FormField::Recipient),
        ));
        let delivery = app.credentials.email;
        let token = if delivery.is_configured() {
            ThemeToken::StatusOk
        } else {
            ThemeToken::Info
        };
        lines.push(Line::from(Span::styled(delivery.label(), theme.style(token))));
    }

    lines.push(Line::default());
    lines.push(title("🔑 API Status"));
    for api in &app.credentials.apis {
        let token = if api.present {
            ThemeToken::StatusOk
        } else {
            ThemeToken::StatusMissing
        };
        lines.push(Line::from(Span::styled(api.label(), theme.style(token))));
    }

    let recent = app.session.recent_searches();
    if !recent.is_empty() {
        lines.push(Line::default());
        lines.push(title("📋 Recent Searches"));
        for entry in recent {
            lines.push(Line::from(Span::styled(
                format!("▸ Search {}", entry.number),
                theme.style(ThemeToken::Label),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {}", entry.preview.replace('\n', " ")),
                theme.style(ThemeToken::Footer),
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("🔧 Configuration", theme)),
        area,
    );
}

fn render_search<F>(frame: &mut Frame, app: &AppState<F>, area: Rect) {
    let theme = &app.theme;
    let block = panel("🔍 Travel Search", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [examples, query, options, button, notices] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(5),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    let example_keys = (1..=4)
        .map(|n| format!("[F{n}]"))
        .collect::<Vec<_>>()
        .join(" ")
        + " load an example";
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "💡 Try these example searches:",
                theme.style(ThemeToken::Label),
            )),
            Line::from(Span::styled(example_keys, theme.style(ThemeToken::Info))),
        ]),
        examples,
    );

    let query_focused = app.focus == Focus::Field(FormField::Query);
    let query_title_token = if query_focused {
        ThemeToken::FocusedLabel
    } else {
        ThemeToken::Label
    };
    let query_lines = if app.form.query.is_empty() && !query_focused {
        vec![Line::from(Span::styled(
            QUERY_PLACEHOLDER,
            theme.style(ThemeToken::Placeholder),
        ))]
    } else {
        let mut text = app.form.query.clone();
        if query_focused {
            text.push_str(CARET);
        }
        text.lines()
            .map(|line| Line::from(Span::styled(line.to_string(), theme.style(ThemeToken::Input))))
            .collect()
    };
    frame.render_widget(
        Paragraph::new(query_lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        "✍️ Describe your travel needs:",
                        theme.style(query_title_token),
                    )),
            ),
        query,
    );

    // Send-email sits on its own row under the search options.
    let mut search_spans = checkbox_line(
        theme,
        app.form.search_flights,
        "✈️ Search Flights",
        app.focus == Focus::Field(FormField::SearchFlights),
    )
    .spans;
    search_spans.push(Span::raw("   "));
    search_spans.extend(
        checkbox_line(
            theme,
            app.form.search_hotels,
            "🏨 Search Hotels",
            app.focus == Focus::Field(FormField::SearchHotels),
        )
        .spans,
    );
    let mut option_lines = vec![Line::from(search_spans)];
    if app.form.email_enabled() {
        option_lines.push(checkbox_line(
            theme,
            app.form.send_email(),
            "📧 Email Results",
            app.focus == Focus::Field(FormField::SendEmail),
        ));
    }
    frame.render_widget(Paragraph::new(option_lines), options);

    let button_token = if app.focus == Focus::SearchButton {
        ThemeToken::FocusedButton
    } else {
        ThemeToken::Button
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " 🚀 Search Travel Options ",
            theme.style(button_token),
        )))
        .alignment(Alignment::Center),
        button,
    );

    let mut notice_lines = Vec::new();
    if app.busy {
        notice_lines.push(Line::from(Span::styled(
            SEARCHING_MESSAGE,
            theme.style(ThemeToken::Spinner),
        )));
    }
    for notice in &app.notices {
        let (prefix, token) = match notice.kind {
            NoticeKind::Error => ("⚠ ", ThemeToken::Error),
            NoticeKind::Info => ("• ", ThemeToken::Info),
            NoticeKind::Success => ("✔ ", ThemeToken::StatusOk),
        };
        notice_lines.push(Line::from(Span::styled(
            format!("{prefix}{}", notice.text),
            theme.style(token),
        )));
    }
    frame.render_widget(
        Paragraph::new(notice_lines).wrap(Wrap { trim: false }),
        notices,
    );
}

fn render_features(frame: &mut Frame, theme: &Theme, area: Rect) {
    let mut lines = Vec::new();
    for (icon, title, description) in FEATURES {
        lines.push(Line::from(Span::styled(
            format!("{icon} {title}"),
            theme.style(ThemeToken::SectionTitle),
        )));
        lines.push(Line::from(Span::styled(
            description,
            theme.style(ThemeToken::Footer),
        )));
        lines.push(Line::default());
    }
    lines.pop();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("🌟 Features", theme)),
        area,
    );
}

fn render_results<F>(frame: &mut Frame, app: &AppState<F>, area: Rect) {
    let theme = &app.theme;
    let lines = match app.session.last_result() {
        Some(outcome) => {
            let mut lines = render_markdown(&outcome.response, theme);
            if let Some(html) = outcome.email_html() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "📧 Email Content",
                    theme.style(ThemeToken::SectionTitle),
                )));
                let (status, token) = if outcome.email_was_sent() {
                    ("✅ Email sent successfully!", ThemeToken::StatusOk)
                } else {
                    ("📁 Email content prepared (saved as HTML file)", ThemeToken::Info)
                };
                lines.push(Line::from(Span::styled(status, theme.style(token))));
                lines.push(Line::from(Span::styled(
                    "💾 Ctrl-D download email HTML · 👀 Ctrl-P preview email content",
                    theme.style(ThemeToken::Footer),
                )));
                if app.show_email_preview {
                    lines.push(Line::default());
                    lines.extend(
                        email::preview_text(html)
                            .lines()
                            .map(|line| Line::from(line.to_string())),
                    );
                }
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Describe your trip above and press Enter to search.",
            theme.style(ThemeToken::Footer),
        ))],
    };

    frame.render_widget(
        Paragraph::new(lines)
            .style(theme.style(ThemeToken::ResultText))
            .wrap(Wrap { trim: false })
            .scroll((app.result_scroll, 0))
            .block(panel("📋 Search Results", theme)),
        area,
    );
}

fn checkbox_line(theme: &Theme, checked: bool, label: &str, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let token = if focused {
        ThemeToken::FocusedLabel
    } else {
        ThemeToken::Label
    };
    Line::from(Span::styled(format!("{mark} {label}"), theme.style(token)))
}

fn label_line(theme: &Theme, label: &'static str, focused: bool) -> Line<'static> {
    let token = if focused {
        ThemeToken::FocusedLabel
    } else {
        ThemeToken::Label
    };
    Line::from(Span::styled(label, theme.style(token)))
}

fn input_line(theme: &Theme, value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    if value.is_empty() && !focused {
        return Line::from(Span::styled(
            placeholder.to_string(),
            theme.style(ThemeToken::Placeholder),
        ));
    }

    let caret = if focused { CARET } else { "" };
    Line::from(Span::styled(
        format!("{value}{caret}"),
        theme.style(ThemeToken::Input),
    ))
}
