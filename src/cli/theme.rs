use crate::config::{
    HexColor, StyleOverride, ThemeConfig as UserThemeConfig, ThemeModifier, ThemePreset, ThemeToken,
};
use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Theme {
    enabled: bool,
    styles: HashMap<ThemeToken, Style>,
}

impl Theme {
    pub fn new(enabled: bool) -> Self {
        Self::from_config(enabled, &UserThemeConfig::default())
    }

    pub fn from_config(enabled: bool, config: &UserThemeConfig) -> Self {
        let mut styles: HashMap<ThemeToken, Style> = ThemeToken::ALL
            .iter()
            .map(|token| (*token, preset_style(config.preset, *token)))
            .collect();
        for (token, override_style) in &config.styles {
            let base = styles.get(token).copied().unwrap_or_default();
            styles.insert(*token, merge_style(base, override_style));
        }

        Self { enabled, styles }
    }

    pub fn style(&self, token: ThemeToken) -> Style {
        if !self.enabled {
            return disabled_style(token);
        }

        self.styles.get(&token).copied().unwrap_or_default()
    }
}

fn preset_style(preset: ThemePreset, token: ThemeToken) -> Style {
    let palette = match preset {
        ThemePreset::Default => &DEFAULT_PALETTE,
        ThemePreset::Light => &LIGHT_PALETTE,
        ThemePreset::HighContrast => &HIGH_CONTRAST_PALETTE,
    };

    let fg = |color: Color| Style::default().fg(color);
    match token {
        ThemeToken::Header => Style::default()
            .fg(palette.on_accent)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD),
        ThemeToken::SectionTitle => fg(palette.accent).add_modifier(Modifier::BOLD),
        ThemeToken::Label => fg(palette.text),
        ThemeToken::FocusedLabel => fg(palette.accent_alt).add_modifier(Modifier::BOLD),
        ThemeToken::Input => fg(palette.text).bg(palette.input_bg),
        ThemeToken::Placeholder => fg(palette.muted)
            .bg(palette.input_bg)
            .add_modifier(Modifier::ITALIC),
        ThemeToken::Button => fg(palette.on_accent).bg(palette.accent_alt),
        ThemeToken::FocusedButton => fg(palette.on_accent)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD),
        ThemeToken::StatusOk => fg(palette.ok),
        ThemeToken::StatusMissing | ThemeToken::Error => fg(palette.error).add_modifier(Modifier::BOLD),
        ThemeToken::Info => fg(palette.info),
        ThemeToken::ResultText => fg(palette.text),
        ThemeToken::ResultHeading => fg(palette.accent).add_modifier(Modifier::BOLD),
        ThemeToken::ResultCode => fg(palette.ok).bg(palette.input_bg),
        ThemeToken::Spinner => fg(palette.accent_alt).add_modifier(Modifier::BOLD),
        ThemeToken::Footer => fg(palette.muted),
    }
}

struct Palette {
    accent: Color,
    accent_alt: Color,
    on_accent: Color,
    text: Color,
    muted: Color,
    input_bg: Color,
    ok: Color,
    info: Color,
    error: Color,
}

// #667eea and #764ba2 are the brand gradient endpoints.
const DEFAULT_PALETTE: Palette = Palette {
    accent: Color::Rgb(102, 126, 234),
    accent_alt: Color::Rgb(118, 75, 162),
    on_accent: Color::White,
    text: Color::Rgb(220, 223, 235),
    muted: Color::Rgb(128, 128, 140),
    input_bg: Color::Rgb(28, 30, 40),
    ok: Color::Rgb(76, 175, 80),
    info: Color::Rgb(100, 181, 246),
    error: Color::Rgb(239, 83, 80),
};

const LIGHT_PALETTE: Palette = Palette {
    accent: Color::Rgb(63, 81, 181),
    accent_alt: Color::Rgb(118, 75, 162),
    on_accent: Color::White,
    text: Color::Rgb(36, 41, 47),
    muted: Color::Rgb(102, 102, 102),
    input_bg: Color::Rgb(248, 249, 250),
    ok: Color::Rgb(46, 125, 50),
    info: Color::Rgb(21, 101, 192),
    error: Color::Rgb(176, 0, 32),
};

const HIGH_CONTRAST_PALETTE: Palette = Palette {
    accent: Color::Rgb(255, 215, 0),
    accent_alt: Color::Rgb(0, 255, 255),
    on_accent: Color::Black,
    text: Color::White,
    muted: Color::Rgb(200, 200, 200),
    input_bg: Color::Black,
    ok: Color::Rgb(0, 255, 127),
    info: Color::Rgb(135, 206, 250),
    error: Color::Rgb(255, 64, 64),
};

fn disabled_style(token: ThemeToken) -> Style {
    match token {
        ThemeToken::Header | ThemeToken::SectionTitle | ThemeToken::ResultHeading => {
            Style::default().add_modifier(Modifier::BOLD)
        }
        ThemeToken::FocusedLabel | ThemeToken::FocusedButton => {
            Style::default().add_modifier(Modifier::REVERSED)
        }
        _ => Style::default(),
    }
}

fn merge_style(base: Style, override_style: &StyleOverride) -> Style {
    let mut merged = base;

    if let Some(fg) = override_style.fg {
        merged = merged.fg(color_from_hex(fg));
    }
    if let Some(bg) = override_style.bg {
        merged = merged.bg(color_from_hex(bg));
    }
    if let Some(modifiers) = &override_style.modifiers {
        let wanted = modifiers
            .iter()
            .fold(Modifier::empty(), |acc, modifier| acc | to_ratatui(*modifier));
        merged = merged.remove_modifier(Modifier::all()).add_modifier(wanted);
    }

    merged
}

fn color_from_hex(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn to_ratatui(modifier: ThemeModifier) -> Modifier {
    match modifier {
        ThemeModifier::Bold => Modifier::BOLD,
        ThemeModifier::Dim => Modifier::DIM,
        ThemeModifier::Italic => Modifier::ITALIC,
        ThemeModifier::Underlined => Modifier::UNDERLINED,
        ThemeModifier::Reversed => Modifier::REVERSED,
    }
}
