use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_AGENT_BASE_URL: &str = "http://127.0.0.1:8000";

const CONFIG_DIR_NAME: &str = "travel-assistant";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub agent_base_url: String,
    pub agent_api_key: Option<String>,
    pub enable_email: bool,
    pub download_dir: PathBuf,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeConfig {
    pub preset: ThemePreset,
    pub styles: HashMap<ThemeToken, StyleOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemePreset {
    #[default]
    Default,
    Light,
    HighContrast,
}

impl FromStr for ThemePreset {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "default" => Ok(Self::Default),
            "light" => Ok(Self::Light),
            "high-contrast" => Ok(Self::HighContrast),
            _ => Err(format!("unknown preset '{value}'")),
        }
    }
}

/// Every styled element of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeToken {
    Header,
    SectionTitle,
    Label,
    FocusedLabel,
    Input,
    Placeholder,
    Button,
    FocusedButton,
    StatusOk,
    StatusMissing,
    Info,
    ResultText,
    ResultHeading,
    ResultCode,
    Error,
    Spinner,
    Footer,
}

impl ThemeToken {
    pub const ALL: [ThemeToken; 17] = [
        Self::Header,
        Self::SectionTitle,
        Self::Label,
        Self::FocusedLabel,
        Self::Input,
        Self::Placeholder,
        Self::Button,
        Self::FocusedButton,
        Self::StatusOk,
        Self::StatusMissing,
        Self::Info,
        Self::ResultText,
        Self::ResultHeading,
        Self::ResultCode,
        Self::Error,
        Self::Spinner,
        Self::Footer,
    ];
}

impl FromStr for ThemeToken {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "header" => Ok(Self::Header),
            "section_title" => Ok(Self::SectionTitle),
            "label" => Ok(Self::Label),
            "focused_label" => Ok(Self::FocusedLabel),
            "input" => Ok(Self::Input),
            "placeholder" => Ok(Self::Placeholder),
            "button" => Ok(Self::Button),
            "focused_button" => Ok(Self::FocusedButton),
            "status_ok" => Ok(Self::StatusOk),
            "status_missing" => Ok(Self::StatusMissing),
            "info" => Ok(Self::Info),
            "result_text" => Ok(Self::ResultText),
            "result_heading" => Ok(Self::ResultHeading),
            "result_code" => Ok(Self::ResultCode),
            "error" => Ok(Self::Error),
            "spinner" => Ok(Self::Spinner),
            "footer" => Ok(Self::Footer),
            _ => Err(format!("unknown token '{value}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOverride {
    pub fg: Option<HexColor>,
    pub bg: Option<HexColor>,
    pub modifiers: Option<Vec<ThemeModifier>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        const INVALID: &str = "invalid hex color, expected #RRGGBB";

        let digits = value
            .strip_prefix('#')
            .filter(|rest| rest.len() == 6 && rest.is_ascii())
            .ok_or_else(|| INVALID.to_string())?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| INVALID.to_string())
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeModifier {
    Bold,
    Dim,
    Italic,
    Underlined,
    Reversed,
}

impl FromStr for ThemeModifier {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "bold" => Ok(Self::Bold),
            "dim" => Ok(Self::Dim),
            "italic" => Ok(Self::Italic),
            "underlined" => Ok(Self::Underlined),
            "reversed" => Ok(Self::Reversed),
            _ => Err(format!("unknown modifier '{value}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    agent_base_url: Option<String>,
    agent_api_key: Option<String>,
    enable_email: Option<bool>,
    download_dir: Option<PathBuf>,
    theme: Option<RawThemeConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawThemeConfig {
    name: Option<String>,
    styles: Option<HashMap<String, RawStyleOverride>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStyleOverride {
    fg: Option<String>,
    bg: Option<String>,
    modifiers: Option<Vec<String>>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Resolution order for each key: process env, then `.env`, then the
    /// config file, then the built-in default.
    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => discover_config_path()?,
        };
        if explicit_path.is_some() && !config_path.is_file() {
            bail!(
                "Failed to load config {}: file does not exist",
                config_path.display()
            );
        }
        let file_config = load_file_config(&config_path)?;

        // dotenvy never overrides variables already set in the process env.
        dotenvy::dotenv().ok();

        let file_base_url = file_config
            .as_ref()
            .and_then(|cfg| cfg.agent_base_url.as_deref())
            .and_then(non_empty)
            .map(ToOwned::to_owned);
        let file_api_key = file_config
            .as_ref()
            .and_then(|cfg| cfg.agent_api_key.as_deref())
            .and_then(non_empty)
            .map(ToOwned::to_owned);
        let enable_email = file_config
            .as_ref()
            .and_then(|cfg| cfg.enable_email)
            .unwrap_or(false);
        let download_dir = file_config
            .as_ref()
            .and_then(|cfg| cfg.download_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let theme = validate_theme(
            file_config.as_ref().and_then(|cfg| cfg.theme.as_ref()),
            &config_path,
        )?;

        Ok(Self {
            agent_base_url: env_non_empty("TRAVEL_AGENT_URL")
                .or(file_base_url)
                .unwrap_or_else(|| DEFAULT_AGENT_BASE_URL.to_string()),
            agent_api_key: env_non_empty("TRAVEL_AGENT_API_KEY").or(file_api_key),
            enable_email,
            download_dir,
            theme,
            config_path,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn validate_theme(raw_theme: Option<&RawThemeConfig>, config_path: &Path) -> Result<ThemeConfig> {
    let Some(theme) = raw_theme else {
        return Ok(ThemeConfig::default());
    };

    let mut config = ThemeConfig::default();

    if let Some(name) = &theme.name {
        config.preset = ThemePreset::from_str(name)
            .map_err(|reason| config_error(config_path, "theme.name", &reason))?;
    }

    for (token_name, raw_style) in theme.styles.iter().flatten() {
        let key_path = format!("theme.styles.{token_name}");
        let token = ThemeToken::from_str(token_name)
            .map_err(|reason| config_error(config_path, &key_path, &reason))?;

        let color = |value: Option<&str>, field: &str| -> Result<Option<HexColor>> {
            value
                .map(|value| {
                    HexColor::from_str(value).map_err(|reason| {
                        config_error(config_path, &format!("{key_path}.{field}"), &reason)
                    })
                })
                .transpose()
        };
        let fg = color(raw_style.fg.as_deref(), "fg")?;
        let bg = color(raw_style.bg.as_deref(), "bg")?;

        let modifiers = raw_style
            .modifiers
            .as_ref()
            .map(|values| {
                values
                    .iter()
                    .map(|value| {
                        ThemeModifier::from_str(value).map_err(|reason| {
                            config_error(config_path, &format!("{key_path}.modifiers"), &reason)
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        config
            .styles
            .insert(token, StyleOverride { fg, bg, modifiers });
    }

    Ok(config)
}

pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| non_empty(&value).map(ToOwned::to_owned))
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_AGENT_BASE_URL, HexColor, ThemeConfig, ThemePreset, ThemeToken};
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn reset_vars() {
        unsafe {
            env::remove_var("TRAVEL_AGENT_URL");
            env::remove_var("TRAVEL_AGENT_API_KEY");
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    fn with_cwd<T>(path: &Path, f: impl FnOnce() -> T) -> T {
        let cwd = env::current_dir().expect("current dir");
        env::set_current_dir(path).expect("set current dir");
        let result = f();
        env::set_current_dir(cwd).expect("restore current dir");
        result
    }

    fn write_config(root: &Path, text: &str) {
        let config_dir = root.join("travel-assistant");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(config_dir.join("config.toml"), text).expect("write config");
    }

    fn load_from(root: &Path) -> anyhow::Result<AppConfig> {
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", root);
        }
        with_cwd(root, AppConfig::load)
    }

    #[test]
    #[serial]
    fn defaults_apply_without_config_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cfg = load_from(tmp.path()).expect("load config");

        assert_eq!(cfg.agent_base_url, DEFAULT_AGENT_BASE_URL);
        assert_eq!(cfg.agent_api_key, None);
        assert!(!cfg.enable_email);
        assert_eq!(cfg.download_dir, PathBuf::from("."));
        assert_eq!(cfg.theme, ThemeConfig::default());
    }

    #[test]
    #[serial]
    fn file_values_are_used() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(
            tmp.path(),
            r#"
agent_base_url = "https://agent.example"
agent_api_key = "file-key"
enable_email = true
download_dir = "/tmp/emails"
"#,
        );

        let cfg = load_from(tmp.path()).expect("load config");
        assert_eq!(cfg.agent_base_url, "https://agent.example");
        assert_eq!(cfg.agent_api_key.as_deref(), Some("file-key"));
        assert!(cfg.enable_email);
        assert_eq!(cfg.download_dir, PathBuf::from("/tmp/emails"));
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(
            tmp.path(),
            r#"
agent_base_url = "https://file.example"
agent_api_key = "file-key"
"#,
        );

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("TRAVEL_AGENT_URL", "https://env.example");
            env::set_var("TRAVEL_AGENT_API_KEY", "env-key");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.agent_base_url, "https://env.example");
        assert_eq!(cfg.agent_api_key.as_deref(), Some("env-key"));
        reset_vars();
    }

    #[test]
    #[serial]
    fn blank_values_fall_back_to_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(tmp.path(), "agent_base_url = \"   \"\nagent_api_key = \"\"\n");

        let cfg = load_from(tmp.path()).expect("load config");
        assert_eq!(cfg.agent_base_url, DEFAULT_AGENT_BASE_URL);
        assert_eq!(cfg.agent_api_key, None);
    }

    #[test]
    #[serial]
    fn explicit_path_must_exist() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        let missing = tmp.path().join("nope.toml");

        let err = AppConfig::load_with_path(Some(&missing)).expect_err("missing file");
        assert!(err.to_string().contains("file does not exist"));
    }

    #[test]
    #[serial]
    fn explicit_path_is_loaded() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "enable_email = true\n").expect("write config");
        reset_vars();

        let cfg = with_cwd(tmp.path(), || {
            AppConfig::load_with_path(Some(&path)).expect("load config")
        });
        assert!(cfg.enable_email);
        assert_eq!(cfg.config_path, path);
    }

    #[test]
    #[serial]
    fn blank_xdg_config_home_is_rejected() {
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "   ");
        }

        let err = AppConfig::load().expect_err("load should fail");
        assert!(
            err.to_string()
                .contains("Failed to resolve config path: XDG_CONFIG_HOME is set but empty")
        );
        reset_vars();
    }

    #[test]
    #[serial]
    fn unknown_root_key_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(tmp.path(), "openai_api_key = \"sk\"");

        let err = load_from(tmp.path()).expect_err("load should fail");
        assert!(err.to_string().contains("Failed to load config"));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    #[serial]
    fn theme_errors_name_the_key_path() {
        let tmp = tempfile::tempdir().expect("tempdir");

        write_config(tmp.path(), "[theme.styles.sidebar]\nfg = \"#ffffff\"\n");
        let err = load_from(tmp.path()).expect_err("unknown token");
        assert!(
            err.to_string()
                .contains("theme.styles.sidebar: unknown token 'sidebar'")
        );

        write_config(tmp.path(), "[theme.styles.header]\nbg = \"purple\"\n");
        let err = load_from(tmp.path()).expect_err("bad color");
        assert!(
            err.to_string()
                .contains("theme.styles.header.bg: invalid hex color")
        );

        write_config(tmp.path(), "[theme.styles.error]\nmodifiers = [\"sparkly\"]\n");
        let err = load_from(tmp.path()).expect_err("bad modifier");
        assert!(
            err.to_string()
                .contains("theme.styles.error.modifiers: unknown modifier 'sparkly'")
        );

        write_config(tmp.path(), "[theme]\nname = \"neon\"\n");
        let err = load_from(tmp.path()).expect_err("bad preset");
        assert!(err.to_string().contains("theme.name: unknown preset 'neon'"));
    }

    #[test]
    #[serial]
    fn theme_overrides_are_parsed() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(
            tmp.path(),
            r##"
[theme]
name = "high-contrast"

[theme.styles.header]
fg = "#667EEA"
modifiers = ["bold", "italic"]
"##,
        );

        let cfg = load_from(tmp.path()).expect("load config");
        assert_eq!(cfg.theme.preset, ThemePreset::HighContrast);
        let style = cfg
            .theme
            .styles
            .get(&ThemeToken::Header)
            .expect("header style");
        assert_eq!(
            style.fg,
            Some(HexColor {
                r: 0x66,
                g: 0x7E,
                b: 0xEA
            })
        );
        assert_eq!(style.bg, None);
        assert_eq!(style.modifiers.as_ref().map(Vec::len), Some(2));
    }
}
