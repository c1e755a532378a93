use serde::{Deserialize, Serialize};

/// Flat user settings record.
///
/// Loaded once at startup and saved in full on every change. The container is
/// `#[serde(default)]` so a stored record missing individual keys falls back
/// per field instead of failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme_mode: ThemeMode,
    pub accent_color: String,
    pub search_engine_index: usize,
    pub corner_radius: u32,
    pub ui_padding: UiPadding,
    pub font_scale: f32,
    pub bar_transparency: BarTransparency,
    pub home_logo_text: String,
    pub pill_height: u32,
    pub progress_bar_mode: ProgressBarMode,
    pub recall_position: RecallPosition,
    pub startup_tab_mode: StartupTabMode,
    pub desktop_mode: bool,
    pub js_enabled: bool,
    pub https_only: bool,
    pub block_cookies: bool,
    pub reader_mode: bool,
    pub incognito_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Dark,
            accent_color: "#007AFF".to_string(),
            search_engine_index: 0,
            corner_radius: 22,
            ui_padding: UiPadding::Normal,
            font_scale: 1.0,
            bar_transparency: BarTransparency::Frosted,
            home_logo_text: "mb.".to_string(),
            pill_height: 70,
            progress_bar_mode: ProgressBarMode::Ltr,
            recall_position: RecallPosition::Center,
            startup_tab_mode: StartupTabMode::New,
            desktop_mode: false,
            js_enabled: true,
            https_only: false,
            block_cookies: false,
            reader_mode: false,
            incognito_mode: false,
        }
    }
}

impl Settings {
    /// The selected search engine, clamped to the table so a stale persisted
    /// index can never panic.
    pub fn search_engine(&self) -> &'static SearchEngine {
        let idx = self.search_engine_index.min(SEARCH_ENGINES.len() - 1);
        &SEARCH_ENGINES[idx]
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Adaptive,
}

/// Spacing preset for list rows and bars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UiPadding {
    Compact,
    Normal,
    Airy,
}

/// How see-through the floating bar renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BarTransparency {
    Opaque,
    Frosted,
    Ghost,
}

/// Load progress indicator style.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBarMode {
    Ltr,
    Center,
    None,
}

/// Where the bar-recall pill sits when the bar is hidden.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RecallPosition {
    Left,
    Center,
    Right,
}

/// What the browser opens with on a cold start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StartupTabMode {
    New,
    Last,
}

/// One entry in the fixed search engine table.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEngine {
    pub name: &'static str,
    /// Query prefix; the encoded search text is appended directly.
    pub query_url: &'static str,
}

pub const SEARCH_ENGINES: [SearchEngine; 4] = [
    SearchEngine {
        name: "Google",
        query_url: "https://www.google.com/search?q=",
    },
    SearchEngine {
        name: "DuckDuckGo",
        query_url: "https://duckduckgo.com/?q=",
    },
    SearchEngine {
        name: "Bing",
        query_url: "https://www.bing.com/search?q=",
    },
    SearchEngine {
        name: "Ecosia",
        query_url: "https://www.ecosia.org/search?q=",
    },
];
