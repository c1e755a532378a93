use serde::{Deserialize, Serialize};

/// One browsing context.
///
/// `loading`, `can_go_back` and `can_go_forward` mirror the content surface's
/// last navigation event for this tab. They are navigation-session state, not
/// tab identity: serde skips them, so persisted tabs always come back idle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub url: Option<String>,
    pub title: String,
    pub show_logo: bool,
    #[serde(skip)]
    pub loading: bool,
    #[serde(skip)]
    pub can_go_back: bool,
    #[serde(skip)]
    pub can_go_forward: bool,
}

impl Tab {
    pub const DEFAULT_TITLE: &'static str = "New Tab";
    pub const EXTERNAL_TITLE: &'static str = "External Link";

    /// A fresh, not-yet-navigated tab.
    pub fn blank(id: String) -> Self {
        Self {
            id,
            url: None,
            title: Self::DEFAULT_TITLE.to_string(),
            show_logo: true,
            loading: false,
            can_go_back: false,
            can_go_forward: false,
        }
    }

    /// A tab that starts out pointed at a URL.
    pub fn with_url(id: String, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::blank(id)
        }
    }
}

/// A navigation snapshot ready to be written into a tab record.
///
/// `title` is the already-derived display title, not the raw surface title.
#[derive(Debug, Clone, PartialEq)]
pub struct TabNavUpdate {
    pub url: String,
    pub title: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub loading: bool,
}
