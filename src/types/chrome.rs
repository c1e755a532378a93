use serde::Serialize;

/// The single shared address-bar / progress / back-forward mirror.
///
/// Every tab's content surface races to report navigation state, but only the
/// active tab may write here. That gate lives in the reconciler; this struct
/// is plain data.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChromeState {
    /// Text currently shown in the address bar.
    pub input_url: String,
    /// The active tab's URL as last mirrored, `None` on a blank tab.
    pub active_url: Option<String>,
    /// Load progress fraction, 0.0 to 1.0.
    pub progress: f64,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub loading: bool,
    /// True while the user is editing the address bar; navigation events must
    /// not overwrite the text mid-edit.
    pub input_focused: bool,
}
