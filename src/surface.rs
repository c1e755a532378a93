//! The content surface interface.
//!
//! A content surface is the external, opaque web-rendering component, one
//! instance per tab with a URL. This core only constructs it, commands it,
//! and consumes its events; rendering is someone else's problem.

use serde::{Deserialize, Serialize};

/// Error code content surfaces report for DNS resolution failures.
pub const ERR_NAME_NOT_RESOLVED: i32 = -2;
pub const ERR_NAME_NOT_RESOLVED_DESCRIPTION: &str = "net::ERR_NAME_NOT_RESOLVED";

/// Construction parameters for a content surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    pub url: String,
    pub desktop_ua: bool,
    pub js_enabled: bool,
    pub shared_cookies: bool,
    pub geolocation_enabled: bool,
}

/// Imperative handle on one tab's rendering surface.
///
/// Events are delivered asynchronously through the tab's
/// [`SurfaceSink`](crate::reconciler::SurfaceSink); a surface must never emit
/// reentrantly from inside one of these commands.
pub trait ContentSurface: Send {
    fn load(&mut self, url: &str);
    fn go_back(&mut self);
    fn go_forward(&mut self);
    fn reload(&mut self);
    fn stop_loading(&mut self);
    fn clear_cache(&mut self);
}

/// Creates surfaces for tabs as they gain URLs.
pub trait SurfaceFactory: Send {
    fn create_surface(&self, tab_id: &str, config: &SurfaceConfig) -> Box<dyn ContentSurface>;
}

/// One tab's navigation snapshot as reported by its surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub loading: bool,
}

/// Events a surface emits. The owning tab id is attached by the sink, not
/// carried in the event; that tagging is what keeps multiplexed tabs safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceEvent {
    NavigationStateChange(NavigationState),
    LoadProgress {
        progress: f64,
    },
    LoadStart,
    LoadEnd,
    #[serde(rename_all = "camelCase")]
    Error {
        code: i32,
        description: String,
        #[serde(default)]
        failing_url: Option<String>,
    },
}

/// What the URL-scheme gate tells the embedder to do with a pending request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum LoadDecision {
    /// Let the surface load it.
    Allow,
    /// Drop the request; the core already rerouted it if needed.
    Cancel,
    /// Drop the request and hand the URL to the OS link handler. If that
    /// fails and a fallback URL is present, the embedder should open the
    /// fallback as a normal navigation.
    #[serde(rename_all = "camelCase")]
    OpenExternal {
        url: String,
        fallback_url: Option<String>,
    },
}

/// A site's device-capability request. The prompt UI is the embedder's; this
/// core only shapes the question and the answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionRequest {
    pub resources: Vec<String>,
}

/// Embedder's answer to a [`PermissionRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PermissionDecision {
    Grant(Vec<String>),
    Deny,
}

/// Human-readable summary of requested capabilities, for the prompt line.
pub fn friendly_resource_names(resources: &[String]) -> String {
    resources
        .iter()
        .map(|resource| {
            match resource.as_str() {
                "android.webkit.resource.AUDIO_CAPTURE" => "Microphone",
                "android.webkit.resource.VIDEO_CAPTURE" => "Camera",
                "android.webkit.resource.PROTECTED_MEDIA_ID" => "Protected Media",
                other => other,
            }
            .to_string()
        })
        .collect::<Vec<_>>()
        .join(" and ")
}
