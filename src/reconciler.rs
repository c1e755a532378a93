//! Navigation Reconciler for minibrowser.
//!
//! Translates content-surface events into tab registry mutations and,
//! strictly gated on the event's tab being active, into shared chrome
//! mutations and history appends. Events from every tab interleave
//! arbitrarily; the `tab_id == active_tab_id` check at the top of each
//! mirror step is the only thing keeping a background tab's load from
//! hijacking the address bar.

use std::sync::{Arc, Mutex};

use crate::app::BrowserShell;
use crate::deeplink;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::surface::{
    LoadDecision, NavigationState, SurfaceEvent, ERR_NAME_NOT_RESOLVED,
    ERR_NAME_NOT_RESOLVED_DESCRIPTION,
};
use crate::types::tab::TabNavUpdate;
use crate::urls;

use url::form_urlencoded;

impl BrowserShell {
    /// Full navigation snapshot from one tab's surface.
    pub fn on_navigation_state_change(&mut self, tab_id: &str, state: &NavigationState) {
        let update = TabNavUpdate {
            url: state.url.clone(),
            title: derive_display_title(&state.title, &state.url),
            can_go_back: state.can_go_back,
            can_go_forward: state.can_go_forward,
            loading: state.loading,
        };

        // The tab record is updated whether or not the tab is visible;
        // background tabs keep their state current too.
        let changed = match self.tab_manager.apply_nav_state(tab_id, &update) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::debug!(tab_id, error = %e, "navigation event for unknown tab");
                return;
            }
        };
        if !changed {
            return;
        }

        if self.tab_manager.is_active(tab_id) {
            self.chrome.can_go_back = state.can_go_back;
            self.chrome.can_go_forward = state.can_go_forward;
            self.chrome.loading = state.loading;

            if !self.chrome.input_focused && !state.url.is_empty() {
                self.chrome.active_url = Some(state.url.clone());
                self.chrome.input_url = urls::display_host(&state.url);
            }

            if !state.loading && !state.url.is_empty() && state.url != urls::ABOUT_BLANK {
                use crate::managers::history_manager::HistoryManagerTrait;
                self.history.append(&state.url);
                self.persist_history();
            }
        }

        self.persist_tabs();
    }

    /// Load progress for one tab; only the active tab drives the bar.
    pub fn on_load_progress(&mut self, tab_id: &str, progress: f64) {
        if self.tab_manager.is_active(tab_id) {
            self.chrome.progress = progress.clamp(0.0, 1.0);
        }
    }

    pub fn on_load_start(&mut self, tab_id: &str) {
        if self.tab_manager.is_active(tab_id) {
            self.chrome.loading = true;
            self.chrome.progress = 0.1;
        }
    }

    pub fn on_load_end(&mut self, tab_id: &str) {
        if self.tab_manager.is_active(tab_id) {
            self.chrome.loading = false;
            self.chrome.progress = 1.0;
        }
    }

    /// Load failure. DNS-style failures are recovered locally by rewriting
    /// the failing tab to a search for the typed text: silently for
    /// background tabs, with the address bar following only for the active
    /// one. Everything else is left to the surface's own error page.
    pub fn on_error(&mut self, tab_id: &str, code: i32, description: &str, failing_url: Option<&str>) {
        if self.tab_manager.is_active(tab_id) {
            self.chrome.loading = false;
        }

        let dns_failure =
            code == ERR_NAME_NOT_RESOLVED || description == ERR_NAME_NOT_RESOLVED_DESCRIPTION;
        if !dns_failure {
            tracing::debug!(tab_id, code, description, "surface load error");
            return;
        }
        let Some(failed) = failing_url else {
            return;
        };
        if urls::is_search_url(failed) {
            return;
        }

        let query = urls::search_query_from_failed(failed);
        let engine = self.settings_engine.get().search_engine();
        let search_url = urls::build_search_url(engine, &query);

        if self.tab_manager.set_url(tab_id, &search_url).is_err() {
            return;
        }
        if let Some(surface) = self.surfaces.get_mut(tab_id) {
            surface.load(&search_url);
        }
        tracing::info!(tab_id, failed, "DNS failure, redirecting to search");

        if self.tab_manager.is_active(tab_id) {
            self.chrome.active_url = Some(search_url);
            self.chrome.input_url = query;
        }
        self.persist_tabs();
    }

    /// URL-scheme gate, consulted before any navigation starts.
    ///
    /// Web-ish schemes load in place. The app's own scheme reroutes into tab
    /// creation. `http://` under the HTTPS-only policy is upgraded and the
    /// original request cancelled. Anything else is handed to the OS link
    /// handler, with a fallback URL dug out of Android intent syntax when
    /// one is there.
    pub fn should_start_load(&mut self, tab_id: &str, request_url: &str) -> LoadDecision {
        let app_prefix = format!("{}://", deeplink::APP_SCHEME);
        if request_url.starts_with(&app_prefix) {
            self.handle_deep_link(request_url);
            return LoadDecision::Cancel;
        }

        if let Some(rest) = request_url.strip_prefix("http://") {
            if self.settings_engine.get().https_only {
                let upgraded = format!("https://{}", rest);
                if self.tab_manager.set_url(tab_id, &upgraded).is_ok() {
                    if let Some(surface) = self.surfaces.get_mut(tab_id) {
                        surface.load(&upgraded);
                    }
                    if self.tab_manager.is_active(tab_id) {
                        self.chrome.input_url = urls::display_host(&upgraded);
                        self.chrome.active_url = Some(upgraded);
                    }
                    self.persist_tabs();
                }
                return LoadDecision::Cancel;
            }
            return LoadDecision::Allow;
        }

        if request_url.starts_with("https://")
            || request_url.starts_with("about:")
            || request_url.starts_with("blob:")
            || request_url.starts_with("data:")
        {
            return LoadDecision::Allow;
        }

        LoadDecision::OpenExternal {
            url: request_url.to_string(),
            fallback_url: fallback_url_from_intent(request_url),
        }
    }
}

/// Display title for a tab: the surface's title when it is real text, else
/// the URL's host. Surfaces report the raw URL as the title early in a load.
fn derive_display_title(title: &str, url: &str) -> String {
    let title = title.trim();
    if !title.is_empty() && !urls::looks_like_url(title) {
        title.to_string()
    } else {
        urls::display_host(url)
    }
}

/// Best-effort extraction of `S.browser_fallback_url` from an Android intent
/// URL, so a failed OS hand-off can still land somewhere.
pub fn fallback_url_from_intent(url: &str) -> Option<String> {
    let intent = url.strip_prefix("intent:")?;
    let (_, fragment) = intent.split_once("#Intent;")?;
    for part in fragment.trim_end_matches(";end").split(';') {
        if let Some(encoded) = part.strip_prefix("S.browser_fallback_url=") {
            let pair = format!("u={}", encoded);
            if let Some((_, value)) = form_urlencoded::parse(pair.as_bytes()).next() {
                if !value.is_empty() {
                    return Some(value.into_owned());
                }
            }
        }
    }
    None
}

// ─── Event plumbing ───

/// Dispatches one tagged surface event into the shell.
pub fn handle_surface_event(shell: &Mutex<BrowserShell>, tab_id: &str, event: SurfaceEvent) {
    let Ok(mut shell) = shell.lock() else {
        tracing::warn!(tab_id, "shell mutex poisoned, dropping surface event");
        return;
    };
    match event {
        SurfaceEvent::NavigationStateChange(state) => {
            shell.on_navigation_state_change(tab_id, &state)
        }
        SurfaceEvent::LoadProgress { progress } => shell.on_load_progress(tab_id, progress),
        SurfaceEvent::LoadStart => shell.on_load_start(tab_id),
        SurfaceEvent::LoadEnd => shell.on_load_end(tab_id),
        SurfaceEvent::Error {
            code,
            description,
            failing_url,
        } => shell.on_error(tab_id, code, &description, failing_url.as_deref()),
    }
}

/// A surface's way back into the core: one sink per tab, bound to the tab id
/// at surface-creation time. Late events from a deleted tab resolve against
/// an id that matches nothing and fall out harmlessly.
pub struct SurfaceSink {
    tab_id: String,
    shell: Arc<Mutex<BrowserShell>>,
}

impl SurfaceSink {
    pub fn new(shell: Arc<Mutex<BrowserShell>>, tab_id: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            shell,
        }
    }

    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    pub fn dispatch(&self, event: SurfaceEvent) {
        handle_surface_event(&self.shell, &self.tab_id, event);
    }
}
