//! Browser Shell for minibrowser.
//!
//! Central struct holding the tab registry, history ledger, settings store,
//! shared chrome state, and the per-tab content-surface handles. Owns the
//! one-shot startup resolution and every UI-initiated action; the companion
//! event handlers live in [`crate::reconciler`].

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::deeplink;
use crate::managers::history_manager::{HistoryManager, HistoryManagerTrait};
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::gateway::{
    StorageGateway, KEY_ACTIVE_TAB_ID, KEY_HISTORY, KEY_SETTINGS, KEY_TABS,
};
use crate::storage::scheduler::PersistScheduler;
use crate::surface::{ContentSurface, SurfaceConfig, SurfaceFactory};
use crate::types::chrome::ChromeState;
use crate::types::errors::{HistoryError, SettingsError, TabError};
use crate::types::history::{ClearRange, HistoryItem};
use crate::types::settings::{Settings, StartupTabMode};
use crate::types::tab::Tab;
use crate::urls;

/// Central shell struct. One per process; the host drives it behind a mutex
/// and content surfaces report back through per-tab sinks.
pub struct BrowserShell {
    pub(crate) tab_manager: TabManager,
    pub(crate) history: HistoryManager,
    pub(crate) settings_engine: SettingsEngine,
    pub(crate) chrome: ChromeState,
    pub(crate) surfaces: HashMap<String, Box<dyn ContentSurface>>,
    factory: Box<dyn SurfaceFactory>,
    /// Held until startup has read through it, then moved into the scheduler.
    boot_store: Option<Box<dyn StorageGateway>>,
    persist: Option<PersistScheduler>,
    ready: bool,
}

impl BrowserShell {
    pub fn new(store: Box<dyn StorageGateway>, factory: Box<dyn SurfaceFactory>) -> Self {
        Self {
            tab_manager: TabManager::new(),
            history: HistoryManager::new(),
            settings_engine: SettingsEngine::new(),
            chrome: ChromeState::default(),
            surfaces: HashMap::new(),
            factory,
            boot_store: Some(store),
            persist: None,
            ready: false,
        }
    }

    // ─── Startup Resolver ───

    /// One-shot boot sequence: settings → history → tabs → pending deep link.
    /// Runs exactly once per process; a second call is a no-op. Storage
    /// failures degrade to defaults rather than blocking startup.
    pub fn startup(&mut self, initial_url: Option<&str>) {
        if self.ready {
            return;
        }
        let Some(store) = self.boot_store.take() else {
            return;
        };

        self.settings_engine.load_from(store.as_ref());

        let history: Vec<HistoryItem> =
            load_record(store.as_ref(), KEY_HISTORY).unwrap_or_default();
        self.history.restore(history);

        let restored: Vec<Tab> = load_record(store.as_ref(), KEY_TABS).unwrap_or_default();

        let pending_link = initial_url.and_then(deeplink::resolve);
        if let Some(target) = pending_link {
            // A deep link wins outright; the restored session stays underneath.
            self.tab_manager.restore_with_external(&target, restored);
        } else {
            match self.settings_engine.get().startup_tab_mode {
                StartupTabMode::Last if !restored.is_empty() => {
                    let saved_active: Option<String> =
                        load_record(store.as_ref(), KEY_ACTIVE_TAB_ID);
                    self.tab_manager.restore(restored, saved_active.as_deref());
                }
                _ => {
                    let blank_id = restored
                        .iter()
                        .find(|t| t.url.is_none())
                        .map(|t| t.id.clone());
                    match blank_id {
                        Some(id) => self.tab_manager.restore(restored, Some(&id)),
                        None if restored.is_empty() => self.tab_manager.restore(Vec::new(), None),
                        None => {
                            self.tab_manager.restore(restored, None);
                            self.tab_manager.create_tab(None);
                        }
                    }
                }
            }
        }

        self.persist = Some(PersistScheduler::spawn(store));
        self.ready = true;
        tracing::info!(
            tabs = self.tab_manager.tab_count(),
            active = %self.tab_manager.active_tab_id(),
            "startup resolved"
        );

        self.sync_chrome_from_active();
        self.mount_surfaces();
        self.persist_tabs();
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Flushes the session out and stops the persistence writer.
    pub fn shutdown(&mut self) {
        self.persist_tabs();
        self.persist_history();
        self.persist_settings();
        self.flush_storage();
        self.persist = None;
    }

    // ─── Deep-link ingress ───

    /// Handles an OS-delivered link, at any point after startup. An already
    /// open tab with the identical URL is switched to instead of duplicated.
    pub fn handle_deep_link(&mut self, raw: &str) {
        let Some(target) = deeplink::resolve(raw) else {
            tracing::debug!(link = raw, "ignoring link in unclaimed scheme");
            return;
        };

        let existing = self
            .tab_manager
            .tabs()
            .iter()
            .find(|t| t.url.as_deref() == Some(target.as_str()))
            .map(|t| t.id.clone());
        if let Some(id) = existing {
            let _ = self.switch_to(&id);
            return;
        }

        let id = self.tab_manager.create_external_tab(&target);
        self.ensure_surface(&id);
        self.sync_chrome_from_active();
        self.persist_tabs();
    }

    // ─── Tab actions ───

    /// Opens a new tab at the front of the registry and makes it active.
    pub fn create_tab(&mut self, url: Option<&str>) -> String {
        let id = self.tab_manager.create_tab(url);
        if url.is_some() {
            self.ensure_surface(&id);
        }
        self.sync_chrome_from_active();
        self.persist_tabs();
        id
    }

    /// Switches the active tab and resyncs the chrome from its cached state.
    /// Switching to the already-active tab changes nothing and persists
    /// nothing.
    pub fn switch_to(&mut self, tab_id: &str) -> Result<(), TabError> {
        let changed = self.tab_manager.switch_to(tab_id)?;
        if changed {
            self.ensure_surface(tab_id);
            self.sync_chrome_from_active();
            self.persist_tabs();
        }
        Ok(())
    }

    /// Deletes a tab. Its surface is told to stop loading before the handle
    /// is dropped, so a late callback cannot land on a freed id.
    pub fn delete_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        if let Some(surface) = self.surfaces.get_mut(tab_id) {
            surface.stop_loading();
        }
        self.surfaces.remove(tab_id);

        let active_changed = self.tab_manager.delete_tab(tab_id)?;
        if active_changed {
            let active_id = self.tab_manager.active_tab_id().to_string();
            self.ensure_surface(&active_id);
            self.sync_chrome_from_active();
        }
        self.persist_tabs();
        Ok(())
    }

    /// User rename; an empty title falls back to the stock one.
    pub fn rename_tab(
        &mut self,
        tab_id: &str,
        title: &str,
        show_logo: bool,
    ) -> Result<(), TabError> {
        let title = if title.trim().is_empty() {
            Tab::DEFAULT_TITLE
        } else {
            title
        };
        self.tab_manager.rename_tab(tab_id, title, show_logo)?;
        self.persist_tabs();
        Ok(())
    }

    /// Clears one tab back to the blank state, releasing its surface.
    pub fn go_home(&mut self, tab_id: &str) -> Result<(), TabError> {
        if let Some(surface) = self.surfaces.get_mut(tab_id) {
            surface.stop_loading();
        }
        self.surfaces.remove(tab_id);

        self.tab_manager.go_home(tab_id)?;
        if self.tab_manager.is_active(tab_id) {
            self.sync_chrome_from_active();
        }
        self.persist_tabs();
        Ok(())
    }

    // ─── Address bar ───

    /// Resolves address-bar text (URL, bare domain, or search query) and
    /// points the active tab at the result.
    pub fn submit_address(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let engine = self.settings_engine.get().search_engine();
        let target = urls::resolve_address_input(text, engine);
        let active_id = self.tab_manager.active_tab_id().to_string();

        // Written into the registry immediately so the surface can mount
        // before the first navigation event comes back.
        let _ = self.tab_manager.navigate(&active_id, &target, text);
        self.chrome.active_url = Some(target.clone());
        self.chrome.input_url = text.to_string();

        self.ensure_surface(&active_id);
        if let Some(surface) = self.surfaces.get_mut(&active_id) {
            surface.load(&target);
        }
        self.persist_tabs();
    }

    /// Tracks whether the user is mid-edit; navigation events must not
    /// overwrite the address text while true.
    pub fn set_address_focused(&mut self, focused: bool) {
        self.chrome.input_focused = focused;
    }

    // ─── Active-surface commands ───

    pub fn go_back(&mut self) {
        if let Some(surface) = self.surfaces.get_mut(self.tab_manager.active_tab_id()) {
            surface.go_back();
        }
    }

    pub fn go_forward(&mut self) {
        if let Some(surface) = self.surfaces.get_mut(self.tab_manager.active_tab_id()) {
            surface.go_forward();
        }
    }

    pub fn reload(&mut self) {
        if let Some(surface) = self.surfaces.get_mut(self.tab_manager.active_tab_id()) {
            surface.reload();
        }
    }

    pub fn stop_loading(&mut self) {
        if let Some(surface) = self.surfaces.get_mut(self.tab_manager.active_tab_id()) {
            surface.stop_loading();
        }
    }

    /// Destructive; the embedder confirms with the user before calling.
    pub fn clear_cache(&mut self) {
        if let Some(surface) = self.surfaces.get_mut(self.tab_manager.active_tab_id()) {
            surface.clear_cache();
        }
    }

    // ─── History actions ───

    pub fn delete_history_item(&mut self, id: &str) -> Result<(), HistoryError> {
        self.history.delete_one(id)?;
        self.persist_history();
        Ok(())
    }

    /// Destructive; the embedder confirms with the user before calling.
    pub fn clear_history(&mut self, range: ClearRange) -> usize {
        let removed = self.history.clear(range);
        self.persist_history();
        removed
    }

    // ─── Settings actions ───

    pub fn set_setting(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.settings_engine.set_value(key, value)?;
        self.persist_settings();
        Ok(())
    }

    /// Destructive; the embedder confirms with the user before calling.
    pub fn reset_settings(&mut self) {
        self.settings_engine.reset();
        self.persist_settings();
    }

    // ─── Accessors ───

    pub fn tabs(&self) -> &[Tab] {
        self.tab_manager.tabs()
    }

    pub fn active_tab(&self) -> &Tab {
        self.tab_manager.active_tab()
    }

    pub fn active_tab_id(&self) -> &str {
        self.tab_manager.active_tab_id()
    }

    pub fn chrome(&self) -> &ChromeState {
        &self.chrome
    }

    pub fn settings(&self) -> &Settings {
        self.settings_engine.get()
    }

    pub fn history_items(&self) -> &[HistoryItem] {
        self.history.items()
    }

    pub fn search_history(&self, query: &str) -> Vec<&HistoryItem> {
        self.history.search(query)
    }

    pub fn has_surface(&self, tab_id: &str) -> bool {
        self.surfaces.contains_key(tab_id)
    }

    // ─── Internals ───

    /// Restores the shared chrome from the active tab's cached state.
    pub(crate) fn sync_chrome_from_active(&mut self) {
        let tab = self.tab_manager.active_tab();
        self.chrome.active_url = tab.url.clone();
        self.chrome.input_url = tab
            .url
            .as_deref()
            .map(urls::display_host)
            .unwrap_or_default();
        self.chrome.can_go_back = tab.can_go_back;
        self.chrome.can_go_forward = tab.can_go_forward;
        self.chrome.loading = tab.loading;
        self.chrome.progress = if tab.loading { 0.2 } else { 0.0 };
    }

    pub(crate) fn ensure_surface(&mut self, tab_id: &str) {
        if self.surfaces.contains_key(tab_id) {
            return;
        }
        let Some(tab) = self.tab_manager.get_tab(tab_id) else {
            return;
        };
        let Some(url) = tab.url.clone() else {
            return;
        };
        let config = self.surface_config(&url);
        let surface = self.factory.create_surface(tab_id, &config);
        self.surfaces.insert(tab_id.to_string(), surface);
    }

    fn surface_config(&self, url: &str) -> SurfaceConfig {
        let settings = self.settings_engine.get();
        SurfaceConfig {
            url: url.to_string(),
            desktop_ua: settings.desktop_mode,
            js_enabled: settings.js_enabled,
            shared_cookies: !settings.block_cookies,
            geolocation_enabled: true,
        }
    }

    fn mount_surfaces(&mut self) {
        let ids: Vec<String> = self
            .tab_manager
            .tabs()
            .iter()
            .filter(|t| t.url.is_some())
            .map(|t| t.id.clone())
            .collect();
        for id in ids {
            self.ensure_surface(&id);
        }
    }

    // ─── Persistence side effects ───
    //
    // Writes are fire-and-forget through the scheduler. Nothing persists
    // before startup resolves, and tab/history records are withheld entirely
    // in incognito mode. Settings still persist: the toggle itself must
    // survive a restart.

    pub(crate) fn persist_tabs(&self) {
        if self.settings_engine.get().incognito_mode {
            return;
        }
        let Some(persist) = &self.persist else {
            return;
        };
        match serde_json::to_value(self.tab_manager.tabs()) {
            Ok(record) => persist.schedule(KEY_TABS, record),
            Err(e) => tracing::warn!(error = %e, "could not serialize tabs"),
        }
        persist.schedule(
            KEY_ACTIVE_TAB_ID,
            Value::String(self.tab_manager.active_tab_id().to_string()),
        );
    }

    pub(crate) fn persist_history(&self) {
        if self.settings_engine.get().incognito_mode {
            return;
        }
        let Some(persist) = &self.persist else {
            return;
        };
        match serde_json::to_value(self.history.items()) {
            Ok(record) => persist.schedule(KEY_HISTORY, record),
            Err(e) => tracing::warn!(error = %e, "could not serialize history"),
        }
    }

    pub(crate) fn persist_settings(&self) {
        let Some(persist) = &self.persist else {
            return;
        };
        persist.schedule(KEY_SETTINGS, self.settings_engine.to_record());
    }

    /// Blocks until queued writes have been attempted. For tests and shutdown.
    pub fn flush_storage(&self) {
        if let Some(persist) = &self.persist {
            persist.flush();
        }
    }
}

/// Reads and decodes one persisted record, degrading to `None` on any failure.
fn load_record<T: DeserializeOwned>(store: &dyn StorageGateway, key: &str) -> Option<T> {
    match store.load(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored record unreadable, ignoring");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed, ignoring");
            None
        }
    }
}
