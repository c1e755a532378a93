use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::errors::TabError;
use crate::types::tab::{Tab, TabNavUpdate};

/// Trait defining the tab registry interface.
pub trait TabManagerTrait {
    fn create_tab(&mut self, url: Option<&str>) -> String;
    fn switch_to(&mut self, tab_id: &str) -> Result<bool, TabError>;
    fn delete_tab(&mut self, tab_id: &str) -> Result<bool, TabError>;
    fn rename_tab(&mut self, tab_id: &str, title: &str, show_logo: bool) -> Result<(), TabError>;
    fn go_home(&mut self, tab_id: &str) -> Result<(), TabError>;
    fn navigate(&mut self, tab_id: &str, url: &str, title: &str) -> Result<(), TabError>;
    fn set_url(&mut self, tab_id: &str, url: &str) -> Result<(), TabError>;
    fn apply_nav_state(&mut self, tab_id: &str, update: &TabNavUpdate) -> Result<bool, TabError>;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn tabs(&self) -> &[Tab];
    fn active_tab(&self) -> &Tab;
    fn active_tab_id(&self) -> &str;
    fn is_active(&self, tab_id: &str) -> bool;
    fn tab_count(&self) -> usize;
}

/// The ordered collection of open tabs plus the active-tab pointer.
///
/// Invariants: never empty, exactly one active id, ids unique. New tabs go to
/// the front (most-recent-first for the tab switcher). Ids are epoch-millis
/// strings with a monotonic bump, so they stay unique and creation-ordered
/// even when two tabs are created in the same millisecond.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: String,
    last_id_millis: u64,
}

impl TabManager {
    pub fn new() -> Self {
        let mut manager = Self {
            tabs: Vec::new(),
            active_tab_id: String::new(),
            last_id_millis: 0,
        };
        let id = manager.next_tab_id();
        manager.tabs.push(Tab::blank(id.clone()));
        manager.active_tab_id = id;
        manager
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn next_tab_id(&mut self) -> String {
        let mut millis = Self::now_millis();
        if millis <= self.last_id_millis {
            millis = self.last_id_millis + 1;
        }
        self.last_id_millis = millis;
        millis.to_string()
    }

    fn index_of(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    /// Replaces the registry wholesale. An empty `tabs` heals to one fresh
    /// blank tab; an `active_id` that matches nothing falls back to the first
    /// tab with a URL, then the first tab.
    pub fn restore(&mut self, tabs: Vec<Tab>, active_id: Option<&str>) {
        self.tabs = tabs;
        self.reseed_id_clock();

        if self.tabs.is_empty() {
            let id = self.next_tab_id();
            self.tabs.push(Tab::blank(id.clone()));
            self.active_tab_id = id;
            return;
        }

        let target = active_id
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
            .or_else(|| self.tabs.iter().find(|t| t.url.is_some()))
            .unwrap_or(&self.tabs[0]);
        self.active_tab_id = target.id.clone();
    }

    /// Prepends a new tab for an OS-delivered link and activates it.
    pub fn create_external_tab(&mut self, url: &str) -> String {
        let mut tab = self.mint_tab(Some(url));
        tab.title = Tab::EXTERNAL_TITLE.to_string();
        tab.show_logo = false;
        let id = tab.id.clone();
        self.tabs.insert(0, tab);
        self.active_tab_id = id.clone();
        tracing::info!(tab_id = %id, url, "created tab for external link");
        id
    }

    /// Seeds the registry for a deep-link launch: a new external-link tab in
    /// front, restored tabs preserved underneath. Returns the new tab's ID.
    pub fn restore_with_external(&mut self, url: &str, rest: Vec<Tab>) -> String {
        self.tabs = rest;
        self.reseed_id_clock();
        self.create_external_tab(url)
    }

    fn mint_tab(&mut self, url: Option<&str>) -> Tab {
        let id = self.next_tab_id();
        match url {
            Some(url) => Tab::with_url(id, url),
            None => Tab::blank(id),
        }
    }

    // Restored ids are themselves millis strings; keep the clock ahead of
    // them so the next created id cannot collide.
    fn reseed_id_clock(&mut self) {
        for tab in &self.tabs {
            if let Ok(parsed) = tab.id.parse::<u64>() {
                self.last_id_millis = self.last_id_millis.max(parsed);
            }
        }
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Create a new tab at the front of the registry and make it active.
    /// Returns the new tab's ID.
    fn create_tab(&mut self, url: Option<&str>) -> String {
        let tab = self.mint_tab(url);
        let id = tab.id.clone();
        self.tabs.insert(0, tab);
        self.active_tab_id = id.clone();
        tracing::info!(tab_id = %id, url = url.unwrap_or(""), "created tab");
        id
    }

    /// Make the given tab active. Returns `false` when it already was, since
    /// a no-op switch must not count as a registry mutation.
    fn switch_to(&mut self, tab_id: &str) -> Result<bool, TabError> {
        if self.index_of(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.to_string()));
        }
        if self.active_tab_id == tab_id {
            return Ok(false);
        }
        self.active_tab_id = tab_id.to_string();
        Ok(true)
    }

    /// Remove a tab. If it was active, activation moves to the tab now at the
    /// deleted position, or the last tab when the deleted one was last. An
    /// emptied registry heals itself with a fresh blank tab. Returns whether
    /// the active tab changed.
    fn delete_tab(&mut self, tab_id: &str) -> Result<bool, TabError> {
        let idx = self
            .index_of(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        let was_active = self.active_tab_id == tab_id;

        self.tabs.remove(idx);
        tracing::info!(tab_id = %tab_id, "deleted tab");

        if self.tabs.is_empty() {
            let id = self.next_tab_id();
            self.tabs.push(Tab::blank(id.clone()));
            self.active_tab_id = id;
            return Ok(true);
        }

        if was_active {
            let next = idx.min(self.tabs.len() - 1);
            self.active_tab_id = self.tabs[next].id.clone();
        }
        Ok(was_active)
    }

    /// Pure metadata edit, independent of navigation state.
    fn rename_tab(&mut self, tab_id: &str, title: &str, show_logo: bool) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        tab.title = title.to_string();
        tab.show_logo = show_logo;
        Ok(())
    }

    /// Clear one tab back to the blank-new-tab state without deleting it.
    fn go_home(&mut self, tab_id: &str) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        tab.url = None;
        tab.title = Tab::DEFAULT_TITLE.to_string();
        tab.loading = false;
        tab.can_go_back = false;
        tab.can_go_forward = false;
        Ok(())
    }

    /// Point a tab at a URL immediately (address-bar submit), with a
    /// provisional title until navigation events report a real one.
    fn navigate(&mut self, tab_id: &str, url: &str, title: &str) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        tab.url = Some(url.to_string());
        tab.title = title.to_string();
        Ok(())
    }

    /// Rewrite a tab's stored URL only (error recovery redirects).
    fn set_url(&mut self, tab_id: &str, url: &str) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        tab.url = Some(url.to_string());
        Ok(())
    }

    /// Write a navigation snapshot into the tab record. Returns `false` when
    /// the snapshot matches what is already stored, so callers can skip the
    /// mirror-and-persist work the surface would otherwise trigger every
    /// frame of a long load.
    fn apply_nav_state(&mut self, tab_id: &str, update: &TabNavUpdate) -> Result<bool, TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        let unchanged = tab.url.as_deref() == Some(update.url.as_str())
            && tab.title == update.title
            && tab.can_go_back == update.can_go_back
            && tab.can_go_forward == update.can_go_forward
            && tab.loading == update.loading;
        if unchanged {
            return Ok(false);
        }

        tab.url = Some(update.url.clone());
        tab.title = update.title.clone();
        tab.can_go_back = update.can_go_back;
        tab.can_go_forward = update.can_go_forward;
        tab.loading = update.loading;
        Ok(true)
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn active_tab(&self) -> &Tab {
        self.tabs
            .iter()
            .find(|t| t.id == self.active_tab_id)
            .unwrap_or(&self.tabs[0])
    }

    fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    fn is_active(&self, tab_id: &str) -> bool {
        self.active_tab_id == tab_id
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
