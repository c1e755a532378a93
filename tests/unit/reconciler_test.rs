//! Unit tests for the Navigation Reconciler: active-tab gating, DNS-failure
//! recovery, the URL-scheme gate, and title derivation.

use std::sync::{Arc, Mutex};

use minibrowser::app::BrowserShell;
use minibrowser::reconciler::{fallback_url_from_intent, handle_surface_event, SurfaceSink};
use minibrowser::storage::gateway::{MemoryStore, KEY_TABS};
use minibrowser::surface::{
    ContentSurface, LoadDecision, NavigationState, SurfaceConfig, SurfaceEvent, SurfaceFactory,
    ERR_NAME_NOT_RESOLVED,
};
use serde_json::json;

/// Records every command the core issues, keyed by tab id.
#[derive(Clone, Default)]
struct CommandLog {
    commands: Arc<Mutex<Vec<(String, String)>>>,
}

impl CommandLog {
    fn push(&self, tab_id: &str, command: String) {
        self.commands
            .lock()
            .unwrap()
            .push((tab_id.to_string(), command));
    }

    fn for_tab(&self, tab_id: &str) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == tab_id)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

struct MockSurface {
    tab_id: String,
    log: CommandLog,
}

impl ContentSurface for MockSurface {
    fn load(&mut self, url: &str) {
        self.log.push(&self.tab_id, format!("load {}", url));
    }
    fn go_back(&mut self) {
        self.log.push(&self.tab_id, "goBack".to_string());
    }
    fn go_forward(&mut self) {
        self.log.push(&self.tab_id, "goForward".to_string());
    }
    fn reload(&mut self) {
        self.log.push(&self.tab_id, "reload".to_string());
    }
    fn stop_loading(&mut self) {
        self.log.push(&self.tab_id, "stopLoading".to_string());
    }
    fn clear_cache(&mut self) {
        self.log.push(&self.tab_id, "clearCache".to_string());
    }
}

struct MockFactory {
    log: CommandLog,
}

impl SurfaceFactory for MockFactory {
    fn create_surface(&self, tab_id: &str, _config: &SurfaceConfig) -> Box<dyn ContentSurface> {
        Box::new(MockSurface {
            tab_id: tab_id.to_string(),
            log: self.log.clone(),
        })
    }
}

fn shell_with_log() -> (BrowserShell, MemoryStore, CommandLog) {
    let store = MemoryStore::new();
    let log = CommandLog::default();
    let mut shell = BrowserShell::new(
        Box::new(store.clone()),
        Box::new(MockFactory { log: log.clone() }),
    );
    shell.startup(None);
    (shell, store, log)
}

fn nav(url: &str, title: &str, loading: bool) -> NavigationState {
    NavigationState {
        url: url.to_string(),
        title: title.to_string(),
        can_go_back: true,
        can_go_forward: false,
        loading,
    }
}

// Gating property, active side: a finished load on the active tab updates
// the address bar, back/forward state, and the history ledger.
#[test]
fn test_active_tab_event_drives_chrome_and_history() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://e.com"));

    shell.on_navigation_state_change(&active, &nav("https://e.com", "", false));

    assert_eq!(shell.chrome().input_url, "e.com");
    assert_eq!(shell.chrome().active_url.as_deref(), Some("https://e.com"));
    assert!(shell.chrome().can_go_back);
    assert!(!shell.chrome().loading);
    assert_eq!(shell.history_items().len(), 1);
    assert_eq!(shell.history_items()[0].url, "https://e.com");
    assert_eq!(shell.history_items()[0].title, "e.com");
}

// Gating property, background side: the same event on a background tab must
// not move the address bar, the history ledger, or back/forward state.
#[test]
fn test_background_tab_event_never_touches_chrome() {
    let (mut shell, _, _) = shell_with_log();
    let background = shell.create_tab(Some("https://b.com"));
    let active = shell.create_tab(Some("https://a.com"));
    shell.on_navigation_state_change(&active, &nav("https://a.com", "A", false));

    let chrome_before = shell.chrome().clone();
    let history_before = shell.history_items().len();

    shell.on_navigation_state_change(&background, &nav("https://b.com/done", "B", false));

    assert_eq!(*shell.chrome(), chrome_before);
    assert_eq!(shell.history_items().len(), history_before);

    // The background tab's own record did move.
    let tab = shell.tabs().iter().find(|t| t.id == background).unwrap();
    assert_eq!(tab.url.as_deref(), Some("https://b.com/done"));
    assert_eq!(tab.title, "B");
}

#[test]
fn test_background_progress_and_load_events_are_ignored() {
    let (mut shell, _, _) = shell_with_log();
    let background = shell.create_tab(Some("https://b.com"));
    let _active = shell.create_tab(Some("https://a.com"));

    shell.on_load_start(&background);
    assert!(!shell.chrome().loading);

    shell.on_load_progress(&background, 0.7);
    assert_ne!(shell.chrome().progress, 0.7);

    shell.on_load_end(&background);
    assert!(!shell.chrome().loading);
}

#[test]
fn test_active_load_lifecycle_drives_progress() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));

    shell.on_load_start(&active);
    assert!(shell.chrome().loading);
    assert_eq!(shell.chrome().progress, 0.1);

    shell.on_load_progress(&active, 0.6);
    assert_eq!(shell.chrome().progress, 0.6);

    shell.on_load_end(&active);
    assert!(!shell.chrome().loading);
    assert_eq!(shell.chrome().progress, 1.0);
}

#[test]
fn test_focused_address_bar_is_not_overwritten() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));
    shell.set_address_focused(true);

    shell.on_navigation_state_change(&active, &nav("https://a.com/next", "Next", false));

    // Mid-edit text survives; back/forward state still mirrors.
    assert_eq!(shell.chrome().input_url, "a.com");
    assert!(shell.chrome().can_go_back);

    shell.set_address_focused(false);
    shell.on_navigation_state_change(&active, &nav("https://a.com/after", "After", false));
    assert_eq!(shell.chrome().input_url, "a.com");
    assert_eq!(
        shell.chrome().active_url.as_deref(),
        Some("https://a.com/after")
    );
}

#[test]
fn test_url_shaped_titles_are_replaced_by_host() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://e.com"));

    // Surfaces report the raw URL as the title early in a load.
    shell.on_navigation_state_change(&active, &nav("https://e.com/page", "https://e.com/page", true));
    assert_eq!(shell.active_tab().title, "e.com");

    shell.on_navigation_state_change(&active, &nav("https://e.com/page", "Real Title", false));
    assert_eq!(shell.active_tab().title, "Real Title");
}

#[test]
fn test_about_blank_never_reaches_history() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("about:blank"));
    shell.on_navigation_state_change(&active, &nav("about:blank", "", false));
    assert!(shell.history_items().is_empty());
}

#[test]
fn test_identical_snapshot_is_a_full_noop() {
    let (mut shell, store, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));

    shell.on_navigation_state_change(&active, &nav("https://a.com", "A", false));
    shell.flush_storage();
    let persisted = store.snapshot(KEY_TABS);
    let history_len = shell.history_items().len();

    // Same snapshot again: no history growth, no new persisted record shape.
    shell.on_navigation_state_change(&active, &nav("https://a.com", "A", false));
    shell.flush_storage();

    assert_eq!(shell.history_items().len(), history_len);
    assert_eq!(store.snapshot(KEY_TABS), persisted);
}

// Scenario: background tab B hits a DNS failure. B's stored URL becomes a
// search URL; the active tab's address bar does not move.
#[test]
fn test_background_dns_failure_redirects_silently() {
    let (mut shell, _, log) = shell_with_log();
    let background = shell.create_tab(Some("https://typo"));
    let active = shell.create_tab(Some("https://a.com"));
    shell.on_navigation_state_change(&active, &nav("https://a.com", "A", false));

    shell.on_error(
        &background,
        ERR_NAME_NOT_RESOLVED,
        "net::ERR_NAME_NOT_RESOLVED",
        Some("https://typo"),
    );

    let tab = shell.tabs().iter().find(|t| t.id == background).unwrap();
    let redirected = tab.url.clone().unwrap();
    assert!(redirected.starts_with("https://www.google.com/search?q="));
    assert!(redirected.contains("typo"));

    // The background surface was told to load the search page.
    assert!(log
        .for_tab(&background)
        .iter()
        .any(|c| c.starts_with("load https://www.google.com/search")));

    // Foreground chrome untouched.
    assert_eq!(shell.chrome().input_url, "a.com");
    assert_eq!(shell.chrome().active_url.as_deref(), Some("https://a.com"));
}

#[test]
fn test_active_dns_failure_updates_chrome() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://typo/"));

    shell.on_error(&active, -2, "net::ERR_NAME_NOT_RESOLVED", Some("https://typo/"));

    assert!(!shell.chrome().loading);
    assert_eq!(shell.chrome().input_url, "typo");
    assert!(shell
        .chrome()
        .active_url
        .as_deref()
        .unwrap()
        .starts_with("https://www.google.com/search?q="));
}

#[test]
fn test_dns_failure_on_search_url_does_not_loop() {
    let (mut shell, _, _) = shell_with_log();
    let failing = "https://www.google.com/search?q=typo";
    let active = shell.create_tab(Some(failing));

    shell.on_error(&active, -2, "net::ERR_NAME_NOT_RESOLVED", Some(failing));

    assert_eq!(shell.active_tab().url.as_deref(), Some(failing));
}

#[test]
fn test_non_dns_errors_are_left_to_the_surface() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));

    shell.on_error(&active, -6, "net::ERR_CONNECTION_REFUSED", Some("https://a.com"));

    assert_eq!(shell.active_tab().url.as_deref(), Some("https://a.com"));
    assert!(!shell.chrome().loading);
}

#[test]
fn test_should_start_load_allows_web_schemes() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));

    for url in [
        "https://other.com",
        "http://plain.com",
        "about:blank",
        "blob:https://a.com/123",
        "data:text/html,hello",
    ] {
        assert_eq!(
            shell.should_start_load(&active, url),
            LoadDecision::Allow,
            "{}",
            url
        );
    }
}

#[test]
fn test_should_start_load_upgrades_http_under_https_only() {
    let (mut shell, _, log) = shell_with_log();
    shell.set_setting("httpsOnly", json!(true)).unwrap();
    let active = shell.create_tab(Some("https://a.com"));

    let decision = shell.should_start_load(&active, "http://insecure.com/page");

    assert_eq!(decision, LoadDecision::Cancel);
    assert_eq!(
        shell.active_tab().url.as_deref(),
        Some("https://insecure.com/page")
    );
    assert_eq!(shell.chrome().input_url, "insecure.com");
    assert!(log
        .for_tab(&active)
        .iter()
        .any(|c| c == "load https://insecure.com/page"));
}

#[test]
fn test_https_upgrade_on_background_tab_leaves_chrome_alone() {
    let (mut shell, _, _) = shell_with_log();
    shell.set_setting("httpsOnly", json!(true)).unwrap();
    let background = shell.create_tab(Some("https://b.com"));
    let _active = shell.create_tab(Some("https://a.com"));
    let chrome_before = shell.chrome().clone();

    let decision = shell.should_start_load(&background, "http://b.com/next");

    assert_eq!(decision, LoadDecision::Cancel);
    let tab = shell.tabs().iter().find(|t| t.id == background).unwrap();
    assert_eq!(tab.url.as_deref(), Some("https://b.com/next"));
    assert_eq!(*shell.chrome(), chrome_before);
}

#[test]
fn test_should_start_load_intercepts_app_scheme() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));
    let tabs_before = shell.tabs().len();

    let decision = shell.should_start_load(&active, "minibrowser://example.com/shared");

    assert_eq!(decision, LoadDecision::Cancel);
    assert_eq!(shell.tabs().len(), tabs_before + 1);
    assert_eq!(
        shell.active_tab().url.as_deref(),
        Some("https://example.com/shared")
    );
}

#[test]
fn test_should_start_load_defers_os_schemes() {
    let (mut shell, _, _) = shell_with_log();
    let active = shell.create_tab(Some("https://a.com"));

    match shell.should_start_load(&active, "tel:+15550100") {
        LoadDecision::OpenExternal { url, fallback_url } => {
            assert_eq!(url, "tel:+15550100");
            assert_eq!(fallback_url, None);
        }
        other => panic!("expected OpenExternal, got {:?}", other),
    }
}

#[test]
fn test_intent_fallback_url_extraction() {
    let intent = "intent://scan/#Intent;scheme=zxing;package=com.example;\
                  S.browser_fallback_url=https%3A%2F%2Fexample.com%2Fget;end";
    assert_eq!(
        fallback_url_from_intent(intent),
        Some("https://example.com/get".to_string())
    );
    assert_eq!(fallback_url_from_intent("intent://scan/#Intent;scheme=x;end"), None);
    assert_eq!(fallback_url_from_intent("tel:+15550100"), None);
}

#[test]
fn test_late_event_for_deleted_tab_is_harmless() {
    let (mut shell, _, _) = shell_with_log();
    let doomed = shell.create_tab(Some("https://doomed.com"));
    let active = shell.create_tab(Some("https://a.com"));
    shell.delete_tab(&doomed).unwrap();

    shell.on_navigation_state_change(&doomed, &nav("https://doomed.com/late", "Late", false));

    assert!(shell.tabs().iter().all(|t| t.id != doomed));
    assert_eq!(shell.active_tab_id(), active);
    assert!(shell.history_items().is_empty());
}

#[test]
fn test_delete_tab_stops_surface_before_release() {
    let (mut shell, _, log) = shell_with_log();
    let doomed = shell.create_tab(Some("https://doomed.com"));
    shell.create_tab(Some("https://a.com"));

    shell.delete_tab(&doomed).unwrap();

    assert_eq!(log.for_tab(&doomed), vec!["stopLoading".to_string()]);
    assert!(!shell.has_surface(&doomed));
}

#[test]
fn test_sink_dispatch_routes_events() {
    let store = MemoryStore::new();
    let log = CommandLog::default();
    let shell = Arc::new(Mutex::new(BrowserShell::new(
        Box::new(store),
        Box::new(MockFactory { log }),
    )));
    let active = {
        let mut s = shell.lock().unwrap();
        s.startup(None);
        s.create_tab(Some("https://a.com"))
    };

    let sink = SurfaceSink::new(shell.clone(), active.clone());
    assert_eq!(sink.tab_id(), active);

    sink.dispatch(SurfaceEvent::LoadStart);
    sink.dispatch(SurfaceEvent::NavigationStateChange(nav(
        "https://a.com",
        "A",
        false,
    )));
    handle_surface_event(&shell, &active, SurfaceEvent::LoadEnd);

    let s = shell.lock().unwrap();
    assert_eq!(s.chrome().input_url, "a.com");
    assert_eq!(s.history_items().len(), 1);
    assert!(!s.chrome().loading);
}
