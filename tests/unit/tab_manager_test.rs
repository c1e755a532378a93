use minibrowser::managers::tab_manager::{TabManager, TabManagerTrait};
use minibrowser::types::tab::{Tab, TabNavUpdate};

#[test]
fn test_fresh_registry_has_one_blank_active_tab() {
    let mgr = TabManager::new();
    assert_eq!(mgr.tab_count(), 1);
    let tab = mgr.active_tab();
    assert_eq!(tab.url, None);
    assert_eq!(tab.title, Tab::DEFAULT_TITLE);
}

#[test]
fn test_create_tab_returns_unique_ids() {
    let mut mgr = TabManager::new();
    let id1 = mgr.create_tab(None);
    let id2 = mgr.create_tab(None);
    let id3 = mgr.create_tab(None);
    assert_ne!(id1, id2);
    assert_ne!(id2, id3);
    assert_eq!(mgr.tab_count(), 4);
}

#[test]
fn test_ids_are_creation_ordered() {
    let mut mgr = TabManager::new();
    let id1: u64 = mgr.create_tab(None).parse().unwrap();
    let id2: u64 = mgr.create_tab(None).parse().unwrap();
    assert!(id2 > id1, "later tab must get a larger time-based id");
}

// Scenario: one blank tab, then create_tab with a URL. The new tab goes to
// the front and becomes active; the old tab is untouched.
#[test]
fn test_create_tab_inserts_front_and_activates() {
    let mut mgr = TabManager::new();
    let old_id = mgr.active_tab_id().to_string();

    let new_id = mgr.create_tab(Some("https://x.com"));

    assert_eq!(mgr.tab_count(), 2);
    assert_eq!(mgr.tabs()[0].id, new_id);
    assert_eq!(mgr.active_tab_id(), new_id);
    assert_eq!(mgr.tabs()[0].url.as_deref(), Some("https://x.com"));

    let old = mgr.get_tab(&old_id).unwrap();
    assert_eq!(old.url, None);
    assert_eq!(old.title, Tab::DEFAULT_TITLE);
}

#[test]
fn test_switch_to_changes_active() {
    let mut mgr = TabManager::new();
    let first = mgr.active_tab_id().to_string();
    let second = mgr.create_tab(None);
    assert_eq!(mgr.active_tab_id(), second);

    let changed = mgr.switch_to(&first).unwrap();
    assert!(changed);
    assert_eq!(mgr.active_tab_id(), first);
}

#[test]
fn test_switch_to_current_tab_is_noop() {
    let mut mgr = TabManager::new();
    let id = mgr.active_tab_id().to_string();
    let changed = mgr.switch_to(&id).unwrap();
    assert!(!changed, "switching to the active tab must report no change");
}

#[test]
fn test_switch_to_unknown_tab_errors() {
    let mut mgr = TabManager::new();
    assert!(mgr.switch_to("nonexistent").is_err());
}

// Scenario: delete the sole tab. The registry heals with exactly one fresh
// blank tab, newly active.
#[test]
fn test_delete_sole_tab_heals_registry() {
    let mut mgr = TabManager::new();
    let only = mgr.create_tab(Some("https://a.com"));
    // Remove the seed blank so "https://a.com" is the sole tab.
    let seed = mgr.tabs()[1].id.clone();
    mgr.delete_tab(&seed).unwrap();
    assert_eq!(mgr.tab_count(), 1);

    mgr.delete_tab(&only).unwrap();

    assert_eq!(mgr.tab_count(), 1);
    let fresh = mgr.active_tab();
    assert_ne!(fresh.id, only);
    assert_eq!(fresh.url, None);
    assert_eq!(fresh.title, Tab::DEFAULT_TITLE);
}

// Delete-neighbor policy: activation moves to the tab now occupying the
// deleted index (same-position-or-last).
#[test]
fn test_delete_active_tab_activates_same_position() {
    let mut mgr = TabManager::new();
    let c = mgr.create_tab(None);
    let b = mgr.create_tab(None);
    let a = mgr.create_tab(None);
    // Order: [a, b, c, seed]; active = a.
    assert_eq!(mgr.active_tab_id(), a);

    mgr.delete_tab(&a).unwrap();
    // b slid into index 0.
    assert_eq!(mgr.active_tab_id(), b);
    let _ = c;
}

#[test]
fn test_delete_active_tab_at_end_activates_last() {
    let mut mgr = TabManager::new();
    let seed = mgr.active_tab_id().to_string();
    let b = mgr.create_tab(None);
    let _a = mgr.create_tab(None);
    // Order: [a, b, seed]; make the last tab active, then delete it.
    mgr.switch_to(&seed).unwrap();
    mgr.delete_tab(&seed).unwrap();
    assert_eq!(
        mgr.active_tab_id(),
        b,
        "deleting the last tab activates the new last"
    );
}

#[test]
fn test_delete_background_tab_keeps_active() {
    let mut mgr = TabManager::new();
    let background = mgr.create_tab(None);
    let active = mgr.create_tab(None);

    let active_changed = mgr.delete_tab(&background).unwrap();
    assert!(!active_changed);
    assert_eq!(mgr.active_tab_id(), active);
}

#[test]
fn test_delete_unknown_tab_errors() {
    let mut mgr = TabManager::new();
    assert!(mgr.delete_tab("nonexistent").is_err());
}

#[test]
fn test_ids_stay_unique_through_churn() {
    let mut mgr = TabManager::new();
    for _ in 0..20 {
        mgr.create_tab(None);
    }
    for _ in 0..10 {
        let id = mgr.tabs()[0].id.clone();
        mgr.delete_tab(&id).unwrap();
    }
    let mut ids: Vec<&str> = mgr.tabs().iter().map(|t| t.id.as_str()).collect();
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before, "registry ids must stay unique");
}

#[test]
fn test_rename_tab_is_pure_metadata() {
    let mut mgr = TabManager::new();
    let id = mgr.create_tab(Some("https://example.com"));
    mgr.rename_tab(&id, "Work", false).unwrap();

    let tab = mgr.get_tab(&id).unwrap();
    assert_eq!(tab.title, "Work");
    assert!(!tab.show_logo);
    assert_eq!(tab.url.as_deref(), Some("https://example.com"));
}

#[test]
fn test_go_home_clears_url_and_title() {
    let mut mgr = TabManager::new();
    let id = mgr.create_tab(Some("https://example.com"));
    let update = TabNavUpdate {
        url: "https://example.com".to_string(),
        title: "Example".to_string(),
        can_go_back: true,
        can_go_forward: false,
        loading: false,
    };
    mgr.apply_nav_state(&id, &update).unwrap();

    mgr.go_home(&id).unwrap();

    let tab = mgr.get_tab(&id).unwrap();
    assert_eq!(tab.url, None);
    assert_eq!(tab.title, Tab::DEFAULT_TITLE);
    assert!(!tab.can_go_back);
    assert!(!tab.loading);
    assert_eq!(mgr.tab_count(), 2, "go_home must not delete the tab");
}

#[test]
fn test_apply_nav_state_reports_no_change_for_identical_snapshot() {
    let mut mgr = TabManager::new();
    let id = mgr.create_tab(Some("https://example.com"));
    let update = TabNavUpdate {
        url: "https://example.com".to_string(),
        title: "Example".to_string(),
        can_go_back: false,
        can_go_forward: false,
        loading: false,
    };

    assert!(mgr.apply_nav_state(&id, &update).unwrap());
    assert!(
        !mgr.apply_nav_state(&id, &update).unwrap(),
        "an identical snapshot must be a no-op"
    );
}

#[test]
fn test_restore_prefers_saved_active_id() {
    let mut mgr = TabManager::new();
    let tabs = vec![
        Tab::with_url("100".to_string(), "https://a.com"),
        Tab::with_url("200".to_string(), "https://b.com"),
    ];
    mgr.restore(tabs, Some("200"));
    assert_eq!(mgr.active_tab_id(), "200");
    assert_eq!(mgr.tab_count(), 2);
}

#[test]
fn test_restore_falls_back_to_first_tab_with_url() {
    let mut mgr = TabManager::new();
    let tabs = vec![
        Tab::blank("100".to_string()),
        Tab::with_url("200".to_string(), "https://b.com"),
    ];
    mgr.restore(tabs, Some("999"));
    assert_eq!(mgr.active_tab_id(), "200");
}

#[test]
fn test_restore_falls_back_to_first_tab() {
    let mut mgr = TabManager::new();
    let tabs = vec![Tab::blank("100".to_string()), Tab::blank("200".to_string())];
    mgr.restore(tabs, None);
    assert_eq!(mgr.active_tab_id(), "100");
}

#[test]
fn test_restore_empty_heals_with_blank_tab() {
    let mut mgr = TabManager::new();
    mgr.restore(Vec::new(), Some("anything"));
    assert_eq!(mgr.tab_count(), 1);
    assert_eq!(mgr.active_tab().url, None);
}

#[test]
fn test_restore_with_external_prepends_and_keeps_rest() {
    let mut mgr = TabManager::new();
    let rest = vec![Tab::with_url("100".to_string(), "https://a.com")];
    let ext = mgr.restore_with_external("https://shared.example/post", rest);

    assert_eq!(mgr.tab_count(), 2);
    assert_eq!(mgr.tabs()[0].id, ext);
    assert_eq!(mgr.active_tab_id(), ext);
    assert_eq!(mgr.tabs()[0].title, Tab::EXTERNAL_TITLE);
    assert!(!mgr.tabs()[0].show_logo);
    assert_eq!(mgr.tabs()[1].url.as_deref(), Some("https://a.com"));
}

#[test]
fn test_restore_with_external_over_empty_storage_yields_one_tab() {
    let mut mgr = TabManager::new();
    mgr.restore_with_external("https://shared.example", Vec::new());
    assert_eq!(mgr.tab_count(), 1);
    assert_eq!(
        mgr.active_tab().url.as_deref(),
        Some("https://shared.example")
    );
}
