//! RPC method handler for the minibrowser sidecar protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches method calls from the host UI
//! process onto the [`BrowserShell`]: tab/history/settings actions flow in
//! as requests, and content-surface events arrive as `surface.event` calls
//! tagged with their tab id.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::BrowserShell;
use crate::reconciler;
use crate::surface::{friendly_resource_names, SurfaceEvent};
use crate::types::history::ClearRange;
use crate::urls;

/// Dispatch a method call to the appropriate shell operation.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(shell: &Mutex<BrowserShell>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Tabs ───
        "tabs.create" => {
            let url = params.get("url").and_then(|v| v.as_str());
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            let id = s.create_tab(url);
            Ok(json!({"id": id}))
        }
        "tabs.list" => {
            let s = shell.lock().map_err(|e| e.to_string())?;
            let active = s.active_tab_id().to_string();
            let arr: Vec<Value> = s
                .tabs()
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "url": t.url,
                        "title": t.title,
                        "showLogo": t.show_logo,
                        "faviconUrl": t.url.as_deref().and_then(urls::favicon_url),
                        "loading": t.loading,
                        "canGoBack": t.can_go_back,
                        "canGoForward": t.can_go_forward,
                        "active": t.id == active,
                    })
                })
                .collect();
            Ok(json!(arr))
        }
        "tabs.switch" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.switch_to(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tabs.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.delete_tab(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "activeTabId": s.active_tab_id()}))
        }
        "tabs.rename" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let title = params.get("title").and_then(|v| v.as_str()).ok_or("missing title")?;
            let show_logo = params.get("showLogo").and_then(|v| v.as_bool()).unwrap_or(true);
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.rename_tab(id, title, show_logo).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tabs.home" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.go_home(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Address bar / chrome ───
        "address.submit" => {
            let text = params.get("text").and_then(|v| v.as_str()).ok_or("missing text")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.submit_address(text);
            Ok(json!({"ok": true, "url": s.chrome().active_url}))
        }
        "address.setFocused" => {
            let focused = params
                .get("focused")
                .and_then(|v| v.as_bool())
                .ok_or("missing focused")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.set_address_focused(focused);
            Ok(json!({"ok": true}))
        }
        "chrome.get" => {
            let s = shell.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(s.chrome()).map_err(|e| e.to_string())
        }

        // ─── Navigation commands ───
        "nav.back" => {
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.go_back();
            Ok(json!({"ok": true}))
        }
        "nav.forward" => {
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.go_forward();
            Ok(json!({"ok": true}))
        }
        "nav.reload" => {
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.reload();
            Ok(json!({"ok": true}))
        }
        "nav.stop" => {
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.stop_loading();
            Ok(json!({"ok": true}))
        }
        "nav.clearCache" => {
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.clear_cache();
            Ok(json!({"ok": true}))
        }

        // ─── History ───
        "history.list" => {
            let s = shell.lock().map_err(|e| e.to_string())?;
            let arr: Vec<Value> = s
                .history_items()
                .iter()
                .map(|h| json!({"id": h.id, "url": h.url, "title": h.title, "timestamp": h.timestamp}))
                .collect();
            Ok(json!(arr))
        }
        "history.search" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let s = shell.lock().map_err(|e| e.to_string())?;
            let arr: Vec<Value> = s
                .search_history(query)
                .iter()
                .map(|h| json!({"id": h.id, "url": h.url, "title": h.title, "timestamp": h.timestamp}))
                .collect();
            Ok(json!(arr))
        }
        "history.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.delete_history_item(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "history.clear" => {
            let millis = params
                .get("maxAgeMs")
                .and_then(|v| v.as_i64())
                .ok_or("missing maxAgeMs")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            let removed = s.clear_history(ClearRange::from_millis(millis));
            Ok(json!({"ok": true, "removed": removed}))
        }

        // ─── Settings ───
        "settings.get" => {
            let s = shell.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(s.settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.reset_settings();
            Ok(json!({"ok": true}))
        }

        // ─── Deep links ───
        "deeplink.open" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            s.handle_deep_link(url);
            Ok(json!({"ok": true, "activeTabId": s.active_tab_id()}))
        }

        // ─── Surface ingress ───
        "surface.event" => {
            let tab_id = params
                .get("tabId")
                .and_then(|v| v.as_str())
                .ok_or("missing tabId")?
                .to_string();
            let event: SurfaceEvent = params
                .get("event")
                .cloned()
                .ok_or_else(|| "missing event".to_string())
                .and_then(|v| {
                    serde_json::from_value(v).map_err(|e| format!("malformed event: {}", e))
                })?;
            reconciler::handle_surface_event(shell, &tab_id, event);
            Ok(json!({"ok": true}))
        }
        "surface.shouldStartLoad" => {
            let tab_id = params
                .get("tabId")
                .and_then(|v| v.as_str())
                .ok_or("missing tabId")?;
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let mut s = shell.lock().map_err(|e| e.to_string())?;
            let decision = s.should_start_load(tab_id, url);
            serde_json::to_value(decision).map_err(|e| e.to_string())
        }

        "surface.describePermission" => {
            let resources: Vec<String> = params
                .get("resources")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok())
                .ok_or("missing resources")?;
            Ok(json!({"summary": friendly_resource_names(&resources)}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
