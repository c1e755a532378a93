//! minibrowser RPC Server — JSON-RPC over stdin/stdout for the host shell UI.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tabs.create", "params":{"url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Surface commands the core issues (load, stop, ...) are emitted as
//! unsolicited events: {"event":"surface.command", "tabId":"...", ...}.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};

use minibrowser::app::BrowserShell;
use minibrowser::rpc_handler::handle_method;
use minibrowser::storage::SqliteStore;
use minibrowser::surface::{ContentSurface, SurfaceConfig, SurfaceFactory};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

/// The host process owns the real platform WebViews; this side only forwards
/// commands to it as NDJSON events on stdout.
struct RemoteSurface {
    tab_id: String,
}

impl RemoteSurface {
    fn emit(&self, command: &str, url: Option<&str>) {
        let mut event = json!({
            "event": "surface.command",
            "tabId": self.tab_id,
            "command": command,
        });
        if let Some(url) = url {
            event["url"] = json!(url);
        }
        println!("{}", event);
        let _ = io::stdout().flush();
    }
}

impl ContentSurface for RemoteSurface {
    fn load(&mut self, url: &str) {
        self.emit("load", Some(url));
    }
    fn go_back(&mut self) {
        self.emit("goBack", None);
    }
    fn go_forward(&mut self) {
        self.emit("goForward", None);
    }
    fn reload(&mut self) {
        self.emit("reload", None);
    }
    fn stop_loading(&mut self) {
        self.emit("stopLoading", None);
    }
    fn clear_cache(&mut self) {
        self.emit("clearCache", None);
    }
}

struct RemoteSurfaceFactory;

impl SurfaceFactory for RemoteSurfaceFactory {
    fn create_surface(&self, tab_id: &str, config: &SurfaceConfig) -> Box<dyn ContentSurface> {
        let event = json!({
            "event": "surface.create",
            "tabId": tab_id,
            "config": config,
        });
        println!("{}", event);
        let _ = io::stdout().flush();
        Box::new(RemoteSurface {
            tab_id: tab_id.to_string(),
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Absolute DB path: prefer MINIBROWSER_DATA_DIR, fallback to the
    // platform data directory.
    let data_dir = match std::env::var("MINIBROWSER_DATA_DIR") {
        Ok(dir) => std::path::PathBuf::from(dir),
        Err(_) => minibrowser::platform::get_data_dir(),
    };
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!(error = %e, "could not create data directory");
    }
    let db_path = data_dir.join("browser.db");
    let store = SqliteStore::open(&db_path).expect("Failed to open browser store");

    let shell = Mutex::new(BrowserShell::new(
        Box::new(store),
        Box::new(RemoteSurfaceFactory),
    ));

    // A cold-start deep link arrives as the first CLI argument.
    let initial_url = std::env::args().nth(1);
    {
        let mut s = shell.lock().expect("shell mutex poisoned at startup");
        s.startup(initial_url.as_deref());
    }

    // Signal ready
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    println!("{}", ready);
    io::stdout().flush().unwrap();

    // Rate limiting — max 200 RPC requests per second to prevent DoS
    let mut rate_limiter = RateLimiter::new(200);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let err = json!({"id": null, "error": format!("parse error: {}", e)});
                println!("{}", err);
                io::stdout().flush().unwrap();
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            let response = json!({"id": id, "error": "rate limit exceeded"});
            println!("{}", response);
            io::stdout().flush().unwrap();
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let result = handle_method(&shell, method, &params);

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        println!("{}", response);
        io::stdout().flush().unwrap();
    }

    // Host hung up; flush the session before exiting.
    if let Ok(mut s) = shell.lock() {
        s.shutdown();
    };
}
