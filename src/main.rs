//! keyshortcut-replay: drive a shortcut container from recorded keydowns
//!
//! Reads one JSON `KeyEventInit` per line on stdin, dispatches it through a
//! mounted `Shortcut` container and prints one JSON line per callback
//! invocation on stdout. The container wraps a small form fixture:
//! `input[type=text]`, `textarea` and `button`, addressable through the
//! event's `target` selector.
//!
//! Configuration comes from the environment, see `keyshortcut::config::env`.

mod lifecycle;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use keyshortcut::{
    Document, KeyEvent, KeyEventInit, OnKey, Platform, PlatformProbe, ReplayConfig, Shortcut,
    ShortcutConfig, UserAgent,
};

use lifecycle::ShutdownSignal;

/// One `on_key` call, as printed on stdout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Invocation {
    matched: String,
    key: String,
    default_prevented: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the invocations
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "keyshortcut-replay starting"
    );

    let config = ReplayConfig::load()?;
    info!(keys = ?config.keys, global = config.global, "configuration loaded");

    let platform: Arc<dyn PlatformProbe> = match &config.user_agent {
        Some(agent) => Arc::new(UserAgent::new(agent.clone())),
        None => Platform::detect(),
    };
    info!(mac_like = platform.is_mac_like(), "platform detected");

    // on_key may run on a debounce task, so invocations are funnelled back
    // to the main loop for printing
    let (invocation_tx, mut invocation_rx) = mpsc::unbounded_channel::<Invocation>();
    let on_key = OnKey::new(move |matched, event| {
        let invocation = Invocation {
            matched: matched.to_owned(),
            key: event.key.clone(),
            default_prevented: event.default_prevented(),
        };
        forward(&invocation_tx, invocation);
    });

    let document = Document::new();
    let mut shortcut = Shortcut::mount(&document, platform, None);
    let form = document.append(Some(shortcut.element()), "form", &[]);
    document.append(Some(&form), "input", &[("type", "text")]);
    document.append(Some(&form), "textarea", &[]);
    document.append(Some(&form), "button", &[]);

    let shortcut_config = ShortcutConfig::new(config.keys.clone(), on_key)
        .with_options(config.options.clone())
        .global(config.global);
    shortcut
        .render(&shortcut_config)
        .context("failed to configure shortcut")?;

    let mut shutdown = ShutdownSignal::new().context("failed to register signal handlers")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("reading keydown events from stdin");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read stdin")? {
                    Some(line) => replay_line(&document, &line),
                    None => {
                        debug!("stdin closed");
                        break;
                    }
                }
            }

            Some(invocation) = invocation_rx.recv() => {
                print_invocation(&invocation)?;
            }

            _ = shutdown.wait() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // Let the last debounced burst fire before tearing down
    if let Some(delay) = config.options.debounce_delay() {
        tokio::time::sleep(delay + Duration::from_millis(10)).await;
    }

    shortcut.unmount();

    while let Ok(invocation) = invocation_rx.try_recv() {
        print_invocation(&invocation)?;
    }

    info!("keyshortcut-replay stopped");

    Ok(())
}

/// Parse one line and dispatch it; bad lines are logged and skipped
fn replay_line(document: &Arc<Document>, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let init: KeyEventInit = match serde_json::from_str(line) {
        Ok(init) => init,
        Err(e) => {
            warn!(error = %e, line, "skipping malformed keydown");
            return;
        }
    };

    let target = match init.target.as_deref() {
        None => None,
        Some(selector) => match document.query(selector) {
            Ok(Some(element)) => Some(element),
            Ok(None) => {
                warn!(selector, "no element matches target, skipping keydown");
                return;
            }
            Err(e) => {
                warn!(selector, error = %e, "invalid target selector, skipping keydown");
                return;
            }
        },
    };

    let event = document.dispatch_keydown(KeyEvent::from_init(&init, target));
    debug!(%event, default_prevented = event.default_prevented(), "keydown replayed");
}

/// Hand an invocation to the output loop; false once the loop has stopped
fn forward(tx: &mpsc::UnboundedSender<Invocation>, invocation: Invocation) -> bool {
    match tx.send(invocation) {
        Ok(()) => true,
        Err(e) => {
            trace!(matched = %e.0.matched, "invocation dropped, output loop has stopped");
            false
        }
    }
}

fn print_invocation(invocation: &Invocation) -> Result<()> {
    let line = serde_json::to_string(invocation)?;
    println!("{line}");
    Ok(())
}
