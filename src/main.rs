//! Application entry point — headless custom sound router.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk; on first run, write the defaults out.
//! 3. Open the JSON key-value store (in-memory if it cannot be opened) and
//!    load router state from it.
//! 4. Build the session: router + interception shim + asset loader.
//! 5. Spawn the stdin reader thread, which parses one command per line.
//! 6. Run the session loop on a current-thread tokio runtime until `quit`
//!    or end of input, printing every notification as it is produced.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use custom_sound::{
    config::{AppConfig, AppPaths},
    control::{parse_command, Command, FileAssetLoader, ParseError, Session},
    intercept::{InterceptionShim, LogPlayer},
    notify::{Notification, Notifier},
    router::Router,
    store::{JsonFileStore, KeyValueStore, MemoryStore},
};

const NOTICE_PREFIX: &str = "[Custom Sound]";

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

/// Executes commands in arrival order; the session is the only writer of
/// router state.
async fn run_session(
    mut session: Session,
    mut command_rx: mpsc::Receiver<Command>,
    mut notify_rx: mpsc::UnboundedReceiver<Notification>,
) {
    while let Some(command) = command_rx.recv().await {
        let keep_going = session.execute(command).await;

        while let Ok(notification) = notify_rx.try_recv() {
            println!("{NOTICE_PREFIX} {notification}");
        }

        if !keep_going {
            break;
        }
    }
    log::info!("Session finished");
}

// ---------------------------------------------------------------------------
// stdin reader
// ---------------------------------------------------------------------------

fn read_commands(command_tx: mpsc::Sender<Command>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("stdin read failed: {e}");
                break;
            }
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => Command::Invalid {
                input: line.trim().to_string(),
                reason: e.to_string(),
            },
        };
        if command_tx.blocking_send(command).is_err() {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Custom sound router starting up");

    // 2. Configuration
    let paths = AppPaths::new();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if !paths.settings_file.exists() {
        match config.save() {
            Ok(()) => log::info!("Wrote default config to {}", paths.settings_file.display()),
            Err(e) => log::warn!("Could not write default config: {e}"),
        }
    }

    // 3. Store + router state
    let store_file = config.storage.resolve_store_file(&paths);
    let store: Box<dyn KeyValueStore> = match JsonFileStore::open(&store_file) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!(
                "Could not open store {} ({e}); changes will not persist",
                store_file.display()
            );
            Box::new(MemoryStore::new())
        }
    };
    let router = Router::open(store, config.storage.keys(), config.router.categories())
        .context("loading router state")?
        .with_window(config.router.fingerprint);

    // 4. Session
    let (notifier, notify_rx) = Notifier::channel();
    let session = Session::new(
        router,
        InterceptionShim::new(Arc::new(LogPlayer)),
        Arc::new(FileAssetLoader),
        notifier,
    );

    // 5. stdin reader thread
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    std::thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || read_commands(command_tx))
        .context("failed to spawn stdin reader thread")?;

    // 6. Session loop
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    rt.block_on(run_session(session, command_rx, notify_rx));

    Ok(())
}
