use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::Duration;
use tracing::{error, info};

use crate::config::load_schema_file;
use crate::domain::Schema;

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Reloads the schema file whenever it changes on disk.
///
/// The parent directory is watched rather than the file so editors that
/// save by replacing the file are picked up too.
pub struct SchemaWatcher {
    _watcher: RecommendedWatcher,
}

impl SchemaWatcher {
    pub fn new<F>(path: PathBuf, on_reload: F) -> Result<Self>
    where
        F: Fn(Schema) + Send + 'static,
    {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let file_name = path.file_name().map(|n| n.to_os_string());

        let (tx, rx) = channel::<notify::Result<Event>>();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        info!("Watching schema file: {}", path.display());

        std::thread::spawn(move || loop {
            let event = match rx.recv() {
                Ok(Ok(event)) => event,
                Ok(Err(e)) => {
                    error!("Watch error: {:?}", e);
                    continue;
                }
                Err(_) => break,
            };

            let touches_schema = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if !touches_schema {
                continue;
            }

            // Swallow the burst of events a single save produces
            loop {
                match rx.recv_timeout(DEBOUNCE) {
                    Ok(_) => continue,
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }

            match load_schema_file(&path).and_then(|input| Ok(Schema::normalize(input)?)) {
                Ok(schema) => {
                    info!("Schema reloaded from {}", path.display());
                    on_reload(schema);
                }
                Err(e) => error!("Failed to reload schema, keeping previous version: {}", e),
            }
        });

        Ok(Self { _watcher: watcher })
    }
}
