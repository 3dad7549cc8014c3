//! Typed, reloadable view of one managed file.
//!
//! A [`LiveConfig`] migrates its file, loads it into a confique struct and
//! keeps the result as an immutable snapshot behind an [`Arc`]. Readers hold
//! on to whatever snapshot they fetched; [`reload`](LiveConfig::reload)
//! builds a new one and swaps it in whole, so nobody ever observes a
//! half-applied configuration.

use std::sync::{Arc, RwLock};

use confique::Config;
use tracing::{debug, warn};

use crate::builder::Migrator;
use crate::error::MigrateError;
use crate::ops::MigrationOutcome;

pub struct LiveConfig<C: Config> {
    migrator: Migrator,
    file: String,
    current: RwLock<Arc<C>>,
}

impl<C: Config> LiveConfig<C> {
    /// Migrate every managed file, then load `file` as `C`.
    pub fn open(migrator: Migrator, file: &str) -> Result<Self, MigrateError> {
        let snapshot = load::<C>(&migrator, file)?;
        Ok(Self {
            migrator,
            file: file.to_string(),
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The current snapshot.
    pub fn get(&self) -> Arc<C> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Migrate again and rebuild the snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// returned.
    pub fn reload(&self) -> Result<Arc<C>, MigrateError> {
        let fresh = match load::<C>(&self.migrator, &self.file) {
            Ok(config) => Arc::new(config),
            Err(e) => {
                if self.migrator.is_verbose() {
                    warn!("Reload of {} failed, keeping previous settings: {e}", self.file);
                } else {
                    debug!("Reload of {} failed, keeping previous settings: {e}", self.file);
                }
                return Err(e);
            }
        };
        let mut slot = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Arc::clone(&fresh);
        debug!("Reloaded {}", self.file);
        Ok(fresh)
    }

    pub fn migrator(&self) -> &Migrator {
        &self.migrator
    }
}

fn load<C: Config>(migrator: &Migrator, file: &str) -> Result<C, MigrateError> {
    if !migrator.files().iter().any(|f| f == file) {
        return Err(MigrateError::UnknownFile(file.to_string()));
    }
    for outcome in migrator.run() {
        if let MigrationOutcome::Untouched { file, reason } = &outcome {
            debug!("Loading {file} as-is: {reason}");
        }
    }
    let config = C::builder().file(migrator.path_of(file)).load()?;
    Ok(config)
}
