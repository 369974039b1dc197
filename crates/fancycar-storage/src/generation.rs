//! Generation registry storage using redb.
//!
//! Maps a client identifier to its car generation flag. The flag value `1`
//! marks an old-generation car; any other value marks a current-generation
//! car. A missing record means the client is not known to the registry.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::Result;

// Generation table: key = client id, value = generation flag
const GENERATION_TABLE: TableDefinition<&str, i64> = TableDefinition::new("generation");

/// Generation flag value marking an old-generation car.
pub const OLD_GENERATION: i64 = 1;

/// Generation registry store using redb.
///
/// Cloning is cheap and shares the underlying database handle; concurrent
/// readers never block each other.
#[derive(Clone)]
pub struct GenerationStore {
    db: Arc<Database>,
}

impl GenerationStore {
    /// Open or create a generation registry at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!("Opening generation registry at {}", path_ref.display());
        let db = Database::create(path_ref)?;

        // Make sure the table exists so read transactions on a fresh
        // database do not fail with TableDoesNotExist.
        let write_txn = db.begin_write()?;
        {
            let _table = write_txn.open_table(GENERATION_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Fetch the generation flag for a client, or `None` when no record exists.
    pub fn generation(&self, client_id: &str) -> Result<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GENERATION_TABLE)?;
        Ok(table.get(client_id)?.map(|guard| guard.value()))
    }

    /// Record the generation flag for a client, replacing any previous value.
    pub fn set_generation(&self, client_id: &str, generation: i64) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(GENERATION_TABLE)?;
            table.insert(client_id, generation)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove the record for a client. Returns whether a record existed.
    pub fn remove(&self, client_id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(GENERATION_TABLE)?;
            let removed = table.remove(client_id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// List all registered clients with their generation flags.
    pub fn list(&self) -> Result<Vec<(String, i64)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GENERATION_TABLE)?;

        let mut entries = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            entries.push((key.value().to_string(), value.value()));
        }
        Ok(entries)
    }
}
