use std::sync::Arc;

use async_trait::async_trait;

use goaltrack_core::errors::Result;
use goaltrack_core::store::{Erased, StoreJob, TrackingStoreExecutor};

use crate::db::{get_connection, in_transaction, DbPool, TransactionMode, WriteHandle};
use crate::store::SqliteTrackingStore;

/// Runs store jobs against SQLite: reads on a pooled connection, writes on
/// the single writer actor.
#[derive(Clone)]
pub struct SqliteStoreExecutor {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteStoreExecutor {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TrackingStoreExecutor for SqliteStoreExecutor {
    fn read(&self, job: StoreJob) -> Result<Erased> {
        let mut conn = get_connection(&self.pool)?;
        in_transaction(&mut conn, TransactionMode::Deferred, |c| {
            job(&mut SqliteTrackingStore::new(c))
        })
    }

    async fn write(&self, job: StoreJob) -> Result<Erased> {
        self.writer
            .exec(move |conn| job(&mut SqliteTrackingStore::new(conn)))
            .await
    }
}
