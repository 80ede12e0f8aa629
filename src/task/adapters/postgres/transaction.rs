//! Transaction unit: one database transaction per store operation.
//!
//! [`TransactionUnit`] is a guard. It begins a transaction on creation and
//! rolls it back when dropped unless [`TransactionUnit::commit`] consumed it
//! first, so every early return through `?` leaves nothing behind. The
//! isolation level is the server default.

use crate::task::ports::{TaskStoreError, TaskStoreResult};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use tracing::warn;

type Manager = AnsiTransactionManager;

/// Guard over an open transaction on a borrowed connection.
pub struct TransactionUnit<'conn> {
    connection: &'conn mut PgConnection,
    open: bool,
}

impl<'conn> TransactionUnit<'conn> {
    /// Begins a transaction on `connection`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transaction`] when `BEGIN` fails.
    pub fn begin(connection: &'conn mut PgConnection) -> TaskStoreResult<Self> {
        <Manager as TransactionManager<PgConnection>>::begin_transaction(connection)
            .map_err(TaskStoreError::transaction)?;
        Ok(Self {
            connection,
            open: true,
        })
    }

    /// Returns the connection statements of this unit must run on.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut *self.connection
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transaction`] when `COMMIT` fails; the
    /// database has then discarded the transaction's writes.
    pub fn commit(mut self) -> TaskStoreResult<()> {
        self.open = false;
        <Manager as TransactionManager<PgConnection>>::commit_transaction(&mut *self.connection)
            .map_err(TaskStoreError::transaction)
    }
}

impl Drop for TransactionUnit<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) =
            <Manager as TransactionManager<PgConnection>>::rollback_transaction(&mut *self.connection)
        {
            // The pool discards connections whose transaction manager is broken.
            warn!(error = %err, "rollback of abandoned transaction failed");
        }
    }
}

impl std::fmt::Debug for TransactionUnit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionUnit")
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}
