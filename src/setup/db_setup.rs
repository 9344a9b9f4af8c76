use crate::models::db_operations::documents_db_operations::{CREATED_INDEX, DOCUMENTS, FIXED_DOCUMENTS};
use redb::{Database, CommitError, StorageError, TableError, TransactionError};
use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
}

pub fn setup_accounts_db(conn: &mut Connection) -> Result<(), SetupError> {
    let tx = conn.transaction()?;
    log::info!("Creating 'admins' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            last_login_time TEXT
        )",
        [],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn setup_documents_db(db: &Database) -> Result<(), SetupError> {
    let write_txn = db.begin_write()?;
    {
        log::info!("Creating 'documents' table in Redb...");
        write_txn.open_table(DOCUMENTS)?;

        log::info!("Creating 'created_index' table in Redb...");
        write_txn.open_table(CREATED_INDEX)?;

        log::info!("Creating 'fixed_documents' table in Redb...");
        write_txn.open_table(FIXED_DOCUMENTS)?;
    }
    write_txn.commit()?;
    Ok(())
}
