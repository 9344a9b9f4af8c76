use redb::{Database, DatabaseError, ReadableTable, TableDefinition, CommitError, StorageError, TableError, TransactionError};
use crate::models::Collection;
use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Redb database error: {0}")]
    RedbDatabase(#[from] DatabaseError),
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("UUID parse error: {0}")]
    Uuid(#[from] uuid::Error),
    #[error("Item not found in database: {0}")]
    NotFound(String),
}

// (collection, document id) -> document JSON
pub const DOCUMENTS: TableDefinition<(&str, &[u8; 16]), &str> = TableDefinition::new("documents");
// (collection, createdAt millis, document id); newest-first listings walk this backwards
pub const CREATED_INDEX: TableDefinition<(&str, i64, &[u8; 16]), ()> = TableDefinition::new("created_index");
// fixed key (e.g. "about/what_we_do") -> document JSON
pub const FIXED_DOCUMENTS: TableDefinition<&str, &str> = TableDefinition::new("fixed_documents");

const LOWEST_ID: [u8; 16] = [0u8; 16];
const HIGHEST_ID: [u8; 16] = [255u8; 16];

/// Opens the documents database, creating the file if needed.
pub fn open_documents_db(path: &Path) -> Result<Database, DbError> {
    Ok(Database::create(path)?)
}

pub fn insert_document(
    db: &Database,
    collection: Collection,
    created_at: DateTime<Utc>,
    json: &str,
) -> Result<String, DbError> {
    let document_uuid = Uuid::new_v4();
    let id_bytes = document_uuid.into_bytes();
    let name = collection.name();

    let write_txn = db.begin_write()?;
    {
        let mut documents = write_txn.open_table(DOCUMENTS)?;
        let mut index = write_txn.open_table(CREATED_INDEX)?;
        documents.insert((name, &id_bytes), json)?;
        index.insert((name, created_at.timestamp_millis(), &id_bytes), ())?;
    }
    write_txn.commit()?;

    Ok(document_uuid.to_string())
}

/// Overwrites an existing document. The chronological index entry is kept,
/// so callers must carry the original `createdAt` over.
pub fn replace_document(db: &Database, collection: Collection, id: &str, json: &str) -> Result<(), DbError> {
    let id_bytes = Uuid::parse_str(id)?.into_bytes();
    let name = collection.name();

    let write_txn = db.begin_write()?;
    {
        let mut documents = write_txn.open_table(DOCUMENTS)?;
        let exists = documents.get((name, &id_bytes))?.is_some();
        if !exists {
            return Err(DbError::NotFound(format!("{}/{}", name, id)));
        }
        documents.insert((name, &id_bytes), json)?;
    }
    write_txn.commit()?;
    Ok(())
}

pub fn read_document(db: &Database, collection: Collection, id: &str) -> Result<Option<String>, DbError> {
    let id_bytes = match Uuid::parse_str(id) {
        Ok(uuid) => uuid.into_bytes(),
        Err(_) => return Ok(None),
    };

    let read_txn = db.begin_read()?;
    let documents = read_txn.open_table(DOCUMENTS)?;
    let raw = documents
        .get((collection.name(), &id_bytes))?
        .map(|guard| guard.value().to_string());
    Ok(raw)
}

/// Removes a document and its index entry. Returns whether anything was removed.
pub fn delete_document(db: &Database, collection: Collection, id: &str) -> Result<bool, DbError> {
    let id_bytes = match Uuid::parse_str(id) {
        Ok(uuid) => uuid.into_bytes(),
        Err(_) => return Ok(false),
    };
    let name = collection.name();

    let write_txn = db.begin_write()?;
    let removed = {
        let mut documents = write_txn.open_table(DOCUMENTS)?;
        let mut index = write_txn.open_table(CREATED_INDEX)?;

        let removed = documents.remove((name, &id_bytes))?.is_some();

        let mut stale_keys = Vec::new();
        for item in index.range((name, i64::MIN, &LOWEST_ID)..=(name, i64::MAX, &HIGHEST_ID))? {
            let (key, _) = item?;
            let (_, created_millis, entry_id) = key.value();
            if *entry_id == id_bytes {
                stale_keys.push(created_millis);
            }
        }
        for created_millis in stale_keys {
            index.remove((name, created_millis, &id_bytes))?;
        }
        removed
    };
    write_txn.commit()?;
    Ok(removed)
}

/// Lists every document of a collection as `(id, json)`, newest first.
pub fn list_documents(db: &Database, collection: Collection) -> Result<Vec<(String, String)>, DbError> {
    let name = collection.name();
    let read_txn = db.begin_read()?;
    let index = read_txn.open_table(CREATED_INDEX)?;
    let documents = read_txn.open_table(DOCUMENTS)?;

    let mut listed = Vec::new();
    for item in index.range((name, i64::MIN, &LOWEST_ID)..=(name, i64::MAX, &HIGHEST_ID))?.rev() {
        let (key, _) = item?;
        let (_, _, id_bytes) = key.value();
        match documents.get((name, id_bytes))? {
            Some(raw) => listed.push((Uuid::from_bytes(*id_bytes).to_string(), raw.value().to_string())),
            None => log::warn!("Index entry in '{}' points at a missing document.", name),
        }
    }
    Ok(listed)
}

pub fn collection_has_any(db: &Database, collection: Collection) -> Result<bool, DbError> {
    let name = collection.name();
    let read_txn = db.begin_read()?;
    let index = read_txn.open_table(CREATED_INDEX)?;
    let mut range = index.range((name, i64::MIN, &LOWEST_ID)..=(name, i64::MAX, &HIGHEST_ID))?;
    let found = match range.next() {
        Some(item) => {
            item?;
            true
        }
        None => false,
    };
    Ok(found)
}

pub fn read_fixed_document(db: &Database, key: &str) -> Result<Option<String>, DbError> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(FIXED_DOCUMENTS)?;
    let raw = table.get(key)?.map(|guard| guard.value().to_string());
    Ok(raw)
}

pub fn write_fixed_document(db: &Database, key: &str, json: &str) -> Result<(), DbError> {
    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(FIXED_DOCUMENTS)?;
        table.insert(key, json)?;
    }
    write_txn.commit()?;
    Ok(())
}

/// Every stored document body, collections and fixed keys alike.
pub fn all_document_bodies(db: &Database) -> Result<Vec<String>, DbError> {
    let read_txn = db.begin_read()?;
    let documents = read_txn.open_table(DOCUMENTS)?;
    let fixed = read_txn.open_table(FIXED_DOCUMENTS)?;

    let mut bodies = Vec::new();
    for item in documents.iter()? {
        let (_, value) = item?;
        bodies.push(value.value().to_string());
    }
    for item in fixed.iter()? {
        let (_, value) = item?;
        bodies.push(value.value().to_string());
    }
    Ok(bodies)
}
