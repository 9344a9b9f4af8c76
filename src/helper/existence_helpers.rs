use crate::helper::public_helpers;
use crate::models::db_operations::documents_db_operations::{self, DbError};
use crate::models::{Collection, ContentKind};
use redb::Database;
use std::collections::HashMap;

fn query_existence(db: &Database) -> Result<HashMap<String, bool>, DbError> {
    let mut existing = HashMap::new();
    existing.insert(
        ContentKind::FeatureStory.label().to_string(),
        documents_db_operations::collection_has_any(db, Collection::FeatureStories)?,
    );
    existing.insert(
        ContentKind::WhatWeDo.label().to_string(),
        public_helpers::fetch_what_we_do(db)?.is_some(),
    );
    existing.insert(
        ContentKind::Banner.label().to_string(),
        documents_db_operations::collection_has_any(db, Collection::Banners)?,
    );
    Ok(existing)
}

/// Reports which singleton content types already have a document, keyed by
/// "Feature Story", "What We Do" and "Banner".
///
/// A failed query yields an empty map. Callers read a missing key as "does not
/// exist", so a store outage never locks the create screen.
pub fn check_content_existence(db: &Database) -> HashMap<String, bool> {
    match query_existence(db) {
        Ok(existing) => existing,
        Err(e) => {
            log::error!("Content existence check failed: {}", e);
            HashMap::new()
        }
    }
}

/// Missing keys count as "does not exist".
pub fn exists(existing: &HashMap<String, bool>, kind: ContentKind) -> bool {
    existing.get(kind.label()).copied().unwrap_or(false)
}
