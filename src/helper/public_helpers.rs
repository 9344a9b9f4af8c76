use crate::models::db_operations::documents_db_operations::{self, DbError};
use crate::models::{
    map_record, Article, Banner, Collection, CollectionRecord, ContactInfo, StoredRecord, WhatWeDo, WHAT_WE_DO_KEY,
};
use redb::Database;
use serde::Serialize;
use std::collections::BTreeSet;

/// How many recent articles the home page shows.
pub const HOME_BLOG_COUNT: usize = 3;

/// Every displayable record of a collection, newest first. Records that do not
/// map to `T` are skipped.
pub fn list_records<T: CollectionRecord>(db: &Database, collection: Collection) -> Result<Vec<StoredRecord<T>>, DbError> {
    let records = documents_db_operations::list_documents(db, collection)?
        .into_iter()
        .filter_map(|(id, raw)| match map_record::<T>(&raw) {
            Some(record) => Some(StoredRecord { id, record }),
            None => {
                log::warn!("Skipping malformed document {}/{}", collection, id);
                None
            }
        })
        .collect();
    Ok(records)
}

pub fn latest_record<T: CollectionRecord>(db: &Database, collection: Collection) -> Result<Option<StoredRecord<T>>, DbError> {
    Ok(list_records::<T>(db, collection)?.into_iter().next())
}

pub fn fetch_record<T: CollectionRecord>(db: &Database, collection: Collection, id: &str) -> Result<Option<StoredRecord<T>>, DbError> {
    let record = documents_db_operations::read_document(db, collection, id)?
        .and_then(|raw| map_record::<T>(&raw))
        .map(|record| StoredRecord { id: id.to_string(), record });
    Ok(record)
}

pub fn fetch_what_we_do(db: &Database) -> Result<Option<WhatWeDo>, DbError> {
    Ok(documents_db_operations::read_fixed_document(db, WHAT_WE_DO_KEY)?
        .and_then(|raw| map_record::<WhatWeDo>(&raw)))
}

/// Blog posts, optionally narrowed to one tag (case-insensitive).
pub fn fetch_blogs(db: &Database, tag: Option<&str>) -> Result<Vec<StoredRecord<Article>>, DbError> {
    let blogs = list_records::<Article>(db, Collection::Blogs)?;
    Ok(match tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => blogs.into_iter().filter(|post| post.record.has_tag(tag)).collect(),
        None => blogs,
    })
}

/// Distinct tags across the given posts, sorted case-insensitively.
pub fn collect_tags(posts: &[StoredRecord<Article>]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut tags = Vec::new();
    for tag in posts.iter().flat_map(|post| post.record.tags.iter()) {
        if seen.insert(tag.to_lowercase()) {
            tags.push(tag.clone());
        }
    }
    tags.sort_by_key(|t| t.to_lowercase());
    tags
}

/// The canonical contact record is the most recently created one.
pub fn fetch_latest_contact(db: &Database) -> Result<Option<StoredRecord<ContactInfo>>, DbError> {
    latest_record::<ContactInfo>(db, Collection::SiteContactInfo)
}

#[derive(Serialize)]
pub struct HomePage {
    pub banner: Option<StoredRecord<Banner>>,
    pub what_we_do: Option<WhatWeDo>,
    pub feature_story: Option<StoredRecord<Article>>,
    pub latest_blogs: Vec<StoredRecord<Article>>,
}

pub fn fetch_home_page(db: &Database) -> Result<HomePage, DbError> {
    Ok(HomePage {
        banner: latest_record::<Banner>(db, Collection::Banners)?,
        what_we_do: fetch_what_we_do(db)?,
        feature_story: latest_record::<Article>(db, Collection::FeatureStories)?,
        latest_blogs: list_records::<Article>(db, Collection::Blogs)?
            .into_iter()
            .take(HOME_BLOG_COUNT)
            .collect(),
    })
}
