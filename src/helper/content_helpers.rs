//! The create/edit flow shared by every admin form: validate, upload the
//! optional file, write the document, and clean up stored files that the
//! write leaves unreferenced.

use crate::helper::existence_helpers;
use crate::helper::form_helpers::SubmittedForm;
use crate::helper::public_helpers;
use crate::helper::storage_helpers::{
    self, StorageError, StoredFile, UploadedFile, IMAGE_TYPES, PDF_TYPES, VIDEO_TYPES,
};
use crate::helper::validation_helpers::{
    extract_youtube_id, is_http_url, is_valid_email, is_valid_phone, is_youtube_url, youtube_embed_url, Validator,
};
use crate::models::db_operations::documents_db_operations::{self, DbError};
use crate::models::{
    Article, Asset, Banner, Collection, CollectionRecord, ContactInfo, ContentKind, MediaType, Record, TeamMember, WhatWeDo,
    WHAT_WE_DO_KEY,
};
use chrono::{DateTime, Utc};
use redb::Database;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GENERIC_SAVE_ERROR: &str = "Something went wrong while saving. Please try again.";

const SOCIAL_LINKS: [(&str, &str); 4] = [
    ("linkedin", "LinkedIn"),
    ("twitter", "Twitter"),
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
];

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{}", .0.join(" "))]
    Validation(Vec<String>),
    #[error("{0} already exists. Edit the existing one instead.")]
    AlreadyExists(&'static str),
    #[error("That item no longer exists.")]
    NotFound,
    #[error("Database error: {0}")]
    Db(#[from] DbError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl ContentError {
    /// Whether the problem is with the submission rather than the backend.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ContentError::Validation(_) | ContentError::AlreadyExists(_) | ContentError::NotFound)
    }

    pub fn user_message(&self) -> String {
        if self.is_user_error() {
            self.to_string()
        } else {
            GENERIC_SAVE_ERROR.to_string()
        }
    }
}

/// Where a save reads and writes.
pub struct SaveContext<'a> {
    pub db: &'a Database,
    pub media_root: &'a Path,
}

fn check_file(v: &mut Validator, file: Option<&UploadedFile>, allowed: &[&str], message: &str) {
    if let Some(file) = file {
        v.check(file.is_one_of(allowed), message);
    }
}

/// Field rules per content type. `existing_has_file` relaxes "file required"
/// on edit when the stored document already points at one.
pub fn validate_submission(kind: ContentKind, form: &SubmittedForm, existing_has_file: bool) -> Result<(), Vec<String>> {
    let mut v = Validator::new();
    let file = form.file.as_ref();
    let has_file = file.is_some() || existing_has_file;

    match kind {
        ContentKind::Blog | ContentKind::FeatureStory => {
            v.min_length("Title", form.text("title"), 5)
                .min_length("Content", form.text("content"), 20);
            if form.checked("isYouTubeVideo") {
                v.check(is_youtube_url(form.text("videoUrl")), "Please enter a valid YouTube URL.");
            } else if let Some(url) = form.optional("videoUrl") {
                v.check(is_http_url(&url), "Video URL must start with http:// or https://.");
            }
            check_file(&mut v, file, IMAGE_TYPES, "Images must be JPEG, PNG, WebP or GIF.");
        }
        ContentKind::Banner => {
            v.min_length("Title", form.text("title"), 3)
                .min_length("Description", form.text("description"), 10);
            match form.text("mediaType").parse::<MediaType>() {
                Ok(MediaType::Youtube) => {
                    v.check(is_youtube_url(form.text("mediaUrl")), "Please enter a valid YouTube URL.");
                }
                Ok(MediaType::Image) => {
                    v.check(has_file, "Please choose an image to upload.");
                    check_file(&mut v, file, IMAGE_TYPES, "Images must be JPEG, PNG, WebP or GIF.");
                }
                Ok(MediaType::Video) => {
                    v.check(has_file, "Please choose a video to upload.");
                    check_file(&mut v, file, VIDEO_TYPES, "Videos must be MP4 or WebM.");
                }
                Err(_) => {
                    v.check(false, "Please choose a media type.");
                }
            }
        }
        ContentKind::WhatWeDo => {
            v.min_length("Mission", form.text("mission"), 20)
                .min_length("Approach", form.text("approach"), 20)
                .min_length("Impact", form.text("impact"), 20);
            check_file(&mut v, file, IMAGE_TYPES, "Images must be JPEG, PNG, WebP or GIF.");
        }
        ContentKind::Contact => {
            v.check(is_valid_email(form.text("email")), "Please enter a valid email address.")
                .check(is_valid_phone(form.text("phone")), "Please enter a valid phone number.")
                .min_length("Location", form.text("location"), 3);
        }
        ContentKind::Pdf => {
            v.min_length("Title", form.text("title"), 3)
                .min_length("Description", form.text("description"), 10)
                .check(has_file, "Please choose a PDF to upload.");
            check_file(&mut v, file, PDF_TYPES, "Only PDF files can be uploaded here.");
        }
        ContentKind::Photo => {
            v.min_length("Title", form.text("title"), 3)
                .min_length("Description", form.text("description"), 5)
                .check(has_file, "Please choose a photo to upload.");
            check_file(&mut v, file, IMAGE_TYPES, "Photos must be JPEG, PNG, WebP or GIF.");
        }
        ContentKind::Video => {
            v.min_length("Title", form.text("title"), 3)
                .min_length("Description", form.text("description"), 10);
            match form.optional("videoUrl") {
                Some(url) => {
                    v.check(is_youtube_url(&url), "Please enter a valid YouTube URL.");
                }
                None => {
                    v.check(has_file, "Please provide a YouTube URL or upload a video.");
                }
            }
            check_file(&mut v, file, VIDEO_TYPES, "Videos must be MP4 or WebM.");
        }
        ContentKind::TeamMember => {
            v.min_length("Name", form.text("name"), 2)
                .min_length("Role", form.text("role"), 2)
                .min_length("Bio", form.text("bio"), 20);
            for (field, label) in SOCIAL_LINKS {
                if let Some(url) = form.optional(field) {
                    v.check(is_http_url(&url), &format!("{} link must start with http:// or https://.", label));
                }
            }
            check_file(&mut v, file, IMAGE_TYPES, "Images must be JPEG, PNG, WebP or GIF.");
        }
    }

    v.finish()
}

fn kept_image(form: &SubmittedForm, file: Option<StoredFile>, existing: Option<&Option<String>>) -> Option<String> {
    match file {
        Some(stored) => Some(stored.public_url),
        None if form.checked("removeImage") => None,
        None => existing.cloned().flatten(),
    }
}

fn build_article(form: &SubmittedForm, file: Option<StoredFile>, existing: Option<&Article>, now: DateTime<Utc>) -> Article {
    Article {
        title: form.text("title").to_string(),
        content: form.text("content").to_string(),
        image_url: kept_image(form, file, existing.map(|e| &e.image_url)),
        video_url: form.optional("videoUrl"),
        is_youtube_video: form.checked("isYouTubeVideo"),
        tags: form.list("tags"),
        created_at: existing.map_or(now, |e| e.created_at),
        updated_at: now,
    }
}

fn build_banner(form: &SubmittedForm, file: Option<StoredFile>, existing: Option<&Banner>, now: DateTime<Utc>) -> Banner {
    let media_type = form.text("mediaType").parse::<MediaType>().unwrap_or(MediaType::Image);
    let (media_url, youtube_id) = match media_type {
        MediaType::Youtube => {
            let id = extract_youtube_id(form.text("mediaUrl")).unwrap_or_default();
            (youtube_embed_url(&id), Some(id))
        }
        MediaType::Image | MediaType::Video => {
            let url = match (file, existing) {
                (Some(stored), _) => stored.public_url,
                (None, Some(e)) if !e.is_youtube && e.media_type == media_type => e.media_url.clone(),
                _ => String::new(),
            };
            (url, None)
        }
    };

    Banner {
        title: form.text("title").to_string(),
        description: form.text("description").to_string(),
        media_url,
        media_type,
        is_youtube: media_type == MediaType::Youtube,
        youtube_id,
        created_at: existing.map_or(now, |e| e.created_at),
        updated_at: now,
    }
}

fn build_contact(form: &SubmittedForm, _file: Option<StoredFile>, existing: Option<&ContactInfo>, now: DateTime<Utc>) -> ContactInfo {
    ContactInfo {
        email: form.text("email").to_string(),
        phone: form.text("phone").to_string(),
        location: form.text("location").to_string(),
        created_at: existing.map_or(now, |e| e.created_at),
        updated_at: now,
    }
}

fn build_asset(kind: ContentKind, form: &SubmittedForm, file: Option<StoredFile>, existing: Option<&Asset>, now: DateTime<Utc>) -> Asset {
    let youtube_id = match kind {
        ContentKind::Video => form.optional("videoUrl").and_then(|url| extract_youtube_id(&url)),
        _ => None,
    };

    let (file_url, file_name) = match (&youtube_id, file, existing) {
        (Some(id), _, _) => (youtube_embed_url(id), None),
        (None, Some(stored), _) => (stored.public_url, Some(stored.file_name)),
        (None, None, Some(e)) if !e.is_youtube => (e.file_url.clone(), e.file_name.clone()),
        _ => (String::new(), None),
    };

    Asset {
        title: form.text("title").to_string(),
        description: form.text("description").to_string(),
        file_url,
        file_name,
        is_youtube: youtube_id.is_some(),
        youtube_id,
        created_at: existing.map_or(now, |e| e.created_at),
        updated_at: now,
    }
}

fn build_team_member(form: &SubmittedForm, file: Option<StoredFile>, existing: Option<&TeamMember>, now: DateTime<Utc>) -> TeamMember {
    TeamMember {
        name: form.text("name").to_string(),
        role: form.text("role").to_string(),
        bio: form.text("bio").to_string(),
        image_url: kept_image(form, file, existing.map(|e| &e.image_url)),
        linkedin: form.optional("linkedin"),
        twitter: form.optional("twitter"),
        facebook: form.optional("facebook"),
        instagram: form.optional("instagram"),
        created_at: existing.map_or(now, |e| e.created_at),
        updated_at: now,
    }
}

fn build_what_we_do(form: &SubmittedForm, file: Option<StoredFile>, existing: Option<&WhatWeDo>, now: DateTime<Utc>) -> WhatWeDo {
    WhatWeDo {
        mission: form.text("mission").to_string(),
        approach: form.text("approach").to_string(),
        impact: form.text("impact").to_string(),
        image_url: kept_image(form, file, existing.map(|e| &e.image_url)),
        updated_at: now,
    }
}

/// Whether the stored file can stand in for a missing upload. A banner's file
/// only counts while the submitted media type matches what it was saved as.
fn existing_file_fits<T: Record>(form: &SubmittedForm, existing: &T) -> bool {
    if existing.file_urls().is_empty() {
        return false;
    }
    match existing.stored_media_type() {
        Some(stored) => form.text("mediaType").parse::<MediaType>().map_or(false, |submitted| submitted == stored),
        None => true,
    }
}

async fn upload_if_present(ctx: &SaveContext<'_>, kind: ContentKind, form: &mut SubmittedForm) -> Result<Option<StoredFile>, ContentError> {
    match form.file.take() {
        Some(file) => Ok(Some(storage_helpers::upload_file(ctx.media_root, kind.storage_prefix(), file).await?)),
        None => Ok(None),
    }
}

/// Removes a freshly uploaded file after the document write that needed it failed.
async fn discard_upload(ctx: &SaveContext<'_>, uploaded: &Option<StoredFile>) {
    if let Some(stored) = uploaded {
        log::warn!("Document write failed, removing orphaned upload {}", stored.public_url);
        storage_helpers::discard_file(ctx.media_root, &stored.public_url).await;
    }
}

/// Deletes files the previous version pointed at and the new one no longer does.
async fn discard_replaced_files<T: Record>(ctx: &SaveContext<'_>, previous: &T, current: &T) {
    let still_used = current.file_urls();
    for url in previous.file_urls() {
        if !still_used.contains(&url) {
            storage_helpers::discard_file(ctx.media_root, url).await;
        }
    }
}

async fn create_record<T, B>(ctx: &SaveContext<'_>, kind: ContentKind, mut form: SubmittedForm, build: B) -> Result<String, ContentError>
where
    T: CollectionRecord,
    B: FnOnce(&SubmittedForm, Option<StoredFile>, Option<&T>, DateTime<Utc>) -> T,
{
    let collection = kind.collection().ok_or(ContentError::NotFound)?;
    validate_submission(kind, &form, false).map_err(ContentError::Validation)?;

    if kind.is_singleton() {
        let existing = existence_helpers::check_content_existence(ctx.db);
        if existence_helpers::exists(&existing, kind) {
            return Err(ContentError::AlreadyExists(kind.label()));
        }
    }

    let uploaded = upload_if_present(ctx, kind, &mut form).await?;
    let record = build(&form, uploaded.clone(), None, Utc::now());

    let written = serde_json::to_string(&record)
        .map_err(ContentError::from)
        .and_then(|json| {
            documents_db_operations::insert_document(ctx.db, collection, record.created_at(), &json)
                .map_err(ContentError::from)
        });

    match written {
        Ok(id) => {
            log::info!("Created {} {}", kind.label(), id);
            Ok(id)
        }
        Err(e) => {
            discard_upload(ctx, &uploaded).await;
            Err(e)
        }
    }
}

async fn update_record<T, B>(ctx: &SaveContext<'_>, kind: ContentKind, id: &str, mut form: SubmittedForm, build: B) -> Result<(), ContentError>
where
    T: CollectionRecord,
    B: FnOnce(&SubmittedForm, Option<StoredFile>, Option<&T>, DateTime<Utc>) -> T,
{
    let collection = kind.collection().ok_or(ContentError::NotFound)?;
    let existing = public_helpers::fetch_record::<T>(ctx.db, collection, id)?
        .ok_or(ContentError::NotFound)?
        .record;

    validate_submission(kind, &form, existing_file_fits(&form, &existing)).map_err(ContentError::Validation)?;

    let uploaded = upload_if_present(ctx, kind, &mut form).await?;
    let record = build(&form, uploaded.clone(), Some(&existing), Utc::now());

    let written = serde_json::to_string(&record)
        .map_err(ContentError::from)
        .and_then(|json| {
            documents_db_operations::replace_document(ctx.db, collection, id, &json).map_err(ContentError::from)
        });

    match written {
        Ok(()) => {
            discard_replaced_files(ctx, &existing, &record).await;
            log::info!("Updated {} {}", kind.label(), id);
            Ok(())
        }
        Err(e) => {
            discard_upload(ctx, &uploaded).await;
            Err(e)
        }
    }
}

async fn save_what_we_do(ctx: &SaveContext<'_>, mut form: SubmittedForm, is_create: bool) -> Result<String, ContentError> {
    let kind = ContentKind::WhatWeDo;
    let existing = public_helpers::fetch_what_we_do(ctx.db)?;

    if is_create && existing.is_some() {
        return Err(ContentError::AlreadyExists(kind.label()));
    }
    if !is_create && existing.is_none() {
        return Err(ContentError::NotFound);
    }

    let existing_has_file = existing.as_ref().map_or(false, |e| existing_file_fits(&form, e));
    validate_submission(kind, &form, existing_has_file).map_err(ContentError::Validation)?;

    let uploaded = upload_if_present(ctx, kind, &mut form).await?;
    let record = build_what_we_do(&form, uploaded.clone(), existing.as_ref(), Utc::now());

    let written = serde_json::to_string(&record)
        .map_err(ContentError::from)
        .and_then(|json| {
            documents_db_operations::write_fixed_document(ctx.db, WHAT_WE_DO_KEY, &json).map_err(ContentError::from)
        });

    match written {
        Ok(()) => {
            if let Some(previous) = &existing {
                discard_replaced_files(ctx, previous, &record).await;
            }
            log::info!("Saved {}", kind.label());
            Ok(WHAT_WE_DO_KEY.to_string())
        }
        Err(e) => {
            discard_upload(ctx, &uploaded).await;
            Err(e)
        }
    }
}

/// Validates and stores a new document of `kind`, returning its ID
/// (the fixed key for What We Do).
pub async fn create_content(ctx: &SaveContext<'_>, kind: ContentKind, form: SubmittedForm) -> Result<String, ContentError> {
    match kind {
        ContentKind::Blog | ContentKind::FeatureStory => create_record(ctx, kind, form, build_article).await,
        ContentKind::Banner => create_record(ctx, kind, form, build_banner).await,
        ContentKind::Contact => create_record(ctx, kind, form, build_contact).await,
        ContentKind::Pdf | ContentKind::Photo | ContentKind::Video => {
            create_record(ctx, kind, form, |f, file, existing, now| build_asset(kind, f, file, existing, now)).await
        }
        ContentKind::TeamMember => create_record(ctx, kind, form, build_team_member).await,
        ContentKind::WhatWeDo => save_what_we_do(ctx, form, true).await,
    }
}

/// Validates and applies an edit. `id` is ignored for What We Do.
pub async fn update_content(ctx: &SaveContext<'_>, kind: ContentKind, id: &str, form: SubmittedForm) -> Result<(), ContentError> {
    match kind {
        ContentKind::Blog | ContentKind::FeatureStory => update_record(ctx, kind, id, form, build_article).await,
        ContentKind::Banner => update_record(ctx, kind, id, form, build_banner).await,
        ContentKind::Contact => update_record(ctx, kind, id, form, build_contact).await,
        ContentKind::Pdf | ContentKind::Photo | ContentKind::Video => {
            update_record(ctx, kind, id, form, |f, file, existing, now| build_asset(kind, f, file, existing, now)).await
        }
        ContentKind::TeamMember => update_record(ctx, kind, id, form, build_team_member).await,
        ContentKind::WhatWeDo => save_what_we_do(ctx, form, false).await.map(|_| ()),
    }
}

const FILE_URL_FIELDS: [&str; 3] = ["imageUrl", "mediaUrl", "fileUrl"];

/// Media URLs referenced by a raw stored document, whatever its type.
pub fn referenced_media_urls(raw: &str) -> Vec<String> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };
    FILE_URL_FIELDS
        .iter()
        .filter_map(|field| value.get(*field).and_then(Value::as_str))
        .filter(|url| url.starts_with(storage_helpers::MEDIA_URL_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Removes a document and the files it pointed at. What We Do cannot be deleted.
pub async fn delete_content(ctx: &SaveContext<'_>, kind: ContentKind, id: &str) -> Result<(), ContentError> {
    let collection = kind.collection().ok_or(ContentError::NotFound)?;
    let raw = documents_db_operations::read_document(ctx.db, collection, id)?.ok_or(ContentError::NotFound)?;

    if !documents_db_operations::delete_document(ctx.db, collection, id)? {
        return Err(ContentError::NotFound);
    }
    for url in referenced_media_urls(&raw) {
        storage_helpers::discard_file(ctx.media_root, &url).await;
    }
    log::info!("Deleted {} {}", kind.label(), id);
    Ok(())
}

/// Turns a stored document into the string map the edit forms are filled from.
/// Lists are joined with ", " and booleans become "true" or "".
pub fn form_values_from_record<T: Record>(kind: ContentKind, record: &T) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let object = match serde_json::to_value(record) {
        Ok(Value::Object(object)) => object,
        _ => return values,
    };

    for (key, value) in &object {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) | Value::Null => String::new(),
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "),
            other => other.to_string(),
        };
        values.insert(key.clone(), text);
    }

    // YouTube links are edited through the same text box they were entered in.
    match kind {
        ContentKind::Video if values.get("isYouTube").map_or(false, |v| v == "true") => {
            let url = values.get("fileUrl").cloned().unwrap_or_default();
            values.insert("videoUrl".to_string(), url);
        }
        _ => {}
    }
    values
}

fn values_for<T: CollectionRecord>(
    db: &Database,
    kind: ContentKind,
    collection: Collection,
    id: &str,
) -> Result<Option<HashMap<String, String>>, DbError> {
    Ok(public_helpers::fetch_record::<T>(db, collection, id)?.map(|stored| form_values_from_record(kind, &stored.record)))
}

/// Current values of a stored document for pre-filling its edit form.
/// `None` when there is no such document (or it no longer maps cleanly).
pub fn load_form_values(db: &Database, kind: ContentKind, id: &str) -> Result<Option<HashMap<String, String>>, DbError> {
    let collection = match kind.collection() {
        Some(collection) => collection,
        None => return Ok(public_helpers::fetch_what_we_do(db)?.map(|record| form_values_from_record(kind, &record))),
    };
    match kind {
        ContentKind::Blog | ContentKind::FeatureStory => values_for::<Article>(db, kind, collection, id),
        ContentKind::Banner => values_for::<Banner>(db, kind, collection, id),
        ContentKind::Contact => values_for::<ContactInfo>(db, kind, collection, id),
        ContentKind::Pdf | ContentKind::Photo | ContentKind::Video => values_for::<Asset>(db, kind, collection, id),
        ContentKind::TeamMember => values_for::<TeamMember>(db, kind, collection, id),
        ContentKind::WhatWeDo => Ok(None),
    }
}

/// One row of the edit index.
#[derive(Debug, Serialize)]
pub struct EditEntry {
    pub id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EditSection {
    pub kind: &'static str,
    pub label: &'static str,
    pub entries: Vec<EditEntry>,
}

fn entries_of<T: CollectionRecord>(
    db: &Database,
    collection: Collection,
    title: impl Fn(&T) -> String,
    updated_at: impl Fn(&T) -> DateTime<Utc>,
) -> Result<Vec<EditEntry>, DbError> {
    Ok(public_helpers::list_records::<T>(db, collection)?
        .into_iter()
        .map(|stored| EditEntry {
            title: title(&stored.record),
            updated_at: updated_at(&stored.record),
            id: stored.id,
        })
        .collect())
}

/// Every editable document grouped by content type, in dashboard order.
pub fn list_edit_sections(db: &Database) -> Result<Vec<EditSection>, DbError> {
    let mut sections = Vec::new();
    for kind in ContentKind::ALL {
        let entries = match (kind, kind.collection()) {
            (ContentKind::WhatWeDo, _) | (_, None) => public_helpers::fetch_what_we_do(db)?
                .map(|record| EditEntry {
                    id: WHAT_WE_DO_KEY.to_string(),
                    title: kind.label().to_string(),
                    updated_at: record.updated_at,
                })
                .into_iter()
                .collect(),
            (ContentKind::Blog | ContentKind::FeatureStory, Some(c)) => {
                entries_of::<Article>(db, c, |r| r.title.clone(), |r| r.updated_at)?
            }
            (ContentKind::Banner, Some(c)) => entries_of::<Banner>(db, c, |r| r.title.clone(), |r| r.updated_at)?,
            (ContentKind::Contact, Some(c)) => {
                entries_of::<ContactInfo>(db, c, |r| format!("{} ({})", r.email, r.location), |r| r.updated_at)?
            }
            (ContentKind::Pdf | ContentKind::Photo | ContentKind::Video, Some(c)) => {
                entries_of::<Asset>(db, c, |r| r.title.clone(), |r| r.updated_at)?
            }
            (ContentKind::TeamMember, Some(c)) => {
                entries_of::<TeamMember>(db, c, |r| format!("{}, {}", r.name, r.role), |r| r.updated_at)?
            }
        };
        sections.push(EditSection { kind: kind.as_str(), label: kind.label(), entries });
    }
    Ok(sections)
}

/// Files in the media folder that no stored document points at, such as
/// uploads left behind by an interrupted save.
pub fn find_orphaned_files(db: &Database, media_root: &Path) -> Result<Vec<PathBuf>, DbError> {
    let referenced: HashSet<String> = documents_db_operations::all_document_bodies(db)?
        .iter()
        .flat_map(|raw| referenced_media_urls(raw))
        .collect();

    Ok(storage_helpers::list_stored_files(media_root)
        .into_iter()
        .filter(|(_, url)| !referenced.contains(url))
        .map(|(path, _)| path)
        .collect())
}
