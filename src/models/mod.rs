use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod content_kind;
pub mod db_operations;

pub use content_kind::ContentKind;

/// Fixed key of the single "What We Do" document.
pub const WHAT_WE_DO_KEY: &str = "about/what_we_do";

/// Named collections in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Blogs,
    FeatureStories,
    Banners,
    SiteContactInfo,
    Photos,
    Pdfs,
    Videos,
    TeamMembers,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Blogs,
        Collection::FeatureStories,
        Collection::Banners,
        Collection::SiteContactInfo,
        Collection::Photos,
        Collection::Pdfs,
        Collection::Videos,
        Collection::TeamMembers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Blogs => "blogs",
            Collection::FeatureStories => "featureStories",
            Collection::Banners => "banners",
            Collection::SiteContactInfo => "siteContactInfo",
            Collection::Photos => "photos",
            Collection::Pdfs => "pdfs",
            Collection::Videos => "videos",
            Collection::TeamMembers => "teamMembers",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed document as read back from, or written to, the store.
///
/// Raw stored JSON is never handed to a page directly: it goes through
/// [`map_record`], which rejects anything that does not deserialize into the
/// typed shape or lacks the fields a page needs to render it.
pub trait Record: Serialize + DeserializeOwned {
    /// Whether the record carries the fields a public page needs.
    fn is_displayable(&self) -> bool;

    /// Public URLs of files in blob storage that this record points at.
    fn file_urls(&self) -> Vec<&str> {
        Vec::new()
    }

    /// The kind of media the stored file is, for records that let the editor switch it.
    fn stored_media_type(&self) -> Option<MediaType> {
        None
    }
}

/// A record kept in a collection, ordered by its creation time.
pub trait CollectionRecord: Record {
    fn created_at(&self) -> DateTime<Utc>;
}

/// Maps a raw stored document to its typed form, or `None` if it is malformed.
pub fn map_record<T: Record>(raw: &str) -> Option<T> {
    serde_json::from_str::<T>(raw).ok().filter(|record| record.is_displayable())
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn stored_url(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|url| url.starts_with("/media/"))
}

/// A record together with its document ID, as handed to templates.
#[derive(Debug, Serialize, Clone)]
pub struct StoredRecord<T> {
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

/// Blog posts and feature stories share one shape.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, rename = "isYouTubeVideo")]
    pub is_youtube_video: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

impl Record for Article {
    fn is_displayable(&self) -> bool {
        present(&self.title) && present(&self.content)
    }

    fn file_urls(&self) -> Vec<&str> {
        stored_url(&self.image_url).into_iter().collect()
    }
}

impl CollectionRecord for Article {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Youtube,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Youtube => "youtube",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "youtube" => Ok(MediaType::Youtube),
            _ => Err(format!("invalid media type: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub media_type: MediaType,
    #[serde(default, rename = "isYouTube")]
    pub is_youtube: bool,
    #[serde(default)]
    pub youtube_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Banner {
    fn is_displayable(&self) -> bool {
        present(&self.title) && present(&self.media_url)
    }

    fn file_urls(&self) -> Vec<&str> {
        if self.is_youtube {
            Vec::new()
        } else {
            vec![self.media_url.as_str()]
        }
    }

    fn stored_media_type(&self) -> Option<MediaType> {
        Some(self.media_type)
    }
}

impl CollectionRecord for Banner {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WhatWeDo {
    pub mission: String,
    pub approach: String,
    pub impact: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Record for WhatWeDo {
    fn is_displayable(&self) -> bool {
        present(&self.mission) && present(&self.approach) && present(&self.impact)
    }

    fn file_urls(&self) -> Vec<&str> {
        stored_url(&self.image_url).into_iter().collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for ContactInfo {
    fn is_displayable(&self) -> bool {
        present(&self.email)
    }
}

impl CollectionRecord for ContactInfo {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// PDFs, photos and videos: plain asset records.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub title: String,
    pub description: String,
    pub file_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, rename = "isYouTube")]
    pub is_youtube: bool,
    #[serde(default)]
    pub youtube_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Asset {
    fn is_displayable(&self) -> bool {
        present(&self.title) && present(&self.file_url)
    }

    fn file_urls(&self) -> Vec<&str> {
        if self.is_youtube {
            Vec::new()
        } else {
            vec![self.file_url.as_str()]
        }
    }
}

impl CollectionRecord for Asset {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for TeamMember {
    fn is_displayable(&self) -> bool {
        present(&self.name) && present(&self.role)
    }

    fn file_urls(&self) -> Vec<&str> {
        stored_url(&self.image_url).into_iter().collect()
    }
}

impl CollectionRecord for TeamMember {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An admin account as listed by the setup CLI.
#[derive(Debug, Serialize)]
pub struct AdminAccount {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub last_login_time: Option<String>,
}
