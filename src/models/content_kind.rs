use crate::models::Collection;
use serde::Serialize;

/// The content types an administrator can create and edit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Blog,
    FeatureStory,
    Banner,
    WhatWeDo,
    Contact,
    Pdf,
    Photo,
    Video,
    TeamMember,
}

impl ContentKind {
    pub const ALL: [ContentKind; 9] = [
        ContentKind::Banner,
        ContentKind::WhatWeDo,
        ContentKind::FeatureStory,
        ContentKind::Blog,
        ContentKind::Video,
        ContentKind::Pdf,
        ContentKind::Photo,
        ContentKind::TeamMember,
        ContentKind::Contact,
    ];

    /// URL segment used under `/create/` and `/edit/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::FeatureStory => "feature-story",
            Self::Banner => "banner",
            Self::WhatWeDo => "what-we-do",
            Self::Contact => "contact",
            Self::Pdf => "pdf",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::TeamMember => "team-member",
        }
    }

    /// Human-readable name, also the key used by the existence check.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blog => "Blog Post",
            Self::FeatureStory => "Feature Story",
            Self::Banner => "Banner",
            Self::WhatWeDo => "What We Do",
            Self::Contact => "Contact Info",
            Self::Pdf => "PDF",
            Self::Photo => "Photo",
            Self::Video => "Video",
            Self::TeamMember => "Team Member",
        }
    }

    /// `None` for What We Do, which lives under a fixed key.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Self::Blog => Some(Collection::Blogs),
            Self::FeatureStory => Some(Collection::FeatureStories),
            Self::Banner => Some(Collection::Banners),
            Self::WhatWeDo => None,
            Self::Contact => Some(Collection::SiteContactInfo),
            Self::Pdf => Some(Collection::Pdfs),
            Self::Photo => Some(Collection::Photos),
            Self::Video => Some(Collection::Videos),
            Self::TeamMember => Some(Collection::TeamMembers),
        }
    }

    /// Blob storage folder for uploads of this type.
    pub fn storage_prefix(&self) -> &'static str {
        match self {
            Self::Blog => "blogs",
            Self::FeatureStory => "featureStories",
            Self::Banner => "bannerstorage",
            Self::WhatWeDo => "what_we_do",
            Self::Contact => "contact",
            Self::Pdf => "pdfs",
            Self::Photo => "photos",
            Self::Video => "videos",
            Self::TeamMember => "team",
        }
    }

    /// Public page a successful save redirects to.
    pub fn listing_path(&self) -> &'static str {
        match self {
            Self::Blog => "/blogs",
            Self::FeatureStory => "/feature-story",
            Self::Banner => "/",
            Self::WhatWeDo => "/about",
            Self::Contact => "/contact",
            Self::Pdf => "/research",
            Self::Photo => "/gallery",
            Self::Video => "/documentaries",
            Self::TeamMember => "/team",
        }
    }

    /// Types the site assumes have at most one live document.
    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Banner | Self::WhatWeDo | Self::FeatureStory)
    }

    pub fn form_template(&self) -> String {
        format!("forms/{}.html", self.as_str())
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("invalid content kind: {}", s))
    }
}
