pub mod content_helpers;
pub mod existence_helpers;
pub mod form_helpers;
pub mod page_helpers;
pub mod public_helpers;
pub mod sanitization_helpers;
pub mod seo_helpers;
pub mod storage_helpers;
pub mod validation_helpers;
