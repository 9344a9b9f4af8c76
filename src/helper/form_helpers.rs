use crate::helper::storage_helpers::UploadedFile;
use actix_multipart::{Multipart, MultipartError};
use actix_web::web::BytesMut;
use futures_util::StreamExt;
use std::collections::HashMap;
use thiserror::Error;

/// Name of the single file input every upload form uses.
pub const FILE_FIELD: &str = "file";

const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Field '{0}' is not valid UTF-8.")]
    InvalidUtf8(String),
    #[error("File is too large. Maximum size is {0}MB.")]
    FileTooLarge(usize),
    #[error("Field '{0}' is too long.")]
    FieldTooLarge(String),
}

/// Text fields and the optional file of one submitted form.
#[derive(Debug, Default, Clone)]
pub struct SubmittedForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl SubmittedForm {
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        SubmittedForm { fields, file: None }
    }

    /// Trimmed value, or `""` when the field was not sent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", |s| s.trim())
    }

    /// Trimmed value when present and non-empty.
    pub fn optional(&self, name: &str) -> Option<String> {
        Some(self.text(name)).filter(|s| !s.is_empty()).map(str::to_string)
    }

    /// Checkbox semantics: sent and not explicitly "false"/"off".
    pub fn checked(&self, name: &str) -> bool {
        match self.fields.get(name).map(|s| s.trim().to_lowercase()) {
            Some(value) => !matches!(value.as_str(), "false" | "off" | "0"),
            None => false,
        }
    }

    /// Comma separated list, trimmed, empties dropped.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.text(name)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Reads a whole multipart body into memory. The file part is kept only if a
/// file was actually chosen; browsers send an empty part otherwise.
pub async fn collect_multipart(mut payload: Multipart, max_file_bytes: usize) -> Result<SubmittedForm, FormError> {
    let mut form = SubmittedForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field.content_disposition().get_name().unwrap_or_default().to_string();

        if field_name == FILE_FIELD {
            let file_name = field.content_disposition().get_filename().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_default();

            let mut data = BytesMut::new();
            while let Some(chunk) = field.next().await {
                data.extend_from_slice(&chunk?);
                if data.len() > max_file_bytes {
                    return Err(FormError::FileTooLarge(max_file_bytes / (1024 * 1024)));
                }
            }

            if !file_name.is_empty() && !data.is_empty() {
                form.file = Some(UploadedFile { file_name, content_type, bytes: data.to_vec() });
            }
        } else {
            let mut data = BytesMut::new();
            while let Some(chunk) = field.next().await {
                data.extend_from_slice(&chunk?);
                if data.len() > MAX_TEXT_FIELD_BYTES {
                    return Err(FormError::FieldTooLarge(field_name));
                }
            }
            let value = String::from_utf8(data.to_vec())
                .map_err(|_| FormError::InvalidUtf8(field_name.clone()))?;
            form.fields.insert(field_name, value);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> SubmittedForm {
        SubmittedForm::from_fields(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn text_accessors_trim_and_default() {
        let f = form(&[("title", "  Hello  "), ("blank", "   ")]);
        assert_eq!(f.text("title"), "Hello");
        assert_eq!(f.text("missing"), "");
        assert_eq!(f.optional("blank"), None);
        assert_eq!(f.optional("title"), Some("Hello".to_string()));
    }

    #[test]
    fn checkbox_and_list_fields() {
        let f = form(&[("isYouTubeVideo", "on"), ("off", "false"), ("tags", "Kenya, , advocacy ,walk")]);
        assert!(f.checked("isYouTubeVideo"));
        assert!(!f.checked("off"));
        assert!(!f.checked("missing"));
        assert_eq!(f.list("tags"), vec!["Kenya", "advocacy", "walk"]);
    }
}
