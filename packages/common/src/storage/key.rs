use std::fmt;

use uuid::Uuid;

/// Maximum length of a file extension carried into a stored key.
const MAX_EXTENSION_LEN: usize = 10;

/// What an uploaded file is used for. Decides the folder it is stored under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// Company logo image.
    Logo,
    /// User résumé document.
    Resume,
}

impl MediaKind {
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Logo => "logos",
            Self::Resume => "resumes",
        }
    }
}

/// Object key of a stored upload: `<folder>/<uuid-v7>[.<ext>]`.
///
/// Keys never contain client-controlled path components, only a sanitized
/// extension taken from the original filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaKey(String);

impl MediaKey {
    /// Generate a fresh key for an upload of the given kind.
    pub fn generate(kind: MediaKind, original_filename: &str) -> Self {
        let id = Uuid::now_v7();
        match extension_of(original_filename) {
            Some(ext) => Self(format!("{}/{id}.{ext}", kind.folder())),
            None => Self(format!("{}/{id}", kind.folder())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type guessed from the key's extension.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.0)
            .first_or_octet_stream()
            .to_string()
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercased extension if it is short and purely alphanumeric.
fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
