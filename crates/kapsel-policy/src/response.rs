//! Response value handed back to the rendering surface for an
//! intercepted sub-resource fetch.

use std::fmt;
use std::io::{Cursor, Read};

/// Body and metadata for an intercepted fetch.
///
/// A response with metadata but no body is how the shell forces a
/// not-found: the surface renders it as a 404 instead of falling back to
/// its default network fetch.
pub struct ResourceResponse {
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub body: Option<Box<dyn Read + Send>>,
}

impl ResourceResponse {
    /// The explicit empty response used to deny a fetch.
    pub fn not_found() -> Self {
        Self {
            mime_type: Some("text/plain".to_string()),
            encoding: Some("UTF-8".to_string()),
            body: None,
        }
    }

    /// Wrap a byte stream, e.g. one opened from the asset store.
    pub fn from_reader(
        mime_type: Option<&str>,
        encoding: Option<&str>,
        body: Box<dyn Read + Send>,
    ) -> Self {
        Self {
            mime_type: mime_type.map(str::to_string),
            encoding: encoding.map(str::to_string),
            body: Some(body),
        }
    }

    /// Convenience for in-memory bodies (plugin results, tests).
    pub fn from_bytes(mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.map(str::to_string),
            encoding: None,
            body: Some(Box::new(Cursor::new(bytes))),
        }
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

impl fmt::Debug for ResourceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceResponse")
            .field("mime_type", &self.mime_type)
            .field("encoding", &self.encoding)
            .field("body", if self.body.is_some() { &"<stream>" } else { &"<none>" })
            .finish()
    }
}
