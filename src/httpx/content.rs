//! Request body content types.

use std::fmt;

/// The bounded set of content types a request body may declare.
///
/// Unrecognized names map to [`ContentType::OctetStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `text/plain`
    TextPlain,
    /// `application/octet-stream`
    #[default]
    OctetStream,
}

impl ContentType {
    /// The MIME string sent in the `Content-Type` header.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::TextPlain => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Map a content-type name to the bounded set, defaulting to
    /// `OctetStream` for anything unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" | "application/json" => Self::Json,
            "form_urlencoded" | "application/x-www-form-urlencoded" => Self::FormUrlEncoded,
            "text_plain" | "text/plain" => Self::TextPlain,
            "octet_stream" | "application/octet-stream" => Self::OctetStream,
            _ => Self::OctetStream,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime())
    }
}
