//! Request descriptors.
//!
//! A [`RequestDescriptor`] is immutable for the lifetime of one request: the
//! target URL, method, an optional server trust anchor (PEM), and an optional
//! body with its declared content type.

use super::content::ContentType;
use std::fmt;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    /// The method token as it appears on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the engine needs to perform one exchange.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    url: String,
    method: Method,
    trust_anchor: Option<Vec<u8>>,
    body: Option<Vec<u8>>,
    content_type: ContentType,
}

impl RequestDescriptor {
    /// Describe a bodyless request.
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            trust_anchor: None,
            body: None,
            content_type: ContentType::default(),
        }
    }

    /// Attach a body and its declared content type.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>, content_type: ContentType) -> Self {
        self.body = Some(body.into());
        self.content_type = content_type;
        self
    }

    /// Attach a PEM trust anchor; its presence selects the TLS transport.
    pub fn with_trust_anchor(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.trust_anchor = Some(pem.into());
        self
    }

    /// Check that the URL is well-formed enough to hand to the transport.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let rest = self
            .url
            .strip_prefix("http://")
            .or_else(|| self.url.strip_prefix("https://"))
            .ok_or_else(|| format!("unsupported URL scheme: {}", self.url))?;

        let host = rest.split(['/', '?', '#']).next().unwrap_or("");
        if host.is_empty() {
            return Err(format!("URL has no host: {}", self.url));
        }
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn trust_anchor(&self) -> Option<&[u8]> {
        self.trust_anchor.as_deref()
    }

    /// The attached body, if non-empty. A zero-length body counts as absent:
    /// it attaches nothing and sets no `Content-Type` header.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}
