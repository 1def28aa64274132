//! Link classification utilities.

/// Syntactic classification of link targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// `http://` or `https://` target.
    External(&'a str),
    /// Same-page anchor (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Anything else: site paths, file-relative paths, other schemes.
    Site(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link target into its syntactic kind.
    ///
    /// Returns `None` for an empty target.
    #[inline]
    pub fn parse(link: &'a str) -> Option<Self> {
        if link.is_empty() {
            None
        } else if Self::is_http(link) {
            Some(Self::External(link))
        } else if let Some(anchor) = link.strip_prefix('#') {
            Some(Self::Fragment(anchor))
        } else {
            Some(Self::Site(link))
        }
    }

    /// Check if link is HTTP/HTTPS.
    #[inline]
    pub fn is_http(link: &str) -> bool {
        link.starts_with("http://") || link.starts_with("https://")
    }
}
