//! Digital Object Identifier value type.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static DOI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:doi:\s*|https?://(?:dx\.)?doi\.org/)?(10\.\d{4,9}/\S+)$")
        .expect("valid doi regex")
});

const DOI_RESOLVER: &str = "https://doi.org/";

/// A validated DOI such as `10.1000/xyz123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Doi(String);

impl Doi {
    /// Accepts a bare DOI, a `doi:` prefixed form or a resolver URL.
    pub fn parse(value: &str) -> Option<Self> {
        DOI_RE
            .captures(value.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolver URL for this DOI.
    pub fn uri(&self) -> String {
        format!("{DOI_RESOLVER}{}", self.0)
    }
}

impl Display for Doi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Doi;

    #[test]
    fn parses_bare_prefixed_and_url_forms() {
        let bare = Doi::parse("10.1000/xyz123").expect("bare doi");
        assert_eq!(bare.as_str(), "10.1000/xyz123");
        assert_eq!(Doi::parse("doi: 10.1000/xyz123"), Some(bare.clone()));
        assert_eq!(Doi::parse("https://doi.org/10.1000/xyz123"), Some(bare.clone()));
        assert_eq!(bare.uri(), "https://doi.org/10.1000/xyz123");
    }

    #[test]
    fn rejects_non_doi_text() {
        assert_eq!(Doi::parse("not a doi"), None);
        assert_eq!(Doi::parse("11.1000/xyz"), None);
    }
}
