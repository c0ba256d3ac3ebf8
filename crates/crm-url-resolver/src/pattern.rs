//! Pattern compilation for page kinds.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The kind of page a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// The list of entities of one type.
    List,
    /// A single entity.
    Detail,
}

impl PageKind {
    /// Every page kind, in cache slot order.
    pub const ALL: [Self; 2] = [Self::List, Self::Detail];

    /// Suffix appended to base templates for list pages.
    pub const LIST_SUFFIX: &'static str = "list/";

    /// Suffix appended to base templates for detail pages.
    pub const DETAIL_SUFFIX: &'static str = r"details/[0-9]+/";

    /// Returns the built-in suffix for this page kind.
    pub const fn default_suffix(self) -> &'static str {
        match self {
            Self::List => Self::LIST_SUFFIX,
            Self::Detail => Self::DETAIL_SUFFIX,
        }
    }

    /// Returns the kind as a string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::List => 0,
            Self::Detail => 1,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled base template + suffix pair.
///
/// The pattern is searched anywhere in the URL; only the anchors present in
/// the template itself restrict where it may match.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Returns true if the URL matches.
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Returns the full pattern string.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Concatenates a base template with a suffix and compiles the result.
///
/// Neither part is escaped: both are regex fragments.
///
/// # Example
///
/// ```
/// use crm_url_resolver::compile;
///
/// let matcher = compile("^/crm/lead/", "list/").unwrap();
/// assert!(matcher.is_match("/crm/lead/list/?apply_filter=Y"));
/// assert!(!matcher.is_match("/shop/crm/lead/list/"));
/// ```
pub fn compile(base: &str, suffix: &str) -> Result<Matcher, regex::Error> {
    let mut pattern = String::with_capacity(base.len() + suffix.len());
    pattern.push_str(base);
    pattern.push_str(suffix);

    Ok(Matcher {
        regex: Regex::new(&pattern)?,
    })
}

/// Checks that a fragment compiles on its own.
///
/// Two fragments that each parse also parse when concatenated. The combined
/// pattern can still exceed the compiled size limit, which only shows up
/// when the full matcher is built.
pub fn validate_fragment(fragment: &str) -> Result<(), regex::Error> {
    Regex::new(fragment).map(|_| ())
}
