//! Filter expressions and qualified join-column references.
//!
//! The filter itself is an opaque, engine-defined predicate tree. The only
//! structure interpreted here is the qualified reference syntax
//! `$assoc.assoc.column$`, which may appear as an object key or as a string
//! leaf anywhere in the tree.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Delimiter wrapping a qualified join-column reference.
pub const REFERENCE_DELIMITER: char = '$';

/// Separator between legs of a qualified path.
pub const PATH_SEPARATOR: char = '.';

/// An opaque filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub serde_json::Value);

impl Filter {
    /// Create a filter from a JSON predicate tree.
    pub fn new(expression: serde_json::Value) -> Self {
        Self(expression)
    }

    /// Get the underlying expression.
    pub fn expression(&self) -> &serde_json::Value {
        &self.0
    }

    /// Collect the distinct qualified references in first-seen order.
    ///
    /// Keys are visited before their values. A key that is a candidate for
    /// the reference syntax but does not parse is an error. String values may
    /// be plain data that happens to look like a reference, so malformed
    /// candidates there are skipped and well-formed ones are reported with
    /// [`ReferenceSite::Value`] for the caller to confirm against the schema.
    pub fn qualified_refs(&self) -> Result<Vec<FilterRef>, Error> {
        let mut refs = Vec::new();
        collect_refs(&self.0, &mut refs)?;
        Ok(refs)
    }
}

impl From<serde_json::Value> for Filter {
    fn from(expression: serde_json::Value) -> Self {
        Self(expression)
    }
}

/// Where in a filter a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSite {
    /// An object key; always a reference.
    Key,
    /// A string value; a reference only if the path exists.
    Value,
}

/// A qualified reference found in a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRef {
    /// The parsed reference.
    pub reference: QualifiedRef,
    /// Where it was found. A key wins over a value for the same reference.
    pub site: ReferenceSite,
}

fn collect_refs(value: &serde_json::Value, refs: &mut Vec<FilterRef>) -> Result<(), Error> {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                if let Some(reference) = QualifiedRef::parse(key)? {
                    push_ref(reference, ReferenceSite::Key, refs);
                }
                collect_refs(nested, refs)?;
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_refs(item, refs)?;
            }
        }
        serde_json::Value::String(s) => {
            if let Ok(Some(reference)) = QualifiedRef::parse(s) {
                push_ref(reference, ReferenceSite::Value, refs);
            }
        }
        _ => {}
    }
    Ok(())
}

fn push_ref(reference: QualifiedRef, site: ReferenceSite, refs: &mut Vec<FilterRef>) {
    match refs.iter_mut().find(|r| r.reference == reference) {
        Some(existing) => {
            if site == ReferenceSite::Key {
                existing.site = ReferenceSite::Key;
            }
        }
        None => refs.push(FilterRef { reference, site }),
    }
}

/// A column reached by walking one or more associations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedRef {
    /// Association names, outermost first. Never empty.
    pub legs: Vec<String>,
    /// Terminal column on the last association's entity.
    pub column: String,
}

impl QualifiedRef {
    /// Parse a `$`-delimited reference.
    ///
    /// Returns `Ok(None)` for strings that are not candidates: they must start
    /// and end with the delimiter and contain a separator. Candidates with an
    /// invalid path are rejected.
    pub fn parse(s: &str) -> Result<Option<Self>, Error> {
        let inner = match s
            .strip_prefix(REFERENCE_DELIMITER)
            .and_then(|rest| rest.strip_suffix(REFERENCE_DELIMITER))
        {
            Some(inner) if inner.contains(PATH_SEPARATOR) => inner,
            _ => return Ok(None),
        };

        Self::parse_segments(inner)
            .map(Some)
            .map_err(|reason| Error::MalformedReference {
                reference: s.to_string(),
                reason,
            })
    }

    /// Parse an undelimited dotted path such as `customer.region.name`.
    ///
    /// Returns `Ok(None)` for a bare column without a separator.
    pub fn parse_path(s: &str) -> Result<Option<Self>, Error> {
        if let Some(reference) = Self::parse(s)? {
            return Ok(Some(reference));
        }
        if !s.contains(PATH_SEPARATOR) {
            return Ok(None);
        }
        Self::parse_segments(s)
            .map(Some)
            .map_err(|reason| Error::MalformedReference {
                reference: s.to_string(),
                reason,
            })
    }

    fn parse_segments(path: &str) -> Result<Self, &'static str> {
        let mut legs: Vec<String> = Vec::new();
        for segment in path.split(PATH_SEPARATOR) {
            if segment.is_empty() {
                return Err("empty path segment");
            }
            if !is_identifier(segment) {
                return Err("path segments must be identifiers");
            }
            legs.push(segment.to_string());
        }

        // The separator check guarantees at least two segments.
        let column = legs.pop().ok_or("missing column")?;
        if legs.is_empty() {
            return Err("missing association");
        }
        Ok(Self { legs, column })
    }

    /// The dotted path without delimiters.
    pub fn path(&self) -> String {
        let mut path = self.legs.join(".");
        path.push(PATH_SEPARATOR);
        path.push_str(&self.column);
        path
    }
}

impl std::fmt::Display for QualifiedRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", REFERENCE_DELIMITER, self.path(), REFERENCE_DELIMITER)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reference() {
        let r = QualifiedRef::parse("$customer.address.city$").unwrap().unwrap();
        assert_eq!(r.legs, vec!["customer", "address"]);
        assert_eq!(r.column, "city");
        assert_eq!(r.path(), "customer.address.city");
        assert_eq!(r.to_string(), "$customer.address.city$");
    }

    #[test]
    fn test_non_candidates_are_ignored() {
        for s in ["$and", "$or", "price$", "$total$", "customer.region", "", "$", "$$"] {
            assert_eq!(QualifiedRef::parse(s).unwrap(), None, "{s}");
        }
    }

    #[test]
    fn test_malformed_candidates_are_rejected() {
        for s in ["$a..b$", "$.b$", "$a.$", "$a.b-c$", "$1a.b$"] {
            assert!(
                matches!(
                    QualifiedRef::parse(s),
                    Err(Error::MalformedReference { .. })
                ),
                "{s}"
            );
        }
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(QualifiedRef::parse_path("name").unwrap(), None);

        let r = QualifiedRef::parse_path("a.b.col").unwrap().unwrap();
        assert_eq!(r.legs, vec!["a", "b"]);
        assert_eq!(r.column, "col");

        let wrapped = QualifiedRef::parse_path("$a.b.col$").unwrap().unwrap();
        assert_eq!(wrapped, r);

        assert!(QualifiedRef::parse_path("a..col").is_err());
    }

    #[test]
    fn test_collect_refs_from_keys_and_leaves() {
        let filter = Filter::new(json!({
            "$or": [
                { "$customer.region$": "EU" },
                { "$customer.region$": { "$ne": "US" } },
                { "total": { "$gt": "$customer.credit.limit$" } }
            ],
            "status": "open"
        }));

        let refs = filter.qualified_refs().unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].reference.path(), "customer.region");
        assert_eq!(refs[0].site, ReferenceSite::Key);
        assert_eq!(refs[1].reference.path(), "customer.credit.limit");
        assert_eq!(refs[1].site, ReferenceSite::Value);
    }

    #[test]
    fn test_key_site_wins_over_value() {
        let filter = Filter::new(json!([
            { "note": "$customer.name$" },
            { "$customer.name$": "Acme" }
        ]));

        let refs = filter.qualified_refs().unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].site, ReferenceSite::Key);
    }

    #[test]
    fn test_malformed_values_are_plain_data() {
        let filter = Filter::new(json!({ "note": "$5.00$", "code": "$a..b$" }));
        assert!(filter.qualified_refs().unwrap().is_empty());
    }

    #[test]
    fn test_collect_refs_propagates_malformed() {
        let filter = Filter::new(json!({ "$customer..region$": 1 }));
        assert!(filter.qualified_refs().is_err());
    }
}
