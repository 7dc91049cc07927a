//! Schema References
//!
//! A [`Reference`] locates a node inside the schema document as the sequence
//! of keys from the document root. The root is the single sentinel segment
//! `#`, so `#/properties/address` is `["#", "properties", "address"]`.
//!
//! References produce the type names used by every generated declaration:
//! - `name`: capitalized concatenation of the purely alphanumeric segments
//! - `unique_name`: `name` plus a numeric suffix hashed from the full path

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::Add;

/// Sentinel segment for the document root
pub const ROOT_SEGMENT: &str = "#";

/// Name used when no segment survives sanitizing (the root)
pub const ROOT_NAME: &str = "Root";

/// Path identifier for a schema node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    segments: Vec<String>,
}

impl Reference {
    /// The document root (`#`)
    pub fn root() -> Self {
        Self {
            segments: vec![ROOT_SEGMENT.to_string()],
        }
    }

    /// Build a reference from raw segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a local `$ref` string (`#`, `#/definitions/address`).
    ///
    /// Segments are percent-decoded, then `~1`/`~0` unescaped. Returns `None`
    /// for refs into other documents or segments that do not decode to UTF-8.
    pub fn parse(pointer: &str) -> Option<Self> {
        let rest = pointer.strip_prefix(ROOT_SEGMENT)?;
        let mut reference = Self::root();
        if rest.is_empty() {
            return Some(reference);
        }
        let rest = rest.strip_prefix('/')?;
        for segment in rest.split('/') {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            reference
                .segments
                .push(decoded.replace("~1", "/").replace("~0", "~"));
        }
        Some(reference)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == ROOT_SEGMENT
    }

    /// Last segment (the property or definition key)
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Enclosing reference, `None` for a single-segment reference
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// All prefixes of length 1..=n, root first
    pub fn path(&self) -> Vec<Self> {
        (1..=self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Append one segment
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Append several segments
    pub fn join_all<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut joined = self.clone();
        joined.segments.extend(segments.into_iter().map(Into::into));
        joined
    }

    /// Capitalized concatenation of the purely alphanumeric segments.
    ///
    /// `#/definitions/address` gives `DefinitionsAddress`.
    pub fn name(&self) -> String {
        self.segments
            .iter()
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|s| capitalize(&s.to_ascii_lowercase()))
            .collect()
    }

    /// `name` suffixed with the path hash, or [`ROOT_NAME`] when `name` is empty
    pub fn unique_name(&self) -> String {
        let name = self.name();
        if name.is_empty() {
            return ROOT_NAME.to_string();
        }
        format!("{}{}", name, self.hash_suffix())
    }

    /// Positive suffix derived from the signed path hash.
    ///
    /// Negative hashes become `1<abs>`, non-negative ones `2<value>`, so a
    /// negative and a positive hash with the same magnitude never share a
    /// suffix.
    pub fn hash_suffix(&self) -> u128 {
        let hash = self.path_hash();
        if hash < 0 {
            prefix_digit(1, hash.unsigned_abs())
        } else {
            prefix_digit(2, hash.unsigned_abs())
        }
    }

    /// Signed 64-bit hash of the length-prefixed segment encoding
    fn path_hash(&self) -> i64 {
        let mut hasher = Sha256::new();
        hasher.update((self.segments.len() as u64).to_be_bytes());
        for segment in &self.segments {
            hasher.update((segment.len() as u64).to_be_bytes());
            hasher.update(segment.as_bytes());
        }
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        i64::from_be_bytes(head)
    }

    /// Render as a JSON pointer fragment (`#/properties/a`)
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                pointer.push('/');
                pointer.push_str(&segment.replace('~', "~0").replace('/', "~1"));
            } else {
                pointer.push_str(segment);
            }
        }
        pointer
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl Add<&str> for &Reference {
    type Output = Reference;

    fn add(self, segment: &str) -> Reference {
        self.join(segment)
    }
}

impl Add<&str> for Reference {
    type Output = Reference;

    fn add(mut self, segment: &str) -> Reference {
        self.segments.push(segment.to_string());
        self
    }
}

impl Add<&[&str]> for &Reference {
    type Output = Reference;

    fn add(self, segments: &[&str]) -> Reference {
        self.join_all(segments.iter().copied())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// `digit` followed by the decimal digits of `value`
fn prefix_digit(digit: u128, value: u64) -> u128 {
    let width = value.checked_ilog10().map_or(1, |log| log + 1);
    digit * 10u128.pow(width) + u128::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_path_prefixes() {
        let reference = Reference::root() + "properties" + "hi";
        let path = reference.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Reference::root());
        assert_eq!(path[1].to_pointer(), "#/properties");
        assert_eq!(path[2], reference);
    }

    #[test]
    fn test_name_drops_non_alphanumeric_segments() {
        let reference = Reference::parse("#/definitions/address").unwrap();
        assert_eq!(reference.name(), "DefinitionsAddress");

        let reference = Reference::from_segments(["#", "properties", "first_name", "ID"]);
        assert_eq!(reference.name(), "PropertiesId");
    }

    #[test]
    fn test_root_unique_name() {
        assert_eq!(Reference::root().name(), "");
        assert_eq!(Reference::root().unique_name(), ROOT_NAME);
    }

    #[test]
    fn test_unique_name_suffix_is_sign_prefixed() {
        let reference = Reference::root() + "properties" + "hi";
        let name = reference.unique_name();
        let suffix = name.trim_start_matches("PropertiesHi");
        assert!(suffix.starts_with('1') || suffix.starts_with('2'));
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix, reference.hash_suffix().to_string());
    }

    #[test]
    fn test_unique_name_known_values() {
        let hi = Reference::root() + "properties" + "hi";
        assert_eq!(hi.unique_name(), "PropertiesHi24016839735848435904");

        let status = Reference::parse("#/definitions/status").unwrap();
        assert_eq!(status.unique_name(), "DefinitionsStatus18713611116372204922");
    }

    #[test]
    fn test_prefix_digit() {
        assert_eq!(prefix_digit(1, 0), 10);
        assert_eq!(prefix_digit(2, 42), 242);
        assert_eq!(prefix_digit(1, 999), 1999);
        assert_eq!(prefix_digit(2, u64::MAX), 218446744073709551615);
    }

    #[test]
    fn test_unique_name_is_deterministic() {
        let a = Reference::parse("#/properties/a/properties/x").unwrap();
        let b = Reference::parse("#/properties/a/properties/x").unwrap();
        assert_eq!(a.unique_name(), b.unique_name());
    }

    #[test]
    fn test_same_leaf_at_different_depths_does_not_collide() {
        let a = Reference::parse("#/properties/a/properties/x").unwrap();
        let b = Reference::parse("#/properties/b/properties/x").unwrap();
        assert_ne!(a.unique_name(), b.unique_name());

        // Same sanitized name, different raw segments
        let c = Reference::from_segments(["#", "properties", "a-b"]);
        let d = Reference::from_segments(["#", "properties", "a_b"]);
        assert_eq!(c.name(), d.name());
        assert_ne!(c.unique_name(), d.unique_name());
    }

    #[test]
    fn test_segment_boundaries_are_hashed() {
        let a = Reference::from_segments(["#", "ab", "c"]);
        let b = Reference::from_segments(["#", "a", "bc"]);
        assert_ne!(a.hash_suffix(), b.hash_suffix());
    }

    #[test]
    fn test_no_collisions_across_many_paths() {
        let mut seen = HashSet::new();
        for i in 0..200 {
            for j in 0..50 {
                let reference = Reference::root()
                    + "properties"
                    + format!("p{}", i).as_str()
                    + "properties"
                    + format!("q{}", j).as_str();
                assert!(seen.insert(reference.unique_name()));
            }
        }
    }

    #[test]
    fn test_parse_and_pointer() {
        assert_eq!(Reference::parse("#"), Some(Reference::root()));
        assert_eq!(Reference::parse("other.json#/a"), None);
        assert_eq!(Reference::parse("#definitions"), None);

        let escaped = Reference::parse("#/properties/a~1b~0c").unwrap();
        assert_eq!(escaped.last(), Some("a/b~c"));
        assert_eq!(escaped.to_pointer(), "#/properties/a~1b~0c");

        let encoded = Reference::parse("#/definitions/my%20type").unwrap();
        assert_eq!(encoded.last(), Some("my type"));
        assert_eq!(encoded, Reference::root() + "definitions" + "my type");

        // `%7E1` decodes to `~1`, which is then a pointer escape
        let both = Reference::parse("#/definitions/a%7E1b").unwrap();
        assert_eq!(both.last(), Some("a/b"));

        assert_eq!(Reference::parse("#/definitions/%FF"), None);
    }

    #[test]
    fn test_join_and_parent() {
        let base = Reference::root();
        let child = &base + &["definitions", "status"][..];
        assert_eq!(child.to_string(), "#/definitions/status");
        assert_eq!(child.parent().unwrap().to_string(), "#/definitions");
        assert_eq!(Reference::root().parent(), None);
    }
}
