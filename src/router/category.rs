//! Categories and replacement assets.

use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A user intent bucket (e.g. `trade`, `alert`).
///
/// The set of categories is open: the router is configured with an ordered
/// list, and declaration order decides the ambiguous-fallback default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const TRADE: &'static str = "trade";
    pub const ALERT: &'static str = "alert";

    /// Category names are trimmed and lower-cased.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn trade() -> Self {
        Self::new(Self::TRADE)
    }

    pub fn alert() -> Self {
        Self::new(Self::ALERT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `"trade"` → `"Trade"`, for user-facing messages.
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The default working set: `trade` then `alert`.
    pub fn defaults() -> Vec<Category> {
        vec![Self::trade(), Self::alert()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ReplacementAsset
// ---------------------------------------------------------------------------

/// An opaque playable reference: a URL or an embedded `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReplacementAsset(String);

impl ReplacementAsset {
    /// Returns `None` for an empty reference, which the store uses to mean
    /// "unset".
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        if reference.is_empty() {
            None
        } else {
            Some(Self(reference))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the asset carries its bytes inline.
    pub fn is_embedded(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Approximate decoded size in KB (base64 expands by 4/3).
    pub fn approx_size_kb(&self) -> f64 {
        (self.0.len() as f64 * 0.75) / 1024.0
    }
}

impl fmt::Display for ReplacementAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalised() {
        assert_eq!(Category::new("  Trade "), Category::trade());
        assert_eq!(Category::new("ALERT").as_str(), "alert");
    }

    #[test]
    fn label_capitalises_first_letter() {
        assert_eq!(Category::trade().label(), "Trade");
        assert_eq!(Category::new("").label(), "");
    }

    #[test]
    fn empty_asset_is_unset() {
        assert!(ReplacementAsset::new("").is_none());
        assert!(ReplacementAsset::new("https://x/y.mp3").is_some());
    }

    #[test]
    fn size_estimate_uses_base64_ratio() {
        let asset = ReplacementAsset::new("a".repeat(4096)).unwrap();
        assert!((asset.approx_size_kb() - 3.0).abs() < f64::EPSILON);
        assert!(!asset.is_embedded());
    }
}
