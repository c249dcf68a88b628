//! Join key between product records and fleet models

use serde::{Deserialize, Deserializer, Serialize};

/// Largest integer an f64 represents exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Numeric fleet model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub i64);

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw join-key cell as it came out of the source sheet
///
/// Spreadsheets hand these over as numbers or text, sometimes empty.
/// The key only takes part in a join when [`ModelKey::id`] can read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelKey(String);

impl ModelKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key as a whole number.
    ///
    /// Empty, non-numeric, non-finite and fractional values yield `None`;
    /// an empty cell is never read as zero.
    pub fn id(&self) -> Option<ModelId> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return None;
        }
        let value: f64 = trimmed.parse().ok()?;
        if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_EXACT_INTEGER {
            return None;
        }
        Some(ModelId(value as i64))
    }
}

impl From<i64> for ModelKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ModelKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<ModelId> for ModelKey {
    fn from(id: ModelId) -> Self {
        Self(id.0.to_string())
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModelKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_string(deserializer).map(ModelKey)
    }
}

/// Any scalar cell in a JSON snapshot
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarCell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Deserialize a string, number, bool or null into text (null becomes "")
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<ScalarCell>::deserialize(deserializer)?;
    Ok(match cell {
        Some(ScalarCell::Text(s)) => s,
        Some(ScalarCell::Int(n)) => n.to_string(),
        Some(ScalarCell::Float(n)) => n.to_string(),
        Some(ScalarCell::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}
