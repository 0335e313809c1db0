use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder for any field missing from the document
pub const NOT_AVAILABLE: &str = "N/A";

/// The report document returned by the compliance API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub page: Page,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Content,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: Vec<Script>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<HeaderEntry>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub data_assets: Vec<DataAsset>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Stats,
}

/// A script observed on the page.
///
/// Field values are kept as raw JSON because the API is not consistent
/// about their types (scan results may be strings or objects).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default)]
    pub script_id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub origin: Option<Value>,
    #[serde(default)]
    pub vulnerability_scan_result: Option<Value>,
    #[serde(default)]
    pub authorization: Option<Value>,
    #[serde(default)]
    pub justification_of_purpose: Option<Value>,
}

/// Script fields that can back a report column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptField {
    Name,
    Url,
    Origin,
    VulnerabilityScanResult,
    Authorization,
    JustificationOfPurpose,
}

impl ScriptField {
    /// Field name as it appears in the API document
    pub fn source_name(&self) -> &'static str {
        match self {
            ScriptField::Name => "name",
            ScriptField::Url => "url",
            ScriptField::Origin => "origin",
            ScriptField::VulnerabilityScanResult => "vulnerabilityScanResult",
            ScriptField::Authorization => "authorization",
            ScriptField::JustificationOfPurpose => "justificationOfPurpose",
        }
    }
}

impl Script {
    pub fn field(&self, field: ScriptField) -> Option<&Value> {
        let value = match field {
            ScriptField::Name => &self.name,
            ScriptField::Url => &self.url,
            ScriptField::Origin => &self.origin,
            ScriptField::VulnerabilityScanResult => &self.vulnerability_scan_result,
            ScriptField::Authorization => &self.authorization,
            ScriptField::JustificationOfPurpose => &self.justification_of_purpose,
        };
        value.as_ref()
    }

    /// Key used to match data-asset references against this script
    pub fn lookup_key(&self) -> Option<String> {
        self.script_id.as_ref().and_then(cell_text)
    }
}

/// One HTTP header entry.
///
/// Kept as an ordered map: besides `name`, `value` and `authorized` the
/// API may send extra fields, which pass through to the table in
/// document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderEntry {
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataAsset {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: Vec<ScriptRef>,
}

/// Reference from a data asset to a script by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRef {
    #[serde(default)]
    pub script_id: Option<Value>,

    #[serde(default)]
    pub read: Option<Value>,
}

impl ScriptRef {
    pub fn lookup_key(&self) -> Option<String> {
        self.script_id.as_ref().and_then(cell_text)
    }

    /// Whether the asset is read (not just present); follows JSON truthiness
    pub fn is_read(&self) -> bool {
        self.read.as_ref().is_some_and(is_truthy)
    }
}

/// Counters summarising the scan. The API sends both `10` and `10.0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_scripts: Option<f64>,
    #[serde(default)]
    pub first_party_scripts: Option<f64>,
    #[serde(default)]
    pub third_party_scripts: Option<f64>,
    #[serde(default)]
    pub total_vulnerabilities: Option<f64>,
}

impl Stats {
    /// Scripts that are neither first- nor third-party. Absent counters count as 0.
    pub fn other_scripts(&self) -> f64 {
        self.total_scripts.unwrap_or(0.0)
            - (self.first_party_scripts.unwrap_or(0.0) + self.third_party_scripts.unwrap_or(0.0))
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a JSON value as a table cell. `null` has no text.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Cell text for an optional value, falling back to `default`
pub fn cell_or(value: Option<&Value>, default: &str) -> String {
    value.and_then(cell_text).unwrap_or_else(|| default.to_string())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
