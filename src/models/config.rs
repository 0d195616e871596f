use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Declarative description of one deployment pipeline: which values are
/// required, how they are rendered, and what the finished tree must contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Template path, relative to the deployment root
    pub template: PathBuf,

    /// Generated artifact path, relative to the deployment root
    pub output: PathBuf,

    pub required_values: Vec<RequiredValueSpec>,

    #[serde(default)]
    pub expected_entries: Vec<ExpectedEntry>,
}

fn default_name() -> String {
    "deploy".to_string()
}

impl PipelineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Names of every required value, in declaration order
    pub fn required_names(&self) -> Vec<&str> {
        self.required_values
            .iter()
            .map(|spec| spec.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredValueSpec {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSpec {
    #[serde(flatten)]
    pub rule: FormatRule,

    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FormatRule {
    /// Value must start with one of the listed prefixes
    Prefix { prefixes: Vec<String> },
    /// Value must be an absolute `https://` address with a host
    HttpsUrl,
    /// Value must consist only of ASCII digits
    Digits,
    /// Value must match the regular expression
    Pattern { pattern: Pattern },
}

impl FormatRule {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FormatRule::Prefix { prefixes } => prefixes.iter().any(|p| value.starts_with(p)),
            FormatRule::HttpsUrl => value
                .strip_prefix("https://")
                .and_then(|rest| rest.split(['/', '?', '#']).next())
                .is_some_and(|host| !host.is_empty() && !host.contains(char::is_whitespace)),
            FormatRule::Digits => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            FormatRule::Pattern { pattern } => pattern.is_match(value),
        }
    }
}

impl fmt::Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatRule::Prefix { prefixes } => {
                write!(f, "must start with one of: {}", prefixes.join(", "))
            }
            FormatRule::HttpsUrl => write!(f, "must be an absolute address beginning with https://"),
            FormatRule::Digits => write!(f, "must contain only digits"),
            FormatRule::Pattern { pattern } => write!(f, "must match /{}/", pattern.as_str()),
        }
    }
}

/// Whether a defect blocks promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    #[serde(alias = "critical")]
    Fatal,
    Advisory,
}

impl Severity {
    pub fn is_fatal(self) -> bool {
        self == Severity::Fatal
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "fatal"),
            Severity::Advisory => write!(f, "advisory"),
        }
    }
}

fn advisory() -> Severity {
    Severity::Advisory
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// A file or directory the deployment tree must contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedEntry {
    pub path: PathBuf,

    #[serde(default = "default_kind")]
    pub kind: EntryKind,

    #[serde(default)]
    pub criticality: Severity,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<ContentCheck>,
}

fn default_kind() -> EntryKind {
    EntryKind::File
}

/// A named predicate over file content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum ContentCheck {
    /// No `{{` may remain in the file
    NoUnresolvedPlaceholders {
        #[serde(default)]
        severity: Severity,
    },
    /// No required value name may appear as literal text
    NoRawVariableNames {
        #[serde(default)]
        severity: Severity,
    },
    /// A literal declaration marker must be present
    Contains {
        marker: String,
        #[serde(default)]
        severity: Severity,
    },
    /// At least `threshold` placeholder occurrences must be present
    MinPlaceholders {
        threshold: usize,
        #[serde(default = "advisory")]
        severity: Severity,
    },
    /// Structural marker of a CI manifest, matched as a regex
    Marker {
        name: String,
        pattern: Pattern,
        #[serde(default)]
        severity: Severity,
    },
}

impl ContentCheck {
    pub fn severity(&self) -> Severity {
        match self {
            ContentCheck::NoUnresolvedPlaceholders { severity }
            | ContentCheck::NoRawVariableNames { severity }
            | ContentCheck::Contains { severity, .. }
            | ContentCheck::MinPlaceholders { severity, .. }
            | ContentCheck::Marker { severity, .. } => *severity,
        }
    }

    pub fn name(&self) -> String {
        match self {
            ContentCheck::NoUnresolvedPlaceholders { .. } => "no-unresolved-placeholders".into(),
            ContentCheck::NoRawVariableNames { .. } => "no-raw-variable-names".into(),
            ContentCheck::Contains { marker, .. } => format!("contains '{marker}'"),
            ContentCheck::MinPlaceholders { threshold, .. } => {
                format!("min-placeholders >= {threshold}")
            }
            ContentCheck::Marker { name, .. } => format!("marker '{name}'"),
        }
    }
}

/// A compiled regular expression that round-trips through YAML as its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}
