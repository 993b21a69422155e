use lazy_static::lazy_static;
use regex::Regex;
use serde::*;

lazy_static! {
	/* Leading `major.minor` of a game version string */
	static ref VERSION_TEXT_RE: Regex = Regex::new(r"^\d+\.\d+").expect("regex failed to compile.");
}

/// Version of the running game engine, compared verbatim against supported version lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineVersion(String);

impl EngineVersion {
	pub fn new(version: impl Into<String>) -> Self {
		Self(version.into().trim().to_string())
	}

	/// Pulls the leading `major.minor` out of a version string such as `1.3.3200 rev726`.
	pub fn from_version_text(text: &str) -> Option<Self> {
		VERSION_TEXT_RE.find(text.trim_start()).map(|m| Self(m.as_str().to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for EngineVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for EngineVersion {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
