use serde::{Serialize, Deserialize};

/// Settings shared by every stage of the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
	base_package_id: String,
	base_alias: String,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			base_package_id: "ludeon.rimworld".to_string(),
			base_alias: "core".to_string(),
		}
	}
}

impl ResolverConfig {
	/// Reads a JSON config file. Missing fields take their default values.
	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("Loading resolver config from {}", path.display());
		let data = std::fs::read_to_string(path)?;
		let mut config: ResolverConfig = serde_json::from_str(&data)?;
		/* Route through the setters so hand written files get the same normalization */
		let ResolverConfig { base_package_id, base_alias } = config.clone();
		config.set_base_package_id(&base_package_id);
		config.set_base_alias(&base_alias);
		if config.base_package_id.is_empty() {
			return Err(crate::Error::Validation("base package id can't be empty".to_string()));
		}
		Ok(config)
	}

	/// Identifier of the critical package every other package implicitly depends on.
	pub fn base_package_id(&self) -> &str {
		&self.base_package_id
	}
	pub fn set_base_package_id(&mut self, id: &str) {
		self.base_package_id = id.trim().to_lowercase();
	}

	/// Reference text that resolves to [`Self::base_package_id`].
	pub fn base_alias(&self) -> &str {
		&self.base_alias
	}
	pub fn set_base_alias(&mut self, alias: &str) {
		self.base_alias = alias.trim().to_lowercase();
	}

	/// Lowercases `raw` and maps the base alias onto the base package id.
	pub fn normalize_id(&self, raw: &str) -> String {
		let id = raw.trim().to_lowercase();
		if id == self.base_alias {
			self.base_package_id.clone()
		} else {
			id
		}
	}
}
