//! Catalog entries and the typed records the resolver works with.

use std::collections::BTreeSet;
use serde::*;

use crate::ResolverConfig;

mod reference;
pub use reference::PackageReference;
pub use reference::VersionConstraint;
pub use reference::ConstraintOperator;
pub use reference::parse_references;
pub use reference::dedup_references;

mod engine_version;
pub use engine_version::EngineVersion;

/// Relationships a package declares towards other packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dependencies {
	/// Must be enabled and loaded earlier.
	pub requires: Vec<PackageReference>,
	/// Ordering hint, this package should load before these.
	pub load_before: Vec<PackageReference>,
	/// Ordering hint, this package should load after these.
	pub load_after: Vec<PackageReference>,
	/// Must not be enabled together with this package.
	pub incompatible_with: Vec<PackageReference>,
}

impl Dependencies {
	/// Iterates every reference regardless of the relationship type.
	pub fn all_references(&self) -> impl Iterator<Item = &PackageReference> {
		self.requires.iter()
			.chain(self.load_before.iter())
			.chain(self.load_after.iter())
			.chain(self.incompatible_with.iter())
	}

	pub fn references(&self, package_id: &str) -> bool {
		self.all_references().any(|r| r.package_id == package_id)
	}

	pub fn requires_package(&self, package_id: &str) -> bool {
		self.requires.iter().any(|r| r.package_id == package_id)
	}
}

/// One installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModRecord {
	pub package_id: String,
	pub display_name: String,
	/// Only the base package is critical, it can't be disabled.
	#[serde(default)]
	pub is_critical: bool,
	/// Engine versions the package declares support for. Empty means any version.
	#[serde(default)]
	pub supported_engine_versions: BTreeSet<String>,
	#[serde(default)]
	pub dependencies: Dependencies,
}

impl ModRecord {
	/// A record with no relationships or engine restrictions.
	pub fn new(package_id: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			package_id: package_id.into(),
			display_name: display_name.into(),
			is_critical: false,
			supported_engine_versions: Default::default(),
			dependencies: Default::default(),
		}
	}

	/// Converts an untyped catalog entry into a record.
	///
	/// # Errors
	/// - [`crate::Error::Validation`] when the entry has no package id.
	pub fn from_catalog_entry(entry: CatalogEntry, config: &ResolverConfig) -> crate::Result<Self> {
		let package_id = config.normalize_id(&entry.package_id);
		if package_id.is_empty() {
			return Err(crate::Error::Validation(format!("catalog entry `{}` has no package id", entry.name.unwrap_or_default())));
		}

		let display_name = match entry.name {
			Some(name) if !name.trim().is_empty() => name.trim().to_string(),
			_ => package_id.clone(),
		};

		Ok(Self {
			is_critical: package_id == config.base_package_id(),
			display_name,
			supported_engine_versions: entry.supported_versions.iter()
				.map(|v| v.trim().to_string())
				.filter(|v| !v.is_empty())
				.collect(),
			dependencies: Dependencies {
				requires: parse_references(&entry.requires, config),
				load_before: parse_references(&entry.load_before, config),
				load_after: parse_references(&entry.load_after, config),
				incompatible_with: parse_references(&entry.incompatible_with, config),
			},
			package_id,
		})
	}

	/// `false` only when the record restricts engine versions and `engine` isn't one of them.
	pub fn supports_engine(&self, engine: &EngineVersion) -> bool {
		self.supported_engine_versions.is_empty() || self.supported_engine_versions.contains(engine.as_str())
	}
}

/// A package as described by the external catalog loader, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
	pub package_id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub supported_versions: Vec<String>,
	#[serde(default)]
	pub requires: Vec<String>,
	#[serde(default)]
	pub load_before: Vec<String>,
	#[serde(default)]
	pub load_after: Vec<String>,
	#[serde(default)]
	pub incompatible_with: Vec<String>,
}

/// Reads a JSON array of [`CatalogEntry`] and converts each to a [`ModRecord`].
///
/// Entries that fail validation are skipped with a warning, the rest of the catalog is still returned.
pub fn load_catalog(reader: impl std::io::Read, config: &ResolverConfig) -> crate::Result<Vec<ModRecord>> {
	let entries: Vec<CatalogEntry> = serde_json::from_reader(reader)?;
	let total = entries.len();

	let records: Vec<ModRecord> = entries.into_iter()
		.filter_map(|entry| match ModRecord::from_catalog_entry(entry, config) {
			Ok(record) => Some(record),
			Err(e) => {
				log::warn!("Rejected catalog entry: {}", e);
				None
			},
		})
		.collect();

	log::debug!("Loaded {} of {} catalog entries", records.len(), total);
	Ok(records)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catalog_entry_is_normalized() {
		let entry = CatalogEntry {
			package_id: "UnlimitedHugs.HugsLib".to_string(),
			name: Some("HugsLib".to_string()),
			supported_versions: vec!["1.2".to_string(), " 1.3 ".to_string()],
			requires: vec!["brrainz.harmony".to_string()],
			load_after: vec!["Core".to_string(), "brrainz.harmony".to_string()],
			..Default::default()
		};
		let record = ModRecord::from_catalog_entry(entry, &ResolverConfig::default()).unwrap();
		assert_eq!(record.package_id, "unlimitedhugs.hugslib");
		assert!(!record.is_critical);
		assert!(record.supports_engine(&EngineVersion::new("1.3")));
		assert!(!record.supports_engine(&EngineVersion::new("1.4")));
		assert_eq!(record.dependencies.load_after[0].package_id, "ludeon.rimworld");
		assert!(record.dependencies.requires_package("brrainz.harmony"));
	}

	#[test]
	fn base_entry_is_critical() {
		let entry = CatalogEntry { package_id: "Ludeon.RimWorld".to_string(), ..Default::default() };
		let record = ModRecord::from_catalog_entry(entry, &ResolverConfig::default()).unwrap();
		assert!(record.is_critical);
		assert_eq!(record.display_name, "ludeon.rimworld");
	}

	#[test]
	fn entry_without_id_is_rejected() {
		let entry = CatalogEntry { package_id: "  ".to_string(), name: Some("Nameless".to_string()), ..Default::default() };
		assert!(matches!(ModRecord::from_catalog_entry(entry, &ResolverConfig::default()), Err(crate::Error::Validation(_))));
	}

	#[test]
	fn load_catalog_skips_invalid_entries() {
		let json = r#"[
			{ "packageId": "a.mod", "requires": ["b.mod"] },
			{ "packageId": "" },
			{ "packageId": "b.mod", "name": "B" }
		]"#;
		let records = load_catalog(json.as_bytes(), &ResolverConfig::default()).unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[1].display_name, "B");
	}

	#[test]
	fn load_catalog_bad_json() {
		assert!(matches!(load_catalog("{".as_bytes(), &ResolverConfig::default()), Err(crate::Error::SerdeJSON(_))));
	}
}
