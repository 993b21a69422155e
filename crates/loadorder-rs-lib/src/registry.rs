//! Immutable index of every installed package.

use std::collections::HashMap;

use crate::ResolverConfig;
use crate::package::*;

/// Installed packages keyed by package id, rebuilt whenever the catalog is rescanned.
///
/// Lookups return `None` for identifiers that are referenced but not installed.
#[derive(Debug, Clone)]
pub struct Registry {
	config: ResolverConfig,
	/// Catalog order of first appearance.
	records: Vec<ModRecord>,
	index: HashMap<String, usize>,
}

impl Registry {
	/// Indexes `records`, normalizing ids and adding the implicit base requirement.
	///
	/// Record ids and every reference are normalized and references de-duplicated,
	/// so records built by hand behave like ones parsed from the catalog.
	///
	/// Every non critical record that declares no relationship at all to the base package
	/// gets a `requires` on it, so the base package always sorts first.
	/// When two records share an id the later one replaces the earlier.
	pub fn build(records: impl IntoIterator<Item = ModRecord>, config: &ResolverConfig) -> Self {
		let mut registry = Self {
			config: config.clone(),
			records: Default::default(),
			index: Default::default(),
		};

		for mut record in records {
			record.package_id = config.normalize_id(&record.package_id);
			normalize_dependencies(&mut record.dependencies, config);
			if record.package_id == config.base_package_id() {
				record.is_critical = true;
			}

			if !record.is_critical && !record.dependencies.references(config.base_package_id()) {
				log::trace!("Adding implicit base requirement to {}", record.package_id);
				record.dependencies.requires.push(PackageReference::new(config.base_package_id()));
			}

			match registry.index.get(&record.package_id) {
				Some(&i) => {
					log::warn!("Duplicate package id {}, replacing earlier record", record.package_id);
					registry.records[i] = record;
				},
				None => {
					registry.index.insert(record.package_id.clone(), registry.records.len());
					registry.records.push(record);
				},
			}
		}

		log::debug!("Built registry with {} packages", registry.records.len());
		registry
	}

	pub fn get(&self, package_id: &str) -> Option<&ModRecord> {
		self.index.get(package_id).map(|&i| &self.records[i])
	}

	pub fn contains(&self, package_id: &str) -> bool {
		self.index.contains_key(package_id)
	}

	/// `true` for installed critical packages. Unknown ids are never critical.
	pub fn is_critical(&self, package_id: &str) -> bool {
		self.get(package_id).map_or(false, |r| r.is_critical)
	}

	/// Records in catalog order.
	pub fn iter(&self) -> impl Iterator<Item = &ModRecord> {
		self.records.iter()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn config(&self) -> &ResolverConfig {
		&self.config
	}

	pub fn base_package_id(&self) -> &str {
		self.config.base_package_id()
	}

	/// Display name of an installed package, or the id itself.
	pub fn display_name<'a>(&'a self, package_id: &'a str) -> &'a str {
		self.get(package_id).map_or(package_id, |r| r.display_name.as_str())
	}
}

fn normalize_dependencies(deps: &mut Dependencies, config: &ResolverConfig) {
	for list in [&mut deps.requires, &mut deps.load_before, &mut deps.load_after, &mut deps.incompatible_with] {
		let normalized = std::mem::take(list).into_iter().map(|mut r| {
			r.package_id = config.normalize_id(&r.package_id);
			r
		});
		*list = dedup_references(normalized);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base() -> ModRecord {
		ModRecord::new("ludeon.rimworld", "Core")
	}

	#[test]
	fn implicit_base_requirement() {
		let registry = Registry::build([base(), ModRecord::new("C.Mod", "C")], &ResolverConfig::default());
		let c = registry.get("c.mod").expect("ids are lowercased");
		assert_eq!(c.dependencies.requires, vec![PackageReference::new("ludeon.rimworld")]);
		assert!(registry.get("ludeon.rimworld").unwrap().dependencies.requires.is_empty());
		assert!(registry.is_critical("ludeon.rimworld"));
	}

	#[test]
	fn existing_base_relationship_is_kept() {
		let mut harmony = ModRecord::new("brrainz.harmony", "Harmony");
		harmony.dependencies.load_before.push(PackageReference::new("ludeon.rimworld"));
		let registry = Registry::build([harmony.clone()], &ResolverConfig::default());
		assert_eq!(registry.get("brrainz.harmony"), Some(&harmony));
	}

	#[test]
	fn unknown_ids_are_absent() {
		let registry = Registry::build([base()], &ResolverConfig::default());
		assert!(registry.get("ghost").is_none());
		assert!(!registry.is_critical("ghost"));
		assert_eq!(registry.display_name("ghost"), "ghost");
	}

	#[test]
	fn later_duplicate_replaces_earlier() {
		let registry = Registry::build(
			[ModRecord::new("a", "Old"), ModRecord::new("b", "B"), ModRecord::new("A", "New")],
			&ResolverConfig::default(),
		);
		assert_eq!(registry.len(), 2);
		assert_eq!(registry.display_name("a"), "New");
		assert_eq!(registry.iter().map(|r| r.package_id.as_str()).collect::<Vec<_>>(), ["a", "b"]);
	}

	#[test]
	fn hand_built_references_are_normalized() {
		let mut harmony = ModRecord::new("brrainz.harmony", "Harmony");
		harmony.dependencies.load_before.push(PackageReference::new("Core"));
		harmony.dependencies.requires.push(PackageReference::new("Some.Lib"));
		harmony.dependencies.requires.push(PackageReference::new("some.lib"));
		let registry = Registry::build([base(), harmony], &ResolverConfig::default());

		let harmony = registry.get("brrainz.harmony").unwrap();
		assert_eq!(harmony.dependencies.load_before, vec![PackageReference::new("ludeon.rimworld")]);
		/* loadBefore on the base already counts, no requirement gets synthesized */
		assert_eq!(harmony.dependencies.requires, vec![PackageReference::new("some.lib")]);
	}
}
