//! The user's working selection of packages.

use serde::*;

use crate::Registry;

/// One package in an activation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationEntry {
	pub package_id: String,
	pub enabled: bool,
}

impl ActivationEntry {
	pub fn new(package_id: impl Into<String>, enabled: bool) -> Self {
		Self { package_id: package_id.into(), enabled }
	}
}

/// Ordered selection of packages with enabled flags, each id appearing once.
///
/// Independent of the registry, entries may name packages that are not installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationSequence {
	entries: Vec<ActivationEntry>,
}

impl ActivationSequence {
	/// Collapses duplicate ids. The first occurrence keeps its position and the last one decides the flag.
	pub fn from_entries(entries: impl IntoIterator<Item = ActivationEntry>) -> Self {
		let mut seq = Self::default();
		for entry in entries {
			match seq.position(&entry.package_id) {
				Some(i) => seq.entries[i].enabled = entry.enabled,
				None => seq.entries.push(entry),
			}
		}
		seq
	}

	/// Every id enabled, in the order given.
	pub fn from_enabled_ids<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::from_entries(ids.into_iter().map(|id| ActivationEntry::new(id, true)))
	}

	/// Rewrites every id through the registry's normalization, merging any ids that collapse together.
	///
	/// Critical packages come out enabled whatever the input said.
	pub fn normalized(&self, registry: &Registry) -> Self {
		let mut seq = Self::from_entries(self.entries.iter().map(|e| ActivationEntry::new(registry.config().normalize_id(&e.package_id), e.enabled)));
		for e in seq.entries.iter_mut().filter(|e| !e.enabled && registry.is_critical(&e.package_id)) {
			log::trace!("Enabling critical package {}", e.package_id);
			e.enabled = true;
		}
		seq
	}

	pub fn entries(&self) -> &[ActivationEntry] {
		&self.entries
	}

	pub fn into_entries(self) -> Vec<ActivationEntry> {
		self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn position(&self, package_id: &str) -> Option<usize> {
		self.entries.iter().position(|e| e.package_id == package_id)
	}

	pub fn get(&self, package_id: &str) -> Option<&ActivationEntry> {
		self.entries.iter().find(|e| e.package_id == package_id)
	}

	pub fn is_enabled(&self, package_id: &str) -> bool {
		self.get(package_id).map_or(false, |e| e.enabled)
	}

	/// Enabled ids in order.
	pub fn enabled_ids(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().filter(|e| e.enabled).map(|e| e.package_id.as_str())
	}

	/// Changes the flag on `package_id`.
	///
	/// - Disabling a critical package is ignored.
	/// - Enabling an id not in the sequence appends it, disabling one is ignored.
	pub fn set_enabled(&mut self, package_id: &str, enabled: bool, registry: &Registry) {
		let package_id = registry.config().normalize_id(package_id);
		if !enabled && registry.is_critical(&package_id) {
			log::debug!("Ignoring request to disable critical package {}", package_id);
			return;
		}

		log::trace!("Setting {} enabled = {}", package_id, enabled);
		match self.position(&package_id) {
			Some(i) => self.entries[i].enabled = enabled,
			None if enabled => self.entries.push(ActivationEntry::new(package_id, true)),
			None => {},
		}
	}

	/// Moves `package_id` to `position`, enabling it. Ids not in the sequence are inserted.
	///
	/// `position` refers to the sequence before the move and is clamped to its length.
	pub fn move_to(&mut self, package_id: &str, position: usize) {
		let mut position = position.min(self.entries.len());
		if let Some(old) = self.position(package_id) {
			self.entries.remove(old);
			if old < position {
				position -= 1;
			}
		}
		log::trace!("Moving {} to position {}", package_id, position);
		self.entries.insert(position, ActivationEntry::new(package_id, true));
	}

	/// Drops `package_id` from the sequence, returning its entry.
	pub fn remove(&mut self, package_id: &str) -> Option<ActivationEntry> {
		self.position(package_id).map(|i| self.entries.remove(i))
	}
}

impl FromIterator<ActivationEntry> for ActivationSequence {
	fn from_iter<T: IntoIterator<Item = ActivationEntry>>(iter: T) -> Self {
		Self::from_entries(iter)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{ModRecord, ResolverConfig};

	fn ids(seq: &ActivationSequence) -> Vec<(&str, bool)> {
		seq.entries().iter().map(|e| (e.package_id.as_str(), e.enabled)).collect()
	}

	fn registry() -> Registry {
		Registry::build([ModRecord::new("ludeon.rimworld", "Core"), ModRecord::new("a", "A")], &ResolverConfig::default())
	}

	#[test]
	fn duplicates_collapse() {
		let seq = ActivationSequence::from_entries([
			ActivationEntry::new("a", true),
			ActivationEntry::new("b", true),
			ActivationEntry::new("a", false),
		]);
		assert_eq!(ids(&seq), [("a", false), ("b", true)]);
	}

	#[test]
	fn critical_cannot_be_disabled() {
		let registry = registry();
		let mut seq = ActivationSequence::from_enabled_ids(["ludeon.rimworld", "a"]);
		seq.set_enabled("core", false, &registry);
		seq.set_enabled("a", false, &registry);
		assert_eq!(ids(&seq), [("ludeon.rimworld", true), ("a", false)]);
	}

	#[test]
	fn enabling_absent_appends() {
		let registry = registry();
		let mut seq = ActivationSequence::default();
		seq.set_enabled("ghost", false, &registry);
		assert!(seq.is_empty());
		seq.set_enabled("Ghost", true, &registry);
		assert_eq!(ids(&seq), [("ghost", true)]);
	}

	#[test]
	fn move_down_accounts_for_removed_slot() {
		let mut seq = ActivationSequence::from_enabled_ids(["a", "b", "c"]);
		seq.move_to("a", 2);
		assert_eq!(ids(&seq), [("b", true), ("a", true), ("c", true)]);
		seq.move_to("c", 0);
		assert_eq!(ids(&seq), [("c", true), ("b", true), ("a", true)]);
		seq.move_to("d", 99);
		assert_eq!(seq.position("d"), Some(3));
	}

	#[test]
	fn normalized_merges_aliases() {
		let registry = registry();
		let seq = ActivationSequence::from_entries([
			ActivationEntry::new("Core", true),
			ActivationEntry::new("A", true),
			ActivationEntry::new("ludeon.rimworld", false),
		]);
		assert_eq!(ids(&seq.normalized(&registry)), [("ludeon.rimworld", true), ("a", true)]);
	}

	#[test]
	fn normalized_enables_critical() {
		let registry = registry();
		let seq = ActivationSequence::from_entries([
			ActivationEntry::new("ludeon.rimworld", false),
			ActivationEntry::new("a", false),
		]);
		assert_eq!(ids(&seq.normalized(&registry)), [("ludeon.rimworld", true), ("a", false)]);
	}
}
