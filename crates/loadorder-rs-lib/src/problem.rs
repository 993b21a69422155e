//! Detection of ordering and compatibility violations.

use std::collections::HashMap;

use serde::*;

use crate::{ActivationEntry, ActivationSequence, EngineVersion, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProblemKind {
	/// The package is not installed.
	Missing,
	/// The package doesn't support the running engine version.
	BadEngine,
	/// A required package is not enabled earlier in the order.
	Requires,
	/// An enabled package the entry wants to load after is not earlier.
	WantsAfter,
	/// An enabled package the entry wants to load before is not later.
	WantsBefore,
	/// An incompatible package is also enabled.
	IncompatibleWith,
	/// The sorter had to break a dependency cycle between the two packages.
	CircularDependency,
}

/// One detected violation. `related_package_id` is empty for kinds that only concern the entry itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
	pub package_id: String,
	pub kind: ProblemKind,
	pub related_package_id: String,
}

impl Problem {
	pub fn new(package_id: impl Into<String>, kind: ProblemKind, related_package_id: impl Into<String>) -> Self {
		Self {
			package_id: package_id.into(),
			kind,
			related_package_id: related_package_id.into(),
		}
	}

	/// Renders the problem using display names where the packages are installed.
	pub fn describe(&self, registry: &Registry) -> String {
		render(self.kind, registry.display_name(&self.package_id), registry.display_name(&self.related_package_id))
	}
}

impl std::fmt::Display for Problem {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", render(self.kind, &self.package_id, &self.related_package_id))
	}
}

fn render(kind: ProblemKind, name: &str, other: &str) -> String {
	match kind {
		ProblemKind::Missing => format!("{} is not installed.", name),
		ProblemKind::BadEngine => format!("{} is incompatible with this version of the game.", name),
		ProblemKind::Requires => format!("{} depends on {}.", name, other),
		ProblemKind::WantsAfter => format!("{} should be after {}.", name, other),
		ProblemKind::WantsBefore => format!("{} should be before {}.", name, other),
		ProblemKind::IncompatibleWith => format!("{} is incompatible with {}.", name, other),
		ProblemKind::CircularDependency => format!("{} is part of a dependency cycle with {}.", name, other),
	}
}

/// Lists the problems of every enabled entry, in order.
///
/// Disabled entries are only relevant as the absence of a package.
/// When `engine` is `None` engine support isn't checked.
pub fn detect_problems(entries: &[ActivationEntry], registry: &Registry, engine: Option<&EngineVersion>) -> Vec<Problem> {
	let mut result = Vec::<Problem>::new();
	let enabled: Vec<&str> = entries.iter().filter(|e| e.enabled).map(|e| e.package_id.as_str()).collect();
	let position: HashMap<&str, usize> = enabled.iter().enumerate().map(|(i, id)| (*id, i)).collect();

	for (i, &package_id) in enabled.iter().enumerate() {
		let Some(record) = registry.get(package_id) else {
			result.push(Problem::new(package_id, ProblemKind::Missing, ""));
			continue;
		};
		let deps = &record.dependencies;

		if let Some(engine) = engine {
			if !record.supports_engine(engine) {
				result.push(Problem::new(package_id, ProblemKind::BadEngine, ""));
			}
		}

		for r in &deps.requires {
			if !position.get(r.package_id.as_str()).map_or(false, |&p| p < i) {
				result.push(Problem::new(package_id, ProblemKind::Requires, r.package_id.as_str()));
			}
		}

		for r in &deps.load_after {
			/* Already reported as `Requires` */
			if deps.requires_package(&r.package_id) { continue; }
			if let Some(&p) = position.get(r.package_id.as_str()) {
				if p >= i {
					result.push(Problem::new(package_id, ProblemKind::WantsAfter, r.package_id.as_str()));
				}
			}
		}

		for r in &deps.load_before {
			if let Some(&p) = position.get(r.package_id.as_str()) {
				if p <= i {
					result.push(Problem::new(package_id, ProblemKind::WantsBefore, r.package_id.as_str()));
				}
			}
		}

		for r in &deps.incompatible_with {
			if r.package_id != package_id && position.contains_key(r.package_id.as_str()) {
				result.push(Problem::new(package_id, ProblemKind::IncompatibleWith, r.package_id.as_str()));
			}
		}
	}

	log::debug!("Found {} problems across {} enabled packages", result.len(), enabled.len());
	result
}

/// Problems concerning a single package, for detail views.
///
/// Doesn't require the sequence to be resolved.
/// - Not installed: only `Missing`.
/// - Enabled: its problems within `activation`.
/// - Disabled or absent from `activation`: only `BadEngine`, the ordering checks don't apply.
pub fn problems_for_package(package_id: &str, activation: &ActivationSequence, registry: &Registry, engine: Option<&EngineVersion>) -> Vec<Problem> {
	let package_id = registry.config().normalize_id(package_id);
	let Some(record) = registry.get(&package_id) else {
		return vec![Problem::new(package_id, ProblemKind::Missing, "")];
	};

	let activation = activation.normalized(registry);
	if activation.is_enabled(&package_id) {
		detect_problems(activation.entries(), registry, engine)
			.into_iter()
			.filter(|p| p.package_id == package_id)
			.collect()
	} else if engine.map_or(false, |engine| !record.supports_engine(engine)) {
		vec![Problem::new(package_id, ProblemKind::BadEngine, "")]
	} else {
		Vec::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{ModRecord, PackageReference, ResolverConfig};

	fn refs(ids: &[&str]) -> Vec<PackageReference> {
		ids.iter().map(|s| PackageReference::new(*s)).collect()
	}

	fn registry() -> Registry {
		let mut a = ModRecord::new("a", "Mod A");
		a.dependencies.requires = refs(&["ludeon.rimworld", "b"]);
		a.dependencies.load_after = refs(&["b", "c"]);
		a.dependencies.load_before = refs(&["d"]);
		let mut c = ModRecord::new("c", "Mod C");
		c.supported_engine_versions.insert("1.0".to_string());
		c.dependencies.incompatible_with = refs(&["d"]);
		let mut d = ModRecord::new("d", "Mod D");
		d.dependencies.incompatible_with = refs(&["c"]);
		Registry::build([ModRecord::new("ludeon.rimworld", "Core"), a, ModRecord::new("b", "Mod B"), c, d], &ResolverConfig::default())
	}

	fn entries(list: &[(&str, bool)]) -> Vec<ActivationEntry> {
		list.iter().map(|(id, e)| ActivationEntry::new(*id, *e)).collect()
	}

	#[test]
	fn clean_order_has_no_problems() {
		let registry = registry();
		let list = entries(&[("ludeon.rimworld", true), ("b", true), ("c", false), ("a", true), ("d", true)]);
		assert!(detect_problems(&list, &registry, Some(&EngineVersion::new("1.3"))).is_empty());
	}

	#[test]
	fn misordered_entries() {
		let registry = registry();
		let list = entries(&[("ludeon.rimworld", true), ("d", true), ("a", true), ("c", true), ("b", true)]);
		let problems = detect_problems(&list, &registry, Some(&EngineVersion::new("1.3")));
		assert_eq!(problems, [
			Problem::new("d", ProblemKind::IncompatibleWith, "c"),
			Problem::new("a", ProblemKind::Requires, "b"),
			Problem::new("a", ProblemKind::WantsAfter, "c"),
			Problem::new("a", ProblemKind::WantsBefore, "d"),
			Problem::new("c", ProblemKind::BadEngine, ""),
			Problem::new("c", ProblemKind::IncompatibleWith, "d"),
		]);
	}

	#[test]
	fn missing_requirement_and_entry() {
		let registry = registry();
		let list = entries(&[("ludeon.rimworld", true), ("a", true), ("ghost", true)]);
		let problems = detect_problems(&list, &registry, None);
		assert_eq!(problems, [
			Problem::new("a", ProblemKind::Requires, "b"),
			Problem::new("ghost", ProblemKind::Missing, ""),
		]);
	}

	#[test]
	fn single_package_problems() {
		let registry = registry();
		let seq = ActivationSequence::from_entries(entries(&[("ludeon.rimworld", true), ("c", false), ("a", true)]));
		let engine = EngineVersion::new("1.3");
		assert_eq!(problems_for_package("ghost", &seq, &registry, Some(&engine)), [Problem::new("ghost", ProblemKind::Missing, "")]);
		assert_eq!(problems_for_package("c", &seq, &registry, Some(&engine)), [Problem::new("c", ProblemKind::BadEngine, "")]);
		assert_eq!(problems_for_package("A", &seq, &registry, Some(&engine)), [Problem::new("a", ProblemKind::Requires, "b")]);
		assert!(problems_for_package("core", &seq, &registry, Some(&engine)).is_empty());
	}

	#[test]
	fn rendering() {
		let registry = registry();
		let p = Problem::new("a", ProblemKind::Requires, "ghost");
		assert_eq!(p.to_string(), "a depends on ghost.");
		assert_eq!(p.describe(&registry), "Mod A depends on ghost.");
		assert_eq!(Problem::new("c", ProblemKind::BadEngine, "").describe(&registry), "Mod C is incompatible with this version of the game.");
	}

	#[test]
	fn kind_serializes_camel_case() {
		assert_eq!(serde_json::to_string(&ProblemKind::IncompatibleWith).unwrap(), "\"incompatibleWith\"");
		assert_eq!(serde_json::to_string(&ProblemKind::BadEngine).unwrap(), "\"badEngine\"");
	}
}
