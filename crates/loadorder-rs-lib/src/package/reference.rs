use serde::*;

use crate::ResolverConfig;

/// Comparison carried by a version qualified reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintOperator {
	#[serde(rename = "==")] Eq,
	#[serde(rename = ">=")] AtLeast,
	#[serde(rename = "<=")] AtMost,
}

impl std::str::FromStr for ConstraintOperator {
	type Err = crate::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"==" => Ok(ConstraintOperator::Eq),
			">=" => Ok(ConstraintOperator::AtLeast),
			"<=" => Ok(ConstraintOperator::AtMost),
			_ => Err(crate::Error::Parse(format!("unknown version operator `{}`", s))),
		}
	}
}

impl std::fmt::Display for ConstraintOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ConstraintOperator::Eq => "==",
			ConstraintOperator::AtLeast => ">=",
			ConstraintOperator::AtMost => "<=",
		};
		write!(f, "{}", s)
	}
}

/// A version requirement attached to a reference.
///
/// Constraints are stored but never evaluated against installed versions.
/// Keeping them in the model lets enforcement be added without changing the data model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionConstraint {
	pub operator: ConstraintOperator,
	pub version: String,
}

/// Points at a package by identifier, optionally qualified with a version.
///
/// The referenced package does not have to be installed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageReference {
	pub package_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub constraint: Option<VersionConstraint>,
}

impl PackageReference {
	/// An unconstrained reference. `package_id` is used as given.
	pub fn new(package_id: impl Into<String>) -> Self {
		Self {
			package_id: package_id.into(),
			constraint: None,
		}
	}

	/// Parses `"<packageId>"` or `"<packageId> <operator> <version>"`.
	///
	/// Parsing is permissive, anything after the identifier that doesn't form a valid
	/// constraint is dropped and the reference is left unconstrained.
	/// Returns `None` only when there is no identifier at all.
	pub fn parse(raw: &str, config: &ResolverConfig) -> Option<Self> {
		let mut parts = raw.split_whitespace();
		let package_id = config.normalize_id(parts.next()?);

		let constraint = match (parts.next(), parts.next()) {
			(Some(op), Some(version)) => match op.parse::<ConstraintOperator>() {
				Ok(operator) => Some(VersionConstraint { operator, version: version.to_string() }),
				Err(e) => {
					log::warn!("Ignoring version on reference `{}`: {}", raw, e);
					None
				},
			},
			(Some(_), None) => {
				log::warn!("Ignoring incomplete version on reference `{}`", raw);
				None
			},
			_ => None,
		};

		Some(Self { package_id, constraint })
	}

	pub fn is_constrained(&self) -> bool {
		self.constraint.is_some()
	}
}

impl std::fmt::Display for PackageReference {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.constraint {
			Some(c) => write!(f, "{} {} {}", self.package_id, c.operator, c.version),
			None => write!(f, "{}", self.package_id),
		}
	}
}

/// Parses a list of raw references, dropping unusable entries and duplicates.
///
/// See [`dedup_references`] for how duplicates are merged.
pub fn parse_references<I, S>(raw: I, config: &ResolverConfig) -> Vec<PackageReference>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	dedup_references(raw.into_iter().filter_map(|r| {
		let parsed = PackageReference::parse(r.as_ref(), config);
		if parsed.is_none() {
			log::warn!("Skipping empty package reference");
		}
		parsed
	}))
}

/// Keeps each identifier once, at the position it first appeared.
/// If any duplicate carries a constraint the last constrained one wins.
pub fn dedup_references(refs: impl IntoIterator<Item = PackageReference>) -> Vec<PackageReference> {
	let mut out = Vec::<PackageReference>::new();

	for r in refs {
		match out.iter_mut().find(|existing| existing.package_id == r.package_id) {
			Some(existing) => {
				if r.is_constrained() {
					*existing = r;
				}
			},
			None => out.push(r),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> ResolverConfig {
		ResolverConfig::default()
	}

	#[test]
	fn parse_bare_identifier() {
		let r = PackageReference::parse("Brrainz.Harmony", &config()).unwrap();
		assert_eq!(r, PackageReference::new("brrainz.harmony"));
	}

	#[test]
	fn parse_constrained() {
		let r = PackageReference::parse("core >= 1.0", &config()).unwrap();
		assert_eq!(r.package_id, "ludeon.rimworld");
		assert_eq!(r.constraint, Some(VersionConstraint { operator: ConstraintOperator::AtLeast, version: "1.0".to_string() }));
		assert_eq!(r.to_string(), "ludeon.rimworld >= 1.0");
	}

	#[test]
	fn parse_degrades_bad_operator() {
		let r = PackageReference::parse("foo.bar ~> 1.0", &config()).unwrap();
		assert_eq!(r, PackageReference::new("foo.bar"));
		let r = PackageReference::parse("foo.bar >=", &config()).unwrap();
		assert_eq!(r, PackageReference::new("foo.bar"));
	}

	#[test]
	fn parse_empty_is_none() {
		assert!(PackageReference::parse("   ", &config()).is_none());
	}

	#[test]
	fn dedup_prefers_last_constrained() {
		let refs = parse_references(["a", "b", "A == 1", "a >= 2", "a"], &config());
		assert_eq!(refs.len(), 2);
		assert_eq!(refs[0].package_id, "a");
		assert_eq!(refs[0].constraint.as_ref().unwrap().operator, ConstraintOperator::AtLeast);
		assert_eq!(refs[1], PackageReference::new("b"));
	}

	#[test]
	fn dedup_keeps_unconstrained_form() {
		let refs = parse_references(["x", "X", ""], &config());
		assert_eq!(refs, vec![PackageReference::new("x")]);
	}

	#[test]
	fn dedup_already_parsed() {
		let refs = dedup_references([
			PackageReference::new("b"),
			PackageReference::parse("a == 1", &config()).unwrap(),
			PackageReference::new("b"),
			PackageReference::new("a"),
		]);
		assert_eq!(refs.len(), 2);
		assert_eq!(refs[0], PackageReference::new("b"));
		assert!(refs[1].is_constrained());
	}
}
