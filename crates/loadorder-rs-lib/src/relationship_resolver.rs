//! Produces a load order and enabled set from a registry and the user's selection.
//!
//! # Usage
//! 1. Create a [`ResolverBuilder`] over a [`Registry`].
//! 1. Give the builder the engine version and the current [`ActivationSequence`].
//! 1. [`ResolverBuilder::build()`] to get a [`Resolver`].
//! 1. [`Resolver::problems()`] to check the selection as it is, or
//! [`Resolver::resolve()`] / [`Resolver::auto_fix()`] to compute a consistent replacement.
//!
//! A pass runs to completion every time, it's linear in the number of edges.
//! Callers re-run it after every edit instead of updating results incrementally.

use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::*;

mod dependency_graph;
pub use dependency_graph::DependencyGraph;
pub use dependency_graph::NodeData;
pub use dependency_graph::EdgeData;

mod load_order;
pub use load_order::SortedOrder;
pub use load_order::sort;

mod closure;
pub use closure::propagate_activation;

mod engine_filter;
pub use engine_filter::apply_engine_filter;

/// Output of a full resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
	/// Sorted entries with requirements enabled and unsupported packages disabled.
	pub entries: ActivationSequence,
	/// Problems remaining in `entries`, in entry order.
	pub problems: Vec<Problem>,
}

pub struct ResolverBuilder<'reg> {
	registry: &'reg Registry,
	engine_version: Option<EngineVersion>,
	activation: ActivationSequence,
}

impl<'reg> ResolverBuilder<'reg> {
	pub fn new(registry: &'reg Registry) -> Self {
		Self {
			registry,
			engine_version: None,
			activation: Default::default(),
		}
	}

	/// Without an engine version no package is filtered or reported for engine support.
	pub fn engine_version(mut self, engine_version: impl Into<EngineVersion>) -> Self {
		self.engine_version = Some(engine_version.into());
		self
	}

	pub fn activation(mut self, activation: ActivationSequence) -> Self {
		self.activation = activation;
		self
	}

	pub fn activation_entries(mut self, entries: impl IntoIterator<Item = ActivationEntry>) -> Self {
		self.activation = ActivationSequence::from_entries(entries);
		self
	}

	pub fn build(self) -> Resolver<'reg> {
		Resolver {
			activation: self.activation.normalized(self.registry),
			registry: self.registry,
			engine_version: self.engine_version,
		}
	}
}

/// A read only resolution context. Every method recomputes its result from scratch.
#[derive(Debug, Clone)]
pub struct Resolver<'reg> {
	registry: &'reg Registry,
	engine_version: Option<EngineVersion>,
	activation: ActivationSequence,
}

impl<'reg> Resolver<'reg> {
	pub fn activation(&self) -> &ActivationSequence {
		&self.activation
	}

	/// Load order of the selection plus everything it has to load after.
	pub fn sort(&self) -> SortedOrder {
		self.sort_with_graph().1
	}

	fn sort_with_graph(&self) -> (DependencyGraph, SortedOrder) {
		let mut graph = DependencyGraph::build(self.registry);
		let seed: Vec<&str> = self.activation.entries().iter().map(|e| e.package_id.as_str()).collect();
		/* Selected ids that nothing references still need a node to be ordered */
		for id in &seed {
			graph.get_or_add_node_index(id);
		}
		let sorted = load_order::sort(&graph, seed.as_slice());
		(graph, sorted)
	}

	fn fix(&self) -> (ActivationSequence, Vec<(String, String)>) {
		let (graph, sorted) = self.sort_with_graph();
		let requested: HashMap<String, bool> = self.activation.entries().iter()
			.map(|e| (e.package_id.clone(), e.enabled))
			.collect();

		let mut entries = propagate_activation(&graph, self.registry, &sorted.order, &requested);
		if let Some(engine) = &self.engine_version {
			apply_engine_filter(&mut entries, self.registry, engine);
		}

		log::debug!("Resolved {} entries from a selection of {}", entries.len(), self.activation.len());
		(ActivationSequence::from_entries(entries), sorted.cycles)
	}

	/// Sorted, closed and engine filtered replacement for the selection.
	pub fn auto_fix(&self) -> ActivationSequence {
		self.fix().0
	}

	/// [`Self::auto_fix()`] together with the problems left in its result.
	///
	/// Cycles broken by the sorter are reported as [`ProblemKind::CircularDependency`]
	/// when both packages end up enabled. The ordering violation on the skipped edge is
	/// replaced by that problem rather than reported a second time.
	pub fn resolve(&self) -> Resolution {
		let (entries, cycles) = self.fix();
		let cycles: Vec<(String, String)> = cycles.into_iter()
			.filter(|(a, b)| entries.is_enabled(a) && entries.is_enabled(b))
			.collect();

		let mut problems = detect_problems(entries.entries(), self.registry, self.engine_version.as_ref());
		problems.retain(|p| !cycles.iter().any(|(package, predecessor)| is_broken_edge(p, package, predecessor)));
		problems.extend(cycles.into_iter()
			.map(|(a, b)| Problem::new(a, ProblemKind::CircularDependency, b)));

		{
			let position: HashMap<&str, usize> = entries.enabled_ids().enumerate().map(|(i, id)| (id, i)).collect();
			problems.sort_by_key(|p| position.get(p.package_id.as_str()).copied().unwrap_or(usize::MAX));
		}

		Resolution { entries, problems }
	}

	/// Problems of the selection exactly as given, without reordering anything.
	pub fn problems(&self) -> Vec<Problem> {
		detect_problems(self.activation.entries(), self.registry, self.engine_version.as_ref())
	}

	/// Problems of one package within the selection as given.
	pub fn problems_for(&self, package_id: &str) -> Vec<Problem> {
		problems_for_package(package_id, &self.activation, self.registry, self.engine_version.as_ref())
	}
}

/// `true` when `problem` is the ordering violation of the skipped `predecessor -> package` edge.
fn is_broken_edge(problem: &Problem, package: &str, predecessor: &str) -> bool {
	match problem.kind {
		ProblemKind::Requires | ProblemKind::WantsAfter => problem.package_id == package && problem.related_package_id == predecessor,
		ProblemKind::WantsBefore => problem.package_id == predecessor && problem.related_package_id == package,
		_ => false,
	}
}

/// Indexes catalog records using the default [`ResolverConfig`].
pub fn build_registry(records: impl IntoIterator<Item = ModRecord>) -> Registry {
	Registry::build(records, &ResolverConfig::default())
}

/// Full pass: sort, activation closure, engine filter and problem detection.
pub fn resolve(registry: &Registry, activation: &ActivationSequence, engine_version: &EngineVersion) -> Resolution {
	ResolverBuilder::new(registry)
		.engine_version(engine_version.clone())
		.activation(activation.clone())
		.build()
		.resolve()
}

/// Problems of a single package within `activation`.
pub fn problems_for(package_id: &str, activation: &ActivationSequence, registry: &Registry, engine_version: &EngineVersion) -> Vec<Problem> {
	problems_for_package(package_id, activation, registry, Some(engine_version))
}

/// A consistent order and enabled set to overwrite a broken selection with.
pub fn auto_fix(registry: &Registry, activation: &ActivationSequence, engine_version: &EngineVersion) -> ActivationSequence {
	ResolverBuilder::new(registry)
		.engine_version(engine_version.clone())
		.activation(activation.clone())
		.build()
		.auto_fix()
}
