//! Transitive enabling along `requires` edges.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{ActivationEntry, Registry};
use super::DependencyGraph;

/// Assigns an enabled flag to every id in `order`.
///
/// Ids missing from `requested` start disabled. Critical packages are always enabled.
/// Enabling a package enables everything it requires, transitively. Soft edges never enable anything.
/// Packages that are not installed are never enabled by propagation.
pub fn propagate_activation(graph: &DependencyGraph, registry: &Registry, order: &[String], requested: &HashMap<String, bool>) -> Vec<ActivationEntry> {
	let mut enabled = HashSet::<&str>::new();
	let mut queue = VecDeque::<&str>::new();

	for id in order {
		if requested.get(id).copied().unwrap_or(false) || registry.is_critical(id) {
			enabled.insert(id.as_str());
			queue.push_back(id.as_str());
		}
	}

	while let Some(id) = queue.pop_front() {
		let Some(src) = graph.get_node_index(id) else { continue };
		for p in graph.hard_predecessors(src) {
			let required = graph.get_node_identifier(p);
			if enabled.contains(required) { continue; }
			if !registry.contains(required) {
				log::debug!("{} requires {} which is not installed", id, required);
				continue;
			}
			log::trace!("Enabling {} required by {}", required, id);
			enabled.insert(required);
			queue.push_back(required);
		}
	}

	order.iter()
		.map(|id| ActivationEntry::new(id.clone(), enabled.contains(id.as_str())))
		.collect()
}
