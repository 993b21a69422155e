//! Depth first load order sort.

use std::collections::HashMap;

use petgraph::prelude::*;

use super::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
	InProgress,
	Done,
}

/// Result of [`sort`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedOrder {
	/// Every seed id and everything that must load before them.
	pub order: Vec<String>,
	/// `(package, predecessor)` pairs where the predecessor was still being visited.
	/// The edge was skipped to break the cycle.
	pub cycles: Vec<(String, String)>,
}

struct Frame {
	node: NodeIndex,
	predecessors: Vec<NodeIndex>,
	next: usize,
}

/// Orders `seed` and every package that must load before them.
///
/// Post-order depth first search over predecessor edges, starting from each seed in turn.
/// Packages unrelated to each other keep their relative seed order.
/// A predecessor whose visit is still in progress is skipped, so cycles terminate
/// with a deterministic rotation and are reported in [`SortedOrder::cycles`].
///
/// Seed ids with no node in `graph` are skipped.
pub fn sort<S: AsRef<str>>(graph: &DependencyGraph, seed: &[S]) -> SortedOrder {
	let mut result = SortedOrder::default();
	let mut marks = HashMap::<NodeIndex, Mark>::with_capacity(graph.node_count());
	/* Explicit stack keeps the depth bounded by the node count rather than the call stack */
	let mut stack = Vec::<Frame>::new();

	for root in seed {
		let Some(root) = graph.get_node_index(root.as_ref()) else {
			log::warn!("Seed package {} has no graph node, skipping", root.as_ref());
			continue;
		};
		if marks.contains_key(&root) { continue; }

		marks.insert(root, Mark::InProgress);
		stack.push(Frame { node: root, predecessors: graph.predecessors(root), next: 0 });

		while let Some(frame) = stack.last_mut() {
			if let Some(&p) = frame.predecessors.get(frame.next) {
				frame.next += 1;
				let node = frame.node;
				match marks.get(&p).copied() {
					None => {
						log::trace!("Visiting {} before {}", graph.get_node_identifier(p), graph.get_node_identifier(node));
						marks.insert(p, Mark::InProgress);
						stack.push(Frame { node: p, predecessors: graph.predecessors(p), next: 0 });
					},
					Some(Mark::InProgress) => {
						log::warn!("Dependency cycle between {} and {}, ignoring edge", graph.get_node_identifier(node), graph.get_node_identifier(p));
						result.cycles.push((graph.get_node_identifier(node).to_string(), graph.get_node_identifier(p).to_string()));
					},
					Some(Mark::Done) => {},
				}
			} else {
				let node = frame.node;
				stack.pop();
				marks.insert(node, Mark::Done);
				result.order.push(graph.get_node_identifier(node).to_string());
			}
		}
	}

	result
}
