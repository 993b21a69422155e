//! Module for only DependencyGraph functions not related to the overall resolving process.

use std::collections::HashMap;

use petgraph::prelude::*;
use serde::{Serialize, Deserialize};

use crate::Registry;
use crate::package::*;

/// "Must load before" relationships between every package the registry knows or references.
///
/// Edges point from the package that loads first to the one that loads after it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
	pub graph: StableDiGraph<NodeData, EdgeData>,
	index: HashMap<String, NodeIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeData {
	/// Node for a package present in the registry.
	Installed(String),
	/// Node only refers to an identifier with no additional information.
	Stub(String),
}

/// The constraint carried on each edge is kept for reference only, it is never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeData {
	/// Target requires the source. Hard edge.
	Requires(Option<VersionConstraint>),
	/// Target asked to load after the source. Soft edge.
	LoadAfter(Option<VersionConstraint>),
	/// Source asked to load before the target. Soft edge.
	LoadBefore(Option<VersionConstraint>),
}

impl EdgeData {
	pub fn is_hard(&self) -> bool {
		matches!(self, EdgeData::Requires(_))
	}
}

impl NodeData {
	pub fn identifier(&self) -> &str {
		match self {
			NodeData::Installed(id) | NodeData::Stub(id) => id,
		}
	}
}

impl DependencyGraph {
	/// Builds edges from every record in the registry, enabled or not.
	///
	/// Referenced ids that aren't installed become `Stub` nodes.
	pub fn build(registry: &Registry) -> Self {
		let mut dep_graph = Self::default();

		/* Installed nodes first so stubs never shadow a real package */
		for record in registry.iter() {
			let i = dep_graph.graph.add_node(NodeData::Installed(record.package_id.clone()));
			dep_graph.index.insert(record.package_id.clone(), i);
		}

		for record in registry.iter() {
			let src = dep_graph.index[&record.package_id];
			let deps = &record.dependencies;

			for r in &deps.requires {
				let b = dep_graph.get_or_add_node_index(&r.package_id);
				dep_graph.add_edge(b, src, EdgeData::Requires(r.constraint.clone()));
			}
			for r in &deps.load_after {
				let b = dep_graph.get_or_add_node_index(&r.package_id);
				dep_graph.add_edge(b, src, EdgeData::LoadAfter(r.constraint.clone()));
			}
			for r in &deps.load_before {
				let b = dep_graph.get_or_add_node_index(&r.package_id);
				dep_graph.add_edge(src, b, EdgeData::LoadBefore(r.constraint.clone()));
			}
		}

		log::debug!("Built dependency graph with {} nodes and {} edges", dep_graph.graph.node_count(), dep_graph.graph.edge_count());
		dep_graph
	}

	fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, data: EdgeData) {
		if a == b {
			log::warn!("Ignoring relationship of {} to itself", self.graph[a].identifier());
			return;
		}
		self.graph.add_edge(a, b, data);
	}

	pub fn get_node_index(&self, name: &str) -> Option<NodeIndex> {
		self.index.get(name).copied()
	}

	/// Returns the index of the existing node or a new `Stub` node with `name`
	pub fn get_or_add_node_index(&mut self, name: &str) -> NodeIndex {
		if let Some(i) = self.get_node_index(name) {
			return i;
		}
		let i = self.graph.add_node(NodeData::Stub(name.to_string()));
		self.index.insert(name.to_string(), i);
		i
	}

	/// # Panics
	/// - If `src` is not a node of this graph.
	pub fn get_node_identifier(&self, src: NodeIndex) -> &str {
		self.graph[src].identifier()
	}

	/// Packages that must load before `src`: hard edges first, then soft, each in declaration order.
	pub fn predecessors(&self, src: NodeIndex) -> Vec<NodeIndex> {
		/* petgraph walks edges newest first, edge indices restore insertion order */
		let mut edges: Vec<_> = self.graph.edges_directed(src, Incoming)
			.map(|e| (!e.weight().is_hard(), e.id(), e.source()))
			.collect();
		edges.sort();
		edges.into_iter().map(|(_, _, source)| source).collect()
	}

	/// Packages `src` requires.
	pub fn hard_predecessors(&self, src: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
		self.graph.edges_directed(src, Incoming)
			.filter(|e| e.weight().is_hard())
			.map(|e| e.source())
	}

	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ResolverConfig;

	fn registry() -> Registry {
		let mut a = ModRecord::new("a", "A");
		a.dependencies.requires.push(PackageReference::new("ghost"));
		a.dependencies.load_after.push(PackageReference::new("b"));
		a.dependencies.load_before.push(PackageReference::new("c"));
		let b = ModRecord::new("b", "B");
		let c = ModRecord::new("c", "C");
		Registry::build([ModRecord::new("ludeon.rimworld", "Core"), a, b, c], &ResolverConfig::default())
	}

	fn ids(graph: &DependencyGraph, nodes: Vec<NodeIndex>) -> Vec<&str> {
		nodes.into_iter().map(|i| graph.get_node_identifier(i)).collect()
	}

	#[test]
	fn referenced_ids_become_stubs() {
		let graph = DependencyGraph::build(&registry());
		let ghost = graph.get_node_index("ghost").expect("stub node for ghost");
		assert_eq!(graph.graph[ghost], NodeData::Stub("ghost".to_string()));
		assert!(matches!(graph.graph[graph.get_node_index("a").unwrap()], NodeData::Installed(_)));
	}

	#[test]
	fn edge_directions() {
		let graph = DependencyGraph::build(&registry());
		let a = graph.get_node_index("a").unwrap();
		let c = graph.get_node_index("c").unwrap();
		/* a requires ghost and the implicit base, loads after b */
		assert_eq!(ids(&graph, graph.predecessors(a)), ["ghost", "ludeon.rimworld", "b"]);
		assert_eq!(ids(&graph, graph.hard_predecessors(a).collect()).len(), 2);
		/* a asked to load before c, c also requires the base */
		assert_eq!(ids(&graph, graph.predecessors(c)), ["ludeon.rimworld", "a"]);
	}

	#[test]
	fn self_reference_is_dropped() {
		let mut a = ModRecord::new("a", "A");
		a.dependencies.load_after.push(PackageReference::new("a"));
		let graph = DependencyGraph::build(&Registry::build([a], &ResolverConfig::default()));
		let a = graph.get_node_index("a").unwrap();
		assert_eq!(ids(&graph, graph.predecessors(a)), ["ludeon.rimworld"]);
	}
}
