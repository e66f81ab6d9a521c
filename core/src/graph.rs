#![deny(missing_docs)]

//! # Dependency Graph & Orderer
//!
//! Builds the reference graph over translated declarations and computes a
//! declaration order in which every declaration follows its `namedRef`
//! dependencies.
//!
//! `lazyRef` edges are recorded but impose no ordering: they are resolved at
//! use time. The translator breaks every cycle with at least one lazy edge, so
//! a cycle among named edges is reported as `InternalCycle`.

use crate::error::{CompileError, CompileResult};
use crate::ir::{RefKind, ValidationExpr};
use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Reference graph over named declarations.
///
/// An edge points from a declaration to the declaration it references.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, RefKind>,
}

impl DependencyGraph {
    /// Builds the graph. The iteration order of `declarations` is the
    /// tie-breaking order of [`DependencyGraph::order`].
    ///
    /// References to names outside `declarations` are ignored.
    pub fn build(declarations: &IndexMap<String, ValidationExpr>) -> Self {
        let mut graph = DiGraph::with_capacity(declarations.len(), declarations.len());
        for name in declarations.keys() {
            graph.add_node(name.clone());
        }

        for (idx, expr) in declarations.values().enumerate() {
            let source = NodeIndex::new(idx);
            expr.visit_refs(&mut |target, kind| {
                let Some(target) = declarations.get_index_of(target).map(NodeIndex::new) else {
                    return;
                };
                let known = graph
                    .edges_connecting(source, target)
                    .any(|edge| *edge.weight() == kind);
                if !known {
                    graph.add_edge(source, target, kind);
                }
            });
        }

        Self { graph }
    }

    /// Topological order over `namedRef` edges (Kahn's algorithm). Among
    /// declarations that are ready at the same time, the earliest in input
    /// order goes first.
    ///
    /// # Errors
    ///
    /// `InternalCycle` listing the declarations that form a named cycle.
    pub fn order(&self) -> CompileResult<Vec<&str>> {
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|node| self.named_edges(node, Direction::Outgoing).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|node| pending[node.index()] == 0)
            .map(Reverse)
            .collect();

        let mut ordered = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(node)) = ready.pop() {
            ordered.push(self.graph[node].as_str());
            for dependent in self.named_edges(node, Direction::Incoming) {
                let slot = &mut pending[dependent.index()];
                *slot -= 1;
                if *slot == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if ordered.len() != self.graph.node_count() {
            return Err(CompileError::InternalCycle {
                names: self.named_cycles(),
            });
        }
        Ok(ordered)
    }

    /// Neighbours across `namedRef` edges only.
    fn named_edges(
        &self,
        node: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges_directed(node, direction)
            .filter(|edge| *edge.weight() == RefKind::Named)
            .map(move |edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
    }

    /// Members of every strongly connected component held together by
    /// `namedRef` edges, in input order.
    fn named_cycles(&self) -> Vec<String> {
        let named = self.graph.filter_map(
            |_, name| Some(name.clone()),
            |_, kind| (*kind == RefKind::Named).then_some(()),
        );
        let mut members: Vec<NodeIndex> = tarjan_scc(&named)
            .into_iter()
            .filter(|scc| scc.len() > 1 || named.contains_edge(scc[0], scc[0]))
            .flatten()
            .collect();
        members.sort();
        members.into_iter().map(|node| named[node].clone()).collect()
    }
}
