// Tree assembly.
//
// Parent links are collected into a directed graph first, then the tree is
// materialised from the business root. Building the graph before any
// `TopoNode` exists keeps child order and cycle detection independent of the
// order in which parents and children arrive.

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::{is_cyclic_directed, tarjan_scc},
    graph::{DiGraph, NodeIndex},
};

use crate::{
    domain::{FlatInstanceIndex, InstanceKey, TopoNode},
    mainline::{InstanceMainline, TopoError},
    storage::DocumentStore,
};

/// Parent to child edges between index positions.
type LinkGraph = DiGraph<usize, ()>;

impl<S: DocumentStore> InstanceMainline<'_, S> {
    /// Links every instance to its parent and returns the business root.
    ///
    /// Parents that are still missing are repaired on the way, so this can
    /// run without a prior [`InstanceMainline::repair_gaps`]. Returns `None`
    /// when no instance hangs under the business.
    ///
    /// # Errors
    ///
    /// Fails if a parent cannot be resolved or the links form a cycle.
    pub fn assemble(&mut self) -> Result<Option<TopoNode>, TopoError> {
        let mut graph = LinkGraph::with_capacity(self.index.len(), self.index.len());
        let mut nodes: HashMap<InstanceKey, NodeIndex> = HashMap::with_capacity(self.index.len());
        let business = self.business_key();
        let mut root = None;

        // The index can grow while this runs.
        let mut position = 0;
        while position < self.index.len() {
            if let Some(parent) = self.expected_parent_key(position)? {
                let parent_position = self.resolve_or_repair(position, &parent)?;
                let parent_node = node_for(&mut graph, &mut nodes, &self.index, parent_position);
                let child_node = node_for(&mut graph, &mut nodes, &self.index, position);
                graph.add_edge(parent_node, child_node, ());

                if parent == business {
                    root = Some(parent_node);
                }
            }
            position += 1;
        }

        if is_cyclic_directed(&graph) {
            let key = cycle_member(&graph, &self.index);
            tracing::error!(business = self.business_id, %key, "parent links form a cycle");
            return Err(TopoError::Cycle {
                business: self.business_id,
                key,
            });
        }

        tracing::debug!(
            business = self.business_id,
            nodes = graph.node_count(),
            links = graph.edge_count(),
            "linked instances"
        );
        Ok(root.map(|root| materialize(&graph, &self.index, root)))
    }
}

fn node_for(
    graph: &mut LinkGraph,
    nodes: &mut HashMap<InstanceKey, NodeIndex>,
    index: &FlatInstanceIndex,
    position: usize,
) -> NodeIndex {
    *nodes
        .entry(index[position].key())
        .or_insert_with(|| graph.add_node(position))
}

/// Copies the subtree under `node` out of the graph.
fn materialize(graph: &LinkGraph, index: &FlatInstanceIndex, node: NodeIndex) -> TopoNode {
    let instance = &index[graph[node]];

    // Neighbours come back newest edge first.
    let mut children: Vec<NodeIndex> = graph
        .neighbors_directed(node, Direction::Outgoing)
        .collect();
    children.reverse();

    TopoNode {
        children: children
            .into_iter()
            .map(|child| materialize(graph, index, child))
            .collect(),
        ..TopoNode::new(instance.object.clone(), instance.id, instance.detail.clone())
    }
}

/// The first instance found on a cycle.
fn cycle_member(graph: &LinkGraph, index: &FlatInstanceIndex) -> InstanceKey {
    let node = tarjan_scc(graph)
        .into_iter()
        .find(|component| component.len() > 1)
        .and_then(|component| component.into_iter().min_by_key(|node| graph[*node]))
        .or_else(|| {
            graph
                .node_indices()
                .find(|node| graph.contains_edge(*node, *node))
        })
        .unwrap_or_default();
    index[graph[node]].key()
}
