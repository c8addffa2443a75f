//! Pipeline graph validation and ordering
//!
//! Produces a linear execution order over a pipeline definition such that
//! every node's dependencies precede it. Order among equally-ready nodes
//! follows queue insertion order; callers must only rely on dependency
//! ordering, never on a specific order among independent branches.

use aiops_core::domain::pipeline::PipelineDefinition;
use std::collections::{HashMap, VecDeque};

use crate::error::GraphError;

/// Computes the execution order via Kahn's algorithm.
///
/// Returns `GraphError::UnknownNode` when a connection references an id
/// absent from `nodes`, and `GraphError::Cycle` when the graph is not a DAG.
pub fn execution_order(def: &PipelineDefinition) -> Result<Vec<String>, GraphError> {
    let mut in_degree: HashMap<&str, usize> =
        def.nodes.keys().map(|id| (id.as_str(), 0)).collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();

    for conn in &def.connections {
        if !def.nodes.contains_key(&conn.from) {
            return Err(GraphError::UnknownNode(conn.from.clone()));
        }
        if !def.nodes.contains_key(&conn.to) {
            return Err(GraphError::UnknownNode(conn.to.clone()));
        }
        *in_degree.get_mut(conn.to.as_str()).unwrap() += 1;
        successors
            .entry(conn.from.as_str())
            .or_default()
            .push(conn.to.as_str());
    }

    // Seed with zero-in-degree nodes in declaration order.
    let mut queue: VecDeque<&str> = def
        .nodes
        .keys()
        .map(String::as_str)
        .filter(|id| in_degree[id] == 0)
        .collect();

    let mut order = Vec::with_capacity(def.nodes.len());
    while let Some(id) = queue.pop_front() {
        order.push(id.to_string());
        for succ in successors.get(id).into_iter().flatten() {
            let degree = in_degree.get_mut(succ).unwrap();
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() < def.nodes.len() {
        return Err(GraphError::Cycle);
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiops_core::domain::pipeline::{Connection, Node, NodeKind, NodeMap};

    fn script(name: &str) -> Node {
        Node {
            name: name.to_string(),
            kind: NodeKind::Script {
                content: "true".to_string(),
            },
        }
    }

    fn definition(ids: &[&str], edges: &[(&str, &str)]) -> PipelineDefinition {
        let nodes: NodeMap = ids
            .iter()
            .map(|id| (id.to_string(), script(id)))
            .collect();
        let connections = edges
            .iter()
            .map(|(from, to)| Connection {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();
        PipelineDefinition { nodes, connections }
    }

    #[test]
    fn test_linear_chain_order() {
        let def = definition(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let order = execution_order(&def).unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_every_edge_respects_order() {
        let def = definition(
            &["a", "b", "c", "d", "e"],
            &[("a", "c"), ("b", "c"), ("c", "d"), ("c", "e")],
        );
        let order = execution_order(&def).unwrap();
        assert_eq!(order.len(), 5);
        let pos =
            |id: &str| order.iter().position(|n| n == id).unwrap();
        for conn in &def.connections {
            assert!(pos(&conn.from) < pos(&conn.to), "{:?} out of order", conn);
        }
    }

    #[test]
    fn test_disconnected_nodes_all_appear() {
        let def = definition(&["a", "b", "c"], &[]);
        let order = execution_order(&def).unwrap();
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_three_cycle_detected() {
        let def = definition(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        assert_eq!(execution_order(&def), Err(GraphError::Cycle));
    }

    #[test]
    fn test_self_loop_detected() {
        let def = definition(&["a"], &[("a", "a")]);
        assert_eq!(execution_order(&def), Err(GraphError::Cycle));
    }

    #[test]
    fn test_cycle_in_subgraph_detected() {
        let def = definition(&["a", "b", "c"], &[("a", "b"), ("b", "a")]);
        assert_eq!(execution_order(&def), Err(GraphError::Cycle));
    }

    #[test]
    fn test_unknown_node_in_connection() {
        let def = definition(&["a"], &[("a", "ghost")]);
        assert_eq!(
            execution_order(&def),
            Err(GraphError::UnknownNode("ghost".to_string()))
        );
    }
}
