//! Pipeline domain types
//!
//! A pipeline definition is a directed graph: a map of node ids to typed
//! nodes plus an ordered list of connections. The definition round-trips
//! through JSON for persistence and YAML for display/export.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node id to node, in declaration order
pub type NodeMap = IndexMap<String, Node>;

/// A stored pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub definition: PipelineDefinition,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// The graph carried in a pipeline's definition column
///
/// Node ids referenced by connections must exist in `nodes`, and the
/// connection graph must be acyclic. Both invariants are enforced by the
/// engine before any step dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineDefinition {
    /// IndexMap preserves the order nodes appear in the stored JSON,
    /// which the webhook execution path depends on.
    pub nodes: NodeMap,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// One vertex of a pipeline graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Closed set of node kinds
///
/// `host` nodes are pure metadata naming the execution target; `script`
/// nodes carry the command body; `action` nodes carry a declared action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Host,
    Script {
        #[serde(default)]
        content: String,
    },
    Action {
        data: ActionKind,
    },
}

/// Closed set of action node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AiAnalysis,
    NotifyChat,
    SendEmail,
}

/// A directed edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl PipelineDefinition {
    /// Iterate nodes in declaration order
    pub fn nodes_in_order(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_json_round_trip() {
        let raw = serde_json::json!({
            "nodes": {
                "h1": {"name": "web1", "type": "host"},
                "s1": {"name": "Check uptime", "type": "script", "content": "uptime"},
                "a1": {"name": "AI Analysis", "type": "action", "data": "ai_analysis"}
            },
            "connections": [
                {"from": "h1", "to": "s1"},
                {"from": "s1", "to": "a1"}
            ]
        });

        let def: PipelineDefinition = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(def.nodes.len(), 3);
        assert!(matches!(def.nodes["h1"].kind, NodeKind::Host));
        assert!(matches!(
            def.nodes["s1"].kind,
            NodeKind::Script { ref content } if content == "uptime"
        ));
        assert!(matches!(
            def.nodes["a1"].kind,
            NodeKind::Action { data: ActionKind::AiAnalysis }
        ));

        let back = serde_json::to_value(&def).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_script_node_content_defaults_empty() {
        let raw = serde_json::json!({
            "nodes": {"s1": {"name": "Empty", "type": "script"}},
            "connections": []
        });
        let def: PipelineDefinition = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            def.nodes["s1"].kind,
            NodeKind::Script { ref content } if content.is_empty()
        ));
    }

    #[test]
    fn test_nodes_keep_declaration_order_for_numbered_ids() {
        // Editor-assigned ids sort wrong lexicographically (node_10 < node_2);
        // iteration must still follow the order the document declares.
        let raw = r#"{
            "nodes": {
                "node_2": {"name": "First", "type": "script", "content": "echo one"},
                "node_10": {"name": "Second", "type": "script", "content": "echo two"},
                "node_1": {"name": "Third", "type": "script", "content": "echo three"}
            },
            "connections": []
        }"#;

        let def: PipelineDefinition = serde_json::from_str(raw).unwrap();
        let ids: Vec<&str> = def.nodes_in_order().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["node_2", "node_10", "node_1"]);

        // Order survives a trip through serde_json::Value, which is how
        // definitions come back out of the database.
        let value = serde_json::to_value(&def).unwrap();
        let back: PipelineDefinition = serde_json::from_value(value).unwrap();
        let ids: Vec<&str> = back.nodes_in_order().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["node_2", "node_10", "node_1"]);
    }

    #[test]
    fn test_definition_yaml_round_trip() {
        let raw = serde_json::json!({
            "nodes": {
                "h1": {"name": "web1", "type": "host"},
                "s1": {"name": "Disk", "type": "script", "content": "df -h"}
            },
            "connections": [{"from": "h1", "to": "s1"}]
        });
        let def: PipelineDefinition = serde_json::from_value(raw).unwrap();

        let yaml = serde_yaml::to_string(&def).unwrap();
        let back: PipelineDefinition = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.nodes.len(), 2);
        assert_eq!(back.connections, def.connections);
    }
}
