//! JSON and GraphML export of an assembled [`Graph`], and the flat JSON
//! array writers for skeletons and intents (spec.md §6). These are
//! read-only views; none of them round-trip back into a [`Graph`].

use serde::Serialize;
use serde_json::{json, Value};

use weave_core::{TaskSkeleton, UserIntent};
use weave_graph::Graph;

/// Node-link JSON shape fixed by spec.md §6.
#[derive(Debug, Serialize)]
pub struct GraphJson {
    pub directed: bool,
    pub multigraph: bool,
    pub nodes: Vec<Value>,
    pub links: Vec<Value>,
}

/// Render the graph as the node-link JSON document spec.md §6 fixes:
/// `{"directed": true, "multigraph": true, "nodes": [...], "links": [...]}`.
pub fn graph_to_json(graph: &Graph) -> GraphJson {
    let mut nodes: Vec<Value> = graph
        .nodes()
        .map(|(name, attrs)| {
            json!({
                "id": name,
                "desc": attrs.description,
                "category": attrs.category,
                "parameters": attrs.parameters,
            })
        })
        .collect();
    nodes.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));

    let mut links: Vec<Value> = graph
        .edges()
        .map(|edge| {
            json!({
                "source": edge.producer,
                "target": edge.consumer,
                "key": format!("{}->{}:{}", edge.producer, edge.consumer, edge.parameter),
                "relation": edge.relation,
                "parameter": edge.parameter,
                "weight": edge.weight,
            })
        })
        .collect();
    links.sort_by(|a, b| {
        (a["source"].as_str(), a["target"].as_str(), a["key"].as_str())
            .cmp(&(b["source"].as_str(), b["target"].as_str(), b["key"].as_str()))
    });

    GraphJson { directed: true, multigraph: true, nodes, links }
}

/// Serialize a [`Graph`] to its node-link JSON string.
pub fn graph_to_json_string(graph: &Graph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&graph_to_json(graph))
}

/// Render the graph as GraphML. Non-scalar attributes (`parameters`) are
/// stringified as JSON per spec.md §6 ("dict/list attributes serialized
/// as strings").
pub fn graph_to_graphml(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">"#);
    out.push('\n');
    out.push_str("  <key id=\"d0\" for=\"node\" attr.name=\"desc\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"d1\" for=\"node\" attr.name=\"category\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"d2\" for=\"node\" attr.name=\"parameters\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"d3\" for=\"edge\" attr.name=\"relation\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"d4\" for=\"edge\" attr.name=\"parameter\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"d5\" for=\"edge\" attr.name=\"weight\" attr.type=\"double\"/>\n");
    out.push_str(r#"  <graph id="G" edgedefault="directed">"#);
    out.push('\n');

    let mut names: Vec<&str> = graph.node_names().collect();
    names.sort();
    for name in &names {
        let attrs = graph.node(name).expect("name came from node_names");
        let params_json = serde_json::to_string(&attrs.parameters).unwrap_or_default();
        out.push_str(&format!("    <node id=\"{}\">\n", xml_escape(name)));
        out.push_str(&format!("      <data key=\"d0\">{}</data>\n", xml_escape(&attrs.description)));
        out.push_str(&format!("      <data key=\"d1\">{}</data>\n", xml_escape(&attrs.category)));
        out.push_str(&format!("      <data key=\"d2\">{}</data>\n", xml_escape(&params_json)));
        out.push_str("    </node>\n");
    }

    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by(|a, b| (a.producer.as_str(), a.consumer.as_str(), a.parameter.as_str()).cmp(&(b.producer.as_str(), b.consumer.as_str(), b.parameter.as_str())));
    for (idx, edge) in edges.iter().enumerate() {
        out.push_str(&format!(
            "    <edge id=\"e{idx}\" source=\"{}\" target=\"{}\">\n",
            xml_escape(&edge.producer),
            xml_escape(&edge.consumer)
        ));
        out.push_str(&format!("      <data key=\"d3\">{}</data>\n", xml_escape(&edge.relation)));
        out.push_str(&format!("      <data key=\"d4\">{}</data>\n", xml_escape(&edge.parameter)));
        out.push_str(&format!("      <data key=\"d5\">{}</data>\n", edge.weight));
        out.push_str("    </edge>\n");
    }

    out.push_str("  </graph>\n");
    out.push_str("</graphml>\n");
    out
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize skeletons as a JSON array. `SkeletonEdge.from_tool`/`to_tool`
/// are already aliased to `"from"`/`"to"` on the type itself.
pub fn skeletons_to_json(skeletons: &[TaskSkeleton]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(skeletons)
}

/// Serialize user intents as a JSON array, no rekeying.
pub fn intents_to_json(intents: &[UserIntent]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(intents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::{Edge, ParameterSchema};
    use weave_graph::NodeAttrs;

    fn attrs(desc: &str) -> NodeAttrs {
        NodeAttrs { description: desc.to_string(), category: "general".to_string(), parameters: ParameterSchema::default() }
    }

    #[test]
    fn graph_json_round_trips_edge_triples() {
        let mut g = Graph::new();
        g.add_node("a", attrs("A"));
        g.add_node("b", attrs("B"));
        g.add_edge(Edge::new("a", "b", "p", 0.9));

        let json = graph_to_json(&g);
        assert!(json.directed);
        assert!(json.multigraph);
        assert_eq!(json.nodes.len(), 2);
        assert_eq!(json.links.len(), 1);
        assert_eq!(json.links[0]["key"], "a->b:p");
    }

    #[test]
    fn graphml_escapes_and_includes_all_nodes() {
        let mut g = Graph::new();
        g.add_node("a<b>", attrs("has \"quotes\" & amps"));
        let xml = graph_to_graphml(&g);
        assert!(xml.contains("a&lt;b&gt;"));
        assert!(xml.contains("&quot;quotes&quot;"));
        assert!(xml.contains("&amp;"));
    }
}
