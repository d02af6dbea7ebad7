use std::collections::BTreeSet;

use diffgraph::data_generator::DataGenerator;
use diffgraph::{EdgeFilter, GraphBackend, NodeFilter, Properties, PropertyValue};
use proptest::prelude::*;

#[test]
fn property_buckets_query_exactly() {
    let mut graph = GraphBackend::new();
    for i in 0..100 {
        let mut properties = Properties::new();
        properties.insert(
            "category".to_string(),
            PropertyValue::String(format!("cat_{}", i % 10)),
        );
        graph.insert_node("Item", properties);
    }

    let result = graph.query_nodes(&NodeFilter::new().with_property("category", "cat_5"));
    assert_eq!(result.nodes.len(), 10);
    assert!(result
        .nodes
        .iter()
        .all(|n| n.properties.get("category")
            == Some(&PropertyValue::String("cat_5".to_string()))));
}

fn node_ids(result: &[diffgraph::Node]) -> BTreeSet<u64> {
    result.iter().map(|n| n.id).collect()
}

#[test]
fn label_query_agrees_with_export_scan() {
    let mut graph = GraphBackend::new();
    let mut generator = DataGenerator::new(7);
    generator.populate_social_network(&mut graph, 200, 3);
    graph.insert_node("Admin", Properties::new());

    let export = graph.export();
    for label in graph.labels() {
        let indexed = graph.query_nodes(&NodeFilter::label(&label));
        let scanned: BTreeSet<u64> = export
            .nodes
            .iter()
            .filter(|n| n.label == label)
            .map(|n| n.id)
            .collect();
        assert_eq!(node_ids(&indexed.nodes), scanned, "label {label}");
    }
}

#[test]
fn property_query_agrees_with_export_scan() {
    let mut graph = GraphBackend::new();
    let mut generator = DataGenerator::new(11);
    generator.populate_social_network(&mut graph, 150, 2);

    let export = graph.export();
    for bucket in 0..10 {
        let value = PropertyValue::String(format!("cat_{bucket}"));
        let indexed = graph.query_nodes(&NodeFilter::new().with_property("category", value.clone()));
        let scanned: BTreeSet<u64> = export
            .nodes
            .iter()
            .filter(|n| n.properties.get("category") == Some(&value))
            .map(|n| n.id)
            .collect();
        assert_eq!(node_ids(&indexed.nodes), scanned, "bucket {bucket}");
    }
}

#[test]
fn edge_query_agrees_with_export_scan() {
    let mut graph = GraphBackend::new();
    let mut generator = DataGenerator::new(13);
    let ids = generator.populate_social_network(&mut graph, 100, 3);

    let export = graph.export();
    let by_rel = graph.query_edges(&EdgeFilter::relationship("FOLLOWS"));
    assert_eq!(by_rel.edges.len(), export.edges.len());

    for &source in ids.iter().take(20) {
        let indexed = graph.query_edges(&EdgeFilter::new().source(source));
        let scanned: BTreeSet<u64> = export
            .edges
            .iter()
            .filter(|e| e.source_id == source)
            .map(|e| e.id)
            .collect();
        let got: BTreeSet<u64> = indexed.edges.iter().map(|e| e.id).collect();
        assert_eq!(got, scanned, "source {source}");
    }
}

#[test]
fn repeated_reads_are_identical() {
    let mut graph = GraphBackend::new();
    let mut generator = DataGenerator::new(17);
    generator.populate_social_network(&mut graph, 80, 2);

    let filter = NodeFilter::label("User").with_property("active", true);
    let first = graph.query_nodes(&filter);
    let second = graph.query_nodes(&filter);
    assert_eq!(first.nodes, second.nodes);

    let edges_first = graph.query_edges(&EdgeFilter::relationship("FOLLOWS"));
    let edges_second = graph.query_edges(&EdgeFilter::relationship("FOLLOWS"));
    assert_eq!(edges_first.edges, edges_second.edges);
}

#[test]
fn conjunctive_filter_is_an_intersection() {
    let mut graph = GraphBackend::new();
    let mut generator = DataGenerator::new(19);
    generator.populate_social_network(&mut graph, 120, 2);

    let label_only = node_ids(&graph.query_nodes(&NodeFilter::label("User")).nodes);
    let prop_only = node_ids(
        &graph
            .query_nodes(&NodeFilter::new().with_property("active", true))
            .nodes,
    );
    let both = node_ids(
        &graph
            .query_nodes(&NodeFilter::label("User").with_property("active", true))
            .nodes,
    );
    let expected: BTreeSet<u64> = label_only.intersection(&prop_only).copied().collect();
    assert_eq!(both, expected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn indexed_property_query_matches_brute_force(
        values in prop::collection::vec(0u8..5, 10..60),
        probe in 0u8..5,
    ) {
        let mut graph = GraphBackend::new();
        for value in &values {
            let mut properties = Properties::new();
            properties.insert("v".to_string(), PropertyValue::Int(i64::from(*value)));
            graph.insert_node("N", properties);
        }

        let wanted = PropertyValue::Int(i64::from(probe));
        let indexed = graph.query_nodes(&NodeFilter::new().with_property("v", wanted.clone()));
        let scanned: BTreeSet<u64> = graph
            .export()
            .nodes
            .iter()
            .filter(|n| n.properties.get("v") == Some(&wanted))
            .map(|n| n.id)
            .collect();
        prop_assert_eq!(node_ids(&indexed.nodes), scanned);
    }

    #[test]
    fn range_query_matches_brute_force(
        values in prop::collection::vec(-50i64..50, 5..40),
        lo in -60i64..60,
        width in 0i64..40,
    ) {
        let mut graph = GraphBackend::new();
        for value in &values {
            let mut properties = Properties::new();
            properties.insert("v".to_string(), PropertyValue::Int(*value));
            graph.insert_node("N", properties);
        }

        let hi = lo + width;
        let indexed = graph
            .query_nodes_by_property_range(
                "v",
                Some(&PropertyValue::Int(lo)),
                Some(&PropertyValue::Int(hi)),
            )
            .expect("range query");
        let scanned: BTreeSet<u64> = graph
            .export()
            .nodes
            .iter()
            .filter(|n| match n.properties.get("v") {
                Some(PropertyValue::Int(v)) => *v >= lo && *v <= hi,
                _ => false,
            })
            .map(|n| n.id)
            .collect();
        prop_assert_eq!(node_ids(&indexed.nodes), scanned);
    }
}
