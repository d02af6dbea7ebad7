use diffgraph::{
    Direction, EdgeFilter, GraphBackend, GraphError, NodeFilter, Properties, PropertyValue,
};
use proptest::prelude::*;

fn person(graph: &mut GraphBackend, name: &str) -> u64 {
    let mut properties = Properties::new();
    properties.insert("name".to_string(), PropertyValue::String(name.to_string()));
    graph.insert_node("Person", properties).id
}

#[test]
fn insert_sequence_rolls_back_to_empty() {
    let mut graph = GraphBackend::new();
    let ids: Vec<u64> = (0..20).map(|i| person(&mut graph, &format!("p{i}"))).collect();
    for pair in ids.windows(2) {
        graph.insert_edge(pair[0], pair[1], "KNOWS", Properties::new());
    }

    let steps = graph.count_diffs();
    graph.rollback(steps).expect("rollback everything");

    assert_eq!(graph.count_nodes(), 0);
    assert_eq!(graph.count_edges(), 0);
    let export = graph.export();
    assert!(export.nodes.is_empty());
    assert!(export.edges.is_empty());
    // Every original diff gained a compensating entry.
    assert_eq!(export.diffs.len(), steps * 2);
}

#[test]
fn rollback_returns_to_checkpoint_state() {
    let mut graph = GraphBackend::new();
    let alice = person(&mut graph, "Alice");
    let bob = person(&mut graph, "Bob");
    graph.insert_edge(alice, bob, "KNOWS", Properties::new());
    let baseline = graph.export();

    let carol = person(&mut graph, "Carol");
    graph.insert_edge(bob, carol, "KNOWS", Properties::new());
    graph.delete_node(alice).expect("delete alice");
    let extra = graph.count_diffs() - baseline.diffs.len();

    graph.rollback(extra).expect("rollback to checkpoint");
    let restored = graph.export();
    assert_eq!(restored.nodes, baseline.nodes);
    assert_eq!(restored.edges, baseline.edges);
    assert!(restored.diffs.len() > baseline.diffs.len());
}

#[test]
fn edge_rollback_keeps_nodes() {
    let mut graph = GraphBackend::new();
    let alice = person(&mut graph, "Alice");
    let bob = person(&mut graph, "Bob");
    graph.insert_edge(alice, bob, "KNOWS", Properties::new());

    graph.rollback(1).expect("rollback edge insert");
    assert_eq!(graph.count_nodes(), 2);
    assert_eq!(graph.count_edges(), 0);
    let connected = graph
        .query_connected_nodes(alice, "KNOWS", Direction::Outgoing)
        .expect("query after rollback");
    assert!(connected.nodes.is_empty());
}

#[test]
fn cascaded_delete_rolls_back_node_and_edges() {
    let mut graph = GraphBackend::new();
    let hub = person(&mut graph, "Hub");
    let spokes: Vec<u64> = (0..5).map(|i| person(&mut graph, &format!("s{i}"))).collect();
    for &spoke in &spokes {
        graph.insert_edge(hub, spoke, "CONNECTS_TO", Properties::new());
    }
    assert_eq!(graph.count_edges(), 5);

    graph.delete_node(hub).expect("delete hub");
    assert_eq!(graph.count_edges(), 0);
    assert_eq!(graph.count_nodes(), 5);

    // 5 cascaded edge deletes plus the node delete.
    graph.rollback(6).expect("rollback cascade");
    assert_eq!(graph.count_nodes(), 6);
    assert_eq!(graph.count_edges(), 5);
    let connected = graph
        .query_connected_nodes(hub, "CONNECTS_TO", Direction::Outgoing)
        .expect("hub restored");
    assert_eq!(connected.nodes.len(), 5);
}

#[test]
fn overlong_rollback_fails_atomically() {
    let mut graph = GraphBackend::new();
    let alice = person(&mut graph, "Alice");
    let bob = person(&mut graph, "Bob");
    graph.insert_edge(alice, bob, "KNOWS", Properties::new());

    let err = graph
        .rollback(graph.count_diffs() + 1)
        .expect_err("overlong rollback");
    assert!(matches!(err, GraphError::Rollback(_)));
    assert_eq!(graph.count_nodes(), 2);
    assert_eq!(graph.count_edges(), 1);
}

#[test]
fn rollback_to_prehistory_timestamp_empties_graph() {
    let mut graph = GraphBackend::new();
    let epoch = time::OffsetDateTime::UNIX_EPOCH;
    person(&mut graph, "Alice");
    person(&mut graph, "Bob");

    let undone = graph
        .rollback_to_timestamp(epoch)
        .expect("rollback to epoch");
    assert_eq!(undone, 2);
    assert_eq!(graph.count_nodes(), 0);

    // Everything is newer than the epoch, including the compensations; the
    // whole log (inserts plus their undos) nets out to empty again.
    let undone_again = graph
        .rollback_to_timestamp(epoch)
        .expect("rollback again");
    assert_eq!(undone_again, 4);
    assert_eq!(graph.count_nodes(), 0);
    assert_eq!(graph.count_diffs(), 8);
}

#[derive(Debug, Clone)]
enum Op {
    InsertNode(u8),
    InsertEdge(u8, u8),
    DeleteNode(u8),
    DeleteEdge(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::InsertNode),
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::InsertEdge(a, b)),
        any::<u8>().prop_map(Op::DeleteNode),
        any::<u8>().prop_map(Op::DeleteEdge),
    ]
}

fn apply(graph: &mut GraphBackend, op: &Op) {
    match op {
        Op::InsertNode(bucket) => {
            let mut properties = Properties::new();
            properties.insert(
                "bucket".to_string(),
                PropertyValue::Int(i64::from(*bucket % 8)),
            );
            graph.insert_node("Item", properties);
        }
        Op::InsertEdge(a, b) => {
            let nodes = graph.query_nodes(&NodeFilter::new()).nodes;
            if nodes.is_empty() {
                return;
            }
            let source = nodes[*a as usize % nodes.len()].id;
            let target = nodes[*b as usize % nodes.len()].id;
            graph.insert_edge(source, target, "LINK", Properties::new());
        }
        Op::DeleteNode(pick) => {
            let nodes = graph.query_nodes(&NodeFilter::new()).nodes;
            if nodes.is_empty() {
                return;
            }
            let id = nodes[*pick as usize % nodes.len()].id;
            graph.delete_node(id).expect("delete existing node");
        }
        Op::DeleteEdge(pick) => {
            let edges = graph.query_edges(&EdgeFilter::new()).edges;
            if edges.is_empty() {
                return;
            }
            let id = edges[*pick as usize % edges.len()].id;
            graph.delete_edge(id).expect("delete existing edge");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_operation_sequence_rolls_back_to_empty(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut graph = GraphBackend::new();
        for op in &ops {
            apply(&mut graph, op);
        }

        let steps = graph.count_diffs();
        graph.rollback(steps).expect("rollback full log");
        prop_assert_eq!(graph.count_nodes(), 0);
        prop_assert_eq!(graph.count_edges(), 0);
        prop_assert_eq!(graph.count_diffs(), steps * 2);
    }

    #[test]
    fn rollback_is_an_exact_inverse_of_the_tail(
        ops in prop::collection::vec(op_strategy(), 1..30),
        extra in prop::collection::vec(op_strategy(), 1..15),
    ) {
        let mut graph = GraphBackend::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let baseline = graph.export();

        for op in &extra {
            apply(&mut graph, op);
        }
        let steps = graph.count_diffs() - baseline.diffs.len();
        graph.rollback(steps).expect("rollback extras");

        let restored = graph.export();
        prop_assert_eq!(&restored.nodes, &baseline.nodes);
        prop_assert_eq!(&restored.edges, &baseline.edges);
    }
}
