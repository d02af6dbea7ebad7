//! Quick throughput measurements for the graph backend.
//!
//! Prints a table of wall-clock timings; set `RUST_LOG=diffgraph=debug` to
//! see per-mutation events.

use std::time::{Duration, Instant};

use diffgraph::data_generator::DataGenerator;
use diffgraph::{Direction, GraphBackend, NodeFilter, PropertyValue};
use tracing_subscriber::EnvFilter;

const NUM_USERS: usize = 10_000;
const AVG_CONNECTIONS: usize = 4;
const SEED: u64 = 0xd1ff;

#[derive(Debug)]
struct BenchResult {
    name: String,
    ops: usize,
    time: Duration,
}

impl BenchResult {
    fn print_header(section: &str) {
        println!("\n{}", section.to_uppercase());
        println!("{:<28} {:>10} {:>15} {:>15}", "BENCHMARK", "OPS", "TIME", "PER OP");
    }

    fn print(&self) {
        let per_op = if self.ops == 0 {
            Duration::ZERO
        } else {
            self.time / self.ops as u32
        };
        println!(
            "{:<28} {:>10} {:>15} {:>15}",
            self.name,
            self.ops,
            format_duration(self.time),
            format_duration(per_op)
        );
    }
}

fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1_000 {
        format!("{} µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2} ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.2} s", micros as f64 / 1_000_000.0)
    }
}

fn bench<F>(name: &str, ops: usize, f: F) -> BenchResult
where
    F: FnOnce(),
{
    let start = Instant::now();
    f();
    BenchResult {
        name: name.to_string(),
        ops,
        time: start.elapsed(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut graph = GraphBackend::new();
    let mut generator = DataGenerator::new(SEED);

    BenchResult::print_header("populate");
    let mut node_ids = Vec::new();
    bench("social_network", NUM_USERS, || {
        node_ids = generator.populate_social_network(&mut graph, NUM_USERS, AVG_CONNECTIONS);
    })
    .print();
    println!(
        "graph: {} nodes, {} edges, {} diffs",
        graph.count_nodes(),
        graph.count_edges(),
        graph.count_diffs()
    );

    BenchResult::print_header("queries");
    bench("query_nodes_by_label", 100, || {
        for _ in 0..100 {
            let result = graph.query_nodes(&NodeFilter::label("User"));
            assert_eq!(result.nodes.len(), NUM_USERS);
        }
    })
    .print();
    bench("query_nodes_by_property", 100, || {
        for _ in 0..100 {
            let result =
                graph.query_nodes(&NodeFilter::new().with_property("category", "cat_5"));
            assert_eq!(result.nodes.len(), NUM_USERS / 10);
        }
    })
    .print();
    bench("query_nodes_score_range", 100, || {
        for _ in 0..100 {
            let result = graph
                .query_nodes_by_property_range(
                    "score",
                    Some(&PropertyValue::Float(250.0)),
                    Some(&PropertyValue::Float(750.0)),
                )
                .expect("range query");
            assert!(!result.nodes.is_empty());
        }
    })
    .print();
    bench("query_connected_nodes", node_ids.len().min(1_000), || {
        for &node_id in node_ids.iter().take(1_000) {
            graph
                .query_connected_nodes(node_id, "FOLLOWS", Direction::Outgoing)
                .expect("connected query");
        }
    })
    .print();
    bench("traverse_depth_3", 100, || {
        for &node_id in node_ids.iter().take(100) {
            graph.traverse(node_id, 3, None).expect("traverse");
        }
    })
    .print();

    BenchResult::print_header("history");
    let half = graph.count_diffs() / 2;
    bench("rollback_half_log", half, || {
        graph.rollback(half).expect("rollback");
    })
    .print();
    bench("export_json", 1, || {
        let json = graph.export_json().expect("export");
        assert!(!json.is_empty());
    })
    .print();

    let metrics = graph.metrics.snapshot();
    println!(
        "\nindex hits: {}, misses: {}, adjacency scans: {}, hit rate: {:.2}%",
        metrics.index_hits,
        metrics.index_misses,
        metrics.adjacency_scans,
        metrics.index_hit_rate() * 100.0
    );
}
