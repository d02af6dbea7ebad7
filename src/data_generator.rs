//! Deterministic random graph data for benchmarks and stress tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::db::GraphBackend;
use crate::model::{NodeId, Properties, PropertyValue};

pub struct DataGenerator {
    rng: ChaCha8Rng,
}

impl DataGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Populate `graph` with a social network: `num_users` nodes labeled
    /// "User" and roughly `avg_connections` outgoing "FOLLOWS" edges per
    /// user. Returns the inserted node ids.
    pub fn populate_social_network(
        &mut self,
        graph: &mut GraphBackend,
        num_users: usize,
        avg_connections: usize,
    ) -> Vec<NodeId> {
        let mut node_ids = Vec::with_capacity(num_users);

        for i in 0..num_users {
            let mut properties = Properties::new();
            properties.insert(
                "name".to_string(),
                PropertyValue::String(format!("User{}", i + 1)),
            );
            properties.insert(
                "age".to_string(),
                PropertyValue::Int(self.rng.gen_range(18..65)),
            );
            properties.insert(
                "active".to_string(),
                PropertyValue::Bool(self.rng.gen_bool(0.8)),
            );
            properties.insert(
                "score".to_string(),
                PropertyValue::Float(self.rng.gen_range(0.0..1000.0)),
            );
            properties.insert(
                "category".to_string(),
                PropertyValue::String(format!("cat_{}", i % 10)),
            );

            let node = graph.insert_node("User", properties);
            node_ids.push(node.id);
        }

        for &source_id in &node_ids {
            let connections = self.rng.gen_range(0..avg_connections * 2);
            for _ in 0..connections {
                let target_id = node_ids[self.rng.gen_range(0..node_ids.len())];
                if target_id == source_id {
                    continue;
                }
                let mut properties = Properties::new();
                properties.insert(
                    "strength".to_string(),
                    PropertyValue::Float(self.rng.gen_range(0.1..1.0)),
                );
                graph.insert_edge(source_id, target_id, "FOLLOWS", properties);
            }
        }

        node_ids
    }
}
