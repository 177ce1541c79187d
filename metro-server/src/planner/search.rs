//! Dijkstra shortest-path search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::StationGraph;

/// A frontier entry. Ordered by cost, reversed so the binary heap pops
/// the cheapest node first.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    node: usize,
    cost: f64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap. Weights are finite and
        // non-negative by construction, so the comparison never sees
        // NaN in practice.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Shortest path between two nodes over current edge weights.
///
/// Returns the node path (inclusive of both endpoints) and its total
/// cost in minutes, or `None` when the destination is in a different
/// connected component. Ties resolve deterministically by adjacency
/// order.
pub(crate) fn shortest_path(
    graph: &StationGraph,
    from: usize,
    to: usize,
) -> Option<(Vec<usize>, f64)> {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![usize::MAX; n];
    let mut heap = BinaryHeap::new();

    dist[from] = 0.0;
    heap.push(Candidate {
        node: from,
        cost: 0.0,
    });

    while let Some(Candidate { node, cost }) = heap.pop() {
        if cost > dist[node] {
            continue; // Stale entry.
        }
        if node == to {
            break;
        }
        for &(neighbor, edge) in graph.neighbors(node) {
            let next = cost + graph.edge(edge).weight_minutes();
            if next < dist[neighbor] {
                dist[neighbor] = next;
                prev[neighbor] = node;
                heap.push(Candidate {
                    node: neighbor,
                    cost: next,
                });
            }
        }
    }

    if dist[to].is_infinite() {
        return None;
    }

    let mut path = vec![to];
    let mut current = to;
    while current != from {
        current = prev[current];
        path.push(current);
    }
    path.reverse();
    Some((path, dist[to]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationName;
    use crate::topology;
    use crate::weather::WeatherSnapshot;
    use crate::weight::WeightConfig;

    fn graph() -> StationGraph {
        StationGraph::build(
            &topology::medellin(),
            &WeatherSnapshot::new(),
            WeightConfig::default(),
        )
    }

    fn idx(graph: &StationGraph, name: &str) -> usize {
        graph
            .node_index(&StationName::parse(name).unwrap())
            .unwrap()
    }

    #[test]
    fn adjacent_stations_route_directly() {
        let graph = graph();
        let from = idx(&graph, "Niquía");
        let to = idx(&graph, "Bello");
        let (path, cost) = shortest_path(&graph, from, to).unwrap();
        assert_eq!(path, vec![from, to]);
        assert!(cost > 0.0);
    }

    #[test]
    fn same_node_is_a_zero_cost_path() {
        let graph = graph();
        let node = idx(&graph, "Poblado");
        let (path, cost) = shortest_path(&graph, node, node).unwrap();
        assert_eq!(path, vec![node]);
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn connectivity_is_symmetric() {
        let graph = graph();
        let a = idx(&graph, "La Estrella");
        let b = idx(&graph, "Arví");
        let forward = shortest_path(&graph, a, b);
        let backward = shortest_path(&graph, b, a);
        assert!(forward.is_some());
        assert!(backward.is_some());
        let (path_f, cost_f) = forward.unwrap();
        let (path_b, cost_b) = backward.unwrap();
        assert!((cost_f - cost_b).abs() < 1e-9);
        let mut reversed = path_b.clone();
        reversed.reverse();
        assert_eq!(path_f, reversed);
    }

    #[test]
    fn path_follows_the_line_in_order() {
        let graph = graph();
        let from = idx(&graph, "Niquía");
        let to = idx(&graph, "Acevedo");
        let (path, _) = shortest_path(&graph, from, to).unwrap();
        let names: Vec<&str> = path
            .iter()
            .map(|i| graph.node(*i).name().as_str())
            .collect();
        assert_eq!(names, vec!["Niquía", "Bello", "Madera", "Acevedo"]);
    }
}
