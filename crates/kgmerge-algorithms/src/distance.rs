//! Distance-based graph measures over the undirected projection
//!
//! Eccentricity, diameter, radius and density.

use super::common::GraphView;
use super::pathfinding::bfs_distances;

/// Eccentricity of every node in the undirected projection.
///
/// Returns `None` for an empty or disconnected graph, where eccentricity is
/// not defined.
pub fn eccentricities(view: &GraphView) -> Option<Vec<usize>> {
    let n = view.node_count;
    if n == 0 {
        return None;
    }
    let undirected = view.to_undirected();
    let mut ecc = Vec::with_capacity(n);
    for source in 0..n {
        let dist = bfs_distances(&undirected, source);
        let mut max = 0;
        for d in dist {
            max = max.max(d?);
        }
        ecc.push(max);
    }
    Some(ecc)
}

/// Diameter (maximum eccentricity), `None` when undefined.
pub fn diameter(view: &GraphView) -> Option<usize> {
    eccentricities(view)?.into_iter().max()
}

/// Radius (minimum eccentricity), `None` when undefined.
pub fn radius(view: &GraphView) -> Option<usize> {
    eccentricities(view)?.into_iter().min()
}

/// Density of the undirected projection: `2m / (n(n-1))`, where `m` counts
/// adjacent pairs. Zero for graphs with fewer than two nodes.
pub fn undirected_density(view: &GraphView) -> f64 {
    let n = view.node_count;
    if n < 2 {
        return 0.0;
    }
    // Symmetric lists hold each pair twice
    let arcs = view.to_undirected().edge_count();
    arcs as f64 / (n * (n - 1)) as f64
}

/// Density of the simple directed graph: `m / (n(n-1))` over distinct
/// ordered pairs, self-loops excluded.
pub fn directed_density(view: &GraphView) -> f64 {
    let n = view.node_count;
    if n < 2 {
        return 0.0;
    }
    let simple = view.simplified();
    let arcs = (0..n)
        .map(|u| simple.successors(u).iter().filter(|&&v| v != u).count())
        .sum::<usize>();
    arcs as f64 / (n * (n - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_diameter_and_radius() {
        // 0 - 1 - 2 - 3 (direction ignored)
        let view = GraphView::from_edges(vec![0, 1, 2, 3], &[(0, 1), (2, 1), (2, 3)]);
        assert_eq!(eccentricities(&view), Some(vec![3, 2, 2, 3]));
        assert_eq!(diameter(&view), Some(3));
        assert_eq!(radius(&view), Some(2));
    }

    #[test]
    fn test_disconnected_is_undefined() {
        let view = GraphView::from_edges(vec![0, 1, 2], &[(0, 1)]);
        assert_eq!(diameter(&view), None);
        assert_eq!(radius(&view), None);
    }

    #[test]
    fn test_empty_is_undefined() {
        let view = GraphView::from_edges(Vec::new(), &[]);
        assert_eq!(diameter(&view), None);
    }

    #[test]
    fn test_single_node() {
        let view = GraphView::from_edges(vec![0], &[]);
        assert_eq!(diameter(&view), Some(0));
        assert_eq!(undirected_density(&view), 0.0);
    }

    #[test]
    fn test_density() {
        // Triangle with one reciprocal and one parallel edge
        let view = GraphView::from_edges(vec![0, 1, 2], &[(0, 1), (1, 0), (1, 2), (1, 2), (2, 0)]);
        assert!((undirected_density(&view) - 1.0).abs() < 1e-9);
        assert!((directed_density(&view) - 4.0 / 6.0).abs() < 1e-9);
    }
}
