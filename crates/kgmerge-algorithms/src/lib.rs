pub mod common;
pub mod community;
pub mod pathfinding;
pub mod centrality;
pub mod distance;

pub use common::{GraphView, NodeId};
pub use community::{weakly_connected_components, WccResult};
pub use pathfinding::{bfs, bfs_distances, PathResult};
pub use centrality::{betweenness_centrality, degree_centrality, BetweennessConfig};
pub use distance::{diameter, directed_density, eccentricities, radius, undirected_density};
