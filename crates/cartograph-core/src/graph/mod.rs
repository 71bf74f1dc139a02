pub mod cycles;
pub mod dependency_graph;
