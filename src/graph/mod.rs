//! 可达图（标识图）：节点为互不相同的可达标识，边为迁移（谓词网中为迁移 + 绑定）。

pub mod state_graph;
pub mod successors;
pub mod traversal;

pub use state_graph::{MarkingGraph, MarkingNode, PlainMarkingGraph, PredicateMarkingGraph};
pub use successors::{BindingMap, EdgeView, PlainSuccessors, PredicateSuccessors, SuccessorMap};
pub use traversal::Reachable;
