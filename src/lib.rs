//! Reachability (marking) graphs of place/transition nets and predicate nets.
//!
//! ```rust
//! use markgraph::analysis::ReachabilityBuilder;
//! use markgraph::net::{Net, Place, Transition};
//!
//! let mut net = Net::empty();
//! let p1 = net.add_place(Place::new("p1", 1));
//! let p2 = net.add_place(Place::new("p2", 0));
//! let t1 = net.add_transition(Transition::new("t1"));
//! let t2 = net.add_transition(Transition::new("t2"));
//! net.set_input_weight(p1, t1, 1);
//! net.set_output_weight(p2, t1, 1);
//! net.set_input_weight(p2, t2, 1);
//! net.set_output_weight(p1, t2, 1);
//!
//! let graph = ReachabilityBuilder::new(&net).build(net.initial_marking());
//! assert_eq!(graph.count(), 2);
//! ```
#![warn(non_snake_case)]

pub mod analysis;
pub mod config;
pub mod graph;
pub mod net;
pub mod predicate;

pub use analysis::{ExplorationError, PredicateReachabilityBuilder, ReachabilityBuilder};
pub use config::ExplorationConfig;
pub use graph::{MarkingGraph, PlainMarkingGraph, PredicateMarkingGraph};
