//! # Petri 网核心定义（Place/Transition Net）
//!
//! 设库所集合 `P` 与迁移集合 `T`。输入/输出映射 `Pre, Post ∈ ℕ^{|P|×|T|}`
//! 以稀疏矩阵 [`Incidence`] 保存；标识 [`Marking`] 为 `ℕ^{|P|}`。
//!
//! 图构造器只通过 [`FiringRule`] / [`BindingFiringRule`] 访问网模型，
//! 因此本模块中的 [`Net`] 只是 [`FiringRule`] 的一种实现。
//!
//! ## 示例
//!
//! ```rust
//! use markgraph::net::*;
//!
//! let mut net = Net::empty();
//! let p0 = net.add_place(Place::new_with_tokens_and_capacity("p0", 1, 1));
//! let p1 = net.add_place(Place::new_with_tokens_and_capacity("p1", 0, 1));
//! let t0 = net.add_transition(Transition::new("t0"));
//!
//! net.set_input_weight(p0, t0, 1);
//! net.set_output_weight(p1, t0, 1);
//!
//! let marking = net.initial_marking();
//! assert_eq!(net.enabled_transitions(&marking), vec![t0]);
//! let next = net.fire_transition(&marking, t0).unwrap();
//! assert_eq!(next.tokens(p0), 0);
//! assert_eq!(next.tokens(p1), 1);
//! ```

pub mod core;
pub mod firing;
pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod io;
pub mod structure;

pub use self::core::Net;
pub use firing::{BindingFiringRule, FireError, FiringRule};
pub use ids::{NodeId, PlaceId, TransitionId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use structure::{Marking, Place, Transition, Weight};
