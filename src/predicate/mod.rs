//! # 谓词网（Predicate Net）
//!
//! 令牌携带类型化的值，迁移在绑定 `Binding: Var → Token` 下发生。
//! 标识 [`PredicateMarking`] 为每个库所上的多重集 [`Multiset`]；
//! 相等与覆盖均按库所、按令牌值计数比较。

pub mod binding;
pub mod marking;
pub mod multiset;
pub mod net;

pub use binding::Binding;
pub use marking::PredicateMarking;
pub use multiset::Multiset;
pub use net::{Guard, Label, PredicateArc, PredicateNet, PredicateTransition, TokenFn};
