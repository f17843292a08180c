//! Acyclic Graph
//!
//! This module implements an append-only directed acyclic graph with eager
//! cycle prevention.
//!
//! # Overview
//!
//! - Nodes are vertices identified by any [`NodeKey`] value
//! - Edges point from a parent to a child
//! - Every node caches its reachable set: the ids of all of its descendants,
//!   itself included
//!
//! An edge `a -> b` is rejected when `b` already reaches `a`, which makes the
//! cycle check a single set lookup. The price is paid at insertion time: the
//! new descendants must be pushed up to every ancestor of `a`.
//!
//! # Design Decisions
//!
//! 1. Nodes live in an arena owned by [`Graph`], addressed by [`NodeIndex`].
//!    Forward and reverse edges store indices, so parent/child links never
//!    form ownership cycles.
//!
//! 2. The arena preserves insertion order, which makes DOT output and
//!    iteration deterministic.
//!
//! 3. Reachability propagation is an explicit work queue over reverse edges
//!    rather than recursion, so deep graphs cannot exhaust the stack.

mod node;
mod registry;
mod topology;

pub use node::{GraphNode, NodeIndex, NodeKey};
pub use registry::Graph;
