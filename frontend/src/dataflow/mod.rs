//! Reactive dataflow primitives.
//!
//! [`Relay`] streams discrete events from UI handlers into processors,
//! [`Actor`] and [`ActorVec`] hold domain state whose mutations happen
//! sequentially inside one processor future, and [`Atom`] covers plain
//! local UI state. All domain state in this crate goes through these
//! primitives; consumers read through signals.

pub mod actor;
pub mod actor_vec;
pub mod atom;
pub mod relay;

pub use actor::Actor;
pub use actor_vec::ActorVec;
pub use atom::Atom;
pub use relay::{Relay, relay};
