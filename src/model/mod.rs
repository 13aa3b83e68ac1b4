//! Domain entities and their binary record layouts
//!
//! Each entity serializes with a fixed field order that must round-trip
//! exactly; the [`codec`](crate::codec) primitives supply the wire encoding
//! and the sanity bounds. Serde derives exist only for the CLI's JSON
//! output; snapshots never go through serde.

mod exercise;
mod user;
mod quest;
mod workout;
mod indexes;

pub use exercise::{Difficulty, Exercise, ExerciseType};
pub use user::User;
pub use quest::Quest;
pub use workout::WorkoutSession;
pub use indexes::{EmailEntry, GraphEdge, QueueEntry};
