//! Wire-facing request/response shapes, kept separate from the engine types
//! so the JSON contract can stay stable while internals move.

pub mod matches;
pub mod risk;
pub mod scores;
