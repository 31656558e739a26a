pub mod health;
pub mod matches;
pub mod risk;
pub mod scores;
