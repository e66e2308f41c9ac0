pub mod client;
pub mod error;
pub mod model;
pub mod prices;
pub mod render;
pub mod schedule;
pub mod state;
