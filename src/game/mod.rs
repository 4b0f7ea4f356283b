//! Game simulation modules

pub mod aidkit;
pub mod bullet;
pub mod collisions;
pub mod constants;
pub mod object;
pub mod player;
pub mod snapshot;
pub mod traits;
pub mod world;

pub use world::{World, WorldCommand, WorldHandle};
