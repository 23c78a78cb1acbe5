//! Game simulation over shared cells.
//!
//! - [`actor`]: the falling entity's atomic position/velocity cells and physics
//! - [`world`]: the lock-free terrain grid, obstacle generation and collision
//! - [`sprite`]: the actor glyph and the hit box derived from it
//!
//! Nothing here spawns threads; the workers in [`crate::worker`] drive these
//! types on their own cadences.

pub mod actor;
pub mod sprite;
pub mod world;

pub use actor::{Actor, PhysicsConfig};
pub use sprite::{Hitbox, Sprite};
pub use world::{ObstacleCursor, StepOutcome, Terrain, Tile, World, WorldConfig};
