//! # rai-scene
//!
//! Editing core for 2D scenes written in the RAI simulator's `.g` configuration
//! format: walls, movable obstacles, paired goal objects and goal locations,
//! and an agent.
//!
//! Text goes through the [`tokenizer`] into raw `name(parent){ body }` blocks,
//! the [`decoder`] turns those into typed objects, [`link`] pairs goal objects
//! with their locations, and the [`encoder`] writes the scene back out,
//! including the implicit joint bodies the simulator expects. [`Scene`] ties it
//! together as the editing session a UI drives; [`Viewport`] maps world meters
//! onto a canvas.

pub mod color;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod link;
pub mod object;
pub mod outcome;
pub mod scene;
pub mod tokenizer;

pub use color::*;
pub use config::*;
pub use decoder::*;
pub use encoder::*;
pub use error::*;
pub use geometry::*;
pub use link::*;
pub use object::*;
pub use outcome::*;
pub use scene::*;
pub use tokenizer::*;
