//! Core engine types and utilities for Inferno.
//!
//! This crate provides the foundational types shared by the simulation crates:
//! - Transform and render interpolation
//! - Fixed-tick time management
//! - Stable object ids and per-object components
//! - The per-tick control input consumed from the input layer

pub mod components;
pub mod ids;
pub mod input;
pub mod time;
pub mod transform;

pub use components::*;
pub use ids::*;
pub use input::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
