//! Segment-based level collision and object physics for Inferno.
//!
//! The level is a graph of six-sided segments joined through shared sides.
//! Every query (rays, moving spheres, line of sight, explosions) walks that
//! graph from a known starting segment instead of testing the whole level.

pub mod builder;
pub mod collision;
pub mod config;
pub mod debug;
pub mod events;
pub mod explosion;
pub mod face;
pub mod hit;
pub mod integrator;
pub mod intersect;
pub mod level;
pub mod object;
pub mod simulation;
pub mod template;
pub mod traversal;

pub use builder::LevelBuilder;
pub use collision::{CollisionGroup, CollisionGroups};
pub use config::SimConfig;
pub use debug::{DebugDraw, Diagnostics, LineRecorder};
pub use events::SimEvent;
pub use explosion::{ExplosionReport, GameExplosion, Occlusion};
pub use face::Face;
pub use hit::{HitInfo, HitTarget, LevelHit};
pub use integrator::{apply_force, apply_rotational_force, turn_towards_vector, StepParams};
pub use level::{
    AlphaMask, Level, LevelError, Passage, SegId, Segment, Side, SideId, Tag, TexId, TextureInfo,
    Wall, WallKind,
};
pub use object::{
    Movement, Object, ObjectKind, ObjectPool, PathFollow, PhysicsData, PhysicsFlags, SpawnError,
    Splash, WeaponInfo,
};
pub use simulation::{FrameReport, Simulation};
pub use template::{Catalog, ObjectTemplate, WeaponDefinition};
pub use traversal::{
    intersect_level, sweep_level, visible, QuerySource, Ray, RayQuery, TraversalStats,
};
