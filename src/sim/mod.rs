//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed per-tick constants
//! - Seeded RNG only
//! - Stable iteration order (pool order)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod generator;
pub mod pool;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, overlaps, resolve_collisions};
pub use generator::{RowKind, Spawn, generate_at, generate_single_at, row_kind_for_roll};
pub use pool::{maintain_pool, prune_line, refill};
pub use state::{GameEvent, Platform, PlatformKind, Player, PopCause, SessionState};
pub use tick::{
    Steer, TickInput, TickOutcome, advance_pop_animation, check_fall_death, tick,
    update_player,
};
