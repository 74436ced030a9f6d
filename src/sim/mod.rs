//! Simulation building blocks shared by both games
//!
//! Pure and frame-driven:
//! - No rendering or platform dependencies
//! - Randomness only through the caller's RNG
//! - Every call is bounded work over small entity lists

pub mod collision;
pub mod dir;
pub mod effects;
pub mod fire;
pub mod movement;

pub use collision::{Rect, circle_contains, exit_point, out_of_bounds, reflect_off_rect};
pub use dir::Direction;
pub use effects::{Explosion, FxLifetime};
pub use fire::{Faction, FrameCooldown, MillisCooldown, Projectile};
pub use movement::{Bounds, Cell, ContinuousMotion, GridMotion, MoveRequest};
