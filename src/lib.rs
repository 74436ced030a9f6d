//! Tank Arcade - two small tank games for a browser canvas
//!
//! Core modules:
//! - `sim`: Movement, collision, fire-rate and effect primitives shared by both games
//! - `survival`: Continuous wave shooter with upgrades
//! - `battle`: Tile-locked tank battle defending a base
//! - `game`: The `Arcade` trait and snapshots the loop driver works with
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform glue
//! - `tuning`: Data-driven game balance

pub mod battle;
pub mod game;
pub mod input;
pub mod phase;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod survival;
pub mod tuning;

pub use game::{Arcade, GameMode, Hud, Snapshot};
pub use input::{Action, DirectionFlags, Upgrade};
pub use phase::Phase;
pub use tuning::{Tuning, TuningError};

/// Loop driver constants
pub mod consts {
    /// Nominal frame length at 60 Hz
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame fed to the simulation (tab switches, debugger pauses)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Default survival playfield when the host gives no size
    pub const DEFAULT_WIDTH: f32 = 480.0;
    pub const DEFAULT_HEIGHT: f32 = 800.0;
}
