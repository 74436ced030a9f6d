//! Data-driven game balance
//!
//! Defaults reproduce the shipped feel. Every struct is `#[serde(default)]`
//! so a JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("Tuning parse error")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn ensure(ok: bool, field: &'static str, reason: &str) -> Result<(), TuningError> {
    if ok {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: reason.to_string(),
        })
    }
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

/// Balance for both games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub survival: SurvivalTuning,
    pub battle: BattleTuning,
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse `json` if present, falling back to defaults on any problem
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        self.survival.validate()?;
        self.battle.validate()
    }
}

/// Cumulative thresholds for the survival enemies' direction roll.
///
/// roll < `down` heads down, roll < `chase` heads towards the player's
/// column, anything above picks one of four at random.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalAiWeights {
    pub down: f64,
    pub chase: f64,
}

impl Default for SurvivalAiWeights {
    fn default() -> Self {
        Self {
            down: 0.4,
            chase: 0.8,
        }
    }
}

/// Continuous survival shooter balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalTuning {
    // === Player ===
    /// Pixels per frame
    pub player_speed: f32,
    pub player_max_hp: u32,
    /// Pixels per frame
    pub player_bullet_speed: f32,
    pub player_fire_interval_ms: f64,
    /// Fire interval reduction per bullet-speed upgrade
    pub fire_interval_step_ms: f64,
    pub fire_interval_floor_ms: f64,
    pub bullet_speed_multiplier: f32,
    /// Clamp margins from the top and bottom edges
    pub bound_top: f32,
    pub bound_bottom: f32,
    /// Player spawns this far above the bottom edge
    pub player_spawn_offset: f32,

    // === Base ===
    pub base_max_hp: u32,

    // === Enemies ===
    pub enemies_per_row: u32,
    pub enemy_row_spacing: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_fire_base_ms: f64,
    pub enemy_fire_step_ms: f64,
    pub enemy_fire_reduction_cap_ms: f64,
    pub enemy_first_shot_jitter_ms: f64,
    pub enemy_move_delay_frames: u32,
    pub enemy_move_delay_jitter: u32,
    pub enemy_top_bound: f32,
    pub enemy_bottom_margin: f32,
    pub ai: SurvivalAiWeights,

    // === Turrets ===
    pub turret_min_wave: u32,
    pub turret_hp: u32,
    pub turret_fire_ms: f64,
    pub turret_bullet_speed: f32,

    // === Mines ===
    pub mine_min_wave: u32,

    // === Walls and barrels ===
    pub wall_hp: u32,
    pub steel_min_wave: u32,
    pub steel_chance: f64,
    pub barrel_chance: f64,

    // === Explosions ===
    pub barrel_blast_radius: f32,
    pub mine_blast_radius: f32,
    /// Extra reach when softening steel
    pub steel_blast_margin: f32,
    pub blast_damage: u32,
    pub explosion_growth: f32,
    pub explosion_fade: f32,

    // === Scoring ===
    pub enemy_score: u64,
    pub enemy_xp: u32,
    pub turret_score: u64,
    pub turret_xp: u32,
}

impl Default for SurvivalTuning {
    fn default() -> Self {
        Self {
            player_speed: 4.0,
            player_max_hp: 3,
            player_bullet_speed: 8.0,
            player_fire_interval_ms: 400.0,
            fire_interval_step_ms: 50.0,
            fire_interval_floor_ms: 200.0,
            bullet_speed_multiplier: 1.25,
            bound_top: 100.0,
            bound_bottom: 100.0,
            player_spawn_offset: 150.0,

            base_max_hp: 5,

            enemies_per_row: 4,
            enemy_row_spacing: 80.0,
            enemy_bullet_speed: 6.0,
            enemy_fire_base_ms: 2500.0,
            enemy_fire_step_ms: 100.0,
            enemy_fire_reduction_cap_ms: 1500.0,
            enemy_first_shot_jitter_ms: 2000.0,
            enemy_move_delay_frames: 60,
            enemy_move_delay_jitter: 60,
            enemy_top_bound: 50.0,
            enemy_bottom_margin: 120.0,
            ai: SurvivalAiWeights::default(),

            turret_min_wave: 3,
            turret_hp: 2,
            turret_fire_ms: 2000.0,
            turret_bullet_speed: 5.0,

            mine_min_wave: 5,

            wall_hp: 3,
            steel_min_wave: 2,
            steel_chance: 0.3,
            barrel_chance: 0.7,

            barrel_blast_radius: 80.0,
            mine_blast_radius: 40.0,
            steel_blast_margin: 30.0,
            blast_damage: 2,
            explosion_growth: 3.0,
            explosion_fade: 0.05,

            enemy_score: 100,
            enemy_xp: 10,
            turret_score: 200,
            turret_xp: 20,
        }
    }
}

impl SurvivalTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        ensure(self.player_speed > 0.0, "survival.player_speed", "must be positive")?;
        ensure(self.player_max_hp >= 1, "survival.player_max_hp", "must be at least 1")?;
        ensure(self.base_max_hp >= 1, "survival.base_max_hp", "must be at least 1")?;
        ensure(
            self.player_bullet_speed > 0.0,
            "survival.player_bullet_speed",
            "must be positive",
        )?;
        ensure(
            self.fire_interval_floor_ms >= 0.0
                && self.fire_interval_floor_ms <= self.player_fire_interval_ms,
            "survival.fire_interval_floor_ms",
            "must be between 0 and the starting fire interval",
        )?;
        ensure(self.enemies_per_row >= 1, "survival.enemies_per_row", "must be at least 1")?;
        ensure(
            self.explosion_fade > 0.0,
            "survival.explosion_fade",
            "must be positive or explosions never expire",
        )?;
        let ai = &self.ai;
        ensure(
            0.0 <= ai.down && ai.down <= ai.chase && ai.chase <= 1.0,
            "survival.ai",
            "thresholds must satisfy 0 <= down <= chase <= 1",
        )?;
        ensure(is_probability(self.steel_chance), "survival.steel_chance", "must be in [0, 1]")?;
        ensure(is_probability(self.barrel_chance), "survival.barrel_chance", "must be in [0, 1]")
    }
}

/// Cumulative thresholds for the grid enemies' direction roll.
///
/// roll < `down` heads down, < `left` left, < `right` right, otherwise up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridAiWeights {
    pub down: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for GridAiWeights {
    fn default() -> Self {
        Self {
            down: 0.5,
            left: 0.7,
            right: 0.9,
        }
    }
}

/// Grid battle balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleTuning {
    // === Board ===
    pub cols: i32,
    pub rows: i32,
    pub tile_size: f32,
    pub max_levels: u32,
    /// Obstacle patterns at level 0
    pub base_patterns: u32,
    /// Extra obstacle patterns per level
    pub patterns_per_level: u32,

    // === Player ===
    pub player_lives: u32,
    /// Pixels per frame
    pub player_speed: f32,
    pub player_fire_frames: u32,
    pub player_bullet_speed: f32,

    // === Enemies ===
    pub enemies_base: u32,
    pub enemies_per_level: u32,
    pub max_enemies_on_field: u32,
    pub spawn_interval_frames: u32,
    pub enemy_bullet_speed: f32,
    pub enemy_fire_frames: u32,
    /// Per-frame chance to shoot once the cooldown has elapsed
    pub enemy_fire_chance: f64,
    /// Per-frame chance to pick a new direction while idle
    pub enemy_turn_chance: f64,
    pub ai: GridAiWeights,

    // === Bullets ===
    /// Opposing bullets closer than this annihilate each other
    pub bullet_clash_distance: f32,

    pub explosion_frames: u32,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            cols: 13,
            rows: 13,
            tile_size: 32.0,
            max_levels: 5,
            base_patterns: 6,
            patterns_per_level: 2,

            player_lives: 3,
            player_speed: 2.0,
            player_fire_frames: 30,
            player_bullet_speed: 5.0,

            enemies_base: 4,
            enemies_per_level: 2,
            max_enemies_on_field: 4,
            spawn_interval_frames: 120,
            enemy_bullet_speed: 4.0,
            enemy_fire_frames: 60,
            enemy_fire_chance: 0.05,
            enemy_turn_chance: 0.02,
            ai: GridAiWeights::default(),

            bullet_clash_distance: 8.0,

            explosion_frames: 20,
        }
    }
}

impl BattleTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        ensure(
            self.cols >= 7 && self.rows >= 7,
            "battle.cols/rows",
            "grid must be at least 7x7",
        )?;
        ensure(self.tile_size > 0.0, "battle.tile_size", "must be positive")?;
        ensure(self.max_levels >= 1, "battle.max_levels", "must be at least 1")?;
        ensure(self.player_lives >= 1, "battle.player_lives", "must be at least 1")?;
        ensure(
            self.player_speed > 0.0 && self.player_speed <= self.tile_size,
            "battle.player_speed",
            "must be in (0, tile_size]",
        )?;
        ensure(
            self.enemies_base + self.enemies_per_level >= 1,
            "battle.enemies_base",
            "every level needs at least one enemy",
        )?;
        ensure(
            self.max_enemies_on_field >= 1,
            "battle.max_enemies_on_field",
            "must be at least 1",
        )?;
        ensure(
            is_probability(self.enemy_fire_chance),
            "battle.enemy_fire_chance",
            "must be in [0, 1]",
        )?;
        ensure(
            is_probability(self.enemy_turn_chance),
            "battle.enemy_turn_chance",
            "must be in [0, 1]",
        )?;
        let ai = &self.ai;
        ensure(
            0.0 <= ai.down && ai.down <= ai.left && ai.left <= ai.right && ai.right <= 1.0,
            "battle.ai",
            "thresholds must satisfy 0 <= down <= left <= right <= 1",
        )
    }

    /// Playfield size in pixels
    pub fn playfield(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.cols as f32 * self.tile_size,
            self.rows as f32 * self.tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{ "survival": { "ai": { "down": 0.1 } }, "battle": { "max_levels": 2 } }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.survival.ai.down, 0.1);
        // Untouched fields keep their defaults
        assert_eq!(tuning.survival.ai.chase, 0.8);
        assert_eq!(tuning.survival.player_max_hp, 3);
        assert_eq!(tuning.battle.max_levels, 2);
        assert_eq!(tuning.battle.patterns_per_level, 2);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let json = r#"{ "survival": { "ai": { "down": 0.9, "chase": 0.5 } } }"#;
        match Tuning::from_json(json) {
            Err(TuningError::Invalid { field, .. }) => assert_eq!(field, "survival.ai"),
            other => panic!("expected invalid tuning, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_fallback_to_default() {
        let tuning = Tuning::from_json_or_default(Some(r#"{ "battle": { "cols": 2 } }"#));
        assert_eq!(tuning, Tuning::default());
        assert_eq!(Tuning::from_json_or_default(None), Tuning::default());
    }

    #[test]
    fn test_battle_playfield() {
        let battle = BattleTuning::default();
        assert_eq!(battle.playfield(), glam::Vec2::new(416.0, 416.0));
    }
}
