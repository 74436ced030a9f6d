//! Wave composition and spawning

use glam::Vec2;
use rand::Rng;

use super::state::{BARREL_RADIUS, Barrel, Enemy, MINE_RADIUS, Mine, SurvivalState, Turret, Wall};
use crate::sim::{Direction, MillisCooldown};
use crate::tuning::SurvivalTuning;

/// Deterministic part of a wave's makeup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePlan {
    pub enemies: u32,
    pub rows: u32,
    pub enemy_hp: u32,
    /// Pixels per frame
    pub enemy_speed: f32,
    pub enemy_fire_ms: f64,
    pub turrets: u32,
    pub mines: u32,
    pub walls: u32,
}

impl WavePlan {
    pub fn for_wave(wave: u32, tuning: &SurvivalTuning) -> Self {
        let enemies = 3 + wave * 2;
        let reduction =
            (wave as f64 * tuning.enemy_fire_step_ms).min(tuning.enemy_fire_reduction_cap_ms);
        Self {
            enemies,
            rows: enemies.div_ceil(tuning.enemies_per_row),
            enemy_hp: 1 + wave / 3,
            enemy_speed: 1.0 + wave as f32 * 0.15,
            enemy_fire_ms: tuning.enemy_fire_base_ms - reduction,
            turrets: if wave >= tuning.turret_min_wave { wave / 3 } else { 0 },
            mines: if wave >= tuning.mine_min_wave {
                (wave - 4) / 2
            } else {
                0
            },
            walls: 3 + wave,
        }
    }
}

/// Populate the store for `state.wave`, replacing enemies and terrain
pub fn spawn_wave(state: &mut SurvivalState) {
    let plan = WavePlan::for_wave(state.wave, &state.tuning);
    let field = state.playfield;
    let now = state.clock_ms;

    state.enemies.clear();
    state.turrets.clear();
    state.mines.clear();

    let per_row = state.tuning.enemies_per_row;
    let mut remaining = plan.enemies;
    for row in 0..plan.rows {
        let in_row = remaining.min(per_row);
        let spacing = field.x / (in_row + 1) as f32;
        for i in 0..in_row {
            let jitter = state.rng.random::<f64>() * state.tuning.enemy_first_shot_jitter_ms;
            let delay_jitter = state.rng.random_range(0..=state.tuning.enemy_move_delay_jitter);
            let id = state.next_entity_id();
            state.enemies.push(Enemy {
                id,
                pos: Vec2::new(
                    spacing * (i + 1) as f32,
                    -50.0 - row as f32 * state.tuning.enemy_row_spacing,
                ),
                facing: Direction::Down,
                hp: plan.enemy_hp,
                speed: plan.enemy_speed,
                fire: MillisCooldown {
                    interval_ms: plan.enemy_fire_ms,
                    last_fire_ms: Some(now + jitter),
                },
                move_timer: 0,
                move_delay: state.tuning.enemy_move_delay_frames + delay_jitter,
            });
        }
        remaining -= in_row;
    }

    for _ in 0..plan.turrets {
        let pos = Vec2::new(
            50.0 + state.rng.random::<f32>() * (field.x - 100.0),
            100.0 + state.rng.random::<f32>() * 200.0,
        );
        let id = state.next_entity_id();
        state.turrets.push(Turret {
            id,
            pos,
            facing: Direction::Down,
            hp: state.tuning.turret_hp,
            fire: MillisCooldown {
                interval_ms: state.tuning.turret_fire_ms,
                last_fire_ms: Some(now),
            },
        });
    }

    for _ in 0..plan.mines {
        let pos = Vec2::new(
            50.0 + state.rng.random::<f32>() * (field.x - 100.0),
            150.0 + state.rng.random::<f32>() * (field.y / 2.0),
        );
        let speed = 1.0 + state.rng.random::<f32>();
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        state.mines.push(Mine {
            pos,
            radius: MINE_RADIUS,
            speed,
            angle,
        });
    }

    spawn_walls(state, plan.walls);

    log::info!(
        "Wave {}: {} enemies in {} rows, {} turrets, {} mines, {} walls ({} steel), {} barrels",
        state.wave,
        plan.enemies,
        plan.rows,
        plan.turrets,
        plan.mines,
        state.walls.len(),
        state.walls.iter().filter(|w| w.is_steel()).count(),
        state.barrels.len()
    );
}

/// Scatter walls through the middle band; steel walls may get a barrel beside them
fn spawn_walls(state: &mut SurvivalState, count: u32) {
    let field = state.playfield;
    state.walls.clear();
    state.barrels.clear();

    for _ in 0..count {
        let steel = state.rng.random::<f64>() < state.tuning.steel_chance
            && state.wave >= state.tuning.steel_min_wave;
        let pos = Vec2::new(
            30.0 + state.rng.random::<f32>() * (field.x - 60.0),
            200.0 + state.rng.random::<f32>() * (field.y / 2.0 - 100.0),
        );
        if steel {
            state.walls.push(Wall::steel(pos));
            if state.rng.random::<f64>() < state.tuning.barrel_chance {
                let dx = if state.rng.random::<f64>() > 0.5 { 60.0 } else { -30.0 };
                state.barrels.push(Barrel {
                    pos: pos + Vec2::new(dx, 0.0),
                    radius: BARREL_RADIUS,
                });
            }
        } else {
            state.walls.push(Wall::brick(pos, state.tuning.wall_hp));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    fn state(wave: u32, seed: u64) -> SurvivalState {
        let mut s = SurvivalState::new(Vec2::new(480.0, 800.0), SurvivalTuning::default(), seed);
        s.wave = wave;
        s.phase = Phase::Playing;
        s
    }

    #[test]
    fn test_plan_scaling() {
        let t = SurvivalTuning::default();
        let w1 = WavePlan::for_wave(1, &t);
        assert_eq!((w1.enemies, w1.rows, w1.enemy_hp), (5, 2, 1));
        assert_eq!(w1.enemy_fire_ms, 2400.0);
        assert_eq!((w1.turrets, w1.mines, w1.walls), (0, 0, 4));

        let w3 = WavePlan::for_wave(3, &t);
        assert_eq!((w3.enemies, w3.enemy_hp, w3.turrets), (9, 2, 1));

        let w7 = WavePlan::for_wave(7, &t);
        assert_eq!(w7.mines, 1);
        assert_eq!(w7.turrets, 2);

        // Fire interval reduction is capped
        let w30 = WavePlan::for_wave(30, &t);
        assert_eq!(w30.enemy_fire_ms, 1000.0);
    }

    #[test]
    fn test_wave_one_layout() {
        let mut s = state(1, 42);
        spawn_wave(&mut s);
        assert_eq!(s.enemies.len(), 5);

        // Row 0 has 4 enemies spaced W/5, row 1 a single enemy at W/2
        let row0: Vec<_> = s.enemies.iter().filter(|e| e.pos.y == -50.0).collect();
        let row1: Vec<_> = s.enemies.iter().filter(|e| e.pos.y == -130.0).collect();
        assert_eq!(row0.len(), 4);
        assert_eq!(row1.len(), 1);
        assert_eq!(row0[0].pos.x, 96.0);
        assert_eq!(row1[0].pos.x, 240.0);

        assert!(s.turrets.is_empty());
        assert!(s.mines.is_empty());
        assert_eq!(s.walls.len(), 4);
        // No steel before wave 2
        assert!(s.walls.iter().all(|w| !w.is_steel()));
        assert!(s.barrels.is_empty());
    }

    #[test]
    fn test_later_wave_hazards() {
        let mut s = state(6, 9);
        spawn_wave(&mut s);
        assert_eq!(s.enemies.len(), 15);
        assert_eq!(s.turrets.len(), 2);
        assert_eq!(s.mines.len(), 1);
        assert_eq!(s.walls.len(), 9);
        for t in &s.turrets {
            assert!((50.0..=430.0).contains(&t.pos.x));
            assert!((100.0..=300.0).contains(&t.pos.y));
        }
        let ids: std::collections::HashSet<_> = s.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_barrels_only_beside_steel() {
        let mut s = state(4, 1);
        s.tuning.steel_chance = 1.0;
        s.tuning.barrel_chance = 1.0;
        spawn_wave(&mut s);
        assert!(s.walls.iter().all(|w| w.is_steel()));
        assert_eq!(s.barrels.len(), s.walls.len());
        for (wall, barrel) in s.walls.iter().zip(&s.barrels) {
            let dx = barrel.pos.x - wall.pos.x;
            assert!((dx - 60.0).abs() < 1e-3 || (dx + 30.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_same_seed_same_wave() {
        let mut a = state(5, 123);
        let mut b = state(5, 123);
        spawn_wave(&mut a);
        spawn_wave(&mut b);
        let pos_a: Vec<_> = a.walls.iter().map(|w| w.pos).collect();
        let pos_b: Vec<_> = b.walls.iter().map(|w| w.pos).collect();
        assert_eq!(pos_a, pos_b);
        assert_eq!(a.mines.len(), b.mines.len());
    }
}
