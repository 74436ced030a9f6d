//! Grid battle frame step
//!
//! Order within a frame: spawn, player move, player fire, enemies,
//! bullets, effects, outcome.

use rand::Rng;

use super::ai;
use super::grid::Tile;
use super::state::{BattleState, EnemyKind, Tank, TankKind};
use crate::input::DirectionFlags;
use crate::phase::PhaseEvent;
use crate::sim::{Cell, Explosion, Faction, MoveRequest, Projectile, effects, out_of_bounds};

/// Advance the grid battle by one frame. Timing is frame-counted so `dt_ms`
/// is unused.
pub fn tick(state: &mut BattleState, input: &DirectionFlags, _dt_ms: f64) {
    if !state.phase.is_simulating() {
        return;
    }
    state.frame += 1;

    spawn_enemies(state);
    move_player(state, input);
    player_fire(state);
    update_enemies(state);
    update_bullets(state);
    effects::advance_all(&mut state.explosions);
    resolve_outcome(state);
}

fn spawn_enemies(state: &mut BattleState) {
    if state.enemies_to_spawn == 0 {
        return;
    }
    if state.spawn_timer > 0 {
        state.spawn_timer -= 1;
        return;
    }
    if state.enemies.len() as u32 >= state.tuning.max_enemies_on_field {
        return;
    }
    let free: Vec<Cell> = state
        .layout
        .enemy_spawns
        .into_iter()
        .filter(|&c| state.grid.is_passable(c) && !state.occupied(c, u32::MAX))
        .collect();
    if free.is_empty() {
        // All spawn points blocked; retry next frame
        return;
    }
    let cell = free[state.rng.random_range(0..free.len())];
    let kind = EnemyKind::roll(&mut state.rng, state.level);
    let id = state.next_entity_id();
    state.enemies.push(Tank::enemy(id, kind, cell, &state.tuning));
    state.enemies_to_spawn -= 1;
    state.spawn_timer = state.tuning.spawn_interval_frames;
    log::debug!(
        "Spawned {:?} #{} at ({}, {}), {} left",
        kind,
        id,
        cell.col,
        cell.row,
        state.enemies_to_spawn
    );
}

fn move_player(state: &mut BattleState, input: &DirectionFlags) {
    let tile = state.tile_size();
    match input.resolve() {
        Some(dir) if !state.player.motion.moving => {
            state.player.facing = dir;
            let me = state.player.id;
            let mut motion = state.player.motion;
            motion.request(dir, tile, |c| {
                state.grid.is_passable(c) && !state.occupied(c, me)
            });
            state.player.motion = motion;
        }
        _ => {}
    }
    let player = &mut state.player;
    player.motion.advance(&mut player.pos, player.speed);
}

fn player_fire(state: &mut BattleState) {
    let half = state.tile_size() / 2.0;
    let speed = state.tuning.player_bullet_speed;
    let player = &mut state.player;
    player.fire.tick();
    if player.fire.try_fire() {
        state.bullets.push(Projectile::fire(
            player.pos,
            half,
            player.facing,
            speed,
            Faction::Player,
        ));
    }
}

fn update_enemies(state: &mut BattleState) {
    let tile = state.tile_size();
    for i in 0..state.enemies.len() {
        let me = state.enemies[i].id;
        state.enemies[i].fire.tick();

        if !state.enemies[i].motion.moving {
            if state.rng.random_bool(state.tuning.enemy_turn_chance) {
                state.enemies[i].facing = ai::choose_direction(&mut state.rng, &state.tuning.ai);
            }
            let facing = state.enemies[i].facing;
            let mut motion = state.enemies[i].motion;
            let request = motion.request(facing, tile, |c| {
                state.grid.is_passable(c) && !state.occupied(c, me)
            });
            state.enemies[i].motion = motion;
            if request == MoveRequest::Blocked {
                state.enemies[i].facing = ai::reroute(&mut state.rng, facing);
            }
        }

        let enemy = &mut state.enemies[i];
        enemy.motion.advance(&mut enemy.pos, enemy.speed);

        if state.enemies[i].fire.is_ready()
            && state.rng.random_bool(state.tuning.enemy_fire_chance)
        {
            let enemy = &mut state.enemies[i];
            enemy.fire.try_fire();
            state.bullets.push(Projectile::fire(
                enemy.pos,
                tile / 2.0,
                enemy.facing,
                state.tuning.enemy_bullet_speed,
                Faction::Hostile,
            ));
        }
    }
}

fn update_bullets(state: &mut BattleState) {
    let tile = state.tile_size();
    let field = state.playfield();
    let clash = state.tuning.bullet_clash_distance;
    let frames = state.tuning.explosion_frames;

    let mut bullets = std::mem::take(&mut state.bullets);
    for b in &mut bullets {
        b.advance();
    }
    let mut alive = vec![true; bullets.len()];

    for i in 0..bullets.len() {
        if !alive[i] {
            continue;
        }
        let (pos, owner) = (bullets[i].pos, bullets[i].owner);

        // Terrain
        let cell = Cell::containing(pos, tile);
        if let Some(kind) = state.grid.get(cell).filter(|t| t.stops_bullets()) {
            match kind {
                Tile::Brick => {
                    state.grid.set(cell, Tile::Empty);
                }
                Tile::Base if !state.base_destroyed => {
                    state.base_destroyed = true;
                    state
                        .explosions
                        .push(Explosion::framed(cell.center(tile), 2.0, frames * 2));
                    log::info!("Base destroyed on level {}", state.level);
                }
                _ => {}
            }
            alive[i] = false;
            continue;
        }

        // Tanks of the other side
        match owner {
            Faction::Player => {
                if let Some(j) = state
                    .enemies
                    .iter()
                    .position(|e| e.rect(tile).contains(pos))
                {
                    let enemy = &mut state.enemies[j];
                    enemy.hp = enemy.hp.saturating_sub(1);
                    if enemy.hp == 0 {
                        let enemy = state.enemies.remove(j);
                        if let TankKind::Enemy(kind) = enemy.kind {
                            state.score += kind.score();
                        }
                        state
                            .explosions
                            .push(Explosion::framed(enemy.pos, 1.5, frames));
                    }
                    alive[i] = false;
                    continue;
                }
            }
            Faction::Hostile => {
                if state.player.rect(tile).contains(pos) {
                    player_hit(state);
                    alive[i] = false;
                    continue;
                }
            }
        }

        // Opposing bullets cancel out
        if let Some(j) = (0..bullets.len()).find(|&j| {
            j != i
                && alive[j]
                && bullets[j].owner.opposes(owner)
                && bullets[j].pos.distance(pos) < clash
        }) {
            alive[i] = false;
            alive[j] = false;
            continue;
        }

        if out_of_bounds(pos, field) {
            alive[i] = false;
        }
    }

    let mut flags = alive.into_iter();
    bullets.retain(|_| flags.next().unwrap_or(false));
    state.bullets = bullets;
}

fn player_hit(state: &mut BattleState) {
    let frames = state.tuning.explosion_frames;
    state
        .explosions
        .push(Explosion::framed(state.player.pos, 1.5, frames));
    state.lives = state.lives.saturating_sub(1);
    log::info!("Player hit, {} lives left", state.lives);
    if state.lives > 0 {
        state.respawn_player();
    }
}

fn resolve_outcome(state: &mut BattleState) {
    if state.base_destroyed {
        state.transition(PhaseEvent::BaseDestroyed);
    } else if state.lives == 0 {
        state.transition(PhaseEvent::PlayerDefeated);
    } else if state.enemies.is_empty() && state.enemies_to_spawn == 0 {
        if state.level >= state.tuning.max_levels {
            state.transition(PhaseEvent::CampaignWon);
        } else {
            state.level += 1;
            state.start_level();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::phase::Phase;
    use crate::sim::{Direction, FrameCooldown};
    use crate::tuning::BattleTuning;

    fn playing(seed: u64) -> BattleState {
        let mut s = BattleState::new(BattleTuning::default(), seed);
        s.transition(PhaseEvent::Start);
        s.reset();
        s
    }

    /// Empty arena with the base intact, nothing queued
    fn quiet(seed: u64) -> BattleState {
        let mut s = playing(seed);
        s.grid.fill(Tile::Empty);
        s.grid.set(s.layout.base, Tile::Base);
        s.enemies_to_spawn = 0;
        s.player.fire = FrameCooldown {
            frames: 1_000_000,
            remaining: 1_000_000,
        };
        s
    }

    fn add_enemy(s: &mut BattleState, kind: EnemyKind, cell: Cell) -> u32 {
        let id = s.next_entity_id();
        let mut tank = Tank::enemy(id, kind, cell, &s.tuning);
        tank.fire = FrameCooldown {
            frames: 1_000_000,
            remaining: 1_000_000,
        };
        s.enemies.push(tank);
        id
    }

    fn hostile(pos: glam::Vec2, vel: glam::Vec2) -> Projectile {
        Projectile {
            pos,
            vel,
            ricochet: 0,
            owner: Faction::Hostile,
        }
    }

    #[test]
    fn test_first_enemy_spawns_immediately() {
        let mut s = playing(1);
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies_to_spawn, 5);
        // It may already be pulling away from the spawn cell
        assert!(s.layout.enemy_spawns.contains(&s.enemies[0].motion.from));
    }

    #[test]
    fn test_spawn_respects_field_cap() {
        let mut s = playing(2);
        s.tuning.spawn_interval_frames = 0;
        for _ in 0..10 {
            tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        }
        assert!(s.enemies.len() <= 4);
    }

    #[test]
    fn test_player_moves_one_tile() {
        let mut s = quiet(3);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        let start = s.player.pos;
        tick(&mut s, &DirectionFlags::only(Direction::Up), FRAME_MS);
        assert!(s.player.motion.moving);
        assert_eq!(s.player.motion.cell, Cell::new(4, 11));
        // 32 px at 2 px/frame
        for _ in 0..15 {
            tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        }
        assert!(!s.player.motion.moving);
        assert_eq!(s.player.pos, start - glam::Vec2::new(0.0, 32.0));
    }

    #[test]
    fn test_player_blocked_by_terrain() {
        let mut s = quiet(4);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        s.grid.set(Cell::new(4, 11), Tile::Water);
        tick(&mut s, &DirectionFlags::only(Direction::Up), FRAME_MS);
        assert!(!s.player.motion.moving);
        assert_eq!(s.player.facing, Direction::Up);
        assert_eq!(s.player.motion.cell, Cell::new(4, 12));
    }

    #[test]
    fn test_player_bullet_breaks_brick() {
        let mut s = quiet(5);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        s.grid.set(Cell::new(4, 10), Tile::Brick);
        s.player.fire.remaining = 0;
        for _ in 0..20 {
            tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        }
        assert_eq!(s.grid.get(Cell::new(4, 10)), Some(Tile::Empty));
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_armored_takes_three_hits() {
        let mut s = quiet(6);
        add_enemy(&mut s, EnemyKind::Armored, Cell::new(4, 5));
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        let target = Cell::new(4, 5).center(32.0);
        for hit in 1..=3 {
            s.bullets.push(Projectile {
                pos: target + glam::Vec2::new(0.0, 5.0),
                vel: glam::Vec2::new(0.0, -5.0),
                ricochet: 0,
                owner: Faction::Player,
            });
            // Keep the tank in place
            s.enemies[0].motion.moving = false;
            s.enemies[0].pos = target;
            s.enemies[0].motion.cell = Cell::new(4, 5);
            s.tuning.enemy_turn_chance = 0.0;
            s.enemies[0].facing = Direction::Down;
            s.grid.set(Cell::new(4, 6), Tile::Steel);
            tick(&mut s, &DirectionFlags::default(), FRAME_MS);
            if hit < 3 {
                assert_eq!(s.enemies[0].hp, 3 - hit);
            }
        }
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.score, 300);
    }

    #[test]
    fn test_hostile_bullet_destroys_base() {
        let mut s = quiet(7);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        let base = s.layout.base.center(32.0);
        s.bullets
            .push(hostile(base - glam::Vec2::new(0.0, 18.0), glam::Vec2::new(0.0, 4.0)));
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert!(s.base_destroyed);
        assert_eq!(s.phase, Phase::GameOver);
    }

    #[test]
    fn test_own_bullet_destroys_base() {
        let mut s = quiet(8);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        let base = s.layout.base.center(32.0);
        s.bullets.push(Projectile {
            pos: base - glam::Vec2::new(0.0, 18.0),
            vel: glam::Vec2::new(0.0, 4.0),
            ricochet: 0,
            owner: Faction::Player,
        });
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert!(s.base_destroyed);
        assert!(s.bullets.is_empty());
        assert_eq!(s.phase, Phase::GameOver);
    }

    #[test]
    fn test_blocked_enemy_turns() {
        let mut s = quiet(13);
        s.tuning.enemy_turn_chance = 0.0;
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(8, 5));
        s.enemies[0].facing = Direction::Down;
        s.grid.set(Cell::new(8, 6), Tile::Steel);
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert_ne!(s.enemies[0].facing, Direction::Down);
        assert!(!s.enemies[0].motion.moving);
        assert_eq!(s.enemies[0].motion.cell, Cell::new(8, 5));
    }

    #[test]
    fn test_bullets_pass_over_water() {
        let mut s = quiet(9);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        s.grid.set(Cell::new(8, 5), Tile::Water);
        let start = Cell::new(8, 5).center(32.0);
        s.bullets.push(hostile(start, glam::Vec2::new(0.0, 4.0)));
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert_eq!(s.bullets.len(), 1);
        assert_eq!(s.grid.get(Cell::new(8, 5)), Some(Tile::Water));
    }

    #[test]
    fn test_opposing_bullets_cancel() {
        let mut s = quiet(10);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        let mid = Cell::new(8, 5).center(32.0);
        s.bullets.push(hostile(mid, glam::Vec2::new(0.0, 4.0)));
        s.bullets.push(Projectile {
            pos: mid + glam::Vec2::new(0.0, 12.0),
            vel: glam::Vec2::new(0.0, -5.0),
            ricochet: 0,
            owner: Faction::Player,
        });
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_player_loses_lives_then_game_over() {
        let mut s = quiet(11);
        add_enemy(&mut s, EnemyKind::Basic, Cell::new(0, 0));
        for expected in [2, 1] {
            let p = s.player.pos;
            s.bullets.push(hostile(p - glam::Vec2::new(0.0, 8.0), glam::Vec2::new(0.0, 4.0)));
            tick(&mut s, &DirectionFlags::default(), FRAME_MS);
            assert_eq!(s.lives, expected);
            assert_eq!(s.player.motion.cell, s.layout.player_spawn);
            assert_eq!(s.phase, Phase::Playing);
        }
        let p = s.player.pos;
        s.bullets.push(hostile(p - glam::Vec2::new(0.0, 8.0), glam::Vec2::new(0.0, 4.0)));
        tick(&mut s, &DirectionFlags::default(), FRAME_MS);
        assert_eq!(s.lives, 0);
        assert_eq!(s.phase, Phase::GameOver);

        let frame = s.frame;
        tick(&mut s, &DirectionFlags::only(Direction::Up), FRAME_MS);
        assert_eq!(s.frame, frame);
    }

    #[test]
    fn test_level_advance_and_victory() {
        let mut s = quiet(12);
        s.tick_clear_level();
        assert_eq!(s.level, 2);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.enemies_to_spawn, 8);

        s.level = s.tuning.max_levels;
        s.tick_clear_level();
        assert_eq!(s.phase, Phase::Victory);
        assert_eq!(s.level, s.tuning.max_levels);
    }

    impl BattleState {
        /// Drop every enemy, queued or on the field, then step once
        fn tick_clear_level(&mut self) {
            self.enemies.clear();
            self.enemies_to_spawn = 0;
            tick(self, &DirectionFlags::default(), FRAME_MS);
        }
    }
}
