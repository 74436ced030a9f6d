//! Survival frame step
//!
//! Order within a frame: player move, player fire, player bullets, enemies,
//! turrets, mines, enemy bullets, effects, reap, outcome.

use glam::Vec2;
use rand::Rng;

use super::ai;
use super::state::{ENEMY_SIZE, PLAYER_SIZE, SurvivalState};
use crate::input::DirectionFlags;
use crate::phase::PhaseEvent;
use crate::sim::{
    Direction, Explosion, Faction, Projectile, circle_contains, effects, exit_point,
    out_of_bounds, reflect_off_rect,
};

/// Advance the survival game by one frame of `dt_ms` simulated milliseconds
pub fn tick(state: &mut SurvivalState, input: &DirectionFlags, dt_ms: f64) {
    if !state.phase.is_simulating() {
        return;
    }
    state.clock_ms += dt_ms;
    state.frame += 1;

    move_player(state, input);
    player_fire(state);
    update_player_bullets(state);
    update_enemies(state);
    update_turrets(state);
    update_mines(state);
    update_enemy_bullets(state);
    effects::advance_all(&mut state.explosions);
    reap(state);
    resolve_outcome(state);
}

fn move_player(state: &mut SurvivalState, input: &DirectionFlags) {
    let dir = input.resolve();
    let bounds = state.player_bounds();
    let player = &mut state.player;
    player.motion.step(&mut player.pos, dir, &bounds);
    if let Some(dir) = dir {
        player.facing = dir;
    }
    player.moving = input.any();
}

fn player_fire(state: &mut SurvivalState) {
    let now = state.clock_ms;
    let player = &mut state.player;
    if player.fire.try_fire(now) {
        let shot = Projectile::fire(
            player.pos,
            PLAYER_SIZE / 2.0,
            player.facing,
            player.bullet_speed,
            Faction::Player,
        )
        .with_ricochet(player.ricochet);
        state.bullets.push(shot);
    }
}

fn update_player_bullets(state: &mut SurvivalState) {
    let mut bullets = std::mem::take(&mut state.bullets);
    bullets.retain_mut(|bullet| resolve_player_bullet(state, bullet));
    state.bullets = bullets;
}

/// Move one player bullet and apply the first thing it hits; returns whether it survives
fn resolve_player_bullet(state: &mut SurvivalState, bullet: &mut Projectile) -> bool {
    let prev = bullet.advance();

    if let Some(i) = state.walls.iter().position(|w| w.rect().contains(bullet.pos)) {
        let rect = state.walls[i].rect();
        if state.walls[i].take_hit() {
            state.walls.remove(i);
        }
        if bullet.ricochet > 0 {
            bullet.ricochet -= 1;
            bullet.vel = reflect_off_rect(bullet.vel, prev, &rect);
            // Fired from inside the wall: step out through the far face
            bullet.pos = if rect.contains(prev) {
                exit_point(prev, bullet.vel, &rect)
            } else {
                prev
            };
            return true;
        }
        return false;
    }

    if let Some(i) = state
        .barrels
        .iter()
        .position(|b| circle_contains(b.pos, b.radius, bullet.pos))
    {
        let barrel = state.barrels.remove(i);
        let radius = state.tuning.barrel_blast_radius;
        detonate(state, barrel.pos, radius);
        return false;
    }

    if let Some(i) = state
        .enemies
        .iter()
        .position(|e| e.hp > 0 && e.rect().contains(bullet.pos))
    {
        let enemy = &mut state.enemies[i];
        enemy.hp = enemy.hp.saturating_sub(1);
        if enemy.hp == 0 {
            let enemy = state.enemies.remove(i);
            state.score += state.tuning.enemy_score;
            state.xp += state.tuning.enemy_xp;
            log::debug!("Enemy {} destroyed (score {})", enemy.id, state.score);
        }
        return false;
    }

    if let Some(i) = state
        .turrets
        .iter()
        .position(|t| t.hp > 0 && t.rect().contains(bullet.pos))
    {
        let turret = &mut state.turrets[i];
        turret.hp = turret.hp.saturating_sub(1);
        if turret.hp == 0 {
            let turret = state.turrets.remove(i);
            state.score += state.tuning.turret_score;
            state.xp += state.tuning.turret_xp;
            log::debug!("Turret {} destroyed (score {})", turret.id, state.score);
        }
        return false;
    }

    !out_of_bounds(bullet.pos, state.playfield)
}

/// Area explosion: spawns the effect, softens nearby steel and damages
/// enemies and turrets. The player is never hurt by blasts.
pub fn detonate(state: &mut SurvivalState, center: Vec2, radius: f32) {
    let t = &state.tuning;
    state
        .explosions
        .push(Explosion::fading(center, t.explosion_growth, t.explosion_fade));

    let reach = radius + t.steel_blast_margin;
    let mut softened = 0;
    for wall in &mut state.walls {
        if wall.pos.distance(center) < reach && wall.soften() {
            softened += 1;
        }
    }
    for enemy in &mut state.enemies {
        if enemy.pos.distance(center) < radius {
            enemy.hp = enemy.hp.saturating_sub(t.blast_damage);
        }
    }
    for turret in &mut state.turrets {
        if turret.pos.distance(center) < radius {
            turret.hp = turret.hp.saturating_sub(t.blast_damage);
        }
    }
    log::debug!(
        "Explosion at ({:.0}, {:.0}) r={} softened {} steel walls",
        center.x,
        center.y,
        radius,
        softened
    );
}

fn update_enemies(state: &mut SurvivalState) {
    let now = state.clock_ms;
    let player_x = state.player.pos.x;
    let field = state.playfield;
    let t = &state.tuning;
    let half = ENEMY_SIZE / 2.0;

    // Blast kills from this frame are reaped later and must not act
    for enemy in state.enemies.iter_mut().filter(|e| e.hp > 0) {
        enemy.move_timer += 1;
        if enemy.move_timer > enemy.move_delay {
            enemy.move_timer = 0;
            enemy.move_delay =
                t.enemy_move_delay_frames + state.rng.random_range(0..=t.enemy_move_delay_jitter);
            enemy.facing = ai::choose_direction(&mut state.rng, &t.ai, enemy.pos.x, player_x);
        }

        enemy.pos += enemy.facing.vector() * enemy.speed;

        if enemy.pos.x < half {
            enemy.pos.x = half;
            enemy.facing = Direction::Right;
        }
        if enemy.pos.x > field.x - half {
            enemy.pos.x = field.x - half;
            enemy.facing = Direction::Left;
        }
        if enemy.pos.y < t.enemy_top_bound {
            enemy.pos.y = t.enemy_top_bound;
            enemy.facing = Direction::Down;
        }
        if enemy.pos.y > field.y - t.enemy_bottom_margin {
            enemy.pos.y = field.y - t.enemy_bottom_margin;
            enemy.facing = Direction::Up;
        }

        if enemy.fire.try_fire(now) {
            state.enemy_bullets.push(Projectile::fire(
                enemy.pos,
                half,
                enemy.facing,
                t.enemy_bullet_speed,
                Faction::Hostile,
            ));
        }
    }
}

fn update_turrets(state: &mut SurvivalState) {
    let now = state.clock_ms;
    let target = state.player.pos;
    let speed = state.tuning.turret_bullet_speed;

    for turret in state.turrets.iter_mut().filter(|t| t.hp > 0) {
        if turret.fire.try_fire(now) {
            turret.facing = Direction::dominant(target - turret.pos);
            state.enemy_bullets.push(Projectile::fire(
                turret.pos,
                0.0,
                turret.facing,
                speed,
                Faction::Hostile,
            ));
        }
    }
}

fn update_mines(state: &mut SurvivalState) {
    let field = state.playfield;
    let player_pos = state.player.pos;
    let mut blasts = Vec::new();

    state.mines.retain_mut(|mine| {
        mine.drift(field);
        if mine.pos.distance(player_pos) < mine.radius + PLAYER_SIZE / 2.0 {
            blasts.push(mine.pos);
            false
        } else {
            true
        }
    });

    let radius = state.tuning.mine_blast_radius;
    for pos in blasts {
        state.player.hp = state.player.hp.saturating_sub(1);
        log::debug!("Mine hit player, hp {}", state.player.hp);
        detonate(state, pos, radius);
    }
}

fn update_enemy_bullets(state: &mut SurvivalState) {
    let base = state.base_rect();
    let field = state.playfield;
    let walls = &mut state.walls;
    let player = &mut state.player;
    let base_hp = &mut state.base.hp;

    state.enemy_bullets.retain_mut(|bullet| {
        bullet.advance();

        if let Some(i) = walls.iter().position(|w| w.rect().contains(bullet.pos)) {
            if walls[i].take_hit() {
                walls.remove(i);
            }
            return false;
        }
        if player.rect().contains(bullet.pos) {
            player.hp = player.hp.saturating_sub(1);
            return false;
        }
        if base.contains(bullet.pos) {
            *base_hp = base_hp.saturating_sub(1);
            return false;
        }
        !out_of_bounds(bullet.pos, field)
    });
}

/// Remove anything reduced to zero health this frame, scoring blast kills
fn reap(state: &mut SurvivalState) {
    let t = &state.tuning;
    let score = &mut state.score;
    let xp = &mut state.xp;

    state.enemies.retain(|e| {
        if e.hp == 0 {
            *score += t.enemy_score;
            *xp += t.enemy_xp;
            false
        } else {
            true
        }
    });
    state.turrets.retain(|turret| {
        if turret.hp == 0 {
            *score += t.turret_score;
            *xp += t.turret_xp;
            false
        } else {
            true
        }
    });
}

fn resolve_outcome(state: &mut SurvivalState) {
    if state.player.hp == 0 {
        state.transition(PhaseEvent::PlayerDefeated);
    } else if state.base.hp == 0 {
        state.transition(PhaseEvent::BaseDestroyed);
    } else if state.enemies.is_empty()
        && state.turrets.is_empty()
        && state.transition(PhaseEvent::WaveCleared)
    {
        state.bullets.clear();
        state.enemy_bullets.clear();
    }
}
