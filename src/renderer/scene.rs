//! Snapshot to vertex list
//!
//! Pure: reads a [`Snapshot`] and emits triangles in playfield pixels.
//! Draw order is back to front.

use glam::Vec2;

use super::shapes::{self, TankPaint};
use super::vertex::{Vertex, colors, with_alpha};
use crate::battle::{BattleSnapshot, EnemyKind, Tank, TankKind, Tile};
use crate::game::Snapshot;
use crate::sim::{Cell, Explosion, Faction, Rect};
use crate::survival::SurvivalSnapshot;
use crate::survival::state::{BULLET_RADIUS, ENEMY_SIZE, PLAYER_SIZE, TURRET_SIZE, WallKind};

const CIRCLE_SEGMENTS: u32 = 16;
const BACKGROUND_GRID: f32 = 40.0;

const PLAYER_PAINT: TankPaint = TankPaint {
    body: colors::PLAYER_BODY,
    turret: colors::PLAYER_TURRET,
    tracks: colors::PLAYER_TRACKS,
};

/// Build the full frame for `snapshot`
pub fn build(snapshot: &Snapshot) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    match snapshot {
        Snapshot::Survival(s) => survival(&mut out, s),
        Snapshot::Battle(b) => battle(&mut out, b),
    }
    out
}

fn background(out: &mut Vec<Vertex>, playfield: Vec2, grid: f32) {
    shapes::rect(out, &Rect::new(playfield / 2.0, playfield), colors::BACKGROUND);
    let mut x = 0.0;
    while x < playfield.x {
        shapes::rect(
            out,
            &Rect::new(Vec2::new(x, playfield.y / 2.0), Vec2::new(1.0, playfield.y)),
            colors::GRID_LINE,
        );
        x += grid;
    }
    let mut y = 0.0;
    while y < playfield.y {
        shapes::rect(
            out,
            &Rect::new(Vec2::new(playfield.x / 2.0, y), Vec2::new(playfield.x, 1.0)),
            colors::GRID_LINE,
        );
        y += grid;
    }
}

fn explosion(out: &mut Vec<Vertex>, fx: &Explosion) {
    let alpha = fx.alpha();
    if fx.radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    shapes::radial_gradient(
        out,
        fx.pos,
        fx.radius,
        with_alpha(colors::BLAST_CORE, alpha),
        with_alpha(colors::BLAST_EDGE, 0.0),
        CIRCLE_SEGMENTS * 2,
    );
    shapes::circle(
        out,
        fx.pos,
        fx.radius * 0.5,
        with_alpha(colors::BLAST_EDGE, alpha * 0.5),
        CIRCLE_SEGMENTS,
    );
}

/// Small white squares showing remaining hit points
fn hp_pips(out: &mut Vec<Vertex>, center: Vec2, hp: u32) {
    if hp <= 1 {
        return;
    }
    let spacing = 6.0;
    let first = center.x - (hp - 1) as f32 * spacing / 2.0;
    for i in 0..hp {
        shapes::rect(
            out,
            &Rect::square(Vec2::new(first + i as f32 * spacing, center.y), 4.0),
            colors::HP_PIP,
        );
    }
}

fn survival(out: &mut Vec<Vertex>, s: &SurvivalSnapshot) {
    let field = s.playfield;
    background(out, field, BACKGROUND_GRID);

    // Base
    shapes::rect(
        out,
        &Rect::new(
            Vec2::new(field.x / 2.0, field.y - 10.0),
            Vec2::new(120.0, 20.0),
        ),
        colors::BASE_PLATFORM,
    );
    let base_color = if s.base.hp == 0 {
        colors::BASE_RUBBLE
    } else {
        colors::BASE
    };
    shapes::rect(out, &s.base_rect, base_color);
    shapes::rect_outline(out, &s.base_rect, 2.0, colors::BASE_EDGE);

    for wall in &s.walls {
        let (fill, edge) = match wall.kind {
            WallKind::Steel => (colors::STEEL, colors::STEEL_EDGE),
            WallKind::Brick { .. } => (colors::BRICK, colors::BRICK_EDGE),
        };
        let r = wall.rect();
        shapes::rect(out, &r, fill);
        shapes::rect_outline(out, &r, 1.0, edge);
    }

    for barrel in &s.barrels {
        shapes::circle(out, barrel.pos, barrel.radius, colors::BARREL, CIRCLE_SEGMENTS);
        shapes::rect(
            out,
            &Rect::new(barrel.pos - Vec2::new(0.0, 2.0), Vec2::new(3.0, 8.0)),
            colors::BARREL_MARK,
        );
        shapes::rect(
            out,
            &Rect::square(barrel.pos + Vec2::new(0.0, 5.0), 3.0),
            colors::BARREL_MARK,
        );
    }

    let enemy_paint = TankPaint {
        body: colors::ENEMY_BODY,
        turret: colors::ENEMY_TURRET,
        tracks: colors::ENEMY_TRACKS,
    };
    for enemy in &s.enemies {
        shapes::tank(out, enemy.pos, ENEMY_SIZE, enemy.facing, enemy_paint);
        hp_pips(out, enemy.pos, enemy.hp);
    }

    for turret in &s.turrets {
        shapes::circle(
            out,
            turret.pos,
            TURRET_SIZE / 2.0,
            colors::TURRET,
            CIRCLE_SEGMENTS,
        );
        shapes::ring(
            out,
            turret.pos,
            TURRET_SIZE / 2.0 - 3.0,
            TURRET_SIZE / 2.0,
            colors::TURRET_GUN,
            CIRCLE_SEGMENTS,
        );
        let muzzle = turret.pos + turret.facing.vector() * 25.0;
        shapes::segment(out, turret.pos, muzzle, 6.0, colors::TURRET_GUN);
        hp_pips(out, turret.pos, turret.hp);
    }

    for mine in &s.mines {
        shapes::circle(out, mine.pos, mine.radius, colors::MINE, CIRCLE_SEGMENTS);
        for i in 0..8 {
            let angle = i as f32 / 8.0 * std::f32::consts::TAU;
            let tip = mine.pos + Vec2::new(angle.cos(), angle.sin()) * (mine.radius + 5.0);
            shapes::segment(out, mine.pos, tip, 2.0, colors::MINE_SPIKE);
        }
    }

    shapes::tank(out, s.player.pos, PLAYER_SIZE, s.player.facing, PLAYER_PAINT);

    for b in &s.bullets {
        shapes::circle(out, b.pos, BULLET_RADIUS, colors::BULLET, 8);
    }
    for b in &s.enemy_bullets {
        shapes::circle(out, b.pos, BULLET_RADIUS, colors::ENEMY_BULLET, 8);
    }

    for fx in &s.explosions {
        explosion(out, fx);
    }
}

fn enemy_paint(kind: EnemyKind) -> TankPaint {
    let body = match kind {
        EnemyKind::Basic => colors::ENEMY_BODY,
        EnemyKind::Fast => colors::FAST_BODY,
        EnemyKind::Armored => colors::ARMORED_BODY,
    };
    TankPaint {
        body,
        turret: colors::ENEMY_TURRET,
        tracks: colors::ENEMY_TRACKS,
    }
}

fn battle_tank(out: &mut Vec<Vertex>, tank: &Tank, tile: f32) {
    let paint = match tank.kind {
        TankKind::Player => PLAYER_PAINT,
        TankKind::Enemy(kind) => enemy_paint(kind),
    };
    shapes::tank(out, tank.pos, tile - 8.0, tank.facing, paint);
    hp_pips(out, tank.pos, tank.hp);
}

fn battle(out: &mut Vec<Vertex>, b: &BattleSnapshot) {
    let tile = b.tile_size;
    shapes::rect(
        out,
        &Rect::new(b.playfield / 2.0, b.playfield),
        colors::BACKGROUND,
    );

    let tile_rect = |cell: Cell| Rect::square(cell.center(tile), tile);
    for (cell, kind) in b.grid.iter() {
        let r = tile_rect(cell);
        match kind {
            Tile::Brick => {
                shapes::rect(out, &r, colors::BRICK);
                shapes::rect_outline(out, &r, 1.0, colors::BRICK_EDGE);
                // Mortar line
                shapes::rect(
                    out,
                    &Rect::new(r.center, Vec2::new(tile, 2.0)),
                    colors::BRICK_EDGE,
                );
            }
            Tile::Steel => {
                shapes::rect(out, &r, colors::STEEL);
                shapes::rect_outline(out, &r, 3.0, colors::STEEL_EDGE);
            }
            Tile::Water => shapes::rect(out, &r, colors::WATER),
            Tile::Base => {
                let color = if b.base_destroyed {
                    colors::BASE_RUBBLE
                } else {
                    colors::BASE
                };
                let inner = Rect::square(r.center, tile - 4.0);
                shapes::rect(out, &inner, color);
                shapes::rect_outline(out, &inner, 2.0, colors::BASE_EDGE);
            }
            Tile::Empty | Tile::Tree => {}
        }
    }

    battle_tank(out, &b.player, tile);
    for enemy in &b.enemies {
        battle_tank(out, enemy, tile);
    }

    for bullet in &b.bullets {
        let color = match bullet.owner {
            Faction::Player => colors::BULLET,
            Faction::Hostile => colors::ENEMY_BULLET,
        };
        shapes::circle(out, bullet.pos, 3.0, color, 8);
    }

    // Trees cover tanks and bullets
    for (cell, kind) in b.grid.iter() {
        if kind == Tile::Tree {
            let r = tile_rect(cell);
            shapes::circle(out, r.center, tile * 0.45, colors::TREE, CIRCLE_SEGMENTS);
        }
    }

    for fx in &b.explosions {
        explosion(out, fx);
    }
}
