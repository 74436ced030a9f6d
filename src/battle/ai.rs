//! Enemy steering for the grid battle

use rand::Rng;

use crate::sim::Direction;
use crate::tuning::GridAiWeights;

/// Weighted roll biased toward the base at the bottom of the map
pub fn choose_direction<R: Rng>(rng: &mut R, weights: &GridAiWeights) -> Direction {
    let roll: f64 = rng.random();
    if roll < weights.down {
        Direction::Down
    } else if roll < weights.left {
        Direction::Left
    } else if roll < weights.right {
        Direction::Right
    } else {
        Direction::Up
    }
}

/// Uniform pick among the three directions other than `blocked`
pub fn reroute<R: Rng>(rng: &mut R, blocked: Direction) -> Direction {
    let others: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| d != blocked)
        .collect();
    others[rng.random_range(0..others.len())]
}
