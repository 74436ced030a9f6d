//! Enemy steering for the survival game

use rand::Rng;

use crate::sim::Direction;
use crate::tuning::SurvivalAiWeights;

/// Weighted direction roll: drift down, chase the player's column, or wander
pub fn choose_direction<R: Rng>(
    rng: &mut R,
    weights: &SurvivalAiWeights,
    from_x: f32,
    player_x: f32,
) -> Direction {
    let roll: f64 = rng.random();
    if roll < weights.down {
        Direction::Down
    } else if roll < weights.chase {
        Direction::horizontal_towards(from_x, player_x)
    } else {
        Direction::from_index(rng.random_range(0..Direction::ALL.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_distribution_follows_weights() {
        let mut rng = Pcg32::seed_from_u64(11);
        let weights = SurvivalAiWeights::default();
        let mut down = 0;
        let mut chase = 0;
        for _ in 0..2000 {
            match choose_direction(&mut rng, &weights, 300.0, 100.0) {
                Direction::Down => down += 1,
                Direction::Left => chase += 1,
                _ => {}
            }
        }
        // 40% down (+5% from the random tail), 40% toward the player (+5%)
        assert!((800..1000).contains(&down), "down = {down}");
        assert!((800..1000).contains(&chase), "chase = {chase}");
    }

    #[test]
    fn test_degenerate_weights() {
        let mut rng = Pcg32::seed_from_u64(3);
        let always_down = SurvivalAiWeights {
            down: 1.0,
            chase: 1.0,
        };
        for _ in 0..50 {
            assert_eq!(
                choose_direction(&mut rng, &always_down, 0.0, 100.0),
                Direction::Down
            );
        }
        let always_chase = SurvivalAiWeights {
            down: 0.0,
            chase: 1.0,
        };
        for _ in 0..50 {
            assert_eq!(
                choose_direction(&mut rng, &always_chase, 0.0, 100.0),
                Direction::Right
            );
        }
    }
}
