//! Auto-jump advisor
//!
//! A pure decision: jump when the nearest obstacle's leading edge is within
//! `threshold` units ahead of the figure and the figure is free to jump. The
//! threshold is a fixed distance; it does not scale with scroll speed.

use super::obstacle::Obstacle;
use super::trex::Trex;

pub fn should_jump(nearest: Option<&Obstacle>, trex: &Trex, threshold: f32) -> bool {
    let Some(obstacle) = nearest else {
        return false;
    };
    let distance = obstacle.x - trex.x;
    distance > 0.0 && distance < threshold && !trex.is_jumping() && !trex.is_ducking()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dimensions, RunnerConfig};
    use crate::sim::obstacle::ObstacleKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(distance: f32) -> (Trex, Obstacle) {
        let config = RunnerConfig::default();
        let mut trex = Trex::new(&config, &Dimensions::default());
        trex.reset();
        let mut rng = Pcg32::seed_from_u64(5);
        let obstacle = Obstacle::new(
            &mut rng,
            0,
            ObstacleKind::CactusSmall,
            1,
            trex.x + distance,
            6.0,
            &config,
        );
        (trex, obstacle)
    }

    #[test]
    fn test_jumps_within_threshold() {
        let (trex, obstacle) = setup(80.0);
        assert!(should_jump(Some(&obstacle), &trex, 120.0));
    }

    #[test]
    fn test_waits_when_far() {
        let (trex, obstacle) = setup(150.0);
        assert!(!should_jump(Some(&obstacle), &trex, 120.0));
    }

    #[test]
    fn test_not_while_jumping_or_ducking() {
        let (mut trex, obstacle) = setup(80.0);
        trex.start_jump(6.0);
        assert!(!should_jump(Some(&obstacle), &trex, 120.0));

        let (mut trex, obstacle) = setup(80.0);
        trex.set_duck(true);
        assert!(!should_jump(Some(&obstacle), &trex, 120.0));
    }

    #[test]
    fn test_ignores_passed_or_missing_obstacle() {
        let (trex, obstacle) = setup(-10.0);
        assert!(!should_jump(Some(&obstacle), &trex, 120.0));
        assert!(!should_jump(None, &trex, 120.0));
    }
}
