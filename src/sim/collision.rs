//! Collision detection between the figure and obstacles
//!
//! Every box is shrunk inward by a tolerance before the strict overlap test, so
//! grazing contact is forgiven. Detection runs in two phases: the outer bounds
//! first, then each figure box against each obstacle-unit box.

use serde::{Deserialize, Serialize};

use super::geometry::CollisionBox;
use super::obstacle::Obstacle;
use super::trex::Trex;

/// The first overlapping pair found
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub obstacle_id: u32,
    /// Figure box (tolerance applied)
    pub figure_box: CollisionBox,
    /// Obstacle box (tolerance applied)
    pub obstacle_box: CollisionBox,
}

/// Tolerance-shrunk overlap test
#[inline]
pub fn boxes_collide(a: &CollisionBox, b: &CollisionBox, tolerance: f32) -> bool {
    a.shrink(tolerance).intersects(&b.shrink(tolerance))
}

/// Test the figure against the obstacles near it.
///
/// `obstacles` must be ordered by spawn time (nearest first). Obstacles already
/// behind the figure are skipped and the scan stops at the first one that
/// starts beyond the figure's right edge.
pub fn check_collision(trex: &Trex, obstacles: &[Obstacle], tolerance: f32) -> Option<Collision> {
    let figure_bounds = trex.bounds();

    for obstacle in obstacles {
        if obstacle.x >= figure_bounds.right() {
            break;
        }
        if obstacle.trailing_edge() <= figure_bounds.left() {
            continue;
        }
        if !boxes_collide(&figure_bounds, &obstacle.bounds(), tolerance) {
            continue;
        }

        for figure_box in trex.collision_boxes() {
            for obstacle_box in obstacle.collision_boxes() {
                if boxes_collide(&figure_box, &obstacle_box, tolerance) {
                    return Some(Collision {
                        obstacle_id: obstacle.id,
                        figure_box: figure_box.shrink(tolerance),
                        obstacle_box: obstacle_box.shrink(tolerance),
                    });
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dimensions, RunnerConfig};
    use crate::sim::obstacle::ObstacleKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn trex() -> Trex {
        let mut trex = Trex::new(&RunnerConfig::default(), &Dimensions::default());
        trex.reset();
        trex
    }

    fn cactus_at(x: f32) -> Obstacle {
        let mut rng = Pcg32::seed_from_u64(3);
        Obstacle::new(&mut rng, 9, ObstacleKind::CactusLarge, 1, x, 6.0, &RunnerConfig::default())
    }

    #[test]
    fn test_overlapping_cactus_collides() {
        let trex = trex();
        let hit = check_collision(&trex, &[cactus_at(trex.x + 10.0)], 1.0);
        assert_eq!(hit.map(|c| c.obstacle_id), Some(9));
    }

    #[test]
    fn test_distant_cactus_misses() {
        let trex = trex();
        assert!(check_collision(&trex, &[cactus_at(trex.x + 200.0)], 1.0).is_none());
        assert!(check_collision(&trex, &[cactus_at(-100.0)], 1.0).is_none());
    }

    #[test]
    fn test_high_jump_clears_cactus() {
        let mut trex = trex();
        trex.status = crate::sim::trex::TrexStatus::Jumping;
        trex.y = 20.0;
        assert!(check_collision(&trex, &[cactus_at(trex.x + 10.0)], 1.0).is_none());
    }

    #[test]
    fn test_ducking_passes_under_high_pterodactyl() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = RunnerConfig::default();
        let mut bird = Obstacle::new(&mut rng, 1, ObstacleKind::Pterodactyl, 1, 60.0, 10.0, &config);
        bird.y = 75.0;

        let mut trex = trex();
        assert!(check_collision(&trex, std::slice::from_ref(&bird), 1.0).is_some());
        trex.set_duck(true);
        assert!(check_collision(&trex, std::slice::from_ref(&bird), 1.0).is_none());
    }

    #[test]
    fn test_near_miss_forgiven() {
        let a = CollisionBox::new(0.0, 0.0, 10.0, 10.0);
        // Raw overlap of 1.5 units, which the 1-unit margin on each box absorbs
        let b = CollisionBox::new(8.5, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!boxes_collide(&a, &b, 1.0));
        assert!(boxes_collide(&a, &b, 0.0));
    }

    proptest! {
        #[test]
        fn prop_tolerance_boundary(
            x in -100i32..100,
            y in -100i32..100,
            w in 5i32..40,
            h in 5i32..40,
            half_units in 0u8..=4,
            overlap in 0.01f32..2.0,
        ) {
            // Half-unit values keep the edge arithmetic exact
            let (x, y, w, h) = (x as f32, y as f32, w as f32, h as f32);
            let tolerance = half_units as f32 / 2.0;
            let a = CollisionBox::new(x, y, w, h);
            // b's left edge touches a's shrunk right edge exactly: shrunk boxes meet, no overlap
            let touching = CollisionBox::new(x + w - 2.0 * tolerance, y, w, h);
            prop_assert!(!boxes_collide(&a, &touching, tolerance));

            // Push it left by a positive amount: shrunk boxes overlap
            let overlapping = CollisionBox::new(x + w - 2.0 * tolerance - overlap, y, w, h);
            prop_assert!(boxes_collide(&a, &overlapping, tolerance));
        }
    }
}
