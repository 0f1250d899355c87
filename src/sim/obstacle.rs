//! Obstacle catalog, obstacle clusters and the obstacle generator

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::CollisionBox;
use crate::config::RunnerConfig;
use crate::frames_elapsed;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    CactusSmall,
    CactusLarge,
    Pterodactyl,
}

/// Static description of an obstacle type
#[derive(Debug)]
pub struct ObstacleSpec {
    /// Width of a single unit
    pub width: f32,
    pub height: f32,
    /// Candidate y positions (one is picked per spawn)
    pub y_positions: &'static [f32],
    /// Clusters of more than one unit only appear above this speed
    pub multiple_speed: f32,
    /// Base spacing before the next obstacle, scaled by the gap coefficient
    pub min_gap: f32,
    /// Never spawned below this speed
    pub min_speed: f32,
    /// Hitboxes of a single unit, relative to its top-left corner
    pub collision_boxes: &'static [CollisionBox],
    pub num_frames: u8,
    /// Ms per animation frame (0 for static sprites)
    pub frame_rate: f32,
    /// Magnitude of the random speed offset applied to each spawn
    pub speed_offset: f32,
}

const CACTUS_SMALL: ObstacleSpec = ObstacleSpec {
    width: 17.0,
    height: 35.0,
    y_positions: &[105.0],
    multiple_speed: 4.0,
    min_gap: 120.0,
    min_speed: 0.0,
    collision_boxes: &[
        CollisionBox::new(0.0, 7.0, 5.0, 27.0),
        CollisionBox::new(4.0, 0.0, 6.0, 34.0),
        CollisionBox::new(10.0, 4.0, 7.0, 14.0),
    ],
    num_frames: 1,
    frame_rate: 0.0,
    speed_offset: 0.0,
};

const CACTUS_LARGE: ObstacleSpec = ObstacleSpec {
    width: 25.0,
    height: 50.0,
    y_positions: &[90.0],
    multiple_speed: 7.0,
    min_gap: 120.0,
    min_speed: 0.0,
    collision_boxes: &[
        CollisionBox::new(0.0, 12.0, 7.0, 38.0),
        CollisionBox::new(8.0, 0.0, 7.0, 49.0),
        CollisionBox::new(13.0, 10.0, 10.0, 38.0),
    ],
    num_frames: 1,
    frame_rate: 0.0,
    speed_offset: 0.0,
};

const PTERODACTYL: ObstacleSpec = ObstacleSpec {
    width: 46.0,
    height: 40.0,
    y_positions: &[100.0, 75.0, 50.0],
    multiple_speed: 999.0,
    min_gap: 150.0,
    min_speed: 8.5,
    collision_boxes: &[
        CollisionBox::new(15.0, 15.0, 16.0, 5.0),
        CollisionBox::new(18.0, 21.0, 24.0, 6.0),
        CollisionBox::new(2.0, 14.0, 4.0, 3.0),
        CollisionBox::new(6.0, 10.0, 4.0, 7.0),
        CollisionBox::new(10.0, 8.0, 6.0, 9.0),
    ],
    num_frames: 2,
    frame_rate: 1000.0 / 6.0,
    speed_offset: 0.8,
};

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::CactusSmall,
        ObstacleKind::CactusLarge,
        ObstacleKind::Pterodactyl,
    ];

    pub fn spec(&self) -> &'static ObstacleSpec {
        match self {
            ObstacleKind::CactusSmall => &CACTUS_SMALL,
            ObstacleKind::CactusLarge => &CACTUS_LARGE,
            ObstacleKind::Pterodactyl => &PTERODACTYL,
        }
    }
}

/// Random spacing after an obstacle of `width` at `speed`.
///
/// The floor grows with speed so reaction distance never shrinks as the run speeds up.
pub fn gap<R: Rng>(
    rng: &mut R,
    width: f32,
    speed: f32,
    kind_min_gap: f32,
    gap_coefficient: f32,
    max_gap_coefficient: f32,
) -> f32 {
    let min_gap = (width * speed + kind_min_gap * gap_coefficient).round();
    let max_gap = (min_gap * max_gap_coefficient).round();
    if max_gap <= min_gap {
        return min_gap;
    }
    rng.random_range(min_gap..=max_gap)
}

/// One hazard: a cluster of `size` identical units scrolled together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Leading (left) edge
    pub x: f32,
    pub y: f32,
    /// Units in the cluster
    pub size: u32,
    pub width: f32,
    /// Required clear space after the trailing edge before the next spawn
    pub gap: f32,
    pub speed_offset: f32,
    pub following_created: bool,
    pub remove: bool,
    pub anim_frame: u8,
    anim_timer: f32,
}

impl Obstacle {
    /// Build a cluster of `size` units with its leading edge at `x`.
    ///
    /// Kinds that do not allow multiplicity at this speed collapse to one unit;
    /// otherwise `size` is capped at `max_obstacle_duplication`.
    pub fn new<R: Rng>(
        rng: &mut R,
        id: u32,
        kind: ObstacleKind,
        size: u32,
        x: f32,
        speed: f32,
        config: &RunnerConfig,
    ) -> Self {
        let spec = kind.spec();
        let size = if size > 1 && spec.multiple_speed > speed {
            1
        } else {
            size.clamp(1, config.max_obstacle_duplication.max(1) as u32)
        };
        let width = spec.width * size as f32;
        let y = spec.y_positions[rng.random_range(0..spec.y_positions.len())];
        let speed_offset = if spec.speed_offset > 0.0 {
            if rng.random_bool(0.5) {
                spec.speed_offset
            } else {
                -spec.speed_offset
            }
        } else {
            0.0
        };
        let gap = gap(
            rng,
            width,
            speed,
            spec.min_gap,
            config.gap_coefficient,
            config.max_gap_coefficient,
        );

        Self {
            id,
            kind,
            x,
            y,
            size,
            width,
            gap,
            speed_offset,
            following_created: false,
            remove: false,
            anim_frame: 0,
            anim_timer: 0.0,
        }
    }

    #[inline]
    pub fn spec(&self) -> &'static ObstacleSpec {
        self.kind.spec()
    }

    /// Right edge
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.trailing_edge() > 0.0
    }

    /// Scroll left; flags the obstacle for removal once fully off-screen
    pub fn update(&mut self, elapsed_ms: f32, speed: f32) {
        if self.remove {
            return;
        }
        self.x -= (speed + self.speed_offset) * frames_elapsed(elapsed_ms);

        let spec = self.spec();
        if spec.num_frames > 1 {
            self.anim_timer += elapsed_ms;
            if self.anim_timer >= spec.frame_rate {
                self.anim_frame = (self.anim_frame + 1) % spec.num_frames;
                self.anim_timer = 0.0;
            }
        }

        if !self.is_visible() {
            self.remove = true;
        }
    }

    pub fn bounds(&self) -> CollisionBox {
        CollisionBox::new(self.x, self.y, self.width, self.spec().height)
    }

    /// Per-unit hitboxes in world space
    pub fn collision_boxes(&self) -> impl Iterator<Item = CollisionBox> + '_ {
        let spec = self.spec();
        (0..self.size).flat_map(move |unit| {
            let origin = Vec2::new(self.x + spec.width * unit as f32, self.y);
            spec.collision_boxes.iter().map(move |b| b.translate(origin))
        })
    }
}

/// Decides when and what to spawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleGenerator {
    /// Most recent kinds, newest first
    history: Vec<ObstacleKind>,
    /// Units in the most recently spawned cluster
    last_size: u32,
    next_id: u32,
}

impl ObstacleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_size = 0;
    }

    /// True when another `kind` would exceed the repetition cap: either the last
    /// cluster of that kind was already full-size, or the history is all `kind`.
    pub fn is_duplicate(&self, kind: ObstacleKind, max_duplication: usize) -> bool {
        let repeats = self.history.iter().take_while(|k| **k == kind).count();
        let full_cluster = repeats > 0 && self.last_size as usize >= max_duplication;
        full_cluster || repeats >= max_duplication
    }

    /// Spawn the next obstacle if the last one has opened up enough room.
    ///
    /// Returns the index of the new obstacle, if any.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        obstacles: &mut Vec<Obstacle>,
        speed: f32,
        visible_width: f32,
        config: &RunnerConfig,
    ) -> Option<usize> {
        match obstacles.last_mut() {
            None => {}
            Some(last) => {
                let has_room = !last.following_created
                    && last.is_visible()
                    && last.trailing_edge() + last.gap < visible_width;
                if !has_room {
                    return None;
                }
                last.following_created = true;
            }
        }

        let kind = self.choose_kind(rng, speed, config.max_obstacle_duplication);
        let max_size = config.max_obstacle_duplication.max(1) as u32;
        let size = rng.random_range(1..=max_size);
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let obstacle = Obstacle::new(rng, id, kind, size, visible_width, speed, config);
        log::debug!(
            "Spawned {:?} x{} at {:.0} (gap {:.0})",
            obstacle.kind,
            obstacle.size,
            obstacle.x,
            obstacle.gap
        );
        self.last_size = obstacle.size;
        obstacles.push(obstacle);

        self.history.insert(0, kind);
        self.history.truncate(config.max_obstacle_duplication.max(1));
        Some(obstacles.len() - 1)
    }

    /// Uniform pick among kinds allowed at this speed and not over-repeated.
    ///
    /// Falls back to ignoring the repetition rule, then the speed rule, so a pick
    /// is always made.
    pub fn choose_kind<R: Rng>(&self, rng: &mut R, speed: f32, max_duplication: usize) -> ObstacleKind {
        let by_speed: Vec<ObstacleKind> = ObstacleKind::ALL
            .into_iter()
            .filter(|k| speed >= k.spec().min_speed)
            .collect();
        let preferred: Vec<ObstacleKind> = by_speed
            .iter()
            .copied()
            .filter(|k| !self.is_duplicate(*k, max_duplication))
            .collect();

        let pool: &[ObstacleKind] = if !preferred.is_empty() {
            &preferred
        } else if !by_speed.is_empty() {
            &by_speed
        } else {
            &ObstacleKind::ALL
        };
        pool[rng.random_range(0..pool.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_cluster_width_and_boxes() {
        let mut rng = rng();
        let config = RunnerConfig::default();
        let cluster = Obstacle::new(&mut rng, 0, ObstacleKind::CactusSmall, 2, 600.0, 6.0, &config);
        assert_eq!(cluster.size, 2);
        assert_eq!(cluster.width, 17.0 * 2.0);
        assert_eq!(cluster.collision_boxes().count(), 2 * CACTUS_SMALL.collision_boxes.len());
        // Every unit box sits inside the cluster bounds
        let bounds = cluster.bounds();
        for b in cluster.collision_boxes() {
            assert!(b.left() >= bounds.left() && b.right() <= bounds.right());
        }
    }

    #[test]
    fn test_multiplicity_needs_speed() {
        let mut rng = rng();
        let config = RunnerConfig::default();
        // Large cacti only cluster above speed 7
        let slow = Obstacle::new(&mut rng, 0, ObstacleKind::CactusLarge, 3, 600.0, 6.0, &config);
        assert_eq!(slow.size, 1);
        let fast = Obstacle::new(&mut rng, 1, ObstacleKind::CactusLarge, 2, 600.0, 8.0, &config);
        assert_eq!(fast.size, 2);
        // Never wider than the duplication cap
        let capped = Obstacle::new(&mut rng, 3, ObstacleKind::CactusSmall, 5, 600.0, 8.0, &config);
        assert_eq!(capped.size, config.max_obstacle_duplication as u32);
        // Pterodactyls never cluster
        let bird = Obstacle::new(&mut rng, 2, ObstacleKind::Pterodactyl, 3, 600.0, 12.0, &config);
        assert_eq!(bird.size, 1);
        assert!(PTERODACTYL.y_positions.contains(&bird.y));
        assert_eq!(bird.speed_offset.abs(), 0.8);
    }

    #[test]
    fn test_gap_grows_with_speed() {
        let mut rng = rng();
        for _ in 0..50 {
            let slow = gap(&mut rng, 17.0, 6.0, 120.0, 0.6, 1.5);
            let fast = gap(&mut rng, 17.0, 13.0, 120.0, 0.6, 1.5);
            // min gaps: 17*6+72 = 174, 17*13+72 = 293
            assert!((174.0..=261.0).contains(&slow));
            assert!((293.0..=440.0).contains(&fast));
        }
    }

    #[test]
    fn test_obstacle_retires_off_screen() {
        let mut rng = rng();
        let config = RunnerConfig::default();
        let mut obstacle = Obstacle::new(&mut rng, 0, ObstacleKind::CactusSmall, 1, 100.0, 6.0, &config);
        let frames_needed = obstacle.trailing_edge() / 6.0;
        obstacle.update(crate::consts::MS_PER_FRAME * (frames_needed + 1.0), 6.0);
        assert!(obstacle.remove);
    }

    #[test]
    fn test_spawn_waits_for_room() {
        let mut rng = rng();
        let config = RunnerConfig::default();
        let mut generator = ObstacleGenerator::new();
        let mut obstacles = Vec::new();

        assert_eq!(generator.maybe_spawn(&mut rng, &mut obstacles, 6.0, 600.0, &config), Some(0));
        assert_eq!(obstacles[0].x, 600.0);
        // Last obstacle has not cleared its gap yet
        assert_eq!(generator.maybe_spawn(&mut rng, &mut obstacles, 6.0, 600.0, &config), None);

        obstacles[0].x = 600.0 - obstacles[0].width - obstacles[0].gap - 1.0;
        assert_eq!(generator.maybe_spawn(&mut rng, &mut obstacles, 6.0, 600.0, &config), Some(1));
        assert!(obstacles[0].following_created);
        // Nothing spawns behind an obstacle that has already left the surface
        obstacles[1].x = -1000.0;
        assert_eq!(generator.maybe_spawn(&mut rng, &mut obstacles, 6.0, 600.0, &config), None);
        assert!(obstacles[1].id > obstacles[0].id);
    }

    #[test]
    fn test_no_pterodactyl_when_slow() {
        let mut rng = rng();
        let generator = ObstacleGenerator::new();
        for _ in 0..200 {
            assert_ne!(generator.choose_kind(&mut rng, 6.0, 2), ObstacleKind::Pterodactyl);
        }
    }

    #[test]
    fn test_repetition_cap() {
        let mut rng = rng();
        let config = RunnerConfig::default();
        let mut generator = ObstacleGenerator::new();
        let mut obstacles: Vec<Obstacle> = Vec::new();

        let mut kinds = Vec::new();
        for _ in 0..300 {
            obstacles.clear();
            generator.maybe_spawn(&mut rng, &mut obstacles, 10.0, 600.0, &config);
            kinds.push(obstacles[0].kind);
        }
        let longest_run = kinds
            .chunk_by(|a, b| a == b)
            .map(|run| run.len())
            .max()
            .unwrap();
        assert!(longest_run <= config.max_obstacle_duplication);
    }

    /// Spawn `count` clusters back to back, each into an empty world
    fn spawn_sequence(count: usize, speed: f32) -> Vec<Obstacle> {
        let mut rng = rng();
        let config = RunnerConfig::default();
        let mut generator = ObstacleGenerator::new();
        let mut spawned = Vec::new();
        for _ in 0..count {
            let mut obstacles = Vec::new();
            generator.maybe_spawn(&mut rng, &mut obstacles, speed, 600.0, &config);
            spawned.extend(obstacles);
        }
        spawned
    }

    #[test]
    fn test_cluster_size_capped_by_duplication() {
        let config = RunnerConfig::default();
        let spawned = spawn_sequence(500, 10.0);
        assert!(spawned.iter().all(|o| (1..=config.max_obstacle_duplication as u32).contains(&o.size)));
        // Both cluster sizes show up for kinds that allow multiplicity
        assert!(spawned.iter().any(|o| o.size == 2));
        assert!(spawned.iter().any(|o| o.size == 1 && o.kind != ObstacleKind::Pterodactyl));
    }

    #[test]
    fn test_full_cluster_not_followed_by_same_kind() {
        let config = RunnerConfig::default();
        let spawned = spawn_sequence(500, 10.0);
        let full_repeats = spawned
            .windows(2)
            .filter(|w| w[0].size as usize >= config.max_obstacle_duplication && w[1].kind == w[0].kind)
            .count();
        assert_eq!(full_repeats, 0);
    }

    #[test]
    fn test_full_cluster_excludes_kind() {
        let mut rng = rng();
        let mut generator = ObstacleGenerator::new();
        generator.history = vec![ObstacleKind::CactusLarge];
        generator.last_size = 1;
        assert!(!generator.is_duplicate(ObstacleKind::CactusLarge, 2));

        generator.last_size = 2;
        assert!(generator.is_duplicate(ObstacleKind::CactusLarge, 2));
        assert!(!generator.is_duplicate(ObstacleKind::CactusSmall, 2));
        for _ in 0..50 {
            assert_eq!(generator.choose_kind(&mut rng, 6.0, 2), ObstacleKind::CactusSmall);
        }
    }

    #[test]
    fn test_choose_kind_falls_back_when_exhausted() {
        let mut rng = rng();
        let mut generator = ObstacleGenerator::new();
        generator.history = vec![ObstacleKind::CactusSmall, ObstacleKind::CactusSmall];
        // Small cactus is capped and pterodactyls are too fast for speed 6
        for _ in 0..50 {
            assert_eq!(generator.choose_kind(&mut rng, 6.0, 2), ObstacleKind::CactusLarge);
        }
        // With a cap of zero every kind is a duplicate; still picks something legal
        generator.history.clear();
        for _ in 0..50 {
            assert_ne!(generator.choose_kind(&mut rng, 6.0, 0), ObstacleKind::Pterodactyl);
        }
    }
}
