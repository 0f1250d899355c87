//! Scrolling world: ground line, background clouds and the obstacle collection
//!
//! Everything here moves left by `speed` units per canonical frame (clouds at a
//! parallax fraction of it) and is retired once it has fully left the surface.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleGenerator};
use crate::config::{Dimensions, RunnerConfig};
use crate::frames_elapsed;

pub const CLOUD_WIDTH: f32 = 46.0;
pub const CLOUD_HEIGHT: f32 = 14.0;
pub const MIN_CLOUD_GAP: f32 = 100.0;
pub const MAX_CLOUD_GAP: f32 = 400.0;
/// Highest cloud (smallest y)
pub const MAX_SKY_LEVEL: f32 = 30.0;
/// Lowest cloud (largest y)
pub const MIN_SKY_LEVEL: f32 = 71.0;

pub const GROUND_Y: f32 = 127.0;
pub const GROUND_HEIGHT: f32 = 12.0;
/// Chance that a recycled ground segment uses the bumpy variant
pub const BUMPY_THRESHOLD: f32 = 0.3;

/// Background decoration; no collision semantics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    /// Space required after this cloud before the next one may appear
    pub gap: f32,
    pub remove: bool,
}

impl Cloud {
    pub fn new<R: Rng>(rng: &mut R, x: f32) -> Self {
        Self {
            x,
            y: rng.random_range(MAX_SKY_LEVEL..=MIN_SKY_LEVEL).round(),
            gap: rng.random_range(MIN_CLOUD_GAP..=MAX_CLOUD_GAP).round(),
            remove: false,
        }
    }

    pub fn update(&mut self, dx: f32) {
        if self.remove {
            return;
        }
        self.x -= dx;
        if self.x + CLOUD_WIDTH <= 0.0 {
            self.remove = true;
        }
    }
}

/// Two ground segments laid end to end that leapfrog each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonLine {
    pub x: [f32; 2],
    pub bumpy: [bool; 2],
    width: f32,
}

impl HorizonLine {
    pub fn new(width: f32) -> Self {
        Self {
            x: [0.0, width],
            bumpy: [false, false],
            width,
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R, dx: f32) {
        let lead = if self.x[0] <= 0.0 { 0 } else { 1 };
        let follow = 1 - lead;

        self.x[lead] -= dx;
        self.x[follow] = self.x[lead] + self.width;

        if self.x[lead] <= -self.width {
            self.x[lead] += self.width * 2.0;
            self.x[follow] = self.x[lead] - self.width;
            self.bumpy[lead] = rng.random::<f32>() < BUMPY_THRESHOLD;
        }
    }

    #[inline]
    pub fn segment_width(&self) -> f32 {
        self.width
    }

    pub fn reset(&mut self) {
        self.x = [0.0, self.width];
    }
}

/// The scrolling world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Horizon {
    pub dimensions: Dimensions,
    /// Active obstacles ordered by spawn time; index 0 is nearest the figure
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    pub ground: HorizonLine,
    generator: ObstacleGenerator,
}

impl Horizon {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            obstacles: Vec::new(),
            clouds: Vec::new(),
            ground: HorizonLine::new(dimensions.width),
            generator: ObstacleGenerator::new(),
        }
    }

    pub fn nearest_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.first()
    }

    /// Scroll every entity and spawn new ones.
    ///
    /// Obstacles only spawn when `obstacles_enabled` (after the warm-up window).
    /// Returns the id of a newly spawned obstacle, if any.
    pub fn advance<R: Rng>(
        &mut self,
        rng: &mut R,
        elapsed_ms: f32,
        speed: f32,
        obstacles_enabled: bool,
        config: &RunnerConfig,
    ) -> Option<u32> {
        let frames = frames_elapsed(elapsed_ms);
        self.ground.update(rng, speed * frames);
        self.update_clouds(rng, config.bg_cloud_speed * speed * frames, config);
        self.update_obstacles(rng, elapsed_ms, speed, obstacles_enabled, config)
    }

    fn update_clouds<R: Rng>(&mut self, rng: &mut R, dx: f32, config: &RunnerConfig) {
        let width = self.dimensions.width;
        if self.clouds.is_empty() {
            self.clouds.push(Cloud::new(rng, width));
            return;
        }

        for cloud in &mut self.clouds {
            cloud.update(dx);
        }
        let room = self
            .clouds
            .last()
            .is_some_and(|last| width - last.x > last.gap);
        if self.clouds.len() < config.max_clouds
            && room
            && config.cloud_frequency > rng.random::<f32>()
        {
            self.clouds.push(Cloud::new(rng, width));
        }
        self.clouds.retain(|c| !c.remove);
    }

    fn update_obstacles<R: Rng>(
        &mut self,
        rng: &mut R,
        elapsed_ms: f32,
        speed: f32,
        obstacles_enabled: bool,
        config: &RunnerConfig,
    ) -> Option<u32> {
        for obstacle in &mut self.obstacles {
            obstacle.update(elapsed_ms, speed);
        }
        self.obstacles.retain(|o| !o.remove);

        if !obstacles_enabled {
            return None;
        }
        self.generator
            .maybe_spawn(rng, &mut self.obstacles, speed, self.dimensions.width, config)
            .map(|index| self.obstacles[index].id)
    }

    /// Empty every collection; dimensions stay
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.clouds.clear();
        self.ground.reset();
        self.generator.reset();
    }
}
