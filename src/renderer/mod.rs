//! Rendering seam
//!
//! The simulation never touches pixels. `draw_frame` walks a runner's world and
//! hands the backend one sprite per entity together with its destination box.

pub mod sprites;

pub use sprites::Sprite;

use crate::platform::Clock;
use crate::sim::horizon::{CLOUD_HEIGHT, CLOUD_WIDTH, GROUND_HEIGHT, GROUND_Y};
use crate::sim::{CollisionBox, RunPhase, Runner};

pub const RESTART_WIDTH: f32 = 36.0;
pub const RESTART_HEIGHT: f32 = 32.0;

/// Drawing backend
pub trait Renderer {
    /// Start a frame. `inverted` swaps the palette for night mode.
    fn begin(&mut self, inverted: bool);
    /// Blit `sprite` (animation frame `frame`) into `dest`
    fn draw(&mut self, sprite: Sprite, frame: u8, dest: CollisionBox);
    fn score(&mut self, score: u32, high_score: u32);
}

/// Draw back to front: clouds, ground, obstacles, figure, overlays
pub fn draw_frame<C: Clock, R: Renderer>(runner: &Runner<C>, renderer: &mut R) {
    renderer.begin(runner.is_inverted());

    let horizon = runner.horizon();
    for cloud in &horizon.clouds {
        renderer.draw(
            Sprite::Cloud,
            0,
            CollisionBox::new(cloud.x, cloud.y, CLOUD_WIDTH, CLOUD_HEIGHT),
        );
    }

    let ground = &horizon.ground;
    for (x, bumpy) in ground.x.iter().zip(ground.bumpy) {
        renderer.draw(
            Sprite::Ground { bumpy },
            0,
            CollisionBox::new(*x, GROUND_Y, ground.segment_width(), GROUND_HEIGHT),
        );
    }

    for obstacle in &horizon.obstacles {
        renderer.draw(
            Sprite::for_obstacle(obstacle.kind, obstacle.size),
            obstacle.anim_frame,
            obstacle.bounds(),
        );
    }

    let trex = runner.trex();
    renderer.draw(Sprite::for_trex(trex.status), trex.anim_frame, trex.bounds());

    match runner.phase() {
        RunPhase::Waiting => {}
        RunPhase::Crashed => {
            let dims = runner.dimensions();
            renderer.draw(
                Sprite::Restart,
                0,
                CollisionBox::new(
                    (dims.width - RESTART_WIDTH) / 2.0,
                    (dims.height - RESTART_HEIGHT) / 2.0,
                    RESTART_WIDTH,
                    RESTART_HEIGHT,
                ),
            );
            renderer.score(runner.score(), runner.high_score());
        }
        RunPhase::Intro | RunPhase::Running | RunPhase::Paused => {
            renderer.score(runner.score(), runner.high_score());
        }
    }
}
