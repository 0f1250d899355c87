//! The controlled figure and its physics
//!
//! Vertical motion is integrated in canonical frames (`elapsed_ms / MS_PER_FRAME`)
//! so a jump traces the same arc at any frame interval.

use serde::{Deserialize, Serialize};

use super::geometry::CollisionBox;
use crate::config::{Dimensions, RunnerConfig};
use crate::frames_elapsed;

/// Figure status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrexStatus {
    /// Idle before the first jump
    Waiting,
    /// Grounded and running
    Running,
    /// Airborne
    Jumping,
    /// Grounded with the flat, wide profile
    Ducking,
    /// Hit an obstacle
    Crashed,
}

impl TrexStatus {
    /// (frame count, ms per animation frame) of the sprite cycle for this status
    pub fn animation(&self) -> (u8, f32) {
        match self {
            TrexStatus::Waiting => (2, 1000.0 / 3.0),
            TrexStatus::Running => (2, 1000.0 / 12.0),
            TrexStatus::Ducking => (2, 1000.0 / 8.0),
            TrexStatus::Jumping => (1, 1000.0 / 60.0),
            TrexStatus::Crashed => (1, 1000.0 / 60.0),
        }
    }
}

/// Running profile, relative to the figure's top-left corner
pub const RUNNING_BOXES: [CollisionBox; 6] = [
    CollisionBox::new(22.0, 0.0, 17.0, 16.0),
    CollisionBox::new(1.0, 18.0, 30.0, 9.0),
    CollisionBox::new(10.0, 35.0, 14.0, 8.0),
    CollisionBox::new(1.0, 24.0, 29.0, 5.0),
    CollisionBox::new(5.0, 30.0, 21.0, 4.0),
    CollisionBox::new(9.0, 34.0, 15.0, 4.0),
];

/// Ducking profile, relative to the top-left of the ducking bounds
pub const DUCKING_BOXES: [CollisionBox; 1] = [CollisionBox::new(1.0, 0.0, 55.0, 25.0)];

/// Figure tuning, copied from the runner config and kept in sync by `Runner::reconfigure`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrexConfig {
    pub gravity: f32,
    /// Rise (from the ground) after which a jump may be cut short
    pub min_jump_height: f32,
    /// Absolute y above which the jump is forced to end
    pub max_jump_height: f32,
    pub speed_drop_coefficient: f32,
    /// Upward launch speed (positive magnitude)
    pub initial_jump_velocity: f32,
    /// Upward speed cap once a jump has ended (negative, i.e. upward)
    pub drop_velocity: f32,
    pub width: f32,
    pub height: f32,
    pub width_duck: f32,
    pub height_duck: f32,
    pub start_x: f32,
}

impl TrexConfig {
    pub fn from_runner(config: &RunnerConfig) -> Self {
        Self {
            gravity: config.gravity,
            min_jump_height: config.min_jump_height,
            max_jump_height: 30.0,
            speed_drop_coefficient: config.speed_drop_coefficient,
            initial_jump_velocity: config.initial_jump_velocity,
            drop_velocity: -config.initial_jump_velocity / 2.0,
            width: 44.0,
            height: 47.0,
            width_duck: 59.0,
            height_duck: 25.0,
            start_x: 50.0,
        }
    }
}

/// The player-controlled figure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trex {
    pub config: TrexConfig,
    pub x: f32,
    /// Top of the standing sprite
    pub y: f32,
    pub ground_y: f32,
    /// Vertical velocity per canonical frame (negative is upward)
    pub velocity: f32,
    pub status: TrexStatus,
    /// Fast-fall active for the rest of this jump
    pub speed_drop: bool,
    pub reached_min_height: bool,
    /// Jumps started since the figure was last on the ground; cleared on landing
    pub jump_count: u32,
    /// Duck intent is held; re-applied on landing
    pub duck_held: bool,
    pub anim_frame: u8,
    anim_timer: f32,
}

impl Trex {
    pub fn new(config: &RunnerConfig, dimensions: &Dimensions) -> Self {
        let trex_config = TrexConfig::from_runner(config);
        let ground_y = dimensions.height - trex_config.height - config.bottom_pad;
        Self {
            x: trex_config.start_x,
            y: ground_y,
            ground_y,
            velocity: 0.0,
            status: TrexStatus::Waiting,
            speed_drop: false,
            reached_min_height: false,
            jump_count: 0,
            duck_held: false,
            anim_frame: 0,
            anim_timer: 0.0,
            config: trex_config,
        }
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.status == TrexStatus::Jumping
    }

    #[inline]
    pub fn is_ducking(&self) -> bool {
        self.status == TrexStatus::Ducking
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        !self.is_jumping()
    }

    /// Absolute y the figure must rise above before a jump can be cut short
    #[inline]
    pub fn min_jump_y(&self) -> f32 {
        self.ground_y - self.config.min_jump_height
    }

    /// Re-arm jump parameters after the launch speed changes
    pub fn set_jump_velocity(&mut self, velocity: f32) {
        self.config.initial_jump_velocity = velocity;
        self.config.drop_velocity = -velocity / 2.0;
    }

    /// Launch a jump. Faster scroll launches slightly harder.
    ///
    /// Returns false (and changes nothing) when already airborne, ducking or crashed.
    pub fn start_jump(&mut self, speed: f32) -> bool {
        match self.status {
            TrexStatus::Jumping | TrexStatus::Ducking | TrexStatus::Crashed => false,
            TrexStatus::Waiting | TrexStatus::Running => {
                self.set_status(TrexStatus::Jumping);
                self.velocity = -self.config.initial_jump_velocity - speed / 10.0;
                self.reached_min_height = false;
                self.speed_drop = false;
                self.jump_count += 1;
                true
            }
        }
    }

    /// Cut the ascent short once the minimum height has been reached
    pub fn end_jump(&mut self) {
        if self.reached_min_height && self.velocity < self.config.drop_velocity {
            self.velocity = self.config.drop_velocity;
        }
    }

    /// Fast-fall for the rest of the current jump
    pub fn set_speed_drop(&mut self) -> bool {
        if !self.is_jumping() {
            return false;
        }
        self.speed_drop = true;
        self.velocity = 1.0;
        true
    }

    /// Duck or stand up. Ducking is only accepted while running on the ground.
    pub fn set_duck(&mut self, ducking: bool) -> bool {
        match (ducking, self.status) {
            (true, TrexStatus::Running) => {
                self.set_status(TrexStatus::Ducking);
                true
            }
            (false, TrexStatus::Ducking) => {
                self.set_status(TrexStatus::Running);
                true
            }
            _ => false,
        }
    }

    /// Integrate one tick of jump motion.
    ///
    /// Returns true on the tick the figure lands.
    pub fn update_jump(&mut self, elapsed_ms: f32) -> bool {
        if !self.is_jumping() {
            return false;
        }

        let frames = frames_elapsed(elapsed_ms);
        self.velocity += self.config.gravity * frames;
        let coefficient = if self.speed_drop {
            self.config.speed_drop_coefficient
        } else {
            1.0
        };
        self.y += self.velocity * coefficient * frames;

        if self.y < self.min_jump_y() || self.speed_drop {
            self.reached_min_height = true;
        }
        if self.y < self.config.max_jump_height || self.speed_drop {
            self.end_jump();
        }

        if self.velocity > 0.0 && self.y >= self.ground_y {
            self.land();
            return true;
        }
        false
    }

    fn land(&mut self) {
        self.y = self.ground_y;
        self.velocity = 0.0;
        self.speed_drop = false;
        self.reached_min_height = false;
        self.jump_count = 0;
        self.set_status(TrexStatus::Running);
        if self.duck_held {
            self.set_duck(true);
        }
    }

    pub fn crash(&mut self) {
        self.set_status(TrexStatus::Crashed);
    }

    /// Back on the ground, running, with no jump history
    pub fn reset(&mut self) {
        self.y = self.ground_y;
        self.velocity = 0.0;
        self.speed_drop = false;
        self.reached_min_height = false;
        self.jump_count = 0;
        self.duck_held = false;
        self.set_status(TrexStatus::Running);
    }

    /// Advance the sprite cycle
    pub fn update_animation(&mut self, elapsed_ms: f32) {
        let (frames, ms_per_frame) = self.status.animation();
        self.anim_timer += elapsed_ms;
        if self.anim_timer >= ms_per_frame {
            self.anim_frame = (self.anim_frame + 1) % frames;
            self.anim_timer = 0.0;
        }
    }

    fn set_status(&mut self, status: TrexStatus) {
        if self.status != status {
            self.status = status;
            self.anim_frame = 0;
            self.anim_timer = 0.0;
        }
    }

    /// Outer bounds for the current status
    pub fn bounds(&self) -> CollisionBox {
        match self.status {
            TrexStatus::Ducking => CollisionBox::new(
                self.x,
                self.y + self.config.height - self.config.height_duck,
                self.config.width_duck,
                self.config.height_duck,
            ),
            TrexStatus::Waiting
            | TrexStatus::Running
            | TrexStatus::Jumping
            | TrexStatus::Crashed => {
                CollisionBox::new(self.x, self.y, self.config.width, self.config.height)
            }
        }
    }

    /// Relative collision boxes for the current status
    pub fn local_boxes(&self) -> &'static [CollisionBox] {
        match self.status {
            TrexStatus::Ducking => &DUCKING_BOXES,
            TrexStatus::Waiting
            | TrexStatus::Running
            | TrexStatus::Jumping
            | TrexStatus::Crashed => &RUNNING_BOXES,
        }
    }

    /// Collision boxes for the current status, in world space
    pub fn collision_boxes(&self) -> impl Iterator<Item = CollisionBox> + '_ {
        let origin = self.bounds().pos;
        self.local_boxes().iter().map(move |b| b.translate(origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MS_PER_FRAME;
    use proptest::prelude::*;

    fn trex() -> Trex {
        let mut trex = Trex::new(&RunnerConfig::default(), &Dimensions::default());
        trex.reset();
        trex
    }

    /// Run a full jump with a fixed step; returns the number of ticks taken
    fn run_jump(trex: &mut Trex, step_ms: f32) -> u32 {
        assert!(trex.start_jump(6.0));
        let mut ticks = 0;
        while !trex.update_jump(step_ms) {
            ticks += 1;
            assert!(ticks < 100_000, "jump never landed");
        }
        ticks
    }

    #[test]
    fn test_ground_position() {
        let trex = trex();
        // 150 high surface, 47 tall figure, 10 bottom pad
        assert_eq!(trex.ground_y, 93.0);
        assert_eq!(trex.y, trex.ground_y);
    }

    #[test]
    fn test_rest_is_idempotent() {
        let mut trex = trex();
        for _ in 0..100 {
            assert!(!trex.update_jump(MS_PER_FRAME));
        }
        assert_eq!(trex.y, trex.ground_y);
        assert_eq!(trex.velocity, 0.0);
        assert_eq!(trex.status, TrexStatus::Running);
    }

    #[test]
    fn test_jump_rises_then_lands() {
        let mut trex = trex();
        trex.start_jump(6.0);
        assert!(trex.velocity < 0.0);
        assert_eq!(trex.jump_count, 1);
        trex.update_jump(MS_PER_FRAME);
        assert!(trex.y < trex.ground_y);
        // Rejected second jump does not count
        assert!(!trex.start_jump(6.0));
        assert_eq!(trex.jump_count, 1);

        run_jump_from_air(&mut trex);
        assert_eq!(trex.status, TrexStatus::Running);
        assert_eq!(trex.jump_count, 0);
    }

    fn run_jump_from_air(trex: &mut Trex) {
        let mut guard = 0;
        while !trex.update_jump(MS_PER_FRAME) {
            guard += 1;
            assert!(guard < 10_000);
        }
    }

    #[test]
    fn test_no_double_jump() {
        let mut trex = trex();
        assert!(trex.start_jump(6.0));
        trex.update_jump(MS_PER_FRAME);
        let velocity = trex.velocity;
        assert!(!trex.start_jump(6.0));
        assert_eq!(trex.velocity, velocity);
    }

    #[test]
    fn test_duck_rejected_in_air() {
        let mut trex = trex();
        trex.start_jump(6.0);
        assert!(!trex.set_duck(true));
        assert_eq!(trex.status, TrexStatus::Jumping);
        assert_eq!(trex.local_boxes().len(), RUNNING_BOXES.len());
    }

    #[test]
    fn test_duck_swaps_boxes() {
        let mut trex = trex();
        let standing = trex.bounds();
        assert!(trex.set_duck(true));
        let ducking = trex.bounds();
        assert!(ducking.size.x > standing.size.x);
        assert!(ducking.size.y < standing.size.y);
        assert_eq!(ducking.bottom(), standing.bottom());
        assert_eq!(trex.collision_boxes().count(), DUCKING_BOXES.len());

        // Cannot jump from a duck
        assert!(!trex.start_jump(6.0));

        assert!(trex.set_duck(false));
        assert_eq!(trex.status, TrexStatus::Running);
        assert_eq!(trex.collision_boxes().count(), RUNNING_BOXES.len());
    }

    #[test]
    fn test_speed_drop_shortens_jump() {
        let mut normal = trex();
        let normal_ticks = run_jump(&mut normal, MS_PER_FRAME);

        let mut dropped = trex();
        dropped.start_jump(6.0);
        for _ in 0..5 {
            dropped.update_jump(MS_PER_FRAME);
        }
        assert!(dropped.set_speed_drop());
        let mut ticks = 5;
        while !dropped.update_jump(MS_PER_FRAME) {
            ticks += 1;
        }
        assert!(ticks < normal_ticks);
        assert!(!dropped.speed_drop);
    }

    #[test]
    fn test_speed_drop_needs_air() {
        let mut trex = trex();
        assert!(!trex.set_speed_drop());
        assert_eq!(trex.velocity, 0.0);
    }

    #[test]
    fn test_landing_with_duck_held() {
        let mut trex = trex();
        trex.start_jump(6.0);
        trex.duck_held = true;
        run_jump_from_air(&mut trex);
        assert_eq!(trex.status, TrexStatus::Ducking);
    }

    #[test]
    fn test_set_jump_velocity_rearms_drop() {
        let mut trex = trex();
        trex.set_jump_velocity(20.0);
        assert_eq!(trex.config.drop_velocity, -10.0);
        trex.start_jump(0.0);
        assert_eq!(trex.velocity, -20.0);
    }

    #[test]
    fn test_jump_airtime_frame_rate_independent() {
        let mut at_60 = trex();
        let ticks_60 = run_jump(&mut at_60, MS_PER_FRAME) as f32 * MS_PER_FRAME;
        let mut at_120 = trex();
        let ticks_120 = run_jump(&mut at_120, MS_PER_FRAME / 2.0) as f32 * MS_PER_FRAME / 2.0;
        // Same airtime within a few canonical frames
        assert!((ticks_60 - ticks_120).abs() < 3.0 * MS_PER_FRAME);
    }

    proptest! {
        #[test]
        fn prop_jump_returns_to_ground(step_ms in 1.0f32..50.0, speed in 0.0f32..13.0) {
            let mut trex = trex();
            let start_y = trex.y;
            prop_assert!(trex.start_jump(speed));
            let mut guard = 0;
            while !trex.update_jump(step_ms) {
                guard += 1;
                prop_assert!(guard < 100_000);
            }
            prop_assert!((trex.y - start_y).abs() < 1e-4);
            prop_assert_eq!(trex.velocity, 0.0);
            prop_assert_eq!(trex.status, TrexStatus::Running);
        }
    }
}
