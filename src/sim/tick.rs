//! Frame-driven simulation context
//!
//! The `Runner` owns one session: the figure, the scrolling world, the current
//! run and the frame scheduler. The host delivers frames and intents; the runner
//! reads time from its `Clock` and never blocks.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::autojump::should_jump;
use super::collision::{Collision, check_collision};
use super::difficulty::{next_speed, viewport_adjusted_speed};
use super::horizon::Horizon;
use super::state::{GameEvent, RunPhase, RunState};
use super::trex::{Trex, TrexConfig};
use crate::config::{ConfigError, ConfigSetting, Dimensions, RunnerConfig};
use crate::platform::{Clock, FrameRequest, FrameScheduler, Intent, SystemClock};

pub struct Runner<C: Clock = SystemClock> {
    config: RunnerConfig,
    dimensions: Dimensions,
    trex: Trex,
    horizon: Horizon,
    run: RunState,
    rng: Pcg32,
    clock: C,
    scheduler: FrameScheduler,
    /// Timestamp of the last processed frame; None makes the next delta zero
    last_frame: Option<f64>,
    /// The intro jump has landed at least once this session
    activated: bool,
    play_count: u32,
    high_score: u32,
    events: Vec<GameEvent>,
}

impl<C: Clock> Runner<C> {
    /// Build a session in the waiting phase. No frame is scheduled until the first jump.
    pub fn new(
        config: RunnerConfig,
        dimensions: Dimensions,
        seed: u64,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let speed = viewport_adjusted_speed(config.speed, dimensions.width, &config);
        Ok(Self {
            trex: Trex::new(&config, &dimensions),
            horizon: Horizon::new(dimensions),
            run: RunState::new(RunPhase::Waiting, speed),
            rng: Pcg32::seed_from_u64(seed),
            clock,
            scheduler: FrameScheduler::new(),
            last_frame: None,
            activated: false,
            play_count: 0,
            high_score: 0,
            events: Vec::new(),
            config,
            dimensions,
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn trex(&self) -> &Trex {
        &self.trex
    }

    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.run.speed
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.run.score()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn is_inverted(&self) -> bool {
        self.run.night.is_inverted()
    }

    /// The frame the host should deliver next, if any
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.scheduler.pending()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Speed a fresh run starts at on this surface
    fn base_speed(&self) -> f32 {
        viewport_adjusted_speed(self.config.speed, self.dimensions.width, &self.config)
    }

    /// Apply a player intent. Intents that make no sense in the current state are ignored.
    pub fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::JumpPressed => match self.run.phase {
                RunPhase::Waiting => self.start(),
                RunPhase::Intro | RunPhase::Running => self.jump(),
                RunPhase::Crashed => {
                    let now = self.clock.now();
                    let cleared = self
                        .run
                        .crashed_at
                        .is_some_and(|t| now - t >= self.config.gameover_clear_time as f64);
                    if cleared {
                        self.restart();
                    }
                }
                RunPhase::Paused => {}
            },
            Intent::JumpReleased => {
                if self.run.phase.is_active() {
                    self.trex.end_jump();
                }
            }
            Intent::DuckPressed => {
                if self.run.phase.is_active() {
                    self.trex.duck_held = true;
                    if self.trex.is_jumping() {
                        self.trex.set_speed_drop();
                    } else {
                        self.trex.set_duck(true);
                    }
                }
            }
            Intent::DuckReleased => {
                self.trex.duck_held = false;
                if self.run.phase.is_active() {
                    self.trex.set_duck(false);
                }
            }
        }
    }

    fn jump(&mut self) {
        if self.trex.start_jump(self.run.speed) {
            self.events.push(GameEvent::JumpStarted);
        }
    }

    /// First input of the session: the intro jump
    fn start(&mut self) {
        self.play_count += 1;
        self.run.phase = RunPhase::Intro;
        self.last_frame = None;
        self.jump();
        self.scheduler.request();
        log::info!("Run {} started", self.play_count);
    }

    /// Deliver a scheduled frame. Stale requests (cancelled by a pause, crash or
    /// restart) are refused and change nothing.
    pub fn on_frame(&mut self, request: FrameRequest) -> bool {
        if !self.scheduler.accept(request) {
            log::debug!("Ignoring stale frame request");
            return false;
        }
        self.update();
        true
    }

    /// Deliver whatever frame is pending. Returns false when nothing was scheduled.
    pub fn run_pending_frame(&mut self) -> bool {
        match self.scheduler.pending() {
            Some(request) => self.on_frame(request),
            None => false,
        }
    }

    fn update(&mut self) {
        let now = self.clock.now();
        let elapsed_ms = match self.last_frame {
            Some(previous) => (now - previous).max(0.0) as f32,
            None => 0.0,
        };
        self.last_frame = Some(now);

        if !self.run.phase.is_active() {
            return;
        }
        self.step(elapsed_ms, now);
        if self.run.phase.is_active() {
            self.scheduler.request();
        }
    }

    fn step(&mut self, elapsed_ms: f32, now: f64) {
        self.trex.update_animation(elapsed_ms);

        if self.activated
            && self.config.auto_jump
            && should_jump(
                self.horizon.nearest_obstacle(),
                &self.trex,
                self.config.auto_jump_distance,
            )
        {
            self.jump();
        }

        let landed = self.trex.update_jump(elapsed_ms);
        if landed {
            self.events.push(GameEvent::Landed);
        }

        if landed && self.run.phase == RunPhase::Intro {
            self.run.phase = RunPhase::Running;
            self.activated = true;
            log::debug!("Intro finished, world scrolling");
        }
        if !self.activated {
            return;
        }

        self.run.running_time += elapsed_ms;
        let obstacles_enabled = self.run.running_time > self.config.clear_time;
        if let Some(id) = self.horizon.advance(
            &mut self.rng,
            elapsed_ms,
            self.run.speed,
            obstacles_enabled,
            &self.config,
        ) {
            self.events.push(GameEvent::ObstacleSpawned { id });
        }

        if let Some(collision) = check_collision(
            &self.trex,
            &self.horizon.obstacles,
            self.config.collision_tolerance,
        ) {
            self.game_over(collision, now);
            return;
        }

        if let Some(score) = self.run.distance.add(self.run.speed, elapsed_ms) {
            self.events.push(GameEvent::Achievement { score });
        }
        self.run.speed = next_speed(self.run.speed, elapsed_ms, &self.config);

        let score = self.run.score();
        if let Some(inverted) = self.run.night.update(elapsed_ms, score, &self.config) {
            log::debug!("Inversion {} at score {}", inverted, score);
            self.events.push(GameEvent::Inverted(inverted));
        }
    }

    fn game_over(&mut self, collision: Collision, now: f64) {
        self.trex.crash();
        self.run.phase = RunPhase::Crashed;
        self.run.crashed_at = Some(now);
        self.scheduler.cancel();

        let score = self.run.score();
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
        }
        self.events.push(GameEvent::Crashed {
            score,
            obstacle_id: collision.obstacle_id,
            new_high_score,
        });
        log::info!(
            "Crashed into obstacle {} with score {} (high score {})",
            collision.obstacle_id,
            score,
            self.high_score
        );
    }

    /// Start a fresh run immediately, whatever the current phase
    pub fn restart(&mut self) {
        self.play_count += 1;
        self.run = RunState::new(RunPhase::Running, self.base_speed());
        self.horizon.reset();
        self.trex.reset();
        self.activated = true;
        self.last_frame = None;
        self.scheduler.cancel();
        self.scheduler.request();
        self.events.push(GameEvent::Restarted {
            play_count: self.play_count,
        });
        log::info!("Run {} restarted", self.play_count);
    }

    /// Stop advancing. No-op unless a run is active.
    pub fn pause(&mut self) {
        if !self.run.phase.is_active() {
            return;
        }
        self.run.phase = RunPhase::Paused;
        self.scheduler.cancel();
        self.events.push(GameEvent::Paused);
        log::debug!("Paused");
    }

    /// Continue a paused run. The time spent paused is not simulated.
    pub fn resume(&mut self) {
        if self.run.phase != RunPhase::Paused {
            return;
        }
        self.run.phase = if self.activated {
            RunPhase::Running
        } else {
            RunPhase::Intro
        };
        self.last_frame = Some(self.clock.now());
        self.scheduler.request();
        self.events.push(GameEvent::Resumed);
        log::debug!("Resumed");
    }

    /// Visibility or focus change from the host
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Change one setting and propagate it to the parts that keep their own copy.
    ///
    /// On error the current snapshot stays in place.
    pub fn reconfigure(&mut self, setting: ConfigSetting, value: f64) -> Result<(), ConfigError> {
        let next = match self.config.with_setting(setting, value) {
            Ok(next) => next,
            Err(err) => {
                log::warn!("Rejected {} = {}: {}", setting, value, err);
                return Err(err);
            }
        };
        self.config = next;

        match setting {
            ConfigSetting::Gravity
            | ConfigSetting::MinJumpHeight
            | ConfigSetting::SpeedDropCoefficient => {
                self.trex.config = TrexConfig::from_runner(&self.config);
            }
            ConfigSetting::InitialJumpVelocity => {
                self.trex.set_jump_velocity(self.config.initial_jump_velocity);
            }
            ConfigSetting::Speed => self.run.speed = self.base_speed(),
            ConfigSetting::MaxSpeed => self.run.speed = self.run.speed.min(self.config.max_speed),
            ConfigSetting::Acceleration
            | ConfigSetting::ClearTime
            | ConfigSetting::GapCoefficient
            | ConfigSetting::InvertDistance
            | ConfigSetting::AutoJumpDistance
            | ConfigSetting::CollisionTolerance => {}
        }

        self.events.push(GameEvent::Reconfigured(setting));
        log::info!("{} set to {}", setting, value);
        Ok(())
    }
}
