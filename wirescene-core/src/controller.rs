/// Autorotation of the display group and the drag/cooldown state machine
use nalgebra::Vector3;
use rand::Rng;
use std::time::Duration;

use crate::config::CooldownPolicy;
use crate::timer::{TimerToken, Timers};
use crate::transform::RotationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Interacting,
}

/// How the group turns while idle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoRotate {
    Off,
    /// Same rate every idle phase
    Fixed(Vector3<f32>),
    /// New rate in `[-bound, bound)` per axis after every cooldown
    Randomized { bound: f32 },
}

/// Owns the group rotation and decides when it advances
///
/// Drag start freezes the rotation immediately. Drag end schedules a
/// cooldown; when it fires the controller goes idle again and, in
/// randomized mode, draws a fresh rate.
#[derive(Debug, Clone)]
pub struct AutoRotateController {
    state: InteractionState,
    mode: AutoRotate,
    rate: Option<Vector3<f32>>,
    rotation: RotationState,
    cooldown: Duration,
    policy: CooldownPolicy,
    timers: Timers,
    pending: Option<TimerToken>,
    dragging: bool,
}

impl AutoRotateController {
    pub fn new(mode: AutoRotate, cooldown: Duration, policy: CooldownPolicy) -> Self {
        let rate = match mode {
            AutoRotate::Fixed(rate) => Some(rate),
            AutoRotate::Off | AutoRotate::Randomized { .. } => None,
        };

        Self {
            state: InteractionState::Idle,
            mode,
            rate,
            rotation: RotationState::zero(),
            cooldown,
            policy,
            timers: Timers::new(),
            pending: None,
            dragging: false,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn rate(&self) -> Option<Vector3<f32>> {
        self.rate
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn policy(&self) -> CooldownPolicy {
        self.policy
    }

    /// Deadline of the cooldown that will end the current interaction
    pub fn cooldown_deadline(&self) -> Option<Duration> {
        self.pending.and_then(|token| self.timers.deadline(token))
    }

    /// Draw a new rate in randomized mode; other modes keep theirs
    pub fn resample_rate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let AutoRotate::Randomized { bound } = self.mode {
            let mut axis = || {
                if bound > 0.0 {
                    rng.random_range(-bound..bound)
                } else {
                    0.0
                }
            };
            let rate = Vector3::new(axis(), axis(), axis());
            log::debug!("rotation rate resampled to {:?}", rate);
            self.rate = Some(rate);
        }
    }

    pub fn drag_start(&mut self, now: Duration) {
        if self.policy == CooldownPolicy::CancelOnReengage {
            if let Some(token) = self.pending.take() {
                if self.timers.cancel(token) {
                    log::debug!("cooldown cancelled by new drag at {:?}", now);
                }
            }
        }
        self.state = InteractionState::Interacting;
        self.dragging = true;
        log::debug!("drag started at {:?}", now);
    }

    /// Schedule the cooldown that ends the interaction
    ///
    /// With [`CooldownPolicy::CancelOnReengage`] a drag end without a drag in
    /// progress is ignored. Uncancelable cooldowns are scheduled on every call.
    pub fn drag_end(&mut self, now: Duration) {
        if self.policy == CooldownPolicy::CancelOnReengage {
            if !self.dragging {
                log::debug!("drag end without a drag at {:?} ignored", now);
                return;
            }
            if let Some(token) = self.pending.take() {
                self.timers.cancel(token);
            }
        }
        self.dragging = false;
        let token = self.timers.schedule(now, self.cooldown);
        self.pending = Some(token);
        log::debug!(
            "drag ended at {:?}, autorotation resumes at {:?}",
            now,
            now + self.cooldown
        );
    }

    /// Fire due cooldowns without advancing the rotation
    pub fn poll<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) {
        for token in self.timers.expire(now) {
            if self.pending == Some(token) {
                self.pending = None;
            }
            if self.dragging {
                // Only reachable with uncancelable cooldowns
                log::warn!("stale cooldown fired during a drag at {:?}", now);
            }
            self.state = InteractionState::Idle;
            self.resample_rate(rng);
            log::debug!("cooldown elapsed at {:?}, autorotation resumed", now);
        }
    }

    /// Process one rendered frame and return the group rotation to apply
    pub fn frame<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) -> RotationState {
        self.poll(now, rng);
        if self.state == InteractionState::Idle {
            if let Some(rate) = self.rate {
                self.rotation.accumulate(&rate);
            }
        }
        self.rotation
    }
}
