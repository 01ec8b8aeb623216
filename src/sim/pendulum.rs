//! Pendulum variant: bobs orbit a pivot and ring when they strike a bar
//!
//! Same contact-response idea as the pin board with the free fall replaced
//! by a fixed circular trajectory. A strike plays the pendulum's next tone,
//! reverses its direction and restarts its angle at the bottom.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::Rect;
use crate::audio::{Cue, Dispatcher, Sequencer, Tone};

/// cos(angle) below this means the bob has gone over the top
const OVER_THE_TOP: f32 = -0.1;

/// One bob on a rigid arm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pendulum {
    pub length: f32,
    /// 0 = straight down, PI = straight up
    pub angle: f32,
    /// Radians per tick; sign is the travel direction
    pub angular_velocity: f32,
    /// Ticks for one full orbit
    pub period_ticks: f32,
    pub radius: f32,
    pub bob: Vec2,
    pub started: bool,
    /// Score played through once; the bob stays where it is
    pub finished: bool,
    pub top_reached: bool,
    #[serde(skip)]
    dispatcher: Dispatcher,
    start_angle: f32,
}

impl Pendulum {
    pub fn new(pivot: Vec2, length: f32, angle: f32, period_ticks: f32, radius: f32, score: Sequencer) -> Self {
        let mut pendulum = Self {
            length,
            angle,
            angular_velocity: 0.0,
            period_ticks,
            radius,
            bob: Vec2::ZERO,
            started: false,
            finished: false,
            top_reached: false,
            dispatcher: Dispatcher::new(score),
            start_angle: angle,
        };
        pendulum.place(pivot);
        pendulum
    }

    fn place(&mut self, pivot: Vec2) {
        self.bob = pivot + Vec2::new(self.angle.sin(), self.angle.cos()) * self.length;
    }

    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.angular_velocity = TAU / self.period_ticks.max(1.0);
    }

    /// Whether the bob is on the bar this tick
    fn strikes(&self, pivot: Vec2, bar: &Rect) -> bool {
        let past_center = if self.angular_velocity > 0.0 {
            self.bob.x >= pivot.x
        } else {
            self.bob.x <= pivot.x
        };
        let bob_top = self.bob.y - self.radius;
        let on_bar = bar.top() <= bob_top && bob_top <= bar.bottom();
        past_center && on_bar && self.top_reached
    }

    /// Strike check against the pre-move position, then advance the orbit
    fn step(&mut self, pivot: Vec2, bar: &Rect, field_width: f32) -> Option<Cue> {
        if !self.started || self.finished {
            return None;
        }

        let mut cue = None;
        if self.strikes(pivot, bar) {
            cue = Some(self.dispatcher.cue(None, self.bob, field_width));
            self.angle = 0.0;
            self.top_reached = false;
            self.angular_velocity = -self.angular_velocity;
        }

        self.angle += self.angular_velocity;
        self.place(pivot);
        if self.angle.cos() < OVER_THE_TOP {
            self.top_reached = true;
        }
        if self.dispatcher.sequencer().plays() >= self.dispatcher.sequencer().len() as u64 {
            self.finished = true;
            log::info!("Pendulum (length {}) finished its score", self.length);
        }
        cue
    }

    pub fn plays(&self) -> u64 {
        self.dispatcher.sequencer().plays()
    }

    fn reset(&mut self, pivot: Vec2) {
        self.angle = self.start_angle;
        self.angular_velocity = 0.0;
        self.started = false;
        self.finished = false;
        self.top_reached = false;
        self.dispatcher.reset();
        self.place(pivot);
    }
}

/// Pivot, vertical bar and the pendulums that strike it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendulumRig {
    pub pivot: Vec2,
    pub bar: Rect,
    pub pendulums: Vec<Pendulum>,
    /// Round-robin pointer for `start_next`
    next_start: usize,
}

impl PendulumRig {
    pub fn new(pivot: Vec2, bar: Rect, pendulums: Vec<Pendulum>) -> Self {
        Self {
            pivot,
            bar,
            pendulums,
            next_start: 0,
        }
    }

    /// Three nested pendulums over a bar hanging below the pivot
    pub fn three_bells(width: f32, height: f32) -> Self {
        use Tone::*;
        let pivot = Vec2::new(width / 2.0, height / 2.0);
        let bar_width = 5.0;
        let bar = Rect::new(pivot.x - bar_width / 2.0, pivot.y, bar_width, 385.0);
        let score = |tones: &[Tone]| Sequencer::new(tones.to_vec()).unwrap_or_default();

        let pendulums = vec![
            Pendulum::new(
                pivot,
                220.0,
                PI,
                50.0,
                30.0,
                score(&[D, D, D, D, C, C, C, C, CSharp, CSharp, CSharp, CSharp, CSharp, CSharp, CSharp, CSharp]),
            ),
            Pendulum::new(pivot, 110.0, PI, 100.0, 30.0, score(&[F, F, F, F, E, E, E, E])),
            Pendulum::new(pivot, 330.0, PI, 100.0, 30.0, score(&[A; 8])),
        ];
        Self::new(pivot, bar, pendulums)
    }

    /// Start the next pendulum in round-robin order
    pub fn start_next(&mut self) -> Option<usize> {
        if self.pendulums.is_empty() {
            return None;
        }
        let index = self.next_start % self.pendulums.len();
        self.next_start += 1;
        self.pendulums[index].start();
        Some(index)
    }

    /// Advance every pendulum one tick; cues come back in pendulum order
    pub fn step(&mut self, field_width: f32) -> Vec<Cue> {
        let pivot = self.pivot;
        let bar = self.bar;
        self.pendulums
            .iter_mut()
            .filter_map(|p| p.step(pivot, &bar, field_width))
            .collect()
    }

    pub fn reset(&mut self) {
        let pivot = self.pivot;
        for pendulum in &mut self.pendulums {
            pendulum.reset(pivot);
        }
        self.next_start = 0;
    }
}
