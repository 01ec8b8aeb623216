//! Fixed timestep simulation tick
//!
//! One tick: apply triggers, integrate every active ball, detect and resolve
//! contacts ball by ball, then dispatch cues and captures in resolution order.

use glam::Vec2;

use super::collision::detect;
use super::response::resolve;
use super::state::{BodyId, SimEvent, SimPhase, Simulation};
use super::integrator::integrate_all;
use crate::config::SlotPolicy;

/// Add a ball at the top of the board
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnRequest {
    /// Center x; random when `None`
    pub x: Option<f32>,
    /// Initial velocity; random when `None`
    pub velocity: Option<Vec2>,
    /// Skip the pending state
    pub active: bool,
}

/// Release a pending ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRequest {
    Body(BodyId),
    /// Any pending ball, picked by the seeded RNG
    Random,
}

/// Input triggers for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub spawn: Vec<SpawnRequest>,
    pub start: Vec<StartRequest>,
    /// Start the next pendulum of the rig, if any
    pub start_pendulum: bool,
    /// Stop signal (window close)
    pub stop: bool,
    /// Clear the run and regenerate the board
    pub reset: bool,
}

/// One sounding contact or capture waiting for dispatch
enum Pending {
    Sound { body: BodyId, at: Vec2 },
    Capture { body: BodyId, slot: usize },
}

/// Advance the simulation by one tick
pub fn tick(state: &mut Simulation, input: &TickInput) {
    if input.reset {
        if let Err(e) = state.reset() {
            log::error!("Reset failed: {}", e);
        }
        return;
    }

    match state.phase {
        SimPhase::Stopped => {
            if !input.spawn.is_empty() || !input.start.is_empty() {
                log::warn!("Trigger ignored: simulation is stopped");
            }
            return;
        }
        SimPhase::Running | SimPhase::Settled => {}
    }

    if input.stop {
        state.phase = SimPhase::Stopped;
        state.events.push(SimEvent::Stopped);
        log::info!(
            "Simulation stopped after {} ticks (score {})",
            state.time_ticks,
            state.score
        );
        return;
    }

    // --- TRIGGERS ---
    for request in &input.spawn {
        state.spawn(request.x, request.velocity, request.active);
    }
    for request in &input.start {
        match *request {
            StartRequest::Body(id) => {
                state.start_body(id);
            }
            StartRequest::Random => {
                state.start_random();
            }
        }
    }
    if input.start_pendulum {
        if let Some(rig) = state.pendulums.as_mut() {
            rig.start_next();
        }
    }

    state.time_ticks += 1;

    // --- INTEGRATION ---
    integrate_all(&mut state.bodies, state.config.gravity);

    // --- DETECTION + RESPONSE ---
    let bounce = state.config.wall_bounce;
    let mut queue: Vec<Pending> = Vec::new();
    for body in state.bodies.iter_mut() {
        for contact in detect(body, &state.field) {
            let resolution = resolve(body, &contact, &state.field, bounce);
            if !resolution.sounds && resolution.captured.is_none() && !body.is_active() {
                // Already captured earlier this tick
                continue;
            }
            state.events.push(SimEvent::Contact {
                body: body.id,
                kind: contact.kind,
                obstacle: contact.obstacle,
                at: contact.at,
                sounds: resolution.sounds,
            });
            if resolution.sounds {
                queue.push(Pending::Sound {
                    body: body.id,
                    at: contact.at,
                });
            }
            if let Some(slot) = resolution.captured {
                queue.push(Pending::Capture { body: body.id, slot });
            }
        }
    }

    // --- DISPATCH ---
    let width = state.field.width;
    let mut releases = 0u32;
    for item in queue {
        match item {
            Pending::Sound { body, at } => {
                let cue = state.dispatcher.cue(Some(body), at, width);
                state.cues.push(cue);
            }
            Pending::Capture { body, slot } => {
                let right_half = state
                    .field
                    .slots
                    .get(slot)
                    .is_some_and(|s| s.rect.center().x > width / 2.0);
                let Some(points) = state.field.mark_captured(slot) else {
                    continue;
                };
                state.score += u64::from(points);
                state.events.push(SimEvent::Captured { body, slot, points });
                log::info!("Ball {} in slot {} with {} points (score {})", body.0, slot, points, state.score);
                if state.config.slot_policy == SlotPolicy::Multiply && right_half {
                    releases += 2;
                }
            }
        }
    }

    // Multiply slots release new balls after every capture has been applied
    for _ in 0..releases {
        state.spawn(None, None, true);
    }

    // --- PENDULUMS ---
    if let Some(rig) = state.pendulums.as_mut() {
        let cues = rig.step(width);
        state.cues.extend(cues);
    }

    if state.all_captured() {
        if state.phase != SimPhase::Settled {
            log::info!("All balls captured (score {})", state.score);
        }
        state.phase = SimPhase::Settled;
    }
}
