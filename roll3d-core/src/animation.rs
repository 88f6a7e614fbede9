/// Frame driver that gates the rolling state machine
use crate::path::SegmentTable;
use crate::rolling::{Handoff, RollingState};

/// Whether the sphere is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first start command
    Idle,
    Rolling,
    Paused,
}

/// Owns the rolling state and decides when it advances
#[derive(Debug, Clone)]
pub struct Animation {
    state: RollingState,
    phase: Phase,
}

impl Animation {
    pub fn new() -> Self {
        Self {
            state: RollingState::new(),
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> &RollingState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start rolling; ignored once the animation has begun
    pub fn begin(&mut self) {
        if self.phase == Phase::Idle {
            log::info!("rolling started");
            self.phase = Phase::Rolling;
        }
    }

    /// Pause or resume; ignored before the first start
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Idle => Phase::Idle,
            Phase::Rolling => Phase::Paused,
            Phase::Paused => Phase::Rolling,
        };
        log::debug!("animation phase: {:?}", self.phase);
    }

    /// Back to the first segment with no rotation, rolling immediately
    pub fn restart(&mut self) {
        self.state.reset();
        self.phase = Phase::Rolling;
        log::info!("rolling restarted");
    }

    /// Advance one tick if rolling
    pub fn tick(
        &mut self,
        path: &SegmentTable,
        radius: f32,
        degrees_per_tick: f32,
    ) -> Option<Handoff> {
        if self.phase != Phase::Rolling {
            return None;
        }
        let handoff = self.state.advance(path, radius, degrees_per_tick)?;
        log::debug!("segment {} complete, rolling onto segment {}", handoff.from, handoff.to);
        Some(handoff)
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}
