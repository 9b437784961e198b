/// Source of the per-frame elapsed time, in seconds.
pub trait Clock {
    fn frame_time(&self) -> f32;
}

/// Default cap on fixed steps per frame.
pub const MAX_STEPS_PER_FRAME: u32 = 10;

/// Turns variable host frame times into a whole number of fixed physics steps.
///
/// Leftover time carries into the next frame. Frames longer than
/// `max_steps * dt` are truncated, so one slow frame cannot snowball.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    dt: f32,
    max_steps: u32,
    carry: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            max_steps: MAX_STEPS_PER_FRAME,
            carry: 0.0,
        }
    }

    /// Feed one host frame. Returns how many fixed steps to run.
    /// Non-finite or non-positive frame times add nothing.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 || self.dt <= 0.0 {
            return 0;
        }
        let budget = self.dt * self.max_steps as f32;
        self.carry = (self.carry + frame_dt).min(budget);
        let steps = (self.carry / self.dt) as u32;
        self.carry -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }
}

impl Clock for FixedTimestep {
    fn frame_time(&self) -> f32 {
        self.dt
    }
}

/// Clock whose frame time is set by the host each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    frame_time: f32,
}

impl ManualClock {
    pub fn new(frame_time: f32) -> Self {
        Self { frame_time }
    }

    pub fn set(&mut self, frame_time: f32) {
        self.frame_time = frame_time;
    }
}

impl Clock for ManualClock {
    fn frame_time(&self) -> f32 {
        self.frame_time
    }
}
