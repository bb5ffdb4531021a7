//! Game loop timing
//!
//! Implements a fixed timestep loop driven by externally measured frame
//! times. The loop owns the simulation clock, so every controller tick
//! receives an explicit `(now, dt)` pair and a session can be replayed by
//! feeding the same frame times again.

/// Target update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of fixed steps per frame to prevent spiral of death
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Timing of a single fixed update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Simulation time at the end of this step, in seconds
    pub now: f32,
    /// Length of this step, in seconds
    pub dt: f32,
}

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Accumulated time not yet consumed by fixed updates
    accumulator: f32,

    /// Fixed update length in seconds
    timestep: f32,

    /// Simulation time of the last completed update
    sim_time: f32,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,
}

impl GameLoop {
    /// Create a new game loop at the default timestep
    pub fn new() -> Self {
        Self::with_timestep(FIXED_TIMESTEP)
    }

    /// Create a game loop with a custom timestep.
    /// Non-positive timesteps fall back to [`FIXED_TIMESTEP`].
    pub fn with_timestep(timestep: f32) -> Self {
        let timestep = if timestep > 0.0 {
            timestep
        } else {
            log::warn!("Invalid timestep {}, using {}", timestep, FIXED_TIMESTEP);
            FIXED_TIMESTEP
        };

        Self {
            accumulator: 0.0,
            timestep,
            sim_time: 0.0,
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Feed a measured frame duration and get the fixed updates to run for it
    pub fn advance(&mut self, frame_time: f32) -> Vec<FrameTime> {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return Vec::new();
        }

        self.accumulator += frame_time.max(0.0);

        let mut steps = Vec::new();
        while self.accumulator >= self.timestep && (steps.len() as u32) < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.timestep;
            self.sim_time += self.timestep;
            steps.push(FrameTime {
                now: self.sim_time,
                dt: self.timestep,
            });
        }

        // Drop the backlog we refused to simulate
        if steps.len() as u32 == MAX_STEPS_PER_FRAME {
            self.accumulator = self.accumulator.min(self.timestep);
        }

        self.update_count += steps.len() as u64;
        steps
    }

    /// Get the fixed timestep (in seconds)
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Simulation time of the last completed update
    pub fn now(&self) -> f32 {
        self.sim_time
    }

    /// Get total number of frames fed to the loop
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused at {:.2}s", self.sim_time);
        }
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = 0.0;
            log::info!("Simulation resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
