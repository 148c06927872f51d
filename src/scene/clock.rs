//! Simulation clock fed to the shading stage as `t`.

/// Monotonic animation time, held or advanced by the scene on each tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationClock {
    t: f32,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn advance(&mut self, increment: f32) {
        self.t += increment;
    }

    pub fn reset(&mut self) {
        self.t = 0.0;
    }
}
