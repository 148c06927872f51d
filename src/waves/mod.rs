//! Periodic wave oscillators driving the lake and ocean surfaces.

mod bank;
mod oscillator;

pub use bank::{WaveBank, WAVE_COUNT};
pub use oscillator::{Oscillator, WaveParams};
