//! Oscillator sampling ranges for the lake and ocean regimes.

use std::ops::{Range, RangeInclusive};

/// Ranges used when drawing a fresh oscillator.
///
/// All lengths are in world units (the surface spans 4 × 4 units).
#[derive(Debug, Clone)]
pub struct WaveRanges {
    /// Amplitude ceiling drawn per oscillator (world units)
    /// lake: 0.008..0.108, ocean: 0.14..0.84
    pub threshold: Range<f32>,

    /// Starting amplitude is `threshold / divisor` with divisor drawn from this range
    pub amplitude_divisor: RangeInclusive<u32>,

    /// Wavelength (world units)
    /// lake: 0.2..0.3, ocean: 0.5..0.6
    pub wavelength: Range<f32>,

    /// Phase speed (world units per clock unit)
    /// lake: 0.3..0.4, ocean: 0.5..0.6
    pub speed: Range<f32>,

    /// Magnitude of each direction component before the random sign flip
    pub direction: Range<f32>,

    /// Amplitude change applied on every tick (world units)
    pub amplitude_step: f32,
}

impl WaveRanges {
    /// Small, slow ripples
    pub fn lake() -> Self {
        Self {
            threshold: 0.008..0.108,
            amplitude_divisor: 1..=5,
            wavelength: 0.2..0.3,
            speed: 0.3..0.4,
            direction: 0.05..1.05,
            amplitude_step: 0.0001,
        }
    }

    /// Tall, long swells
    pub fn ocean() -> Self {
        Self {
            threshold: 0.14..0.84,
            wavelength: 0.5..0.6,
            speed: 0.5..0.6,
            ..Self::lake()
        }
    }
}

impl Default for WaveRanges {
    fn default() -> Self {
        Self::lake()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocean_waves_are_larger_than_lake_waves() {
        let lake = WaveRanges::lake();
        let ocean = WaveRanges::ocean();

        assert!(ocean.threshold.start > lake.threshold.end);
        assert!(ocean.wavelength.start > lake.wavelength.end);
        assert!(ocean.speed.start > lake.speed.end);
        assert_eq!(ocean.amplitude_step, lake.amplitude_step);
    }
}
