//! A single self-resampling wave oscillator.

use rand::Rng;

use crate::params::WaveRanges;

/// Per-wave values handed to the shading stage
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveParams {
    pub amplitude: f32,
    pub wavelength: f32,
    pub speed: f32,
    pub direction_x: f32,
    pub direction_y: f32,
}

/// One periodic wave whose amplitude breathes between 0 and a drawn threshold.
///
/// When the amplitude is about to drop below zero the wave picks a new
/// wavelength, speed and direction and starts growing again, so a bank of
/// these never settles into a visible pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Oscillator {
    pub amplitude: f32,
    pub threshold: f32,
    pub wavelength: f32,
    pub speed: f32,
    pub direction_x: f32,
    pub direction_y: f32,
    pub growing: bool,
}

impl Oscillator {
    /// Draw a fresh oscillator from the given ranges
    pub fn sample<R: Rng>(rng: &mut R, ranges: &WaveRanges) -> Self {
        let threshold = rng.gen_range(ranges.threshold.clone());
        let divisor = rng.gen_range(ranges.amplitude_divisor.clone()).max(1);

        let mut oscillator = Self {
            amplitude: threshold / divisor as f32,
            threshold,
            wavelength: 0.0,
            speed: 0.0,
            direction_x: 0.0,
            direction_y: 0.0,
            growing: true,
        };
        oscillator.resample_shape(rng, ranges);
        oscillator
    }

    /// Redraw wavelength, speed and direction, keeping amplitude and threshold
    pub fn resample_shape<R: Rng>(&mut self, rng: &mut R, ranges: &WaveRanges) {
        self.wavelength = rng.gen_range(ranges.wavelength.clone());
        self.speed = rng.gen_range(ranges.speed.clone());
        self.direction_x = signed_component(rng, ranges);
        self.direction_y = signed_component(rng, ranges);
    }

    /// Advance the amplitude by one step.
    ///
    /// Returns `true` when the oscillator was resampled on this step.
    pub fn step<R: Rng>(&mut self, rng: &mut R, ranges: &WaveRanges) -> bool {
        let step = ranges.amplitude_step;
        let mut resampled = false;

        if self.amplitude > self.threshold {
            self.growing = false;
        } else if !self.growing && self.amplitude - step < 0.0 {
            self.growing = true;
            self.resample_shape(rng, ranges);
            resampled = true;
        }

        self.amplitude += if self.growing { step } else { -step };
        resampled
    }

    pub fn params(&self) -> WaveParams {
        WaveParams {
            amplitude: self.amplitude,
            wavelength: self.wavelength,
            speed: self.speed,
            direction_x: self.direction_x,
            direction_y: self.direction_y,
        }
    }
}

/// Uniform magnitude, sign flipped with probability 1/2
fn signed_component<R: Rng>(rng: &mut R, ranges: &WaveRanges) -> f32 {
    let magnitude = rng.gen_range(ranges.direction.clone());
    if rng.gen_bool(0.5) {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_respects_lake_ranges() {
        let ranges = WaveRanges::lake();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let osc = Oscillator::sample(&mut rng, &ranges);
            assert!(ranges.threshold.contains(&osc.threshold));
            assert!(osc.amplitude > 0.0 && osc.amplitude <= osc.threshold);
            assert!(ranges.wavelength.contains(&osc.wavelength));
            assert!(ranges.speed.contains(&osc.speed));
            assert!(ranges.direction.contains(&osc.direction_x.abs()));
            assert!(ranges.direction.contains(&osc.direction_y.abs()));
            assert!(osc.growing);
        }
    }

    #[test]
    fn test_direction_signs_are_mixed() {
        let ranges = WaveRanges::ocean();
        let mut rng = StdRng::seed_from_u64(11);

        let negatives = (0..1000)
            .map(|_| Oscillator::sample(&mut rng, &ranges))
            .filter(|osc| osc.direction_x < 0.0)
            .count();

        // Roughly half should be flipped
        assert!(negatives > 400 && negatives < 600, "negatives = {}", negatives);
    }

    #[test]
    fn test_growth_flips_above_threshold() {
        let ranges = WaveRanges::lake();
        let mut rng = StdRng::seed_from_u64(3);
        let mut osc = Oscillator::sample(&mut rng, &ranges);
        osc.amplitude = osc.threshold + ranges.amplitude_step;

        let before = osc.amplitude;
        osc.step(&mut rng, &ranges);

        assert!(!osc.growing);
        assert!(osc.amplitude < before);
    }

    #[test]
    fn test_underflow_resamples_shape_but_not_threshold() {
        let ranges = WaveRanges::lake();
        let mut rng = StdRng::seed_from_u64(5);
        let mut osc = Oscillator::sample(&mut rng, &ranges);
        osc.amplitude = ranges.amplitude_step * 0.5;
        osc.growing = false;
        let threshold = osc.threshold;
        let shape = (osc.wavelength, osc.speed, osc.direction_x, osc.direction_y);

        let resampled = osc.step(&mut rng, &ranges);

        assert!(resampled);
        assert!(osc.growing);
        assert!(osc.amplitude >= 0.0);
        assert_eq!(osc.threshold, threshold);
        assert_ne!(
            (osc.wavelength, osc.speed, osc.direction_x, osc.direction_y),
            shape
        );
    }
}
