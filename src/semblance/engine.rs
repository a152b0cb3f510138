// Thu Jan 15 2026 - Alex

use crate::config::ScanConfig;
use crate::moveout::{half_offset, MoveoutTerms};
use crate::seismic::{Gather, NeighborGather};
use crate::semblance::error::SemblanceError;

/// Outcome of one semblance evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Semblance {
    Coherent { value: f64, stack: f64 },
    /// No trace qualified, the window carried no energy, or the miss limit
    /// was reached. Never beats any candidate; reads as 0.0.
    NoData,
}

impl Semblance {
    pub fn value(&self) -> f64 {
        match self {
            Semblance::Coherent { value, .. } => *value,
            Semblance::NoData => 0.0,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Semblance::NoData)
    }
}

/// Largest half width whose window still fits a Seismic Unix trace, which
/// holds at most `u16::MAX` samples.
pub const MAX_HALF_WIDTH: usize = (u16::MAX as usize - 1) / 2;

/// Window of `2·half_width + 1` samples around a predicted arrival.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemblanceWindow {
    half_width: usize,
    seg: f64,
}

impl SemblanceWindow {
    /// `duration` and `seg` in seconds; the half width is `duration / seg` truncated.
    /// Windows wider than any trace can hold are rejected.
    pub fn new(duration: f64, seg: f64) -> Result<Self, SemblanceError> {
        if !seg.is_finite() || seg <= 0.0 {
            return Err(SemblanceError::InvalidSampleInterval(seg));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(SemblanceError::InvalidWindow(duration));
        }

        let ratio = duration / seg;
        if !ratio.is_finite() || ratio >= (MAX_HALF_WIDTH + 1) as f64 {
            return Err(SemblanceError::InvalidWindow(duration));
        }

        Ok(Self {
            half_width: ratio as usize,
            seg,
        })
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Bounded by `u16::MAX` through the half-width limit.
    pub fn len(&self) -> usize {
        2 * self.half_width + 1
    }

    /// Whether at least one trace of `ns` samples can hold the whole window.
    pub fn fits(&self, ns: usize) -> bool {
        self.len() <= ns
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn seg(&self) -> f64 {
        self.seg
    }
}

/// Linear interpolation of `x` at `y` between `(y0, x0)` and `(y1, x1)`.
/// Exact at both ends.
pub fn interpolate(x0: f64, x1: f64, y: f64, y0: f64, y1: f64) -> f64 {
    if y == y1 {
        return x1;
    }
    x0 + (x1 - x0) * (y - y0) / (y1 - y0)
}

/// Accepts a semblance inside `[0, 1]`, clamps values within `tolerance` of
/// either bound and rejects everything else, NaN included.
///
/// The upper side is tolerant too: a window of identical traces evaluates to
/// one plus a few ulps in `f64`, which is rounding and not a broken estimate.
/// Anything past `1 + tolerance` is still rejected.
pub fn check_range(value: f64, tolerance: f64) -> Result<f64, SemblanceError> {
    if value >= 0.0 && value <= 1.0 {
        return Ok(value);
    }
    if value >= -tolerance && value <= 1.0 + tolerance {
        return Ok(value.clamp(0.0, 1.0));
    }
    Err(SemblanceError::OutOfRange { value, tolerance })
}

struct Accumulator {
    numerator: Vec<f64>,
    denominator: f64,
    stack: f64,
    contributing: usize,
}

impl Accumulator {
    fn new(window_len: usize) -> Self {
        Self {
            numerator: vec![0.0; window_len],
            denominator: 0.0,
            stack: 0.0,
            contributing: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemblanceEngine {
    azimuth: f64,
    max_misses: usize,
    tolerance: f64,
}

impl SemblanceEngine {
    pub fn new(azimuth: f64, max_misses: usize, tolerance: f64) -> Self {
        Self {
            azimuth,
            max_misses,
            tolerance,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.azimuth, config.max_misses, config.semblance_tolerance)
    }

    /// Semblance and stack of `gather` (and its neighbours) along the moveout
    /// `terms` for zero-offset time `t0`.
    pub fn compute(
        &self,
        gather: &Gather,
        neighbors: &[NeighborGather],
        terms: MoveoutTerms,
        t0: f64,
        window: &SemblanceWindow,
    ) -> Result<Semblance, SemblanceError> {
        let any_fits = std::iter::once(gather)
            .chain(neighbors.iter().map(|n| n.gather.as_ref()))
            .any(|g| window.fits(g.sample_count()));
        if !any_fits {
            return Ok(Semblance::NoData);
        }

        let mut acc = Accumulator::new(window.len());

        if !self.accumulate(&mut acc, gather, 0.0, terms, t0, window) {
            return Ok(Semblance::NoData);
        }

        for neighbor in neighbors {
            if !self.accumulate(&mut acc, &neighbor.gather, neighbor.displacement, terms, t0, window) {
                return Ok(Semblance::NoData);
            }
        }

        if acc.contributing == 0 || acc.denominator == 0.0 {
            return Ok(Semblance::NoData);
        }

        let n = acc.contributing as f64;
        let num: f64 = acc.numerator.iter().map(|v| v * v).sum();
        let value = check_range(num / (n * acc.denominator), self.tolerance)?;
        let stack = acc.stack / n / window.len() as f64;

        Ok(Semblance::Coherent { value, stack })
    }

    /// Adds every qualifying trace of `gather` to `acc`. Returns false once the
    /// miss limit is reached; misses are counted per gather.
    fn accumulate(
        &self,
        acc: &mut Accumulator,
        gather: &Gather,
        md: f64,
        terms: MoveoutTerms,
        t0: f64,
        window: &SemblanceWindow,
    ) -> bool {
        let w = window.half_width() as i64;
        let seg = window.seg();
        let mut misses = 0usize;

        for trace in gather.traces() {
            let h = half_offset(trace.header(), self.azimuth);
            let samples = trace.samples();
            let ns = samples.len() as i64;

            let hit = match terms.travel_time(t0, h, md) {
                Some(t) => {
                    let position = t / seg;
                    let sample = position as i64;
                    if sample - w >= 0 && sample + w < ns {
                        for j in 0..window.len() {
                            let k = (sample - w) as usize + j;
                            let x0 = samples[k] as f64;
                            let x1 = samples.get(k + 1).map(|&s| s as f64).unwrap_or(x0);
                            let y = position - w as f64 + j as f64;
                            let value = interpolate(x0, x1, y, k as f64, (k + 1) as f64);

                            acc.numerator[j] += value;
                            acc.denominator += value * value;
                            acc.stack += value;
                        }
                        acc.contributing += 1;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            };

            if !hit {
                misses += 1;
                if misses >= self.max_misses {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seismic::fixtures;
    use std::sync::Arc;

    // 15625 us = 2^-6 s, so sample times divide back to exact indices.
    const DT: u16 = 15625;
    const SEG: f64 = 0.015625;

    fn engine() -> SemblanceEngine {
        SemblanceEngine::new(0.0, 2, 1e-6)
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(interpolate(0.1, 0.7, 3.0, 3.0, 4.0), 0.1);
        assert_eq!(interpolate(0.1, 0.7, 4.0, 3.0, 4.0), 0.7);
        assert!((interpolate(0.0, 1.0, 3.25, 3.0, 4.0) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_window_length() {
        assert_eq!(SemblanceWindow::new(0.0, 0.004).unwrap().len(), 1);
        assert_eq!(SemblanceWindow::new(0.008, 0.004).unwrap().len(), 5);
        assert_eq!(SemblanceWindow::new(0.011, 0.004).unwrap().half_width(), 2);
        assert!(SemblanceWindow::new(0.01, 0.0).is_err());
        assert!(SemblanceWindow::new(-0.01, 0.004).is_err());
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        assert_eq!(SemblanceWindow::new(1e20, 0.004), Err(SemblanceError::InvalidWindow(1e20)));
        assert!(SemblanceWindow::new(f64::MAX, 1e-300).is_err());

        let widest = SemblanceWindow::new(MAX_HALF_WIDTH as f64 * SEG, SEG).unwrap();
        assert_eq!(widest.len(), u16::MAX as usize);
        assert!(SemblanceWindow::new((MAX_HALF_WIDTH + 1) as f64 * SEG, SEG).is_err());
    }

    #[test]
    fn test_window_longer_than_trace_is_no_data() {
        let gather = fixtures::flat_gather(1, 3, 8, 1.0);
        let window = SemblanceWindow::new(4.0 * SEG, SEG).unwrap();
        assert_eq!(window.len(), 9);
        assert!(!window.fits(gather.sample_count()));

        let terms = MoveoutTerms::hyperbolic(1e-6);
        for a in 0..8 {
            let result = engine().compute(&gather, &[], terms, a as f64 * SEG, &window).unwrap();
            assert_eq!(result, Semblance::NoData);
        }
    }

    #[test]
    fn test_check_range() {
        assert_eq!(check_range(0.5, 1e-6), Ok(0.5));
        assert_eq!(check_range(1.0 + 1e-9, 1e-6), Ok(1.0));
        assert!(check_range(1.0 + 2e-6, 1e-6).is_err());
        assert_eq!(check_range(-1e-9, 1e-6), Ok(0.0));
        assert!(check_range(-0.5, 1e-6).is_err());
        assert!(check_range(f64::NAN, 1e-6).is_err());
    }

    #[test]
    fn test_raw_ratio_above_one_is_rejected() {
        // (1 + 2 + 3)^2 / (1 + 4 + 9) from a squared-sum formulation.
        let err = check_range(36.0 / 14.0, 1e-6).unwrap_err();
        assert!(matches!(err, SemblanceError::OutOfRange { value, .. } if value > 2.5));
    }

    #[test]
    fn test_flat_zero_offset_gather_is_fully_coherent() {
        let gather = fixtures::flat_gather(1, 3, 50, 1.0);
        let window = SemblanceWindow::new(0.0, 0.004).unwrap();

        for velocity in [1500.0f64, 2000.0, 3500.0] {
            let terms = MoveoutTerms::hyperbolic(4.0 / (velocity * velocity));
            for a in [0usize, 10, 49] {
                let result = engine().compute(&gather, &[], terms, a as f64 * 0.004, &window).unwrap();
                assert_eq!(result, Semblance::Coherent { value: 1.0, stack: 1.0 });
            }
        }
    }

    #[test]
    fn test_single_trace_window() {
        let trace = fixtures::trace(1, 0, 0, DT, vec![1.0, 2.0, 3.0]);
        let gather = Gather::new(1, vec![trace]).unwrap();
        let window = SemblanceWindow::new(SEG, SEG).unwrap();
        assert_eq!(window.len(), 3);

        let result = engine()
            .compute(&gather, &[], MoveoutTerms::hyperbolic(1e-6), SEG, &window)
            .unwrap();
        match result {
            Semblance::Coherent { value, stack } => {
                assert_eq!(value, 1.0);
                assert_eq!(stack, 2.0);
            }
            Semblance::NoData => panic!("expected coherent result"),
        }
    }

    #[test]
    fn test_incoherent_traces() {
        let a = fixtures::trace(1, 0, 0, DT, vec![0.0, 1.0, 0.0, 0.0]);
        let b = fixtures::trace(1, 0, 0, DT, vec![0.0, -1.0, 0.0, 0.0]);
        let gather = Gather::new(1, vec![a, b]).unwrap();
        let window = SemblanceWindow::new(0.0, SEG).unwrap();

        let result = engine()
            .compute(&gather, &[], MoveoutTerms::hyperbolic(1e-6), SEG, &window)
            .unwrap();
        assert_eq!(result, Semblance::Coherent { value: 0.0, stack: 0.0 });
    }

    #[test]
    fn test_miss_limit() {
        let near = fixtures::trace_at(1, 0, 0, 0, DT, vec![1.0; 8]);
        let far_a = fixtures::trace_at(1, 0, 0, 10_000, DT, vec![1.0; 8]);
        let far_b = fixtures::trace_at(1, 0, 0, 12_000, DT, vec![1.0; 8]);
        let gather = Gather::new(1, vec![near, far_a, far_b]).unwrap();
        let window = SemblanceWindow::new(0.0, SEG).unwrap();
        let terms = MoveoutTerms::hyperbolic(4.0 / (2000.0 * 2000.0));

        let strict = engine().compute(&gather, &[], terms, 2.0 * SEG, &window).unwrap();
        assert!(strict.is_no_data());

        let lenient = SemblanceEngine::new(0.0, 3, 1e-6)
            .compute(&gather, &[], terms, 2.0 * SEG, &window)
            .unwrap();
        assert_eq!(lenient, Semblance::Coherent { value: 1.0, stack: 1.0 });
    }

    #[test]
    fn test_negative_radicand_counts_as_miss() {
        let gather = fixtures::flat_gather(1, 2, 8, 1.0);
        let window = SemblanceWindow::new(0.0, SEG).unwrap();
        let terms = MoveoutTerms { a: 0.0, b: -1.0, c: 0.0 };
        let neighbor = NeighborGather {
            gather: Arc::new(fixtures::flat_gather(2, 2, 8, 1.0)),
            displacement: 100.0,
        };

        let result = engine().compute(&gather, &[neighbor], terms, SEG, &window).unwrap();
        assert!(result.is_no_data());
    }

    #[test]
    fn test_neighbors_contribute() {
        let gather = fixtures::flat_gather(1, 2, 8, 1.0);
        let neighbor = NeighborGather {
            gather: Arc::new(fixtures::flat_gather(2, 2, 8, 3.0)),
            displacement: 25.0,
        };
        let window = SemblanceWindow::new(0.0, SEG).unwrap();
        let terms = MoveoutTerms::hyperbolic(1e-6);

        let result = engine().compute(&gather, &[neighbor], terms, 2.0 * SEG, &window).unwrap();
        // Four traces: 1, 1, 3, 3 -> (8^2) / (4 * 20) and stack 8 / 4.
        assert_eq!(result, Semblance::Coherent { value: 0.8, stack: 2.0 });
    }

    #[test]
    fn test_zero_energy_is_no_data() {
        let gather = fixtures::flat_gather(1, 3, 8, 0.0);
        let window = SemblanceWindow::new(0.0, SEG).unwrap();
        let result = engine()
            .compute(&gather, &[], MoveoutTerms::hyperbolic(1e-6), SEG, &window)
            .unwrap();
        assert_eq!(result, Semblance::NoData);
        assert_eq!(result.value(), 0.0);
    }

    #[test]
    fn test_nan_samples_are_rejected() {
        let gather = fixtures::flat_gather(1, 2, 8, f32::NAN);
        let window = SemblanceWindow::new(0.0, SEG).unwrap();
        let result = engine().compute(&gather, &[], MoveoutTerms::hyperbolic(1e-6), SEG, &window);
        assert!(matches!(result, Err(SemblanceError::OutOfRange { .. })));
    }
}
