// Wed Jan 14 2026 - Alex

use crate::seismic::TraceHeader;

/// Coefficients of the moveout surface `sqrt((t0 + A·md)² + B·md² + C·h²)`.
///
/// `a` and `b` are the cross-dip terms used when neighbouring midpoints are
/// stacked together; a plain CMP scan leaves both at zero and `c = 4/v²`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveoutTerms {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl MoveoutTerms {
    pub fn hyperbolic(c: f64) -> Self {
        Self { a: 0.0, b: 0.0, c }
    }

    pub fn travel_time(&self, t0: f64, h: f64, md: f64) -> Option<f64> {
        travel_time(self.a, self.b, self.c, t0, h, md)
    }
}

/// Two-way travel time for zero-offset time `t0`, half-offset `h` and
/// midpoint displacement `md`. `None` when the radicand is negative.
pub fn travel_time(a: f64, b: f64, c: f64, t0: f64, h: f64, md: f64) -> Option<f64> {
    let shifted = t0 + a * md;
    let radicand = shifted * shifted + b * md * md + c * h * h;
    if radicand < 0.0 {
        return None;
    }
    Some(radicand.sqrt())
}

/// Projection of a horizontal vector onto the scan azimuth.
pub fn project(x: f64, y: f64, azimuth: f64) -> f64 {
    x * azimuth.sin() + y * azimuth.cos()
}

/// Half source-receiver offset of a trace, scaled by its coordinate scale
/// code and projected onto the scan azimuth.
pub fn half_offset(header: &TraceHeader, azimuth: f64) -> f64 {
    let scale = header.scale_factor();
    let hx = scale * (header.gx as f64 - header.sx as f64) / 2.0;
    let hy = scale * (header.gy as f64 - header.sy as f64) / 2.0;
    project(hx, hy, azimuth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_zero_offset_returns_t0() {
        for &t0 in &[0.0, 0.004, 0.5, 1.234, 3.0] {
            assert_eq!(travel_time(0.0, 0.0, 4.0 / (2000.0 * 2000.0), t0, 0.0, 0.0), Some(t0));
        }
    }

    #[test]
    fn test_hyperbolic_moveout() {
        let v: f64 = 2000.0;
        let c = 4.0 / (v * v);
        let t = travel_time(0.0, 0.0, c, 1.0, 1000.0, 0.0).unwrap();
        assert!((t - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_negative_radicand_has_no_solution() {
        assert_eq!(travel_time(0.0, -1.0, 0.0, 0.0, 0.0, 2.0), None);
        assert_eq!(MoveoutTerms { a: 0.0, b: 0.0, c: -1.0 }.travel_time(0.1, 10.0, 0.0), None);
    }

    #[test]
    fn test_half_offset_scaling() {
        let base = TraceHeader::new(1, 4000, 10).with_source(0, 0).with_receiver(0, 200);

        let unscaled = half_offset(&base, 0.0);
        let scale_one = half_offset(&base.clone().with_scalco(1), 0.0);
        assert_eq!(unscaled, 100.0);
        assert_eq!(unscaled, scale_one);

        assert_eq!(half_offset(&base.clone().with_scalco(10), 0.0), 1000.0);
        assert_eq!(half_offset(&base.clone().with_scalco(-10), 0.0), 10.0);
    }

    #[test]
    fn test_half_offset_projection() {
        let header = TraceHeader::new(1, 4000, 10).with_source(0, 0).with_receiver(200, 0);
        assert!(half_offset(&header, 0.0).abs() < 1e-12);
        assert!((half_offset(&header, FRAC_PI_2) - 100.0).abs() < 1e-9);
    }
}
