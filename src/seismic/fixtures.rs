// Wed Jan 14 2026 - Alex

use crate::seismic::{Gather, Trace, TraceHeader};

/// Trace with its source at the origin and its receiver at `(dx, dy)`.
pub fn trace(cdp: i32, dx: i32, dy: i32, dt: u16, samples: Vec<f32>) -> Trace {
    let header = TraceHeader::new(cdp, dt, samples.len() as u16)
        .with_source(0, 0)
        .with_receiver(dx, dy);
    Trace::new(header, samples).unwrap()
}

/// Trace centred on `(mx, my)` with half-offset `h` along y.
pub fn trace_at(cdp: i32, mx: i32, my: i32, h: i32, dt: u16, samples: Vec<f32>) -> Trace {
    let header = TraceHeader::new(cdp, dt, samples.len() as u16)
        .with_source(mx, my - h)
        .with_receiver(mx, my + h);
    Trace::new(header, samples).unwrap()
}

pub fn flat_gather(cdp: i32, traces: usize, ns: usize, amplitude: f32) -> Gather {
    let traces = (0..traces).map(|_| trace(cdp, 0, 0, 4000, vec![amplitude; ns])).collect();
    Gather::new(cdp, traces).unwrap()
}

/// Gather with a hyperbolic event at `t0_sample` for velocity `velocity` on
/// traces with half-offsets `half_offsets`, plus a small deterministic ripple.
pub fn event_gather(cdp: i32, ns: usize, dt: u16, half_offsets: &[i32], velocity: f64, t0_sample: usize) -> Gather {
    let seg = dt as f64 / 1_000_000.0;
    let t0 = t0_sample as f64 * seg;
    let traces = half_offsets
        .iter()
        .enumerate()
        .map(|(i, &h)| {
            let hf = h as f64;
            let t = (t0 * t0 + 4.0 * hf * hf / (velocity * velocity)).sqrt();
            let center = t / seg;
            let samples = (0..ns)
                .map(|s| {
                    let d = s as f64 - center;
                    let ripple = 0.01 * (((s * 7 + i * 13) % 11) as f64 - 5.0);
                    ((-d * d / 2.0).exp() + ripple) as f32
                })
                .collect();
            trace_at(cdp, 0, 0, h, dt, samples)
        })
        .collect();
    Gather::new(cdp, traces).unwrap()
}
