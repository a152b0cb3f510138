// Wed Jan 14 2026 - Alex

use crate::seismic::error::SeismicError;

/// Size in bytes of a Seismic Unix trace header.
pub const HEADER_SIZE: usize = 240;

/// Trace header fields the scan needs, plus the raw header block the trace
/// was read from (empty for synthetic traces).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceHeader {
    pub cdp: i32,
    pub offset: i32,
    pub scalco: i16,
    pub sx: i32,
    pub sy: i32,
    pub gx: i32,
    pub gy: i32,
    /// Sample interval in microseconds.
    pub dt: u16,
    pub ns: u16,
    raw: Vec<u8>,
}

impl TraceHeader {
    pub fn new(cdp: i32, dt: u16, ns: u16) -> Self {
        Self {
            cdp,
            dt,
            ns,
            ..Default::default()
        }
    }

    pub fn with_scalco(mut self, scalco: i16) -> Self {
        self.scalco = scalco;
        self
    }

    pub fn with_source(mut self, sx: i32, sy: i32) -> Self {
        self.sx = sx;
        self.sy = sy;
        self
    }

    pub fn with_receiver(mut self, gx: i32, gy: i32) -> Self {
        self.gx = gx;
        self.gy = gy;
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_raw(mut self, raw: Vec<u8>) -> Self {
        self.raw = raw;
        self
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Multiplier applied to coordinates. Positive scalco multiplies, negative
    /// divides by its magnitude, zero leaves coordinates unscaled.
    pub fn scale_factor(&self) -> f64 {
        match self.scalco {
            s if s > 0 => s as f64,
            s if s < 0 => 1.0 / (s as f64).abs(),
            _ => 1.0,
        }
    }

    /// Scaled source-receiver midpoint.
    pub fn midpoint(&self) -> (f64, f64) {
        let scale = self.scale_factor();
        let mx = scale * (self.sx as f64 + self.gx as f64) / 2.0;
        let my = scale * (self.sy as f64 + self.gy as f64) / 2.0;
        (mx, my)
    }

    pub fn seconds_per_sample(&self) -> f64 {
        self.dt as f64 / 1_000_000.0
    }

    /// Header for a stacked output trace: offset cleared and both source and
    /// receiver moved onto the (unscaled, integer) midpoint.
    pub fn to_stacked(&self) -> TraceHeader {
        let mx = ((self.sx as i64 + self.gx as i64) / 2) as i32;
        let my = ((self.sy as i64 + self.gy as i64) / 2) as i32;

        let mut header = self.clone();
        header.offset = 0;
        header.sx = mx;
        header.sy = my;
        header.gx = mx;
        header.gy = my;
        header
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    header: TraceHeader,
    samples: Vec<f32>,
}

impl Trace {
    pub fn new(header: TraceHeader, samples: Vec<f32>) -> Result<Self, SeismicError> {
        if samples.len() != header.ns as usize {
            return Err(SeismicError::SampleCountMismatch {
                expected: header.ns as usize,
                actual: samples.len(),
            });
        }
        Ok(Self { header, samples })
    }

    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn cdp(&self) -> i32 {
        self.header.cdp
    }
}
