// Sun Jan 18 2026 - Alex

//! Binary records exchanged with an external execution collaborator.
//!
//! All numbers are big-endian and strings are NUL-terminated. Array lengths
//! are never prefixed; they follow from count fields earlier in the record.
//!
//! Work unit:
//! `tag, ordinal i32, cdp i32, start i32, count i32, gather, neighbours i32,
//! neighbours × (displacement f64, gather)`
//!
//! Gather block:
//! `cdp i32, ntraces i32, dt u16, ns u16, ntraces × (scalco i16, sx i32,
//! sy i32, gx i32, gy i32, ns × f32)`
//!
//! Partial result:
//! `tag, ordinal i32, cdp i32, start i32, count i32, count × (stack f32,
//! semblance f32, velocity f32)`

use crate::engine::result::{PartialResult, SampleResult};
use crate::engine::task::{UnitKey, WorkUnit};
use crate::seismic::{Gather, NeighborGather, Trace, TraceHeader};
use crate::wire::error::WireError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::sync::Arc;

pub const JOB_TAG: &str = "cmp-semblance";

const TRACE_FIXED_BYTES: usize = 2 + 4 * 4;

pub fn encode_unit(tag: &str, unit: &WorkUnit) -> Bytes {
    let key = unit.key();
    let mut buf = BytesMut::new();

    put_cstr(&mut buf, tag);
    buf.put_i32(unit.ordinal() as i32);
    buf.put_i32(key.cdp);
    buf.put_i32(key.start as i32);
    buf.put_i32(key.len() as i32);
    put_gather(&mut buf, unit.gather());

    buf.put_i32(unit.neighbors().len() as i32);
    for neighbor in unit.neighbors() {
        buf.put_f64(neighbor.displacement);
        put_gather(&mut buf, &neighbor.gather);
    }

    buf.freeze()
}

pub fn decode_unit(tag: &str, data: &[u8]) -> Result<WorkUnit, WireError> {
    let mut buf = data;

    check_tag(&mut buf, tag)?;
    let ordinal = get_count(&mut buf, "ordinal")?;
    let cdp = get_i32(&mut buf, "cdp")?;
    let start = get_count(&mut buf, "start")?;
    let count = get_count(&mut buf, "count")?;

    let gather = get_gather(&mut buf)?;
    if gather.cdp() != cdp {
        return Err(WireError::InvalidField {
            field: "gather cdp",
            value: gather.cdp() as i64,
        });
    }

    let neighbor_count = get_count(&mut buf, "neighbor count")?;
    let mut neighbors = Vec::with_capacity(neighbor_count.min(buf.remaining()));
    for _ in 0..neighbor_count {
        need(&buf, 8, "displacement")?;
        let displacement = buf.get_f64();
        neighbors.push(NeighborGather {
            gather: Arc::new(get_gather(&mut buf)?),
            displacement,
        });
    }

    finish(&buf)?;
    Ok(WorkUnit::new(ordinal, Arc::new(gather), start..start + count).with_neighbors(neighbors))
}

pub fn encode_partial(tag: &str, partial: &PartialResult) -> Bytes {
    let key = partial.key();
    let mut buf = BytesMut::with_capacity(tag.len() + 1 + 16 + partial.len() * 12);

    put_cstr(&mut buf, tag);
    buf.put_i32(partial.ordinal() as i32);
    buf.put_i32(key.cdp);
    buf.put_i32(key.start as i32);
    buf.put_i32(partial.len() as i32);
    for sample in partial.iter() {
        buf.put_f32(sample.stack);
        buf.put_f32(sample.semblance);
        buf.put_f32(sample.velocity);
    }

    buf.freeze()
}

pub fn decode_partial(tag: &str, data: &[u8]) -> Result<PartialResult, WireError> {
    let mut buf = data;

    check_tag(&mut buf, tag)?;
    let ordinal = get_count(&mut buf, "ordinal")?;
    let cdp = get_i32(&mut buf, "cdp")?;
    let start = get_count(&mut buf, "start")?;
    let count = get_count(&mut buf, "count")?;

    need(&buf, count.saturating_mul(12), "samples")?;
    let key = UnitKey::new(cdp, start, start + count);
    let mut partial = PartialResult::new(ordinal, key);
    for _ in 0..count {
        partial.push(SampleResult {
            stack: buf.get_f32(),
            semblance: buf.get_f32(),
            velocity: buf.get_f32(),
        });
    }

    finish(&buf)?;
    Ok(partial)
}

fn put_cstr(buf: &mut BytesMut, value: &str) {
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
}

fn put_gather(buf: &mut BytesMut, gather: &Gather) {
    buf.put_i32(gather.cdp());
    buf.put_i32(gather.len() as i32);
    buf.put_u16(gather.dt());
    buf.put_u16(gather.sample_count() as u16);

    for trace in gather.traces() {
        let header = trace.header();
        buf.put_i16(header.scalco);
        buf.put_i32(header.sx);
        buf.put_i32(header.sy);
        buf.put_i32(header.gx);
        buf.put_i32(header.gy);
        for &sample in trace.samples() {
            buf.put_f32(sample);
        }
    }
}

fn get_gather(buf: &mut &[u8]) -> Result<Gather, WireError> {
    let cdp = get_i32(buf, "gather cdp")?;
    let ntraces = get_count(buf, "trace count")?;
    need(buf, 4, "dt/ns")?;
    let dt = buf.get_u16();
    let ns = buf.get_u16();

    let trace_bytes = TRACE_FIXED_BYTES + ns as usize * 4;
    need(buf, ntraces.saturating_mul(trace_bytes), "traces")?;

    let mut traces = Vec::with_capacity(ntraces);
    for _ in 0..ntraces {
        let header = TraceHeader::new(cdp, dt, ns)
            .with_scalco(buf.get_i16())
            .with_source(buf.get_i32(), buf.get_i32())
            .with_receiver(buf.get_i32(), buf.get_i32());
        let samples = (0..ns).map(|_| buf.get_f32()).collect();
        traces.push(Trace::new(header, samples)?);
    }

    Ok(Gather::new(cdp, traces)?)
}

fn check_tag(buf: &mut &[u8], expected: &str) -> Result<(), WireError> {
    let found = get_cstr(buf, "tag")?;
    if found != expected {
        return Err(WireError::TagMismatch {
            expected: expected.to_string(),
            found,
        });
    }
    Ok(())
}

fn get_cstr(buf: &mut &[u8], field: &'static str) -> Result<String, WireError> {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(WireError::UnterminatedString(field))?;
    let value = std::str::from_utf8(&buf[..end])
        .map_err(|_| WireError::InvalidString(field))?
        .to_string();
    buf.advance(end + 1);
    Ok(value)
}

fn need(buf: &&[u8], needed: usize, field: &'static str) -> Result<(), WireError> {
    if buf.remaining() < needed {
        return Err(WireError::Truncated {
            field,
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn get_i32(buf: &mut &[u8], field: &'static str) -> Result<i32, WireError> {
    need(buf, 4, field)?;
    Ok(buf.get_i32())
}

/// Non-negative i32 field used as a count, index or offset.
fn get_count(buf: &mut &[u8], field: &'static str) -> Result<usize, WireError> {
    let value = get_i32(buf, field)?;
    usize::try_from(value).map_err(|_| WireError::InvalidField {
        field,
        value: value as i64,
    })
}

fn finish(buf: &&[u8]) -> Result<(), WireError> {
    match buf.remaining() {
        0 => Ok(()),
        n => Err(WireError::TrailingBytes(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::engine::scanner::VelocityScanner;
    use crate::seismic::fixtures;

    fn unit() -> WorkUnit {
        let gather = Arc::new(fixtures::event_gather(21, 60, 4000, &[0, 120, 240], 2200.0, 20));
        let neighbor = NeighborGather {
            gather: Arc::new(fixtures::event_gather(22, 60, 4000, &[60, 180], 2200.0, 20)),
            displacement: 12.5,
        };
        WorkUnit::new(3, gather, 10..40).with_neighbors(vec![neighbor])
    }

    #[test]
    fn test_unit_layout_is_big_endian() {
        let bytes = encode_unit("job", &unit());
        assert_eq!(&bytes[..4], b"job\0");
        assert_eq!(&bytes[4..8], &3i32.to_be_bytes());
        assert_eq!(&bytes[8..12], &21i32.to_be_bytes());
        assert_eq!(&bytes[12..16], &10i32.to_be_bytes());
        assert_eq!(&bytes[16..20], &30i32.to_be_bytes());
        // Gather block: cdp, ntraces, dt, ns.
        assert_eq!(&bytes[20..24], &21i32.to_be_bytes());
        assert_eq!(&bytes[24..28], &3i32.to_be_bytes());
        assert_eq!(&bytes[28..30], &4000u16.to_be_bytes());
        assert_eq!(&bytes[30..32], &60u16.to_be_bytes());
    }

    #[test]
    fn test_decoded_unit_scans_identically() {
        let original = unit();
        let decoded = decode_unit(JOB_TAG, &encode_unit(JOB_TAG, &original)).unwrap();

        assert_eq!(decoded.key(), original.key());
        assert_eq!(decoded.ordinal(), 3);
        assert_eq!(decoded.gather(), original.gather());
        assert_eq!(decoded.neighbors().len(), 1);
        assert_eq!(decoded.neighbors()[0].displacement, 12.5);

        let config = Arc::new(ScanConfig::new().with_velocities(1500.0, 3000.0, 15));
        let scanner = VelocityScanner::new(config).unwrap();
        assert_eq!(scanner.process(&decoded).unwrap(), scanner.process(&original).unwrap());
    }

    #[test]
    fn test_partial_result_record() {
        let key = UnitKey::new(8, 500, 502);
        let samples = vec![
            SampleResult { stack: 0.5, semblance: 0.25, velocity: 2000.0 },
            SampleResult { stack: -1.0, semblance: 0.0, velocity: 0.0 },
        ];
        let partial = PartialResult::from_samples(1, key, samples);
        let bytes = encode_partial(JOB_TAG, &partial);
        assert_eq!(bytes.len(), JOB_TAG.len() + 1 + 16 + 24);

        let decoded = decode_partial(JOB_TAG, &bytes).unwrap();
        assert_eq!(decoded, partial);
    }

    #[test]
    fn test_truncated_records_are_rejected() {
        let bytes = encode_unit(JOB_TAG, &unit());
        for cut in [0, 5, JOB_TAG.len() + 10, bytes.len() / 2, bytes.len() - 1] {
            assert!(decode_unit(JOB_TAG, &bytes[..cut]).is_err(), "cut at {}", cut);
        }

        let partial = PartialResult::from_samples(0, UnitKey::new(1, 0, 1), vec![SampleResult {
            stack: 1.0,
            semblance: 1.0,
            velocity: 1.0,
        }]);
        let bytes = encode_partial(JOB_TAG, &partial);
        assert!(matches!(
            decode_partial(JOB_TAG, &bytes[..bytes.len() - 4]),
            Err(WireError::Truncated { field: "samples", .. })
        ));
    }

    #[test]
    fn test_tag_and_trailing_bytes() {
        let bytes = encode_partial("other", &PartialResult::new(0, UnitKey::new(1, 0, 0)));
        assert!(matches!(decode_partial(JOB_TAG, &bytes), Err(WireError::TagMismatch { .. })));

        let mut extended = encode_partial(JOB_TAG, &PartialResult::new(0, UnitKey::new(1, 0, 0))).to_vec();
        extended.push(7);
        assert!(matches!(decode_partial(JOB_TAG, &extended), Err(WireError::TrailingBytes(1))));
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let mut buf = BytesMut::new();
        put_cstr(&mut buf, JOB_TAG);
        buf.put_i32(0);
        buf.put_i32(1);
        buf.put_i32(0);
        buf.put_i32(-4);
        assert!(matches!(
            decode_partial(JOB_TAG, &buf),
            Err(WireError::InvalidField { field: "count", value: -4 })
        ));
    }
}
