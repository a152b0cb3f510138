// Thu Jan 15 2026 - Alex

use crate::seismic::error::SeismicError;
use crate::seismic::trace::{Trace, TraceHeader, HEADER_SIZE};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CDP: usize = 20;
const OFFSET: usize = 36;
const SCALCO: usize = 70;
const SX: usize = 72;
const SY: usize = 76;
const GX: usize = 80;
const GY: usize = 84;
const NS: usize = 114;
const DT: usize = 116;

/// Reader for little-endian Seismic Unix files.
pub struct SuReader {
    mmap: Mmap,
}

impl SuReader {
    pub fn open(path: &Path) -> Result<Self, SeismicError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives no longer than the reader.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }

    pub fn read_traces(&self) -> Result<Vec<Trace>, SeismicError> {
        parse_traces(&self.mmap)
    }

    pub fn len_bytes(&self) -> usize {
        self.mmap.len()
    }
}

pub fn parse_traces(data: &[u8]) -> Result<Vec<Trace>, SeismicError> {
    let mut traces = Vec::new();
    let mut offset = 0usize;

    while offset < data.len() {
        let index = traces.len();
        let header_end = offset + HEADER_SIZE;
        let raw = data
            .get(offset..header_end)
            .ok_or(SeismicError::Truncated { index, offset })?;

        let header = parse_header(raw);
        if header.ns == 0 {
            return Err(SeismicError::EmptyTrace(index));
        }

        let data_end = header_end + header.ns as usize * 4;
        let body = data
            .get(header_end..data_end)
            .ok_or(SeismicError::Truncated { index, offset: header_end })?;

        let samples = body
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        traces.push(Trace::new(header, samples)?);
        offset = data_end;
    }

    log::debug!("Parsed {} traces ({} bytes)", traces.len(), data.len());
    Ok(traces)
}

fn parse_header(raw: &[u8]) -> TraceHeader {
    let i32_at = |at: usize| i32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
    let i16_at = |at: usize| i16::from_le_bytes([raw[at], raw[at + 1]]);
    let u16_at = |at: usize| u16::from_le_bytes([raw[at], raw[at + 1]]);

    TraceHeader::new(i32_at(CDP), u16_at(DT), u16_at(NS))
        .with_offset(i32_at(OFFSET))
        .with_scalco(i16_at(SCALCO))
        .with_source(i32_at(SX), i32_at(SY))
        .with_receiver(i32_at(GX), i32_at(GY))
        .with_raw(raw.to_vec())
}

/// Header block for `header`: the original bytes when available, with the
/// known fields written over them.
pub fn encode_header(header: &TraceHeader) -> [u8; HEADER_SIZE] {
    let mut block = [0u8; HEADER_SIZE];
    if header.raw().len() == HEADER_SIZE {
        block.copy_from_slice(header.raw());
    }

    block[CDP..CDP + 4].copy_from_slice(&header.cdp.to_le_bytes());
    block[OFFSET..OFFSET + 4].copy_from_slice(&header.offset.to_le_bytes());
    block[SCALCO..SCALCO + 2].copy_from_slice(&header.scalco.to_le_bytes());
    block[SX..SX + 4].copy_from_slice(&header.sx.to_le_bytes());
    block[SY..SY + 4].copy_from_slice(&header.sy.to_le_bytes());
    block[GX..GX + 4].copy_from_slice(&header.gx.to_le_bytes());
    block[GY..GY + 4].copy_from_slice(&header.gy.to_le_bytes());
    block[NS..NS + 2].copy_from_slice(&header.ns.to_le_bytes());
    block[DT..DT + 2].copy_from_slice(&header.dt.to_le_bytes());
    block
}

pub struct SuWriter<W: Write> {
    writer: W,
    written: usize,
}

impl SuWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, SeismicError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SuWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn write_trace(&mut self, header: &TraceHeader, samples: &[f32]) -> Result<(), SeismicError> {
        if samples.len() != header.ns as usize {
            return Err(SeismicError::SampleCountMismatch {
                expected: header.ns as usize,
                actual: samples.len(),
            });
        }

        self.writer.write_all(&encode_header(header))?;
        for sample in samples {
            self.writer.write_all(&sample.to_le_bytes())?;
        }
        self.written += 1;
        Ok(())
    }

    pub fn traces_written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W, SeismicError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
