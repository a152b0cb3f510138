// Sun Jan 18 2026 - Alex

use crate::orchestration::aggregator::{CommittedCubes, CubeKind};
use crate::orchestration::error::AggregationError;
use crate::seismic::{GatherSet, SeismicError, SuWriter, TraceHeader};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes committed cubes as three SU files next to each other:
/// `<stem>-stack.su`, `<stem>-semblance.su` and `<stem>-velocity.su`.
pub struct OutputFinalizer {
    stem: PathBuf,
}

impl OutputFinalizer {
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        Self { stem: stem.into() }
    }

    pub fn path_for(&self, kind: CubeKind) -> PathBuf {
        let mut name = self
            .stem
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!("-{}.su", kind.name()));
        self.stem.with_file_name(name)
    }

    pub fn finalize(&self, gathers: &GatherSet, cubes: &CommittedCubes) -> Result<Vec<PathBuf>, AggregationError> {
        let headers = output_headers(gathers, cubes)?;
        let mut written = Vec::with_capacity(CubeKind::ALL.len());

        for kind in CubeKind::ALL {
            let path = self.path_for(kind);
            let writer = SuWriter::create(&path)?;
            write_cube(writer, &headers, cubes, kind)?;
            log::info!("Wrote {} cube to {}", kind.name(), path.display());
            written.push(path);
        }

        Ok(written)
    }
}

/// One header per gather: the reference trace header with its geometry
/// collapsed onto the midpoint.
pub fn output_headers(gathers: &GatherSet, cubes: &CommittedCubes) -> Result<Vec<TraceHeader>, AggregationError> {
    if gathers.len() != cubes.gather_count() {
        return Err(AggregationError::Output(SeismicError::ShapeMismatch(format!(
            "{} gathers but {} committed traces",
            gathers.len(),
            cubes.gather_count()
        ))));
    }

    gathers
        .gathers()
        .iter()
        .zip(cubes.cdps())
        .map(|(gather, &cdp)| {
            if gather.cdp() != cdp {
                return Err(AggregationError::Output(SeismicError::ShapeMismatch(format!(
                    "gather cdp {} does not match committed cdp {}",
                    gather.cdp(),
                    cdp
                ))));
            }
            Ok(gather.reference_trace().header().to_stacked())
        })
        .collect()
}

pub fn write_cube<W: Write>(
    mut writer: SuWriter<W>,
    headers: &[TraceHeader],
    cubes: &CommittedCubes,
    kind: CubeKind,
) -> Result<W, SeismicError> {
    for (g, header) in headers.iter().enumerate() {
        let samples = cubes
            .trace(kind, g)
            .ok_or_else(|| SeismicError::ShapeMismatch(format!("no {} trace for gather {}", kind.name(), g)))?;
        writer.write_trace(header, samples)?;
    }
    writer.finish()
}

pub fn default_stem(input: &Path) -> PathBuf {
    input.with_extension("")
}
