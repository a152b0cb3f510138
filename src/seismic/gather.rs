// Wed Jan 14 2026 - Alex

use crate::config::ScanConfig;
use crate::moveout::{half_offset, project};
use crate::seismic::error::SeismicError;
use crate::seismic::trace::Trace;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Trace ensemble of one common midpoint. Owns its traces; all of them share
/// the sample count and sample interval of the first trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Gather {
    cdp: i32,
    traces: Vec<Trace>,
}

impl Gather {
    pub fn new(cdp: i32, traces: Vec<Trace>) -> Result<Self, SeismicError> {
        let first = traces.first().ok_or(SeismicError::EmptyGather(cdp))?;
        let ns = first.header().ns;
        let dt = first.header().dt;

        if ns == 0 {
            return Err(SeismicError::InconsistentGather {
                cdp,
                reason: "traces have no samples".to_string(),
            });
        }

        for (i, trace) in traces.iter().enumerate() {
            if trace.header().ns != ns || trace.header().dt != dt {
                return Err(SeismicError::InconsistentGather {
                    cdp,
                    reason: format!(
                        "trace {} has ns={} dt={}, expected ns={} dt={}",
                        i,
                        trace.header().ns,
                        trace.header().dt,
                        ns,
                        dt
                    ),
                });
            }
        }

        Ok(Self { cdp, traces })
    }

    pub fn cdp(&self) -> i32 {
        self.cdp
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// First trace of the gather. Its samples seed the zero-velocity stack and
    /// its header is the template for output traces.
    pub fn reference_trace(&self) -> &Trace {
        &self.traces[0]
    }

    pub fn sample_count(&self) -> usize {
        self.reference_trace().sample_count()
    }

    pub fn dt(&self) -> u16 {
        self.reference_trace().header().dt
    }

    pub fn seconds_per_sample(&self) -> f64 {
        self.reference_trace().header().seconds_per_sample()
    }

    /// Midpoint of the reference trace projected onto the scan azimuth.
    pub fn projected_midpoint(&self, azimuth: f64) -> f64 {
        let (mx, my) = self.reference_trace().header().midpoint();
        project(mx, my, azimuth)
    }
}

/// A gather stacked alongside a primary one, with its midpoint displacement
/// relative to the primary. Shared, never owned by the primary.
#[derive(Debug, Clone)]
pub struct NeighborGather {
    pub gather: Arc<Gather>,
    pub displacement: f64,
}

/// All gathers of a job in increasing CDP order, with optional neighbour
/// associations for wide-azimuth stacking.
#[derive(Debug, Clone, Default)]
pub struct GatherSet {
    gathers: Vec<Arc<Gather>>,
    neighbors: Vec<Vec<NeighborGather>>,
}

impl GatherSet {
    /// Sorts by CDP. Every CDP may appear only once, since output cells are
    /// addressed by CDP.
    pub fn new(mut gathers: Vec<Gather>) -> Result<Self, SeismicError> {
        gathers.sort_by_key(|g| g.cdp());
        if let Some(pair) = gathers.windows(2).find(|pair| pair[0].cdp() == pair[1].cdp()) {
            return Err(SeismicError::DuplicateCdp(pair[0].cdp()));
        }

        let neighbors = vec![Vec::new(); gathers.len()];
        Ok(Self {
            gathers: gathers.into_iter().map(Arc::new).collect(),
            neighbors,
        })
    }

    /// Groups traces by CDP, drops traces outside the aperture, associates
    /// neighbours and finally restricts to the target CDP when one is set.
    pub fn from_traces(traces: Vec<Trace>, config: &ScanConfig) -> Result<Self, SeismicError> {
        let mut groups: BTreeMap<i32, Vec<Trace>> = BTreeMap::new();
        let mut excluded = 0usize;

        for trace in traces {
            if config.aperture > 0.0 && half_offset(trace.header(), config.azimuth).abs() > config.aperture {
                excluded += 1;
                continue;
            }
            groups.entry(trace.cdp()).or_default().push(trace);
        }

        if excluded > 0 {
            log::debug!("Excluded {} traces outside aperture {}", excluded, config.aperture);
        }

        let gathers = groups
            .into_iter()
            .map(|(cdp, traces)| Gather::new(cdp, traces))
            .collect::<Result<Vec<_>, _>>()?;

        if gathers.is_empty() {
            return Err(SeismicError::NoGathers);
        }

        let mut set = Self::new(gathers)?;

        if let Some(radius) = config.neighbor_radius {
            set.associate_neighbors(radius, config.azimuth);
        }

        if let Some(cdp) = config.target_cdp {
            set = set.restrict_to(cdp)?;
        }

        log::info!("Built {} gathers", set.len());
        Ok(set)
    }

    /// Links every gather to the others whose projected midpoint lies within `radius`.
    pub fn associate_neighbors(&mut self, radius: f64, azimuth: f64) {
        let midpoints: Vec<f64> = self.gathers.iter().map(|g| g.projected_midpoint(azimuth)).collect();

        for (i, own) in midpoints.iter().enumerate() {
            let list: Vec<NeighborGather> = midpoints
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && (other - own).abs() <= radius)
                .map(|(j, other)| NeighborGather {
                    gather: Arc::clone(&self.gathers[j]),
                    displacement: other - own,
                })
                .collect();
            self.neighbors[i] = list;
        }
    }

    fn restrict_to(self, cdp: i32) -> Result<Self, SeismicError> {
        let position = self
            .gathers
            .iter()
            .position(|g| g.cdp() == cdp)
            .ok_or(SeismicError::TargetNotFound(cdp))?;

        let mut gathers = self.gathers;
        let mut neighbors = self.neighbors;
        Ok(Self {
            gathers: vec![gathers.swap_remove(position)],
            neighbors: vec![neighbors.swap_remove(position)],
        })
    }

    pub fn gathers(&self) -> &[Arc<Gather>] {
        &self.gathers
    }

    pub fn get(&self, ordinal: usize) -> Option<&Arc<Gather>> {
        self.gathers.get(ordinal)
    }

    pub fn neighbors(&self, ordinal: usize) -> &[NeighborGather] {
        self.neighbors.get(ordinal).map(|n| n.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.gathers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gathers.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.gathers.iter().map(|g| g.sample_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seismic::fixtures;
    use crate::seismic::TraceHeader;

    #[test]
    fn test_gather_rejects_empty_and_mixed_traces() {
        assert!(matches!(Gather::new(3, Vec::new()), Err(SeismicError::EmptyGather(3))));

        let a = Trace::new(TraceHeader::new(3, 4000, 4), vec![0.0; 4]).unwrap();
        let b = Trace::new(TraceHeader::new(3, 2000, 4), vec![0.0; 4]).unwrap();
        assert!(matches!(
            Gather::new(3, vec![a, b]),
            Err(SeismicError::InconsistentGather { cdp: 3, .. })
        ));
    }

    #[test]
    fn test_gather_set_rejects_duplicate_cdp() {
        let set = GatherSet::new(vec![
            fixtures::flat_gather(5, 1, 4, 1.0),
            fixtures::flat_gather(2, 1, 4, 1.0),
            fixtures::flat_gather(5, 2, 4, 1.0),
        ]);
        assert!(matches!(set, Err(SeismicError::DuplicateCdp(5))));

        let set = GatherSet::new(vec![fixtures::flat_gather(5, 1, 4, 1.0), fixtures::flat_gather(2, 1, 4, 1.0)]).unwrap();
        let cdps: Vec<i32> = set.gathers().iter().map(|g| g.cdp()).collect();
        assert_eq!(cdps, vec![2, 5]);
    }

    #[test]
    fn test_from_traces_groups_in_cdp_order() {
        let traces = vec![
            fixtures::trace(20, 0, 0, 4000, vec![1.0; 8]),
            fixtures::trace(10, 0, 0, 4000, vec![1.0; 8]),
            fixtures::trace(20, 50, 0, 4000, vec![1.0; 8]),
        ];
        let set = GatherSet::from_traces(traces, &ScanConfig::default()).unwrap();
        let cdps: Vec<i32> = set.gathers().iter().map(|g| g.cdp()).collect();
        assert_eq!(cdps, vec![10, 20]);
        assert_eq!(set.gathers()[1].len(), 2);
        assert_eq!(set.total_samples(), 16);
    }

    #[test]
    fn test_aperture_excludes_far_traces() {
        let traces = vec![
            fixtures::trace(1, 0, 0, 4000, vec![1.0; 8]),
            fixtures::trace(1, 0, 1000, 4000, vec![1.0; 8]),
        ];
        let config = ScanConfig::default().with_aperture(100.0);
        let set = GatherSet::from_traces(traces, &config).unwrap();
        assert_eq!(set.gathers()[0].len(), 1);
    }

    #[test]
    fn test_target_cdp() {
        let traces = vec![
            fixtures::trace(1, 0, 0, 4000, vec![1.0; 8]),
            fixtures::trace(2, 0, 0, 4000, vec![1.0; 8]),
        ];
        let set = GatherSet::from_traces(traces.clone(), &ScanConfig::default().with_target_cdp(2)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.gathers()[0].cdp(), 2);

        let missing = GatherSet::from_traces(traces, &ScanConfig::default().with_target_cdp(9));
        assert!(matches!(missing, Err(SeismicError::TargetNotFound(9))));
    }

    #[test]
    fn test_neighbor_association() {
        let traces = vec![
            fixtures::trace_at(1, 0, 0, 0, 4000, vec![1.0; 8]),
            fixtures::trace_at(2, 0, 10, 0, 4000, vec![1.0; 8]),
            fixtures::trace_at(3, 0, 100, 0, 4000, vec![1.0; 8]),
        ];
        let config = ScanConfig::default().with_neighbor_radius(20.0);
        let set = GatherSet::from_traces(traces, &config).unwrap();

        assert_eq!(set.neighbors(0).len(), 1);
        assert_eq!(set.neighbors(0)[0].gather.cdp(), 2);
        assert_eq!(set.neighbors(0)[0].displacement, 10.0);
        assert_eq!(set.neighbors(1)[0].displacement, -10.0);
        assert!(set.neighbors(2).is_empty());
    }
}
