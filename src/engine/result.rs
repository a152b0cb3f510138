// Fri Jan 16 2026 - Alex

use crate::engine::error::ScanError;
use crate::engine::task::UnitKey;
use std::time::Duration;

/// Best stack, semblance and velocity of one time sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResult {
    pub stack: f32,
    pub semblance: f32,
    pub velocity: f32,
}

/// Scan output for one work unit, as parallel arrays over its sample range.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialResult {
    ordinal: usize,
    key: UnitKey,
    stack: Vec<f32>,
    semblance: Vec<f32>,
    velocity: Vec<f32>,
}

impl PartialResult {
    pub fn new(ordinal: usize, key: UnitKey) -> Self {
        Self {
            ordinal,
            key,
            stack: Vec::with_capacity(key.len()),
            semblance: Vec::with_capacity(key.len()),
            velocity: Vec::with_capacity(key.len()),
        }
    }

    pub fn from_samples(ordinal: usize, key: UnitKey, samples: impl IntoIterator<Item = SampleResult>) -> Self {
        let mut result = Self::new(ordinal, key);
        for sample in samples {
            result.push(sample);
        }
        result
    }

    pub fn push(&mut self, sample: SampleResult) {
        self.stack.push(sample.stack);
        self.semblance.push(sample.semblance);
        self.velocity.push(sample.velocity);
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn key(&self) -> UnitKey {
        self.key
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn stack(&self) -> &[f32] {
        &self.stack
    }

    pub fn semblance(&self) -> &[f32] {
        &self.semblance
    }

    pub fn velocity(&self) -> &[f32] {
        &self.velocity
    }

    /// Entry `i` of the unit, i.e. sample `key.start + i` of the gather.
    pub fn get(&self, i: usize) -> Option<SampleResult> {
        Some(SampleResult {
            stack: *self.stack.get(i)?,
            semblance: *self.semblance.get(i)?,
            velocity: *self.velocity.get(i)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SampleResult> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    Success(PartialResult),
    Failed(ScanError),
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TaskResult::Failed(_))
    }

    pub fn error(&self) -> Option<&ScanError> {
        match self {
            TaskResult::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskResultWithMetadata {
    pub result: TaskResult,
    pub key: UnitKey,
    pub worker_id: usize,
    pub duration: Duration,
    pub attempt: u32,
}

impl TaskResultWithMetadata {
    pub fn new(result: TaskResult, key: UnitKey, worker_id: usize, duration: Duration) -> Self {
        Self {
            result,
            key,
            worker_id,
            duration,
            attempt: 0,
        }
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }
}

/// Bookkeeping for a whole scan job.
#[derive(Debug, Clone, Default)]
pub struct JobStatistics {
    pub units: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub retry_count: usize,
    pub discarded_count: usize,
    pub samples: usize,
    pub total_duration: Duration,
    pub slowest: Option<(UnitKey, Duration)>,
}

impl JobStatistics {
    pub fn new(units: usize) -> Self {
        Self {
            units,
            ..Default::default()
        }
    }

    pub fn record(&mut self, result: &TaskResultWithMetadata) {
        self.total_duration += result.duration;

        match &result.result {
            TaskResult::Success(partial) => {
                self.success_count += 1;
                self.samples += partial.len();
            }
            TaskResult::Failed(_) => {
                self.error_count += 1;
            }
        }

        let slower = match self.slowest {
            Some((_, d)) => result.duration > d,
            None => true,
        };
        if slower {
            self.slowest = Some((result.key, result.duration));
        }
    }

    pub fn record_retry(&mut self) {
        self.retry_count += 1;
    }

    pub fn record_discard(&mut self) {
        self.discarded_count += 1;
    }

    pub fn success_rate(&self) -> f64 {
        let finished = self.success_count + self.error_count;
        if finished == 0 {
            0.0
        } else {
            self.success_count as f64 / finished as f64
        }
    }

    pub fn average_duration(&self) -> Duration {
        let finished = self.success_count + self.error_count;
        if finished == 0 {
            Duration::ZERO
        } else {
            self.total_duration / finished as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(v: f32) -> SampleResult {
        SampleResult {
            stack: v,
            semblance: v / 10.0,
            velocity: v * 100.0,
        }
    }

    #[test]
    fn test_partial_result_parallel_arrays() {
        let key = UnitKey::new(1, 10, 13);
        let partial = PartialResult::from_samples(0, key, vec![sample(1.0), sample(2.0), sample(3.0)]);
        assert_eq!(partial.len(), 3);
        assert_eq!(partial.stack(), &[1.0, 2.0, 3.0]);
        assert_eq!(partial.velocity(), &[100.0, 200.0, 300.0]);
        assert_eq!(partial.get(1), Some(sample(2.0)));
        assert_eq!(partial.get(3), None);
        assert_eq!(partial.iter().count(), 3);
    }

    #[test]
    fn test_statistics() {
        let key = UnitKey::new(1, 0, 2);
        let ok = TaskResultWithMetadata::new(
            TaskResult::Success(PartialResult::from_samples(0, key, vec![sample(1.0), sample(2.0)])),
            key,
            0,
            Duration::from_millis(30),
        );
        let failed = TaskResultWithMetadata::new(
            TaskResult::Failed(ScanError::RangeOutOfBounds { key, ns: 1 }),
            key,
            1,
            Duration::from_millis(10),
        );

        let mut stats = JobStatistics::new(2);
        stats.record(&ok);
        stats.record(&failed);
        stats.record_retry();

        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.retry_count, 1);
        assert_eq!(stats.success_rate(), 0.5);
        assert_eq!(stats.average_duration(), Duration::from_millis(20));
        assert_eq!(stats.slowest, Some((key, Duration::from_millis(30))));
    }
}
