//! Per-operation timing and confidence samples.
//!
//! Each named operation keeps a rolling window of samples; stats are
//! computed on demand. Nothing here can fail.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Samples needed before a trend other than `Stable` is reported.
const MIN_TREND_SAMPLES: usize = 10;

/// Relative change in mean time that counts as a trend.
const TREND_THRESHOLD: f64 = 0.10;

/// Operations listed in `OverallStats::slowest`.
const SLOWEST_LIMIT: usize = 5;

/// One recorded measurement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub query_time_ms: f64,
    pub cache_hit: bool,
    pub domains_searched: usize,
    pub results_found: usize,
    pub confidence: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Caller-supplied part of a sample, passed to [`Timer::stop`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleExtra {
    pub cache_hit: bool,
    pub domains_searched: usize,
    pub results_found: usize,
    pub confidence: Option<f64>,
}

/// Direction of query time over the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Degrading,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    pub operation: String,
    pub count: usize,
    pub avg_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub cache_hit_rate: f64,
    pub avg_confidence: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowOperation {
    pub operation: String,
    pub avg_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_samples: usize,
    pub avg_time_ms: f64,
    pub cache_hit_rate: f64,
    pub operations: Vec<OperationStats>,
    pub slowest: Vec<SlowOperation>,
}

/// Running timer returned by [`PerformanceMonitor::start_timer`].
#[must_use = "a timer records nothing until stopped"]
pub struct Timer<'a> {
    monitor: &'a PerformanceMonitor,
    operation: String,
    started: Instant,
}

impl Timer<'_> {
    /// Record the sample and return the elapsed time in milliseconds.
    pub fn stop(self, extra: SampleExtra) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64() * 1000.0;
        self.monitor.record(
            &self.operation,
            PerformanceSample {
                query_time_ms: elapsed,
                cache_hit: extra.cache_hit,
                domains_searched: extra.domains_searched,
                results_found: extra.results_found,
                confidence: extra.confidence,
                timestamp: Utc::now(),
            },
        );
        elapsed
    }
}

#[derive(Debug)]
pub struct PerformanceMonitor {
    history: Mutex<HashMap<String, VecDeque<PerformanceSample>>>,
    max_history: usize,
}

impl PerformanceMonitor {
    pub fn new(max_history: usize) -> Self {
        Self { history: Mutex::new(HashMap::new()), max_history: max_history.max(1) }
    }

    pub fn start_timer(&self, operation: impl Into<String>) -> Timer<'_> {
        Timer { monitor: self, operation: operation.into(), started: Instant::now() }
    }

    /// Append a sample, dropping the oldest beyond `max_history`.
    pub fn record(&self, operation: &str, sample: PerformanceSample) {
        let mut history = self.history.lock();
        let samples = history.entry(operation.to_string()).or_default();
        samples.push_back(sample);
        while samples.len() > self.max_history {
            samples.pop_front();
        }
    }

    pub fn stats(&self, operation: &str) -> Option<OperationStats> {
        let history = self.history.lock();
        history.get(operation).and_then(|samples| compute_stats(operation, samples))
    }

    pub fn overall_stats(&self) -> OverallStats {
        let history = self.history.lock();

        let mut operations: Vec<OperationStats> =
            history.iter().filter_map(|(op, samples)| compute_stats(op, samples)).collect();
        operations.sort_by(|a, b| a.operation.cmp(&b.operation));

        let total_samples: usize = operations.iter().map(|s| s.count).sum();
        let (time_sum, hit_sum) = history.values().flatten().fold((0.0, 0usize), |(t, h), s| {
            (t + s.query_time_ms, h + usize::from(s.cache_hit))
        });

        let mut slowest: Vec<SlowOperation> = operations
            .iter()
            .map(|s| SlowOperation { operation: s.operation.clone(), avg_time_ms: s.avg_time_ms })
            .collect();
        slowest.sort_by(|a, b| b.avg_time_ms.total_cmp(&a.avg_time_ms));
        slowest.truncate(SLOWEST_LIMIT);

        OverallStats {
            total_samples,
            avg_time_ms: ratio(time_sum, total_samples),
            cache_hit_rate: ratio(hit_sum as f64, total_samples),
            operations,
            slowest,
        }
    }

    pub fn reset(&self) {
        self.history.lock().clear();
    }
}

fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn compute_stats(operation: &str, samples: &VecDeque<PerformanceSample>) -> Option<OperationStats> {
    if samples.is_empty() {
        return None;
    }

    let times: Vec<f64> = samples.iter().map(|s| s.query_time_ms).collect();
    let count = times.len();
    let hits = samples.iter().filter(|s| s.cache_hit).count();

    let confidences: Vec<f64> = samples.iter().filter_map(|s| s.confidence).collect();
    let avg_confidence =
        if confidences.is_empty() { None } else { Some(confidences.iter().sum::<f64>() / confidences.len() as f64) };

    Some(OperationStats {
        operation: operation.to_string(),
        count,
        avg_time_ms: times.iter().sum::<f64>() / count as f64,
        min_time_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
        max_time_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        cache_hit_rate: hits as f64 / count as f64,
        avg_confidence,
        trend: classify_trend(&times),
    })
}

/// Compare the mean of the newest fifth of `times` against the fifth before it.
fn classify_trend(times: &[f64]) -> Trend {
    if times.len() < MIN_TREND_SAMPLES {
        return Trend::Stable;
    }

    let window = times.len() / 5;
    let recent = &times[times.len() - window..];
    let previous = &times[times.len() - 2 * window..times.len() - window];

    let recent_avg = recent.iter().sum::<f64>() / window as f64;
    let previous_avg = previous.iter().sum::<f64>() / window as f64;
    if previous_avg <= 0.0 {
        return Trend::Stable;
    }

    let change = (recent_avg - previous_avg) / previous_avg;
    if change < -TREND_THRESHOLD {
        Trend::Improving
    } else if change > TREND_THRESHOLD {
        Trend::Degrading
    } else {
        Trend::Stable
    }
}
