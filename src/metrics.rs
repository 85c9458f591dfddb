//! Request counters and latency statistics for the predictor service.

use crate::types::{EmpowermentLabel, PredictionResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the predictor service
pub struct PredictorMetrics {
    /// Total submissions received
    pub submissions_received: AtomicU64,
    /// Submissions labelled Empowered
    pub empowered: AtomicU64,
    /// Submissions labelled Not Empowered
    pub not_empowered: AtomicU64,
    /// Submissions rejected with an error reply
    pub rejected: AtomicU64,
    /// Rejections by error kind
    rejections_by_kind: RwLock<HashMap<String, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Class-1 probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictorMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            submissions_received: AtomicU64::new(0),
            empowered: AtomicU64::new(0),
            not_empowered: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            rejections_by_kind: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record an incoming submission
    pub fn record_submission(&self) {
        self.submissions_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, processing_time: Duration, result: &PredictionResult) {
        match result.label {
            EmpowermentLabel::Empowered => self.empowered.fetch_add(1, Ordering::Relaxed),
            EmpowermentLabel::NotEmpowered => self.not_empowered.fetch_add(1, Ordering::Relaxed),
        };

        self.record_latency(processing_time);

        let bucket = (result.probability * 10.0).clamp(0.0, 9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a rejected submission
    pub fn record_rejection(&self, processing_time: Duration, kind: &str) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        self.record_latency(processing_time);

        if let Ok(mut by_kind) = self.rejections_by_kind.write() {
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    fn record_latency(&self, processing_time: Duration) {
        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Number of predictions that produced a label
    pub fn predictions_made(&self) -> u64 {
        self.empowered.load(Ordering::Relaxed) + self.not_empowered.load(Ordering::Relaxed)
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted: Vec<u64> = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return ProcessingStats::default(),
        };
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (submissions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.submissions_received.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|b| *b)
            .unwrap_or_default()
    }

    /// Get rejections by error kind
    pub fn get_rejections_by_kind(&self) -> HashMap<String, u64> {
        self.rejections_by_kind
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let received = self.submissions_received.load(Ordering::Relaxed);
        let empowered = self.empowered.load(Ordering::Relaxed);
        let not_empowered = self.not_empowered.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let predicted = empowered + not_empowered;
        let empowered_rate = if predicted > 0 {
            (empowered as f64 / predicted as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║         EMPOWERMENT PREDICTOR - METRICS SUMMARY              ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Submissions Received:   {:>8}  │  Throughput: {:>6.1} req/s ║",
            received, throughput
        );
        info!(
            "║ Empowered:              {:>8}  │  Rate: {:>6.1}%           ║",
            empowered, empowered_rate
        );
        info!("║ Not Empowered:          {:>8}                            ║", not_empowered);
        info!("║ Rejected:               {:>8}                            ║", rejected);
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );

        let by_kind = self.get_rejections_by_kind();
        if !by_kind.is_empty() {
            info!("╠══════════════════════════════════════════════════════════════╣");
            info!("║ Rejections by Kind:                                          ║");
            for (kind, count) in &by_kind {
                info!("║   {:20}: {:>6}                                ║", kind, count);
            }
        }

        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Probability Distribution:                                    ║");
        let dist = self.get_probability_distribution();
        let total: u64 = dist.iter().sum();
        for (i, &count) in dist.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Prints periodic summaries
pub struct MetricsReporter {
    metrics: Arc<PredictorMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PredictorMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PredictorMetrics::new();

        metrics.record_submission();
        metrics.record_submission();
        metrics.record_submission();
        metrics.record_prediction(
            Duration::from_micros(100),
            &PredictionResult::new("a".to_string(), 0.9, 0.5, "m"),
        );
        metrics.record_prediction(
            Duration::from_micros(200),
            &PredictionResult::new("b".to_string(), 0.2, 0.5, "m"),
        );
        metrics.record_rejection(Duration::from_micros(50), "missing_field");

        assert_eq!(metrics.submissions_received.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.predictions_made(), 2);
        assert_eq!(metrics.empowered.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.rejected.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.get_rejections_by_kind().get("missing_field"), Some(&1));

        let dist = metrics.get_probability_distribution();
        assert_eq!(dist[9], 1);
        assert_eq!(dist[2], 1);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max_us, 200);
    }

    #[test]
    fn test_probability_of_one_lands_in_last_bucket() {
        let metrics = PredictorMetrics::new();
        metrics.record_prediction(
            Duration::from_micros(10),
            &PredictionResult::new("a".to_string(), 1.0, 0.5, "m"),
        );
        assert_eq!(metrics.get_probability_distribution()[9], 1);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = PredictorMetrics::new();
        assert_eq!(metrics.get_processing_stats().count, 0);
    }
}
