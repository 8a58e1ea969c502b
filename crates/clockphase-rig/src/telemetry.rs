//! Estimate telemetry
//!
//! The sample loop appends one record per processed sample; a display or
//! logging consumer drains the whole buffer atomically. The log also tracks
//! the running extremes of the refined arm angle, which is how the operating
//! band of an actual rig is measured.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Everything one processed sample produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EstimateRecord {
    /// Sample timestamp [s]
    pub time: f64,
    /// Accelerometer-derived arm angle [rad]
    pub raw_arm_angle: f64,
    /// Gyro arm rate [rad/s]
    pub raw_arm_rate: f64,
    /// Refined arm angle [rad]
    pub arm_angle: f64,
    /// Refined arm rate [rad/s]
    pub arm_rate: f64,
    /// Disambiguated oscillator phase [rad]
    pub phase: f64,
    /// Close- and far-branch candidates [rad]
    pub candidates: [f64; 2],
    /// log10 of the control acceleration magnitude, if the acceleration
    /// control model is active
    pub arm_accel_log10: Option<f64>,
}

/// Append-only record buffer with drain-on-read semantics.
#[derive(Debug)]
pub struct TelemetryLog {
    records: Vec<EstimateRecord>,
    min_arm_angle: f64,
    max_arm_angle: f64,
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            min_arm_angle: f64::INFINITY,
            max_arm_angle: f64::NEG_INFINITY,
        }
    }

    pub fn push(&mut self, record: EstimateRecord) {
        if record.arm_angle < self.min_arm_angle {
            self.min_arm_angle = record.arm_angle;
        }
        if record.arm_angle > self.max_arm_angle {
            self.max_arm_angle = record.arm_angle;
        }
        self.records.push(record);
    }

    /// Take every pending record, leaving the buffer empty. The arm-angle
    /// extremes survive the drain.
    pub fn drain(&mut self) -> Vec<EstimateRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest refined arm angle seen so far [rad].
    pub fn min_arm_angle(&self) -> Option<f64> {
        self.min_arm_angle.is_finite().then_some(self.min_arm_angle)
    }

    /// Largest refined arm angle seen so far [rad].
    pub fn max_arm_angle(&self) -> Option<f64> {
        self.max_arm_angle.is_finite().then_some(self.max_arm_angle)
    }
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle over a [`TelemetryLog`]: the sample loop pushes, a consumer
/// thread drains snapshots. This is the only synchronization point between
/// the pipeline and its consumers.
#[derive(Debug, Clone, Default)]
pub struct SharedTelemetry {
    inner: Arc<Mutex<TelemetryLog>>,
}

impl SharedTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: EstimateRecord) {
        self.inner.lock().expect("telemetry lock poisoned").push(record);
    }

    pub fn drain(&self) -> Vec<EstimateRecord> {
        self.inner.lock().expect("telemetry lock poisoned").drain()
    }

    pub fn min_arm_angle(&self) -> Option<f64> {
        self.inner.lock().expect("telemetry lock poisoned").min_arm_angle()
    }

    pub fn max_arm_angle(&self) -> Option<f64> {
        self.inner.lock().expect("telemetry lock poisoned").max_arm_angle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: f64, arm_angle: f64) -> EstimateRecord {
        EstimateRecord {
            time,
            raw_arm_angle: arm_angle,
            raw_arm_rate: 0.0,
            arm_angle,
            arm_rate: 0.0,
            phase: 0.0,
            candidates: [0.0, 0.0],
            arm_accel_log10: None,
        }
    }

    #[test]
    fn drain_empties_but_keeps_extremes() {
        let mut log = TelemetryLog::new();
        log.push(record(0.0, 0.1));
        log.push(record(0.01, -0.3));
        log.push(record(0.02, 0.5));

        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert!(log.is_empty());
        assert_eq!(log.min_arm_angle(), Some(-0.3));
        assert_eq!(log.max_arm_angle(), Some(0.5));

        // A second drain yields nothing new.
        assert!(log.drain().is_empty());
    }

    #[test]
    fn extremes_are_unset_before_any_record() {
        let log = TelemetryLog::new();
        assert_eq!(log.min_arm_angle(), None);
        assert_eq!(log.max_arm_angle(), None);
    }

    #[test]
    fn records_stay_chronological_through_the_shared_handle() {
        let shared = SharedTelemetry::new();
        for i in 0..10 {
            shared.push(record(i as f64 * 0.01, 0.0));
        }
        let drained = shared.drain();
        assert_eq!(drained.len(), 10);
        assert!(drained.windows(2).all(|w| w[0].time <= w[1].time));
    }
}
