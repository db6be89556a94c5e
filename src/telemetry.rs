use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{error, info};
use serde::Serialize;

use crate::generator::{Term, ValidationPolicy};

#[derive(Default, Serialize, Clone)]
pub struct TimingMetrics {
    pub config_load_duration: Option<Duration>,
    pub construction_duration: Option<Duration>,
    pub generation_duration: Option<Duration>,
    pub total_duration: Option<Duration>,
}

#[derive(Default, Serialize, Clone)]
pub struct RunMetrics {
    pub command: String,
    pub a: u16,
    pub b: u16,
    pub n: u16,
    pub policy: ValidationPolicy,
    pub max_value: u32,
    pub terms_generated: usize,
    pub result: Option<Term>,
    pub error: Option<String>,
}

#[derive(Default, Serialize, Clone)]
pub struct TelemetryData {
    pub timing: TimingMetrics,
    pub run: RunMetrics,
}

pub struct TelemetryCollector {
    start_time: Instant,
    metrics: TelemetryData,
    enabled: bool,
}

impl TelemetryCollector {
    pub fn new(command: &str, a: u16, b: u16, n: u16, enabled: bool) -> Self {
        let mut metrics = TelemetryData::default();
        metrics.run.command = command.to_string();
        metrics.run.a = a;
        metrics.run.b = b;
        metrics.run.n = n;

        Self {
            start_time: Instant::now(),
            metrics,
            enabled,
        }
    }

    pub fn record_config_load(
        &mut self,
        duration: Duration,
        policy: ValidationPolicy,
        max_value: u32,
    ) {
        if !self.enabled {
            return;
        }
        self.metrics.timing.config_load_duration = Some(duration);
        self.metrics.run.policy = policy;
        self.metrics.run.max_value = max_value;
    }

    pub fn record_construction(&mut self, duration: Duration) {
        if !self.enabled {
            return;
        }
        self.metrics.timing.construction_duration = Some(duration);
    }

    pub fn record_generation(&mut self, duration: Duration, terms: &[Term]) {
        if !self.enabled {
            return;
        }
        self.metrics.timing.generation_duration = Some(duration);
        self.metrics.run.terms_generated = terms.len();
        self.metrics.run.result = terms.last().copied();
    }

    pub fn record_error(&mut self, error: &dyn std::fmt::Display) {
        if !self.enabled {
            return;
        }
        self.metrics.run.error = Some(error.to_string());
    }

    pub fn finalize(self) -> Option<TelemetryData> {
        if !self.enabled {
            return None;
        }

        let mut final_metrics = self.metrics;
        let total = self.start_time.elapsed();
        final_metrics.timing.total_duration = Some(total);

        // Log summary
        info!("Telemetry Summary:");
        info!("Total Duration: {:?}", total);
        if let Some(d) = final_metrics.timing.config_load_duration {
            info!("Config Load: {:?}", d);
        }
        if let Some(d) = final_metrics.timing.construction_duration {
            info!("Construction: {:?}", d);
        }
        if let Some(d) = final_metrics.timing.generation_duration {
            info!(
                "Generation: {:?} ({} terms)",
                d, final_metrics.run.terms_generated
            );
        }
        if let Some(e) = &final_metrics.run.error {
            info!("Failed: {}", e);
        }

        Some(final_metrics)
    }
}

/// Writes `data` as `<dir>/fibonacci_telemetry_<command>[_failed]_<timestamp>.json`.
pub fn save(data: &TelemetryData, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let status = if data.run.error.is_some() { "_failed" } else { "" };
    let telemetry_file = output_dir.join(format!(
        "fibonacci_telemetry_{}{}_{}.json",
        data.run.command, status, timestamp
    ));
    fs::write(&telemetry_file, serde_json::to_string_pretty(data)?)?;
    info!("Telemetry data saved to: {}", telemetry_file.display());
    Ok(telemetry_file)
}

/// Finalizes `collector` and saves the result. A failed save is logged, not
/// returned, so it never masks the outcome of the run.
pub fn finish(collector: TelemetryCollector, output_dir: &Path) -> Option<PathBuf> {
    let data = collector.finalize()?;
    match save(&data, output_dir) {
        Ok(path) => Some(path),
        Err(e) => {
            error!("Failed to save telemetry data: {:#}", e);
            None
        }
    }
}
