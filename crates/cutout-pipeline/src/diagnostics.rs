//! Pipeline diagnostics: timing and counts for each stage.
//!
//! Every call to [`process_staged`](crate::process_staged) collects
//! diagnostics alongside the intermediate rasters. The CLI prints them
//! and the bot logs them.
//!
//! Durations are serialized as fractional seconds (`f64`) because
//! `std::time::Duration` does not implement serde traits.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, OutputFormat};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Measures the wall-clock time of one stage.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch(Instant);

impl Stopwatch {
    /// Start measuring now.
    #[must_use]
    pub fn start() -> Self {
        Self(Instant::now())
    }

    /// Time elapsed since [`start`](Self::start).
    #[must_use]
    pub fn elapsed(self) -> Duration {
        self.0.elapsed()
    }

    /// Finish the measurement and attach stage metrics.
    #[must_use]
    pub fn finish(self, metrics: StageMetrics) -> StageDiagnostics {
        StageDiagnostics {
            duration: self.elapsed(),
            metrics,
        }
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 0: image decoding.
    pub decode: StageDiagnostics,
    /// Stage 1: scaling to `max_side`.
    pub scale: StageDiagnostics,
    /// Stage 2: transparent padding.
    pub pad: StageDiagnostics,
    /// Stage 3: Laplacian edge detection.
    pub edge_detection: StageDiagnostics,
    /// Stage 4: outline stamping.
    pub outline: StageDiagnostics,
    /// Stage 5: compositing.
    pub composite: StageDiagnostics,
    /// Stage 6: encoding.
    pub encode: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded image dimensions.
        dimensions: Dimensions,
    },
    /// Scaling metrics.
    Scale {
        /// Dimensions before scaling.
        from: Dimensions,
        /// Dimensions after scaling.
        to: Dimensions,
    },
    /// Padding metrics.
    Pad {
        /// Margin added on every side.
        padding: u32,
        /// Canvas dimensions after padding.
        dimensions: Dimensions,
    },
    /// Edge detection metrics.
    EdgeDetection {
        /// Number of non-zero pixels in the edge map.
        edge_pixel_count: u64,
        /// Total pixel count for computing edge density.
        total_pixel_count: u64,
    },
    /// Outline stamping metrics.
    Outline {
        /// Disk radius in pixels.
        radius: u32,
        /// Number of opaque overlay pixels.
        outline_pixel_count: u64,
    },
    /// Compositing metrics.
    Composite {
        /// Result dimensions.
        dimensions: Dimensions,
    },
    /// Encoding metrics.
    Encode {
        /// Target container.
        format: OutputFormat,
        /// Size of the encoded output.
        output_bytes: usize,
    },
}

impl PipelineDiagnostics {
    /// Stages in pipeline order with display names.
    #[must_use]
    pub fn stages(&self) -> [(&'static str, &StageDiagnostics); 7] {
        [
            ("Decode", &self.decode),
            ("Scale", &self.scale),
            ("Pad", &self.pad),
            ("Edge Detection", &self.edge_detection),
            ("Outline", &self.outline),
            ("Composite", &self.composite),
            ("Encode", &self.encode),
        ]
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in self.stages() {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            dimensions,
        } => format!("{input_bytes} bytes -> {dimensions}"),
        StageMetrics::Scale { from, to } => format!("{from} -> {to}"),
        StageMetrics::Pad {
            padding,
            dimensions,
        } => format!("+{padding}px -> {dimensions}"),
        StageMetrics::EdgeDetection {
            edge_pixel_count,
            total_pixel_count,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let density = if *total_pixel_count > 0 {
                *edge_pixel_count as f64 / *total_pixel_count as f64 * 100.0
            } else {
                0.0
            };
            format!("edges={edge_pixel_count} ({density:.1}%)")
        }
        StageMetrics::Outline {
            radius,
            outline_pixel_count,
        } => format!("r={radius} opaque={outline_pixel_count}"),
        StageMetrics::Composite { dimensions } => format!("{dimensions}"),
        StageMetrics::Encode {
            format,
            output_bytes,
        } => format!("{format} {output_bytes} bytes"),
    }
}
