// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Turn raw samples exported from a health data source into a running
//! workout draft.
//!
//! Samples are aligned on a fixed 5-minute grid anchored at the workout
//! start: locations are thinned to one per interval, distance is summed per
//! interval, and heart rate is averaged per interval. The three series are
//! then zipped index by index into [`RawPoint`]s, truncated to the shortest.
//! Grids longer than [`MAX_INTERVALS`] are cut off there.

use crate::models::{CompletedRunning, CompletedWorkout};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Grid spacing for every series, in seconds.
pub const SAMPLE_INTERVAL_SECS: i64 = 5 * 60;

/// Altitude changes at or below this are treated as GPS noise.
pub const ELEVATION_NOISE_M: f64 = 1.0;

/// Longest grid built for one workout: 48 hours of 5-minute intervals.
pub const MAX_INTERVALS: usize = 576;

const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
}

/// Distance covered between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub timestamp: DateTime<Utc>,
    pub bpm: f64,
}

/// Distance summed over one grid interval.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceBin {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub distance_km: f64,
    pub speed_km_per_min: f64,
}

/// One aligned point of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub heart_rate: i32,
    pub altitude_m: f64,
    pub distance_km: f64,
    pub speed_km_per_min: f64,
}

/// Everything exported for one running workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSamples {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Workout total as recorded by the device, if available.
    #[serde(default)]
    pub total_distance_km: Option<f64>,
    #[serde(default)]
    pub locations: Vec<LocationSample>,
    #[serde(default)]
    pub heart_rates: Vec<HeartRateSample>,
    #[serde(default)]
    pub distances: Vec<DistanceSample>,
}

/// Aggregated figures ready to become a completed workout.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningDraft {
    pub distance_km: f64,
    pub avg_heart_rate: f64,
    pub elevation_gain_m: f64,
    pub avg_pace_sec_per_km: f64,
}

impl RunningDraft {
    pub fn into_completed(self, notes: impl Into<String>, date: DateTime<Utc>) -> CompletedWorkout {
        CompletedWorkout::running(
            notes,
            date,
            CompletedRunning {
                distance_km: self.distance_km,
                avg_heart_rate: self.avg_heart_rate,
                elevation_gain_m: self.elevation_gain_m,
                avg_pace_sec_per_km: self.avg_pace_sec_per_km,
            },
        )
    }
}

// ─── Series alignment ────────────────────────────────────────────────────────

pub fn sample_interval() -> TimeDelta {
    TimeDelta::seconds(SAMPLE_INTERVAL_SECS)
}

/// Keep the first sample, then each sample at least `every` after the last
/// kept one. Input must be in time order.
pub fn downsample_locations(samples: &[LocationSample], every: TimeDelta) -> Vec<LocationSample> {
    let mut kept: Vec<LocationSample> = Vec::new();
    for sample in samples {
        match kept.last() {
            Some(last) if sample.timestamp - last.timestamp < every => {}
            _ => kept.push(sample.clone()),
        }
    }
    kept
}

/// Interval boundaries of the grid over `[start, end)`. The last interval
/// is cut short at `end`. At most [`MAX_INTERVALS`] are returned.
fn grid(start: DateTime<Utc>, end: DateTime<Utc>, bin: TimeDelta) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut intervals = Vec::new();
    if bin <= TimeDelta::zero() {
        return intervals;
    }
    let mut cursor = start;
    while cursor < end {
        if intervals.len() == MAX_INTERVALS {
            tracing::warn!(
                %start,
                %end,
                max_intervals = MAX_INTERVALS,
                "Workout span exceeds sample grid, ignoring the rest"
            );
            break;
        }
        let next = (cursor + bin).min(end);
        intervals.push((cursor, next));
        cursor = next;
    }
    intervals
}

/// Sum distance samples into consecutive `bin`-long intervals anchored at
/// `start`. A sample belongs to the interval containing its start time.
/// Intervals with no samples are skipped.
pub fn bin_distance(
    samples: &[DistanceSample],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bin: TimeDelta,
) -> Vec<DistanceBin> {
    grid(start, end, bin)
        .into_iter()
        .filter_map(|(from, to)| {
            let mut in_bin = samples
                .iter()
                .filter(|s| s.start >= from && s.start < to)
                .peekable();
            in_bin.peek()?;
            let distance_km: f64 = in_bin.map(|s| s.distance_km).sum();
            let minutes = (to - from).num_milliseconds() as f64 / 60_000.0;
            Some(DistanceBin {
                start: from,
                end: to,
                distance_km,
                speed_km_per_min: if minutes > 0.0 { distance_km / minutes } else { 0.0 },
            })
        })
        .collect()
}

/// Average heart rate per interval; intervals with no samples are skipped.
pub fn bin_heart_rate(
    samples: &[HeartRateSample],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bin: TimeDelta,
) -> Vec<f64> {
    grid(start, end, bin)
        .into_iter()
        .filter_map(|(from, to)| {
            let bpm: Vec<f64> = samples
                .iter()
                .filter(|s| s.timestamp >= from && s.timestamp < to)
                .map(|s| s.bpm)
                .collect();
            (!bpm.is_empty()).then(|| bpm.iter().sum::<f64>() / bpm.len() as f64)
        })
        .collect()
}

/// Zip the aligned series into points, truncated to the shortest series.
pub fn combine(locations: &[LocationSample], heart_rates: &[f64], bins: &[DistanceBin]) -> Vec<RawPoint> {
    locations
        .iter()
        .zip(heart_rates)
        .zip(bins)
        .map(|((location, bpm), bin)| RawPoint {
            heart_rate: *bpm as i32,
            altitude_m: location.altitude_m,
            distance_km: bin.distance_km,
            speed_km_per_min: bin.speed_km_per_min,
        })
        .collect()
}

/// Length of the GPS track, summed leg by leg.
pub fn path_length_km(locations: &[LocationSample]) -> f64 {
    locations.windows(2).map(|w| haversine_km(&w[0], &w[1])).sum()
}

fn haversine_km(a: &LocationSample, b: &LocationSample) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Aggregate points into a draft.
///
/// - heart rate: integer mean of the per-point values
/// - elevation gain: sum of rises between consecutive points above
///   [`ELEVATION_NOISE_M`]
/// - pace: seconds per km from the mean speed, 0 when there is no speed
/// - distance: `total_distance_km` when known, else the sum of the points
pub fn summarize_run(points: &[RawPoint], total_distance_km: Option<f64>) -> RunningDraft {
    let avg_heart_rate = if points.is_empty() {
        0
    } else {
        points.iter().map(|p| i64::from(p.heart_rate)).sum::<i64>() / points.len() as i64
    };

    let elevation_gain_m: f64 = points
        .windows(2)
        .map(|w| w[1].altitude_m - w[0].altitude_m)
        .filter(|delta| *delta > ELEVATION_NOISE_M)
        .sum();

    let mean_speed = if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.speed_km_per_min).sum::<f64>() / points.len() as f64
    };
    let avg_pace_sec_per_km = if mean_speed > 0.0 {
        (1.0 / mean_speed) * 60.0
    } else {
        0.0
    };

    RunningDraft {
        distance_km: total_distance_km.unwrap_or_else(|| points.iter().map(|p| p.distance_km).sum()),
        avg_heart_rate: avg_heart_rate as f64,
        elevation_gain_m,
        avg_pace_sec_per_km,
    }
}

/// Full pipeline from exported samples to a draft.
///
/// Without a recorded total or distance samples, the distance is the length
/// of the GPS track.
pub fn import_run(samples: &RunSamples) -> RunningDraft {
    let locations = downsample_locations(&samples.locations, sample_interval());
    let heart_rates = bin_heart_rate(&samples.heart_rates, samples.start, samples.end, sample_interval());
    let bins = bin_distance(&samples.distances, samples.start, samples.end, sample_interval());
    let points = combine(&locations, &heart_rates, &bins);

    tracing::debug!(
        locations = locations.len(),
        heart_rate_bins = heart_rates.len(),
        distance_bins = bins.len(),
        points = points.len(),
        "Aligned run samples"
    );

    let total_distance_km = samples.total_distance_km.or_else(|| {
        (samples.distances.is_empty() && samples.locations.len() > 1)
            .then(|| path_length_km(&samples.locations))
    });

    summarize_run(&points, total_distance_km)
}
