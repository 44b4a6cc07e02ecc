//! track.rs — Position of one boat at an arbitrary virtual time
//!
//! A track is the boat's recorded trace, validated once at construction:
//! - at least one sample
//! - timestamps strictly increasing
//! - longitudes in [-180, 180], latitudes in [-90, 90]
//!
//! Between two samples the boat moves linearly in lon/lat. A step wider than
//! 180° of longitude goes through the antimeridian instead: the step becomes
//! two legs (prev → boundary, boundary → next) split at the weighted crossing
//! point, so elapsed time still maps linearly onto the whole path.

use race_types::{LonLat, TraceSample};

use crate::antimeridian;
use crate::error::{ReplayError, Result};

#[derive(Debug, Clone)]
pub struct TrackInterpolator {
    samples: Vec<TraceSample>,
}

impl TrackInterpolator {
    pub fn new(boat: &str, samples: Vec<TraceSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ReplayError::EmptyTrace { boat: boat.to_string() });
        }
        for s in &samples {
            if !(-180.0..=180.0).contains(&s.lon) || !(-90.0..=90.0).contains(&s.lat) {
                return Err(ReplayError::CoordinateOutOfRange {
                    boat: boat.to_string(),
                    ts: s.ts,
                    lon: s.lon,
                    lat: s.lat,
                });
            }
        }
        for pair in samples.windows(2) {
            if pair[0].ts >= pair[1].ts {
                return Err(ReplayError::UnorderedTrace {
                    boat: boat.to_string(),
                    prev: pair[0].ts,
                    next: pair[1].ts,
                });
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Timestamp of the last sample.
    pub fn max_timestamp(&self) -> i64 {
        self.samples[self.samples.len() - 1].ts
    }

    /// None before the first sample and at or after the last one.
    pub fn position(&self, ts: i64) -> Option<LonLat> {
        // first sample strictly after ts
        let idx = self.samples.partition_point(|s| s.ts <= ts);
        if idx == 0 || idx == self.samples.len() {
            return None;
        }
        let prev = self.samples[idx - 1];
        let next = self.samples[idx];

        let fraction = (ts - prev.ts) as f64 / (next.ts - prev.ts) as f64;
        let (from, to) = (prev.position(), next.position());

        if antimeridian::crosses(from.lon, to.lon) {
            Some(across_antimeridian(from, to, fraction))
        } else {
            Some(lerp(from, to, fraction))
        }
    }

    /// Last recorded position, used to park a boat once its trace is exhausted.
    pub fn end_position(&self) -> LonLat {
        self.samples[self.samples.len() - 1].position()
    }
}

fn lerp(from: LonLat, to: LonLat, t: f64) -> LonLat {
    LonLat::new(
        from.lon + (to.lon - from.lon) * t,
        from.lat + (to.lat - from.lat) * t,
    )
}

fn across_antimeridian(from: LonLat, to: LonLat, fraction: f64) -> LonLat {
    let split = antimeridian::boundary_fraction(from, to);
    let y = antimeridian::boundary_latitude(from, to);

    if fraction <= split {
        let exit = LonLat::new(antimeridian::boundary_longitude(from.lon), y);
        let t = if split > 0.0 { fraction / split } else { 1.0 };
        lerp(from, exit, t)
    } else {
        let entry = LonLat::new(antimeridian::boundary_longitude(to.lon), y);
        let t = (fraction - split) / (1.0 - split);
        lerp(entry, to, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn track(samples: &[(i64, f64, f64)]) -> TrackInterpolator {
        let samples = samples
            .iter()
            .map(|&(ts, lon, lat)| TraceSample::new(ts, lon, lat))
            .collect();
        TrackInterpolator::new("test", samples).unwrap()
    }

    #[test]
    fn test_rejects_empty_trace() {
        let err = TrackInterpolator::new("ghost", vec![]).unwrap_err();
        assert!(matches!(err, ReplayError::EmptyTrace { .. }));
    }

    #[test]
    fn test_rejects_unordered_trace() {
        let samples = vec![TraceSample::new(1000, 0.0, 0.0), TraceSample::new(1000, 1.0, 1.0)];
        let err = TrackInterpolator::new("dup", samples).unwrap_err();
        assert!(matches!(err, ReplayError::UnorderedTrace { prev: 1000, next: 1000, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_longitude() {
        let samples = vec![TraceSample::new(0, 181.0, 0.0)];
        let err = TrackInterpolator::new("off", samples).unwrap_err();
        assert!(matches!(err, ReplayError::CoordinateOutOfRange { .. }));
    }

    #[test]
    fn test_linear_interpolation() {
        let t = track(&[(0, 0.0, 0.0), (1000, 10.0, -4.0)]);
        let p = t.position(250).unwrap();
        assert!((p.lon - 2.5).abs() < EPS);
        assert!((p.lat + 1.0).abs() < EPS);
    }

    #[test]
    fn test_exact_sample_timestamps() {
        let t = track(&[
            (0, -3.0, 47.0),
            (600, -3.5, 46.8),
            (1200, -4.1, 46.1),
            (1800, -5.0, 45.0),
        ]);
        for s in &t.samples()[..3] {
            assert_eq!(t.position(s.ts), Some(s.position()));
        }
    }

    #[test]
    fn test_out_of_range_is_none() {
        let t = track(&[(1000, 0.0, 0.0), (2000, 1.0, 1.0)]);
        assert_eq!(t.position(999), None);
        assert_eq!(t.position(2000), None);
        assert_eq!(t.position(5000), None);
        assert!(t.position(1000).is_some());
        assert!(t.position(1999).is_some());
    }

    #[test]
    fn test_single_sample_never_positions() {
        let t = track(&[(1000, 5.0, 5.0)]);
        assert_eq!(t.position(1000), None);
        assert_eq!(t.max_timestamp(), 1000);
        assert_eq!(t.end_position(), LonLat::new(5.0, 5.0));
    }

    #[test]
    fn test_positions_follow_chronological_segments() {
        let t = track(&[(0, 0.0, 0.0), (100, 1.0, 0.0), (200, 1.0, 1.0), (300, 0.0, 1.0)]);
        // every query lies on the segment bracketing it
        for ts in 0..300 {
            let p = t.position(ts).unwrap();
            match ts {
                0..=99 => assert!(p.lat.abs() < EPS && p.lon <= 1.0 + EPS),
                100..=199 => assert!((p.lon - 1.0).abs() < EPS),
                _ => assert!((p.lat - 1.0).abs() < EPS),
            }
        }
    }

    #[test]
    fn test_antimeridian_midpoint_is_on_boundary() {
        let t = track(&[(0, 179.0, 0.0), (1000, -179.0, 0.0)]);
        let p = t.position(500).unwrap();
        assert!((p.lon.abs() - 180.0).abs() < EPS, "lon={}", p.lon);
        assert!(p.lat.abs() < EPS);
    }

    #[test]
    fn test_antimeridian_legs_stay_on_their_side() {
        let t = track(&[(0, 179.0, 10.0), (1000, -179.0, 20.0)]);
        let early = t.position(250).unwrap();
        assert!((early.lon - 179.5).abs() < EPS);
        assert!((early.lat - 12.5).abs() < EPS);

        let late = t.position(750).unwrap();
        assert!((late.lon + 179.5).abs() < EPS);
        assert!((late.lat - 17.5).abs() < EPS);
    }

    #[test]
    fn test_antimeridian_asymmetric_split() {
        // 1° of the step lies west of the boundary, 3° east of it
        let t = track(&[(0, 179.0, 0.0), (4000, -177.0, 8.0)]);
        let at_boundary = t.position(1000).unwrap();
        assert!((at_boundary.lon - 180.0).abs() < EPS);
        assert!((at_boundary.lat - 2.0).abs() < EPS);

        let after = t.position(3000).unwrap();
        assert!((after.lon + 178.0).abs() < EPS);
        assert!((after.lat - 6.0).abs() < EPS);
    }
}
