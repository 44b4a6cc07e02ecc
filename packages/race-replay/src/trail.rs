//! trail.rs — Trailing polyline of a boat, split at the antimeridian
//!
//! The trail is a list of segments. A new segment starts on the first point
//! and on every antimeridian crossing; the crossing is closed off with a
//! synthetic point on the old side's boundary and reopened with one on the
//! new side's boundary, both at the weighted crossing latitude. Within one
//! segment consecutive points are never more than 180° of longitude apart.

use race_types::LonLat;

use crate::antimeridian;

#[derive(Debug, Clone, Default)]
pub struct TrailBuilder {
    segments: Vec<Vec<LonLat>>,
    last: Option<LonLat>,
    visible: bool,
}

impl TrailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `point`. A repeat of the previous point (paused clock) is dropped.
    pub fn add_point(&mut self, point: LonLat) {
        if self.last == Some(point) {
            return;
        }
        match self.last {
            None => self.segments.push(Vec::new()),
            Some(last) if antimeridian::crosses(last.lon, point.lon) => {
                let y = antimeridian::boundary_latitude(last, point);
                if !antimeridian::is_on_boundary(last.lon) {
                    self.push(LonLat::new(antimeridian::boundary_longitude(last.lon), y));
                }
                self.segments.push(Vec::new());
                if !antimeridian::is_on_boundary(point.lon) {
                    self.push(LonLat::new(antimeridian::boundary_longitude(point.lon), y));
                }
            }
            Some(_) => {}
        }
        self.last = Some(point);
        self.push(point);
    }

    fn push(&mut self, point: LonLat) {
        if let Some(segment) = self.segments.last_mut() {
            segment.push(point);
        }
    }

    /// Current multi-segment polyline, whether shown or not.
    pub fn geometry(&self) -> &[Vec<LonLat>] {
        &self.segments
    }

    /// What the renderer should draw: nothing while hidden.
    pub fn rendered(&self) -> Option<&[Vec<LonLat>]> {
        self.visible.then_some(self.segments.as_slice())
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn display(&mut self) {
        self.visible = true;
    }

    /// Blank the drawing but keep accumulating, so a re-enabled boat resumes its trail.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Blank the drawing and forget the trail.
    pub fn erase(&mut self) {
        self.reset();
        self.visible = false;
    }

    pub fn reset(&mut self) {
        self.segments.clear();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(p: LonLat, lon: f64, lat: f64) {
        assert!((p.lon - lon).abs() < EPS && (p.lat - lat).abs() < EPS, "{p:?} != ({lon}, {lat})");
    }

    #[test]
    fn test_first_point_opens_segment() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(-1.0, 46.0));
        assert_eq!(trail.geometry(), &[vec![LonLat::new(-1.0, 46.0)]]);
    }

    #[test]
    fn test_points_accumulate_in_one_segment() {
        let mut trail = TrailBuilder::new();
        for i in 0..5 {
            trail.add_point(LonLat::new(-1.0 - i as f64, 46.0));
        }
        assert_eq!(trail.geometry().len(), 1);
        assert_eq!(trail.point_count(), 5);
    }

    #[test]
    fn test_repeated_point_is_dropped() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(3.0, 3.0));
        trail.add_point(LonLat::new(3.0, 3.0));
        trail.add_point(LonLat::new(3.0, 3.0));
        assert_eq!(trail.point_count(), 1);
    }

    #[test]
    fn test_crossing_splits_with_boundary_points() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(179.0, 10.0));
        trail.add_point(LonLat::new(-179.0, 10.0));

        let segments = trail.geometry();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
        assert_close(segments[0][0], 179.0, 10.0);
        assert_close(segments[0][1], 180.0, 10.0);
        assert_close(segments[1][0], -180.0, 10.0);
        assert_close(segments[1][1], -179.0, 10.0);
    }

    #[test]
    fn test_crossing_east_to_west() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(-178.0, 0.0));
        trail.add_point(LonLat::new(178.0, 4.0));

        let segments = trail.geometry();
        assert_eq!(segments.len(), 2);
        assert_close(segments[0][1], -180.0, 2.0);
        assert_close(segments[1][0], 180.0, 2.0);
    }

    #[test]
    fn test_no_duplicate_boundary_on_exact_boundary_points() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(170.0, 0.0));
        trail.add_point(LonLat::new(180.0, 0.0));
        trail.add_point(LonLat::new(-179.0, 0.0));

        let segments = trail.geometry();
        assert_eq!(segments.len(), 2);
        // 180 itself closes the first segment, no synthetic point added
        assert_eq!(segments[0], vec![LonLat::new(170.0, 0.0), LonLat::new(180.0, 0.0)]);
        assert_eq!(segments[1].len(), 2);
        assert_close(segments[1][0], -180.0, 0.0);
    }

    #[test]
    fn test_no_duplicate_boundary_when_landing_on_boundary() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(179.0, 0.0));
        trail.add_point(LonLat::new(-180.0, 0.0));

        let segments = trail.geometry();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![LonLat::new(179.0, 0.0), LonLat::new(180.0, 0.0)]);
        assert_eq!(segments[1], vec![LonLat::new(-180.0, 0.0)]);
    }

    #[test]
    fn test_segments_never_jump_more_than_half_globe() {
        let mut trail = TrailBuilder::new();
        let lons = [170.0, 175.0, 179.5, -179.5, -175.0, -179.0, 179.0, 175.0];
        for (i, lon) in lons.iter().enumerate() {
            trail.add_point(LonLat::new(*lon, i as f64));
        }
        assert_eq!(trail.geometry().len(), 3);
        for segment in trail.geometry() {
            for pair in segment.windows(2) {
                assert!((pair[0].lon - pair[1].lon).abs() <= 180.0);
            }
        }
    }

    #[test]
    fn test_hide_keeps_state_erase_clears() {
        let mut trail = TrailBuilder::new();
        trail.add_point(LonLat::new(0.0, 0.0));
        trail.add_point(LonLat::new(1.0, 0.0));
        trail.display();
        assert!(trail.rendered().is_some());

        trail.hide();
        assert!(trail.rendered().is_none());
        assert_eq!(trail.point_count(), 2);

        // resumes the same segment
        trail.add_point(LonLat::new(2.0, 0.0));
        assert_eq!(trail.geometry().len(), 1);
        assert_eq!(trail.point_count(), 3);

        trail.erase();
        assert!(trail.rendered().is_none());
        assert_eq!(trail.point_count(), 0);
        trail.add_point(LonLat::new(100.0, 0.0));
        assert_eq!(trail.geometry(), &[vec![LonLat::new(100.0, 0.0)]]);
    }
}
