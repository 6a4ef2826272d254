//! Open polyline geometry used by the path follower

use crate::tile::WorldPoint;
use keeper_math::consts::EPSILON;
use keeper_math::clamp;

/// A straight piece of a line path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub begin: WorldPoint,
    pub end: WorldPoint,
    pub length: f32,
    /// Path length up to and including this segment
    pub cumulative_length: f32,
}

/// An open polyline; the agent stops at the end instead of looping
#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    segments: Vec<Segment>,
    length: f32,
}

impl LinePath {
    /// Build from ordered points
    ///
    /// Repeated consecutive points are collapsed so every segment has a
    /// length. Returns `None` when fewer than two distinct points remain.
    pub fn new(points: &[WorldPoint]) -> Option<Self> {
        let mut segments = Vec::with_capacity(points.len().saturating_sub(1));
        let mut length = 0.0;
        let mut begin = *points.first()?;

        for &end in &points[1..] {
            let segment_length = begin.distance(end);
            if segment_length <= EPSILON {
                continue;
            }
            length += segment_length;
            segments.push(Segment {
                begin,
                end,
                length: segment_length,
                cumulative_length: length,
            });
            begin = end;
        }

        if segments.is_empty() {
            None
        } else {
            Some(Self { segments, length })
        }
    }

    /// Total length
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First point
    pub fn start(&self) -> WorldPoint {
        self.segments[0].begin
    }

    /// Last point
    pub fn end(&self) -> WorldPoint {
        self.segments[self.segments.len() - 1].end
    }

    /// Distance along the path of the point closest to `point`
    ///
    /// On ties the earlier segment wins.
    pub fn project(&self, point: WorldPoint) -> f32 {
        let mut best_distance_sq = f32::INFINITY;
        let mut best = 0.0;

        for segment in &self.segments {
            let direction = segment.end - segment.begin;
            let t = clamp(
                (point - segment.begin).dot(direction) / (segment.length * segment.length),
                0.0,
                1.0,
            );
            let closest = segment.begin + direction * t;
            let distance_sq = closest.distance_squared(point);
            if distance_sq < best_distance_sq {
                best_distance_sq = distance_sq;
                best = segment.cumulative_length - segment.length + t * segment.length;
            }
        }

        best
    }

    /// Point at a distance along the path, clamped to the path ends
    pub fn point_at(&self, distance: f32) -> WorldPoint {
        let distance = clamp(distance, 0.0, self.length);
        let segment = self
            .segments
            .iter()
            .find(|s| s.cumulative_length >= distance)
            .unwrap_or(&self.segments[self.segments.len() - 1]);

        let into_segment = distance - (segment.cumulative_length - segment.length);
        segment.begin.lerp(segment.end, clamp(into_segment / segment.length, 0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn l_shape() -> LinePath {
        LinePath::new(&[
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(4.0, 0.0),
            WorldPoint::new(4.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_length_and_ends() {
        let path = l_shape();
        assert_relative_eq!(path.length(), 7.0);
        assert_eq!(path.start(), WorldPoint::new(0.0, 0.0));
        assert_eq!(path.end(), WorldPoint::new(4.0, 3.0));
        assert_eq!(path.segments().len(), 2);
    }

    #[test]
    fn test_degenerate_paths() {
        assert!(LinePath::new(&[]).is_none());
        assert!(LinePath::new(&[WorldPoint::new(1.0, 1.0)]).is_none());
        assert!(LinePath::new(&[WorldPoint::new(1.0, 1.0), WorldPoint::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_duplicate_points_collapsed() {
        let path = LinePath::new(&[
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(2.0, 0.0),
            WorldPoint::new(2.0, 0.0),
        ])
        .unwrap();
        assert_eq!(path.segments().len(), 1);
        assert_relative_eq!(path.length(), 2.0);
    }

    #[test]
    fn test_project() {
        let path = l_shape();
        assert_relative_eq!(path.project(WorldPoint::new(1.5, 0.7)), 1.5);
        assert_relative_eq!(path.project(WorldPoint::new(5.0, 2.0)), 6.0);
        // Behind the start clamps to zero
        assert_relative_eq!(path.project(WorldPoint::new(-3.0, 0.0)), 0.0);
        // Past the end clamps to the length
        assert_relative_eq!(path.project(WorldPoint::new(4.0, 10.0)), 7.0);
    }

    #[test]
    fn test_point_at() {
        let path = l_shape();
        assert_eq!(path.point_at(2.0), WorldPoint::new(2.0, 0.0));
        let p = path.point_at(5.5);
        assert_relative_eq!(p.x, 4.0);
        assert_relative_eq!(p.y, 1.5);
        assert_eq!(path.point_at(100.0), path.end());
        assert_eq!(path.point_at(-1.0), path.start());
    }
}
