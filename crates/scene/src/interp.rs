//! Continuous position along a discrete waypoint route.
//!
//! Motion within a segment runs in two equal-duration phases — horizontal,
//! then vertical — so agents move in Manhattan steps instead of cutting
//! diagonals, and a floor change is visible as a distinct vertical phase.

use crate::model::Coord;

/// Interpolated on-screen position in grid-cell units (cell-centered).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePosition {
    pub x: f32,
    pub y: f32,
    /// Set while a vertically capable agent is mid floor change.
    pub vertical_segment: bool,
}

/// Maps a progress value in [0, 1) onto `route`.
///
/// Returns `None` for an empty route (the caller falls back to the entry
/// point). A single-waypoint route is a stationary agent: the output is the
/// same for every progress value. Progress landing exactly on a waypoint
/// resolves to the start of the later segment, clamped so the final segment
/// never overruns.
pub fn route_position(route: &[Coord], progress: f32, allows_vertical: bool) -> Option<RoutePosition> {
    let first = *route.first()?;
    if route.len() == 1 {
        return Some(RoutePosition {
            x: first.x as f32 + 0.5,
            y: first.y as f32 + 0.5,
            vertical_segment: false,
        });
    }

    let p = progress.rem_euclid(1.0);
    let n = route.len();
    let seg = (n - 1) as f32 * p;
    let i = (seg.floor() as usize).min(n - 2);
    let t = seg - i as f32;
    let a = route[i];
    let b = route[i + 1];

    let (x, y, vertical_segment) = if t <= 0.5 {
        // Horizontal phase: x advances, y holds the segment's start row.
        let th = t * 2.0;
        (a.x as f32 + (b.x - a.x) as f32 * th, a.y as f32, false)
    } else if allows_vertical {
        let tv = (t - 0.5) * 2.0;
        (
            b.x as f32,
            a.y as f32 + (b.y - a.y) as f32 * tv,
            b.y != a.y,
        )
    } else {
        (b.x as f32, a.y as f32, false)
    };

    Some(RoutePosition {
        x: x + 0.5,
        y: y + 0.5,
        vertical_segment,
    })
}

/// Wrapping progress step; the result is always in [0, 1), never clamped.
pub fn advance(progress: f32, step: f32) -> f32 {
    (progress + step) % 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Vec<Coord> {
        vec![Coord::new(0, 0), Coord::new(3, 0), Coord::new(3, 2)]
    }

    #[test]
    fn empty_route_has_no_position() {
        assert_eq!(route_position(&[], 0.3, true), None);
    }

    #[test]
    fn single_waypoint_is_stationary() {
        let r = [Coord::new(4, 2)];
        for p in [0.0, 0.25, 0.5, 0.9999] {
            let pos = route_position(&r, p, true).unwrap();
            assert_eq!((pos.x, pos.y), (4.5, 2.5));
            assert!(!pos.vertical_segment);
        }
    }

    #[test]
    fn segment_index_never_overruns() {
        let r = route();
        let n = r.len();
        for k in 0..1000 {
            let p = k as f32 / 1000.0;
            let seg = (n - 1) as f32 * p;
            let i = (seg.floor() as usize).min(n - 2);
            assert!(i <= n - 2);
            // The position itself must stay inside the route's bounding box.
            let pos = route_position(&r, p, true).unwrap();
            assert!(pos.x >= 0.5 && pos.x <= 3.5);
            assert!(pos.y >= 0.5 && pos.y <= 2.5);
        }
    }

    #[test]
    fn phase_boundary_resolves_exactly() {
        // p = 0.75 -> seg 1.5 -> segment 1 at t = 0.5: end of the horizontal
        // phase, exactly over the segment's end column.
        let pos = route_position(&route(), 0.75, false).unwrap();
        assert_eq!((pos.x, pos.y), (3.5, 0.5));
        assert!(!pos.vertical_segment);
    }

    #[test]
    fn floor_locked_agent_holds_row() {
        let r = route();
        for k in 0..100 {
            let p = k as f32 / 100.0;
            let pos = route_position(&r, p, false).unwrap();
            assert_eq!(pos.y, 0.5, "y drifted at p={p}");
            assert!(!pos.vertical_segment);
        }
    }

    #[test]
    fn vertical_phase_interpolates_floors() {
        // p = 0.9 -> seg 1.8 -> t = 0.8, vertical phase 60% through a
        // two-floor climb.
        let pos = route_position(&route(), 0.9, true).unwrap();
        assert_eq!(pos.x, 3.5);
        assert!((pos.y - 1.7).abs() < 1e-5, "y = {}", pos.y);
        assert!(pos.vertical_segment);
    }

    #[test]
    fn flat_segment_never_flags_vertical() {
        let r = [Coord::new(0, 1), Coord::new(5, 1)];
        for k in 0..100 {
            let pos = route_position(&r, k as f32 / 100.0, true).unwrap();
            assert!(!pos.vertical_segment);
            assert_eq!(pos.y, 1.5);
        }
    }

    #[test]
    fn progress_wraps_instead_of_clamping() {
        let p = advance(0.999, 0.0006);
        assert!(p < 1.0);
        let wrapped = advance(p, 0.0006);
        assert!(wrapped < 0.0006, "expected wrap past 1.0, got {wrapped}");
    }
}
