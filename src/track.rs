//! The perimeter loop.
//!
//! A single scalar distance runs around the padded inner rectangle of the
//! viewport: along the bottom edge left to right, up the right edge, along the
//! top edge right to left and down the left edge. Altitude is measured from
//! that line toward the middle of the screen. Everything that is drawn on the
//! track (buildings, the runner) goes through [`Track::project`] so it stays
//! glued to the same geometry.

use std::f64::consts::{FRAC_PI_2, PI};

/// One of the four sides of the loop, in traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];

    /// Rotation that turns "up" in local drawing space into "toward the centre".
    pub fn angle(self) -> f64 {
        match self {
            Edge::Bottom => 0.0,
            Edge::Right => -FRAC_PI_2,
            Edge::Top => PI,
            Edge::Left => FRAC_PI_2,
        }
    }
}

/// Screen position plus the rotation of the edge it sits on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// Viewport-sized track geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    width: f64,
    height: f64,
    pad: f64,
}

impl Track {
    pub fn new(width: f64, height: f64, pad: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pad: pad.max(0.0),
        }
    }

    /// Zero-sized track used before the first resize.
    pub fn unset() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pad(&self) -> f64 {
        self.pad
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.pad).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.pad).max(0.0)
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.inner_width() + self.inner_height())
    }

    /// False until the viewport has a usable size.
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.perimeter() > 0.0
    }

    /// Cumulative distances at which the loop turns a corner. The last one is
    /// the loop length itself.
    pub fn corners(&self) -> [f64; 4] {
        let w = self.inner_width();
        let h = self.inner_height();
        [w, w + h, 2.0 * w + h, 2.0 * w + 2.0 * h]
    }

    /// Canonical position of `distance` in `[0, perimeter)`. Zero when the
    /// track has no length.
    pub fn normalize(&self, distance: f64) -> f64 {
        wrap(distance, self.perimeter())
    }

    /// Edge under `distance` and the offset along that edge.
    pub fn edge_at(&self, distance: f64) -> (Edge, f64) {
        let w = self.inner_width();
        let h = self.inner_height();
        let mut d = self.normalize(distance);
        if d < w {
            return (Edge::Bottom, d);
        }
        d -= w;
        if d < h {
            return (Edge::Right, d);
        }
        d -= h;
        if d < w {
            return (Edge::Top, d);
        }
        (Edge::Left, d - w)
    }

    /// Map a track distance and altitude to the screen.
    ///
    /// Altitude 0 lies on the padded inner boundary; positive altitude moves
    /// along the edge normal toward the centre, negative altitude toward the
    /// screen border. A track with no length maps everything to the centre.
    pub fn project(&self, distance: f64, altitude: f64) -> ScreenPoint {
        let (edge, d) = self.edge_at(distance);
        self.place(edge, d, altitude)
    }

    /// Like [`Track::project`], but a distance exactly on a corner stays on
    /// the edge that ends there instead of jumping to the next one. Used for
    /// the closing side of a building so its quad never bends.
    pub fn project_closing(&self, distance: f64, altitude: f64) -> ScreenPoint {
        let w = self.inner_width();
        let h = self.inner_height();
        let mut n = self.normalize(distance);
        if n == 0.0 {
            n = self.perimeter();
        }
        let (edge, d) = if n <= w {
            (Edge::Bottom, n)
        } else if n <= w + h {
            (Edge::Right, n - w)
        } else if n <= 2.0 * w + h {
            (Edge::Top, n - w - h)
        } else {
            (Edge::Left, n - 2.0 * w - h)
        };
        self.place(edge, d, altitude)
    }

    fn place(&self, edge: Edge, d: f64, altitude: f64) -> ScreenPoint {
        if self.perimeter() <= 0.0 {
            return ScreenPoint {
                x: self.width / 2.0,
                y: self.height / 2.0,
                angle: 0.0,
            };
        }
        let (w, h, pad) = (self.width, self.height, self.pad);
        let (x, y) = match edge {
            Edge::Bottom => (pad + d, h - pad - altitude),
            Edge::Right => (w - pad - altitude, h - pad - d),
            Edge::Top => (w - pad - d, pad + altitude),
            Edge::Left => (pad + altitude, pad + d),
        };
        ScreenPoint {
            x,
            y,
            angle: edge.angle(),
        }
    }
}

/// `value mod length` in `[0, length)`; zero for an empty loop.
pub(crate) fn wrap(value: f64, length: f64) -> f64 {
    if !(length > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let r = value.rem_euclid(length);
    // rem_euclid can round a tiny negative up to `length` itself.
    if r >= length { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new(800.0, 600.0, 40.0)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perimeter_and_corners() {
        let t = track();
        assert_eq!(t.inner_width(), 720.0);
        assert_eq!(t.inner_height(), 520.0);
        assert_eq!(t.perimeter(), 2480.0);
        assert_eq!(t.corners(), [720.0, 1240.0, 1960.0, 2480.0]);
    }

    #[test]
    fn test_edges_in_traversal_order() {
        let t = track();
        assert_eq!(t.edge_at(0.0), (Edge::Bottom, 0.0));
        assert_eq!(t.edge_at(720.0), (Edge::Right, 0.0));
        assert_eq!(t.edge_at(1240.0), (Edge::Top, 0.0));
        assert_eq!(t.edge_at(1960.0), (Edge::Left, 0.0));
        assert_eq!(t.edge_at(2479.0), (Edge::Left, 519.0));
    }

    #[test]
    fn test_project_on_each_edge() {
        let t = track();
        let p = t.project(100.0, 0.0);
        assert_eq!((p.x, p.y, p.angle), (140.0, 560.0, 0.0));
        let p = t.project(720.0 + 100.0, 0.0);
        assert_eq!((p.x, p.y, p.angle), (760.0, 460.0, -FRAC_PI_2));
        let p = t.project(1240.0 + 100.0, 0.0);
        assert_eq!((p.x, p.y, p.angle), (660.0, 40.0, PI));
        let p = t.project(1960.0 + 100.0, 0.0);
        assert_eq!((p.x, p.y, p.angle), (40.0, 140.0, FRAC_PI_2));
    }

    #[test]
    fn test_altitude_moves_toward_center() {
        let t = track();
        let (cx, cy) = (400.0, 300.0);
        for d in [10.0, 900.0, 1500.0, 2200.0] {
            let mut last = f64::INFINITY;
            for a in 0..10 {
                let p = t.project(d, a as f64 * 5.0);
                let dist = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();
                assert!(dist < last, "altitude {a} at distance {d} did not approach centre");
                last = dist;
            }
        }
    }

    #[test]
    fn test_projection_is_periodic() {
        let t = track();
        for d in [0.0, 13.5, 719.9, 1500.0, 2479.0] {
            let base = t.project(d, 7.0);
            for k in [-3.0, -1.0, 1.0, 4.0] {
                let p = t.project(d + k * t.perimeter(), 7.0);
                assert!(close(p.x, base.x) && close(p.y, base.y), "d={d} k={k}");
                assert_eq!(p.angle, base.angle);
            }
        }
    }

    #[test]
    fn test_negative_distance_wraps() {
        let t = track();
        let p = t.project(-10.0, 0.0);
        assert_eq!(t.edge_at(-10.0).0, Edge::Left);
        assert!(close(p.x, 40.0) && close(p.y, 40.0 + 510.0));
    }

    #[test]
    fn test_project_closing_keeps_corner_on_own_edge() {
        let t = track();
        // Bottom edge ends at 720: the closing point stays on the bottom edge.
        let p = t.project_closing(720.0, 30.0);
        assert_eq!((p.x, p.y, p.angle), (760.0, 530.0, 0.0));
        // The loop end closes the left edge, not the bottom one.
        let p = t.project_closing(2480.0, 30.0);
        assert_eq!((p.x, p.y, p.angle), (70.0, 560.0, FRAC_PI_2));
        // Away from corners it matches plain projection.
        assert_eq!(t.project_closing(800.0, 12.0), t.project(800.0, 12.0));
    }

    #[test]
    fn test_unset_track_projects_to_center() {
        assert!(!Track::unset().is_ready());
        assert_eq!(Track::unset().perimeter(), 0.0);
        let t = Track::new(0.0, 0.0, 40.0);
        assert!(!t.is_ready());
        assert_eq!(t.perimeter(), 0.0);
        let p = t.project(123.0, 9.0);
        assert_eq!((p.x, p.y, p.angle), (0.0, 0.0, 0.0));
        assert_eq!(t.normalize(55.0), 0.0);
    }

    #[test]
    fn test_wrap_never_returns_length() {
        assert_eq!(wrap(-1e-18, 2800.0), 0.0);
        assert_eq!(wrap(2800.0, 2800.0), 0.0);
        assert_eq!(wrap(f64::NAN, 2800.0), 0.0);
    }
}
