//! Procedural skyline around the perimeter loop.
//!
//! A skyline is an ordered run of building segments covering one loop of the
//! track. Segments are contiguous, start at 0, end at the loop length, and are
//! cut at the four corners so no building ever bends around one. Each segment
//! carries its roof shape and a window layout picked once at generation time.
//!
//! A skyline is rebuilt wholesale on resize: [`Skyline::generate`] builds a new
//! value and the owner replaces the old one, so readers never see a half-built
//! list.

use rand::Rng;

use crate::config::SkylineConfig;
use crate::track::{ScreenPoint, Track, wrap};
use crate::{CITY_COLORS, WINDOW_COLORS};

/// Roof silhouette drawn on top of the facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoofShape {
    Flat,
    Step,
    Spire,
    Slope,
    Dome,
}

impl RoofShape {
    pub const ALL: [RoofShape; 5] = [
        RoofShape::Flat,
        RoofShape::Step,
        RoofShape::Spire,
        RoofShape::Slope,
        RoofShape::Dome,
    ];

    /// Roof ornament in the segment's local frame: x along the track from the
    /// segment start, y down into the facade (negative is above the roof).
    pub fn outline(self, width: f64, detail: f64) -> RoofOutline {
        match self {
            RoofShape::Flat => RoofOutline::None,
            RoofShape::Step => RoofOutline::Block(Rect {
                x: width * 0.2,
                y: -detail,
                w: width * 0.6,
                h: detail,
            }),
            RoofShape::Spire => {
                RoofOutline::Triangle([(0.0, 0.0), (width, 0.0), (width / 2.0, -detail * 3.0)])
            }
            RoofShape::Slope => {
                RoofOutline::Triangle([(0.0, 0.0), (width, 0.0), (width, -detail * 2.0)])
            }
            RoofShape::Dome => RoofOutline::HalfDisc {
                cx: width / 2.0,
                radius: (width / 2.0 - 2.0).max(0.0),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoofOutline {
    None,
    Block(Rect),
    Triangle([(f64, f64); 3]),
    /// Upper half of a disc resting on the roof line.
    HalfDisc { cx: f64, radius: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowPattern {
    Grid,
    Vertical,
    Horizontal,
    None,
}

impl WindowPattern {
    pub const ALL: [WindowPattern; 4] = [
        WindowPattern::Grid,
        WindowPattern::Vertical,
        WindowPattern::Horizontal,
        WindowPattern::None,
    ];
}

/// One decorative element of a facade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowDecoration {
    /// A single lit pane of the window grid.
    Cell {
        row: u32,
        column: u32,
        color: &'static str,
    },
    VerticalStrip {
        column: u32,
        color: &'static str,
    },
    HorizontalBand {
        band: u32,
        color: &'static str,
    },
}

impl WindowDecoration {
    pub fn color(&self) -> &'static str {
        match *self {
            WindowDecoration::Cell { color, .. }
            | WindowDecoration::VerticalStrip { color, .. }
            | WindowDecoration::HorizontalBand { color, .. } => color,
        }
    }

    /// Rectangle in the segment's local frame (see [`RoofShape::outline`]).
    pub fn rect(&self, grid: &WindowGrid, width: f64, facade: f64) -> Rect {
        let (cw, ch) = grid.cell;
        let (pw, ph) = grid.pane();
        match *self {
            WindowDecoration::Cell { row, column, .. } => Rect {
                x: column as f64 * cw + (cw - pw) / 2.0,
                y: row as f64 * ch + (ch - ph) / 2.0,
                w: pw,
                h: ph,
            },
            WindowDecoration::VerticalStrip { column, .. } => {
                let pitch = cw * grid.band_spacing;
                Rect {
                    x: column as f64 * pitch + (pitch - pw) / 2.0,
                    y: ch / 2.0,
                    w: pw,
                    h: (facade - ch).max(0.0),
                }
            }
            WindowDecoration::HorizontalBand { band, .. } => {
                let pitch = ch * grid.band_spacing;
                let inset = ((cw - pw) / 2.0).min(width / 2.0);
                Rect {
                    x: inset,
                    y: band as f64 * pitch + (pitch - ph) / 2.0,
                    w: width - 2.0 * inset,
                    h: ph,
                }
            }
        }
    }
}

/// Window lattice for the current world scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowGrid {
    pub cell: (f64, f64),
    pub band_spacing: f64,
}

impl WindowGrid {
    pub fn new(config: &SkylineConfig, world: f64) -> Self {
        Self {
            cell: config.window_cell(world),
            band_spacing: config.band_spacing,
        }
    }

    /// Lit pane size inside one cell.
    pub fn pane(&self) -> (f64, f64) {
        let (cw, ch) = self.cell;
        ((cw * 0.5).max(2.0), (ch * 0.6).max(3.0))
    }
}

/// One building: a stretch of track with a single height and look.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingSegment {
    pub start: f64,
    pub end: f64,
    /// Roof altitude above the track line.
    pub height: f64,
    pub roof: RoofShape,
    pub color: &'static str,
    pub pattern: WindowPattern,
    pub windows: Vec<WindowDecoration>,
}

impl BuildingSegment {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open `[start, end)` membership of a normalized distance.
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.start && distance < self.end
    }

    /// Screen quad from the roof down to `-base_depth` altitude, in drawing
    /// order: roof start, roof end, base end, base start.
    pub fn facade(&self, track: &Track, base_depth: f64) -> [ScreenPoint; 4] {
        [
            track.project(self.start, self.height),
            track.project_closing(self.end, self.height),
            track.project_closing(self.end, -base_depth),
            track.project(self.start, -base_depth),
        ]
    }
}

/// Full-loop building list plus the loop length it was built for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skyline {
    segments: Vec<BuildingSegment>,
    perimeter: f64,
    base_depth: f64,
}

impl Skyline {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a fresh skyline for `track`.
    ///
    /// An unsized track yields an empty skyline. Generation stops after
    /// `config.max_segments` draws even if the loop is not yet covered.
    pub fn generate<R: Rng + ?Sized>(
        track: &Track,
        config: &SkylineConfig,
        world: f64,
        rng: &mut R,
    ) -> Self {
        if !track.is_ready() {
            tracing::debug!("skipping skyline generation for an unsized track");
            return Self::empty();
        }

        let perimeter = track.perimeter();
        let corners = track.corners();
        let (min_w, max_w) = config.width_range(world);
        let (min_h, max_h) = config.height_range(world);
        let grid = WindowGrid::new(config, world);
        let base_depth = track.pad();

        let mut segments = Vec::new();
        let mut current = 0.0;
        let mut draws = 0;
        while current < perimeter && draws < config.max_segments {
            draws += 1;

            let mut next = current + uniform(rng, min_w, max_w);
            let height = uniform(rng, min_h, max_h);
            if let Some(&corner) = corners.iter().find(|&&c| current < c && next > c) {
                next = corner;
            }

            let roof = if rng.r#gen::<f64>() >= config.flat_roof_bias {
                RoofShape::ALL[rng.gen_range(0..RoofShape::ALL.len())]
            } else {
                RoofShape::Flat
            };
            let color = CITY_COLORS[rng.gen_range(0..CITY_COLORS.len())];
            let pattern = WindowPattern::ALL[rng.gen_range(0..WindowPattern::ALL.len())];
            let windows = layout_windows(
                rng,
                pattern,
                next - current,
                height + base_depth,
                &grid,
                config.lit_probability,
            );

            segments.push(BuildingSegment {
                start: current,
                end: next,
                height,
                roof,
                color,
                pattern,
                windows,
            });
            current = next;
        }

        if current < perimeter {
            tracing::warn!(
                draws,
                covered = current,
                perimeter,
                "skyline generation hit its iteration ceiling"
            );
        }
        tracing::debug!(segments = segments.len(), perimeter, "skyline rebuilt");

        Self {
            segments,
            perimeter,
            base_depth,
        }
    }

    /// Wrap an authored segment list. The caller is responsible for keeping
    /// it ordered and contiguous.
    pub fn from_segments(perimeter: f64, base_depth: f64, segments: Vec<BuildingSegment>) -> Self {
        Self {
            segments,
            perimeter: perimeter.max(0.0),
            base_depth,
        }
    }

    pub fn segments(&self) -> &[BuildingSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Depth below the track line that facades extend to (the track pad).
    pub fn base_depth(&self) -> f64 {
        self.base_depth
    }

    pub fn covered_length(&self) -> f64 {
        self.segments.iter().map(BuildingSegment::width).sum()
    }

    pub fn segment_at(&self, distance: f64) -> Option<&BuildingSegment> {
        let d = wrap(distance, self.perimeter);
        self.segments.iter().find(|s| s.contains(d))
    }

    /// Roof altitude under `distance`; 0 where no segment covers it.
    pub fn height_at(&self, distance: f64) -> f64 {
        self.segment_at(distance).map_or(0.0, |s| s.height)
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + rng.r#gen::<f64>() * (hi - lo)
}

fn layout_windows<R: Rng + ?Sized>(
    rng: &mut R,
    pattern: WindowPattern,
    width: f64,
    facade: f64,
    grid: &WindowGrid,
    lit_probability: f64,
) -> Vec<WindowDecoration> {
    let (cw, ch) = grid.cell;
    let mut windows = Vec::new();
    if facade <= ch * 1.5 {
        return windows;
    }
    match pattern {
        WindowPattern::Grid => {
            let cols = (width / cw).floor() as u32;
            let rows = (facade / ch).floor() as u32;
            for row in 0..rows {
                for column in 0..cols {
                    if rng.r#gen::<f64>() < lit_probability {
                        let color = WINDOW_COLORS[rng.gen_range(0..WINDOW_COLORS.len())];
                        windows.push(WindowDecoration::Cell { row, column, color });
                    }
                }
            }
        }
        WindowPattern::Vertical => {
            let cols = (width / (cw * grid.band_spacing)).floor() as u32;
            windows.extend((0..cols).step_by(2).map(|column| {
                WindowDecoration::VerticalStrip {
                    column,
                    color: WINDOW_COLORS[2],
                }
            }));
        }
        WindowPattern::Horizontal => {
            let bands = (facade / (ch * grid.band_spacing)).floor() as u32;
            windows.extend(
                (0..bands)
                    .step_by(2)
                    .map(|band| WindowDecoration::HorizontalBand {
                        band,
                        color: WINDOW_COLORS[3],
                    }),
            );
        }
        WindowPattern::None => {}
    }
    windows
}
