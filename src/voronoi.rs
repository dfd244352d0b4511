// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public entry point: site collection, configuration and the pipeline
//   validate -> sweep -> drain -> clip -> assemble -> Diagram
//
// A run is one pass through `Stage`; nothing is kept between runs, so a
// `Voronoi` can be computed any number of times and edited in between.

mod assemble;
mod clip;

use crate::diagram::Diagram;
use crate::error::{VoronoiError, VoronoiResult};
use crate::geom::{clockwise, Point, PointOrder, Real, Rect};
use crate::graph::SiteIdx;
use crate::sweep::Sweep;

/// What happens where cells meet the bounding rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BorderMode {
    /// Cells touching the rectangle stay open: only clipped Voronoi edges.
    #[default]
    OpenBorders,
    /// The rectangle's sides are traced with border edges so every cell is
    /// a closed polygon.
    ClosedBorders,
}

#[derive(Copy, Clone, Debug)]
pub struct VoronoiConfig {
    pub border_mode: BorderMode,
    /// Tolerance for breakpoint hits, coincident circle events and points,
    /// zero-length edges and boundary detection.
    pub epsilon: Real,
    /// Order of boundary points around each site.
    pub point_order: PointOrder,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        VoronoiConfig {
            border_mode: BorderMode::OpenBorders,
            epsilon: 1e-9,
            point_order: clockwise,
        }
    }
}

/// Pipeline stages of one run, in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    /// Processing site and circle events.
    Running,
    /// Queue empty; breakpoints left on the beachline become open edges.
    Draining,
    Clipping,
    Assembling,
    Done,
}

/// Tracks the stage of a run. Stages only move forward.
struct Run {
    stage: Stage,
}

impl Run {
    fn new() -> Self {
        Run { stage: Stage::Idle }
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {:?} after {:?}", next, self.stage);
        tracing::debug!(from = ?self.stage, to = ?next, "voronoi stage");
        self.stage = next;
    }
}

/// Builder for a bounded Voronoi diagram.
#[derive(Clone, Debug)]
pub struct Voronoi {
    bounds: Rect,
    sites: Vec<Point>,
    config: VoronoiConfig,
}

impl Voronoi {
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, VoronoiConfig::default())
    }

    pub fn with_config(bounds: Rect, config: VoronoiConfig) -> Self {
        Voronoi {
            bounds,
            sites: Vec::new(),
            config,
        }
    }

    /// Add a site; its index identifies it in the diagram.
    pub fn add_site(&mut self, p: impl Into<Point>) -> SiteIdx {
        let idx = self.sites.len() as SiteIdx;
        self.sites.push(p.into());
        idx
    }

    pub fn add_sites<I, P>(&mut self, points: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        self.sites.extend(points.into_iter().map(Into::into));
    }

    pub fn set_border_mode(&mut self, mode: BorderMode) {
        self.config.border_mode = mode;
    }

    pub fn set_epsilon(&mut self, epsilon: Real) {
        self.config.epsilon = epsilon;
    }

    pub fn set_point_order(&mut self, order: PointOrder) {
        self.config.point_order = order;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    /// Reject input the sweep cannot handle.
    pub fn validate(&self) -> VoronoiResult<()> {
        let eps = self.config.epsilon;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(VoronoiError::InvalidEpsilon { epsilon: eps });
        }
        let (w, h) = (self.bounds.width(), self.bounds.height());
        let corners_finite = Point::new(self.bounds.min_x, self.bounds.min_y).is_finite()
            && Point::new(self.bounds.max_x, self.bounds.max_y).is_finite();
        if !(corners_finite && w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(VoronoiError::InvalidBounds { width: w, height: h });
        }
        if self.sites.is_empty() {
            return Err(VoronoiError::NoSites);
        }
        for (i, &p) in self.sites.iter().enumerate() {
            let index = i as SiteIdx;
            if !p.is_finite() {
                return Err(VoronoiError::NonFiniteSite { index });
            }
            if !self.bounds.contains(p) {
                return Err(VoronoiError::SiteOutOfBounds { index, x: p.x, y: p.y });
            }
        }
        Ok(())
    }

    /// Run the whole pipeline once.
    pub fn compute(&self) -> VoronoiResult<Diagram> {
        self.validate()?;
        let eps = self.config.epsilon;
        let mut run = Run::new();

        run.enter(Stage::Running);
        let mut sweep = Sweep::new(&self.sites, eps);
        sweep.run();
        let stats = sweep.stats();
        tracing::debug!(
            sites = self.sites.len(),
            site_events = stats.site_events,
            circle_events = stats.circle_events,
            duplicates = stats.duplicates,
            circles_scheduled = stats.circles_scheduled,
            circles_invalidated = stats.circles_invalidated,
            "sweep finished"
        );

        run.enter(Stage::Draining);
        let open = sweep.drain();
        let (mut graph, duplicate_of) = sweep.into_parts();
        tracing::debug!(open_breakpoints = open, edges = graph.edges.len(), "beachline drained");

        run.enter(Stage::Clipping);
        let clipped = clip::clip_edges(&mut graph, &self.sites, &self.bounds, eps);
        let border_edges = match self.config.border_mode {
            BorderMode::OpenBorders => 0,
            BorderMode::ClosedBorders => clip::close_borders(&mut graph, &self.sites, &duplicate_of, &self.bounds, eps),
        };
        tracing::debug!(
            inside = clipped.inside,
            clipped = clipped.clipped,
            outside = clipped.outside,
            degenerate = clipped.degenerate,
            border_edges,
            "edges clipped"
        );

        run.enter(Stage::Assembling);
        let cells = assemble::assemble(&graph, &self.sites, self.config.point_order, eps);

        let diagram = Diagram::build(
            &graph,
            &self.sites,
            &duplicate_of,
            cells,
            self.bounds,
            self.config.border_mode,
            eps,
        );
        run.enter(Stage::Done);
        tracing::debug!(
            vertices = diagram.vertices().len(),
            edges = diagram.edges().len(),
            "diagram ready"
        );
        Ok(diagram)
    }
}

/// Compute the diagram of `sites` inside `bounds` with default settings
/// apart from `mode`.
pub fn compute(sites: &[Point], bounds: Rect, mode: BorderMode) -> VoronoiResult<Diagram> {
    let mut v = Voronoi::new(bounds);
    v.set_border_mode(mode);
    v.add_sites(sites.iter().copied());
    v.compute()
}
