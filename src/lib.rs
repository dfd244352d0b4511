// fortune-voronoi: bounded planar Voronoi diagrams via Fortune's sweep line
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod beachline;
pub mod diagram;
pub mod error;
pub mod event_queue;
pub mod geom;
pub mod graph;
pub mod pool;
pub mod relax;
pub mod sweep;
pub mod voronoi;

pub use diagram::{Cell, Diagram, Edge, Site, Vertex};
pub use error::{VoronoiError, VoronoiResult};
pub use geom::{clockwise, Point, PointOrder, Real, Rect};
pub use graph::{EdgeIdx, SiteIdx, VertIdx, VertexKind};
pub use relax::{relax, relax_with};
pub use voronoi::{compute, BorderMode, Stage, Voronoi, VoronoiConfig};
