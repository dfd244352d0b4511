// Copyright 2025 Lars Brubaker
// Properties of the per-site boundary point lists on random inputs.

mod helpers;

use fortune_voronoi::{BorderMode, Diagram, Point, SiteIdx};
use helpers::{assert_clockwise, diagram, incident_endpoints, random_sites, square, TOL};

fn check_cells(sites: &[Point], d: &Diagram) {
    for s in 0..sites.len() as SiteIdx {
        let cell = d.cell(s);
        let pts = d.clockwise_points(s);
        assert_clockwise(sites[s as usize], &pts, cell.is_closed());

        // Only endpoints of incident edges, and each one once.
        let ends = incident_endpoints(d, s);
        for q in &pts {
            assert!(ends.iter().any(|e| e.approx_eq(*q, TOL)), "site {}: stray point {:?}", s, q);
        }
        for e in &ends {
            assert!(pts.iter().any(|q| q.approx_eq(*e, TOL)), "site {}: missing endpoint {:?}", s, e);
        }
        for (i, a) in pts.iter().enumerate() {
            for b in &pts[i + 1..] {
                assert!(!a.approx_eq(*b, TOL), "site {}: duplicate point {:?}", s, a);
            }
        }
    }
}

#[test]
fn random_open_cells_are_clockwise() {
    for seed in 0..8 {
        let sites = random_sites(seed, 60, square());
        let d = diagram(&sites, BorderMode::OpenBorders);
        check_cells(&sites, &d);
    }
}

#[test]
fn random_closed_cells_are_clockwise_and_closed() {
    for seed in 100..108 {
        let sites = random_sites(seed, 60, square());
        let d = diagram(&sites, BorderMode::ClosedBorders);
        check_cells(&sites, &d);
        for cell in d.cells() {
            assert!(cell.is_closed(), "seed {} site {} not closed", seed, cell.site());
        }
    }
}

#[test]
fn neighbors_list_both_endpoints_of_shared_edges() {
    let sites = random_sites(7, 120, square());
    let d = diagram(&sites, BorderMode::OpenBorders);
    for (i, e) in d.edges().iter().enumerate() {
        let right = e.right.expect("open diagrams have no border edges");
        let (a, b) = d.edge_points(i as u32);
        for s in [e.left, right] {
            let pts = d.clockwise_points(s);
            assert!(pts.iter().any(|q| q.approx_eq(a, TOL)), "site {} lacks {:?}", s, a);
            assert!(pts.iter().any(|q| q.approx_eq(b, TOL)), "site {} lacks {:?}", s, b);
        }
    }
}

#[test]
fn every_vertex_is_inside_and_edges_are_oriented() {
    let sites = random_sites(11, 200, square());
    let d = diagram(&sites, BorderMode::ClosedBorders);
    let r = square();
    for v in d.vertices() {
        assert!(r.contains(v.pos), "vertex {:?} outside", v);
    }
    for (i, e) in d.edges().iter().enumerate() {
        let (a, b) = d.edge_points(i as u32);
        assert!(!a.approx_eq(b, 1e-9), "zero-length edge {}", i);
        let left = d.site(e.left).pos;
        assert!((b - a).cross(left - a) < 0.0, "edge {} has its left site on the right", i);
        if let Some(right) = e.right {
            let right = d.site(right).pos;
            assert!((b - a).cross(right - a) > 0.0, "edge {} has its right site on the left", i);
        }
    }
}

#[test]
fn vertices_are_equidistant_from_their_sites() {
    let sites = random_sites(5, 150, square());
    let d = diagram(&sites, BorderMode::OpenBorders);
    for (i, e) in d.edges().iter().enumerate() {
        let (a, b) = d.edge_points(i as u32);
        let (l, r) = (sites[e.left as usize], sites[e.right.unwrap() as usize]);
        for q in [a, b] {
            assert!((q.distance(l) - q.distance(r)).abs() < 1e-6, "edge {} end {:?}", i, q);
        }
    }
}

#[test]
fn closed_cells_tile_the_rectangle() {
    for seed in 20..24 {
        let sites = random_sites(seed, 80, square());
        let d = diagram(&sites, BorderMode::ClosedBorders);
        let total: f64 = d.cells().filter_map(|c| c.area()).sum();
        assert!((total - 1_000_000.0).abs() < 1e-3, "seed {}: total area {}", seed, total);
    }
}
