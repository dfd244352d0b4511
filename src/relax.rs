// Copyright 2025 Lars Brubaker
// License: MIT
//
// Lloyd relaxation: move every site to the centroid of its closed cell and
// recompute, spreading the sites out evenly over the rectangle.

use crate::error::VoronoiResult;
use crate::geom::{Point, Real, Rect};
use crate::voronoi::{BorderMode, Voronoi, VoronoiConfig};

/// Relax `sites` for at most `iterations` rounds with default settings.
pub fn relax(sites: &[Point], bounds: Rect, iterations: usize) -> VoronoiResult<Vec<Point>> {
    relax_with(sites, bounds, iterations, &VoronoiConfig::default())
}

/// Relax `sites` using `config`'s epsilon and point order. Cells are always
/// closed against the rectangle. Stops early once no site moves by more
/// than the epsilon; sites whose cell is empty stay where they are.
pub fn relax_with(
    sites: &[Point],
    bounds: Rect,
    iterations: usize,
    config: &VoronoiConfig,
) -> VoronoiResult<Vec<Point>> {
    let config = VoronoiConfig {
        border_mode: BorderMode::ClosedBorders,
        ..*config
    };
    let mut current = sites.to_vec();
    for round in 0..iterations {
        let mut v = Voronoi::with_config(bounds, config);
        v.add_sites(current.iter().copied());
        let diagram = v.compute()?;

        let mut max_move: Real = 0.0;
        for cell in diagram.cells() {
            if let Some(c) = cell.centroid() {
                let c = bounds.clamp(c);
                let site = &mut current[cell.site() as usize];
                max_move = max_move.max(site.distance(c));
                *site = c;
            }
        }
        tracing::debug!(round, max_move, "lloyd round");
        if max_move < config.epsilon {
            break;
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn square() -> Rect {
        Rect::from_size(1000.0, 1000.0)
    }

    fn max_step(sites: &[Point]) -> Real {
        let next = relax(sites, square(), 1).unwrap();
        sites.iter().zip(&next).map(|(a, b)| a.distance(*b)).fold(0.0, Real::max)
    }

    #[test]
    fn centered_grid_is_a_fixed_point() {
        let sites = [
            Point::new(250.0, 250.0),
            Point::new(750.0, 250.0),
            Point::new(250.0, 750.0),
            Point::new(750.0, 750.0),
        ];
        let out = relax(&sites, square(), 10).unwrap();
        for (a, b) in sites.iter().zip(&out) {
            assert!(a.approx_eq(*b, 1e-6), "{:?} moved to {:?}", a, b);
        }
    }

    #[test]
    fn single_site_moves_to_the_center() {
        let out = relax(&[Point::new(100.0, 900.0)], square(), 3).unwrap();
        assert!(out[0].approx_eq(Point::new(500.0, 500.0), 1e-6), "{:?}", out[0]);
    }

    #[test]
    fn corner_sites_move_to_the_center() {
        for corner in square().corners() {
            let out = relax(&[corner], square(), 1).unwrap();
            assert!(out[0].approx_eq(Point::new(500.0, 500.0), 1e-6), "{:?} went to {:?}", corner, out[0]);
        }
    }

    #[test]
    fn relaxation_settles() {
        let mut rng = StdRng::seed_from_u64(42);
        let sites: Vec<Point> = (0..40)
            .map(|_| Point::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
            .collect();
        let first = max_step(&sites);
        let relaxed = relax(&sites, square(), 30).unwrap();
        assert_eq!(relaxed.len(), sites.len());
        assert!(relaxed.iter().all(|p| square().contains(*p)));
        let last = max_step(&relaxed);
        assert!(last < first, "first step {} last step {}", first, last);
    }

    #[test]
    fn zero_iterations_is_identity() {
        let sites = [Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        assert_eq!(relax(&sites, square(), 0).unwrap(), sites.to_vec());
    }
}
