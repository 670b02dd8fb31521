//! Voronoi shimmer: an approximate edge cloud between drifting sites.
//!
//! The edges are found by brute force. Every point of a 5px grid is compared
//! against every site, and points whose nearest and second-nearest sites are
//! almost equidistant are kept as edge samples. The scan costs
//! `O(grid points × sites)`, so it only reruns on roughly half of the
//! 1/20 s time buckets rather than every frame.

use backdrop_core::{DrawCommand, EffectKind, Rgba, Viewport};
use rand::{Rng, RngCore};

use crate::motion::Anchor;
use crate::population::Population;
use crate::scene::{Scene, clear};

pub const POPULATION: Population = Population::Density {
    density: 0.005,
    min: 8,
    max: 25,
};

/// Spacing of the sampling grid in pixels.
pub const GRID_STEP: f64 = 5.0;

/// Maximum `|d1 - d2|` for a grid point to count as an edge.
pub const BOUNDARY_THRESHOLD: f64 = 2.0;

const AMPLITUDE: f64 = 10.0;
const SAMPLE_SIZE: f64 = 2.0;
const HIGHLIGHT_CHANCE: f64 = 0.95;

/// A region generator swaying around its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub x: f64,
    pub y: f64,
    pub anchor: Anchor,
    /// Sway distance from the anchor in pixels.
    pub amplitude: f64,
}

impl Site {
    /// A motionless site at `(x, y)`.
    pub fn fixed(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            anchor: Anchor {
                origin_x: x,
                origin_y: y,
                speed_x: 0.0,
                speed_y: 0.0,
            },
            amplitude: 0.0,
        }
    }

    fn random(viewport: Viewport, rng: &mut dyn RngCore) -> Self {
        let x = rng.random::<f64>() * viewport.width;
        let y = rng.random::<f64>() * viewport.height;
        let speed_x = 0.2 + rng.random::<f64>() * 0.1;
        let speed_y = 0.2 + rng.random::<f64>() * 0.1;

        Self {
            x,
            y,
            anchor: Anchor {
                origin_x: x,
                origin_y: y,
                speed_x,
                speed_y,
            },
            amplitude: AMPLITUDE,
        }
    }

    pub fn update(&mut self, time: f64) {
        (self.x, self.y) = self.anchor.position(time, self.amplitude);
    }
}

/// A grid point lying approximately on a cell boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSample {
    pub x: f64,
    pub y: f64,
    /// Distance to the nearest site.
    pub distance: f64,
}

impl EdgeSample {
    /// Fill alpha; grows with distance and is left unclamped.
    pub fn alpha(&self) -> f64 {
        0.2 + (self.distance / 500.0) * 0.2
    }
}

/// Scan the grid and collect edge samples.
///
/// Fewer than two sites means there is no boundary anywhere, so the result
/// is empty.
pub fn compute_edges(sites: &[Site], viewport: Viewport) -> Vec<EdgeSample> {
    let mut edges = Vec::new();
    if sites.len() < 2 {
        return edges;
    }

    for y in grid(viewport.height) {
        for x in grid(viewport.width) {
            let mut nearest = f64::INFINITY;
            let mut second = f64::INFINITY;

            for site in sites {
                let dist = (x - site.x).hypot(y - site.y);
                if dist < nearest {
                    second = nearest;
                    nearest = dist;
                } else if dist < second {
                    second = dist;
                }
            }

            if (nearest - second).abs() < BOUNDARY_THRESHOLD {
                edges.push(EdgeSample {
                    x,
                    y,
                    distance: nearest,
                });
            }
        }
    }

    edges
}

/// Grid coordinates `0, 5, 10, …` strictly below `extent`.
fn grid(extent: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(|i| f64::from(i) * GRID_STEP)
        .take_while(move |&v| v < extent)
}

/// Whether the edges are recomputed in the frame at `time` seconds.
///
/// True for even 1/20 s buckets, which is about every other bucket rather
/// than a precise timer.
pub fn should_recompute(time: f64) -> bool {
    (time * 20.0).floor().rem_euclid(2.0) == 0.0
}

/// The Voronoi shimmer scene.
#[derive(Debug, Default)]
pub struct VoronoiField {
    viewport: Viewport,
    sites: Vec<Site>,
    edges: Vec<EdgeSample>,
}

impl VoronoiField {
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn edges(&self) -> &[EdgeSample] {
        &self.edges
    }

    /// Replace the sites and recompute the edges immediately.
    pub fn set_sites(&mut self, sites: Vec<Site>) {
        self.sites = sites;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.edges = compute_edges(&self.sites, self.viewport);
    }

    fn draw(&self, out: &mut Vec<DrawCommand>, rng: &mut dyn RngCore) {
        for edge in &self.edges {
            out.push(DrawCommand::FillRect {
                x: edge.x,
                y: edge.y,
                w: SAMPLE_SIZE,
                h: SAMPLE_SIZE,
                color: Rgba::white(edge.alpha()),
            });
        }

        // Now and then a site glimmers.
        if rng.random::<f64>() > HIGHLIGHT_CHANCE && !self.sites.is_empty() {
            let index = (rng.random::<f64>() * self.sites.len() as f64) as usize;
            let site = &self.sites[index.min(self.sites.len() - 1)];

            out.push(DrawCommand::BeginPath);
            out.push(DrawCommand::Arc {
                x: site.x,
                y: site.y,
                radius: 2.0,
            });
            out.push(DrawCommand::Fill {
                color: Rgba::white(0.2),
            });
            out.push(DrawCommand::Shadow {
                blur: 15.0,
                color: Rgba::white(0.3),
            });
            out.push(DrawCommand::BeginPath);
            out.push(DrawCommand::Arc {
                x: site.x,
                y: site.y,
                radius: 3.0,
            });
            out.push(DrawCommand::Fill {
                color: Rgba::white(0.05),
            });
            out.push(DrawCommand::Shadow {
                blur: 0.0,
                color: Rgba::TRANSPARENT,
            });
        }
    }
}

impl Scene for VoronoiField {
    fn kind(&self) -> EffectKind {
        EffectKind::Voronoi
    }

    fn initialize(&mut self, viewport: Viewport, rng: &mut dyn RngCore) {
        let count = POPULATION.count(viewport);
        self.viewport = viewport;
        self.sites = (0..count).map(|_| Site::random(viewport, rng)).collect();
        self.recompute();
        log::debug!(
            "voronoi seeded with {count} sites, {} edge samples",
            self.edges.len()
        );
    }

    fn tick(&mut self, now: f64, rng: &mut dyn RngCore) -> Vec<DrawCommand> {
        let mut out = vec![clear(self.viewport)];

        for site in &mut self.sites {
            site.update(now);
        }
        if should_recompute(now) {
            self.recompute();
        }

        self.draw(&mut out, rng);
        out
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn len(&self) -> usize {
        self.sites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_rng::FixedRng;
    use rand::{SeedableRng, rngs::StdRng};

    /// One grid row: x = 0, 5, …, 45 at y = 0.
    const ROW: Viewport = Viewport::new(50.0, 1.0);

    #[test]
    fn test_equidistant_point_included() {
        let sites = [Site::fixed(10.0, 0.0), Site::fixed(30.0, 0.0)];
        let edges = compute_edges(&sites, ROW);
        assert_eq!(
            edges,
            [EdgeSample {
                x: 20.0,
                y: 0.0,
                distance: 10.0,
            }]
        );
    }

    #[test]
    fn test_difference_just_below_threshold_included() {
        // At x = 20: d1 = 10, d2 = 11
        let sites = [Site::fixed(10.0, 0.0), Site::fixed(31.0, 0.0)];
        let edges = compute_edges(&sites, ROW);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].x, 20.0);
        assert_eq!(edges[0].distance, 10.0);
    }

    #[test]
    fn test_difference_at_threshold_excluded() {
        // At x = 20: d1 = 10, d2 = 12; every other grid point differs more.
        let sites = [Site::fixed(10.0, 0.0), Site::fixed(32.0, 0.0)];
        assert!(compute_edges(&sites, ROW).is_empty());
    }

    #[test]
    fn test_order_of_sites_irrelevant() {
        let a = [Site::fixed(10.0, 0.0), Site::fixed(30.0, 0.0)];
        let b = [Site::fixed(30.0, 0.0), Site::fixed(10.0, 0.0)];
        assert_eq!(compute_edges(&a, ROW), compute_edges(&b, ROW));
    }

    #[test]
    fn test_no_sites_no_edges() {
        assert!(compute_edges(&[], Viewport::new(100.0, 100.0)).is_empty());
        assert!(compute_edges(&[Site::fixed(5.0, 5.0)], Viewport::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_zero_area_no_edges() {
        let sites = [Site::fixed(0.0, 0.0), Site::fixed(0.0, 0.0)];
        assert!(compute_edges(&sites, Viewport::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_edges_lie_on_grid() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut field = VoronoiField::default();
        field.initialize(viewport, &mut StdRng::seed_from_u64(8));
        assert!(!field.edges().is_empty());
        for edge in field.edges() {
            assert_eq!(edge.x % GRID_STEP, 0.0);
            assert_eq!(edge.y % GRID_STEP, 0.0);
            assert!(edge.x < viewport.width && edge.y < viewport.height);
        }
    }

    #[test]
    fn test_site_count() {
        let mut field = VoronoiField::default();
        let mut rng = StdRng::seed_from_u64(1);
        // floor(40 * 30 * 0.005) = 6, clamped up to 8
        field.initialize(Viewport::new(40.0, 30.0), &mut rng);
        assert_eq!(field.len(), 8);
        // floor(60 * 60 * 0.005) = 18
        field.initialize(Viewport::new(60.0, 60.0), &mut rng);
        assert_eq!(field.len(), 18);
        field.initialize(Viewport::new(1920.0, 1080.0), &mut rng);
        assert_eq!(field.len(), 25);
    }

    #[test]
    fn test_sites_stay_within_ten_pixels() {
        let mut field = VoronoiField::default();
        field.initialize(Viewport::new(500.0, 400.0), &mut StdRng::seed_from_u64(2));
        let mut rng = StdRng::seed_from_u64(3);
        for frame in 0..200 {
            field.tick(1_700_000_000.0 + frame as f64 * 0.9, &mut rng);
            for site in field.sites() {
                assert!((site.x - site.anchor.origin_x).abs() <= 10.0);
                assert!((site.y - site.anchor.origin_y).abs() <= 10.0);
            }
        }
    }

    #[test]
    fn test_recompute_cadence() {
        assert!(should_recompute(0.0));
        assert!(should_recompute(0.049));
        assert!(!should_recompute(0.075));
        assert!(should_recompute(0.125));
        assert!(!should_recompute(1.06));
    }

    #[test]
    fn test_edges_frozen_on_odd_buckets() {
        let mut field = VoronoiField::default();
        field.set_sites(vec![Site::fixed(10.0, 0.0), Site::fixed(30.0, 0.0)]);
        // Stale: no viewport yet, so nothing computed.
        assert!(field.edges().is_empty());
        field.viewport = ROW;

        // Odd bucket: sites move but edges are not rebuilt.
        field.tick(0.075, &mut FixedRng::constant(0.0));
        assert!(field.edges().is_empty());

        // Even bucket: rebuilt from the current sites.
        field.tick(0.125, &mut FixedRng::constant(0.0));
        assert_eq!(
            field.edges(),
            [EdgeSample {
                x: 20.0,
                y: 0.0,
                distance: 10.0,
            }]
        );
    }

    #[test]
    fn test_fixed_site_stays_put() {
        let mut site = Site::fixed(10.0, 0.0);
        for time in [0.0, 0.075, 1.5, 1_700_000_000.0] {
            site.update(time);
            assert_eq!((site.x, site.y), (10.0, 0.0));
        }
    }

    #[test]
    fn test_random_site_sways_ten_pixels() {
        let mut site = Site::random(Viewport::new(100.0, 100.0), &mut FixedRng::constant(0.5));
        assert_eq!(site.amplitude, 10.0);
        // cos(0) puts the site a full amplitude below its anchor.
        site.update(0.0);
        assert_eq!(site.x, site.anchor.origin_x);
        assert_eq!(site.y, site.anchor.origin_y + 10.0);
    }

    #[test]
    fn test_edge_alpha_unclamped() {
        let near = EdgeSample { x: 0.0, y: 0.0, distance: 0.0 };
        let far = EdgeSample { x: 0.0, y: 0.0, distance: 2500.0 };
        assert_eq!(near.alpha(), 0.2);
        assert!((far.alpha() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_highlight_draws_last_site_on_high_roll() {
        let mut field = VoronoiField::default();
        field.viewport = ROW;
        field.set_sites(vec![Site::fixed(10.0, 0.0), Site::fixed(30.0, 0.0)]);

        let mut out = Vec::new();
        field.draw(&mut out, &mut FixedRng::constant(0.99));
        // one edge sample, then the highlight
        assert_eq!(out.len(), 1 + 8);
        assert_eq!(
            out[2],
            DrawCommand::Arc {
                x: 30.0,
                y: 0.0,
                radius: 2.0,
            }
        );

        let mut out = Vec::new();
        field.draw(&mut out, &mut FixedRng::constant(0.95));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_highlight_with_no_sites() {
        let field = VoronoiField::default();
        let mut out = Vec::new();
        field.draw(&mut out, &mut FixedRng::constant(0.99));
        assert!(out.is_empty());
    }
}
