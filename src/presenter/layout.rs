use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::network::{network_graph::Topology, router::RouterId};

const TICKS: usize = 300;
const TICK_SECONDS: f32 = 0.035;
/// Side of the square the simulation starts in, in simulation units.
const START_SPAN: f32 = 400.0;
const NODE_MASS: f32 = 10.0;
/// Share of the unit square kept free on every side after normalization.
const MARGIN: f32 = 0.08;

/// A position in the unit square, `(0, 0)` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Where an edge label goes: the segment midpoint pushed `offset` away from the line,
/// so the text does not sit on top of it.
pub fn label_anchor(a: Point, b: Point, offset: f32) -> Point {
    let mid = Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = a.distance(b);
    if len <= f32::EPSILON {
        return mid;
    }
    Point::new(mid.x - dy / len * offset, mid.y + dx / len * offset)
}

/// Maps a unit-square position into a `width` x `height` box whose top-left corner is
/// `origin`. Both axes use the shorter side, and the square is centered along the longer one.
pub fn to_viewport(p: Point, origin: Point, width: f32, height: f32) -> Point {
    let side = width.min(height);
    let left = origin.x + (width - side) * 0.5;
    let top = origin.y + (height - side) * 0.5;
    Point::new(left + p.x * side, top + p.y * side)
}

fn simulation_parameters() -> SimulationParameters {
    SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 3000.0,
        damping_factor: 0.9,
    }
}

/// Router positions produced by a fixed number of force simulation ticks.
///
/// The simulation starts from positions drawn from a seeded generator, so the
/// same topology and seed always give the same picture.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    positions: Vec<Point>,
}

impl Layout {
    pub fn spring(topology: &Topology, seed: u64) -> Self {
        let n = topology.router_count();
        if n <= 1 {
            return Layout {
                positions: vec![Point::new(0.5, 0.5); n],
            };
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph: ForceGraph<RouterId, ()> = ForceGraph::new(simulation_parameters());
        let indices: Vec<_> = topology
            .routers()
            .map(|router| {
                graph.add_node(NodeData {
                    x: rng.random::<f32>() * START_SPAN,
                    y: rng.random::<f32>() * START_SPAN,
                    mass: NODE_MASS,
                    is_anchor: false,
                    user_data: router,
                })
            })
            .collect();
        for link in topology.links() {
            let (a, b) = link.key.endpoints();
            graph.add_edge(indices[a.index()], indices[b.index()], EdgeData::default());
        }

        for _ in 0..TICKS {
            graph.update(TICK_SECONDS);
        }

        let mut pos = vec![[0.0f32; 2]; n];
        graph.visit_nodes(|node| {
            if let Some(slot) = pos.get_mut(node.data.user_data.index()) {
                *slot = [node.x(), node.y()];
            }
        });
        Layout {
            positions: normalize(&pos),
        }
    }

    pub fn position(&self, router: RouterId) -> Option<Point> {
        self.positions.get(router.index()).copied()
    }
}

/// Scales positions uniformly into the unit square, centered, keeping `MARGIN` free.
fn normalize(pos: &[[f32; 2]]) -> Vec<Point> {
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for p in pos {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(f32::EPSILON);
    let scale = (1.0 - 2.0 * MARGIN) / span;
    let (center_x, center_y) = ((min_x + max_x) * 0.5, (min_y + max_y) * 0.5);
    pos.iter()
        .map(|p| Point::new(0.5 + (p[0] - center_x) * scale, 0.5 + (p[1] - center_y) * scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Topology {
        Topology::from_links(4, &[(0, 1, 2), (1, 2, 3), (0, 2, 10), (2, 3, 1)]).unwrap()
    }

    #[test]
    fn test_layout_is_deterministic() {
        let topology = scenario();
        assert_eq!(Layout::spring(&topology, 42), Layout::spring(&topology, 42));
    }

    #[test]
    fn test_layout_stays_inside_unit_square() {
        let layout = Layout::spring(&scenario(), 42);
        let positions: Vec<Point> = (0..4).filter_map(|i| layout.position(RouterId(i))).collect();
        assert_eq!(positions.len(), 4);
        assert_eq!(layout.position(RouterId(4)), None);
        for p in positions {
            assert!((0.0..=1.0).contains(&p.x), "x out of bounds: {p:?}");
            assert!((0.0..=1.0).contains(&p.y), "y out of bounds: {p:?}");
        }
    }

    #[test]
    fn test_routers_do_not_overlap() {
        let layout = Layout::spring(&scenario(), 7);
        let positions: Vec<Point> = (0..4).filter_map(|i| layout.position(RouterId(i))).collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert!(positions[i].distance(positions[j]) > 0.01);
            }
        }
    }

    #[test]
    fn test_single_router_is_centered() {
        let topology = Topology::from_links(1, &[]).unwrap();
        let layout = Layout::spring(&topology, 42);
        assert_eq!(layout.position(RouterId(0)), Some(Point::new(0.5, 0.5)));
        assert_eq!(layout.position(RouterId(1)), None);
    }

    #[test]
    fn test_label_anchor_is_offset_from_midpoint() {
        let anchor = label_anchor(Point::new(0.0, 0.0), Point::new(2.0, 0.0), 0.5);
        assert_eq!(anchor, Point::new(1.0, 0.5));
        let degenerate = label_anchor(Point::new(1.0, 1.0), Point::new(1.0, 1.0), 0.5);
        assert_eq!(degenerate, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_viewport_keeps_aspect_ratio() {
        let origin = Point::new(10.0, 20.0);
        let wide = |p| to_viewport(p, origin, 800.0, 600.0);
        assert_eq!(wide(Point::new(0.0, 0.0)), Point::new(110.0, 20.0));
        assert_eq!(wide(Point::new(1.0, 1.0)), Point::new(710.0, 620.0));

        let tall = to_viewport(Point::new(0.5, 0.5), origin, 300.0, 500.0);
        assert_eq!(tall, Point::new(160.0, 270.0));
    }
}
