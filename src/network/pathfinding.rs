use petgraph::{algo::astar, visit::EdgeRef};
use serde::Serialize;
use thiserror::Error;

use crate::network::{
    edge::{COST_UNIT, LinkKey},
    network_graph::Topology,
    router::RouterId,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("source and destination are both {0}")]
    SameEndpoints(RouterId),
    #[error("{0} is not part of the topology")]
    UnknownRouter(RouterId),
    #[error("no path from {from} to {to}")]
    NoPath { from: RouterId, to: RouterId },
}

impl RoutingError {
    /// Selection mistakes the user can fix, as opposed to failures of the topology itself.
    pub fn is_selection_error(&self) -> bool {
        matches!(self, RoutingError::SameEndpoints(_))
    }
}

/// A minimum-cost path between two routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    hops: Vec<RouterId>,
    leg_costs: Vec<u32>,
    cost: u32,
}

/// One link traversal along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLeg {
    pub from: RouterId,
    pub to: RouterId,
    pub cost: u32,
    pub cumulative: u32,
}

impl Route {
    pub fn hops(&self) -> &[RouterId] {
        &self.hops
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn link_count(&self) -> usize {
        self.leg_costs.len()
    }

    /// Links along the route in travel order.
    pub fn link_keys(&self) -> impl Iterator<Item = LinkKey> + '_ {
        self.hops.windows(2).map(|pair| LinkKey::new(pair[0], pair[1]))
    }

    pub fn legs(&self) -> Vec<RouteLeg> {
        let mut cumulative = 0;
        self.hops
            .windows(2)
            .zip(&self.leg_costs)
            .map(|(pair, &cost)| {
                cumulative += cost;
                RouteLeg {
                    from: pair[0],
                    to: pair[1],
                    cost,
                    cumulative,
                }
            })
            .collect()
    }

    /// Human readable hop list, e.g. `Router3 → Router1 → Router7`.
    pub fn describe(&self) -> String {
        self.hops
            .iter()
            .map(|hop| hop.label())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    pub fn cost_label(&self) -> String {
        format!("{} {}", self.cost, COST_UNIT)
    }
}

/// Dijkstra's shortest path between `source` and `target` over link costs.
///
/// Runs as A* with a zero heuristic. Ties between equal-cost paths are broken
/// by the search order, so only the cost is guaranteed to be minimal.
pub fn shortest_path(
    topology: &Topology,
    source: RouterId,
    target: RouterId,
) -> Result<Route, RoutingError> {
    let start = topology
        .node_index(source)
        .ok_or(RoutingError::UnknownRouter(source))?;
    let goal = topology
        .node_index(target)
        .ok_or(RoutingError::UnknownRouter(target))?;
    if source == target {
        return Err(RoutingError::SameEndpoints(source));
    }

    let graph = topology.graph();
    let (cost, nodes) = astar(
        graph,
        start,
        |node| node == goal,
        |edge| edge.weight().cost,
        |_| 0,
    )
    .ok_or(RoutingError::NoPath {
        from: source,
        to: target,
    })?;

    let hops: Vec<RouterId> = nodes.into_iter().map(|node| graph[node]).collect();
    let leg_costs = hops
        .windows(2)
        .map(|pair| topology.link_between(pair[0], pair[1]).map(|link| link.cost))
        .collect::<Option<Vec<u32>>>()
        .ok_or(RoutingError::NoPath {
            from: source,
            to: target,
        })?;

    tracing::debug!(%source, %target, cost, hops = hops.len(), "computed shortest path");
    Ok(Route {
        hops,
        leg_costs,
        cost,
    })
}
