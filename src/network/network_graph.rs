use std::fmt::Display;

use petgraph::{
    algo::connected_components,
    graph::{NodeIndex, UnGraph},
    visit::EdgeRef,
};
use serde::Serialize;
use thiserror::Error;

use crate::network::{
    edge::{Link, LinkKey, is_valid_cost},
    router::RouterId,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("{0} is not part of the topology")]
    UnknownRouter(RouterId),
    #[error("link {0} -> {0} would be a self-loop")]
    SelfLoop(RouterId),
    #[error("{0} and {1} are already linked")]
    DuplicateLink(RouterId, RouterId),
    #[error("link cost {0} outside of 1..=10")]
    CostOutOfRange(u32),
}

/// A simple undirected weighted graph of routers.
///
/// Router `i` always lives at node index `i`, so ids and petgraph indices map
/// one-to-one. The public surface is read-only: a topology is built once
/// (by the generator or [`Topology::from_links`]) and replaced, never edited.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: UnGraph<RouterId, Link>,
}

/// Plain serializable view of a topology, used for debug dumps.
#[derive(Debug, Clone, Serialize)]
pub struct TopologySnapshot {
    pub routers: Vec<RouterId>,
    pub links: Vec<Link>,
}

impl Topology {
    /// Creates `count` isolated routers.
    pub(crate) fn with_routers(count: usize) -> Self {
        let mut graph = UnGraph::with_capacity(count, count.saturating_sub(1));
        for id in 0..count {
            graph.add_node(RouterId(id));
        }
        Self { graph }
    }

    /// Builds a topology from explicit `(a, b, cost)` triples.
    /// The result is not required to be connected.
    pub fn from_links(
        count: usize,
        links: &[(usize, usize, u32)],
    ) -> Result<Self, TopologyError> {
        let mut topology = Self::with_routers(count);
        for &(a, b, cost) in links {
            topology.connect(RouterId(a), RouterId(b), cost)?;
        }
        Ok(topology)
    }

    pub(crate) fn connect(
        &mut self,
        a: RouterId,
        b: RouterId,
        cost: u32,
    ) -> Result<(), TopologyError> {
        let a_index = self.node_index(a).ok_or(TopologyError::UnknownRouter(a))?;
        let b_index = self.node_index(b).ok_or(TopologyError::UnknownRouter(b))?;
        if LinkKey::new(a, b).is_loop() {
            return Err(TopologyError::SelfLoop(a));
        }
        if !is_valid_cost(cost) {
            return Err(TopologyError::CostOutOfRange(cost));
        }
        if self.graph.find_edge(a_index, b_index).is_some() {
            return Err(TopologyError::DuplicateLink(a, b));
        }
        self.graph.add_edge(a_index, b_index, Link::new(a, b, cost));
        Ok(())
    }

    pub fn router_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn routers(&self) -> impl Iterator<Item = RouterId> + '_ {
        self.graph.node_weights().copied()
    }

    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.graph.edge_references().map(|edge| *edge.weight())
    }

    pub fn contains(&self, router: RouterId) -> bool {
        router.index() < self.graph.node_count()
    }

    pub fn link_between(&self, a: RouterId, b: RouterId) -> Option<Link> {
        let a = self.node_index(a)?;
        let b = self.node_index(b)?;
        self.graph.find_edge(a, b).map(|edge| self.graph[edge])
    }

    pub fn has_link(&self, a: RouterId, b: RouterId) -> bool {
        self.link_between(a, b).is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.router_count() <= 1 || connected_components(&self.graph) == 1
    }

    pub(crate) fn node_index(&self, router: RouterId) -> Option<NodeIndex> {
        self.contains(router).then(|| NodeIndex::new(router.index()))
    }

    pub(crate) fn graph(&self) -> &UnGraph<RouterId, Link> {
        &self.graph
    }

    pub fn snapshot(&self) -> TopologySnapshot {
        let mut links: Vec<Link> = self.links().collect();
        links.sort_by_key(|link| link.key);
        TopologySnapshot {
            routers: self.routers().collect(),
            links,
        }
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topology: {} routers, {} links",
            self.router_count(),
            self.link_count()
        )?;
        for link in self.snapshot().links {
            write!(f, "\n  {} <-> {} ({})", link.key.a, link.key.b, link.cost_label())?;
        }
        Ok(())
    }
}
