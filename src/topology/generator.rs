/*!
Random topology generation.

A topology is built in two passes: a random spanning tree over a shuffled router
order (which makes it connected), then extra links between random unlinked pairs.
The random source is passed in so callers can seed it.
*/

use rand::{
    Rng,
    seq::{SliceRandom, index},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::{
    edge::{LinkKey, MAX_LINK_COST, MIN_LINK_COST},
    network_graph::{Topology, TopologyError},
    router::RouterId,
};

/// Fewest routers a generated topology may have.
pub const MIN_ROUTERS: usize = 2;

/// Rejection-sampling budget per requested extra link before falling back to
/// drawing from the list of unlinked pairs.
const SAMPLE_ATTEMPTS_PER_LINK: usize = 64;

/// The knobs a topology is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySettings {
    pub routers: usize,
    pub extra_links: usize,
}

/// How many of the requested extra links actually made it into the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationReport {
    pub requested_extra: usize,
    pub added_extra: usize,
}

impl GenerationReport {
    /// Extra links that could not be placed because the graph ran out of free pairs.
    pub fn shortfall(&self) -> usize {
        self.requested_extra.saturating_sub(self.added_extra)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("a topology needs at least 2 routers, got {0}")]
    TooFewRouters(usize),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Number of links in a complete graph over `routers` routers.
pub fn max_links(routers: usize) -> usize {
    routers * routers.saturating_sub(1) / 2
}

/// Generates a connected, simple, positively weighted topology.
///
/// Extra links beyond what the complete graph allows are dropped and reported
/// through [`GenerationReport::shortfall`].
pub fn generate<R: Rng + ?Sized>(
    settings: TopologySettings,
    rng: &mut R,
) -> Result<(Topology, GenerationReport), GenerateError> {
    let routers = settings.routers;
    if routers < MIN_ROUTERS {
        return Err(GenerateError::TooFewRouters(routers));
    }

    let mut topology = Topology::with_routers(routers);

    // Spanning tree: every router after the first attaches to a random earlier one.
    let mut order: Vec<RouterId> = (0..routers).map(RouterId).collect();
    order.shuffle(rng);
    for i in 1..order.len() {
        let earlier = order[rng.random_range(0..i)];
        topology.connect(order[i], earlier, random_cost(rng))?;
    }

    let capacity = max_links(routers) - (routers - 1);
    let target = settings.extra_links.min(capacity);
    if target < settings.extra_links {
        tracing::warn!(
            routers,
            requested = settings.extra_links,
            capacity,
            "not enough free router pairs for the requested extra links"
        );
    }

    let mut added = 0;
    let mut attempts = 0;
    let budget = target * SAMPLE_ATTEMPTS_PER_LINK;
    while added < target && attempts < budget {
        attempts += 1;
        let pair = index::sample(rng, routers, 2);
        let (a, b) = (RouterId(pair.index(0)), RouterId(pair.index(1)));
        if topology.has_link(a, b) {
            continue;
        }
        topology.connect(a, b, random_cost(rng))?;
        added += 1;
    }

    if added < target {
        tracing::debug!(attempts, added, target, "sampling budget spent, drawing from free pairs");
        let mut free = unlinked_pairs(&topology);
        free.shuffle(rng);
        for key in free.into_iter().take(target - added) {
            topology.connect(key.a, key.b, random_cost(rng))?;
            added += 1;
        }
    }

    let report = GenerationReport {
        requested_extra: settings.extra_links,
        added_extra: added,
    };
    tracing::info!(
        routers,
        links = topology.link_count(),
        extra = report.added_extra,
        "generated topology"
    );
    Ok((topology, report))
}

fn random_cost<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(MIN_LINK_COST..=MAX_LINK_COST)
}

fn unlinked_pairs(topology: &Topology) -> Vec<LinkKey> {
    let routers: Vec<RouterId> = topology.routers().collect();
    let mut free = Vec::new();
    for (i, &a) in routers.iter().enumerate() {
        for &b in &routers[i + 1..] {
            if !topology.has_link(a, b) {
                free.push(LinkKey::new(a, b));
            }
        }
    }
    free
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn settings(routers: usize, extra_links: usize) -> TopologySettings {
        TopologySettings {
            routers,
            extra_links,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_generated_topology_is_connected_and_simple(
            seed in any::<u64>(),
            routers in 2usize..=20,
            extra in 0usize..=10,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let (topology, report) = generate(settings(routers, extra), &mut rng).unwrap();

            prop_assert_eq!(topology.router_count(), routers);
            prop_assert!(topology.is_connected());

            let mut seen = HashSet::new();
            for link in topology.links() {
                prop_assert!(!link.key.is_loop());
                prop_assert!(seen.insert(link.key), "duplicate link {:?}", link.key);
                prop_assert!((MIN_LINK_COST..=MAX_LINK_COST).contains(&link.cost));
            }

            prop_assert_eq!(topology.link_count(), routers - 1 + report.added_extra);
            prop_assert!(report.added_extra <= extra);
            prop_assert_eq!(report.added_extra, extra.min(max_links(routers) - (routers - 1)));
        }
    }

    #[test]
    fn test_rejects_too_few_routers() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(settings(1, 0), &mut rng).unwrap_err(),
            GenerateError::TooFewRouters(1)
        );
        assert_eq!(
            generate(settings(0, 3), &mut rng).unwrap_err(),
            GenerateError::TooFewRouters(0)
        );
    }

    #[test]
    fn test_infeasible_extra_links_are_reported() {
        let mut rng = StdRng::seed_from_u64(7);
        let (topology, report) = generate(settings(3, 5), &mut rng).unwrap();
        assert_eq!(topology.link_count(), 3);
        assert_eq!(report.added_extra, 1);
        assert_eq!(report.shortfall(), 4);

        let (topology, report) = generate(settings(2, 3), &mut rng).unwrap();
        assert_eq!(topology.link_count(), 1);
        assert_eq!(report.added_extra, 0);
    }

    #[test]
    fn test_fills_up_to_complete_graph() {
        let mut rng = StdRng::seed_from_u64(99);
        let (topology, report) = generate(settings(20, 171), &mut rng).unwrap();
        assert_eq!(topology.link_count(), max_links(20));
        assert_eq!(report.shortfall(), 0);
    }

    #[test]
    fn test_same_seed_same_topology() {
        let first = generate(settings(12, 6), &mut StdRng::seed_from_u64(42)).unwrap().0;
        let second = generate(settings(12, 6), &mut StdRng::seed_from_u64(42)).unwrap().0;
        assert_eq!(first.snapshot().links, second.snapshot().links);
    }
}
