/*!
Session state shared across user interactions.

This module defines:
- `Session`: owns the current topology and the settings it was generated from.
  The topology survives interactions until it is explicitly regenerated or the
  settings change, and is replaced wholesale when that happens.
- `Selection`: the source/destination pair picked by the user, re-validated
  against the current topology on every interaction.
*/

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    network::{
        network_graph::Topology,
        pathfinding::{Route, RoutingError, shortest_path},
        router::RouterId,
    },
    topology::generator::{GenerateError, GenerationReport, TopologySettings, generate},
};

/// Source and destination routers chosen for a routing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub source: RouterId,
    pub destination: RouterId,
}

impl Selection {
    /// First router to last router.
    pub fn for_topology(topology: &Topology) -> Self {
        Selection {
            source: RouterId(0),
            destination: last_router(topology),
        }
    }

    /// Moves routers that no longer exist onto the last router of `topology`.
    pub fn fit_to(self, topology: &Topology) -> Self {
        let clamp = |router: RouterId| {
            if topology.contains(router) {
                router
            } else {
                last_router(topology)
            }
        };
        Selection {
            source: clamp(self.source),
            destination: clamp(self.destination),
        }
    }

    pub fn is_same_router(&self) -> bool {
        self.source == self.destination
    }
}

fn last_router(topology: &Topology) -> RouterId {
    RouterId(topology.router_count().saturating_sub(1))
}

/// Holds the one topology the user is working with.
pub struct Session {
    settings: TopologySettings,
    topology: Topology,
    report: GenerationReport,
    generation: u64,
    rng: StdRng,
}

impl Session {
    /// Creates a session whose topologies are drawn from an OS-seeded generator.
    pub fn new(settings: TopologySettings) -> Result<Self, GenerateError> {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Creates a session drawing topologies from `rng`.
    pub fn with_rng(settings: TopologySettings, mut rng: StdRng) -> Result<Self, GenerateError> {
        let (topology, report) = generate(settings, &mut rng)?;
        Ok(Session {
            settings,
            topology,
            report,
            generation: 0,
            rng,
        })
    }

    pub fn settings(&self) -> TopologySettings {
        self.settings
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn report(&self) -> GenerationReport {
        self.report
    }

    /// Increases by one every time the topology is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the topology with a fresh one using the current settings.
    pub fn regenerate(&mut self) -> Result<(), GenerateError> {
        let (topology, report) = generate(self.settings, &mut self.rng)?;
        self.replace(topology, report);
        Ok(())
    }

    /// Regenerates when `settings` differ from the ones the current topology was built with.
    /// Returns whether the topology was replaced. On error the session is left untouched.
    pub fn apply_settings(&mut self, settings: TopologySettings) -> Result<bool, GenerateError> {
        if settings == self.settings {
            return Ok(false);
        }
        let (topology, report) = generate(settings, &mut self.rng)?;
        tracing::info!(
            routers = settings.routers,
            extra_links = settings.extra_links,
            "[session] settings changed"
        );
        self.settings = settings;
        self.replace(topology, report);
        Ok(true)
    }

    /// Shortest route for `selection` over the current topology. Never mutates the topology.
    pub fn route(&self, selection: Selection) -> Result<Route, RoutingError> {
        shortest_path(&self.topology, selection.source, selection.destination)
    }

    fn replace(&mut self, topology: Topology, report: GenerationReport) {
        self.topology = topology;
        self.report = report;
        self.generation += 1;
    }
}
