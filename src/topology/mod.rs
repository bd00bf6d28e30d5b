/*!
Topology module

This module produces the topologies the GUI works on and keeps the current one around.

Structure:
- `generator`: random connected topology generation (spanning tree + extra links).
- `session`: the session state holding the current topology and routing requests against it.

Re-exports:
- `TopologySettings`, the knobs a topology is generated from.
- `Session` and `Selection` for the interaction layer.
*/

pub mod generator;
pub mod session;

pub use generator::TopologySettings;
pub use session::{Selection, Session};
