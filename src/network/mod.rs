/*
 * This module defines the graph model shared by the generator and the GUI:
 * routers, the links between them, the immutable topology that holds both,
 * and shortest-path search over it.
 */

pub mod router;
pub mod edge;
pub mod network_graph;
pub mod pathfinding;
