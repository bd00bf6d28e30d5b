use serde::{Deserialize, Serialize};

use crate::network::router::RouterId;

/// Smallest cost a generated link can carry.
pub const MIN_LINK_COST: u32 = 1;
/// Largest cost a generated link can carry.
pub const MAX_LINK_COST: u32 = 10;
/// Unit displayed next to link and route costs.
pub const COST_UNIT: &str = "ms";

/// A bidirectional link between two routers. The cost models link latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub key: LinkKey,
    pub cost: u32,
}

impl Link {
    pub fn new(a: RouterId, b: RouterId, cost: u32) -> Self {
        Link {
            key: LinkKey::new(a, b),
            cost,
        }
    }

    pub fn cost_label(&self) -> String {
        format!("{} {}", self.cost, COST_UNIT)
    }
}

pub fn is_valid_cost(cost: u32) -> bool {
    (MIN_LINK_COST..=MAX_LINK_COST).contains(&cost)
}

/// Order-independent identity of a link: `LinkKey::new(a, b) == LinkKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkKey {
    pub a: RouterId,
    pub b: RouterId,
}

impl LinkKey {
    pub fn new(a: RouterId, b: RouterId) -> Self {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        LinkKey { a, b }
    }

    pub fn endpoints(&self) -> (RouterId, RouterId) {
        (self.a, self.b)
    }

    pub fn is_loop(&self) -> bool {
        self.a == self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_key_is_order_independent() {
        let forward = LinkKey::new(RouterId(4), RouterId(1));
        let backward = LinkKey::new(RouterId(1), RouterId(4));
        assert_eq!(forward, backward);
        assert_eq!(forward.endpoints(), (RouterId(1), RouterId(4)));
    }

    #[test]
    fn test_cost_bounds() {
        assert!(!is_valid_cost(0));
        assert!(is_valid_cost(1));
        assert!(is_valid_cost(10));
        assert!(!is_valid_cost(11));
        assert_eq!(Link::new(RouterId(0), RouterId(1), 7).cost_label(), "7 ms");
    }
}
