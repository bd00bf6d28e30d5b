use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identifier of a router in a generated topology. Routers are numbered `0..n`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RouterId(pub usize);

impl RouterId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Display label used in selectors, plots and route summaries.
    pub fn label(self) -> String {
        format!("Router{}", self.0)
    }
}

impl Display for RouterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Router{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_label() {
        assert_eq!(RouterId(7).label(), "Router7");
        assert_eq!(RouterId(0).to_string(), "Router0");
    }

    #[test]
    fn test_router_id_serializes_as_number() {
        let json = serde_json::to_string(&RouterId(3)).unwrap();
        assert_eq!(json, "3");
        let back: RouterId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RouterId(3));
    }
}
