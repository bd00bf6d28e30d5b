use crate::network::{edge::LinkKey, pathfinding::Route};

/// Which frames a sequence produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// One frame, nothing highlighted.
    Base,
    /// One frame with every route link highlighted.
    FullPath,
    /// One frame per route link, each highlighting one more link than the last.
    Animated,
}

/// Description of a single picture: which links are drawn as part of the route.
/// Routers and links themselves come from the topology being drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub step: usize,
    pub total: usize,
    /// Highlighted links in travel order.
    pub highlighted: Vec<LinkKey>,
}

impl Frame {
    pub fn base() -> Self {
        Frame {
            step: 0,
            total: 1,
            highlighted: Vec::new(),
        }
    }

    pub fn is_highlighted(&self, key: LinkKey) -> bool {
        self.highlighted.contains(&key)
    }
}

/// Lazy, finite frame iterator over a route. Cloning or calling [`FrameSequence::restart`]
/// replays it from the first frame.
#[derive(Debug, Clone)]
pub struct FrameSequence<'a> {
    route: Option<&'a Route>,
    mode: FrameMode,
    next: usize,
    total: usize,
}

/// Frames for drawing a topology with an optional route on top.
pub fn frames(route: Option<&Route>, animate: bool) -> FrameSequence<'_> {
    let mode = match (route, animate) {
        (None, _) => FrameMode::Base,
        (Some(_), false) => FrameMode::FullPath,
        (Some(_), true) => FrameMode::Animated,
    };
    let total = match (mode, route) {
        (FrameMode::Animated, Some(route)) => route.link_count(),
        _ => 1,
    };
    FrameSequence {
        route,
        mode,
        next: 0,
        total,
    }
}

impl FrameSequence<'_> {
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }

    fn frame(&self, step: usize) -> Frame {
        let links = self.route.map(|route| route.link_keys());
        let highlighted = match (self.mode, links) {
            (FrameMode::FullPath, Some(links)) => links.collect(),
            (FrameMode::Animated, Some(links)) => links.take(step + 1).collect(),
            _ => Vec::new(),
        };
        Frame {
            step,
            total: self.total,
            highlighted,
        }
    }
}

impl Iterator for FrameSequence<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.total {
            return None;
        }
        let frame = self.frame(self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSequence<'_> {}
