use crate::{
    network::network_graph::Topology,
    presenter::{
        frames::Frame,
        layout::{Layout, Point, label_anchor, to_viewport},
    },
};

const BACKGROUND: &str = "#ffffff";
const LINK_COLOR: &str = "#9ca0b0";
const PATH_COLOR: &str = "#1e66f5";
const NODE_FILL: &str = "#d3d3d3";
const NODE_STROKE: &str = "#4c4f69";
const TEXT_COLOR: &str = "#4c4f69";

const NODE_RADIUS: f32 = 20.0;
const LINK_WIDTH: f32 = 1.5;
const PATH_WIDTH: f32 = 4.0;
const LABEL_OFFSET: f32 = 10.0;

/// Renders one frame as a standalone SVG document of `width` x `height` pixels.
pub fn frame_svg(
    topology: &Topology,
    layout: &Layout,
    frame: &Frame,
    width: u32,
    height: u32,
) -> String {
    let origin = Point::new(0.0, 0.0);
    let to_canvas = |p: Point| to_viewport(p, origin, width as f32, height as f32);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{BACKGROUND}"/>"#
    ));

    let mut link_labels = String::new();
    let mut path_lines = String::new();
    for link in topology.snapshot().links {
        let (a, b) = link.key.endpoints();
        let (Some(a), Some(b)) = (layout.position(a), layout.position(b)) else {
            continue;
        };
        let (a, b) = (to_canvas(a), to_canvas(b));
        let line = format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}""#,
            a.x, a.y, b.x, b.y
        );
        svg.push_str(&format!(
            r#"{line} stroke="{LINK_COLOR}" stroke-width="{LINK_WIDTH}"/>"#
        ));
        if frame.is_highlighted(link.key) {
            path_lines.push_str(&format!(
                r#"{line} class="path" stroke="{PATH_COLOR}" stroke-width="{PATH_WIDTH}" stroke-linecap="round"/>"#
            ));
        }
        let anchor = label_anchor(a, b, LABEL_OFFSET);
        link_labels.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" fill="{TEXT_COLOR}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            anchor.x, anchor.y, link.cost
        ));
    }
    svg.push_str(&path_lines);
    svg.push_str(&link_labels);

    for router in topology.routers() {
        let Some(p) = layout.position(router) else {
            continue;
        };
        let p = to_canvas(p);
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{NODE_RADIUS}" fill="{NODE_FILL}" stroke="{NODE_STROKE}"/>"#,
            p.x, p.y
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="10" fill="{TEXT_COLOR}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            p.x,
            p.y,
            router.label()
        ));
    }

    if frame.total > 1 {
        svg.push_str(&format!(
            r#"<text x="12" y="20" font-family="sans-serif" font-size="14" fill="{TEXT_COLOR}">Hop {} of {}</text>"#,
            frame.step + 1,
            frame.total
        ));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::{pathfinding::shortest_path, router::RouterId},
        presenter::frames::frames,
    };

    fn scenario() -> Topology {
        Topology::from_links(4, &[(0, 1, 2), (1, 2, 3), (0, 2, 10), (2, 3, 1)]).unwrap()
    }

    #[test]
    fn test_base_frame_draws_every_router_and_link() {
        let topology = scenario();
        let layout = Layout::spring(&topology, 42);
        let svg = frame_svg(&topology, &layout, &Frame::base(), 800, 600);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("<line").count(), 4);
        assert!(!svg.contains(r#"class="path""#));
        for label in ["Router0", "Router1", "Router2", "Router3", ">10<"] {
            assert!(svg.contains(label), "missing {label}");
        }
    }

    #[test]
    fn test_highlighted_links_are_overlaid() {
        let topology = scenario();
        let layout = Layout::spring(&topology, 42);
        let route = shortest_path(&topology, RouterId(0), RouterId(3)).unwrap();
        let frames: Vec<Frame> = frames(Some(&route), true).collect();

        let second = frame_svg(&topology, &layout, &frames[1], 800, 600);
        assert_eq!(second.matches(r#"class="path""#).count(), 2);
        assert!(second.contains("Hop 2 of 3"));
    }
}
