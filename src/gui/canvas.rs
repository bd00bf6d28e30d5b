use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Response, Sense, Stroke, Ui, Vec2};

use crate::{
    gui::app::get_theme,
    network::{network_graph::Topology, router::RouterId},
    presenter::{
        frames::Frame,
        layout::{Layout, Point, label_anchor, to_viewport},
    },
};

const NODE_RADIUS: f32 = 20.0;
const LINK_WIDTH: f32 = 1.5;
const PATH_WIDTH: f32 = 4.0;
const LABEL_OFFSET: f32 = 10.0;
const CANVAS_PADDING: f32 = 12.0;

/// Paints `frame` of `topology` into the remaining space of `ui`.
/// Hovering a router shows its links in a tooltip.
pub fn paint_frame(ui: &mut Ui, topology: &Topology, layout: &Layout, frame: &Frame) -> Response {
    let theme = get_theme();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let rect = response.rect.shrink(CANVAS_PADDING);
    let origin = Point::new(rect.min.x, rect.min.y);
    let to_screen = |p: Point| {
        let p = to_viewport(p, origin, rect.width(), rect.height());
        Pos2::new(p.x, p.y)
    };

    painter.rect_filled(response.rect, CornerRadius::same(4), theme.mantle);

    let mut path_segments = Vec::new();
    for link in topology.links() {
        let (a, b) = link.key.endpoints();
        let (Some(a), Some(b)) = (layout.position(a), layout.position(b)) else {
            continue;
        };
        let (a, b) = (to_screen(a), to_screen(b));
        let a_boundary = closest_point_on_circle(a, NODE_RADIUS, b - a);
        let b_boundary = closest_point_on_circle(b, NODE_RADIUS, a - b);
        painter.line_segment([a_boundary, b_boundary], Stroke::new(LINK_WIDTH, theme.overlay0));
        if frame.is_highlighted(link.key) {
            path_segments.push([a_boundary, b_boundary]);
        }

        let anchor = label_anchor(Point::new(a.x, a.y), Point::new(b.x, b.y), LABEL_OFFSET);
        painter.text(
            Pos2::new(anchor.x, anchor.y),
            Align2::CENTER_CENTER,
            link.cost.to_string(),
            FontId::proportional(12.0),
            theme.subtext0,
        );
    }

    // Route on top of the plain links.
    for segment in path_segments {
        painter.line_segment(segment, Stroke::new(PATH_WIDTH, theme.blue));
    }

    let hover = response.hover_pos();
    let mut hovered: Option<RouterId> = None;
    for router in topology.routers() {
        let Some(p) = layout.position(router) else {
            continue;
        };
        let center = to_screen(p);
        let on_path = frame
            .highlighted
            .iter()
            .any(|key| key.a == router || key.b == router);
        let (fill, stroke) = if on_path {
            (blend(theme.surface1, theme.blue), Stroke::new(2.0, theme.blue))
        } else {
            (theme.surface1, Stroke::new(1.0, theme.overlay1))
        };
        painter.circle(center, NODE_RADIUS, fill, stroke);
        painter.text(
            center,
            Align2::CENTER_CENTER,
            router.label(),
            FontId::proportional(10.0),
            theme.text,
        );
        if hover.is_some_and(|pos| is_inside_circle(center, NODE_RADIUS, pos)) {
            hovered = Some(router);
        }
    }

    if frame.total > 1 {
        painter.text(
            rect.min,
            Align2::LEFT_TOP,
            format!("Hop {} of {}", frame.step + 1, frame.total),
            FontId::proportional(14.0),
            theme.text,
        );
    }

    match hovered {
        Some(router) => response.on_hover_ui_at_pointer(|ui| router_tooltip(ui, topology, router)),
        None => response,
    }
}

fn router_tooltip(ui: &mut Ui, topology: &Topology, router: RouterId) {
    ui.strong(router.label());
    for link in topology.links().filter(|link| link.key.a == router || link.key.b == router) {
        let peer = if link.key.a == router { link.key.b } else { link.key.a };
        ui.label(format!("{} ({})", peer.label(), link.cost_label()));
    }
}

fn closest_point_on_circle(center: Pos2, radius: f32, dir: Vec2) -> Pos2 {
    center + dir.normalized() * (radius + 1.0)
}

fn is_inside_circle(center: Pos2, radius: f32, pos: Pos2) -> bool {
    let dir = pos - center;
    dir.length() <= radius
}

fn blend(base: Color32, accent: Color32) -> Color32 {
    Color32::from_rgb(
        ((base.r() as u16 * 2 + accent.r() as u16) / 3) as u8,
        ((base.g() as u16 * 2 + accent.g() as u16) / 3) as u8,
        ((base.b() as u16 * 2 + accent.b() as u16) / 3) as u8,
    )
}
