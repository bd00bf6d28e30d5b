use std::time::{Duration, Instant};

use eframe::egui;
use egui::{
    Button, CentralPanel, CollapsingHeader, ComboBox, Context, Separator, SidePanel, Slider, Ui,
};
use thiserror::Error;

use crate::{
    config::{AppConfig, ConfigError, EXTRA_LINK_RANGE, ROUTER_RANGE},
    gui::{canvas::paint_frame, route_panel::hop_table},
    network::{
        pathfinding::{Route, RoutingError},
        router::RouterId,
    },
    presenter::{
        frames::{Frame, frames},
        layout::Layout,
        playback::Playback,
        raster::export_frames,
    },
    topology::{Selection, Session, TopologySettings, generator::GenerateError},
};

pub fn get_theme() -> catppuccin_egui::Theme {
    catppuccin_egui::MOCHA
}

pub fn main(config: AppConfig) -> eframe::Result {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "ConnectFlow: Network Routing",
        native_options,
        Box::new(move |cc| {
            let app = App::new(cc, config)?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to generate the initial topology: {0}")]
    Generate(#[from] GenerateError),
}

/// Outcome of the last export, shown under the export button.
enum ExportStatus {
    Written(usize),
    Failed(String),
}

struct App {
    config: AppConfig,
    frame_delay: Duration,

    session: Session,
    // Bound to the sliders, applied to the session every frame.
    settings: TopologySettings,
    layout: Layout,

    selection: Selection,
    animate: bool,
    route: Option<Route>,
    playback: Option<Playback>,
    routing_error: Option<RoutingError>,
    generate_error: Option<GenerateError>,
    export_status: Option<ExportStatus>,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self, StartupError> {
        catppuccin_egui::set_theme(&cc.egui_ctx, get_theme());

        let frame_delay = config.frame_delay()?;
        let settings = config.topology_settings();
        let session = Session::new(settings)?;
        let layout = Layout::spring(session.topology(), config.layout_seed);
        let selection = Selection::for_topology(session.topology());
        tracing::info!(
            routers = settings.routers,
            extra_links = settings.extra_links,
            "[app] Started with a fresh topology"
        );

        Ok(Self {
            config,
            frame_delay,
            session,
            settings,
            layout,
            selection,
            animate: true,
            route: None,
            playback: None,
            routing_error: None,
            generate_error: None,
            export_status: None,
        })
    }

    fn playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Everything derived from the topology is stale once it has been replaced.
    fn on_topology_replaced(&mut self) {
        self.layout = Layout::spring(self.session.topology(), self.config.layout_seed);
        self.selection = self.selection.fit_to(self.session.topology());
        self.clear_route();
        tracing::debug!(
            generation = self.session.generation(),
            links = self.session.topology().link_count(),
            "[app] Topology replaced"
        );
    }

    fn clear_route(&mut self) {
        self.route = None;
        self.playback = None;
        self.routing_error = None;
        self.export_status = None;
    }

    fn apply_settings(&mut self) {
        match self.session.apply_settings(self.settings) {
            Ok(true) => {
                self.generate_error = None;
                self.on_topology_replaced();
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!("[app] Failed to apply settings: {}", e);
                // Sliders snap back to what the current topology was built with.
                self.settings = self.session.settings();
                self.generate_error = Some(e);
            }
        }
    }

    fn regenerate(&mut self) {
        tracing::info!("[app] Pressed generate new topology button");
        match self.session.regenerate() {
            Ok(()) => {
                self.generate_error = None;
                self.on_topology_replaced();
            }
            Err(e) => {
                tracing::error!("[app] Failed to regenerate topology: {}", e);
                self.generate_error = Some(e);
            }
        }
    }

    fn start_routing(&mut self, now: Instant) {
        tracing::info!(
            source = %self.selection.source,
            destination = %self.selection.destination,
            "[app] Pressed start routing button"
        );
        self.clear_route();
        match self.session.route(self.selection) {
            Ok(route) => {
                let sequence = frames(Some(&route), self.animate);
                tracing::info!(
                    path = %route.describe(),
                    cost = route.cost(),
                    hops = route.hops().len(),
                    mode = ?sequence.mode(),
                    "[app] Route found"
                );
                if self.animate {
                    let sequence: Vec<Frame> = sequence.collect();
                    self.playback = Some(Playback::start(sequence, self.frame_delay, now));
                }
                self.route = Some(route);
            }
            Err(e) if e.is_selection_error() => {
                tracing::warn!("[app] {}", e);
                self.routing_error = Some(e);
            }
            Err(e) => {
                tracing::error!("[app] Routing failed: {}", e);
                self.routing_error = Some(e);
            }
        }
    }

    fn export(&mut self) {
        tracing::info!(
            dir = %self.config.export_dir.display(),
            "[app] Pressed export frames button"
        );
        let result = export_frames(
            self.session.topology(),
            &self.layout,
            frames(self.route.as_ref(), true),
            &self.config.export_dir,
            self.config.frame_width,
            self.config.frame_height,
        );
        self.export_status = Some(match result {
            Ok(written) => {
                tracing::info!(frames = written.len(), "[app] Exported frames");
                ExportStatus::Written(written.len())
            }
            Err(e) => {
                tracing::error!("[app] Export failed: {}", e);
                ExportStatus::Failed(e.to_string())
            }
        });
    }

    fn print_topology(&self) {
        tracing::info!("[app] Pressed print topology button");
        match serde_json::to_string_pretty(&self.session.topology().snapshot()) {
            Ok(json) => println!("{}", json),
            Err(err) => tracing::error!("Error serializing topology: {}", err),
        }
    }

    fn render_topology_section(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Topology")
            .default_open(true)
            .show(ui, |ui| {
                ui.add(Slider::new(&mut self.settings.routers, ROUTER_RANGE).text("Routers"));
                ui.add(
                    Slider::new(&mut self.settings.extra_links, EXTRA_LINK_RANGE)
                        .text("Extra links"),
                );
                self.apply_settings();

                if ui.button("🔁 Generate New Topology").clicked() {
                    self.regenerate();
                }

                let report = self.session.report();
                if report.shortfall() > 0 {
                    ui.small(format!(
                        "Only {} of {} extra links fit this topology",
                        report.added_extra, report.requested_extra
                    ));
                }
                if let Some(e) = &self.generate_error {
                    ui.colored_label(get_theme().red, e.to_string());
                }
            });
    }

    fn render_routing_section(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Routing")
            .default_open(true)
            .show(ui, |ui| {
                let before = self.selection;
                let routers: Vec<RouterId> = self.session.topology().routers().collect();
                router_combo(ui, "Source", &mut self.selection.source, &routers);
                router_combo(ui, "Destination", &mut self.selection.destination, &routers);
                if self.selection != before {
                    self.clear_route();
                }

                ui.checkbox(&mut self.animate, "Animate routing")
                    .on_hover_text("Reveal the path one link at a time");

                if ui.add(Button::new("🚀 Start Routing")).clicked() {
                    self.start_routing(Instant::now());
                }
            });
    }

    fn render_output_section(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Output")
            .default_open(false)
            .show(ui, |ui| {
                if ui.button("Export frames").clicked() {
                    self.export();
                }
                match &self.export_status {
                    Some(ExportStatus::Written(count)) => {
                        ui.small(format!(
                            "Wrote {} frame(s) to {}",
                            count,
                            self.config.export_dir.display()
                        ));
                    }
                    Some(ExportStatus::Failed(reason)) => {
                        ui.colored_label(get_theme().red, reason);
                    }
                    None => {}
                }
                if ui.button("Print topology").clicked() {
                    self.print_topology();
                }
                if ui.button("Print graph data").clicked() {
                    tracing::info!("[app] Pressed print graph data button");
                    println!("{}", self.session.topology());
                }
            });
    }

    fn render_results(&self, ui: &mut Ui) {
        let theme = get_theme();
        if self.selection.is_same_router() {
            ui.colored_label(theme.yellow, "Source and Destination should be different.");
        }
        match &self.routing_error {
            Some(e) if e.is_selection_error() => {}
            Some(e) => {
                ui.colored_label(theme.red, e.to_string());
            }
            None => {}
        }
        if let Some(route) = &self.route {
            ui.colored_label(theme.green, format!("✅ Best Path: {}", route.describe()));
            ui.label(format!("📍 Total Cost: {}", route.cost_label()));
            CollapsingHeader::new("Hops")
                .default_open(false)
                .show(ui, |ui| hop_table(ui, route));
        }
    }

    fn render(&mut self, ctx: &Context, now: Instant) {
        let playing = self.playing();

        SidePanel::left("controls").show(ctx, |ui| {
            ui.add_enabled_ui(!playing, |ui| {
                self.render_topology_section(ui);
                ui.add(Separator::default());
                self.render_routing_section(ui);
                ui.add(Separator::default());
                self.render_output_section(ui);
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            ui.heading("ConnectFlow: Network Routing Simulator");
            self.render_results(ui);
            ui.separator();

            let frame = if self.selection.is_same_router() {
                Frame::base()
            } else {
                frame_to_draw(self.route.as_ref(), self.playback.as_ref(), now)
            };
            paint_frame(ui, self.session.topology(), &self.layout, &frame);
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let now = Instant::now();
        self.render(ctx, now);

        let Some(playback) = &self.playback else {
            return;
        };
        if playback.is_finished(now) {
            tracing::debug!(frames = playback.frame_count(), "[app] Playback finished");
            self.playback = None;
        } else {
            ctx.request_repaint_after(playback.until_next_frame(now));
        }
    }
}

fn router_combo(ui: &mut Ui, label: &str, value: &mut RouterId, routers: &[RouterId]) {
    ComboBox::from_label(label)
        .selected_text(value.label())
        .show_ui(ui, |ui| {
            for &router in routers {
                ui.selectable_value(value, router, router.label());
            }
        });
}

/// Frame for the central canvas: the running playback frame, else the whole route, else the bare topology.
fn frame_to_draw(route: Option<&Route>, playback: Option<&Playback>, now: Instant) -> Frame {
    if let Some(frame) = playback.and_then(|playback| playback.current(now)) {
        return frame.clone();
    }
    frames(route, false).next().unwrap_or_else(Frame::base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{network_graph::Topology, pathfinding::shortest_path};

    fn scenario_route() -> Route {
        let topology =
            Topology::from_links(4, &[(0, 1, 2), (1, 2, 3), (0, 2, 10), (2, 3, 1)]).unwrap();
        shortest_path(&topology, RouterId(0), RouterId(3)).unwrap()
    }

    #[test]
    fn test_bare_topology_without_route() {
        let frame = frame_to_draw(None, None, Instant::now());
        assert_eq!(frame, Frame::base());
    }

    #[test]
    fn test_whole_route_without_playback() {
        let route = scenario_route();
        let frame = frame_to_draw(Some(&route), None, Instant::now());
        assert_eq!(frame.highlighted.len(), 3);
        assert_eq!(frame.total, 1);
    }

    #[test]
    fn test_playback_frame_takes_precedence() {
        let route = scenario_route();
        let start = Instant::now();
        let playback = Playback::start(
            frames(Some(&route), true).collect(),
            Duration::from_millis(500),
            start,
        );

        let first = frame_to_draw(Some(&route), Some(&playback), start);
        assert_eq!(first.highlighted.len(), 1);
        let second = frame_to_draw(Some(&route), Some(&playback), start + Duration::from_millis(600));
        assert_eq!(second.highlighted.len(), 2);
        assert_eq!(second.total, 3);
    }
}
