use egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::network::{edge::COST_UNIT, pathfinding::Route};

/// Per-hop breakdown of a route: one row per traversed link.
pub fn hop_table(ui: &mut Ui, route: &Route) {
    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(35.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(55.0))
        .column(Column::auto().at_least(80.0));

    table
        .header(20.0, |mut header| {
            for title in ["Hop", "From", "To", "Cost", "Cumulative"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (hop, leg) in route.legs().into_iter().enumerate() {
                let cells = [
                    (hop + 1).to_string(),
                    leg.from.label(),
                    leg.to.label(),
                    format!("{} {COST_UNIT}", leg.cost),
                    format!("{} {COST_UNIT}", leg.cumulative),
                ];
                body.row(22.0, |mut row| {
                    for cell in &cells {
                        row.col(|ui| {
                            ui.label(cell.as_str());
                        });
                    }
                });
            }
        });
}
