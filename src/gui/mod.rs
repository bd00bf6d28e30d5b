/*!
Desktop front end

- `app`: window, side panel controls and session wiring.
- `canvas`: paints a frame of the topology with the egui painter.
- `route_panel`: hop-by-hop table of the current route.
*/

pub mod app;
pub mod canvas;
pub mod route_panel;
