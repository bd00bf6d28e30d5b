/*!
Presenter

Turns a topology and an optional route into pictures.

Structure:
- `layout`: deterministic spring layout of the routers.
- `frames`: the frame sequence (base, full path, or one frame per route link).
- `playback`: maps elapsed time onto a frame for delayed replay.
- `svg` / `raster`: off-screen rendering of frames to SVG and PNG.

The on-screen counterpart lives in `gui::canvas`.
*/

pub mod frames;
pub mod layout;
pub mod playback;
pub mod raster;
pub mod svg;
