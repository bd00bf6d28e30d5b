use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;
use tiny_skia::Pixmap;
use usvg::Tree;

use crate::{
    network::network_graph::Topology,
    presenter::{frames::Frame, layout::Layout, svg::frame_svg},
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {0}x{1} pixmap")]
    Pixmap(u32, u32),
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
    #[error("failed to create {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// SVG parsing options with the system fonts loaded, so labels are rendered.
pub fn svg_options() -> usvg::Options<'static> {
    let mut fonts = usvg::fontdb::Database::new();
    fonts.load_system_fonts();
    let mut options = usvg::Options::default();
    options.fontdb = Arc::new(fonts);
    options
}

/// Rasterize an SVG document to a pixmap of its own size on a white background.
pub fn rasterize(svg: &str, options: &usvg::Options) -> Result<Pixmap, RenderError> {
    let tree = Tree::from_str(svg, options)?;
    let size = tree.size().to_int_size();
    let (w, h) = (size.width(), size.height());

    let mut pixmap = Pixmap::new(w, h).ok_or(RenderError::Pixmap(w, h))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pm);
    Ok(pixmap)
}

const FRAME_PREFIX: &str = "frame_";

/// Writes every frame as `frame_NNN.png` into `dir`, creating it if needed.
/// Frames from an earlier export are removed first; other files are left alone.
/// Returns the written paths in frame order.
pub fn export_frames(
    topology: &Topology,
    layout: &Layout,
    frames: impl IntoIterator<Item = Frame>,
    dir: &Path,
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>, RenderError> {
    std::fs::create_dir_all(dir).map_err(|error| RenderError::Io {
        path: dir.to_path_buf(),
        error,
    })?;
    remove_stale_frames(dir)?;

    let options = svg_options();
    let mut written = Vec::new();
    for frame in frames {
        let svg = frame_svg(topology, layout, &frame, width, height);
        let pixmap = rasterize(&svg, &options)?;
        let path = dir.join(format!("{FRAME_PREFIX}{:03}.png", frame.step));
        pixmap.save_png(&path).map_err(|e| RenderError::Write {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "wrote frame");
        written.push(path);
    }
    Ok(written)
}

fn remove_stale_frames(dir: &Path) -> Result<(), RenderError> {
    let io = |error: std::io::Error| RenderError::Io {
        path: dir.to_path_buf(),
        error,
    };
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        if !is_frame_file(&path) {
            continue;
        }
        std::fs::remove_file(&path).map_err(|error| RenderError::Io {
            path: path.clone(),
            error,
        })?;
        tracing::debug!(path = %path.display(), "removed stale frame");
    }
    Ok(())
}

fn is_frame_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(FRAME_PREFIX) && name.ends_with(".png"))
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
    fn test_rasterize_draws_on_white_canvas() {
        let topology = scenario();
        let layout = Layout::spring(&topology, 42);
        let svg = frame_svg(&topology, &layout, &Frame::base(), 320, 240);

        let pixmap = rasterize(&svg, &usvg::Options::default()).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (320, 240));
        assert!(pixmap.data().chunks(4).any(|px| px != [255, 255, 255, 255]));
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(matches!(
            rasterize("not an svg", &usvg::Options::default()),
            Err(RenderError::Svg(_))
        ));
    }

    #[test]
    fn test_export_writes_one_png_per_frame() {
        let topology = scenario();
        let layout = Layout::spring(&topology, 42);
        let route = shortest_path(&topology, RouterId(0), RouterId(3)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");

        let written =
            export_frames(&topology, &layout, frames(Some(&route), true), &out, 200, 150).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(written[0].file_name().unwrap(), "frame_000.png");
        for path in &written {
            let bytes = std::fs::read(path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"));
        }
    }

    #[test]
    fn test_export_replaces_frames_of_earlier_export() {
        let topology = scenario();
        let layout = Layout::spring(&topology, 42);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let long = shortest_path(&topology, RouterId(0), RouterId(3)).unwrap();
        let first =
            export_frames(&topology, &layout, frames(Some(&long), true), dir.path(), 200, 150)
                .unwrap();
        assert_eq!(first.len(), 3);

        let short = shortest_path(&topology, RouterId(0), RouterId(1)).unwrap();
        let second =
            export_frames(&topology, &layout, frames(Some(&short), true), dir.path(), 200, 150)
                .unwrap();
        assert_eq!(second.len(), 1);

        let mut pngs: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| is_frame_file(path))
            .collect();
        pngs.sort();
        assert_eq!(pngs, second);
        assert!(dir.path().join("notes.txt").exists());
    }
}
