use std::ops::Range;

use base64::prelude::*;
use thiserror::Error;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Channel value below which a pixel counts as ink. Anti-aliased stroke
/// edges fade toward the white background, so half intensity is the cutoff.
const INK_THRESHOLD: u8 = 128;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("cannot allocate a {0}x{1} raster")]
    Allocation(u32, u32),
    #[error("png encoding failed: {0}")]
    Encode(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Freehand raster capture: white background, black round-capped strokes.
pub struct DrawingSurface {
    pixmap: Pixmap,
    paint: Paint<'static>,
    stroke: Stroke,
    last_point: Option<Point>,
}

impl DrawingSurface {
    pub fn new(size: u32, stroke_width: f32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(size, size).ok_or(SurfaceError::Allocation(size, size))?;
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: stroke_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let mut surface = Self {
            pixmap,
            paint,
            stroke,
            last_point: None,
        };
        surface.reset();
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the raster with the background color and drop any active stroke.
    pub fn reset(&mut self) {
        self.pixmap.fill(Color::WHITE);
        self.last_point = None;
    }

    pub fn is_stroking(&self) -> bool {
        self.last_point.is_some()
    }

    pub fn begin_stroke(&mut self, point: Point) {
        self.last_point = Some(point);
    }

    pub fn extend_stroke(&mut self, point: Point) {
        let Some(from) = self.last_point else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(point.x, point.y);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &self.paint,
                &self.stroke,
                Transform::identity(),
                None,
            );
        }
        self.last_point = Some(point);
    }

    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    /// Encode the raster as a PNG data URI.
    pub fn export_image(&self) -> Result<String, SurfaceError> {
        let png = self
            .pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        Ok(format!("{PNG_DATA_URI_PREFIX}{}", BASE64_STANDARD.encode(png)))
    }

    /// True when any pixel inside the given block is dark enough to be ink.
    pub fn has_ink_in(&self, xs: Range<u32>, ys: Range<u32>) -> bool {
        let xs = xs.start..xs.end.min(self.width());
        let ys = ys.start..ys.end.min(self.height());
        ys.clone().any(|y| {
            xs.clone().any(|x| {
                self.pixmap
                    .pixel(x, y)
                    .is_some_and(|p| p.red() < INK_THRESHOLD && p.alpha() > 0)
            })
        })
    }

    pub fn is_blank(&self) -> bool {
        !self.has_ink_in(0..self.width(), 0..self.height())
    }
}
