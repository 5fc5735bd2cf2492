use crate::drawing::surface::{DrawingSurface, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer report in screen space (terminal cells).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub column: u16,
    pub row: u16,
}

/// Where the surface sits on screen and how many raster pixels it spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub columns: u16,
    pub rows: u16,
    pub raster_width: u32,
    pub raster_height: u32,
}

impl Viewport {
    /// Translate a screen position to surface-local raster coordinates.
    /// Returns `None` outside the viewport.
    pub fn to_surface(&self, column: u16, row: u16) -> Option<Point> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }
        let local_x = column.checked_sub(self.left)?;
        let local_y = row.checked_sub(self.top)?;
        if local_x >= self.columns || local_y >= self.rows {
            return None;
        }
        // cell centers
        let x = (local_x as f32 + 0.5) * self.raster_width as f32 / self.columns as f32;
        let y = (local_y as f32 + 0.5) * self.raster_height as f32 / self.rows as f32;
        Some(Point::new(x, y))
    }
}

/// Drive the surface's stroke state machine from one pointer report.
/// Leaving the viewport while drawing ends the stroke.
pub fn apply(surface: &mut DrawingSurface, viewport: &Viewport, event: PointerEvent) {
    let point = viewport.to_surface(event.column, event.row);
    match (event.kind, point) {
        (PointerKind::Down, Some(p)) => surface.begin_stroke(p),
        (PointerKind::Move, Some(p)) => surface.extend_stroke(p),
        (PointerKind::Down | PointerKind::Move, None) | (PointerKind::Up, _) => {
            surface.end_stroke()
        }
    }
}
