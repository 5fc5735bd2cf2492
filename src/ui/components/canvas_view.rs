use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::drawing::pointer::Viewport;
use crate::drawing::surface::DrawingSurface;
use crate::ui::theme::Theme;

const HALF_BLOCK: &str = "▀";

/// Shows the drawing surface using upper-half-block cells, so every cell
/// carries two vertically stacked samples of the raster.
pub struct CanvasView<'a> {
    surface: &'a DrawingSurface,
    theme: &'a Theme,
}

impl<'a> CanvasView<'a> {
    pub fn new(surface: &'a DrawingSurface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }

    /// The largest square (in raster terms) that fits in `area`, centered.
    /// A cell is roughly twice as tall as it is wide, so a square takes
    /// half as many rows as columns.
    pub fn fit(area: Rect, surface: &DrawingSurface) -> Viewport {
        let columns = area.width.min(area.height.saturating_mul(2)) & !1;
        let rows = columns / 2;
        Viewport {
            left: area.x + (area.width - columns) / 2,
            top: area.y + (area.height - rows) / 2,
            columns,
            rows,
            raster_width: surface.width(),
            raster_height: surface.height(),
        }
    }

    pub fn render_in(self, viewport: &Viewport, buf: &mut Buffer) {
        if viewport.columns == 0 || viewport.rows == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let (ink, paper) = (colors.canvas_ink(), colors.canvas_bg());
        let samples_y = u32::from(viewport.rows) * 2;

        let span = |i: u32, count: u32, extent: u32| {
            let start = i * extent / count;
            let end = ((i + 1) * extent / count).max(start + 1);
            start..end
        };

        for row in 0..viewport.rows {
            for col in 0..viewport.columns {
                let xs = span(u32::from(col), u32::from(viewport.columns), viewport.raster_width);
                let top = span(u32::from(row) * 2, samples_y, viewport.raster_height);
                let bottom = span(u32::from(row) * 2 + 1, samples_y, viewport.raster_height);
                let fg = if self.surface.has_ink_in(xs.clone(), top) { ink } else { paper };
                let bg = if self.surface.has_ink_in(xs, bottom) { ink } else { paper };
                buf[(viewport.left + col, viewport.top + row)]
                    .set_symbol(HALF_BLOCK)
                    .set_style(Style::default().fg(fg).bg(bg));
            }
        }
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = Self::fit(area, self.surface);
        self.render_in(&viewport, buf);
    }
}
