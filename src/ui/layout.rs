use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Canvas on the left, glyph and feedback beside it. On narrow terminals the
/// panel drops below the canvas.
pub struct PracticeLayout {
    pub canvas: Rect,
    pub panel: Rect,
}

impl PracticeLayout {
    pub const PANEL_WIDTH: u16 = 36;
    const PANEL_HEIGHT: u16 = 9;

    pub fn new(area: Rect) -> Self {
        if area.width >= Self::PANEL_WIDTH * 2 {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(20), Constraint::Length(Self::PANEL_WIDTH)])
                .split(area);
            Self {
                canvas: horizontal[0],
                panel: horizontal[1],
            }
        } else {
            let vertical = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(Self::PANEL_HEIGHT)])
                .split(area);
            Self {
                canvas: vertical[0],
                panel: vertical[1],
            }
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 7;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
