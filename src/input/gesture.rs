//! Drag gestures to headings

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Heading;

/// Heading for a drag displacement.
///
/// The axis with the larger magnitude wins and its sign picks the direction;
/// equal magnitudes count as vertical. A zero or non-finite displacement
/// carries no direction and yields `None`.
pub fn heading_from_translation(dx: f32, dy: f32) -> Option<Heading> {
    if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
        return None;
    }

    let heading = if dx.abs() > dy.abs() {
        if dx > 0.0 { Heading::Right } else { Heading::Left }
    } else if dy > 0.0 {
        Heading::Down
    } else {
        Heading::Up
    };

    Some(heading)
}

/// Turns terminal mouse drags into gesture translations.
///
/// Each drag update is measured from where the button went down, in grid
/// cells, so a long diagonal drag settles on its dominant axis.
#[derive(Debug, Clone)]
pub struct DragTracker {
    origin: Option<(u16, u16)>,
    cell_width: f32,
    cell_height: f32,
}

impl DragTracker {
    pub fn new(cell_width: u16, cell_height: u16) -> Self {
        Self {
            origin: None,
            cell_width: f32::from(cell_width.max(1)),
            cell_height: f32::from(cell_height.max(1)),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Feed a mouse event; returns a heading for drag updates
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Heading> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x0, y0) = *self.origin.get_or_insert((event.column, event.row));
                let dx = (f32::from(event.column) - f32::from(x0)) / self.cell_width;
                let dy = (f32::from(event.row) - f32::from(y0)) / self.cell_height;
                heading_from_translation(dx, dy)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.origin = None;
                None
            }
            _ => None,
        }
    }
}
