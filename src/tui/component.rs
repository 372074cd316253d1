use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Anything `PegasusGui` can place in the header, body or footer region.
///
/// `render` takes `&mut self` so views can keep list selection and scroll
/// offsets in sync with the area they were last drawn into.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A view or widget that reacts to keys.
pub trait EventHandler {
    /// What the widget reports back to its owner (submit, cancel, moved...).
    type Event;

    /// `None` means the key was not consumed; `PegasusGui` then hands it to
    /// the event loop's unhandled-input hook.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
