//! # Dialog
//!
//! Modal form: labelled input fields, an optional radio group, and Ok/Cancel.
//!
//! ## Lifecycle
//!
//! ```text
//! Constructed ──show()──▶ Shown ──Enter──▶ Submitted   (callback fires)
//!                           │
//!                           └────Esc────▶ Cancelled   (process aborts)
//! ```
//!
//! Tab (and Down) moves focus forward, Shift+Tab (and Up) moves it back;
//! both wrap. The focus ring holds every input field followed by every
//! radio choice, so radios are reached with Tab too and Space selects the
//! focused one. Once submitted or cancelled the dialog ignores further input.
//!
//! The dialog only reports what happened. `PegasusGui` owns the reaction:
//! it invokes the completion callback on submit and aborts the event loop
//! on cancel.

use std::rc::Rc;

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::view::ViewKind;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_box;
use crate::tui::components::edit_input::EditInput;
use crate::tui::event::TuiEvent;
use crate::tui::event_loop::EventLoop;
use crate::tui::gui::{DialogCallback, PegasusGui};
use crate::tui::palette;

const DIALOG_WIDTH: u16 = 64;
const MASK: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Constructed,
    Shown,
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// Focus moved or a field was edited
    Changed,
    Submitted(DialogValues),
    Cancelled,
}

/// Field values handed to the completion callback, in the order the fields
/// were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogValues {
    fields: Vec<(String, String)>,
    selection: Option<String>,
}

impl DialogValues {
    /// Look a value up by its caption. Trailing `:` and spaces are ignored,
    /// so `get("Password")` finds the `"Password: "` field.
    pub fn get(&self, caption: &str) -> Option<&str> {
        let wanted = normalize_caption(caption);
        self.fields
            .iter()
            .find(|(c, _)| normalize_caption(c) == wanted)
            .map(|(_, v)| v.as_str())
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// Label of the chosen radio button, if the dialog has any.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn normalize_caption(caption: &str) -> &str {
    caption.trim().trim_end_matches(':').trim_end()
}

pub struct Dialog {
    title: String,
    kind: ViewKind,
    callback: DialogCallback,
    inputs: Vec<EditInput>,
    radios: Vec<String>,
    selected_radio: Option<usize>,
    focus: usize,
    state: DialogState,
}

impl Dialog {
    pub fn new(
        title: &str,
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
    ) -> Self {
        Self {
            title: format!("{title} (Esc)"),
            kind: ViewKind::Dialog,
            callback: Rc::new(cb),
            inputs: Vec::new(),
            radios: Vec::new(),
            selected_radio: None,
            focus: 0,
            state: DialogState::Constructed,
        }
    }

    pub(crate) fn with_kind(mut self, kind: ViewKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn add_input(&mut self, caption: &str) -> &mut Self {
        self.inputs.push(EditInput::new(caption));
        self
    }

    pub fn add_masked_input(&mut self, caption: &str) -> &mut Self {
        self.inputs.push(EditInput::masked(caption, MASK));
        self
    }

    /// Add a radio choice. The first one added starts selected.
    pub fn add_radio(&mut self, label: &str) -> &mut Self {
        self.radios.push(label.to_string());
        self.selected_radio.get_or_insert(0);
        self
    }

    /// Pre-fill the field at `index`.
    pub fn set_value(&mut self, index: usize, text: &str) -> bool {
        match self.inputs.get_mut(index) {
            Some(input) => {
                input.set_value(text);
                true
            }
            None => false,
        }
    }

    /// Pre-fill fields in order. `None` leaves that field blank.
    pub fn prefill(&mut self, values: &[Option<&str>]) -> &mut Self {
        for (index, value) in values.iter().enumerate() {
            if let Some(text) = value {
                self.set_value(index, text);
            }
        }
        self
    }

    pub fn show(&mut self) {
        if self.state != DialogState::Constructed {
            return;
        }
        self.focus = 0;
        self.state = DialogState::Shown;
        debug!("Num items: {}, dialog: {}", self.field_count(), self.title);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Focusable entries: inputs first, then radio choices.
    pub fn field_count(&self) -> usize {
        self.inputs.len() + self.radios.len()
    }

    pub fn values(&self) -> DialogValues {
        DialogValues {
            fields: self
                .inputs
                .iter()
                .map(|i| (i.caption().to_string(), i.value().to_string()))
                .collect(),
            selection: self.selected_radio.and_then(|i| self.radios.get(i).cloned()),
        }
    }

    pub fn callback(&self) -> DialogCallback {
        self.callback.clone()
    }

    fn focused_radio(&self) -> Option<usize> {
        self.focus.checked_sub(self.inputs.len())
    }

    fn caption_width(&self) -> usize {
        self.inputs.iter().map(|i| i.caption().width()).max().unwrap_or(0)
    }
}

impl EventHandler for Dialog {
    type Event = DialogEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<DialogEvent> {
        if self.state != DialogState::Shown {
            return None;
        }
        let count = self.field_count();
        match event {
            TuiEvent::Tab | TuiEvent::CursorDown if count > 0 => {
                self.focus = (self.focus + 1) % count;
                Some(DialogEvent::Changed)
            }
            TuiEvent::BackTab | TuiEvent::CursorUp if count > 0 => {
                self.focus = (self.focus + count - 1) % count;
                Some(DialogEvent::Changed)
            }
            TuiEvent::Submit => {
                self.state = DialogState::Submitted;
                Some(DialogEvent::Submitted(self.values()))
            }
            TuiEvent::Escape => {
                self.state = DialogState::Cancelled;
                Some(DialogEvent::Cancelled)
            }
            TuiEvent::InputChar(' ') if self.focused_radio().is_some() => {
                self.selected_radio = self.focused_radio();
                Some(DialogEvent::Changed)
            }
            other => self
                .inputs
                .get_mut(self.focus)
                .and_then(|input| input.handle_event(other))
                .map(|_| DialogEvent::Changed),
        }
    }
}

impl Component for Dialog {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // fields + divider + buttons + borders
        let height = self.field_count() as u16 + 4;
        let dialog_area = centered_box(DIALOG_WIDTH, height, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center);
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let [fields_area, _, buttons_area] = Layout::vertical([
            Constraint::Length(self.field_count() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let caption_width = self.caption_width();
        let mut lines: Vec<Line> = Vec::with_capacity(self.field_count());
        for (i, input) in self.inputs.iter().enumerate() {
            let style = if i == self.focus { palette::input_focus() } else { palette::input() };
            let caption = format!("{:>caption_width$}", input.caption());
            lines.push(Line::from(vec![
                Span::raw(caption),
                Span::styled(input.display_value(), style),
            ]));
        }
        for (j, label) in self.radios.iter().enumerate() {
            let marker = if self.selected_radio == Some(j) { "(X)" } else { "( )" };
            let style = if self.focused_radio() == Some(j) {
                palette::input_focus()
            } else {
                palette::input()
            };
            lines.push(Line::from(Span::styled(format!("{marker} {label}"), style)));
        }
        frame.render_widget(Paragraph::new(lines), fields_area);

        let buttons = Line::from(vec![
            Span::styled("< Ok >", palette::button()),
            Span::raw("    "),
            Span::styled("< Cancel >", palette::button()),
        ]);
        frame.render_widget(Paragraph::new(buttons).alignment(Alignment::Center), buttons_area);

        if self.state == DialogState::Shown {
            if let Some(input) = self.inputs.get(self.focus) {
                let pad = caption_width.saturating_sub(input.caption().width()) as u16;
                let x = fields_area.x + pad + input.cursor_column();
                let y = fields_area.y + self.focus as u16;
                if x < fields_area.right() && y < fields_area.bottom() {
                    frame.set_cursor_position((x, y));
                }
            }
        }
    }
}

// ----------------------------------------------------------------------
// Installer dialogs
// ----------------------------------------------------------------------

/// OpenStack admin password plus confirmation, both masked.
pub fn password_input(
    title: &str,
    cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
) -> Dialog {
    let mut dialog = Dialog::new(title, cb).with_kind(ViewKind::PasswordInput);
    dialog
        .add_masked_input("Password: ")
        .add_masked_input("Confirm Password: ");
    dialog
}

pub fn maas_server_input(
    title: &str,
    cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
) -> Dialog {
    let mut dialog = Dialog::new(title, cb).with_kind(ViewKind::MaasInput);
    dialog
        .add_input("MAAS Server IP: ")
        .add_input("MAAS API Key: ");
    dialog
}

pub fn landscape_input(
    title: &str,
    cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
) -> Dialog {
    let mut dialog = Dialog::new(title, cb).with_kind(ViewKind::LandscapeInput);
    dialog
        .add_input("Admin Email: ")
        .add_input("Admin Name: ")
        .add_input("MAAS Server IP: ")
        .add_input("MAAS API Key: ");
    dialog
}
