//! Console: the story surface, the input line and the engine-facing
//! blocking API, driven cooperatively through a [`Host`].

use super::batcher::TextBatcher;
use super::blink::CaretBlink;
use super::editor::{EditOutcome, LineEditor};
use super::history::History;
use super::host::Host;
use super::keymap::{raw_key_code, EditAction};
use super::mute::MuteDebouncer;
use super::queue::EventQueues;
use crate::actor::{InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent};
use crate::buffer::{Cell, Image, Modifiers, Rgb, Style, Surface};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::layout::Rect;
use crate::timer;
use bitflags::bitflags;
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Whether a line is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys and clicks are queued for the engine.
    #[default]
    NoInput,
    /// Keys edit the input line.
    LineInput,
}

bitflags! {
    /// Font selection, as requested by the engine.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct FontFlags: u8 {
        /// Bold text.
        const BOLD = 1;
        /// Italic text.
        const ITALIC = 2;
        /// Underlined text.
        const UNDERLINE = 4;
        /// Proportional rather than fixed pitch. Tracked but every cell
        /// has the same advance.
        const PROPORTIONAL = 8;
    }
}

impl FontFlags {
    /// SGR modifiers that render these flags.
    pub const fn modifiers(self) -> Modifiers {
        let mut m = Modifiers::empty();
        if self.contains(Self::BOLD) {
            m = m.union(Modifiers::BOLD);
        }
        if self.contains(Self::ITALIC) {
            m = m.union(Modifiers::ITALIC);
        }
        if self.contains(Self::UNDERLINE) {
            m = m.union(Modifiers::UNDERLINE);
        }
        m
    }
}

/// Result of [`Console::get_next_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// A queued key code.
    Code(u8),
    /// The session ended while waiting.
    SessionEnded,
}

impl KeyPress {
    /// Wire value of [`KeyPress::SessionEnded`].
    pub const SESSION_ENDED: i32 = -3;

    /// The key as the engine's integer code.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Code(code) => i32::from(code),
            Self::SessionEnded => Self::SESSION_ENDED,
        }
    }
}

/// Result of a blocking request that the end of the session can cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The request completed.
    Ready(T),
    /// The session ended first.
    SessionEnded,
}

impl<T> Outcome<T> {
    /// The value, if the request completed.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::SessionEnded => None,
        }
    }

    /// Whether the session ended first.
    pub const fn is_session_ended(&self) -> bool {
        matches!(self, Self::SessionEnded)
    }
}

/// An entry of the input line's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry<'a> {
    /// A divider.
    Separator,
    /// A command that is typed and executed when picked.
    Command(&'a str),
}

/// The interactive story console.
///
/// Everything the engine prints lands on a persistent [`Surface`]. Text is
/// batched and drawn at flush points. While the engine waits in
/// [`get_next_key`](Self::get_next_key) or [`get_input`](Self::get_input)
/// the console pumps the host: events are handled, timers fire and dirty
/// areas are presented.
pub struct Console<H: Host> {
    host: H,
    config: ConsoleConfig,
    surface: Surface,
    batcher: TextBatcher,
    style: Style,
    font: FontFlags,
    mode: InputMode,
    editor: LineEditor,
    history: History,
    queues: EventQueues,
    caret: CaretBlink,
    mute: MuteDebouncer,
    dirty: Vec<Rect>,
    full_repaint: bool,
    caret_changed: bool,
    committed: Option<String>,
    last_click: Option<(Instant, u16, u16)>,
    context_commands: Vec<String>,
}

impl<H: Host> Console<H> {
    /// Create a console sized to the host's display.
    pub fn new(host: H, config: ConsoleConfig) -> Result<Self> {
        config.validate()?;
        let (width, height) = host.size();
        if width == 0 || height == 0 {
            return Err(ConsoleError::InvalidGeometry { width, height });
        }

        let style = Style::new(config.foreground, config.background);
        tracing::debug!(width, height, "console created");

        Ok(Self {
            surface: Surface::new(width, height, config.background),
            batcher: TextBatcher::new(),
            style,
            font: FontFlags::empty(),
            mode: InputMode::NoInput,
            editor: LineEditor::new(),
            history: History::new(config.history_capacity),
            queues: EventQueues::new(),
            caret: CaretBlink::new(config.blink_interval()),
            mute: MuteDebouncer::new(config.mute_in_background, config.mute_delay()),
            dirty: Vec::new(),
            full_repaint: true,
            caret_changed: false,
            committed: None,
            last_click: None,
            context_commands: Vec::new(),
            host,
            config,
        })
    }

    /// The host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The story surface, without the input line overlay.
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The active configuration.
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Current input mode.
    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// The input line.
    pub const fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// Committed lines.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Style applied to printed text.
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Current font flags.
    pub const fn font(&self) -> FontFlags {
        self.font
    }

    /// Whether background muting is in effect.
    pub const fn is_muted(&self) -> bool {
        self.mute.is_muted()
    }

    /// Caret cell, if the caret is currently drawn.
    pub const fn caret(&self) -> Option<(u16, u16)> {
        if self.caret.is_painted() {
            Some(self.caret.position())
        } else {
            None
        }
    }

    // ---- engine side: output ------------------------------------------

    /// Queue text for drawing at (x, y). Nothing is drawn until the next
    /// flush; while text is pending, later coordinates are ignored.
    pub fn print_text(&mut self, text: &str, x: u16, y: u16) {
        self.batcher.push(text, x, y);
    }

    /// Draw pending text.
    pub fn flush_text(&mut self) {
        if let Some((x, y, text)) = self.batcher.take() {
            let area = self.surface.draw_text(x, y, &text, self.style);
            tracing::trace!(x, y, len = text.len(), "flushed text");
            self.mark_dirty(area);
        }
    }

    /// Fill the inclusive region with the background colour. All-zero
    /// edges clear the whole surface.
    pub fn clear_region(&mut self, left: u16, top: u16, right: u16, bottom: u16) {
        self.flush_text();
        let region = if left == 0 && top == 0 && right == 0 && bottom == 0 {
            self.surface.bounds()
        } else {
            Rect::from_edges(left, top, right, bottom)
        };
        let area = self.surface.fill_rect(region, Cell::blank(self.style.bg));
        self.mark_dirty(area);
    }

    /// Scroll the inclusive region up by `distance` rows, blanking only the
    /// rows uncovered at the bottom.
    pub fn scroll_up(&mut self, left: u16, top: u16, right: u16, bottom: u16, distance: u16) {
        if distance == 0 {
            return;
        }
        self.flush_text();

        let region = Rect::from_edges(left, top, right, bottom).intersection(&self.surface.bounds());
        let exposed = self.surface.scroll_up(region, distance, self.style.bg);
        tracing::trace!(?region, ?exposed, "scrolled");
        // Moved rows changed on screen too, even though the surface only
        // refilled the exposed band.
        self.mark_dirty(region);

        if self.config.soft_scrolling {
            if self.config.extra_smooth_scrolling {
                self.paint();
                self.host.sleep(self.config.soft_scroll_pause());
            } else {
                self.pump(Duration::ZERO);
            }
        }
    }

    /// Draw an image with its top-left at (x, y), clipped to the surface.
    pub fn print_image(&mut self, image: &Image, x: u16, y: u16) {
        self.flush_text();
        let area = self.surface.blit(image, x, y);
        self.mark_dirty(area);
    }

    /// Select the font for subsequent text.
    pub fn set_font(&mut self, flags: FontFlags) {
        self.flush_text();
        self.font = flags;
        self.style.modifiers = flags.modifiers();
    }

    /// Select colours for subsequent text and clears.
    pub fn set_colors(&mut self, fg: Rgb, bg: Rgb) {
        self.flush_text();
        self.style.fg = fg;
        self.style.bg = bg;
    }

    // ---- engine side: input -------------------------------------------

    /// Block until a key is queued and return it.
    ///
    /// Arrow keys arrive as the reserved codes in
    /// [`keymap`](crate::console::keymap); a click arrives as `0` with its
    /// coordinate waiting in [`get_next_click`](Self::get_next_click).
    pub fn get_next_key(&mut self) -> KeyPress {
        self.flush_text();
        if let Some(code) = self.queues.pop_key() {
            return KeyPress::Code(code);
        }

        self.paint();
        loop {
            if !self.host.is_running() {
                return KeyPress::SessionEnded;
            }
            if let Some(code) = self.queues.pop_key() {
                return KeyPress::Code(code);
            }
            self.pump(self.config.idle_poll());
        }
    }

    /// Edit a line at (x, y) and block until it is committed.
    ///
    /// The committed text is printed where it was typed and returned,
    /// truncated to `max_len` chars.
    pub fn get_input(&mut self, max_len: usize, x: u16, y: u16) -> Outcome<String> {
        self.flush_text();
        self.begin_line_input(x, y);

        let line = loop {
            if let Some(line) = self.committed.take() {
                break line;
            }
            if !self.host.is_running() {
                self.leave_line_input();
                return Outcome::SessionEnded;
            }
            self.pump(self.config.idle_poll());
        };

        self.print_text(&line, x, y);
        self.flush_text();
        Outcome::Ready(line.chars().take(max_len).collect())
    }

    /// Pop the coordinate of the oldest queued click.
    ///
    /// # Panics
    /// Panics if no click is queued. Call this only after
    /// [`get_next_key`](Self::get_next_key) returned the click code `0`.
    pub fn get_next_click(&mut self) -> (u16, u16) {
        self.queues
            .pop_click()
            .expect("get_next_click called with no click queued")
    }

    /// Type `text` into the input line as if the player had.
    ///
    /// Ignored unless a line is being edited. With `clear_existing` the line
    /// is emptied first. With `execute` the line is committed at once
    /// without being added to history; otherwise a space is appended so
    /// the next word typed stays separate.
    pub fn insert_programmatic_text(&mut self, text: &str, execute: bool, clear_existing: bool) {
        if self.mode != InputMode::LineInput {
            return;
        }
        if clear_existing {
            self.editor.clear();
        }
        self.editor.insert_str(text);
        if !execute {
            self.editor.insert_str(" ");
        }
        self.line_changed();
        if execute {
            self.end_line_input(false);
        }
    }

    /// Replace the context menu commands. `"-"` is a separator.
    pub fn set_context_commands<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_commands = commands.into_iter().map(Into::into).collect();
    }

    /// Context menu entries for the input line. Empty outside line mode.
    pub fn context_menu_entries(&self) -> Vec<MenuEntry<'_>> {
        if self.mode != InputMode::LineInput {
            return Vec::new();
        }
        self.context_commands
            .iter()
            .map(|cmd| {
                if cmd == "-" {
                    MenuEntry::Separator
                } else {
                    MenuEntry::Command(cmd)
                }
            })
            .collect()
    }

    // ---- event loop ----------------------------------------------------

    /// Run one cycle: wait up to `max_wait` (or the next timer deadline)
    /// for events, handle every pending one, fire due timers and present.
    pub fn pump(&mut self, max_wait: Duration) {
        let now = self.host.now();
        let wait = timer::earliest([self.caret.deadline(), self.mute.deadline()])
            .map_or(max_wait, |deadline| {
                deadline.saturating_duration_since(now).min(max_wait)
            });

        let mut next = self.host.wait_event(wait);
        while let Some(event) = next {
            self.handle_event(event);
            if self.committed.is_some() {
                break;
            }
            next = self.host.wait_event(Duration::ZERO);
        }

        self.fire_timers(self.host.now());
        self.paint();
    }

    /// Apply one UI event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { code, modifiers } => self.handle_key(code, modifiers),
            InputEvent::MouseDown(mouse) => self.handle_mouse_down(mouse),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Repaint => self.full_repaint = true,
            InputEvent::FocusGained => self.focus_gained(),
            InputEvent::FocusLost => self.focus_lost(),
            InputEvent::Paste(text) => self.handle_paste(text),
            InputEvent::ContextCommand(command) => {
                self.insert_programmatic_text(&command, true, true);
            }
            other @ (InputEvent::Error(_) | InputEvent::MouseScroll { .. }) => {
                if let InputEvent::Error(message) = &other {
                    tracing::warn!(%message, "input source error");
                }
                self.host.unhandled_event(&other);
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if !self.host.is_running() {
            return;
        }
        if code == KeyCode::Esc {
            self.host.escape_pressed();
        }

        match self.mode {
            InputMode::NoInput => match raw_key_code(code, modifiers) {
                Some(byte) => self.queues.push_key(byte),
                None => self.host.unhandled_event(&InputEvent::Key { code, modifiers }),
            },
            InputMode::LineInput => {
                let action = EditAction::classify(code, modifiers);
                match self.editor.apply(action, &self.history) {
                    EditOutcome::Edited => self.line_changed(),
                    EditOutcome::Commit => self.end_line_input(true),
                    EditOutcome::ScrollBack => self.host.request_scrollback(),
                    EditOutcome::PasteRequested => {
                        if let Some(text) = self.host.clipboard_text() {
                            self.editor.insert_str(&text);
                            self.line_changed();
                        }
                    }
                    EditOutcome::Unhandled => {
                        self.host.unhandled_event(&InputEvent::Key { code, modifiers });
                    }
                }
            }
        }
    }

    fn handle_paste(&mut self, text: String) {
        match self.mode {
            InputMode::LineInput => {
                self.editor.insert_str(&text);
                self.line_changed();
            }
            InputMode::NoInput => {
                let mut chars = text.chars();
                let single = match (chars.next(), chars.next()) {
                    (Some(c), None) => u8::try_from(c).ok(),
                    _ => None,
                };
                match single {
                    Some(byte) => self.queues.push_key(byte),
                    None => self.host.unhandled_event(&InputEvent::Paste(text)),
                }
            }
        }
    }

    fn handle_mouse_down(&mut self, mouse: MouseEvent) {
        if mouse.button != Some(MouseButton::Left) {
            self.host.unhandled_event(&InputEvent::MouseDown(mouse));
            return;
        }

        let now = self.host.now();
        let double = self.last_click.is_some_and(|(at, x, y)| {
            x == mouse.x
                && y == mouse.y
                && now.saturating_duration_since(at) <= self.config.double_click_interval()
        });
        self.last_click = if double { None } else { Some((now, mouse.x, mouse.y)) };

        match self.mode {
            InputMode::NoInput => self.queues.push_click(mouse.x, mouse.y),
            InputMode::LineInput if double => {
                self.flush_text();
                if let Some(word) = self.surface.word_at(mouse.x, mouse.y) {
                    tracing::trace!(%word, "picked word");
                    self.insert_programmatic_text(&word, false, false);
                }
            }
            InputMode::LineInput => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.flush_text();
        match self.surface.resize(width, height, self.style.bg) {
            Ok(()) => {
                tracing::debug!(width, height, "surface resized");
                self.full_repaint = true;
                self.dirty.clear();
            }
            Err(err) => tracing::warn!(%err, "ignoring resize"),
        }
    }

    fn focus_lost(&mut self) {
        let now = self.host.now();
        self.mute.focus_lost(now);
        self.caret.focus_lost(self.config.caret_on_blur);
        self.caret_changed = true;
    }

    fn focus_gained(&mut self) {
        if self.mute.focus_gained() {
            tracing::debug!("unmuting");
            self.host.set_muted(false);
        }
        let now = self.host.now();
        self.caret.focus_gained(now);
        self.caret_changed = true;
    }

    fn fire_timers(&mut self, now: Instant) {
        if self.mute.poll(now) {
            tracing::debug!("muting in background");
            self.host.set_muted(true);
        }
        if self.caret.poll(now) {
            self.caret_changed = true;
        }
    }

    // ---- line mode -----------------------------------------------------

    fn begin_line_input(&mut self, x: u16, y: u16) {
        self.mode = InputMode::LineInput;
        self.committed = None;
        self.editor.begin(x, y);
        let now = self.host.now();
        self.caret.set_enabled(true, now);
        self.line_changed();
        tracing::debug!(x, y, "line input started");
    }

    fn end_line_input(&mut self, add_to_history: bool) {
        let line = self.editor.commit(&mut self.history, add_to_history);
        self.leave_line_input();
        tracing::debug!(len = line.len(), add_to_history, "line committed");
        self.host.input_committed(&line);
        self.committed = Some(line);
    }

    fn leave_line_input(&mut self) {
        self.mode = InputMode::NoInput;
        let now = self.host.now();
        self.caret.set_enabled(false, now);
        self.caret_changed = true;
        self.mark_dirty(self.editor.line_rect(self.surface.width()));
    }

    fn line_changed(&mut self) {
        let now = self.host.now();
        self.caret.move_to(self.editor.caret(), now);
        self.caret_changed = true;
        self.mark_dirty(self.editor.line_rect(self.surface.width()));
    }

    // ---- presentation --------------------------------------------------

    fn mark_dirty(&mut self, area: Rect) {
        if !area.is_empty() && !self.full_repaint {
            self.dirty.push(area);
        }
    }

    /// Flush pending text and present whatever changed.
    pub fn paint(&mut self) {
        self.flush_text();
        if !self.full_repaint && self.dirty.is_empty() && !self.caret_changed {
            return;
        }

        let frame = if self.mode == InputMode::LineInput {
            let mut frame = self.surface.clone();
            self.editor.draw_onto(&mut frame, self.style);
            Cow::Owned(frame)
        } else {
            Cow::Borrowed(&self.surface)
        };
        let dirty: &[Rect] = if self.full_repaint { &[] } else { &self.dirty };
        let caret = self.caret();

        if let Err(err) = self.host.present(&frame, dirty, caret) {
            tracing::warn!(%err, "failed to present frame");
        }

        self.dirty.clear();
        self.full_repaint = false;
        self.caret_changed = false;
    }
}

impl<H: Host> std::fmt::Debug for Console<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("mode", &self.mode)
            .field("surface", &self.surface)
            .field("line", &self.editor.text())
            .field("history", &self.history.len())
            .field("queued_keys", &self.queues.key_count())
            .finish_non_exhaustive()
    }
}
