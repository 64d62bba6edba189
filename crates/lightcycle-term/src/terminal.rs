use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Color as TermColor};
use crossterm::{cursor, execute, queue, terminal};

use lightcycle_core::canvas::Canvas;
use lightcycle_core::color::Color;
use lightcycle_core::frame_loop::Backend;
use lightcycle_core::input::{InputState, Key};

use crate::error::TermError;
use crate::raster::PixelBuffer;

/// Upper half block: foreground paints the top pixel row, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

/// What a terminal key press means to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Key),
    Quit,
    Ignore,
}

/// Translate a crossterm key event. Only presses count. Releases and
/// auto-repeats, on terminals that report them, are ignored; every press is
/// released a frame later anyway.
pub fn map_key(event: &KeyEvent) -> KeyAction {
    if event.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char(' ') => KeyAction::Press(Key::Space),
        KeyCode::Char(c) => Key::letter(c).map_or(KeyAction::Ignore, KeyAction::Press),
        KeyCode::Enter => KeyAction::Press(Key::Enter),
        KeyCode::Up => KeyAction::Press(Key::ArrowUp),
        KeyCode::Down => KeyAction::Press(Key::ArrowDown),
        KeyCode::Left => KeyAction::Press(Key::ArrowLeft),
        KeyCode::Right => KeyAction::Press(Key::ArrowRight),
        _ => KeyAction::Ignore,
    }
}

/// Puts the terminal into raw mode on the alternate screen and restores it on drop.
///
/// Where the terminal supports it, key event types are requested too, so a
/// held key reports repeats instead of fresh presses.
pub struct TerminalGuard {
    event_types: bool,
}

impl TerminalGuard {
    pub fn enter(out: &mut impl Write) -> Result<Self, TermError> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { event_types: false };
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let supported = terminal::supports_keyboard_enhancement().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Keyboard enhancement query failed");
            false
        });
        if supported {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.event_types = true;
        }
        tracing::debug!(event_types = guard.event_types, "Terminal in raw mode");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.event_types
            && let Err(e) = execute!(out, PopKeyboardEnhancementFlags)
        {
            tracing::warn!(error = %e, "Failed to restore keyboard flags");
        }
        if let Err(e) = execute!(
            out,
            style::ResetColor,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        ) {
            tracing::warn!(error = %e, "Failed to leave alternate screen");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "Failed to disable raw mode");
        }
    }
}

/// Frame-loop backend drawing into a pixel buffer and showing it with
/// half-block glyphs.
pub struct TerminalBackend<W: Write = Stdout> {
    out: W,
    pixels: PixelBuffer,
    scale: usize,
    held: Vec<Key>,
    quit: bool,
}

impl<W: Write> TerminalBackend<W> {
    pub fn new(out: W, width: usize, height: usize, scale: usize) -> Self {
        Self {
            out,
            pixels: PixelBuffer::new(width, height),
            scale: scale.max(1),
            held: Vec::new(),
            quit: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Release last frame's presses; terminals never report key-up.
    fn release_held(&mut self, input: &mut InputState) {
        for key in self.held.drain(..) {
            input.on_key_up(key);
        }
    }

    fn apply_key(&mut self, event: &KeyEvent, input: &mut InputState) {
        match map_key(event) {
            KeyAction::Press(key) => {
                input.on_key_down(key);
                if !self.held.contains(&key) {
                    self.held.push(key);
                }
            },
            KeyAction::Quit => self.quit = true,
            KeyAction::Ignore => {},
        }
    }

    /// Write the buffer out, two pixel rows per terminal row, then the text.
    pub fn render(&mut self) -> io::Result<()> {
        let scale = self.scale;
        let (cols, block_rows) = self.pixels.blocks(scale);
        let rows = block_rows.div_ceil(2);

        let mut prev: Option<(Color, Color)> = None;
        for row in 0..rows {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for col in 0..cols {
                let top = self.pixels.block(col, row * 2, scale);
                let bottom = if row * 2 + 1 < block_rows {
                    self.pixels.block(col, row * 2 + 1, scale)
                } else {
                    Color::BLACK
                };
                if prev != Some((top, bottom)) {
                    queue!(
                        self.out,
                        style::SetForegroundColor(term_color(top)),
                        style::SetBackgroundColor(term_color(bottom)),
                    )?;
                    prev = Some((top, bottom));
                }
                queue!(self.out, style::Print(HALF_BLOCK))?;
            }
        }

        for overlay in self.pixels.overlays() {
            let col = (overlay.x.max(0.0) / scale as f32) as usize;
            let row = (overlay.y.max(0.0) / (2 * scale) as f32) as usize;
            if col >= cols || row >= rows {
                continue;
            }
            let text: String = overlay.text.chars().take(cols - col).collect();
            queue!(
                self.out,
                cursor::MoveTo(col as u16, row as u16),
                style::SetForegroundColor(term_color(overlay.color)),
                style::SetBackgroundColor(term_color(Color::BLACK)),
                style::Print(text),
            )?;
        }

        queue!(self.out, style::ResetColor)?;
        self.out.flush()
    }
}

impl TerminalBackend<Stdout> {
    pub fn stdout(width: usize, height: usize, scale: usize) -> Self {
        Self::new(io::stdout(), width, height, scale)
    }
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

impl<W: Write> Backend for TerminalBackend<W> {
    type Error = TermError;

    fn poll_input(&mut self, input: &mut InputState) -> Result<(), TermError> {
        self.release_held(input);
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.apply_key(&key, input);
            }
        }
        Ok(())
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.pixels
    }

    fn present(&mut self) -> Result<(), TermError> {
        self.render()?;
        Ok(())
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn backend() -> TerminalBackend<Vec<u8>> {
        TerminalBackend::new(Vec::new(), 8, 8, 2)
    }

    #[test]
    fn letters_and_arrows_map_to_keys() {
        assert_eq!(map_key(&press(KeyCode::Char('w'))), KeyAction::Press(Key::W));
        assert_eq!(map_key(&press(KeyCode::Char('D'))), KeyAction::Press(Key::D));
        assert_eq!(map_key(&press(KeyCode::Left)), KeyAction::Press(Key::ArrowLeft));
        assert_eq!(map_key(&press(KeyCode::Char(' '))), KeyAction::Press(Key::Space));
        assert_eq!(map_key(&press(KeyCode::Char('1'))), KeyAction::Ignore);
        assert_eq!(map_key(&press(KeyCode::F(1))), KeyAction::Ignore);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(&press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(map_key(&press(KeyCode::Char('q'))), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn releases_are_ignored() {
        let mut event = press(KeyCode::Char('w'));
        event.kind = KeyEventKind::Release;
        assert_eq!(map_key(&event), KeyAction::Ignore);
    }

    #[test]
    fn repeats_are_ignored() {
        let mut event = press(KeyCode::Char('r'));
        event.kind = KeyEventKind::Repeat;
        assert_eq!(map_key(&event), KeyAction::Ignore);
    }

    #[test]
    fn held_key_repeat_gives_no_new_edge() {
        let mut backend = backend();
        let mut input = InputState::new();
        backend.apply_key(&press(KeyCode::Char('r')), &mut input);
        assert!(input.is_key_just_pressed(Key::R));
        input.end_frame();

        let mut repeat = press(KeyCode::Char('r'));
        repeat.kind = KeyEventKind::Repeat;
        for _ in 0..3 {
            backend.release_held(&mut input);
            backend.apply_key(&repeat, &mut input);
            assert!(!input.is_key_just_pressed(Key::R));
            input.end_frame();
        }
    }

    #[test]
    fn press_is_one_edge_then_released() {
        let mut backend = backend();
        let mut input = InputState::new();

        backend.release_held(&mut input);
        backend.apply_key(&press(KeyCode::Char('a')), &mut input);
        assert!(input.is_key_just_pressed(Key::A));
        input.end_frame();

        backend.release_held(&mut input);
        assert!(!input.is_key_down(Key::A));
        assert!(input.is_key_just_released(Key::A));
        assert!(!input.is_key_just_pressed(Key::A));
    }

    #[test]
    fn repeated_press_gives_a_new_edge() {
        let mut backend = backend();
        let mut input = InputState::new();
        backend.apply_key(&press(KeyCode::Up), &mut input);
        input.end_frame();

        backend.release_held(&mut input);
        backend.apply_key(&press(KeyCode::Up), &mut input);
        assert!(input.is_key_just_pressed(Key::ArrowUp));
    }

    #[test]
    fn quit_key_sets_flag() {
        let mut backend = backend();
        let mut input = InputState::new();
        assert!(!backend.should_quit());
        backend.apply_key(&press(KeyCode::Esc), &mut input);
        assert!(backend.should_quit());
    }

    #[test]
    fn render_writes_half_blocks_and_text() {
        let mut backend = backend();
        let red = Color::rgb(255, 0, 0);
        backend.canvas().clear(Color::BLACK);
        backend.canvas().draw_line(0.0, 0.0, 7.0, 0.0, red);
        backend.canvas().draw_text(0.0, 4.0, "Hi", red);
        backend.present().unwrap();

        let out = String::from_utf8(backend.into_inner()).unwrap();
        // 8x8 pixels at scale 2 is 4 columns by 2 rows
        assert_eq!(out.matches(HALF_BLOCK).count(), 8);
        assert!(out.contains("Hi"));
    }

    #[test]
    fn offscreen_text_is_skipped() {
        let mut backend = backend();
        backend
            .canvas()
            .draw_text(100.0, 0.0, "Nope", Color::rgb(255, 255, 255));
        backend.render().unwrap();
        let out = String::from_utf8(backend.into_inner()).unwrap();
        assert!(!out.contains("Nope"));
    }

    #[test]
    fn long_text_is_clipped_to_width() {
        let mut backend = backend();
        backend
            .canvas()
            .draw_text(4.0, 0.0, "ABCDEF", Color::rgb(255, 255, 255));
        backend.render().unwrap();
        let out = String::from_utf8(backend.into_inner()).unwrap();
        assert!(out.contains("AB"));
        assert!(!out.contains("ABC"));
    }
}
