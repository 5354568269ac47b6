//! crossterm frontend
//!
//! Scenes are rasterized into a half-block pixel grid: every terminal cell
//! shows two vertically stacked pixels as `▀` with the top pixel in the
//! foreground color and the bottom one in the background color. The
//! viewport is scaled uniformly to fit and centered (letterboxed).

use std::io::{self, Stdout, Write};
use std::ops::Range;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Color};
use crossterm::{cursor, execute, queue, terminal};

use crate::app::{FrameInput, Frontend, WaitOutcome};
use crate::consts::{HEIGHT, WIDTH};
use crate::render::{Rgb, Scene, TEXT_COLOR};
use crate::sim::{EntityKind, SpriteBank, TickInput};

/// Without release events, a key counts as held this long after its first
/// press. Covers the usual keyboard delay before auto-repeat kicks in.
const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(700);

/// Once auto-repeat is running, a key is up when repeats stop for this long
const REPEAT_WINDOW: Duration = Duration::from_millis(150);

const LETTERBOX: Rgb = (12, 14, 20);

fn sprite_color(kind: EntityKind) -> Rgb {
    match kind {
        EntityKind::Background => (236, 244, 252),
        EntityKind::Platform => (86, 168, 72),
        EntityKind::PowUp => (250, 118, 196),
        EntityKind::Player => (250, 204, 64),
        EntityKind::Enemy => (122, 58, 160),
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
struct Hold {
    down: bool,
    /// Seen again while down: auto-repeat has started
    repeating: bool,
    last_seen: Option<Instant>,
}

impl Hold {
    fn press(&mut self, now: Instant) {
        self.repeating = self.down;
        self.down = true;
        self.last_seen = Some(now);
    }

    /// Returns true if the key was down
    fn release(&mut self) -> bool {
        self.repeating = false;
        std::mem::replace(&mut self.down, false)
    }

    fn window(&self) -> Duration {
        if self.repeating {
            REPEAT_WINDOW
        } else {
            FIRST_REPEAT_WINDOW
        }
    }

    fn lapsed(&self, now: Instant) -> bool {
        self.down
            && self
                .last_seen
                .is_none_or(|seen| now.duration_since(seen) > self.window())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Left,
    Right,
    Jump,
}

fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::Right),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Control::Jump)
        }
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Turns a stream of key events into per-frame held/pressed/released state
#[derive(Debug)]
pub struct InputTracker {
    /// Terminal reports key releases
    release_events: bool,
    left: Hold,
    right: Hold,
    jump: Hold,
    quit: bool,
    jump_pressed: bool,
    jump_released: bool,
}

impl InputTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            left: Hold::default(),
            right: Hold::default(),
            jump: Hold::default(),
            quit: false,
            jump_pressed: false,
            jump_released: false,
        }
    }

    pub fn handle(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Release && is_quit(&key) {
            self.quit = true;
            return;
        }
        let Some(control) = control_for(key.code) else {
            return;
        };
        let hold = match control {
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Jump => &mut self.jump,
        };

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if control == Control::Jump && !hold.down {
                    self.jump_pressed = true;
                }
                hold.press(now);
            }
            KeyEventKind::Release => {
                if hold.release() && control == Control::Jump {
                    self.jump_released = true;
                }
            }
        }
    }

    /// Input for the frame ending at `now`; one-shot flags are consumed
    pub fn take(&mut self, now: Instant) -> FrameInput {
        if !self.release_events {
            if self.left.lapsed(now) {
                self.left.release();
            }
            if self.right.lapsed(now) {
                self.right.release();
            }
            if self.jump.lapsed(now) {
                self.jump.release();
                self.jump_released = true;
            }
        }

        let input = FrameInput {
            quit: self.quit,
            tick: TickInput {
                left: self.left.down,
                right: self.right.down,
                jump_pressed: self.jump_pressed,
                jump_released: self.jump_released,
            },
        };
        self.quit = false;
        self.jump_pressed = false;
        self.jump_released = false;
        input
    }
}

// ── Rasterizer ──────────────────────────────────────────────────────────────

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

/// Viewport-to-pixel mapping for a terminal of `cols` x `rows` cells
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    scale: f32,
    ox: f32,
    oy: f32,
    w: usize,
    h: usize,
}

impl Viewport {
    fn fit(cols: u16, rows: u16) -> Self {
        let w = cols as usize;
        let h = rows as usize * 2;
        let scale = (w as f32 / WIDTH).min(h as f32 / HEIGHT);
        Self {
            scale,
            ox: ((w as f32 - WIDTH * scale) / 2.0).floor(),
            oy: ((h as f32 - HEIGHT * scale) / 2.0).floor(),
            w,
            h,
        }
    }

    /// Pixel columns covering viewport x in `lo..hi`, clipped to the viewport
    fn columns(&self, lo: f32, hi: f32) -> Range<i32> {
        let edge = self.ox + WIDTH * self.scale;
        clip(self.ox + lo * self.scale, self.ox + hi * self.scale, self.ox, edge, self.w)
    }

    /// Pixel rows covering viewport y in `lo..hi`, clipped to the viewport
    fn rows(&self, lo: f32, hi: f32) -> Range<i32> {
        let edge = self.oy + HEIGHT * self.scale;
        clip(self.oy + lo * self.scale, self.oy + hi * self.scale, self.oy, edge, self.h)
    }
}

fn clip(a: f32, b: f32, min: f32, max: f32, limit: usize) -> Range<i32> {
    let lo = a.max(min).max(0.0).floor() as i32;
    let hi = b.min(max).min(limit as f32).ceil() as i32;
    lo..hi.max(lo)
}

/// Rasterize a scene onto a `cols` x `rows` cell grid (row-major)
pub fn compose(scene: &Scene, bank: &SpriteBank, cols: u16, rows: u16) -> Vec<Cell> {
    let vp = Viewport::fit(cols, rows);
    let mut px = vec![LETTERBOX; vp.w * vp.h];

    let fill = scene.backdrop.color();
    for y in vp.rows(0.0, HEIGHT) {
        for x in vp.columns(0.0, WIDTH) {
            px[y as usize * vp.w + x as usize] = fill;
        }
    }

    for item in &scene.sprites {
        let mask = bank.frame(item.sprite).mask_for(item.flipped);
        let color = sprite_color(item.kind);
        let r = item.rect;
        if r.w <= 0.0 || r.h <= 0.0 {
            continue;
        }
        for y in vp.rows(r.top(), r.bottom()) {
            // Sample the mask at the pixel center
            let ly = ((y as f32 + 0.5 - vp.oy) / vp.scale - r.y) / r.h;
            let my = (ly * mask.height() as f32).floor() as i32;
            for x in vp.columns(r.left(), r.right()) {
                let lx = ((x as f32 + 0.5 - vp.ox) / vp.scale - r.x) / r.w;
                let mx = (lx * mask.width() as f32).floor() as i32;
                if mask.get(mx, my) {
                    px[y as usize * vp.w + x as usize] = color;
                }
            }
        }
    }

    let mut cells: Vec<Cell> = (0..rows as usize)
        .flat_map(|row| (0..vp.w).map(move |col| (row, col)))
        .map(|(row, col)| {
            let top = px[row * 2 * vp.w + col];
            let bottom = px[(row * 2 + 1) * vp.w + col];
            if top == bottom {
                Cell {
                    ch: ' ',
                    fg: top,
                    bg: bottom,
                }
            } else {
                Cell {
                    ch: '\u{2580}', // ▀
                    fg: top,
                    bg: bottom,
                }
            }
        })
        .collect();

    for text in &scene.texts {
        let row = ((vp.oy + text.anchor.y * vp.scale) / 2.0).floor() as i64;
        if row < 0 || row >= rows as i64 {
            continue;
        }
        let len = text.text.chars().count() as i64;
        let center = (vp.ox + text.anchor.x * vp.scale).round() as i64;
        let start = center - len / 2;
        for (i, ch) in text.text.chars().enumerate() {
            let col = start + i as i64;
            if col < 0 || col >= vp.w as i64 {
                continue;
            }
            let cell = &mut cells[row as usize * vp.w + col as usize];
            *cell = Cell {
                ch,
                fg: TEXT_COLOR,
                bg: cell.bg,
            };
        }
    }

    cells
}

fn rgb(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Frontend ────────────────────────────────────────────────────────────────

pub struct TerminalFrontend {
    out: Stdout,
    bank: Rc<SpriteBank>,
    input: InputTracker,
    enhanced: bool,
    frame: Duration,
    frame_start: Instant,
    /// Redrawn on resize while waiting on a menu
    last_scene: Option<Scene>,
}

impl TerminalFrontend {
    /// Take over the terminal. It is restored when the frontend is dropped.
    pub fn new(bank: Rc<SpriteBank>, fps: u32) -> io::Result<Self> {
        let mut frontend = Self {
            out: io::stdout(),
            bank,
            input: InputTracker::new(false),
            enhanced: false,
            frame: Duration::from_millis(1000 / u64::from(fps.max(1))),
            frame_start: Instant::now(),
            last_scene: None,
        };
        frontend.setup()?;
        Ok(frontend)
    }

    fn setup(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;

        self.enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced {
            execute!(
                self.out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            log::info!("Keyboard enhancement enabled: using key release events");
        } else {
            log::info!("No key release events; approximating held keys");
        }
        self.input = InputTracker::new(self.enhanced);
        Ok(())
    }

    fn draw(&mut self, scene: &Scene) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        if cols == 0 || rows == 0 {
            return Ok(());
        }
        let cells = compose(scene, &self.bank, cols, rows);

        queue!(self.out, terminal::BeginSynchronizedUpdate)?;
        for (row, line) in cells.chunks(cols as usize).enumerate() {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            let mut prev: Option<(Rgb, Rgb)> = None;
            for cell in line {
                if prev != Some((cell.fg, cell.bg)) {
                    queue!(
                        self.out,
                        style::SetForegroundColor(rgb(cell.fg)),
                        style::SetBackgroundColor(rgb(cell.bg))
                    )?;
                    prev = Some((cell.fg, cell.bg));
                }
                queue!(self.out, style::Print(cell.ch))?;
            }
        }
        queue!(
            self.out,
            style::ResetColor,
            terminal::EndSynchronizedUpdate
        )?;
        self.out.flush()
    }

    fn discard_pending(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        Ok(())
    }
}

impl Frontend for TerminalFrontend {
    fn poll_input(&mut self) -> io::Result<FrameInput> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => self.input.handle(key, Instant::now()),
                Event::FocusLost => self.input = InputTracker::new(self.enhanced),
                _ => {}
            }
        }
        Ok(self.input.take(Instant::now()))
    }

    fn present(&mut self, scene: &Scene) -> io::Result<()> {
        self.draw(scene)?;
        self.last_scene = Some(scene.clone());
        Ok(())
    }

    fn wait_for_key(&mut self) -> io::Result<WaitOutcome> {
        // Keys still held from play must not skip the menu
        self.discard_pending()?;
        loop {
            match event::read()? {
                Event::Key(key) if is_quit(&key) && key.kind != KeyEventKind::Release => {
                    return Ok(WaitOutcome::Quit);
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.input = InputTracker::new(self.enhanced);
                    self.frame_start = Instant::now();
                    return Ok(WaitOutcome::Key);
                }
                Event::Resize(_, _) => {
                    if let Some(scene) = self.last_scene.take() {
                        self.draw(&scene)?;
                        self.last_scene = Some(scene);
                    }
                }
                _ => {}
            }
        }
    }

    fn end_frame(&mut self) {
        if let Some(rest) = self.frame.checked_sub(self.frame_start.elapsed()) {
            thread::sleep(rest);
        }
        self.frame_start = Instant::now();
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            style::ResetColor,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{self, Backdrop, DrawItem};
    use crate::sim::{Rect, SpriteId};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn test_release_events_track_holds() {
        let t0 = Instant::now();
        let mut input = InputTracker::new(true);
        input.handle(key(KeyCode::Left, KeyEventKind::Press), t0);
        input.handle(key(KeyCode::Char(' '), KeyEventKind::Press), t0);

        let frame = input.take(t0);
        assert!(frame.tick.left);
        assert!(frame.tick.jump_pressed);

        // Still held much later: no repeat needed
        let later = t0 + Duration::from_secs(2);
        let frame = input.take(later);
        assert!(frame.tick.left);
        assert!(!frame.tick.jump_pressed);

        input.handle(key(KeyCode::Char(' '), KeyEventKind::Release), later);
        input.handle(key(KeyCode::Left, KeyEventKind::Release), later);
        let frame = input.take(later);
        assert!(!frame.tick.left);
        assert!(frame.tick.jump_released);
    }

    #[test]
    fn test_hold_window_without_release_events() {
        let t0 = Instant::now();
        let mut input = InputTracker::new(false);
        input.handle(key(KeyCode::Right, KeyEventKind::Press), t0);
        input.handle(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        assert!(input.take(t0).tick.right);

        // Auto-repeat keeps it alive; a repeated jump is not a new press
        let t1 = t0 + Duration::from_millis(300);
        input.handle(key(KeyCode::Right, KeyEventKind::Press), t1);
        input.handle(key(KeyCode::Char(' '), KeyEventKind::Press), t1);
        let frame = input.take(t1);
        assert!(frame.tick.right);
        assert!(!frame.tick.jump_pressed);

        // Repeats stop: released after the short window, and the jump
        // release is synthesized once
        let t2 = t1 + REPEAT_WINDOW - Duration::from_millis(1);
        assert!(input.take(t2).tick.right);
        let t3 = t1 + REPEAT_WINDOW + Duration::from_millis(1);
        let frame = input.take(t3);
        assert!(!frame.tick.right);
        assert!(frame.tick.jump_released);
        assert!(!input.take(t3).tick.jump_released);
    }

    #[test]
    fn test_single_press_outlasts_repeat_delay() {
        let t0 = Instant::now();
        let mut input = InputTracker::new(false);
        input.handle(key(KeyCode::Left, KeyEventKind::Press), t0);
        input.handle(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        assert!(input.take(t0).tick.jump_pressed);

        // No repeat yet at 600 ms: still held, jump not cut
        let frame = input.take(t0 + Duration::from_millis(600));
        assert!(frame.tick.left);
        assert!(!frame.tick.jump_released);

        let frame = input.take(t0 + FIRST_REPEAT_WINDOW + Duration::from_millis(1));
        assert!(!frame.tick.left);
        assert!(frame.tick.jump_released);

        // A fresh press starts over with the long window
        let t1 = t0 + Duration::from_secs(1);
        input.handle(key(KeyCode::Left, KeyEventKind::Press), t1);
        assert!(input.take(t1 + Duration::from_millis(600)).tick.left);
    }

    #[test]
    fn test_quit_keys() {
        let now = Instant::now();
        let mut input = InputTracker::new(true);
        input.handle(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            now,
        );
        assert!(input.take(now).quit);
        assert!(!input.take(now).quit);

        input.handle(key(KeyCode::Esc, KeyEventKind::Press), now);
        assert!(input.take(now).quit);

        // Plain 'c' does nothing
        input.handle(key(KeyCode::Char('c'), KeyEventKind::Press), now);
        assert_eq!(input.take(now), FrameInput::default());
    }

    #[test]
    fn test_compose_letterboxes_and_fills_backdrop() {
        let bank = SpriteBank::builtin();
        // 80 cols x 30 rows = 80x60 pixels; scale 0.1 -> 40x60 viewport
        let cells = compose(&render::game_over_scene(1, 1, false), &bank, 80, 30);
        assert_eq!(cells.len(), 80 * 30);
        assert_eq!(cells[0].bg, LETTERBOX);
        assert_eq!(cells[40].bg, Backdrop::End.color());
        assert_eq!(cells[79].bg, LETTERBOX);
    }

    #[test]
    fn test_compose_draws_silhouette_not_box() {
        let bank = SpriteBank::builtin();
        // 400 cols x 300 rows = 1:1 pixels
        let rect = Rect::new(100.0, 100.0, 55.0, 80.0);
        let scene = Scene {
            backdrop: Backdrop::Sky,
            sprites: vec![DrawItem {
                kind: EntityKind::Player,
                sprite: SpriteId::Stand1,
                flipped: false,
                rect,
            }],
            texts: Vec::new(),
        };
        let cells = compose(&scene, &bank, 400, 300);
        let mask = bank.frame(SpriteId::Stand1).mask_for(false);

        let pixel = |x: usize, y: usize| {
            let cell = cells[(y / 2) * 400 + x];
            if y % 2 == 0 { cell.fg } else { cell.bg }
        };
        for (mx, my) in [(0, 0), (27, 40), (54, 79)] {
            let expected = if mask.get(mx, my) {
                sprite_color(EntityKind::Player)
            } else {
                Backdrop::Sky.color()
            };
            assert_eq!(pixel(100 + mx as usize, 100 + my as usize), expected);
        }
    }

    #[test]
    fn test_compose_places_text() {
        let bank = SpriteBank::builtin();
        let cells = compose(&render::start_scene(), &bank, 400, 300);
        let row = (HEIGHT * 3.0 / 4.0 / 2.0) as usize;
        let line: String = cells[row * 400..(row + 1) * 400]
            .iter()
            .map(|c| c.ch)
            .collect();
        assert!(line.contains("| press a key to start |"));
    }
}
