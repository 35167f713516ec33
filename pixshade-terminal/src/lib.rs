//! Terminal host that animates pixshade scenes as coloured ASCII
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use pixshade_core::{Frame, SceneKind, Shader};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod logging;
pub mod renderer;

pub use config::{AppConfig, Cli};
pub use renderer::AsciiRenderer;

/// Seconds skipped by the arrow keys
const SCRUB_STEP: f32 = 1.0;

/// Size used when the output is not a terminal and no size was configured
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Render one frame of `shader` into `renderer` at scene time `time`
pub fn render_into(
    renderer: &mut AsciiRenderer,
    shader: &dyn Shader,
    config: &AppConfig,
    time: f32,
) -> io::Result<()> {
    let (columns, rows) = (renderer.width(), renderer.height());
    let resolution = config.resolution(columns, rows);
    let frame = Frame::render(shader, columns, rows, &resolution, time).map_err(io::Error::other)?;
    renderer.render_frame(&frame);
    Ok(())
}

/// Print a single frame to `writer` and return
pub fn print_once<W: Write>(config: &AppConfig, writer: &mut W) -> io::Result<()> {
    let (columns, rows) = config
        .size
        .or_else(|| terminal::size().ok())
        .unwrap_or(FALLBACK_SIZE);
    let shader = config.build_scene(config.scene);
    let mut renderer = AsciiRenderer::new(columns as usize, rows as usize);

    render_into(&mut renderer, shader.as_ref(), config, config.start_time)?;
    renderer.draw(writer)?;
    queue!(writer, Print("\n"))?;
    writer.flush()
}

/// Main application struct for the animated terminal view
pub struct TerminalApp {
    config: AppConfig,
    scene: SceneKind,
    shader: Box<dyn Shader>,
    renderer: AsciiRenderer,
    running: bool,
    paused: bool,
    time: f32,
    last_tick: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> io::Result<Self> {
        let (width, height) = match config.size {
            Some(size) => size,
            None => terminal::size()?,
        };

        Ok(Self {
            scene: config.scene,
            shader: config.build_scene(config.scene),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            paused: false,
            time: config.start_time,
            last_tick: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            config,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::info!("starting scene '{}'", self.scene);

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = self.config.frame_interval();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                // A fixed --size wins over the terminal size; a collapsed window keeps the last grid
                if self.config.size.is_none() && width > 0 && height > 0 {
                    log::debug!("resized to {}x{}", width, height);
                    self.renderer.resize(width as usize, height as usize);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
            }
            KeyCode::Char('n') | KeyCode::Tab => {
                self.switch_scene(self.scene.next());
            }
            KeyCode::Char('1') => self.switch_scene(SceneKind::Glow),
            KeyCode::Char('2') => self.switch_scene(SceneKind::Shadow),
            KeyCode::Char('3') => self.switch_scene(SceneKind::Projection),
            KeyCode::Left => {
                self.time = (self.time - SCRUB_STEP).max(0.0);
            }
            KeyCode::Right => {
                self.time += SCRUB_STEP;
            }
            KeyCode::Char('r') => {
                self.time = 0.0;
            }
            _ => {}
        }
    }

    fn switch_scene(&mut self, scene: SceneKind) {
        log::info!("switching to scene '{}'", scene);
        self.scene = scene;
        self.shader = self.config.build_scene(scene);
    }

    fn update(&mut self) {
        let now = Instant::now();
        if !self.paused {
            self.time += (now - self.last_tick).as_secs_f32();
        }
        self.last_tick = now;
    }

    fn render(&mut self) -> io::Result<()> {
        render_into(&mut self.renderer, self.shader.as_ref(), &self.config, self.time)?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "pixshade | {} | t={:.1}s{} | FPS: {:.1} | Space=Pause N=Next 1-3=Scene Arrows=Scrub R=Restart Q=Quit",
                self.scene,
                self.time,
                if self.paused { " (paused)" } else { "" },
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(scene: SceneKind) -> TerminalApp {
        let config = AppConfig {
            scene,
            size: Some((20, 10)),
            ..AppConfig::default()
        };
        TerminalApp::new(config).unwrap()
    }

    #[test]
    fn test_keys_control_playback() {
        let mut app = app(SceneKind::Glow);
        app.handle_key(KeyCode::Char(' '));
        assert!(app.paused);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Right);
        assert!((app.time - 2.0).abs() < 1e-6);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.time, 0.0);
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_keys_switch_scene() {
        let mut app = app(SceneKind::Glow);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.scene, SceneKind::Shadow);
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.scene, SceneKind::Projection);
    }

    #[test]
    fn test_fixed_size_ignores_resize() {
        let mut app = app(SceneKind::Glow);
        app.handle_event(Event::Resize(100, 50));
        assert_eq!(app.renderer.width(), 20);
        assert_eq!(app.renderer.height(), 10);
    }

    #[test]
    fn test_zero_sized_resize_keeps_grid() {
        let mut app = app(SceneKind::Glow);
        // Follow the terminal size from here on
        app.config.size = None;
        app.handle_event(Event::Resize(0, 30));
        app.handle_event(Event::Resize(40, 0));
        assert_eq!(app.renderer.width(), 20);
        assert_eq!(app.renderer.height(), 10);

        app.handle_event(Event::Resize(40, 12));
        assert_eq!(app.renderer.width(), 40);
        render_into(&mut app.renderer, app.shader.as_ref(), &app.config, 1.0).unwrap();
    }

    #[test]
    fn test_print_once_emits_all_rows() {
        let config = AppConfig {
            scene: SceneKind::Shadow,
            size: Some((16, 6)),
            start_time: 5.0,
            ..AppConfig::default()
        };
        let mut out = Vec::new();
        print_once(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 5);
        assert!(text.ends_with('\n'));
    }
}
