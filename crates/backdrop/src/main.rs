use std::fs::{self, OpenOptions};
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

use backdrop_config::Config;
use backdrop_core::{EffectKind, Rgb, SystemClock, Tint, Viewport};
use backdrop_effects::{Backdrop, FrameLoop, FrameOutcome, LoopHandle};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    symbols::Marker,
    text::Line,
    widgets::canvas::Canvas,
};

mod canvas;

use canvas::TerminalSurface;

/// Animated constellation, hexagon and Voronoi backgrounds.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Effect to start with (constellation, hexagons, voronoi).
    #[arg(short, long)]
    effect: Option<EffectKind>,
    /// Tint (mono, frost, ember, moss, violet).
    #[arg(short, long)]
    tint: Option<Tint>,
    /// Seed for reproducible placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Config file to read and save instead of the default location.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Let command-line flags override the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(effect) = self.effect {
            config.effect = effect;
        }
        if let Some(tint) = self.tint {
            config.tint = tint;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => backdrop_config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    args.apply(&mut config);
    init_logging(&config)?;
    log::info!(
        "starting {} with tint {} (config {})",
        config.effect,
        config.tint,
        config_path.display()
    );

    let terminal = ratatui::init();
    install_frame_panic_hook();
    let result = App::new(config, config_path).run(terminal);
    ratatui::restore();
    result
}

/// Send log records to the log file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> color_eyre::Result<()> {
    let path = config.log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Panics inside a frame are recovered by the frame loop, so they are only
/// logged instead of restoring the terminal.
fn install_frame_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if backdrop_effects::in_frame() {
            log::error!("{info}");
        } else {
            previous(info);
        }
    }));
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Settings, updated as the user cycles effect and tint.
    config: Config,
    /// Where `s` saves the settings.
    config_path: PathBuf,
    /// Active effect.
    backdrop: Backdrop,
    /// Drives one frame per redraw.
    frames: FrameLoop<SystemClock>,
    /// Handle of the running loop; stopping it quits.
    handle: LoopHandle,
    /// Canvas the frames are replayed onto.
    surface: TerminalSurface,
    /// Transient message shown in the help line.
    status: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        let frames = FrameLoop::new(SystemClock);
        Self {
            backdrop: Backdrop::new(config.effect, config.seed),
            handle: frames.handle(),
            frames,
            surface: TerminalSurface::new(config.tint),
            config,
            config_path,
            status: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.handle = self.frames.start();
        while self.handle.is_running() {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        log::info!(
            "stopped after {} frames ({} recovered)",
            self.frames.frames_drawn(),
            self.frames.frames_recovered()
        );
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Effect
            Constraint::Length(1), // Help text
        ])
        .split(frame.area());
        let area = chunks[0];

        let viewport = Viewport::from_cells(
            area.width,
            area.height,
            self.config.cell_width_px,
            self.config.cell_height_px,
        );
        self.surface.configure(
            viewport,
            self.config.tint,
            self.config.cell_width_px,
            self.config.cell_height_px,
        );
        let outcome = self
            .frames
            .pump(&mut self.backdrop, viewport, &mut self.surface);
        if outcome == FrameOutcome::Recovered {
            self.status = Some(String::from("frame skipped"));
        }

        let surface = &self.surface;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(Color::Black)
            .x_bounds([0.0, viewport.width])
            .y_bounds([0.0, viewport.height])
            .paint(|ctx| ctx.draw(surface));
        frame.render_widget(canvas, area);

        let Rgb(r, g, b) = self.config.tint.rgb();
        let color = Color::Rgb(r, g, b);
        let mut help = vec![
            self.backdrop.kind().name().bold().fg(color),
            "  q".bold().fg(color),
            " quit  ".dark_gray(),
            "e".bold().fg(color),
            " effect  ".dark_gray(),
            "c".bold().fg(color),
            " tint  ".dark_gray(),
            "r".bold().fg(color),
            " reseed  ".dark_gray(),
            "s".bold().fg(color),
            " save".dark_gray(),
        ];
        if let Some(status) = &self.status {
            help.push(format!("  {status}").italic().fg(color));
        }
        frame.render_widget(Line::from(help).centered(), chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame interval as timeout so the animation keeps moving.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(Duration::from_millis(self.config.frame_interval_ms))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // The backdrop notices the new size on the next frame.
                Event::Resize(cols, rows) => log::debug!("terminal resized to {cols}x{rows}"),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('e')) => self.cycle_effect(),
            (_, KeyCode::Char('c')) => self.cycle_tint(),
            (_, KeyCode::Char('r')) => self.backdrop.reseed(),
            (_, KeyCode::Char('s')) => self.save_config(),
            _ => {}
        }
    }

    /// Switch to the next effect.
    fn cycle_effect(&mut self) {
        self.config.effect = self.backdrop.cycle_effect();
        self.status = None;
    }

    /// Cycle through available tints.
    fn cycle_tint(&mut self) {
        self.config.tint = self.config.tint.next();
        self.status = None;
    }

    /// Persist the current effect and tint.
    fn save_config(&mut self) {
        let status = match self.config.save_to(&self.config_path) {
            Ok(()) => {
                log::info!("saved config to {}", self.config_path.display());
                String::from("saved")
            }
            Err(e) => {
                log::error!("{e}");
                format!("save failed: {e}")
            }
        };
        self.status = Some(status);
    }

    /// Stop the frame loop, which ends the main loop.
    fn quit(&mut self) {
        self.handle.stop();
    }
}
