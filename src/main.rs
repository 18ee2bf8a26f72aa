mod audio;
mod config;
mod effects;
mod error;
mod lighting;
mod render;
mod scene;
mod scheduler;
mod timing;
mod vignettes;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor, execute,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::ResetColor,
    terminal,
};
use rand::RngExt;

use audio::{Mixer, SilentAudio, SoundBank};
use render::{Canvas, ColorMode, RenderMode, ppm};
use scene::{Facade, SceneOptions};
use timing::{EventType, FrameClock};
use vignettes::VignetteKind;

#[derive(Parser)]
#[command(
    name = "nightfacade",
    version,
    about = "Ambient night-time apartment facade for the terminal"
)]
struct Cli {
    /// Render mode [config: render]
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Color mode [config: color]
    #[arg(short, long, value_enum)]
    color: Option<ColorMode>,

    /// Target FPS (1-120) [config: fps]
    #[arg(short, long)]
    fps: Option<u32>,

    /// RNG seed for a reproducible evening [config: seed]
    #[arg(long)]
    seed: Option<u64>,

    /// Start with audio muted [config: mute]
    #[arg(long)]
    mute: bool,

    /// List window scenes and sky events and exit
    #[arg(short, long)]
    list: bool,

    /// Render headless into a PPM image and exit
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Snapshot resolution
    #[arg(long, value_name = "WxH", default_value = "1280x720", value_parser = parse_size)]
    size: Size,

    /// Simulated seconds before the snapshot is taken
    #[arg(long, default_value = "5")]
    seconds: f64,

    /// Start a sky event immediately
    #[arg(long, value_enum)]
    trigger: Option<EventType>,

    /// Write log records to this file (the terminal is busy drawing)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Hide the status bar
    #[arg(long)]
    clean: bool,

    /// Print the config file path and exit
    #[arg(long)]
    show_config: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Size {
    width: usize,
    height: usize,
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: usize = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height: usize = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if !(16..=8192).contains(&width) || !(16..=8192).contains(&height) {
        return Err(format!("{width}x{height} is outside 16..=8192"));
    }
    Ok(Size { width, height })
}

/// Everything the run needs after CLI, config file and defaults are merged.
struct Settings {
    render_mode: RenderMode,
    color_mode: ColorMode,
    fps: u32,
    muted: bool,
    color_quant: u8,
    audio_dir: PathBuf,
    scene: SceneOptions,
}

impl Settings {
    fn resolve(cli: &Cli, config: &config::Config) -> Self {
        let seed = cli
            .seed
            .or(config.seed)
            .unwrap_or_else(|| rand::rng().random());
        Settings {
            render_mode: cli
                .render
                .or(config.render.map(Into::into))
                .unwrap_or(RenderMode::HalfBlock),
            color_mode: cli
                .color
                .or(config.color.map(Into::into))
                .unwrap_or(ColorMode::TrueColor),
            fps: cli.fps.or(config.fps).unwrap_or(30).clamp(1, 120),
            muted: cli.mute || config.mute.unwrap_or(false),
            color_quant: config.color_quant.unwrap_or(0),
            audio_dir: config.audio_dir.clone().unwrap_or_else(config::default_audio_dir),
            scene: SceneOptions {
                seed,
                timings: config.timing_table(),
                lighting: config.lighting_params(),
            },
        }
    }
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> io::Result<()> {
    // Records on stderr would tear the alternate screen.
    let default = if interactive && log_file.is_none() { "off" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn build_mixer(dir: &Path, muted: bool) -> Mixer {
    let bank = SoundBank::load(dir);
    log::info!("{} of {} sounds loaded from {}", bank.len(), audio::Sound::ALL.len(), dir.display());

    #[cfg(feature = "audio")]
    match audio::RodioAudio::new(bank, muted) {
        Ok(device) => return Mixer::new(Box::new(device)),
        Err(e) => log::warn!("{e}; continuing without sound"),
    }
    #[cfg(not(feature = "audio"))]
    drop(bank);

    Mixer::new(Box::new(SilentAudio::new(muted)))
}

fn main() -> io::Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show, ResetColor);
        default_hook(info);
    }));

    let cli = Cli::parse();

    if cli.list {
        print_list();
        return Ok(());
    }

    if cli.show_config {
        match config::config_path() {
            Some(path) => {
                let state = if path.exists() { "exists" } else { "not created" };
                println!("{} ({state})", path.display());
            }
            None => println!("no config directory on this platform"),
        }
        return Ok(());
    }

    if cli.init_config {
        return init_config();
    }

    init_logging(cli.log_file.as_deref(), cli.snapshot.is_none())?;
    let settings = Settings::resolve(&cli, &config::load_config());

    if let Some(path) = &cli.snapshot {
        return snapshot(path, cli.size, cli.seconds, &settings, cli.trigger);
    }

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let mut writer = BufWriter::with_capacity(256 * 1024, stdout);
    let result = run_loop(&mut writer, &cli, &settings);

    execute!(writer, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    if let Err(e) = &result {
        log::error!("terminal loop failed: {e}");
    }
    result
}

fn print_list() {
    println!("Window scenes (top-left to bottom-right):");
    for (i, kind) in VignetteKind::ALL.iter().enumerate() {
        println!("  {:>2} {:<18} {}", i + 1, kind.name(), kind.description());
    }
    println!("\nSky events (use with --trigger):");
    for kind in EventType::ALL {
        let t = kind.default_timing();
        println!(
            "  {:<14} every {:>3.0}-{:<3.0}s for {:>4.1}s  {}",
            kind.name(),
            t.min_ms / 1000.0,
            t.max_ms / 1000.0,
            t.duration_ms / 1000.0,
            kind.description()
        );
    }
    println!("\nRender modes: half-block, ascii");
    println!("Color modes: mono, ansi16, ansi256, true-color");
}

fn init_config() -> io::Result<()> {
    let Some(path) = config::config_path() else {
        eprintln!("no config directory on this platform");
        return Ok(());
    };
    if path.exists() {
        println!("{} already exists, leaving it alone", path.display());
        return Ok(());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, config::default_config_string())?;
    println!("wrote {}", path.display());
    Ok(())
}

/// Simulate `seconds` at 30 steps per second without a terminal and save the
/// final frame.
fn snapshot(path: &Path, size: Size, seconds: f64, settings: &Settings, trigger: Option<EventType>) -> io::Result<()> {
    const STEP: f64 = 1.0 / 30.0;

    let mut canvas = Canvas::with_pixels(size.width, size.height, RenderMode::HalfBlock, ColorMode::TrueColor);
    let mut facade = Facade::new(size.width as f64, size.height as f64, &settings.scene, Mixer::silent());
    if let Some(kind) = trigger {
        facade.trigger(kind);
    }
    let steps = (seconds.max(0.0) / STEP).round() as usize;
    for _ in 0..steps {
        facade.update(STEP);
    }
    facade.render(&mut canvas);
    ppm::save(&canvas, path)?;
    println!(
        "wrote {} ({}x{}, {:.1}s, seed {}, effect {})",
        path.display(),
        size.width,
        size.height,
        steps as f64 * STEP,
        settings.scene.seed,
        facade.active_name()
    );
    Ok(())
}

const RENDER_MODES: [RenderMode; 2] = [RenderMode::HalfBlock, RenderMode::Ascii];
const COLOR_MODES: [ColorMode; 4] = [ColorMode::TrueColor, ColorMode::Ansi256, ColorMode::Ansi16, ColorMode::Mono];

fn make_canvas(cols: u16, rows: u16, hide_status: bool, settings: &Settings, render: RenderMode, color: ColorMode) -> Canvas {
    let display_rows = if hide_status { rows as usize } else { (rows as usize).saturating_sub(1) };
    let mut canvas = Canvas::new(cols as usize, display_rows, render, color);
    canvas.color_quant = settings.color_quant;
    canvas
}

fn run_loop(stdout: &mut BufWriter<io::Stdout>, cli: &Cli, settings: &Settings) -> io::Result<()> {
    let (mut cols, mut rows) = terminal::size()?;
    let mut render_mode = settings.render_mode;
    let mut color_mode = settings.color_mode;
    let mut hide_status = cli.clean;
    let frame_dur = Duration::from_secs_f64(1.0 / settings.fps as f64);

    let mut canvas = make_canvas(cols, rows, hide_status, settings, render_mode, color_mode);
    let mixer = build_mixer(&settings.audio_dir, settings.muted);
    let mut facade = Facade::new(canvas.width as f64, canvas.height as f64, &settings.scene, mixer);
    facade.start_ambient();
    if let Some(kind) = cli.trigger {
        facade.trigger(kind);
    }

    let mut clock = FrameClock::new();
    let mut frame_count: u64 = 0;
    let mut actual_fps: f64 = 0.0;
    let mut fps_update = Instant::now();
    let mut rebuild_canvas = false;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Resize(w, h) => {
                    if w >= 10 && h >= 5 {
                        cols = w;
                        rows = h;
                        rebuild_canvas = true;
                    }
                }
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('m') => {
                        facade.toggle_mute();
                    }
                    KeyCode::Char('r') => {
                        let idx = RENDER_MODES.iter().position(|&m| m == render_mode).unwrap_or(0);
                        render_mode = RENDER_MODES[(idx + 1) % RENDER_MODES.len()];
                        rebuild_canvas = true;
                    }
                    KeyCode::Char('c') => {
                        let idx = COLOR_MODES.iter().position(|&m| m == color_mode).unwrap_or(0);
                        color_mode = COLOR_MODES[(idx + 1) % COLOR_MODES.len()];
                        rebuild_canvas = true;
                    }
                    KeyCode::Char('h') => {
                        hide_status = !hide_status;
                        rebuild_canvas = true;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if rebuild_canvas && cols >= 10 && rows >= 5 {
            let (settled_cols, settled_rows) = terminal::size()?;
            if settled_cols >= 10 && settled_rows >= 5 {
                cols = settled_cols;
                rows = settled_rows;
            }
            canvas = make_canvas(cols, rows, hide_status, settings, render_mode, color_mode);
            if (canvas.width as f64, canvas.height as f64) != (facade.layout().width, facade.layout().height) {
                facade.resize(canvas.width as f64, canvas.height as f64);
            }
            write!(stdout, "\x1b[2J\x1b[H")?;
            stdout.flush()?;
            rebuild_canvas = false;
        }

        facade.update_step(clock.tick());
        canvas.clear();
        facade.render(&mut canvas);
        let frame = canvas.render();

        // Skip a frame rather than write one sized for the old terminal.
        let (check_cols, check_rows) = terminal::size()?;
        if check_cols != cols || check_rows != rows {
            cols = check_cols;
            rows = check_rows;
            rebuild_canvas = true;
            std::thread::sleep(Duration::from_millis(50));
            continue;
        }

        stdout.write_all(b"\x1b[H")?;
        stdout.write_all(frame.as_bytes())?;

        frame_count += 1;
        if fps_update.elapsed() >= Duration::from_secs(1) {
            actual_fps = frame_count as f64 / fps_update.elapsed().as_secs_f64();
            frame_count = 0;
            fps_update = Instant::now();
        }
        if !hide_status {
            let status = format!(
                " nightfacade | {} | lit {}/{} | {:?} | {:?} | {:.0} fps{} | {:.0}s | [m] mute  [r] render  [c] color  [h] hide  [q] quit ",
                facade.active_name(),
                facade.lighting().lit_count(),
                facade.lighting().cells().len(),
                render_mode,
                color_mode,
                actual_fps,
                if facade.is_muted() { " | muted" } else { "" },
                clock.elapsed(),
            );
            let w = cols as usize;
            let truncated: String = status.chars().take(w).collect();
            let padded = format!("{:<width$}", truncated, width = w);
            write!(stdout, "\x1b[{};1H\x1b[7m{}\x1b[0m", rows, padded)?;
        }

        stdout.flush()?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1280x720"), Ok(Size { width: 1280, height: 720 }));
        assert_eq!(parse_size("64X48"), Ok(Size { width: 64, height: 48 }));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from(["nightfacade", "--seed", "3", "--fps", "500", "-r", "ascii"]);
        let config = config::Config::parse("seed = 9\nfps = 12\nmute = true\ncolor = \"ansi16\"", Path::new("c.toml"))
            .unwrap();
        let s = Settings::resolve(&cli, &config);
        assert_eq!(s.scene.seed, 3);
        assert_eq!(s.fps, 120);
        assert!(s.muted);
        assert_eq!(s.render_mode, RenderMode::Ascii);
        assert_eq!(s.color_mode, ColorMode::Ansi16);
    }

    #[test]
    fn test_snapshot_writes_a_ppm() {
        let path = std::env::temp_dir().join(format!("nightfacade-snap-{}.ppm", std::process::id()));
        let cli = Cli::parse_from(["nightfacade", "--seed", "1"]);
        let settings = Settings::resolve(&cli, &config::Config::default());
        snapshot(&path, Size { width: 160, height: 90 }, 0.5, &settings, Some(EventType::Ufo)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n160 90\n255\n"));
        assert_eq!(bytes.len(), b"P6\n160 90\n255\n".len() + 160 * 90 * 3);
        std::fs::remove_file(&path).unwrap();
    }
}
