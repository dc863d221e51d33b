use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags, MouseButton,
    MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use mkultra::app::App;
use mkultra::audio::{resolve_sound_root, RecordingSink, SoundBoard};
use mkultra::combat::hitbox::HitboxDb;
use mkultra::config::GameConfig;
use mkultra::editor::EditorInput;
use mkultra::logging;
use mkultra::stage::discover_stages;
use mkultra::ui;
use mkultra::ui::fight_scene::{cell_to_world, fight_layout};
use mkultra::utils::build_info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const FRAME: Duration = Duration::from_millis(16);

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("MK Ultra - Terminal Fighting Game\n");
                println!("Usage: mkultra [option]\n");
                println!("Options:");
                println!("  --version  Show version information");
                println!("  --help     Show this help message");
                println!("\nEnvironment:");
                println!("  MKULTRA_HITBOX_PATH  Hitbox JSON file");
                println!("  MKULTRA_STAGES_DIR   Directory of stage images");
                println!("  MKULTRA_SOUND_DIR    Directory of sound files");
                println!("  MKULTRA_DIFFICULTY   CPU difficulty, 0.0 to 1.0");
                println!("  MKULTRA_STAGE        Stage the select cursor starts on");
                println!("  MKULTRA_LOG          Log filter (default: info)");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'mkultra --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    dotenvy::dotenv().ok();
    if let Err(e) = logging::init_file_logging() {
        eprintln!("Warning: could not open log file: {}", e);
    }

    let mut config = GameConfig::load_or_default();
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "invalid configuration, using defaults");
        config = GameConfig::default();
    }

    let hitboxes = HitboxDb::load(&config.hitbox_path);
    let stages = discover_stages(&config.stages_dir);
    let sound = SoundBoard::new(
        resolve_sound_root(config.sound_dir.as_deref()),
        RecordingSink::new(config.bell_on_hit),
    );
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut app = App::new(config, hitboxes, stages, sound, seed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    tracing::info!(enhanced_keys, "terminal ready");
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    if enhanced_keys {
        terminal.backend_mut().execute(PopKeyboardEnhancementFlags)?;
    }
    terminal.backend_mut().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "main loop failed");
    }
    tracing::info!("goodbye");
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let start = Instant::now();
    let mut last_tick = Instant::now();

    while !app.quit {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = FRAME.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let now_ms = start.elapsed().as_millis() as u64;
            match event::read()? {
                Event::Key(key) => app.handle_key(key, now_ms),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let field = fight_layout(size).content;
                    if let Some((x, y)) = cell_to_world(field, mouse.column, mouse.row) {
                        let input = match mouse.kind {
                            MouseEventKind::Down(MouseButton::Left) => Some(EditorInput::MouseDown { x, y }),
                            MouseEventKind::Drag(MouseButton::Left) => Some(EditorInput::MouseDrag { x, y }),
                            MouseEventKind::Up(MouseButton::Left) => Some(EditorInput::MouseUp { x, y }),
                            _ => None,
                        };
                        if let Some(input) = input {
                            app.handle_mouse(input);
                        }
                    }
                }
                Event::FocusLost => app.keyboard.clear(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= FRAME {
            let now_ms = start.elapsed().as_millis() as u64;
            app.tick(elapsed.as_millis() as u64, now_ms);
            last_tick = Instant::now();
        }

        if app.sound.sink_mut().take_bells() > 0 {
            let backend = terminal.backend_mut();
            io::Write::write_all(backend, b"\x07")?;
            io::Write::flush(backend)?;
        }
    }
    Ok(())
}
