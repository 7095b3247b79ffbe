use arboard::Clipboard;
use bloxorz::config::Config;
use bloxorz::search::{self, SearchMethod};
use bloxorz::tile::{Feature, SwitchTrigger, TeleportRole};
use bloxorz::{Action, Board, Level, Orientation, Session};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Play,
    Solve,
    Stats,
}

/// Command line options; anything unset falls back to config.toml
#[derive(Debug)]
struct Options {
    mode: Mode,
    level: Option<PathBuf>,
    stage: Option<u32>,
    method: Option<SearchMethod>,
    json: bool,
}

fn print_usage() {
    eprintln!("Usage: bloxorz [--solve | --stats] [--stage N | --level PATH] [--method bfs|dfs] [--json]");
    eprintln!("  (no mode)  play interactively");
    eprintln!("  --solve    find a path, print it, then replay it (Right/Down steps, Ctrl+R rewinds)");
    eprintln!("  --stats    run the search without keeping paths and print timings");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        mode: Mode::Play,
        level: None,
        stage: None,
        method: None,
        json: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--solve" => options.mode = Mode::Solve,
            "--stats" => options.mode = Mode::Stats,
            "--json" => options.json = true,
            "--stage" => {
                let value = iter.next().ok_or("--stage needs a number")?;
                options.stage = Some(value.parse().map_err(|_| format!("invalid stage '{}'", value))?);
            }
            "--level" => {
                let value = iter.next().ok_or("--level needs a path")?;
                options.level = Some(PathBuf::from(value));
            }
            "--method" => {
                let value = iter.next().ok_or("--method needs bfs or dfs")?;
                options.method = Some(value.parse()?);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(options)
}

fn load_board(path: &Path) -> Result<Board, Box<dyn std::error::Error>> {
    let level = Level::load_from_file(path)?;
    let board = Board::build(&level)?;
    Ok(board)
}

/// Solver path being replayed one key press at a time
struct Playback {
    path: Vec<Action>,
    next: usize,
}

/// Visualization state
struct GameView {
    session: Session,
    playback: Option<Playback>,
    cell_size: f32,
    background: Color,
    status: String,
    /// Seconds left on the swap highlight
    rotation_flash: f32,
}

impl GameView {
    fn new(session: Session, config: &Config) -> Self {
        GameView {
            session,
            playback: None,
            cell_size: config.visual.cell_size,
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
            status: String::new(),
            rotation_flash: 0.0,
        }
    }

    fn apply(&mut self, action: Action) {
        match self.session.step(action) {
            Ok(_) => {
                self.status = if self.session.is_won() {
                    format!("Goal reached in {} moves! Ctrl+R to play again", self.session.moves())
                } else {
                    String::new()
                };
            }
            Err(reason) => self.status = format!("Can't move {}: {}", action, reason),
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        if let Some(playback) = &mut self.playback {
            playback.next = 0;
        }
        self.status = "Restarted".to_string();
    }

    fn handle_input(&mut self) {
        let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);

        if ctrl && is_key_pressed(KeyCode::R) {
            self.restart();
            return;
        }

        if self.playback.is_some() {
            if is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::Down) {
                self.advance_playback();
            }
            return;
        }

        if ctrl && is_key_pressed(KeyCode::V) {
            self.paste_level();
        } else if is_key_pressed(KeyCode::C) {
            self.copy_level();
        } else if is_key_pressed(KeyCode::Up) {
            self.apply(Action::Up);
        } else if is_key_pressed(KeyCode::Down) {
            self.apply(Action::Down);
        } else if is_key_pressed(KeyCode::Left) {
            self.apply(Action::Left);
        } else if is_key_pressed(KeyCode::Right) {
            self.apply(Action::Right);
        } else if is_key_pressed(KeyCode::Space) {
            self.apply(Action::Swap);
        }
    }

    fn advance_playback(&mut self) {
        let next_action = match &self.playback {
            Some(playback) => playback.path.get(playback.next).copied(),
            None => return,
        };

        match next_action {
            Some(action) => {
                self.apply(action);
                if let Some(playback) = &mut self.playback {
                    playback.next += 1;
                }
            }
            // Past the end: start the replay over
            None => self.restart(),
        }
    }

    fn paste_level(&mut self) {
        let text = match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(e) => {
                println!("Failed to access clipboard: {}", e);
                return;
            }
        };

        match Level::parse("clipboard", &text).and_then(|level| Board::build(&level)) {
            Ok(board) => {
                println!("Loaded {}x{} level from clipboard", board.cols, board.rows);
                self.session.load(board);
                self.status = "Level pasted from clipboard".to_string();
            }
            Err(e) => {
                println!("Clipboard does not hold a valid level: {}", e);
                self.status = format!("Paste failed: {}", e);
            }
        }
    }

    fn copy_level(&self) {
        let text = self.session.board().to_level_text(&self.session.state().bridges);
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text) {
                    println!("Failed to copy to clipboard: {}", e);
                } else {
                    println!("Level copied to clipboard!");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                println!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn tile_color(feature: Feature, bridge_on: Option<bool>) -> Option<Color> {
        match feature {
            Feature::Empty => None,
            Feature::SoftFloor => Some(Color::from_rgba(255, 196, 120, 255)),
            Feature::Goal => Some(Color::from_rgba(10, 10, 10, 255)),
            Feature::Bridge { .. } => match bridge_on {
                Some(true) => Some(Color::from_rgba(255, 170, 210, 255)),
                _ => None,
            },
            Feature::Floor
            | Feature::Start
            | Feature::StartSecond
            | Feature::Switch { .. }
            | Feature::Teleporter { .. } => Some(Color::from_rgba(210, 210, 215, 255)),
        }
    }

    fn draw_feature(&self, feature: Feature, px: f32, py: f32) {
        let size = self.cell_size;
        let cx = px + size / 2.0;
        let cy = py + size / 2.0;
        let steel = Color::from_rgba(110, 130, 160, 255);

        match feature {
            Feature::Switch { trigger: SwitchTrigger::AnyOccupancy, .. } => {
                draw_circle(cx, cy, size * 0.25, steel);
            }
            Feature::Switch { trigger: SwitchTrigger::Standing, .. } => {
                let r = size * 0.25;
                draw_line(cx - r, cy - r, cx + r, cy + r, 4.0, steel);
                draw_line(cx - r, cy + r, cx + r, cy - r, 4.0, steel);
            }
            Feature::Teleporter { role: TeleportRole::Trigger, .. } => {
                draw_circle_lines(cx, cy, size * 0.3, 3.0, steel);
                draw_circle_lines(cx, cy, size * 0.15, 2.0, steel);
            }
            Feature::Teleporter { .. } => {
                draw_circle(cx, cy, size * 0.08, steel);
            }
            Feature::Bridge { .. } => {
                draw_rectangle_lines(px + 2.0, py + 2.0, size - 5.0, size - 5.0, 1.0, GRAY);
            }
            _ => {}
        }
    }

    fn draw(&self) {
        clear_background(self.background);

        let board = self.session.board();
        let state = self.session.state();
        let size = self.cell_size;

        // Draw board cells
        for y in 0..board.rows {
            for x in 0..board.cols {
                let px = x as f32 * size;
                let py = y as f32 * size;
                let bridge_on = board.bridge_on_at(x, y, &state.bridges);

                if let Some(color) = Self::tile_color(board.base(x, y), bridge_on) {
                    draw_rectangle(px, py, size - 1.0, size - 1.0, color);
                }
                for &feature in board.features(x, y) {
                    self.draw_feature(feature, px, py);
                }
            }
        }

        // Draw block
        let orientation = state.orientation();
        let block_color = if orientation == Orientation::Standing {
            Color::from_rgba(150, 40, 70, 255)
        } else {
            Color::from_rgba(220, 90, 120, 255)
        };
        for (i, cell) in state.cells.iter().enumerate() {
            let color = if orientation == Orientation::Detached && i == 1 {
                Color::from_rgba(235, 170, 190, 255)
            } else {
                block_color
            };
            let px = cell.x as f32 * size;
            let py = cell.y as f32 * size;
            draw_rectangle(px + 4.0, py + 4.0, size - 9.0, size - 9.0, color);
        }
        if self.rotation_flash > 0.0 {
            let cell = state.cells[0];
            draw_rectangle_lines(cell.x as f32 * size + 2.0, cell.y as f32 * size + 2.0, size - 5.0, size - 5.0, 3.0, YELLOW);
        }

        // Draw info
        let help = if self.playback.is_some() {
            "Right/Down: next move  Ctrl+R: rewind  Esc: close window"
        } else {
            "Arrows: move  Space: swap  Ctrl+R: restart  Ctrl+V: paste level  C: copy level  Esc: close window"
        };
        let info = format!(
            "Level: {}  Moves: {}  Block: {:?}",
            board.name,
            self.session.moves(),
            orientation
        );
        let top = board.rows as f32 * size + 24.0;
        draw_text(&info, 10.0, top, 20.0, WHITE);
        draw_text(help, 10.0, top + 22.0, 18.0, LIGHTGRAY);
        if !self.status.is_empty() {
            draw_text(&self.status, 10.0, top + 44.0, 20.0, YELLOW);
        }
    }
}

#[macroquad::main("Bloxorz")]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            return;
        }
    };

    let config = Config::load();
    let level_path = match (&options.level, options.stage) {
        (Some(path), _) => path.clone(),
        (None, Some(stage)) => Level::stage_path(&config.level.stages_dir, stage),
        (None, None) => config.level_path(),
    };
    let method = options.method.unwrap_or(config.solver.method);

    let board = match load_board(&level_path) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Failed to load level {}: {}", level_path.display(), e);
            return;
        }
    };

    let mut playback = None;
    match options.mode {
        Mode::Stats => {
            let report = search::measure(&board, method, config.solver.trace);
            if options.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Failed to serialize report: {}", e),
                }
            } else {
                println!("{}", report);
            }
            return;
        }
        Mode::Solve => {
            let (outcome, report) = search::solve(&board, method, config.solver.trace);
            if options.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Failed to serialize report: {}", e),
                }
            } else {
                println!("{}", report);
            }
            match outcome.path() {
                Some(path) => {
                    playback = Some(Playback { path: path.to_vec(), next: 0 });
                }
                None => return,
            }
        }
        Mode::Play => {}
    }

    let mut session = Session::new(board);
    if let Some(playback) = &playback {
        session.begin_playback(playback.path.len());
    }
    let mut view = GameView::new(session, &config);
    view.playback = playback;

    loop {
        view.handle_input();

        if view.session.take_pending_rotation() {
            view.rotation_flash = 0.3;
        }
        view.rotation_flash = (view.rotation_flash - get_frame_time()).max(0.0);

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        view.draw();

        next_frame().await
    }

    let log = view.session.log();
    if config.solver.trace {
        log.print();
    }
    println!("{}", log.summary());
    if config.logging.enable_action_log {
        match log.save_to_file(&config.logging.action_log_path) {
            Ok(()) => println!("Action log saved to {}", config.logging.action_log_path),
            Err(e) => eprintln!("Failed to save action log: {}", e),
        }
    }
}
