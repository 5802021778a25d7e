//! App: terminal init, fixed-interval tick loop and key handling.

use crate::GameConfig;
use crate::game::{Game, Tick};
use crate::input::{Action, key_to_action, key_to_events};
use crate::theme::Theme;
use anyhow::{Result, ensure};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use log::info;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Redraw cadence while only the game-over fade is animating.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

/// Whether the loop keeps running after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    game: Game,
    screen: Screen,
    last_tick: Instant,
    /// Terminal reports key releases (keyboard enhancement supported).
    reports_release: bool,
    /// TachyonFX fade shown on game over.
    game_over_effect: Option<Effect>,
    game_over_effect_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let game = Game::new(&config);
        Self {
            config,
            theme,
            game,
            screen: Screen::Playing,
            last_tick: Instant::now(),
            reports_release: false,
            game_over_effect: None,
            game_over_effect_time: None,
        }
    }

    /// Full restart: a fresh game replaces every piece of state.
    fn reset_game(&mut self) {
        info!("restarting");
        self.game = Game::new(&self.config);
        self.screen = Screen::Playing;
        self.last_tick = Instant::now();
        self.game_over_effect = None;
        self.game_over_effect_time = None;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let action = key_to_action(key);
        if key.kind == KeyEventKind::Press {
            match (action, self.screen) {
                (Action::Quit, _) => return Flow::Quit,
                (Action::Restart, Screen::GameOver) => {
                    self.reset_game();
                    return Flow::Continue;
                }
                _ => {}
            }
        }
        if self.screen == Screen::Playing {
            for event in key_to_events(key, self.reports_release) {
                self.game.queue_input(event);
            }
        }
        Flow::Continue
    }

    /// One timer firing. Stops the timer (switches screen) on game over.
    fn tick(&mut self) {
        match self.game.update() {
            Tick::GameOver { score } => info!("game over, final score {score}"),
            Tick::Locked { cleared } if cleared > 0 => {
                info!("cleared {cleared} row(s), score {}", self.game.score);
            }
            _ => {}
        }
        if self.game.is_over() {
            self.screen = Screen::GameOver;
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        let (cols, rows) = crossterm::terminal::size()?;
        let (need_cols, need_rows) = crate::ui::required_area(&self.game);
        ensure!(
            cols >= need_cols && rows >= need_rows,
            "a {}x{} board needs a {need_cols}x{need_rows} terminal, this one is {cols}x{rows}",
            self.config.width,
            self.config.height
        );

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events let a held key act once instead of once per OS repeat.
        self.reports_release = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.reports_release {
            let _ = execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            );
        }
        info!("key release reporting: {}", self.reports_release);

        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        self.last_tick = Instant::now();
        let result = self.run_loop(&mut terminal);

        // Restore
        if self.reports_release {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.game,
                    &self.theme,
                    self.screen,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_time,
                    now,
                );
            })?;

            let timeout = match self.screen {
                Screen::Playing => self.config.tick_interval.saturating_sub(self.last_tick.elapsed()),
                Screen::GameOver => FRAME,
            };
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if self.handle_key(key) == Flow::Quit {
                            return Ok(());
                        }
                    }
                }
            }

            if self.screen == Screen::Playing && self.last_tick.elapsed() >= self.config.tick_interval {
                self.last_tick = Instant::now();
                self.tick();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRange;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn app() -> App {
        let config = GameConfig {
            width: 10,
            height: 20,
            tick_interval: Duration::from_millis(150),
            catalog: CatalogRange::Legacy,
            seed: Some(1),
        };
        App::new(config, Theme::default())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn run_until_over(app: &mut App) {
        for _ in 0..10_000 {
            if app.screen == Screen::GameOver {
                return;
            }
            app.tick();
        }
        panic!("game never ended");
    }

    #[test]
    fn quit_key_stops_loop() {
        let mut app = app();
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Flow::Quit);
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Flow::Quit);
    }

    #[test]
    fn move_key_reaches_game_on_next_tick() {
        let mut app = app();
        app.tick();
        let x = app.game.active.as_ref().unwrap().x;
        assert_eq!(app.handle_key(press(KeyCode::Left)), Flow::Continue);
        app.tick();
        assert_eq!(app.game.active.as_ref().unwrap().x, x - 1);
        // Without release reporting the next press moves again.
        app.handle_key(press(KeyCode::Left));
        app.tick();
        assert_eq!(app.game.active.as_ref().unwrap().x, x - 2);
    }

    #[test]
    fn held_key_moves_once_with_release_reporting() {
        let mut app = app();
        app.reports_release = true;
        app.tick();
        let x = app.game.active.as_ref().unwrap().x;
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Right));
        app.tick();
        assert_eq!(app.game.active.as_ref().unwrap().x, x + 1);
    }

    #[test]
    fn game_over_switches_screen_and_stops_ticking() {
        let mut app = app();
        run_until_over(&mut app);
        assert!(app.game.is_over());
        let board = app.game.board.clone();
        app.tick();
        assert_eq!(app.game.board, board);
    }

    #[test]
    fn restart_only_after_game_over() {
        let mut app = app();
        app.tick();
        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(app.screen, Screen::Playing);
        assert!(app.game.active.is_some());

        run_until_over(&mut app);
        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(app.screen, Screen::Playing);
        assert!(!app.game.is_over());
        assert!(app.game.active.is_none());
        assert_eq!(app.game.board.occupied_count(), 0);
        assert_eq!(app.game.score, 0);
    }
}
