//! Interactive play mode
//!
//! Owns one user's game from the welcome screen to quit: the optional
//! resume prompt, the tick loop, pause saves, level-up saves and restarts.
//! Restart replaces the session in place; the loop never recurses.

use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing::{info, warn};

use crate::game::{Command, Direction, GameConfig, GameEngine, Session};
use crate::input::{InputHandler, command_stream};
use crate::persistence::{
    ProgressStore, SessionSnapshot, UserProgress, load_progress_or_default, load_snapshot_or_none,
};
use crate::render::Renderer;

/// Seconds since the UNIX epoch, the clock the game engine runs on
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// What the player is looking at
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Greeting with the unlocked level; waits for Confirm
    Welcome,
    /// A paused game was found; Confirm resumes it, Restart discards it
    ResumePrompt(SessionSnapshot),
    /// A session in any phase
    Game(Session),
}

pub struct PlayMode<S: ProgressStore> {
    engine: GameEngine,
    store: S,
    progress: UserProgress,
    screen: Screen,
    renderer: Renderer,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl<S: ProgressStore> PlayMode<S> {
    pub fn new(config: GameConfig, store: S, username: &str) -> Self {
        Self::with_engine(GameEngine::new(config), store, username)
    }

    pub fn with_engine(engine: GameEngine, store: S, username: &str) -> Self {
        let progress = load_progress_or_default(&store, username);
        info!(
            username,
            level = progress.current_level,
            "loaded user progress"
        );

        Self {
            engine,
            store,
            progress,
            screen: Screen::Welcome,
            renderer: Renderer::new(),
            should_quit: false,
            pending_direction: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut commands = Box::pin(command_stream(EventStream::new(), InputHandler::new()));

        // Game ticks at the current level's speed
        let mut tick_period = self.tick_interval();
        let mut tick_timer = interval(tick_period);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle player commands
                maybe_command = commands.next() => {
                    match maybe_command {
                        Some(command) => self.handle_command(command, unix_now()),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game(unix_now());
                }

                // Render frame
                _ = render_timer.tick() => {
                    let now = unix_now();
                    terminal.draw(|frame| self.draw(frame, now)).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(username = %self.progress.username, "quit");
                break;
            }

            // Level-ups and restarts change the speed
            let period = self.tick_interval();
            if period != tick_period {
                tick_period = period;
                tick_timer = interval_at(Instant::now() + period, period);
                tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }
        }

        Ok(())
    }

    /// Time between ticks for the current screen
    pub fn tick_interval(&self) -> Duration {
        match &self.screen {
            Screen::Game(session) => Duration::from_secs_f64(1.0 / f64::from(session.speed.max(1))),
            _ => Duration::from_millis(100),
        }
    }

    /// Apply one player command
    pub fn handle_command(&mut self, command: Command, now: f64) {
        if command == Command::Quit {
            self.should_quit = true;
            return;
        }

        match &mut self.screen {
            Screen::Welcome => {
                if command == Command::Confirm {
                    match load_snapshot_or_none(&self.store, &self.progress.username) {
                        Some(snapshot) => self.screen = Screen::ResumePrompt(snapshot),
                        None => self.start_new_game(now),
                    }
                }
            }
            Screen::ResumePrompt(snapshot) => match command {
                Command::Confirm => {
                    let restored = snapshot.restore(self.engine.levels(), self.engine.config());
                    self.discard_snapshot();
                    match restored {
                        Ok(session) => {
                            info!(
                                score = session.score,
                                level = session.level,
                                "resumed saved game"
                            );
                            self.pending_direction = None;
                            self.screen = Screen::Game(session);
                        }
                        Err(err) => {
                            warn!(error = %err, "saved game is unusable, starting a new one");
                            self.start_new_game(now);
                        }
                    }
                }
                Command::Restart => {
                    self.discard_snapshot();
                    self.start_new_game(now);
                }
                _ => {}
            },
            Screen::Game(session) => match command {
                Command::TogglePause => {
                    if session.pause() {
                        self.pending_direction = None;
                        let snapshot = SessionSnapshot::capture(&self.progress.username, session);
                        info!(score = session.score, "paused");
                        self.save_snapshot(&snapshot);
                    } else if session.resume() {
                        info!("resumed");
                    }
                }
                Command::Move(direction) => {
                    if session.is_playing() {
                        self.pending_direction = Some(direction);
                    }
                }
                Command::Restart => {
                    if session.is_over() {
                        info!("restart");
                        self.start_new_game(now);
                    }
                }
                Command::Confirm | Command::Quit => {}
            },
        }
    }

    /// Advance the session by one tick, persisting any level-up
    pub fn update_game(&mut self, now: f64) {
        let Screen::Game(session) = &mut self.screen else {
            return;
        };
        if !session.is_playing() {
            return;
        }

        let direction = self.pending_direction.take();
        let result = self.engine.step(session, direction, now);

        if let Some(level) = result.info.level_up {
            self.record_level(level);
        }
        if result.terminated {
            // A finished game can't be resumed
            self.discard_snapshot();
        }
    }

    fn draw(&self, frame: &mut Frame, now: f64) {
        match &self.screen {
            Screen::Welcome => self.renderer.render_welcome(
                frame,
                &self.progress.username,
                self.progress.current_level,
            ),
            Screen::ResumePrompt(snapshot) => self.renderer.render_resume_prompt(frame, snapshot),
            Screen::Game(session) => self.renderer.render_game(
                frame,
                session,
                self.engine.levels(),
                self.engine.config(),
                now,
            ),
        }
    }

    fn start_new_game(&mut self, now: f64) {
        let session = self.engine.new_session(self.progress.current_level, now);
        info!(level = session.level, "new game");
        self.pending_direction = None;
        self.screen = Screen::Game(session);
    }

    /// Raise the unlocked level; progress never goes down
    fn record_level(&mut self, level: u32) {
        if level <= self.progress.current_level {
            return;
        }
        self.progress.current_level = level;
        if let Err(err) = self.store.save_progress(&self.progress.username, level) {
            warn!(error = %err, level, "could not save progress, continuing in memory");
        }
    }

    fn save_snapshot(&mut self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.store.save_snapshot(&self.progress.username, snapshot) {
            warn!(error = %err, "could not save game, continuing in memory");
        }
    }

    fn discard_snapshot(&mut self) {
        if let Err(err) = self.store.clear_snapshot(&self.progress.username) {
            warn!(error = %err, "could not remove saved game");
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Food, Phase, Position, Snake};
    use crate::persistence::{MemoryStore, PersistenceError};

    fn mode_with(store: MemoryStore) -> PlayMode<MemoryStore> {
        PlayMode::with_engine(GameEngine::with_seed(GameConfig::default(), 9), store, "sam")
    }

    fn start(mode: &mut PlayMode<MemoryStore>) {
        mode.handle_command(Command::Confirm, 0.0);
    }

    fn session(mode: &PlayMode<impl ProgressStore>) -> &Session {
        match mode.screen() {
            Screen::Game(session) => session,
            other => panic!("expected a game, got {other:?}"),
        }
    }

    /// Put food straight ahead of a one-cell snake at (200,200)
    fn food_ahead(mode: &mut PlayMode<impl ProgressStore>, weight: u32, score: u32) {
        if let Screen::Game(session) = &mut mode.screen {
            session.snake = Snake::new(Position::new(200, 200), Direction::Right);
            session.food = Food {
                position: Position::new(210, 200),
                weight,
                spawned_at: 0.0,
            };
            session.score = score;
        }
    }

    #[test]
    fn test_confirm_starts_new_game_at_unlocked_level() {
        let mut store = MemoryStore::new();
        store.save_progress("sam", 2).unwrap();
        let mut mode = mode_with(store);
        assert_eq!(mode.screen(), &Screen::Welcome);

        start(&mut mode);

        let session = session(&mode);
        assert!(session.is_playing());
        assert_eq!(session.level, 2);
        assert_eq!(session.speed, 13);
    }

    #[test]
    fn test_level_up_is_persisted() {
        let mut mode = mode_with(MemoryStore::new());
        start(&mut mode);
        food_ahead(&mut mode, 4, 6);

        mode.update_game(0.1);

        assert_eq!(session(&mode).level, 2);
        assert_eq!(session(&mode).speed, 13);
        assert_eq!(mode.progress().current_level, 2);
        assert_eq!(mode.store.load_progress("sam").unwrap().current_level, 2);
        assert_eq!(mode.tick_interval(), Duration::from_secs_f64(1.0 / 13.0));
    }

    #[test]
    fn test_pause_saves_snapshot_and_resume_keeps_state() {
        let mut mode = mode_with(MemoryStore::new());
        start(&mut mode);
        mode.update_game(0.1);
        let before = session(&mode).clone();

        mode.handle_command(Command::TogglePause, 0.2);
        assert!(session(&mode).is_paused());
        let saved = mode.store.load_snapshot("sam").unwrap().unwrap();
        assert_eq!(saved, SessionSnapshot::capture("sam", &before));

        // Ticks and moves are ignored while paused
        mode.handle_command(Command::Move(Direction::Down), 0.3);
        mode.update_game(0.3);
        assert_eq!(session(&mode).snake, before.snake);

        mode.handle_command(Command::TogglePause, 0.4);
        assert!(session(&mode).is_playing());
        assert_eq!(session(&mode).snake, before.snake);
    }

    #[test]
    fn test_saved_game_is_offered_and_consumed() {
        let mut source = mode_with(MemoryStore::new());
        start(&mut source);
        source.update_game(0.1);
        source.handle_command(Command::TogglePause, 0.2);
        let paused = session(&source).clone();
        let store = source.store.clone();

        let mut mode = mode_with(store);
        start(&mut mode);
        assert!(matches!(mode.screen(), Screen::ResumePrompt(_)));

        mode.handle_command(Command::Confirm, 5.0);

        let resumed = session(&mode);
        assert_eq!(resumed.phase, Phase::Playing);
        assert_eq!(resumed.snake, paused.snake);
        assert_eq!(resumed.food, paused.food);
        assert_eq!(resumed.score, paused.score);
        assert!(mode.store.load_snapshot("sam").unwrap().is_none());
    }

    #[test]
    fn test_declining_saved_game_starts_fresh() {
        let mut store = MemoryStore::new();
        let mut engine = GameEngine::with_seed(GameConfig::default(), 2);
        let mut old = engine.new_session(1, 0.0);
        old.score = 7;
        store
            .save_snapshot("sam", &SessionSnapshot::capture("sam", &old))
            .unwrap();

        let mut mode = mode_with(store);
        start(&mut mode);
        mode.handle_command(Command::Restart, 1.0);

        assert_eq!(session(&mode).score, 0);
        assert!(mode.store.load_snapshot("sam").unwrap().is_none());
    }

    #[test]
    fn test_unusable_saved_game_falls_back_to_a_new_one() {
        let mut store = MemoryStore::new();
        store.save_progress("sam", 2).unwrap();
        let mut engine = GameEngine::with_seed(GameConfig::default(), 2);
        let mut broken = SessionSnapshot::capture("sam", &engine.new_session(1, 0.0));
        broken.level = 9;
        broken.score = 30;
        store.save_snapshot("sam", &broken).unwrap();

        let mut mode = mode_with(store);
        start(&mut mode);
        assert!(matches!(mode.screen(), Screen::ResumePrompt(_)));

        mode.handle_command(Command::Confirm, 1.0);

        let session = session(&mode);
        assert!(session.is_playing());
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 2);
        assert_eq!(session.speed, 13);
        assert!(mode.store.load_snapshot("sam").unwrap().is_none());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut mode = mode_with(MemoryStore::new());
        start(&mut mode);
        food_ahead(&mut mode, 2, 0);
        mode.update_game(0.1);
        assert_eq!(session(&mode).score, 2);

        // Restart while playing is ignored
        mode.handle_command(Command::Restart, 0.2);
        assert_eq!(session(&mode).score, 2);

        // Run into the top edge
        mode.handle_command(Command::Move(Direction::Up), 0.2);
        for tick in 0..50 {
            mode.update_game(0.3 + tick as f64 * 0.01);
        }
        assert!(session(&mode).is_over());

        mode.handle_command(Command::Restart, 2.0);
        assert!(session(&mode).is_playing());
        assert_eq!(session(&mode).score, 0);
    }

    #[test]
    fn test_latest_direction_wins() {
        let mut mode = mode_with(MemoryStore::new());
        start(&mut mode);
        food_ahead(&mut mode, 1, 0);
        if let Screen::Game(session) = &mut mode.screen {
            session.food.position = Position::new(0, 0);
        }

        mode.handle_command(Command::Move(Direction::Up), 0.1);
        mode.handle_command(Command::Move(Direction::Down), 0.1);
        mode.update_game(0.1);

        assert_eq!(session(&mode).snake.head(), Position::new(200, 210));
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut mode = mode_with(MemoryStore::new());
        mode.handle_command(Command::Quit, 0.0);
        assert!(mode.should_quit());
    }

    struct ReadOnlyStore;

    impl ProgressStore for ReadOnlyStore {
        fn load_progress(&self, username: &str) -> Result<UserProgress, PersistenceError> {
            Ok(UserProgress::new(username))
        }

        fn save_progress(&mut self, _username: &str, _level: u32) -> Result<(), PersistenceError> {
            Err(PersistenceError::Invalid("read-only".into()))
        }

        fn load_snapshot(
            &self,
            _username: &str,
        ) -> Result<Option<SessionSnapshot>, PersistenceError> {
            Ok(None)
        }

        fn save_snapshot(
            &mut self,
            _username: &str,
            _snapshot: &SessionSnapshot,
        ) -> Result<(), PersistenceError> {
            Err(PersistenceError::Invalid("read-only".into()))
        }

        fn clear_snapshot(&mut self, _username: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Invalid("read-only".into()))
        }
    }

    #[test]
    fn test_write_failures_keep_the_game_playable() {
        let mut mode =
            PlayMode::with_engine(GameEngine::with_seed(GameConfig::default(), 4), ReadOnlyStore, "tia");
        mode.handle_command(Command::Confirm, 0.0);
        food_ahead(&mut mode, 5, 5);

        mode.update_game(0.1);
        assert_eq!(session(&mode).level, 2);
        assert_eq!(mode.progress().current_level, 2);

        mode.handle_command(Command::TogglePause, 0.2);
        assert!(session(&mode).is_paused());
        mode.handle_command(Command::TogglePause, 0.3);
        assert!(session(&mode).is_playing());
    }
}
