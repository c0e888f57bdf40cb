//! The worm game simulation, independent of any presentation
mod arbiter;
mod board;
mod direction;
mod food;
mod scheduler;
mod worm;
use self::arbiter::DirectionArbiter;
use self::board::Board;
pub(crate) use self::board::{Bounds, Cell};
pub(crate) use self::direction::Direction;
use self::food::{BoardFull, FoodSpawner, SpawnMode};
use self::scheduler::TickScheduler;
use self::worm::Worm;
pub(crate) use self::worm::Segment;
use crate::consts;
use crate::highscores::HighScoreStore;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Parameters fixed for the lifetime of an engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EngineConfig {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) starting_interval: Duration,
    /// Factor applied to the tick interval after every tick; in `(0, 1)`
    pub(crate) speed_multiplier: f64,
    pub(crate) min_interval: Duration,
    /// If set, food is always placed here when the cell is free
    pub(crate) food_cell: Option<Cell>,
}

impl EngineConfig {
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds {
            width: self.width,
            height: self.height,
        }
    }

    /// The cell a new worm starts on, pulled onto the board if the board is
    /// too small for the usual spot
    pub(crate) fn spawn_cell(&self) -> Cell {
        Cell {
            row: consts::SPAWN_CELL.row.min(self.height.saturating_sub(1)),
            col: consts::SPAWN_CELL.col.min(self.width.saturating_sub(1)),
        }
    }

    fn spawn_mode(&self) -> SpawnMode {
        self.food_cell.map_or(SpawnMode::Random, SpawnMode::Fixed)
    }
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            width: consts::BOARD_WIDTH,
            height: consts::BOARD_HEIGHT,
            starting_interval: consts::STARTING_INTERVAL,
            speed_multiplier: consts::SPEED_MULTIPLIER,
            min_interval: consts::MIN_INTERVAL,
            food_cell: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// No game has been started, or the last one was quit
    Idle,
    Running,
    /// A running game has been suspended; nothing moves until it is resumed
    Paused,
    /// The worm ran into itself
    GameOver,
    /// The worm has filled the board and there is nowhere left to put food.
    /// This is a win.
    BoardFull,
}

impl Phase {
    pub(crate) fn is_finished(self) -> bool {
        matches!(self, Phase::GameOver | Phase::BoardFull)
    }
}

/// What happened during a call to [`GameEngine::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TickOutcome {
    /// The engine was not running, so nothing happened
    Ignored,
    Moved,
    /// The worm moved onto the food, grew, and new food was placed
    Ate,
    GameOver,
    BoardFull,
}

/// A read-only copy of everything the presentation layer needs to draw a
/// frame
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) bounds: Bounds,
    /// Head first
    pub(crate) segments: Vec<Segment>,
    pub(crate) food: Option<Cell>,
    pub(crate) score: u32,
    pub(crate) highscore: u32,
    pub(crate) phase: Phase,
    pub(crate) elapsed: Duration,
    pub(crate) ticks: u64,
}

#[derive(Debug)]
pub(crate) struct GameEngine<R = StdRng> {
    rng: R,
    config: EngineConfig,
    board: Board,
    worm: Worm,
    arbiter: DirectionArbiter,
    spawner: FoodSpawner,
    scheduler: TickScheduler,
    phase: Phase,
    score: u32,
    highscore: u32,
    /// Sum of the intervals of all ticks in the current game
    elapsed: Duration,
    ticks: u64,
    highscores: Box<dyn HighScoreStore + Send>,
}

impl GameEngine<StdRng> {
    pub(crate) fn new(config: EngineConfig, highscores: Box<dyn HighScoreStore + Send>) -> Self {
        GameEngine::new_with_rng(config, highscores, StdRng::from_os_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub(crate) fn new_with_rng(
        config: EngineConfig,
        highscores: Box<dyn HighScoreStore + Send>,
        rng: R,
    ) -> GameEngine<R> {
        GameEngine {
            rng,
            config,
            board: Board::new(config.bounds()),
            worm: Worm::new(config.spawn_cell()),
            arbiter: DirectionArbiter::new(),
            spawner: FoodSpawner::new(config.spawn_mode()),
            scheduler: TickScheduler::new(
                config.starting_interval,
                config.speed_multiplier,
                config.min_interval,
            ),
            phase: Phase::Idle,
            score: 0,
            highscore: 0,
            elapsed: Duration::ZERO,
            ticks: 0,
            highscores,
        }
    }

    /// Begin a new game.  Does nothing if a game is already running or
    /// paused.
    pub(crate) fn start(&mut self) {
        if matches!(self.phase, Phase::Running | Phase::Paused) {
            return;
        }
        self.reset_state();
        let stored = self.highscores.load_highscore(consts::GAME_ID);
        self.highscore = self.highscore.max(stored);
        self.scheduler.start();
        self.phase = Phase::Running;
        log::info!(
            "Starting game on {}x{} board (highscore: {})",
            self.config.width,
            self.config.height,
            self.highscore
        );
        if self.spawn_food().is_err() {
            self.finish(Phase::BoardFull);
        }
    }

    /// Advance the game by one step
    pub(crate) fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }
        let bounds = self.board.bounds();
        let direction = self.arbiter.current();
        self.worm.advance(direction, bounds);
        self.arbiter.on_tick_advanced();
        self.elapsed += self.scheduler.interval();
        self.ticks += 1;
        log::debug!(
            "Tick {}: moved {direction}, head at {} (elapsed: {:?})",
            self.ticks,
            self.worm.head(),
            self.elapsed
        );
        let mut outcome = TickOutcome::Moved;
        let mut board_full = false;
        if self.board.food() == Some(self.worm.head()) {
            self.score += 1;
            self.board.clear_food();
            self.worm.grow(bounds);
            log::debug!("Food eaten; score {}, length {}", self.score, self.worm.len());
            outcome = TickOutcome::Ate;
            board_full = self.spawn_food().is_err();
        }
        if self.worm.has_self_collision() {
            self.finish(Phase::GameOver);
            TickOutcome::GameOver
        } else if board_full {
            self.finish(Phase::BoardFull);
            TickOutcome::BoardFull
        } else {
            self.scheduler.advance_interval();
            outcome
        }
    }

    /// Ask for the worm to turn.  Returns whether the request was accepted.
    pub(crate) fn request_direction(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let accepted = self.arbiter.request(direction);
        if !accepted {
            log::debug!(
                "Invalid movement: {} -> {direction}",
                self.arbiter.current()
            );
        }
        accepted
    }

    fn spawn_food(&mut self) -> Result<Cell, BoardFull> {
        let occupied = self.worm.positions();
        self.spawner.spawn(&mut self.board, &occupied, &mut self.rng)
    }
}

impl<R> GameEngine<R> {
    /// Stop the current game, if any, and return to the idle state
    pub(crate) fn quit(&mut self) {
        self.scheduler.cancel();
        self.reset_state();
        self.phase = Phase::Idle;
        log::info!("Game quit");
    }

    /// Suspend a running game without touching any of its state.  Returns
    /// whether the game was running.
    pub(crate) fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.scheduler.cancel();
        self.phase = Phase::Paused;
        log::info!("Game paused after {} ticks", self.ticks);
        true
    }

    /// Continue a paused game where it left off, at the speed it had reached.
    /// Returns whether the game was paused.
    ///
    /// Ticking restarts under a new generation, so a timer must be started
    /// afresh to drive the resumed game.
    pub(crate) fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.scheduler.resume();
        self.phase = Phase::Running;
        log::info!("Game resumed");
        true
    }

    fn reset_state(&mut self) {
        self.worm.reset(self.config.spawn_cell());
        self.board.clear_food();
        self.arbiter.reset();
        self.score = 0;
        self.elapsed = Duration::ZERO;
        self.ticks = 0;
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.scheduler.cancel();
        log::info!(
            "Game ended ({phase:?}) with score {} after {} ticks",
            self.score,
            self.ticks
        );
        if self.score > self.highscore {
            log::info!("New highscore: {} (was {})", self.score, self.highscore);
            self.highscore = self.score;
            self.highscores
                .save_highscore(consts::GAME_ID, self.highscore);
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub(crate) fn highscore(&self) -> u32 {
        self.highscore
    }

    pub(crate) fn interval(&self) -> Duration {
        self.scheduler.interval()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    /// Should a timer started for game `generation` fire a tick now?
    pub(crate) fn is_ticking(&self, generation: u64) -> bool {
        self.scheduler.is_active() && self.scheduler.generation() == generation
    }

    #[cfg(test)]
    pub(crate) fn worm(&self) -> &Worm {
        &self.worm
    }

    #[cfg(test)]
    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            bounds: self.board.bounds(),
            segments: self.worm.segments().to_vec(),
            food: self.board.food(),
            score: self.score,
            highscore: self.highscore,
            phase: self.phase,
            elapsed: self.elapsed,
            ticks: self.ticks,
        }
    }
}
