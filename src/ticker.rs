//! Background timer that drives a shared [`GameEngine`]
use crate::engine::{GameEngine, TickOutcome};
use parking_lot::{Condvar, Mutex};
use rand::Rng;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// An engine that both the ticker thread and the input loop can reach.  All
/// engine state is touched under this one lock.
pub(crate) type SharedEngine<R> = Arc<Mutex<GameEngine<R>>>;

/// Calls [`GameEngine::tick()`] on its own thread, waiting the engine's
/// current tick interval between calls.
///
/// A ticker belongs to the game that was running when it was spawned.  It
/// exits by itself once that game ends or is quit, and it never fires for a
/// game started later.
#[derive(Debug)]
pub(crate) struct Ticker {
    stop: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub(crate) fn spawn<R>(engine: SharedEngine<R>) -> std::io::Result<Ticker>
    where
        R: Rng + Send + 'static,
    {
        let stop = Arc::new(StopSignal::default());
        let generation = engine.lock().generation();
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name(format!("ticker-{generation}"))
            .spawn(move || run(&engine, &thread_stop, generation))?;
        Ok(Ticker {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop the ticker thread and wait for it to exit.  Calling this more than
    /// once is harmless.
    ///
    /// This must not be called while holding the engine's lock.
    pub(crate) fn stop(&mut self) {
        self.stop.raise();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Ticker thread panicked");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    cond: Condvar,
}

impl StopSignal {
    fn raise(&self) {
        *self.stopped.lock() = true;
        self.cond.notify_all();
    }

    /// Sleep until `deadline` or until the signal is raised, whichever comes
    /// first.  Returns `true` if the signal was raised.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.cond.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }
}

fn run<R: Rng>(engine: &Mutex<GameEngine<R>>, stop: &StopSignal, generation: u64) {
    log::debug!("Ticker for game {generation} started");
    loop {
        let interval = {
            let eng = engine.lock();
            if !eng.is_ticking(generation) {
                break;
            }
            eng.interval()
        };
        if stop.wait_until(Instant::now() + interval) {
            break;
        }
        let mut eng = engine.lock();
        // The game may have been quit or restarted while we slept
        if !eng.is_ticking(generation) {
            break;
        }
        if matches!(eng.tick(), TickOutcome::GameOver | TickOutcome::BoardFull) {
            break;
        }
    }
    log::debug!("Ticker for game {generation} stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cell, Direction, EngineConfig, Phase};
    use crate::highscores::MemoryHighScores;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::time::Duration;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn shared_engine(config: EngineConfig) -> SharedEngine<ChaCha12Rng> {
        Arc::new(Mutex::new(GameEngine::new_with_rng(
            config,
            Box::new(MemoryHighScores::default()),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        )))
    }

    fn fast() -> EngineConfig {
        EngineConfig {
            width: 50,
            height: 50,
            starting_interval: Duration::from_millis(2),
            speed_multiplier: 0.5,
            min_interval: Duration::from_millis(1),
            food_cell: Some(Cell::new(40, 40)),
        }
    }

    fn wait_for<F: FnMut() -> bool>(mut cond: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn ticks_until_quit() {
        let engine = shared_engine(fast());
        engine.lock().start();
        let mut ticker = Ticker::spawn(Arc::clone(&engine)).unwrap();
        assert!(wait_for(|| engine.lock().snapshot().ticks >= 5));
        engine.lock().quit();
        let ticks = engine.lock().snapshot().ticks;
        assert_eq!(ticks, 0);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(engine.lock().snapshot().ticks, 0);
        assert_eq!(engine.lock().worm().head(), Cell::new(0, 1));
        assert!(wait_for(|| ticker.is_finished()));
        ticker.stop();
        ticker.stop();
    }

    #[test]
    fn no_tick_after_quit_returns() {
        let engine = shared_engine(fast());
        engine.lock().start();
        let mut ticker = Ticker::spawn(Arc::clone(&engine)).unwrap();
        assert!(wait_for(|| engine.lock().snapshot().ticks >= 3));
        let head = {
            let mut eng = engine.lock();
            eng.quit();
            eng.worm().head()
        };
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(engine.lock().phase(), Phase::Idle);
        assert_eq!(engine.lock().worm().head(), head);
        ticker.stop();
    }

    #[test]
    fn exits_on_game_over() {
        let engine = shared_engine(EngineConfig {
            width: 3,
            height: 1,
            food_cell: Some(Cell::new(0, 2)),
            ..fast()
        });
        engine.lock().start();
        let mut ticker = Ticker::spawn(Arc::clone(&engine)).unwrap();
        assert!(wait_for(|| ticker.is_finished()));
        assert_eq!(engine.lock().phase(), Phase::BoardFull);
        assert_eq!(engine.lock().snapshot().ticks, 2);
        ticker.stop();
    }

    #[test]
    fn stale_ticker_does_not_drive_new_game() {
        let engine = shared_engine(EngineConfig {
            starting_interval: Duration::from_secs(60),
            min_interval: Duration::from_secs(1),
            ..fast()
        });
        engine.lock().start();
        let mut old = Ticker::spawn(Arc::clone(&engine)).unwrap();
        {
            let mut eng = engine.lock();
            eng.quit();
            eng.start();
            assert!(eng.request_direction(Direction::Down));
        }
        old.stop();
        assert!(old.is_finished());
        assert_eq!(engine.lock().snapshot().ticks, 0);
        assert_eq!(engine.lock().phase(), Phase::Running);
    }

    #[test]
    fn paused_game_does_not_tick() {
        let engine = shared_engine(fast());
        engine.lock().start();
        let mut ticker = Ticker::spawn(Arc::clone(&engine)).unwrap();
        assert!(wait_for(|| engine.lock().snapshot().ticks >= 3));
        let paused = {
            let mut eng = engine.lock();
            assert!(eng.pause());
            eng.snapshot()
        };
        assert!(wait_for(|| ticker.is_finished()));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(engine.lock().snapshot(), paused);
        ticker.stop();

        assert!(engine.lock().resume());
        let mut ticker = Ticker::spawn(Arc::clone(&engine)).unwrap();
        assert!(wait_for(|| engine.lock().snapshot().ticks > paused.ticks));
        engine.lock().quit();
        ticker.stop();
    }

    #[test]
    fn ticker_from_before_pause_does_not_drive_resumed_game() {
        let engine = shared_engine(EngineConfig {
            starting_interval: Duration::from_millis(200),
            ..fast()
        });
        engine.lock().start();
        let mut old = Ticker::spawn(Arc::clone(&engine)).unwrap();
        {
            let mut eng = engine.lock();
            assert!(eng.pause());
            assert!(eng.resume());
        }
        // The old ticker wakes up, sees it has been superseded, and exits
        // without ticking
        assert!(wait_for(|| old.is_finished()));
        assert_eq!(engine.lock().snapshot().ticks, 0);
        assert_eq!(engine.lock().phase(), Phase::Running);
        old.stop();
    }

    #[test]
    fn stop_interrupts_long_wait() {
        let engine = shared_engine(EngineConfig {
            starting_interval: Duration::from_secs(60),
            min_interval: Duration::from_secs(1),
            ..fast()
        });
        engine.lock().start();
        let mut ticker = Ticker::spawn(Arc::clone(&engine)).unwrap();
        let before = Instant::now();
        ticker.stop();
        assert!(before.elapsed() < Duration::from_secs(30));
        assert!(ticker.is_finished());
        assert_eq!(engine.lock().snapshot().ticks, 0);
    }
}
