use crate::command::Command;
use crate::consts;
use crate::engine::{GameEngine, Phase};
use crate::ticker::{SharedEngine, Ticker};
use crate::ui::BoardView;
use crossterm::event::{poll, read};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::sync::Arc;

/// The terminal front end: draws the engine's state, forwards key presses to
/// it, and keeps a [`Ticker`] running while a game is in play.
///
/// The app opens on an idle board and waits for the player to start a game.
/// Asking to quit in the middle of a game pauses it until the player confirms
/// or goes back to playing.
#[derive(Debug)]
pub(crate) struct App<R = StdRng> {
    engine: SharedEngine<R>,
    ticker: Option<Ticker>,
    quitting: bool,
}

impl<R: Rng + Send + 'static> App<R> {
    pub(crate) fn new(engine: GameEngine<R>) -> App<R> {
        App {
            engine: Arc::new(Mutex::new(engine)),
            ticker: None,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        // Copy the state out so that the ticker isn't held up while drawing
        let snapshot = self.engine.lock().snapshot();
        terminal.draw(|frame| {
            let view = BoardView(&snapshot);
            frame.render_widget(view, view.centered_in(frame.area()));
        })?;
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        // Wake up at least once per frame so that ticks get drawn
        if poll(consts::FRAME_PERIOD)? {
            if let Some(cmd) = read()?
                .as_key_press_event()
                .and_then(Command::from_key_event)
            {
                self.handle_command(cmd)?;
            }
        }
        Ok(())
    }

    fn handle_command(&mut self, cmd: Command) -> io::Result<()> {
        let phase = self.engine.lock().phase();
        match (phase, cmd) {
            (Phase::Running, Command::Turn(direction)) => {
                self.engine.lock().request_direction(direction);
            }
            (Phase::Running, Command::Quit) => {
                // Hold the game still while the player decides
                self.engine.lock().pause();
                self.stop_ticker();
            }
            (Phase::Paused, Command::Yes | Command::Quit) => self.quit(),
            (Phase::Paused, Command::No) => self.resume()?,
            (Phase::Idle | Phase::GameOver | Phase::BoardFull, Command::Restart) => {
                self.start()?;
            }
            (Phase::Idle | Phase::GameOver | Phase::BoardFull, Command::Quit) => self.quit(),
            _ => (),
        }
        Ok(())
    }

    /// Start a new game along with a ticker to drive it
    fn start(&mut self) -> io::Result<()> {
        self.stop_ticker();
        self.engine.lock().start();
        self.ticker = Some(Ticker::spawn(Arc::clone(&self.engine))?);
        Ok(())
    }

    /// Continue a paused game with a fresh ticker
    fn resume(&mut self) -> io::Result<()> {
        self.stop_ticker();
        if self.engine.lock().resume() {
            self.ticker = Some(Ticker::spawn(Arc::clone(&self.engine))?);
        }
        Ok(())
    }

    fn quit(&mut self) {
        self.engine.lock().quit();
        self.stop_ticker();
        self.quitting = true;
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}
