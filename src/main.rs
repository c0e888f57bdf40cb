mod app;
mod command;
mod config;
mod consts;
mod engine;
mod highscores;
mod ticker;
mod ui;
use crate::app::App;
use crate::config::Config;
use crate::engine::GameEngine;
use crate::highscores::{HighScoreFile, QueuedHighScores};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use simplelog::{LevelFilter, WriteLogger};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: wormgame [<options>]

Play a game of worm in the terminal

Options:
  -c <path>, --config <path>
                          Read configuration from the given file
      --log-level <level> Log messages at the given level and above to the log
                          file [default: info]
  -h, --help              Display this help message and exit
  -V, --version           Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Arguments),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-level") => args.log_level = parser.value()?.parse()?,
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    log_level: LevelFilter,
}

impl Default for Arguments {
    fn default() -> Arguments {
        Arguments {
            config: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        let config = match self.config {
            Some(path) => Config::load(&path, false),
            None => match Config::default_path() {
                Ok(path) => Config::load(&path, true),
                Err(_) => Ok(Config::default()),
            },
        }
        .context("failed to load configuration")?;
        if let Some(path) = config.log_file() {
            init_logging(&path, self.log_level)?;
        }
        log::info!("Starting wormgame {}", env!("CARGO_PKG_VERSION"));
        let store = QueuedHighScores::new(HighScoreFile::new(config.highscores_file()))
            .context("failed to start highscore writer")?;
        let engine = GameEngine::new(config.engine(), Box::new(store));
        let terminal = ratatui::init();
        let r = App::new(engine).run(terminal);
        ratatui::restore();
        r.map_err(Into::into)
    }
}

fn init_logging(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::File::create(path)?;
    WriteLogger::init(level, simplelog::Config::default(), file)
        .context("failed to initialize logger")
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(Command::Run(args)) => exit(args.run()),
        Ok(Command::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("wormgame {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("wormgame: {e}");
            ExitCode::from(2)
        }
    }
}

fn exit(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("wormgame: {e:?}");
            ExitCode::from(2)
        }
    }
}
