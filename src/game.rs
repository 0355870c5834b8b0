//! Game mode state machine
//!
//! ```text
//! Loading -> Playing <-> GameOver
//! Playing/GameOver -> Leaderboard -> GameOver
//! any -> Error (terminal)
//! ```
//!
//! The machine never performs I/O. External completions and user requests come
//! in as [`Message`]s; side effects go out as [`Command`]s for the driver.

use serde::Serialize;
use thiserror::Error;

use crate::audio::SoundEffect;
use crate::consts::LEADERBOARD_SIZE;
use crate::highscores::LeaderboardEntry;
use crate::identity::Identity;
use crate::persistence::StoreError;
use crate::run_seed;
use crate::sim::{Platform, Player, SessionState, TickInput, TickOutcome, tick, update_player};

pub const INIT_FAILED_MESSAGE: &str =
    "Could not connect to the score database.\nPlease try again later.";
pub const LEADERBOARD_FAILED_MESSAGE: &str = "Could not load the leaderboard.";

/// Failure reported by an external collaborator
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Unavailable(String),
}

/// Current mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameMode {
    /// Waiting for identity and stores
    Loading,
    Playing,
    GameOver,
    /// `entries` is `None` while the fetch is in flight
    Leaderboard {
        entries: Option<Vec<LeaderboardEntry>>,
    },
    /// Unrecoverable for this session
    Error { message: String },
}

/// Everything needed to leave `Loading`
#[derive(Debug, Clone)]
pub struct Init {
    pub identity: Identity,
    pub high_score: Option<u32>,
}

/// Inputs to the state machine besides the per-frame tick
#[derive(Debug)]
pub enum Message {
    Initialized(Result<Init, ServiceError>),
    RestartRequested,
    ShowLeaderboard,
    Back,
    LeaderboardLoaded(Result<Vec<LeaderboardEntry>, ServiceError>),
}

/// Side effects for the driver to carry out
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlaySound(SoundEffect),
    StartMusic,
    StoreHighScore(u32),
    SubmitScore { user: Identity, score: u32 },
    FetchLeaderboard { limit: usize },
}

/// Per-frame view for a render/UI sink
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub mode: &'a GameMode,
    pub player: Option<&'a Player>,
    pub platforms: &'a [Platform],
    pub camera_offset: f32,
    pub score: u32,
    pub high_score: u32,
    pub display_name: Option<String>,
}

pub struct Game {
    mode: GameMode,
    session: Option<SessionState>,
    identity: Option<Identity>,
    high_score: u32,
    base_seed: u64,
    /// Resets so far, used to derive each run's seed
    runs: u32,
    /// Current life's score has been stored/submitted
    run_recorded: bool,
}

impl Game {
    pub fn new(base_seed: u64) -> Self {
        Self {
            mode: GameMode::Loading,
            session: None,
            identity: None,
            high_score: 0,
            base_seed,
            runs: 0,
            run_recorded: false,
        }
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SessionState> {
        self.session.as_mut()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map(|s| s.score).unwrap_or(0)
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Apply an external completion or user request
    pub fn handle(&mut self, message: Message) -> Vec<Command> {
        let mut commands = Vec::new();

        match message {
            Message::Initialized(result) => {
                if self.mode != GameMode::Loading {
                    log::debug!("Ignoring late initialization in {:?}", self.mode);
                    return commands;
                }
                match result {
                    Ok(init) => {
                        log::info!(
                            "Initialized as {} (best {})",
                            init.identity.display_name(),
                            init.high_score.unwrap_or(0)
                        );
                        self.identity = Some(init.identity);
                        self.high_score = init.high_score.unwrap_or(0);
                        self.reset(&mut commands);
                    }
                    Err(e) => self.fail(format!("initialization failed: {e}"), INIT_FAILED_MESSAGE),
                }
            }

            Message::RestartRequested => match self.mode {
                GameMode::GameOver => self.reset(&mut commands),
                _ => log::debug!("Restart ignored in {:?}", self.mode),
            },

            Message::ShowLeaderboard => match self.mode {
                GameMode::Playing | GameMode::GameOver => {
                    self.record_run(&mut commands);
                    self.set_mode(GameMode::Leaderboard { entries: None });
                    commands.push(Command::FetchLeaderboard {
                        limit: LEADERBOARD_SIZE,
                    });
                }
                _ => log::debug!("Leaderboard request ignored in {:?}", self.mode),
            },

            Message::Back => match self.mode {
                GameMode::Leaderboard { .. } => self.set_mode(GameMode::GameOver),
                _ => log::debug!("Back ignored in {:?}", self.mode),
            },

            Message::LeaderboardLoaded(result) => {
                if self.mode != (GameMode::Leaderboard { entries: None }) {
                    log::debug!("Dropping leaderboard result, no fetch pending");
                    return commands;
                }
                match result {
                    Ok(entries) => {
                        log::info!("Leaderboard loaded ({} entries)", entries.len());
                        self.mode = GameMode::Leaderboard {
                            entries: Some(entries),
                        };
                    }
                    Err(e) => self.fail(
                        format!("leaderboard fetch failed: {e}"),
                        LEADERBOARD_FAILED_MESSAGE,
                    ),
                }
            }
        }

        commands
    }

    /// Run one frame of whatever simulation the current mode allows
    pub fn update(&mut self, input: &TickInput) -> Vec<Command> {
        let mut commands = Vec::new();

        match self.mode {
            GameMode::Playing => {
                let Some(session) = self.session.as_mut() else {
                    return commands;
                };
                let outcome = tick(session, input);
                commands.extend(
                    session
                        .drain_events()
                        .into_iter()
                        .map(|event| Command::PlaySound(SoundEffect::for_event(event))),
                );

                if outcome == TickOutcome::PopFinished {
                    self.record_run(&mut commands);
                    self.set_mode(GameMode::GameOver);
                }
            }
            GameMode::GameOver => {
                // The ball keeps falling (or finishes popping); no collisions,
                // pool, camera or score
                if let Some(session) = self.session.as_mut() {
                    update_player(session);
                    commands.extend(
                        session
                            .drain_events()
                            .into_iter()
                            .map(|event| Command::PlaySound(SoundEffect::for_event(event))),
                    );
                }
            }
            GameMode::Loading | GameMode::Leaderboard { .. } | GameMode::Error { .. } => {}
        }

        commands
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let session = self.session.as_ref();
        Snapshot {
            mode: &self.mode,
            player: session.map(|s| &s.player),
            platforms: session.map(|s| s.platforms.as_slice()).unwrap_or(&[]),
            camera_offset: session.map(|s| s.camera_offset).unwrap_or(0.0),
            score: self.score(),
            high_score: self.high_score,
            display_name: self.identity.as_ref().map(Identity::display_name),
        }
    }

    /// Fresh session with the next run's seed
    fn reset(&mut self, commands: &mut Vec<Command>) {
        let seed = run_seed(self.base_seed, self.runs);
        self.runs += 1;
        self.session = Some(SessionState::new(seed));
        self.run_recorded = false;
        self.set_mode(GameMode::Playing);
        commands.push(Command::StartMusic);
    }

    /// Store the local best and submit the score, once per life
    fn record_run(&mut self, commands: &mut Vec<Command>) {
        if self.run_recorded {
            return;
        }
        self.run_recorded = true;

        let score = self.score();
        if score > self.high_score {
            log::info!("New high score: {} (was {})", score, self.high_score);
            self.high_score = score;
            commands.push(Command::StoreHighScore(score));
        }
        if let Some(user) = &self.identity {
            commands.push(Command::SubmitScore {
                user: user.clone(),
                score,
            });
        }
    }

    fn set_mode(&mut self, mode: GameMode) {
        log::info!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    fn fail(&mut self, detail: String, message: &str) {
        log::error!("{}", detail);
        self.mode = GameMode::Error {
            message: message.to_string(),
        };
    }
}
