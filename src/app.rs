//! Frame driver
//!
//! Owns the [`Game`] and its collaborators. Everything that completes outside a
//! tick (store reads, leaderboard fetches, user requests) lands in the inbox and
//! is applied at the start of the next frame, never mid-tick.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::audio::AudioSink;
use crate::game::{Command, Game, GameMode, Init, Message, ServiceError};
use crate::identity::{IdentityProvider, resolve_identity};
use crate::persistence::{HighScoreStore, LeaderboardService};
use crate::sim::TickInput;

pub struct App<H, L, A> {
    game: Game,
    high_scores: H,
    leaderboard: L,
    audio: A,
    inbox: Receiver<Message>,
    outbox: Sender<Message>,
    seed: u64,
    frames: u64,
}

impl<H, L, A> App<H, L, A>
where
    H: HighScoreStore,
    L: LeaderboardService,
    A: AudioSink,
{
    pub fn new(seed: u64, high_scores: H, leaderboard: L, audio: A) -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            game: Game::new(seed),
            high_scores,
            leaderboard,
            audio,
            inbox,
            outbox,
            seed,
            frames: 0,
        }
    }

    /// Resolve the player and read the local best. The result is applied on the next frame.
    pub fn boot(&mut self, identity: &dyn IdentityProvider) {
        let user = resolve_identity(identity, self.seed);
        let result = self
            .high_scores
            .high_score()
            .map(|high_score| Init {
                identity: user,
                high_score,
            })
            .map_err(ServiceError::from);
        self.request(Message::Initialized(result));
    }

    /// Queue a message for the next frame
    pub fn request(&self, message: Message) {
        // The receiver lives as long as `self`
        let _ = self.outbox.send(message);
    }

    /// Handle for posting messages from elsewhere (input handlers, callbacks)
    pub fn sender(&self) -> Sender<Message> {
        self.outbox.clone()
    }

    /// Run one frame: apply queued messages, then tick
    pub fn frame(&mut self, input: &TickInput) -> &GameMode {
        self.frames += 1;

        // Snapshot first: results queued while handling wait for the next frame
        let pending: Vec<Message> = self.inbox.try_iter().collect();
        for message in pending {
            let commands = self.game.handle(message);
            self.execute(commands);
        }

        let commands = self.game.update(input);
        self.execute(commands);

        self.game.mode()
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::PlaySound(effect) => self.audio.play(effect),
                Command::StartMusic => self.audio.start_music(),
                Command::StoreHighScore(score) => {
                    if let Err(e) = self.high_scores.set_high_score(score) {
                        log::warn!("Failed to store high score {}: {}", score, e);
                    }
                }
                Command::SubmitScore { user, score } => {
                    match self.leaderboard.submit_score(&user, score) {
                        Ok(outcome) => {
                            log::debug!("Submitted {} for {}: {:?}", score, user.id, outcome)
                        }
                        Err(e) => log::warn!("Failed to submit score {}: {}", score, e),
                    }
                }
                Command::FetchLeaderboard { limit } => {
                    let result = self
                        .leaderboard
                        .fetch_top_scores(limit)
                        .map_err(ServiceError::from);
                    self.request(Message::LeaderboardLoaded(result));
                }
            }
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn high_scores(&self) -> &H {
        &self.high_scores
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut L {
        &mut self.leaderboard
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
