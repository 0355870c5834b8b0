//! Pop Jump entry point
//!
//! Runs a headless autopilot demo: the game plays itself, restarts after each
//! life and prints the leaderboard at the end. The best score and the
//! leaderboard are kept in JSON files beside the settings file.
//!
//! Usage: `pop-jump [settings.json] [frames]`, verbosity via `RUST_LOG`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use pop_jump::audio::{AudioManager, LogBackend};
    use pop_jump::identity::Anonymous;
    use pop_jump::persistence::{
        HighScoreStore, JsonHighScoreFile, JsonLeaderboardFile, LeaderboardService,
        MemoryLeaderboard,
    };
    use pop_jump::sim::TickInput;
    use pop_jump::{App, GameMode, Message, Settings};
    use rand::Rng;

    /// Frames the game-over screen stays up before restarting
    const RESTART_DELAY: u32 = 90;
    const DEFAULT_FRAMES: u64 = 3600;

    type DemoApp<L> = App<JsonHighScoreFile, L, AudioManager<LogBackend>>;

    pub fn main() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let settings_path = args.next().map(PathBuf::from);
        let settings = settings_path
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();
        let frames = match args.next().map(|s| s.parse::<u64>()) {
            Some(Ok(n)) => n,
            Some(Err(e)) => {
                log::warn!("Bad frame count ({}), using {}", e, DEFAULT_FRAMES);
                DEFAULT_FRAMES
            }
            None => DEFAULT_FRAMES,
        };

        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Pop Jump (headless) starting, seed {}", seed);

        let (best_path, board_path) = settings.store_paths(settings_path.as_deref());
        let high_scores = JsonHighScoreFile::new(best_path);
        let audio = AudioManager::new(LogBackend::default(), &settings);

        match JsonLeaderboardFile::open(&board_path) {
            Ok(board) => {
                let mut app = App::new(seed, high_scores, board, audio);
                app.boot(&Anonymous);
                let app = run(app, frames);

                let table = app.leaderboard().table();
                if let Some(user) = app.game().identity() {
                    match table.rank_of(&user.id) {
                        Some(rank) => println!("your rank:  #{} of {}", rank, table.len()),
                        None => println!("your rank:  unranked"),
                    }
                }
                if let Some(top) = table.top_score() {
                    println!("top score:  {}", top);
                }
            }
            Err(e) => {
                // A broken leaderboard file fails initialization like any other store
                let app = App::new(seed, high_scores, MemoryLeaderboard::new(), audio);
                app.request(Message::Initialized(Err(e.into())));
                run(app, frames);
            }
        }
    }

    fn run<L: LeaderboardService>(mut app: DemoApp<L>, frames: u64) -> DemoApp<L> {
        let previous_best = app.high_scores().high_score().ok().flatten().unwrap_or(0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut lives = 0u32;
        let mut game_over_frames = 0u32;

        for _ in 0..frames {
            let mode = app.frame(&input).clone();
            match mode {
                GameMode::GameOver => {
                    if game_over_frames == 0 {
                        lives += 1;
                        println!("life {:>3}: score {:>6}", lives, app.game().score());
                    }
                    game_over_frames += 1;
                    if game_over_frames >= RESTART_DELAY {
                        game_over_frames = 0;
                        app.request(Message::RestartRequested);
                    }
                }
                GameMode::Error { message } => {
                    eprintln!("{message}");
                    std::process::exit(1);
                }
                _ => {}
            }
        }

        println!();
        println!("frames:     {}", app.frames());
        println!("lives:      {}", lives);
        println!("high score: {} (was {})", app.game().high_score(), previous_best);
        println!("current:    {}", app.game().score());

        app.request(Message::ShowLeaderboard);
        for _ in 0..2 {
            app.frame(&input);
        }
        if let GameMode::Leaderboard {
            entries: Some(entries),
        } = app.game().mode()
        {
            println!();
            println!("leaderboard:");
            for (rank, entry) in entries.iter().enumerate() {
                println!("{:>3}. {:<20} {:>6}", rank + 1, entry.display_name, entry.score);
            }
        }

        app
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds embed the library; there is no standalone entry point
}
