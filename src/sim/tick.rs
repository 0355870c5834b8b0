//! Per-frame simulation tick
//!
//! One call advances the session by one rendered frame:
//! input -> integration -> collisions -> pool -> camera -> score.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::pool::maintain_pool;
use super::state::{GameEvent, Platform, Player, PopCause, SessionState};
use crate::consts::*;
use crate::wrap_x;

/// Horizontal intent for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    #[default]
    None,
    Left,
    Right,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub steer: Steer,
    /// Demo mode - the autopilot picks the steer
    pub autopilot: bool,
}

/// What the state machine needs to know after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The pop animation just ran out
    PopFinished,
}

/// Advance a playing session by one tick
pub fn tick(state: &mut SessionState, input: &TickInput) -> TickOutcome {
    state.time_ticks += 1;

    let steer = if input.autopilot {
        autopilot_steer(state)
    } else {
        input.steer
    };
    apply_steer(&mut state.player, steer);

    let outcome = update_player(state);
    resolve_collisions(state);
    maintain_pool(state);
    update_camera(state);
    update_score(state);

    outcome
}

/// Set horizontal velocity from the steer intent
pub fn apply_steer(player: &mut Player, steer: Steer) {
    player.vel.x = match steer {
        Steer::Left => -PLAYER_SPEED,
        Steer::Right => PLAYER_SPEED,
        Steer::None => 0.0,
    };
}

/// Integrate the player, or run the pop animation if popped
pub fn update_player(state: &mut SessionState) -> TickOutcome {
    if state.player.is_popped {
        return advance_pop_animation(&mut state.player);
    }

    integrate(&mut state.player);
    check_fall_death(state);
    TickOutcome::Running
}

/// Gravity, then position, then horizontal wrap
pub fn integrate(player: &mut Player) {
    player.vel.y += GRAVITY;
    player.pos += player.vel;
    player.pos.x = wrap_x(player.pos.x);
}

/// Pop the player once it drops below the bottom of the camera.
///
/// The first time this fires every ghost platform is revealed; afterwards the
/// player is already popped and nothing happens. Returns true if it fired.
pub fn check_fall_death(state: &mut SessionState) -> bool {
    let player = &mut state.player;
    if player.is_popped || player.pos.y - state.camera_offset <= GAME_HEIGHT + player.radius {
        return false;
    }

    player.pop();
    state.events.push(GameEvent::Popped(PopCause::Fell));
    for platform in &mut state.platforms {
        platform.activate_ghost();
    }
    log::debug!("Player fell at y={:.1}", player.pos.y);
    true
}

/// Step the pop countdown; reports `PopFinished` on the tick it runs out
pub fn advance_pop_animation(player: &mut Player) -> TickOutcome {
    if !player.is_popped || player.pop_timer >= player.pop_duration {
        return TickOutcome::Running;
    }
    player.pop_timer += 1;
    if player.pop_finished() {
        TickOutcome::PopFinished
    } else {
        TickOutcome::Running
    }
}

/// Ratchet the camera upward when the player climbs above the threshold
pub fn update_camera(state: &mut SessionState) {
    if state.player.pos.y < state.camera_offset + SCROLL_THRESHOLD {
        state.camera_offset = state.player.pos.y - SCROLL_THRESHOLD;
    }
}

/// Score is the best height climbed above the start position
pub fn update_score(state: &mut SessionState) {
    let climbed = -(state.player.pos.y - PLAYER_START_Y).floor();
    if climbed > state.score as f32 {
        state.score = climbed as u32;
    }
}

/// Demo steering: line up under the next safe platform.
///
/// While falling, aim at the nearest safe platform below the ball; while
/// rising, aim at the nearest safe platform above it. Spiked platforms are
/// never targets.
pub fn autopilot_steer(state: &SessionState) -> Steer {
    let player = &state.player;
    if player.is_popped {
        return Steer::None;
    }

    let bottom = player.pos.y + player.radius;
    let falling = player.vel.y >= 0.0;
    let candidate = |p: &&Platform| {
        let ahead = if falling {
            p.pos.y >= bottom
        } else {
            p.pos.y < bottom
        };
        ahead && !p.kind.is_hazard() && p.is_solid()
    };

    let target = state
        .platforms
        .iter()
        .filter(candidate)
        .min_by(|a, b| {
            (a.pos.y - bottom)
                .abs()
                .total_cmp(&(b.pos.y - bottom).abs())
        });

    let Some(target) = target else {
        return Steer::None;
    };

    let center = target.pos.x + target.width / 2.0;
    let dx = center - player.pos.x;
    // Dead zone so the ball settles instead of jittering
    let dead_zone = (target.width / 2.0 - player.radius).max(PLAYER_SPEED);
    if dx > dead_zone {
        Steer::Right
    } else if dx < -dead_zone {
        Steer::Left
    } else {
        Steer::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;
    use glam::Vec2;
    use proptest::prelude::*;

    #[test]
    fn test_integration_applies_gravity_then_moves() {
        let mut player = Player {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(PLAYER_SPEED, -10.0),
            ..Default::default()
        };
        integrate(&mut player);
        assert_eq!(player.vel.y, -10.0 + GRAVITY);
        assert_eq!(player.pos.x, 106.0);
        assert!((player.pos.y - 90.6).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut player = Player {
            pos: Vec2::new(GAME_WIDTH - 2.0, 100.0),
            vel: Vec2::new(PLAYER_SPEED, 0.0),
            ..Default::default()
        };
        integrate(&mut player);
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 3.0;
        player.vel.x = -PLAYER_SPEED;
        integrate(&mut player);
        assert_eq!(player.pos.x, GAME_WIDTH);
    }

    #[test]
    fn test_steer_sets_horizontal_velocity() {
        let mut player = Player::default();
        apply_steer(&mut player, Steer::Left);
        assert_eq!(player.vel.x, -PLAYER_SPEED);
        apply_steer(&mut player, Steer::Right);
        assert_eq!(player.vel.x, PLAYER_SPEED);
        apply_steer(&mut player, Steer::None);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_fall_death_fires_once() {
        let mut state = SessionState::new(3);
        state
            .platforms
            .push(Platform::new(999, 0.0, 0.0, 100.0, PlatformKind::dormant_ghost()));
        state.player.pos.y = state.camera_offset + GAME_HEIGHT + PLAYER_RADIUS + 1.0;

        assert!(check_fall_death(&mut state));
        assert!(state.player.is_popped);
        assert_eq!(state.events, vec![GameEvent::Popped(PopCause::Fell)]);
        assert!(state.platforms.iter().all(|p| p.is_visible()));

        // Let a ghost revert, then check again: no replay
        let ghost = state.platforms.iter_mut().find(|p| p.id == 999).unwrap();
        ghost.kind = PlatformKind::dormant_ghost();
        assert!(!check_fall_death(&mut state));
        assert_eq!(state.events.len(), 1);
        let ghost = state.platforms.iter().find(|p| p.id == 999).unwrap();
        assert_eq!(ghost.kind, PlatformKind::dormant_ghost());
    }

    #[test]
    fn test_no_fall_death_at_boundary() {
        let mut state = SessionState::new(3);
        state.camera_offset = -300.0;
        state.player.pos.y = -300.0 + GAME_HEIGHT + PLAYER_RADIUS;
        assert!(!check_fall_death(&mut state));
        assert!(!state.player.is_popped);
    }

    #[test]
    fn test_pop_animation_finishes_after_duration() {
        let mut state = SessionState::new(4);
        state.player.pop();
        let pos = state.player.pos;
        for _ in 0..POP_DURATION_TICKS - 1 {
            assert_eq!(update_player(&mut state), TickOutcome::Running);
        }
        assert_eq!(update_player(&mut state), TickOutcome::PopFinished);
        // Popped balls don't move
        assert_eq!(state.player.pos, pos);
        // Reported once only
        assert_eq!(update_player(&mut state), TickOutcome::Running);
    }

    #[test]
    fn test_camera_ratchets_up_only() {
        let mut state = SessionState::new(5);
        state.player.pos.y = 100.0;
        update_camera(&mut state);
        assert_eq!(state.camera_offset, 100.0 - SCROLL_THRESHOLD);

        state.player.pos.y = 900.0;
        update_camera(&mut state);
        assert_eq!(state.camera_offset, 100.0 - SCROLL_THRESHOLD);
    }

    #[test]
    fn test_score_tracks_best_height() {
        let mut state = SessionState::new(6);
        state.player.pos.y = PLAYER_START_Y - 250.0;
        update_score(&mut state);
        assert_eq!(state.score, 250);

        // -floor(-100.5) rounds the climb up
        state.player.pos.y = PLAYER_START_Y - 100.5;
        update_score(&mut state);
        assert_eq!(state.score, 250);

        state.player.pos.y = PLAYER_START_Y + 40.0;
        update_score(&mut state);
        assert_eq!(state.score, 250);

        state.player.pos.y = PLAYER_START_Y - 300.5;
        update_score(&mut state);
        assert_eq!(state.score, 301);
    }

    #[test]
    fn test_idle_ball_keeps_bouncing_on_start_platform() {
        let mut state = SessionState::new(7);
        state.platforms.retain(|p| p.id == 1);
        let mut bounces = 0;
        for _ in 0..600 {
            assert_eq!(update_player(&mut state), TickOutcome::Running);
            bounces += resolve_collisions(&mut state).bounces;
            update_camera(&mut state);
        }
        // One bounce roughly every 50 ticks
        assert!(bounces >= 10, "only {bounces} bounces");
        assert!(!state.player.is_popped);
        assert_eq!(state.camera_offset, 0.0);
    }

    #[test]
    fn test_touched_ghost_is_skipped_for_its_duration() {
        let ghost_y = 400.0;
        let mut state = SessionState::new(12);
        state.platforms = vec![Platform::new(
            500,
            150.0,
            ghost_y,
            100.0,
            PlatformKind::dormant_ghost(),
        )];

        // Drop the ball so that after integration its bottom sits 5px into the ghost
        let land = |state: &mut SessionState| {
            state.player.pos = Vec2::new(200.0, ghost_y - PLAYER_RADIUS + 5.0 - GRAVITY);
            state.player.vel = Vec2::ZERO;
            tick(state, &TickInput::default());
            state.drain_events()
        };

        assert_eq!(land(&mut state), vec![GameEvent::Jump]);
        assert_eq!(state.player.vel.y, JUMP_FORCE);

        // The same tick's pool update already counted one tick off
        for t in 1..GHOST_DURATION_TICKS {
            assert!(land(&mut state).is_empty(), "bounced {t} ticks after touch");
            assert!(state.player.vel.y > 0.0);
        }

        assert_eq!(land(&mut state), vec![GameEvent::Jump]);
        assert_eq!(state.player.vel.y, JUMP_FORCE);
        let ghost = state.platforms.iter().find(|p| p.id == 500).unwrap();
        assert!(matches!(ghost.kind, PlatformKind::Ghost { active: true, .. }));
    }

    #[test]
    fn test_determinism() {
        let mut a = SessionState::new(99999);
        let mut b = SessionState::new(99999);
        let inputs = [
            TickInput {
                steer: Steer::Left,
                ..Default::default()
            },
            TickInput {
                autopilot: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for i in 0..900 {
            let input = &inputs[(i / 30) % inputs.len()];
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.platforms.len(), b.platforms.len());
    }

    #[test]
    fn test_autopilot_steers_toward_platform_below() {
        let mut state = SessionState::new(1);
        state.platforms = vec![Platform::new(1, 300.0, 300.0, 80.0, PlatformKind::Normal)];
        state.player.pos = Vec2::new(100.0, 200.0);
        state.player.vel = Vec2::new(0.0, 2.0);
        assert_eq!(autopilot_steer(&state), Steer::Right);

        state.platforms[0].kind = PlatformKind::Spiked;
        assert_eq!(autopilot_steer(&state), Steer::None);
    }

    proptest! {
        #[test]
        fn prop_camera_and_score_monotonic(
            seed in any::<u64>(),
            steers in prop::collection::vec(0u8..4, 50..400),
        ) {
            let mut state = SessionState::new(seed);
            let mut camera = state.camera_offset;
            let mut score = state.score;
            for s in steers {
                let input = match s {
                    0 => TickInput { steer: Steer::Left, ..Default::default() },
                    1 => TickInput { steer: Steer::Right, ..Default::default() },
                    2 => TickInput { autopilot: true, ..Default::default() },
                    _ => TickInput::default(),
                };
                if tick(&mut state, &input) == TickOutcome::PopFinished {
                    break;
                }
                prop_assert!(state.camera_offset <= camera);
                prop_assert!(state.score >= score);
                prop_assert!(state.platforms.len() >= MAX_PLATFORMS);
                camera = state.camera_offset;
                score = state.score;
            }
        }
    }
}
