//! Collision detection and response between the ball and platforms
//!
//! Landings only: the ball is tested against each platform's top band, padded
//! by its radius, and only while falling. Response depends on the platform kind.

use super::state::{GameEvent, Platform, PlatformKind, Player, PopCause, SessionState};
use crate::consts::*;

/// Result of a collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Platforms that applied an impulse this pass
    pub bounces: u32,
    /// The pass popped the player
    pub popped: bool,
}

/// Ball overlaps the platform's top band
///
/// Horizontally the platform is padded by the ball radius; vertically the
/// ball's bottom edge must be inside the platform's height.
#[inline]
pub fn overlaps(player: &Player, platform: &Platform) -> bool {
    let bottom = player.pos.y + player.radius;
    player.pos.x > platform.pos.x - player.radius
        && player.pos.x < platform.right() + player.radius
        && bottom > platform.pos.y
        && bottom < platform.pos.y + platform.height
}

/// Resolve collisions for one tick.
///
/// Skipped entirely while the player is popped or ascending. Platforms are
/// scanned in pool order; a spiked platform pops the player and ends the scan,
/// every other hit applies its impulse and the scan continues, so the last
/// solid platform in pool order decides the final velocity.
pub fn resolve_collisions(state: &mut SessionState) -> CollisionResult {
    let mut result = CollisionResult::default();
    let player = &mut state.player;

    if player.is_popped || player.vel.y < 0.0 {
        return result;
    }

    for platform in &mut state.platforms {
        if !overlaps(player, platform) {
            continue;
        }

        match platform.kind {
            PlatformKind::Spiked => {
                player.pop();
                state.events.push(GameEvent::Popped(PopCause::Spiked));
                result.popped = true;
                return result;
            }
            PlatformKind::Ghost { active: true, .. } => continue,
            PlatformKind::Ghost { active: false, .. } => {
                platform.activate_ghost();
                player.vel.y = JUMP_FORCE;
                state.events.push(GameEvent::Jump);
            }
            PlatformKind::Spring => {
                player.vel.y = SPRING_BOOST;
                state.events.push(GameEvent::Jump);
                state.events.push(GameEvent::Spring);
            }
            PlatformKind::Normal | PlatformKind::Moving { .. } => {
                player.vel.y = JUMP_FORCE;
                state.events.push(GameEvent::Jump);
            }
        }
        result.bounces += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Session with the pool replaced by the given platforms and the ball
    /// falling onto y = 100
    fn session_with(platforms: Vec<Platform>) -> SessionState {
        let mut state = SessionState::new(1);
        state.platforms = platforms;
        state.player.pos = Vec2::new(100.0, 100.0 - PLAYER_RADIUS + 5.0);
        state.player.vel = Vec2::new(0.0, 4.0);
        state
    }

    fn platform(id: u32, kind: PlatformKind) -> Platform {
        Platform::new(id, 50.0, 100.0, 100.0, kind)
    }

    #[test]
    fn test_overlap_band() {
        let p = platform(1, PlatformKind::Normal);
        let mut player = Player {
            pos: Vec2::new(100.0, 90.0),
            ..Default::default()
        };
        assert!(overlaps(&player, &p));

        // Bottom edge above the platform top
        player.pos.y = 79.0;
        assert!(!overlaps(&player, &p));

        // Bottom edge past the platform bottom
        player.pos.y = 101.0;
        assert!(!overlaps(&player, &p));

        // Radius padding on the sides
        player.pos = Vec2::new(50.0 - PLAYER_RADIUS + 1.0, 90.0);
        assert!(overlaps(&player, &p));
        player.pos.x = 50.0 - PLAYER_RADIUS;
        assert!(!overlaps(&player, &p));
    }

    #[test]
    fn test_normal_bounce() {
        let mut state = session_with(vec![platform(1, PlatformKind::Normal)]);
        let result = resolve_collisions(&mut state);
        assert_eq!(result.bounces, 1);
        assert_eq!(state.player.vel.y, JUMP_FORCE);
        assert_eq!(state.events, vec![GameEvent::Jump]);
    }

    #[test]
    fn test_spring_sets_boost_exactly() {
        let mut state = session_with(vec![platform(1, PlatformKind::Spring)]);
        resolve_collisions(&mut state);
        assert_eq!(state.player.vel.y, SPRING_BOOST);
        assert_eq!(state.events, vec![GameEvent::Jump, GameEvent::Spring]);
    }

    #[test]
    fn test_spiked_pops_and_stops_scan() {
        let mut state = session_with(vec![
            platform(1, PlatformKind::Spiked),
            platform(2, PlatformKind::Spring),
        ]);
        let result = resolve_collisions(&mut state);
        assert!(result.popped);
        assert_eq!(result.bounces, 0);
        assert!(state.player.is_popped);
        assert_eq!(state.player.vel.y, 4.0);
        assert_eq!(state.events, vec![GameEvent::Popped(PopCause::Spiked)]);
    }

    #[test]
    fn test_spiked_after_bounce_still_pops() {
        let mut state = session_with(vec![
            platform(1, PlatformKind::Normal),
            platform(2, PlatformKind::Spiked),
        ]);
        let result = resolve_collisions(&mut state);
        assert!(result.popped);
        assert!(state.player.is_popped);
    }

    #[test]
    fn test_last_platform_in_pool_order_wins() {
        let mut state = session_with(vec![
            platform(1, PlatformKind::Spring),
            platform(2, PlatformKind::Normal),
        ]);
        let result = resolve_collisions(&mut state);
        assert_eq!(result.bounces, 2);
        assert_eq!(state.player.vel.y, JUMP_FORCE);

        let mut state = session_with(vec![
            platform(1, PlatformKind::Normal),
            platform(2, PlatformKind::Spring),
        ]);
        resolve_collisions(&mut state);
        assert_eq!(state.player.vel.y, SPRING_BOOST);
    }

    #[test]
    fn test_dormant_ghost_bounces_and_activates() {
        let mut state = session_with(vec![platform(1, PlatformKind::dormant_ghost())]);
        resolve_collisions(&mut state);
        assert_eq!(state.player.vel.y, JUMP_FORCE);
        assert_eq!(
            state.platforms[0].kind,
            PlatformKind::Ghost {
                active: true,
                timer: GHOST_DURATION_TICKS
            }
        );
    }

    #[test]
    fn test_active_ghost_is_skipped() {
        let mut ghost = platform(1, PlatformKind::dormant_ghost());
        ghost.activate_ghost();
        let mut state = session_with(vec![ghost]);
        let result = resolve_collisions(&mut state);
        assert_eq!(result, CollisionResult::default());
        assert_eq!(state.player.vel.y, 4.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_ascending_player_never_collides() {
        let mut state = SessionState::new(1);
        state.platforms = vec![Platform::new(1, 50.0, 105.0, 100.0, PlatformKind::Spiked)];
        state.camera_offset = 0.0;
        state.player.pos = Vec2::new(100.0, 100.0);
        state.player.vel = Vec2::new(0.0, -16.0);
        // Geometrically overlapping, but ascending
        assert!(overlaps(&state.player, &state.platforms[0]));

        let result = resolve_collisions(&mut state);
        assert_eq!(result, CollisionResult::default());
        assert!(!state.player.is_popped);
        assert_eq!(state.player.vel.y, -16.0);
    }

    #[test]
    fn test_popped_player_never_collides() {
        let mut state = session_with(vec![platform(1, PlatformKind::Spring)]);
        state.player.pop();
        assert_eq!(resolve_collisions(&mut state), CollisionResult::default());
        assert_eq!(state.player.vel.y, 4.0);
    }
}
