//! Local motion resolution
//!
//! Converts the tick's input into avatar velocity, animation, facing and the
//! attack flag. Velocity axes are resolved independently (diagonals move at
//! full speed on both axes) while the animation is a single choice that
//! favors horizontal movement.

use crate::game::constants::movement::SPEED;
use crate::game::input::InputFrame;
use crate::game::state::{Animation, Facing, LocalEntity};
use crate::util::vec2::Vec2;

/// Per-session motion resolver; remembers the attack button level between ticks
#[derive(Debug, Default)]
pub struct MotionResolver {
    attack_was_down: bool,
}

impl MotionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one tick of input to the avatar
    pub fn resolve(&mut self, local: &mut LocalEntity, input: &InputFrame) {
        let dirs = input.directions();

        local.velocity = Vec2::ZERO;

        // Left wins over right, up wins over down
        if dirs.left {
            local.velocity.x = -SPEED;
        } else if dirs.right {
            local.velocity.x = SPEED;
        }

        if dirs.up {
            local.velocity.y = -SPEED;
        } else if dirs.down {
            local.velocity.y = SPEED;
        }

        // Up/down and idle keep the previous flip
        if dirs.left {
            local.animation = Animation::Left;
            local.facing = Facing::Left;
            local.flip_x = true;
        } else if dirs.right {
            local.animation = Animation::Right;
            local.facing = Facing::Right;
            local.flip_x = false;
        } else if dirs.up {
            local.animation = Animation::Up;
            local.facing = Facing::Up;
        } else if dirs.down {
            local.animation = Animation::Down;
            local.facing = Facing::Down;
        } else {
            local.animation = Animation::Stopped;
        }

        let just_pressed = input.attack && !self.attack_was_down;
        self.attack_was_down = input.attack;
        local.is_attacking = just_pressed && !local.is_attacking;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::{Directions, JoystickState};

    fn held(dirs: Directions) -> InputFrame {
        InputFrame {
            arrows: dirs,
            ..Default::default()
        }
    }

    fn local() -> LocalEntity {
        LocalEntity::new(Vec2::new(100.0, 100.0), false)
    }

    #[test]
    fn test_left_beats_right() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        let input = held(Directions {
            left: true,
            right: true,
            ..Directions::NONE
        });

        resolver.resolve(&mut player, &input);

        assert_eq!(player.velocity.x, -80.0);
        assert_eq!(player.animation, Animation::Left);
        assert!(player.flip_x);
    }

    #[test]
    fn test_up_beats_down() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        let input = held(Directions {
            up: true,
            down: true,
            ..Directions::NONE
        });

        resolver.resolve(&mut player, &input);

        assert_eq!(player.velocity, Vec2::new(0.0, -80.0));
        assert_eq!(player.animation, Animation::Up);
        assert_eq!(player.facing, Facing::Up);
    }

    #[test]
    fn test_diagonal_moves_full_speed_on_both_axes() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        let input = InputFrame {
            wasd: Directions {
                right: true,
                ..Directions::NONE
            },
            arrows: Directions {
                down: true,
                ..Directions::NONE
            },
            ..Default::default()
        };

        resolver.resolve(&mut player, &input);

        assert_eq!(player.velocity, Vec2::new(80.0, 80.0));
        // Horizontal animation wins
        assert_eq!(player.animation, Animation::Right);
        assert!(!player.flip_x);
    }

    #[test]
    fn test_velocity_reset_each_tick() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        resolver.resolve(
            &mut player,
            &held(Directions {
                right: true,
                ..Directions::NONE
            }),
        );
        assert_eq!(player.velocity.x, 80.0);

        resolver.resolve(&mut player, &InputFrame::default());
        assert_eq!(player.velocity, Vec2::ZERO);
        assert_eq!(player.animation, Animation::Stopped);
    }

    #[test]
    fn test_vertical_keeps_previous_flip() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        resolver.resolve(
            &mut player,
            &held(Directions {
                left: true,
                ..Directions::NONE
            }),
        );
        resolver.resolve(
            &mut player,
            &held(Directions {
                down: true,
                ..Directions::NONE
            }),
        );

        assert!(player.flip_x);
        assert_eq!(player.animation, Animation::Down);
    }

    #[test]
    fn test_joystick_drives_motion() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        let input = InputFrame {
            joystick: JoystickState::new(0.0, -40.0),
            ..Default::default()
        };

        resolver.resolve(&mut player, &input);

        assert_eq!(player.velocity, Vec2::new(0.0, -80.0));
    }

    #[test]
    fn test_attack_held_fires_once() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        let input = InputFrame {
            attack: true,
            ..Default::default()
        };

        let flags: Vec<bool> = (0..5)
            .map(|_| {
                resolver.resolve(&mut player, &input);
                player.is_attacking
            })
            .collect();

        assert_eq!(flags, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_attack_repress_fires_again() {
        let mut resolver = MotionResolver::new();
        let mut player = local();
        let press = InputFrame {
            attack: true,
            ..Default::default()
        };
        let release = InputFrame::default();

        resolver.resolve(&mut player, &press);
        assert!(player.is_attacking);
        resolver.resolve(&mut player, &release);
        assert!(!player.is_attacking);
        resolver.resolve(&mut player, &press);
        assert!(player.is_attacking);
    }
}
