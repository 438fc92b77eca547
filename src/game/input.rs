//! Input signals consumed by the motion resolver
//!
//! Three independent direction sources (arrow keys, WASD, virtual joystick)
//! are ORed into one [`Directions`] set per tick.

use std::ops::BitOr;

use crate::game::constants::joystick::FORCE_MIN;
use crate::util::vec2::Vec2;

/// Logical directions currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    pub const NONE: Directions = Directions {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

impl BitOr for Directions {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            up: self.up || rhs.up,
            down: self.down || rhs.down,
            left: self.left || rhs.left,
            right: self.right || rhs.right,
        }
    }
}

/// Virtual joystick thumb offset from its base, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickState {
    pub offset: Vec2,
}

impl JoystickState {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            offset: Vec2::new(dx, dy),
        }
    }

    /// Quantize the offset to an 8-way direction set.
    ///
    /// Sectors are 45° wide and centered on the axes and diagonals; offsets
    /// shorter than the minimum force report nothing.
    pub fn directions(&self) -> Directions {
        if self.offset.length() < FORCE_MIN {
            return Directions::NONE;
        }

        // 0° = right, 90° = down (screen space)
        let angle = self.offset.angle_degrees();
        Directions {
            right: angle > -67.5 && angle < 67.5,
            left: angle > 112.5 || angle < -112.5,
            down: angle > 22.5 && angle < 157.5,
            up: angle < -22.5 && angle > -157.5,
        }
    }
}

/// Raw input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub arrows: Directions,
    pub wasd: Directions,
    pub joystick: JoystickState,
    /// Attack button level (held or not)
    pub attack: bool,
}

impl InputFrame {
    /// All direction sources ORed together
    pub fn directions(&self) -> Directions {
        self.arrows | self.wasd | self.joystick.directions()
    }
}

/// Anything that can be polled for the current input
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_are_ored() {
        let frame = InputFrame {
            arrows: Directions {
                left: true,
                ..Directions::NONE
            },
            wasd: Directions {
                up: true,
                ..Directions::NONE
            },
            joystick: JoystickState::new(0.0, 20.0),
            attack: false,
        };
        let dirs = frame.directions();
        assert!(dirs.left && dirs.up && dirs.down);
        assert!(!dirs.right);
    }

    #[test]
    fn test_joystick_dead_zone() {
        assert_eq!(JoystickState::new(3.0, 4.0).directions(), Directions::NONE);
        assert!(!JoystickState::default().directions().any());
    }

    #[test]
    fn test_joystick_cardinal_sectors() {
        let right = JoystickState::new(30.0, 5.0).directions();
        assert_eq!(
            right,
            Directions {
                right: true,
                ..Directions::NONE
            }
        );

        let up = JoystickState::new(0.0, -30.0).directions();
        assert_eq!(
            up,
            Directions {
                up: true,
                ..Directions::NONE
            }
        );

        let left = JoystickState::new(-30.0, 0.0).directions();
        assert_eq!(
            left,
            Directions {
                left: true,
                ..Directions::NONE
            }
        );
    }

    #[test]
    fn test_joystick_diagonal_sector() {
        let down_left = JoystickState::new(-20.0, 20.0).directions();
        assert_eq!(
            down_left,
            Directions {
                down: true,
                left: true,
                ..Directions::NONE
            }
        );
    }
}
