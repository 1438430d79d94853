use crate::{Rect, Vec2};

/// Already-decoded remote-control key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Back,
    Tab,
    BackTab,
    PageUp,
    PageDown,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Down,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Up,
        }
    }
}

/// Wheel / analog-stick scroll, in px. `at` is the pointer position in
/// viewport coordinates when the device has one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisEvent {
    pub delta: Vec2,
    pub at: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Half-plane test: `candidate` lies wholly on this side of `current`.
    pub fn accepts(self, current: &Rect, candidate: &Rect) -> bool {
        match self {
            Direction::Left => candidate.right() <= current.x,
            Direction::Right => candidate.x >= current.right(),
            Direction::Up => candidate.bottom() <= current.y,
            Direction::Down => candidate.y >= current.bottom(),
        }
    }

    /// Which component of the axis point a move in this direction updates.
    pub fn axis(self) -> MoveAxis {
        match self {
            Direction::Left | Direction::Right => MoveAxis::X,
            Direction::Up | Direction::Down => MoveAxis::Y,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// -1 toward the start (left/up), +1 toward the end (right/down).
    pub fn sign(self) -> isize {
        match self {
            Direction::Left | Direction::Up => -1,
            Direction::Right | Direction::Down => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveAxis {
    X,
    Y,
    /// Explicit focus: both components are refreshed.
    Both,
}
