use std::fmt;

/// One of the four compass moves available in every Free cell.
///
/// Row index grows downwards, so `Up` is `(-1, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

/// Enumeration order used by every arg-max in the solver.
/// On equal Q-values the earliest action in this list wins.
pub const ACTION_ORDER: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

impl Action {
    /// Row/column offset of the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// The ordered pair of perpendicular actions this action may slip into,
    /// as `(left, right)` relative to the direction of travel.
    pub fn slip_pair(self) -> (Action, Action) {
        match self {
            Action::Up => (Action::Left, Action::Right),
            Action::Down => (Action::Right, Action::Left),
            Action::Left => (Action::Down, Action::Up),
            Action::Right => (Action::Up, Action::Down),
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Right => '→',
        }
    }

    /// Position of this action in [`ACTION_ORDER`].
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Action> { ACTION_ORDER.get(idx).copied() }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "Up",
            Action::Down => "Down",
            Action::Left => "Left",
            Action::Right => "Right",
        };
        f.write_str(name)
    }
}
