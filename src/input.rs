use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Vertical or horizontal pairing of directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Name of the bus event that requests this direction.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Up => "SNAKE_UP",
            Self::Down => "SNAKE_DOWN",
            Self::Left => "SNAKE_LEFT",
            Self::Right => "SNAKE_RIGHT",
        }
    }

    #[must_use]
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.event_name() == name)
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
}

/// Returns whether a direction change is legal: only turns onto the other axis.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    current.axis() != next.axis()
}

/// Translates a raw key event into a game input.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(GameInput::Quit),
            _ => None,
        };
    }

    let direction = match key.code {
        KeyCode::Up => Direction::Up,
        KeyCode::Down => Direction::Down,
        KeyCode::Left => Direction::Left,
        KeyCode::Right => Direction::Right,
        KeyCode::Esc => return Some(GameInput::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' | 'k' => Direction::Up,
            'a' | 'h' => Direction::Left,
            's' | 'j' => Direction::Down,
            'd' | 'l' => Direction::Right,
            'q' => return Some(GameInput::Quit),
            _ => return None,
        },
        _ => return None,
    };

    Some(GameInput::Direction(direction))
}
