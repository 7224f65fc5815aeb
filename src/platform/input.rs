//! Keyboard mapping

use crate::sim::Heading;

/// A player intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Heading),
    TogglePause,
    /// Let the computer play (demo mode)
    ToggleAutopilot,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn map_key(key: &str) -> Option<Command> {
    match key {
        "ArrowUp" => Some(Command::Steer(Heading::Up)),
        "ArrowDown" => Some(Command::Steer(Heading::Down)),
        "ArrowLeft" => Some(Command::Steer(Heading::Left)),
        "ArrowRight" => Some(Command::Steer(Heading::Right)),
        " " => Some(Command::TogglePause),
        "i" | "I" => Some(Command::ToggleAutopilot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_steer() {
        assert_eq!(map_key("ArrowLeft"), Some(Command::Steer(Heading::Left)));
        assert_eq!(map_key("ArrowDown"), Some(Command::Steer(Heading::Down)));
    }

    #[test]
    fn other_keys() {
        assert_eq!(map_key(" "), Some(Command::TogglePause));
        assert_eq!(map_key("I"), Some(Command::ToggleAutopilot));
        assert_eq!(map_key("Enter"), None);
        assert_eq!(map_key("w"), None);
    }
}
