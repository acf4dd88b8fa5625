//! Output tag colours
//!
//! Round-robin colour assignment for the per-package tags that prefix child
//! process output.

use crossterm::style::{Color, Stylize};

/// Colours handed out, in rotation order
pub const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Blue,
    Color::Yellow,
    Color::Green,
    Color::Red,
];

/// Round-robin colour cursor
#[derive(Debug, Clone, Default)]
pub struct ColorRotation {
    index: usize,
}

impl ColorRotation {
    /// Create a rotation starting at the first palette colour
    pub fn new() -> Self {
        Self::default()
    }

    /// Current colour
    pub fn current(&self) -> Color {
        PALETTE[self.index]
    }

    /// Advance to the next colour, wrapping around
    pub fn next_color(&mut self) {
        self.index = (self.index + 1) % PALETTE.len();
    }

    /// Step back to the previous colour, wrapping around
    pub fn prev_color(&mut self) {
        self.index = self.index.checked_sub(1).unwrap_or(PALETTE.len() - 1);
    }

    /// Return the current colour and advance
    pub fn take(&mut self) -> Color {
        let color = self.current();
        self.next_color();
        color
    }
}

/// Pair of line prefixes for one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTags {
    /// Prefix for stdout lines
    pub stdout: String,
    /// Prefix for stderr lines
    pub stderr: String,
}

impl OutputTags {
    /// Coloured tags, bold on stdout
    pub fn colored(name: &str, color: Color) -> Self {
        Self {
            stdout: format!("{}", format!("{name}:").with(color).bold()),
            stderr: format!("{}", format!("{name}:").with(color)),
        }
    }

    /// Uncoloured tags
    pub fn plain(name: &str) -> Self {
        Self {
            stdout: format!("{name}:"),
            stderr: format!("{name}:"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps_forward() {
        let mut rotation = ColorRotation::new();
        let seen: Vec<Color> = (0..PALETTE.len() + 1).map(|_| rotation.take()).collect();
        assert_eq!(seen[0], Color::Cyan);
        assert_eq!(seen[PALETTE.len() - 1], Color::Red);
        assert_eq!(seen[PALETTE.len()], Color::Cyan);
    }

    #[test]
    fn test_rotation_wraps_backward() {
        let mut rotation = ColorRotation::new();
        rotation.prev_color();
        assert_eq!(rotation.current(), Color::Red);
        rotation.next_color();
        assert_eq!(rotation.current(), Color::Cyan);
    }

    #[test]
    fn test_rotations_are_independent() {
        let mut first = ColorRotation::new();
        first.next_color();
        let second = ColorRotation::new();
        assert_eq!(second.current(), Color::Cyan);
        assert_eq!(first.current(), Color::Magenta);
    }

    #[test]
    fn test_tags_contain_name() {
        let tags = OutputTags::colored("core", Color::Green);
        assert!(tags.stdout.contains("core:"));
        assert!(tags.stderr.contains("core:"));

        assert_eq!(OutputTags::plain("core").stdout, "core:");
    }
}
