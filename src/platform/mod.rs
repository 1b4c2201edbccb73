//! Platform abstraction layer
//!
//! Turns browser keyboard events into per-tick input. Held arrows drive the
//! player; any fresh key press is latched until the next tick consumes it.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Keyboard state fed by keydown/keyup events
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    held: HashSet<String>,
    pressed: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key went down; `repeat` is the browser's auto-repeat flag
    pub fn key_down(&mut self, code: &str, repeat: bool) {
        self.held.insert(code.to_string());
        if !repeat {
            self.pressed = true;
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Forget held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Current input without consuming the latched press
    pub fn peek(&self) -> TickInput {
        TickInput {
            left: self.is_held("ArrowLeft"),
            right: self.is_held("ArrowRight"),
            up: self.is_held("ArrowUp"),
            any_key: self.pressed,
        }
    }

    /// Current input; the latched press is cleared
    pub fn take(&mut self) -> TickInput {
        let input = self.peek();
        self.pressed = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_arrows() {
        let mut kb = Keyboard::new();
        kb.key_down("ArrowLeft", false);
        kb.key_down("ArrowUp", false);

        let input = kb.take();
        assert!(input.left && input.up && !input.right);
        assert!(input.any_key);

        // Still held next tick, but the press was consumed
        let input = kb.take();
        assert!(input.left);
        assert!(!input.any_key);

        kb.key_up("ArrowLeft");
        assert!(!kb.take().left);
    }

    #[test]
    fn test_auto_repeat_is_not_a_press() {
        let mut kb = Keyboard::new();
        kb.key_down("KeyA", true);
        assert!(!kb.take().any_key);
        kb.key_down("KeyA", false);
        assert!(kb.peek().any_key);
        assert!(kb.peek().any_key);
    }

    #[test]
    fn test_release_all() {
        let mut kb = Keyboard::new();
        kb.key_down("ArrowRight", false);
        kb.release_all();
        assert!(!kb.take().right);
    }
}
