// Countdown windows for time-sensitive input (jump buffering, coyote time)

/// A countdown measured in seconds.
///
/// The window is open while time remains. Ticking keeps counting below zero
/// instead of clamping, so an expired window simply reads as negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GraceWindow {
    remaining: f32,
}

impl GraceWindow {
    /// Create a closed window
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Open the window for `duration` seconds, replacing any time left
    pub fn open(&mut self, duration: f32) {
        self.remaining = duration;
    }

    /// Close the window immediately
    pub fn close(&mut self) {
        self.remaining = 0.0;
    }

    /// Count down by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    /// Check if the window is still open
    pub fn is_open(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds left (negative once expired)
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_is_closed() {
        let window = GraceWindow::new();
        assert!(!window.is_open());
        assert_eq!(window.remaining(), 0.0);
    }

    #[test]
    fn test_open_and_expire() {
        let mut window = GraceWindow::new();
        window.open(0.1);
        assert!(window.is_open());

        window.tick(0.05);
        assert!(window.is_open());

        window.tick(0.1);
        assert!(!window.is_open());
        assert!(window.remaining() < 0.0, "expired windows keep counting down");
    }

    #[test]
    fn test_reopen_replaces_remaining_time() {
        let mut window = GraceWindow::new();
        window.open(0.1);
        window.tick(0.5);
        window.open(0.2);
        assert_eq!(window.remaining(), 0.2);
    }

    #[test]
    fn test_close() {
        let mut window = GraceWindow::new();
        window.open(1.0);
        window.close();
        assert!(!window.is_open());
    }
}
