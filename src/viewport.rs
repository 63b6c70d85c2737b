/// Widths below this count as a small (mobile) screen.
pub const SMALL_SCREEN_MAX: u32 = 768;
/// Widths below this count as a very small screen.
pub const VERY_SMALL_SCREEN_MAX: u32 = 480;

/// Inner window width in CSS pixels. Every responsive constant on the page is
/// derived from this one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    pub fn is_small(&self) -> bool {
        self.width < SMALL_SCREEN_MAX
    }

    pub fn is_very_small(&self) -> bool {
        self.width < VERY_SMALL_SCREEN_MAX
    }

    /// Picks the value for the current breakpoint.
    pub fn pick<T>(&self, desktop: T, small: T, very_small: T) -> T {
        if self.is_very_small() {
            very_small
        } else if self.is_small() {
            small
        } else {
            desktop
        }
    }
}
