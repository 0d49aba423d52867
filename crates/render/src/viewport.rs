/// Size of the drawable surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Apply a new size. A zero width or height (minimized or hidden surface)
    /// is skipped and the previous size kept. Returns `true` if the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring zero-sized resize");
            return false;
        }
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_applies_new_size() {
        let mut v = Viewport::new(800, 600);
        assert!(v.resize(1024, 768));
        assert_eq!(v, Viewport::new(1024, 768));
        assert!((v.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_resize_keeps_previous_size() {
        let mut v = Viewport::new(800, 600);
        assert!(!v.resize(1024, 0));
        assert!(!v.resize(0, 768));
        assert_eq!(v, Viewport::new(800, 600));
    }

    #[test]
    fn same_size_is_not_a_change() {
        let mut v = Viewport::new(800, 600);
        assert!(!v.resize(800, 600));
    }

    #[test]
    fn construction_never_yields_zero() {
        let v = Viewport::new(0, 0);
        assert_eq!((v.width, v.height), (1, 1));
        assert!(v.aspect().is_finite());
    }
}
