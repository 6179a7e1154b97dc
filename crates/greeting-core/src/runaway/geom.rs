use glam::Vec2;

/// Axis-aligned rectangle in viewport pixels, y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Grow by `amount` on every side (shrink when negative).
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect {
            left: self.left - amount,
            top: self.top - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }

    /// Measured rectangles can come back empty or NaN before first layout.
    pub fn is_measurable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 100.0,
        height: 100.0,
    };

    #[test]
    fn overlap_and_containment_intersect() {
        assert!(A.intersects(&Rect::new(50.0, 50.0, 100.0, 100.0)));
        assert!(A.intersects(&Rect::new(20.0, 20.0, 60.0, 60.0)));
        assert!(A.intersects(&Rect::new(99.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn separated_rects_do_not_intersect() {
        assert!(!A.intersects(&Rect::new(200.0, 0.0, 100.0, 100.0)));
        assert!(!A.intersects(&Rect::new(0.0, 200.0, 100.0, 100.0)));
    }

    #[test]
    fn shared_edges_do_not_intersect() {
        assert!(!A.intersects(&Rect::new(100.0, 0.0, 100.0, 100.0)));
        assert!(!A.intersects(&Rect::new(0.0, 100.0, 100.0, 100.0)));
        assert!(!Rect::new(-50.0, 0.0, 50.0, 100.0).intersects(&A));
    }

    #[test]
    fn inflate_grows_every_side() {
        let r = Rect::new(10.0, 20.0, 100.0, 100.0).inflate(10.0);
        assert_eq!(r, Rect::new(0.0, 10.0, 120.0, 120.0));
        assert_eq!(r.right(), 120.0);
        assert_eq!(r.bottom(), 130.0);

        let shrunk = Rect::new(10.0, 20.0, 100.0, 100.0).inflate(-5.0);
        assert_eq!(shrunk, Rect::new(15.0, 25.0, 90.0, 90.0));
    }

    #[test]
    fn empty_rect_is_not_measurable() {
        assert!(!Rect::default().is_measurable());
        assert!(!Rect::new(f32::NAN, 0.0, 10.0, 10.0).is_measurable());
        assert!(A.is_measurable());
    }
}
