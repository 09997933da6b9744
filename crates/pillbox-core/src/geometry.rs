#![forbid(unsafe_code)]

//! Cell-space rectangles.

/// A half-open cell rectangle: `x..x + width` by `y..y + height`.
///
/// Pill layout, hit regions, and semantic nodes all share this type. Edges
/// saturate at `u16::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// A representative point inside the rectangle, used to aim synthetic
    /// pointer events. `None` for empty rectangles.
    #[inline]
    pub const fn center(&self) -> Option<(u16, u16)> {
        if self.is_empty() {
            None
        } else {
            Some((self.x + self.width / 2, self.y + self.height / 2))
        }
    }

    /// Overlap of two rectangles; `Rect::default()` when they are disjoint.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Overlap of two rectangles, if any.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_saturate() {
        let r = Rect::new(u16::MAX - 1, 0, 10, 1);
        assert_eq!(r.right(), u16::MAX);
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 1, 3, 2);
        assert!(r.contains(2, 1));
        assert!(r.contains(4, 2));
        assert!(!r.contains(5, 1));
        assert!(!r.contains(2, 3));
    }

    #[test]
    fn center_of_empty_is_none() {
        assert_eq!(Rect::new(3, 3, 0, 1).center(), None);
        assert_eq!(Rect::new(0, 0, 5, 1).center(), Some((2, 0)));
    }

    #[test]
    fn intersection_disjoint_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 2, 2);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn contains_rect_checks_all_edges() {
        let outer = Rect::new(0, 0, 10, 3);
        assert!(outer.contains_rect(&Rect::new(2, 1, 8, 2)));
        assert!(!outer.contains_rect(&Rect::new(2, 1, 9, 2)));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn rect() -> impl Strategy<Value = Rect> {
            (0u16..50, 0u16..50, 0u16..30, 0u16..30).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn intersection_lies_in_both(a in rect(), b in rect()) {
                match a.intersection_opt(&b) {
                    Some(i) => {
                        prop_assert!(!i.is_empty());
                        prop_assert!(a.contains_rect(&i));
                        prop_assert!(b.contains_rect(&i));
                    }
                    None => prop_assert!(a.intersection(&b).is_empty()),
                }
            }

            #[test]
            fn center_is_inside(r in rect()) {
                if let Some((x, y)) = r.center() {
                    prop_assert!(r.contains(x, y));
                }
            }
        }
    }
}
