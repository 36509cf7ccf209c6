/// A closed scalar range `[min, max]`.
///
/// Used both as the window of acceptable hit distances along a ray and as the
/// per-axis extent of a bounding box. `min > max` denotes the empty interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Creates the tightest interval enclosing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// Unlike `f32::clamp` this never panics, so it is total over empty
    /// intervals as well.
    pub fn clamp(&self, x: f32) -> f32 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Adds a scalar displacement to both min and max.
    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
