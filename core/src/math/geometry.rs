use crate::landmarks::Landmark;

pub struct GeometryHelper;

impl GeometryHelper {
    /// Euclidean distance over x and y in normalized frame space.
    pub fn distance(p1: &Landmark, p2: &Landmark) -> f32 {
        let dx = p1.x - p2.x;
        let dy = p1.y - p2.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Affine remap of `value` from `[from_min, from_max]` onto `[to_min, to_max]`.
    ///
    /// The source range must not be empty.
    pub fn map_range(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
        debug_assert!(from_min != from_max, "map_range source range is empty");
        ((value - from_min) * (to_max - to_min)) / (from_max - from_min) + to_min
    }
}
