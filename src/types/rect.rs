/// Oriented rectangle in normalized image coordinates.
///
/// The center lies in `[0, 1]` for regions inside the frame, although
/// tracked regions may drift slightly outside. `rotation` is in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalizedRect {
    /// Horizontal center in normalized coordinates.
    pub x_center: f32,
    /// Vertical center in normalized coordinates.
    pub y_center: f32,
    /// Width relative to the image width.
    pub width: f32,
    /// Height relative to the image height.
    pub height: f32,
    /// Clockwise rotation in radians.
    pub rotation: f32,
    /// Optional identifier assigned upstream.
    pub rect_id: Option<i64>,
}

impl NormalizedRect {
    /// Creates an axis-aligned rectangle around a center point.
    pub fn from_center(x_center: f32, y_center: f32, width: f32, height: f32) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
            rotation: 0.0,
            rect_id: None,
        }
    }

    /// Returns a copy with the given rotation.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns a copy tagged with an upstream identifier.
    pub fn with_id(mut self, rect_id: i64) -> Self {
        self.rect_id = Some(rect_id);
        self
    }
}
