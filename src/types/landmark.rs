use crate::collection::Collection;

/// Landmark in world space (meters, origin between the hips).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Likelihood that the landmark is visible in the frame.
    pub visibility: Option<f32>,
    /// Likelihood that the landmark is present in the scene.
    pub presence: Option<f32>,
}

/// Landmark in normalized image space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: Option<f32>,
    pub presence: Option<f32>,
}

impl From<Landmark> for NormalizedLandmark {
    fn from(value: Landmark) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
            visibility: value.visibility,
            presence: value.presence,
        }
    }
}

/// Ordered set of world landmarks for one subject.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkList {
    pub landmarks: Vec<Landmark>,
}

/// Ordered set of normalized landmarks for one subject.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedLandmarkList {
    pub landmarks: Vec<NormalizedLandmark>,
}

impl LandmarkList {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }
}

impl NormalizedLandmarkList {
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Self {
        Self { landmarks }
    }
}

impl Collection for LandmarkList {
    fn size(&self) -> usize {
        self.landmarks.len()
    }
}

impl Collection for NormalizedLandmarkList {
    fn size(&self) -> usize {
        self.landmarks.len()
    }
}
