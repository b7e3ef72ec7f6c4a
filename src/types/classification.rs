use crate::collection::Collection;

/// Single class prediction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Class index in the model's label map.
    pub index: i32,
    /// Confidence score.
    pub score: f32,
    pub label: Option<String>,
    pub display_name: Option<String>,
}

/// Class predictions for one subject, in model order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassificationList {
    pub classifications: Vec<Classification>,
}

impl ClassificationList {
    pub fn new(classifications: Vec<Classification>) -> Self {
        Self { classifications }
    }
}

impl Collection for ClassificationList {
    fn size(&self) -> usize {
        self.classifications.len()
    }
}
