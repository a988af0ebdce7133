use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    pub statistical_number: String,
    pub education_level: String,
    pub gender: String,
    pub region: String,
}

impl School {
    /// Case-insensitive substring match over the searchable columns.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.name,
            &self.statistical_number,
            &self.education_level,
            &self.gender,
            &self.region,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
