use serde::{Deserialize, Serialize};

use super::LinkedEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorType {
    Department,
    School,
    Other,
}

impl CoordinatorType {
    pub const ALL: [CoordinatorType; 3] = [Self::Department, Self::School, Self::Other];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "department" => Some(Self::Department),
            "school" => Some(Self::School),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::School => "school",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Department => "منسق قسم",
            Self::School => "منسق مدرسة",
            Self::Other => "أخرى",
        }
    }

    /// Department and school coordinators must link at least one entity.
    pub fn requires_entities(self) -> bool {
        matches!(self, Self::Department | Self::School)
    }
}

/// Payload inserted into the `coordinators` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCoordinator {
    pub civil_record: String,
    pub name: String,
    pub phone_number: String,
    pub coordinator_type: CoordinatorType,
    pub linked_entities: Vec<LinkedEntity>,
}

/// A coordinator as read back at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinator {
    #[serde(default)]
    pub id: Option<String>,
    pub civil_record: String,
    pub name: String,
    pub phone_number: String,
    pub coordinator_type: Option<CoordinatorType>,
    #[serde(default)]
    pub linked_entities: Vec<LinkedEntity>,
    #[serde(default)]
    pub created_at: Option<String>,
}
