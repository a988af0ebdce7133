use serde::{Deserialize, Serialize};

pub const UNNAMED_DEPARTMENT: &str = "قسم بدون اسم";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
}

impl CoordinatorStatus {
    /// Unknown or missing statuses collapse to `None`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("pending") => Self::Pending,
            Some("approved") => Self::Approved,
            Some("rejected") => Self::Rejected,
            _ => Self::None,
        }
    }
}

/// A department as read from the `departments` collection.
///
/// The hierarchy runs administration ⊃ general administration ⊃ department
/// ⊃ section ⊃ unit; any level may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub administration: Option<String>,
    pub general_administration: Option<String>,
    pub department: Option<String>,
    pub section: Option<String>,
    pub unit: Option<String>,
    pub can_link: bool,
    pub coordinator_status: CoordinatorStatus,
}

impl Department {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.full_name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or(UNNAMED_DEPARTMENT)
    }

    pub fn is_rejected(&self) -> bool {
        self.coordinator_status == CoordinatorStatus::Rejected
    }
}
