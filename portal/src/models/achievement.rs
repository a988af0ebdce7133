use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementStatus {
    #[default]
    New,
    InProgress,
    Completed,
}

impl AchievementStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("completed") => Self::Completed,
            Some("in_progress") => Self::InProgress,
            _ => Self::New,
        }
    }

    /// Badge colour suffix.
    pub fn style(self) -> &'static str {
        match self {
            Self::Completed => "success",
            Self::InProgress => "warning",
            Self::New => "info",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "مكتمل",
            Self::InProgress => "قيد التنفيذ",
            Self::New => "جديد",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub current_value: f64,
    pub target_value: f64,
    pub status: AchievementStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Achievement {
    pub fn progress_percentage(&self) -> f64 {
        progress_percentage(self.current_value, self.target_value)
    }
}

/// Percentage of `target` reached, clamped to `[0, 100]`.
///
/// A non-positive target yields 0.
pub fn progress_percentage(current: f64, target: f64) -> f64 {
    if target <= 0.0 || !target.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}
