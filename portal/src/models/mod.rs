pub mod achievement;
pub mod coordinator;
pub mod department;
pub mod linked_entity;
pub mod school;

pub use achievement::{Achievement, AchievementStatus};
pub use coordinator::{Coordinator, CoordinatorType, NewCoordinator};
pub use department::{CoordinatorStatus, Department};
pub use linked_entity::{EntityKind, LinkedEntity, Targets};
pub use school::School;

use serde::{Deserialize, Serialize};

/// Department snapshot taken when a registration page loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub departments: Vec<Department>,
}

/// Accepts either a JSON string or number and yields its string form.
///
/// Row ids and statistical numbers come back as integers or text depending
/// on the column type in the data API.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Missing or `null` text becomes an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
