use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::{
    opt_string_or_number, string_or_number, Achievement, AchievementStatus, Coordinator,
    CoordinatorStatus, CoordinatorType, Department, LinkedEntity, School,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Departments,
    Schools,
    Coordinators,
    Achievements,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Departments => "departments",
            Collection::Schools => "schools",
            Collection::Coordinators => "coordinators",
            Collection::Achievements => "achievements",
        }
    }
}

/// Read request against a collection: equality filters, one sort key and an
/// optional row limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, bool)>,
    pub limit: Option<u32>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in PostgREST syntax.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some((column, ascending)) = &self.order {
            let dir = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", column, dir)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
pub struct DepartmentRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub administration: Option<String>,
    #[serde(default)]
    pub general_administration: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub can_link: Option<bool>,
    #[serde(default)]
    pub coordinator_status: Option<String>,
}

impl DepartmentRow {
    pub fn into_model(self) -> Result<Department, AppError> {
        if self.id.is_empty() {
            return Err(AppError::BadRequest("department row without id".to_string()));
        }
        Ok(Department {
            id: self.id,
            name: non_empty(self.name),
            full_name: non_empty(self.full_name),
            administration: non_empty(self.administration),
            general_administration: non_empty(self.general_administration),
            department: non_empty(self.department),
            section: non_empty(self.section),
            unit: non_empty(self.unit),
            can_link: self.can_link.unwrap_or(false),
            coordinator_status: CoordinatorStatus::parse(self.coordinator_status.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SchoolRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub statistical_number: Option<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl SchoolRow {
    pub fn into_model(self) -> Result<School, AppError> {
        if self.id.is_empty() {
            return Err(AppError::BadRequest("school row without id".to_string()));
        }
        Ok(School {
            id: self.id,
            name: self.name.unwrap_or_default(),
            statistical_number: self.statistical_number.unwrap_or_default(),
            education_level: self.education_level.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CoordinatorRow {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub civil_record: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
    #[serde(default)]
    pub coordinator_type: Option<String>,
    #[serde(default)]
    pub linked_entities: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl CoordinatorRow {
    pub fn into_model(self) -> Result<Coordinator, AppError> {
        let linked_entities = match self.linked_entities {
            None | Some(serde_json::Value::Null) => Vec::new(),
            // login only needs the credentials
            Some(value) => serde_json::from_value::<Vec<LinkedEntity>>(value).unwrap_or_else(|e| {
                warn!(
                    "coordinator {} has malformed linked_entities: {}",
                    self.civil_record, e
                );
                Vec::new()
            }),
        };

        Ok(Coordinator {
            id: self.id,
            civil_record: self.civil_record,
            name: self.name.unwrap_or_default(),
            phone_number: self.phone_number,
            coordinator_type: self
                .coordinator_type
                .as_deref()
                .and_then(CoordinatorType::parse),
            linked_entities,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AchievementRow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AchievementRow {
    pub fn into_model(self) -> Result<Achievement, AppError> {
        Ok(Achievement {
            title: self
                .title
                .ok_or_else(|| AppError::BadRequest("achievement without title".to_string()))?,
            description: self.description.unwrap_or_default(),
            current_value: self.current_value.unwrap_or(0.0),
            target_value: self.target_value.unwrap_or(0.0),
            status: AchievementStatus::parse(self.status.as_deref()),
            created_at: self.created_at,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
