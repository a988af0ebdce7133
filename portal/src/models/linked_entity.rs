use serde::{Deserialize, Serialize};

use super::{Department, School};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Department,
    School,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Department => "قسم",
            Self::School => "مدرسة",
        }
    }
}

/// Expected head counts attached to every linked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    pub administrators: u32,
    pub teachers: u32,
    pub students: u32,
}

impl Targets {
    pub const DEPARTMENT: Targets = Targets {
        administrators: 5,
        teachers: 2,
        students: 0,
    };

    pub const SCHOOL: Targets = Targets {
        administrators: 1,
        teachers: 10,
        students: 200,
    };
}

/// A department or school selected during registration.
///
/// Display fields are copied at link time so the record can be submitted
/// wholesale inside the coordinator payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_administration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistical_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub targets: Targets,
}

impl LinkedEntity {
    pub fn is(&self, id: &str, kind: EntityKind) -> bool {
        self.id == id && self.kind == kind
    }
}

impl From<&Department> for LinkedEntity {
    fn from(dept: &Department) -> Self {
        Self {
            id: dept.id.clone(),
            kind: EntityKind::Department,
            name: dept.display_name().to_string(),
            administration: dept.administration.clone(),
            general_administration: dept.general_administration.clone(),
            department: dept.department.clone(),
            section: dept.section.clone(),
            unit: dept.unit.clone(),
            statistical_number: None,
            education_level: None,
            gender: None,
            region: None,
            targets: Targets::DEPARTMENT,
        }
    }
}

impl From<&School> for LinkedEntity {
    fn from(school: &School) -> Self {
        Self {
            id: school.id.clone(),
            kind: EntityKind::School,
            name: school.name.clone(),
            administration: None,
            general_administration: None,
            department: None,
            section: None,
            unit: None,
            statistical_number: Some(school.statistical_number.clone()),
            education_level: Some(school.education_level.clone()),
            gender: Some(school.gender.clone()),
            region: Some(school.region.clone()),
            targets: Targets::SCHOOL,
        }
    }
}
