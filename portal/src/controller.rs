//! Registration page controller.
//!
//! One [`RegistrationSession`] holds everything the registration page keeps
//! between interactions: the department snapshot taken at page load, the
//! form fields, the linked entities and the last school search.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::linking::{LinkError, LinkOutcome, LinkingEngine};
use crate::models::{CoordinatorType, Department, NewCoordinator, ReferenceData, School};
use crate::validation::{self, FormFields};

pub const MSG_STATISTICAL_NUMBER_REQUIRED: &str = "يرجى إدخال الرقم الإحصائي";
pub const MSG_SCHOOL_NOT_FOUND: &str = "لم يتم العثور على مدرسة بهذا الرقم الإحصائي";
pub const MSG_SEARCH_FAILED: &str = "حدث خطأ أثناء البحث";

/// Outcome of the last statistical-number lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchoolSearch {
    Found(School),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Warning(String),
    Danger(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(m) | Notice::Danger(m) => m,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSession {
    pub reference: ReferenceData,
    pub fields: FormFields,
    pub linking: LinkingEngine,
    pub school_search: Option<SchoolSearch>,
    /// One-shot message shown on the next render.
    pub notice: Option<Notice>,
}

impl RegistrationSession {
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference,
            ..Self::default()
        }
    }

    pub fn departments(&self) -> &[Department] {
        &self.reference.departments
    }

    pub fn coordinator_type(&self) -> Option<CoordinatorType> {
        self.fields.coordinator_type
    }

    /// Changing the coordinator type drops every linked entity.
    pub fn switch_mode(&mut self, coordinator_type: Option<CoordinatorType>) {
        self.fields.coordinator_type = coordinator_type;
        self.linking.clear();
        self.school_search = None;
    }

    /// Stores the text fields and switches mode only when the type changed.
    pub fn update_fields(&mut self, fields: FormFields) {
        let mode_changed = fields.coordinator_type != self.fields.coordinator_type;
        self.fields.civil_record = fields.civil_record;
        self.fields.name = fields.name;
        self.fields.phone_number = fields.phone_number;
        if mode_changed {
            self.switch_mode(fields.coordinator_type);
        }
    }

    pub fn link_department(&mut self, department_id: &str) -> Result<LinkOutcome, LinkError> {
        let result = self
            .linking
            .add_department(&self.reference.departments, department_id);
        self.note_duplicate(&result);
        result
    }

    /// Links the school found by the last search, if its id matches.
    pub fn link_searched_school(&mut self, school_id: &str) -> Result<LinkOutcome, LinkError> {
        let school = match &self.school_search {
            Some(SchoolSearch::Found(school)) if school.id == school_id => school.clone(),
            _ => {
                warn!("School {} is not the current search result", school_id);
                return Ok(LinkOutcome::Ignored);
            }
        };

        let result = self.linking.add_school(&school);
        if result.is_ok() {
            self.school_search = None;
        }
        self.note_duplicate(&result);
        result
    }

    pub fn record_search(&mut self, search: SchoolSearch) {
        self.school_search = Some(search);
    }

    pub fn remove_entity(&mut self, index: usize) {
        if let Some(removed) = self.linking.remove(index) {
            info!("unlinked {:?} {}", removed.kind, removed.id);
        }
    }

    pub fn is_valid(&self) -> bool {
        validation::is_valid(&self.fields, self.linking.len())
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Builds the insert payload; refuses when the gate is closed.
    pub fn to_payload(&self) -> Result<NewCoordinator, AppError> {
        let coordinator_type = match self.fields.coordinator_type {
            Some(t) if self.is_valid() => t,
            _ => {
                return Err(AppError::BadRequest(
                    "يرجى استكمال بيانات النموذج بشكل صحيح".to_string(),
                ));
            }
        };

        Ok(NewCoordinator {
            civil_record: self.fields.civil_record.clone(),
            name: self.fields.name.clone(),
            phone_number: self.fields.phone_number.clone(),
            coordinator_type,
            linked_entities: self.linking.entities().to_vec(),
        })
    }

    fn note_duplicate(&mut self, result: &Result<LinkOutcome, LinkError>) {
        if let Err(err) = result {
            self.notice = Some(Notice::Warning(err.notice().to_string()));
        }
    }
}
