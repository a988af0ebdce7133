use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::CoordinatorType;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^05[0-9]{8}$").expect("phone pattern compiles"));
static CIVIL_RECORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("civil record pattern compiles"));

/// Saudi mobile number, `05` followed by eight digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Ten-digit national civil record.
pub fn is_valid_civil_record(civil_record: &str) -> bool {
    CIVIL_RECORD_RE.is_match(civil_record)
}

/// Registration form fields as last submitted by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormFields {
    pub civil_record: String,
    pub name: String,
    pub phone_number: String,
    pub coordinator_type: Option<CoordinatorType>,
}

impl FormFields {
    pub fn new(civil_record: &str, name: &str, phone_number: &str) -> Self {
        Self {
            civil_record: civil_record.trim().to_string(),
            name: name.trim().to_string(),
            phone_number: phone_number.trim().to_string(),
            coordinator_type: None,
        }
    }
}

/// Decides whether the submit button is enabled.
///
/// All-or-nothing: no per-field messages are produced.
pub fn is_valid(fields: &FormFields, linked_count: usize) -> bool {
    let Some(coordinator_type) = fields.coordinator_type else {
        return false;
    };

    if fields.civil_record.is_empty() || fields.name.is_empty() || fields.phone_number.is_empty() {
        return false;
    }

    if !is_valid_phone(&fields.phone_number) || !is_valid_civil_record(&fields.civil_record) {
        return false;
    }

    !coordinator_type.requires_entities() || linked_count > 0
}
