//! Entity linking: the ordered list of departments or schools a coordinator
//! is being registered against, and the department choices that remain
//! selectable once one is linked.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{Department, EntityKind, LinkedEntity, School};

/// Advisory cap shown in the counter label. Not enforced.
pub const MAX_LINKED: usize = 4;

pub const MSG_DEPARTMENT_DUPLICATE: &str = "هذا القسم مربوط بالفعل";
pub const MSG_SCHOOL_DUPLICATE: &str = "هذه المدرسة مربوطة بالفعل";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("{kind:?} {id} is already linked")]
    Duplicate { id: String, kind: EntityKind },
}

impl LinkError {
    pub fn notice(&self) -> &'static str {
        match self {
            LinkError::Duplicate {
                kind: EntityKind::Department,
                ..
            } => MSG_DEPARTMENT_DUPLICATE,
            LinkError::Duplicate {
                kind: EntityKind::School,
                ..
            } => MSG_SCHOOL_DUPLICATE,
        }
    }
}

impl From<LinkError> for AppError {
    fn from(err: LinkError) -> Self {
        AppError::Duplicate(err.notice().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Added,
    /// The id was not in the snapshot; nothing changed.
    Ignored,
}

/// Display tier of a selectable department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Linkable and not previously rejected.
    Available,
    /// Linkable, a previous request was rejected.
    Resubmittable,
    /// Already claimed by another coordinator; shown disabled.
    Claimed,
}

impl Tier {
    pub const ORDER: [Tier; 3] = [Tier::Available, Tier::Resubmittable, Tier::Claimed];

    pub fn of(dept: &Department) -> Self {
        match (dept.can_link, dept.is_rejected()) {
            (false, _) => Tier::Claimed,
            (true, true) => Tier::Resubmittable,
            (true, false) => Tier::Available,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Available => "الأقسام المتاحة للربط",
            Tier::Resubmittable => "الأقسام المرفوضة (يمكن إعادة طلبها)",
            Tier::Claimed => "الأقسام المرتبطة بمنسقين آخرين (غير متاحة)",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Tier::Available => "text-success",
            Tier::Resubmittable => "text-warning",
            Tier::Claimed => "text-danger",
        }
    }

    pub fn selectable(self) -> bool {
        self != Tier::Claimed
    }
}

/// Departments split into display tiers, input order preserved in each.
#[derive(Debug, Default, PartialEq)]
pub struct DepartmentTiers<'a> {
    pub available: Vec<&'a Department>,
    pub resubmittable: Vec<&'a Department>,
    pub claimed: Vec<&'a Department>,
}

impl<'a> DepartmentTiers<'a> {
    pub fn tier(&self, tier: Tier) -> &[&'a Department] {
        match tier {
            Tier::Available => &self.available,
            Tier::Resubmittable => &self.resubmittable,
            Tier::Claimed => &self.claimed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.resubmittable.is_empty() && self.claimed.is_empty()
    }
}

pub fn partition_tiers<'a, I>(departments: I) -> DepartmentTiers<'a>
where
    I: IntoIterator<Item = &'a Department>,
{
    let mut tiers = DepartmentTiers::default();
    for dept in departments {
        match Tier::of(dept) {
            Tier::Available => tiers.available.push(dept),
            Tier::Resubmittable => tiers.resubmittable.push(dept),
            Tier::Claimed => tiers.claimed.push(dept),
        }
    }
    tiers
}

/// True when `candidate` sits under the same branch as `anchor`, using the
/// most specific hierarchy level both of them carry.
pub fn same_branch(anchor: &Department, candidate: &Department) -> bool {
    if let (Some(a), Some(c)) = (&anchor.general_administration, &candidate.general_administration) {
        return a == c;
    }
    if let (Some(a), Some(c)) = (&anchor.department, &candidate.department) {
        return a == c;
    }
    anchor.administration == candidate.administration
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkingEngine {
    entities: Vec<LinkedEntity>,
}

impl LinkingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[LinkedEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_label(&self) -> String {
        format!("{}/{}", self.entities.len(), MAX_LINKED)
    }

    pub fn contains(&self, id: &str, kind: EntityKind) -> bool {
        self.entities.iter().any(|e| e.is(id, kind))
    }

    pub fn add_department(
        &mut self,
        departments: &[Department],
        department_id: &str,
    ) -> Result<LinkOutcome, LinkError> {
        let Some(dept) = departments.iter().find(|d| d.id == department_id) else {
            warn!("Selected department not found: {}", department_id);
            return Ok(LinkOutcome::Ignored);
        };

        self.push(LinkedEntity::from(dept))
    }

    pub fn add_school(&mut self, school: &School) -> Result<LinkOutcome, LinkError> {
        self.push(LinkedEntity::from(school))
    }

    fn push(&mut self, entity: LinkedEntity) -> Result<LinkOutcome, LinkError> {
        if self.contains(&entity.id, entity.kind) {
            return Err(LinkError::Duplicate {
                id: entity.id,
                kind: entity.kind,
            });
        }
        if self.entities.len() >= MAX_LINKED {
            debug!("linking beyond the advisory cap of {}", MAX_LINKED);
        }
        self.entities.push(entity);
        Ok(LinkOutcome::Added)
    }

    /// Removes the entity at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<LinkedEntity> {
        (index < self.entities.len()).then(|| self.entities.remove(index))
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Departments still offered for selection.
    ///
    /// With nothing linked this is the whole snapshot. Once a department is
    /// linked, choices narrow to unlinked departments on the first linked
    /// department's branch.
    pub fn selectable_departments<'a>(&self, departments: &'a [Department]) -> Vec<&'a Department> {
        let anchor_id = match self.entities.first() {
            Some(first) if first.kind == EntityKind::Department => &first.id,
            _ => return departments.iter().collect(),
        };

        let Some(anchor) = departments.iter().find(|d| &d.id == anchor_id) else {
            warn!("First linked department not found: {}", anchor_id);
            return departments.iter().collect();
        };

        departments
            .iter()
            .filter(|d| !self.contains(&d.id, EntityKind::Department))
            .filter(|d| same_branch(anchor, d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoordinatorStatus;

    fn dept(id: &str, admin: &str, general: Option<&str>, department: Option<&str>) -> Department {
        Department {
            id: id.to_string(),
            name: Some(format!("قسم {}", id)),
            full_name: None,
            administration: Some(admin.to_string()),
            general_administration: general.map(str::to_string),
            department: department.map(str::to_string),
            section: None,
            unit: None,
            can_link: true,
            coordinator_status: CoordinatorStatus::None,
        }
    }

    fn school(id: &str) -> School {
        School {
            id: id.to_string(),
            name: format!("مدرسة {}", id),
            statistical_number: format!("10{}", id),
            education_level: "ابتدائي".to_string(),
            gender: "بنين".to_string(),
            region: "الرياض".to_string(),
        }
    }

    #[test]
    fn test_add_department_copies_fields_and_default_targets() {
        let depts = vec![dept("1", "A", Some("X"), None)];
        let mut engine = LinkingEngine::new();

        assert_eq!(engine.add_department(&depts, "1"), Ok(LinkOutcome::Added));
        let linked = &engine.entities()[0];
        assert_eq!(linked.kind, EntityKind::Department);
        assert_eq!(linked.name, "قسم 1");
        assert_eq!(linked.general_administration.as_deref(), Some("X"));
        assert_eq!(linked.targets.administrators, 5);
        assert_eq!(linked.targets.teachers, 2);
        assert_eq!(linked.targets.students, 0);
    }

    #[test]
    fn test_add_unknown_department_is_ignored() {
        let depts = vec![dept("1", "A", None, None)];
        let mut engine = LinkingEngine::new();

        assert_eq!(engine.add_department(&depts, "99"), Ok(LinkOutcome::Ignored));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_duplicate_department_is_rejected() {
        let depts = vec![dept("1", "A", None, None)];
        let mut engine = LinkingEngine::new();
        engine.add_department(&depts, "1").unwrap();

        let err = engine.add_department(&depts, "1").unwrap_err();
        assert_eq!(err.notice(), MSG_DEPARTMENT_DUPLICATE);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_school_uses_full_record_and_school_targets() {
        let mut engine = LinkingEngine::new();
        engine.add_school(&school("7")).unwrap();

        let linked = &engine.entities()[0];
        assert_eq!(linked.name, "مدرسة 7");
        assert_eq!(linked.statistical_number.as_deref(), Some("107"));
        assert_eq!(linked.targets.administrators, 1);
        assert_eq!(linked.targets.teachers, 10);
        assert_eq!(linked.targets.students, 200);

        let err = engine.add_school(&school("7")).unwrap_err();
        assert_eq!(err.notice(), MSG_SCHOOL_DUPLICATE);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_same_id_different_kind_is_not_duplicate() {
        let depts = vec![dept("7", "A", None, None)];
        let mut engine = LinkingEngine::new();
        engine.add_department(&depts, "7").unwrap();
        assert_eq!(engine.add_school(&school("7")), Ok(LinkOutcome::Added));
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_cap_is_advisory() {
        let mut engine = LinkingEngine::new();
        for id in ["1", "2", "3", "4", "5"] {
            engine.add_school(&school(id)).unwrap();
        }
        assert_eq!(engine.len(), 5);
        assert_eq!(engine.count_label(), "5/4");
    }

    #[test]
    fn test_filter_by_general_administration() {
        let depts = vec![
            dept("a", "R", Some("X"), Some("D1")),
            dept("b", "R", Some("X"), Some("D2")),
            dept("c", "R", Some("Y"), Some("D1")),
            dept("d", "R", Some("X"), None),
        ];
        let mut engine = LinkingEngine::new();
        engine.add_department(&depts, "a").unwrap();

        let ids: Vec<_> = engine
            .selectable_departments(&depts)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_filter_falls_back_to_department_then_administration() {
        let depts = vec![
            dept("a", "R", None, Some("D1")),
            dept("b", "R", Some("X"), Some("D1")),
            dept("c", "R", None, Some("D2")),
            dept("d", "R", None, None),
            dept("e", "S", None, None),
        ];
        let mut engine = LinkingEngine::new();
        engine.add_department(&depts, "a").unwrap();

        let ids: Vec<_> = engine
            .selectable_departments(&depts)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        // b: department matches, c: department differs, d: administration matches
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_filter_excludes_every_linked_department() {
        let depts = vec![
            dept("a", "R", Some("X"), None),
            dept("b", "R", Some("X"), None),
            dept("c", "R", Some("X"), None),
        ];
        let mut engine = LinkingEngine::new();
        engine.add_department(&depts, "a").unwrap();
        engine.add_department(&depts, "b").unwrap();

        let ids: Vec<_> = engine
            .selectable_departments(&depts)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_removing_last_entity_restores_full_list() {
        let depts = vec![
            dept("a", "R", Some("X"), None),
            dept("b", "R", Some("Y"), None),
        ];
        let mut engine = LinkingEngine::new();
        engine.add_department(&depts, "a").unwrap();
        assert_eq!(engine.selectable_departments(&depts).len(), 0);

        assert!(engine.remove(0).is_some());
        assert_eq!(engine.selectable_departments(&depts).len(), 2);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut engine = LinkingEngine::new();
        engine.add_school(&school("1")).unwrap();
        assert!(engine.remove(3).is_none());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_partition_tiers() {
        let mut claimed = dept("c", "R", None, None);
        claimed.can_link = false;
        claimed.coordinator_status = CoordinatorStatus::Rejected;
        let mut rejected = dept("r", "R", None, None);
        rejected.coordinator_status = CoordinatorStatus::Rejected;
        let mut pending = dept("p", "R", None, None);
        pending.coordinator_status = CoordinatorStatus::Pending;
        let depts = vec![claimed, rejected, pending, dept("a", "R", None, None)];

        let tiers = partition_tiers(&depts);
        let ids = |v: &[&Department]| v.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&tiers.available), vec!["p", "a"]);
        assert_eq!(ids(&tiers.resubmittable), vec!["r"]);
        assert_eq!(ids(&tiers.claimed), vec!["c"]);
        assert!(!Tier::Claimed.selectable());
    }
}
