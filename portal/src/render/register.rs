use std::fmt::Write;

use super::layout::{alert, html_escape, page};
use crate::controller::{Notice, RegistrationSession, SchoolSearch};
use crate::linking::{partition_tiers, Tier};
use crate::models::{CoordinatorType, EntityKind, LinkedEntity, School};

pub const MSG_NO_DEPARTMENTS: &str = "لا توجد أقسام متاحة";
pub const MSG_NO_ENTITIES: &str = "لا توجد جهات مربوطة";

/// Department `<option>`s: placeholder first, then one `<optgroup>` per
/// non-empty tier. Claimed departments are disabled.
pub fn department_options(session: &RegistrationSession) -> String {
    let mut html = String::from(r#"<option value="">اختر القسم</option>"#);

    if session.departments().is_empty() {
        let _ = write!(html, r#"<option value="" disabled>{}</option>"#, MSG_NO_DEPARTMENTS);
        return html;
    }

    let selectable = session.linking.selectable_departments(session.departments());
    let tiers = partition_tiers(selectable);

    for tier in Tier::ORDER {
        let members = tiers.tier(tier);
        if members.is_empty() {
            continue;
        }
        let _ = write!(html, r#"<optgroup label="{}">"#, html_escape(tier.label()));
        for dept in members {
            let _ = write!(
                html,
                r#"<option value="{id}" class="{class}"{disabled}>{name}</option>"#,
                id = html_escape(&dept.id),
                class = tier.css_class(),
                disabled = if tier.selectable() { "" } else { " disabled" },
                name = html_escape(dept.display_name()),
            );
        }
        html.push_str("</optgroup>");
    }

    html
}

fn coordinator_type_options(selected: Option<CoordinatorType>) -> String {
    let mut html = String::from(r#"<option value="">اختر نوع المنسق</option>"#);
    for t in CoordinatorType::ALL {
        let _ = write!(
            html,
            r#"<option value="{value}"{selected}>{label}</option>"#,
            value = t.as_str(),
            selected = if selected == Some(t) { " selected" } else { "" },
            label = t.label(),
        );
    }
    html
}

fn entity_card(index: usize, entity: &LinkedEntity, action_base: &str) -> String {
    let (type_class, icon) = match entity.kind {
        EntityKind::School => ("bg-info", "school"),
        EntityKind::Department => ("bg-warning", "sitemap"),
    };
    let administration = entity
        .administration
        .as_deref()
        .map(|a| {
            format!(
                r#"<div class="text-muted small"><strong>الإدارة:</strong> {}</div>"#,
                html_escape(a)
            )
        })
        .unwrap_or_default();
    let region = entity
        .region
        .as_deref()
        .map(|r| {
            format!(
                r#"<div class="text-muted small"><strong>المنطقة:</strong> {}</div>"#,
                html_escape(r)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="card mb-3 entity-card">
    <div class="card-header {type_class} text-white d-flex justify-content-between align-items-center">
        <h6 class="mb-0"><i class="fas fa-{icon} me-2"></i><span class="fw-bold">{type_name}:</span> {name}</h6>
        <button type="submit" form="coordinatorForm" formaction="{action_base}/entities/{index}/remove" class="btn btn-light btn-sm"><i class="fas fa-times"></i></button>
    </div>
    <div class="card-body">
        <div class="row">
            <div class="col-md-8">
                <h6 class="mb-2">{name}</h6>
                {administration}{region}
            </div>
            <div class="col-md-4">
                <div class="target-box bg-light">
                    <h6 class="text-primary mb-2">الأهداف المطلوبة</h6>
                    <div class="row text-center">
                        <div class="col-4"><div class="target-number text-primary">{administrators}</div><small class="text-muted">إداريين</small></div>
                        <div class="col-4"><div class="target-number text-success">{teachers}</div><small class="text-muted">معلمين</small></div>
                        <div class="col-4"><div class="target-number text-info">{students}</div><small class="text-muted">طلاب</small></div>
                    </div>
                </div>
            </div>
        </div>
    </div>
</div>
"#,
        type_class = type_class,
        icon = icon,
        type_name = entity.kind.label(),
        name = html_escape(&entity.name),
        action_base = action_base,
        index = index,
        administration = administration,
        region = region,
        administrators = entity.targets.administrators,
        teachers = entity.targets.teachers,
        students = entity.targets.students,
    )
}

pub fn linked_entities(session: &RegistrationSession, action_base: &str) -> String {
    if session.linking.is_empty() {
        return format!(r#"<div class="text-center text-muted py-3">{}</div>"#, MSG_NO_ENTITIES);
    }
    session
        .linking
        .entities()
        .iter()
        .enumerate()
        .map(|(i, e)| entity_card(i, e, action_base))
        .collect()
}

fn search_result(search: &SchoolSearch, action_base: &str) -> String {
    match search {
        SchoolSearch::Failed(message) => alert("warning", message),
        SchoolSearch::Found(school) => school_card(school, action_base),
    }
}

fn school_card(school: &School, action_base: &str) -> String {
    format!(
        r#"<div class="card search-result-card">
    <div class="card-header text-white bg-primary"><h6 class="mb-0"><i class="fas fa-school me-2"></i>نتيجة البحث</h6></div>
    <div class="card-body">
        <h6 class="card-title">{name}</h6>
        <div class="row">
            <div class="col-md-6">
                <p class="mb-1"><strong>الرقم الإحصائي:</strong> {statistical_number}</p>
                <p class="mb-1"><strong>المرحلة:</strong> {education_level}</p>
            </div>
            <div class="col-md-6">
                <p class="mb-1"><strong>النوع:</strong> {gender}</p>
                <p class="mb-1"><strong>المنطقة:</strong> {region}</p>
            </div>
        </div>
        <input type="hidden" form="coordinatorForm" name="school_id" value="{id}">
        <button type="submit" form="coordinatorForm" formaction="{action_base}/schools" class="btn btn-primary btn-sm mt-2"><i class="fas fa-plus me-1"></i>إضافة المدرسة</button>
    </div>
</div>
"#,
        name = html_escape(&school.name),
        statistical_number = html_escape(&school.statistical_number),
        education_level = html_escape(&school.education_level),
        gender = html_escape(&school.gender),
        region = html_escape(&school.region),
        action_base = action_base,
        id = html_escape(&school.id),
    )
}

/// Full registration page for the draft `draft_id`.
pub fn registration_page(
    draft_id: &str,
    session: &RegistrationSession,
    notice: Option<&Notice>,
) -> String {
    let action_base = format!("/register/{}", html_escape(draft_id));
    let mode = session.coordinator_type();
    let fields = &session.fields;
    let is_valid = session.is_valid();

    let mut body = String::new();
    if let Some(notice) = notice {
        let level = match notice {
            Notice::Warning(_) => "warning",
            Notice::Danger(_) => "danger",
        };
        body.push_str(&alert(level, notice.message()));
    }

    let _ = write!(
        body,
        r#"<h2 class="mb-4">تسجيل منسق</h2>
<form id="coordinatorForm" method="post" action="{action_base}/fields" class="card card-body mb-4">
    <div class="row g-3">
        <div class="col-md-6">
            <label class="form-label" for="civil_record">السجل المدني</label>
            <input class="form-control" id="civil_record" name="civil_record" maxlength="10" value="{civil_record}">
        </div>
        <div class="col-md-6">
            <label class="form-label" for="name">الاسم</label>
            <input class="form-control" id="name" name="name" value="{name}">
        </div>
        <div class="col-md-6">
            <label class="form-label" for="phone_number">رقم الجوال</label>
            <input class="form-control" id="phone_number" name="phone_number" maxlength="10" placeholder="05XXXXXXXX" value="{phone_number}">
        </div>
        <div class="col-md-6">
            <label class="form-label" for="coordinator_type">نوع المنسق</label>
            <select class="form-select" id="coordinator_type" name="coordinator_type">{type_options}</select>
        </div>
    </div>
    <button type="submit" class="btn btn-outline-primary mt-3">حفظ البيانات</button>
</form>
"#,
        action_base = action_base,
        civil_record = html_escape(&fields.civil_record),
        name = html_escape(&fields.name),
        phone_number = html_escape(&fields.phone_number),
        type_options = coordinator_type_options(mode),
    );

    if mode == Some(CoordinatorType::Department) {
        let _ = write!(
            body,
            r#"<div id="department_selection" class="card card-body mb-4">
    <label class="form-label" for="department_id">القسم</label>
    <select class="form-select" form="coordinatorForm" id="department_id" name="department_id">{options}</select>
    <button type="submit" form="coordinatorForm" formaction="{action_base}/departments" class="btn btn-outline-primary mt-3">ربط القسم</button>
</div>
"#,
            action_base = action_base,
            options = department_options(session),
        );
    }

    if mode == Some(CoordinatorType::School) {
        let result = session
            .school_search
            .as_ref()
            .map(|s| search_result(s, &action_base))
            .unwrap_or_default();
        let _ = write!(
            body,
            r#"<div id="school_search" class="card card-body mb-4">
    <div class="row g-2">
        <div class="col-md-9"><input class="form-control" form="coordinatorForm" id="statistical_number" name="statistical_number" placeholder="الرقم الإحصائي"></div>
        <div class="col-md-3"><button type="submit" form="coordinatorForm" formaction="{action_base}/schools/search" class="btn btn-primary w-100"><i class="fas fa-search me-1"></i>بحث</button></div>
    </div>
    <div id="searchResult" class="mt-3">{result}</div>
</div>
"#,
            action_base = action_base,
            result = result,
        );
    }

    if mode.is_some_and(CoordinatorType::requires_entities) {
        let _ = write!(
            body,
            r#"<section id="entities_section" class="mb-4">
    <h5>الجهات المربوطة <span id="entityCount" class="badge bg-secondary">{count}</span></h5>
    <div id="linkedEntities">{entities}</div>
</section>
"#,
            count = session.linking.count_label(),
            entities = linked_entities(session, &action_base),
        );
    }

    let _ = write!(
        body,
        r#"<button type="submit" form="coordinatorForm" formaction="{action_base}/submit" id="submitBtn" class="{class}"{disabled}><i class="fas fa-user-plus me-1"></i> تسجيل المنسق</button>
"#,
        action_base = action_base,
        class = if is_valid { "btn btn-primary" } else { "btn btn-secondary" },
        disabled = if is_valid { "" } else { " disabled" },
    );

    page("تسجيل منسق", &body)
}
