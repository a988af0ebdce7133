use std::fmt::Write;

use super::layout::{html_escape, page};
use crate::models::{Achievement, Coordinator};

pub const MSG_NO_ACHIEVEMENTS: &str = "لا توجد إنجازات";

pub fn achievement_card(achievement: &Achievement) -> String {
    let status = achievement.status;
    format!(
        r#"<div class="col-md-6 col-lg-4 mb-4">
    <div class="card achievement-card h-100">
        <div class="card-body text-center">
            <div class="achievement-icon-wrapper"><i class="fas fa-trophy achievement-icon"></i></div>
            <h5 class="achievement-title">{title}</h5>
            <p class="achievement-description">{description}</p>
            <div class="achievement-progress">
                <div class="progress"><div class="progress-bar" style="width: {percent:.1}%"></div></div>
                <small class="achievement-progress-text">{current} من {target}</small>
            </div>
            <div class="achievement-status"><span class="badge bg-{style}">{label}</span></div>
        </div>
    </div>
</div>
"#,
        title = html_escape(&achievement.title),
        description = html_escape(&achievement.description),
        percent = achievement.progress_percentage(),
        current = achievement.current_value,
        target = achievement.target_value,
        style = status.style(),
        label = status.label(),
    )
}

pub fn achievements_page(achievements: &[Achievement], coordinator: Option<&Coordinator>) -> String {
    let mut body = String::new();

    if let Some(coordinator) = coordinator {
        let _ = write!(
            body,
            r#"<div class="d-flex justify-content-between align-items-center mb-3">
    <span>مرحباً، {}</span>
    <form method="post" action="/logout"><button type="submit" class="btn btn-outline-secondary btn-sm">تسجيل الخروج</button></form>
</div>
"#,
            html_escape(&coordinator.name)
        );
    }

    body.push_str(r#"<h2 class="mb-4">الإنجازات</h2><div class="row" id="achievementsContainer">"#);
    if achievements.is_empty() {
        let _ = write!(
            body,
            r#"<div class="text-center text-muted py-5">{}</div>"#,
            MSG_NO_ACHIEVEMENTS
        );
    } else {
        for achievement in achievements {
            body.push_str(&achievement_card(achievement));
        }
    }
    body.push_str("</div>");

    page("الإنجازات", &body)
}
