use std::fmt::Write;

use super::layout::{html_escape, page};
use crate::directory::{page_slice, total_pages, DirectoryView};
use crate::models::School;

pub const MSG_NO_SCHOOLS: &str = "لا توجد مدارس";

fn page_href(query: &str, page: usize) -> String {
    if query.is_empty() {
        format!("/?page={}", page)
    } else {
        format!("/?q={}&amp;page={}", urlencoding::encode(query), page)
    }
}

pub fn school_rows(view: &DirectoryView, results: &[&School]) -> String {
    let rows = page_slice(results, view.current_page);
    if rows.is_empty() {
        return format!(r#"<tr><td colspan="6" class="text-center">{}</td></tr>"#, MSG_NO_SCHOOLS);
    }

    let first = view.first_row_number();
    let mut html = String::new();
    for (i, school) in rows.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            first + i,
            html_escape(&school.name),
            html_escape(&school.statistical_number),
            html_escape(&school.education_level),
            html_escape(&school.gender),
            html_escape(&school.region),
        );
    }
    html
}

/// Previous / numbered / Next links. Empty when everything fits on one page.
pub fn pagination(view: &DirectoryView, result_count: usize) -> String {
    let total = total_pages(result_count);
    if total <= 1 {
        return String::new();
    }

    let current = view.current_page;
    let mut html = String::from(r#"<nav><ul class="pagination justify-content-center">"#);

    let _ = write!(
        html,
        r#"<li class="page-item{}"><a class="page-link" href="{}">السابق</a></li>"#,
        if current == 1 { " disabled" } else { "" },
        page_href(&view.query, current.saturating_sub(1).max(1)),
    );
    for n in 1..=total {
        let _ = write!(
            html,
            r#"<li class="page-item{}"><a class="page-link" href="{}">{}</a></li>"#,
            if n == current { " active" } else { "" },
            page_href(&view.query, n),
            n,
        );
    }
    let _ = write!(
        html,
        r#"<li class="page-item{}"><a class="page-link" href="{}">التالي</a></li>"#,
        if current == total { " disabled" } else { "" },
        page_href(&view.query, (current + 1).min(total)),
    );

    html.push_str("</ul></nav>");
    html
}

pub fn directory_page(view: &DirectoryView, results: &[&School]) -> String {
    let body = format!(
        r#"<h2 class="mb-4">دليل المدارس</h2>
<form method="get" action="/" class="mb-3">
    <input class="form-control" id="searchInput" name="q" placeholder="ابحث بالاسم أو الرقم الإحصائي أو المرحلة أو النوع أو المنطقة" value="{query}">
</form>
<table class="table table-striped" id="schoolsTable">
    <thead>
        <tr><th>#</th><th>اسم المدرسة</th><th>الرقم الإحصائي</th><th>المرحلة</th><th>النوع</th><th>المنطقة</th></tr>
    </thead>
    <tbody id="schoolsTableBody">{rows}</tbody>
</table>
<div id="pagination">{pagination}</div>
"#,
        query = html_escape(&view.query),
        rows = school_rows(view, results),
        pagination = pagination(view, results.len()),
    );
    page("دليل المدارس", &body)
}
