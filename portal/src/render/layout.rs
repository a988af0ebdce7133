//! Page shell and small shared fragments.

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wraps `body` in a right-to-left Arabic document with the site navigation.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.rtl.min.css">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>
<body>
    <nav class="navbar navbar-expand navbar-dark bg-primary mb-4">
        <div class="container">
            <a class="navbar-brand" href="/">دليل المدارس</a>
            <div class="navbar-nav">
                <a class="nav-link" href="/register">تسجيل منسق</a>
                <a class="nav-link" href="/login">تسجيل الدخول</a>
                <a class="nav-link" href="/achievements">الإنجازات</a>
            </div>
        </div>
    </nav>
    <main class="container">
{body}
    </main>
</body>
</html>
"#,
        title = html_escape(title),
        body = body,
    )
}

/// Bootstrap alert box. `level` is a contextual suffix like `warning`.
pub fn alert(level: &str, message: &str) -> String {
    let icon = match level {
        "success" => "fa-check-circle",
        "danger" => "fa-times-circle",
        _ => "fa-exclamation-triangle",
    };
    format!(
        r#"<div class="alert alert-{level}" role="alert"><i class="fas {icon} me-2"></i>{message}</div>"#,
        level = level,
        icon = icon,
        message = html_escape(message),
    )
}

/// Stand-alone page for a terminal message with a way back.
pub fn alert_page(message: &str, back_href: &str) -> String {
    let body = format!(
        r#"{alert}
        <a class="btn btn-outline-primary" href="{href}">العودة</a>"#,
        alert = alert("warning", message),
        href = html_escape(back_href),
    );
    page("تنبيه", &body)
}

pub fn success_page(message: &str, next_href: &str) -> String {
    let body = format!(
        r#"{alert}
        <a class="btn btn-primary" href="{href}">متابعة</a>"#,
        alert = alert("success", message),
        href = html_escape(next_href),
    );
    page("تم", &body)
}
