use super::layout::{alert, html_escape, page};

pub fn login_page(message: Option<&str>, civil_record: &str) -> String {
    let notice = message.map(|m| alert("warning", m)).unwrap_or_default();
    let body = format!(
        r#"{notice}
<h2 class="mb-4">تسجيل الدخول</h2>
<form method="post" action="/login" class="card card-body">
    <label class="form-label" for="civil_record">السجل المدني</label>
    <input class="form-control mb-3" id="civil_record" name="civil_record" maxlength="10" value="{civil_record}" required>
    <label class="form-label" for="phone_number">رقم الجوال</label>
    <input class="form-control mb-3" id="phone_number" name="phone_number" maxlength="10" placeholder="05XXXXXXXX" required>
    <button type="submit" class="btn btn-primary">دخول</button>
</form>
<p class="mt-3">ليس لديك حساب؟ <a href="/register">سجل كمنسق</a></p>
"#,
        notice = notice,
        civil_record = html_escape(civil_record),
    );
    page("تسجيل الدخول", &body)
}
