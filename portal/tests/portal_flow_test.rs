use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use portal::api::router;
use portal::error::AppError;
use portal::gateway::{DataGateway, UnconfiguredGateway};
use portal::models::{
    Achievement, AchievementStatus, Coordinator, CoordinatorStatus, CoordinatorType, Department,
    EntityKind, NewCoordinator, School,
};
use portal::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

#[derive(Default)]
struct FakeGateway {
    departments: Vec<Department>,
    schools: Vec<School>,
    coordinators: Vec<Coordinator>,
    achievements: Vec<Achievement>,
    inserted: Mutex<Vec<NewCoordinator>>,
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn fetch_departments(&self) -> Result<Vec<Department>, AppError> {
        Ok(self.departments.clone())
    }

    async fn fetch_schools(&self) -> Result<Vec<School>, AppError> {
        Ok(self.schools.clone())
    }

    async fn find_school_by_statistical_number(
        &self,
        statistical_number: &str,
    ) -> Result<Option<School>, AppError> {
        Ok(self
            .schools
            .iter()
            .find(|s| s.statistical_number == statistical_number)
            .cloned())
    }

    async fn find_coordinator(
        &self,
        civil_record: &str,
        phone_number: &str,
    ) -> Result<Option<Coordinator>, AppError> {
        Ok(self
            .coordinators
            .iter()
            .find(|c| c.civil_record == civil_record && c.phone_number == phone_number)
            .cloned())
    }

    async fn fetch_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        Ok(self.achievements.clone())
    }

    async fn insert_coordinator(&self, coordinator: &NewCoordinator) -> Result<(), AppError> {
        self.inserted.lock().unwrap().push(coordinator.clone());
        Ok(())
    }
}

fn department(id: &str, general: &str, status: CoordinatorStatus) -> Department {
    Department {
        id: id.to_string(),
        name: Some(format!("قسم {}", id)),
        full_name: None,
        administration: Some("تعليم الرياض".to_string()),
        general_administration: Some(general.to_string()),
        department: None,
        section: None,
        unit: None,
        can_link: status == CoordinatorStatus::None,
        coordinator_status: status,
    }
}

fn school(i: usize) -> School {
    School {
        id: format!("s{}", i),
        name: format!("School {}", i),
        statistical_number: format!("{}", 1000 + i),
        education_level: "ابتدائي".to_string(),
        gender: "بنين".to_string(),
        region: if i % 2 == 0 { "الرياض" } else { "جدة" }.to_string(),
    }
}

fn fake_gateway() -> FakeGateway {
    FakeGateway {
        departments: vec![
            department("1", "الشؤون التعليمية", CoordinatorStatus::None),
            department("2", "الشؤون التعليمية", CoordinatorStatus::None),
            department("3", "الشؤون المدرسية", CoordinatorStatus::Approved),
        ],
        schools: (1..=25).map(school).collect(),
        coordinators: vec![Coordinator {
            id: Some("7".to_string()),
            civil_record: "1234567890".to_string(),
            name: "سارة".to_string(),
            phone_number: "0512345678".to_string(),
            coordinator_type: Some(CoordinatorType::Other),
            linked_entities: Vec::new(),
            created_at: None,
        }],
        achievements: vec![Achievement {
            title: "زيارات ميدانية".to_string(),
            description: "زيارة المدارس".to_string(),
            current_value: 3.0,
            target_value: 4.0,
            status: AchievementStatus::InProgress,
            created_at: None,
        }],
        inserted: Mutex::new(Vec::new()),
    }
}

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn app_with(gateway: Arc<dyn DataGateway>) -> Router {
    router(AppState {
        db: setup_test_db().await,
        gateway,
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_form(app: &Router, uri: &str, form: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing location")
        .to_str()
        .unwrap()
        .to_string()
}

async fn open_draft(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/register").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
}

#[tokio::test]
async fn test_health() {
    let app = app_with(Arc::new(UnconfiguredGateway)).await;
    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_department_registration_flow() {
    let gateway = Arc::new(fake_gateway());
    let app = app_with(gateway.clone()).await;

    let draft = open_draft(&app).await;
    assert!(draft.starts_with("/register/"));

    let (status, html) = get(&app, &draft).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"id="submitBtn" class="btn btn-secondary" disabled"#));

    let form = format!(
        "civil_record=1234567890&name={}&phone_number=0551234567&coordinator_type=department",
        urlencoding::encode("هند")
    );
    let response = post_form(&app, &format!("{}/fields", draft), &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), draft);

    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(r#"id="department_selection""#));
    assert!(html.contains("قسم 3"));

    post_form(&app, &format!("{}/departments", draft), "department_id=1").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(">1/4<"));
    assert!(html.contains(r#"id="submitBtn" class="btn btn-primary""#));

    // duplicate link surfaces a one-shot warning
    post_form(&app, &format!("{}/departments", draft), "department_id=1").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains("هذا القسم مربوط بالفعل"));
    assert!(html.contains(">1/4<"));
    let (_, html) = get(&app, &draft).await;
    assert!(!html.contains("هذا القسم مربوط بالفعل"));

    let response = post_form(&app, &format!("{}/submit", draft), "").await;
    assert_eq!(response.status(), StatusCode::OK);

    let inserted = gateway.inserted.lock().unwrap().clone();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].name, "هند");
    assert_eq!(inserted[0].coordinator_type, CoordinatorType::Department);
    assert_eq!(inserted[0].linked_entities[0].id, "1");
    assert_eq!(inserted[0].linked_entities[0].kind, EntityKind::Department);

    let (status, _) = get(&app, &draft).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_school_search_and_mode_switch() {
    let gateway = Arc::new(fake_gateway());
    let app = app_with(gateway.clone()).await;
    let draft = open_draft(&app).await;

    let form = "civil_record=1234567890&name=Huda&phone_number=0551234567&coordinator_type=school";
    post_form(&app, &format!("{}/fields", draft), form).await;

    post_form(&app, &format!("{}/schools/search", draft), "statistical_number=").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains("يرجى إدخال الرقم الإحصائي"));

    post_form(&app, &format!("{}/schools/search", draft), "statistical_number=9999").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains("لم يتم العثور على مدرسة بهذا الرقم الإحصائي"));

    post_form(&app, &format!("{}/schools/search", draft), "statistical_number=1003").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains("School 3"));

    post_form(&app, &format!("{}/schools", draft), "school_id=s3").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(">1/4<"));

    post_form(&app, &format!("{}/entities/0/remove", draft), "").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(">0/4<"));

    post_form(&app, &format!("{}/schools/search", draft), "statistical_number=1003").await;
    post_form(&app, &format!("{}/schools", draft), "school_id=s3").await;
    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(">1/4<"));

    let form = "civil_record=1234567890&name=Huda&phone_number=0551234567&coordinator_type=other";
    post_form(&app, &format!("{}/fields", draft), form).await;
    let (_, html) = get(&app, &draft).await;
    assert!(!html.contains(r#"id="entities_section""#));
    assert!(html.contains(r#"id="submitBtn" class="btn btn-primary""#));

    post_form(&app, &format!("{}/submit", draft), "").await;
    let inserted = gateway.inserted.lock().unwrap().clone();
    assert_eq!(inserted.len(), 1);
    assert!(inserted[0].linked_entities.is_empty());
}

#[tokio::test]
async fn test_submit_uses_fields_posted_with_it() {
    let gateway = Arc::new(fake_gateway());
    let app = app_with(gateway.clone()).await;
    let draft = open_draft(&app).await;

    let form = "civil_record=1234567890&name=Huda&phone_number=0551234567&coordinator_type=other";
    post_form(&app, &format!("{}/fields", draft), form).await;

    // edited but never saved through /fields
    let form = "civil_record=1234567890&name=Huda+Ali&phone_number=0559999999&coordinator_type=other";
    let response = post_form(&app, &format!("{}/submit", draft), form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let inserted = gateway.inserted.lock().unwrap().clone();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].name, "Huda Ali");
    assert_eq!(inserted[0].phone_number, "0559999999");
}

#[tokio::test]
async fn test_link_applies_unsaved_fields_first() {
    let gateway = Arc::new(fake_gateway());
    let app = app_with(gateway.clone()).await;
    let draft = open_draft(&app).await;

    let form = "civil_record=1234567890&name=Huda&phone_number=0551234567&coordinator_type=department&department_id=2";
    post_form(&app, &format!("{}/departments", draft), form).await;

    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(r#"value="Huda""#));
    assert!(html.contains(">1/4<"));
    assert!(html.contains(r#"id="submitBtn" class="btn btn-primary""#));

    // an invalid edit posted with submit is kept on the draft
    let form = "civil_record=1234567890&name=Huda&phone_number=12&coordinator_type=department";
    let response = post_form(&app, &format!("{}/submit", draft), form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(gateway.inserted.lock().unwrap().is_empty());

    let (_, html) = get(&app, &draft).await;
    assert!(html.contains(r#"value="12""#));
    assert!(html.contains(">1/4<"));
}

#[tokio::test]
async fn test_submit_refused_when_form_invalid() {
    let app = app_with(Arc::new(fake_gateway())).await;
    let draft = open_draft(&app).await;

    let form = "civil_record=123&name=Huda&phone_number=0551234567&coordinator_type=other";
    post_form(&app, &format!("{}/fields", draft), form).await;

    let response = post_form(&app, &format!("{}/submit", draft), "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_without_gateway_keeps_draft() {
    let app = app_with(Arc::new(UnconfiguredGateway)).await;
    let draft = open_draft(&app).await;

    let (_, html) = get(&app, &draft).await;
    assert!(html.contains("لا توجد أقسام متاحة"));

    let form = "civil_record=1234567890&name=Huda&phone_number=0551234567&coordinator_type=other";
    post_form(&app, &format!("{}/fields", draft), form).await;

    let response = post_form(&app, &format!("{}/submit", draft), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, html) = get(&app, &draft).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("خطأ في الاتصال بقاعدة البيانات"));
    assert!(html.contains(r#"value="Huda""#));
}

#[tokio::test]
async fn test_unknown_draft_is_not_found() {
    let app = app_with(Arc::new(fake_gateway())).await;
    let (status, _) = get(&app, "/register/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = post_form(&app, "/register/missing/departments", "department_id=1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_directory_search_and_pages() {
    let app = app_with(Arc::new(fake_gateway())).await;

    let (status, html) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<td>School 1</td>"));
    assert!(!html.contains("<td>School 11</td>"));

    let (_, html) = get(&app, "/?page=3").await;
    assert!(html.contains("<tr><td>21</td><td>School 21</td>"));

    // out of range stays on the first page
    let (_, html) = get(&app, "/?page=9").await;
    assert!(html.contains("<tr><td>1</td><td>School 1</td>"));

    let (_, html) = get(&app, &format!("/?q={}", urlencoding::encode("جدة"))).await;
    assert!(html.contains("<td>School 1</td>"));
    assert!(!html.contains("<td>School 2</td>"));

    let (_, html) = get(&app, "/?q=1024").await;
    assert!(html.contains("<td>School 24</td>"));
    assert!(!html.contains(r#"class="pagination"#));
}

#[tokio::test]
async fn test_directory_without_gateway_is_empty() {
    let app = app_with(Arc::new(UnconfiguredGateway)).await;
    let (status, html) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("لا توجد مدارس"));
}

#[tokio::test]
async fn test_login_achievements_and_logout() {
    let app = app_with(Arc::new(fake_gateway())).await;

    let response = post_form(&app, "/login", "civil_record=1234567890&phone_number=0500000000").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8(bytes.to_vec()).unwrap().contains("بيانات تسجيل الدخول غير صحيحة"));

    let response = post_form(&app, "/login", "civil_record=1234567890&phone_number=0512345678").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/achievements");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("coordinator_session="));

    let achievements = |cookie: Option<String>| {
        let app = app.clone();
        async move {
            let mut request = Request::builder().uri("/achievements");
            if let Some(cookie) = cookie {
                request = request.header(header::COOKIE, cookie);
            }
            let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            String::from_utf8(bytes.to_vec()).unwrap()
        }
    };

    let html = achievements(Some(cookie.clone())).await;
    assert!(html.contains("سارة"));
    assert!(html.contains("width: 75.0%"));
    assert!(html.contains("قيد التنفيذ"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = achievements(Some(cookie)).await;
    assert!(!html.contains("سارة"));

    let html = achievements(None).await;
    assert!(html.contains("زيارات ميدانية"));
}
