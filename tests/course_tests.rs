// tests/course_tests.rs

use coursedeck::{config::Config, routes, state::AppState, store::Store};

async fn spawn_app() -> String {
    let data_dir = std::env::temp_dir().join(format!("coursedeck-test-{}", uuid::Uuid::new_v4()));

    let config = Config {
        data_dir: data_dir.to_string_lossy().into_owned(),
        jwt_secret: "course_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        admin_email: None,
        admin_password: None,
        admin_name: None,
    };

    let store = Store::new(&config.data_dir);
    store.ensure_files().await.unwrap();

    let state = AppState { store, config };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user and returns their bearer token.
async fn register(client: &reqwest::Client, address: &str, email: &str, name: &str) -> String {
    let body: serde_json::Value = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "email": email,
            "password": "password123",
            "name": name
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Registers a user and flips them into teacher mode.
async fn register_teacher(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    name: &str,
) -> String {
    let token = register(client, address, email, name).await;
    client
        .post(format!("{}/api/auth/switch-mode", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    token
}

async fn create_course(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    payload: serde_json::Value,
) -> serde_json::Value {
    let response = client
        .post(format!("{}/api/courses", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn only_teachers_can_create_courses() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let student_token = register(&client, &address, "student@example.com", "Student").await;
    let response = client
        .post(format!("{}/api/courses", address))
        .header("Authorization", format!("Bearer {}", student_token))
        .json(&serde_json::json!({
            "title": "T", "description": "D", "price": 9.99
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Unauthenticated callers get 401 before the teacher check
    let response = client
        .post(format!("{}/api/courses", address))
        .json(&serde_json::json!({
            "title": "T", "description": "D", "price": 9.99
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn create_course_sets_owner_and_zeroed_counters() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_teacher(&client, &address, "teacher@example.com", "Tina Teacher").await;
    let course = create_course(
        &client,
        &address,
        &token,
        serde_json::json!({
            "title": "Rust Basics",
            "description": "Ownership and borrowing",
            "price": 29.99
        }),
    )
    .await;

    assert_eq!(course["instructor"], "Tina Teacher");
    assert_eq!(course["rating"], 0.0);
    assert_eq!(course["reviewCount"], 0);
    assert_eq!(course["enrolledCount"], 0);
    assert_eq!(course["originalPrice"], 29.99);
    assert_eq!(course["category"], "General");
    assert_eq!(course["level"], "beginner");
}

#[tokio::test]
async fn create_course_requires_title_description_price() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_teacher(&client, &address, "teacher@example.com", "Tina").await;

    let response = client
        .post(format!("{}/api/courses", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "title": "No price or description" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn only_the_owner_may_update_or_delete() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let owner = register_teacher(&client, &address, "owner@example.com", "Owner").await;
    let other = register_teacher(&client, &address, "other@example.com", "Other").await;

    let course = create_course(
        &client,
        &address,
        &owner,
        serde_json::json!({ "title": "Mine", "description": "D", "price": 10.0 }),
    )
    .await;
    let course_id = course["id"].as_str().unwrap();

    // Another authenticated teacher: 403
    let response = client
        .put(format!("{}/api/courses/{}", address, course_id))
        .header("Authorization", format!("Bearer {}", other))
        .json(&serde_json::json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .delete(format!("{}/api/courses/{}", address, course_id))
        .header("Authorization", format!("Bearer {}", other))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Unauthenticated: 401
    let response = client
        .put(format!("{}/api/courses/{}", address, course_id))
        .json(&serde_json::json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // The owner succeeds and the merge keeps identity fields intact
    let updated: serde_json::Value = client
        .put(format!("{}/api/courses/{}", address, course_id))
        .header("Authorization", format!("Bearer {}", owner))
        .json(&serde_json::json!({ "title": "Renamed", "price": 12.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["price"], 12.5);
    assert_eq!(updated["instructor"], "Owner");
    assert_eq!(updated["description"], "D");

    // Unknown id: 404
    let response = client
        .put(format!("{}/api/courses/{}", address, uuid::Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", owner))
        .json(&serde_json::json!({ "title": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_cascades_to_enrollments_and_progress() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let owner = register_teacher(&client, &address, "owner@example.com", "Owner").await;
    let student = register(&client, &address, "student@example.com", "Student").await;

    let course = create_course(
        &client,
        &address,
        &owner,
        serde_json::json!({
            "title": "Doomed", "description": "D", "price": 5.0,
            "sections": [
                {"id": "s1", "title": "S1", "lectures": [{"id": "l1", "title": "L1"}]}
            ]
        }),
    )
    .await;
    let course_id = course["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/api/courses/{}/enroll", address, course_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let response = client
        .delete(format!("{}/api/courses/{}", address, course_id))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Purchased list no longer mentions the course
    let purchased: Vec<serde_json::Value> = client
        .get(format!("{}/api/courses/purchased", address))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(purchased.is_empty());

    // ...and the progress row is gone too
    let response = client
        .get(format!("{}/api/courses/{}/progress", address, course_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn instructor_and_students_listing() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let owner = register_teacher(&client, &address, "owner@example.com", "Owner").await;
    let student = register(&client, &address, "student@example.com", "Student").await;

    let course = create_course(
        &client,
        &address,
        &owner,
        serde_json::json!({ "title": "Listed", "description": "D", "price": 5.0 }),
    )
    .await;
    let course_id = course["id"].as_str().unwrap();

    client
        .post(format!("{}/api/courses/{}/enroll", address, course_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap();

    let owned: Vec<serde_json::Value> = client
        .get(format!("{}/api/courses/instructor", address))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0]["id"], course["id"]);

    let students: Vec<serde_json::Value> = client
        .get(format!("{}/api/courses/{}/students", address, course_id))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["email"], "student@example.com");

    // The roster is owner-only
    let response = client
        .get(format!("{}/api/courses/{}/students", address, course_id))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn catalog_pagination_slices_25_courses() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_teacher(&client, &address, "teacher@example.com", "Tina").await;
    for i in 0..25 {
        create_course(
            &client,
            &address,
            &token,
            serde_json::json!({
                "title": format!("Course {}", i),
                "description": "D",
                "price": 1.0
            }),
        )
        .await;
    }

    let page: serde_json::Value = client
        .get(format!("{}/api/catalog/courses?page=3&limit=10", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["courses"].as_array().unwrap().len(), 5);
    assert_eq!(page["total"], 25);
    assert_eq!(page["page"], 3);
    assert_eq!(page["totalPages"], 3);
}

#[tokio::test]
async fn search_matches_case_insensitively_across_fields() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_teacher(&client, &address, "teacher@example.com", "Tina").await;
    create_course(
        &client,
        &address,
        &token,
        serde_json::json!({
            "title": "Python Mastery",
            "description": "From zero to hero",
            "price": 1.0
        }),
    )
    .await;
    create_course(
        &client,
        &address,
        &token,
        serde_json::json!({
            "title": "Woodworking",
            "description": "Hand tools only",
            "price": 1.0
        }),
    )
    .await;

    let page: serde_json::Value = client
        .get(format!("{}/api/catalog/search?q=PYTHON", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let courses = page["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Python Mastery");
}

#[tokio::test]
async fn featured_returns_top_four_by_rating() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let token = register_teacher(&client, &address, "teacher@example.com", "Tina").await;
    for (i, rating) in [1.0, 4.5, 3.0, 5.0, 2.0].iter().enumerate() {
        let course = create_course(
            &client,
            &address,
            &token,
            serde_json::json!({
                "title": format!("Course {}", i),
                "description": "D",
                "price": 1.0
            }),
        )
        .await;
        client
            .put(format!("{}/api/courses/{}", address, course["id"].as_str().unwrap()))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({ "rating": rating }))
            .send()
            .await
            .unwrap();
    }

    let featured: Vec<serde_json::Value> = client
        .get(format!("{}/api/catalog/featured", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(featured.len(), 4);
    assert_eq!(featured[0]["rating"], 5.0);
    assert_eq!(featured[3]["rating"], 2.0);
}

#[tokio::test]
async fn recommended_excludes_enrolled_courses_for_authenticated_callers() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let teacher = register_teacher(&client, &address, "teacher@example.com", "Tina").await;
    let student = register(&client, &address, "student@example.com", "Student").await;

    let a = create_course(
        &client,
        &address,
        &teacher,
        serde_json::json!({ "title": "A", "description": "D", "price": 1.0 }),
    )
    .await;
    create_course(
        &client,
        &address,
        &teacher,
        serde_json::json!({ "title": "B", "description": "D", "price": 1.0 }),
    )
    .await;

    client
        .post(format!("{}/api/courses/{}/enroll", address, a["id"].as_str().unwrap()))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap();

    // Anonymous callers see the whole catalog
    let anonymous: Vec<serde_json::Value> = client
        .get(format!("{}/api/catalog/recommended", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(anonymous.len(), 2);

    // The enrolled student no longer sees course A
    let recommended: Vec<serde_json::Value> = client
        .get(format!("{}/api/catalog/recommended", address))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0]["title"], "B");
}
