mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_text, session_cookie, TestApp, STAFF_PASSWORD, STAFF_USERNAME};
use serde_json::json;

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_landing_without_gira_shows_instructions_and_disabled_form() {
    let app = TestApp::new().await;

    let res = app.request(Request::builder().uri("/").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let html = body_text(res).await;
    assert!(html.contains("Instruções para Agendamento"));
    assert!(html.contains("No momento não há gira aberta para agendamento."));
    assert!(html.contains("<fieldset disabled>"));
}

#[tokio::test]
async fn test_booking_page_shows_gira_and_remaining() {
    let app = TestApp::new().await;
    app.open_gira(12).await;

    let res = app.request(Request::builder().uri("/agendar").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let html = body_text(res).await;
    assert!(html.contains("Gira de Caboclo"));
    assert!(html.contains("<strong data-remaining>12</strong>"));
    assert!(!html.contains("<fieldset disabled>"));
    assert!(html.contains("data-sold-out hidden"));
}

#[tokio::test]
async fn test_booking_pages_follow_the_gira_feed() {
    let app = TestApp::new().await;
    let gira_id = app.open_gira(3).await;

    for uri in ["/", "/agendar"] {
        let html = body_text(app.request(Request::builder().uri(uri).body(Body::empty()).unwrap()).await).await;
        assert!(html.contains("new EventSource('/api/v1/giras/events')"), "{} lacks the feed", uri);
        assert!(html.contains("addEventListener('booking_count_changed'"));
        assert!(html.contains("addEventListener('gira_updated'"));
        assert!(html.contains(&format!("data-gira-id=\"{}\"", gira_id)));
    }
}

#[tokio::test]
async fn test_form_submission_confirms_and_clears_form() {
    let app = TestApp::new().await;
    let gira_id = app.open_gira(2).await;

    let res = app.request(form_post(
        "/agendar",
        &format!("gira_id={}&name=Ana+Clara&phone=&email=&first_visit=nao&notes=", gira_id),
    )).await;
    assert_eq!(res.status(), StatusCode::OK);

    let html = body_text(res).await;
    assert!(html.contains("Seu agendamento foi realizado com sucesso para a gira ativa."));
    assert!(html.contains("<strong data-remaining>1</strong>"));
    assert!(!html.contains("value=\"Ana Clara\""));
    assert_eq!(app.booking_count(&gira_id).await, 1);
}

#[tokio::test]
async fn test_form_errors_keep_input_and_show_message() {
    let app = TestApp::new().await;
    let gira_id = app.open_gira(2).await;

    let res = app.request(form_post("/", "name=&phone=32999990000")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let html = body_text(res).await;
    assert!(html.contains("Por favor, preencha seu nome."));
    assert!(html.contains("value=\"32999990000\""));
    assert_eq!(app.booking_count(&gira_id).await, 0);

    app.request(form_post("/", "name=Ana")).await;
    let res = app.request(form_post("/", "name=ANA")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let html = body_text(res).await;
    assert!(html.contains("Já encontramos um agendamento em seu nome para esta gira."));
    assert!(html.contains("value=\"ANA\""));
}

#[tokio::test]
async fn test_sold_out_page_disables_form() {
    let app = TestApp::new().await;
    app.open_gira(1).await;
    app.book(json!({ "name": "Ana" })).await;

    let html = body_text(app.request(Request::builder().uri("/agendar").body(Body::empty()).unwrap()).await).await;
    assert!(html.contains("As vagas para esta gira estão esgotadas."));
    assert!(!html.contains("data-sold-out hidden"));
    assert!(html.contains("<fieldset disabled>"));
}

#[tokio::test]
async fn test_admin_page_login_flow() {
    let app = TestApp::new().await;
    let gira_id = app.open_gira(5).await;
    app.book(json!({ "name": "Ana", "notes": "Primeira vez" })).await;

    let res = app.request(Request::builder().uri("/admin").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Acesso restrito"));

    let res = app.request(form_post("/admin/login", &format!("username={}&password=errada", STAFF_USERNAME))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(res).await.contains("Usuário ou senha inválidos."));

    let res = app.request(form_post(
        "/admin/login",
        &format!("username={}&password={}", STAFF_USERNAME, STAFF_PASSWORD),
    )).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/admin");
    let token = session_cookie(&res).expect("session cookie");

    let res = app.request(
        Request::builder()
            .uri(format!("/admin?gira={}", gira_id))
            .header(header::COOKIE, format!("staff_session={}", token))
            .body(Body::empty())
            .unwrap()
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains("Área administrativa"));
    assert!(html.contains("<strong data-booked>1</strong>"));
    assert!(html.contains("Primeira vez"));
    assert!(html.contains(&format!("/api/v1/admin/giras/{}/export.csv", gira_id)));
    // A blank type on the edit form must reach the server as "" to clear it.
    assert!(html.contains("payload(update, true)"));
}

#[tokio::test]
async fn test_admin_logout_checks_csrf_and_clears_cookie() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let mut forged = form_post("/admin/logout", "csrf_token=forged");
    forged.headers_mut().insert(header::COOKIE, auth.cookie().parse().unwrap());
    assert_eq!(app.request(forged).await.status(), StatusCode::FORBIDDEN);

    let mut logout = form_post("/admin/logout", &format!("csrf_token={}", auth.csrf_token));
    logout.headers_mut().insert(header::COOKIE, auth.cookie().parse().unwrap());
    let res = app.request(logout).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(session_cookie(&res).as_deref(), Some(""));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let app = TestApp::new().await;

    let res = app.request(Request::builder().uri("/nao-existe").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(res).await.contains("Página não encontrada"));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let res = app.request(Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::parse_body(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
