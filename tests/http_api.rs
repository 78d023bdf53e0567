#[path = "common/mod.rs"]
mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for oneshot

use bson::doc;
use inmocrm::{
    plan::MAX_CUOTAS,
    routes,
    state::{create_company, create_propuesta},
};

fn build_app(ctx: &common::TestContext) -> Router {
    routes::router(Arc::new(ctx.state.clone()))
}

fn request(method: &str, uri: &str, tenant: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = tenant {
        builder = builder.header("x-tenant", t);
    }
    match body {
        Some(b) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn tenant_is_required() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let (status, _) = send(&app, request("GET", "/api/planes", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, request("GET", "/api/planes", Some("nadie"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, request("GET", "/api/empresa", Some("demo"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "demo");

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn calcular_returns_summary_or_empty_state() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let payload = json!({
        "precio_total": 200000,
        "detalle": {
            "reserva": {"tipo": "porcentaje", "valor": 5},
            "separacion": {"tipo": "porcentaje", "valor": 5},
            "inicial": {"tipo": "porcentaje", "valor": 20, "cuotas": 4},
            "contra_entrega": {"tipo": "porcentaje", "valor": 70},
            "financiamiento": {"tipo": "bancario", "porcentaje": 0}
        }
    });
    let (status, body) = send(
        &app,
        request("POST", "/api/planes/calcular", Some("demo"), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moneda"], "USD");
    assert_eq!(body["resumen"]["total"], 200000.0);
    assert_eq!(body["resumen"]["cuotaInicial"], 10000.0);
    assert_eq!(body["cobertura"]["estado"], "completa");
    assert_eq!(body["formateado"]["contra_entrega"], "$140,000");
    assert_eq!(body["cronograma_inicial"].as_array().unwrap().len(), 4);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/planes/calcular",
            Some("demo"),
            Some(json!({"precio_total": 0, "detalle": {}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["resumen"].is_null());

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn plan_lifecycle_over_http() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/planes",
            Some("demo"),
            Some(json!({"nombre": "Plan HTTP", "precio_total": 100000})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["detalle"]["inicial"]["cuotas"], 1);

    let cambios = json!([
        {"campo": "valor", "valor": {"concepto": "inicial", "valor": 20}},
        {"campo": "cuotas", "valor": 4},
        {"campo": "valor", "valor": {"concepto": "contra_entrega", "valor": 70}}
    ]);
    let (status, vista) = send(
        &app,
        request("POST", &format!("/api/planes/{id}/cambios"), Some("demo"), Some(cambios)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vista["resumen"]["inicial"], 20000.0);
    assert_eq!(vista["resumen"]["cuotaInicial"], 5000.0);
    assert_eq!(vista["cobertura"]["estado"], "faltante");
    assert_eq!(vista["cobertura"]["monto"], 10000.0);

    let (status, resumen) = send(
        &app,
        request("GET", &format!("/api/planes/{id}/resumen"), Some("demo"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumen["resumen"]["total"], 90000.0);

    let page = app
        .clone()
        .oneshot(request("GET", &format!("/planes/{id}"), Some("demo"), None))
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = to_bytes(page.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("Plan HTTP"));
    assert!(html.contains("$10,000"));

    // other tenants cannot see the plan
    create_company(&ctx.state, "Otra", "otra", "USD").await.unwrap();
    let (status, _) = send(
        &app,
        request("GET", &format!("/api/planes/{id}"), Some("otra"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/api/planes/{id}"), Some("demo"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
        &app,
        request("GET", &format!("/api/planes/{id}"), Some("demo"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("GET", "/api/planes/not-an-id", Some("demo"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn page_without_price_shows_empty_state() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let (_, created) = send(
        &app,
        request("POST", "/api/planes", Some("demo"), Some(json!({"nombre": "Sin precio"}))),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let page = app
        .clone()
        .oneshot(request("GET", &format!("/planes/{id}"), Some("demo"), None))
        .await
        .unwrap();
    let html = to_bytes(page.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("Configura el precio total"));

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn kanban_move_and_preferences() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let (status, tablero) = send(&app, request("GET", "/api/tablero", Some("demo"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let prospecto = &tablero["columnas"][0];
    assert_eq!(prospecto["etapa"], "prospecto");
    let id = prospecto["tarjetas"][0]["id"].as_str().unwrap().to_string();

    let (status, tablero) = send(
        &app,
        request(
            "POST",
            &format!("/api/propuestas/{id}/etapa"),
            Some("demo"),
            Some(json!({"etapa": "contactado"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tablero["columnas"][1]["tarjetas"][0]["id"], id.as_str());

    let (_, propuesta) = send(
        &app,
        request("GET", &format!("/api/propuestas/{id}"), Some("demo"), None),
    )
    .await;
    assert_eq!(propuesta["etapa"], "contactado");

    let (status, propuesta) = send(
        &app,
        request(
            "PUT",
            &format!("/api/propuestas/{id}/purge"),
            Some("demo"),
            Some(json!({"poder": 5, "urgencia": 5, "recursos": 4, "genuino": 9, "expectativas": 3})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(propuesta["purge_total"], 22);
    assert_eq!(propuesta["nivel"], "caliente");

    let (_, prefs) = send(&app, request("GET", "/api/preferencias/ana", Some("demo"), None)).await;
    assert_eq!(prefs["vista_propuestas"], "kanban");
    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/preferencias/ana",
            Some("demo"),
            Some(json!({"vista_actividades": "lista", "vista_propuestas": "lista"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, prefs) = send(&app, request("GET", "/api/preferencias/Ana", Some("demo"), None)).await;
    assert_eq!(prefs["vista_actividades"], "lista");

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn invalid_plan_input_is_rejected() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/planes",
            Some("demo"),
            Some(json!({"nombre": "Negativo", "precio_total": -1})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/planes",
            Some("demo"),
            Some(json!({"nombre": "Valido", "precio_total": 50000})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/planes/{id}"),
            Some("demo"),
            Some(json!({"nombre": "Valido", "precio_total": -500})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a rejected edit batch leaves the stored plan untouched
    let cambios = json!([
        {"campo": "valor", "valor": {"concepto": "reserva", "valor": 10}},
        {"campo": "precio_total", "valor": -1}
    ]);
    let (status, _) = send(
        &app,
        request("POST", &format!("/api/planes/{id}/cambios"), Some("demo"), Some(cambios)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, plan) = send(
        &app,
        request("GET", &format!("/api/planes/{id}"), Some("demo"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["precio_total"], 50000.0);
    assert_eq!(plan["detalle"]["reserva"]["valor"], 0.0);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn installment_count_above_limit_is_rejected() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);
    let demasiadas = u32::MAX;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/planes/calcular",
            Some("demo"),
            Some(json!({
                "precio_total": 100000,
                "detalle": {"inicial": {"tipo": "porcentaje", "valor": 20, "cuotas": demasiadas}}
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/planes",
            Some("demo"),
            Some(json!({
                "nombre": "Demasiadas cuotas",
                "precio_total": 100000,
                "detalle": {"inicial": {"tipo": "porcentaje", "valor": 20, "cuotas": demasiadas}}
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, created) = send(
        &app,
        request(
            "POST",
            "/api/planes",
            Some("demo"),
            Some(json!({"nombre": "Cuotas", "precio_total": 100000})),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/planes/{id}/cambios"),
            Some("demo"),
            Some(json!([{"campo": "cuotas", "valor": demasiadas}])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the limit itself is accepted
    let (status, vista) = send(
        &app,
        request(
            "POST",
            &format!("/api/planes/{id}/cambios"),
            Some("demo"),
            Some(json!([
                {"campo": "valor", "valor": {"concepto": "inicial", "valor": 20}},
                {"campo": "cuotas", "valor": MAX_CUOTAS}
            ])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        vista["cronograma_inicial"].as_array().unwrap().len(),
        MAX_CUOTAS as usize
    );

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn plan_cannot_link_other_tenants_proposal() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    let otra = create_company(&ctx.state, "Otra", "otra", "USD").await.unwrap();
    let ajena = create_propuesta(&ctx.state, &otra, "Casa ajena", "Luis", 90000.0, "")
        .await
        .unwrap();

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/planes",
            Some("demo"),
            Some(json!({
                "nombre": "Plan cruzado",
                "precio_total": 90000,
                "propuesta_id": ajena.to_hex()
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn inactive_tenant_is_unauthorized() {
    let ctx = match common::setup_state().await {
        Some(s) => s,
        None => return,
    };
    let app = build_app(&ctx);

    create_company(&ctx.state, "Cerrada", "cerrada", "USD").await.unwrap();
    let (status, _) = send(&app, request("GET", "/api/empresa", Some("cerrada"), None)).await;
    assert_eq!(status, StatusCode::OK);

    ctx.state
        .companies
        .update_one(doc! { "slug": "cerrada" }, doc! { "$set": { "is_active": false } })
        .await
        .unwrap();
    let (status, _) = send(&app, request("GET", "/api/empresa", Some("cerrada"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::teardown(Some(ctx)).await;
}
