use std::sync::Arc;

use agenda_client::{
    ApiClient, ApiError, AuthBackend, ClientOptions, EventQuery, NoAuth, StaticToken, StoredToken,
};
use agenda_core::{
    EventStatus, LoginRequest, RegisterRequest, RejectionReason, Role, UpdateEventRequest,
};
use agenda_kv::{MemoryStore, tokens};
use httpmock::prelude::*;
use serde_json::json;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(
        ClientOptions {
            base_url: server.base_url(),
            retries: 1,
        },
        Arc::new(NoAuth),
    )
}

fn wire_event(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Sarau de Poesia",
        "description": "Leituras abertas ao público",
        "location": "Biblioteca Municipal",
        "startDate": "2024-03-15T19:00:00.000Z",
        "endDate": "2024-03-15T22:00:00.000Z",
        "requiresRegistration": true,
        "status": status,
        "promoterId": "p1",
        "_count": {"registrations": 7},
        "createdAt": "2024-02-01T10:00:00.000Z"
    })
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_posts_senha_and_normalizes_user() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/entrar")
                .json_body(json!({"email": "ana@exemplo.com", "senha": "segredo"}));
            then.status(200).json_body(json!({
                "token": "jwt-1",
                "user": {"id": "u1", "name": "Ana", "email": "ana@exemplo.com", "role": "USER"},
                "permissions": ["user"]
            }));
        })
        .await;

    let api = client(&server);
    let resp = api
        .auth()
        .login(&LoginRequest {
            email: "ana@exemplo.com".into(),
            password: "segredo".into(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.token, "jwt-1");
    assert_eq!(resp.user.name, "Ana");
    assert_eq!(resp.user.role, Role::Ordinary);
    assert!(resp.user.has_permission("user"));
}

#[tokio::test]
async fn login_failure_surfaces_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/entrar");
            then.status(401).json_body(json!({"message": "Credenciais inválidas"}));
        })
        .await;

    let err = client(&server)
        .login(&LoginRequest {
            email: "a@b.c".into(),
            password: "errada".into(),
        })
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("Erro ao fazer login"), "Credenciais inválidas");
}

#[tokio::test]
async fn register_posts_name_email_senha() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/entrar/registrar").json_body(json!({
                "name": "Bia",
                "email": "bia@exemplo.com",
                "senha": "segredo1"
            }));
            then.status(201).json_body(json!({
                "token": "jwt-2",
                "refreshToken": "r-2",
                "user": {"id": "u2", "name": "Bia", "email": "bia@exemplo.com", "role": "USER"}
            }));
        })
        .await;

    let resp = client(&server)
        .auth()
        .register(&RegisterRequest {
            name: "Bia".into(),
            email: "bia@exemplo.com".into(),
            password: "segredo1".into(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.token, "jwt-2");
    assert_eq!(resp.user.id, "u2");
}

#[tokio::test]
async fn current_user_sends_bearer_and_infers_permissions() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/auth/me")
                .header("authorization", "Bearer jwt-9");
            then.status(200)
                .json_body(json!({"id": "a1", "name": "Root", "role": "ADMIN"}));
        })
        .await;

    let api = ApiClient::new(
        ClientOptions {
            base_url: server.base_url(),
            retries: 0,
        },
        Arc::new(StaticToken::new("jwt-9")),
    );
    let user = api.current_user().await.unwrap();

    mock.assert_async().await;
    assert_eq!(user.role, Role::Admin);
    assert!(user.has_permission("admin"));
}

#[tokio::test]
async fn stored_token_is_read_per_request() {
    let server = MockServer::start_async().await;
    let authed = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/logout")
                .header("authorization", "Bearer from-store");
            then.status(204);
        })
        .await;

    let store = Arc::new(MemoryStore::new());
    let api = ApiClient::new(
        ClientOptions {
            base_url: server.base_url(),
            retries: 1,
        },
        Arc::new(StoredToken::new(store.clone())),
    );

    tokens::write_tokens(store.as_ref(), "from-store", None).unwrap();
    api.auth().logout().await.unwrap();
    authed.assert_async().await;
}

// ── Eventos ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_forwards_filters_and_reads_paged_shape() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/eventos")
                .query_param("search", "jazz")
                .query_param("status", "APPROVED")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "events": [wire_event("e1", "APPROVED")],
                "pagination": {"page": 2, "limit": 10, "total": 11, "totalPages": 2}
            }));
        })
        .await;

    let page = client(&server)
        .eventos()
        .list(&EventQuery {
            search: Some("jazz".into()),
            status: Some(EventStatus::Approved),
            page: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.pagination.total, 11);
    assert_eq!(page.events.len(), 1);
    let ev = &page.events[0];
    assert_eq!(ev.title, "Sarau de Poesia");
    assert_eq!(ev.registrant_count, 7);
    assert!(ev.requires_registration);
}

#[tokio::test]
async fn list_accepts_bare_array() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/eventos");
            then.status(200)
                .json_body(json!([wire_event("e1", "APPROVED"), wire_event("e2", "PENDING")]));
        })
        .await;

    let page = client(&server)
        .eventos()
        .list(&EventQuery::default())
        .await
        .unwrap();
    assert_eq!(page.events.len(), 2);
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.pagination.total_pages, 1);
}

#[tokio::test]
async fn get_retries_once_on_server_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/eventos/e1");
            then.status(503).body("unavailable");
        })
        .await;

    let err = client(&server).eventos().get("e1").await.unwrap_err();

    mock.assert_hits_async(2).await;
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn writes_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/eventos/e1/cancelar");
            then.status(500);
        })
        .await;

    let err = client(&server).eventos().cancel("e1").await.unwrap_err();

    mock.assert_hits_async(1).await;
    assert!(matches!(err, ApiError::Server { status: 500, .. }));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/eventos/missing");
            then.status(404).json_body(json!({"message": "Evento não encontrado"}));
        })
        .await;

    let err = client(&server).eventos().get("missing").await.unwrap_err();
    mock.assert_hits_async(1).await;
    assert_eq!(err.user_message("Erro"), "Evento não encontrado");
}

#[tokio::test]
async fn reject_sends_trimmed_reason() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/eventos/e1/rejeitar")
                .json_body(json!({"rejectionReason": "Falta alvará"}));
            then.status(200).json_body(json!({
                "id": "e1", "status": "REJECTED", "rejectionReason": "Falta alvará"
            }));
        })
        .await;

    let reason = RejectionReason::new("  Falta alvará  ").unwrap();
    let ev = client(&server).eventos().reject("e1", &reason).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ev.status, EventStatus::Rejected);
    assert_eq!(ev.rejection_reason.as_deref(), Some("Falta alvará"));
}

#[tokio::test]
async fn update_sends_only_changed_fields() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/eventos/e1")
                .json_body(json!({"title": "Novo título", "imageUrl": null}));
            then.status(200).json_body(wire_event("e1", "PENDING"));
        })
        .await;

    let req = UpdateEventRequest {
        title: Some("Novo título".into()),
        image_url: Some(None),
        ..Default::default()
    };
    client(&server).eventos().update("e1", &req).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/eventos/e1");
            then.status(204);
        })
        .await;

    client(&server).eventos().delete("e1").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn approve_and_revoke_hit_their_routes() {
    let server = MockServer::start_async().await;
    let approve = server
        .mock_async(|when, then| {
            when.method(PUT).path("/eventos/e1/aprovar");
            then.status(200).json_body(wire_event("e1", "APPROVED"));
        })
        .await;
    let revoke = server
        .mock_async(|when, then| {
            when.method(PUT).path("/eventos/e1/revogar");
            then.status(200).json_body(wire_event("e1", "PENDING"));
        })
        .await;

    let api = client(&server);
    let ev = api.eventos().approve("e1").await.unwrap();
    assert_eq!(ev.status, EventStatus::Approved);
    let ev = api.eventos().revoke("e1").await.unwrap();
    assert_eq!(ev.status, EventStatus::Pending);

    approve.assert_async().await;
    revoke.assert_async().await;
}

#[tokio::test]
async fn mine_forwards_status_filter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/eventos/meus")
                .query_param("status", "REJECTED");
            then.status(200).json_body(json!([wire_event("e3", "REJECTED")]));
        })
        .await;

    let page = client(&server)
        .eventos()
        .mine(&EventQuery {
            status: Some(EventStatus::Rejected),
            ..Default::default()
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.events.len(), 1);
    assert_eq!(page.events[0].status, EventStatus::Rejected);
}

#[tokio::test]
async fn pending_lists_review_queue() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/eventos/pendentes");
            then.status(200).json_body(json!({
                "events": [wire_event("e4", "PENDING"), wire_event("e5", "PENDING")],
                "pagination": {"page": 1, "limit": 10, "total": 2, "totalPages": 1}
            }));
        })
        .await;

    let page = client(&server)
        .eventos()
        .pending(&EventQuery::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.events.len(), 2);
    assert!(page.events.iter().all(|e| e.status == EventStatus::Pending));
}

// ── Other resources ─────────────────────────────────────────────────

#[tokio::test]
async fn saved_events_unwrap_data_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/eventos-salvos");
            then.status(200).json_body(json!({"data": [
                {"id": "s1", "eventId": "e1", "userId": "u1", "event": wire_event("e1", "APPROVED")}
            ]}));
        })
        .await;

    let saved = client(&server).eventos_salvos().list().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].event_id, "e1");
    assert_eq!(saved[0].event.as_ref().map(|e| e.title.as_str()), Some("Sarau de Poesia"));
}

#[tokio::test]
async fn register_for_event_posts_event_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/inscricoes")
                .json_body(json!({"eventId": "e1"}));
            then.status(201)
                .json_body(json!({"id": "i1", "eventoId": "e1", "usuarioId": "u1"}));
        })
        .await;

    let reg = client(&server).inscricoes().register("e1").await.unwrap();
    mock.assert_async().await;
    assert_eq!(reg.event_id, "e1");
    assert_eq!(reg.user_id, "u1");
}

#[tokio::test]
async fn promoter_request_returns_message_and_user() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/promoters/solicitar");
            then.status(200).json_body(json!({
                "message": "Solicitação registrada",
                "user": {"id": "u1", "name": "Ana", "role": "USER", "promoterStatus": "PENDING"}
            }));
        })
        .await;

    let outcome = client(&server).request_promoter().await.unwrap();
    assert_eq!(outcome.message.as_deref(), Some("Solicitação registrada"));
    assert_eq!(outcome.user.name, "Ana");
    assert!(outcome.user.approved_at.is_none());
}

#[tokio::test]
async fn pending_promoters_unwrap_resource_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/promoters/pendentes");
            then.status(200).json_body(json!({"promoters": [
                {"id": "u1", "name": "Ana", "role": "USER"},
                {"id": "u2", "name": "Bia", "role": "USER"}
            ]}));
        })
        .await;

    let pending = client(&server).promoters().pending().await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[1].name, "Bia");
}

#[tokio::test]
async fn admin_stats_decode() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/stats");
            then.status(200).json_body(json!({
                "totalEventos": 4,
                "totalUsuarios": 20,
                "eventosPorStatus": {"PENDING": 1, "APPROVED": 3, "REJECTED": 0, "CANCELLED": 0}
            }));
        })
        .await;

    let stats = client(&server).stats().overview().await.unwrap();
    assert_eq!(stats.total_eventos, 4);
    assert_eq!(stats.total_usuarios, 20);
    assert_eq!(stats.eventos_por_status.approved, 3);
}

#[tokio::test]
async fn removing_saved_event_and_registration_use_event_id() {
    let server = MockServer::start_async().await;
    let saved = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/eventos-salvos/e1");
            then.status(204);
        })
        .await;
    let registration = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/inscricoes/e1");
            then.status(200).json_body(json!({"message": "Inscrição cancelada"}));
        })
        .await;

    let api = client(&server);
    api.eventos_salvos().remove("e1").await.unwrap();
    api.inscricoes().cancel("e1").await.unwrap();

    saved.assert_async().await;
    registration.assert_async().await;
}

#[tokio::test]
async fn my_registrations_unwrap_resource_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/inscricoes/meus");
            then.status(200).json_body(json!({"inscricoes": [
                {"id": "i1", "eventId": "e1", "userId": "u1", "event": wire_event("e1", "APPROVED")}
            ]}));
        })
        .await;

    let regs = client(&server).inscricoes().mine().await.unwrap();
    mock.assert_async().await;
    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0].event_id, "e1");
    assert_eq!(regs[0].event.as_ref().map(|e| e.registrant_count), Some(7));
}

#[tokio::test]
async fn registrants_of_an_event() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/inscricoes/e1/inscritos");
            then.status(200).json_body(json!([
                {"id": "i1", "eventoId": "e1", "usuarioId": "u1"},
                {"id": "i2", "eventoId": "e1", "usuarioId": "u2"}
            ]));
        })
        .await;

    let regs = client(&server).inscricoes().registrants("e1").await.unwrap();
    mock.assert_async().await;
    let users: Vec<&str> = regs.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(users, ["u1", "u2"]);
}

#[tokio::test]
async fn promoter_review_posts_to_user_routes() {
    let server = MockServer::start_async().await;
    let approve = server
        .mock_async(|when, then| {
            when.method(POST).path("/promoters/u1/aprovar");
            then.status(200).json_body(json!({
                "id": "u1", "name": "Ana", "role": "PROMOTER",
                "approvedAt": "2024-03-01T10:00:00.000Z"
            }));
        })
        .await;
    let reject = server
        .mock_async(|when, then| {
            when.method(POST).path("/promoters/u2/rejeitar");
            then.status(200)
                .json_body(json!({"id": "u2", "name": "Bia", "role": "USER"}));
        })
        .await;

    let api = client(&server);
    let ana = api.promoters().approve("u1").await.unwrap();
    assert!(ana.approved_at.is_some());
    let bia = api.promoters().reject("u2").await.unwrap();
    assert_eq!(bia.role, Role::Ordinary);

    approve.assert_async().await;
    reject.assert_async().await;
}
