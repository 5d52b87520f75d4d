//! Note CRUD endpoints, all behind bearer auth.
//!
//! Update and delete respond 404 whether the note is missing or owned by
//! someone else; the two cases are indistinguishable to the caller.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth;
use crate::errors::ApiError;
use crate::models::NotePayload;
use crate::notes::normalize;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListNotesQuery {
    q: Option<String>,
    tag: Option<String>,
}

async fn list_notes(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListNotesQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &data.jwt_secret)?;

    let q = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let tag = query.tag.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let notes = data
        .db
        .list_notes(&user_id, q, tag)
        .map_err(|e| ApiError::internal("Failed to fetch notes", e))?;

    Ok(HttpResponse::Ok().json(notes))
}

/// Normalize the payload into (text, html, tags), rejecting empty notes.
fn normalized_input(body: &NotePayload) -> Result<(String, String, Vec<String>), ApiError> {
    let text = normalize::resolve_note_text(body.note_text.as_deref(), body.note_html.as_deref())
        .ok_or_else(|| ApiError::Validation("noteText required".to_string()))?;
    let html = body.note_html.clone().unwrap_or_default();
    let tags = normalize::clean_tags(body.tags.clone());
    Ok((text, html, tags))
}

async fn create_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NotePayload>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &data.jwt_secret)?;
    let (text, html, tags) = normalized_input(&body)?;

    let summary = data.summarizer.summarize(&text).await.into_text();

    let note = data
        .db
        .create_note(&user_id, &text, &html, &summary, &tags)
        .map_err(|e| ApiError::internal("Failed to create note", e))?;

    Ok(HttpResponse::Created().json(note))
}

async fn update_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<NotePayload>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &data.jwt_secret)?;
    let note_id = path.into_inner();
    let (text, html, tags) = normalized_input(&body)?;

    let summary = data.summarizer.summarize(&text).await.into_text();

    let note = data
        .db
        .update_note_for_user(&user_id, &note_id, &text, &html, &summary, &tags)
        .map_err(|e| ApiError::internal("Failed to update note", e))?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(HttpResponse::Ok().json(note))
}

async fn delete_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &data.jwt_secret)?;
    let note_id = path.into_inner();

    let deleted = data
        .db
        .delete_note_for_user(&user_id, &note_id)
        .map_err(|e| ApiError::internal("Failed to delete note", e))?;
    if !deleted {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/notes").route(web::get().to(list_notes)));
    cfg.service(web::resource("/api/note").route(web::post().to(create_note)));
    cfg.service(
        web::resource("/api/note/{id}")
            .route(web::put().to(update_note))
            .route(web::delete().to(delete_note)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tokens;
    use crate::db::Database;
    use crate::summarize::Summarizer;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::tempdir;

    const SECRET: &str = "test-secret";

    fn test_state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let path = dir.path().join("test.db");
        let db = Arc::new(Database::new(path.to_str().unwrap()).expect("Failed to open test db"));
        // Unreachable endpoint: long inputs degrade to truncation, short ones
        // never leave the process.
        let summarizer = Arc::new(Summarizer::with_base_url(
            "http://127.0.0.1:9".to_string(),
            "test-model".to_string(),
            None,
        ));
        web::Data::new(AppState {
            db,
            summarizer,
            jwt_secret: SECRET.to_string(),
        })
    }

    fn bearer(user_id: &str) -> (&'static str, String) {
        let token = tokens::issue_token(user_id, SECRET).expect("Failed to issue token");
        ("Authorization", format!("Bearer {}", token))
    }

    /// Create a note through the endpoint. Builds a fresh service over the
    /// shared state; the backing database file is the same.
    async fn create(state: &web::Data<AppState>, user_id: &str, payload: Value) -> Value {
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/note")
            .insert_header(bearer(user_id))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        test::read_body_json(resp).await
    }

    #[actix_web::test]
    async fn test_requests_without_token_are_rejected() {
        let dir = tempdir().unwrap();
        let app = test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/notes").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing token");

        let req = test::TestRequest::post()
            .uri("/api/note")
            .insert_header(("Authorization", "Bearer garbage"))
            .set_json(json!({ "noteText": "hi" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_web::test]
    async fn test_create_derives_text_from_markup() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);

        let note = create(
            &state,
            "u1",
            json!({ "noteText": "", "noteHtml": "<p>Hello <b>world</b></p>", "tags": [] }),
        )
        .await;

        assert_eq!(note["noteText"], "Hello world");
        assert_eq!(note["noteHtml"], "<p>Hello <b>world</b></p>");
        assert_eq!(note["userId"], "u1");
        // Short text: the summary is the text itself
        assert_eq!(note["summary"], "Hello world");
    }

    #[actix_web::test]
    async fn test_create_with_nothing_to_store_is_rejected() {
        let dir = tempdir().unwrap();
        let app = test::init_service(App::new().app_data(test_state(&dir)).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/note")
            .insert_header(bearer("u1"))
            .set_json(json!({ "noteText": "  ", "noteHtml": "<p> </p>" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "noteText required");
    }

    #[actix_web::test]
    async fn test_create_caps_tags_at_ten() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);

        let many: Vec<String> = (0..12).map(|i| format!("tag{}", i)).collect();
        let note = create(&state, "u1", json!({ "noteText": "tagged", "tags": many })).await;

        let stored: Vec<String> = note["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap().to_string())
            .collect();
        assert_eq!(stored.len(), 10);
        assert_eq!(stored[0], "tag0");
        assert_eq!(stored[9], "tag9");
    }

    #[actix_web::test]
    async fn test_update_is_owner_scoped() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let note = create(&state, "u1", json!({ "noteText": "mine" })).await;
        let note_id = note["id"].as_str().unwrap();

        // Another user and a bogus id get the same 404
        for (user, id) in [("u2", note_id), ("u1", "no-such-id")] {
            let req = test::TestRequest::put()
                .uri(&format!("/api/note/{}", id))
                .insert_header(bearer(user))
                .set_json(json!({ "noteText": "hijacked" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 404);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Note not found");
        }

        let req = test::TestRequest::put()
            .uri(&format!("/api/note/{}", note_id))
            .insert_header(bearer("u1"))
            .set_json(json!({ "noteText": "edited", "tags": ["kept"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["noteText"], "edited");
        assert_eq!(body["tags"], json!(["kept"]));
    }

    #[actix_web::test]
    async fn test_delete_is_owner_scoped_and_removes_from_list() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let note = create(&state, "u1", json!({ "noteText": "target" })).await;
        let note_id = note["id"].as_str().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/note/{}", note_id))
            .insert_header(bearer("u2"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/note/{}", note_id))
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Deleted");

        let req = test::TestRequest::get()
            .uri("/api/notes")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_list_filters_by_tag_newest_first() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        create(&state, "u1", json!({ "noteText": "older", "tags": ["foo"] })).await;
        create(&state, "u1", json!({ "noteText": "untagged" })).await;
        create(&state, "u1", json!({ "noteText": "newer", "tags": ["foo", "bar"] })).await;
        create(&state, "u2", json!({ "noteText": "other user", "tags": ["foo"] })).await;

        let req = test::TestRequest::get()
            .uri("/api/notes?tag=foo")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;

        let texts: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["noteText"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["newer", "older"]);
    }

    #[actix_web::test]
    async fn test_list_full_text_query() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        create(&state, "u1", json!({ "noteText": "remember the milk" })).await;
        create(&state, "u1", json!({ "noteText": "something else" })).await;

        let req = test::TestRequest::get()
            .uri("/api/notes?q=milk")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["noteText"], "remember the milk");
    }
}
