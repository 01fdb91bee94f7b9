use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{domain::mode::Mode, services::ModeContext};

#[derive(Serialize, Deserialize)]
struct ModeBody {
    mode: Mode,
}

#[get("/mode")]
async fn get_mode(mode_context: web::Data<ModeContext>) -> HttpResponse {
    HttpResponse::Ok().json(ModeBody {
        mode: mode_context.current().await,
    })
}

#[put("/mode")]
async fn set_mode(mode_context: web::Data<ModeContext>, body: web::Json<ModeBody>) -> HttpResponse {
    let mode = mode_context.set(body.mode).await;
    log::info!("Mode set to {}", mode);

    HttpResponse::Ok().json(ModeBody { mode })
}

#[post("/mode/toggle")]
async fn toggle_mode(mode_context: web::Data<ModeContext>) -> HttpResponse {
    let mode = mode_context.toggle().await;
    log::info!("Mode toggled to {}", mode);

    HttpResponse::Ok().json(ModeBody { mode })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web::Data, App};
    use serde_json::{json, Value};

    use crate::{
        services::{mode_context::memory::MemoryStore, ModeContext},
        startup::routes,
    };

    #[actix_web::test]
    async fn mode_can_be_read_set_and_toggled() {
        let store = Arc::new(MemoryStore::default());
        let context = ModeContext::load(store.clone()).await;
        let app =
            test::init_service(App::new().app_data(Data::new(context)).configure(routes)).await;

        let request = test::TestRequest::get().uri("/api/mode").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({"mode": "direct"}));

        let request = test::TestRequest::put()
            .uri("/api/mode")
            .set_json(json!({"mode": "chat"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({"mode": "chat"}));
        assert_eq!(store.stored().as_deref(), Some("chat"));

        let request = test::TestRequest::post().uri("/api/mode/toggle").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({"mode": "direct"}));
        assert_eq!(store.stored().as_deref(), Some("direct"));
    }

    #[actix_web::test]
    async fn unknown_mode_is_rejected() {
        let context = ModeContext::load(Arc::new(MemoryStore::default())).await;
        let app =
            test::init_service(App::new().app_data(Data::new(context)).configure(routes)).await;

        let request = test::TestRequest::put()
            .uri("/api/mode")
            .set_json(json!({"mode": "kiosk"}))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
