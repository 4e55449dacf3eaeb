//! HTTP handler functions for the deprivation map API.

use actix_web::{HttpResponse, web};
use depriv_map_analytics::{
    MISMATCH_COLUMNS, district_names, mismatch_rows, summarize, summary_lines,
};
use depriv_map_domains::{DomainMap, pretty_domain};
use depriv_map_render::{compare_view, single_view};
use depriv_map_server_models::{
    ApiHealth, ApiMismatch, ApiSelection, ApiStats, DomainOption, DomainsQueryParams,
    MismatchQueryParams, SelectionEvent,
};

use crate::AppState;
use crate::selection::apply_event;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/domains`
///
/// Domain dropdown entries for one geography and dataset, defaulting to
/// the current selection.
pub async fn domains(
    state: web::Data<AppState>,
    params: web::Query<DomainsQueryParams>,
) -> HttpResponse {
    let current = state.snapshot();
    let geography = params.geography.unwrap_or(current.geography);
    let dataset = params.dataset.unwrap_or(current.single.dataset);

    HttpResponse::Ok().json(options(state.registry.domains_for(geography, dataset)))
}

/// `GET /api/domains/compare`
///
/// Domains shown on both sides of the side-by-side view.
pub async fn compare_domains(
    state: web::Data<AppState>,
    params: web::Query<DomainsQueryParams>,
) -> HttpResponse {
    let geography = params
        .geography
        .unwrap_or_else(|| state.snapshot().geography);

    HttpResponse::Ok().json(options(&state.registry.domains_for_compare(geography)))
}

/// `GET /api/selection`
pub async fn get_selection(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot())
}

/// `POST /api/selection`
///
/// Applies one interaction event and returns the resulting state.
pub async fn post_selection(
    state: web::Data<AppState>,
    event: web::Json<SelectionEvent>,
) -> HttpResponse {
    let mut selection = state.selection();
    let changed = apply_event(&mut selection, &event, &state.store, &state.registry);

    HttpResponse::Ok().json(ApiSelection {
        changed,
        state: selection.clone(),
    })
}

/// `GET /api/map`
///
/// Renders the single-map view for the current selection.
pub async fn map(state: web::Data<AppState>) -> HttpResponse {
    let selection = state.snapshot();

    match single_view(&state.store, &state.registry, &selection) {
        Ok(figure) => HttpResponse::Ok().json(figure),
        Err(e) => {
            log::error!("Failed to render map: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to render map"
            }))
        }
    }
}

/// `GET /api/compare`
///
/// Renders both maps of the side-by-side view.
pub async fn compare(state: web::Data<AppState>) -> HttpResponse {
    let selection = state.snapshot();

    match compare_view(&state.store, &state.registry, &selection) {
        Ok(figures) => HttpResponse::Ok().json(figures),
        Err(e) => {
            log::error!("Failed to render comparison: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to render comparison"
            }))
        }
    }
}

/// `GET /api/stats`
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let stats = summarize(state.store.comparison());
    let lines = summary_lines(&stats);

    HttpResponse::Ok().json(ApiStats { stats, lines })
}

/// `GET /api/mismatch`
///
/// Comparison rows, optionally for one district by exact name.
pub async fn mismatch(
    state: web::Data<AppState>,
    params: web::Query<MismatchQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(ApiMismatch {
        columns: MISMATCH_COLUMNS,
        rows: mismatch_rows(state.store.comparison(), params.district.as_deref()),
    })
}

/// `GET /api/mismatch/districts`
pub async fn mismatch_districts(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(district_names(state.store.comparison()))
}

fn options(domains: &DomainMap) -> Vec<DomainOption> {
    domains
        .keys()
        .map(|key| DomainOption {
            value: key.to_string(),
            label: pretty_domain(key),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::{configure, fixtures};

    fn app_state() -> web::Data<AppState> {
        let (store, registry) = fixtures::store();
        web::Data::new(AppState::new(Arc::new(store), Arc::new(registry)))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn domains_default_to_current_selection() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/domains").to_request();
        let body: Vec<DomainOption> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0].value, "combined");
        assert!(body.iter().any(|o| o.label == "Socio-Demographic"));

        let req = test::TestRequest::get()
            .uri("/api/domains?geography=lsoa&dataset=imd")
            .to_request();
        let body: Vec<DomainOption> = test::call_and_read_body_json(&app, req).await;
        assert!(body.iter().any(|o| o.value == "living environment"));

        let req = test::TestRequest::get()
            .uri("/api/domains/compare")
            .to_request();
        let body: Vec<DomainOption> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            vec![DomainOption {
                value: "combined".to_string(),
                label: "Combined".to_string(),
            }]
        );
    }

    #[actix_web::test]
    async fn click_then_render_drilled_map() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/selection")
            .set_json(json!({"type": "clickFeature", "location": "E07000002"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["changed"], true);
        assert_eq!(body["state"]["geography"], "lsoa");
        assert_eq!(body["state"]["district"]["name"], "Southshire");

        let req = test::TestRequest::get().uri("/api/map").to_request();
        let figure: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            figure["data"][0]["locations"],
            json!(["E01000003", "E01000004"])
        );
        assert_eq!(
            figure["layout"]["title"]["text"],
            "PPFI \u{2013} Combined (LSOA) \u{2013} Southshire"
        );

        let req = test::TestRequest::get().uri("/api/compare").to_request();
        let figures: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            figures["left"]["layout"]["mapbox"],
            figures["right"]["layout"]["mapbox"]
        );
    }

    #[actix_web::test]
    async fn malformed_events_are_rejected_or_ignored() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/selection")
            .set_json(json!({"type": "clickFeature", "location": null}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["changed"], false);
        assert_eq!(body["state"]["geography"], "lad");

        let req = test::TestRequest::post()
            .uri("/api/selection")
            .set_json(json!({"type": "nonsense"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn stats_and_mismatch_tables() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/stats").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stats"]["total"], 4);
        assert_eq!(body["lines"][0], "Number of LSOAs: 4");

        let req = test::TestRequest::get()
            .uri("/api/mismatch/districts")
            .to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, vec!["Northshire", "Southshire"]);

        let req = test::TestRequest::get()
            .uri("/api/mismatch?district=Northshire")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["columns"].as_array().unwrap().len(), 7);
        let codes: Vec<&str> = body["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["lsoaCode"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["E01000001", "E01000002"]);
    }
}
