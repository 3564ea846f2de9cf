//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every API endpoint is registered here together with its OpenAPI path, and
//! Swagger UI serves the collected document at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{admin, auth, company, location, provider, shipment},
    model::app::AppState,
};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// Handlers sharing a path with different methods are registered in one `routes!`
/// call so that utoipa-axum merges them onto a single method router.
///
/// # Route groups
/// - `/api/auth/*` - Registration, login, logout, current user and passwords
/// - `/api/locations/*` - Regions and cities
/// - `/api/shipments*` - Public browsing of open shipment requests
/// - `/api/company/*` - Company workflows, 403 for other roles
/// - `/api/provider/*` - Provider workflows, 403 for other roles
/// - `/api/admin/*` - Administration and revenue reports, 403 for other roles
///
/// # Swagger UI
/// Interactive documentation is served at `/api/docs` and the OpenAPI document at
/// `/api/docs/openapi.json`.
///
/// # Returns
/// An Axum `Router<AppState>` ready to receive state, the session layer and tracing.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Wasl", description = "Wasl logistics marketplace API"),
        tags(
            (name = auth::AUTH_TAG, description = "Authentication API routes"),
            (name = location::LOCATION_TAG, description = "Saudi regions and cities"),
            (name = shipment::SHIPMENT_TAG, description = "Open shipment requests"),
            (name = company::COMPANY_TAG, description = "Company API routes"),
            (name = provider::PROVIDER_TAG, description = "Logistics provider API routes"),
            (name = admin::ADMIN_TAG, description = "Administration API routes"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(public_routes())
        .merge(company_routes())
        .merge(provider_routes())
        .merge(admin_routes())
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register_company))
        .routes(routes!(auth::register_provider))
        .routes(routes!(auth::login))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        .routes(routes!(auth::forgot_password))
        .routes(routes!(auth::change_password))
        .routes(routes!(location::regions))
        .routes(routes!(location::cities))
        .routes(routes!(shipment::browse))
        .routes(routes!(shipment::details))
}

fn company_routes() -> OpenApiRouter<AppState> {
    use company::{bid, contract, direct_request, invoice, payment, profile, shipment, tracking};

    OpenApiRouter::new()
        .routes(routes!(profile::dashboard))
        .routes(routes!(
            profile::get_profile,
            profile::update_profile,
            profile::delete_account
        ))
        .routes(routes!(shipment::list, shipment::create))
        .routes(routes!(shipment::get, shipment::update, shipment::delete))
        .routes(routes!(shipment::cancel))
        .routes(routes!(shipment::bids))
        .routes(routes!(bid::list))
        .routes(routes!(bid::waiting_contracts))
        .routes(routes!(bid::show))
        .routes(routes!(bid::accept))
        .routes(routes!(bid::reject))
        .routes(routes!(direct_request::providers))
        .routes(routes!(direct_request::provider_details))
        .routes(routes!(direct_request::send, direct_request::list))
        .routes(routes!(direct_request::delete))
        .routes(routes!(direct_request::accept))
        .routes(routes!(direct_request::reject))
        .routes(routes!(contract::create, contract::list))
        .routes(routes!(contract::waiting_payment))
        .routes(routes!(contract::show))
        .routes(routes!(contract::document))
        .routes(routes!(contract::pay))
        .routes(routes!(payment::list))
        .routes(routes!(payment::show))
        .routes(routes!(payment::process))
        .routes(routes!(payment::retry))
        .routes(routes!(invoice::list))
        .routes(routes!(invoice::show))
        .routes(routes!(invoice::download))
        .routes(routes!(tracking::contracts))
        .routes(routes!(tracking::lookup))
        .routes(routes!(tracking::submit_feedback))
}

fn provider_routes() -> OpenApiRouter<AppState> {
    use provider::{bid, contract, direct_request, profile, tracking};

    OpenApiRouter::new()
        .routes(routes!(profile::dashboard))
        .routes(routes!(profile::feedback))
        .routes(routes!(profile::get_profile, profile::update_profile))
        .routes(routes!(bid::list, bid::submit))
        .routes(routes!(bid::update, bid::cancel))
        .routes(routes!(direct_request::list))
        .routes(routes!(direct_request::respond))
        .routes(routes!(direct_request::decline))
        .routes(routes!(contract::list))
        .routes(routes!(contract::show))
        .routes(routes!(contract::sign))
        .routes(routes!(contract::document))
        .routes(routes!(contract::start_tracking))
        .routes(routes!(tracking::list))
        .routes(routes!(tracking::show))
        .routes(routes!(tracking::update_status))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    use admin::{account, marketplace, profile, report};

    OpenApiRouter::new()
        .routes(routes!(profile::dashboard))
        .routes(routes!(profile::get_profile, profile::update_profile))
        .routes(routes!(account::companies))
        .routes(routes!(account::toggle_company_approval))
        .routes(routes!(account::providers))
        .routes(routes!(account::toggle_provider_approval))
        .routes(routes!(marketplace::shipment_requests))
        .routes(routes!(marketplace::delete_shipment_request))
        .routes(routes!(marketplace::delete_bid))
        .routes(routes!(marketplace::contracts))
        .routes(routes!(marketplace::feedback))
        .routes(routes!(marketplace::delete_feedback))
        .routes(routes!(report::revenue, report::save_revenue))
        .routes(routes!(report::saved_reports))
}
