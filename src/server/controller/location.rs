use axum::{extract::Path, response::IntoResponse, Json};

use crate::{model::location::LocationDto, server::util::location};

pub static LOCATION_TAG: &str = "locations";

/// Lists the administrative regions of Saudi Arabia
#[utoipa::path(
    get,
    path = "/api/locations/regions",
    tag = LOCATION_TAG,
    responses(
        (status = 200, description = "Every region key with its display name", body = Vec<LocationDto>)
    ),
)]
pub async fn regions() -> impl IntoResponse {
    Json(
        location::REGIONS
            .iter()
            .map(LocationDto::from)
            .collect::<Vec<_>>(),
    )
}

/// Lists the cities of a region
///
/// An unknown region yields an empty list.
#[utoipa::path(
    get,
    path = "/api/locations/regions/{region}/cities",
    tag = LOCATION_TAG,
    params(("region" = String, Path, description = "Region key such as riyadh")),
    responses(
        (status = 200, description = "Cities served within the region", body = Vec<LocationDto>)
    ),
)]
pub async fn cities(Path(region): Path<String>) -> impl IntoResponse {
    Json(
        location::cities(&region)
            .iter()
            .map(LocationDto::from)
            .collect::<Vec<_>>(),
    )
}
