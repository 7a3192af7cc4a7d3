//! `GET /entities/{endpoint}`

use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::error::ApiError;
use crate::{
    AppState,
    identifiers::{EntityEndpoint, EntityLookupResponse, parse_identifiers, resolve},
    observability::metrics,
};

/// Query parameter naming the organization. It is not an identifier.
const ORGANIZATION_PARAM: &str = "organization";

/// Look up entities by up to two identifiers.
pub async fn lookup_entities(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<EntityLookupResponse>, ApiError> {
    let label = endpoint
        .parse::<EntityEndpoint>()
        .map(|e| e.as_str())
        .unwrap_or("unknown");

    let result = run_lookup(&state, &endpoint, params).await;
    let status = match &result {
        Ok(_) => "ok",
        Err(ApiError::BadRequest { .. }) => "invalid_identifiers",
        Err(e) => e.kind(),
    };
    metrics::record_entity_lookup(label, status);
    result.map(Json)
}

async fn run_lookup(
    state: &AppState,
    endpoint: &str,
    params: Vec<(String, String)>,
) -> Result<EntityLookupResponse, ApiError> {
    let (organization, identifiers): (Vec<_>, Vec<_>) = params
        .into_iter()
        .partition(|(name, _)| name.eq_ignore_ascii_case(ORGANIZATION_PARAM));

    let Some(organization) = organization
        .into_iter()
        .map(|(_, value)| value)
        .find(|value| !value.is_empty())
    else {
        return Err(ApiError::bad_request(format!(
            "Missing mandatory fields in the request : {ORGANIZATION_PARAM}"
        )));
    };

    let supplied = parse_identifiers(identifiers);
    let resolved = resolve(endpoint, &supplied)?;

    let snapshot = state.snapshots.current();
    Ok(state
        .lookups
        .lookup(&snapshot, &organization, &resolved)
        .await?)
}
