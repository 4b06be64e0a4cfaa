//! HTTP handlers for the scoring service (spec §6):
//! command endpoints that accept per-node `ScoreEvent`s directly, and query
//! endpoints over the event log and read model.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use ews_store::EventQuery;
use ews_types::{
    ApiError, ApiResult, ClinicalRisk, PatientReadModel, ScoreComponents, ScoreConsensus,
    ScoreEvent, ScoreEventKind, VitalSigns,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::process_score_event;
use crate::state::AppState;

/// Request body for `POST /api/command/calculate-ews`: a node's raw vital
/// vector, scored by this service rather than pre-scored upstream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateEwsRequest {
    pub patient_id: String,
    pub node_id: String,
    pub vital_signs: VitalSigns,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Response for a single calculate-ews call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateEwsResponse {
    pub event_id: Uuid,
    pub total_score: u8,
    pub clinical_risk: ClinicalRisk,
}

/// Score one vital vector (C1), then hand the resulting `ScoreEvent` through
/// the same C3 -> C5 -> publish pipeline the bus consumer uses.
async fn calculate_one(
    state: &AppState,
    request: CalculateEwsRequest,
) -> ApiResult<CalculateEwsResponse> {
    let score = ews_scoring::score(&request.vital_signs).map_err(|e| ApiError::Validation(e.to_string()))?;

    let event = ScoreEvent {
        event_id: Uuid::new_v4(),
        patient_id: request.patient_id,
        node_id: request.node_id,
        kind: ScoreEventKind::EwsCalculated,
        observed_at: request.timestamp.unwrap_or_else(Utc::now),
        vital_signs: request.vital_signs,
        score_components: ScoreComponents {
            respiratory_rate: score.components.respiratory_rate,
            oxygen_saturation: score.components.oxygen_saturation,
            temperature: score.components.temperature,
            systolic_bp: score.components.systolic_bp,
            heart_rate: score.components.heart_rate,
            consciousness: score.components.consciousness,
        },
        total_score: score.total_score,
        clinical_risk: score.clinical_risk,
        metadata: request.metadata,
    };

    let response = CalculateEwsResponse {
        event_id: event.event_id,
        total_score: event.total_score,
        clinical_risk: event.clinical_risk,
    };
    process_score_event(state, event).await?;
    Ok(response)
}

/// `POST /api/command/calculate-ews`: score one node's vital vector.
pub async fn calculate_ews(
    State(state): State<AppState>,
    Json(body): Json<CalculateEwsRequest>,
) -> ApiResult<(StatusCode, Json<CalculateEwsResponse>)> {
    let response = calculate_one(&state, body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Request body for `POST /api/command/batch-calculate-ews`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCalculateEwsRequest {
    pub calculations: Vec<CalculateEwsRequest>,
}

/// One failed entry within a batch calculate-ews call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCalculateError {
    pub index: usize,
    pub message: String,
}

/// Response for `POST /api/command/batch-calculate-ews`: partial success is
/// permitted — a bad entry is reported in `errors` without failing the rest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCalculateEwsResponse {
    pub results: Vec<CalculateEwsResponse>,
    pub errors: Vec<BatchCalculateError>,
}

/// `POST /api/command/batch-calculate-ews`: score several nodes' vital vectors.
pub async fn batch_calculate_ews(
    State(state): State<AppState>,
    Json(body): Json<BatchCalculateEwsRequest>,
) -> Json<BatchCalculateEwsResponse> {
    let mut results = Vec::new();
    let mut errors = Vec::new();
    for (index, calculation) in body.calculations.into_iter().enumerate() {
        match calculate_one(&state, calculation).await {
            Ok(response) => results.push(response),
            Err(err) => errors.push(BatchCalculateError {
                index,
                message: err.to_string(),
            }),
        }
    }
    Json(BatchCalculateEwsResponse { results, errors })
}

/// `GET /api/query/patient/{patientId}/latest`: the current read model.
pub async fn latest_patient_score(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<PatientReadModel>> {
    state
        .read_store
        .get(&patient_id)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no read model for patient {patient_id}")))
}

/// `GET /api/query/patient/{patientId}/history`: the bounded score-history ring.
pub async fn patient_score_history(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<ews_types::ScoreHistoryEntry>>> {
    let model = state
        .read_store
        .get(&patient_id)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("no read model for patient {patient_id}")))?;
    Ok(Json(model.score_history.into_iter().collect()))
}

/// `GET /api/query/consensus/{consensusId}`.
pub async fn get_consensus(
    State(state): State<AppState>,
    Path(consensus_id): Path<uuid::Uuid>,
) -> ApiResult<Json<ScoreConsensus>> {
    state
        .event_store
        .get_consensus(consensus_id)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no consensus record {consensus_id}")))
}

/// Query-string parameters accepted by `GET /api/query/events`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQueryParams {
    pub patient_id: Option<String>,
    pub since: Option<chrono::DateTime<chrono::Utc>>,
    pub limit: Option<i64>,
}

/// `GET /api/query/events`: raw per-node score events, filtered.
pub async fn query_events(
    State(state): State<AppState>,
    Query(params): Query<EventsQueryParams>,
) -> ApiResult<Json<Vec<ScoreEvent>>> {
    let query = EventQuery {
        patient_id: params.patient_id,
        since: params.since,
        limit: params.limit,
    };
    state
        .event_store
        .query_events(&query)
        .await
        .map(Json)
        .map_err(|e| ApiError::Storage(e.to_string()))
}

/// Aggregate counters for `GET /api/query/stats/overview`.
#[derive(Debug, Serialize)]
pub struct StatsOverview {
    pub high_risk_patient_count: usize,
}

/// `GET /api/query/stats/overview`.
pub async fn stats_overview(State(state): State<AppState>) -> ApiResult<Json<StatsOverview>> {
    let high_risk = state
        .read_store
        .high_risk_patients(None)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;
    Ok(Json(StatsOverview {
        high_risk_patient_count: high_risk.len(),
    }))
}

/// Query-string parameters accepted by `GET /api/query/high-risk-patients`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighRiskPatientsParams {
    pub min_score: Option<u8>,
}

/// `GET /api/query/high-risk-patients?minScore=5`.
pub async fn high_risk_patients(
    State(state): State<AppState>,
    Query(params): Query<HighRiskPatientsParams>,
) -> ApiResult<Json<Vec<PatientReadModel>>> {
    state
        .read_store
        .high_risk_patients(params.min_score)
        .await
        .map(Json)
        .map_err(|e| ApiError::Storage(e.to_string()))
}
