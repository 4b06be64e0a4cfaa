//! HTTP handlers for the ingestion service (spec §6):
//! `POST /api/data/sensor`, `POST /api/data/batch`, `GET /api/data/patient/{patientId}`.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use ews_bus::ROUTING_KEY_EWS_CALCULATED;
use ews_types::{
    ApiError, ApiResult, ScoreComponents, ScoreEvent, ScoreEventKind, SensorConsensus,
    SensorReading, SensorType,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::store::SensorConsensusQuery;

/// Response for a single ingested reading.
#[derive(Debug, Serialize)]
pub struct IngestSensorResponse {
    pub consensus: SensorConsensus,
    /// `true` if this reading completed a fresh six-vital vector that was scored and published.
    pub scored: bool,
}

/// `POST /api/data/sensor`.
pub async fn ingest_sensor_reading(
    State(state): State<AppState>,
    Json(reading): Json<SensorReading>,
) -> ApiResult<Json<IngestSensorResponse>> {
    let (consensus, scored) = process_reading(&state, reading).await?;
    Ok(Json(IngestSensorResponse { consensus, scored }))
}

/// Request body for `POST /api/data/batch`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestBatchRequest {
    pub readings: Vec<SensorReading>,
}

/// `POST /api/data/batch`. 400 on a missing or empty `readings` array.
pub async fn ingest_batch(
    State(state): State<AppState>,
    Json(body): Json<IngestBatchRequest>,
) -> ApiResult<Json<Vec<IngestSensorResponse>>> {
    if body.readings.is_empty() {
        return Err(ApiError::Validation("readings must be a non-empty array".to_string()));
    }
    let mut responses = Vec::with_capacity(body.readings.len());
    for reading in body.readings {
        let (consensus, scored) = process_reading(&state, reading).await?;
        responses.push(IngestSensorResponse { consensus, scored });
    }
    Ok(Json(responses))
}

/// Query-string filters accepted by `GET /api/data/patient/{patientId}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientVitalsParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub sensor_type: Option<SensorType>,
}

/// `GET /api/data/patient/{patientId}`: persisted sensor consensus records,
/// filtered by `from`/`to`/`sensorType`. 404 when none match.
pub async fn get_patient_vitals(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Query(params): Query<PatientVitalsParams>,
) -> ApiResult<Json<Vec<SensorConsensus>>> {
    let records = state.consensus_history.query(
        &patient_id,
        &SensorConsensusQuery {
            from: params.from,
            to: params.to,
            sensor_type: params.sensor_type,
        },
    );
    if records.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no sensor consensus records for patient {patient_id}"
        )));
    }
    Ok(Json(records))
}

/// C2 -> C4 -> C1 -> publish, the pipeline one sensor reading drives.
async fn process_reading(
    state: &AppState,
    reading: SensorReading,
) -> ApiResult<(SensorConsensus, bool)> {
    let patient_id = reading.patient_id.clone();
    let consensus = state.sensor_consensus.ingest_reading(reading);
    state.completeness.record_consensus(consensus.clone());
    state.consensus_history.record(consensus.clone());

    let now = Utc::now();
    let Some(vitals) = state.completeness.check_completeness(&patient_id, now) else {
        return Ok((consensus, false));
    };

    let score = ews_scoring::score(&vitals).map_err(|e| ApiError::Validation(e.to_string()))?;

    let event = ScoreEvent {
        event_id: Uuid::new_v4(),
        patient_id: patient_id.clone(),
        node_id: state.node_id.clone(),
        kind: ScoreEventKind::EwsCalculated,
        observed_at: now,
        vital_signs: vitals,
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
        metadata: serde_json::Value::Null,
    };

    let payload = serde_json::to_value(&event)
        .map_err(|e| ApiError::Validation(format!("failed to serialize score event: {e}")))?;
    state
        .bus
        .publish(ROUTING_KEY_EWS_CALCULATED, payload)
        .await
        .map_err(|e| ApiError::Bus(e.to_string()))?;

    tracing::info!(
        patient_id = %patient_id,
        total_score = event.total_score,
        clinical_risk = ?event.clinical_risk,
        "score event published"
    );

    Ok((consensus, true))
}
