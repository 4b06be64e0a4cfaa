//! MongoDB-backed [`EventStore`]/[`ReadModelStore`] implementation (spec §4.5, §6).

use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use ews_types::{ClinicalRisk, PatientReadModel, ScoreConsensus, ScoreEvent};
use mongodb::options::{FindOptions, ReplaceOptions};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::{EventQuery, EventStore, ReadModelStore};

/// Connection settings for the MongoDB-backed store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MongoConfig {
    /// Connection URI, e.g. `mongodb://localhost:27017`.
    pub uri: String,
    /// Database name. Collections `score_events`, `score_consensus`, and
    /// `patient_read_models` are created in it on first write.
    pub database: String,
}

/// A [`EventStore`]/[`ReadModelStore`] backed by MongoDB collections.
pub struct MongoStore {
    events: Collection<ScoreEvent>,
    consensuses: Collection<ScoreConsensus>,
    read_models: Collection<PatientReadModel>,
}

impl MongoStore {
    /// Connect using `config` and return a handle over its three collections.
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db: Database = client.database(&config.database);
        info!(database = %config.database, "connected to MongoDB event store");
        Ok(Self {
            events: db.collection("score_events"),
            consensuses: db.collection("score_consensus"),
            read_models: db.collection("patient_read_models"),
        })
    }
}

#[async_trait]
impl EventStore for MongoStore {
    async fn append_score_event(&self, event: &ScoreEvent) -> Result<()> {
        self.events.insert_one(event).await?;
        Ok(())
    }

    async fn append_consensus(&self, consensus: &ScoreConsensus) -> Result<()> {
        self.consensuses.insert_one(consensus).await?;
        Ok(())
    }

    async fn get_consensus(&self, consensus_id: Uuid) -> Result<Option<ScoreConsensus>> {
        let filter = doc! { "consensusId": consensus_id.to_string() };
        Ok(self.consensuses.find_one(filter).await?)
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<ScoreEvent>> {
        let mut filter = doc! {};
        if let Some(patient_id) = &query.patient_id {
            filter.insert("patientId", patient_id);
        }
        if let Some(since) = query.since {
            let since_bson: DateTime<Utc> = since;
            filter.insert("observedAt", doc! { "$gte": bson::DateTime::from_chrono(since_bson) });
        }

        let mut find_options = FindOptions::default();
        find_options.sort = Some(doc! { "observedAt": -1 });
        if let Some(limit) = query.limit {
            find_options.limit = Some(limit);
        }

        let mut cursor = self.events.find(filter).with_options(find_options).await?;
        let mut out = Vec::new();
        use futures::stream::TryStreamExt;
        while let Some(event) = cursor.try_next().await? {
            out.push(event);
        }
        Ok(out)
    }
}

#[async_trait]
impl ReadModelStore for MongoStore {
    async fn get(&self, patient_id: &str) -> Result<Option<PatientReadModel>> {
        let filter = doc! { "patientId": patient_id };
        Ok(self.read_models.find_one(filter).await?)
    }

    async fn put(&self, model: &PatientReadModel) -> Result<()> {
        let filter = doc! { "patientId": &model.patient_id };
        self.read_models
            .replace_one(filter, model)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }

    async fn high_risk_patients(&self, min_score: Option<u8>) -> Result<Vec<PatientReadModel>> {
        let filter = doc! { "clinicalRisk": { "$in": ["Medium", "High"] } };
        let mut cursor = self.read_models.find(filter).await?;
        let mut out = Vec::new();
        use futures::stream::TryStreamExt;
        while let Some(model) = cursor.try_next().await? {
            out.push(model);
        }
        // `$in` on the serialized risk string is a coarse pre-filter; confirm with
        // the typed enum since MongoDB has no knowledge of the Rust variant order.
        out.retain(|m| matches!(m.clinical_risk, ClinicalRisk::Medium | ClinicalRisk::High));
        if let Some(min) = min_score {
            out.retain(|m| m.current_score >= min);
        }
        Ok(out)
    }
}
