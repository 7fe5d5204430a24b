#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::resume::profiler::ResumeProfile;

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub s3_key: String,
    pub profile: Json<ResumeProfile>,
    pub suggested_role: String,
    pub suggested_domain: String,
    pub uploaded_at: DateTime<Utc>,
}
