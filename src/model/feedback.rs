use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::server::model::db::FeedbackModel;

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackDto {
    pub id: i32,
    pub shipment_id: i32,
    pub company_id: i32,
    pub provider_id: i32,
    pub company_name: Option<String>,
    pub provider_name: Option<String>,
    pub rating: i32,
    pub comments: String,
    pub created_at: NaiveDateTime,
}

impl From<FeedbackModel> for FeedbackDto {
    fn from(feedback: FeedbackModel) -> Self {
        Self {
            id: feedback.id,
            shipment_id: feedback.shipment_id,
            company_id: feedback.company_id,
            provider_id: feedback.provider_id,
            company_name: None,
            provider_name: None,
            rating: feedback.rating,
            comments: feedback.comments,
            created_at: feedback.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmitFeedbackDto {
    pub contract_id: i32,
    /// 1 to 5
    pub rating: i32,
    /// 10 to 500 characters
    pub comments: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderFeedbackDto {
    pub feedback: Vec<FeedbackDto>,
    pub average_rating: Option<f64>,
    pub total_count: u64,
}
