//! Feedback service

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::errors::{Result, TappioError};
use crate::storage::{Feedback, FeedbackStatus, SeaOrmStorage};

/// 提交反馈
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct NewFeedback {
    pub title: String,
    pub description: String,
}

/// 管理后台看到的反馈，附带提交者邮箱
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FeedbackEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub feedback: Feedback,
    pub submitter_email: Option<String>,
}

pub struct FeedbackService {
    storage: Arc<SeaOrmStorage>,
}

impl FeedbackService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn submit(&self, user_id: &str, input: &NewFeedback) -> Result<Feedback> {
        let title = input.title.trim();
        let description = input.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(TappioError::validation(
                "Title and description are required",
            ));
        }

        let feedback = self
            .storage
            .insert_feedback(user_id, title, description)
            .await?;
        info!("Feedback {} submitted by {}", feedback.id, user_id);
        Ok(feedback)
    }

    /// 调用者自己的反馈
    pub async fn mine(&self, user_id: &str) -> Result<Vec<Feedback>> {
        self.storage.list_feedback(Some(user_id)).await
    }

    /// 全部反馈（管理员）
    pub async fn all(&self) -> Result<Vec<FeedbackEntry>> {
        let items = self.storage.list_feedback(None).await?;

        let mut user_ids: Vec<String> = items.iter().map(|f| f.user_id.clone()).collect();
        user_ids.sort();
        user_ids.dedup();
        let emails = self.storage.emails_for(&user_ids).await?;

        Ok(items
            .into_iter()
            .map(|feedback| FeedbackEntry {
                submitter_email: emails.get(&feedback.user_id).cloned(),
                feedback,
            })
            .collect())
    }

    pub async fn set_status(&self, id: &str, status: FeedbackStatus) -> Result<Feedback> {
        let feedback = self.storage.update_feedback_status(id, status).await?;
        info!("Feedback {} moved to {}", id, status);
        Ok(feedback)
    }
}
