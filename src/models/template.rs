use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;
use crate::utils::time;

/// The template as exposed by the remote endpoint.
///
/// Locally mirrored copies have no `id` or timestamps until the remote side
/// has accepted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "welcomeTitle")]
    pub welcome_title: String,
    #[serde(default, alias = "welcomeSubtitle")]
    pub welcome_subtitle: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(
        default,
        deserialize_with = "time::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "time::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}
