use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// A user-defined spending category. The import engine only reads these;
/// creating and editing them is the category screen's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}
