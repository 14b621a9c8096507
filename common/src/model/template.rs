use serde::{Deserialize, Serialize};

/// A message template as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub subject: String,
}
