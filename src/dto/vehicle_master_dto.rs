use serde::Serialize;
use uuid::Uuid;

// Dropdown entry: identifier plus label in the request language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub id: Uuid,
    pub label: String,
}

impl DropdownOption {
    pub fn new(id: Uuid, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}
