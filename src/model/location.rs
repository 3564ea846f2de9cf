use serde::{Deserialize, Serialize};

/// A region or city key with its display name
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LocationDto {
    pub key: String,
    pub name: String,
}

impl From<&(&str, &str)> for LocationDto {
    fn from((key, name): &(&str, &str)) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
        }
    }
}
