use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomType {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTypeRequest {
    pub description: String,
}

impl RoomTypeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_length("Description", &self.description, 2, 40)
    }
}

/// Room joined with the description of its type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub room_type_id: String,
    pub room_type: String,
    pub sort_order: i64,
    pub disable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRequest {
    pub name: String,
    pub room_type_id: String,
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub disable: bool,
}

impl RoomRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_length("Name", &self.name, 2, 35)?;
        super::require_non_blank("Room type", &self.room_type_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    pub id: String,
    pub name: String,
    pub room_type: String,
}

impl From<&Room> for RoomRef {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            room_type: room.room_type.clone(),
        }
    }
}
