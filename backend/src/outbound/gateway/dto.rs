//! DTOs for decoding gateway JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! domain records in one pass so row-level validation failures surface as
//! decode errors with the offending row named.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::identity::{DisplayName, EmailAddress, Identity, IdentityId, Role};
use crate::domain::plant::{Plant, PlantId};

#[derive(Debug, Deserialize)]
pub(super) struct PlantRowDto {
    pub(super) id: i64,
    pub(super) name: String,
    pub(super) scientific_name: Option<String>,
    pub(super) category: String,
    pub(super) description: Option<String>,
    pub(super) image_url: Option<String>,
    pub(super) difficulty: Option<String>,
}

impl PlantRowDto {
    pub(super) fn into_domain(self) -> Plant {
        Plant {
            id: PlantId::new(self.id),
            name: self.name,
            scientific_name: self.scientific_name,
            category: self.category,
            description: self.description.unwrap_or_default(),
            image_url: self.image_url,
            difficulty: self.difficulty,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileRowDto {
    pub(super) id: i64,
    pub(super) email: String,
    pub(super) display_name: Option<String>,
    pub(super) role: String,
    pub(super) avatar_url: Option<String>,
    pub(super) created_at: Option<DateTime<Utc>>,
}

impl ProfileRowDto {
    pub(super) fn into_domain(self) -> Result<Identity, String> {
        let email = EmailAddress::parse(&self.email)
            .map_err(|err| format!("profile row {}: {err}", self.id))?;
        let display_name = match self.display_name {
            Some(raw) if !raw.trim().is_empty() => Some(
                DisplayName::parse(&raw).map_err(|err| format!("profile row {}: {err}", self.id))?,
            ),
            _ => None,
        };
        let role: Role = self
            .role
            .parse()
            .map_err(|err| format!("profile row {}: {err}", self.id))?;

        Ok(Identity {
            id: IdentityId::new(self.id),
            email,
            display_name,
            role,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleRowDto {
    pub(super) role: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: i64,
    pub(super) email: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) user: AuthUserDto,
}
