use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::player::PlayerId;
use crate::utils::config::CONFIG;

/// Issued at join; binds the bearer to one player in one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub room: String,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn player_id(&self) -> Result<PlayerId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::TokenValidation)
    }

    pub fn is_for_room(&self, room_id: &str) -> bool {
        self.room == room_id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Could not issue a player token")]
    TokenCreation,
    #[error("Invalid player token")]
    TokenValidation,
    #[error("A player token is required")]
    MissingToken,
    #[error("This token belongs to another room")]
    WrongRoom,
}

pub fn create_token(room_id: &str, player_id: PlayerId, name: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: player_id.to_string(),
        room: room_id.to_string(),
        name: name.to_string(),
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
    )
    .map_err(|_| AuthError::TokenCreation)
}

pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::TokenValidation)?;

    Ok(token_data.claims)
}

/// Verifies `token` and checks that it was issued for `room_id`.
pub fn authorize(token: &str, room_id: &str) -> Result<Claims, AuthError> {
    let claims = verify_token(token)?;
    if !claims.is_for_room(room_id) {
        return Err(AuthError::WrongRoom);
    }
    claims.player_id()?;
    Ok(claims)
}
