/// Authenticated user's profile details
///
/// - `GET /userDetails` - Current profile (never includes the password hash)
/// - `PUT /userDetails` - Update any subset of profile fields

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::ApiJson,
    routes::{non_blank, MessageResponse},
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use storefront_shared::{
    auth::middleware::AuthContext,
    models::{
        city::City,
        user::{UpdateUserDetails, User},
    },
};
use validator::Validate;

const MAX_POSTAL_CODE_LENGTH: usize = 20;

/// Postal codes arrive as strings or bare numbers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PostalCode {
    Text(String),
    Number(u64),
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        match code {
            PostalCode::Text(text) => text,
            PostalCode::Number(number) => number.to_string(),
        }
    }
}

/// Profile update request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDetailsRequest {
    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 50, message = "Phone number must be at most 50 characters"))]
    pub phone_number: Option<String>,

    pub address: Option<String>,

    #[validate(length(max = 255, message = "City must be at most 255 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 255, message = "Province must be at most 255 characters"))]
    pub province: Option<String>,

    pub postal_code: Option<PostalCode>,

    #[serde(rename = "CityId")]
    pub city_id: Option<i32>,
}

impl UpdateUserDetailsRequest {
    fn into_update(self) -> ApiResult<UpdateUserDetails> {
        let postal_code = non_blank(self.postal_code.map(String::from));

        if let Some(code) = &postal_code {
            if code.chars().count() > MAX_POSTAL_CODE_LENGTH {
                return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "postalCode".to_string(),
                    message: format!(
                        "Postal code must be at most {} characters",
                        MAX_POSTAL_CODE_LENGTH
                    ),
                }]));
            }
        }

        Ok(UpdateUserDetails {
            full_name: non_blank(self.full_name),
            phone_number: non_blank(self.phone_number),
            address: non_blank(self.address),
            city: non_blank(self.city),
            province: non_blank(self.province),
            postal_code,
            city_id: self.city_id,
        })
    }
}

/// Get the current user's profile
pub async fn get_user_details(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update the current user's profile
///
/// ```text
/// PUT /userDetails
/// {
///   "fullName": "Budi Santoso",
///   "phoneNumber": "0842424242",
///   "address": "Jl. Merdeka 1",
///   "city": "Jayapura",
///   "province": "Papua",
///   "postalCode": 99114,
///   "CityId": 1
/// }
/// ```
///
/// Omitted or blank fields keep their current value.
///
/// # Errors
///
/// - `400 Bad Request`: field too long, or `CityId` names no city
pub async fn update_user_details(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<UpdateUserDetailsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(ApiError::from_validation)?;
    let update = req.into_update()?;

    if let Some(city_id) = update.city_id {
        if !City::exists(&state.db, city_id).await? {
            return Err(ApiError::BadRequest("City not found".to_string()));
        }
    }

    if !update.is_empty() {
        User::update_details(&state.db, auth.user_id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id = auth.user_id, "User details updated");
    }

    Ok(Json(MessageResponse::new("successfully update user details")))
}
