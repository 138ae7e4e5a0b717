//! User-related DTOs.

use serde::{Deserialize, Serialize};
use sightline_core::{NewUser, User, UserChanges, UserId};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Default page size for user listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 255, message = "Full name cannot exceed 255 characters"))]
    pub full_name: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            email: request.email,
            full_name: request.full_name,
        }
    }
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Full name cannot exceed 255 characters"))]
    pub full_name: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            full_name: request.full_name,
            is_active: request.is_active,
        }
    }
}

/// Offset pagination for user listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Rows to skip.
    #[serde(default)]
    #[validate(range(min = 0, message = "skip cannot be negative"))]
    pub skip: i64,

    /// Maximum rows to return.
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, max = 1000, message = "limit must be between 0 and 1000"))]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// User response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_user_request_valid() {
        let request = CreateUserRequest {
            email: "ada@example.com".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_request_invalid_email() {
        let request = CreateUserRequest {
            email: "not-an-email".to_string(),
            full_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_full_name_length_limit() {
        let request = UpdateUserRequest {
            full_name: Some("x".repeat(256)),
            ..UpdateUserRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListUsersQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, DEFAULT_LIST_LIMIT);

        let negative = ListUsersQuery { skip: -1, limit: 10 };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_update_request_into_changes() {
        let changes: UserChanges = UpdateUserRequest {
            is_active: Some(false),
            ..UpdateUserRequest::default()
        }
        .into();
        assert_eq!(changes.is_active, Some(false));
        assert!(changes.email.is_none());
    }

    #[test]
    fn test_user_response_from_user() {
        let response = UserResponse::from(User {
            id: UserId(3),
            email: "ada@example.com".to_string(),
            full_name: None,
            is_active: true,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["is_active"], true);
    }
}
