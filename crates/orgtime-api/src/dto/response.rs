//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orgtime_auth::jwt::TokenPair;
use orgtime_core::types::pagination::PageResponse;
use orgtime_database::repositories::user::UserEmployeePair;
use orgtime_entity::employee::{Employee, RankedEmployee};
use orgtime_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total item count.
    pub total: u64,
    /// Current page.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total pages.
    pub total_pages: u64,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Converts a domain page, mapping each item.
    pub fn from_page<S>(page: PageResponse<S>, f: impl Fn(S) -> T) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items.into_iter().map(f).collect(),
            total: page.total,
            page: page.page,
            per_page: page.page_size,
            total_pages,
        }
    }
}

/// Token pair issued at registration, login, or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            access_expires_at: pair.access_expires_at,
            refresh_expires_at: pair.refresh_expires_at,
        }
    }
}

/// Login/registration response: the user plus its tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: UserResponse,
    /// Issued token pair.
    pub tokens: TokenPairResponse,
}

/// Standalone access token, returned by refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// New access token.
    pub access_token: String,
    /// Access token expiration.
    pub expires_at: DateTime<Utc>,
}

/// User summary for responses. Never carries the password hash or the
/// session key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Employee record, if the user has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeResponse>,
}

impl UserResponse {
    /// Builds the response from a user and its optional employee record.
    pub fn from_pair(pair: UserEmployeePair) -> Self {
        let (user, employee) = pair;
        Self {
            id: user.id,
            username: user.username,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
            employee: employee.map(EmployeeResponse::from),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from_pair((user, None))
    }
}

/// Employee summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Supervisor, if assigned.
    pub supervisor_id: Option<Uuid>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            user_id: employee.user_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            supervisor_id: employee.supervisor_id,
        }
    }
}

/// Employee plus its distance from the queried employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEmployeeResponse {
    /// The related employee.
    #[serde(flatten)]
    pub employee: EmployeeResponse,
    /// Edge count from the queried employee (0 = self).
    pub depth: i32,
}

impl From<RankedEmployee> for RankedEmployeeResponse {
    fn from(ranked: RankedEmployee) -> Self {
        Self {
            employee: EmployeeResponse::from(ranked.employee),
            depth: ranked.depth,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
