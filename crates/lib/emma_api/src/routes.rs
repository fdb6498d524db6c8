//! Route paths. Everything is mounted under the `/api` prefix.

pub const GET_HEALTH: &str = "/api/health";

pub const POST_AUTH_LOGIN: &str = "/api/auth/login";
pub const POST_AUTH_REFRESH: &str = "/api/auth/refresh";
pub const GET_AUTH_ME: &str = "/api/auth/me";
pub const POST_AUTH_LOGOUT: &str = "/api/auth/logout";

// Admin console paths used by the frontend.
pub const POST_AUTH_ADMIN_LOGIN: &str = "/api/auth/admin/login";
pub const POST_AUTH_ADMIN_REFRESH: &str = "/api/auth/admin/refresh";
pub const GET_AUTH_ADMIN_ME: &str = "/api/auth/admin/me";
pub const POST_AUTH_ADMIN_LOGOUT: &str = "/api/auth/admin/logout";

/// Header carrying the refresh token on `POST /auth/refresh`.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";
