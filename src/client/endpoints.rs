//! REST contract of the portal backend. Auth endpoints are the only calls
//! that must succeed without a session; everything else requires a bearer
//! token.

pub const AUTH_LOGIN: &str = "/api/v1/auth/login";
pub const AUTH_LOGOUT: &str = "/api/v1/auth/logout";

pub const ADMIN_DASHBOARD: &str = "/api/admin/dashboard";
pub const MERCHANTS_PENDING: &str = "/api/admin/merchants/pending";
pub const TRANSACTIONS: &str = "/api/admin/transactions";
pub const USERS: &str = "/api/admin/users";
pub const STATISTICS: &str = "/api/admin/statistics";

pub fn merchant_approve(merchant_id: i64) -> String {
    format!("/api/admin/merchants/{merchant_id}/approve")
}

pub fn merchant_reject(merchant_id: i64, reason: &str) -> String {
    format!(
        "/api/admin/merchants/{merchant_id}/reject?reason={}",
        urlencoding::encode(reason)
    )
}
