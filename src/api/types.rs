use serde::Serialize;

use crate::entities::{hosts, notifications, users, visits};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VisitDto {
    pub id: i32,
    pub pass_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub purpose: String,
    pub visit_date: String,
    pub host_name: String,
    pub host_email: String,
    pub status: String,
    pub host_confirmation: String,
    pub host_confirmation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub created_at: String,
}

impl VisitDto {
    /// Full view including issued codes. Served to the visitor looking up
    /// their own pass and to staff portals.
    #[must_use]
    pub fn from_model(visit: visits::Model) -> Self {
        Self {
            id: visit.id,
            pass_id: visit.pass_id,
            full_name: visit.full_name,
            email: visit.email,
            phone: visit.phone,
            company: visit.company,
            purpose: visit.purpose,
            visit_date: visit.visit_date,
            host_name: visit.host_name,
            host_email: visit.host_email,
            status: visit.status,
            host_confirmation: visit.host_confirmation,
            host_confirmation_reason: visit.host_confirmation_reason,
            entry_code: visit.entry_code,
            exit_code: visit.exit_code,
            check_in_time: visit.check_in_time,
            check_out_time: visit.check_out_time,
            created_at: visit.created_at,
        }
    }

    /// View with the codes stripped, for listings where codes are not
    /// needed.
    #[must_use]
    pub fn from_model_without_codes(visit: visits::Model) -> Self {
        let mut dto = Self::from_model(visit);
        dto.entry_code = None;
        dto.exit_code = None;
        dto
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<users::Model> for UserDto {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HostDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub approval_status: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl From<hosts::Model> for HostDto {
    fn from(host: hosts::Model) -> Self {
        Self {
            id: host.id,
            username: host.username,
            email: host.email,
            full_name: host.full_name,
            department: host.department,
            phone: host.phone,
            approval_status: host.approval_status,
            is_approved: host.is_approved,
            is_active: host.is_active,
            created_at: host.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationDto {
    pub id: i32,
    pub event_type: String,
    pub payload: String,
    pub delivery_status: String,
    pub delivery_error: Option<String>,
    pub created_at: String,
    pub delivered_at: Option<String>,
}

impl From<notifications::Model> for NotificationDto {
    fn from(n: notifications::Model) -> Self {
        Self {
            id: n.id,
            event_type: n.event_type,
            payload: n.payload,
            delivery_status: n.delivery_status,
            delivery_error: n.delivery_error,
            created_at: n.created_at,
            delivered_at: n.delivered_at,
        }
    }
}
