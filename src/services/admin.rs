//! Admin accounts and login

use super::{ADMIN_BASE_PATH, AUTH_LOGIN_PATH, action_path, collection_path, item_path};
use crate::core::{
    Ack, Admin, AdminId, CreateAdminRequest, LoginRequest, LoginResponse, ToggleAdminStatusResponse,
    UpdateAdminRequest,
};
use crate::envelope::{ApiOutcome, normalize};
use crate::transport::{Transport, TransportExt};

pub const LOGIN_FAILED: &str = "Login failed";
pub const LIST_FAILED: &str = "Failed to fetch admins";
pub const GET_FAILED: &str = "Failed to fetch admin";
pub const CREATE_FAILED: &str = "Failed to create admin";
pub const UPDATE_FAILED: &str = "Failed to update admin";
pub const DELETE_FAILED: &str = "Failed to delete admin";
pub const TOGGLE_FAILED: &str = "Failed to toggle admin status";

/// `POST /api/v1/auth/login`
///
/// Storing the token is the caller's job; this only returns it.
pub async fn login<T: Transport + ?Sized>(transport: &T, request: &LoginRequest) -> ApiOutcome<LoginResponse> {
    normalize(transport.post(AUTH_LOGIN_PATH, request).await, LOGIN_FAILED)
}

/// `GET /api/v1/admin/`
pub async fn list<T: Transport + ?Sized>(transport: &T) -> ApiOutcome<Vec<Admin>> {
    normalize(transport.get(&collection_path(ADMIN_BASE_PATH), &[]).await, LIST_FAILED)
}

/// `GET /api/v1/admin/:id`
pub async fn get<T: Transport + ?Sized>(transport: &T, id: AdminId) -> ApiOutcome<Admin> {
    normalize(transport.get(&item_path(ADMIN_BASE_PATH, id), &[]).await, GET_FAILED)
}

/// `POST /api/v1/admin/create`
pub async fn create<T: Transport + ?Sized>(transport: &T, request: &CreateAdminRequest) -> ApiOutcome<Admin> {
    normalize(
        transport.post(&action_path(ADMIN_BASE_PATH, "create"), request).await,
        CREATE_FAILED,
    )
}

/// `PUT /api/v1/admin/:id`
pub async fn update<T: Transport + ?Sized>(
    transport: &T,
    id: AdminId,
    request: &UpdateAdminRequest,
) -> ApiOutcome<Admin> {
    normalize(transport.put(&item_path(ADMIN_BASE_PATH, id), request).await, UPDATE_FAILED)
}

/// `DELETE /api/v1/admin/:id`
pub async fn delete<T: Transport + ?Sized>(transport: &T, id: AdminId) -> ApiOutcome<Ack> {
    normalize(transport.delete(&item_path(ADMIN_BASE_PATH, id)).await, DELETE_FAILED)
}

/// `PATCH /api/v1/admin/:id/toggle-status`
pub async fn toggle_status<T: Transport + ?Sized>(
    transport: &T,
    id: AdminId,
) -> ApiOutcome<ToggleAdminStatusResponse> {
    normalize(
        transport
            .patch(&format!("{}/toggle-status", item_path(ADMIN_BASE_PATH, id)))
            .await,
        TOGGLE_FAILED,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{envelope_ok, respond_with};
    use crate::transport::{HttpMethod, MockTransport, TransportError};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.method == HttpMethod::Post
                    && r.path == "/api/v1/auth/login"
                    && r.body == Some(json!({ "username": "root", "password": "hunter2" }))
            })
            .times(1)
            .returning(|_| respond_with(envelope_ok(json!({ "token": "abc.def" }))));

        let request = LoginRequest {
            username: "root".into(),
            password: "hunter2".into(),
        };
        assert_eq!(login(&transport, &request).await.unwrap().data.token, "abc.def");
    }

    #[tokio::test]
    async fn test_login_rejected_with_server_message() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Err(TransportError::status(
                401,
                Some(json!({ "status": false, "message": "Invalid credentials" })),
            ))
        });

        let request = LoginRequest {
            username: "root".into(),
            password: "nope".into(),
        };
        let failure = login(&transport, &request).await.unwrap_err();
        assert_eq!(failure.message, "Invalid credentials");
        assert!(failure.is_unauthorized());
    }

    #[tokio::test]
    async fn test_toggle_status_path() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == HttpMethod::Patch && r.path == "/api/v1/admin/3/toggle-status")
            .times(1)
            .returning(|_| respond_with(envelope_ok(json!({ "id": 3, "newStatus": false }))));

        let reply = toggle_status(&transport, 3).await.unwrap();
        assert!(!reply.data.new_status);
    }
}
