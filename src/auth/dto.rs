use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload. The token carries enough identity to render a session without
/// a lookup, but the guard still re-resolves the user on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_serializes_envelope() {
        let resp = AuthResponse {
            success: true,
            token: "tok".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["user"]["email"], "ada@example.com");
        assert!(v["user"].get("password_hash").is_none());
    }
}
