//! Principal extraction.
//!
//! Authentication happens upstream: the identity service forwards the
//! authenticated user as `X-User-Id` / `X-User-Role` headers. Handlers receive
//! the principal as an explicit argument and never read it from shared state.

use std::str::FromStr;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Candidate,
    Admin,
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CANDIDATE" => Ok(Self::Candidate),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(ApiError::Unauthorized("unknown role")),
        }
    }
}

/// Any authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

/// An authenticated user holding the `CANDIDATE` role.
#[derive(Debug, Clone, Copy)]
pub struct Candidate(pub Principal);

/// An authenticated user holding the `ADMIN` role.
#[derive(Debug, Clone, Copy)]
pub struct Admin(pub Principal);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or(ApiError::Unauthorized("missing principal"))?
            .trim()
            .parse()
            .map_err(|_| ApiError::Unauthorized("malformed user id"))?;
        let role = header(parts, USER_ROLE_HEADER)
            .ok_or(ApiError::Unauthorized("missing role"))?
            .trim()
            .parse()?;

        Ok(Principal { user_id, role })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Candidate {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        match principal.role {
            Role::Candidate => Ok(Candidate(principal)),
            Role::Admin => Err(ApiError::Forbidden("candidates only")),
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        match principal.role {
            Role::Admin => Ok(Admin(principal)),
            Role::Candidate => Err(ApiError::Forbidden("admin only")),
        }
    }
}
