use crate::error::AppError;
use crate::model::role::{Capability, Role, authorize};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Authenticated actor attached to a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub employee_id: i64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // set by the auth middleware on protected scopes
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::Authentication("Missing token".into()))),
        }
    }
}

impl AuthUser {
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        authorize(Some(self.role), capability)?;
        Ok(())
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Acting on one's own record, or holding `capability`.
    pub fn require_self_or(&self, employee_id: i64, capability: Capability) -> Result<(), AppError> {
        if self.employee_id == employee_id {
            Ok(())
        } else {
            self.require(capability)
        }
    }
}
