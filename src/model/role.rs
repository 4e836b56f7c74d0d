use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    ToSchema,
    sqlx::Type,
)]
pub enum Role {
    #[serde(rename = "Employee")]
    #[strum(serialize = "Employee")]
    #[sqlx(rename = "Employee")]
    Employee,

    #[serde(rename = "HR Team")]
    #[strum(serialize = "HR Team")]
    #[sqlx(rename = "HR Team")]
    HrTeam,

    #[serde(rename = "Manager")]
    #[strum(serialize = "Manager")]
    #[sqlx(rename = "Manager")]
    Manager,

    #[serde(rename = "Finance")]
    #[strum(serialize = "Finance")]
    #[sqlx(rename = "Finance")]
    Finance,

    #[serde(rename = "Company Owner")]
    #[strum(serialize = "Company Owner")]
    #[sqlx(rename = "Company Owner")]
    CompanyOwner,
}

/// Named permission checked at operation boundaries.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumIter)]
pub enum Capability {
    #[strum(serialize = "owner")]
    Owner,
    #[strum(serialize = "hr")]
    Hr,
    #[strum(serialize = "manager")]
    Manager,
    #[strum(serialize = "finance")]
    Finance,
    /// Leave decisions and activation toggles
    #[strum(serialize = "supervisor")]
    Supervisor,
}

impl Capability {
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Capability::Owner => &[Role::CompanyOwner],
            Capability::Hr => &[Role::HrTeam, Role::CompanyOwner],
            Capability::Manager => &[Role::Manager, Role::CompanyOwner],
            Capability::Finance => &[Role::Finance, Role::CompanyOwner],
            Capability::Supervisor => &[Role::HrTeam, Role::Manager, Role::CompanyOwner],
        }
    }

    fn denial_message(self) -> &'static str {
        match self {
            Capability::Owner => "Access denied. Company Owner privileges required.",
            Capability::Hr => "Access denied. HR Team privileges required.",
            Capability::Manager => "Access denied. Manager privileges required.",
            Capability::Finance => "Access denied. Finance privileges required.",
            Capability::Supervisor => "Access denied. HR, Manager or Owner privileges required.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub capability: Capability,
    message: &'static str,
}

impl AccessDenied {
    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Role gate. `None` is an unauthenticated actor and is always denied.
pub fn authorize(role: Option<Role>, capability: Capability) -> Result<(), AccessDenied> {
    match role {
        Some(role) if capability.allowed_roles().contains(&role) => Ok(()),
        Some(_) => Err(AccessDenied {
            capability,
            message: capability.denial_message(),
        }),
        None => Err(AccessDenied {
            capability,
            message: "Please log in to access this page.",
        }),
    }
}

impl Role {
    pub fn can(self, capability: Capability) -> bool {
        authorize(Some(self), capability).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn owner_passes_every_gate() {
        for cap in Capability::iter() {
            assert!(Role::CompanyOwner.can(cap), "owner denied {cap}");
        }
    }

    #[test]
    fn plain_employee_passes_no_gate() {
        for cap in Capability::iter() {
            assert!(!Role::Employee.can(cap));
        }
    }

    #[test]
    fn gate_table() {
        assert!(Role::HrTeam.can(Capability::Hr));
        assert!(!Role::HrTeam.can(Capability::Owner));
        assert!(!Role::HrTeam.can(Capability::Finance));
        assert!(Role::HrTeam.can(Capability::Supervisor));

        assert!(Role::Manager.can(Capability::Manager));
        assert!(Role::Manager.can(Capability::Supervisor));
        assert!(!Role::Manager.can(Capability::Hr));

        assert!(Role::Finance.can(Capability::Finance));
        assert!(!Role::Finance.can(Capability::Supervisor));
    }

    #[test]
    fn unauthenticated_is_always_denied() {
        for cap in Capability::iter() {
            let denied = authorize(None, cap).unwrap_err();
            assert_eq!(denied.capability, cap);
            assert!(!denied.message().is_empty());
        }
    }

    #[test]
    fn denial_names_the_missing_privilege() {
        let denied = authorize(Some(Role::Employee), Capability::Hr).unwrap_err();
        assert_eq!(denied.message(), "Access denied. HR Team privileges required.");
    }

    #[test]
    fn role_text_round_trips() {
        for role in Role::iter() {
            assert_eq!(Role::from_str(role.as_ref()).unwrap(), role);
        }
        assert_eq!(Role::HrTeam.to_string(), "HR Team");
        assert!(Role::from_str("Admin").is_err());
    }
}
