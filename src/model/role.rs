use strum_macros::Display;

/// Role id carried in the bearer token claims.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Admin and HR may decide leave requests and manage allocations.
    pub fn is_approver(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}
