//! Role based authorization policies.

use entity::status::UserRole;

/// Authorization policy attached to a group of endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AdminOnly,
    CompanyOnly,
    ProviderOnly,
    CompanyOrProvider,
    AdminOrCompany,
    AdminOrProvider,
    /// Any logged in user regardless of role
    Authenticated,
}

impl Policy {
    /// Whether a user with `role` satisfies the policy.
    pub fn allows(self, role: UserRole) -> bool {
        use UserRole::*;

        match self {
            Self::AdminOnly => role == Admin,
            Self::CompanyOnly => role == Company,
            Self::ProviderOnly => role == Provider,
            Self::CompanyOrProvider => matches!(role, Company | Provider),
            Self::AdminOrCompany => matches!(role, Admin | Company),
            Self::AdminOrProvider => matches!(role, Admin | Provider),
            Self::Authenticated => true,
        }
    }
}

/// Landing page for a role after login.
pub fn dashboard_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin/dashboard",
        UserRole::Company => "/company/dashboard",
        UserRole::Provider => "/provider/dashboard",
    }
}

#[cfg(test)]
mod tests {
    use entity::status::UserRole;

    use super::Policy;

    #[test]
    fn single_role_policies_only_allow_their_role() {
        assert!(Policy::AdminOnly.allows(UserRole::Admin));
        assert!(!Policy::AdminOnly.allows(UserRole::Company));
        assert!(Policy::CompanyOnly.allows(UserRole::Company));
        assert!(!Policy::CompanyOnly.allows(UserRole::Provider));
        assert!(Policy::ProviderOnly.allows(UserRole::Provider));
        assert!(!Policy::ProviderOnly.allows(UserRole::Admin));
    }

    #[test]
    fn combined_policies() {
        assert!(Policy::CompanyOrProvider.allows(UserRole::Provider));
        assert!(!Policy::CompanyOrProvider.allows(UserRole::Admin));
        assert!(Policy::AdminOrCompany.allows(UserRole::Admin));
        assert!(!Policy::AdminOrCompany.allows(UserRole::Provider));
        assert!(Policy::AdminOrProvider.allows(UserRole::Provider));
        assert!(Policy::Authenticated.allows(UserRole::Company));
    }
}
