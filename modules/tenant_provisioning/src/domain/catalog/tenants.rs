//! Bootstrap tenants and their demo logins

use crate::contract::{NewTenant, PlanTier, TenantLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub domain: &'static str,
    pub plan: PlanTier,
    pub max_users: u32,
    pub max_storage_mb: u64,
}

impl TenantDefinition {
    pub fn to_new_tenant(&self) -> NewTenant {
        NewTenant {
            id: self.id.to_string(),
            name: self.name.to_string(),
            domain: self.domain.to_string(),
            plan: self.plan,
            limits: TenantLimits {
                max_users: self.max_users,
                max_storage_mb: self.max_storage_mb,
            },
        }
    }
}

pub const TENANT_DEFINITIONS: &[TenantDefinition] = &[
    TenantDefinition {
        id: "techco",
        name: "TechCo Solutions",
        domain: "techco.localhost",
        plan: PlanTier::Professional,
        max_users: 25,
        max_storage_mb: 10240,
    },
    TenantDefinition {
        id: "softwaredev",
        name: "SoftwareDev Inc",
        domain: "softwaredev.localhost",
        plan: PlanTier::Enterprise,
        max_users: 100,
        max_storage_mb: 51200,
    },
    TenantDefinition {
        id: "smallbiz",
        name: "SmallBiz Co",
        domain: "smallbiz.localhost",
        plan: PlanTier::Starter,
        max_users: 5,
        max_storage_mb: 2048,
    },
];

/// A login created in every tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoUser {
    /// Email local part; the address is `<local>@<tenant>.test`
    pub local_part: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

impl DemoUser {
    pub fn email_for(&self, tenant_id: &str) -> String {
        format!("{}@{}.test", self.local_part, tenant_id)
    }
}

pub const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        local_part: "admin",
        name: "Admin User",
        role: "admin",
    },
    DemoUser {
        local_part: "manager",
        name: "Manager User",
        role: "manager",
    },
    DemoUser {
        local_part: "sales",
        name: "Sales Rep",
        role: "sales_rep",
    },
    DemoUser {
        local_part: "viewer",
        name: "Read Only User",
        role: "read_only",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_email_uses_tenant_test_domain() {
        assert_eq!(DEMO_USERS[0].email_for("techco"), "admin@techco.test");
    }

    #[test]
    fn definitions_convert_with_limits() {
        let smallbiz = TENANT_DEFINITIONS[2].to_new_tenant();
        assert_eq!(smallbiz.plan, PlanTier::Starter);
        assert_eq!(smallbiz.limits.max_users, 5);
        assert_eq!(smallbiz.domain, "smallbiz.localhost");
    }
}
