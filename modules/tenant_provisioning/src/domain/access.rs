//! Roles, permissions and the per-module access matrix

use super::catalog::permissions::{
    GUARD_NAME, MANAGER_PERMISSIONS, PERMISSIONS, READ_ONLY_PERMISSIONS, SALES_REP_PERMISSIONS,
};
use super::repository::TenantStore;
use crate::contract::{
    AccessLevel, Ensured, Module, ModuleAccess, ModulePermission, NewModulePermission,
    ProvisioningResult, Role, SkipReason, Tally,
};
use tracing::{debug, info, warn};

/// Canonical roles known to the provisioner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Admin,
    Manager,
    SalesRep,
    ReadOnly,
    /// Any role created outside the canonical set
    Custom,
}

impl RoleKind {
    pub const CANONICAL: [RoleKind; 4] =
        [Self::Admin, Self::Manager, Self::SalesRep, Self::ReadOnly];

    pub fn from_name(name: &str) -> Self {
        match name {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "sales_rep" => Self::SalesRep,
            "read_only" => Self::ReadOnly,
            _ => Self::Custom,
        }
    }

    /// Role name; `None` for custom roles
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("admin"),
            Self::Manager => Some("manager"),
            Self::SalesRep => Some("sales_rep"),
            Self::ReadOnly => Some("read_only"),
            Self::Custom => None,
        }
    }

    /// Permission set granted to the role
    pub fn selector(self) -> PermissionSelector<'static> {
        match self {
            Self::Admin => PermissionSelector::All,
            Self::Manager => PermissionSelector::Explicit(MANAGER_PERMISSIONS),
            Self::SalesRep => PermissionSelector::Explicit(SALES_REP_PERMISSIONS),
            Self::ReadOnly | Self::Custom => PermissionSelector::Explicit(READ_ONLY_PERMISSIONS),
        }
    }

    /// Default module access of the role
    pub fn default_access(self) -> ModuleAccess {
        let (create, edit, delete, export, import, level) = match self {
            Self::Admin => (true, true, true, true, true, AccessLevel::All),
            Self::Manager => (true, true, false, true, true, AccessLevel::All),
            Self::SalesRep => (true, true, false, true, false, AccessLevel::Own),
            Self::ReadOnly => (false, false, false, false, false, AccessLevel::All),
            Self::Custom => (false, false, false, false, false, AccessLevel::Own),
        };
        ModuleAccess {
            can_view: true,
            can_create: create,
            can_edit: edit,
            can_delete: delete,
            can_export: export,
            can_import: import,
            access_level: level,
            field_restrictions: Vec::new(),
        }
    }
}

/// Default module access for a role name; unknown names get view-own access
pub fn defaults_for_role(name: &str) -> ModuleAccess {
    RoleKind::from_name(name).default_access()
}

/// Which permissions a role holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionSelector<'a> {
    /// Every permission known at the time of the run
    All,
    Explicit(&'a [&'a str]),
}

/// Provisions roles, permissions and module permission rows in one tenant
pub struct AccessProvisioner {
    store: TenantStore,
}

impl AccessProvisioner {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    // ===== Permissions and roles =====

    /// Create every missing permission; existing ones are left untouched
    pub async fn ensure_permissions(&self, names: &[&str]) -> ProvisioningResult<Tally> {
        let mut tally = Tally::default();
        for name in names {
            let outcome = match self.store.roles.find_permission(name).await? {
                Some(existing) => Ensured::Existing(existing),
                None => Ensured::Created(
                    self.store.roles.create_permission(name, GUARD_NAME).await?,
                ),
            };
            tally.record(&outcome);
        }
        debug!(
            created = tally.created,
            existing = tally.existing,
            "Permissions ensured"
        );
        Ok(tally)
    }

    /// Find or create the role, then replace its permission set with `selector`
    pub async fn ensure_role(
        &self,
        name: &str,
        selector: PermissionSelector<'_>,
    ) -> ProvisioningResult<Ensured<Role>> {
        let role = match self.store.roles.find_role(name).await? {
            Some(existing) => Ensured::Existing(existing),
            None => Ensured::Created(self.store.roles.create_role(name, GUARD_NAME).await?),
        };

        let permission_ids = match selector {
            PermissionSelector::All => self
                .store
                .roles
                .list_permissions()
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect::<Vec<_>>(),
            PermissionSelector::Explicit(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for permission in names {
                    let permission = match self.store.roles.find_permission(permission).await? {
                        Some(p) => p,
                        None => {
                            self.store
                                .roles
                                .create_permission(permission, GUARD_NAME)
                                .await?
                        }
                    };
                    ids.push(permission.id);
                }
                ids
            }
        };

        self.store
            .roles
            .sync_permissions(role.get().id, &permission_ids)
            .await?;
        debug!(role = name, permissions = permission_ids.len(), "Role permissions synced");
        Ok(role)
    }

    /// The full permission catalog plus the four canonical roles
    pub async fn provision_roles(&self) -> ProvisioningResult<Tally> {
        let mut tally = self.ensure_permissions(PERMISSIONS).await?;
        for kind in RoleKind::CANONICAL {
            if let Some(name) = kind.name() {
                let role = self.ensure_role(name, kind.selector()).await?;
                tally.record(&role);
            }
        }
        info!(
            permissions = PERMISSIONS.len(),
            roles = RoleKind::CANONICAL.len(),
            "Roles and permissions provisioned"
        );
        Ok(tally)
    }

    // ===== Module permission matrix =====

    /// Create the (role, module) row with role defaults; an existing row is never overwritten
    pub async fn ensure_module_permission(
        &self,
        role: &Role,
        module: &Module,
    ) -> ProvisioningResult<Ensured<ModulePermission>> {
        if let Some(existing) = self.store.module_permissions.find(role.id, module.id).await? {
            return Ok(Ensured::Existing(existing));
        }
        let created = self
            .store
            .module_permissions
            .create(&NewModulePermission {
                role_id: role.id,
                module_id: module.id,
                access: defaults_for_role(&role.name),
            })
            .await?;
        Ok(Ensured::Created(created))
    }

    /// One row per (role, module) pair currently in the tenant
    pub async fn provision_matrix(&self) -> ProvisioningResult<Tally> {
        let mut tally = Tally::default();

        let roles = self.store.roles.list_roles().await?;
        if roles.is_empty() {
            warn!("No roles found, run role provisioning first");
            tally.skip("module permissions", SkipReason::NoRoles);
            return Ok(tally);
        }

        let modules = self.store.modules.list_all().await?;
        if modules.is_empty() {
            warn!("No modules found, run module provisioning first");
            tally.skip("module permissions", SkipReason::NoModules);
            return Ok(tally);
        }

        for role in &roles {
            for module in &modules {
                let outcome = self.ensure_module_permission(role, module).await?;
                tally.record(&outcome);
            }
        }

        info!(
            roles = roles.len(),
            modules = modules.len(),
            created = tally.created,
            "Module permission matrix provisioned"
        );
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for kind in RoleKind::CANONICAL {
            let name = kind.name().unwrap_or_default();
            assert_eq!(RoleKind::from_name(name), kind);
        }
        assert_eq!(RoleKind::from_name("auditor"), RoleKind::Custom);
    }

    #[test]
    fn defaults_follow_role_table() {
        let admin = defaults_for_role("admin");
        assert!(admin.can_delete && admin.can_import);
        assert_eq!(admin.access_level, AccessLevel::All);

        let manager = defaults_for_role("manager");
        assert!(manager.can_edit && !manager.can_delete && manager.can_import);

        let sales = defaults_for_role("sales_rep");
        assert!(sales.can_create && !sales.can_import);
        assert_eq!(sales.access_level, AccessLevel::Own);

        let read_only = defaults_for_role("read_only");
        assert!(read_only.can_view && !read_only.can_create && !read_only.can_export);
        assert_eq!(read_only.access_level, AccessLevel::All);
    }

    #[test]
    fn unknown_role_gets_minimal_access() {
        let access = defaults_for_role("partner");
        assert!(access.can_view);
        assert!(!access.can_create && !access.can_edit && !access.can_delete);
        assert!(!access.can_export && !access.can_import);
        assert_eq!(access.access_level, AccessLevel::Own);
        assert!(access.field_restrictions.is_empty());
    }
}
