//! Profile permissions.
//!
//! A profile grants a set of named permissions. Names not listed in
//! [`Permission`] are kept as stored but never checked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PERM_MANAGE_USERS: &str = "gerenciar_usuarios";
pub const PERM_MANAGE_ORGANIZATIONS: &str = "gerenciar_orgaos";
pub const PERM_GENERATE_REPORTS: &str = "gerar_relatorios";
pub const PERM_VIEW_GLOBAL_REPORTS: &str = "visualizar_relatorios_gerais";
pub const PERM_VIEW_ALL_ASSESSMENTS: &str = "visualizar_todas_avaliacoes";
pub const PERM_CREATE_ASSESSMENTS: &str = "criar_avaliacoes";
pub const PERM_EDIT_ASSESSMENTS: &str = "editar_avaliacoes";
pub const PERM_FINALIZE_ASSESSMENTS: &str = "finalizar_avaliacoes";
pub const PERM_EXPORT_DATA: &str = "exportar_dados";

/// Name of the seeded profile that holds every permission.
pub const ADMIN_PROFILE_NAME: &str = "Administrador CGE";

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    ManageUsers,
    ManageOrganizations,
    GenerateReports,
    ViewGlobalReports,
    ViewAllAssessments,
    CreateAssessments,
    EditAssessments,
    FinalizeAssessments,
    ExportData,
}

impl Permission {
    pub const ALL: [Permission; 9] = [
        Self::ManageUsers,
        Self::ManageOrganizations,
        Self::GenerateReports,
        Self::ViewGlobalReports,
        Self::ViewAllAssessments,
        Self::CreateAssessments,
        Self::EditAssessments,
        Self::FinalizeAssessments,
        Self::ExportData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => PERM_MANAGE_USERS,
            Self::ManageOrganizations => PERM_MANAGE_ORGANIZATIONS,
            Self::GenerateReports => PERM_GENERATE_REPORTS,
            Self::ViewGlobalReports => PERM_VIEW_GLOBAL_REPORTS,
            Self::ViewAllAssessments => PERM_VIEW_ALL_ASSESSMENTS,
            Self::CreateAssessments => PERM_CREATE_ASSESSMENTS,
            Self::EditAssessments => PERM_EDIT_ASSESSMENTS,
            Self::FinalizeAssessments => PERM_FINALIZE_ASSESSMENTS,
            Self::ExportData => PERM_EXPORT_DATA,
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PermissionSet
// ---------------------------------------------------------------------------

/// Permission name -> granted. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, bool>);

impl PermissionSet {
    pub fn from_grants<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self(grants.into_iter().map(|(name, granted)| (name.into(), granted)).collect())
    }

    /// Every known permission granted.
    pub fn all() -> Self {
        Self::from_grants(Permission::ALL.iter().map(|p| (p.as_str(), true)))
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.0.get(permission.as_str()).copied().unwrap_or(false)
    }

    /// Granted names, in name order.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, granted)| (name.as_str(), *granted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for p in Permission::ALL {
            assert_eq!(Permission::from_str_value(p.as_str()), Some(p));
        }
        assert_eq!(Permission::from_str_value("voar"), None);
    }

    #[test]
    fn missing_and_denied_permissions_are_not_allowed() {
        let set = PermissionSet::from_grants([
            (PERM_CREATE_ASSESSMENTS, true),
            (PERM_EXPORT_DATA, false),
        ]);
        assert!(set.allows(Permission::CreateAssessments));
        assert!(!set.allows(Permission::ExportData));
        assert!(!set.allows(Permission::ManageUsers));
        assert_eq!(set.granted().collect::<Vec<_>>(), vec![PERM_CREATE_ASSESSMENTS]);
    }

    #[test]
    fn all_grants_everything() {
        let set = PermissionSet::all();
        assert!(Permission::ALL.iter().all(|p| set.allows(*p)));
    }

    #[test]
    fn serializes_as_object() {
        let set = PermissionSet::from_grants([(PERM_MANAGE_USERS, true)]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({"gerenciar_usuarios": true}));
    }
}
