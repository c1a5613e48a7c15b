//! Read-only stats projections
//!
//! Aggregations over the engine's committed state. Each call takes fresh
//! snapshots from the directory, so in-flight (uncommitted) batches are
//! never observed. Output is sorted by name for stable assertions.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roster_directory::{Directory, StoreError};

/// Distinct users holding one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUserCount {
    /// Role name.
    pub role_name: String,
    /// Distinct users holding the role.
    pub user_count: usize,
}

/// Member rows per organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMemberCount {
    /// Organization name.
    pub org_name: String,
    /// Member rows in the organization.
    pub member_count: usize,
}

/// Distinct users per (organization, role) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRoleUserCount {
    /// Organization name.
    pub org_name: String,
    /// Role name.
    pub role_name: String,
    /// Distinct users holding the role in the organization.
    pub user_count: usize,
}

/// Read-only projections over committed membership state.
pub struct StatsAggregator<D> {
    directory: Arc<D>,
}

impl<D> Clone for StatsAggregator<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D: Directory> StatsAggregator<D> {
    /// Create an aggregator over a directory.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Distinct users per role, across all organizations.
    ///
    /// One entry per role row; two organizations that each define a
    /// "Viewer" role produce two entries.
    pub async fn role_wise_user_counts(&self) -> Result<Vec<RoleUserCount>, StoreError> {
        let roles = self.directory.roles().await?;
        let members = self.directory.members().await?;

        let mut rows: Vec<(String, Uuid, usize)> = roles
            .into_iter()
            .map(|role| {
                let users: HashSet<Uuid> = members
                    .iter()
                    .filter(|m| m.role_id == role.id)
                    .map(|m| m.user_id)
                    .collect();
                (role.name, role.id, users.len())
            })
            .collect();
        rows.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

        Ok(rows
            .into_iter()
            .map(|(role_name, _, user_count)| RoleUserCount {
                role_name,
                user_count,
            })
            .collect())
    }

    /// Member rows per organization, including organizations with none.
    pub async fn org_wise_member_counts(&self) -> Result<Vec<OrgMemberCount>, StoreError> {
        let orgs = self.directory.organizations().await?;
        let members = self.directory.members().await?;

        let mut rows: Vec<(String, Uuid, usize)> = orgs
            .into_iter()
            .map(|org| {
                let count = members.iter().filter(|m| m.org_id == org.id).count();
                (org.name, org.id, count)
            })
            .collect();
        rows.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

        Ok(rows
            .into_iter()
            .map(|(org_name, _, member_count)| OrgMemberCount {
                org_name,
                member_count,
            })
            .collect())
    }

    /// Distinct users per (organization, role) pair, including roles with
    /// no members.
    pub async fn org_role_wise_user_counts(&self) -> Result<Vec<OrgRoleUserCount>, StoreError> {
        let orgs = self.directory.organizations().await?;
        let roles = self.directory.roles().await?;
        let members = self.directory.members().await?;

        let mut rows: Vec<(String, String, Uuid, usize)> = Vec::new();
        for org in &orgs {
            for role in roles.iter().filter(|r| r.org_id == org.id) {
                let users: HashSet<Uuid> = members
                    .iter()
                    .filter(|m| m.org_id == org.id && m.role_id == role.id)
                    .map(|m| m.user_id)
                    .collect();
                rows.push((org.name.clone(), role.name.clone(), role.id, users.len()));
            }
        }
        rows.sort_by(|a, b| (&a.0, &a.1, a.2).cmp(&(&b.0, &b.1, b.2)));

        Ok(rows
            .into_iter()
            .map(|(org_name, role_name, _, user_count)| OrgRoleUserCount {
                org_name,
                role_name,
                user_count,
            })
            .collect())
    }
}
