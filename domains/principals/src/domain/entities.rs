//! Domain entities for the Principals domain
//!
//! Users own projects and work on tasks; groups grant access to projects and
//! form a parent/child hierarchy. Membership in a child group implies
//! membership in every ancestor group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use cms_common::{Error, Result};

use crate::domain::validation::{validate_principal_name, MAX_PRINCIPAL_NAME_LEN};

/// Maximum group or user description length
pub const MAX_DESCRIPTION_LEN: usize = 255;

fn check_name(kind: &str, name: &str) -> Result<()> {
    if !validate_principal_name(name) {
        return Err(Error::Validation(format!(
            "{} name must be 1-{} characters of letters, digits, '_', '-', '.' or inner spaces",
            kind, MAX_PRINCIPAL_NAME_LEN
        )));
    }
    Ok(())
}

fn check_description(kind: &str, description: &str) -> Result<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(Error::Validation(format!(
            "{} description must be ≤{} characters",
            kind, MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub description: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with validation
    pub fn new(name: String, email: String, description: String) -> Result<Self> {
        check_name("User", &name)?;
        check_description("User", &description)?;
        if !email.validate_email() {
            return Err(Error::Validation("Invalid email format".to_string()));
        }

        Ok(User {
            id: Uuid::new_v4(),
            name,
            email,
            description,
            disabled: false,
            created_at: Utc::now(),
        })
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        check_name("User", &self.name)?;
        check_description("User", &self.description)?;
        if !self.email.validate_email() {
            return Err(Error::Validation("Invalid email format".to_string()));
        }
        Ok(())
    }
}

bitflags::bitflags! {
    /// Group flag bit set
    ///
    /// Serialized as the raw bit value; unknown bits are rejected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(try_from = "u32", into = "u32")]
    pub struct GroupFlags: u32 {
        const DISABLED = 1;
        const ROLE = 2;
        const PROJECT_MANAGER = 4;
        const PROJECT_COWORKER = 8;
    }
}

impl GroupFlags {
    /// No flags set: an enabled plain group
    pub const ENABLED: GroupFlags = GroupFlags::empty();
}

impl Default for GroupFlags {
    fn default() -> Self {
        Self::ENABLED
    }
}

impl TryFrom<u32> for GroupFlags {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        GroupFlags::from_bits(bits).ok_or_else(|| {
            Error::Validation(format!("Unknown group flag bits: {:#x}", bits))
        })
    }
}

impl From<GroupFlags> for u32 {
    fn from(flags: GroupFlags) -> u32 {
        flags.bits()
    }
}

/// Group entity
///
/// Two groups are equal when their ids are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub flags: GroupFlags,
    pub parent_id: Option<Uuid>,
}

impl Group {
    /// Create a new group with validation
    pub fn new(
        name: String,
        description: String,
        flags: GroupFlags,
        parent_id: Option<Uuid>,
    ) -> Result<Self> {
        check_name("Group", &name)?;
        check_description("Group", &description)?;

        Ok(Group {
            id: Uuid::new_v4(),
            name,
            description,
            flags,
            parent_id,
        })
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        check_name("Group", &self.name)?;
        check_description("Group", &self.description)?;
        if self.parent_id == Some(self.id) {
            return Err(Error::Validation(
                "Group cannot be its own parent".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_disabled(&self) -> bool {
        self.flags.contains(GroupFlags::DISABLED)
    }

    pub fn enable(&mut self) {
        self.flags.set(GroupFlags::DISABLED, false);
    }

    pub fn disable(&mut self) {
        self.flags.set(GroupFlags::DISABLED, true);
    }

    pub fn is_role(&self) -> bool {
        self.flags.contains(GroupFlags::ROLE)
    }

    pub fn set_role(&mut self, value: bool) {
        self.flags.set(GroupFlags::ROLE, value);
    }

    pub fn is_project_manager(&self) -> bool {
        self.flags.contains(GroupFlags::PROJECT_MANAGER)
    }

    pub fn set_project_manager(&mut self, value: bool) {
        self.flags.set(GroupFlags::PROJECT_MANAGER, value);
    }

    pub fn is_project_coworker(&self) -> bool {
        self.flags.contains(GroupFlags::PROJECT_COWORKER)
    }

    pub fn set_project_coworker(&mut self, value: bool) {
        self.flags.set(GroupFlags::PROJECT_COWORKER, value);
    }

    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Group {}

impl std::hash::Hash for Group {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
