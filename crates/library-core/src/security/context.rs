//! Security context that flows through field access checks.

use std::collections::HashSet;

/// Identity of the caller, as the host framework resolved it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    /// Host user id.
    pub user_id: i64,
    /// Groups the user belongs to, by external id (`base.group_user`).
    pub groups: HashSet<String>,
    /// Elevated mode: group restrictions do not apply.
    pub sudo: bool,
}

impl SecurityContext {
    /// Create a context for a user with no groups.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            groups: HashSet::new(),
            sudo: false,
        }
    }

    /// The superuser context computed fields run under when marked `sudo`.
    pub fn superuser() -> Self {
        Self {
            user_id: 1,
            groups: HashSet::new(),
            sudo: true,
        }
    }

    /// Add a group membership.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Same user with group restrictions lifted.
    pub fn elevated(&self) -> Self {
        Self {
            sudo: true,
            ..self.clone()
        }
    }

    /// Check group membership.
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Check membership of any of `groups`.
    pub fn has_any_group(&self, groups: &[String]) -> bool {
        groups.iter().any(|g| self.has_group(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups() {
        let ctx = SecurityContext::new(7).with_group("base.group_user");

        assert!(ctx.has_group("base.group_user"));
        assert!(!ctx.has_group("base.group_system"));
        assert!(ctx.has_any_group(&["x".into(), "base.group_user".into()]));
        assert!(!ctx.has_any_group(&[]));
    }

    #[test]
    fn test_elevated_keeps_identity() {
        let ctx = SecurityContext::new(7).with_group("g");
        let sudo = ctx.elevated();

        assert!(sudo.sudo);
        assert_eq!(sudo.user_id, 7);
        assert!(sudo.has_group("g"));
        assert!(SecurityContext::superuser().sudo);
    }
}
