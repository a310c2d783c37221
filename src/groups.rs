use crate::core::{FieldsError, Group, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// Groups known to the host, looked up by slug
#[derive(Debug, Default)]
pub struct GroupDirectory {
    groups: RwLock<HashMap<String, Group>>,
}

impl GroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a group
    pub fn insert(&self, group: Group) -> Result<()> {
        self.groups.write()?.insert(group.slug.clone(), group);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Result<Option<Group>> {
        Ok(self.groups.read()?.get(slug).cloned())
    }

    /// Like [`GroupDirectory::get`] but a missing group is an error
    pub fn require(&self, slug: &str) -> Result<Group> {
        self.get(slug)?
            .ok_or_else(|| FieldsError::GroupNotFound(slug.to_string()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.groups.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_slug() {
        let groups = GroupDirectory::new();
        groups.insert(Group::new(1, "chess", "Chess")).unwrap();

        assert_eq!(groups.get("chess").unwrap().unwrap().name, "Chess");
        assert!(groups.get("go").unwrap().is_none());
        assert!(matches!(
            groups.require("go").unwrap_err(),
            FieldsError::GroupNotFound(slug) if slug == "go"
        ));
        assert_eq!(groups.len().unwrap(), 1);
    }
}
