/// Answers who is saving and from which screen.
///
/// The host decides these per request; the save pass only reads them.
pub trait AccessContext {
    fn is_current_user_group_admin(&self) -> bool;

    fn is_group_creation_flow(&self) -> bool;

    /// Current step of the creation wizard, when inside it
    fn current_create_step(&self) -> Option<&str>;

    /// Admins edit; anyone walking through the creation wizard may fill in
    /// the fields of the group being created.
    fn may_save(&self) -> bool {
        self.is_current_user_group_admin() || self.is_group_creation_flow()
    }
}

/// Access facts resolved once at the request boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAccess {
    pub is_group_admin: bool,
    pub create_step: Option<String>,
}

impl RequestAccess {
    /// Editing an existing group
    pub fn edit(is_group_admin: bool) -> Self {
        Self {
            is_group_admin,
            create_step: None,
        }
    }

    /// Inside the creation wizard at `step`
    pub fn creation(step: impl Into<String>) -> Self {
        Self {
            is_group_admin: false,
            create_step: Some(step.into()),
        }
    }

    /// No rights at all
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl AccessContext for RequestAccess {
    fn is_current_user_group_admin(&self) -> bool {
        self.is_group_admin
    }

    fn is_group_creation_flow(&self) -> bool {
        self.create_step.is_some()
    }

    fn current_create_step(&self) -> Option<&str> {
        self.create_step.as_deref()
    }
}
