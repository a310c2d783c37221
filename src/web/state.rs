use std::sync::Arc;

use super::flash::FlashMessages;
use crate::config::ExtensionConfig;
use crate::extension::GroupExtension;
use crate::groups::GroupDirectory;

#[derive(Clone)]
pub struct AppState {
    pub extension: Arc<dyn GroupExtension>,
    pub config: Arc<ExtensionConfig>,
    pub groups: Arc<GroupDirectory>,
    pub flash: Arc<FlashMessages>,
}

impl AppState {
    pub fn new(
        extension: Arc<dyn GroupExtension>,
        config: ExtensionConfig,
        groups: Arc<GroupDirectory>,
    ) -> Self {
        Self {
            extension,
            config: Arc::new(config),
            groups,
            flash: Arc::new(FlashMessages::new()),
        }
    }
}
