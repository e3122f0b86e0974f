// Code Template Service - instantiation snippets and testbench scaffolding

use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::application::bridge::{ExternalToolBridge, InvocationOptions};
use crate::application::cancel::CancelToken;
use crate::application::constants::{
    MSG_INSTANTIATION_COPIED, MSG_TEMPLATE_MISSING, MSG_TESTBENCH_GENERATED,
};
use crate::domain::{Delivery, ToolMode};
use crate::error::{BridgeError, Result};

pub struct CodeTemplateService {
    bridge: Arc<ExternalToolBridge>,
}

impl CodeTemplateService {
    pub fn new(bridge: Arc<ExternalToolBridge>) -> Self {
        Self { bridge }
    }

    /// Copy the instantiation of the active module to the clipboard
    pub async fn instantiate(&self, cancel: CancelToken) -> Result<Delivery> {
        let document = self
            .bridge
            .host()
            .active_document()
            .await
            .ok_or(BridgeError::NoActiveDocument)?;

        let delivery = self
            .bridge
            .run(
                ToolMode::Instantiate,
                &document,
                &InvocationOptions::default(),
                cancel,
            )
            .await?;

        self.bridge.host().show_info(MSG_INSTANTIATION_COPIED).await;
        Ok(delivery)
    }

    /// Open a generated testbench for the active module in a new document
    pub async fn testbench(&self, cancel: CancelToken) -> Result<Delivery> {
        let document = self
            .bridge
            .host()
            .active_document()
            .await
            .ok_or(BridgeError::NoActiveDocument)?;

        let template_path = match self.resolve_template().await {
            Ok(path) => path,
            Err(BridgeError::ConfigPathInvalid(path)) => {
                warn!(template = %path.display(), "Testbench template not found, using default");
                self.bridge.host().show_warning(MSG_TEMPLATE_MISSING).await;
                None
            }
            Err(e) => return Err(e),
        };

        let delivery = self
            .bridge
            .run(
                ToolMode::Testbench,
                &document,
                &InvocationOptions::with_template(template_path),
                cancel,
            )
            .await?;

        self.bridge.host().show_info(MSG_TESTBENCH_GENERATED).await;
        Ok(delivery)
    }

    /// Configured testbench template
    ///
    /// # Errors
    /// - BridgeError::ConfigPathInvalid if a template is configured but missing
    pub async fn resolve_template(&self) -> Result<Option<PathBuf>> {
        match self.bridge.settings().configured_template() {
            None => Ok(None),
            Some(path) if self.bridge.files().exists(&path).await => Ok(Some(path)),
            Some(path) => Err(BridgeError::ConfigPathInvalid(path)),
        }
    }
}
