//! Avatar capability contract.
//!
//! The renderer (a Live2D model in the browser, a console stand-in in the
//! CLI) is an external collaborator. The core only needs to know whether it
//! is ready, which assets it declares, and how to issue commands to it.

use crate::config::AvatarConfig;
use anyhow::Result;
use std::collections::BTreeSet;

/// Expression and motion-group names an avatar model declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarAssets {
    pub expressions: BTreeSet<String>,
    pub motion_groups: BTreeSet<String>,
}

impl AvatarAssets {
    pub fn new<E, M>(expressions: E, motion_groups: M) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            expressions: expressions.into_iter().map(Into::into).collect(),
            motion_groups: motion_groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Assets shipped with the Natori model.
    pub fn natori() -> Self {
        Self::from_config(&AvatarConfig::default())
    }

    pub fn from_config(config: &AvatarConfig) -> Self {
        Self::new(config.expressions.clone(), config.motion_groups.clone())
    }

    pub fn has_expression(&self, name: &str) -> bool {
        self.expressions.contains(name)
    }

    pub fn has_motion_group(&self, name: &str) -> bool {
        self.motion_groups.contains(name)
    }
}

/// Commands the emotion pipeline can issue to the avatar renderer.
///
/// Commands are fire-and-forget: the renderer animates asynchronously and
/// the returned flag only says whether the command was accepted. An `Err`
/// means the call itself failed; callers treat it like `Ok(false)`.
pub trait AvatarCapability: Send + Sync {
    /// False until a model is loaded and ready for commands.
    fn is_available(&self) -> bool;

    fn available_expressions(&self) -> BTreeSet<String>;

    fn available_motion_groups(&self) -> BTreeSet<String>;

    fn set_expression(&self, name: &str) -> Result<bool>;

    fn play_motion(&self, group_name: &str) -> Result<bool>;

    fn start_lip_sync(&self) -> Result<()> {
        Ok(())
    }

    fn stop_lip_sync(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natori_assets() {
        let assets = AvatarAssets::natori();
        assert!(assets.has_expression("Smile"));
        assert!(assets.has_expression("exp_05"));
        assert!(!assets.has_expression("Wink"));
        assert!(assets.has_motion_group("FlickDown@Body"));
        assert!(!assets.has_motion_group("Dance"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let assets = AvatarAssets::new(["Smile"], ["Idle"]);
        assert!(!assets.has_expression("smile"));
        assert!(!assets.has_motion_group("idle"));
    }
}
