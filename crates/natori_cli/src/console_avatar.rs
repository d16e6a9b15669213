//! Stand-in renderer that prints avatar commands to the console.

use anyhow::Result;
use natori_core::{AvatarAssets, AvatarCapability};
use std::collections::BTreeSet;
use std::sync::Mutex;

pub struct ConsoleAvatar {
    assets: AvatarAssets,
    /// What the "renderer" shows right now, speaking face included.
    showing: Mutex<String>,
}

impl ConsoleAvatar {
    pub fn new(assets: AvatarAssets, initial_expression: &str) -> Self {
        Self {
            assets,
            showing: Mutex::new(initial_expression.to_string()),
        }
    }

    pub fn showing(&self) -> String {
        self.showing
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl AvatarCapability for ConsoleAvatar {
    fn is_available(&self) -> bool {
        true
    }

    fn available_expressions(&self) -> BTreeSet<String> {
        self.assets.expressions.clone()
    }

    fn available_motion_groups(&self) -> BTreeSet<String> {
        self.assets.motion_groups.clone()
    }

    fn set_expression(&self, name: &str) -> Result<bool> {
        if !self.assets.has_expression(name) {
            return Ok(false);
        }
        if let Ok(mut showing) = self.showing.lock() {
            *showing = name.to_string();
        }
        println!("  [avatar] 表情 → {}", name);
        Ok(true)
    }

    fn play_motion(&self, group_name: &str) -> Result<bool> {
        if !self.assets.has_motion_group(group_name) {
            return Ok(false);
        }
        println!("  [avatar] モーション → {}", group_name);
        Ok(true)
    }

    fn start_lip_sync(&self) -> Result<()> {
        println!("  [avatar] 口パク開始");
        Ok(())
    }

    fn stop_lip_sync(&self) -> Result<()> {
        println!("  [avatar] 口パク終了");
        Ok(())
    }
}
