use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde_derive::{Deserialize, Serialize};

/// 可选配置文件的默认位置
pub const CONFIG_PATH: &str = "scrap_run.toml";

/// 全局参数，启动时从 `scrap_run.toml` 读一次
#[derive(Resource, Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub data: DataConfig,
    pub inventory: InventoryConfig,
    pub economy: EconomyConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub items: String,
    pub missions: String,
    pub shops: String,
    pub scene: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            items: "data/scrapyard.items.ron".into(),
            missions: "data/scrapyard.missions.ron".into(),
            shops: "data/scrapyard.shops.ron".into(),
            scene: "data/scrapyard.scene.ron".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub capacity: usize,
    pub hotbar_size: usize,
    pub max_stack: u32,
    pub drop_force: f32,
    pub drop_upward_force: f32,
    /// 丢出物品出现在眼前多远处
    pub drop_distance: f32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: 36,
            hotbar_size: 8,
            max_stack: 20,
            drop_force: 5.0,
            drop_upward_force: 2.0,
            drop_distance: 0.8,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_money: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub standing_height: f32,
    pub crouching_height: f32,
    pub crouch_transition_speed: f32,
    pub standing_eye: f32,
    pub crouching_eye: f32,
    pub look_sensitivity: f32,
    pub look_smooth_time: f32,
    pub pitch_limit: f32,
    pub max_stamina: f32,
    pub stamina_regen: f32,
    pub stamina_drain: f32,
    pub min_stamina_to_sprint: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 10.0,
            crouch_speed: 2.5,
            jump_force: 5.0,
            gravity: 18.0,
            standing_height: 2.0,
            crouching_height: 1.0,
            crouch_transition_speed: 10.0,
            standing_eye: 1.6,
            crouching_eye: 0.7,
            look_sensitivity: 2.0,
            look_smooth_time: 0.03,
            pitch_limit: 80.0,
            max_stamina: 5.0,
            stamina_regen: 1.0,
            stamina_drain: 1.5,
            min_stamina_to_sprint: 1.0,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// 文件不存在就用默认值；文件有误则报告并忽略
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("配置文件被忽略：{err:#}");
                Self::default()
            }
        }
    }
}
