use bevy::prelude::*;

pub mod core;
pub mod data;
pub mod economy;
pub mod interaction;
pub mod interface;
pub mod inventory;
pub mod missions;
pub mod player;
pub mod ui;

/// 全部玩法插件；数据加载和控制台由可执行文件自己添加
pub struct ScrapRunPlugin;

impl Plugin for ScrapRunPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            crate::core::CorePlugin,
            player::PlayerPlugin,
            inventory::InventoryPlugin,
            interaction::InteractionPlugin,
            economy::EconomyPlugin,
            missions::MissionPlugin,
            ui::UiPlugin,
        ));
    }
}
