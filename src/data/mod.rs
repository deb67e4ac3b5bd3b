pub mod catalog;
pub mod loader;
pub mod schema;

#[cfg(test)]
pub mod fixtures;

use bevy::asset::LoadState;
use bevy::prelude::*;
use crate::core::{resources::GameConfig, states::AppState};
use loader::RonLoader;
use schema::{ItemList, MissionList, SceneLayout, ShopList};

pub use catalog::{DataError, GameData};

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct DataAssets {
    items: Option<Handle<ItemList>>,
    missions: Option<Handle<MissionList>>,
    shops: Option<Handle<ShopList>>,
    scene: Option<Handle<SceneLayout>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<ItemList>()
            .init_asset::<MissionList>()
            .init_asset::<ShopList>()
            .init_asset::<SceneLayout>()
            .register_asset_loader(RonLoader::<ItemList>::default())
            .register_asset_loader(RonLoader::<MissionList>::default())
            .register_asset_loader(RonLoader::<ShopList>::default())
            .register_asset_loader(RonLoader::<SceneLayout>::default())
            .init_resource::<DataAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut assets: ResMut<DataAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    assets.items = Some(asset_server.load(config.data.items.clone()));
    assets.missions = Some(asset_server.load(config.data.missions.clone()));
    assets.shops = Some(asset_server.load(config.data.shops.clone()));
    assets.scene = Some(asset_server.load(config.data.scene.clone()));
}

#[allow(clippy::too_many_arguments)]
fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    assets: Res<DataAssets>,
    asset_server: Res<AssetServer>,
    items: Res<Assets<ItemList>>,
    missions: Res<Assets<MissionList>>,
    shops: Res<Assets<ShopList>>,
    scenes: Res<Assets<SceneLayout>>,
) {
    let handles = (&assets.items, &assets.missions, &assets.shops, &assets.scene);
    let (Some(h_items), Some(h_missions), Some(h_shops), Some(h_scene)) = handles else {
        return;
    };

    let failed = [
        h_items.id().untyped(),
        h_missions.id().untyped(),
        h_shops.id().untyped(),
        h_scene.id().untyped(),
    ]
    .into_iter()
    .any(|id| matches!(asset_server.load_state(id), LoadState::Failed(_)));
    if failed {
        error!("数据表加载失败，退出");
        next.set(AppState::Shutdown);
        return;
    }

    let (Some(item_list), Some(mission_list), Some(shop_list), Some(scene)) = (
        items.get(h_items),
        missions.get(h_missions),
        shops.get(h_shops),
        scenes.get(h_scene),
    ) else {
        return;
    };

    match GameData::build(
        item_list.items.clone(),
        mission_list.missions.clone(),
        shop_list.shops.clone(),
        scene.clone(),
    ) {
        Ok(data) => {
            info!(
                "✔ 数据加载完成：{} 个物品，{} 个任务，{} 个商店",
                data.items().len(),
                data.missions().len(),
                data.shops().len()
            );
            commands.insert_resource(data);
            next.set(AppState::InGame);
        }
        Err(err) => {
            error!("游戏数据无效：{err}");
            next.set(AppState::Shutdown);
        }
    }
}
