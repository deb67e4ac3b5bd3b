use bevy::prelude::*;

use scrap_run::core::states::AppState;
use scrap_run::data::DataPlugin;
use scrap_run::interface::debug_cli::DebugCliPlugin;
use scrap_run::ScrapRunPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }), // 隐藏窗口，只用控制台
            ..default()
        }))
        .add_plugins(ScrapRunPlugin)
        .add_plugins(DataPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Startup, |mut next: ResMut<NextState<AppState>>| {
            next.set(AppState::Loading);
        })
        .run();
}
