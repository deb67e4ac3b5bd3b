pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use crate::player::PlayerSet;
use components::*;
use events::*;
use systems::*;

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<UiPanels>()
            .add_event::<ToggleInventoryEvent>()
            .add_event::<EscapeEvent>()
            .add_systems(
                Update,
                (
                    toggle_inventory,
                    handle_escape,
                    tick_panel_locks,
                    sync_player_controls,
                )
                    .chain()
                    .in_set(UiSet)
                    .before(PlayerSet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/// 面板状态；控制器随后读取操作锁
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct UiSet;
