pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use crate::inventory::InventorySet;
use crate::player::PlayerSet;
use events::*;
use systems::*;

pub struct InteractionPlugin;
impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<InteractEvent>()
            .add_event::<TriggerEntered>()
            .add_event::<TriggerExited>()
            .add_event::<DoorSound>()
            .add_event::<ItemsSold>()
            .add_systems(OnEnter(AppState::InGame), spawn_scene)
            .add_systems(
                Update,
                (
                    (
                        detect_triggers,
                        toggle_doors,
                        animate_swing_doors,
                        animate_sliding_doors,
                        animate_double_doors,
                        door_sounds,
                        door_look_probe,
                    )
                        .chain(),
                    (
                        spawn_dropped_items,
                        apply_item_physics,
                        scan_crates,
                        probe_crates,
                        toggle_crates,
                        animate_crates,
                        probe_pickups,
                        take_pickups,
                        track_spawned_points,
                        respawn_after_sale,
                    )
                        .chain(),
                    announce_prompts,
                )
                    .chain()
                    .in_set(InteractionSet)
                    .after(PlayerSet)
                    .after(InventorySet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/// 检测与场景物体；商店、任务和 NPC 之后读取它们的事件
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionSet;
