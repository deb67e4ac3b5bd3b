pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use components::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Inventory>()
            .init_resource::<HeldItem>()
            .add_event::<GiveItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<SelectSlotEvent>()
            .add_event::<ScrollHotbarEvent>()
            .add_event::<UseSelectedEvent>()
            .add_event::<DropSelectedEvent>()
            .add_event::<DragSlotEvent>()
            .add_event::<ItemDropped>()
            .add_event::<RestoreStamina>()
            .add_systems(
                Update,
                (
                    give_item,
                    select_slot,
                    scroll_hotbar,
                    use_selected,
                    drop_selected,
                    drag_slot,
                    update_held_item,
                    print_inventory,
                )
                    .chain()
                    .in_set(InventorySet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/// 背包变更；读取背包的轮询系统排在这之后
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InventorySet;
