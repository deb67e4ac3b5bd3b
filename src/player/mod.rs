pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use components::*;
use events::*;
use systems::*;

pub struct PlayerPlugin;
impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<PlayerInput>()
            .add_event::<MoveInput>()
            .add_event::<SprintInput>()
            .add_event::<JumpInput>()
            .add_event::<CrouchInput>()
            .add_event::<LookInput>()
            .add_event::<Teleport>()
            .add_event::<FacePoint>()
            .add_systems(OnEnter(AppState::InGame), spawn_player)
            .add_systems(
                Update,
                (
                    read_player_input,
                    teleport_player,
                    restore_stamina,
                    handle_crouch,
                    handle_look,
                    move_player,
                )
                    .chain()
                    .in_set(PlayerSet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/// 控制器更新；测量与玩家距离的检测排在这之后
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerSet;
