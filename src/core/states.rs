use bevy::prelude::*;

/// 顶层运行状态
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    Loading,
    InGame,
    Shutdown,
}
