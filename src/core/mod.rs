use bevy::prelude::*;

pub mod events;
pub mod resources;
pub mod rng;
pub mod states;

/// 核心插件：全局资源、日志输出和运行状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        // 测试会在添加插件之前插入自己的配置
        if !app.world().contains_resource::<resources::GameConfig>() {
            app.insert_resource(resources::GameConfig::load_or_default(
                resources::CONFIG_PATH,
            ));
        }
        let seed = app.world().resource::<resources::GameConfig>().seed;

        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(rng::GameRng::new(seed))
            .add_systems(Update, events::forward_log_event)
            .add_systems(OnEnter(AppState::Shutdown), request_exit);
    }
}

fn request_exit(mut exit: EventWriter<AppExit>) {
    exit.write(AppExit::Success);
}
