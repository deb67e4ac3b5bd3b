use bevy::prelude::*;

#[derive(Event, Debug, Clone)]
pub struct MissionUnlocked(pub String);

#[derive(Event, Debug, Clone)]
pub struct MissionCompleted(pub String);

/// 打印任务面板
#[derive(Event)]
pub struct ShowMissionsEvent;
