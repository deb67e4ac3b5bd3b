use bevy::prelude::*;

use crate::data::schema::ItemKind;

/// 交互键（"e"）
#[derive(Event)]
pub struct InteractEvent;

#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerEntered(pub Entity);

#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerExited(pub Entity);

/// 门的开关状态变了，音效从这里接入
#[derive(Event, Debug, Clone, Copy)]
pub struct DoorSound {
    pub door: Entity,
    pub opening: bool,
}

/// 回收箱完成一次卖出
#[derive(Event, Debug, Clone, Copy)]
pub struct ItemsSold {
    pub kind: ItemKind,
    pub count: u32,
    pub total: u32,
}
