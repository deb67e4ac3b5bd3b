use std::sync::Arc;

use bevy::prelude::*;

use super::components::ScrollDir;
use crate::data::schema::ItemDef;

#[derive(Event)]
pub struct GiveItemEvent {
    pub id: String,
    pub count: u32,
}

#[derive(Event)]
pub struct ListInventoryEvent; // 让 CLI 请求打印背包

/// 快捷栏数字键，从 1 开始
#[derive(Event)]
pub struct SelectSlotEvent(pub usize);

#[derive(Event)]
pub struct ScrollHotbarEvent(pub ScrollDir);

#[derive(Event)]
pub struct UseSelectedEvent;

#[derive(Event)]
pub struct DropSelectedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Slot(usize),
    /// 在所有槽位之外松手：丢一个到世界里
    Outside,
}

#[derive(Event)]
pub struct DragSlotEvent {
    pub from: usize,
    pub to: DragTarget,
}

/// 一个物品离开背包，需要在世界里出现
#[derive(Event, Debug, Clone)]
pub struct ItemDropped {
    pub item: Arc<ItemDef>,
}

/// 消耗品对玩家的效果
#[derive(Event, Debug, Clone, Copy)]
pub struct RestoreStamina(pub f32);
