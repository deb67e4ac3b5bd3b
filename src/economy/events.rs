use bevy::prelude::*;

/// 从当前商店买第 `n` 项（从 0 开始）
#[derive(Event)]
pub struct BuyEvent(pub usize);

/// 列出当前商店的货
#[derive(Event)]
pub struct ShowShopEvent;

#[derive(Event)]
pub struct ShowMoneyEvent;
