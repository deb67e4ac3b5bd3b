use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::data::GameData;
use bevy::prelude::*;

/// 处理"give"——逐个往背包里塞物品
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventory: ResMut<Inventory>,
    data: Res<GameData>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_give.read() {
        let Some(proto) = data.item(&ev.id) else {
            warn!("不存在物品 ID {}", ev.id);
            log.write(LogEvent(format!("Unknown item {}", ev.id)));
            continue;
        };

        let mut added = 0;
        for _ in 0..ev.count {
            match inventory.add(proto) {
                Ok(_) => added += 1,
                Err(err) => {
                    warn!("无法获得 {}：{err}", proto.name);
                    break;
                }
            }
        }
        if added > 0 {
            info!("获得 {} ×{}", proto.name, added);
            log.write(LogEvent(format!("Got {} ×{}", proto.name, added)));
        }
        if added < ev.count {
            log.write(LogEvent("Inventory full".into()));
        }
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    inventory: Res<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut empty = true;
    for (idx, slot) in inventory.slots().iter().enumerate() {
        if let Some(stack) = slot {
            empty = false;
            let marker = if idx == inventory.selected() { "*" } else { " " };
            let bar = if idx < inventory.hotbar_size { "hotbar" } else { "bag" };
            log.write(LogEvent(format!(
                "{marker}[{idx}] {} ×{} ({bar}, id={})",
                stack.proto.name, stack.count, stack.proto.id
            )));
        }
    }

    if empty {
        log.write(LogEvent("  (empty)".into()));
    }
}

pub fn select_slot(
    mut ev_select: EventReader<SelectSlotEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    for SelectSlotEvent(number) in ev_select.read() {
        match inventory.select_hotbar(*number) {
            Ok(()) => log.write(LogEvent(format!("Selected slot {number}"))),
            Err(err) => log.write(LogEvent(err.to_string())),
        };
    }
}

pub fn scroll_hotbar(
    mut ev_scroll: EventReader<ScrollHotbarEvent>,
    mut inventory: ResMut<Inventory>,
) {
    for ScrollHotbarEvent(dir) in ev_scroll.read() {
        inventory.scroll(*dir);
        debug!("快捷栏第 {} 格", inventory.selected() + 1);
    }
}

/// 使用物品；只有消耗品会被用掉
pub fn use_selected(
    mut ev_use: EventReader<UseSelectedEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
    mut restore: EventWriter<RestoreStamina>,
) {
    for _ in ev_use.read() {
        match inventory.use_selected() {
            Ok(item) => {
                if item.stamina_restore > 0.0 {
                    restore.write(RestoreStamina(item.stamina_restore));
                    log.write(LogEvent(format!(
                        "Used {}, stamina +{}",
                        item.name, item.stamina_restore
                    )));
                } else {
                    log.write(LogEvent(format!("Used {}", item.name)));
                }
            }
            Err(err) => {
                log.write(LogEvent(err.to_string()));
            }
        }
    }
}

pub fn drop_selected(
    mut ev_drop: EventReader<DropSelectedEvent>,
    mut inventory: ResMut<Inventory>,
    mut dropped: EventWriter<ItemDropped>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_drop.read() {
        match inventory.take_selected() {
            Ok(item) => {
                info!("丢出 {}", item.name);
                log.write(LogEvent(format!("Dropped {}", item.name)));
                dropped.write(ItemDropped { item });
            }
            Err(err) => debug!("没有可丢的物品：{err}"),
        }
    }
}

/// 槽位间拖放；松手在背包外或落在不兼容的格子上都会丢出一个
pub fn drag_slot(
    mut ev_drag: EventReader<DragSlotEvent>,
    mut inventory: ResMut<Inventory>,
    mut dropped: EventWriter<ItemDropped>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_drag.read() {
        match ev.to {
            DragTarget::Outside => match inventory.take_one(ev.from) {
                Ok(item) => {
                    log.write(LogEvent(format!("Dropped {}", item.name)));
                    dropped.write(ItemDropped { item });
                }
                Err(err) => {
                    warn!("槽位 {} 无法丢出物品：{err}", ev.from);
                }
            },
            DragTarget::Slot(to) => match inventory.move_stack(ev.from, to) {
                Ok(DragOutcome::Merged { moved, left }) if left > 0 => {
                    log.write(LogEvent(format!(
                        "Stacked {moved} into slot {to}, {left} stay in slot {}",
                        ev.from
                    )));
                }
                Ok(DragOutcome::Unchanged) => {}
                Ok(_) => {
                    log.write(LogEvent(format!("Moved slot {} → {to}", ev.from)));
                }
                // 目标格被不同物品占着：和拖出背包一样丢一个到世界里
                Err(InventoryError::Incompatible { .. }) => match inventory.take_one(ev.from) {
                    Ok(item) => {
                        log.write(LogEvent(format!("Dropped {}", item.name)));
                        dropped.write(ItemDropped { item });
                    }
                    Err(err) => warn!("槽位 {} 无法丢出物品：{err}", ev.from),
                },
                Err(err) => {
                    log.write(LogEvent(err.to_string()));
                }
            },
        }
    }
}

/// 让手上的物品和选中槽位保持一致
pub fn update_held_item(inventory: Res<Inventory>, mut held: ResMut<HeldItem>) {
    let wanted = inventory.selected_stack().map(|s| s.proto.clone());
    let same = match (&held.item, &wanted) {
        (Some(a), Some(b)) => a.id == b.id,
        (None, None) => true,
        _ => false,
    };
    if same {
        return;
    }

    match &wanted {
        Some(item) => debug!("手持 {}", item.name),
        None => debug!("空手"),
    }
    held.scale = wanted.as_ref().map_or(0.0, |i| i.hand_scale);
    held.item = wanted;
}
