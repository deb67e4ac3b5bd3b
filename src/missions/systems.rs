use super::{components::*, delivery::DeliveryNpc, events::*};
use crate::core::events::LogEvent;
use crate::data::{schema::vec3, GameData};
use crate::economy::components::Wallet;
use crate::interaction::components::{Prompt, TriggerZone};
use crate::interaction::events::{InteractEvent, ItemsSold, TriggerEntered, TriggerExited};
use crate::inventory::components::Inventory;
use crate::ui::components::{TriggerPanel, UiPanels};
use bevy::prelude::*;

pub fn spawn_boards(mut commands: Commands, data: Res<GameData>) {
    for board in &data.scene.mission_boards {
        commands.spawn((
            MissionBoardTrigger {
                controls_delay: board.controls_delay,
            },
            TriggerZone::new(board.radius),
            Transform::from_translation(vec3(board.position)),
        ));
    }
    for def in &data.scene.deliveries {
        let npc = DeliveryNpc::from_def(def);
        let prompt = Prompt::new(npc.prompt_text.clone());
        commands.spawn((
            npc,
            prompt,
            TriggerZone::new(def.radius),
            Transform::from_translation(vec3(def.position)),
        ));
    }
    info!(
        "已摆放 {} 个任务板，{} 个送货 NPC",
        data.scene.mission_boards.len(),
        data.scene.deliveries.len()
    );
}

fn log_missions(board: &MissionBoard, data: &GameData, log: &mut EventWriter<LogEvent>) {
    log.write(LogEvent::new("== Missions =="));
    let lines = board.listing(data);
    if lines.is_empty() {
        log.write(LogEvent::new("(none)"));
    }
    for line in lines {
        log.write(LogEvent(line));
    }
}

pub fn record_sales(
    mut ev_sold: EventReader<ItemsSold>,
    data: Res<GameData>,
    mut board: ResMut<MissionBoard>,
) {
    for sold in ev_sold.read() {
        board.record_sale(&data, sold.kind, sold.count);
    }
}

pub fn poll_missions(
    data: Res<GameData>,
    inventory: Res<Inventory>,
    wallet: Res<Wallet>,
    mut board: ResMut<MissionBoard>,
    mut ev_unlocked: EventWriter<MissionUnlocked>,
    mut ev_completed: EventWriter<MissionCompleted>,
    mut log: EventWriter<LogEvent>,
) {
    board.poll(&data, &inventory, &wallet);
    for change in board.diff_statuses(&data) {
        let name = data
            .mission(&change.mission)
            .map_or(change.mission.as_str(), |m| m.name.as_str());
        match change.to {
            MissionStatus::Completed => {
                log.write(LogEvent(format!("Mission complete: {name}")));
                ev_completed.write(MissionCompleted(change.mission.clone()));
            }
            MissionStatus::Active => {
                log.write(LogEvent(format!("New mission: {name}")));
                ev_unlocked.write(MissionUnlocked(change.mission.clone()));
            }
            MissionStatus::Locked => {}
        }
    }
}

/// HUD 当前任务：和余额显示一样先比较再写入
pub fn track_active_mission(
    data: Res<GameData>,
    board: Res<MissionBoard>,
    mut active: ResMut<ActiveMission>,
) {
    let next = board
        .current_active(&data)
        .map_or_else(ActiveMission::default, |def| ActiveMission::of(def, &board));
    if *active != next {
        debug!("当前任务：{:?}", next.label);
        *active = next;
    }
}

pub fn print_missions(
    mut ev_show: EventReader<ShowMissionsEvent>,
    data: Res<GameData>,
    board: Res<MissionBoard>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_show.read() {
        log_missions(&board, &data, &mut log);
    }
}

pub fn open_board_on_enter(
    mut ev_enter: EventReader<TriggerEntered>,
    boards: Query<&MissionBoardTrigger>,
    data: Res<GameData>,
    board: Res<MissionBoard>,
    mut panels: ResMut<UiPanels>,
    mut log: EventWriter<LogEvent>,
) {
    for TriggerEntered(entity) in ev_enter.read() {
        let Ok(trigger) = boards.get(*entity) else {
            continue;
        };
        if panels.missions_open() {
            continue;
        }
        panels.open_trigger(TriggerPanel::Missions, trigger.controls_delay);
        log_missions(&board, &data, &mut log);
    }
}

/* ---------------------------- 送货 ---------------------------- */

fn hand_over(
    npc: &mut DeliveryNpc,
    prompt: &mut Prompt,
    board: &mut MissionBoard,
    data: &GameData,
    inventory: &mut Inventory,
) {
    if let Some(text) = npc.try_deliver(board, data, inventory) {
        info!("送货阶段 {} 已交付", npc.current);
        prompt.text = text;
        prompt.visible = true;
    }
}

pub fn delivery_on_enter(
    mut ev_enter: EventReader<TriggerEntered>,
    mut npcs: Query<(&mut DeliveryNpc, &mut Prompt)>,
    data: Res<GameData>,
    mut board: ResMut<MissionBoard>,
    mut inventory: ResMut<Inventory>,
) {
    for TriggerEntered(entity) in ev_enter.read() {
        let Ok((mut npc, mut prompt)) = npcs.get_mut(*entity) else {
            continue;
        };
        prompt.visible = npc.accepting(&board, &data);
        hand_over(&mut npc, &mut prompt, &mut board, &data, &mut inventory);
    }
}

pub fn delivery_on_exit(
    mut ev_exit: EventReader<TriggerExited>,
    mut prompts: Query<&mut Prompt, With<DeliveryNpc>>,
) {
    for TriggerExited(entity) in ev_exit.read() {
        if let Ok(mut prompt) = prompts.get_mut(*entity) {
            prompt.visible = false;
        }
    }
}

/// 站在 NPC 旁边按交互键再试一次交付
pub fn delivery_on_interact(
    mut ev_interact: EventReader<InteractEvent>,
    mut npcs: Query<(&mut DeliveryNpc, &mut Prompt, &TriggerZone)>,
    data: Res<GameData>,
    mut board: ResMut<MissionBoard>,
    mut inventory: ResMut<Inventory>,
) {
    if ev_interact.read().count() == 0 {
        return;
    }
    for (mut npc, mut prompt, zone) in &mut npcs {
        if zone.player_inside {
            hand_over(&mut npc, &mut prompt, &mut board, &data, &mut inventory);
        }
    }
}

pub fn tick_deliveries(
    time: Res<Time>,
    mut npcs: Query<(&mut DeliveryNpc, &mut Prompt, &TriggerZone)>,
    data: Res<GameData>,
    mut board: ResMut<MissionBoard>,
    mut inventory: ResMut<Inventory>,
) {
    for (mut npc, mut prompt, zone) in &mut npcs {
        let tick = npc.tick(time.delta());
        if tick.hide_prompt {
            prompt.visible = false;
        }
        if tick.switched {
            prompt.text = npc.prompt_text.clone();
            prompt.visible = zone.player_inside && npc.accepting(&board, &data);
            if zone.player_inside {
                hand_over(&mut npc, &mut prompt, &mut board, &data, &mut inventory);
            }
        }
    }
}
