use bevy::prelude::*;
use serde_derive::Serialize;

use crate::core::events::LogEvent;
use crate::data::GameData;
use crate::economy::components::Wallet;
use crate::inventory::components::Inventory;
use crate::missions::components::MissionBoard;
use crate::player::components::{Player, Stamina};

/// 控制台请求导出当前会话的 JSON
#[derive(Event)]
pub struct SnapshotEvent;

#[derive(Debug, Serialize)]
pub struct SlotSnapshot {
    pub slot: usize,
    pub item: String,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct MissionSnapshot {
    pub id: String,
    pub status: &'static str,
    pub progress: u32,
    pub required: u32,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub money: u32,
    pub position: [f32; 3],
    pub stamina: f32,
    pub selected_slot: usize,
    pub inventory: Vec<SlotSnapshot>,
    pub missions: Vec<MissionSnapshot>,
}

impl SessionSnapshot {
    pub fn capture(
        wallet: &Wallet,
        inventory: &Inventory,
        board: &MissionBoard,
        data: &GameData,
        player: Option<(&Transform, &Stamina)>,
    ) -> Self {
        let inventory_slots = inventory
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| {
                s.as_ref().map(|s| SlotSnapshot {
                    slot,
                    item: s.proto.id.clone(),
                    count: s.count,
                })
            })
            .collect();
        let missions = data
            .missions()
            .iter()
            .map(|def| MissionSnapshot {
                id: def.id.clone(),
                status: board.status(def, data).label(),
                progress: board.progress(&def.id),
                required: def.required,
            })
            .collect();
        let (position, stamina) = player.map_or(([0.0; 3], 0.0), |(tf, st)| {
            (tf.translation.to_array(), st.current)
        });
        Self {
            money: wallet.balance,
            position,
            stamina,
            selected_slot: inventory.selected(),
            inventory: inventory_slots,
            missions,
        }
    }
}

pub fn print_snapshot(
    mut ev_snapshot: EventReader<SnapshotEvent>,
    wallet: Res<Wallet>,
    inventory: Res<Inventory>,
    board: Res<MissionBoard>,
    data: Res<GameData>,
    player: Query<(&Transform, &Stamina), With<Player>>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_snapshot.read() {
        let snapshot =
            SessionSnapshot::capture(&wallet, &inventory, &board, &data, player.single().ok());
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                log.write(LogEvent(json));
            }
            Err(err) => warn!("快照导出失败：{err}"),
        }
    }
}
