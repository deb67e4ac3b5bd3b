use std::time::Duration;

use bevy::prelude::*;

use super::components::MissionBoard;
use crate::data::schema::{DeliveryDef, DeliveryStageDef};
use crate::data::GameData;
use crate::inventory::components::Inventory;

/// 送货 NPC：每个阶段收一组物品，完成一个任务
#[derive(Component, Debug, Clone)]
pub struct DeliveryNpc {
    pub stages: Vec<DeliveryStageDef>,
    pub current: usize,
    pub prompt_text: String,
    switch_delay: f32,
    prompt_hide: f32,
    switch_timer: Option<Timer>,
    hide_timer: Option<Timer>,
}

/// 计时器这一帧改变了什么
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NpcTick {
    pub hide_prompt: bool,
    pub switched: bool,
}

impl DeliveryNpc {
    pub fn from_def(def: &DeliveryDef) -> Self {
        Self {
            stages: def.stages.clone(),
            current: 0,
            prompt_text: def.prompt_text.clone(),
            switch_delay: def.switch_delay,
            prompt_hide: def.prompt_hide,
            switch_timer: None,
            hide_timer: None,
        }
    }

    pub fn stage(&self) -> Option<&DeliveryStageDef> {
        self.stages.get(self.current)
    }

    pub fn waiting(&self) -> bool {
        self.switch_timer.is_some()
    }

    /// 当前阶段的任务还能交付
    pub fn accepting(&self, board: &MissionBoard, data: &GameData) -> bool {
        self.stage()
            .and_then(|stage| data.mission(&stage.mission))
            .is_some_and(|def| board.is_active(def, data) && !board.is_completed(def))
    }

    /// 交出本阶段的物品；成功时返回感谢语
    pub fn try_deliver(
        &mut self,
        board: &mut MissionBoard,
        data: &GameData,
        inventory: &mut Inventory,
    ) -> Option<String> {
        if self.waiting() || !self.accepting(board, data) {
            return None;
        }
        let stage = self.stage()?.clone();
        let def = data.mission(&stage.mission)?;
        if !inventory.take_each(&stage.items) {
            return None;
        }
        board.add_progress(&def.id, def.required);

        self.hide_timer = Some(Timer::from_seconds(self.prompt_hide, TimerMode::Once));
        if self.current + 1 < self.stages.len() {
            self.switch_timer = Some(Timer::from_seconds(self.switch_delay, TimerMode::Once));
        }
        Some(stage.delivered_text)
    }

    pub fn tick(&mut self, delta: Duration) -> NpcTick {
        let mut out = NpcTick::default();
        if let Some(timer) = &mut self.hide_timer {
            if timer.tick(delta).finished() {
                self.hide_timer = None;
                out.hide_prompt = true;
            }
        }
        if let Some(timer) = &mut self.switch_timer {
            if timer.tick(delta).finished() {
                self.switch_timer = None;
                self.current += 1;
                out.switched = true;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn npc() -> DeliveryNpc {
        let def: DeliveryDef = bevy::asset::ron::de::from_str(
            r#"(
                position: (0.0, 0.0, 0.0),
                stages: [
                    (mission: "bring_tools", items: ["knife", "bowl"], delivered_text: "Thanks!"),
                    (mission: "bring_ingredients", items: ["tomato"], delivered_text: "Lovely."),
                ],
            )"#,
        )
        .unwrap();
        DeliveryNpc::from_def(&def)
    }

    /// `bring_tools` 之前的任务都已完成的任务板
    fn unlocked_board(data: &GameData) -> MissionBoard {
        let mut board = MissionBoard::default();
        for id in ["collect_scrap", "sell_scrap", "earn_money", "buy_knife"] {
            let def = data.mission(id).unwrap();
            board.add_progress(id, def.required);
        }
        board
    }

    #[test]
    fn locked_stage_refuses_items() {
        let data = fixtures::game_data();
        let mut board = MissionBoard::default();
        let mut inv = Inventory::new(8, 4, 20);
        inv.add(&fixtures::proto("knife")).unwrap();
        inv.add(&fixtures::proto("bowl")).unwrap();

        let mut npc = npc();
        assert_eq!(npc.try_deliver(&mut board, &data, &mut inv), None);
        assert_eq!(inv.count_of("knife"), 1);
    }

    #[test]
    fn missing_item_takes_nothing() {
        let data = fixtures::game_data();
        let mut board = unlocked_board(&data);
        let mut inv = Inventory::new(8, 4, 20);
        inv.add(&fixtures::proto("knife")).unwrap();

        let mut npc = npc();
        assert_eq!(npc.try_deliver(&mut board, &data, &mut inv), None);
        assert_eq!(inv.count_of("knife"), 1);
        assert_eq!(board.progress("bring_tools"), 0);
    }

    #[test]
    fn delivery_completes_stage_then_switches() {
        let data = fixtures::game_data();
        let mut board = unlocked_board(&data);
        let mut inv = Inventory::new(8, 4, 20);
        inv.add(&fixtures::proto("knife")).unwrap();
        inv.add(&fixtures::proto("bowl")).unwrap();

        let mut npc = npc();
        assert_eq!(
            npc.try_deliver(&mut board, &data, &mut inv).as_deref(),
            Some("Thanks!")
        );
        assert_eq!(inv.count_of("knife"), 0);
        assert_eq!(inv.count_of("bowl"), 0);
        assert!(board.is_completed(data.mission("bring_tools").unwrap()));
        assert!(npc.waiting());

        inv.add(&fixtures::proto("tomato")).unwrap();
        assert_eq!(npc.try_deliver(&mut board, &data, &mut inv), None);

        let tick = npc.tick(Duration::from_secs(2));
        assert_eq!(
            tick,
            NpcTick {
                hide_prompt: true,
                switched: true
            }
        );
        assert_eq!(npc.stage().unwrap().mission, "bring_ingredients");
        assert_eq!(
            npc.try_deliver(&mut board, &data, &mut inv).as_deref(),
            Some("Lovely.")
        );
        // 最后一个阶段：没有下一阶段可切换
        assert!(!npc.waiting());
    }
}
