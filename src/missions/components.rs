use std::collections::HashMap;

use bevy::prelude::*;

use crate::data::schema::{ItemKind, MissionDef, MissionGoal};
use crate::data::GameData;
use crate::economy::components::Wallet;
use crate::inventory::components::Inventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionStatus {
    Locked,
    Active,
    Completed,
}

impl MissionStatus {
    pub fn label(self) -> &'static str {
        match self {
            MissionStatus::Locked => "locked",
            MissionStatus::Active => "active",
            MissionStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub mission: String,
    pub from: MissionStatus,
    pub to: MissionStatus,
}

/// 每个任务 id 的进度，以及上次观察到的状态
#[derive(Resource, Debug, Default)]
pub struct MissionBoard {
    progress: HashMap<String, u32>,
    seen: HashMap<String, MissionStatus>,
}

impl MissionBoard {
    pub fn progress(&self, id: &str) -> u32 {
        self.progress.get(id).copied().unwrap_or(0)
    }

    pub fn add_progress(&mut self, id: &str, amount: u32) {
        let entry = self.progress.entry(id.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    fn set_progress(&mut self, id: &str, value: u32) {
        self.progress.insert(id.to_string(), value);
    }

    pub fn is_completed(&self, def: &MissionDef) -> bool {
        self.progress(&def.id) >= def.required
    }

    /// 每个前置任务本身都处于 Completed（前置图已校验无环）
    pub fn is_active(&self, def: &MissionDef, data: &GameData) -> bool {
        def.prerequisites.iter().all(|id| {
            data.mission(id)
                .is_some_and(|prereq| self.status(prereq, data) == MissionStatus::Completed)
        })
    }

    /// Locked → Active → Completed：未解锁的任务无论进度多少都算 Locked
    pub fn status(&self, def: &MissionDef, data: &GameData) -> MissionStatus {
        if !self.is_active(def, data) {
            MissionStatus::Locked
        } else if self.is_completed(def) {
            MissionStatus::Completed
        } else {
            MissionStatus::Active
        }
    }

    /// 重新计算轮询型目标；只有 Active 的任务会前进，已完成的保持原值
    pub fn poll(&mut self, data: &GameData, inventory: &Inventory, wallet: &Wallet) {
        for def in data.missions() {
            if !def.goal.is_polled() || self.is_completed(def) || !self.is_active(def, data) {
                continue;
            }
            let value = match &def.goal {
                MissionGoal::CollectKind(kind) => inventory.count_by_kind(*kind),
                MissionGoal::EarnMoney => wallet.balance,
                MissionGoal::HoldItem(fragment) => inventory.count_of(fragment),
                MissionGoal::SellKind(_) | MissionGoal::Deliver => continue,
            };
            self.set_progress(&def.id, value);
        }
    }

    /// 卖出只计入进行中且未完成的任务
    pub fn record_sale(&mut self, data: &GameData, kind: ItemKind, count: u32) {
        for def in data.missions() {
            if def.goal != MissionGoal::SellKind(kind) {
                continue;
            }
            if self.is_active(def, data) && !self.is_completed(def) {
                self.add_progress(&def.id, count);
            }
        }
    }

    /// 和上次观察到的状态比较；第一次观察不产生变化
    pub fn diff_statuses(&mut self, data: &GameData) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for def in data.missions() {
            let now = self.status(def, data);
            match self.seen.insert(def.id.clone(), now) {
                Some(before) if before != now => changes.push(StatusChange {
                    mission: def.id.clone(),
                    from: before,
                    to: now,
                }),
                _ => {}
            }
        }
        changes
    }

    /// 按定义顺序第一个进行中的任务
    pub fn current_active<'a>(&self, data: &'a GameData) -> Option<&'a MissionDef> {
        data.missions()
            .iter()
            .find(|def| self.status(def, data) == MissionStatus::Active)
    }

    pub fn progress_label(&self, def: &MissionDef) -> String {
        format!("{}/{}{}", self.progress(&def.id), def.required, def.suffix)
    }

    /// 任务面板的行：只列出进行中和已完成的任务
    pub fn listing(&self, data: &GameData) -> Vec<String> {
        data.missions()
            .iter()
            .filter_map(|def| match self.status(def, data) {
                MissionStatus::Locked => None,
                status => {
                    let line = format!(
                        "{} [{}] {}",
                        def.name,
                        status.label(),
                        self.progress_label(def)
                    );
                    Some(with_description(line, &def.description))
                }
            })
            .collect()
    }
}

fn with_description(line: String, description: &str) -> String {
    if description.is_empty() {
        line
    } else {
        format!("{line} - {description}")
    }
}

/// HUD 上的当前任务
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ActiveMission {
    pub id: Option<String>,
    pub label: String,
    pub description: String,
}

impl ActiveMission {
    pub const NONE_LABEL: &'static str = "No active missions";

    pub fn of(def: &MissionDef, board: &MissionBoard) -> Self {
        Self {
            id: Some(def.id.clone()),
            label: format!("{} {}", def.name, board.progress_label(def)),
            description: def.description.clone(),
        }
    }
}

impl Default for ActiveMission {
    fn default() -> Self {
        Self {
            id: None,
            label: Self::NONE_LABEL.to_string(),
            description: String::new(),
        }
    }
}

/// 任务板触发区
#[derive(Component, Debug, Clone)]
pub struct MissionBoardTrigger {
    pub controls_delay: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::data::schema::SceneLayout;

    fn setup() -> (GameData, Inventory, Wallet, MissionBoard) {
        (
            fixtures::game_data(),
            Inventory::new(8, 4, 20),
            Wallet { balance: 0 },
            MissionBoard::default(),
        )
    }

    #[test]
    fn prerequisites_gate_activation() {
        let (data, _, _, board) = setup();
        let collect = data.mission("collect_scrap").unwrap();
        let sell = data.mission("sell_scrap").unwrap();
        assert_eq!(board.status(collect, &data), MissionStatus::Active);
        assert_eq!(board.status(sell, &data), MissionStatus::Locked);
        assert_eq!(board.current_active(&data).unwrap().id, "collect_scrap");
    }

    #[test]
    fn collect_progress_freezes_once_completed() {
        let (data, mut inv, wallet, mut board) = setup();
        let pipe = fixtures::proto("scrap_pipe");
        for _ in 0..3 {
            inv.add(&pipe).unwrap();
        }
        board.poll(&data, &inv, &wallet);
        assert_eq!(board.progress("collect_scrap"), 3);

        inv.take_one(0).unwrap();
        board.poll(&data, &inv, &wallet);
        assert_eq!(board.progress("collect_scrap"), 3);
        let sell = data.mission("sell_scrap").unwrap();
        assert_eq!(board.status(sell, &data), MissionStatus::Active);
    }

    #[test]
    fn sales_only_count_while_active() {
        let (data, mut inv, wallet, mut board) = setup();
        board.record_sale(&data, ItemKind::Scrap, 2);
        assert_eq!(board.progress("sell_scrap"), 0);

        let pipe = fixtures::proto("scrap_pipe");
        for _ in 0..3 {
            inv.add(&pipe).unwrap();
        }
        board.poll(&data, &inv, &wallet);
        board.record_sale(&data, ItemKind::Scrap, 2);
        board.record_sale(&data, ItemKind::Tool, 5);
        assert_eq!(board.progress("sell_scrap"), 2);
        board.record_sale(&data, ItemKind::Scrap, 4);
        board.record_sale(&data, ItemKind::Scrap, 4);
        assert_eq!(board.progress("sell_scrap"), 6);
    }

    #[test]
    fn locked_missions_ignore_polled_goals() {
        let (data, mut inv, mut wallet, mut board) = setup();
        wallet.add(25);
        inv.add(&fixtures::proto("knife")).unwrap();
        board.poll(&data, &inv, &wallet);

        let earn = data.mission("earn_money").unwrap();
        let knife = data.mission("buy_knife").unwrap();
        let tools = data.mission("bring_tools").unwrap();
        assert_eq!(board.status(earn, &data), MissionStatus::Locked);
        assert_eq!(board.progress_label(earn), "0/20$");
        assert_eq!(board.status(knife, &data), MissionStatus::Locked);
        assert_eq!(board.progress("buy_knife"), 0);
        assert_eq!(board.status(tools, &data), MissionStatus::Locked);
        assert_eq!(board.current_active(&data).unwrap().id, "collect_scrap");
    }

    #[test]
    fn earn_money_polls_once_unlocked() {
        let (data, mut inv, mut wallet, mut board) = setup();
        let bolt = fixtures::proto("scrap_bolt");
        for _ in 0..3 {
            inv.add(&bolt).unwrap();
        }
        board.poll(&data, &inv, &wallet);
        board.record_sale(&data, ItemKind::Scrap, 3);
        wallet.add(25);
        board.poll(&data, &inv, &wallet);

        let earn = data.mission("earn_money").unwrap();
        assert_eq!(board.status(earn, &data), MissionStatus::Completed);
        assert_eq!(board.progress_label(earn), "25/20$");
        assert_eq!(board.current_active(&data).unwrap().id, "buy_knife");
    }

    #[test]
    fn dependents_need_the_whole_chain_completed() {
        let (data, _, _, mut board) = setup();
        // 直接把进度写满也不能越过未完成的前置
        board.add_progress("buy_knife", 1);
        let knife = data.mission("buy_knife").unwrap();
        let tools = data.mission("bring_tools").unwrap();
        assert_eq!(board.status(knife, &data), MissionStatus::Locked);
        assert_eq!(board.status(tools, &data), MissionStatus::Locked);
        assert_eq!(board.current_active(&data).unwrap().id, "collect_scrap");
    }

    #[test]
    fn status_diff_reports_unlock_and_completion() {
        let (data, mut inv, wallet, mut board) = setup();
        assert!(board.diff_statuses(&data).is_empty());

        let bolt = fixtures::proto("scrap_bolt");
        for _ in 0..3 {
            inv.add(&bolt).unwrap();
        }
        board.poll(&data, &inv, &wallet);
        let changes = board.diff_statuses(&data);
        assert_eq!(
            changes,
            vec![
                StatusChange {
                    mission: "collect_scrap".into(),
                    from: MissionStatus::Active,
                    to: MissionStatus::Completed,
                },
                StatusChange {
                    mission: "sell_scrap".into(),
                    from: MissionStatus::Locked,
                    to: MissionStatus::Active,
                },
            ]
        );
        assert!(board.diff_statuses(&data).is_empty());
    }

    #[test]
    fn listing_hides_locked_missions() {
        let (data, _, _, board) = setup();
        assert_eq!(board.listing(&data), vec!["collect scrap [active] 0/3"]);
    }

    #[test]
    fn listing_and_hud_carry_the_description() {
        let mut missions = fixtures::missions();
        missions[0].description = "Pick up three pieces of scrap".into();
        let data = GameData::build(
            fixtures::items(),
            missions,
            fixtures::shops(),
            SceneLayout::default(),
        )
        .unwrap();
        let board = MissionBoard::default();

        assert_eq!(
            board.listing(&data),
            vec!["collect scrap [active] 0/3 - Pick up three pieces of scrap"]
        );
        let hud = ActiveMission::of(board.current_active(&data).unwrap(), &board);
        assert_eq!(hud.label, "collect scrap 0/3");
        assert_eq!(hud.description, "Pick up three pieces of scrap");
        assert_eq!(ActiveMission::default().label, "No active missions");
    }
}
