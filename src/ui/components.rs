use std::time::Duration;

use bevy::prelude::*;

use crate::player::components::Controls;

/// 触发区打开的是哪个面板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPanel {
    Shop(Entity),
    Missions,
}

/// 按下 Escape 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    ClosedMissions,
    /// 商店打开时忽略 Escape
    Ignored,
    Paused,
    Resumed,
}

/// 当前打开的面板，以及由此带来的操作锁
#[derive(Resource, Debug, Default)]
pub struct UiPanels {
    pub inventory_open: bool,
    pub paused: bool,
    trigger: Option<TriggerPanel>,
    /// 从打开触发面板到锁住控制器的倒计时
    lock_delay: Option<Timer>,
    trigger_locked: bool,
}

impl UiPanels {
    pub fn shop(&self) -> Option<Entity> {
        match self.trigger {
            Some(TriggerPanel::Shop(e)) => Some(e),
            _ => None,
        }
    }

    pub fn missions_open(&self) -> bool {
        self.trigger == Some(TriggerPanel::Missions)
    }

    /// 立即打开；`delay` 秒后锁住控制器
    pub fn open_trigger(&mut self, panel: TriggerPanel, delay: f32) {
        self.trigger = Some(panel);
        self.trigger_locked = false;
        if delay > 0.0 {
            self.lock_delay = Some(Timer::from_seconds(delay, TimerMode::Once));
        } else {
            self.lock_delay = None;
            self.trigger_locked = true;
        }
    }

    pub fn close_trigger(&mut self) -> Option<TriggerPanel> {
        self.lock_delay = None;
        self.trigger_locked = false;
        self.trigger.take()
    }

    pub fn toggle_inventory(&mut self) -> bool {
        self.inventory_open = !self.inventory_open;
        self.inventory_open
    }

    pub fn escape(&mut self) -> EscapeOutcome {
        match self.trigger {
            Some(TriggerPanel::Missions) => {
                self.close_trigger();
                EscapeOutcome::ClosedMissions
            }
            Some(TriggerPanel::Shop(_)) => EscapeOutcome::Ignored,
            None => {
                self.paused = !self.paused;
                if self.paused {
                    EscapeOutcome::Paused
                } else {
                    EscapeOutcome::Resumed
                }
            }
        }
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.lock_delay.as_mut() {
            if timer.tick(delta).finished() {
                self.lock_delay = None;
                self.trigger_locked = true;
            }
        }
    }

    /// 任务面板立刻释放鼠标，移动要等延迟结束才锁
    pub fn controls(&self) -> Controls {
        let locked = self.inventory_open || self.paused || self.trigger_locked;
        Controls {
            movement: !locked,
            looking: !locked && !self.missions_open(),
        }
    }
}
