use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::player::components::{Controls, Player};
use bevy::prelude::*;

pub fn toggle_inventory(
    mut ev_toggle: EventReader<ToggleInventoryEvent>,
    mut panels: ResMut<UiPanels>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_toggle.read() {
        let open = panels.toggle_inventory();
        log.write(LogEvent::new(if open {
            "Inventory opened"
        } else {
            "Inventory closed"
        }));
    }
}

pub fn handle_escape(
    mut ev_escape: EventReader<EscapeEvent>,
    mut panels: ResMut<UiPanels>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_escape.read() {
        let msg = match panels.escape() {
            EscapeOutcome::ClosedMissions => "Mission screen closed",
            EscapeOutcome::Ignored => continue,
            EscapeOutcome::Paused => "Paused",
            EscapeOutcome::Resumed => "Resumed",
        };
        log.write(LogEvent::new(msg));
    }
}

pub fn tick_panel_locks(time: Res<Time>, mut panels: ResMut<UiPanels>) {
    panels.tick(time.delta());
}

/// 把面板的操作锁写到控制器上，只在变化时写
pub fn sync_player_controls(
    panels: Res<UiPanels>,
    mut player: Query<&mut Controls, With<Player>>,
) {
    let wanted = panels.controls();
    for mut controls in &mut player {
        if *controls != wanted {
            debug!("操作锁：{wanted:?}");
            *controls = wanted;
        }
    }
}
