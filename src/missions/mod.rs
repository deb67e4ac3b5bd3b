pub mod components;
pub mod delivery;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use crate::economy::EconomySet;
use crate::interaction::InteractionSet;
use components::*;
use events::*;
use systems::*;

pub struct MissionPlugin;
impl Plugin for MissionPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<MissionBoard>()
            .init_resource::<ActiveMission>()
            .add_event::<MissionUnlocked>()
            .add_event::<MissionCompleted>()
            .add_event::<ShowMissionsEvent>()
            .add_systems(OnEnter(AppState::InGame), spawn_boards)
            .add_systems(
                Update,
                (
                    record_sales,
                    delivery_on_enter,
                    delivery_on_exit,
                    delivery_on_interact,
                    tick_deliveries,
                    poll_missions,
                    track_active_mission,
                    open_board_on_enter,
                    print_missions,
                )
                    .chain()
                    .in_set(MissionSet)
                    .after(InteractionSet)
                    .after(EconomySet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissionSet;

#[cfg(test)]
mod tests {
    use super::delivery::DeliveryNpc;
    use super::*;
    use crate::data::{fixtures, schema::ItemKind, schema::SceneLayout};
    use crate::economy::components::Wallet;
    use crate::interaction::components::Prompt;
    use crate::interaction::events::{InteractEvent, ItemsSold};
    use crate::inventory::components::Inventory;
    use crate::inventory::events::GiveItemEvent;
    use crate::player::components::{Controls, Player};
    use crate::player::events::Teleport;
    use crate::test_support::{headless_app, run_frames};
    use crate::ui::components::UiPanels;

    const NPC_SCENE: &str = r#"(
        deliveries: [(
            position: (0.0, 0.0, -4.0),
            stages: [
                (mission: "bring_tools", items: ["knife", "bowl"], delivered_text: "Thanks!"),
                (mission: "bring_ingredients", items: ["tomato"], delivered_text: "Lovely."),
            ],
        )],
        mission_boards: [(position: (6.0, 0.0, 0.0))],
    )"#;

    fn app() -> App {
        let layout: SceneLayout = bevy::asset::ron::de::from_str(NPC_SCENE).unwrap();
        headless_app(fixtures::game_data_with_scene(layout))
    }

    fn give(app: &mut App, id: &str, count: u32) {
        app.world_mut().send_event(GiveItemEvent {
            id: id.into(),
            count,
        });
        app.update();
    }

    fn completed(app: &App, id: &str) -> bool {
        let data = app.world().resource::<crate::data::GameData>();
        let board = app.world().resource::<MissionBoard>();
        board.is_completed(data.mission(id).unwrap())
    }

    fn active_id(app: &App) -> Option<String> {
        app.world().resource::<ActiveMission>().id.clone()
    }

    /// 把任务推进到第一个送货阶段
    fn unlock_deliveries(app: &mut App) {
        give(app, "scrap_bolt", 3);
        assert!(completed(app, "collect_scrap"));
        assert_eq!(active_id(app).as_deref(), Some("sell_scrap"));

        app.world_mut().send_event(ItemsSold {
            kind: ItemKind::Scrap,
            count: 3,
            total: 20,
        });
        app.world_mut().resource_mut::<Wallet>().balance = 20;
        app.update();
        assert!(completed(app, "sell_scrap"));
        assert!(completed(app, "earn_money"));

        give(app, "knife", 1);
        assert!(completed(app, "buy_knife"));
        assert_eq!(active_id(app).as_deref(), Some("bring_tools"));
    }

    #[test]
    fn mission_chain_unlocks_in_order() {
        let mut app = app();
        assert_eq!(active_id(&app).as_deref(), Some("collect_scrap"));
        unlock_deliveries(&mut app);
        assert!(!completed(&app, "bring_tools"));
        assert_eq!(
            app.world().resource::<ActiveMission>().label,
            "bring tools 0/1"
        );
    }

    #[test]
    fn npc_takes_items_and_moves_to_next_stage() {
        let mut app = app();
        unlock_deliveries(&mut app);
        give(&mut app, "bowl", 1);

        app.world_mut().send_event(Teleport(Vec3::new(0.0, 0.0, -4.0)));
        run_frames(&mut app, 2);
        assert!(completed(&app, "bring_tools"));
        {
            let inv = app.world().resource::<Inventory>();
            assert_eq!(inv.count_of("knife"), 0);
            assert_eq!(inv.count_of("bowl"), 0);
        }
        {
            let world = app.world_mut();
            let prompt = world
                .query_filtered::<&Prompt, With<DeliveryNpc>>()
                .single(world)
                .unwrap();
            assert_eq!(prompt.text, "Thanks!");
            assert!(prompt.visible);
        }

        // 切换延迟后开启第二阶段；按交互键交付
        run_frames(&mut app, 130);
        give(&mut app, "tomato", 1);
        app.world_mut().send_event(InteractEvent);
        app.update();
        assert!(completed(&app, "bring_ingredients"));
        assert_eq!(active_id(&app), None);
        assert_eq!(
            app.world().resource::<ActiveMission>().label,
            "No active missions"
        );
    }

    #[test]
    fn npc_ignores_player_before_stage_is_active() {
        let mut app = app();
        give(&mut app, "knife", 1);
        give(&mut app, "bowl", 1);
        app.world_mut().send_event(Teleport(Vec3::new(0.0, 0.0, -4.0)));
        run_frames(&mut app, 2);

        assert!(!completed(&app, "bring_tools"));
        assert!(!completed(&app, "buy_knife"));
        assert_eq!(active_id(&app).as_deref(), Some("collect_scrap"));
        assert_eq!(app.world().resource::<Inventory>().count_of("knife"), 1);
        let world = app.world_mut();
        let prompt = world
            .query_filtered::<&Prompt, With<DeliveryNpc>>()
            .single(world)
            .unwrap();
        assert!(!prompt.visible);
    }

    #[test]
    fn mission_board_opens_and_escape_closes_it() {
        let mut app = app();
        app.world_mut().send_event(Teleport(Vec3::new(6.0, 0.0, 0.0)));
        run_frames(&mut app, 2);
        assert!(app.world().resource::<UiPanels>().missions_open());
        {
            let world = app.world_mut();
            let controls = world
                .query_filtered::<&Controls, With<Player>>()
                .single(world)
                .unwrap();
            assert!(!controls.looking);
        }

        app.world_mut().send_event(crate::ui::events::EscapeEvent);
        run_frames(&mut app, 2);
        assert!(!app.world().resource::<UiPanels>().missions_open());
    }
}
