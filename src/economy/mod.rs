pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use crate::interaction::InteractionSet;
use components::*;
use events::*;
use systems::*;

pub struct EconomyPlugin;
impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Wallet>()
            .add_event::<BuyEvent>()
            .add_event::<ShowShopEvent>()
            .add_event::<ShowMoneyEvent>()
            .add_systems(OnEnter(AppState::InGame), spawn_shops)
            .add_systems(
                Update,
                (
                    close_shop,
                    open_shop_on_enter,
                    buy_item,
                    print_shop,
                    print_money,
                    track_balance,
                )
                    .chain()
                    .in_set(EconomySet)
                    .after(InteractionSet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EconomySet;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, schema::SceneLayout};
    use crate::inventory::components::Inventory;
    use crate::player::components::{Controls, Player};
    use crate::player::events::Teleport;
    use crate::core::resources::GameConfig;
    use crate::test_support::{headless_app, headless_app_with, run_frames};
    use crate::ui::components::UiPanels;

    fn shop_app(money: u32) -> App {
        let layout: SceneLayout = bevy::asset::ron::de::from_str(
            r#"(shops: [(shop: "general", position: (0.0, 0.0, -6.0), radius: 1.0)])"#,
        )
        .unwrap();
        let mut app = headless_app(fixtures::game_data_with_scene(layout));
        app.world_mut().resource_mut::<Wallet>().balance = money;
        app
    }

    fn controls(app: &mut App) -> Controls {
        let world = app.world_mut();
        *world
            .query_filtered::<&Controls, With<Player>>()
            .single(world)
            .unwrap()
    }

    #[test]
    fn wallet_starts_with_configured_money() {
        let mut config = GameConfig::default();
        config.economy.starting_money = 40;
        let app = headless_app_with(config, fixtures::game_data());
        assert_eq!(app.world().resource::<Wallet>().balance, 40);

        let app = headless_app(fixtures::game_data());
        assert_eq!(
            app.world().resource::<Wallet>().balance,
            GameConfig::default().economy.starting_money
        );
    }

    #[test]
    fn entering_counter_opens_shop_then_locks_controls() {
        let mut app = shop_app(0);
        app.world_mut().send_event(Teleport(Vec3::new(0.0, 0.0, -6.0)));
        run_frames(&mut app, 2);
        assert!(app.world().resource::<UiPanels>().shop().is_some());
        assert!(controls(&mut app).movement);

        run_frames(&mut app, 40);
        assert_eq!(
            controls(&mut app),
            Controls {
                movement: false,
                looking: false
            }
        );

        app.world_mut().send_event(crate::interaction::events::InteractEvent);
        run_frames(&mut app, 2);
        assert!(app.world().resource::<UiPanels>().shop().is_none());
        assert_eq!(controls(&mut app), Controls::default());
    }

    #[test]
    fn buying_from_the_open_shop() {
        let mut app = shop_app(12);
        app.world_mut().send_event(Teleport(Vec3::new(0.0, 0.0, -6.0)));
        run_frames(&mut app, 2);

        app.world_mut().send_event(BuyEvent(0));
        app.update();
        assert_eq!(app.world().resource::<Wallet>().balance, 2);
        assert_eq!(app.world().resource::<Inventory>().count_of("knife"), 1);

        // 钱不够：什么都不变
        app.world_mut().send_event(BuyEvent(0));
        app.update();
        assert_eq!(app.world().resource::<Wallet>().balance, 2);
        assert_eq!(app.world().resource::<Inventory>().count_of("knife"), 1);

        let world = app.world_mut();
        let stock = world.query::<&ShopStock>().single(world).unwrap();
        assert_eq!(stock.entries[0].quantity, 1);
    }

    #[test]
    fn buying_without_open_shop_is_refused() {
        let mut app = shop_app(50);
        app.world_mut().send_event(BuyEvent(0));
        app.update();
        assert_eq!(app.world().resource::<Wallet>().balance, 50);
    }
}
