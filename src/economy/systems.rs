use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::data::{schema::vec3, GameData};
use crate::interaction::components::TriggerZone;
use crate::interaction::events::{InteractEvent, TriggerEntered, TriggerExited};
use crate::inventory::components::Inventory;
use crate::ui::components::{TriggerPanel, UiPanels};
use bevy::prelude::*;

pub fn spawn_shops(mut commands: Commands, data: Res<GameData>) {
    for placement in &data.scene.shops {
        let Some(def) = data.shop(&placement.shop) else {
            warn!("场景引用了不存在的商店 {}", placement.shop);
            continue;
        };
        commands.spawn((
            ShopStock::from_def(def, &data),
            ShopCounter {
                controls_delay: placement.controls_delay,
            },
            TriggerZone::new(placement.radius),
            Transform::from_translation(vec3(placement.position)),
        ));
        info!("商店 `{}` 已摆放", def.id);
    }
}

fn log_listing(shop: &ShopStock, log: &mut EventWriter<LogEvent>) {
    log.write(LogEvent(format!("== {} ==", shop.name)));
    for line in shop.listing() {
        log.write(LogEvent(line));
    }
}

/// 走进柜台立即打开商店
pub fn open_shop_on_enter(
    mut ev_enter: EventReader<TriggerEntered>,
    shops: Query<(&ShopStock, &ShopCounter)>,
    mut panels: ResMut<UiPanels>,
    mut log: EventWriter<LogEvent>,
) {
    for TriggerEntered(entity) in ev_enter.read() {
        let Ok((stock, counter)) = shops.get(*entity) else {
            continue;
        };
        if panels.shop() == Some(*entity) {
            continue;
        }
        panels.open_trigger(TriggerPanel::Shop(*entity), counter.controls_delay);
        log_listing(stock, &mut log);
    }
}

/// 离开柜台或按交互键关闭商店
pub fn close_shop(
    mut ev_exit: EventReader<TriggerExited>,
    mut ev_interact: EventReader<InteractEvent>,
    mut panels: ResMut<UiPanels>,
    mut log: EventWriter<LogEvent>,
) {
    let Some(open) = panels.shop() else {
        ev_exit.clear();
        ev_interact.clear();
        return;
    };
    let left = ev_exit.read().any(|TriggerExited(e)| *e == open);
    let pressed = ev_interact.read().count() > 0;
    if left || pressed {
        panels.close_trigger();
        log.write(LogEvent::new("Shop closed"));
    }
}

pub fn buy_item(
    mut ev_buy: EventReader<BuyEvent>,
    panels: Res<UiPanels>,
    mut shops: Query<&mut ShopStock>,
    mut wallet: ResMut<Wallet>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    for BuyEvent(index) in ev_buy.read() {
        let Some(mut stock) = panels.shop().and_then(|e| shops.get_mut(e).ok()) else {
            log.write(LogEvent::new("No shop is open"));
            continue;
        };
        match stock.buy(*index, &mut wallet, &mut inventory) {
            Ok(item) => {
                info!("在 {} 买了 {}", stock.name, item.name);
                log.write(LogEvent(format!("Bought {}. {}", item.name, wallet.label())));
            }
            Err(err) => {
                debug!("购买被拒：{err}");
                log.write(LogEvent(err.to_string()));
            }
        }
    }
}

pub fn print_shop(
    mut ev_show: EventReader<ShowShopEvent>,
    panels: Res<UiPanels>,
    shops: Query<&ShopStock>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_show.read().count() == 0 {
        return;
    }
    match panels.shop().and_then(|e| shops.get(e).ok()) {
        Some(stock) => log_listing(stock, &mut log),
        None => {
            log.write(LogEvent::new("No shop is open"));
        }
    }
}

pub fn print_money(
    mut ev_show: EventReader<ShowMoneyEvent>,
    wallet: Res<Wallet>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_show.read() {
        log.write(LogEvent(wallet.label()));
    }
}

/// 余额显示：轮询钱包，变化时才更新
pub fn track_balance(wallet: Res<Wallet>, mut last: Local<Option<u32>>) {
    if *last != Some(wallet.balance) {
        debug!("{}", wallet.label());
        *last = Some(wallet.balance);
    }
}
