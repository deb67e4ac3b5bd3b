//! 单元测试用的内存小表

use std::sync::Arc;

use super::catalog::GameData;
use super::schema::*;

pub fn item(id: &str, name: &str, kind: ItemKind, value: ValueRange) -> ItemDef {
    ItemDef {
        id: id.into(),
        name: name.into(),
        kind,
        stackable: true,
        value,
        stamina_restore: 0.0,
        hand_scale: 7.0,
        world_scale: 1.0,
    }
}

pub fn items() -> Vec<ItemDef> {
    let mut energy_bar = item(
        "energy_bar",
        "Energy Bar",
        ItemKind::Consumable,
        ValueRange::fixed(1),
    );
    energy_bar.stamina_restore = 2.0;
    let mut lantern = item("lantern", "Old Lantern", ItemKind::Tool, ValueRange::fixed(8));
    lantern.stackable = false;

    vec![
        item(
            "scrap_bolt",
            "Rusty Bolt",
            ItemKind::Scrap,
            ValueRange { min: 4, max: 9 },
        ),
        item("scrap_pipe", "Bent Pipe", ItemKind::Scrap, ValueRange::fixed(3)),
        item("knife", "Chef Knife", ItemKind::Tool, ValueRange::fixed(2)),
        item("bowl", "Wooden Bowl", ItemKind::Tool, ValueRange::fixed(1)),
        item("tomato", "Tomato", ItemKind::Ingredient, ValueRange::fixed(1)),
        energy_bar,
        lantern,
    ]
}

/// 测试物品的共享原型
pub fn proto(id: &str) -> Arc<ItemDef> {
    Arc::new(
        items()
            .into_iter()
            .find(|i| i.id == id)
            .expect("fixture item exists"),
    )
}

pub fn mission(id: &str, required: u32, prerequisites: &[&str], goal: MissionGoal) -> MissionDef {
    MissionDef {
        id: id.into(),
        name: id.replace('_', " "),
        description: String::new(),
        required,
        suffix: String::new(),
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        goal,
    }
}

pub fn missions() -> Vec<MissionDef> {
    let mut earn = mission("earn_money", 20, &["sell_scrap"], MissionGoal::EarnMoney);
    earn.suffix = "$".into();
    vec![
        mission(
            "collect_scrap",
            3,
            &[],
            MissionGoal::CollectKind(ItemKind::Scrap),
        ),
        mission(
            "sell_scrap",
            3,
            &["collect_scrap"],
            MissionGoal::SellKind(ItemKind::Scrap),
        ),
        earn,
        mission(
            "buy_knife",
            1,
            &["earn_money"],
            MissionGoal::HoldItem("knife".into()),
        ),
        mission("bring_tools", 1, &["buy_knife"], MissionGoal::Deliver),
        mission("bring_ingredients", 1, &["bring_tools"], MissionGoal::Deliver),
    ]
}

pub fn shops() -> Vec<ShopDef> {
    vec![ShopDef {
        id: "general".into(),
        name: "General Store".into(),
        entries: vec![
            ShopEntryDef {
                item: "knife".into(),
                price: 10,
                quantity: 2,
            },
            ShopEntryDef {
                item: "bowl".into(),
                price: 5,
                quantity: 1,
            },
            ShopEntryDef {
                item: "tomato".into(),
                price: 2,
                quantity: 0,
            },
        ],
    }]
}

pub fn game_data() -> GameData {
    game_data_with_scene(SceneLayout::default())
}

pub fn game_data_with_scene(scene: SceneLayout) -> GameData {
    GameData::build(items(), missions(), shops(), scene).expect("fixture data is valid")
}
