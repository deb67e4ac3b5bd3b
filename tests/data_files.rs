use std::path::Path;

use bevy::asset::ron;
use scrap_run::core::resources::GameConfig;
use scrap_run::data::schema::{ItemList, MissionGoal, MissionList, SceneLayout, ShopList};
use scrap_run::data::GameData;

fn read(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

fn shipped_data() -> GameData {
    let config = GameConfig::default();
    let items: ItemList = ron::de::from_str(&read(&config.data.items)).unwrap();
    let missions: MissionList = ron::de::from_str(&read(&config.data.missions)).unwrap();
    let shops: ShopList = ron::de::from_str(&read(&config.data.shops)).unwrap();
    let scene: SceneLayout = ron::de::from_str(&read(&config.data.scene)).unwrap();
    GameData::build(items.items, missions.missions, shops.shops, scene).unwrap()
}

#[test]
fn shipped_tables_validate() {
    let data = shipped_data();
    assert!(data.items().len() >= 4);
    assert_eq!(data.missions()[0].prerequisites.len(), 0);
    assert!(!data.scene.spawners.is_empty());
}

#[test]
fn every_delivery_stage_has_a_deliver_mission() {
    let data = shipped_data();
    for npc in &data.scene.deliveries {
        for stage in &npc.stages {
            let mission = data.mission(&stage.mission).unwrap();
            assert_eq!(mission.goal, MissionGoal::Deliver);
            for fragment in &stage.items {
                assert!(
                    data.items().iter().any(|i| i.name_contains(fragment)),
                    "no item named like {fragment}"
                );
            }
        }
    }
}

#[test]
fn shipped_config_parses() {
    let text = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("scrap_run.toml"),
    )
    .unwrap();
    let config: GameConfig = toml::from_str(&text).unwrap();
    assert_eq!(config.seed, 42);
    assert_eq!(config.inventory.capacity, 36);
}
