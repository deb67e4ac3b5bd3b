use bevy::asset::Asset;
use bevy::math::Vec3;
use bevy::reflect::TypePath;
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use super::loader::RonAsset;

/* ---------------------------- 物品 ---------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ItemKind {
    Scrap,
    Ingredient,
    Consumable,
    Tool,
}

/// 售价。`min < max` 时在 `min..=max` 内均匀取值，否则固定为 `min`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

impl ValueRange {
    pub fn fixed(value: u32) -> Self {
        Self { min: value, max: value }
    }

    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        if self.min < self.max {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn midpoint(&self) -> f32 {
        if self.min < self.max {
            (self.min as f32 + self.max as f32) / 2.0
        } else {
            self.min as f32
        }
    }

    pub fn label(&self) -> String {
        if self.min < self.max {
            format!("${}-${}", self.min, self.max)
        } else {
            format!("${}", self.min)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default = "default_true")]
    pub stackable: bool,
    #[serde(default)]
    pub value: ValueRange,
    #[serde(default)]
    pub stamina_restore: f32,
    #[serde(default = "default_hand_scale")]
    pub hand_scale: f32,
    #[serde(default = "default_world_scale")]
    pub world_scale: f32,
}

impl ItemDef {
    /// 物品名按不区分大小写的片段匹配（`"knife"` 能匹配 `"Chef Knife"`）
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(&fragment.to_lowercase())
    }
}

fn default_true() -> bool {
    true
}

fn default_hand_scale() -> f32 {
    7.0
}

fn default_world_scale() -> f32 {
    1.0
}

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct ItemList {
    pub items: Vec<ItemDef>,
}

impl RonAsset for ItemList {
    const EXTENSIONS: &'static [&'static str] = &["items.ron"];
}

/* ---------------------------- 任务 ---------------------------- */

/// 任务进度的来源
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum MissionGoal {
    /// 背包里某一类物品的总数
    CollectKind(ItemKind),
    /// 当前余额
    EarnMoney,
    /// 第一个名字包含该片段的槽位里的数量
    HoldItem(String),
    /// 在回收箱卖出的某类物品数
    SellKind(ItemKind),
    /// 由送货 NPC 完成
    Deliver,
}

impl MissionGoal {
    /// 每帧从背包/钱包重新计算的目标
    pub fn is_polled(&self) -> bool {
        matches!(
            self,
            MissionGoal::CollectKind(_) | MissionGoal::EarnMoney | MissionGoal::HoldItem(_)
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissionDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub required: u32,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub goal: MissionGoal,
}

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct MissionList {
    pub missions: Vec<MissionDef>,
}

impl RonAsset for MissionList {
    const EXTENSIONS: &'static [&'static str] = &["missions.ron"];
}

/* ---------------------------- 商店 ---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct ShopEntryDef {
    pub item: String,
    pub price: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopDef {
    pub id: String,
    pub name: String,
    pub entries: Vec<ShopEntryDef>,
}

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct ShopList {
    pub shops: Vec<ShopDef>,
}

impl RonAsset for ShopList {
    const EXTENSIONS: &'static [&'static str] = &["shops.ron"];
}

/* ---------------------------- 场景 ---------------------------- */

pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

#[derive(Debug, Clone, Deserialize)]
pub enum DoorKind {
    /// 合页门，朝远离玩家的方向转 `angle` 度
    Swing { angle: f32 },
    /// 平移 `offset`
    Sliding { offset: [f32; 3] },
    /// 两扇合页门反向打开
    Double { angle: f32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorDef {
    pub kind: DoorKind,
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_door_speed")]
    pub speed: f32,
    #[serde(default = "default_reach")]
    pub interact_distance: f32,
}

fn default_door_speed() -> f32 {
    2.0
}

fn default_reach() -> f32 {
    3.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrateDef {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_reach")]
    pub interaction_range: f32,
    #[serde(default = "default_look_angle")]
    pub look_angle: f32,
    #[serde(default = "default_zone_offset")]
    pub zone_offset: [f32; 3],
    #[serde(default = "default_zone_radius")]
    pub zone_radius: f32,
    #[serde(default = "default_door_speed")]
    pub open_speed: f32,
}

fn default_look_angle() -> f32 {
    30.0
}

fn default_zone_offset() -> [f32; 3] {
    [0.0, 0.5, 0.0]
}

fn default_zone_radius() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnerDef {
    pub items: Vec<String>,
    pub points: Vec<[f32; 3]>,
    #[serde(default = "default_true")]
    pub prevent_duplicates: bool,
    #[serde(default = "default_spawn_height")]
    pub spawn_height: f32,
    #[serde(default = "default_spawned_range")]
    pub pickup_range: f32,
    #[serde(default = "default_true")]
    pub respawn: bool,
}

fn default_spawn_height() -> f32 {
    0.5
}

fn default_spawned_range() -> f32 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupDef {
    pub item: String,
    pub position: [f32; 3],
    #[serde(default = "default_reach")]
    pub range: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopPlacement {
    pub shop: String,
    pub position: [f32; 3],
    #[serde(default = "default_zone_radius")]
    pub radius: f32,
    #[serde(default = "default_controls_delay")]
    pub controls_delay: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardPlacement {
    pub position: [f32; 3],
    #[serde(default = "default_zone_radius")]
    pub radius: f32,
    #[serde(default = "default_controls_delay")]
    pub controls_delay: f32,
}

fn default_controls_delay() -> f32 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryStageDef {
    pub mission: String,
    pub items: Vec<String>,
    pub delivered_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryDef {
    pub position: [f32; 3],
    #[serde(default = "default_zone_radius")]
    pub radius: f32,
    pub stages: Vec<DeliveryStageDef>,
    #[serde(default = "default_npc_prompt")]
    pub prompt_text: String,
    #[serde(default = "default_npc_delay")]
    pub switch_delay: f32,
    #[serde(default = "default_npc_delay")]
    pub prompt_hide: f32,
}

fn default_npc_prompt() -> String {
    "[E] Give items to NPC".into()
}

fn default_npc_delay() -> f32 {
    2.0
}

#[derive(Asset, TypePath, Deserialize, Debug, Clone, Default)]
pub struct SceneLayout {
    #[serde(default)]
    pub player_spawn: [f32; 3],
    #[serde(default)]
    pub doors: Vec<DoorDef>,
    #[serde(default)]
    pub crates: Vec<CrateDef>,
    #[serde(default)]
    pub spawners: Vec<SpawnerDef>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
    #[serde(default)]
    pub shops: Vec<ShopPlacement>,
    #[serde(default)]
    pub mission_boards: Vec<BoardPlacement>,
    #[serde(default)]
    pub deliveries: Vec<DeliveryDef>,
}

impl RonAsset for SceneLayout {
    const EXTENSIONS: &'static [&'static str] = &["scene.ron"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn value_range_rolls_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let range = ValueRange { min: 4, max: 9 };
        for _ in 0..200 {
            let v = range.roll(&mut rng);
            assert!((4..=9).contains(&v));
        }
        assert_eq!(range.midpoint(), 6.5);
        assert_eq!(range.label(), "$4-$9");
    }

    #[test]
    fn midpoint_of_huge_values_does_not_overflow() {
        let range = ValueRange {
            min: u32::MAX - 1,
            max: u32::MAX,
        };
        assert_eq!(range.midpoint(), u32::MAX as f32);
        assert!(range.midpoint() > 4.0e9);
    }

    #[test]
    fn inverted_range_is_fixed_at_min() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let range = ValueRange { min: 5, max: 4 };
        assert_eq!(range.roll(&mut rng), 5);
        assert_eq!(range.midpoint(), 5.0);
        assert_eq!(ValueRange::fixed(2).label(), "$2");
    }

    #[test]
    fn item_defaults_from_ron() {
        let item: ItemDef =
            bevy::asset::ron::de::from_str(r#"(id: "bolt", name: "Rusty Bolt", kind: Scrap)"#)
                .unwrap();
        assert!(item.stackable);
        assert_eq!(item.hand_scale, 7.0);
        assert_eq!(item.world_scale, 1.0);
        assert_eq!(item.value, ValueRange::default());
        assert!(item.name_contains("rusty"));
    }
}
