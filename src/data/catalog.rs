use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;
use uuid::Uuid;

use super::schema::{ItemDef, MissionDef, SceneLayout, ShopDef};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("duplicate item id `{0}`")]
    DuplicateItem(String),
    #[error("duplicate mission id `{0}`")]
    DuplicateMission(String),
    #[error("duplicate shop id `{0}`")]
    DuplicateShop(String),
    #[error("{owner} references unknown item `{item}`")]
    UnknownItem { owner: String, item: String },
    #[error("{owner} references unknown mission `{mission}`")]
    UnknownMission { owner: String, mission: String },
    #[error("scene references unknown shop `{0}`")]
    UnknownShop(String),
    #[error("mission prerequisites form a cycle through `{0}`")]
    PrerequisiteCycle(String),
}

/// 校验过的静态表，加载完成后各插件只读共享
#[derive(Resource, Debug, Clone)]
pub struct GameData {
    items: Vec<Arc<ItemDef>>,
    missions: Vec<MissionDef>,
    shops: Vec<ShopDef>,
    pub scene: SceneLayout,
}

impl GameData {
    pub fn build(
        items: Vec<ItemDef>,
        missions: Vec<MissionDef>,
        shops: Vec<ShopDef>,
        scene: SceneLayout,
    ) -> Result<Self, DataError> {
        let data = Self {
            items: items.into_iter().map(Arc::new).collect(),
            missions,
            shops,
            scene,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn items(&self) -> &[Arc<ItemDef>] {
        &self.items
    }

    pub fn missions(&self) -> &[MissionDef] {
        &self.missions
    }

    pub fn shops(&self) -> &[ShopDef] {
        &self.shops
    }

    pub fn item(&self, id: &str) -> Option<&Arc<ItemDef>> {
        self.items.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }

    /// 按 id、显示名或派生 uuid 查找
    pub fn find_item(&self, token: &str) -> Option<&Arc<ItemDef>> {
        let t_low = token.to_lowercase();
        self.items.iter().find(|e| {
            e.id.eq_ignore_ascii_case(&t_low)
                || e.name.eq_ignore_ascii_case(&t_low)
                || item_uuid(&e.id).to_string() == t_low
        })
    }

    pub fn mission(&self, id: &str) -> Option<&MissionDef> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn shop(&self, id: &str) -> Option<&ShopDef> {
        self.shops.iter().find(|s| s.id == id)
    }

    fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.to_lowercase()) {
                return Err(DataError::DuplicateItem(item.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for mission in &self.missions {
            if !seen.insert(mission.id.as_str()) {
                return Err(DataError::DuplicateMission(mission.id.clone()));
            }
        }
        for mission in &self.missions {
            for prereq in &mission.prerequisites {
                if self.mission(prereq).is_none() {
                    return Err(DataError::UnknownMission {
                        owner: format!("mission `{}`", mission.id),
                        mission: prereq.clone(),
                    });
                }
            }
        }
        self.check_prerequisite_cycles()?;

        let mut seen = HashSet::new();
        for shop in &self.shops {
            if !seen.insert(shop.id.as_str()) {
                return Err(DataError::DuplicateShop(shop.id.clone()));
            }
            for entry in &shop.entries {
                self.require_item(&format!("shop `{}`", shop.id), &entry.item)?;
            }
        }

        for spawner in &self.scene.spawners {
            for item in &spawner.items {
                self.require_item("scrap spawner", item)?;
            }
        }
        for pickup in &self.scene.pickups {
            self.require_item("scene pickup", &pickup.item)?;
        }
        for placement in &self.scene.shops {
            if self.shop(&placement.shop).is_none() {
                return Err(DataError::UnknownShop(placement.shop.clone()));
            }
        }
        for npc in &self.scene.deliveries {
            for stage in &npc.stages {
                if self.mission(&stage.mission).is_none() {
                    return Err(DataError::UnknownMission {
                        owner: "delivery npc".into(),
                        mission: stage.mission.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn require_item(&self, owner: &str, id: &str) -> Result<(), DataError> {
        if self.item(id).is_none() {
            return Err(DataError::UnknownItem {
                owner: owner.into(),
                item: id.into(),
            });
        }
        Ok(())
    }

    /// 深度优先遍历；再次碰到灰色节点就是环
    fn check_prerequisite_cycles(&self) -> Result<(), DataError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Grey,
            Black,
        }

        fn visit<'a>(
            data: &'a GameData,
            id: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
        ) -> Result<(), DataError> {
            match marks.get(id) {
                Some(Mark::Black) => return Ok(()),
                Some(Mark::Grey) => return Err(DataError::PrerequisiteCycle(id.to_string())),
                None => {}
            }
            marks.insert(id, Mark::Grey);
            if let Some(mission) = data.mission(id) {
                for prereq in &mission.prerequisites {
                    visit(data, prereq, marks)?;
                }
            }
            marks.insert(id, Mark::Black);
            Ok(())
        }

        let mut marks = HashMap::new();
        for mission in &self.missions {
            visit(self, &mission.id, &mut marks)?;
        }
        Ok(())
    }
}

/// 用固定 namespace + id 字节生成版本 5 UUID，保证可重复得到同一值
pub fn item_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}
