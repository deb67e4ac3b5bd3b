use std::sync::Arc;

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

use crate::data::schema::{ItemDef, ItemKind};

/// 地面平面上的距离，忽略高度
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// 屏幕提示文字
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub visible: bool,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: false,
        }
    }
}

/// 触发区（以实体为中心的圆柱）
#[derive(Component, Debug, Clone)]
pub struct TriggerZone {
    pub radius: f32,
    pub player_inside: bool,
}

impl TriggerZone {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            player_inside: false,
        }
    }
}

/* ---------------------------- 门 ---------------------------- */

/// 门的公共状态；各类门的专有部分放在单独的组件里
#[derive(Component, Debug, Clone)]
pub struct Door {
    pub open: bool,
    pub speed: f32,
    pub reach: f32,
    /// 上一次播放声音时的开关状态
    pub sounded: bool,
}

impl Door {
    pub fn new(speed: f32, reach: f32) -> Self {
        Self {
            open: false,
            speed,
            reach,
            sounded: false,
        }
    }
}

/// 合页门：朝远离开门者的方向转
#[derive(Component, Debug, Clone)]
pub struct SwingDoor {
    pub angle: f32,
    pub closed: Quat,
    pub target: Quat,
}

impl SwingDoor {
    pub fn new(angle: f32, closed: Quat) -> Self {
        Self {
            angle,
            closed,
            target: closed,
        }
    }

    /// 开门方向的符号：玩家站在门前时为正
    pub fn open_away_from(&mut self, door: &Transform, player: Vec3) {
        let to_player = (player - door.translation).normalize_or_zero();
        let dot = self.closed.mul_vec3(Vec3::NEG_Z).dot(to_player);
        let angle = if dot > 0.0 { self.angle } else { -self.angle };
        self.target = Quat::from_rotation_y(angle.to_radians()) * self.closed;
    }
}

#[derive(Component, Debug, Clone)]
pub struct SlidingDoor {
    pub offset: Vec3,
    pub closed: Vec3,
}

impl SlidingDoor {
    pub fn target(&self, open: bool) -> Vec3 {
        if open { self.closed + self.offset } else { self.closed }
    }
}

/// 双开门：两扇门绕各自合页反向转动
#[derive(Component, Debug, Clone)]
pub struct DoubleDoor {
    pub angle: f32,
    pub left: Quat,
    pub right: Quat,
    left_open: Quat,
    right_open: Quat,
}

impl DoubleDoor {
    pub fn new(angle: f32) -> Self {
        Self {
            angle,
            left: Quat::IDENTITY,
            right: Quat::IDENTITY,
            left_open: Quat::IDENTITY,
            right_open: Quat::IDENTITY,
        }
    }

    pub fn aim_away_from(&mut self, door: &Transform, player: Vec3) {
        let to_player = (player - door.translation).normalize_or_zero();
        let dir = if door.forward().dot(to_player) > 0.0 { -1.0 } else { 1.0 };
        let swing = (dir * self.angle).to_radians();
        self.left_open = Quat::from_rotation_y(swing);
        self.right_open = Quat::from_rotation_y(-swing);
    }

    pub fn targets(&self, open: bool) -> (Quat, Quat) {
        if open {
            (self.left_open, self.right_open)
        } else {
            (Quat::IDENTITY, Quat::IDENTITY)
        }
    }
}

/// 视线检测用的门大小包围盒
pub const DOOR_HALF_EXTENTS: Vec3 = Vec3::new(0.6, 1.1, 0.6);

pub fn door_bounds(position: Vec3) -> Aabb3d {
    Aabb3d::new(position + Vec3::Y * DOOR_HALF_EXTENTS.y, DOOR_HALF_EXTENTS)
}

/// 相机射线检测，看到门时显示 "[E] Open"
#[derive(Component, Debug, Clone)]
pub struct DoorLookProbe {
    pub distance: f32,
}

pub fn ray_hits_door(origin: Vec3, direction: Vec3, max: f32, door: Vec3) -> bool {
    let Ok(dir) = Dir3::new(direction) else {
        return false;
    };
    RayCast3d::new(origin, dir, max)
        .aabb_intersection_at(&door_bounds(door))
        .is_some()
}

/* ---------------------------- 回收箱 ---------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleStats {
    pub items_sold: u32,
    pub money_earned: u32,
}

impl SaleStats {
    pub fn record(&mut self, count: u32, total: u32) {
        self.items_sold = self.items_sold.saturating_add(count);
        self.money_earned = self.money_earned.saturating_add(total);
    }

    /// 每次卖出后追加的累计行
    pub fn summary(&self) -> String {
        format!(
            "Total items sold today: {}, total money earned: {}$",
            self.items_sold, self.money_earned
        )
    }
}

/// 箱盖朝 `opening` 方向的动画
#[derive(Debug, Clone)]
pub struct LidAnimation {
    pub timer: Timer,
    pub opening: bool,
}

/// 回收箱：丢进区域的废料在关盖时卖出
#[derive(Component, Debug, Clone)]
pub struct SaleCrate {
    pub range: f32,
    pub look_angle: f32,
    /// 区域中心（相对箱子）
    pub zone_offset: Vec3,
    pub zone_radius: f32,
    pub open_speed: f32,
    pub open: bool,
    pub animation: Option<LidAnimation>,
    /// 箱盖角度，0 关，90 开
    pub lid: f32,
    pub in_range: bool,
    pub contents: Vec<Entity>,
    /// `contents` 各自价值区间中点之和
    pub estimate: f32,
    pub scan: Timer,
    pub stats: SaleStats,
}

pub const CRATE_SCAN_SECS: f32 = 0.5;
pub const CRATE_OPEN_ANGLE: f32 = 90.0;

impl SaleCrate {
    pub fn new(
        range: f32,
        look_angle: f32,
        zone_offset: Vec3,
        zone_radius: f32,
        open_speed: f32,
    ) -> Self {
        Self {
            range,
            look_angle,
            zone_offset,
            zone_radius,
            open_speed: open_speed.max(0.01),
            open: false,
            animation: None,
            lid: 0.0,
            in_range: false,
            contents: Vec::new(),
            estimate: 0.0,
            scan: Timer::from_seconds(CRATE_SCAN_SECS, TimerMode::Repeating),
            stats: SaleStats::default(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn prompt_text(&self) -> &'static str {
        if self.open { "[E] Close" } else { "[E] Open" }
    }

    /// 距离判断，加上身体朝向与箱子的夹角
    pub fn player_in_range(&self, crate_pos: Vec3, player: &Transform) -> bool {
        if ground_distance(crate_pos, player.translation) > self.range {
            return false;
        }
        let to_crate = (crate_pos - player.translation).normalize_or_zero();
        if to_crate == Vec3::ZERO {
            return true;
        }
        player.forward().angle_between(to_crate).to_degrees() <= self.look_angle
    }

    /// 同时在区域球体和箱子局部包围盒内
    pub fn holds(&self, crate_tf: &Transform, point: Vec3) -> bool {
        let zone = crate_tf.transform_point(self.zone_offset);
        if point.distance(zone) > self.zone_radius {
            return false;
        }
        let local = crate_tf.rotation.inverse() * (point - crate_tf.translation);
        local.x.abs() <= 1.0 && (-0.5..=1.0).contains(&local.y) && local.z.abs() <= 1.0
    }

    pub fn start_animation(&mut self, opening: bool) {
        self.animation = Some(LidAnimation {
            timer: Timer::from_seconds(1.0 / self.open_speed, TimerMode::Once),
            opening,
        });
    }
}

/* ---------------------------- 拾取物 ---------------------------- */

pub const DROPPED_PICKUP_RANGE: f32 = 3.0;

/// 场景里可以按交互键拾取的物品
#[derive(Component, Debug, Clone)]
pub struct Pickup {
    pub item: Arc<ItemDef>,
    pub range: f32,
}

impl Pickup {
    pub fn is_scrap(&self) -> bool {
        self.item.kind == ItemKind::Scrap
    }
}

/// 散落物品的质点物理：重力加平地
#[derive(Component, Debug, Clone, Default)]
pub struct Body {
    pub velocity: Vec3,
    pub resting: bool,
}

pub const ITEM_GRAVITY: f32 = 9.81;

/* ---------------------------- 刷新点 ---------------------------- */

#[derive(Debug, Clone)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub spawned: Option<Entity>,
    /// 被玩家拿空；下一次卖出后补货
    pub picked: bool,
}

/// 让一组刷新点保持有随机废料
#[derive(Component, Debug, Clone)]
pub struct ScrapSpawner {
    pub pool: Vec<Arc<ItemDef>>,
    pub points: Vec<SpawnPoint>,
    pub prevent_duplicates: bool,
    pub spawn_height: f32,
    pub pickup_range: f32,
    pub respawn: bool,
}

impl ScrapSpawner {
    /// 给每个空点选物品；候选池用完之前不重复
    pub fn plan_fill(&self, mut pick: impl FnMut(usize) -> usize) -> Vec<(usize, Arc<ItemDef>)> {
        let mut available = self.pool.clone();
        let mut plan = Vec::new();
        for (index, point) in self.points.iter().enumerate() {
            if point.spawned.is_some() || available.is_empty() {
                continue;
            }
            let choice = pick(available.len());
            let item = if self.prevent_duplicates {
                let item = available.remove(choice);
                if available.is_empty() {
                    available = self.pool.clone();
                }
                item
            } else {
                available[choice].clone()
            };
            plan.push((index, item));
        }
        plan
    }

    /// 补货时从整个候选池里抽
    pub fn plan_respawn(&mut self, mut pick: impl FnMut(usize) -> usize) -> Vec<(usize, Arc<ItemDef>)> {
        if self.pool.is_empty() {
            return Vec::new();
        }
        let mut plan = Vec::new();
        for (index, point) in self.points.iter_mut().enumerate() {
            if !point.picked {
                continue;
            }
            point.picked = false;
            if point.spawned.is_none() {
                plan.push((index, self.pool[pick(self.pool.len())].clone()));
            }
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn sale_stats_accumulate_across_sales() {
        let mut stats = SaleStats::default();
        stats.record(2, 6);
        stats.record(1, 9);
        assert_eq!(
            stats,
            SaleStats {
                items_sold: 3,
                money_earned: 15
            }
        );
        assert_eq!(
            stats.summary(),
            "Total items sold today: 3, total money earned: 15$"
        );
    }

    fn spawner(points: usize, prevent_duplicates: bool) -> ScrapSpawner {
        ScrapSpawner {
            pool: vec![fixtures::proto("scrap_bolt"), fixtures::proto("scrap_pipe")],
            points: (0..points)
                .map(|i| SpawnPoint {
                    position: Vec3::X * i as f32,
                    spawned: None,
                    picked: false,
                })
                .collect(),
            prevent_duplicates,
            spawn_height: 0.5,
            pickup_range: 0.5,
            respawn: true,
        }
    }

    #[test]
    fn fill_avoids_duplicates_until_pool_is_exhausted() {
        let s = spawner(3, true);
        let plan = s.plan_fill(|_| 0);
        let ids: Vec<_> = plan.iter().map(|(_, i)| i.id.as_str()).collect();
        assert_eq!(ids, ["scrap_bolt", "scrap_pipe", "scrap_bolt"]);

        let s = spawner(3, false);
        let plan = s.plan_fill(|_| 0);
        assert!(plan.iter().all(|(_, i)| i.id == "scrap_bolt"));
    }

    #[test]
    fn respawn_only_refills_picked_points() {
        let mut s = spawner(3, true);
        s.points[1].picked = true;
        s.points[2].picked = true;
        s.points[2].spawned = Some(Entity::from_raw(9));

        let plan = s.plan_respawn(|n| n - 1);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].0, 1);
        assert_eq!(plan[0].1.id, "scrap_pipe");
        assert!(s.points.iter().all(|p| !p.picked));
    }

    #[test]
    fn crate_range_needs_distance_and_look_angle() {
        let c = SaleCrate::new(3.0, 30.0, Vec3::new(0.0, 0.5, 0.0), 1.0, 2.0);
        let crate_pos = Vec3::new(0.0, 0.0, -2.0);
        let facing = Transform::default();
        assert!(c.player_in_range(crate_pos, &facing));

        let turned = Transform::from_rotation(Quat::from_rotation_y(90f32.to_radians()));
        assert!(!c.player_in_range(crate_pos, &turned));

        let far = Transform::from_xyz(0.0, 0.0, 5.0);
        assert!(!c.player_in_range(crate_pos, &far));
    }

    #[test]
    fn crate_zone_is_sphere_and_box() {
        let c = SaleCrate::new(3.0, 30.0, Vec3::new(0.0, 0.5, 0.0), 1.0, 2.0);
        let tf = Transform::from_xyz(4.0, 0.0, 0.0);
        assert!(c.holds(&tf, Vec3::new(4.2, 0.0, 0.3)));
        assert!(!c.holds(&tf, Vec3::new(5.5, 0.5, 0.0)));
        assert!(!c.holds(&tf, Vec3::new(4.0, -0.6, 0.0)));
    }

    #[test]
    fn swing_door_opens_away_from_player() {
        let tf = Transform::default();
        let mut door = SwingDoor::new(90.0, Quat::IDENTITY);
        // 玩家在门前（门的 forward 是 -Z）
        door.open_away_from(&tf, Vec3::new(0.0, 0.0, -2.0));
        let front = door.target;
        door.open_away_from(&tf, Vec3::new(0.0, 0.0, 2.0));
        assert!(front.angle_between(door.target) > 3.0);
    }

    #[test]
    fn look_ray_hits_door_box() {
        let eye = Vec3::new(0.0, 1.6, 0.0);
        let door = Vec3::new(0.0, 0.0, -2.5);
        assert!(ray_hits_door(eye, Vec3::NEG_Z, 3.0, door));
        assert!(!ray_hits_door(eye, Vec3::Z, 3.0, door));
        assert!(!ray_hits_door(eye, Vec3::NEG_Z, 1.0, door));
    }
}
