use std::sync::Arc;

use super::{components::*, events::*};
use crate::core::{events::LogEvent, resources::GameConfig, rng::GameRng};
use crate::data::schema::{vec3, DoorKind, ItemDef, ItemKind};
use crate::data::GameData;
use crate::economy::components::Wallet;
use crate::inventory::components::Inventory;
use crate::inventory::events::ItemDropped;
use crate::player::components::{Motor, Player};
use bevy::prelude::*;

fn spawn_pickup(
    commands: &mut Commands,
    item: Arc<ItemDef>,
    position: Vec3,
    range: f32,
    body: Body,
) -> Entity {
    let scale = item.world_scale;
    let prompt = Prompt::new(format!("[E] Pick up {}", item.name));
    commands
        .spawn((
            Pickup { item, range },
            prompt,
            body,
            Transform::from_translation(position).with_scale(Vec3::splat(scale)),
        ))
        .id()
}

/// 摆放静态场景：门、回收箱、散落物品和刷新点
pub fn spawn_scene(mut commands: Commands, data: Res<GameData>, mut rng: ResMut<GameRng>) {
    let scene = &data.scene;

    for def in &scene.doors {
        let rotation = Quat::from_rotation_y(def.yaw.to_radians());
        let transform = Transform::from_translation(vec3(def.position)).with_rotation(rotation);
        let door = Door::new(def.speed, def.interact_distance);
        match &def.kind {
            DoorKind::Swing { angle } => {
                commands.spawn((door, SwingDoor::new(*angle, rotation), transform));
            }
            DoorKind::Sliding { offset } => {
                let sliding = SlidingDoor {
                    offset: vec3(*offset),
                    closed: transform.translation,
                };
                commands.spawn((door, sliding, transform));
            }
            DoorKind::Double { angle } => {
                commands.spawn((door, DoubleDoor::new(*angle), transform));
            }
        }
    }
    commands.spawn((DoorLookProbe { distance: 3.0 }, Prompt::new("[E] Open")));

    for def in &scene.crates {
        commands.spawn((
            SaleCrate::new(
                def.interaction_range,
                def.look_angle,
                vec3(def.zone_offset),
                def.zone_radius,
                def.open_speed,
            ),
            Prompt::new("[E] Open"),
            Transform::from_translation(vec3(def.position))
                .with_rotation(Quat::from_rotation_y(def.yaw.to_radians())),
        ));
    }

    for def in &scene.pickups {
        if let Some(item) = data.item(&def.item) {
            // 场景摆放的物品不受物理影响
            let body = Body {
                velocity: Vec3::ZERO,
                resting: true,
            };
            spawn_pickup(&mut commands, item.clone(), vec3(def.position), def.range, body);
        }
    }

    for def in &scene.spawners {
        let mut spawner = ScrapSpawner {
            pool: def.items.iter().filter_map(|id| data.item(id).cloned()).collect(),
            points: def
                .points
                .iter()
                .map(|p| SpawnPoint {
                    position: vec3(*p),
                    spawned: None,
                    picked: false,
                })
                .collect(),
            prevent_duplicates: def.prevent_duplicates,
            spawn_height: def.spawn_height,
            pickup_range: def.pickup_range,
            respawn: def.respawn,
        };
        for (index, item) in spawner.plan_fill(|n| rng.index(n)) {
            let at = spawner.points[index].position + Vec3::Y * spawner.spawn_height;
            let entity = spawn_pickup(&mut commands, item, at, spawner.pickup_range, Body::default());
            spawner.points[index].spawned = Some(entity);
        }
        info!(
            "废料刷新点已补货 {}/{}",
            spawner.points.iter().filter(|p| p.spawned.is_some()).count(),
            spawner.points.len()
        );
        commands.spawn(spawner);
    }
}

/// 每个触发区的进入/离开边沿
pub fn detect_triggers(
    player: Query<&Transform, With<Player>>,
    mut zones: Query<(Entity, &Transform, &mut TriggerZone), Without<Player>>,
    mut entered: EventWriter<TriggerEntered>,
    mut exited: EventWriter<TriggerExited>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    for (entity, transform, mut zone) in &mut zones {
        let inside = ground_distance(transform.translation, player.translation) <= zone.radius;
        if inside == zone.player_inside {
            continue;
        }
        zone.player_inside = inside;
        if inside {
            entered.write(TriggerEntered(entity));
        } else {
            exited.write(TriggerExited(entity));
        }
    }
}

/* ---------------------------- 门 ---------------------------- */

pub fn toggle_doors(
    mut ev_interact: EventReader<InteractEvent>,
    player: Query<&Transform, With<Player>>,
    mut doors: Query<
        (
            &Transform,
            &mut Door,
            Option<&mut SwingDoor>,
            Option<&SlidingDoor>,
            Option<&mut DoubleDoor>,
        ),
        Without<Player>,
    >,
) {
    if ev_interact.read().count() == 0 {
        return;
    }
    let Ok(player) = player.single() else {
        return;
    };
    let at = player.translation;

    for (transform, mut door, swing, sliding, double) in &mut doors {
        // 推拉门按门框位置算距离，不按移动的门板
        let anchor = sliding.map_or(transform.translation, |s| s.closed);
        if ground_distance(anchor, at) > door.reach {
            continue;
        }
        door.open = !door.open;
        if let Some(mut swing) = swing {
            if door.open {
                swing.open_away_from(transform, at);
            } else {
                swing.target = swing.closed;
            }
        }
        if let Some(mut double) = double {
            if door.open {
                double.aim_away_from(transform, at);
            }
        }
    }
}

pub fn animate_swing_doors(time: Res<Time>, mut doors: Query<(&mut Transform, &Door, &SwingDoor)>) {
    for (mut transform, door, swing) in &mut doors {
        let t = (time.delta_secs() * door.speed).min(1.0);
        transform.rotation = transform.rotation.slerp(swing.target, t);
    }
}

pub fn animate_sliding_doors(
    time: Res<Time>,
    mut doors: Query<(&mut Transform, &Door, &SlidingDoor)>,
) {
    for (mut transform, door, sliding) in &mut doors {
        let target = sliding.target(door.open);
        let step = door.speed * time.delta_secs();
        transform.translation = transform.translation.move_towards(target, step);
    }
}

pub fn animate_double_doors(time: Res<Time>, mut doors: Query<(&Door, &mut DoubleDoor)>) {
    for (door, mut double) in &mut doors {
        let t = (time.delta_secs() * door.speed).min(1.0);
        let (left, right) = double.targets(door.open);
        double.left = double.left.slerp(left, t);
        double.right = double.right.slerp(right, t);
    }
}

pub fn door_sounds(
    mut doors: Query<(Entity, &mut Door)>,
    mut sounds: EventWriter<DoorSound>,
    mut log: EventWriter<LogEvent>,
) {
    for (entity, mut door) in &mut doors {
        if door.open == door.sounded {
            continue;
        }
        door.sounded = door.open;
        sounds.write(DoorSound {
            door: entity,
            opening: door.open,
        });
        log.write(LogEvent::new(if door.open {
            "Door opens"
        } else {
            "Door closes"
        }));
    }
}

/// 相机射线逐个检测门的包围盒
pub fn door_look_probe(
    player: Query<(&Transform, &Motor), With<Player>>,
    doors: Query<(&Transform, Option<&SlidingDoor>), With<Door>>,
    mut probes: Query<(&DoorLookProbe, &mut Prompt)>,
) {
    let Ok((transform, motor)) = player.single() else {
        return;
    };
    let eye = motor.eye_position(transform);
    let dir = motor.look_direction(transform);
    for (probe, mut prompt) in &mut probes {
        let hit = doors.iter().any(|(door, sliding)| {
            let at = sliding.map_or(door.translation, |s| s.closed);
            ray_hits_door(eye, dir, probe.distance, at)
        });
        if prompt.visible != hit {
            prompt.visible = hit;
        }
    }
}

/* ---------------------------- 回收箱 ---------------------------- */

/// 每半秒重新扫描回收箱区域里的废料
pub fn scan_crates(
    time: Res<Time>,
    mut crates: Query<(&Transform, &mut SaleCrate)>,
    pickups: Query<(Entity, &Transform, &Pickup)>,
) {
    for (crate_tf, mut sale) in &mut crates {
        if !sale.scan.tick(time.delta()).just_finished() {
            continue;
        }
        let inside: Vec<(Entity, &Pickup)> = pickups
            .iter()
            .filter(|(_, tf, pickup)| pickup.is_scrap() && sale.holds(crate_tf, tf.translation))
            .map(|(entity, _, pickup)| (entity, pickup))
            .collect();
        if inside.len() != sale.contents.len() {
            let listing: Vec<String> = inside
                .iter()
                .map(|(_, p)| format!("{} ({})", p.item.name, p.item.value.label()))
                .collect();
            debug!("回收箱内有 {} 件废料：{}", inside.len(), listing.join(", "));
        }
        sale.estimate = inside.iter().map(|(_, p)| p.item.value.midpoint()).sum();
        sale.contents = inside.into_iter().map(|(entity, _)| entity).collect();
    }
}

pub fn probe_crates(
    player: Query<&Transform, With<Player>>,
    mut crates: Query<(&Transform, &mut SaleCrate, &mut Prompt), Without<Player>>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    for (transform, mut sale, mut prompt) in &mut crates {
        let in_range = sale.player_in_range(transform.translation, player);
        if sale.in_range != in_range {
            sale.in_range = in_range;
        }
        prompt.set_if_neq(Prompt {
            text: sale.prompt_text().into(),
            visible: in_range && !sale.is_animating(),
        });
    }
}

#[allow(clippy::too_many_arguments)]
pub fn toggle_crates(
    mut commands: Commands,
    mut ev_interact: EventReader<InteractEvent>,
    mut crates: Query<&mut SaleCrate>,
    pickups: Query<&Pickup>,
    mut rng: ResMut<GameRng>,
    mut wallet: ResMut<Wallet>,
    mut sold: EventWriter<ItemsSold>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_interact.read().count() == 0 {
        return;
    }
    for mut sale in &mut crates {
        if !sale.in_range || sale.is_animating() {
            continue;
        }
        if !sale.open {
            sale.start_animation(true);
            continue;
        }

        let contents = std::mem::take(&mut sale.contents);
        sale.estimate = 0.0;
        let mut count = 0;
        let mut total = 0;
        for entity in contents {
            let Ok(pickup) = pickups.get(entity) else {
                continue;
            };
            let value = pickup.item.value.roll(&mut rng.rng);
            debug!("卖出 {}，得 {value}$", pickup.item.name);
            total += value;
            count += 1;
            commands.entity(entity).despawn();
        }
        if count > 0 {
            sale.stats.record(count, total);
            wallet.add(total);
            info!("回收箱卖出 {count} 件废料，得 {total}$");
            log.write(LogEvent(format!("Sold {count} scrap for {total}$")));
            log.write(LogEvent(sale.stats.summary()));
            sold.write(ItemsSold {
                kind: ItemKind::Scrap,
                count,
                total,
            });
        }
        sale.start_animation(false);
    }
}

pub fn animate_crates(time: Res<Time>, mut crates: Query<&mut SaleCrate>) {
    for mut sale in &mut crates {
        let Some(anim) = sale.animation.as_mut() else {
            continue;
        };
        anim.timer.tick(time.delta());
        let progress = anim.timer.fraction();
        let eased = progress * progress * (3.0 - 2.0 * progress);
        let (from, to) = if anim.opening {
            (0.0, CRATE_OPEN_ANGLE)
        } else {
            (CRATE_OPEN_ANGLE, 0.0)
        };
        let finished = anim.timer.finished();
        let opening = anim.opening;
        sale.lid = from + (to - from) * eased;
        if finished {
            sale.open = opening;
            sale.animation = None;
        }
    }
}

/* ---------------------------- 拾取物 ---------------------------- */

pub fn probe_pickups(
    player: Query<&Transform, With<Player>>,
    mut pickups: Query<(&Transform, &Pickup, &mut Prompt), Without<Player>>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    for (transform, pickup, mut prompt) in &mut pickups {
        let visible = ground_distance(transform.translation, player.translation) <= pickup.range;
        if prompt.visible != visible {
            prompt.visible = visible;
        }
    }
}

pub fn take_pickups(
    mut commands: Commands,
    mut ev_interact: EventReader<InteractEvent>,
    pickups: Query<(Entity, &Pickup, &Prompt)>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_interact.read().count() == 0 {
        return;
    }
    for (entity, pickup, prompt) in &pickups {
        if !prompt.visible {
            continue;
        }
        match inventory.add(&pickup.item) {
            Ok(slot) => {
                info!("拾取 {} 放入槽位 {slot}", pickup.item.name);
                log.write(LogEvent(format!("Picked up {}", pickup.item.name)));
                commands.entity(entity).despawn();
            }
            Err(err) => {
                log.write(LogEvent(err.to_string()));
            }
        }
    }
}

/// 丢出的物品出现在相机前方并被扔出去
pub fn spawn_dropped_items(
    mut commands: Commands,
    mut ev_dropped: EventReader<ItemDropped>,
    config: Res<GameConfig>,
    player: Query<(&Transform, &Motor), With<Player>>,
) {
    let Ok((transform, motor)) = player.single() else {
        ev_dropped.clear();
        return;
    };
    let cfg = &config.inventory;
    let look = motor.look_direction(transform);
    let at = motor.eye_position(transform) + look * cfg.drop_distance;
    let velocity = look * cfg.drop_force + Vec3::Y * (0.5 * cfg.drop_force + cfg.drop_upward_force);

    for ItemDropped { item } in ev_dropped.read() {
        let body = Body {
            velocity,
            resting: false,
        };
        spawn_pickup(&mut commands, item.clone(), at, DROPPED_PICKUP_RANGE, body);
    }
}

pub fn apply_item_physics(time: Res<Time>, mut bodies: Query<(&mut Transform, &mut Body)>) {
    let dt = time.delta_secs();
    for (mut transform, mut body) in &mut bodies {
        if body.resting {
            continue;
        }
        body.velocity.y -= ITEM_GRAVITY * dt;
        let step = body.velocity * dt;
        transform.translation += step;
        if transform.translation.y <= 0.0 {
            transform.translation.y = 0.0;
            body.velocity = Vec3::ZERO;
            body.resting = true;
        }
    }
}

/* ---------------------------- 刷新点 ---------------------------- */

/// 物品消失（被拾取或卖出）的点等下一次卖出再补
pub fn track_spawned_points(
    mut spawners: Query<&mut ScrapSpawner>,
    pickups: Query<(), With<Pickup>>,
) {
    for mut spawner in &mut spawners {
        let respawn = spawner.respawn;
        for point in spawner.points.iter_mut() {
            if let Some(entity) = point.spawned {
                if !pickups.contains(entity) {
                    point.spawned = None;
                    point.picked = respawn;
                }
            }
        }
    }
}

pub fn respawn_after_sale(
    mut commands: Commands,
    mut ev_sold: EventReader<ItemsSold>,
    mut spawners: Query<&mut ScrapSpawner>,
    mut rng: ResMut<GameRng>,
) {
    if ev_sold.read().count() == 0 {
        return;
    }
    for mut spawner in &mut spawners {
        if !spawner.respawn {
            continue;
        }
        let plan = spawner.plan_respawn(|n| rng.index(n));
        for (index, item) in plan {
            let at = spawner.points[index].position + Vec3::Y * spawner.spawn_height;
            let range = spawner.pickup_range;
            let entity = spawn_pickup(&mut commands, item, at, range, Body::default());
            spawner.points[index].spawned = Some(entity);
        }
    }
}

/// 提示出现时打印出来
pub fn announce_prompts(prompts: Query<&Prompt, Changed<Prompt>>, mut log: EventWriter<LogEvent>) {
    for prompt in &prompts {
        if prompt.visible {
            log.write(LogEvent(prompt.text.clone()));
        }
    }
}
