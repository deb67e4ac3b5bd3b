use super::{components::*, events::*};
use crate::core::resources::GameConfig;
use crate::data::{schema::vec3, GameData};
use crate::inventory::events::RestoreStamina;
use bevy::prelude::*;

/// 地面高度
const GROUND_Y: f32 = 0.0;
/// 着地时向下的贴地速度
const GROUND_STICK: f32 = -0.3;

pub fn spawn_player(mut commands: Commands, data: Res<GameData>, config: Res<GameConfig>) {
    let spawn = vec3(data.scene.player_spawn);
    commands.spawn((
        Player,
        Transform::from_translation(spawn),
        Motor::new(&config.player),
        Stamina::new(&config.player),
        Controls::default(),
    ));
    info!("玩家出生于 {spawn}");
}

/// 把输入事件汇总成本帧输入状态
pub fn read_player_input(
    mut input: ResMut<PlayerInput>,
    mut ev_move: EventReader<MoveInput>,
    mut ev_sprint: EventReader<SprintInput>,
    mut ev_jump: EventReader<JumpInput>,
    mut ev_crouch: EventReader<CrouchInput>,
    mut ev_look: EventReader<LookInput>,
) {
    for MoveInput(axis) in ev_move.read() {
        input.axis = axis.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }
    for SprintInput(on) in ev_sprint.read() {
        input.sprint = *on;
    }
    if ev_jump.read().count() > 0 {
        input.jump = true;
    }
    if ev_crouch.read().count() % 2 == 1 {
        input.crouch_toggle = true;
    }
    for LookInput(delta) in ev_look.read() {
        input.look += *delta;
    }
}

pub fn teleport_player(
    mut ev_tp: EventReader<Teleport>,
    mut ev_face: EventReader<FacePoint>,
    mut player: Query<(&mut Transform, &mut Motor), With<Player>>,
) {
    let Ok((mut transform, mut motor)) = player.single_mut() else {
        ev_tp.clear();
        ev_face.clear();
        return;
    };
    for Teleport(to) in ev_tp.read() {
        transform.translation = *to;
        motor.velocity = Vec3::ZERO;
    }
    for FacePoint(target) in ev_face.read() {
        let d = *target - transform.translation;
        if d.x.abs() + d.z.abs() > f32::EPSILON {
            transform.rotation = Quat::from_rotation_y(f32::atan2(-d.x, -d.z));
            motor.pitch = 0.0;
        }
    }
}

pub fn restore_stamina(
    mut ev_restore: EventReader<RestoreStamina>,
    mut player: Query<&mut Stamina, With<Player>>,
) {
    for RestoreStamina(amount) in ev_restore.read() {
        if let Ok(mut stamina) = player.single_mut() {
            stamina.restore(*amount);
        }
    }
}

pub fn handle_crouch(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut input: ResMut<PlayerInput>,
    mut player: Query<(&mut Motor, &Controls), With<Player>>,
) {
    let cfg = &config.player;
    let Ok((mut motor, controls)) = player.single_mut() else {
        return;
    };

    if std::mem::take(&mut input.crouch_toggle) && controls.movement {
        motor.crouching = !motor.crouching;
    }

    let (target_height, target_eye) = if motor.crouching {
        (cfg.crouching_height, cfg.crouching_eye)
    } else {
        (cfg.standing_height, cfg.standing_eye)
    };
    let t = (cfg.crouch_transition_speed * time.delta_secs()).min(1.0);
    motor.height = motor.height.lerp(target_height, t);
    motor.eye = motor.eye.lerp(target_eye, t);
}

pub fn handle_look(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut input: ResMut<PlayerInput>,
    mut player: Query<(&mut Transform, &mut Motor, &Controls), With<Player>>,
) {
    let cfg = &config.player;
    let raw = std::mem::take(&mut input.look);
    let Ok((mut transform, mut motor, controls)) = player.single_mut() else {
        return;
    };
    if !controls.looking {
        motor.look_delta = Vec2::ZERO;
        return;
    }

    let target = raw * cfg.look_sensitivity;
    let t = if cfg.look_smooth_time > 0.0 {
        (time.delta_secs() / cfg.look_smooth_time).min(1.0)
    } else {
        1.0
    };
    motor.look_delta = motor.look_delta.lerp(target, t);

    let delta = motor.look_delta;
    transform.rotate_y(-delta.x.to_radians());
    motor.pitch = (motor.pitch - delta.y).clamp(-cfg.pitch_limit, cfg.pitch_limit);
}

pub fn move_player(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut input: ResMut<PlayerInput>,
    mut player: Query<(&mut Transform, &mut Motor, &mut Stamina, &Controls), With<Player>>,
) {
    let cfg = &config.player;
    let dt = time.delta_secs();
    let jump = std::mem::take(&mut input.jump);
    let Ok((mut transform, mut motor, mut stamina, controls)) = player.single_mut() else {
        return;
    };

    let grounded = transform.translation.y <= GROUND_Y + 1e-3 && motor.velocity.y <= 0.0;

    // 操作被锁时体力照样计算
    let axis = if controls.movement { input.axis } else { Vec2::ZERO };
    let forward = *transform.forward();
    let right = *transform.right();
    let wish = (forward * axis.y + right * axis.x).normalize_or_zero();

    if grounded {
        let wants_sprint =
            controls.movement && input.sprint && !motor.crouching && wish != Vec3::ZERO;
        motor.sprinting = stamina.tick(wants_sprint, dt);
        motor.speed = if motor.crouching {
            cfg.crouch_speed
        } else if motor.sprinting {
            cfg.run_speed
        } else {
            cfg.walk_speed
        };

        let horizontal = wish * motor.speed;
        motor.velocity.x = horizontal.x;
        motor.velocity.z = horizontal.z;
        motor.velocity.y = 0.0;

        if jump && controls.movement && motor.can_jump && !motor.crouching {
            motor.velocity.y = cfg.jump_force;
        }
    }

    motor.velocity.y -= cfg.gravity * dt;
    if grounded && motor.velocity.y < 0.0 {
        motor.velocity.y = GROUND_STICK;
    }

    let velocity = motor.velocity;
    transform.translation += velocity * dt;
    if transform.translation.y < GROUND_Y {
        transform.translation.y = GROUND_Y;
    }
}
