use bevy::prelude::*;

use crate::core::resources::PlayerConfig;

/// 玩家标记
#[derive(Component)]
pub struct Player;

/// 角色控制器状态（脚在 `Transform.translation`，偏航在 `Transform.rotation`）
#[derive(Component, Debug, Clone)]
pub struct Motor {
    pub velocity: Vec3,
    pub speed: f32,
    pub sprinting: bool,
    pub crouching: bool,
    pub can_jump: bool,
    pub height: f32,
    /// 眼睛离脚的高度
    pub eye: f32,
    /// 角度，正值向下看
    pub pitch: f32,
    /// 本帧应用的平滑视角增量
    pub look_delta: Vec2,
}

impl Motor {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            velocity: Vec3::ZERO,
            speed: config.walk_speed,
            sprinting: false,
            crouching: false,
            can_jump: true,
            height: config.standing_height,
            eye: config.standing_eye,
            pitch: 0.0,
            look_delta: Vec2::ZERO,
        }
    }

    pub fn eye_position(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.eye
    }

    /// 相机朝向：身体偏航加俯仰
    pub fn look_direction(&self, transform: &Transform) -> Vec3 {
        transform.rotation * Quat::from_rotation_x(-self.pitch.to_radians()) * Vec3::NEG_Z
    }
}

#[derive(Component, Debug, Clone)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32,
    pub drain_rate: f32,
    pub min_to_sprint: f32,
}

impl Stamina {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            current: config.max_stamina,
            max: config.max_stamina,
            regen_rate: config.stamina_regen,
            drain_rate: config.stamina_drain,
            min_to_sprint: config.min_stamina_to_sprint,
        }
    }

    /// 前进一帧；返回本帧是否在冲刺
    /// 只有不按冲刺时才回复
    pub fn tick(&mut self, wants_sprint: bool, dt: f32) -> bool {
        let sprinting = if wants_sprint && self.current > self.min_to_sprint {
            self.current -= self.drain_rate * dt;
            true
        } else {
            if !wants_sprint && self.current < self.max {
                self.current += self.regen_rate * dt;
            }
            false
        };
        self.current = self.current.clamp(0.0, self.max);
        sprinting
    }

    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// 控制器的哪一半当前接受输入
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub movement: bool,
    pub looking: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            movement: true,
            looking: true,
        }
    }
}

/// 本帧的持续输入和单次输入
#[derive(Resource, Debug, Default, Clone)]
pub struct PlayerInput {
    /// x 向右平移，y 向前走；范围都是 -1..=1
    pub axis: Vec2,
    pub sprint: bool,
    pub jump: bool,
    pub crouch_toggle: bool,
    pub look: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamina() -> Stamina {
        Stamina::new(&PlayerConfig::default())
    }

    #[test]
    fn sprint_drains_then_stops_at_threshold() {
        let mut s = stamina();
        assert!(s.tick(true, 1.0));
        assert_eq!(s.current, 3.5);
        assert!(s.tick(true, 1.0));
        assert!(s.tick(true, 1.0));
        assert_eq!(s.current, 0.5);
        // 低于 min_to_sprint：只能走，按住 shift 时也不回复
        assert!(!s.tick(true, 1.0));
        assert_eq!(s.current, 0.5);
    }

    #[test]
    fn regen_is_clamped_to_max() {
        let mut s = stamina();
        s.current = 4.5;
        assert!(!s.tick(false, 1.0));
        assert_eq!(s.current, 5.0);
        s.restore(10.0);
        assert_eq!(s.current, 5.0);
        assert_eq!(s.fraction(), 1.0);
    }

    #[test]
    fn look_direction_follows_pitch() {
        let mut motor = Motor::new(&PlayerConfig::default());
        let transform = Transform::default();
        assert!(motor.look_direction(&transform).abs_diff_eq(Vec3::NEG_Z, 1e-5));

        motor.pitch = 90.0;
        assert!(motor.look_direction(&transform).abs_diff_eq(Vec3::NEG_Y, 1e-5));
        assert_eq!(motor.eye_position(&transform), Vec3::new(0.0, 1.6, 0.0));
    }
}
