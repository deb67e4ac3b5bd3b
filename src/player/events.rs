use bevy::prelude::*;

/// 按住的移动键；零向量表示停下
#[derive(Event)]
pub struct MoveInput(pub Vec2);

#[derive(Event)]
pub struct SprintInput(pub bool);

#[derive(Event)]
pub struct JumpInput;

#[derive(Event)]
pub struct CrouchInput;

/// 原始鼠标增量（x 向右转，y 向上抬）
#[derive(Event)]
pub struct LookInput(pub Vec2);

/// 调试：移动玩家的脚底位置
#[derive(Event)]
pub struct Teleport(pub Vec3);

/// 调试：把身体转向地面上的一个点
#[derive(Event)]
pub struct FacePoint(pub Vec3);
