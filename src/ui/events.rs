use bevy::prelude::*;

/// 背包键
#[derive(Event)]
pub struct ToggleInventoryEvent;

#[derive(Event)]
pub struct EscapeEvent;
