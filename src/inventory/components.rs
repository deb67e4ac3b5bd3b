use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::core::resources::{GameConfig, InventoryConfig};
use crate::data::schema::{ItemDef, ItemKind};

/// 运行时堆叠：共享模板 + 数量
#[derive(Debug, Clone)]
pub struct ItemStack {
    pub proto: Arc<ItemDef>,
    pub count: u32,
}

impl ItemStack {
    pub fn new(proto: Arc<ItemDef>) -> Self {
        Self { proto, count: 1 }
    }

    fn holds(&self, item: &ItemDef) -> bool {
        self.proto.id == item.id
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("inventory is full, cannot take {0}")]
    Full(String),
    #[error("slot {0} does not exist")]
    SlotOutOfRange(usize),
    #[error("slot {0} is empty")]
    EmptySlot(usize),
    #[error("{0} cannot be used")]
    NotUsable(String),
    #[error("slot {to} cannot take the stack from slot {from}")]
    Incompatible { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDir {
    Up,
    Down,
}

/// 两个槽位之间拖放的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Moved,
    /// `moved` 个并入目标堆叠，`left` 个留在原处
    Merged { moved: u32, left: u32 },
    Unchanged,
}

/// 玩家背包（挂在 Resource）；前 `hotbar_size` 格是快捷栏
#[derive(Resource, Debug, Clone)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    pub max_stack: u32,
    pub hotbar_size: usize,
    selected: usize,
}

impl Inventory {
    pub fn new(capacity: usize, hotbar_size: usize, max_stack: u32) -> Self {
        Self {
            slots: vec![None; capacity],
            max_stack: max_stack.max(1),
            hotbar_size: hotbar_size.clamp(1, capacity.max(1)),
            selected: 0,
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.capacity, config.hotbar_size, config.max_stack)
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_stack(&self) -> Option<&ItemStack> {
        self.slot(self.selected)
    }

    /// 先叠到未满的同类堆叠上，否则放进第一个空位
    pub fn add(&mut self, item: &Arc<ItemDef>) -> Result<usize, InventoryError> {
        if let Some(index) = self.stack_target(item) {
            if let Some(stack) = self.slots[index].as_mut() {
                stack.count += 1;
            }
            return Ok(index);
        }
        if let Some(index) = self.slots.iter().position(Option::is_none) {
            self.slots[index] = Some(ItemStack::new(item.clone()));
            return Ok(index);
        }
        Err(InventoryError::Full(item.name.clone()))
    }

    pub fn can_accept(&self, item: &ItemDef) -> bool {
        self.stack_target(item).is_some() || self.slots.iter().any(Option::is_none)
    }

    fn stack_target(&self, item: &ItemDef) -> Option<usize> {
        if !item.stackable {
            return None;
        }
        self.slots.iter().position(|s| {
            s.as_ref()
                .is_some_and(|s| s.holds(item) && s.count < self.max_stack)
        })
    }

    /// 快捷栏数字键从 1 开始
    pub fn select_hotbar(&mut self, number: usize) -> Result<(), InventoryError> {
        if number == 0 || number > self.hotbar_size {
            return Err(InventoryError::SlotOutOfRange(number));
        }
        self.selected = number - 1;
        Ok(())
    }

    /// 向上是前一格；两个方向都在快捷栏内循环
    pub fn scroll(&mut self, dir: ScrollDir) {
        let n = self.hotbar_size;
        let current = self.selected % n;
        self.selected = match dir {
            ScrollDir::Up => (current + n - 1) % n,
            ScrollDir::Down => (current + 1) % n,
        };
    }

    /// 从槽位取出一个，取完就清空
    pub fn take_one(&mut self, index: usize) -> Result<Arc<ItemDef>, InventoryError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::SlotOutOfRange(index))?;
        let stack = slot.as_mut().ok_or(InventoryError::EmptySlot(index))?;
        let proto = stack.proto.clone();
        stack.count -= 1;
        if stack.count == 0 {
            *slot = None;
        }
        Ok(proto)
    }

    pub fn take_selected(&mut self) -> Result<Arc<ItemDef>, InventoryError> {
        self.take_one(self.selected)
    }

    /// 消耗选中槽位里的一个消耗品
    pub fn use_selected(&mut self) -> Result<Arc<ItemDef>, InventoryError> {
        let stack = self
            .selected_stack()
            .ok_or(InventoryError::EmptySlot(self.selected))?;
        if stack.proto.kind != ItemKind::Consumable {
            return Err(InventoryError::NotUsable(stack.proto.name.clone()));
        }
        self.take_selected()
    }

    pub fn count_by_kind(&self, kind: ItemKind) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.proto.kind == kind)
            .map(|s| s.count)
            .sum()
    }

    pub fn first_slot_matching(&self, fragment: &str) -> Option<usize> {
        self.slots.iter().position(|s| {
            s.as_ref()
                .is_some_and(|s| s.count > 0 && s.proto.name_contains(fragment))
        })
    }

    /// 第一个名字包含 `fragment` 的槽位里的数量
    pub fn count_of(&self, fragment: &str) -> u32 {
        self.first_slot_matching(fragment)
            .and_then(|i| self.slot(i))
            .map_or(0, |s| s.count)
    }

    /// 每种各取一个；缺任何一种就一个都不取
    pub fn take_each(&mut self, fragments: &[String]) -> bool {
        let mut picks = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            match self.first_slot_matching(fragment) {
                Some(index) => picks.push(index),
                None => return false,
            }
        }
        // 两个名字片段可能命中同一个堆叠
        for index in &picks {
            let needed = picks.iter().filter(|p| *p == index).count() as u32;
            if self.slot(*index).map_or(0, |s| s.count) < needed {
                return false;
            }
        }
        for index in picks {
            let _ = self.take_one(index);
        }
        true
    }

    /// 把整个堆叠拖到另一个槽位
    pub fn move_stack(&mut self, from: usize, to: usize) -> Result<DragOutcome, InventoryError> {
        let len = self.slots.len();
        if from >= len {
            return Err(InventoryError::SlotOutOfRange(from));
        }
        if to >= len {
            return Err(InventoryError::SlotOutOfRange(to));
        }
        if from == to {
            if self.slots[from].is_none() {
                return Err(InventoryError::EmptySlot(from));
            }
            return Ok(DragOutcome::Unchanged);
        }

        let Some(mut stack) = self.slots[from].take() else {
            return Err(InventoryError::EmptySlot(from));
        };
        if self.slots[to].is_none() {
            self.slots[to] = Some(stack);
            return Ok(DragOutcome::Moved);
        }

        let max_stack = self.max_stack;
        let merged = match self.slots[to].as_mut() {
            Some(target) if target.holds(&stack.proto) && stack.proto.stackable => {
                let moved = max_stack.saturating_sub(target.count).min(stack.count);
                target.count += moved;
                stack.count -= moved;
                Some(moved)
            }
            _ => None,
        };

        match merged {
            Some(moved) => {
                let left = stack.count;
                if left > 0 {
                    self.slots[from] = Some(stack);
                }
                Ok(DragOutcome::Merged { moved, left })
            }
            None => {
                self.slots[from] = Some(stack);
                Err(InventoryError::Incompatible { from, to })
            }
        }
    }
}

impl FromWorld for Inventory {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<GameConfig>()
            .map(|c| c.inventory.clone())
            .unwrap_or_default();
        Self::from_config(&config)
    }
}

/// 手上拿着的东西：选中槽位的物品，不参与物理
#[derive(Resource, Debug, Default)]
pub struct HeldItem {
    pub item: Option<Arc<ItemDef>>,
    pub scale: f32,
}
