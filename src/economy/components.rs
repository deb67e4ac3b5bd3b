use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::core::resources::GameConfig;
use crate::data::{schema::ItemDef, schema::ShopDef, GameData};
use crate::inventory::components::Inventory;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("no entry {0} in this shop")]
    NoSuchEntry(usize),
    #[error("{0} is sold out")]
    OutOfStock(String),
    #[error("{price}$ needed, balance is {balance}$")]
    InsufficientFunds { price: u32, balance: u32 },
    #[error("no room in the inventory for {0}")]
    InventoryFull(String),
}

/// 玩家的钱；初始值来自 `[economy] starting_money`，见下面的 FromWorld
#[derive(Resource, Debug, Clone)]
pub struct Wallet {
    pub balance: u32,
}

impl Wallet {
    pub fn add(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub fn subtract(&mut self, amount: u32) -> Result<(), ShopError> {
        if amount > self.balance {
            return Err(ShopError::InsufficientFunds {
                price: amount,
                balance: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn label(&self) -> String {
        format!("Balance {}$", self.balance)
    }
}

impl FromWorld for Wallet {
    fn from_world(world: &mut World) -> Self {
        let balance = world
            .get_resource::<GameConfig>()
            .map_or(0, |c| c.economy.starting_money);
        Self { balance }
    }
}

#[derive(Debug, Clone)]
pub struct StockEntry {
    pub item: Arc<ItemDef>,
    pub price: u32,
    pub quantity: u32,
}

/// 每个商店各自的一份货单，库存只在本实例内变化
#[derive(Component, Debug, Clone)]
pub struct ShopStock {
    pub name: String,
    pub entries: Vec<StockEntry>,
}

impl ShopStock {
    pub fn from_def(def: &ShopDef, data: &GameData) -> Self {
        let entries = def
            .entries
            .iter()
            .filter_map(|e| {
                data.item(&e.item).map(|item| StockEntry {
                    item: item.clone(),
                    price: e.price,
                    quantity: e.quantity,
                })
            })
            .collect();
        Self {
            name: def.name.clone(),
            entries,
        }
    }

    /// 依次检查库存、余额、背包空间；失败时什么都不变
    pub fn buy(
        &mut self,
        index: usize,
        wallet: &mut Wallet,
        inventory: &mut Inventory,
    ) -> Result<Arc<ItemDef>, ShopError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(ShopError::NoSuchEntry(index))?;
        if entry.quantity == 0 {
            return Err(ShopError::OutOfStock(entry.item.name.clone()));
        }
        if wallet.balance < entry.price {
            return Err(ShopError::InsufficientFunds {
                price: entry.price,
                balance: wallet.balance,
            });
        }
        if !inventory.can_accept(&entry.item) {
            return Err(ShopError::InventoryFull(entry.item.name.clone()));
        }

        wallet.subtract(entry.price)?;
        entry.quantity -= 1;
        inventory
            .add(&entry.item)
            .map_err(|_| ShopError::InventoryFull(entry.item.name.clone()))?;
        Ok(entry.item.clone())
    }

    pub fn listing(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let stock = if e.quantity == 0 {
                    "sold out".to_string()
                } else {
                    format!("x{}", e.quantity)
                };
                format!("[{i}] {} {}$ {stock}", e.item.name, e.price)
            })
            .collect()
    }
}

/// 商店柜台触发区：打开后延迟一会儿再锁控制器
#[derive(Component, Debug, Clone)]
pub struct ShopCounter {
    pub controls_delay: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn general() -> ShopStock {
        let data = fixtures::game_data();
        ShopStock::from_def(data.shop("general").unwrap(), &data)
    }

    #[test]
    fn wallet_label_and_subtract() {
        let mut wallet = Wallet { balance: 0 };
        wallet.add(12);
        assert_eq!(wallet.label(), "Balance 12$");
        assert!(wallet.subtract(20).is_err());
        assert_eq!(wallet.balance, 12);
        wallet.subtract(12).unwrap();
        assert_eq!(wallet.balance, 0);
    }

    #[test]
    fn buying_charges_and_decrements_stock() {
        let mut shop = general();
        let mut wallet = Wallet { balance: 25 };
        let mut inv = Inventory::new(4, 4, 20);

        assert_eq!(shop.buy(0, &mut wallet, &mut inv).unwrap().id, "knife");
        assert_eq!(wallet.balance, 15);
        assert_eq!(shop.entries[0].quantity, 1);
        assert_eq!(inv.count_of("knife"), 1);

        shop.buy(0, &mut wallet, &mut inv).unwrap();
        assert_eq!(
            shop.buy(0, &mut wallet, &mut inv).unwrap_err(),
            ShopError::OutOfStock("Chef Knife".into())
        );
        assert_eq!(wallet.balance, 5);
    }

    #[test]
    fn failed_purchases_change_nothing() {
        let mut shop = general();
        let mut wallet = Wallet { balance: 4 };
        let mut inv = Inventory::new(1, 1, 20);

        assert_eq!(
            shop.buy(1, &mut wallet, &mut inv).unwrap_err(),
            ShopError::InsufficientFunds {
                price: 5,
                balance: 4
            }
        );
        assert_eq!(
            shop.buy(2, &mut wallet, &mut inv).unwrap_err(),
            ShopError::OutOfStock("Tomato".into())
        );
        assert_eq!(
            shop.buy(7, &mut wallet, &mut inv).unwrap_err(),
            ShopError::NoSuchEntry(7)
        );

        inv.add(&fixtures::proto("lantern")).unwrap();
        wallet.add(20);
        assert_eq!(
            shop.buy(1, &mut wallet, &mut inv).unwrap_err(),
            ShopError::InventoryFull("Wooden Bowl".into())
        );
        assert_eq!(wallet.balance, 24);
        assert_eq!(shop.entries[1].quantity, 1);
    }

    #[test]
    fn listing_marks_sold_out_entries() {
        let lines = general().listing();
        assert_eq!(lines[0], "[0] Chef Knife 10$ x2");
        assert_eq!(lines[2], "[2] Tomato 2$ sold out");
    }
}
