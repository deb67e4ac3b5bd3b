//! 文字控制台：读取 stdin → 解析命令 → 写入对应的游戏事件

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::snapshot::{print_snapshot, SnapshotEvent};
use crate::core::{events::LogEvent, states::AppState};
use crate::data::{catalog::item_uuid, GameData};
use crate::economy::events::{BuyEvent, ShowMoneyEvent, ShowShopEvent};
use crate::interaction::events::InteractEvent;
use crate::inventory::components::ScrollDir;
use crate::inventory::events::{
    DragSlotEvent, DragTarget, DropSelectedEvent, GiveItemEvent, ListInventoryEvent,
    ScrollHotbarEvent, SelectSlotEvent, UseSelectedEvent,
};
use crate::missions::events::ShowMissionsEvent;
use crate::player::events::{
    CrouchInput, FacePoint, JumpInput, LookInput, MoveInput, SprintInput, Teleport,
};
use crate::ui::events::{EscapeEvent, ToggleInventoryEvent};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

const HELP: &str = "commands:
  help                   this list
  status                 run state and loaded data
  exit / quit            leave the game
  items [token]          list items, or look one up by id / uuid / name
  give <id> [n]          put items in the inventory
  inv                    inventory listing
  select <n>             hotbar slot 1..n
  scroll <up|down>       cycle the hotbar
  use                    use the selected item
  drop                   throw one of the selected item
  drag <from> <to|out>   drag a stack onto a slot, or out of the panel
  move <x> <z>           hold movement (x right, z forward); move 0 0 stops
  stop                   release movement
  sprint <on|off>        hold or release sprint
  crouch                 toggle crouching
  jump                   jump
  look <dx> <dy>         mouse delta
  tp <x> <y> <z>         teleport
  face <x> <z>           turn toward a ground point
  e                      interact
  bag                    toggle the inventory panel
  esc                    escape (pause / close missions)
  shop                   list the open shop
  buy <n>                buy shop entry n
  missions               mission list
  money                  wallet balance
  snapshot               session state as JSON";

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            .add_event::<CliLine>()
            .add_event::<SnapshotEvent>()
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                (execute_cli_commands, print_snapshot)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件 & 命令 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>),
    Give { id: String, count: u32 },
    Inventory,
    Select(usize),
    Scroll(ScrollDir),
    Use,
    Drop,
    Drag { from: usize, to: DragTarget },
    Move(Vec2),
    Sprint(bool),
    Crouch,
    Jump,
    Look(Vec2),
    Teleport(Vec3),
    Face(Vec3),
    Interact,
    Bag,
    Escape,
    Shop,
    Buy(usize),
    Missions,
    Money,
    Snapshot,
    /// 命令存在但参数不对
    Usage(&'static str),
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 事件写入 ---------------------------- */

#[derive(SystemParam)]
struct PlayerWriters<'w> {
    movement: EventWriter<'w, MoveInput>,
    sprint: EventWriter<'w, SprintInput>,
    jump: EventWriter<'w, JumpInput>,
    crouch: EventWriter<'w, CrouchInput>,
    look: EventWriter<'w, LookInput>,
    teleport: EventWriter<'w, Teleport>,
    face: EventWriter<'w, FacePoint>,
}

#[derive(SystemParam)]
struct InventoryWriters<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
    select: EventWriter<'w, SelectSlotEvent>,
    scroll: EventWriter<'w, ScrollHotbarEvent>,
    use_item: EventWriter<'w, UseSelectedEvent>,
    drop: EventWriter<'w, DropSelectedEvent>,
    drag: EventWriter<'w, DragSlotEvent>,
}

#[derive(SystemParam)]
struct PanelWriters<'w> {
    interact: EventWriter<'w, InteractEvent>,
    bag: EventWriter<'w, ToggleInventoryEvent>,
    escape: EventWriter<'w, EscapeEvent>,
    shop: EventWriter<'w, ShowShopEvent>,
    buy: EventWriter<'w, BuyEvent>,
    missions: EventWriter<'w, ShowMissionsEvent>,
    money: EventWriter<'w, ShowMoneyEvent>,
    snapshot: EventWriter<'w, SnapshotEvent>,
}

/* ---------------------------- 执行 ---------------------------- */

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut log: EventWriter<LogEvent>,
    mut next: ResMut<NextState<AppState>>,
    state: Res<State<AppState>>,
    data: Res<GameData>,
    mut player: PlayerWriters,
    mut inventory: InventoryWriters,
    mut panels: PanelWriters,
) {
    for CliLine(input) in line_reader.read() {
        debug!("命令行：{input}");
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent::new(HELP));
            }
            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items: {}, Missions: {}, Shops: {}",
                    state.get(),
                    data.items().len(),
                    data.missions().len(),
                    data.shops().len()
                )));
            }
            Command::Exit => {
                log.write(LogEvent::new("Bye~"));
                next.set(AppState::Shutdown);
            }
            Command::Items(None) => {
                for item in data.items() {
                    log.write(LogEvent(format!(
                        "{} | {} | {} | {:?} | {}",
                        item_uuid(&item.id),
                        item.id,
                        item.name,
                        item.kind,
                        item.value.label()
                    )));
                }
            }
            Command::Items(Some(token)) => match data.find_item(&token) {
                Some(item) => {
                    log.write(LogEvent(format!(
                        "==================================================
UUID      : {}
ID        : {}
Name      : {}
Kind      : {:?}
Value     : {}
Stackable : {}
==================================================",
                        item_uuid(&item.id),
                        item.id,
                        item.name,
                        item.kind,
                        item.value.label(),
                        item.stackable
                    )));
                }
                None => {
                    log.write(LogEvent(format!("No item matches {token}")));
                }
            },
            Command::Give { id, count } => {
                inventory.give.write(GiveItemEvent { id, count });
            }
            Command::Inventory => {
                inventory.list.write(ListInventoryEvent);
            }
            Command::Select(n) => {
                inventory.select.write(SelectSlotEvent(n));
            }
            Command::Scroll(dir) => {
                inventory.scroll.write(ScrollHotbarEvent(dir));
            }
            Command::Use => {
                inventory.use_item.write(UseSelectedEvent);
            }
            Command::Drop => {
                inventory.drop.write(DropSelectedEvent);
            }
            Command::Drag { from, to } => {
                inventory.drag.write(DragSlotEvent { from, to });
            }
            Command::Move(axis) => {
                player.movement.write(MoveInput(axis));
            }
            Command::Sprint(on) => {
                player.sprint.write(SprintInput(on));
            }
            Command::Crouch => {
                player.crouch.write(CrouchInput);
            }
            Command::Jump => {
                player.jump.write(JumpInput);
            }
            Command::Look(delta) => {
                player.look.write(LookInput(delta));
            }
            Command::Teleport(pos) => {
                player.teleport.write(Teleport(pos));
            }
            Command::Face(point) => {
                player.face.write(FacePoint(point));
            }
            Command::Interact => {
                panels.interact.write(InteractEvent);
            }
            Command::Bag => {
                panels.bag.write(ToggleInventoryEvent);
            }
            Command::Escape => {
                panels.escape.write(EscapeEvent);
            }
            Command::Shop => {
                panels.shop.write(ShowShopEvent);
            }
            Command::Buy(n) => {
                panels.buy.write(BuyEvent(n));
            }
            Command::Missions => {
                panels.missions.write(ShowMissionsEvent);
            }
            Command::Money => {
                panels.money.write(ShowMoneyEvent);
            }
            Command::Snapshot => {
                panels.snapshot.write(SnapshotEvent);
            }
            Command::Usage(usage) => {
                log.write(LogEvent(format!("usage: {usage}")));
            }
            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("Unknown command: {cmd} (try help)")));
            }
        }
    }
}

/* ---------------------------- 解析 ---------------------------- */

fn floats<const N: usize>(parts: &mut std::str::SplitWhitespace) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for v in &mut out {
        *v = parts.next()?.parse().ok()?;
    }
    Some(out)
}

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(|s| s.to_string())),
        "give" => match parts.next() {
            Some(id) => Command::Give {
                id: id.to_string(),
                count: parts.next().and_then(|c| c.parse().ok()).unwrap_or(1),
            },
            None => Command::Usage("give <id> [n]"),
        },
        "inventory" | "inv" => Command::Inventory,
        "select" => match parts.next().and_then(|n| n.parse().ok()) {
            Some(n) => Command::Select(n),
            None => Command::Usage("select <n>"),
        },
        "scroll" => match parts.next() {
            Some("up") => Command::Scroll(ScrollDir::Up),
            Some("down") => Command::Scroll(ScrollDir::Down),
            _ => Command::Usage("scroll <up|down>"),
        },
        "use" => Command::Use,
        "drop" => Command::Drop,
        "drag" => {
            let from = parts.next().and_then(|n| n.parse().ok());
            let to = match parts.next() {
                Some("out") => Some(DragTarget::Outside),
                Some(n) => n.parse().ok().map(DragTarget::Slot),
                None => None,
            };
            match (from, to) {
                (Some(from), Some(to)) => Command::Drag { from, to },
                _ => Command::Usage("drag <from> <to|out>"),
            }
        }
        "move" => match floats::<2>(&mut parts) {
            Some([x, z]) => Command::Move(Vec2::new(x, z)),
            None => Command::Usage("move <x> <z>"),
        },
        "stop" => Command::Move(Vec2::ZERO),
        "sprint" => match parts.next() {
            Some("on") => Command::Sprint(true),
            Some("off") => Command::Sprint(false),
            _ => Command::Usage("sprint <on|off>"),
        },
        "crouch" => Command::Crouch,
        "jump" => Command::Jump,
        "look" => match floats::<2>(&mut parts) {
            Some(d) => Command::Look(Vec2::from_array(d)),
            None => Command::Usage("look <dx> <dy>"),
        },
        "tp" => match floats::<3>(&mut parts) {
            Some(p) => Command::Teleport(Vec3::from_array(p)),
            None => Command::Usage("tp <x> <y> <z>"),
        },
        "face" => match floats::<2>(&mut parts) {
            Some([x, z]) => Command::Face(Vec3::new(x, 0.0, z)),
            None => Command::Usage("face <x> <z>"),
        },
        "e" | "interact" => Command::Interact,
        "bag" | "tab" => Command::Bag,
        "esc" | "escape" => Command::Escape,
        "shop" => Command::Shop,
        "buy" => match parts.next().and_then(|n| n.parse().ok()) {
            Some(n) => Command::Buy(n),
            None => Command::Usage("buy <n>"),
        },
        "missions" | "m" => Command::Missions,
        "money" | "$" => Command::Money,
        "snapshot" => Command::Snapshot,
        other => Command::Unsupported(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inventory_commands() {
        assert_eq!(
            parse_command("give scrap_bolt 3"),
            Command::Give {
                id: "scrap_bolt".into(),
                count: 3
            }
        );
        assert_eq!(
            parse_command("GIVE knife"),
            Command::Give {
                id: "knife".into(),
                count: 1
            }
        );
        assert_eq!(
            parse_command("drag 2 out"),
            Command::Drag {
                from: 2,
                to: DragTarget::Outside
            }
        );
        assert_eq!(
            parse_command("drag 0 9"),
            Command::Drag {
                from: 0,
                to: DragTarget::Slot(9)
            }
        );
        assert_eq!(parse_command("scroll down"), Command::Scroll(ScrollDir::Down));
        assert_eq!(parse_command("select 3"), Command::Select(3));
    }

    #[test]
    fn parses_movement_commands() {
        assert_eq!(parse_command("move 0 1"), Command::Move(Vec2::new(0.0, 1.0)));
        assert_eq!(parse_command("stop"), Command::Move(Vec2::ZERO));
        assert_eq!(parse_command("sprint on"), Command::Sprint(true));
        assert_eq!(
            parse_command("tp 1 0 -2.5"),
            Command::Teleport(Vec3::new(1.0, 0.0, -2.5))
        );
        assert_eq!(
            parse_command("face 4 -1"),
            Command::Face(Vec3::new(4.0, 0.0, -1.0))
        );
        assert_eq!(parse_command("look -3 2"), Command::Look(Vec2::new(-3.0, 2.0)));
    }

    #[test]
    fn bad_arguments_report_usage() {
        assert_eq!(parse_command("buy"), Command::Usage("buy <n>"));
        assert_eq!(parse_command("tp 1 2"), Command::Usage("tp <x> <y> <z>"));
        assert_eq!(parse_command("drag 1"), Command::Usage("drag <from> <to|out>"));
        assert_eq!(parse_command("sprint maybe"), Command::Usage("sprint <on|off>"));
        assert_eq!(parse_command("dance"), Command::Unsupported("dance".into()));
    }

    #[test]
    fn parses_panel_commands() {
        assert_eq!(parse_command("e"), Command::Interact);
        assert_eq!(parse_command("buy 0"), Command::Buy(0));
        assert_eq!(parse_command("esc"), Command::Escape);
        assert_eq!(parse_command("items tomato"), Command::Items(Some("tomato".into())));
        assert_eq!(parse_command("snapshot"), Command::Snapshot);
    }
}
