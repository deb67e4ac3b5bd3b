use bevy::prelude::*;

/// 给玩家看的反馈行，打印成 `> msg`
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

impl LogEvent {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
