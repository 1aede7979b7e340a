use std::{path::PathBuf, time::Duration};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::{sync::mpsc::Sender, time::interval};

use crate::data::textures::{TextureSet, load_textures};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TexturesLoaded(TextureSet),
    TickFrame,
    Input(Event),
    ApplyCondition(String),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

/// Emits one `TickFrame` per display frame until the receiver goes away.
pub fn start_frame_task(tx: Sender<AppEvent>, fps: u8) {
    let fps = fps.max(15);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
}

pub fn spawn_texture_load(tx: Sender<AppEvent>, dir: PathBuf) {
    tokio::spawn(async move {
        let textures = load_textures(&dir).await;
        let _ = tx.send(AppEvent::TexturesLoaded(textures)).await;
    });
}
