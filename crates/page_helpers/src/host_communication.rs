use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

/// Messages the host page sends to a running page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    /// Throw the current session away and start a new one.
    Restart,
    /// The host is about to hide or unmount the page.
    Teardown,
}

/// Messages a page sends back to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    Ready,
    /// The user finished the page and asked to move on.
    Complete,
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Could not serialize {0:?}")]
    Serialize(PageMessage),

    #[error("No global `window` exists")]
    NoWindow,

    #[error("{0:?} not sent, parent window not found")]
    NoParentWindow(PageMessage),

    #[error("Could not post {message:?}: {reason}")]
    PostMessage {
        message: PageMessage,
        reason: String,
    },

    #[error("Could not listen to host messages: {0}")]
    Listen(String),
}

pub static HOST_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<HostMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(not(target_arch = "wasm32"))]
pub static PAGE_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<PageMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(target_arch = "wasm32")]
pub fn listen_host_messages() -> Result<(), HostError> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        let message: Result<HostMessage, serde_wasm_bindgen::Error> =
            serde_wasm_bindgen::from_value(event.data());

        let Ok(message) = message else {
            // Other scripts on the host page talk over the same channel.
            debug!("Ignoring unknown message {:?}", &event.data());
            return;
        };

        HOST_MESSAGE_QUEUE.lock().push(message);
    }) as Box<dyn FnMut(MessageEvent)>);

    window
        .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        .map_err(|err| HostError::Listen(format!("{err:?}")))?;

    // The listener lives as long as the page
    closure.forget();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn send_page_message(message: PageMessage) -> Result<(), HostError> {
    PAGE_MESSAGE_QUEUE.lock().push(message);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn send_page_message(message: PageMessage) -> Result<(), HostError> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let value =
        serde_wasm_bindgen::to_value(&message).map_err(|_err| HostError::Serialize(message))?;

    let Ok(Some(parent_window)) = window.parent() else {
        return Err(HostError::NoParentWindow(message));
    };

    parent_window
        .post_message(&value, "*")
        .map_err(|err| HostError::PostMessage {
            message,
            reason: format!("{err:?}"),
        })
}

/// Reactions of a page to the host's control messages.
///
/// Implementations are called from the frame loop with exclusive world access,
/// never directly by the page itself.
pub trait HostMessageHandler: Send + Sync + Default + 'static {
    fn restart(world: &mut World);
    fn teardown(world: &mut World);
}

fn process_host_messages<T: HostMessageHandler>(world: &mut World) {
    let messages = HOST_MESSAGE_QUEUE.lock().drain(..).collect::<Vec<_>>();

    for message in messages {
        info!("Host message: {message:?}");
        match message {
            HostMessage::Restart => T::restart(world),
            HostMessage::Teardown => T::teardown(world),
        }
    }
}

fn announce_ready() {
    if let Err(err) = send_page_message(PageMessage::Ready) {
        error!("{err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn start_listening() {
    if let Err(err) = listen_host_messages() {
        error!("{err}");
    }
}

#[derive(Default)]
pub struct HostCommunicationPlugin<T: HostMessageHandler>(core::marker::PhantomData<T>);

impl<T: HostMessageHandler> Plugin for HostCommunicationPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, process_host_messages::<T>);
        #[cfg(target_arch = "wasm32")]
        {
            app.add_systems(Startup, start_listening);
        }
        app.add_systems(PostStartup, announce_ready);
    }
}
