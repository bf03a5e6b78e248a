mod page;
pub use page::*;

pub mod cleanup;
pub mod input;

mod host_communication;
pub use host_communication::*;

#[cfg(not(target_arch = "wasm32"))]
mod host_simulation;
#[cfg(not(target_arch = "wasm32"))]
pub use host_simulation::*;

mod window_resizing;
