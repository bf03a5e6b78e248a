#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

use core::str::FromStr;

use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::page_name::PageName;

#[wasm_bindgen(module = "/communication.js")]
extern "C" {
    // Bevy has to start from `main`, which takes no parameters, so the page
    // name comes from the host page instead.
    #[allow(unsafe_code, reason = "unsafe code is needed for wasm")]
    fn get_page_name() -> String;
}

pub(crate) fn main_wasm() -> Result<(), JsValue> {
    let page_name = get_page_name();
    let Ok(page) = PageName::from_str(&page_name) else {
        return Err(JsValue::from_str(&format!("Invalid page name: {page_name}")));
    };

    console::log_1(&format!("Starting {page}").into());
    page.run();
    Ok(())
}
