mod page_name;

#[cfg(target_arch = "wasm32")]
mod main_wasm;

#[cfg(target_arch = "wasm32")]
fn main() -> Result<(), wasm_bindgen::prelude::JsValue> {
    main_wasm::main_wasm()
}

/// Runs the page named by the first argument, the puzzle by default.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), strum::ParseError> {
    use core::str::FromStr;

    let page = match std::env::args().nth(1) {
        Some(name) => page_name::PageName::from_str(&name)?,
        None => page_name::PageName::default(),
    };
    page.run();
    Ok(())
}
