//! Robot-arm control panel core
//!
//! A resilient WebSocket link to the robot backend (fixed-delay reconnect,
//! cancellable, one retry timer at a time) that records every frame, and a
//! pose interpolator that eases the drawn arm toward the latest reported
//! joint angles.
//!
//! - `core`: platform-agnostic link state machine, feed decoder, poses
//! - `websocket_native` (feature `cli`): tokio transport used by `arm-cli`
//! - `app` + `websocket_wasm` (feature `wasm`): the egui browser dashboard

pub mod config;
pub mod core;
pub mod time;
pub mod ws_state;

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod websocket_native;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod websocket_wasm;

#[cfg(feature = "wasm")]
pub mod app;
#[cfg(feature = "wasm")]
pub mod theme;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web_entry {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::ArmApp;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let Some(canvas) = find_canvas() else {
                tracing::error!("No <canvas id=\"canvas\"> element on the page");
                return;
            };

            let started = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(ArmApp::new(cc)))),
                )
                .await;
            if let Err(e) = started {
                tracing::error!(?e, "Failed to start eframe");
            }
        });
    }

    fn find_canvas() -> Option<web_sys::HtmlCanvasElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id("canvas")?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .ok()
    }
}
