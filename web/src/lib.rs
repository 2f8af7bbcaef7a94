use clap::Parser;
use wasm_bindgen::prelude::*;

mod app;
mod audio;
mod leaderboard;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: app::GameProps,
}

impl Args {
    /// Options come from the location hash, e.g. `#-vv&--seed=42`.
    fn from_location_hash(hash: &str) -> Self {
        Self::try_parse_from(hash.split(['#', '&'])).unwrap_or_else(|err| {
            gloo::console::warn!(format!("Ignoring location hash: {}", err));
            Self::parse_from([""])
        })
    }
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();

    let args = Args::from_location_hash(&location_hash);
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
    }
    log::debug!("seed: {:?}", args.game);

    let root = document()
        .get_element_by_id("game")
        .ok_or_else(|| JsValue::from_str("Could not find id=\"game\" element"))?;

    log::debug!("App started");
    yew::Renderer::<app::GameView>::with_root_and_props(root, args.game).render();
    Ok(())
}
