use espresso_core as game;
use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use yew::prelude::*;

/// Key a value is persisted under in local storage.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + Default + Serialize + DeserializeOwned,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_else(|err| {
            log::debug!("Using defaults for {}: {:?}", T::KEY, err);
            T::default()
        })
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

impl StorageKey for game::Settings {
    const KEY: &'static str = "espresso:settings";
}

/// Leaderboard storage backed by the browser's `localStorage`, holding raw JSON strings.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct BrowserStore;

impl game::KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).unwrap_or_else(|err| {
            log::warn!("Could not read {}: {:?}", key, err);
            None
        })
    }

    fn set(&mut self, key: &str, value: &str) -> game::Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| game::GameError::StorageWrite(format!("{:?}", err)))
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use game::KeyValueStore;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const SCRATCH_KEY: &str = "espresso:scratch";

    #[wasm_bindgen_test]
    fn browser_store_reads_back_raw_text() {
        let mut store = BrowserStore;
        store.set(SCRATCH_KEY, "[]").unwrap();
        assert_eq!(store.get(SCRATCH_KEY).as_deref(), Some("[]"));

        LocalStorage::delete(SCRATCH_KEY);
        assert_eq!(store.get(SCRATCH_KEY), None);
    }

    #[wasm_bindgen_test]
    fn settings_survive_a_reload() {
        let settings = game::Settings {
            difficulty: game::Difficulty::Hard,
            ..Default::default()
        };
        settings.local_save();

        let loaded: game::Settings = LocalOrDefault::local_or_default();
        assert_eq!(loaded.difficulty, game::Difficulty::Hard);
        LocalStorage::delete(<game::Settings as StorageKey>::KEY);
    }
}
