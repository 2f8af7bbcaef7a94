#![cfg(target_arch = "wasm32")]

use espresso_core::*;
use wasm_bindgen_test::*;

#[derive(Default)]
struct Silent {
    dealt: usize,
}

impl Frontend for Silent {
    fn render_deck(&mut self, _deck: &Deck, _difficulty: Difficulty) {
        self.dealt += 1;
    }

    fn play_signal(&mut self, _signal: Signal) {}

    fn set_display(&mut self, _field: DisplayField, _text: &str) {}
}

#[wasm_bindgen_test]
fn wall_clock_is_after_epoch() {
    assert!(wall_clock_millis() > 1_600_000_000_000);
}

#[wasm_bindgen_test]
fn first_flip_starts_clock_in_browser() {
    let mut frontend = Silent::default();
    let mut game = Game::new(MemoryStore::new(), Settings::default());
    game.start("ada", 3, &mut frontend).unwrap();
    assert_eq!(frontend.dealt, 1);

    let now = wall_clock_millis();
    assert_eq!(game.request_flip(0, now, &mut frontend).unwrap(), FlipOutcome::Revealed);
    assert!(game.session().unwrap().is_started());
    assert_eq!(game.next_deadline(), Some(now + INPUT_LOCK_MS));
}
