use crate::audio::SignalPlayer;
use crate::leaderboard::LeaderboardView;
use crate::utils::*;
use clap::Args;
use espresso_core as game;
use game::{DisplayField, Frontend};
use gloo::timers::callback::Timeout;
use std::collections::HashMap;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

fn now() -> game::Millis {
    game::wall_clock_millis()
}

fn card_image_url(difficulty: game::Difficulty, identity: game::Identity) -> String {
    format!("{}/{}", difficulty.image_folder(), identity.file_name())
}

/// Browser side of the game: card faces, display texts and sound playback.
#[derive(Debug)]
pub(crate) struct WebFrontend {
    faces: Vec<String>,
    displays: HashMap<DisplayField, String>,
    audio: SignalPlayer,
}

impl WebFrontend {
    fn new(volume: game::Volume) -> Self {
        let mut displays = HashMap::new();
        displays.insert(
            DisplayField::InstructionBanner,
            game::INSTRUCTION_BANNER_TEXT.to_string(),
        );
        Self {
            faces: Vec::new(),
            displays,
            audio: SignalPlayer::new(volume),
        }
    }

    fn display(&self, field: DisplayField) -> &str {
        self.displays.get(&field).map_or("", String::as_str)
    }

    fn set_volume(&mut self, volume: game::Volume) {
        self.audio.set_volume(volume);
    }
}

impl Frontend for WebFrontend {
    fn render_deck(&mut self, deck: &game::Deck, difficulty: game::Difficulty) {
        self.faces = deck
            .faces()
            .iter()
            .map(|&identity| card_image_url(difficulty, identity))
            .collect();
        log::debug!("Rendered {} cards", self.faces.len());
    }

    fn play_signal(&mut self, signal: game::Signal) {
        self.audio.play(signal);
    }

    fn stop_signal(&mut self, signal: game::Signal) {
        self.audio.stop(signal);
    }

    fn set_display(&mut self, field: DisplayField, text: &str) {
        self.displays.insert(field, text.to_string());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    NameInput(String),
    Start,
    Flip(game::CardIndex),
    Tick,
    Restart,
    SelectDifficulty(game::Difficulty),
    SetVolume(game::Volume),
    ShowLeaderboard,
    HideLeaderboard,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    index: game::CardIndex,
    image: AttrValue,
    state: game::CardState,
    callback: Callback<game::CardIndex>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    use game::CardState::Matched;

    let CardProps {
        index,
        image,
        state,
        callback,
    } = props.clone();

    let class = classes!(
        "card",
        state.is_face_up().then_some("flipped"),
        (state == Matched).then_some("matched")
    );

    let onclick = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            log::trace!("card {} clicked", index);
            callback.emit(index);
        })
    };

    let ontouchstart = Callback::from(move |e: TouchEvent| {
        e.prevent_default();
        log::trace!("card {} touched", index);
        callback.emit(index);
    });

    html! {
        <div {class} {onclick} {ontouchstart}>
            <div class="card-inner">
                <div class="card-front"/>
                <div class="card-back">
                    <img src={image} alt="Espresso Image"/>
                </div>
            </div>
        </div>
    }
}

#[derive(Args, Properties, Debug, Default, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    seed: Option<u64>,
}

#[cfg(test)]
impl GameProps {
    pub(crate) fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

#[derive(Debug)]
pub(crate) struct GameView {
    game: game::Game<BrowserStore>,
    frontend: WebFrontend,
    player_name: String,
    standings: Option<Vec<(game::Difficulty, Vec<game::ScoreEntry>)>>,
    seed: Option<u64>,
    _deadline: Option<Timeout>,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.seed.unwrap_or_else(js_random_seed)
    }

    /// Wakes the component when the next scheduled task is due.
    fn arm_deadline(&mut self, ctx: &Context<Self>) {
        self._deadline = self.game.next_deadline().map(|deadline| {
            let delay = deadline.saturating_sub(now());
            let delay = u32::try_from(delay).unwrap_or(u32::MAX);
            let link = ctx.link().clone();
            Timeout::new(delay, move || link.send_message(Msg::Tick))
        });
    }

    /// Runs scheduled work that is due, timer callbacks can fire late.
    fn run_due(&mut self, now: game::Millis) -> bool {
        let due = self.game.next_deadline().is_some_and(|deadline| deadline <= now);
        if let Some(entry) = self.game.advance(now, &mut self.frontend) {
            log::info!("{} scored {} on {}", entry.name, entry.score, entry.difficulty);
            self.standings = Some(self.game.leaderboard_view());
        }
        due
    }

    fn card_state(&self, index: game::CardIndex) -> game::CardState {
        self.game
            .session()
            .map_or(game::CardState::FaceDown, |session| session.card_at(index))
    }

    fn save_settings(&self) {
        self.game.settings().local_save();
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings: game::Settings = LocalOrDefault::local_or_default();
        Self {
            frontend: WebFrontend::new(settings.volume),
            game: game::Game::new(BrowserStore, settings),
            player_name: String::new(),
            standings: None,
            seed: ctx.props().seed,
            _deadline: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            NameInput(name) => {
                self.player_name = name;
                false
            }
            Start => {
                let seed = self.next_seed();
                match self.game.start(&self.player_name, seed, &mut self.frontend) {
                    Ok(()) => self.standings = None,
                    Err(err) => {
                        log::info!("Not starting: {}", err);
                        gloo::dialogs::alert(&err.to_string());
                    }
                }
                true
            }
            Flip(index) => {
                let now = now();
                let caught_up = self.run_due(now);
                match self.game.request_flip(index, now, &mut self.frontend) {
                    Ok(outcome) => caught_up || outcome.has_update(),
                    Err(err) => {
                        log::debug!("Ignoring flip on {}: {}", index, err);
                        caught_up
                    }
                }
            }
            Tick => {
                self.run_due(now());
                true
            }
            Restart => {
                let seed = self.next_seed();
                self.player_name.clear();
                self.standings = None;
                self.game.restart(seed, &mut self.frontend);
                true
            }
            SelectDifficulty(difficulty) => {
                let seed = self.next_seed();
                self.player_name.clear();
                self.standings = None;
                self.game.set_difficulty(difficulty, seed, &mut self.frontend);
                self.save_settings();
                true
            }
            SetVolume(volume) => {
                self.game.set_volume(volume);
                self.frontend.set_volume(volume);
                self.save_settings();
                false
            }
            ShowLeaderboard => {
                self.standings = Some(self.game.leaderboard_view());
                true
            }
            HideLeaderboard => self.standings.take().is_some(),
        };

        self.arm_deadline(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let settings = self.game.settings();
        let link = ctx.link();

        let cb_name = link.callback(|e: InputEvent| {
            NameInput(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let cb_start = link.callback(|_: MouseEvent| Start);
        let cb_restart = link.callback(|_: MouseEvent| Restart);
        let cb_level = link.callback(|e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            SelectDifficulty(game::Difficulty::from_name_or_default(&value))
        });
        let cb_volume = link.callback(|e: InputEvent| {
            let level = e.target_unchecked_into::<HtmlInputElement>().value_as_number();
            SetVolume(game::Volume::new(level as f32))
        });
        let cb_show_leaderboard = link.callback(|_: MouseEvent| ShowLeaderboard);
        let cb_hide_leaderboard = link.callback(|_: ()| HideLeaderboard);
        let cb_flip = link.callback(Flip);

        let banner = |field: DisplayField, id: &'static str| {
            let text = self.frontend.display(field);
            html! {
                <div {id} class={classes!("banner", (!text.is_empty()).then_some("visible"))}>
                    {text}
                </div>
            }
        };

        html! {
            <div class="espresso">
                <nav>
                    <input
                        id="playerName"
                        type="text"
                        placeholder="Nickname"
                        value={self.player_name.clone()}
                        oninput={cb_name}
                    />
                    <button id="instructionBtn" onclick={cb_start}>{"Start"}</button>
                    <select id="level" onchange={cb_level}>
                        {
                            for game::Difficulty::ALL.into_iter().map(|difficulty| html! {
                                <option
                                    value={difficulty.name()}
                                    selected={difficulty == settings.difficulty}
                                >
                                    {difficulty.name()}
                                </option>
                            })
                        }
                    </select>
                    <button id="restartBtn" onclick={cb_restart}>{"Restart"}</button>
                    <button id="leaderboardBtn" onclick={cb_show_leaderboard}>{"Leaderboard"}</button>
                    <input
                        id="volume"
                        type="range"
                        min="0"
                        max="1"
                        step="0.1"
                        value={settings.volume.level().to_string()}
                        oninput={cb_volume}
                    />
                </nav>
                <aside>
                    <span id="time">{self.frontend.display(DisplayField::Time)}</span>
                    <span id="flips">{self.frontend.display(DisplayField::Flips)}</span>
                    <span id="matches">{self.frontend.display(DisplayField::Matches)}</span>
                </aside>
                { banner(DisplayField::InstructionBanner, "instructionText") }
                { banner(DisplayField::WinBanner, "winText") }
                { banner(DisplayField::Score, "scoreText") }
                <div id="gameBoard">
                    {
                        for self.frontend.faces.iter().enumerate().map(|(i, image)| {
                            let index = i as game::CardIndex;
                            html! {
                                <CardView
                                    {index}
                                    image={AttrValue::from(image.clone())}
                                    state={self.card_state(index)}
                                    callback={cb_flip.clone()}
                                />
                            }
                        })
                    }
                </div>
                if let Some(standings) = self.standings.clone() {
                    <LeaderboardView
                        {standings}
                        onclose={cb_hide_leaderboard}
                    />
                }
            </div>
        }
    }
}
