use espresso_core as game;
use game::{Signal, Volume};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

pub(crate) fn signal_asset(signal: Signal) -> String {
    format!("Assets/sound/{}.mp3", signal.name())
}

/// One audio clip per signal, played fire-and-forget.
#[derive(Debug)]
pub(crate) struct SignalPlayer {
    clips: Vec<(Signal, HtmlAudioElement)>,
    volume: Volume,
}

impl SignalPlayer {
    pub(crate) fn new(volume: Volume) -> Self {
        let clips = Signal::ALL
            .into_iter()
            .filter_map(|signal| match HtmlAudioElement::new_with_src(&signal_asset(signal)) {
                Ok(clip) => Some((signal, clip)),
                Err(err) => {
                    log::error!("Could not load {} sound: {:?}", signal.name(), err);
                    None
                }
            })
            .collect();
        let player = Self { clips, volume };
        player.apply_volume();
        player
    }

    pub(crate) fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.apply_volume();
    }

    /// Restarts the clip from the beginning unless it is still playing.
    pub(crate) fn play(&self, signal: Signal) {
        let Some(clip) = self.clip(signal) else {
            return;
        };
        if !(clip.paused() || clip.ended()) {
            log::trace!("{} sound still playing", signal.name());
            return;
        }

        clip.set_volume(self.volume.level().into());
        if let Err(err) = clip.pause() {
            log::warn!("Could not rewind {} sound: {:?}", signal.name(), err);
        }
        clip.set_current_time(0.0);

        match clip.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    log::error!("Error playing sound: {:?}", err);
                }
            }),
            Err(err) => log::error!("Error playing sound: {:?}", err),
        }
    }

    pub(crate) fn stop(&self, signal: Signal) {
        if let Some(clip) = self.clip(signal) {
            if let Err(err) = clip.pause() {
                log::warn!("Could not stop {} sound: {:?}", signal.name(), err);
            }
        }
    }

    fn clip(&self, signal: Signal) -> Option<&HtmlAudioElement> {
        self.clips
            .iter()
            .find(|(clip_signal, _)| *clip_signal == signal)
            .map(|(_, clip)| clip)
    }

    fn apply_volume(&self) {
        for (_, clip) in &self.clips {
            clip.set_volume(self.volume.level().into());
        }
    }
}
