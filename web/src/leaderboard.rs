use crate::utils::Modal;
use chrono::prelude::*;
use espresso_core as game;
use yew::prelude::*;

/// Submission time as UTC "HH:MM".
pub(crate) fn entry_time_label(timestamp: game::Millis) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || "--:--".to_string(),
            |time| format!("{:02}:{:02}", time.hour(), time.minute()),
        )
}

#[derive(Properties, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub standings: Vec<(game::Difficulty, Vec<game::ScoreEntry>)>,
    pub onclose: Callback<()>,
}

#[function_component]
pub(crate) fn LeaderboardView(props: &LeaderboardProps) -> Html {
    let onclose = {
        let onclose = props.onclose.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            onclose.emit(());
        })
    };

    html! {
        <Modal>
            <dialog id="leaderboard" class="visible" open=true>
                <article>
                    <h2>{"Leaderboard"}</h2>
                    {
                        for props.standings.iter().map(|(difficulty, entries)| html! {
                            <section>
                                <h3>{difficulty.name()}</h3>
                                <table>
                                    <thead>
                                        <tr>
                                            <th>{"#"}</th>
                                            <th>{"Name"}</th>
                                            <th>{"Score"}</th>
                                            <th>{"Time"}</th>
                                        </tr>
                                    </thead>
                                    <tbody id={format!("leaderboardBody-{}", difficulty.name())}>
                                        {
                                            for entries.iter().enumerate().map(|(i, entry)| html! {
                                                <tr class={(i == 0).then_some("leader-row")}>
                                                    <td>{i + 1}</td>
                                                    <td>{entry.name.clone()}</td>
                                                    <td>{entry.score}</td>
                                                    <td>{entry_time_label(entry.timestamp)}</td>
                                                </tr>
                                            })
                                        }
                                    </tbody>
                                </table>
                            </section>
                        })
                    }
                    <footer>
                        <button id="closeLeaderboardBtn" onclick={onclose}>{"Close"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}
