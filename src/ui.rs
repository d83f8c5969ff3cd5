//! DOM-facing view models
//!
//! Text and visibility decisions for the HTML overlay, derived from
//! `GameState` without touching the DOM so they can be tested natively.
//! The wasm front end copies these into elements by id.

use crate::sim::{Dialogue, DialoguePhase, GamePhase, GameState, World, ZoneInfo};

/// Quest line per zone, shown under the zone name
pub const QUEST_TEXTS: [&str; 5] = [
    "Explore the village and talk to the Old Compiler...",
    "Climb the Skill Mountains and discover your abilities...",
    "Enter the Project Factory and view your creations...",
    "Cross the Experience Bridge carefully...",
    "Climb the Contact Tower to send a signal!",
];

/// One progress dot in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotState {
    Pending,
    Active,
    Completed,
}

impl DotState {
    /// CSS class added to the `.dot` element, if any
    pub fn class(&self) -> Option<&'static str> {
        match self {
            DotState::Pending => None,
            DotState::Active => Some("active"),
            DotState::Completed => Some("completed"),
        }
    }
}

/// Top bar: zone title, quest text and progress dots
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub zone_name: &'static str,
    pub zone_icon: &'static str,
    pub quest: &'static str,
    pub dots: Vec<DotState>,
}

impl HudView {
    pub fn for_zone(index: usize, zone_count: usize) -> Self {
        let info = World::zone_info(index);
        let dots = (0..zone_count)
            .map(|i| match i.cmp(&index) {
                std::cmp::Ordering::Less => DotState::Completed,
                std::cmp::Ordering::Equal => DotState::Active,
                std::cmp::Ordering::Greater => DotState::Pending,
            })
            .collect();
        Self {
            zone_name: info.name,
            zone_icon: info.icon,
            quest: QUEST_TEXTS.get(index).copied().unwrap_or(""),
            dots,
        }
    }
}

/// Key hint shown near the player, e.g. "E Talk"
pub fn prompt_label(state: &GameState) -> Option<&'static str> {
    if state.phase != GamePhase::Playing || state.is_transitioning() {
        return None;
    }
    state.interactions.prompt().map(|p| p.label())
}

/// Contents of the dialogue box
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueView {
    pub speaker: &'static str,
    pub portrait: &'static str,
    pub text: &'static str,
    /// Line fully revealed; show the continue marker
    pub waiting: bool,
}

impl From<&Dialogue> for DialogueView {
    fn from(d: &Dialogue) -> Self {
        Self {
            speaker: d.speaker,
            portrait: d.portrait,
            text: d.text(),
            waiting: d.phase() == DialoguePhase::LineComplete,
        }
    }
}

/// Loading bar fill (percent) and hint line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingView {
    pub percent: f32,
    pub hint: &'static str,
}

impl LoadingView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            percent: state.loading.progress.clamp(0.0, 100.0),
            hint: state.loading.hint(),
        }
    }
}

/// Full-screen overlays; at most one is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Start,
    Pause,
}

impl Screen {
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Loading => "loading-screen",
            Screen::Start => "start-screen",
            Screen::Pause => "pause-menu",
        }
    }

    pub const ALL: [Screen; 3] = [Screen::Loading, Screen::Start, Screen::Pause];
}

/// Overlay that should be visible for `phase`
pub fn visible_screen(phase: GamePhase) -> Option<Screen> {
    match phase {
        GamePhase::Loading => Some(Screen::Loading),
        GamePhase::Start => Some(Screen::Start),
        GamePhase::Paused => Some(Screen::Pause),
        GamePhase::Playing => None,
    }
}

/// Title card for the zone a transition is heading to
pub fn transition_card(state: &GameState) -> Option<ZoneInfo> {
    state
        .transition
        .as_ref()
        .map(|t| World::zone_info(t.target_zone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Command, TickInput, tick};
    use glam::Vec2;

    fn playing_state() -> GameState {
        let mut state = GameState::new(9);
        state.phase = GamePhase::Start;
        let input = TickInput {
            commands: vec![Command::Start],
            ..Default::default()
        };
        tick(&mut state, &input, crate::consts::SIM_DT);
        state
    }

    #[test]
    fn test_hud_dots_track_progress() {
        let hud = HudView::for_zone(2, 5);
        assert_eq!(hud.zone_name, "Project Factory");
        assert_eq!(hud.quest, QUEST_TEXTS[2]);
        assert_eq!(
            hud.dots,
            vec![
                DotState::Completed,
                DotState::Completed,
                DotState::Active,
                DotState::Pending,
                DotState::Pending,
            ]
        );
        assert_eq!(hud.dots[0].class(), Some("completed"));
        assert_eq!(hud.dots[4].class(), None);
    }

    #[test]
    fn test_hud_unknown_zone_falls_back() {
        let hud = HudView::for_zone(17, 5);
        assert_eq!(hud.zone_name, "Spawn Village");
        assert_eq!(hud.quest, "");
        assert!(hud.dots.iter().all(|d| *d == DotState::Completed));
    }

    #[test]
    fn test_screens_follow_phase() {
        assert_eq!(visible_screen(GamePhase::Loading), Some(Screen::Loading));
        assert_eq!(visible_screen(GamePhase::Paused).map(|s| s.element_id()), Some("pause-menu"));
        assert_eq!(visible_screen(GamePhase::Playing), None);
    }

    #[test]
    fn test_prompt_hidden_outside_play() {
        let mut state = playing_state();
        // Stand on the first portal of the village
        let portal = state.world.portals()[0].rect.center();
        state.player.pos = portal - Vec2::new(state.player.w / 2.0, state.player.h / 2.0);
        tick(&mut state, &TickInput::default(), crate::consts::SIM_DT);
        assert_eq!(prompt_label(&state), Some("Enter Portal"));

        state.phase = GamePhase::Paused;
        assert_eq!(prompt_label(&state), None);
    }

    #[test]
    fn test_loading_view() {
        let state = GameState::new(1);
        let view = LoadingView::from_state(&state);
        assert_eq!(view.percent, 0.0);
        assert_eq!(view.hint, "Generating world...");
    }

    #[test]
    fn test_transition_card_names_target() {
        let mut state = playing_state();
        assert!(transition_card(&state).is_none());
        assert!(state.transition_to_zone(3, Vec2::new(80.0, 400.0)));
        assert_eq!(transition_card(&state).map(|z| z.name), Some("Experience Bridge"));
    }
}
