//! Menu and score widgets.
//!
//! The menu is a full-screen node with a title and a Start button; the score
//! widget is a line of text in the top-left corner. Both start hidden and are
//! shown or hidden only through `MuffinEffect`s, so the muffin's UI sync
//! stays the single owner of what is on screen.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::player::MuffinEffect;
use crate::session::{RunPhase, SessionState};
use crate::settings::Settings;

#[derive(Component)]
pub struct MenuRoot;

#[derive(Component)]
pub struct StartButton;

#[derive(Component)]
pub struct ScoreRoot;

/// Text element showing the current score.
#[derive(Component, Debug, Default)]
pub struct ScoreText {
    pub value: u32,
}

impl ScoreText {
    pub fn set(&mut self, value: u32) {
        self.value = value;
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("Score: {}", self.value)
    }
}

const BUTTON_IDLE: Color = Color::srgb(0.85, 0.45, 0.2);
const BUTTON_HOVER: Color = Color::srgb(0.95, 0.55, 0.25);

pub struct MuffinUiPlugin;

impl Plugin for MuffinUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_menu, spawn_score))
            .add_systems(Update, (start_button_system, start_key_system, apply_ui_effects));
    }
}

pub fn spawn_menu(mut commands: Commands) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(24.0),
                    ..default()
                },
                background_color: Color::srgba(0.05, 0.05, 0.1, 0.6).into(),
                visibility: Visibility::Hidden,
                ..default()
            },
            MenuRoot,
        ))
        .with_children(|p| {
            p.spawn(TextBundle::from_section(
                "Muffin Jump",
                TextStyle { font_size: 64.0, color: Color::WHITE, ..default() },
            ));
            p.spawn((
                ButtonBundle {
                    style: Style {
                        width: Val::Px(200.0),
                        height: Val::Px(64.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    background_color: BUTTON_IDLE.into(),
                    ..default()
                },
                StartButton,
            ))
            .with_children(|b| {
                b.spawn(TextBundle::from_section(
                    "Start",
                    TextStyle { font_size: 32.0, color: Color::WHITE, ..default() },
                ));
            });
        });
}

pub fn spawn_score(mut commands: Commands) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    left: Val::Px(16.0),
                    top: Val::Px(12.0),
                    ..default()
                },
                visibility: Visibility::Hidden,
                ..default()
            },
            ScoreRoot,
        ))
        .with_children(|p| {
            let score = ScoreText::default();
            p.spawn((
                TextBundle::from_section(
                    score.label(),
                    TextStyle { font_size: 28.0, color: Color::srgb(1.0, 1.0, 0.0), ..default() },
                ),
                score,
            ));
        });
}

/// Start-click callback for the menu button; also tints it on hover.
#[allow(clippy::type_complexity)]
pub fn start_button_system(
    mut session: ResMut<SessionState>,
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<StartButton>)>,
) {
    for (interaction, mut color) in &mut buttons {
        match interaction {
            Interaction::Pressed => {
                session.on_start_click();
                info!("run {} started", session.runs_started);
            }
            Interaction::Hovered => *color = BUTTON_HOVER.into(),
            Interaction::None => *color = BUTTON_IDLE.into(),
        }
    }
}

/// Keyboard shortcut for the Start button.
#[allow(clippy::needless_pass_by_value)]
pub fn start_key_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut session: ResMut<SessionState>,
) {
    if session.phase() == RunPhase::MenuShown && keys.just_pressed(settings.controls.key_for("start", KeyCode::Enter)) {
        session.on_start_click();
        info!("run {} started", session.runs_started);
    }
}

fn visibility(shown: bool) -> Visibility {
    if shown { Visibility::Visible } else { Visibility::Hidden }
}

/// Apply menu, score and cursor requests. Cursor requests are dropped when
/// there is no primary window.
#[allow(clippy::type_complexity)]
pub fn apply_ui_effects(
    mut events: EventReader<MuffinEffect>,
    mut menus: Query<&mut Visibility, (With<MenuRoot>, Without<ScoreRoot>)>,
    mut scores: Query<&mut Visibility, (With<ScoreRoot>, Without<MenuRoot>)>,
    mut score_text: Query<(&mut ScoreText, &mut Text)>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for effect in events.read() {
        match effect {
            MuffinEffect::ShowMenu(shown) => {
                for mut vis in &mut menus {
                    *vis = visibility(*shown);
                }
            }
            MuffinEffect::ShowScore(shown) => {
                for mut vis in &mut scores {
                    *vis = visibility(*shown);
                }
            }
            MuffinEffect::ShowCursor(shown) => {
                if let Ok(mut window) = windows.get_single_mut() {
                    window.cursor.visible = *shown;
                }
            }
            MuffinEffect::SetScore(n) => {
                for (mut score, mut text) in &mut score_text {
                    score.set(*n);
                    text.sections[0].value = score.label();
                }
            }
            MuffinEffect::ResetScore => {
                for (mut score, mut text) in &mut score_text {
                    score.reset();
                    text.sections[0].value = score.label();
                }
            }
            _ => {}
        }
    }
}
