//! Muffin run-state machine.
//!
//! Every hook here is a plain method on `Muffin`: it mutates the run state and
//! returns the side effects the rest of the game should carry out, in order.
//! Nothing in this file touches the ECS world, so the behaviour can be driven
//! directly from tests and benchmarks.

use bevy::prelude::*;

use crate::player::effects::MuffinEffect;
use crate::session::SessionState;
use crate::settings::GameplaySettings;
use crate::world::ColliderKind;

/// `last_input_sign` before any directional input has been seen.
pub const NO_INPUT_SIGN: i32 = 0;

/// Per-muffin run state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Muffin {
    /// Set once a hazard has been touched; cleared by the death sequence.
    pub is_mortal: bool,
    /// Latched on any frame with downward velocity, cleared by a jump.
    pub was_falling: bool,
    pub is_menu_hidden: bool,
    /// Whether movement and jump input is honoured.
    pub control_enabled: bool,
    pub score: u32,
    /// Accumulated yaw in degrees. Never reset.
    pub rotation_yaw: f32,
    pub last_input_sign: i32,
    pub is_first_input: bool,
}

impl Default for Muffin {
    fn default() -> Self {
        Self::new()
    }
}

impl Muffin {
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_mortal: false,
            was_falling: false,
            is_menu_hidden: true,
            control_enabled: false,
            score: 0,
            rotation_yaw: 0.0,
            last_input_sign: NO_INPUT_SIGN,
            is_first_input: true,
        }
    }

    /// Per-frame update. `velocity_y` is the current vertical velocity and
    /// `position` the muffin's world position.
    pub fn tick(
        &mut self,
        session: &SessionState,
        velocity_y: f32,
        position: Vec3,
        gameplay: &GameplaySettings,
    ) -> Vec<MuffinEffect> {
        let mut out = vec![
            MuffinEffect::SetFlameActive(velocity_y > 0.0),
            MuffinEffect::MoveFlame(position - Vec3::Y * gameplay.flame_offset),
        ];
        if velocity_y < 0.0 {
            self.was_falling = true;
        }
        self.sync_ui(session, &mut out);
        out
    }

    /// Reconcile this muffin's menu state with the shared intent.
    ///
    /// Pushes nothing when the two already agree.
    pub fn sync_ui(&mut self, session: &SessionState, out: &mut Vec<MuffinEffect>) {
        if session.show_menu && self.is_menu_hidden {
            self.enable_and_show(false, out);
            out.push(MuffinEffect::ShowMenu(true));
            self.is_menu_hidden = false;
            out.push(MuffinEffect::ShowCursor(true));
            out.push(MuffinEffect::ShowScore(false));
        } else if !session.show_menu && !self.is_menu_hidden {
            out.push(MuffinEffect::ShowMenu(false));
            self.enable_and_show(true, out);
            self.is_menu_hidden = true;
            out.push(MuffinEffect::ShowCursor(false));
            out.push(MuffinEffect::ShowScore(true));
        }
    }

    fn enable_and_show(&mut self, enabled: bool, out: &mut Vec<MuffinEffect>) {
        self.control_enabled = enabled;
        out.push(MuffinEffect::ShowMuffin(enabled));
    }

    /// Horizontal axis input. The axis is truncated toward zero, so only
    /// full deflections count as a direction.
    #[allow(clippy::cast_possible_truncation)]
    pub fn move_left_right(&mut self, scale: f32, gameplay: &GameplaySettings) -> Vec<MuffinEffect> {
        let mut out = Vec::new();
        if !self.control_enabled {
            return out;
        }
        let sign = scale as i32;
        if sign == 0 {
            return out;
        }
        self.rotate(sign, &mut out);
        out.push(MuffinEffect::AddMovementInput {
            direction: Vec3::new(gameplay.movement_multiplier, 0.0, 0.0),
            scale,
        });
        out
    }

    /// Turn to face `sign` if it differs from the last direction.
    ///
    /// The very first turn is 360 degrees when going positive and 180 when
    /// going negative; every later change is a 180 degree flip.
    #[allow(clippy::cast_precision_loss)]
    pub fn rotate(&mut self, sign: i32, out: &mut Vec<MuffinEffect>) {
        if self.last_input_sign == sign {
            return;
        }
        self.last_input_sign = sign;
        let mut degrees = 180;
        if self.is_first_input {
            degrees = if sign > 0 { 360 } else { 180 };
            self.is_first_input = false;
        }
        self.rotation_yaw += (degrees * sign) as f32;
        out.push(MuffinEffect::SetControlRotation { yaw: self.rotation_yaw });
    }

    pub fn jump(&mut self, gameplay: &GameplaySettings) -> Vec<MuffinEffect> {
        if !self.control_enabled {
            return Vec::new();
        }
        self.was_falling = false;
        vec![
            MuffinEffect::Launch(Vec3::new(0.0, gameplay.jump_multiplier, 0.0)),
            MuffinEffect::SetFlameActive(true),
        ]
    }

    /// Overlap-begin with another collider.
    pub fn on_overlap(&mut self, other: ColliderKind) -> Vec<MuffinEffect> {
        match other {
            ColliderKind::Hazard => {
                self.is_mortal = true;
                self.score += 1;
                vec![MuffinEffect::SetScore(self.score)]
            }
            ColliderKind::Spawner | ColliderKind::Neutral | ColliderKind::Ground => Vec::new(),
        }
    }

    /// Whether the death sequence would fire for this vertical velocity.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_ready_to_explode(&self, velocity_y: f32) -> bool {
        self.is_mortal && self.was_falling && velocity_y == 0.0
    }

    /// Death check invoked by lethal ground. Does nothing unless the muffin
    /// is mortal, has fallen since its last jump and has come to rest.
    pub fn explode(
        &mut self,
        session: &mut SessionState,
        velocity_y: f32,
        position: Vec3,
    ) -> Vec<MuffinEffect> {
        if !self.is_ready_to_explode(velocity_y) {
            return Vec::new();
        }
        session.record_score(self.score);
        session.request_menu();
        self.score = 0;
        self.is_mortal = false;
        vec![
            MuffinEffect::SpawnExplosion(position),
            MuffinEffect::ResetScore,
            MuffinEffect::ResetSpawners,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> (Muffin, SessionState, GameplaySettings) {
        let mut session = SessionState::default();
        session.on_start_click();
        let mut muffin = Muffin::new();
        let mut out = Vec::new();
        muffin.sync_ui(&SessionState::default(), &mut out);
        muffin.sync_ui(&session, &mut out);
        assert!(muffin.control_enabled);
        (muffin, session, GameplaySettings::default())
    }

    fn yaw_deltas(muffin: &mut Muffin, signs: &[f32], gameplay: &GameplaySettings) -> Vec<f32> {
        signs
            .iter()
            .map(|&s| {
                let before = muffin.rotation_yaw;
                muffin.move_left_right(s, gameplay);
                muffin.rotation_yaw - before
            })
            .collect()
    }

    #[test]
    fn new_muffin_defaults() {
        let m = Muffin::new();
        assert!(!m.is_mortal);
        assert!(!m.was_falling);
        assert!(m.is_first_input);
        assert!(m.is_menu_hidden);
        assert!(!m.control_enabled);
        assert_eq!(m.score, 0);
        assert_eq!(m.rotation_yaw, 0.0);
        assert_eq!(m.last_input_sign, NO_INPUT_SIGN);
    }

    #[test]
    fn first_sync_shows_menu_and_disables_control() {
        let mut m = Muffin::new();
        let mut out = Vec::new();
        m.sync_ui(&SessionState::default(), &mut out);
        assert_eq!(
            out,
            vec![
                MuffinEffect::ShowMuffin(false),
                MuffinEffect::ShowMenu(true),
                MuffinEffect::ShowCursor(true),
                MuffinEffect::ShowScore(false),
            ]
        );
        assert!(!m.is_menu_hidden);
        assert!(!m.control_enabled);
    }

    #[test]
    fn start_click_hides_menu_on_next_sync() {
        let mut m = Muffin::new();
        let mut session = SessionState::default();
        let mut out = Vec::new();
        m.sync_ui(&session, &mut out);

        session.on_start_click();
        out.clear();
        m.sync_ui(&session, &mut out);
        assert_eq!(
            out,
            vec![
                MuffinEffect::ShowMenu(false),
                MuffinEffect::ShowMuffin(true),
                MuffinEffect::ShowCursor(false),
                MuffinEffect::ShowScore(true),
            ]
        );
        assert!(m.is_menu_hidden);
        assert!(m.control_enabled);
    }

    #[test]
    fn ui_sync_is_idempotent() {
        for show_menu in [true, false] {
            let mut m = Muffin::new();
            let session = SessionState { show_menu, ..SessionState::default() };
            let mut out = Vec::new();
            m.sync_ui(&SessionState::default(), &mut out);
            m.sync_ui(&session, &mut out);

            let snapshot = m.clone();
            let mut second = Vec::new();
            m.sync_ui(&session, &mut second);
            assert!(second.is_empty());
            assert_eq!(m, snapshot);
        }
    }

    #[test]
    fn tick_orders_flame_then_ui() {
        let mut m = Muffin::new();
        let g = GameplaySettings::default();
        let out = m.tick(&SessionState::default(), 5.0, Vec3::new(1.0, 100.0, 0.0), &g);
        assert_eq!(out[0], MuffinEffect::SetFlameActive(true));
        assert_eq!(out[1], MuffinEffect::MoveFlame(Vec3::new(1.0, 80.0, 0.0)));
        assert_eq!(out[2], MuffinEffect::ShowMuffin(false));
        assert!(!m.was_falling);
    }

    #[test]
    fn tick_latches_falling_and_never_clears_it() {
        let mut m = Muffin::new();
        let g = GameplaySettings::default();
        let s = SessionState::default();
        let out = m.tick(&s, -1.0, Vec3::ZERO, &g);
        assert_eq!(out[0], MuffinEffect::SetFlameActive(false));
        assert!(m.was_falling);
        m.tick(&s, 0.0, Vec3::ZERO, &g);
        m.tick(&s, 3.0, Vec3::ZERO, &g);
        assert!(m.was_falling);
    }

    #[test]
    fn direction_flips_follow_sign_changes() {
        let (mut m, _, g) = playing();
        let deltas = yaw_deltas(&mut m, &[1.0, 1.0, -1.0, -1.0, 1.0], &g);
        assert_eq!(deltas, vec![360.0, 0.0, -180.0, 0.0, 180.0]);
        assert_eq!(m.rotation_yaw, 360.0);
    }

    #[test]
    fn first_negative_input_turns_half() {
        let (mut m, _, g) = playing();
        let deltas = yaw_deltas(&mut m, &[-1.0, 1.0, -1.0], &g);
        assert_eq!(deltas, vec![-180.0, 180.0, -180.0]);
        assert!(!m.is_first_input);
    }

    #[test]
    fn first_positive_input_turns_full() {
        let (mut m, _, g) = playing();
        let out = m.move_left_right(1.0, &g);
        assert_eq!(out[0], MuffinEffect::SetControlRotation { yaw: 360.0 });
        assert!(!m.is_first_input);
        let out = m.move_left_right(-1.0, &g);
        assert_eq!(out[0], MuffinEffect::SetControlRotation { yaw: 180.0 });
    }

    #[test]
    fn movement_input_uses_raw_scale_along_lateral_axis() {
        let (mut m, _, g) = playing();
        let out = m.move_left_right(-1.0, &g);
        assert_eq!(
            out.last(),
            Some(&MuffinEffect::AddMovementInput {
                direction: Vec3::new(g.movement_multiplier, 0.0, 0.0),
                scale: -1.0,
            })
        );
    }

    #[test]
    fn partial_axis_is_ignored() {
        let (mut m, _, g) = playing();
        assert!(m.move_left_right(0.0, &g).is_empty());
        assert!(m.move_left_right(0.6, &g).is_empty());
        assert!(m.move_left_right(-0.9, &g).is_empty());
        assert!(m.is_first_input);
    }

    #[test]
    fn control_gating_blocks_movement_and_jump() {
        let mut m = Muffin::new();
        let g = GameplaySettings::default();
        m.was_falling = true;
        assert!(m.move_left_right(1.0, &g).is_empty());
        assert!(m.jump(&g).is_empty());
        assert!(m.was_falling);
        assert!(m.is_first_input);
        assert_eq!(m.rotation_yaw, 0.0);
    }

    #[test]
    fn jump_launches_and_clears_falling() {
        let (mut m, _, g) = playing();
        m.was_falling = true;
        let out = m.jump(&g);
        assert_eq!(
            out,
            vec![
                MuffinEffect::Launch(Vec3::new(0.0, g.jump_multiplier, 0.0)),
                MuffinEffect::SetFlameActive(true),
            ]
        );
        assert!(!m.was_falling);
    }

    #[test]
    fn hazard_overlap_scores_and_marks_mortal() {
        let mut m = Muffin::new();
        assert_eq!(m.on_overlap(ColliderKind::Hazard), vec![MuffinEffect::SetScore(1)]);
        assert_eq!(m.on_overlap(ColliderKind::Hazard), vec![MuffinEffect::SetScore(2)]);
        assert!(m.is_mortal);
    }

    #[test]
    fn other_overlaps_change_nothing() {
        for kind in [ColliderKind::Spawner, ColliderKind::Neutral, ColliderKind::Ground] {
            let mut m = Muffin::new();
            assert!(m.on_overlap(kind).is_empty());
            assert!(!m.is_mortal);
            assert_eq!(m.score, 0);
        }
    }

    #[test]
    fn explode_requires_all_three_conditions() {
        let cases = [
            (false, true, 0.0),
            (true, false, 0.0),
            (true, true, -0.5),
            (true, true, 0.001),
        ];
        for (mortal, falling, vy) in cases {
            let (mut m, mut session, _) = playing();
            m.is_mortal = mortal;
            m.was_falling = falling;
            m.score = 3;
            let before = m.clone();
            assert!(m.explode(&mut session, vy, Vec3::ZERO).is_empty());
            assert_eq!(m, before);
            assert!(!session.show_menu);
        }
    }

    #[test]
    fn explode_resets_run() {
        let (mut m, mut session, _) = playing();
        m.on_overlap(ColliderKind::Hazard);
        m.on_overlap(ColliderKind::Hazard);
        m.was_falling = true;
        let pos = Vec3::new(3.0, 0.0, 0.0);

        let out = m.explode(&mut session, 0.0, pos);
        assert_eq!(
            out,
            vec![
                MuffinEffect::SpawnExplosion(pos),
                MuffinEffect::ResetScore,
                MuffinEffect::ResetSpawners,
            ]
        );
        assert!(session.show_menu);
        assert_eq!(session.best_score, 2);
        assert_eq!(m.score, 0);
        assert!(!m.is_mortal);
        assert!(m.was_falling);

        // menu comes back on the following sync
        let mut ui = Vec::new();
        m.sync_ui(&session, &mut ui);
        assert!(ui.contains(&MuffinEffect::ShowMenu(true)));
        assert!(!m.control_enabled);
    }

    #[test]
    fn rotation_survives_death() {
        let (mut m, mut session, g) = playing();
        m.move_left_right(-1.0, &g);
        m.on_overlap(ColliderKind::Hazard);
        m.was_falling = true;
        m.explode(&mut session, 0.0, Vec3::ZERO);
        assert_eq!(m.rotation_yaw, -180.0);
        assert!(!m.is_first_input);
    }
}
