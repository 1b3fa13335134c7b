use serde::{Deserialize, Serialize};

use crate::combat::{connect_hitbox, DamageOutcome};
use crate::constants::*;
use crate::discretize::{discretize, DiscreteState};
use crate::init::{spawn_opponent, spawn_player};
use crate::physics::resolve_body_collision;
use crate::policy::{build_policy, CombatEvent, OpponentPolicy, Transition, ValueTable};
use crate::projectiles::take_projectile_hit;
use crate::reward::TickEvents;
use crate::tick::{tick_fighter, TickContext};
use crate::types::*;
use crate::view::{DebugBoxes, FighterView, MatchSnapshot};

/// Running totals for one side of a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    pub hits_landed: u32,
    pub hits_blocked: u32,
    pub shots_landed: u32,
    pub shots_blocked: u32,
    pub whiffs: u32,
}

impl SideStats {
    fn record_melee(&mut self, outcome: DamageOutcome) {
        match outcome {
            DamageOutcome::Hit => self.hits_landed += 1,
            DamageOutcome::Blocked => self.hits_blocked += 1,
        }
    }

    fn record_shot(&mut self, outcome: DamageOutcome) {
        match outcome {
            DamageOutcome::Hit => self.shots_landed += 1,
            DamageOutcome::Blocked => self.shots_blocked += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub ticks: Tick,
    pub player: SideStats,
    pub opponent: SideStats,
}

/// Result of one call to [`Match::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickSummary {
    pub tick: Tick,
    pub opponent_action: Action,
    /// Shaped reward the opponent received this tick.
    pub reward: f64,
    pub outcome: Outcome,
}

/// Player checked first, so a double knockout goes to the opponent.
pub fn decide_outcome(player: &Fighter, opponent: &Fighter) -> Outcome {
    if !player.is_alive() {
        Outcome::OpponentWon
    } else if !opponent.is_alive() {
        Outcome::PlayerWon
    } else {
        Outcome::Ongoing
    }
}

/// One player against one policy-driven opponent. The policy (and anything it
/// has learned) outlives [`Match::reset`].
pub struct Match {
    config: MatchConfig,
    player: Fighter,
    opponent: Fighter,
    policy: Box<dyn OpponentPolicy>,
    tick: Tick,
    outcome: Outcome,
    /// Opponent's view at the end of the previous tick.
    observed: Option<DiscreteState>,
    /// Live attack hitboxes from the last tick, `[player, opponent]`.
    hitboxes: [Option<Rect>; 2],
    stats: MatchStats,
    transcript: Vec<[PlayerInput; 2]>,
}

impl Match {
    pub fn new(config: MatchConfig) -> Self {
        let policy = build_policy(&config);
        Self::with_policy(config, policy)
    }

    pub fn with_policy(config: MatchConfig, policy: Box<dyn OpponentPolicy>) -> Self {
        Self {
            config,
            player: spawn_player(),
            opponent: spawn_opponent(),
            policy,
            tick: 0,
            outcome: Outcome::Ongoing,
            observed: None,
            hitboxes: [None; 2],
            stats: MatchStats::default(),
            transcript: Vec::new(),
        }
    }

    /// Advance the match by one tick.
    ///
    /// Sub-step order:
    ///  0. Early return if the match is decided
    ///  1. Opponent decides from its discrete view
    ///  2. Tick both fighters (opponent turned toward the player)
    ///  3. Body collision
    ///  4. Melee and projectile hits, player side first
    ///  5. Reward and learning update
    ///  6. Win check
    ///  7. Record inputs
    pub fn step(&mut self, input: PlayerInput) -> TickSummary {
        // 0. Decided matches are frozen
        if self.outcome.is_over() {
            return TickSummary {
                tick: self.tick,
                opponent_action: Action::Idle,
                reward: 0.0,
                outcome: self.outcome,
            };
        }
        self.tick += 1;

        // 1. Decide
        let state = discretize(&self.opponent, &self.player);
        let action = self
            .policy
            .select_action(&state, &self.opponent, &self.player);
        let opponent_input = action.to_input();

        // 2. Tick fighters
        let rules = self.config.rules;
        let player_report = tick_fighter(
            &mut self.player,
            &input,
            &TickContext {
                tick: self.tick,
                rules: &rules,
                face_toward: None,
            },
        );
        let opponent_report = tick_fighter(
            &mut self.opponent,
            &opponent_input,
            &TickContext {
                tick: self.tick,
                rules: &rules,
                face_toward: Some(self.player.center_x()),
            },
        );
        self.hitboxes = [player_report.hitbox, opponent_report.hitbox];

        // 3. Bodies
        resolve_body_collision(&mut self.player, &mut self.opponent, rules.body_collision);

        // 4. Hits
        let mut events = TickEvents {
            whiffed: opponent_report.whiffed,
            ..TickEvents::default()
        };
        self.stats.player.whiffs += player_report.whiffed as u32;
        self.stats.opponent.whiffs += opponent_report.whiffed as u32;
        let shot_unblockable = !rules.projectile_blockable;

        if let Some(hitbox) = player_report.hitbox {
            if let Some((kind, damage)) = connect_hitbox(&mut self.player, &hitbox, &self.opponent) {
                let outcome = self.opponent.take_damage(damage, false);
                events.received_melee = Some(outcome);
                self.stats.player.record_melee(outcome);
                self.policy.observe(&CombatEvent::StruckBy { kind, outcome });
            }
        }
        if take_projectile_hit(&mut self.player, &self.opponent) {
            let outcome = self.opponent.take_damage(PROJECTILE_DAMAGE, shot_unblockable);
            events.received_shot = Some(outcome);
            self.stats.player.record_shot(outcome);
            self.policy.observe(&CombatEvent::ShotBy { outcome });
        }
        if let Some(hitbox) = opponent_report.hitbox {
            if let Some((_, damage)) = connect_hitbox(&mut self.opponent, &hitbox, &self.player) {
                let outcome = self.player.take_damage(damage, false);
                events.dealt_melee = Some(outcome);
                self.stats.opponent.record_melee(outcome);
            }
        }
        if take_projectile_hit(&mut self.opponent, &self.player) {
            let outcome = self.player.take_damage(PROJECTILE_DAMAGE, shot_unblockable);
            events.dealt_shot = Some(outcome);
            self.stats.opponent.record_shot(outcome);
        }

        // 5. Learn. The first tick after construction or reset has no
        //    carried-over observation and skips the update.
        let reward = self.config.rewards.score(&events);
        let next_state = discretize(&self.opponent, &self.player);
        if let Some(prev) = self.observed.replace(next_state) {
            self.policy.record_outcome(&Transition {
                state: prev,
                action,
                reward,
                next_state,
            });
        }

        // 6. Win check, on the same tick the damage landed
        self.outcome = decide_outcome(&self.player, &self.opponent);
        self.stats.ticks = self.tick;
        if self.outcome.is_over() {
            log::info!(
                "match over at tick {}: {:?} (player {} hp, opponent {} hp)",
                self.tick,
                self.outcome,
                self.player.health,
                self.opponent.health
            );
        }

        // 7. Transcript
        self.transcript.push([input, opponent_input]);

        TickSummary {
            tick: self.tick,
            opponent_action: action,
            reward,
            outcome: self.outcome,
        }
    }

    /// Start a new round. Fighters and per-round state are rebuilt, the policy
    /// instance and its learned values are kept.
    pub fn reset(&mut self) {
        self.player = spawn_player();
        self.opponent = spawn_opponent();
        self.tick = 0;
        self.outcome = Outcome::Ongoing;
        self.observed = None;
        self.hitboxes = [None; 2];
        self.stats = MatchStats::default();
        self.transcript.clear();
        self.policy.on_reset();
        log::debug!("match reset, {} keeps its table", self.policy.name());
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            tick: self.tick,
            outcome: self.outcome,
            player: FighterView::from(&self.player),
            opponent: FighterView::from(&self.opponent),
        }
    }

    pub fn hitboxes(&self) -> DebugBoxes {
        let fighters = [&self.player, &self.opponent];
        DebugBoxes {
            bodies: fighters.iter().map(|f| f.rect()).collect(),
            attacks: self.hitboxes.iter().flatten().copied().collect(),
            projectiles: fighters
                .iter()
                .filter_map(|f| f.live_projectile().map(|p| p.rect()))
                .collect(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn opponent(&self) -> &Fighter {
        &self.opponent
    }

    pub fn policy(&self) -> &dyn OpponentPolicy {
        self.policy.as_ref()
    }

    pub fn value_table(&self) -> Option<&ValueTable> {
        self.policy.value_table()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    /// `[player, opponent]` inputs for every tick played this round.
    pub fn transcript(&self) -> &[[PlayerInput; 2]] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::hash::hash_transcript;
    use crate::init::{default_config, spawn_fighter};
    use crate::policy::QLearner;

    /// Always does the same thing.
    struct Fixed(Action);

    impl OpponentPolicy for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn difficulty(&self) -> Difficulty {
            Difficulty::Medium
        }
        fn select_action(&mut self, _: &DiscreteState, _: &Fighter, _: &Fighter) -> Action {
            self.0
        }
    }

    /// Idles and keeps every transition it is handed.
    struct Recorder(Arc<Mutex<Vec<Transition>>>);

    impl OpponentPolicy for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }
        fn difficulty(&self) -> Difficulty {
            Difficulty::Medium
        }
        fn select_action(&mut self, _: &DiscreteState, _: &Fighter, _: &Fighter) -> Action {
            Action::Idle
        }
        fn record_outcome(&mut self, transition: &Transition) {
            self.0.lock().unwrap().push(*transition);
        }
    }

    fn idle_match() -> Match {
        Match::with_policy(default_config(42), Box::new(Fixed(Action::Idle)))
    }

    #[test]
    fn step_advances_tick() {
        let mut m = idle_match();
        let summary = m.step(NULL_INPUT);
        assert_eq!(summary.tick, 1);
        assert_eq!(m.transcript().len(), 1);
        assert_eq!(summary.outcome, Outcome::Ongoing);
    }

    #[test]
    fn step_noop_when_match_over() {
        let mut m = idle_match();
        m.outcome = Outcome::PlayerWon;
        let summary = m.step(PlayerInput::new(button::RIGHT));
        assert_eq!(summary.tick, 0); // unchanged
        assert_eq!(m.player().x, PLAYER_SPAWN_X);
        assert!(m.transcript().is_empty());
    }

    #[test]
    fn finishing_hit_ends_match_on_same_tick() {
        let mut m = idle_match();
        m.player = spawn_fighter(Side::Player, 540.0, facing::RIGHT);
        m.opponent.health = LIGHT_DAMAGE;

        let mut input = PlayerInput::new(button::LIGHT);
        for _ in 0..ATTACK_DURATION_TICKS {
            let summary = m.step(input);
            input = NULL_INPUT;
            if m.opponent().health == 0 {
                assert_eq!(summary.outcome, Outcome::PlayerWon);
                assert_eq!(m.stats().player.hits_landed, 1);
                return;
            }
            assert_eq!(summary.outcome, Outcome::Ongoing);
        }
        panic!("light attack never connected");
    }

    #[test]
    fn double_knockout_goes_to_opponent() {
        let mut player = spawn_player();
        let mut opponent = spawn_opponent();
        player.health = 0;
        opponent.health = 0;
        assert_eq!(decide_outcome(&player, &opponent), Outcome::OpponentWon);
        player.health = 1;
        assert_eq!(decide_outcome(&player, &opponent), Outcome::PlayerWon);
    }

    #[test]
    fn first_update_after_reset_is_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut m = Match::with_policy(default_config(1), Box::new(Recorder(log.clone())));
        for _ in 0..3 {
            m.step(NULL_INPUT);
        }
        assert_eq!(log.lock().unwrap().len(), 2);

        m.reset();
        m.step(NULL_INPUT);
        assert_eq!(log.lock().unwrap().len(), 2);
        m.step(NULL_INPUT);
        let transitions = log.lock().unwrap();
        assert_eq!(transitions.len(), 3);
        assert_eq!(transitions[2].action, Action::Idle);
        assert!((transitions[2].reward - -0.1).abs() < 1e-12);
    }

    #[test]
    fn landed_hit_is_credited_to_the_attack() {
        let learner = QLearner::new(Difficulty::Hard, 3);
        let mut m = Match::with_policy(default_config(42), Box::new(learner));
        m.player = spawn_fighter(Side::Player, 540.0, facing::RIGHT);

        for _ in 0..300 {
            let prev = m.observed;
            let before = m.value_table().cloned().unwrap();
            let hits = m.stats().opponent.hits_landed;
            m.step(NULL_INPUT);
            if m.stats().opponent.hits_landed == hits {
                continue;
            }
            let Some(state) = prev else { continue };
            let after = m.value_table().unwrap();
            assert_eq!(after.value(&state, Action::Idle), before.value(&state, Action::Idle));
            let raised = [Action::LightAttack, Action::HeavyAttack]
                .iter()
                .any(|&a| after.value(&state, a) > before.value(&state, a));
            assert!(raised, "hit reward missed the attack in {}", state.label());
            return;
        }
        panic!("opponent never landed a hit");
    }

    #[test]
    fn reset_keeps_learned_values() {
        let mut m = Match::new(default_config(5));
        for t in 0..400u32 {
            let buttons = match t % 40 {
                0..=18 => button::RIGHT,
                19 => button::SHOOT,
                20 => button::LIGHT,
                21 => button::HEAVY,
                _ => button::SHIELD,
            };
            m.step(PlayerInput::new(buttons));
        }
        let learned = m.value_table().cloned().unwrap();
        assert_ne!(learned, crate::policy::tabular::seeded_table(Difficulty::Medium));
        assert_ne!(m.player().x, PLAYER_SPAWN_X);
        assert!(m.player().shot_spent);

        m.reset();
        assert_eq!(m.value_table(), Some(&learned));
        assert_eq!(m.tick(), 0);
        assert_eq!(m.outcome(), Outcome::Ongoing);
        for (fighter, spawn_x) in [
            (m.player(), PLAYER_SPAWN_X),
            (m.opponent(), OPPONENT_SPAWN_X),
        ] {
            assert_eq!(fighter.health, MAX_HEALTH);
            assert_eq!((fighter.x, fighter.y), (spawn_x, FLOOR_Y - FIGHTER_HEIGHT));
            assert_eq!(fighter.mode, Mode::Idle);
            assert_eq!(fighter.shield_gauge, SHIELD_MAX);
            assert_eq!(fighter.shield_cooldown, 0);
            assert_eq!(fighter.shot_cooldown, 0);
            assert_eq!(fighter.shoot_anim, 0);
            assert!(!fighter.shot_spent);
            assert!(fighter.projectile.is_none());
        }
        assert_eq!(*m.player(), spawn_player());
        assert_eq!(*m.opponent(), spawn_opponent());
        assert!(m.hitboxes().attacks.is_empty());
        assert!(m.observed.is_none());
        assert!(m.transcript().is_empty());
        assert_eq!(*m.stats(), MatchStats::default());
    }

    #[test]
    fn replay_determinism() {
        let script: Vec<PlayerInput> = (0..600u32)
            .map(|tick| {
                PlayerInput::new(if tick % 30 < 15 {
                    button::RIGHT
                } else if tick % 30 == 20 {
                    button::LIGHT | button::SHOOT
                } else {
                    button::LEFT | button::JUMP
                })
            })
            .collect();

        let run = || {
            let mut config = default_config(42);
            config.opponent.kind = PolicyKind::Scripted;
            config.opponent.difficulty = Difficulty::Hard;
            let mut m = Match::new(config);
            for input in &script {
                if m.step(*input).outcome.is_over() {
                    break;
                }
            }
            (hash_transcript(m.transcript()), m.snapshot())
        };

        let (h1, s1) = run();
        let (h2, s2) = run();
        assert_eq!(h1, h2);
        assert_eq!(s1, s2);
    }

    fn shot_into_shield(projectile_blockable: bool) -> Match {
        let mut config = default_config(0);
        config.rules.projectile_blockable = projectile_blockable;
        let mut m = Match::with_policy(config, Box::new(Fixed(Action::Shield)));
        m.step(PlayerInput::new(button::SHOOT));
        while m.player().projectile.is_some() {
            m.step(NULL_INPUT);
        }
        m
    }

    #[test]
    fn shield_blocks_blockable_shot() {
        let m = shot_into_shield(true);
        assert_eq!(m.opponent().health, MAX_HEALTH);
        assert!(m.opponent().shield_gauge < SHIELD_MAX);
        assert_eq!(m.stats().player.shots_blocked, 1);
    }

    #[test]
    fn unblockable_shot_ignores_shield() {
        let m = shot_into_shield(false);
        assert_eq!(m.opponent().health, MAX_HEALTH - PROJECTILE_DAMAGE);
        assert_eq!(m.stats().player.shots_landed, 1);
    }

    #[test]
    fn opponent_turns_to_face_player() {
        let mut m = Match::with_policy(default_config(0), Box::new(Fixed(Action::MoveRight)));
        m.step(NULL_INPUT);
        assert_eq!(m.opponent().facing, facing::LEFT);
        assert_eq!(m.opponent().x, OPPONENT_SPAWN_X + RUN_SPEED);
    }

    #[test]
    fn snapshot_and_hitboxes() {
        let mut m = idle_match();
        m.player = spawn_fighter(Side::Player, 540.0, facing::RIGHT);
        m.step(PlayerInput::new(button::HEAVY));
        m.step(NULL_INPUT);
        m.step(NULL_INPUT);
        let boxes = m.hitboxes();
        assert_eq!(boxes.bodies.len(), 2);
        assert_eq!(boxes.attacks.len(), 1);
        let snap = m.snapshot();
        assert_eq!(snap.tick, 3);
        assert_eq!(snap.player.pose, crate::view::Pose::HeavyAttack);
    }
}
