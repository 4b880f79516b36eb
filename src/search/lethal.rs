//! Lethal-turn search
//!
//! Given the cards at hand, the mana available and the board synergy, find
//! the casting order that deals the most damage this turn. Orderings matter:
//! each one is executed greedily against its own `ShadowState`, and an early
//! cast can unlock a later one (spectacle after any damage, a pumped
//! attacker, a flashback that needs its card in the graveyard first).
//!
//! The enumeration is a depth-first walk over distinct orderings of the
//! candidate multiset with branch-and-bound pruning.

use super::shadow::ShadowState;
use crate::core::{CardName, ManaPool};
use crate::game::ZoneActions;
use crate::rules::{
    catalog, damage_and_cost, fits_resources, resolve, BoardSynergy, CardRule, CastMode, Haste,
    Trigger,
};
use crate::zones::Zone;
use crate::Result;
use smallvec::SmallVec;
use std::fmt;

/// Most candidates the search will permute
pub const MAX_CANDIDATES: usize = 8;

/// A card the search may try to cast, and the zone it is cast from
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub rule: &'static CardRule,
    pub from: Zone,
}

impl Candidate {
    pub fn from_hand(rule: &'static CardRule) -> Self {
        Candidate {
            rule,
            from: Zone::Hand,
        }
    }

    pub fn from_graveyard(rule: &'static CardRule) -> Self {
        Candidate {
            rule,
            from: Zone::Graveyard,
        }
    }

    /// Two candidates are interchangeable in an ordering
    fn same_as(&self, other: &Candidate) -> bool {
        self.rule.name == other.rule.name && self.from == other.from
    }
}

/// One step of a lethal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// Sacrifice a permanent holding stored damage
    SacrificeStored(&'static CardRule),
    Cast {
        card: &'static CardRule,
        mode: CastMode,
    },
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::SacrificeStored(card) => write!(f, "sacrifice {}", card.name),
            PlannedAction::Cast {
                card,
                mode: CastMode::Normal,
            } => write!(f, "{}", card.name),
            PlannedAction::Cast { card, mode } => write!(f, "{} ({mode})", card.name),
        }
    }
}

/// The damage-maximizing line for this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LethalPlan {
    pub actions: Vec<PlannedAction>,
    /// Damage the actions account for, not counting the forecast
    pub damage: i32,
}

impl fmt::Display for LethalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{action}")?;
        }
        write!(f, "] for {} damage", self.damage)
    }
}

/// One search branch: what was played and the shadow it was played against
#[derive(Debug, Clone)]
pub struct TurnSimulation {
    pub played: Vec<PlannedAction>,
    pub shadow: ShadowState,
}

impl TurnSimulation {
    /// Start a branch; permanents holding stored damage are sacrificed first
    pub fn new(synergy: &BoardSynergy, available: &ManaPool) -> Self {
        let mut shadow = ShadowState::new(synergy, available);
        let mut played = Vec::new();
        for &stored in &synergy.stored_damage {
            if shadow.sacrifice(stored).is_ok() {
                shadow.damage_opponent(stored.damage.max() as i32, stored.name);
                played.push(PlannedAction::SacrificeStored(stored));
            }
        }
        TurnSimulation { played, shadow }
    }

    pub fn damage(&self) -> i32 {
        self.shadow.damage
    }

    /// Cast a candidate if it is castable right now; returns whether it was
    pub fn try_cast(&mut self, candidate: &Candidate) -> bool {
        let Some(play) = damage_and_cost(
            candidate.rule,
            candidate.from,
            &self.shadow.synergy,
            &self.shadow.pool,
            true,
        ) else {
            return false;
        };

        let before = self.shadow.clone();
        match resolve(&mut self.shadow, candidate.rule, play.option, true) {
            Ok(_) => {
                self.played.push(PlannedAction::Cast {
                    card: candidate.rule,
                    mode: play.option.mode,
                });
                true
            }
            Err(_) => {
                self.shadow = before;
                false
            }
        }
    }

    /// Recast flashback cards from the graveyard while Mountains remain, then
    /// settle the threshold attackers against the graveyard that is left
    pub fn cleanup(&mut self) {
        loop {
            let fuel = self
                .shadow
                .synergy
                .flashback_fuel
                .iter()
                .find(|(_, n)| *n > 0)
                .map(|(rule, _)| *rule);
            let Some(rule) = fuel else {
                break;
            };
            if !self.try_cast(&Candidate::from_graveyard(rule)) {
                break;
            }
        }
        self.shadow.settle_combat();
    }

    pub fn into_plan(mut self) -> LethalPlan {
        self.shadow.settle_combat();
        LethalPlan {
            damage: self.shadow.damage,
            actions: self.played,
        }
    }
}

/// Bonus any single spell could pick up from the board, now or later this turn
fn bonus_bound(synergy: &BoardSynergy, candidates: &[Candidate]) -> i32 {
    let mut bound = (synergy.noncreature_pings + synergy.spell_pings) as i32;
    if synergy.combat_pending {
        bound += (synergy.noncreature_pumps + synergy.spell_pumps) as i32;
    }
    for candidate in candidates {
        match candidate.rule.trigger {
            Trigger::Ping { damage, .. } => bound += damage as i32,
            Trigger::Pump { amount, .. } if synergy.combat_pending => bound += amount as i32,
            _ => {}
        }
    }
    bound
}

/// Most damage one candidate can add to a branch
fn upper_bound(rule: &CardRule, bonus: i32, combat_pending: bool) -> i32 {
    let mut bound = rule.damage.max() as i32;
    if rule.kind.is_creature() {
        if combat_pending && rule.haste != Haste::No {
            bound += rule.max_attack_power() as i32;
        }
    } else {
        bound += bonus;
    }
    bound
}

/// Most damage the cleanup pass can add to any branch
fn cleanup_bound(synergy: &BoardSynergy, candidates: &[Candidate], bonus: i32) -> i32 {
    let mut fuel = synergy.total_fuel() as i32;
    let mut best = synergy
        .flashback_fuel
        .iter()
        .map(|(rule, _)| rule.damage.max() as i32)
        .max()
        .unwrap_or(0);
    for candidate in candidates.iter().filter(|c| c.rule.has_flashback()) {
        if candidate.from == Zone::Hand {
            fuel += 1;
        }
        best = best.max(candidate.rule.damage.max() as i32);
    }
    fuel.min(synergy.mountains as i32) * (best + bonus)
}

/// Cards worth permuting
///
/// Hand cards that can contribute damage this turn and have an option that
/// fits the total resources, plus one flashback candidate per fuel card that
/// a Mountain can pay for. When there are too many, the ones with the
/// highest damage bound are kept, in hand order.
pub fn lethal_candidates(
    hand: &[CardName],
    synergy: &BoardSynergy,
    available: &ManaPool,
) -> Vec<Candidate> {
    let mut from_hand: Vec<Candidate> = hand
        .iter()
        .filter_map(|card| catalog::lookup(card.as_str()))
        .filter(|rule| rule.lethal_candidate && !rule.is_absent())
        .filter(|rule| {
            rule.options.iter().any(|o| {
                o.from == Zone::Hand
                    && o.mode.resolves_now()
                    && fits_resources(o, synergy, available)
            })
        })
        .map(Candidate::from_hand)
        .collect();

    let mut from_graveyard = Vec::new();
    for &(rule, count) in &synergy.flashback_fuel {
        for _ in 0..count.min(synergy.mountains) {
            from_graveyard.push(Candidate::from_graveyard(rule));
        }
    }
    from_graveyard.truncate(MAX_CANDIDATES);

    let room = MAX_CANDIDATES - from_graveyard.len();
    if from_hand.len() > room {
        let bonus = bonus_bound(synergy, &from_hand);
        let mut ranked: Vec<(usize, i32)> = from_hand
            .iter()
            .enumerate()
            .map(|(i, c)| (i, upper_bound(c.rule, bonus, synergy.combat_pending)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let mut keep: Vec<usize> = ranked.into_iter().take(room).map(|(i, _)| i).collect();
        keep.sort_unstable();
        from_hand = keep.into_iter().map(|i| from_hand[i]).collect();
    }

    from_hand.extend(from_graveyard);
    from_hand
}

struct Search<'a> {
    candidates: &'a [Candidate],
    bounds: Vec<i32>,
    cleanup_bound: i32,
    best: Option<TurnSimulation>,
}

impl<'a> Search<'a> {
    fn best_damage(&self) -> Option<i32> {
        self.best.as_ref().map(TurnSimulation::damage)
    }

    fn explore(&mut self, sim: &TurnSimulation, used: &mut [bool], remaining_bound: i32) {
        if let Some(best) = self.best_damage() {
            let pending = sim.shadow.synergy.threshold_bound();
            if sim.damage() + remaining_bound + self.cleanup_bound + pending <= best {
                return;
            }
        }

        let mut tried: SmallVec<[Candidate; MAX_CANDIDATES]> = SmallVec::new();
        for i in 0..self.candidates.len() {
            if used[i] {
                continue;
            }
            let candidate = self.candidates[i];
            if tried.iter().any(|t| t.same_as(&candidate)) {
                continue;
            }
            tried.push(candidate);

            let mut child = sim.clone();
            child.try_cast(&candidate);
            used[i] = true;
            self.explore(&child, used, remaining_bound - self.bounds[i]);
            used[i] = false;
        }

        if tried.is_empty() {
            let mut done = sim.clone();
            done.cleanup();
            if self.best_damage().map_or(true, |best| done.damage() > best) {
                self.best = Some(done);
            }
        }
    }
}

/// Highest-damage branch over every distinct ordering of `candidates`
///
/// Ties keep the first ordering found, so the result only depends on the
/// inputs and the candidate order.
pub fn best_line(
    candidates: &[Candidate],
    synergy: &BoardSynergy,
    available: &ManaPool,
) -> TurnSimulation {
    let bonus = bonus_bound(synergy, candidates);
    let bounds: Vec<i32> = candidates
        .iter()
        .map(|c| upper_bound(c.rule, bonus, synergy.combat_pending))
        .collect();
    let total: i32 = bounds.iter().sum();

    let mut search = Search {
        candidates,
        cleanup_bound: cleanup_bound(synergy, candidates, bonus),
        bounds,
        best: None,
    };
    let root = TurnSimulation::new(synergy, available);
    let mut used = vec![false; candidates.len()];
    search.explore(&root, &mut used, total);

    search.best.unwrap_or(root)
}

/// Find a line that kills this turn
///
/// Returns the damage-maximizing plan when its damage plus `forecast`
/// reaches `opponent_life`; `None` is the ordinary "no kill" answer.
pub fn evaluate_lethal(
    hand: &[CardName],
    synergy: &BoardSynergy,
    available: &ManaPool,
    forecast: i32,
    opponent_life: i32,
) -> Option<LethalPlan> {
    let candidates = lethal_candidates(hand, synergy, available);
    let best = best_line(&candidates, synergy, available);
    if best.damage() + forecast >= opponent_life {
        Some(best.into_plan())
    } else {
        None
    }
}

/// Replay a plan on a fresh shadow and return the damage it accounts for
pub fn replay(plan: &LethalPlan, synergy: &BoardSynergy, available: &ManaPool) -> Result<i32> {
    let mut shadow = ShadowState::new(synergy, available);
    for action in &plan.actions {
        match *action {
            PlannedAction::SacrificeStored(card) => {
                shadow.sacrifice(card)?;
                shadow.damage_opponent(card.damage.max() as i32, card.name);
            }
            PlannedAction::Cast { card, mode } => {
                let option = card.option(mode).ok_or_else(|| {
                    crate::GoldfishError::IllegalMove(format!("{} has no {mode} option", card.name))
                })?;
                resolve(&mut shadow, card, option, true)?;
            }
        }
    }
    shadow.settle_combat();
    Ok(shadow.damage)
}
