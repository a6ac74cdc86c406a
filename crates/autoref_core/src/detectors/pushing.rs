use fxhash::FxHashMap;

use super::{restart_spot, DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::config::PushingConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::geometry::{angle_between, Vec2};
use crate::model::{BotId, Frame, GameStateSet, TeamColor};

const PRIORITY: i32 = 85;

/// (pusher, pushed)
type Pair = (BotId, BotId);

/// A bot pushing an opponent over a distance or into its defense area.
///
/// Every pair of opposing bots in contact is tracked in both orientations,
/// anchored at the pushed bot's position at first contact.
#[derive(Debug, Clone)]
pub struct PushingDetector {
    config: PushingConfig,
    restart_inset: f64,
    anchors: FxHashMap<Pair, Vec2>,
    pushers: DebouncedSet<BotId>,
}

impl PushingDetector {
    pub fn new(config: PushingConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            anchors: FxHashMap::default(),
            pushers: DebouncedSet::new(),
        }
    }

    fn contacts(&self, frame: &Frame, contact: f64) -> Vec<Pair> {
        let mut pairs = Vec::new();
        for yellow in frame.world.bots_of(TeamColor::Yellow) {
            for blue in frame.world.bots_of(TeamColor::Blue) {
                if (yellow.pos - blue.pos).norm() < contact {
                    pairs.push((yellow.id, blue.id));
                    pairs.push((blue.id, yellow.id));
                }
            }
        }
        pairs.sort();
        pairs
    }

    /// Drop vanished pairs, anchor new ones, keep survivors.
    fn merge(&mut self, frame: &Frame, pairs: &[Pair]) {
        self.anchors.retain(|pair, _| pairs.contains(pair));
        for pair in pairs {
            if let Some(pushed) = frame.bot(pair.1) {
                self.anchors.entry(*pair).or_insert(pushed.pos);
            }
        }
    }
}

impl Detector for PushingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Pushing
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.anchors.clear();
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let now = frame.timestamp();
        let field = ctx.field;
        let contact = 2.0 * field.bot_radius + self.config.contact_margin;
        let tolerance = self.config.push_angle_tolerance_deg.to_radians();

        let pairs = self.contacts(frame, contact);
        self.merge(frame, &pairs);
        self.pushers
            .expire_reports(now, self.config.violator_cooldown_time);

        for (pusher_id, pushed_id) in pairs {
            let (Some(pusher), Some(pushed)) = (frame.bot(pusher_id), frame.bot(pushed_id)) else {
                continue;
            };
            let Some(anchor) = self.anchors.get(&(pusher_id, pushed_id)).copied() else {
                continue;
            };
            let displacement = pushed.pos - anchor;
            let own_area = field.penalty_area(frame.own_goal_sign(pushed_id.team));
            let into_area = own_area.contains(&pushed.pos) && !own_area.contains(&anchor);
            let too_far = displacement.norm() > self.config.push_max_distance;
            if !(too_far || into_area) {
                continue;
            }
            if angle_between(&displacement, &(pushed.pos - pusher.pos)) > tolerance {
                continue;
            }
            if self
                .pushers
                .reported_within(&pusher_id, now, self.config.violator_cooldown_time)
            {
                continue;
            }

            self.pushers.mark_reported(pusher_id, now);
            self.anchors.insert((pusher_id, pushed_id), pushed.pos);
            let event = GameEvent::BotPushedBot {
                by_team: pusher_id.team,
                violator: pusher_id.number,
                victim: pushed_id.number,
                location: pushed.pos,
                pushed_distance: displacement.norm(),
            };
            let spot = restart_spot(field, &pusher.pos, self.restart_inset);
            return Ok(Some(RuleOutcome::stop(
                event,
                FollowUpAction::direct_free(pushed_id.team, spot),
            )));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{config, scene, Harness};

    fn detector() -> PushingDetector {
        let cfg = config();
        PushingDetector::new(cfg.detectors.pushing, cfg.detectors.restart.inset)
    }

    fn pair(tick: u64, yellow: (f64, f64), blue: (f64, f64)) -> Frame {
        scene(tick)
            .bot(BotId::yellow(1), yellow.0, yellow.1)
            .bot(BotId::blue(2), blue.0, blue.1)
            .frame()
    }

    #[test]
    fn test_push_along_contact_line_fires() {
        let mut det = detector();
        let mut h = Harness::new();
        assert!(h.run(&mut det, pair(0, (0.0, 0.0), (180.0, 0.0))).is_none());

        let outcome = h
            .run(&mut det, pair(1, (201.0, 0.0), (381.0, 0.0)))
            .expect("push");
        match outcome.event {
            Some(GameEvent::BotPushedBot {
                by_team,
                violator,
                victim,
                pushed_distance,
                ..
            }) => {
                assert_eq!(by_team, TeamColor::Yellow);
                assert_eq!((violator, victim), (1, 2));
                assert!((pushed_distance - 201.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(outcome.follow_up.map(|f| f.team), Some(TeamColor::Blue));
    }

    #[test]
    fn test_sideways_displacement_ignored() {
        let mut det = detector();
        let mut h = Harness::new();
        assert!(h.run(&mut det, pair(0, (0.0, 0.0), (180.0, 0.0))).is_none());
        assert!(h.run(&mut det, pair(1, (0.0, 201.0), (180.0, 201.0))).is_none());
    }

    #[test]
    fn test_separation_resets_anchor() {
        let mut det = detector();
        let mut h = Harness::new();
        h.run(&mut det, pair(0, (0.0, 0.0), (180.0, 0.0)));
        // Apart for a tick: the pair is forgotten
        h.run(&mut det, pair(1, (0.0, 0.0), (600.0, 0.0)));
        assert!(h.run(&mut det, pair(2, (201.0, 0.0), (381.0, 0.0))).is_none());
        assert_eq!(det.anchors.get(&(BotId::yellow(1), BotId::blue(2))), Some(&Vec2::new(381.0, 0.0)));
    }

    #[test]
    fn test_push_into_defense_area() {
        let mut det = detector();
        let mut h = Harness::new();
        // Yellow defends +x; the area front is at x = 4200
        assert!(h.run(&mut det, pair(0, (4100.0, 0.0), (3920.0, 0.0))).is_none());
        let outcome = h
            .run(&mut det, pair(1, (4250.0, 0.0), (4070.0, 0.0)))
            .expect("push");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::BotPushedBot { by_team: TeamColor::Blue, violator: 2, victim: 1, .. })
        ));
    }
}
