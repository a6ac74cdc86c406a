use crate::model::{Frame, TeamColor, TeamIdentities, TeamIdentity};

/// Keeps team identities stable when the referee box swaps colours.
///
/// Matching order per colour: same name as a known identity, then the
/// identity the other colour did not take, then the identity that held this
/// colour before. The two ids are always a permutation of the previous two.
#[derive(Debug, Clone, Default)]
pub struct TeamInfoCalc {
    identities: TeamIdentities,
}

impl TeamInfoCalc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, frame: &mut Frame) {
        let prev = [self.identities.yellow.clone(), self.identities.blue.clone()];
        let names = [
            frame.referee.yellow.name.clone(),
            frame.referee.blue.name.clone(),
        ];
        // Index into `prev` chosen for each colour (yellow, blue)
        let mut chosen: [Option<usize>; 2] = [None, None];

        for c in 0..2 {
            if names[c].is_empty() {
                continue;
            }
            chosen[c] = (0..2).find(|&i| prev[i].name == names[c] && chosen[1 - c] != Some(i));
        }
        for c in 0..2 {
            if chosen[c].is_none() {
                if let Some(other) = chosen[1 - c] {
                    chosen[c] = Some(1 - other);
                }
            }
        }
        for c in 0..2 {
            if chosen[c].is_none() {
                chosen[c] = Some(c);
            }
        }

        let make = |c: usize, color: TeamColor| {
            let i = chosen[c].unwrap_or(c);
            TeamIdentity {
                id: prev[i].id,
                name: names[c].clone(),
                color,
            }
        };
        let next = TeamIdentities {
            yellow: make(0, TeamColor::Yellow),
            blue: make(1, TeamColor::Blue),
        };

        if next.yellow.id != self.identities.yellow.id {
            log::info!(
                "team colours swapped: {} is now YELLOW, {} is now BLUE",
                next.yellow.name,
                next.blue.name
            );
        }
        self.identities = next;
        frame.facts.team_identities = self.identities.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::scene;

    fn step(calc: &mut TeamInfoCalc, tick: u64, yellow: &str, blue: &str) -> TeamIdentities {
        let mut frame = scene(tick)
            .referee(|r| {
                r.yellow.name = yellow.to_string();
                r.blue.name = blue.to_string();
            })
            .frame();
        calc.process(&mut frame);
        frame.facts.team_identities
    }

    #[test]
    fn test_swap_follows_name() {
        let mut calc = TeamInfoCalc::new();
        let before = step(&mut calc, 0, "TIGERs", "ER-Force");
        assert_eq!(before.yellow.name, "TIGERs");
        let tigers_id = before.yellow.id;

        for tick in 1..5 {
            step(&mut calc, tick, "TIGERs", "ER-Force");
        }
        let after = step(&mut calc, 5, "ER-Force", "TIGERs");
        assert_eq!(after.blue.name, "TIGERs");
        assert_eq!(after.blue.id, tigers_id);
        assert_ne!(after.yellow.id, after.blue.id);

        let later = step(&mut calc, 6, "ER-Force", "TIGERs");
        assert_eq!(later, after);
    }

    #[test]
    fn test_rename_keeps_other_identity() {
        let mut calc = TeamInfoCalc::new();
        let before = step(&mut calc, 0, "A", "B");
        // Blue renamed and colours swapped in the same message
        let after = step(&mut calc, 1, "C", "A");
        assert_eq!(after.blue.id, before.yellow.id);
        assert_eq!(after.yellow.id, before.blue.id);
        assert_eq!(after.yellow.name, "C");
    }

    #[test]
    fn test_missing_names_fall_back_to_colour() {
        let mut calc = TeamInfoCalc::new();
        let ids = step(&mut calc, 0, "", "");
        assert_eq!(ids.yellow.color, TeamColor::Yellow);
        assert_eq!(ids.blue.color, TeamColor::Blue);
        assert_ne!(ids.yellow.id, ids.blue.id);
    }

    #[test]
    fn test_identical_names_stay_unique() {
        let mut calc = TeamInfoCalc::new();
        step(&mut calc, 0, "Same", "Same");
        let ids = step(&mut calc, 1, "Same", "Same");
        assert_ne!(ids.yellow.id, ids.blue.id);
    }
}
