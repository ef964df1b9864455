//! Integration tests for recording results and advancing winners.

use bracket_engine::{
    generate_bracket, propagate_winner, record_result, record_score, schedule_match, seed_order,
    start_match, Bracket, GameMatch, MatchResult, MatchStatus, Propagation, Score, Slot, Team,
    TemplateShape, TournamentError, SUPPORTED_TEAM_COUNTS,
};
use chrono::{TimeZone, Utc};

fn seeded_teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| Team::registered(((b'A' + i as u8) as char).to_string(), None, Vec::new()))
        .collect()
}

fn team_named<'a>(teams: &'a [Team], name: &str) -> &'a Team {
    teams.iter().find(|t| t.name == name).unwrap()
}

/// Id of the match in `round` at `position`.
fn match_at(bracket: &Bracket, round: u32, position: u32) -> bracket_engine::MatchId {
    bracket.round(round)[position as usize - 1].id
}

fn name_in(bracket: &Bracket, round: u32, position: u32, slot: Slot) -> Option<String> {
    bracket.round(round)[position as usize - 1]
        .team(slot)
        .map(|t| t.name.clone())
}

#[test]
fn six_team_winners_land_in_seeded_slots_regardless_of_order() {
    let teams = seeded_teams(6);
    let mut bracket = generate_bracket(&teams).unwrap();

    // Record the second preliminary (D vs E) first.
    let d = team_named(&teams, "D").id;
    let de = match_at(&bracket, 1, 2);
    let outcome = record_result(&mut bracket, de, MatchResult::winner(d)).unwrap();
    assert_eq!(
        outcome,
        Propagation::Advanced {
            match_id: match_at(&bracket, 2, 1),
            slot: Slot::Two
        }
    );
    assert_eq!(name_in(&bracket, 2, 1, Slot::Two).as_deref(), Some("D"));
    assert_eq!(name_in(&bracket, 2, 2, Slot::Two), None);

    let f = team_named(&teams, "F").id;
    let cf = match_at(&bracket, 1, 1);
    record_result(&mut bracket, cf, MatchResult::with_score(f, Score::new(0, 2))).unwrap();
    assert_eq!(name_in(&bracket, 2, 2, Slot::One).as_deref(), Some("B"));
    assert_eq!(name_in(&bracket, 2, 2, Slot::Two).as_deref(), Some("F"));
    assert_eq!(name_in(&bracket, 2, 1, Slot::Two).as_deref(), Some("D"));
}

/// Every round is recorded last position first, the better seed always wins, and each
/// next-round match must still hold the standard seed pairing with the better seed in team1.
#[test]
fn reverse_order_results_keep_seeded_pairings_for_every_size() {
    for n in SUPPORTED_TEAM_COUNTS {
        let teams = seeded_teams(n);
        let seed = |s: usize| teams[s - 1].id;
        let shape = TemplateShape::for_team_count(n).unwrap();
        let mut bracket = generate_bracket(&teams).unwrap();

        let first_round = if shape.preliminary_matches > 0 {
            let prelims: Vec<_> = bracket.round(1).iter().map(|m| m.id).collect();
            for (j, id) in prelims.into_iter().enumerate().rev() {
                record_result(&mut bracket, id, MatchResult::winner(seed(shape.byes + j + 1))).unwrap();
            }
            2
        } else {
            1
        };

        let mut expected: Vec<(usize, usize)> = seed_order(shape.size)
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        for round in first_round..=bracket.round_count() {
            let ids: Vec<_> = bracket.round(round).iter().map(|m| m.id).collect();
            assert_eq!(ids.len(), expected.len(), "N = {n}, round {round}");
            for (k, &(one, two)) in expected.iter().enumerate() {
                let game = bracket.round(round)[k];
                assert_eq!(game.team1.as_ref().map(|t| t.id), Some(seed(one)), "N = {n}, round {round}, match {}", k + 1);
                assert_eq!(game.team2.as_ref().map(|t| t.id), Some(seed(two)), "N = {n}, round {round}, match {}", k + 1);
            }

            let winners: Vec<usize> = expected.iter().map(|&(one, two)| one.min(two)).collect();
            for (k, id) in ids.into_iter().enumerate().rev() {
                record_result(&mut bracket, id, MatchResult::winner(seed(winners[k]))).unwrap();
            }
            expected = winners.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        }
        assert_eq!(bracket.champion(), Some(seed(1)), "N = {n}");
    }
}

#[test]
fn eight_team_third_quarterfinal_feeds_the_second_semifinal() {
    let teams = seeded_teams(8);
    let mut bracket = generate_bracket(&teams).unwrap();
    // Quarterfinal 3 is seed 2 (B) vs seed 7 (G).
    let qf3 = match_at(&bracket, 1, 3);
    let b = team_named(&teams, "B").id;
    let outcome = record_result(&mut bracket, qf3, MatchResult::winner(b)).unwrap();
    assert_eq!(
        outcome,
        Propagation::Advanced {
            match_id: match_at(&bracket, 2, 2),
            slot: Slot::One
        }
    );
    assert_eq!(name_in(&bracket, 2, 1, Slot::One), None);
}

#[test]
fn semifinal_winner_reaches_final_without_touching_other_semifinal() {
    let teams = seeded_teams(6);
    let mut bracket = generate_bracket(&teams).unwrap();
    let d = team_named(&teams, "D").id;
    let de = match_at(&bracket, 1, 2);
    record_result(&mut bracket, de, MatchResult::winner(d)).unwrap();

    let other_semi = bracket.round(2)[1].clone();
    let a = team_named(&teams, "A").id;
    let semi = match_at(&bracket, 2, 1);
    record_result(&mut bracket, semi, MatchResult::winner(a)).unwrap();

    assert_eq!(name_in(&bracket, 3, 1, Slot::One).as_deref(), Some("A"));
    assert_eq!(name_in(&bracket, 3, 1, Slot::Two), None);
    assert_eq!(bracket.round(2)[1], &other_semi);
}

#[test]
fn propagating_twice_is_idempotent() {
    let teams = seeded_teams(4);
    let mut bracket = generate_bracket(&teams).unwrap();
    let first = match_at(&bracket, 1, 1);
    let a = team_named(&teams, "A").id;
    record_result(&mut bracket, first, MatchResult::winner(a)).unwrap();
    let once = bracket.clone();

    let again = propagate_winner(&mut bracket, first).unwrap();
    assert_eq!(
        again,
        Propagation::AlreadyPlaced {
            match_id: match_at(&bracket, 2, 1)
        }
    );
    assert_eq!(bracket, once);

    // Re-recording the same winner is accepted and changes nothing structural.
    record_result(&mut bracket, first, MatchResult::winner(a)).unwrap();
    assert_eq!(bracket, once);
}

#[test]
fn final_result_changes_only_the_final() {
    let teams = seeded_teams(2);
    let mut bracket = generate_bracket(&teams).unwrap();
    let before = bracket.clone();
    let final_id = match_at(&bracket, 1, 1);
    let b = team_named(&teams, "B").id;

    let outcome = record_result(&mut bracket, final_id, MatchResult::winner(b)).unwrap();
    assert_eq!(outcome, Propagation::Final);
    assert_eq!(bracket.champion(), Some(b));
    assert_eq!(propagate_winner(&mut bracket, final_id).unwrap(), Propagation::Final);

    let after = bracket.get(final_id).unwrap();
    assert_eq!(after.status, MatchStatus::Completed);
    assert_eq!(after.winner, Some(b));
    let mut expected = before.get(final_id).unwrap().clone();
    expected.status = MatchStatus::Completed;
    expected.winner = Some(b);
    assert_eq!(after, &expected);
}

#[test]
fn final_of_larger_bracket_does_not_alter_earlier_rounds() {
    let teams = seeded_teams(4);
    let mut bracket = generate_bracket(&teams).unwrap();
    let a = team_named(&teams, "A").id;
    let b = team_named(&teams, "B").id;
    let (semi1, semi2) = (match_at(&bracket, 1, 1), match_at(&bracket, 1, 2));
    record_result(&mut bracket, semi1, MatchResult::winner(a)).unwrap();
    record_result(&mut bracket, semi2, MatchResult::winner(b)).unwrap();
    let semis: Vec<GameMatch> = bracket.round(1).into_iter().cloned().collect();

    let final_id = match_at(&bracket, 2, 1);
    assert_eq!(
        record_result(&mut bracket, final_id, MatchResult::winner(a)).unwrap(),
        Propagation::Final
    );
    let semis_after: Vec<GameMatch> = bracket.round(1).into_iter().cloned().collect();
    assert_eq!(semis, semis_after);
    assert_eq!(bracket.champion(), Some(a));
}

#[test]
fn invalid_winner_is_rejected_without_mutation() {
    let teams = seeded_teams(4);
    let mut bracket = generate_bracket(&teams).unwrap();
    let before = bracket.clone();
    let first = match_at(&bracket, 1, 1);
    let outsider = team_named(&teams, "B").id;

    let err = record_result(&mut bracket, first, MatchResult::winner(outsider)).unwrap_err();
    assert_eq!(
        err,
        TournamentError::InvalidWinner {
            match_id: first,
            winner: outsider
        }
    );
    assert_eq!(bracket, before);
}

#[test]
fn match_missing_a_team_is_not_ready() {
    let teams = seeded_teams(6);
    let mut bracket = generate_bracket(&teams).unwrap();
    let semi = match_at(&bracket, 2, 1);
    let a = team_named(&teams, "A").id;
    assert_eq!(
        record_result(&mut bracket, semi, MatchResult::winner(a)).unwrap_err(),
        TournamentError::MatchNotReady(semi)
    );
    assert_eq!(start_match(&mut bracket, semi).unwrap_err(), TournamentError::MatchNotReady(semi));
}

#[test]
fn unknown_match_is_not_found() {
    let teams = seeded_teams(2);
    let mut bracket = generate_bracket(&teams).unwrap();
    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        record_result(&mut bracket, missing, MatchResult::winner(teams[0].id)).unwrap_err(),
        TournamentError::MatchNotFound(missing)
    );
}

#[test]
fn propagating_an_unfinished_match_is_a_no_op() {
    let teams = seeded_teams(4);
    let mut bracket = generate_bracket(&teams).unwrap();
    let before = bracket.clone();
    let first = match_at(&bracket, 1, 1);
    assert_eq!(propagate_winner(&mut bracket, first).unwrap(), Propagation::NotCompleted);
    assert_eq!(bracket, before);
}

#[test]
fn a_different_winner_cannot_overwrite_a_result() {
    let teams = seeded_teams(4);
    let mut bracket = generate_bracket(&teams).unwrap();
    let first = match_at(&bracket, 1, 1);
    let a = team_named(&teams, "A").id;
    let d = team_named(&teams, "D").id;
    record_result(&mut bracket, first, MatchResult::winner(a)).unwrap();
    assert_eq!(
        record_result(&mut bracket, first, MatchResult::winner(d)).unwrap_err(),
        TournamentError::ResultAlreadyRecorded(first)
    );
}

#[test]
fn score_entry_picks_the_higher_score() {
    let teams = seeded_teams(4);
    let mut bracket = generate_bracket(&teams).unwrap();
    let first = match_at(&bracket, 1, 1);
    assert_eq!(
        record_score(&mut bracket, first, Score::new(2, 2)).unwrap_err(),
        TournamentError::TiedScore(first)
    );
    record_score(&mut bracket, first, Score::new(1, 3)).unwrap();
    let played = bracket.get(first).unwrap();
    assert_eq!(played.winner, Some(team_named(&teams, "D").id));
    assert_eq!(played.score, Some(Score::new(1, 3)));
    assert_eq!(name_in(&bracket, 2, 1, Slot::One).as_deref(), Some("D"));
}

#[test]
fn unlinked_matches_fall_back_to_first_empty_slot() {
    let teams = seeded_teams(4);
    let mut semi1 = GameMatch::new(1, 1, Some(teams[0].clone()), Some(teams[3].clone()));
    let mut semi2 = GameMatch::new(1, 2, Some(teams[1].clone()), Some(teams[2].clone()));
    semi1.next_position = None;
    semi2.next_position = None;
    let (s1, s2) = (semi1.id, semi2.id);
    let mut bracket = Bracket::new(vec![semi1, semi2, GameMatch::placeholder(2, 1)]);

    record_result(&mut bracket, s2, MatchResult::winner(teams[2].id)).unwrap();
    record_result(&mut bracket, s1, MatchResult::winner(teams[0].id)).unwrap();
    assert_eq!(name_in(&bracket, 2, 1, Slot::One).as_deref(), Some("C"));
    assert_eq!(name_in(&bracket, 2, 1, Slot::Two).as_deref(), Some("A"));
}

#[test]
fn full_next_round_reports_target_not_found() {
    let teams = seeded_teams(4);
    let mut semi = GameMatch::new(1, 1, Some(teams[0].clone()), Some(teams[1].clone()));
    semi.next_position = Some(1);
    let semi_id = semi.id;
    let full_final = GameMatch::new(2, 1, Some(teams[2].clone()), Some(teams[3].clone()));
    let mut bracket = Bracket::new(vec![semi, full_final.clone()]);

    let outcome = record_result(&mut bracket, semi_id, MatchResult::winner(teams[0].id)).unwrap();
    assert_eq!(outcome, Propagation::TargetNotFound);
    assert_eq!(bracket.round(2)[0], &full_final);
    assert!(bracket.get(semi_id).unwrap().is_completed());
}

#[test]
fn matches_can_be_started_and_scheduled_until_played() {
    let teams = seeded_teams(2);
    let mut bracket = generate_bracket(&teams).unwrap();
    let id = match_at(&bracket, 1, 1);
    let kickoff = Utc.with_ymd_and_hms(2025, 6, 14, 15, 0, 0).unwrap();

    schedule_match(&mut bracket, id, Some(kickoff)).unwrap();
    start_match(&mut bracket, id).unwrap();
    assert_eq!(bracket.get(id).unwrap().status, MatchStatus::InProgress);
    assert_eq!(bracket.get(id).unwrap().scheduled_time, Some(kickoff));

    record_result(&mut bracket, id, MatchResult::winner(teams[0].id)).unwrap();
    assert_eq!(start_match(&mut bracket, id).unwrap_err(), TournamentError::InvalidState);
    assert_eq!(
        schedule_match(&mut bracket, id, None).unwrap_err(),
        TournamentError::InvalidState
    );
}
