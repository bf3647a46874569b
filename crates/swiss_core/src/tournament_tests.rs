use super::*;
use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn player(i: usize) -> Player {
    Player::new(
        PlayerId::parse(&format!("PL{:05}", i)).unwrap(),
        &format!("Surname{}", i),
        &format!("Name{}", i),
        NaiveDate::from_ymd_opt(1990, 1, 1 + (i % 28) as u32).unwrap(),
    )
}

fn tournament(round_count: u32, participants: usize) -> Tournament {
    let metadata = TournamentMetaData::new("t-0001")
        .with_rounds(round_count)
        .with_location("Paris");
    let mut t = Tournament::new(metadata).unwrap();
    for i in 0..participants {
        assert!(t.add_participant(player(i)).unwrap());
    }
    t
}

fn at(day: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

/// Start and end every match of the current round; player 1 wins
fn play_current_round(t: &mut Tournament, day: u32) {
    let count = t.current_round().unwrap().matches.len();
    for i in 0..count {
        t.start_a_match(i, Some(at(day, 14))).unwrap().unwrap();
        let winner = t.current_round().unwrap().matches[i].player1().clone();
        t.end_a_match(i, Some(&winner), Some(at(day, 15) + Duration::minutes(i as i64)))
            .unwrap()
            .unwrap();
    }
}

fn ids_of(t: &Tournament) -> Vec<PlayerId> {
    t.participants().iter().map(|p| p.id.clone()).collect()
}

#[test]
fn test_new_tournament_is_open() {
    let t = tournament(4, 0);
    assert_eq!(t.rounds().len(), 4);
    assert!(t.rounds().iter().all(Option::is_none));
    assert!(!t.has_started());
    assert!(!t.has_ended());
    assert_eq!(t.status(), TournamentStatus::Open);
    assert_eq!(t.metadata.status, TournamentStatus::Open);
    assert!(t.current_round().is_none());
    assert_eq!(t.current_round_idx(), None);
}

#[test]
fn test_zero_rounds_rejected() {
    let metadata = TournamentMetaData::new("t").with_rounds(0);
    assert_eq!(
        Tournament::new(metadata).unwrap_err(),
        SwissError::InvalidRoundCount
    );
}

#[test]
fn test_add_participant() {
    let mut t = tournament(4, 0);
    for i in 0..10 {
        assert!(t.add_participant(player(i)).unwrap());
        assert_eq!(t.player_score(&player(i).id), 0.0);
    }
    assert!(!t.has_started());
    // Same player again is a no-op
    assert!(!t.add_participant(player(3)).unwrap());
    assert_eq!(t.participants().len(), 10);
    assert_eq!(t.participant(&player(3).id), Some(&player(3)));
}

#[test]
fn test_player_is_registered() {
    let mut t = tournament(4, 0);
    let p = Player::new(
        PlayerId::parse("FR12345").unwrap(),
        "Tal",
        "Mikhail",
        NaiveDate::from_ymd_opt(1936, 11, 9).unwrap(),
    );
    t.add_participant(p.clone()).unwrap();
    assert!(t.player_is_registered(&p.id));
    assert!(!t.player_is_registered(&PlayerId::parse("FR54321").unwrap()));
}

#[test]
fn test_ranking_list_before_start() {
    let t = tournament(4, 4);
    let ranking = t.ranking_list();
    assert_eq!(ranking.len(), 4);
    for (standing, p) in ranking.iter().zip(t.participants()) {
        assert_eq!(standing.player, p.id);
        assert_eq!(standing.rank, 1);
        assert_eq!(standing.score, 0.0);
    }
}

#[test]
fn test_configuration_locked_after_start() {
    let mut t = tournament(4, 4);
    t.set_rounds(5).unwrap();
    t.set_location("Lyon").unwrap();
    t.set_start_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .unwrap();
    assert_eq!(t.rounds().len(), 5);
    assert_eq!(t.metadata.round_count, 5);
    assert_eq!(t.set_rounds(0), Err(SwissError::InvalidRoundCount));

    t.start_next_round(None).unwrap();

    let started = Err(SwissError::AlreadyStarted("tournament"));
    assert_eq!(t.set_rounds(3), started);
    assert_eq!(t.set_location("Nice"), started);
    assert_eq!(
        t.set_start_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        started
    );
    assert_eq!(t.add_participant(player(99)).map(|_| ()), started);
    assert_eq!(t.metadata.location, "Lyon");

    // Description stays editable
    t.set_description("Spring open");
    assert_eq!(t.metadata.description, "Spring open");
}

#[test]
fn test_start_first_round() {
    let mut t = tournament(4, 6);
    let mut rng = StdRng::seed_from_u64(42);
    let round = t.start_next_round_with_rng(None, &mut rng).unwrap();

    assert_eq!(round.name, "Round 1");
    assert_eq!(round.matches.len(), 3);
    let mut seen: Vec<PlayerId> = round
        .matches
        .iter()
        .flat_map(|m| [m.player1().clone(), m.player2().clone()])
        .collect();
    assert!(round.matches.iter().all(|m| !m.has_started()));

    seen.sort();
    assert_eq!(seen, ids_of(&t));
    assert!(t.has_started());
    assert_eq!(t.status(), TournamentStatus::Running);
    assert_eq!(t.metadata.status, TournamentStatus::Running);
    assert_eq!(t.current_round_idx(), Some(0));
    assert_eq!(t.start_date(), Some(now().date()));
}

#[test]
fn test_start_date_kept_when_set() {
    let mut t = tournament(2, 2);
    let planned = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    t.set_start_date(planned).unwrap();
    t.start_next_round(None).unwrap();
    assert_eq!(t.start_date(), Some(planned));
}

#[test]
fn test_first_match_moves_start_date() {
    let mut t = tournament(2, 2);
    t.set_start_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .unwrap();
    t.start_next_round(None).unwrap();
    t.start_a_match(0, Some(at(3, 14))).unwrap();
    assert_eq!(t.start_date(), NaiveDate::from_ymd_opt(2024, 5, 3));
}

#[test]
fn test_odd_participants() {
    let mut t = tournament(4, 5);
    assert!(!t.can_start());
    assert_eq!(
        t.start_next_round(None).unwrap_err(),
        SwissError::OddParticipants(5)
    );
    assert!(!t.has_started());
}

#[test]
fn test_no_participants() {
    let mut t = tournament(4, 0);
    assert!(!t.can_start());
    assert_eq!(
        t.start_next_round(None).unwrap_err(),
        SwissError::NoParticipants
    );
}

#[test]
fn test_current_round_must_end_first() {
    let mut t = tournament(4, 4);
    t.start_next_round(None).unwrap();
    assert!(!t.can_start());
    assert_eq!(
        t.start_next_round(None).unwrap_err(),
        SwissError::InvalidTransition("current round has not ended")
    );

    play_current_round(&mut t, 2);
    assert!(t.can_start());
    let round = t.start_next_round(None).unwrap();
    assert_eq!(round.name, "Round 2");
    assert_eq!(t.current_round_idx(), Some(1));
}

#[test]
fn test_no_round_after_last() {
    let mut t = tournament(4, 6);
    for day in 1..=4 {
        t.start_next_round(None).unwrap();
        play_current_round(&mut t, day);
    }
    assert!(t.has_ended());
    assert!(!t.can_start());
    assert_eq!(
        t.start_next_round(None).unwrap_err(),
        SwissError::InvalidTransition("last round already reached")
    );
}

#[test]
fn test_supplied_pairs_are_used() {
    let mut t = tournament(3, 4);
    let p = ids_of(&t);
    let pairs = vec![(p[3].clone(), p[0].clone()), (p[1].clone(), p[2].clone())];
    let round = t.start_next_round(Some(pairs)).unwrap();
    assert_eq!(round.matches[0].player1(), &p[3]);
    assert_eq!(round.matches[0].player2(), &p[0]);
    assert_eq!(round.matches[1].player1(), &p[1]);
}

#[test]
fn test_supplied_pairs_are_validated() {
    let mut t = tournament(3, 4);
    let p = ids_of(&t);
    let stranger = PlayerId::parse("ZZ00001").unwrap();

    let unknown = vec![(p[0].clone(), stranger.clone()), (p[1].clone(), p[2].clone())];
    assert_eq!(
        t.start_next_round(Some(unknown)).unwrap_err(),
        SwissError::UnknownPlayer("ZZ00001".to_string())
    );

    let twice = vec![(p[0].clone(), p[1].clone()), (p[1].clone(), p[2].clone())];
    assert!(matches!(
        t.start_next_round(Some(twice)),
        Err(SwissError::InvalidPairing(_))
    ));

    let partial = vec![(p[0].clone(), p[1].clone())];
    assert!(matches!(
        t.start_next_round(Some(partial)),
        Err(SwissError::InvalidPairing(_))
    ));

    // Nothing changed
    assert!(!t.has_started());
    assert_eq!(t.current_round_idx(), None);
}

#[test]
fn test_match_making_avoids_repeats() {
    let mut t = tournament(4, 6);
    let p = ids_of(&t);
    let pairs: Vec<Pair> = p
        .chunks(2)
        .map(|c| (c[0].clone(), c[1].clone()))
        .collect();
    t.start_next_round(Some(pairs.clone())).unwrap();
    for i in 0..3 {
        t.start_a_match(i, Some(at(2, 14))).unwrap();
        t.end_a_match(i, None, Some(at(2, 15))).unwrap();
    }

    t.update_score_board();
    let expected: Vec<Standing> = p
        .iter()
        .map(|id| Standing {
            player: id.clone(),
            rank: 1,
            score: 0.5,
        })
        .collect();
    assert_eq!(t.ranking_list(), expected);

    for (a, b) in &pairs {
        assert_eq!(t.can_play(a, b), 0.5);
    }
    let new_pairs = t.make_player_pairs(&mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(new_pairs.len(), 3);
    for (a, b) in &new_pairs {
        assert_eq!(t.can_play(a, b), 1.0);
    }
}

#[test]
fn test_match_operations_outside_a_round() {
    let mut t = tournament(2, 2);
    assert_eq!(t.start_a_match(0, None), Ok(None));
    assert_eq!(t.end_a_match(0, None, None), Ok(None));
    assert!(t.pending_matches().is_empty());
    assert!(!t.has_pending_matches());
}

#[test]
fn test_match_index_out_of_range() {
    let mut t = tournament(2, 4);
    t.start_next_round(None).unwrap();
    assert_eq!(t.start_a_match(2, None), Err(SwissError::NoSuchMatch(2)));
    assert_eq!(
        t.end_a_match(7, None, None),
        Err(SwissError::NoSuchMatch(7))
    );
}

#[test]
fn test_pending_and_running_matches() {
    let mut t = tournament(2, 6);
    t.start_next_round(None).unwrap();
    assert_eq!(t.pending_matches().len(), 3);
    assert!(t.running_matches().is_empty());

    t.start_a_match(1, Some(at(2, 14))).unwrap();
    let pending: Vec<usize> = t.pending_matches().iter().map(|(i, _)| *i).collect();
    let running: Vec<usize> = t.running_matches().iter().map(|(i, _)| *i).collect();
    assert_eq!(pending, vec![0, 2]);
    assert_eq!(running, vec![1]);
    assert!(t.has_pending_matches());
    assert!(t.has_running_matches());

    // Ending a match that has not started fails
    assert_eq!(
        t.end_a_match(0, None, None),
        Err(SwissError::NotStarted("match"))
    );
    assert_eq!(
        t.start_a_match(1, None).map(|_| ()),
        Err(SwissError::AlreadyStarted("match"))
    );

    t.end_a_match(1, None, Some(at(2, 15))).unwrap();
    assert!(!t.has_running_matches());
}

#[test]
fn test_end_a_match_updates_scores() {
    let mut t = tournament(2, 2);
    t.start_next_round(None).unwrap();
    let m = t.start_a_match(0, Some(at(2, 14))).unwrap().unwrap().clone();
    let winner = m.player2().clone();

    let scores = t
        .end_a_match(0, Some(&winner), Some(at(2, 15)))
        .unwrap()
        .unwrap();
    assert_eq!(scores, [(m.player1().clone(), 0.0), (winner.clone(), 1.0)]);
    assert_eq!(t.player_score(&winner), 1.0);
    assert_eq!(t.player_rank(&winner), Some(1));
    assert_eq!(t.player_rank(m.player1()), Some(2));
}

#[test]
fn test_current_round_lifecycle() {
    let mut t = tournament(2, 4);
    assert!(t.current_round().is_none());

    t.start_next_round(None).unwrap();
    assert_eq!(t.current_round(), t.rounds()[0].as_ref());
    play_current_round(&mut t, 2);
    // Ended but not the last round: still the current one
    assert_eq!(t.current_round(), t.rounds()[0].as_ref());

    t.start_next_round(None).unwrap();
    assert_eq!(t.current_round(), t.rounds()[1].as_ref());
    play_current_round(&mut t, 3);
    assert!(t.current_round().is_none());
}

#[test]
fn test_end_date_is_earliest_final_match_end() {
    let mut t = tournament(1, 4);
    t.start_next_round(None).unwrap();
    t.start_a_match(0, Some(at(4, 20))).unwrap();
    t.start_a_match(1, Some(at(5, 9))).unwrap();
    t.end_a_match(1, None, Some(at(5, 11))).unwrap();
    assert_eq!(t.end_date(), None);
    t.end_a_match(0, None, Some(at(4, 23))).unwrap();

    assert!(t.has_ended());
    assert_eq!(t.status(), TournamentStatus::Ended);
    assert_eq!(t.metadata.status, TournamentStatus::Ended);
    assert_eq!(t.end_date(), NaiveDate::from_ymd_opt(2024, 5, 4));

    // Results are frozen once the tournament is over
    assert_eq!(t.end_a_match(0, None, None), Ok(None));
}

#[test]
fn test_full_tournament_scores() {
    let mut t = tournament(3, 8);
    let mut rng = StdRng::seed_from_u64(3);
    for day in 1..=3 {
        t.start_next_round_with_rng(None, &mut rng).unwrap();
        play_current_round(&mut t, day);
    }
    let total: f64 = t.participants().iter().map(|p| t.player_score(&p.id)).sum();
    // One point per match
    assert_eq!(total, 3.0 * 4.0);

    let ranking = t.ranking_list();
    assert_eq!(ranking.len(), 8);
    assert_eq!(ranking[0].rank, 1);
    assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));
}
