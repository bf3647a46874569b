use super::*;
use chrono::{Duration, Local};

fn pairs(n: usize) -> Vec<(PlayerId, PlayerId)> {
    (0..n)
        .map(|i| {
            (
                PlayerId::parse(&format!("PA{:05}", i)).unwrap(),
                PlayerId::parse(&format!("PB{:05}", i)).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_round_setup() {
    let mut round = Round::new("Round 1");
    assert!(!round.has_started());

    let pairs = pairs(10);
    round.setup(&pairs);

    assert!(round.has_started());
    assert_eq!(round.matches.len(), pairs.len());
    for (m, (a, b)) in round.matches.iter().zip(pairs.iter()) {
        assert_eq!(m.player1(), a);
        assert_eq!(m.player2(), b);
        assert_eq!(m.scores(), &[(a.clone(), 0.0), (b.clone(), 0.0)]);
        assert!(!m.has_started());
    }
}

#[test]
fn test_round_find_player_match() {
    let mut round = Round::new("Round 1");
    let pairs = pairs(10);
    round.setup(&pairs);

    let player = &pairs[4].1;
    let m = round.find_player_match(player).unwrap();
    assert_eq!(m, &round.matches[4]);
    assert_eq!(m.player2(), player);

    assert!(round
        .find_player_match(&PlayerId::parse("ZZ99999").unwrap())
        .is_none());
}

#[test]
fn test_round_ends_with_last_match() {
    let mut round = Round::new("Round 1");
    round.setup(&pairs(3));
    let start = Local::now().naive_local();

    for (i, m) in round.matches.iter_mut().enumerate() {
        m.start(Some(start)).unwrap();
        m.end(None, Some(start + Duration::minutes(30 + i as i64)))
            .unwrap();
    }
    assert!(round.has_ended());

    round.setup(&pairs(3));
    round.matches[0].start(Some(start)).unwrap();
    round.matches[0].end(None, None).unwrap();
    assert!(!round.has_ended());
}
