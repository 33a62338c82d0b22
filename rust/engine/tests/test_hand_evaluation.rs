use std::cmp::Ordering;
use std::collections::HashMap;

use pokerlab_engine::cards::{full_deck, parse_cards, Card, Rank as R, Suit as S};
use pokerlab_engine::hand::{compare_hands, evaluate_hand, evaluate_with_board, Category};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn c(s: S, r: R) -> Card {
    Card { suit: s, rank: r }
}

fn eval(s: &str) -> pokerlab_engine::hand::HandStrength {
    evaluate_hand(&parse_cards(s).unwrap())
}

#[test]
fn detects_royal_flush() {
    let cards = [
        c(S::Hearts, R::Ten),
        c(S::Hearts, R::Jack),
        c(S::Hearts, R::Queen),
        c(S::Hearts, R::King),
        c(S::Hearts, R::Ace),
        c(S::Clubs, R::Two),
        c(S::Diamonds, R::Three),
    ];
    assert_eq!(evaluate_hand(&cards).category, Category::RoyalFlush);
}

#[test]
fn steel_wheel_is_lowest_straight_flush() {
    let wheel = eval("As 2s 3s 4s 5s Kd Kc");
    let six_high = eval("2s 3s 4s 5s 6s Kd Kc");
    assert_eq!(wheel.category, Category::StraightFlush);
    assert!(compare_hands(&wheel, &six_high).is_lt());
}

#[test]
fn category_ordering_is_correct() {
    let ladder = [
        eval("Ah Kd 9c 7s 4h 3d 2c"),
        eval("Ah Ad 9c 7s 4h 3d 2c"),
        eval("Ah Ad 9c 9s 4h 3d 2c"),
        eval("Ah Ad Ac 9s 4h 3d 2c"),
        eval("5h 6d 7c 8s 9h Kd 2c"),
        eval("Ah Kh 9h 7h 4h 3d 2c"),
        eval("Ah Ad Ac 9s 9h 3d 2c"),
        eval("Ah Ad Ac As 9h 3d 2c"),
        eval("5h 6h 7h 8h 9h Kd 2c"),
        eval("Th Jh Qh Kh Ah 3d 2c"),
    ];
    for (i, pair) in ladder.windows(2).enumerate() {
        assert_eq!(pair[0].category as usize, i);
        assert!(compare_hands(&pair[1], &pair[0]).is_gt(), "step {}", i);
    }
}

#[test]
fn kickers_break_ties() {
    assert!(eval("Ah Ad Kc 9s 4h") > eval("As Ac Qc 9d 4c"));
    assert!(eval("Kh Kd 7c 7s 9h") > eval("Ks Kc 7d 7h 8c"));
    assert!(eval("Qh Qd Qc 8s 6h") > eval("Qs Qh Qc 8d 5c"));
    assert!(eval("Ah Jh 9h 6h 2h") > eval("Ad Jd 9d 5d 4d"));
}

#[test]
fn only_best_five_count() {
    // The sixth and seventh cards do not matter once five are chosen.
    let a = eval("Ah Ad Kc Qs Jh 3d 2c");
    let b = eval("As Ac Kd Qh Jd 5c 4s");
    assert_eq!(compare_hands(&a, &b), Ordering::Equal);
}

#[test]
fn board_plays_for_both() {
    let board = parse_cards("Th Jh Qh Kh Ah").unwrap();
    let hole_a = [c(S::Clubs, R::Two), c(S::Diamonds, R::Three)];
    let hole_b = [c(S::Spades, R::Four), c(S::Clubs, R::Five)];
    assert_eq!(
        evaluate_with_board(&hole_a, &board),
        evaluate_with_board(&hole_b, &board)
    );
}

// Straightforward best-of-21 evaluator used to cross-check the fast path.
fn reference_five(cards: &[Card]) -> (u8, Vec<u8>) {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut unique = ranks.clone();
    unique.dedup();
    let straight_high = if unique.len() == 5 && unique[0] - unique[4] == 4 {
        Some(unique[0])
    } else if unique == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    };

    let mut counts: HashMap<u8, u8> = HashMap::new();
    for r in &ranks {
        *counts.entry(*r).or_default() += 1;
    }
    let mut groups: Vec<(u8, u8)> = counts.into_iter().map(|(r, n)| (n, r)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let grouped: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();

    match (straight_high, flush, groups[0].0, groups.get(1).map(|g| g.0)) {
        (Some(14), true, _, _) => (9, vec![14]),
        (Some(h), true, _, _) => (8, vec![h]),
        (_, _, 4, _) => (7, grouped),
        (_, _, 3, Some(2)) => (6, grouped),
        (_, true, _, _) => (5, ranks),
        (Some(h), _, _, _) => (4, vec![h]),
        (_, _, 3, _) => (3, grouped),
        (_, _, 2, Some(2)) => (2, grouped),
        (_, _, 2, _) => (1, grouped),
        _ => (0, ranks),
    }
}

fn reference_best(cards: &[Card]) -> (u8, Vec<u8>) {
    let n = cards.len();
    let mut best = (0u8, Vec::new());
    for a in 0..n {
        for b in (a + 1)..n {
            let five: Vec<Card> = (0..n)
                .filter(|&i| i != a && i != b)
                .map(|i| cards[i])
                .collect();
            let hs = reference_five(&five);
            if hs > best {
                best = hs;
            }
        }
    }
    best
}

#[test]
fn matches_reference_evaluator_on_random_deals() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut deck = full_deck();
    for i in 0..50_000 {
        deck.shuffle(&mut rng);
        let board = &deck[4..9];
        let a: Vec<Card> = deck[0..2].iter().chain(board).copied().collect();
        let b: Vec<Card> = deck[2..4].iter().chain(board).copied().collect();

        let (fast_a, fast_b) = (evaluate_hand(&a), evaluate_hand(&b));
        let (ref_a, ref_b) = (reference_best(&a), reference_best(&b));

        assert_eq!(fast_a.category as u8, ref_a.0, "deal {}: {:?}", i, a);
        assert_eq!(
            compare_hands(&fast_a, &fast_b),
            ref_a.cmp(&ref_b),
            "deal {}: {:?} vs {:?}",
            i,
            a,
            b
        );
    }
}
