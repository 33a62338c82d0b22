use pokerlab_engine::blinds::BlindSchedule;
use pokerlab_engine::game::{GameSession, TableConfig};
use pokerlab_engine::player::{ActionKind, PlayerStatus, SeatConfig};
use pokerlab_engine::pot::Pot;

fn table(stacks: &[u32], blinds: BlindSchedule) -> GameSession {
    let seats = stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| SeatConfig::human(format!("p{i}"), format!("P{i}")).with_stack(s))
        .collect();
    let config = TableConfig {
        blinds,
        seed: Some(21),
        ..TableConfig::default()
    };
    GameSession::new(config, seats).unwrap()
}

fn check_down(game: &mut GameSession) {
    while game.hand_in_progress() {
        let seat = game.to_act().unwrap();
        game.apply_action(seat, ActionKind::Call, 0)
            .into_result()
            .unwrap();
    }
}

fn total(game: &GameSession) -> u64 {
    game.players().iter().map(|p| p.stack() as u64).sum()
}

fn pot(amount: u32, eligible: &[usize]) -> Pot {
    Pot {
        amount,
        eligible: eligible.to_vec(),
    }
}

#[test]
fn big_blind_with_three_chips_goes_all_in() {
    let mut game = table(&[1000, 1000, 3], BlindSchedule::fixed(5, 10));
    let start = game.start_new_hand().unwrap();
    assert_eq!(start.posted.big, 3);
    assert_eq!(game.player(2).unwrap().status(), PlayerStatus::AllIn);
    // Callers still owe the full big blind.
    assert_eq!(game.current_bet(), 10);
    assert_eq!(game.legal_actions(0).unwrap().call_amount, 10);

    check_down(&mut game);
    let hand = game.last_completed_hand().unwrap();
    assert_eq!(hand.pots, vec![pot(9, &[0, 1, 2]), pot(14, &[0, 1])]);
    assert_eq!(total(&game), 2003);
    // The short stack can never win more than the main pot.
    assert!(game.player(2).unwrap().stack() <= 9);
}

#[test]
fn fourth_seat_posts_three_chip_big_blind() {
    let mut game = table(&[1000, 1000, 1000, 3], BlindSchedule::fixed(5, 10));
    // First hand: dealer 0, blinds on 1 and 2; everyone folds to the big blind.
    game.start_new_hand().unwrap();
    while game.hand_in_progress() {
        let seat = game.to_act().unwrap();
        game.apply_action(seat, ActionKind::Fold, 0).into_result().unwrap();
    }
    assert_eq!(game.player(3).unwrap().stack(), 3);

    let start = game.start_new_hand().unwrap();
    assert_eq!(start.positions.big_blind, 3);
    assert_eq!(start.posted.big, 3);
    assert_eq!(game.player(3).unwrap().status(), PlayerStatus::AllIn);

    check_down(&mut game);
    let hand = game.last_completed_hand().unwrap();
    // Main pot boundary at the 3-chip contribution level.
    assert_eq!(hand.pots[0], pot(12, &[0, 1, 2, 3]));
    assert_eq!(hand.pots[1], pot(21, &[0, 1, 2]));
    assert_eq!(total(&game), 3003);
}

#[test]
fn folding_to_short_big_blind_returns_unmatched_small_blind() {
    let mut game = table(&[1000, 1000, 1000, 3], BlindSchedule::fixed(5, 10));
    game.start_new_hand().unwrap();
    while game.hand_in_progress() {
        let seat = game.to_act().unwrap();
        game.apply_action(seat, ActionKind::Fold, 0).into_result().unwrap();
    }
    let before: Vec<u32> = game.players().iter().map(|p| p.stack()).collect();
    assert_eq!(before, vec![1000, 995, 1005, 3]);

    // Dealer 1, small blind 2 posts 5, big blind 3 is all-in for 3.
    game.start_new_hand().unwrap();
    while game.hand_in_progress() {
        let seat = game.to_act().unwrap();
        game.apply_action(seat, ActionKind::Fold, 0).into_result().unwrap();
    }

    let after: Vec<u32> = game.players().iter().map(|p| p.stack()).collect();
    assert_eq!(after, vec![1000, 995, 1002, 6]);
    let hand = game.last_completed_hand().unwrap();
    assert_eq!(hand.pots, vec![pot(6, &[3]), pot(2, &[2])]);
    assert_eq!(total(&game), 3003);
}

#[test]
fn short_small_blind_is_all_in_before_acting() {
    let mut game = table(&[1000, 3, 1000], BlindSchedule::fixed(5, 10));
    let start = game.start_new_hand().unwrap();
    assert_eq!(start.posted.small, 3);
    assert_eq!(game.to_act(), Some(0));
    game.apply_action(0, ActionKind::Call, 0).into_result().unwrap();
    // Small blind is skipped; big blind has the option.
    assert_eq!(game.to_act(), Some(2));
    check_down(&mut game);
    let hand = game.last_completed_hand().unwrap();
    assert_eq!(hand.pots, vec![pot(9, &[0, 1, 2]), pot(14, &[0, 2])]);
    assert_eq!(total(&game), 2003);
}

#[test]
fn both_blinds_all_in_runs_out_immediately() {
    let mut game = table(&[5, 10], BlindSchedule::fixed(5, 10));
    game.start_new_hand().unwrap();
    assert!(!game.hand_in_progress());
    let hand = game.last_completed_hand().unwrap();
    assert_eq!(hand.board.len(), 5);
    assert!(hand.actions.is_empty());
    assert_eq!(hand.pots, vec![pot(10, &[0, 1]), pot(5, &[1])]);
    assert_eq!(total(&game), 15);
}

#[test]
fn heads_up_short_big_blind_caps_the_contest() {
    let mut game = table(&[1000, 3], BlindSchedule::fixed(5, 10));
    game.start_new_hand().unwrap();
    assert_eq!(game.to_act(), Some(0));
    game.apply_action(0, ActionKind::Call, 0).into_result().unwrap();
    assert!(!game.hand_in_progress());

    let hand = game.last_completed_hand().unwrap();
    assert_eq!(hand.pots, vec![pot(6, &[0, 1]), pot(7, &[0])]);
    assert!(game.player(0).unwrap().stack() >= 997);
    assert_eq!(total(&game), 1003);
}

#[test]
fn all_in_caller_runs_board_out() {
    let mut game = table(&[1000, 1000, 1000], BlindSchedule::fixed(5, 10));
    game.start_new_hand().unwrap();
    game.apply_action(0, ActionKind::AllIn, 0).into_result().unwrap();
    game.apply_action(1, ActionKind::Fold, 0).into_result().unwrap();
    let outcome = game.apply_action(2, ActionKind::Call, 0).into_result().unwrap();
    assert!(outcome.hand_complete);
    let hand = game.last_completed_hand().unwrap();
    assert_eq!(hand.board.len(), 5);
    assert_eq!(hand.total_pot(), 2005);
    assert_eq!(total(&game), 3000);
}
