use pokerlab_cli::run;
use pokerlab_engine::history::CompletedHand;
use serial_test::serial;
use std::fs;
use std::path::Path;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let argv = std::iter::once("pokerlab").chain(args.iter().copied());
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).to_string(),
        String::from_utf8_lossy(&err).to_string(),
    )
}

fn read_hands(path: &Path) -> Vec<CompletedHand> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid hand record"))
        .collect()
}

#[test]
#[serial]
fn sim_writes_one_record_per_hand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("sim.jsonl");
    let (code, stdout, stderr) = run_cli(&[
        "sim",
        "--hands",
        "5",
        "--players",
        "4",
        "--seed",
        "1",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "{stderr}");

    let hands = read_hands(&path);
    assert!(stdout.contains(&format!("Simulated: {} hands", hands.len())));
    assert!(!hands.is_empty() && hands.len() <= 5);

    for (i, hand) in hands.iter().enumerate() {
        assert_eq!(hand.hand_number, i as u64 + 1);
        assert_eq!(hand.seed, Some(1));
        let (date, seq) = hand.hand_id.split_once('-').expect("hand id format");
        assert_eq!(date.len(), 8);
        assert_eq!(seq, format!("{:06}", i + 1));
        assert_eq!(hand.results.iter().map(|r| r.net).sum::<i64>(), 0);
        let paid: u64 = hand
            .awards
            .iter()
            .flat_map(|a| a.shares.iter())
            .map(|(_, chips)| *chips as u64)
            .sum();
        assert_eq!(paid, hand.total_pot());
    }
}

#[test]
#[serial]
fn same_seed_same_hands() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    for path in [&a, &b] {
        let (code, _, stderr) = run_cli(&[
            "sim",
            "--hands",
            "20",
            "--players",
            "6",
            "--seed",
            "42",
            "--output",
            path.to_str().unwrap(),
        ]);
        assert_eq!(code, 0, "{stderr}");
    }

    let strip = |hands: Vec<CompletedHand>| {
        hands
            .into_iter()
            .map(|h| (h.board, h.actions, h.results))
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(read_hands(&a)), strip(read_hands(&b)));
}

#[test]
#[serial]
fn sim_rejects_zero_hands() {
    let (code, _, stderr) = run_cli(&["sim", "--hands", "0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("hands must be >= 1"));
}

#[test]
#[serial]
fn eval_reports_category() {
    let (code, stdout, _) = run_cli(&["eval", "7c 7d 7h Ks Kd"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Full House"));

    let (code, _, stderr) = run_cli(&["eval", "7c"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("expected 2 to 7 cards"));
}
