use std::time::Duration;
use sudoku_actors::sudoku::geometry::GroupId;
use sudoku_actors::sudoku::puzzle::EXAMPLE_NINE;
use sudoku_actors::sudoku::{
    Board, ClueOrder, EngineConfig, GroupKind, Puzzle, PuzzleError, Resolution, Size, solve,
};

const EASY: &str =
    "..2.3...8.....8....31.2.....6..5.27..1.....5.2.4.6..31....8.6.5.......13..531.4..";

const EASY_SOLVED: &str = "\
672435198
549178362
831629547
368951274
917243856
254867931
193784625
486592713
725316489
";

const NINE_SOLVED: &str = "\
534678912
672195348
198342567
859761423
426853791
713924856
961537284
287419635
345286179
";

/// Needs more than singles after the first few deductions.
const HARD: &str =
    "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..";

async fn run(input: &str, config: EngineConfig) -> Resolution {
    let puzzle = Puzzle::parse(input, config.size).unwrap();
    tokio::time::timeout(Duration::from_secs(30), solve(&puzzle, &config))
        .await
        .expect("network did not go quiet")
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_solves_easy_puzzle() {
    let resolution = run(EASY, EngineConfig::default()).await;
    let solution = &resolution.solution;

    assert_eq!(solution.to_string(), EASY_SOLVED);
    assert!(solution.is_complete());
    assert!(solution.verify(&Puzzle::parse(EASY, Size::Nine).unwrap()));
    assert_eq!(solution.tally(), (81, 648, 0));
    assert_eq!(resolution.stats.actors, 729 + 324);
    assert_eq!(resolution.stats.verdicts, 324);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_solves_board_example() {
    let puzzle = Puzzle::try_from(&Board::from(&EXAMPLE_NINE)).unwrap();
    let resolution = solve(&puzzle, &EngineConfig::default()).await.unwrap();
    assert_eq!(resolution.solution.to_string(), NINE_SOLVED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_solved_input_is_returned_unchanged() {
    let resolution = run(NINE_SOLVED, EngineConfig::default()).await;
    assert_eq!(resolution.solution.to_string(), NINE_SOLVED);
    assert_eq!(resolution.stats.clues, 81);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_runs_agree() {
    let first = run(EASY, EngineConfig::default()).await.solution;
    for _ in 0..3 {
        let again = run(EASY, EngineConfig::default()).await.solution;
        assert_eq!(again, first);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clue_order_does_not_change_the_grid() {
    let sequential = run(HARD, EngineConfig::default()).await.solution;
    for seed in [1, 7, 42, 1234] {
        let config = EngineConfig::default().with_clue_order(ClueOrder::Shuffled(seed));
        let shuffled = run(HARD, config).await.solution;
        assert_eq!(shuffled.to_line(), sequential.to_line(), "seed {seed}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hard_puzzle_stops_partially_solved() {
    let puzzle = Puzzle::parse(HARD, Size::Nine).unwrap();
    let resolution = run(HARD, EngineConfig::default()).await;
    let solution = &resolution.solution;

    assert!(!solution.is_complete());
    assert!(solution.to_string().contains('.'));
    assert!(solution.verify(&puzzle));
    for clue in puzzle.clues() {
        assert_eq!(solution.cell(clue.row, clue.column), Some(clue.digit));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_empty_puzzle_stays_empty() {
    let empty = ".".repeat(81);
    let resolution = run(&empty, EngineConfig::default()).await;
    assert_eq!(resolution.solution.to_line(), empty);
    assert_eq!(resolution.solution.tally(), (0, 0, 729));
    assert_eq!(resolution.stats.verdicts, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_group_has_exactly_one_true_member() {
    let solution = run(EASY, EngineConfig::default()).await.solution;
    let size = solution.size();

    let mut truths = vec![0usize; size.groups()];
    for id in size.all_hypotheses() {
        if solution.state(id).is_true() {
            for (group, _) in id.memberships(size) {
                truths[group.dense(size)] += 1;
            }
        }
    }
    for group in GroupId::all(size) {
        assert_eq!(truths[group.dense(size)], 1, "{group}");
    }
    assert_eq!(GroupId::all(size).filter(|g| g.kind == GroupKind::Cell).count(), 81);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_contradictory_clues_terminate() {
    let input = format!("11{}", ".".repeat(79));
    let puzzle = Puzzle::parse(&input, Size::Nine).unwrap();
    let solution = run(&input, EngineConfig::default()).await.solution;

    // The second clue may be refuted before it arrives; either way the grid is wrong.
    assert_eq!(solution.cell(0, 0), Some(0));
    assert!(!solution.verify(&puzzle));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_four_by_four_text() {
    let config = EngineConfig::new(Size::Four);
    let resolution = run("12.4 3.12 21.3 4.21", config).await;
    assert_eq!(resolution.solution.to_string(), "1234\n3412\n2143\n4321\n");
}

#[test]
fn test_wrong_length_is_rejected_before_solving() {
    for len in [80, 82] {
        let input = ".".repeat(len);
        let err = Puzzle::parse(&input, Size::Nine).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidLength { expected: 81, found } if found == len));
        assert!(err.to_string().starts_with("invalid puzzle length"));
    }
}

#[test]
fn test_unrecognized_characters_are_ignored() {
    let framed = EASY
        .as_bytes()
        .chunks(9)
        .map(|row| format!("| {} |", std::str::from_utf8(row).unwrap()))
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(
        Puzzle::parse(&framed, Size::Nine).unwrap(),
        Puzzle::parse(EASY, Size::Nine).unwrap()
    );
}
