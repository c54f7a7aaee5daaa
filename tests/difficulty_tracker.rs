// tests/difficulty_tracker.rs

use patter::choreo::RunningAverage;

#[test]
fn average_of_nothing_is_none() {
    let avg = RunningAverage::new();
    assert_eq!(avg.current(), None);
}

#[test]
fn average_of_added_points() {
    let mut avg = RunningAverage::new();
    avg.add(2.0);
    avg.add(4.0);
    assert_eq!(avg.current(), Some(3.0));
}

#[test]
fn hypothetical_does_not_mutate() {
    let mut avg = RunningAverage::new();
    avg.add(2.0);

    let hypothetical = avg.hypothetical(4.0);
    assert_eq!(hypothetical, 3.0);
    assert_eq!(avg.current(), Some(2.0));
}

#[test]
fn adding_the_hypothetical_value_matches() {
    let mut avg = RunningAverage::new();
    avg.add(1.0);
    avg.add(3.0);

    let hypothetical = avg.hypothetical(4.0);
    avg.add(4.0);
    assert_eq!(avg.current(), Some(hypothetical));
}

#[test]
fn hypothetical_with_no_data_is_the_value_itself() {
    let avg = RunningAverage::new();
    assert_eq!(avg.hypothetical(3.0), 3.0);
}

#[test]
fn reset_clears_all_state() {
    let mut avg = RunningAverage::new();
    avg.add(4.0);
    avg.add(4.0);

    avg.reset();
    assert_eq!(avg.current(), None);

    avg.add(1.0);
    assert_eq!(avg.current(), Some(1.0));
}
