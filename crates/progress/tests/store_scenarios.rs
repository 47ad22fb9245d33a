//! End-to-end scenarios against a fresh store.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use walkschool_core::{find_quiz, Coordinate, QuizSession, SessionStep, ShopCategory, ShopItem};
use walkschool_progress::{Clock, FixedClock, ProgressError, ProgressStore, QuizCompletion};

/// Clock whose day the test advances by hand.
struct SteppingClock(Rc<Cell<NaiveDate>>);

impl Clock for SteppingClock {
    fn today(&self) -> NaiveDate {
        self.0.get()
    }

    fn now(&self) -> DateTime<Utc> {
        self.0.get().and_time(NaiveTime::MIN).and_utc()
    }
}

fn fresh_store() -> ProgressStore {
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    ProgressStore::new().with_clock(FixedClock::new(today))
}

fn fox() -> ShopItem {
    ShopItem {
        id: "fox",
        name: "Fox",
        emoji: "🦊",
        price: 30,
        category: ShopCategory::Pets,
    }
}

#[test]
fn ledger_is_the_plain_sum_of_amounts() {
    let mut store = fresh_store();
    let amounts = [10, -25, 7, 0, -3, 40];
    for amount in amounts {
        store.add_points(amount);
    }
    assert_eq!(store.points(), amounts.iter().sum::<i64>());
    assert_eq!(store.points(), 29);

    // Going below zero through the primitive is allowed.
    store.add_points(-100);
    assert_eq!(store.points(), -71);
}

#[test]
fn repeated_purchase_never_double_charges() {
    let mut store = fresh_store();
    store.add_points(100);
    let item = fox();

    store.purchase_item(&item).unwrap();
    assert_eq!(store.points(), 70);

    for _ in 0..3 {
        assert_eq!(
            store.purchase_item(&item),
            Err(ProgressError::AlreadyOwned("fox".to_string()))
        );
        assert_eq!(store.points(), 70);
    }
}

#[test]
fn saving_short_drafts_fails_without_side_effects() {
    let mut store = fresh_store();

    store.start_draft_route();
    assert_eq!(
        store.save_draft_route(),
        Err(ProgressError::InsufficientWaypoints { required: 2, actual: 0 })
    );

    store.add_waypoint(Coordinate::new(54.2861, 10.2219));
    assert_eq!(
        store.save_draft_route(),
        Err(ProgressError::InsufficientWaypoints { required: 2, actual: 1 })
    );

    assert!(store.saved_routes().is_empty());
    assert_eq!(store.draft_waypoints().len(), 1);
    assert!(store.is_drafting());
}

#[test]
fn saving_a_valid_draft_appends_one_route_and_clears_the_draft() {
    let mut store = fresh_store();
    let path = [
        Coordinate::new(54.2861, 10.2219),
        Coordinate::new(54.2870, 10.2240),
        Coordinate::new(54.2885, 10.2262),
    ];

    store.start_draft_route();
    for point in path {
        store.add_waypoint(point);
    }
    let id = store.save_draft_route().unwrap();

    assert_eq!(store.saved_routes().len(), 1);
    let route = store.route(id).unwrap();
    assert_eq!(route.name, "Route 1");
    assert_eq!(route.date, "10/16/2026");
    assert_eq!(route.waypoints, path);
    assert!(store.draft_waypoints().is_empty());
    assert!(!store.is_drafting());
}

#[test]
fn three_arrivals_unlock_all_achievements() {
    let mut store = fresh_store();

    let mut unlocked_per_call = Vec::new();
    for _ in 0..3 {
        let outcome = store.record_arrival();
        unlocked_per_call.push(outcome.newly_unlocked);
    }

    assert_eq!(unlocked_per_call, vec![vec![0], vec![1], vec![2]]);
    assert_eq!(store.arrival_count(), 3);
    assert_eq!(
        store.unlocked_achievements().iter().copied().collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(store.points(), 15);

    let recent: Vec<_> = store.recent_routes().collect();
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|entry| entry.points == 5));
}

#[test]
fn recent_routes_are_most_recent_first() {
    let day = Rc::new(Cell::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()));
    let mut store = ProgressStore::new().with_clock(SteppingClock(day.clone()));

    for _ in 0..3 {
        store.record_arrival();
        day.set(day.get().succ_opt().unwrap());
    }

    let dates: Vec<&str> = store.recent_routes().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["10/16/2026", "10/15/2026", "10/14/2026"]);
}

#[test]
fn quiz_points_are_awarded_once() {
    let mut store = fresh_store();

    assert_eq!(
        store.complete_quiz("q1", 10),
        QuizCompletion::FirstTime { points_awarded: 10 }
    );
    assert_eq!(store.points(), 10);

    assert_eq!(store.complete_quiz("q1", 10), QuizCompletion::AlreadyCompleted);
    assert_eq!(store.points(), 10);
    assert!(store.is_quiz_completed("q1"));
}

#[test]
fn go_to_school_needs_a_school_route() {
    let mut store = fresh_store();
    assert_eq!(store.request_go_to_school(), Err(ProgressError::NoSchoolRouteSet));
    assert!(!store.show_school_route());

    store.start_draft_route();
    store.add_waypoint(Coordinate::new(54.2861, 10.2219));
    store.add_waypoint(Coordinate::new(54.2885, 10.2262));
    let r1 = store.save_draft_route().unwrap();

    store.select_route_for_display(r1);
    store.set_school_route(r1);
    assert_eq!(store.request_go_to_school(), Ok(()));
    assert!(store.show_school_route());
    assert_eq!(store.viewed_route_id(), None);
    assert_eq!(store.school_route_id(), Some(r1));
}

#[test]
fn fox_purchase_scenario() {
    let mut store = fresh_store();
    let item = fox();

    let err = store.purchase_item(&item).unwrap_err();
    assert_eq!(err, ProgressError::InsufficientPoints { price: 30, balance: 0 });
    assert_eq!(err.shortfall(), Some(30));

    store.add_points(30);
    store.purchase_item(&item).unwrap();
    assert_eq!(store.points(), 0);
    assert!(store.owns_item("fox"));

    assert_eq!(
        store.purchase_item(&item),
        Err(ProgressError::AlreadyOwned("fox".to_string()))
    );
    assert_eq!(store.points(), 0);
}

#[test]
fn finishing_a_quiz_session_pays_out_once() {
    let mut store = fresh_store();
    let quiz = find_quiz("air-pollution").unwrap();

    for run in 0..2 {
        let mut session = QuizSession::new(quiz);
        let step = loop {
            let slide = session.current_slide().unwrap();
            session.select_answer(slide.correct).unwrap();
            match session.next().unwrap() {
                SessionStep::Advanced { .. } => continue,
                finished => break finished,
            }
        };
        assert_eq!(step, SessionStep::Finished { correct_answers: 3, total: 3 });

        let completion = store.complete_quiz(quiz.id, quiz.points);
        if run == 0 {
            assert_eq!(completion, QuizCompletion::FirstTime { points_awarded: 10 });
        } else {
            assert_eq!(completion, QuizCompletion::AlreadyCompleted);
        }
    }

    assert_eq!(store.points(), 10);
}

#[test]
fn arrivals_fund_purchases_from_the_catalog() {
    let mut store = fresh_store();
    let bone = walkschool_core::find_shop_item("acc10").unwrap();

    store.record_arrival();
    store.purchase_item(bone).unwrap();

    assert_eq!(store.points(), 0);
    assert_eq!(store.purchased_items().collect::<Vec<_>>(), vec!["acc10"]);
}
