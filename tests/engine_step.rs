// tests/engine_step.rs

//! Stepping behaviour of the pure choreographer core, without any runtime.

use std::sync::Arc;

use patter::catalog::Catalog;
use patter::engine::{Choreographer, CoreEffect, CoreStep, EngineNotice};
use patter::model::{DanceSession, substitute_option_prefix};
use patter_test_utils::builders::{CollectionBuilder, ModuleBuilder};
use patter_test_utils::init_tracing;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Squared set plus one home->home module of three calls.
fn home_loop_catalog() -> Catalog {
    CollectionBuilder::new("test")
        .squared_set()
        .family("f1", "Patter")
        .call("c1", "Heads Square Thru 4", 10, "f1")
        .call("c2", "Right and Left Thru", 8, "f1")
        .call("c3", "Allemande Left", 8, "f1")
        .module(
            ModuleBuilder::new("m-home", "Home Loop")
                .call("c1")
                .call("c2")
                .call("c3")
                .build(),
        )
        .build_catalog()
}

fn session(continuation_probability: u32) -> DanceSession {
    DanceSession {
        continuation_probability,
        ..DanceSession::default()
    }
}

fn core_with(catalog: Catalog, session: DanceSession, seed: u64) -> Choreographer {
    let mut core = Choreographer::new(Arc::new(catalog), session, seed);
    core.activate_criteria();
    core
}

fn emitted_future(step: &CoreStep) -> Option<String> {
    step.effects.iter().rev().find_map(|effect| match effect {
        CoreEffect::Calls(calls) => calls.future.as_ref().map(|c| c.command.clone()),
        _ => None,
    })
}

#[test]
fn begin_tip_notifies_empty_call_list_then_empty_stack() {
    init_tracing();
    let mut core = core_with(home_loop_catalog(), session(0), 7);

    let step = core.begin_tip();
    assert_eq!(step.effects.len(), 2);
    assert!(matches!(
        &step.effects[0],
        CoreEffect::Calls(calls) if calls.past.is_empty() && calls.now.is_none() && calls.future.is_none()
    ));
    assert!(matches!(&step.effects[1], CoreEffect::Stack(stack) if stack.is_empty()));
    assert!(core.have_active_tip());
}

#[test]
fn module_of_three_calls_takes_three_steps_with_positions_in_order() {
    init_tracing();
    let mut core = core_with(home_loop_catalog(), session(0), 7);
    core.begin_tip();
    core.resume();

    let step1 = core.step();
    assert_eq!(emitted_future(&step1).as_deref(), Some("Heads Square Thru 4"));
    assert_eq!(core.stack_view()[0].seq_pos, Some(0));
    // Nothing is dancing yet, so the pacer waits a single beat.
    assert_eq!(step1.wait_beats, Some(1));

    let step2 = core.step();
    assert_eq!(emitted_future(&step2).as_deref(), Some("Right and Left Thru"));
    assert_eq!(core.stack_view()[0].seq_pos, Some(1));
    // The first call is now being danced.
    assert_eq!(step2.wait_beats, Some(10));

    let step3 = core.step();
    assert_eq!(emitted_future(&step3).as_deref(), Some("Allemande Left"));
    // Last call: the frame popped, the tip resolved home, so the machine is
    // draining toward a pause.
    assert!(core.stack_view().is_empty());
    assert_eq!(step3.wait_beats, Some(8));
    assert!(core.is_running());
}

#[test]
fn resolved_tip_drains_and_lands_paused_with_an_empty_stack() {
    init_tracing();
    let mut core = core_with(home_loop_catalog(), session(0), 7);
    core.begin_tip();
    core.resume();

    let mut steps = 0;
    loop {
        let step = core.step();
        steps += 1;
        assert!(steps <= 20, "tip should wind down");
        if step.wait_beats.is_none() {
            // The final drain tick still notifies the run-state stream.
            assert!(
                step.effects
                    .iter()
                    .any(|e| matches!(e, CoreEffect::Running(false)))
            );
            break;
        }
    }

    // Three calls plus two drain ticks.
    assert_eq!(steps, 5);
    assert!(!core.is_running());
    assert!(core.stack_view().is_empty());
    assert!(core.calls().now.is_none());
    assert!(core.calls().future.is_none());
    assert_eq!(core.calls().past.len(), 3);
}

#[test]
fn stack_notification_follows_the_call_that_starts_the_module() {
    init_tracing();
    let mut core = core_with(home_loop_catalog(), session(0), 7);
    core.begin_tip();
    core.resume();

    let step = core.step();
    let calls_index = step
        .effects
        .iter()
        .position(|e| matches!(e, CoreEffect::Calls(_)))
        .expect("call event");
    let stack_index = step
        .effects
        .iter()
        .position(|e| matches!(e, CoreEffect::Stack(_)))
        .expect("stack event");
    assert!(calls_index < stack_index);

    // Mid-module steps do not re-notify the stack.
    let step2 = core.step();
    assert!(
        !step2
            .effects
            .iter()
            .any(|e| matches!(e, CoreEffect::Stack(_)))
    );
}

#[test]
fn content_gap_pauses_without_scheduling_another_tick() {
    init_tracing();
    // The only module starts away from home, so the empty stack can never
    // be filled.
    let catalog = CollectionBuilder::new("test")
        .squared_set()
        .formation("FL", "FL", "Facing Lines")
        .family("f1", "Patter")
        .call("c1", "Pass Thru", 4, "f1")
        .module(
            ModuleBuilder::new("m", "Stranded")
                .from_formation("FL")
                .to_formation("FL")
                .call("c1")
                .build(),
        )
        .build_catalog();

    let mut core = core_with(catalog, session(0), 7);
    core.begin_tip();
    core.resume();

    let step = core.step();
    assert!(step.wait_beats.is_none());
    assert!(!core.is_running());
    assert!(core.stack_view().is_empty());

    let gap = step
        .effects
        .iter()
        .find_map(|e| match e {
            CoreEffect::Notice(notice @ EngineNotice::ContentGap { .. }) => Some(notice.clone()),
            _ => None,
        })
        .expect("a content gap notice");
    let EngineNotice::ContentGap {
        formation,
        abbreviation,
    } = gap
    else {
        unreachable!()
    };
    assert_eq!(formation, "S");
    assert_eq!(abbreviation, "SS");

    assert!(
        step.effects
            .iter()
            .any(|e| matches!(e, CoreEffect::Running(false)))
    );
}

#[test]
fn a_selection_failure_mid_tip_still_emits_the_last_call_then_pauses() {
    init_tracing();
    // The opener leads to a formation nothing starts from.
    let catalog = CollectionBuilder::new("test")
        .squared_set()
        .formation("FL", "FL", "Facing Lines")
        .family("f1", "Patter")
        .call("c1", "Heads Square Thru 4", 10, "f1")
        .module(
            ModuleBuilder::new("m", "Dead End")
                .to_formation("FL")
                .call("c1")
                .build(),
        )
        .build_catalog();

    let mut core = core_with(catalog, session(100), 7);
    core.begin_tip();
    core.resume();

    let step = core.step();
    // The module's only call still went out before the gap was hit.
    assert_eq!(emitted_future(&step).as_deref(), Some("Heads Square Thru 4"));
    assert!(
        step.effects
            .iter()
            .any(|e| matches!(e, CoreEffect::Notice(EngineNotice::ContentGap { formation, .. }) if formation == "FL"))
    );
    assert!(step.wait_beats.is_none());
    assert!(!core.is_running());
}

#[test]
fn play_module_loops_the_same_module_and_pauses() {
    init_tracing();
    let catalog = home_loop_catalog();
    let mut core = Choreographer::new(Arc::new(catalog), session(0), 7);
    // No activate_criteria: single-module practice must not need the pool.

    core.play_module_id("m-home");
    assert!(core.have_choreography());
    core.resume();

    core.step();
    core.step();
    core.step();

    // The frame popped and the same module was re-pushed, unstarted.
    let stack = core.stack_view();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].module, "m-home");
    assert_eq!(stack[0].seq_pos, None);

    // Drain to the pause instead of selecting a next module.
    let mut steps = 0;
    while core.is_running() {
        core.step();
        steps += 1;
        assert!(steps <= 5, "loop mode should pause after one pass");
    }
    assert_eq!(core.calls().past.len(), 3);

    // Resuming dances the very same module again.
    core.resume();
    let step = core.step();
    assert_eq!(emitted_future(&step).as_deref(), Some("Heads Square Thru 4"));
}

#[test]
fn play_module_with_unknown_id_is_ignored() {
    init_tracing();
    let mut core = core_with(home_loop_catalog(), session(0), 7);
    let step = core.play_module_id("no-such-module");
    assert!(step.effects.is_empty());
    assert!(core.stack_view().is_empty());
}

#[test]
fn end_tip_forces_a_pause_and_clears_everything() {
    init_tracing();
    let mut core = core_with(home_loop_catalog(), session(0), 7);
    core.begin_tip();
    core.resume();
    core.step();

    let step = core.end_tip();
    assert!(matches!(&step.effects[0], CoreEffect::Running(false)));
    assert!(!core.is_running());
    assert!(!core.have_active_tip());
    assert!(core.stack_view().is_empty());
    assert!(core.calls().future.is_none());
}

#[test]
fn alt_command_substitution_is_deterministic_under_a_seed() {
    init_tracing();
    let build = || {
        CollectionBuilder::new("test")
            .squared_set()
            .family("f1", "Patter")
            .call("c1", "Square Thru 4", 10, "f1")
            .module(
                ModuleBuilder::new("m", "Alt")
                    .alt_call("c1", "(Heads/Sides) Square Thru 4")
                    .build(),
            )
            .build_catalog()
    };

    let emit_first = |seed: u64| {
        let mut core = core_with(build(), session(0), seed);
        core.begin_tip();
        core.resume();
        emitted_future(&core.step()).expect("a call is emitted")
    };

    let text = emit_first(5);
    assert!(
        text == "Heads Square Thru 4" || text == "Sides Square Thru 4",
        "unexpected substitution: {text}"
    );
    assert_eq!(text, emit_first(5));
}

#[test]
fn option_prefix_substitution_picks_one_side() {
    let mut rng = SmallRng::seed_from_u64(1);
    let resolved = substitute_option_prefix("(Heads/Sides) Pass Thru", &mut rng);
    assert!(resolved == "Heads Pass Thru" || resolved == "Sides Pass Thru");
}

#[test]
fn text_without_an_option_prefix_passes_through() {
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(
        substitute_option_prefix("Allemande Left", &mut rng),
        "Allemande Left"
    );
}

#[test]
fn concurrent_calls_are_suffixed() {
    init_tracing();
    let catalog = CollectionBuilder::new("test")
        .squared_set()
        .family("f1", "Patter")
        .call("c1", "Centers Square Thru 4", 10, "f1")
        .call("c2", "Ends Star Thru", 6, "f1")
        .module(
            ModuleBuilder::new("m", "Split")
                .concurrent_call("c1")
                .call("c2")
                .build(),
        )
        .build_catalog();

    let mut core = core_with(catalog, session(0), 7);
    core.begin_tip();
    core.resume();

    let step = core.step();
    assert_eq!(
        emitted_future(&step).as_deref(),
        Some("Centers Square Thru 4 and...")
    );
}
