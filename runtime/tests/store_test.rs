//! Integration tests for the Store: effect feedback, cascading handles,
//! interval timers and shutdown.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use pickup_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec, TimerId};
use pickup_runtime::{Store, StoreError};
use std::time::Duration;

const TICKER: TimerId = TimerId::new("ticker");
const COUNTDOWN: TimerId = TimerId::new("countdown");

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start a three step chain of futures
    StartChain,
    /// One step of the chain finished
    StepCompleted { step: u32 },
    /// Chain finished (terminal action)
    ChainCompleted,
    /// Start the repeating ticker
    StartTicker,
    /// Stop the repeating ticker
    StopTicker,
    /// Emitted by the ticker
    Tick,
    /// Start a countdown that stops itself after two ticks
    StartCountdown,
    /// Emitted by the countdown
    CountdownTick,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    steps: Vec<u32>,
    ticks: u32,
    completed: bool,
    countdown: u32,
    expired: bool,
}

struct TestEnvironment;

struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::StartChain => {
                state.steps.clear();
                smallvec![Effect::future(async {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Some(TestAction::StepCompleted { step: 1 })
                })]
            },
            TestAction::StepCompleted { step } => {
                state.steps.push(step);
                smallvec![Effect::future(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    if step < 3 {
                        Some(TestAction::StepCompleted { step: step + 1 })
                    } else {
                        Some(TestAction::ChainCompleted)
                    }
                })]
            },
            TestAction::ChainCompleted => {
                state.completed = true;
                smallvec![Effect::None]
            },
            TestAction::StartTicker => smallvec![Effect::Interval {
                id: TICKER,
                period: Duration::from_secs(1),
                action: Box::new(TestAction::Tick),
            }],
            TestAction::StopTicker => smallvec![Effect::CancelInterval(TICKER)],
            TestAction::Tick => {
                state.ticks += 1;
                smallvec![Effect::None]
            },
            TestAction::StartCountdown => smallvec![Effect::Interval {
                id: COUNTDOWN,
                period: Duration::from_secs(1),
                action: Box::new(TestAction::CountdownTick),
            }],
            TestAction::CountdownTick => {
                state.countdown += 1;
                if state.countdown < 2 {
                    return smallvec![Effect::None];
                }
                state.expired = true;
                smallvec![Effect::CancelInterval(COUNTDOWN)]
            },
        }
    }
}

fn store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

// ============================================================================
// Effects
// ============================================================================

#[tokio::test]
async fn handle_waits_for_whole_feedback_chain() {
    let store = store();

    let mut handle = store.send(TestAction::StartChain).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .unwrap();

    let (steps, completed) = store.state(|s| (s.steps.clone(), s.completed)).await;
    assert_eq!(steps, vec![1, 2, 3]);
    assert!(completed);
}

#[tokio::test]
async fn send_and_wait_for_returns_terminal_action() {
    let store = store();

    let terminal = store
        .send_and_wait_for(
            TestAction::StartChain,
            |a| matches!(a, TestAction::ChainCompleted),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert_eq!(terminal, TestAction::ChainCompleted);
}

#[tokio::test]
async fn send_and_wait_for_times_out_without_match() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::ChainCompleted,
            |a| matches!(a, TestAction::Tick),
            Duration::from_millis(50),
        )
        .await;

    assert_eq!(result, Err(StoreError::Timeout));
}

// ============================================================================
// Timers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn interval_dispatches_every_period() {
    let store = store();
    store.send(TestAction::StartTicker).await.unwrap();
    assert!(store.timer_running(TICKER));

    tokio::time::sleep(Duration::from_millis(3500)).await;

    assert_eq!(store.state(|s| s.ticks).await, 3);
}

#[tokio::test(start_paused = true)]
async fn restarting_interval_replaces_running_timer() {
    let store = store();
    store.send(TestAction::StartTicker).await.unwrap();
    store.send(TestAction::StartTicker).await.unwrap();
    assert_eq!(store.active_timers(), 1);

    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert_eq!(store.state(|s| s.ticks).await, 2);
}

#[tokio::test(start_paused = true)]
async fn cancelled_interval_stops_dispatching() {
    let store = store();
    store.send(TestAction::StartTicker).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    store.send(TestAction::StopTicker).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(store.state(|s| s.ticks).await, 1);
    assert_eq!(store.active_timers(), 0);
}

#[tokio::test]
async fn cancelling_unknown_interval_is_noop() {
    let store = store();
    let mut handle = store.send(TestAction::StopTicker).await.unwrap();
    handle.wait().await;
    assert_eq!(store.active_timers(), 0);
}

// ============================================================================
// Action observers
// ============================================================================

#[tokio::test]
async fn feedback_actions_are_observed_after_they_are_applied() {
    let store = store();
    let mut actions = store.subscribe_actions();
    store.send(TestAction::StartChain).await.unwrap();

    let first = actions.recv().await.unwrap();
    assert_eq!(first, TestAction::StepCompleted { step: 1 });
    assert_eq!(store.state(|s| s.steps.clone()).await, vec![1]);
}

#[tokio::test(start_paused = true)]
async fn self_cancelling_tick_is_observed_with_its_state() {
    let store = store();
    let mut actions = store.subscribe_actions();
    store.send(TestAction::StartCountdown).await.unwrap();

    assert_eq!(actions.recv().await.unwrap(), TestAction::CountdownTick);
    assert!(!store.state(|s| s.expired).await);

    assert_eq!(actions.recv().await.unwrap(), TestAction::CountdownTick);
    assert!(store.state(|s| s.expired).await);
    assert!(!store.timer_running(COUNTDOWN));
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn shutdown_stops_timers_and_rejects_actions() {
    let store = store();
    store.send(TestAction::StartTicker).await.unwrap();

    store.shutdown(Duration::from_secs(1)).await.unwrap();

    assert_eq!(store.active_timers(), 0);
    assert_eq!(
        store.send(TestAction::Tick).await.unwrap_err(),
        StoreError::ShutdownInProgress
    );
}
