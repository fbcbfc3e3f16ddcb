//! Given-When-Then harness for reducers
//!
//! A reducer is pure apart from its effects, so a test is one call to
//! `reduce` followed by checks on the new state, on the effect list, and on
//! the actions its futures feed back.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use pickup_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectsCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;
type FeedbackCheck<A> = Box<dyn FnOnce(&[A])>;

/// One reducer step under test
///
/// ```ignore
/// use pickup_testing::reducer_test::{assertions, ReducerTest};
///
/// ReducerTest::new(KioskReducer::new())
///     .with_env(env)
///     .given_state(state_with_cart())
///     .when_action(KioskAction::CreateReservation { customer })
///     .then_state(|state| assert!(state.reservation.is_creating()))
///     .then_feedback(|actions| {
///         assert!(matches!(actions, [KioskAction::OrderCreated { .. }]));
///     })
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    env: Option<R::Environment>,
    state: Option<R::State>,
    action: Option<R::Action>,
    state_checks: Vec<StateCheck<R::State>>,
    effects_checks: Vec<EffectsCheck<R::Action>>,
    feedback_checks: Vec<FeedbackCheck<R::Action>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Start a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            state: None,
            action: None,
            state_checks: Vec::new(),
            effects_checks: Vec::new(),
            feedback_checks: Vec::new(),
        }
    }

    /// Environment passed to `reduce`
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// State before the action
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.state = Some(state);
        self
    }

    /// The action to reduce
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Check the state after the action
    #[must_use]
    pub fn then_state(mut self, check: impl FnOnce(&R::State) + 'static) -> Self {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Check the returned effects without running them
    #[must_use]
    pub fn then_effects(mut self, check: impl FnOnce(&[Effect<R::Action>]) + 'static) -> Self {
        self.effects_checks.push(Box::new(check));
        self
    }

    /// Run the returned futures and check the actions they feed back
    ///
    /// Timers are not started; only `Future` effects run, in order.
    #[must_use]
    pub fn then_feedback(mut self, check: impl FnOnce(&[R::Action]) + 'static) -> Self {
        self.feedback_checks.push(Box::new(check));
        self
    }

    /// Reduce the action and run every check
    ///
    /// # Panics
    ///
    /// Panics if the state, action or environment is missing, or if a
    /// check fails.
    #[allow(clippy::expect_used)] // Missing setup is a broken test
    pub fn run(self) {
        let mut state = self.state.expect("given_state() was not called");
        let action = self.action.expect("when_action() was not called");
        let env = self.env.expect("with_env() was not called");

        let effects = self.reducer.reduce(&mut state, action, &env);

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effects_checks {
            check(&effects);
        }
        if !self.feedback_checks.is_empty() {
            let actions = feedback(effects);
            for check in self.feedback_checks {
                check(&actions);
            }
        }
    }
}

/// Drive every `Future` effect to completion and collect the actions they
/// return
///
/// Futures nested in `Parallel` run too. Intervals are ignored.
pub fn feedback<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
    let mut actions = Vec::new();
    for effect in effects {
        match effect {
            Effect::Future(fut) => actions.extend(tokio_test::block_on(fut)),
            Effect::Parallel(nested) => actions.extend(feedback(nested)),
            Effect::None | Effect::Interval { .. } | Effect::CancelInterval(_) => {},
        }
    }
    actions
}

/// Checks over a reducer's effect list
///
/// Effects nested in `Parallel` count as if returned directly.
pub mod assertions {
    use pickup_core::effect::{Effect, TimerId};

    fn flatten<A>(effects: &[Effect<A>]) -> Vec<&Effect<A>> {
        effects
            .iter()
            .flat_map(|effect| match effect {
                Effect::Parallel(nested) => flatten(nested),
                other => vec![other],
            })
            .collect()
    }

    /// Nothing to run: every effect is `Effect::None`
    ///
    /// # Panics
    ///
    /// Panics on any other effect.
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        let pending: Vec<_> = flatten(effects).into_iter().filter(|e| !e.is_none()).collect();
        assert!(pending.is_empty(), "expected no effects, got {pending:?}");
    }

    /// At least one backend call (a `Future` effect)
    ///
    /// # Panics
    ///
    /// Panics if there is none.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            flatten(effects).iter().any(|e| matches!(e, Effect::Future(_))),
            "expected a Future effect"
        );
    }

    /// Timer `id` is started
    ///
    /// # Panics
    ///
    /// Panics if no `Interval` effect names `id`.
    pub fn assert_starts_interval<A>(effects: &[Effect<A>], id: TimerId) {
        assert!(
            flatten(effects)
                .iter()
                .any(|e| matches!(e, Effect::Interval { id: started, .. } if *started == id)),
            "expected timer '{id}' to start"
        );
    }

    /// Timer `id` is stopped
    ///
    /// # Panics
    ///
    /// Panics if no `CancelInterval` effect names `id`.
    pub fn assert_cancels_interval<A>(effects: &[Effect<A>], id: TimerId) {
        assert!(
            flatten(effects)
                .iter()
                .any(|e| matches!(e, Effect::CancelInterval(stopped) if *stopped == id)),
            "expected timer '{id}' to stop"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use pickup_core::effect::TimerId;
    use pickup_core::{smallvec, SmallVec};
    use std::time::Duration;

    const HOLD: TimerId = TimerId::new("hold");

    /// A pickup hold that counts down in ticks
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    struct Hold {
        order: Option<String>,
        ticks_left: u32,
        notices: Vec<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum HoldAction {
        Reserve,
        Reserved { order: String },
        Tick,
        Release,
        Released,
    }

    struct Desk {
        order_id: &'static str,
        ticks: u32,
    }

    struct HoldReducer;

    impl Reducer for HoldReducer {
        type State = Hold;
        type Action = HoldAction;
        type Environment = Desk;

        fn reduce(&self, state: &mut Hold, action: HoldAction, env: &Desk) -> SmallVec<[Effect<HoldAction>; 4]> {
            match action {
                HoldAction::Reserve if state.order.is_some() => smallvec![Effect::None],
                HoldAction::Reserve => {
                    let order = env.order_id.to_string();
                    smallvec![Effect::future(async move { Some(HoldAction::Reserved { order }) })]
                },
                HoldAction::Reserved { order } => {
                    state.order = Some(order);
                    state.ticks_left = env.ticks;
                    smallvec![Effect::Interval {
                        id: HOLD,
                        period: Duration::from_secs(1),
                        action: Box::new(HoldAction::Tick),
                    }]
                },
                HoldAction::Tick => {
                    state.ticks_left = state.ticks_left.saturating_sub(1);
                    if state.ticks_left > 0 {
                        return smallvec![Effect::None];
                    }
                    state.order = None;
                    state.notices.push("Reservation expired".to_string());
                    smallvec![Effect::CancelInterval(HOLD)]
                },
                HoldAction::Release => smallvec![Effect::merge(vec![
                    Effect::CancelInterval(HOLD),
                    Effect::future(async { Some(HoldAction::Released) }),
                    Effect::future(async { None }),
                ])],
                HoldAction::Released => {
                    state.order = None;
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn desk() -> Desk {
        Desk { order_id: "A100", ticks: 3 }
    }

    fn held(ticks_left: u32) -> Hold {
        Hold {
            order: Some("A100".to_string()),
            ticks_left,
            notices: Vec::new(),
        }
    }

    #[test]
    fn reserve_feeds_back_the_backend_answer() {
        ReducerTest::new(HoldReducer)
            .with_env(desk())
            .given_state(Hold::default())
            .when_action(HoldAction::Reserve)
            .then_state(|state| assert_eq!(state.order, None))
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .then_feedback(|actions| {
                assert_eq!(actions, [HoldAction::Reserved { order: "A100".to_string() }]);
            })
            .run();
    }

    #[test]
    fn second_reserve_does_nothing() {
        ReducerTest::new(HoldReducer)
            .with_env(desk())
            .given_state(held(3))
            .when_action(HoldAction::Reserve)
            .then_state(|state| assert_eq!(*state, held(3)))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .then_feedback(|actions| assert!(actions.is_empty()))
            .run();
    }

    #[test]
    fn reserved_starts_the_countdown() {
        ReducerTest::new(HoldReducer)
            .with_env(desk())
            .given_state(Hold::default())
            .when_action(HoldAction::Reserved { order: "A100".to_string() })
            .then_state(|state| assert_eq!(*state, held(3)))
            .then_effects(|effects| assertions::assert_starts_interval(effects, HOLD))
            .run();
    }

    #[test]
    fn last_tick_expires_once_and_stops_the_timer() {
        ReducerTest::new(HoldReducer)
            .with_env(desk())
            .given_state(held(1))
            .when_action(HoldAction::Tick)
            .then_state(|state| {
                assert_eq!(state.order, None);
                assert_eq!(state.notices, ["Reservation expired"]);
            })
            .then_effects(|effects| assertions::assert_cancels_interval(effects, HOLD))
            .run();
    }

    #[test]
    fn feedback_runs_futures_nested_in_parallel() {
        ReducerTest::new(HoldReducer)
            .with_env(desk())
            .given_state(held(2))
            .when_action(HoldAction::Release)
            .then_effects(|effects| {
                assertions::assert_cancels_interval(effects, HOLD);
                assertions::assert_has_future_effect(effects);
            })
            .then_feedback(|actions| assert_eq!(actions, [HoldAction::Released]))
            .run();
    }

    #[test]
    #[should_panic(expected = "expected timer 'hold' to stop")]
    fn missing_cancel_is_reported() {
        ReducerTest::new(HoldReducer)
            .with_env(desk())
            .given_state(held(2))
            .when_action(HoldAction::Tick)
            .then_effects(|effects| assertions::assert_cancels_interval(effects, HOLD))
            .run();
    }

    #[test]
    #[should_panic(expected = "expected no effects")]
    fn pending_interval_is_not_mistaken_for_no_effects() {
        let effects = [Effect::merge(vec![
            Effect::None,
            Effect::Interval {
                id: HOLD,
                period: Duration::from_secs(1),
                action: Box::new(HoldAction::Tick),
            },
        ])];
        assertions::assert_no_effects(&effects);
    }
}
