//! # Smart Entry Testing
//!
//! Testing utilities for the Smart Entry client reducers.
//!
//! The main entry point is [`ReducerTest`], a fluent Given-When-Then
//! builder for exercising a reducer without a store or a network:
//!
//! ```ignore
//! use smart_entry_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(SearchReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SearchState::default())
//!     .when_action(SearchAction::Search { term: "  ".into() })
//!     .then_state(|state| assert!(state.status.is_some()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};
