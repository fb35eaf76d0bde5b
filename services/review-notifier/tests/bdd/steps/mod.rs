//! BDD step definitions for the review notifier

pub mod parsing_steps;
