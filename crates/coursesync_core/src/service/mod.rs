//! Use-case services built on the store and matcher.

pub mod assignment_service;
pub mod lesson_launch;
