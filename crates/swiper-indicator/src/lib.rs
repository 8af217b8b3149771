#![forbid(unsafe_code)]

//! Indicator-side observers for the swiper carousel.
//!
//! Both models here are pure consumers of [`swiper_core::hub`] events: they
//! keep just enough state to render a dot indicator or tab-bar highlight in
//! lock-step with the carousel's continuous offset, and they never hold a
//! reference back to the core — the hub holds a weak reference to them, so
//! no ownership cycle exists between a carousel and its indicator.

pub mod dots;
pub mod tabbar;

pub use dots::DotIndicatorModel;
pub use tabbar::TabBarModel;
