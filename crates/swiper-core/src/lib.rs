#![forbid(unsafe_code)]

//! Carousel/pager core: drag-driven paging, velocity flings, loop
//! wraparound, and mutually exclusive terminal animations, publishing
//! per-tick page progress for indicator widgets to mirror.
//!
//! The pipeline: pointer input flows through [`gesture::DragController`]
//! into [`SwiperCore::update_offset`]; on release the core picks exactly
//! one terminal animation via [`coordinator::AnimationCoordinator`]; every
//! tick recomputes pane positions through [`pane::PaneGeometryModel`] and
//! [`loop_index::LoopIndexMapper`], then notifies observers through
//! [`hub::ChangeEventHub`].
//!
//! Everything runs single-threaded and frame-driven: the core never sleeps,
//! never spawns threads, and only asks the host for frame callbacks through
//! the [`scheduler::FrameScheduler`] abstraction.

pub mod animation;
pub mod arena;
pub mod config;
pub mod coordinator;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod hub;
pub mod loop_index;
pub mod pane;
pub mod scheduler;
pub mod swiper;
pub mod transition;

pub use config::{EdgeEffect, GestureConfig, SpringParams, SwiperConfig};
pub use coordinator::AnimationKind;
pub use event::{NavKey, PointerEvent, PointerKind, SourceKind};
pub use geometry::{Axis, Point, Span};
pub use hub::{EventKind, SubscriberToken, SwiperEvent};
pub use loop_index::{Direction, GhostPaneSet, LoopIndexMapper};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use swiper::SwiperCore;
pub use transition::{CustomTransition, TransitionProxy};
