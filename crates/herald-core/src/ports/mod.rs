//! Ports - seams between the queue and the outside world.
//!
//! Every collaborator the queue talks to is a trait here, so the queue can
//! be built with fakes in tests and real implementations in the binary.

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod media_store;
pub mod publish_client;
pub mod timer;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::{EventSink, NoopEventSink};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::media_store::MediaStore;
pub use self::publish_client::{Delivered, PublishClient};
pub use self::timer::Timer;
