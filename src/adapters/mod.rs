//! Port implementations: live services, recording wrappers, and cassette
//! replay.

pub mod live;
pub mod recording;
pub mod replaying;
