//! Player actors: one task per seat, converting selection events into
//! token toggles and claims.

pub(crate) mod actor;

pub(crate) use actor::PlayerActor;
