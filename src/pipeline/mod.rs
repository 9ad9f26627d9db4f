//! The scaffolding pipeline: ingest → split → (cluster → recovery →
//! orientation → repeat filter → reframe → verify → scaffold)* → driver.
//! One module per §4 component.

pub mod cluster;
pub mod driver;
pub mod ingest;
pub mod orientation;
pub mod recovery;
pub mod reframe;
pub mod repeat;
pub mod scaffold;
pub mod split;
pub mod verify;
