pub mod source;

pub use source::{
    LocationSource, LocationSourceFactory, LocationSourceKind, RandomWalkSource, ScriptedSource,
    RANDOM_WALK_STEP_DEGREES,
};
