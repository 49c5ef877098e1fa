pub mod classify;
pub mod cluster;
pub mod detect;
pub mod due;
pub mod frequency;
pub mod normalize;
pub mod policy;
pub mod quick;
pub mod sameday;
pub mod status;
pub mod synthesize;
