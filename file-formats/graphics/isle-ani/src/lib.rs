//! Parser and writer for LEGO Island skeletal animation clips.
//!
//! Two layouts share one tree format:
//!
//! - standalone `.ani` files, opening with a magic word, a bounding sphere
//!   and an optional camera track
//! - the header-less tree embedded at the start of every world database
//!   model data block
//!
//! Keyframe data is exposed raw; evaluating animations is left to callers.
//!
//! # Examples
//!
//! ```no_run
//! use isle_ani::AnimationClip;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("pns065rd.ani")?;
//! let clip = AnimationClip::parse(&bytes)?;
//! println!("{} ms, {} nodes", clip.duration, clip.root.node_count());
//! # Ok(())
//! # }
//! ```

pub mod clip;
pub mod error;
pub mod keyframe;
pub mod tree;

pub use clip::{ANI_MAGIC, ActorBinding, AnimationClip, CameraTrack, ClipHeader};
pub use error::{AniError, Result};
pub use keyframe::{
    KeyTime, KeyValue, Keyframe, MAX_KEY_TIME, MorphKey, RollKey, RotationKey, ScaleKey,
    TranslationKey,
};
pub use tree::TreeNode;
