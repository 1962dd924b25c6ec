// Providers layer - session tokens, access control and the media host
//
// Providers perform work that coordinators compose: signing and checking
// session tokens, gating requests, and talking to the remote media host.

pub mod access_gate;
pub mod media;
pub mod token_provider;

pub use access_gate::{AccessGate, Requirement};
pub use media::{
    CloudinaryMediaStore, DisabledMediaStore, MediaAsset, MediaLease, MediaStore, MediaUpload,
    delete_detached,
};
pub use token_provider::TokenProvider;
