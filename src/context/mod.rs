//! Named external objects bridged into a carrier.
//!
//! A [`Context`] pairs a name with an opaque object such as a browser or a
//! device handle. Carriers implementing [`HasContexts`] merge contexts into
//! their own table and expose each bound object as an addressable field named
//! after the context. The carrier references the object; it does not own its
//! lifecycle.

mod carrier;
mod error;
mod value;

pub use carrier::{ContextInput, ContextSlots, HasContexts};
pub use error::ContextError;
pub use value::{BoundObject, Context};
