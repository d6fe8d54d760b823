pub mod buffer;

pub use self::buffer::{BufferAccess, SampleBuffer, SampleLoader, SharedBuffer};
