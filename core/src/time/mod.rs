pub mod bars;
pub mod frames;
pub mod signature;
pub mod tempo;
pub mod ticks;

pub use self::bars::BarsTime;
pub use self::frames::TimeMap;
pub use self::signature::Signature;
pub use self::tempo::Tempo;
pub use self::ticks::{TicksTime, DEFAULT_TICKS_PER_BAR};

pub type SampleRate = u32;

/// Frame counts and frame offsets into a sample buffer.
pub type Frames = usize;
