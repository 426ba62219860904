//! Pixel buffer for addressable LED strings.
//!
//! A [`PixelBuffer`] owns the bytes for N pixels laid out in a device channel
//! order ([`ColorOrder`]), scales writes by a global brightness while keeping
//! the unscaled values for reads, and hands the bytes to a [`Transmit`]
//! implementation when shown.
//!
//! ```
//! use pixelbuf::{ColorOrder, PixelBuffer};
//!
//! let mut frames = Vec::new();
//! let mut strip = PixelBuffer::builder(3)
//!     .order(ColorOrder::GRB)
//!     .brightness(0.5)
//!     .build(|bytes: &[u8]| -> anyhow::Result<()> {
//!         frames.push(bytes.to_vec());
//!         Ok(())
//!     })?;
//!
//! strip.set(0, (255, 0, 0))?;
//! strip.fill_slice(1.., 0x0000ffu32)?;
//! assert_eq!(strip.get(0)?, (255, 0, 0));
//! assert_eq!(&strip.as_bytes()[..3], &[0, 128, 0]);
//! strip.show()?;
//! # drop(strip);
//! # assert_eq!(frames.len(), 1);
//! # Ok::<(), pixelbuf::Error>(())
//! ```

mod buffer;
mod color_order;
mod error;
mod slice;
mod transmit;
mod value;

pub use buffer::{Builder, PixelBuffer, Pixels};
pub use color_order::{Channel, ColorOrder};
pub use error::{Error, Result};
pub use slice::{Slice, SliceIndices};
pub use transmit::{NoTransmit, Transmit};
pub use value::{wheel, Color, PixelInput, PixelValue};
