use std::ops::{Deref, DerefMut};

use log::{debug, trace};
use serde_json::Value;

use crate::color_order::ColorOrder;
use crate::error::{Error, Result};
use crate::slice::{Slice, SliceIndices};
use crate::transmit::{NoTransmit, Transmit};
use crate::value::{
    check_brightness, is_pixel_tuple, scale, wheel, Color, Normalized, PixelInput,
};

/// Byte storage: allocated by the buffer or borrowed from the host
enum Storage<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl Deref for Storage<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
        }
    }
}

impl DerefMut for Storage<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
        }
    }
}

/// A strip of N pixels backed by a contiguous byte buffer
///
/// Writes go through the channel order and brightness scaling; reads return the
/// unscaled values that were written. Two parallel arrays are kept: the
/// unscaled source values in logical R,G,B[,W] order, and the scaled bytes in
/// device order that are handed to the [`Transmit`] implementation.
pub struct PixelBuffer<'a, T> {
    order: ColorOrder,
    pixel_count: usize,
    raw: Storage<'a>,
    source: Vec<u8>,
    brightness: f64,
    auto_write: bool,
    dirty: bool,
    transmit: T,
}

/// Construction parameters for a [`PixelBuffer`]
#[derive(Debug)]
pub struct Builder<'a> {
    pixel_count: usize,
    order: ColorOrder,
    brightness: f64,
    auto_write: bool,
    buffer: Option<&'a mut [u8]>,
}

impl<'a> Builder<'a> {
    pub fn new(pixel_count: usize) -> Self {
        Builder {
            pixel_count,
            order: ColorOrder::default(),
            brightness: 1.0,
            auto_write: false,
            buffer: None,
        }
    }

    pub fn order(mut self, order: ColorOrder) -> Self {
        self.order = order;
        self
    }

    pub fn brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn auto_write(mut self, auto_write: bool) -> Self {
        self.auto_write = auto_write;
        self
    }

    /// Use `buffer` in place as the pixel storage
    ///
    /// Existing contents are kept and treated as unscaled device-order pixels.
    pub fn buffer<'b>(self, buffer: &'b mut [u8]) -> Builder<'b> {
        Builder {
            pixel_count: self.pixel_count,
            order: self.order,
            brightness: self.brightness,
            auto_write: self.auto_write,
            buffer: Some(buffer),
        }
    }

    pub fn build<T: Transmit>(self, transmit: T) -> Result<PixelBuffer<'a, T>> {
        if self.pixel_count == 0 {
            return Err(Error::value_range("pixel count", 0));
        }
        let brightness = check_brightness("brightness", self.brightness)?;

        let width = self.order.byte_width();
        let expected = self
            .pixel_count
            .checked_mul(width)
            .ok_or_else(|| Error::value_range("pixel count", self.pixel_count))?;

        let raw = match self.buffer {
            Some(buffer) if buffer.len() != expected => {
                return Err(Error::SizeMismatch {
                    expected,
                    actual: buffer.len(),
                });
            }
            Some(buffer) => Storage::Borrowed(buffer),
            None => Storage::Owned(vec![0; expected]),
        };

        let mut source = vec![0; expected];
        for (physical, logical) in raw.chunks_exact(width).zip(source.chunks_exact_mut(width)) {
            self.order.to_logical(physical, logical);
        }

        let mut buffer = PixelBuffer {
            order: self.order,
            pixel_count: self.pixel_count,
            raw,
            source,
            brightness,
            auto_write: self.auto_write,
            dirty: false,
            transmit,
        };
        if brightness < 1.0 {
            buffer.rescale();
        }

        debug!(
            "pixel buffer: {} x {} ({} bytes), brightness {:.2}, auto_write {}",
            buffer.pixel_count, buffer.order, expected, brightness, buffer.auto_write
        );
        Ok(buffer)
    }
}

impl PixelBuffer<'_, NoTransmit> {
    pub fn builder<'b>(pixel_count: usize) -> Builder<'b> {
        Builder::new(pixel_count)
    }
}

impl<'a, T: Transmit> PixelBuffer<'a, T> {
    /// Owned buffer with full brightness and auto-write off
    pub fn new(pixel_count: usize, order: ColorOrder, transmit: T) -> Result<Self> {
        Builder::new(pixel_count).order(order).build(transmit)
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixel_count
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    pub fn order(&self) -> ColorOrder {
        self.order
    }

    /// Bytes per pixel
    pub fn byte_width(&self) -> usize {
        self.order.byte_width()
    }

    /// Scaled pixel bytes in device order, exactly as they are transmitted
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn auto_write(&self) -> bool {
        self.auto_write
    }

    pub fn set_auto_write(&mut self, auto_write: bool) {
        self.auto_write = auto_write;
    }

    pub fn transmitter(&self) -> &T {
        &self.transmit
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmit
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Change the global brightness and re-scale every pixel from its source value
    pub fn set_brightness(&mut self, brightness: f64) -> Result<()> {
        self.brightness = check_brightness("brightness", brightness)?;
        self.rescale();
        debug!("brightness set to {:.3}", self.brightness);
        self.after_write()
    }

    /// Read one pixel; negative indices count from the end
    pub fn get(&self, index: isize) -> Result<Color> {
        let i = self.resolve_index(index)?;
        let width = self.byte_width();
        Ok(Color::from_logical(&self.source[i * width..(i + 1) * width]))
    }

    /// Write one pixel; negative indices count from the end
    pub fn set(&mut self, index: isize, value: impl Into<PixelInput>) -> Result<()> {
        let i = self.resolve_index(index)?;
        let normalized = value.into().normalize(self.order)?;
        self.write_pixel(i, &normalized);
        self.after_write()
    }

    /// Lazily read the pixels selected by `slice`
    pub fn slice(&self, slice: impl Into<Slice>) -> Result<Pixels<'_>> {
        Ok(Pixels {
            source: &self.source,
            width: self.byte_width(),
            indices: slice.into().indices(self.pixel_count)?,
        })
    }

    /// Every pixel, front to back
    pub fn iter(&self) -> Pixels<'_> {
        Pixels {
            source: &self.source,
            width: self.byte_width(),
            indices: SliceIndices::all(self.pixel_count),
        }
    }

    /// Write one value per selected pixel
    ///
    /// The number of values must equal the number of selected pixels. Every value
    /// is checked before any pixel changes, and auto-write transmits once.
    pub fn set_slice<I>(&mut self, slice: impl Into<Slice>, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<PixelInput>,
    {
        let indices = slice.into().indices(self.pixel_count)?;
        let inputs: Vec<PixelInput> = values.into_iter().map(Into::into).collect();
        if inputs.len() != indices.len() {
            return Err(Error::Arity {
                what: "slice values",
                expected: indices.len(),
                actual: inputs.len(),
            });
        }
        let normalized = inputs
            .iter()
            .map(|input| input.normalize(self.order))
            .collect::<Result<Vec<_>>>()?;

        self.write_indices(indices, |k| normalized[k])
    }

    /// Write the same value to every selected pixel
    pub fn fill_slice(
        &mut self,
        slice: impl Into<Slice>,
        value: impl Into<PixelInput>,
    ) -> Result<()> {
        let indices = slice.into().indices(self.pixel_count)?;
        let normalized = value.into().normalize(self.order)?;
        self.write_indices(indices, |_| normalized)
    }

    /// Write a JSON pixel value or sequence of values to the selected pixels
    ///
    /// An array that reads as one pixel (channel values, optionally followed by a
    /// brightness) is broadcast, as are scalars. Any other array holds one value
    /// per selected pixel, so `[0xff0000, 0x00ff00]` is two packed colors. When an
    /// array fits both readings, the single pixel wins.
    pub fn assign_json(&mut self, slice: impl Into<Slice>, value: &Value) -> Result<()> {
        let order = self.order;
        match value {
            Value::Array(items) if !is_pixel_tuple(items, order) => {
                let inputs = items
                    .iter()
                    .map(|item| PixelInput::from_json(item, order))
                    .collect::<Result<Vec<_>>>()?;
                self.set_slice(slice, inputs)
            }
            single => self.fill_slice(slice, PixelInput::from_json(single, order)?),
        }
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: impl Into<PixelInput>) -> Result<()> {
        self.fill_slice(Slice::full(), value)
    }

    /// Paint a color wheel: pixel `i` gets `wheel((start + step * i) % 255)`
    pub fn fill_wheel(&mut self, start: u8, step: u8) -> Result<()> {
        let white = self.order.has_white().then_some(0);
        let colors: Vec<Color> = (0..self.pixel_count)
            .map(|i| {
                let pos = (usize::from(start) + usize::from(step) * i) % 255;
                Color {
                    w: white,
                    ..wheel(pos as u8)
                }
            })
            .collect();
        self.set_slice(Slice::full(), colors)
    }

    /// Transmit the current bytes and clear the dirty flag
    pub fn show(&mut self) -> Result<()> {
        trace!("transmitting {} pixels ({} bytes)", self.pixel_count, self.raw.len());
        self.transmit.transmit(&self.raw).map_err(Error::Transmit)?;
        self.dirty = false;
        Ok(())
    }

    /// Transmit only when something changed since the last transmission
    pub fn show_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.show()?;
        Ok(true)
    }

    fn resolve_index(&self, index: isize) -> Result<usize> {
        let len = self.pixel_count as isize;
        let resolved = if index < 0 { index + len } else { index };
        if (0..len).contains(&resolved) {
            Ok(resolved as usize)
        } else {
            Err(Error::Index {
                index,
                len: self.pixel_count,
            })
        }
    }

    fn write_pixel(&mut self, i: usize, pixel: &Normalized) {
        let width = self.byte_width();
        let brightness = pixel.brightness.unwrap_or(self.brightness);
        let range = i * width..(i + 1) * width;

        let mut scaled = [0u8; 4];
        for (out, &value) in scaled.iter_mut().zip(&pixel.channels[..width]) {
            *out = scale(value, brightness);
        }

        self.source[range.clone()].copy_from_slice(&pixel.channels[..width]);
        self.order.to_physical(&scaled[..width], &mut self.raw[range]);
    }

    fn write_indices(
        &mut self,
        indices: SliceIndices,
        value: impl Fn(usize) -> Normalized,
    ) -> Result<()> {
        if indices.len() == 0 {
            return Ok(());
        }
        for (k, i) in indices.enumerate() {
            self.write_pixel(i, &value(k));
        }
        self.after_write()
    }

    /// Re-derive every scaled byte from the source values at the global brightness
    fn rescale(&mut self) {
        let width = self.byte_width();
        let mut scaled = [0u8; 4];
        let pixels = self.source.chunks_exact(width).zip(self.raw.chunks_exact_mut(width));
        for (logical, physical) in pixels {
            for (out, &value) in scaled.iter_mut().zip(logical) {
                *out = scale(value, self.brightness);
            }
            self.order.to_physical(&scaled[..width], physical);
        }
    }

    fn after_write(&mut self) -> Result<()> {
        self.dirty = true;
        if self.auto_write {
            self.show()?;
        }
        Ok(())
    }
}

/// Iterator over unscaled pixel colors
#[derive(Debug, Clone)]
pub struct Pixels<'b> {
    source: &'b [u8],
    width: usize,
    indices: SliceIndices,
}

impl Iterator for Pixels<'_> {
    type Item = Color;

    fn next(&mut self) -> Option<Color> {
        let i = self.indices.next()?;
        Some(Color::from_logical(&self.source[i * self.width..(i + 1) * self.width]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Pixels<'_> {}
