/// Pushes a buffer's bytes to the physical LED string
///
/// Called synchronously, on the caller's thread, whenever the buffer is shown.
/// `pixels` is the brightness-scaled data in device channel order. Errors are
/// handed back to the caller of the buffer operation untouched.
pub trait Transmit {
    fn transmit(&mut self, pixels: &[u8]) -> anyhow::Result<()>;
}

impl<F> Transmit for F
where
    F: FnMut(&[u8]) -> anyhow::Result<()>,
{
    fn transmit(&mut self, pixels: &[u8]) -> anyhow::Result<()> {
        self(pixels)
    }
}

/// Transmit that discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransmit;

impl Transmit for NoTransmit {
    fn transmit(&mut self, _pixels: &[u8]) -> anyhow::Result<()> {
        Ok(())
    }
}
