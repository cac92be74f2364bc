/// # Peripherals
/// The capabilities the interpreter borrows from whatever is hosting it.
///
/// The machine calls these synchronously from inside `step`; it never polls
/// hardware itself.
pub trait Peripherals {
    /// Whether key `key` (0..F) is currently held. Must not block.
    fn key_pressed(&mut self, key: u8) -> bool;

    /// Blocks until a key is pressed and then released, and returns it (0..F).
    ///
    /// This is the only point at which `step` can suspend. Waiting for the
    /// release stops one physical press from being read twice. If the host
    /// needs to give up early it decides what to return.
    fn get_key(&mut self) -> u8;

    /// Starts a short tone. Fire and forget.
    fn play_sound(&mut self);
}

