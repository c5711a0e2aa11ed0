/*!
Parse-time flags accepted alongside a regex source string.
*/

use bitflags::bitflags;

bitflags! {
    /// Flags controlling how a regex source is interpreted.
    ///
    /// # Examples
    /// ```
    /// use rexcount::Flags;
    /// let both = Flags::CASELESS | Flags::DOTALL;
    /// assert!(both.contains(Flags::CASELESS));
    /// assert!(both.contains(Flags::DOTALL));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// Case-insensitive: literal bytes and character-class ranges also
        /// include their opposite-case ASCII sibling.
        const CASELESS = 0b01;
        /// `.` matches every byte, including `\n`; without this flag `.`
        /// excludes `\n` only.
        const DOTALL = 0b10;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}
