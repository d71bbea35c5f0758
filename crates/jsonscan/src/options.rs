//! Fixed limits, literal patterns and behavioral flags.

/// Maximum number of nested containers the skip engine accepts.
pub const MAX_RECURSE: usize = 65536;

/// `null` as a little-endian `u32`.
pub const VS_NULL: u32 = 0x6c6c_756e;
/// `true` as a little-endian `u32`.
pub const VS_TRUE: u32 = 0x6575_7274;
/// `alse` as a little-endian `u32`: `false` without its leading `f`.
pub const VS_ALSE: u32 = 0x6573_6c61;

bitflags::bitflags! {
    /// Flags accepted by [`unquote`](crate::unquote()).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonscan::UnquoteFlags;
    ///
    /// let flags = UnquoteFlags::DOUBLE_UNQUOTE | UnquoteFlags::UNICODE_REPLACE;
    /// assert!(flags.contains(UnquoteFlags::UNICODE_REPLACE));
    /// assert_eq!(flags.bits(), 0b11);
    /// ```
    ///
    /// # Default
    ///
    /// No flags: strict single-level decoding.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct UnquoteFlags: u64 {
        /// The input is a JSON string whose decoded body is itself the body
        /// of another JSON string; both levels are decoded.
        const DOUBLE_UNQUOTE = 1 << 0;
        /// Replace unpaired UTF-16 surrogate escapes with U+FFFD instead of
        /// failing with [`ErrorCode::InvalidUnicode`](crate::ErrorCode::InvalidUnicode).
        const UNICODE_REPLACE = 1 << 1;
    }
}

impl UnquoteFlags {
    /// No flags.
    pub const NONE: Self = Self::empty();
}
