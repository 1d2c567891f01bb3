//! Memory layout of a specific game build.
//!
//! Every address the client touches is a field here. A different disc
//! revision means a different `MemoryLayout` value, never edits scattered
//! across modules.

/// Addresses and sizes for one build of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    /// Disc id bytes at the start of MEM1
    pub game_id: &'static [u8],

    /// Address of the disc id
    pub game_id_address: u32,

    /// 32-bit current stage code
    pub stage_id_address: u32,

    /// First mailbox slot; each slot is a 32-bit word
    pub mailbox_base: u32,

    /// Number of mailbox slots before the cursor wraps to the base
    pub mailbox_slots: u32,

    /// 16-bit count of received items already applied to the loaded save
    pub expected_index_address: u32,

    /// 32-bit moolah counter
    pub currency_address: u32,

    /// 32-bit scrap counter
    pub scrap_address: u32,

    /// Start of the per-stage completion bitfields
    pub location_flags_base: u32,

    /// Bytes per stage bitfield
    pub location_flags_stride: u32,
}

impl MemoryLayout {
    /// PAL release, disc id `GGTP01`.
    ///
    /// The disc id, stage id and mailbox addresses are taken from a working
    /// client for this build. Everything listed in [`Self::UNVERIFIED`] has
    /// not been confirmed against the game and must be checked with a
    /// memory viewer before it is relied on.
    pub const GGTP01: Self = Self {
        game_id: b"GGTP01",
        game_id_address: 0x8000_0000,
        stage_id_address: 0x8026_644C,
        mailbox_base: 0x8039_6576,
        mailbox_slots: 64,

        // Unverified, see `UNVERIFIED`
        expected_index_address: 0x8039_6574,
        currency_address: 0x8039_6550,
        scrap_address: 0x8039_6554,
        location_flags_base: 0x8039_6700,
        location_flags_stride: 16,
    };

    /// Fields of [`Self::GGTP01`] that are working assumptions rather than
    /// addresses confirmed in the running game.
    pub const UNVERIFIED: &'static [&'static str] = &[
        "expected_index_address",
        "currency_address",
        "scrap_address",
        "location_flags_base",
        "location_flags_stride",
    ];

    /// Address of mailbox slot `index`, wrapping at `mailbox_slots`.
    pub const fn mailbox_slot(&self, index: u32) -> u32 {
        self.mailbox_base + (index % self.mailbox_slots) * 4
    }

    /// Address of the completion bitfield for a stage.
    pub const fn location_flags(&self, area: u32) -> u32 {
        self.location_flags_base + area * self.location_flags_stride
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self::GGTP01
    }
}
