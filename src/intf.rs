// FF0F - IF - Interrupt Flag (R/W), FFFF - IE - Interrupt Enable (R/W)
// Bit 0: V-Blank  (INT 40h)
// Bit 1: LCD STAT (INT 48h)
// Bit 2: Timer    (INT 50h)
// Bit 3: Serial   (INT 58h)
// Bit 4: Joypad   (INT 60h)
//
// Only the low 5 bits are defined; both registers mask writes against that range.
#[rustfmt::skip]
#[derive(Clone, Copy)]
pub enum Flag {
    VBlank  = 0,
    LCDStat = 1,
    Timer   = 2,
    Serial  = 3,
    Joypad  = 4,
}

pub const DEFINED_MASK: u8 = 0x1f;
