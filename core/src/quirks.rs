use serde::Deserialize;

/// # Quirks
/// Opcodes whose behavior differs between this interpreter's legacy semantics
/// and the conventional CHIP-8 reference.
///
/// | Opcode | legacy | conventional |
/// |--------|--------|--------------|
/// | `Dxyn` | overwrites pixels; VF is only ever raised | XORs pixels; VF is cleared first |
/// | `Fx33` | computes the digits but stores nothing | stores digits at I, I+1, I+2 |
/// | `Fx65` | writes every byte of I..=I+x into Vx | fills V0..=Vx |
///
/// Both profiles advance I by x + 1 after `Fx65`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Quirks {
    pub xor_sprites: bool,
    pub bcd_stores: bool,
    pub load_fills_range: bool,
}

impl Quirks {
    pub const LEGACY: Quirks = Quirks {
        xor_sprites: false,
        bcd_stores: false,
        load_fills_range: false,
    };

    pub const CONVENTIONAL: Quirks = Quirks {
        xor_sprites: true,
        bcd_stores: true,
        load_fills_range: true,
    };
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::LEGACY
    }
}
