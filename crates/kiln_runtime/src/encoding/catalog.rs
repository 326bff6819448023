//! The fixed encoding catalog.

/// Static description of one encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub ascii_compatible: bool,
    pub dummy: bool,
    pub max_codepoint: u32,
}

impl EncodingInfo {
    /// Primary name first, then aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.names().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn valid_codepoint(&self, codepoint: i64) -> bool {
        codepoint >= 0 && codepoint <= self.max_codepoint as i64
    }
}

const UNICODE_MAX: u32 = 0x10ffff;

pub static CATALOG: &[EncodingInfo] = &[
    EncodingInfo {
        name: "ASCII-8BIT",
        aliases: &["BINARY"],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: 0xff,
    },
    EncodingInfo {
        name: "UTF-8",
        aliases: &["CP65001"],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: UNICODE_MAX,
    },
    EncodingInfo {
        name: "US-ASCII",
        aliases: &["ASCII", "ANSI_X3.4-1968", "646"],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: 0x7f,
    },
    EncodingInfo {
        name: "UTF-16LE",
        aliases: &[],
        ascii_compatible: false,
        dummy: false,
        max_codepoint: UNICODE_MAX,
    },
    EncodingInfo {
        name: "UTF-16BE",
        aliases: &["UCS-2BE"],
        ascii_compatible: false,
        dummy: false,
        max_codepoint: UNICODE_MAX,
    },
    EncodingInfo {
        name: "UTF-32LE",
        aliases: &["UCS-4LE"],
        ascii_compatible: false,
        dummy: false,
        max_codepoint: UNICODE_MAX,
    },
    EncodingInfo {
        name: "UTF-32BE",
        aliases: &["UCS-4BE"],
        ascii_compatible: false,
        dummy: false,
        max_codepoint: UNICODE_MAX,
    },
    EncodingInfo {
        name: "ISO-8859-1",
        aliases: &["ISO8859-1"],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: 0xff,
    },
    EncodingInfo {
        name: "Shift_JIS",
        aliases: &[],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: 0xfcfc,
    },
    EncodingInfo {
        name: "EUC-JP",
        aliases: &["eucJP"],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: 0x8ffefe,
    },
    EncodingInfo {
        name: "Windows-1252",
        aliases: &["CP1252"],
        ascii_compatible: true,
        dummy: false,
        max_codepoint: 0xff,
    },
    EncodingInfo {
        name: "UTF-7",
        aliases: &["CP65000"],
        ascii_compatible: false,
        dummy: true,
        max_codepoint: UNICODE_MAX,
    },
];
