//! Static unicode category tables.
//!
//! The tables are sorted, non-overlapping and inclusive code point ranges. Classification is a
//! binary search over the ranges, which keeps the category boundaries fixed regardless of the
//! unicode version of the standard library.

use std::cmp::Ordering;

/// Checks whether the character is contained in one of the sorted ranges.
fn contains(table: &[(char, char)], c: char) -> bool {
    table
        .binary_search_by(|&(start, end)| {
            if c < start {
                Ordering::Greater
            } else if c > end {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

/// Checks whether the character is a control or format character (Cc, Cf).
pub(crate) fn is_control(c: char) -> bool {
    contains(CONTROL, c)
}

/// Checks whether the character is whitespace.
///
/// Tab, newline and carriage return are counted as whitespace even though they are technically
/// control characters.
pub(crate) fn is_whitespace(c: char) -> bool {
    c == '\t' || c == '\n' || c == '\r' || contains(WHITESPACE, c)
}

/// Checks whether the character is punctuation.
///
/// All non-alphanumeric printable ascii characters are treated as punctuation, even symbols like
/// `$` or `^` which are not in the unicode punctuation category.
pub(crate) fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || contains(PUNCTUATION, c)
}

/// Checks whether the character is a nonspacing mark (Mn).
pub(crate) fn is_nonspacing_mark(c: char) -> bool {
    contains(NONSPACING_MARK, c)
}

/// Checks whether the character is a CJK ideograph.
///
/// This covers the CJK Unified Ideographs block with its extensions and the CJK Compatibility
/// Ideographs. Hangul, Hiragana and Katakana are not included, those scripts separate their words
/// by whitespace.
pub(crate) fn is_cjk(c: char) -> bool {
    contains(CJK, c)
}

const CJK: &[(char, char)] = &[
    ('\u{3400}', '\u{4DBF}'),
    ('\u{4E00}', '\u{9FFF}'),
    ('\u{F900}', '\u{FAFF}'),
    ('\u{20000}', '\u{2A6DF}'),
    ('\u{2A700}', '\u{2B73F}'),
    ('\u{2B740}', '\u{2B81F}'),
    ('\u{2B820}', '\u{2CEAF}'),
    ('\u{2F800}', '\u{2FA1F}'),
];

const CONTROL: &[(char, char)] = &[
    ('\u{0000}', '\u{001F}'),
    ('\u{007F}', '\u{009F}'),
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
];

const WHITESPACE: &[(char, char)] = &[
    ('\u{0020}', '\u{0020}'),
    ('\u{00A0}', '\u{00A0}'),
    ('\u{1680}', '\u{1680}'),
    ('\u{2000}', '\u{200A}'),
    ('\u{202F}', '\u{202F}'),
    ('\u{205F}', '\u{205F}'),
    ('\u{3000}', '\u{3000}'),
];

const PUNCTUATION: &[(char, char)] = &[
    ('\u{0021}', '\u{0023}'),
    ('\u{0025}', '\u{002A}'),
    ('\u{002C}', '\u{002F}'),
    ('\u{003A}', '\u{003B}'),
    ('\u{003F}', '\u{0040}'),
    ('\u{005B}', '\u{005D}'),
    ('\u{005F}', '\u{005F}'),
    ('\u{007B}', '\u{007B}'),
    ('\u{007D}', '\u{007D}'),
    ('\u{00A1}', '\u{00A1}'),
    ('\u{00A7}', '\u{00A7}'),
    ('\u{00AB}', '\u{00AB}'),
    ('\u{00B6}', '\u{00B7}'),
    ('\u{00BB}', '\u{00BB}'),
    ('\u{00BF}', '\u{00BF}'),
    ('\u{037E}', '\u{037E}'),
    ('\u{0387}', '\u{0387}'),
    ('\u{055A}', '\u{055F}'),
    ('\u{0589}', '\u{058A}'),
    ('\u{05BE}', '\u{05BE}'),
    ('\u{05C0}', '\u{05C0}'),
    ('\u{05C3}', '\u{05C3}'),
    ('\u{05C6}', '\u{05C6}'),
    ('\u{05F3}', '\u{05F4}'),
    ('\u{0609}', '\u{060A}'),
    ('\u{060C}', '\u{060D}'),
    ('\u{061B}', '\u{061B}'),
    ('\u{061E}', '\u{061F}'),
    ('\u{066A}', '\u{066D}'),
    ('\u{06D4}', '\u{06D4}'),
    ('\u{0700}', '\u{070D}'),
    ('\u{07F7}', '\u{07F9}'),
    ('\u{0830}', '\u{083E}'),
    ('\u{085E}', '\u{085E}'),
    ('\u{0964}', '\u{0965}'),
    ('\u{0970}', '\u{0970}'),
    ('\u{0AF0}', '\u{0AF0}'),
    ('\u{0DF4}', '\u{0DF4}'),
    ('\u{0E4F}', '\u{0E4F}'),
    ('\u{0E5A}', '\u{0E5B}'),
    ('\u{0F04}', '\u{0F12}'),
    ('\u{0F14}', '\u{0F14}'),
    ('\u{0F3A}', '\u{0F3D}'),
    ('\u{0F85}', '\u{0F85}'),
    ('\u{0FD0}', '\u{0FD4}'),
    ('\u{0FD9}', '\u{0FDA}'),
    ('\u{104A}', '\u{104F}'),
    ('\u{10FB}', '\u{10FB}'),
    ('\u{1360}', '\u{1368}'),
    ('\u{1400}', '\u{1400}'),
    ('\u{166D}', '\u{166E}'),
    ('\u{169B}', '\u{169C}'),
    ('\u{16EB}', '\u{16ED}'),
    ('\u{1735}', '\u{1736}'),
    ('\u{17D4}', '\u{17D6}'),
    ('\u{17D8}', '\u{17DA}'),
    ('\u{1800}', '\u{180A}'),
    ('\u{1944}', '\u{1945}'),
    ('\u{1A1E}', '\u{1A1F}'),
    ('\u{1AA0}', '\u{1AA6}'),
    ('\u{1AA8}', '\u{1AAD}'),
    ('\u{1B5A}', '\u{1B60}'),
    ('\u{1BFC}', '\u{1BFF}'),
    ('\u{1C3B}', '\u{1C3F}'),
    ('\u{1C7E}', '\u{1C7F}'),
    ('\u{1CC0}', '\u{1CC7}'),
    ('\u{1CD3}', '\u{1CD3}'),
    ('\u{2010}', '\u{2027}'),
    ('\u{2030}', '\u{2043}'),
    ('\u{2045}', '\u{2051}'),
    ('\u{2053}', '\u{205E}'),
    ('\u{207D}', '\u{207E}'),
    ('\u{208D}', '\u{208E}'),
    ('\u{2308}', '\u{230B}'),
    ('\u{2329}', '\u{232A}'),
    ('\u{2768}', '\u{2775}'),
    ('\u{27C5}', '\u{27C6}'),
    ('\u{27E6}', '\u{27EF}'),
    ('\u{2983}', '\u{2998}'),
    ('\u{29D8}', '\u{29DB}'),
    ('\u{29FC}', '\u{29FD}'),
    ('\u{2CF9}', '\u{2CFC}'),
    ('\u{2CFE}', '\u{2CFF}'),
    ('\u{2D70}', '\u{2D70}'),
    ('\u{2E00}', '\u{2E2E}'),
    ('\u{2E30}', '\u{2E42}'),
    ('\u{3001}', '\u{3003}'),
    ('\u{3008}', '\u{3011}'),
    ('\u{3014}', '\u{301F}'),
    ('\u{3030}', '\u{3030}'),
    ('\u{303D}', '\u{303D}'),
    ('\u{30A0}', '\u{30A0}'),
    ('\u{30FB}', '\u{30FB}'),
    ('\u{A4FE}', '\u{A4FF}'),
    ('\u{A60D}', '\u{A60F}'),
    ('\u{A673}', '\u{A673}'),
    ('\u{A67E}', '\u{A67E}'),
    ('\u{A6F2}', '\u{A6F7}'),
    ('\u{A874}', '\u{A877}'),
    ('\u{A8CE}', '\u{A8CF}'),
    ('\u{A8F8}', '\u{A8FA}'),
    ('\u{A8FC}', '\u{A8FC}'),
    ('\u{A92E}', '\u{A92F}'),
    ('\u{A95F}', '\u{A95F}'),
    ('\u{A9C1}', '\u{A9CD}'),
    ('\u{A9DE}', '\u{A9DF}'),
    ('\u{AA5C}', '\u{AA5F}'),
    ('\u{AADE}', '\u{AADF}'),
    ('\u{AAF0}', '\u{AAF1}'),
    ('\u{ABEB}', '\u{ABEB}'),
    ('\u{FD3E}', '\u{FD3F}'),
    ('\u{FE10}', '\u{FE19}'),
    ('\u{FE30}', '\u{FE52}'),
    ('\u{FE54}', '\u{FE61}'),
    ('\u{FE63}', '\u{FE63}'),
    ('\u{FE68}', '\u{FE68}'),
    ('\u{FE6A}', '\u{FE6B}'),
    ('\u{FF01}', '\u{FF03}'),
    ('\u{FF05}', '\u{FF0A}'),
    ('\u{FF0C}', '\u{FF0F}'),
    ('\u{FF1A}', '\u{FF1B}'),
    ('\u{FF1F}', '\u{FF20}'),
    ('\u{FF3B}', '\u{FF3D}'),
    ('\u{FF3F}', '\u{FF3F}'),
    ('\u{FF5B}', '\u{FF5B}'),
    ('\u{FF5D}', '\u{FF5D}'),
    ('\u{FF5F}', '\u{FF65}'),
];

const NONSPACING_MARK: &[(char, char)] = &[
    ('\u{0300}', '\u{036F}'),
    ('\u{0483}', '\u{0487}'),
    ('\u{0591}', '\u{05BD}'),
    ('\u{05BF}', '\u{05BF}'),
    ('\u{05C1}', '\u{05C2}'),
    ('\u{05C4}', '\u{05C5}'),
    ('\u{05C7}', '\u{05C7}'),
    ('\u{0610}', '\u{061A}'),
    ('\u{064B}', '\u{065F}'),
    ('\u{0670}', '\u{0670}'),
    ('\u{06D6}', '\u{06DC}'),
    ('\u{06DF}', '\u{06E4}'),
    ('\u{06E7}', '\u{06E8}'),
    ('\u{06EA}', '\u{06ED}'),
    ('\u{0711}', '\u{0711}'),
    ('\u{0730}', '\u{074A}'),
    ('\u{07A6}', '\u{07B0}'),
    ('\u{07EB}', '\u{07F3}'),
    ('\u{0816}', '\u{0819}'),
    ('\u{081B}', '\u{0823}'),
    ('\u{0825}', '\u{0827}'),
    ('\u{0829}', '\u{082D}'),
    ('\u{0859}', '\u{085B}'),
    ('\u{08E3}', '\u{0902}'),
    ('\u{093A}', '\u{093A}'),
    ('\u{093C}', '\u{093C}'),
    ('\u{0941}', '\u{0948}'),
    ('\u{094D}', '\u{094D}'),
    ('\u{0951}', '\u{0957}'),
    ('\u{0962}', '\u{0963}'),
    ('\u{0981}', '\u{0981}'),
    ('\u{09BC}', '\u{09BC}'),
    ('\u{09C1}', '\u{09C4}'),
    ('\u{09CD}', '\u{09CD}'),
    ('\u{09E2}', '\u{09E3}'),
    ('\u{0A01}', '\u{0A02}'),
    ('\u{0A3C}', '\u{0A3C}'),
    ('\u{0A41}', '\u{0A42}'),
    ('\u{0A47}', '\u{0A48}'),
    ('\u{0A4B}', '\u{0A4D}'),
    ('\u{0A51}', '\u{0A51}'),
    ('\u{0A70}', '\u{0A71}'),
    ('\u{0A75}', '\u{0A75}'),
    ('\u{0A81}', '\u{0A82}'),
    ('\u{0ABC}', '\u{0ABC}'),
    ('\u{0AC1}', '\u{0AC5}'),
    ('\u{0AC7}', '\u{0AC8}'),
    ('\u{0ACD}', '\u{0ACD}'),
    ('\u{0AE2}', '\u{0AE3}'),
    ('\u{0B01}', '\u{0B01}'),
    ('\u{0B3C}', '\u{0B3C}'),
    ('\u{0B3F}', '\u{0B3F}'),
    ('\u{0B41}', '\u{0B44}'),
    ('\u{0B4D}', '\u{0B4D}'),
    ('\u{0B56}', '\u{0B56}'),
    ('\u{0B62}', '\u{0B63}'),
    ('\u{0B82}', '\u{0B82}'),
    ('\u{0BC0}', '\u{0BC0}'),
    ('\u{0BCD}', '\u{0BCD}'),
    ('\u{0C00}', '\u{0C00}'),
    ('\u{0C3E}', '\u{0C40}'),
    ('\u{0C46}', '\u{0C48}'),
    ('\u{0C4A}', '\u{0C4D}'),
    ('\u{0C55}', '\u{0C56}'),
    ('\u{0C62}', '\u{0C63}'),
    ('\u{0C81}', '\u{0C81}'),
    ('\u{0CBC}', '\u{0CBC}'),
    ('\u{0CBF}', '\u{0CBF}'),
    ('\u{0CC6}', '\u{0CC6}'),
    ('\u{0CCC}', '\u{0CCD}'),
    ('\u{0CE2}', '\u{0CE3}'),
    ('\u{0D01}', '\u{0D01}'),
    ('\u{0D41}', '\u{0D44}'),
    ('\u{0D4D}', '\u{0D4D}'),
    ('\u{0D62}', '\u{0D63}'),
    ('\u{0DCA}', '\u{0DCA}'),
    ('\u{0DD2}', '\u{0DD4}'),
    ('\u{0DD6}', '\u{0DD6}'),
    ('\u{0E31}', '\u{0E31}'),
    ('\u{0E34}', '\u{0E3A}'),
    ('\u{0E47}', '\u{0E4E}'),
    ('\u{0EB1}', '\u{0EB1}'),
    ('\u{0EB4}', '\u{0EB9}'),
    ('\u{0EBB}', '\u{0EBC}'),
    ('\u{0EC8}', '\u{0ECD}'),
    ('\u{0F18}', '\u{0F19}'),
    ('\u{0F35}', '\u{0F35}'),
    ('\u{0F37}', '\u{0F37}'),
    ('\u{0F39}', '\u{0F39}'),
    ('\u{0F71}', '\u{0F7E}'),
    ('\u{0F80}', '\u{0F84}'),
    ('\u{0F86}', '\u{0F87}'),
    ('\u{0F8D}', '\u{0F97}'),
    ('\u{0F99}', '\u{0FBC}'),
    ('\u{0FC6}', '\u{0FC6}'),
    ('\u{102D}', '\u{1030}'),
    ('\u{1032}', '\u{1037}'),
    ('\u{1039}', '\u{103A}'),
    ('\u{103D}', '\u{103E}'),
    ('\u{1058}', '\u{1059}'),
    ('\u{105E}', '\u{1060}'),
    ('\u{1071}', '\u{1074}'),
    ('\u{1082}', '\u{1082}'),
    ('\u{1085}', '\u{1086}'),
    ('\u{108D}', '\u{108D}'),
    ('\u{109D}', '\u{109D}'),
    ('\u{135D}', '\u{135F}'),
    ('\u{1712}', '\u{1714}'),
    ('\u{1732}', '\u{1734}'),
    ('\u{1752}', '\u{1753}'),
    ('\u{1772}', '\u{1773}'),
    ('\u{17B4}', '\u{17B5}'),
    ('\u{17B7}', '\u{17BD}'),
    ('\u{17C6}', '\u{17C6}'),
    ('\u{17C9}', '\u{17D3}'),
    ('\u{17DD}', '\u{17DD}'),
    ('\u{180B}', '\u{180D}'),
    ('\u{18A9}', '\u{18A9}'),
    ('\u{1920}', '\u{1922}'),
    ('\u{1927}', '\u{1928}'),
    ('\u{1932}', '\u{1932}'),
    ('\u{1939}', '\u{193B}'),
    ('\u{1A17}', '\u{1A18}'),
    ('\u{1A1B}', '\u{1A1B}'),
    ('\u{1A56}', '\u{1A56}'),
    ('\u{1A58}', '\u{1A5E}'),
    ('\u{1A60}', '\u{1A60}'),
    ('\u{1A62}', '\u{1A62}'),
    ('\u{1A65}', '\u{1A6C}'),
    ('\u{1A73}', '\u{1A7C}'),
    ('\u{1A7F}', '\u{1A7F}'),
    ('\u{1AB0}', '\u{1ABD}'),
    ('\u{1B00}', '\u{1B03}'),
    ('\u{1B34}', '\u{1B34}'),
    ('\u{1B36}', '\u{1B3A}'),
    ('\u{1B3C}', '\u{1B3C}'),
    ('\u{1B42}', '\u{1B42}'),
    ('\u{1B6B}', '\u{1B73}'),
    ('\u{1B80}', '\u{1B81}'),
    ('\u{1BA2}', '\u{1BA5}'),
    ('\u{1BA8}', '\u{1BA9}'),
    ('\u{1BAB}', '\u{1BAD}'),
    ('\u{1BE6}', '\u{1BE6}'),
    ('\u{1BE8}', '\u{1BE9}'),
    ('\u{1BED}', '\u{1BED}'),
    ('\u{1BEF}', '\u{1BF1}'),
    ('\u{1C2C}', '\u{1C33}'),
    ('\u{1C36}', '\u{1C37}'),
    ('\u{1CD0}', '\u{1CD2}'),
    ('\u{1CD4}', '\u{1CE0}'),
    ('\u{1CE2}', '\u{1CE8}'),
    ('\u{1CED}', '\u{1CED}'),
    ('\u{1CF4}', '\u{1CF4}'),
    ('\u{1CF8}', '\u{1CF9}'),
    ('\u{1DC0}', '\u{1DF5}'),
    ('\u{1DFC}', '\u{1DFF}'),
    ('\u{20D0}', '\u{20DC}'),
    ('\u{20E1}', '\u{20E1}'),
    ('\u{20E5}', '\u{20F0}'),
    ('\u{2CEF}', '\u{2CF1}'),
    ('\u{2D7F}', '\u{2D7F}'),
    ('\u{2DE0}', '\u{2DFF}'),
    ('\u{302A}', '\u{302D}'),
    ('\u{3099}', '\u{309A}'),
    ('\u{A66F}', '\u{A66F}'),
    ('\u{A674}', '\u{A67D}'),
    ('\u{A69E}', '\u{A69F}'),
    ('\u{A6F0}', '\u{A6F1}'),
    ('\u{A802}', '\u{A802}'),
    ('\u{A806}', '\u{A806}'),
    ('\u{A80B}', '\u{A80B}'),
    ('\u{A825}', '\u{A826}'),
    ('\u{A8C4}', '\u{A8C4}'),
    ('\u{A8E0}', '\u{A8F1}'),
    ('\u{A926}', '\u{A92D}'),
    ('\u{A947}', '\u{A951}'),
    ('\u{A980}', '\u{A982}'),
    ('\u{A9B3}', '\u{A9B3}'),
    ('\u{A9B6}', '\u{A9B9}'),
    ('\u{A9BC}', '\u{A9BC}'),
    ('\u{A9E5}', '\u{A9E5}'),
    ('\u{AA29}', '\u{AA2E}'),
    ('\u{AA31}', '\u{AA32}'),
    ('\u{AA35}', '\u{AA36}'),
    ('\u{AA43}', '\u{AA43}'),
    ('\u{AA4C}', '\u{AA4C}'),
    ('\u{AA7C}', '\u{AA7C}'),
    ('\u{AAB0}', '\u{AAB0}'),
    ('\u{AAB2}', '\u{AAB4}'),
    ('\u{AAB7}', '\u{AAB8}'),
    ('\u{AABE}', '\u{AABF}'),
    ('\u{AAC1}', '\u{AAC1}'),
    ('\u{AAEC}', '\u{AAED}'),
    ('\u{AAF6}', '\u{AAF6}'),
    ('\u{ABE5}', '\u{ABE5}'),
    ('\u{ABE8}', '\u{ABE8}'),
    ('\u{ABED}', '\u{ABED}'),
    ('\u{FB1E}', '\u{FB1E}'),
    ('\u{FE00}', '\u{FE0F}'),
    ('\u{FE20}', '\u{FE2F}'),
];
