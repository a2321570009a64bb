//! Synthetic TrueType face for tests and benchmarks
//!
//! Builds a minimal but valid `glyf`-flavoured font covering U+0020..U+007E
//! with box-shaped outlines, so atlas and layout behaviour can be checked
//! without shipping font files. At 48pt (2048 units per em):
//!
//! - space has no outline and advances 12px
//! - `A` is 28x35 pixels and advances 30px
//! - `B` is 26x35 pixels and advances 27px
//! - `g`, `j`, `p`, `q`, `y` descend 9px below the baseline
//! - everything else is 22x26 pixels and advances 24px

pub const UNITS_PER_EM: u16 = 2048;

const FIRST: u32 = 0x20;
const LAST: u32 = 0x7E;

/// Font-wide box (x_min, y_min, x_max, y_max), encloses every glyph
const GLOBAL_BOUNDS: [i16; 4] = [0, -384, 1280, 1536];

#[derive(Clone, Copy)]
struct BoxGlyph {
    advance: u16,
    /// x_min, y_min, x_max, y_max in font units
    outline: Option<[i16; 4]>,
}

fn glyph_for(c: char) -> BoxGlyph {
    match c {
        ' ' => BoxGlyph {
            advance: 512,
            outline: None,
        },
        'A' => BoxGlyph {
            advance: 1280,
            outline: Some([64, 0, 1216, 1472]),
        },
        'B' => BoxGlyph {
            advance: 1152,
            outline: Some([128, 0, 1088, 1472]),
        },
        'g' | 'j' | 'p' | 'q' | 'y' => BoxGlyph {
            advance: 1024,
            outline: Some([64, -384, 960, 1088]),
        },
        _ => BoxGlyph {
            advance: 1024,
            outline: Some([64, 0, 960, 1088]),
        },
    }
}

/// A complete synthetic font
pub fn font_bytes() -> Vec<u8> {
    SyntheticFont::ascii().to_bytes()
}

/// The same font with its `hmtx` table removed, so no glyph has an advance
pub fn font_bytes_without_hmtx() -> Vec<u8> {
    let mut font = SyntheticFont::ascii();
    font.include_hmtx = false;
    font.to_bytes()
}

struct SyntheticFont {
    glyphs: Vec<BoxGlyph>,
    include_hmtx: bool,
}

impl SyntheticFont {
    fn ascii() -> Self {
        let notdef = BoxGlyph {
            advance: 1024,
            outline: Some([0, 0, 1024, 1536]),
        };
        let mut glyphs = vec![notdef];
        glyphs.extend((FIRST..=LAST).filter_map(char::from_u32).map(glyph_for));
        Self {
            glyphs,
            include_hmtx: true,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let (glyf, loca) = self.glyf_and_loca();

        let mut tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
            (b"cmap", cmap()),
            (b"glyf", glyf),
            (b"head", head()),
            (b"hhea", self.hhea()),
        ];
        if self.include_hmtx {
            tables.push((b"hmtx", self.hmtx()));
        }
        tables.push((b"loca", loca));
        tables.push((b"maxp", self.maxp()));

        write_sfnt(&tables)
    }

    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = Vec::new();
        let mut loca = Vec::new();

        for glyph in &self.glyphs {
            put_u32(&mut loca, glyf.len() as u32);
            if let Some([x_min, y_min, x_max, y_max]) = glyph.outline {
                put_i16(&mut glyf, 1); // numberOfContours
                put_i16(&mut glyf, x_min);
                put_i16(&mut glyf, y_min);
                put_i16(&mut glyf, x_max);
                put_i16(&mut glyf, y_max);
                put_u16(&mut glyf, 3); // endPtsOfContours
                put_u16(&mut glyf, 0); // instructionLength
                glyf.extend_from_slice(&[0x01; 4]); // on-curve, 16-bit deltas

                // Clockwise: bottom-left, top-left, top-right, bottom-right
                for dx in [x_min, 0, x_max - x_min, 0] {
                    put_i16(&mut glyf, dx);
                }
                for dy in [y_min, y_max - y_min, 0, y_min - y_max] {
                    put_i16(&mut glyf, dy);
                }
            }
        }
        put_u32(&mut loca, glyf.len() as u32);

        (glyf, loca)
    }

    fn hhea(&self) -> Vec<u8> {
        let mut t = Vec::new();
        put_u32(&mut t, 0x0001_0000);
        put_i16(&mut t, 1536); // ascender
        put_i16(&mut t, -384); // descender
        put_i16(&mut t, 0); // lineGap
        put_u16(&mut t, 1280); // advanceWidthMax
        put_i16(&mut t, 0); // minLeftSideBearing
        put_i16(&mut t, 0); // minRightSideBearing
        put_i16(&mut t, 1216); // xMaxExtent
        put_i16(&mut t, 1); // caretSlopeRise
        put_i16(&mut t, 0); // caretSlopeRun
        put_i16(&mut t, 0); // caretOffset
        for _ in 0..4 {
            put_i16(&mut t, 0);
        }
        put_i16(&mut t, 0); // metricDataFormat
        put_u16(&mut t, self.glyphs.len() as u16);
        t
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut t = Vec::new();
        for glyph in &self.glyphs {
            put_u16(&mut t, glyph.advance);
            put_i16(&mut t, glyph.outline.map(|o| o[0]).unwrap_or(0));
        }
        t
    }

    fn maxp(&self) -> Vec<u8> {
        let mut t = Vec::new();
        put_u32(&mut t, 0x0001_0000);
        put_u16(&mut t, self.glyphs.len() as u16);
        put_u16(&mut t, 4); // maxPoints
        put_u16(&mut t, 1); // maxContours
        put_u16(&mut t, 0); // maxCompositePoints
        put_u16(&mut t, 0); // maxCompositeContours
        put_u16(&mut t, 2); // maxZones
        for _ in 0..8 {
            put_u16(&mut t, 0);
        }
        t
    }
}

fn head() -> Vec<u8> {
    let mut t = Vec::new();
    put_u32(&mut t, 0x0001_0000); // version
    put_u32(&mut t, 0x0001_0000); // fontRevision
    put_u32(&mut t, 0); // checksumAdjustment
    put_u32(&mut t, 0x5F0F_3CF5); // magicNumber
    put_u16(&mut t, 0x0003); // flags
    put_u16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0; 16]); // created, modified
    for v in GLOBAL_BOUNDS {
        put_i16(&mut t, v);
    }
    put_u16(&mut t, 0); // macStyle
    put_u16(&mut t, 8); // lowestRecPPEM
    put_i16(&mut t, 2); // fontDirectionHint
    put_i16(&mut t, 1); // indexToLocFormat: long offsets
    put_i16(&mut t, 0); // glyphDataFormat
    t
}

/// Windows Unicode BMP subtable, format 4, one segment mapping
/// U+0020..U+007E onto glyphs 1..=95
fn cmap() -> Vec<u8> {
    let mut t = Vec::new();
    put_u16(&mut t, 0); // version
    put_u16(&mut t, 1); // numTables
    put_u16(&mut t, 3); // platformID
    put_u16(&mut t, 1); // encodingID
    put_u32(&mut t, 12); // subtable offset

    put_u16(&mut t, 4); // format
    put_u16(&mut t, 32); // length
    put_u16(&mut t, 0); // language
    put_u16(&mut t, 4); // segCountX2
    put_u16(&mut t, 4); // searchRange
    put_u16(&mut t, 1); // entrySelector
    put_u16(&mut t, 0); // rangeShift
    put_u16(&mut t, LAST as u16); // endCode
    put_u16(&mut t, 0xFFFF);
    put_u16(&mut t, 0); // reservedPad
    put_u16(&mut t, FIRST as u16); // startCode
    put_u16(&mut t, 0xFFFF);
    put_i16(&mut t, 1 - FIRST as i16); // idDelta
    put_i16(&mut t, 1);
    put_u16(&mut t, 0); // idRangeOffset
    put_u16(&mut t, 0);
    t
}

fn write_sfnt(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = 16u16 << entry_selector;

    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000);
    put_u16(&mut out, num_tables);
    put_u16(&mut out, search_range);
    put_u16(&mut out, entry_selector);
    put_u16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in tables {
        out.extend_from_slice(*tag);
        put_u32(&mut out, checksum(data));
        put_u32(&mut out, offset as u32);
        put_u32(&mut out, data.len() as u32);
        offset += padded_len(data.len());
    }

    for (_, data) in tables {
        out.extend_from_slice(data);
        out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
    }
    out
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}
