//! Minimal JPEG frame-header reader, enough to embed a file with DCTDecode.

/// Pixel dimensions and colour components of a JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: u32,
    pub height: u32,
    pub components: u8,
}

/// Walk the marker segments up to the first start-of-frame.
///
/// Only baseline, extended and progressive DCT frames (SOF0-SOF2) are
/// accepted since those are what a PDF reader can decode.
pub fn sniff(data: &[u8]) -> Option<JpegInfo> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut pos = 2;
    loop {
        while *data.get(pos)? != 0xFF {
            pos += 1;
        }
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *data.get(pos)?;
        pos += 1;

        match marker {
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let len = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;
        if len < 2 {
            return None;
        }
        match marker {
            0xC0..=0xC2 => {
                let seg = data.get(pos + 2..pos + len)?;
                if seg.len() < 6 {
                    return None;
                }
                let height = u16::from_be_bytes([seg[1], seg[2]]) as u32;
                let width = u16::from_be_bytes([seg[3], seg[4]]) as u32;
                let components = seg[5];
                if width == 0 || height == 0 || !matches!(components, 1 | 3 | 4) {
                    return None;
                }
                return Some(JpegInfo {
                    width,
                    height,
                    components,
                });
            }
            0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => return None,
            _ => pos += len,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// SOI, an APP0 segment, SOF0 for a `width`x`height` RGB frame, EOI.
    pub(crate) fn tiny_jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];
        out.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        out.extend_from_slice(b"JFIF\0");
        out.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        out.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        out.extend_from_slice(&height.to_be_bytes());
        out.extend_from_slice(&width.to_be_bytes());
        out.extend_from_slice(&[
            0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01,
        ]);
        out.extend_from_slice(&[0xFF, 0xD9]);
        out
    }

    #[test]
    fn test_sniff_reads_frame_header() {
        let info = sniff(&tiny_jpeg(1280, 800)).unwrap();
        assert_eq!(
            info,
            JpegInfo {
                width: 1280,
                height: 800,
                components: 3
            }
        );
    }

    #[test]
    fn test_sniff_rejects_png() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert!(sniff(png).is_none());
    }

    #[test]
    fn test_sniff_rejects_truncated() {
        let jpeg = tiny_jpeg(10, 10);
        assert!(sniff(&jpeg[..24]).is_none());
    }

    #[test]
    fn test_sniff_rejects_lossless() {
        let mut jpeg = tiny_jpeg(10, 10);
        // APP0 is 2 + 18 bytes; SOF marker byte follows
        jpeg[21] = 0xC3;
        assert!(sniff(&jpeg).is_none());
    }
}
