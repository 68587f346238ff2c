//! Single-page PDF layout for a route summary.
//!
//! Uses the standard Helvetica faces so no font is embedded. The page
//! content depends only on the summary and map; the creation timestamp
//! lives in the Info dictionary.

use crate::constants;
use crate::error::RenderError;
use crate::models::route::{MapImage, RouteSummary};
use crate::util::fs as report_fs;
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::path::Path;
use tracing::{info, warn};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const TITLE: &str = "Route Summary";
const TITLE_SIZE: i64 = 18;
const BODY_SIZE: i64 = 12;
const LEADING: i64 = 20;
/// Roughly what fits in the text column at 12pt Helvetica.
const WRAP_COLUMNS: usize = 85;
/// Below this much free height (one inch) the map is left out.
const MIN_MAP_HEIGHT: i64 = 72;

/// Render without a map image.
pub fn render(summary: &RouteSummary, output: &Path) -> Result<(), RenderError> {
    render_with_map(summary, None, output)
}

/// Build the document and write it over `output` in one step.
pub fn render_with_map(
    summary: &RouteSummary,
    map: Option<&MapImage>,
    output: &Path,
) -> Result<(), RenderError> {
    let bytes = build_document(summary, map, Utc::now())?;
    report_fs::write_atomic(output, &bytes, constants::PDF_FILE_MODE).map_err(|e| {
        RenderError::OutputPathUnwritable {
            path: output.to_path_buf(),
            reason: format!("{:#}", e),
        }
    })?;
    info!(path = %output.display(), bytes = bytes.len(), "wrote PDF");
    Ok(())
}

/// The text lines of the template, in order. The cost line is omitted
/// when no estimate exists.
pub fn summary_lines(summary: &RouteSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Origin: {}", summary.origin),
        format!("Destination: {}", summary.destination),
        format!("Distance: {}", summary.distance_text),
        format!("Estimated Travel Time: {}", summary.duration_text),
    ];
    if let Some(cost) = &summary.estimated_cost {
        lines.push(format!("Estimated Cost: {}", cost.display()));
    }
    lines
}

/// Serialize the PDF to memory.
pub fn build_document(
    summary: &RouteSummary,
    map: Option<&MapImage>,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_font = doc.add_object(standard_font("Helvetica"));
    let title_font = doc.add_object(standard_font("Helvetica-Bold"));

    let mut resources = dictionary! {
        "Font" => dictionary! {
            "F1" => body_font,
            "F2" => title_font,
        },
    };

    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;
    text_line(&mut ops, "F2", TITLE_SIZE, y, TITLE);
    y -= LEADING * 2;

    for line in summary_lines(summary) {
        for (i, chunk) in wrap(&line, WRAP_COLUMNS).into_iter().enumerate() {
            let chunk = if i == 0 { chunk } else { format!("    {}", chunk) };
            text_line(&mut ops, "F1", BODY_SIZE, y, &chunk);
            y -= LEADING;
        }
    }

    let top = y - LEADING / 2;
    match map {
        Some(_) if top - MARGIN < MIN_MAP_HEIGHT => {
            warn!(
                space = top - MARGIN,
                "summary text leaves no room for the map; rendering without it"
            );
        }
        Some(map) => {
            let image_id = doc.add_object(image_stream(map));
            resources.set("XObject", dictionary! { "Map" => image_id });

            let top = top as f32;
            let max_w = (PAGE_WIDTH - 2 * MARGIN) as f32;
            let max_h = top - MARGIN as f32;
            let scale = (max_w / map.width as f32).min(max_h / map.height as f32);
            let (w, h) = (map.width as f32 * scale, map.height as f32 * scale);
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "cm",
                vec![
                    Object::Real(w),
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(h),
                    Object::Real(MARGIN as f32),
                    Object::Real(top - h),
                ],
            ));
            ops.push(Operation::new("Do", vec![Object::Name(b"Map".to_vec())]));
            ops.push(Operation::new("Q", vec![]));
        }
        None => {}
    }

    let content = Content { operations: ops }
        .encode()
        .map_err(|e| RenderError::Serialize(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let resources_id = doc.add_object(resources);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_object(&format!("{}: {} to {}", TITLE, summary.origin, summary.destination)),
        "Producer" => text_object(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => text_object(&created.format("D:%Y%m%d%H%M%SZ").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| RenderError::Serialize(e.to_string()))?;
    Ok(out)
}

fn standard_font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn image_stream(map: &MapImage) -> Stream {
    let color_space = match map.components {
        1 => "DeviceGray",
        4 => "DeviceCMYK",
        _ => "DeviceRGB",
    };
    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(map.width as i64),
            "Height" => Object::Integer(map.height as i64),
            "ColorSpace" => color_space,
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "DCTDecode",
        },
        map.data.clone(),
    );
    stream.allows_compression = false;
    stream
}

fn text_line(ops: &mut Vec<Operation>, font: &str, size: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Integer(MARGIN), Object::Integer(y)],
    ));
    ops.push(Operation::new("Tj", vec![text_object(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn text_object(text: &str) -> Object {
    Object::String(win_ansi(text), StringFormat::Literal)
}

/// Encode for WinAnsiEncoding. Latin-1 maps directly; a few common
/// typographic characters have their own slots; the rest become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap on whitespace; words longer than `width` are split.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let split: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            out.push(split);
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::{CostSource, Money};
    use crate::util::jpeg::tests::tiny_jpeg;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn summary(cost: Option<Money>) -> RouteSummary {
        RouteSummary {
            origin: "6, avenue des Hauts-Fourneaux L-4362 Esch-sur-Alzette".into(),
            destination: "Luxembourg Airport".into(),
            distance_text: "24.3 km".into(),
            duration_text: "22 mins".into(),
            distance_meters: 24310,
            duration_seconds: 1320,
            estimated_cost: cost,
            overview_polyline: None,
        }
    }

    fn page_content(bytes: &[u8]) -> Vec<u8> {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        doc.get_page_content(page_id).unwrap()
    }

    fn page_ops(bytes: &[u8]) -> Vec<Operation> {
        Content::decode(&page_content(bytes)).unwrap().operations
    }

    fn page_text(bytes: &[u8]) -> Vec<String> {
        page_ops(bytes)
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(b, _)) => Some(String::from_utf8_lossy(b).into_owned()),
                _ => None,
            })
            .collect()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_lines_without_cost() {
        let text = page_text(&build_document(&summary(None), None, fixed_time()).unwrap());
        assert_eq!(
            text,
            vec![
                "Route Summary",
                "Origin: 6, avenue des Hauts-Fourneaux L-4362 Esch-sur-Alzette",
                "Destination: Luxembourg Airport",
                "Distance: 24.3 km",
                "Estimated Travel Time: 22 mins",
            ]
        );
    }

    #[test]
    fn test_cost_line_when_present() {
        let cost = Money {
            amount: 7.293,
            currency: "EUR".into(),
            source: CostSource::DistanceRate,
        };
        let text = page_text(&build_document(&summary(Some(cost)), None, fixed_time()).unwrap());
        assert_eq!(text.last().map(String::as_str), Some("Estimated Cost: 7.29 EUR"));
    }

    #[test]
    fn test_same_input_same_bytes() {
        let a = build_document(&summary(None), None, fixed_time()).unwrap();
        let b = build_document(&summary(None), None, fixed_time()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_page_content_independent_of_timestamp() {
        let a = build_document(&summary(None), None, fixed_time()).unwrap();
        let b = build_document(&summary(None), None, Utc::now()).unwrap();
        assert_ne!(a, b);
        assert_eq!(page_content(&a), page_content(&b));
    }

    #[test]
    fn test_map_image_embedded() {
        let jpeg = tiny_jpeg(1280, 800);
        let map = MapImage {
            data: jpeg.clone(),
            width: 1280,
            height: 800,
            components: 3,
        };
        let bytes = build_document(&summary(None), Some(&map), fixed_time()).unwrap();
        let ops = page_ops(&bytes);
        assert!(ops.iter().any(|op| op.operator == "Do"));

        let doc = Document::load_mem(&bytes).unwrap();
        let image = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .find(|s| s.dict.get(b"Subtype").and_then(|v| v.as_name()).ok() == Some(b"Image".as_slice()))
            .unwrap();
        assert_eq!(image.content, jpeg);
    }

    #[test]
    fn test_map_placed_inside_page() {
        let map = MapImage {
            data: tiny_jpeg(1280, 800),
            width: 1280,
            height: 800,
            components: 3,
        };
        let bytes = build_document(&summary(None), Some(&map), fixed_time()).unwrap();
        let cm = page_ops(&bytes).into_iter().find(|op| op.operator == "cm").unwrap();
        let nums: Vec<f32> = cm.operands.iter().map(|o| o.as_float().unwrap()).collect();
        let (w, h, x, y) = (nums[0], nums[3], nums[4], nums[5]);
        assert!(w > 0.0 && h > 0.0);
        assert!(x >= MARGIN as f32 && x + w <= (PAGE_WIDTH - MARGIN) as f32 + 0.01);
        assert!(y >= MARGIN as f32 - 0.01);
    }

    #[test]
    fn test_long_text_drops_map() {
        let mut long = summary(None);
        long.origin = "Rue de la Gare ".repeat(400);
        let map = MapImage {
            data: tiny_jpeg(640, 400),
            width: 640,
            height: 400,
            components: 3,
        };
        let bytes = build_document(&long, Some(&map), fixed_time()).unwrap();
        let ops = page_ops(&bytes);
        assert!(!ops.iter().any(|op| op.operator == "Do" || op.operator == "cm"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(!doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .any(|s| s.dict.get(b"Subtype").and_then(|v| v.as_name()).ok() == Some(b"Image".as_slice())));
    }

    #[test]
    fn test_render_writes_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("route.pdf");
        render(&summary(None), &output).unwrap();
        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(page_text(&bytes).contains(&"Distance: 24.3 km".to_string()));
    }

    #[test]
    fn test_render_missing_parent_is_unwritable() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nope").join("route.pdf");
        let err = render(&summary(None), &output).unwrap_err();
        assert!(matches!(err, RenderError::OutputPathUnwritable { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Zürich €5"), b"Z\xfcrich \x805".to_vec());
        assert_eq!(win_ansi("東京"), b"??".to_vec());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
    }
}
