//! End-to-end analyzer runs over synthetic buffers.

use autocrop::{
    AnalyzerParams, AutocropConfig, BoundsAnalyzer, Color, CropParams, EdgeProbe, PixelBuffer,
    PixelFormat, ProbeResult, Rect, analyze, analyze_with, find_crop,
};

/// Packed BGR image filled with `background`, with `blocks` painted in `ink`.
fn bgr_canvas(width: usize, height: usize, background: Color, ink: Color, blocks: &[Rect]) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for _ in 0..width * height {
        data.extend_from_slice(&[background.b, background.g, background.r]);
    }
    for block in blocks {
        for y in block.top()..block.bottom() {
            for x in block.left()..block.right() {
                let offset = (y as usize * width + x as usize) * 3;
                data[offset..offset + 3].copy_from_slice(&[ink.b, ink.g, ink.r]);
            }
        }
    }
    data
}

fn params(threshold: i32) -> AnalyzerParams {
    AnalyzerParams {
        color_threshold: threshold,
        ..Default::default()
    }
}

#[test]
fn test_black_square_on_white() {
    let data = bgr_canvas(100, 100, Color::WHITE, Color::BLACK, &[Rect::new(40, 40, 20, 20)]);
    let buffer = PixelBuffer::packed(&data, 100, 100, PixelFormat::Bgr24).unwrap();

    let analysis = analyze(&buffer, &params(10)).unwrap();

    assert!(analysis.success);
    assert_eq!(analysis.bounding_box, Rect::new(40, 40, 20, 20));
    assert_eq!(analysis.background, Color::WHITE);
}

#[test]
fn test_uniform_image_has_no_crop() {
    let data = bgr_canvas(50, 50, Color::rgb(90, 120, 200), Color::BLACK, &[]);
    let buffer = PixelBuffer::packed(&data, 50, 50, PixelFormat::Bgr24).unwrap();

    let analysis = analyze(&buffer, &params(10)).unwrap();

    assert!(!analysis.success);
    assert_eq!(analysis.bounding_box, Rect::new(0, 0, 50, 50));
}

#[test]
fn test_tiny_block_is_rejected() {
    let data = bgr_canvas(40, 40, Color::WHITE, Color::BLACK, &[Rect::new(20, 20, 2, 2)]);
    let buffer = PixelBuffer::packed(&data, 40, 40, PixelFormat::Bgr24).unwrap();

    let analysis = analyze(&buffer, &params(10)).unwrap();

    assert!(!analysis.success);
    assert_eq!(analysis.bounding_box, Rect::new(20, 20, 2, 2));
}

#[test]
fn test_scattered_content_spans_all_blocks() {
    let blocks = [
        Rect::new(10, 5, 4, 4),
        Rect::new(70, 30, 6, 3),
        Rect::new(30, 60, 3, 8),
    ];
    let data = bgr_canvas(90, 80, Color::WHITE, Color::rgb(30, 60, 90), &blocks);
    let buffer = PixelBuffer::packed(&data, 90, 80, PixelFormat::Bgr24).unwrap();

    let analysis = analyze(&buffer, &params(20)).unwrap();

    assert!(analysis.success);
    assert_eq!(analysis.bounding_box, Rect::from_edges(10, 5, 76, 68));
}

#[test]
fn test_noisy_frame_recovers_on_retry() {
    // white page, black square, and a dark vignette ring on the outermost pixels
    let (w, h) = (60, 60);
    let mut data = bgr_canvas(w, h, Color::WHITE, Color::BLACK, &[Rect::new(25, 25, 10, 10)]);
    for y in 0..h {
        for x in 0..w {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                let offset = (y * w + x) * 3;
                let shade = ((x * 7 + y * 13) % 200) as u8;
                data[offset..offset + 3].copy_from_slice(&[shade, shade / 2, shade / 3]);
            }
        }
    }
    let buffer = PixelBuffer::packed(&data, w, h, PixelFormat::Bgr24).unwrap();

    let strict = AnalyzerParams {
        color_threshold: 10,
        bucket_tolerance: 0.05,
        parallel: false,
    };
    let analysis = analyze(&buffer, &strict).unwrap();

    assert!(analysis.success);
    assert_eq!(analysis.background, Color::WHITE);
    assert_eq!(analysis.bounding_box, Rect::new(25, 25, 10, 10));
}

#[test]
fn test_transparent_background_argb() {
    let (w, h) = (32, 24);
    let mut data = vec![0u8; w * h * 4];
    // half-transparent red logo in the middle
    for y in 6..18 {
        for x in 8..20 {
            let offset = (y * w + x) * 4;
            data[offset..offset + 4].copy_from_slice(&[0, 0, 255, 128]);
        }
    }
    let buffer = PixelBuffer::packed(&data, w, h, PixelFormat::Bgra32).unwrap();

    let analysis = analyze(&buffer, &params(10)).unwrap();

    assert!(analysis.success);
    assert_eq!(analysis.background, Color::TRANSPARENT);
    assert_eq!(analysis.bounding_box, Rect::new(8, 6, 12, 12));
}

#[test]
fn test_padded_stride_matches_packed() {
    let (w, h) = (30, 20);
    let packed = bgr_canvas(w, h, Color::WHITE, Color::BLACK, &[Rect::new(5, 4, 10, 6)]);

    let stride = w * 3 + 6;
    let mut padded = vec![0u8; stride * h];
    for y in 0..h {
        padded[y * stride..y * stride + w * 3].copy_from_slice(&packed[y * w * 3..(y + 1) * w * 3]);
    }

    let a = PixelBuffer::packed(&packed, w, h, PixelFormat::Bgr24).unwrap();
    let b = PixelBuffer::new(&padded, w, h, stride, PixelFormat::Bgr24).unwrap();

    assert_eq!(
        analyze(&a, &params(10)).unwrap(),
        analyze(&b, &params(10)).unwrap()
    );
}

#[test]
fn test_parallel_scan_is_identical() {
    let blocks = [Rect::new(3, 90, 5, 5), Rect::new(150, 7, 9, 9), Rect::new(80, 60, 1, 1)];
    let data = bgr_canvas(200, 120, Color::WHITE, Color::BLACK, &blocks);
    let buffer = PixelBuffer::packed(&data, 200, 120, PixelFormat::Bgr24).unwrap();

    let sequential = BoundsAnalyzer::with_probe(EdgeProbe, params(10)).analyze(&buffer);
    let parallel = BoundsAnalyzer::with_probe(
        EdgeProbe,
        AnalyzerParams {
            parallel: true,
            ..params(10)
        },
    )
    .analyze(&buffer);

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.bounding_box, Rect::from_edges(3, 7, 159, 95));
}

/// Host-side detector that always trims a 5px scanner bed off each edge.
fn inset_probe(buffer: &PixelBuffer<'_>, _: Rect, _: i32, _: f32) -> ProbeResult {
    ProbeResult::found(buffer.bounds().contract_uniform(20.0), Color::WHITE, 3)
}

#[test]
fn test_custom_probe_region_limits_scan() {
    let (w, h) = (50, 50);
    let mut data = bgr_canvas(w, h, Color::WHITE, Color::BLACK, &[Rect::new(20, 20, 8, 8)]);
    // dark bed along the left edge, outside the probe's region
    for y in 0..h {
        for x in 0..4 {
            let offset = (y * w + x) * 3;
            data[offset..offset + 3].copy_from_slice(&[10, 10, 10]);
        }
    }
    let buffer = PixelBuffer::packed(&data, w, h, PixelFormat::Bgr24).unwrap();

    let analysis = analyze_with(&buffer, &params(10), inset_probe).unwrap();

    assert!(analysis.success);
    assert_eq!(analysis.bounding_box, Rect::new(20, 20, 8, 8));
}

#[test]
fn test_find_crop_with_padding_and_aspect() {
    let data = bgr_canvas(100, 100, Color::WHITE, Color::BLACK, &[Rect::new(40, 40, 20, 20)]);
    let buffer = PixelBuffer::packed(&data, 100, 100, PixelFormat::Bgr24).unwrap();
    let config = AutocropConfig {
        analyzer: params(10),
        crop: CropParams {
            padding_percent: 50.0,
            aspect: Some(2.0),
            ..Default::default()
        },
    };

    let report = find_crop(&buffer, &config).unwrap();

    // 20x20 box + 10px each side = 40x40 at (30,30), widened to 80x40
    assert_eq!(report.crop.region, Rect::new(10, 30, 80, 40));
    assert!(Rect::new(0, 0, 100, 100).contains_rect(&report.crop.region));
}
