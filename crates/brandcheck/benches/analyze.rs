use brandcheck::analyze::rgb_view;
use brandcheck::{AnalysisConfig, Analyzer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

/// Gold arch on a soft gradient, so the palette has more than two colors.
fn make_logo_fixture(width: u32, height: u32) -> RgbImage {
    let (w, h) = (width as f64, height as f64);
    RgbImage::from_fn(width, height, |x, y| {
        let (u, v) = (x as f64 / w, y as f64 / h);
        let body = (0.2..0.8).contains(&u) && (0.25..0.75).contains(&v);
        let opening = (0.4..0.6).contains(&u) && (0.5..0.75).contains(&v);
        if body && !opening {
            Rgb([255, 188, 13])
        } else {
            let g = (40.0 * (u + v)) as u8;
            Rgb([g, g / 2, 60 - g / 2])
        }
    })
}

fn bench_checkers(c: &mut Criterion) {
    let img = make_logo_fixture(640, 480);
    let analyzer = Analyzer::new(AnalysisConfig::default());

    c.bench_function("color_640x480", |b| {
        b.iter(|| {
            let r = analyzer.color_checker().analyze(black_box(&rgb_view(&img)));
            black_box(r.dominant_colors.len())
        })
    });

    c.bench_function("geometry_640x480", |b| {
        b.iter(|| {
            let r = analyzer.geometry_checker().analyze(black_box(&rgb_view(&img)));
            black_box(r.geometry_score())
        })
    });
}

fn bench_report(c: &mut Criterion) {
    let analyzer = Analyzer::new(AnalysisConfig::default());
    let img_vga = make_logo_fixture(640, 480);
    let img_hd = make_logo_fixture(1280, 720);

    c.bench_function("report_640x480", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(&rgb_view(&img_vga)))).compliance_score)
    });

    c.bench_function("report_1280x720", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(&rgb_view(&img_hd)))).compliance_score)
    });
}

criterion_group!(analyze, bench_checkers, bench_report);
criterion_main!(analyze);
