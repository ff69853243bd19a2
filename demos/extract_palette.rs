//! Print the dominant color and palette of a PNG image.
//!
//! Usage:
//!   cargo run --example extract_palette -- <input.png> [colors] [quality]
//!
//! Set `RUST_LOG=mmcq=debug` to see the median cut phases.

use std::io::Cursor;

use mmcq::QuantizeConfig;
use tracing_subscriber::EnvFilter;

/// Decode a PNG into interleaved 8-bit RGBA.
fn load_png_rgba(path: &str) -> (Vec<u8>, u32, u32) {
    let data = std::fs::read(path).expect("failed to read input");
    let mut decoder = png::Decoder::new(Cursor::new(&data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::ALPHA);
    let mut reader = decoder.read_info().expect("not a PNG");
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).expect("failed to decode PNG");
    buf.truncate(frame.buffer_size());
    assert_eq!(
        frame.bit_depth,
        png::BitDepth::Eight,
        "only 8-bit PNGs are supported"
    );

    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        other => panic!("unsupported color type {other:?}"),
    };

    (rgba, frame.width, frame.height)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let input = args
        .get(1)
        .expect("usage: extract_palette <input.png> [colors] [quality]");
    let colors: u32 = args.get(2).map_or(10, |s| s.parse().expect("colors"));
    let quality: u32 = args.get(3).map_or(10, |s| s.parse().expect("quality"));

    let (rgba, w, h) = load_png_rgba(input);
    let config = QuantizeConfig::new().max_colors(colors).quality(quality);

    match mmcq::dominant_color(&rgba, &config) {
        Ok(c) => println!("{input} ({w}x{h}) dominant #{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        Err(e) => {
            eprintln!("{input}: {e}");
            std::process::exit(1);
        }
    }

    let map = mmcq::color_map_from_rgba(&rgba, &config).expect("palette");
    for entry in map.boxes() {
        let c = entry.color();
        println!(
            "#{:02x}{:02x}{:02x}  population {:>8}  volume {:>5}",
            c.r,
            c.g,
            c.b,
            entry.population(),
            entry.volume()
        );
    }
}
