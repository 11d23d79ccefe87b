use clap::{App, Arg};
use log::info;

use arcfield::blob::{encode_blob, sdf_from_blob, BlobSummary, EncodeError, Rgba};
use arcfield::math::point;
use arcfield::path::outline::winding_from_even_odd;
use arcfield::path::{ArcAccumulator, ArcEndpoint};

use std::cell::RefCell;
use std::fs;
use std::process::exit;
use std::rc::Rc;

// Large font size profile.
const MIN_FONT_SIZE: f64 = 64.0;
const TOLERANCE: f64 = 5e-4;

fn main() {
    env_logger::init();

    let matches = App::new("arcfield")
        .about("Encodes a glyph outline into an arc SDF blob and previews the decoded field")
        .arg(
            Arg::with_name("FONT_PATH")
                .help("Path of a ttf/otf font file")
                .required(true),
        )
        .arg(
            Arg::with_name("CHARACTER")
                .help("Character to encode")
                .required(true),
        )
        .arg(
            Arg::with_name("ANIMATE")
                .long("animate")
                .takes_value(false)
                .help("Preview the field again at a few magnifications"),
        )
        .get_matches();

    let font_path = matches.value_of("FONT_PATH").unwrap();
    let character = matches.value_of("CHARACTER").unwrap();
    let animate = matches.is_present("ANIMATE");

    let mut chars = character.chars();
    let character = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            eprintln!("CHARACTER must be exactly one character");
            exit(1);
        }
    };

    if let Err(message) = run(font_path, character, animate) {
        eprintln!("{}", message);
        exit(1);
    }
}

type Sink = Box<dyn FnMut(ArcEndpoint) -> bool>;

struct OutlineBridge {
    acc: ArcAccumulator<Sink>,
}

impl ttf_parser::OutlineBuilder for OutlineBridge {
    fn move_to(&mut self, x: f32, y: f32) {
        self.acc.move_to(point(x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.acc.line_to(point(x as f64, y as f64));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.acc
            .quadratic_bezier_to(point(x1 as f64, y1 as f64), point(x as f64, y as f64));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.acc.cubic_bezier_to(
            point(x1 as f64, y1 as f64),
            point(x2 as f64, y2 as f64),
            point(x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.acc.close_path();
    }
}

fn run(font_path: &str, character: char, animate: bool) -> Result<(), String> {
    let data = fs::read(font_path).map_err(|e| format!("{}: {}", font_path, e))?;
    let face = ttf_parser::Face::parse(&data, 0).map_err(|e| format!("{}: {}", font_path, e))?;

    let upem = face.units_per_em() as f64;
    let tolerance = upem * TOLERANCE;
    let faraway = upem / MIN_FONT_SIZE;

    let glyph = face
        .glyph_index(character)
        .ok_or_else(|| format!("no glyph for {:?}", character))?;

    let endpoints = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&endpoints);
    let mut bridge = OutlineBridge {
        acc: ArcAccumulator::new(
            tolerance,
            Box::new(move |e: ArcEndpoint| {
                sink.borrow_mut().push(e);
                true
            }) as Sink,
        ),
    };

    face.outline_glyph(glyph, &mut bridge)
        .ok_or_else(|| format!("glyph for {:?} has no outline", character))?;

    let max_error = bridge.acc.max_error;
    let num_endpoints = bridge.acc.num_endpoints;
    drop(bridge);
    let mut endpoints = Rc::try_unwrap(endpoints).unwrap().into_inner();

    info!(
        "accumulated {} endpoints, max error {:.3} ({:.5} upem)",
        num_endpoints,
        max_error,
        max_error / upem
    );

    if winding_from_even_odd(&mut endpoints, false) {
        info!("normalized contour winding");
    }

    let mut blob = vec![Rgba { r: 0, g: 0, b: 0, a: 0 }; 1024];
    let summary = loop {
        match encode_blob(&endpoints, faraway, &mut blob) {
            Ok(summary) => break summary,
            Err(EncodeError::BufferTooSmall { required }) => {
                info!("growing blob buffer to {} texels", required);
                blob.resize(required, Rgba { r: 0, g: 0, b: 0, a: 0 });
            }
        }
    };

    println!(
        "glyph {:?}: {} endpoints (max error {:.3} units), blob {} texels, grid {}x{}, avg fetch {:.2}",
        character,
        num_endpoints,
        max_error,
        summary.len,
        summary.nominal_width,
        summary.nominal_height,
        summary.avg_fetch
    );

    preview(&blob, &summary, 1.0);
    if animate {
        for &zoom in &[2.0, 4.0, 8.0] {
            println!("zoom {}x:", zoom);
            preview(&blob, &summary, zoom);
        }
    }

    Ok(())
}

/// Renders the decoded field as ASCII art, zoomed around the glyph center.
fn preview(blob: &[Rgba], summary: &BlobSummary, zoom: f64) {
    const ROWS: usize = 24;
    const COLS: usize = 48;

    let extents = &summary.extents;
    if extents.is_empty() {
        println!("(empty glyph)");
        return;
    }

    let width = (extents.max_x - extents.min_x) / zoom;
    let height = (extents.max_y - extents.min_y) / zoom;
    let cx = (extents.min_x + extents.max_x) * 0.5;
    let cy = (extents.min_y + extents.max_y) * 0.5;

    let mut out = String::with_capacity((COLS + 1) * ROWS);
    for row in 0..ROWS {
        // Fonts are y-up; the terminal is y-down.
        let y = cy + height * (0.5 - (row as f64 + 0.5) / ROWS as f64);
        for col in 0..COLS {
            let x = cx + width * ((col as f64 + 0.5) / COLS as f64 - 0.5);
            let d = sdf_from_blob(blob, summary, point(x, y));
            out.push(if d < 0.0 {
                '#'
            } else if d < height / ROWS as f64 {
                '+'
            } else {
                ' '
            });
        }
        out.push('\n');
    }
    print!("{}", out);
}
