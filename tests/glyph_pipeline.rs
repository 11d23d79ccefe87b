//! End-to-end pipeline: path commands → arc stream → winding normalization
//! → blob → decoded field.

use arcfield::blob::{encode_blob, sdf_from_blob, Rgba};
use arcfield::math::{point, Point};
use arcfield::path::outline::winding_from_even_odd;
use arcfield::path::{ArcAccumulator, ArcEndpoint};

type Sink = Box<dyn FnMut(ArcEndpoint) -> bool>;

/// A counterclockwise rounded square, corners drawn with quadratics.
fn rounded_square(acc: &mut ArcAccumulator<Sink>, min: Point, size: f64, radius: f64) {
    let (x0, y0) = (min.x, min.y);
    let (x1, y1) = (x0 + size, y0 + size);
    let r = radius;

    acc.move_to(point(x0 + r, y0));
    acc.line_to(point(x1 - r, y0));
    acc.quadratic_bezier_to(point(x1, y0), point(x1, y0 + r));
    acc.line_to(point(x1, y1 - r));
    acc.quadratic_bezier_to(point(x1, y1), point(x1 - r, y1));
    acc.line_to(point(x0 + r, y1));
    acc.quadratic_bezier_to(point(x0, y1), point(x0, y1 - r));
    acc.line_to(point(x0, y0 + r));
    acc.quadratic_bezier_to(point(x0, y0), point(x0 + r, y0));
}

fn accumulate(tolerance: f64, commands: impl FnOnce(&mut ArcAccumulator<Sink>)) -> (Vec<ArcEndpoint>, f64) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let endpoints = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&endpoints);
    let mut acc = ArcAccumulator::new(
        tolerance,
        Box::new(move |e: ArcEndpoint| {
            sink.borrow_mut().push(e);
            true
        }) as Sink,
    );
    commands(&mut acc);
    assert!(acc.success);
    let max_error = acc.max_error;
    drop(acc);
    (Rc::try_unwrap(endpoints).unwrap().into_inner(), max_error)
}

#[test]
fn ring_glyph_end_to_end() {
    let tolerance = 0.5;
    let (mut endpoints, max_error) = accumulate(tolerance, |acc| {
        rounded_square(acc, point(0.0, 0.0), 100.0, 20.0);
        rounded_square(acc, point(30.0, 30.0), 40.0, 10.0);
    });

    assert!(max_error <= tolerance);
    // The first contour closed back to its start point (up to the rounding
    // of the subdivided curve evaluations).
    let first_contour_end = endpoints
        .iter()
        .skip(1)
        .take_while(|e| !e.is_move())
        .last()
        .unwrap()
        .p;
    assert!((first_contour_end - endpoints[0].p).length() < 1e-6);

    // Both contours are counterclockwise as drawn; normalization flips the
    // outer one and keeps the hole.
    assert!(winding_from_even_odd(&mut endpoints, false));

    let mut blob = vec![Rgba { r: 0, g: 0, b: 0, a: 0 }; 8192];
    let summary = encode_blob(&endpoints, 10.0, &mut blob).unwrap();
    assert!(summary.len <= blob.len());

    // In the ring: inside the fill.
    assert!(sdf_from_blob(&blob, &summary, point(15.0, 50.0)) < 0.0);
    assert!(sdf_from_blob(&blob, &summary, point(50.0, 85.0)) < 0.0);
    // In the hole and outside: both read as outside.
    assert!(sdf_from_blob(&blob, &summary, point(50.0, 50.0)) > 0.0);
    assert!(sdf_from_blob(&blob, &summary, point(-5.0, 50.0)) > 0.0);
    assert!(sdf_from_blob(&blob, &summary, point(50.0, 108.0)) > 0.0);

    // Encoding the same stream again produces identical bytes.
    let mut blob2 = vec![Rgba { r: 0, g: 0, b: 0, a: 0 }; 8192];
    let summary2 = encode_blob(&endpoints, 10.0, &mut blob2).unwrap();
    assert_eq!(summary, summary2);
    assert_eq!(blob[..summary.len], blob2[..summary2.len]);

    // A too-small buffer reports the size it needed and writes nothing.
    let mut tiny = vec![Rgba { r: 1, g: 2, b: 3, a: 4 }; 8];
    match encode_blob(&endpoints, 10.0, &mut tiny) {
        Err(arcfield::blob::EncodeError::BufferTooSmall { required }) => {
            assert_eq!(required, summary.len);
        }
        other => panic!("expected overflow, got {:?}", other),
    }
    assert!(tiny.iter().all(|t| *t == Rgba { r: 1, g: 2, b: 3, a: 4 }));
}
