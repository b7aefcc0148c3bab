use super::*;
use crate::foundation::color::Rgb8;

#[test]
fn decode_png_round_trips_pixels_and_fits() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_decode");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("two_px.png");
    let img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
    img.save(&path).unwrap();

    let decoded = decode_rgb(&path).unwrap();
    assert_eq!(decoded.size(), Size::new(2, 1));
    assert_eq!(decoded.pixel(1, 0), Rgb8::new(0, 0, 255));

    let fitted = decode_fitted(&path, Size::new(4, 2)).unwrap();
    assert_eq!(fitted.size(), Size::new(4, 2));
    assert_eq!(fitted.pixel(0, 1), Rgb8::new(255, 0, 0));
    assert_eq!(fitted.pixel(3, 0), Rgb8::new(0, 0, 255));
}

#[test]
fn missing_file_is_an_asset_error() {
    let err = decode_rgb(Path::new("definitely/not/here.png")).unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
}
