use super::*;
use crate::render::surface::Surface;

fn raster() -> RenderedRaster {
    RenderedRaster::new(
        Surface {
            width: 2,
            height: 2,
            data: [255u8, 0, 0, 255].repeat(4),
        },
        Quality::new(0.9).unwrap(),
    )
}

#[derive(Default)]
struct RecordingSink(Vec<Vec<u8>>);

impl ClipboardSink for RecordingSink {
    fn write_png(&mut self, png: &Blob) -> MemeResult<()> {
        self.0.push(png.bytes.clone());
        Ok(())
    }
}

#[test]
fn png_export_reuses_cached_blob() {
    let r = raster();
    let a = export(&r, OutputFormat::Png, None).unwrap();
    let b = r.png_blob().unwrap();
    assert_eq!(&a, b);
    assert!(
        export_data_url(&r, OutputFormat::Png, None)
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
}

#[test]
fn jpeg_data_url_has_jpeg_mime() {
    let url = export_data_url(&raster(), OutputFormat::Jpeg, Some(Quality::new(0.5).unwrap())).unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn clipboard_receives_png() {
    let mut sink = RecordingSink::default();
    copy_to_clipboard(&raster(), &mut sink).unwrap();
    assert_eq!(sink.0.len(), 1);
    assert_eq!(&sink.0[0][1..4], b"PNG");
}

#[test]
fn clipboard_untouched_when_export_fails() {
    let broken = RenderedRaster::new(
        Surface {
            width: 4,
            height: 4,
            data: vec![0; 3],
        },
        Quality::MAX,
    );
    let mut sink = RecordingSink::default();
    assert!(matches!(
        copy_to_clipboard(&broken, &mut sink).unwrap_err(),
        crate::foundation::error::MemeError::Encode(_)
    ));
    assert!(sink.0.is_empty());
}

#[tokio::test]
async fn download_writes_png_and_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/meme.png");
    let written = download(&raster(), &path).await.unwrap();
    assert_eq!(written, path);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[tokio::test]
async fn failed_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.png");
    let broken = RenderedRaster::new(
        Surface {
            width: 4,
            height: 4,
            data: vec![],
        },
        Quality::MAX,
    );
    assert!(download(&broken, &path).await.is_err());
    assert!(!path.exists());
}
