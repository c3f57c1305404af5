use super::*;

#[test]
fn parses_each_reference_kind() {
    assert!(matches!(
        ImageSource::parse("https://picsum.photos/400/400?random=1").unwrap(),
        ImageSource::Remote(_)
    ));
    assert_eq!(
        ImageSource::parse("images/cat.png").unwrap(),
        ImageSource::File(PathBuf::from("images/cat.png"))
    );
    assert_eq!(
        ImageSource::parse("blob:memeforge/abc").unwrap(),
        ImageSource::Blob("blob:memeforge/abc".to_string())
    );
    assert_eq!(
        ImageSource::parse("data:image/png;base64,AQID").unwrap(),
        ImageSource::Data {
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3]
        }
    );
}

#[cfg(unix)]
#[test]
fn file_url_becomes_path() {
    assert_eq!(
        ImageSource::parse("file:///tmp/meme.png").unwrap(),
        ImageSource::File(PathBuf::from("/tmp/meme.png"))
    );
}

#[test]
fn rejects_empty_and_malformed_references() {
    assert!(ImageSource::parse("   ").is_err());
    assert!(ImageSource::parse("data:image/png,plain").is_err());
    assert!(ImageSource::parse("data:image/png;base64,@@@").is_err());
    assert!(ImageSource::parse("data:nocomma").is_err());
    assert!(ImageSource::parse("http://").is_err());
}

#[test]
fn describe_hides_inline_payload() {
    let src = ImageSource::parse("data:image/png;base64,AQID").unwrap();
    assert_eq!(src.describe(), "data:image/png (3 bytes)");
}

#[tokio::test]
async fn no_remote_fetcher_always_fails() {
    let url = url::Url::parse("https://example.com/a.png").unwrap();
    let err = NoRemoteFetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, MemeError::ImageLoad(_)));
}
